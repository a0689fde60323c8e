//! AutoDock Vina driven as a subprocess.

use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{Duration, Instant};

use super::engine::{DockingEngine, DockingJob};
use super::error::FailureReason;
use super::process;

const RESULT_TAG: &str = "REMARK VINA RESULT:";

#[derive(Debug, Clone)]
pub struct VinaEngine {
    executable: PathBuf,
    cpu: Option<usize>,
    seed: Option<i64>,
}

impl Default for VinaEngine {
    fn default() -> Self {
        Self::new("vina")
    }
}

impl VinaEngine {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            cpu: None,
            seed: None,
        }
    }

    pub fn with_cpu(mut self, cpu: Option<usize>) -> Self {
        self.cpu = cpu;
        self
    }

    pub fn with_seed(mut self, seed: Option<i64>) -> Self {
        self.seed = seed;
        self
    }

    fn base_command(&self, job: &DockingJob<'_>) -> Command {
        let w = job.window;
        let mut cmd = Command::new(&self.executable);
        cmd.arg("--receptor")
            .arg(job.receptor)
            .arg("--ligand")
            .arg(job.ligand);
        for (flag, value) in [
            ("--center_x", w.center[0]),
            ("--center_y", w.center[1]),
            ("--center_z", w.center[2]),
            ("--size_x", w.size[0]),
            ("--size_y", w.size[1]),
            ("--size_z", w.size[2]),
        ] {
            cmd.arg(flag).arg(format!("{value:.3}"));
        }
        if let Some(cpu) = self.cpu {
            cmd.arg("--cpu").arg(cpu.to_string());
        }
        if let Some(seed) = self.seed {
            cmd.arg("--seed").arg(seed.to_string());
        }
        cmd
    }

    fn score_command(&self, job: &DockingJob<'_>) -> Command {
        let mut cmd = self.base_command(job);
        cmd.arg("--score_only");
        cmd
    }

    fn minimize_command(&self, job: &DockingJob<'_>) -> Command {
        let mut cmd = self.base_command(job);
        cmd.arg("--local_only")
            .arg("--minimize")
            .arg("--out")
            .arg(job.scratch.join("minimized.pdbqt"));
        cmd
    }

    fn search_command(&self, job: &DockingJob<'_>) -> Command {
        let mut cmd = self.base_command(job);
        cmd.arg("--exhaustiveness")
            .arg(job.exhaustiveness.to_string())
            .arg("--num_modes")
            .arg(job.num_poses.to_string())
            .arg("--out")
            .arg(job.out);
        cmd
    }
}

impl DockingEngine for VinaEngine {
    fn name(&self) -> &str {
        "vina"
    }

    fn dock(&self, job: &DockingJob<'_>) -> Result<Vec<f64>, FailureReason> {
        let deadline = Instant::now() + job.timeout;

        let scored = run_before(&mut self.score_command(job), deadline, job.timeout)?;
        if let Some(e) = parse_affinity(&String::from_utf8_lossy(&scored.stdout)) {
            log::debug!("input pose score: {e:.3} kcal/mol");
        }

        let minimized = run_before(&mut self.minimize_command(job), deadline, job.timeout)?;
        if let Some(e) = parse_affinity(&String::from_utf8_lossy(&minimized.stdout)) {
            log::debug!("minimized pose score: {e:.3} kcal/mol");
        }

        run_before(&mut self.search_command(job), deadline, job.timeout)?;
        let poses = std::fs::read_to_string(job.out).map_err(FailureReason::io)?;
        parse_pose_energies(&poses)
    }
}

/// Runs `cmd` with whatever is left before `deadline`. A timeout reports
/// the whole `budget`, not the remainder.
fn run_before(
    cmd: &mut Command,
    deadline: Instant,
    budget: Duration,
) -> Result<Output, FailureReason> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let left = deadline.saturating_duration_since(Instant::now());
    if left.is_zero() {
        return Err(FailureReason::Timeout {
            program,
            limit: budget,
        });
    }
    process::run(cmd, left).map_err(|reason| match reason {
        FailureReason::Timeout { program, .. } => FailureReason::Timeout {
            program,
            limit: budget,
        },
        other => other,
    })
}

/// Extracts the `Affinity:` value printed by score-only and local runs.
pub fn parse_affinity(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .filter_map(|l| l.trim_start().strip_prefix("Affinity:"))
        .find_map(|rest| rest.split_whitespace().next()?.parse().ok())
}

/// Reads one energy per model from `REMARK VINA RESULT:` lines of a docked
/// PDBQT file.
pub fn parse_pose_energies(pdbqt: &str) -> Result<Vec<f64>, FailureReason> {
    let mut energies = Vec::new();
    for (line_no, line) in pdbqt.lines().enumerate() {
        let Some(rest) = line.strip_prefix(RESULT_TAG) else {
            continue;
        };
        let value = rest
            .split_whitespace()
            .next()
            .and_then(|tok| tok.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                FailureReason::Unparsable(format!("line {}: '{}'", line_no + 1, line.trim()))
            })?;
        energies.push(value);
    }
    if energies.is_empty() {
        return Err(FailureReason::NoPoses);
    }
    Ok(energies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::window::DockingWindow;
    use std::path::Path;

    const DOCKED: &str = "\
MODEL 1
REMARK VINA RESULT:    -7.312      0.000      0.000
REMARK INTER + INTRA:          -9.876
ATOM      1  C   UNL     1       1.000   2.000   3.000  0.00  0.00    +0.000 C
ENDMDL
MODEL 2
REMARK VINA RESULT:    -6.900      1.532      2.410
ATOM      1  C   UNL     1       1.100   2.000   3.000  0.00  0.00    +0.000 C
ENDMDL
";

    fn job<'a>(window: &'a DockingWindow, scratch: &'a Path) -> DockingJob<'a> {
        DockingJob {
            receptor: Path::new("r.pdbqt"),
            ligand: Path::new("l.pdbqt"),
            window,
            exhaustiveness: 40,
            num_poses: 20,
            out: Path::new("out.pdbqt"),
            scratch,
            timeout: Duration::from_secs(600),
        }
    }

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn parses_one_energy_per_model() {
        assert_eq!(parse_pose_energies(DOCKED).unwrap(), vec![-7.312, -6.9]);
    }

    #[test]
    fn output_without_results_has_no_poses() {
        assert_eq!(
            parse_pose_energies("MODEL 1\nENDMDL\n"),
            Err(FailureReason::NoPoses)
        );
    }

    #[test]
    fn malformed_result_line_is_unparsable() {
        let err = parse_pose_energies("REMARK VINA RESULT:  nan-ish\n").unwrap_err();
        assert!(matches!(err, FailureReason::Unparsable(msg) if msg.starts_with("line 1")));
    }

    #[test]
    fn parses_affinity_from_stdout() {
        let out = "Scoring\nEstimated Free Energy of Binding   : -5.1\nAffinity: -5.123 (kcal/mol)\n";
        assert_eq!(parse_affinity(out), Some(-5.123));
        assert_eq!(parse_affinity("nothing here"), None);
    }

    #[test]
    fn search_command_carries_box_and_budget() {
        let window = DockingWindow {
            center: [1.0, -2.5, 3.25],
            size: [20.0, 22.0, 24.0],
        };
        let scratch = Path::new("/tmp/scratch");
        let engine = VinaEngine::default().with_seed(Some(7));
        let a = args(&engine.search_command(&job(&window, scratch)));
        let value = |flag: &str| {
            let i = a.iter().position(|x| x == flag).expect(flag);
            a[i + 1].clone()
        };
        assert_eq!(value("--center_y"), "-2.500");
        assert_eq!(value("--size_z"), "24.000");
        assert_eq!(value("--exhaustiveness"), "40");
        assert_eq!(value("--num_modes"), "20");
        assert_eq!(value("--out"), "out.pdbqt");
        assert_eq!(value("--seed"), "7");
        assert!(!a.iter().any(|x| x == "--cpu"));
    }

    #[test]
    fn minimize_command_writes_to_scratch() {
        let window = DockingWindow {
            center: [0.0; 3],
            size: [10.0; 3],
        };
        let scratch = Path::new("/tmp/scratch");
        let a = args(&VinaEngine::default().minimize_command(&job(&window, scratch)));
        assert!(a.iter().any(|x| x == "--local_only"));
        assert!(a.iter().any(|x| x == "--minimize"));
        assert!(a.iter().any(|x| x == "/tmp/scratch/minimized.pdbqt"));
        let s = args(&VinaEngine::default().score_command(&job(&window, scratch)));
        assert_eq!(s.last().map(String::as_str), Some("--score_only"));
    }

    #[test]
    fn expired_deadline_times_out_before_spawning() {
        let engine = VinaEngine::new("/nonexistent/vina");
        let window = DockingWindow {
            center: [0.0; 3],
            size: [10.0; 3],
        };
        let j = job(&window, Path::new("/tmp/scratch"));
        let budget = Duration::from_secs(600);
        let err =
            run_before(&mut engine.score_command(&j), Instant::now(), budget).unwrap_err();
        assert_eq!(
            err,
            FailureReason::Timeout {
                program: "/nonexistent/vina".into(),
                limit: budget,
            }
        );

        let later = Instant::now() + budget;
        let err = run_before(&mut engine.score_command(&j), later, budget).unwrap_err();
        assert!(matches!(err, FailureReason::Spawn { .. }));
    }
}
