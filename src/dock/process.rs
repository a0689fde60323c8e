//! Bounded execution of external programs.

use std::io::Read;
use std::process::{Child, Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::error::FailureReason;

const POLL_INTERVAL: Duration = Duration::from_millis(25);
const STDERR_TAIL: usize = 512;

/// Runs `cmd` to completion, killing it once `limit` has elapsed.
///
/// Both output streams are drained on helper threads so a chatty child
/// cannot block on a full pipe. A non-zero exit status is an error.
pub(crate) fn run(cmd: &mut Command, limit: Duration) -> Result<Output, FailureReason> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    log::debug!("running {cmd:?}");

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| FailureReason::Spawn {
            program: program.clone(),
            detail: e.to_string(),
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match wait_until(&mut child, Instant::now() + limit) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            log::debug!("'{program}' killed after {}s", limit.as_secs());
            return Err(FailureReason::Timeout { program, limit });
        }
        Err(e) => {
            let _ = child.kill();
            return Err(FailureReason::io(e));
        }
    };

    let output = Output {
        status,
        stdout: join(stdout),
        stderr: join(stderr),
    };

    if !output.status.success() {
        return Err(FailureReason::Exit {
            program,
            status: output.status.to_string(),
            stderr: tail(&String::from_utf8_lossy(&output.stderr), STDERR_TAIL),
        });
    }
    Ok(output)
}

fn wait_until(
    child: &mut Child,
    deadline: Instant,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut s) = stream {
            let _ = s.read_to_end(&mut buf);
        }
        buf
    })
}

fn join(handle: JoinHandle<Vec<u8>>) -> Vec<u8> {
    handle.join().unwrap_or_default()
}

/// Last `max` bytes of `text`, trimmed, cut on a char boundary.
fn tail(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.len() <= max {
        return text.to_string();
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    format!("...{}", &text[start..])
}
