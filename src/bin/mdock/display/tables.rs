use std::io::{self, Write};

use mutant_dock::EvaluationRecord;

use crate::util::text::{molar, truncate};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_kv_table(title: &str, rows: &[(&str, String)]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let key_w = 18usize;
    let sep_overhead = 7;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);
    let k_line = "─".repeat(key_w + 2);
    let v_line = "─".repeat(val_w + 2);

    let _ = writeln!(out);
    let _ = writeln!(out, "{INDENT}{}", truncate(title, SAFE_TABLE_WIDTH));
    let _ = writeln!(out, "{INDENT}┌{k_line}┬{v_line}┐");
    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{INDENT}│ {:<key_w$} │ {:>val_w$} │",
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }
    let _ = writeln!(out, "{INDENT}└{k_line}┴{v_line}┘");
}

/// Prints the `limit` strongest binders among the docked rows.
pub fn print_records(records: &[EvaluationRecord], limit: usize) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut docked: Vec<_> = records.iter().filter(|r| !r.is_failed()).collect();
    docked.sort_by(|a, b| a.mean_delta_g.total_cmp(&b.mean_delta_g));
    if docked.is_empty() {
        return;
    }

    let (id_w, dg_w, kd_w, mut_w) = (16usize, 10usize, 12usize, 5usize);
    let line = |l: &str, m: &str, r: &str| {
        format!(
            "{INDENT}{l}{}{m}{}{m}{}{m}{}{r}",
            "─".repeat(id_w + 2),
            "─".repeat(dg_w + 2),
            "─".repeat(kd_w + 2),
            "─".repeat(mut_w + 2),
        )
    };

    let _ = writeln!(out);
    let _ = writeln!(out, "{INDENT}Strongest binders");
    let _ = writeln!(out, "{}", line("┌", "┬", "┐"));
    let _ = writeln!(
        out,
        "{INDENT}│ {:<id_w$} │ {:>dg_w$} │ {:>kd_w$} │ {:>mut_w$} │",
        "ID", "ΔG", "Kd", "Mut"
    );
    let _ = writeln!(out, "{}", line("├", "┼", "┤"));
    for r in docked.iter().take(limit) {
        let _ = writeln!(
            out,
            "{INDENT}│ {:<id_w$} │ {:>dg_w$.2} │ {:>kd_w$} │ {:>mut_w$} │",
            truncate(&r.id, id_w),
            r.mean_delta_g,
            molar(r.mean_kd),
            r.mutation_count,
        );
    }
    let _ = writeln!(out, "{}", line("└", "┴", "┘"));
}
