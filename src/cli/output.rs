//! CLI output formatting.

use serde::Serialize;

use super::commands::{ColonyReport, WinogradReport};
use crate::error::ParResult;

/// Print version information.
pub fn print_version() {
    match option_env!("PARALLELS_GIT_HASH") {
        Some(hash) => println!("parallels {} ({hash})", env!("CARGO_PKG_VERSION")),
        None => println!("parallels {}", env!("CARGO_PKG_VERSION")),
    }
}

/// Print help message.
pub fn print_help() {
    println!(
        r"parallels - sequential vs. multi-threaded Winograd and ant colony runs

USAGE:
    parallels <COMMAND> [OPTIONS]

COMMANDS:
    winograd <A> <B>            Time the three Winograd strategies
        <A>, <B>                ROWSxCOLS for a random matrix, or a matrix file
        -w, --workers <N>       Data-parallel worker count (default: 4)
        -r, --repeats <N>       Timed runs per strategy (default: 1)

    ant <graph-file>            Solve a round-trip tour sequentially and in parallel
        -n, --iterations <N>    Colony iterations (default: 10)
        -w, --workers <N>       Parallel worker count (default: 4)
        --ants <N>              Ants per iteration (default: 6000)

    help                        Show this help message
    version                     Show version information

COMMON OPTIONS:
    --seed <N>                  Master seed (default: 42)
    -c, --config <file.yaml>    Load settings from a YAML config
    --json                      Print a JSON report
    -v, -vv, -vvv               Log at info / debug / trace (stderr)

MATRIX FILES:
    First non-empty line: 'rows cols', then one line per row.
    '#' starts a comment. In graph files 0 means 'no edge'.

EXAMPLES:
    parallels winograd 300x200 200x400 --workers 8 --repeats 5
    parallels ant graphs/cities.txt --iterations 20 --workers 4
"
    );
}

/// Print any report as pretty JSON.
///
/// # Errors
///
/// Returns `Json` if serialization fails.
pub fn print_json<T: Serialize>(report: &T) -> ParResult<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Render a Winograd report as text.
#[must_use]
pub fn format_winograd_report(report: &WinogradReport) -> String {
    let mut out = format!(
        "Winograd {}x{} * {}x{} (workers: {}, repeats: {})\n",
        report.left.0,
        report.left.1,
        report.right.0,
        report.right.1,
        report.workers,
        report.repeats
    );
    for timing in &report.timings {
        out.push_str(&format!(
            "  {:<14} total {:>10.3} ms   mean {:>10.3} ms\n",
            timing.strategy, timing.total_ms, timing.mean_ms
        ));
    }
    if report.agree {
        out.push_str(&format!(
            "✓ strategies agree (max difference {:.3e})\n",
            report.max_difference
        ));
    } else {
        out.push_str(&format!(
            "✗ strategies disagree (max difference {:.3e})\n",
            report.max_difference
        ));
    }
    out
}

/// Print a Winograd report.
pub fn print_winograd_report(report: &WinogradReport) {
    print!("{}", format_winograd_report(report));
}

/// Render a colony report as text; tours use 1-based node labels.
#[must_use]
pub fn format_colony_report(report: &ColonyReport) -> String {
    let mut out = format!(
        "Ant colony: {} nodes, {} iterations, {} ants per iteration\n",
        report.nodes, report.iterations, report.ants
    );
    for run in &report.runs {
        let tour: Vec<String> = run.tour.iter().map(ToString::to_string).collect();
        out.push_str(&format!(
            "  {:<10} workers {:>3}   {:>10.3} ms   distance {:.6}\n    tour: {}\n",
            run.strategy,
            run.workers,
            run.elapsed_ms,
            run.distance,
            tour.join(" ")
        ));
    }
    out
}

/// Print a colony report.
pub fn print_colony_report(report: &ColonyReport) {
    print!("{}", format_colony_report(report));
}
