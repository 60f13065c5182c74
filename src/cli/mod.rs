//! CLI module for parallels.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested. The
//! entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod input;
mod output;

pub use args::{Args, Command, MatrixSource, RunOptions};
pub use commands::{
    load_config, run_ant, run_cli, run_winograd, ColonyReport, ColonyRun, StrategyTiming,
    WinogradReport, AGREEMENT_TOLERANCE,
};
pub use input::{load_matrix, parse_matrix, RANDOM_RANGE};
pub use output::{
    format_colony_report, format_winograd_report, print_colony_report, print_help, print_json,
    print_version, print_winograd_report,
};
