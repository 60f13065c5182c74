//! CLI argument parsing.
//!
//! Hand-rolled so the parser can be driven from any iterator in tests.

use std::path::PathBuf;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
    /// Number of `-v` flags seen anywhere on the line.
    pub verbosity: u8,
}

/// Where an operand matrix comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixSource {
    /// `ROWSxCOLS`: filled with seeded random values.
    Random {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },
    /// Path to a matrix text file.
    File(PathBuf),
}

impl MatrixSource {
    /// `ROWSxCOLS` becomes [`MatrixSource::Random`], anything else a file path.
    ///
    /// # Errors
    ///
    /// Returns a message if the argument looks like `ROWSxCOLS` but a
    /// dimension is zero.
    pub fn parse(arg: &str) -> Result<Self, String> {
        let dims = arg
            .split_once(|c| c == 'x' || c == 'X')
            .and_then(|(r, c)| Some((r.parse::<usize>().ok()?, c.parse::<usize>().ok()?)));
        match dims {
            Some((rows, cols)) if rows == 0 || cols == 0 => {
                Err(format!("matrix size '{arg}' must have positive dimensions"))
            }
            Some((rows, cols)) => Ok(Self::Random { rows, cols }),
            None => Ok(Self::File(PathBuf::from(arg))),
        }
    }
}

/// Options shared by both run commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Seed override.
    pub seed: Option<u64>,
    /// YAML configuration file.
    pub config: Option<PathBuf>,
    /// Emit a JSON report instead of text.
    pub json: bool,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Time the three Winograd strategies on one operand pair.
    Winograd {
        /// Left operand.
        left: MatrixSource,
        /// Right operand.
        right: MatrixSource,
        /// Data-parallel worker count override.
        workers: Option<usize>,
        /// Timed runs per strategy override.
        repeats: Option<usize>,
        /// Shared options.
        options: RunOptions,
    },
    /// Solve a tour sequentially and in parallel.
    Ant {
        /// Adjacency matrix file.
        graph: PathBuf,
        /// Iteration count override.
        iterations: Option<usize>,
        /// Parallel worker count override.
        workers: Option<usize>,
        /// Ants per iteration override.
        ants: Option<usize>,
        /// Shared options.
        options: RunOptions,
    },
    /// Arguments could not be parsed.
    Usage(String),
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// This method is testable as it accepts any iterator of strings,
    /// not just `std::env::args()`.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut verbosity = 0_u8;
        let args: Vec<String> = args
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .filter(|arg| match arg.as_str() {
                "--verbose" => {
                    verbosity = verbosity.saturating_add(1);
                    false
                }
                flag if flag.len() > 1
                    && flag.starts_with('-')
                    && flag[1..].chars().all(|c| c == 'v') =>
                {
                    let count = u8::try_from(flag.len() - 1).unwrap_or(u8::MAX);
                    verbosity = verbosity.saturating_add(count);
                    false
                }
                _ => true,
            })
            .collect();

        Self {
            command: Self::parse_command(&args),
            verbosity,
        }
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_command(args: &[String]) -> Command {
        if args.len() < 2 {
            return Command::Help;
        }

        let parsed = match args[1].as_str() {
            "winograd" | "wino" => Self::parse_winograd_command(args),
            "ant" | "aco" => Self::parse_ant_command(args),
            "-h" | "--help" | "help" => Ok(Command::Help),
            "-V" | "--version" | "version" => Ok(Command::Version),
            unknown => Err(format!("unknown command '{unknown}'")),
        };

        parsed.unwrap_or_else(Command::Usage)
    }

    /// Parse the 'winograd' command arguments.
    fn parse_winograd_command(args: &[String]) -> Result<Command, String> {
        if args.len() < 4 {
            return Err("'winograd' requires two matrices (ROWSxCOLS or file)".to_string());
        }
        let left = MatrixSource::parse(&args[2])?;
        let right = MatrixSource::parse(&args[3])?;

        let mut workers = None;
        let mut repeats = None;
        let mut options = RunOptions::default();

        let mut rest = args[4..].iter();
        while let Some(flag) = rest.next() {
            match flag.as_str() {
                "--workers" | "-w" => workers = Some(positive(flag, rest.next())?),
                "--repeats" | "-r" => repeats = Some(positive(flag, rest.next())?),
                other => parse_shared(other, &mut rest, &mut options)?,
            }
        }

        Ok(Command::Winograd {
            left,
            right,
            workers,
            repeats,
            options,
        })
    }

    /// Parse the 'ant' command arguments.
    fn parse_ant_command(args: &[String]) -> Result<Command, String> {
        if args.len() < 3 {
            return Err("'ant' requires a graph file".to_string());
        }
        let graph = PathBuf::from(&args[2]);

        let mut iterations = None;
        let mut workers = None;
        let mut ants = None;
        let mut options = RunOptions::default();

        let mut rest = args[3..].iter();
        while let Some(flag) = rest.next() {
            match flag.as_str() {
                "--iterations" | "-n" => iterations = Some(positive(flag, rest.next())?),
                "--workers" | "-w" => workers = Some(positive(flag, rest.next())?),
                "--ants" => ants = Some(positive(flag, rest.next())?),
                other => parse_shared(other, &mut rest, &mut options)?,
            }
        }

        Ok(Command::Ant {
            graph,
            iterations,
            workers,
            ants,
            options,
        })
    }
}

fn parse_shared<'a>(
    flag: &str,
    rest: &mut impl Iterator<Item = &'a String>,
    options: &mut RunOptions,
) -> Result<(), String> {
    match flag {
        "--seed" => {
            let value = rest.next().ok_or("--seed requires a value")?;
            let seed = value
                .parse()
                .map_err(|_| format!("--seed expects an unsigned integer, got '{value}'"))?;
            options.seed = Some(seed);
        }
        "--config" | "-c" => {
            let value = rest.next().ok_or("--config requires a path")?;
            options.config = Some(PathBuf::from(value));
        }
        "--json" => options.json = true,
        other => return Err(format!("unexpected argument '{other}'")),
    }
    Ok(())
}

fn positive(flag: &str, value: Option<&String>) -> Result<usize, String> {
    let value = value.ok_or_else(|| format!("{flag} requires a value"))?;
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{flag} expects a positive integer, got '{value}'")),
    }
}
