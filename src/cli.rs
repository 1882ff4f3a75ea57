//! Command-line parsing for the `household-sim` binary.

use std::env;
use std::path::PathBuf;

use crate::config::{ConfigError, ScenarioConfig};

/// Default port of the API server.
#[cfg(feature = "api")]
pub const DEFAULT_PORT: u16 = 3000;

/// Parsed command-line options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    /// Overrides `[simulation].start_date`.
    pub start: Option<String>,
    /// Overrides `[simulation].end_date`.
    pub end: Option<String>,
    pub intervals_out: Option<PathBuf>,
    pub hourly_out: Option<PathBuf>,
    pub actions_out: Option<PathBuf>,
    pub series_out: Option<PathBuf>,
    pub help: bool,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: Option<u16>,
}

impl CliOptions {
    /// Loads the selected scenario and applies the command-line overrides.
    ///
    /// Falls back to the `demo` preset when neither `--scenario` nor
    /// `--preset` was given.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the preset is
    /// unknown. Field validation is left to [`ScenarioConfig::validate`].
    pub fn load_scenario(&self) -> Result<ScenarioConfig, ConfigError> {
        let mut cfg = match (&self.scenario, &self.preset) {
            (Some(path), _) => ScenarioConfig::from_file(path)?,
            (None, Some(name)) => ScenarioConfig::from_preset(name)?,
            (None, None) => ScenarioConfig::demo(),
        };
        if let Some(seed) = self.seed {
            cfg.simulation.seed = seed;
        }
        if let Some(start) = &self.start {
            cfg.simulation.start_date.clone_from(start);
        }
        if let Some(end) = &self.end {
            cfg.simulation.end_date.clone_from(end);
        }
        Ok(cfg)
    }

    #[cfg(feature = "api")]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

/// Parses the process arguments.
///
/// # Errors
///
/// Returns a message suitable for stderr on malformed input.
pub fn parse_args() -> Result<CliOptions, String> {
    parse_args_from(env::args().skip(1).collect())
}

/// Parses `args` (without the program name).
///
/// # Errors
///
/// Returns a message on unknown flags, missing or malformed values, repeated
/// flags, or when `--scenario` and `--preset` are both given.
pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                opts.help = true;
                return Ok(opts);
            }
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --scenario (expected a TOML or JSON file path)")?;
                set_once(&mut opts.scenario, PathBuf::from(path), "--scenario")?;
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                set_once(&mut opts.preset, name.to_string(), "--preset")?;
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let seed = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                set_once(&mut opts.seed, seed, "--seed")?;
            }
            "--start" => {
                i += 1;
                let date = args.next_or_err(i, "missing value for --start (expected YYYY-MM-DD)")?;
                set_once(&mut opts.start, date.to_string(), "--start")?;
            }
            "--end" => {
                i += 1;
                let date = args.next_or_err(i, "missing value for --end (expected YYYY-MM-DD)")?;
                set_once(&mut opts.end, date.to_string(), "--end")?;
            }
            "--intervals-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --intervals-out (expected a file path)")?;
                set_once(&mut opts.intervals_out, PathBuf::from(path), "--intervals-out")?;
            }
            "--hourly-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --hourly-out (expected a file path)")?;
                set_once(&mut opts.hourly_out, PathBuf::from(path), "--hourly-out")?;
            }
            "--actions-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --actions-out (expected a file path)")?;
                set_once(&mut opts.actions_out, PathBuf::from(path), "--actions-out")?;
            }
            "--series-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --series-out (expected a file path)")?;
                set_once(&mut opts.series_out, PathBuf::from(path), "--series-out")?;
            }
            #[cfg(feature = "api")]
            "--serve" => opts.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                let port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                set_once(&mut opts.port, port, "--port")?;
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.scenario.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    Ok(opts)
}

fn set_once<T>(slot: &mut Option<T>, value: T, flag: &str) -> Result<(), String> {
    if slot.replace(value).is_some() {
        return Err(format!("{flag} provided more than once"));
    }
    Ok(())
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("household-sim: agent-based household electricity and water simulator");
    eprintln!();
    eprintln!("Usage: household-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from a TOML or JSON file");
    eprintln!("  --preset <name>          Use a built-in preset ({})", ScenarioConfig::PRESETS.join(", "));
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --start <YYYY-MM-DD>     Override the first simulated day");
    eprintln!("  --end <YYYY-MM-DD>       Override the (exclusive) last day");
    eprintln!("  --intervals-out <path>   Export per-interval totals to CSV");
    eprintln!("  --hourly-out <path>      Export hourly totals to CSV");
    eprintln!("  --actions-out <path>     Export the action log to JSON");
    eprintln!("  --series-out <path>      Export intervals with device breakdown to JSON");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after simulation");
        eprintln!("  --port <u16>             API server port (default: {DEFAULT_PORT})");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the demo preset is used.");
}
