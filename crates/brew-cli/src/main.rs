use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info};

use brew::{run, ExcType, RunError, StdInput, StdPrint};

/// Runs a Brew source file.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the Brew source file to run.
    file: PathBuf,

    /// Log verbosity.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    verbosity: LogLevel,
}

#[derive(ValueEnum, Clone, Default, Debug)]
enum LogLevel {
    #[default]
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    simple_logger::init_with_level((&cli.verbosity).into()).unwrap();

    let source = match read_file(&cli.file) {
        Ok(source) => source,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    info!("running {}", cli.file.display());

    let mut print = StdPrint;
    let mut input = StdInput;
    match run(&source, &mut print, &mut input) {
        Ok(value) => {
            info!("main() returned {value:?}");
            ExitCode::SUCCESS
        }
        Err(RunError::Parse(err)) => {
            error!("{err}");
            ExitCode::FAILURE
        }
        Err(RunError::Runtime(err)) => {
            error!("{err}");
            match err.kind() {
                ExcType::NameError => ExitCode::from(2),
                ExcType::TypeError => ExitCode::from(3),
            }
        }
    }
}

fn read_file(path: &PathBuf) -> Result<String, String> {
    let metadata = fs::metadata(path).map_err(|err| format!("reading {}: {err}", path.display()))?;
    if !metadata.is_file() {
        return Err(format!("{} is not a file", path.display()));
    }
    fs::read_to_string(path).map_err(|err| format!("reading {}: {err}", path.display()))
}
