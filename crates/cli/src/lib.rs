//! rag CLI -- generate scenarios and detect deadlocks in them.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::{fs, io};

use clap::{Parser, Subcommand, ValueEnum};
use rag_core::{Scenario, Strategy};
use rag_parser::ParseError;
use rag_testgen::generator::GeneratedScenario;

#[derive(Debug, Parser)]
#[command(
    name = "rag",
    about = "Deadlock detection by resource-allocation-graph reduction"
)]
pub struct App {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate random scenarios that satisfy unit conservation
    Generate(GenerateArgs),
    /// Detect deadlocked processes in scenario files
    Detect(DetectArgs),
    /// Rewrite text scenario (.txt) files in canonical form
    Fmt(FmtArgs),
    /// Print the JSON Schema for the scenario input format to stdout
    Schema,
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Number of scenarios to generate
    #[arg(long)]
    pub n_scenario: u64,
    /// Upper bound on the number of processes
    #[arg(long, default_value_t = 10)]
    pub max_processes: usize,
    /// Upper bound on the number of resource classes
    #[arg(long, default_value_t = 10)]
    pub max_resources: usize,
    /// Upper bound on the units of a resource class
    #[arg(long, default_value_t = 20)]
    pub max_units: u64,
    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
    /// File format of the generated scenarios
    #[arg(long, value_enum, default_value_t = InputFormat::Text)]
    pub format: InputFormat,
    /// Output directory for generated scenario files
    #[arg(long)]
    pub output_dir: PathBuf,
}

#[derive(Debug, Parser)]
pub struct DetectArgs {
    /// Scenario files, or directories containing .txt and .json scenarios
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
    /// How to search for the next reducible process
    #[arg(long, value_enum, default_value_t = StrategyArg::Rescan)]
    pub strategy: StrategyArg,
    /// Print the tables before and after detection and every reduction
    #[arg(long)]
    pub verbose: bool,
    /// Output results as JSON (one object per file)
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct FmtArgs {
    /// Input files or directories to format
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
    /// Check formatting without modifying files (exit 1 if unformatted)
    #[arg(long)]
    pub check: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Rescan,
    ReadyQueue,
}

impl From<StrategyArg> for Strategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Rescan => Self::Rescan,
            StrategyArg::ReadyQueue => Self::ReadyQueue,
        }
    }
}

/// On-disk scenario formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Comma-separated text (`.txt`)
    Text,
    /// JSON (`.json`), either a bare scenario or a generated one
    Json,
}

impl InputFormat {
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

/// Why a scenario file could not be turned into a [`Scenario`].
#[derive(Debug)]
pub enum InputError {
    Io(io::Error),
    UnknownFormat(PathBuf),
    Parse(ParseError),
    Json(serde_json::Error),
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{e}"),
            Self::UnknownFormat(path) => write!(
                f,
                "cannot tell the format of {} (expected .txt or .json)",
                path.display()
            ),
            Self::Parse(e) => write!(f, "{e}"),
            Self::Json(e) => write!(f, "invalid scenario JSON: {e}"),
        }
    }
}

impl std::error::Error for InputError {}

impl From<io::Error> for InputError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseError> for InputError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

/// Parse `content` in the given format.
///
/// JSON input may be a bare [`Scenario`] or a [`GeneratedScenario`] as
/// written by `rag generate --format json`.
///
/// # Errors
///
/// Returns [`InputError::Parse`] or [`InputError::Json`] for malformed input.
pub fn parse_input(format: InputFormat, content: &str) -> Result<Scenario, InputError> {
    match format {
        InputFormat::Text => Ok(rag_parser::parse_scenario(content)?),
        InputFormat::Json => serde_json::from_str::<Scenario>(content).or_else(|bare| {
            serde_json::from_str::<GeneratedScenario>(content)
                .map(GeneratedScenario::into_data)
                .map_err(|_| InputError::Json(bare))
        }),
    }
}

/// Read and parse one scenario file, picking the format by extension.
///
/// # Errors
///
/// Returns [`InputError`] if the file cannot be read, has an unknown
/// extension, or is malformed.
pub fn read_scenario(path: &Path) -> Result<Scenario, InputError> {
    let format =
        InputFormat::from_path(path).ok_or_else(|| InputError::UnknownFormat(path.to_owned()))?;
    tracing::debug!(path = %path.display(), ?format, "reading scenario");
    let content = fs::read_to_string(path)?;
    parse_input(format, &content)
}

/// Expand `paths` into scenario files.
///
/// Files are kept as given. Directories contribute their `.txt` and `.json`
/// entries (not recursively), sorted by path.
///
/// # Errors
///
/// Returns the I/O error of the first path that cannot be inspected.
pub fn collect_inputs(paths: &[PathBuf], formats: &[InputFormat]) -> io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(path)?
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|entry| {
                    entry.is_file()
                        && InputFormat::from_path(entry).is_some_and(|f| formats.contains(&f))
                })
                .collect();
            entries.sort();
            inputs.extend(entries);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}
