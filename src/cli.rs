use std::path::PathBuf;

use clap::Parser;

use crate::adapters::outbound::formatters::{
    PoetryFormatter, RequirementsFormatter, UvFormatter,
};
use crate::ports::outbound::ManifestFormatter;
use crate::pruning::domain::SourceFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Uv,
    Poetry,
    Requirements,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uv" => Ok(OutputFormat::Uv),
            "poetry" => Ok(OutputFormat::Poetry),
            "requirements" | "reqs" | "requirements.txt" => Ok(OutputFormat::Requirements),
            _ => Err(format!(
                "Invalid format: {}. Please specify 'uv', 'poetry', or 'requirements'",
                s
            )),
        }
    }
}

impl From<SourceFormat> for OutputFormat {
    fn from(format: SourceFormat) -> Self {
        match format {
            SourceFormat::Uv => OutputFormat::Uv,
            SourceFormat::Poetry => OutputFormat::Poetry,
            SourceFormat::Requirements => OutputFormat::Requirements,
        }
    }
}

impl OutputFormat {
    /// Creates a formatter instance for the specified output format
    pub fn create_formatter(&self) -> Box<dyn ManifestFormatter> {
        match self {
            OutputFormat::Uv => Box::new(UvFormatter::new()),
            OutputFormat::Poetry => Box::new(PoetryFormatter::new()),
            OutputFormat::Requirements => Box::new(RequirementsFormatter::new()),
        }
    }
}

/// Prune unused dependencies from Python dependency manifests
#[derive(Parser, Debug)]
#[command(name = "uv-prune")]
#[command(version)]
#[command(about = "Resolve, prune, and re-serialize Python dependency manifests", long_about = None)]
pub struct Args {
    /// Path to the dependency manifest (requirements.txt or pyproject.toml)
    pub file: PathBuf,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: uv, poetry, or requirements (defaults to the input format)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Python version constraint driving resolution (required for requirements.txt inputs)
    #[arg(short = 'p', long = "python-version")]
    pub python_version: Option<String>,

    /// Produce richer logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Allow overwriting existing output files
    #[arg(long)]
    pub force: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
