use std::path::Path;
use std::process;
use std::str::FromStr;

use uv_prune::adapters::outbound::console::StderrProgressReporter;
use uv_prune::adapters::outbound::filesystem::{
    FileSystemManifestReader, FileSystemWriter, StdoutPresenter,
};
use uv_prune::adapters::outbound::process::UvLockResolver;
use uv_prune::application::config::PruneConfig;
use uv_prune::application::dto::PruneRequest;
use uv_prune::application::use_cases::PruneDependenciesUseCase;
use uv_prune::cli::{Args, OutputFormat};
use uv_prune::ports::outbound::OutputPresenter;
use uv_prune::shared::error::{ExitCode, PruneError};
use uv_prune::shared::Result;

fn main() {
    let args = Args::parse_args();

    if let Err(e) = run(args) {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        // Display error chain
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("\nCaused by: {}", err);
            source = err.source();
        }

        eprintln!();
        process::exit(ExitCode::ApplicationError.as_i32());
    }
}

fn run(args: Args) -> Result<()> {
    validate_manifest_path(&args.file)?;

    // Fail fast on a non-overwritable output before spending a resolver run.
    if let Some(output) = &args.output {
        if output.exists() && !args.force {
            return Err(PruneError::OutputExists {
                path: output.clone(),
            }
            .into());
        }
    }

    let progress_reporter = StderrProgressReporter::new(args.verbose);
    let use_case = PruneDependenciesUseCase::new(
        FileSystemManifestReader::new(),
        UvLockResolver::new(),
        progress_reporter,
    );

    let request = PruneRequest::new(args.file.clone(), args.python_version.clone());
    let response = use_case.execute(request)?;
    let project = &response.project;

    let format = match args.format {
        Some(format) => format,
        None => match PruneConfig::from_project(project).format {
            Some(name) => OutputFormat::from_str(&name)
                .map_err(|e| PruneError::parse(format!("Invalid [tool.uv-prune] format: {e}")))?,
            None => OutputFormat::from(project.source_format),
        },
    };

    let formatter = format.create_formatter();
    let formatted_output = formatter.format(project)?;

    let presenter: Box<dyn OutputPresenter> = match &args.output {
        Some(output_path) => Box::new(FileSystemWriter::new(output_path.clone(), args.force)),
        None => Box::new(StdoutPresenter::new()),
    };

    presenter.present(&formatted_output)?;
    Ok(())
}

fn validate_manifest_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(PruneError::ManifestNotFound {
            path: path.to_path_buf(),
            suggestion: format!(
                "The manifest \"{}\" does not exist.\n   \
                 Point uv-prune at a requirements.txt or pyproject.toml file.",
                path.display()
            ),
        }
        .into());
    }

    if path.is_dir() {
        return Err(PruneError::ManifestNotFound {
            path: path.to_path_buf(),
            suggestion: "The given path is a directory; pass the manifest file itself.".to_string(),
        }
        .into());
    }

    Ok(())
}
