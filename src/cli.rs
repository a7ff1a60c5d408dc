use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::config;
use crate::importers::asana_csv::AsanaCsvImporter;
use crate::importers::asana_mapper::StatusSource;
use crate::importers::Importer;
use crate::logging::{self, LogConfig};
use crate::model::import::ImportResult;
use crate::output;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportArgs {
    pub file: PathBuf,
    pub org_url: Option<String>,
    pub output: Option<PathBuf>,
    pub status_source: Option<StatusSource>,
    pub verbosity: u8,
}

/// Handle `work-import asana ...`: read the export, map it and write the document.
pub async fn handle_import(args: &[String]) -> Result<()> {
    let args = parse_import_args(args)?;
    let config = config::load_config()?;

    let log_config = LogConfig::resolve(args.verbosity, config.log_level(), config.log_format())?;
    logging::init_logging(&log_config)?;

    // CLI flags win over config.toml
    let org_url = args
        .org_url
        .clone()
        .or_else(|| config.org_url().map(String::from));
    let status_source = args.status_source.unwrap_or_else(|| config.status_source());
    let output_path = args
        .output
        .clone()
        .or_else(|| config.output_path().map(Path::to_path_buf));

    let importer = AsanaCsvImporter::new(&args.file, org_url).with_status_source(status_source);
    let result = run_import(&importer, output_path.as_deref()).await?;

    let summary = import_summary(&result, importer.name());
    match &output_path {
        Some(path) => println!("{summary}\n  {}", path.display()),
        None => eprintln!("{summary}"),
    }

    Ok(())
}

pub fn import_summary(result: &ImportResult, source: &str) -> String {
    format!("Imported {} from {source}", result.summary())
}

/// Run an importer and write its document to `output`, or stdout when unset.
pub async fn run_import(importer: &dyn Importer, output: Option<&Path>) -> Result<ImportResult> {
    tracing::info!(
        source = importer.name(),
        team = importer.default_team_name(),
        "starting import"
    );
    let result = importer
        .import()
        .await
        .with_context(|| format!("{} import failed", importer.name()))?;

    match output {
        Some(path) => output::write_to_file(&result, path)?,
        None => output::write_to(&result, std::io::stdout().lock())
            .context("Failed to write import document to stdout")?,
    }

    Ok(result)
}

/// Parse `work-import asana` arguments.
///
/// Supported forms:
///   work-import asana export.csv
///   work-import asana export.csv --org https://app.asana.com/0/123/
///   work-import asana export.csv -o linear.json --status-from completion -v
pub fn parse_import_args(args: &[String]) -> Result<ImportArgs> {
    if args.is_empty() {
        bail!("Usage: work-import asana <file.csv> [--org <url>] [-o <path>] [--status-from column|completion]\n\nExample:\n  work-import asana tasks.csv --org https://app.asana.com/0/1201234/");
    }

    let mut parsed = ImportArgs::default();
    let mut file: Option<PathBuf> = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            flag @ ("--org" | "-o" | "--out" | "--output" | "--status-from") => {
                i += 1;
                let Some(value) = args.get(i) else {
                    bail!("Missing value for {flag} flag");
                };
                match flag {
                    "--org" => parsed.org_url = Some(value.clone()),
                    "--status-from" => {
                        let Some(source) = StatusSource::parse(value) else {
                            bail!("Unknown status source '{value}' (expected column or completion)");
                        };
                        parsed.status_source = Some(source);
                    }
                    _ => parsed.output = Some(PathBuf::from(value)),
                }
            }
            "-v" | "--verbose" => parsed.verbosity = parsed.verbosity.saturating_add(1),
            "-vv" => parsed.verbosity = parsed.verbosity.saturating_add(2),
            other if other.starts_with('-') && other.len() > 1 => {
                bail!("Unknown flag: {other}");
            }
            other => {
                if file.is_some() {
                    bail!("Unexpected argument: {other}");
                }
                file = Some(PathBuf::from(other));
            }
        }
        i += 1;
    }

    let Some(file) = file else {
        bail!("Missing path to the Asana CSV export");
    };
    parsed.file = file;
    Ok(parsed)
}

pub fn print_help() {
    println!("work-import — convert tracker exports into an issue import document\n");
    println!("USAGE:");
    println!("  work-import asana <file.csv>  Convert an Asana CSV export");
    println!("  work-import help              Show this message");
    println!();
    println!("ASANA OPTIONS:");
    println!("  --org <url>                   Base project URL used for links back to Asana");
    println!("  -o, --out <path>              Write the document to a file instead of stdout");
    println!("  --status-from <source>        column (default) or completion");
    println!("  -v, --verbose                 More logging (-vv for trace)");
    println!();
    println!("CONFIG:");
    println!("  ~/.work-import/config.toml    [asana] org_url, status_source; [output] path; [log] level, format");
}
