use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use store_catalog::Diagnostics;
use store_catalog::NameCollisionPolicy;
use store_catalog::PipelineConfig;
use store_catalog::Session;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Renamed rows shown after each run.
const PREVIEW_ROWS: usize = 10;

#[derive(Parser, Debug)]
#[command(
    name = "store-catalog",
    version,
    about = "Split a retail catalog workbook into one CSV file per store"
)]
struct Cli {
    /// Workbooks to process (.xlsx, .xlsm)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory receiving `<stem>_stores.zip`
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// How names colliding within a store are made distinct: none, space-pad, accent
    #[arg(long, default_value = "accent")]
    policy: NameCollisionPolicy,

    /// Fail on error cells (#N/A, #REF!...) instead of reading them as empty
    #[arg(long, default_value_t = false)]
    strict_errors: bool,

    /// Seconds a parsed workbook stays cached; unlimited when omitted
    #[arg(long)]
    cache_ttl: Option<u64>,

    /// Print diagnostics as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    input: &'a Path,
    archive: Option<PathBuf>,
    #[serde(flatten)]
    diagnostics: &'a Diagnostics,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn archive_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog".to_owned());
    output_dir.join(format!("{}_stores.zip", stem))
}

fn process(session: &mut Session, cli: &Cli, input: &Path) -> Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let outcome = session
        .process(&bytes)
        .with_context(|| format!("failed to process {}", input.display()))?;

    let archive = match &outcome.archive {
        Some(archive) => {
            let path = archive_path(&cli.output_dir, input);
            std::fs::write(&path, &archive.bytes).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), stores = archive.entries.len(), "wrote archive");
            Some(path)
        }
        None => None,
    };

    let diagnostics = &outcome.diagnostics;
    if cli.json {
        let report = Report {
            input,
            archive,
            diagnostics,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", input.display());
    println!("  total rows:           {}", diagnostics.total_rows);
    println!("  duplicates removed:   {}", diagnostics.duplicates_removed);
    println!("  rejected incomplete:  {}", diagnostics.rejected_incomplete);
    println!("  final rows:           {}", diagnostics.rows_final);
    match archive {
        Some(path) => println!("  archive:              {}", path.display()),
        None => println!("  no valid rows, no archive written"),
    }
    if !diagnostics.renamed.is_empty() {
        println!("  renamed ({} total):", diagnostics.renamed.len());
        for row in diagnostics.renamed.iter().take(PREVIEW_ROWS) {
            println!(
                "    store {} / {}: {:?} (occurrence {})",
                row.store_id, row.external_id, row.name_english, row.occurrence
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = PipelineConfig {
        policy: cli.policy,
        error_as_null: !cli.strict_errors,
    };
    let mut session = Session::new(config, cli.cache_ttl.map(Duration::from_secs));

    let mut failed = false;
    for input in &cli.inputs {
        if let Err(e) = process(&mut session, &cli, input) {
            eprintln!("error: {:#}", e);
            failed = true;
        }
    }
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
