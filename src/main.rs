use clap::{Parser, ValueEnum};
use globset::{Glob, GlobSetBuilder};
use mdinclude::expand::{DEFAULT_EXTENSION, DEFAULT_FENCE_LANG, DEFAULT_ROOT};
use mdinclude::{DocumentReport, ExpandConfig, Result, list_markers, run_all};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LONG_HELP: &str = r#"
Marker:
  <!-- include: path/to/snippet.yml -->

  is replaced by a fenced block holding the file's contents:

  ```yaml
  <snippet contents>
  ```

  Paths are resolved against --base-dir (default: current directory).
  Markers pointing at missing files are left untouched.

Examples:
  # Expand every .md file under ./ReadMe
  mdinclude
  # Expand a different tree
  mdinclude docs
  # Show what would change without writing
  mdinclude docs --dry-run
  # Fail when any document still has expandable markers
  mdinclude docs --check
  # List markers as JSON
  mdinclude docs --list=json
  # Skip drafts
  mdinclude docs -x 'drafts/**'
"#;

/// Expand include markers in Markdown documents.
///
/// Copyright 2026 mdinclude contributors.
/// Licensed under the EUPL v1.2.
#[derive(Parser, Debug)]
#[command(
    name = "mdinclude",
    version,
    about = "Expand include markers in Markdown documents into fenced snippet blocks.",
    after_long_help = LONG_HELP
)]
struct Cli {
    /// Directory searched recursively for Markdown documents
    #[arg(value_name = "ROOT", default_value = DEFAULT_ROOT)]
    root: PathBuf,

    /// Base directory for resolving snippet paths
    #[arg(short, long, value_name = "DIR", env = "MDINCLUDE_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Language hint for generated code fences
    #[arg(short, long, value_name = "LANG", default_value = DEFAULT_FENCE_LANG)]
    lang: String,

    /// Document file extension
    #[arg(short, long, value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Exclude glob patterns (repeatable), relative to ROOT
    #[arg(short = 'x', long = "exclude", value_name = "GLOB", action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Report what would change without writing any document
    #[arg(long, conflicts_with_all = ["check", "list"])]
    dry_run: bool,

    /// Exit with status 1 if any document would change
    #[arg(long, conflicts_with = "list")]
    check: bool,

    /// List markers instead of expanding (optionally with format: plain, json)
    #[arg(long, value_name = "FORMAT", num_args = 0..=1, default_missing_value = "plain")]
    list: Option<ListFormat>,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum ListFormat {
    /// One marker per line
    Plain,
    /// JSON output for scripting
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let result = if let Some(format) = cli.list {
        list(&cli, &config, format)
    } else {
        expand_all(&cli, &config)
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_config(cli: &Cli) -> Result<ExpandConfig> {
    let mut config = ExpandConfig {
        fence_lang: cli.lang.clone(),
        extension: cli.extension.clone(),
        dry_run: cli.dry_run || cli.check,
        ..ExpandConfig::default()
    };

    if let Some(dir) = &cli.base_dir {
        config.base_dir = dir.clone();
    }

    if !cli.exclude.is_empty() {
        let mut builder = GlobSetBuilder::new();
        for pattern in &cli.exclude {
            builder.add(Glob::new(pattern)?);
        }
        config.exclude = Some(builder.build()?);
    }

    Ok(config)
}

/// Returns `Ok(false)` when `--check` finds stale documents.
fn expand_all(cli: &Cli, config: &ExpandConfig) -> Result<bool> {
    tracing::info!(root = %cli.root.display(), base_dir = %config.base_dir.display(), "expanding includes");

    let reports = run_all(&cli.root, config)?;
    for report in &reports {
        for path in &report.unresolved {
            tracing::warn!(
                document = %report.path.display(),
                "unresolved include: {path}"
            );
        }
    }

    let changed: Vec<&DocumentReport> = reports.iter().filter(|r| r.changed).collect();

    if cli.check {
        for report in &changed {
            eprintln!("{} is out of date", report.path.display());
        }
        return Ok(changed.is_empty());
    }

    if !cli.quiet {
        let verb = if cli.dry_run { "would expand" } else { "expanded" };
        for report in &changed {
            println!(
                "{verb} {} ({} include{})",
                report.path.display(),
                report.replaced,
                if report.replaced == 1 { "" } else { "s" }
            );
        }
        println!(
            "\nSummary: {} documents scanned, {} changed",
            reports.len(),
            changed.len()
        );
    }

    Ok(true)
}

fn list(cli: &Cli, config: &ExpandConfig, format: ListFormat) -> Result<bool> {
    tracing::debug!("listing include markers...");

    let listings = list_markers(&cli.root, config)?;

    match format {
        ListFormat::Plain => {
            for listing in &listings {
                println!(
                    "{}:{}  {}  [{}]",
                    listing.document.display(),
                    listing.start,
                    listing.path,
                    if listing.resolved { "ok" } else { "missing" }
                );
            }
        }
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(&listings)?;
            println!("{json}");
        }
    }

    Ok(true)
}
