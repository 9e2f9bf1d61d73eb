//! Scenarist - render scenario markup to text, HTML, or project JSON.
//!
//! # Usage
//!
//! ```bash
//! scenarist scenario.txt
//! scenarist --format json project.json -o save.json
//! scenarist --toc --pages scenario.txt
//! ```

use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use scenarist::config::{
    ConfigFlags, ExportFormat, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use scenarist::data::reconcile;
use scenarist::document::Document;
use scenarist::export::{export_html, export_json, export_text, export_text_resolved};
use scenarist::layout::{TextMeasure, paginate};
use scenarist::project::Project;
use scenarist::render::{render_document, toc};

/// Default column capacity in rows, roughly an A4 column at 10pt.
const DEFAULT_CAPACITY: u32 = 60;

/// Column width in display cells for the text measurer.
const COLUMN_WIDTH: usize = 42;

/// Render scenario markup to text, HTML, or project JSON
#[derive(Parser, Debug)]
#[command(name = "scenarist", version, about, long_about = None)]
struct Cli {
    /// Scenario text file or project JSON to render
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "html")]
    format: ExportFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Expand {{KEY}} references in text output
    #[arg(long)]
    resolve: bool,

    /// Print the table of contents to stderr
    #[arg(long)]
    toc: bool,

    /// Print a pagination summary to stderr
    #[arg(long)]
    pages: bool,

    /// Column capacity in rows for the pagination summary
    #[arg(long, value_name = "ROWS")]
    capacity: Option<u32>,

    /// Extra data-card JSON file merged into the project's store
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Save current command-line flags as defaults in .scenaristrc
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in .scenaristrc
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }
    let content = fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let mut project = Project::from_file_content(&cli.file, content);

    if let Some(data_path) = &cli.data {
        let data_json = fs::read_to_string(data_path)
            .with_context(|| format!("Failed to read data file {}", data_path.display()))?;
        let extra = serde_json::from_str(&data_json)
            .with_context(|| format!("Invalid data file {}", data_path.display()))?;
        project.data.merge(&extra);
    }

    let format = effective.format.unwrap_or(ExportFormat::Html);
    let output = match format {
        ExportFormat::Text => {
            if effective.resolve {
                export_text_resolved(&project)
            } else {
                export_text(&project)
            }
        }
        ExportFormat::Html => export_html(&project),
        ExportFormat::Json => export_json(&project)?,
    };

    match &cli.output {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes()).context("stdout")?;
            if !output.ends_with('\n') {
                writeln!(stdout).context("stdout")?;
            }
        }
    }

    let doc = Document::parse(&project.text);

    if effective.toc {
        for (anchor, title) in toc(&doc) {
            eprintln!("{anchor}  {title}");
        }
    }

    if effective.pages {
        let mut store = project.data.clone();
        reconcile(doc.blocks(), &mut store);
        let nodes = render_document(&doc, &store);
        let capacity = effective.capacity.unwrap_or(DEFAULT_CAPACITY);
        let pages = paginate(nodes, &TextMeasure::new(COLUMN_WIDTH), capacity);
        for (number, page) in pages.iter().enumerate() {
            eprintln!(
                "page {}: left {}/{capacity} rows, right {}/{capacity} rows",
                number + 1,
                page.left.used(),
                page.right.used(),
            );
        }
    }

    Ok(())
}
