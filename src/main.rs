//! sectree: rebuild the section tree of a flat heading-marked text.
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, ValueEnum};
use sectree::config::Config;
use sectree::outline::Outline;
use sectree::sources::FileSource;
use sectree::{render, serialize, ParsedDocument, Result, SectionParser};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sectree")]
#[command(about = "Rebuild a document's section tree from flat heading-marked text", long_about = None)]
struct Args {
    /// Flat text with heading-marked lines
    #[arg(value_name = "TEXT")]
    text: PathBuf,

    /// Bookmark outline as `level;title;...` lines
    #[arg(long, value_name = "PATH")]
    toc: Option<PathBuf>,

    /// Converter metadata JSON with heading polygons
    #[arg(long, value_name = "PATH")]
    meta: Option<PathBuf>,

    /// Write the nested JSON document here
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Write the flat text document here
    #[arg(long = "text", value_name = "PATH")]
    text_out: Option<PathBuf>,

    /// Write the extracted outline as TOC lines here
    #[arg(long, value_name = "PATH")]
    toc_out: Option<PathBuf>,

    /// What to print on stdout
    #[arg(long, value_enum, default_value_t = Print::Tree)]
    print: Print,

    /// Configuration file (defaults to sectree.toml in the working directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Heading match mode, overriding the configuration
    #[arg(long, value_name = "MODE")]
    match_mode: Option<String>,

    /// Report unreadable --toc/--meta files instead of falling back
    #[arg(long)]
    strict: bool,

    /// Log pipeline decisions at debug level
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Print {
    /// Nested JSON document
    Json,
    /// Flat text document
    Text,
    /// Box-drawing heading tree
    Tree,
    /// Outline entries by level
    Toc,
    /// Nothing
    None,
}

fn main() -> ExitCode {
    let args = Args::parse();
    configure_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "sectree failed");
            eprintln!("sectree: {e}");
            ExitCode::FAILURE
        }
    }
}

fn configure_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let mut cfg = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    // Override config with command line args
    if let Some(mode) = &args.match_mode {
        cfg.match_mode.clone_from(mode);
    }
    if args.strict {
        cfg.strict_source = true;
    }

    let parser = SectionParser::from_config(&cfg)?;
    let source = FileSource::new(args.toc.clone(), args.meta.clone());
    let document = parser.parse_file(&args.text, &source)?;

    if let Some(path) = &args.json {
        serialize::write_json(&document.tree, create(path)?, true)?;
    }
    if let Some(path) = &args.text_out {
        serialize::write_flat_text(&document.tree, create(path)?)?;
    }
    if let Some(path) = &args.toc_out {
        write_toc(&document.outline, path)?;
    }

    print(&document, args.print)
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

fn write_toc(outline: &Outline, path: &Path) -> Result<()> {
    outline.write_toc(create(path)?)
}

fn print(document: &ParsedDocument, what: Print) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match what {
        Print::Json => serialize::write_json(&document.tree, &mut out, true)?,
        Print::Text => serialize::write_flat_text(&document.tree, &mut out)?,
        Print::Tree => out.write_all(render::render_tree(&document.tree).as_bytes())?,
        Print::Toc => out.write_all(render::render_outline(&document.outline).as_bytes())?,
        Print::None => {}
    }
    out.flush()?;
    Ok(())
}
