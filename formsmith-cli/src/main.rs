//! formsmith command-line tools
//!
//! Usage:
//!   formsmith check form.json
//!   formsmith normalize legacy.json --output form.json
//!   formsmith preview form.json --value task_completed_ab12cd=No
//!   formsmith list forms/

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use formsmith_builder::BuilderConfig;
use formsmith_cli::{list_forms, normalize, parse_value, CheckReport, Preview};
use formsmith_codec::{deserialize, SchemaDoc};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "formsmith")]
#[command(about = "Inspect, normalize and preview formsmith schema files")]
struct Args {
    /// Builder config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a schema file and report dangling references
    Check { file: PathBuf },

    /// Rewrite a schema with ids filled in and widths re-derived
    Normalize {
        file: PathBuf,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which fields a renderer would display for the given answers
    Preview {
        file: PathBuf,
        /// Submission value as name=value; repeatable
        #[arg(long = "value", value_parser = parse_value)]
        values: Vec<(String, String)>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the forms stored in a directory
    List { root: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match &args.config {
        Some(path) => BuilderConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => BuilderConfig::default(),
    };
    debug!("Using config: {:?}", config);

    match args.command {
        Command::Check { file } => {
            let schema = read_schema(&file)?;
            let document = deserialize(&schema).context("Schema could not be loaded")?;
            let report = CheckReport::build(&document, &config);
            print!("{report}");
            if !report.is_ok() {
                bail!("{} failed validation", file.display());
            }
        }
        Command::Normalize { file, output } => {
            let schema = read_schema(&file)?;
            let document = deserialize(&schema).context("Schema could not be loaded")?;
            let json = serde_json::to_string_pretty(&normalize(&document))?;
            match output {
                Some(path) => {
                    fs::write(&path, json + "\n")
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Command::Preview { file, values, json } => {
            let schema = read_schema(&file)?;
            let values: BTreeMap<_, _> = values.into_iter().collect();
            let preview = Preview::build(&schema, &values);
            if json {
                println!("{}", serde_json::to_string_pretty(&preview)?);
            } else {
                println!("visible: {}", preview.visible.join(", "));
                println!("hidden: {}", preview.hidden.join(", "));
                println!("missing required: {}", preview.missing_required.join(", "));
                if preview.task_items > 0 {
                    println!("task items: {}", preview.task_items);
                }
            }
        }
        Command::List { root } => {
            let forms = list_forms(&root)
                .await
                .with_context(|| format!("Failed to list {}", root.display()))?;
            for form in forms {
                println!(
                    "{}  {:?}  {:?}  {} fields",
                    form.id, form.name, form.purpose, form.field_count
                );
            }
        }
    }
    Ok(())
}

fn read_schema(path: &Path) -> Result<SchemaDoc> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    SchemaDoc::from_json_str(&text).with_context(|| format!("{} is not a form schema", path.display()))
}
