//! Metadex CLI - Command-line interface
//!
//! Commands:
//!   publish   - Assemble documents from a catalog snapshot
//!   validate  - Parse a snapshot and summarize its contents
//!   schema    - Print JSON schema for the snapshot or config format

use metadex::*;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "publish" => cmd_publish(&args[2..]),
        "validate" => cmd_validate(&args[2..]),
        "schema" => cmd_schema(&args[2..]),
        "version" | "--version" | "-v" => {
            println!("metadex {}", VERSION);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        unknown => Err(format!("Unknown command: {}. Try 'metadex help'.", unknown).into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!(
        r#"
Metadex - dictionary metadata to search-index documents

USAGE:
    metadex <COMMAND> [OPTIONS]

COMMANDS:
    publish <snapshot.json>          Assemble documents from a snapshot
    validate <snapshot.json>         Parse a snapshot and summarize it
    schema [snapshot|config]         Print JSON schema for an input format
    version                          Print version
    help                             Print this help

OPTIONS:
    --config <metadex.yaml>          Publisher configuration file
    --channel <window|browser>       Publish a single channel only
    --output <dir>                   Write one JSON file per document
                                      (default: NDJSON on stdout)
    --pretty                         Pretty-print emitted JSON

EXAMPLES:
    metadex publish dictionary.json
    metadex publish dictionary.json --channel window --pretty
    metadex publish dictionary.json --config metadex.yaml --output out/
    metadex validate dictionary.json
    metadex schema config
"#
    );
}

fn cmd_publish(args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err("Usage: metadex publish <snapshot.json> [--config <yaml>] [--channel <name>] [--output <dir>]".into());
    }

    let snapshot_path = &args[0];
    let snapshot = CatalogSnapshot::load(snapshot_path)?;
    let catalog = SnapshotCatalog::new(snapshot);

    let mut config = match parse_value_arg(args, "--config") {
        Some(path) => PublisherConfig::load(path)?,
        None => PublisherConfig::default(),
    };
    if let Some(channel) = parse_value_arg(args, "--channel") {
        match channel.as_str() {
            "window" => {
                config.channels.window = true;
                config.channels.browser = false;
            }
            "browser" => {
                config.channels.window = false;
                config.channels.browser = true;
            }
            other => return Err(format!("Unknown channel: {}", other).into()),
        }
    }
    if args.contains(&"--pretty".to_string()) {
        config.output.pretty = true;
    }

    let documents = publish(&catalog, &config)?;

    match parse_output_arg(args) {
        Some(dir) => {
            fs::create_dir_all(&dir).map_err(Error::Io)?;
            for document in &documents {
                let id = document
                    .body()
                    .get("document")
                    .and_then(|d| d.get("id"))
                    .and_then(|id| id.as_i64())
                    .unwrap_or_default();
                let path = dir.join(format!("{}_{}.json", document.index_value(), id));
                let body = document.to_value();
                let content = if config.output.pretty {
                    serde_json::to_string_pretty(&body)?
                } else {
                    serde_json::to_string(&body)?
                };
                fs::write(&path, content).map_err(Error::Io)?;
            }
            eprintln!("Written {} documents to: {}", documents.len(), dir.display());
        }
        None => {
            for document in &documents {
                let line = json!({
                    "channel": document.channel().as_str(),
                    "key": document.key(),
                    "index_value": document.index_value(),
                    "body": document.to_value(),
                });
                if config.output.pretty {
                    println!("{}", serde_json::to_string_pretty(&line)?);
                } else {
                    println!("{}", serde_json::to_string(&line)?);
                }
            }
        }
    }
    Ok(())
}

fn cmd_validate(args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err("Usage: metadex validate <snapshot.json>".into());
    }

    let snapshot = CatalogSnapshot::load(&args[0])?;
    if let Some(exported_at) = snapshot.exported_at {
        println!("exported_at:      {}", exported_at.to_rfc3339());
    }
    println!("windows:          {}", snapshot.windows.len());
    println!("browsers:         {}", snapshot.browsers.len());
    println!("tables:           {}", snapshot.tables.len());
    println!("processes:        {}", snapshot.processes.len());
    println!("forms:            {}", snapshot.forms.len());
    println!("workflows:        {}", snapshot.workflows.len());
    println!("lookups:          {}", snapshot.lookups.len());
    println!("validation_rules: {}", snapshot.validation_rules.len());
    Ok(())
}

fn cmd_schema(args: &[String]) -> Result<()> {
    let target = args.first().map(String::as_str).unwrap_or("snapshot");
    let schema = match target {
        "snapshot" => schemars::schema_for!(CatalogSnapshot),
        "config" => schemars::schema_for!(PublisherConfig),
        other => return Err(format!("Unknown schema: {}. Use 'snapshot' or 'config'.", other).into()),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn parse_value_arg(args: &[String], flag: &str) -> Option<String> {
    for (i, arg) in args.iter().enumerate() {
        if arg == flag {
            if let Some(value) = args.get(i + 1) {
                return Some(value.clone());
            }
        }
    }
    None
}

fn parse_output_arg(args: &[String]) -> Option<PathBuf> {
    for (i, arg) in args.iter().enumerate() {
        if arg == "--output" || arg == "-o" {
            if let Some(path) = args.get(i + 1) {
                return Some(PathBuf::from(path));
            }
        }
    }
    None
}
