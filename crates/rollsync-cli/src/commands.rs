use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::Value;

use rollsync_merge::{resolve, Document};
use rollsync_server::{RollsyncServer, ServerConfig};
use rollsync_store::{DataDir, DocumentName, DocumentStore, FsDocumentStore};
use rollsync_sync::SyncGateway;
use rollsync_types::DocumentKind;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Init(args) => cmd_init(args),
        Command::Serve(args) => cmd_serve(args),
        Command::Merge(args) => cmd_merge(args),
        Command::Show(args) => cmd_show(args),
        Command::List(args) => cmd_list(args, cli.format),
    }
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let dir = DataDir::init(&args.dir.data_dir)
        .with_context(|| format!("cannot initialize {}", args.dir.data_dir.display()))?;
    println!(
        "{} Initialized rollsync data directory in {}",
        "✓".green().bold(),
        dir.root().display().to_string().bold()
    );
    Ok(())
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    let server = RollsyncServer::open(config.clone()).with_context(|| {
        format!(
            "cannot open {} (run `rollsync init --data-dir {}` first)",
            config.data_dir.display(),
            config.data_dir.display()
        )
    })?;
    println!(
        "rollsync server on {} (data: {})",
        config.bind_addr.to_string().bold(),
        config.data_dir.display()
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_merge(args: MergeArgs) -> anyhow::Result<()> {
    let policy = args.kind.policy();
    tracing::debug!(kind = %args.kind, %policy, "merging document files");
    let local = Document::from_value(policy, read_json(&args.local)?);
    let remote = Document::from_value(policy, read_json(&args.remote)?);
    let merged = resolve(Some(&local), Some(&remote), policy);
    println!("{}", serde_json::to_string_pretty(&merged)?);
    Ok(())
}

fn cmd_show(args: ShowArgs) -> anyhow::Result<()> {
    let gateway = open_gateway(&args.dir.data_dir)?;
    let document = gateway.pull(&args.kind)?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn cmd_list(args: ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    let gateway = open_gateway(&args.dir.data_dir)?;
    let mut stored = Vec::new();
    for kind in DocumentKind::FLAT {
        if gateway.store().exists(&DocumentName::from(&kind))? {
            stored.push(kind);
        }
    }
    let months = gateway.list_months()?;

    match format {
        OutputFormat::Json => {
            let documents: Vec<String> = stored.iter().map(ToString::to_string).collect();
            let out = serde_json::json!({ "documents": documents, "months": months });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            for kind in &stored {
                println!("  {}", kind.to_string().cyan());
            }
            if months.is_empty() {
                println!("No attendance months.");
            } else {
                println!("{} attendance month(s):", months.len().to_string().bold());
                for month in &months {
                    println!("  {}", month.to_string().yellow());
                }
            }
        }
    }
    Ok(())
}

fn open_gateway(data_dir: &Path) -> anyhow::Result<SyncGateway> {
    let dir = DataDir::open(data_dir)
        .with_context(|| format!("cannot open {}", data_dir.display()))?;
    let store: Arc<dyn DocumentStore> = Arc::new(FsDocumentStore::open(dir));
    Ok(SyncGateway::new(store))
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}
