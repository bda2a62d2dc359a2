use colored::Colorize;

use sablon_server::{SablonServer, ServerConfig, StorageConfig};
use sablon_store::self_check;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Check(args) => cmd_check(args, &cli.format),
        Command::Config(args) => cmd_config(args),
    }
}

/// Layer command-line flags over the config file (or the defaults).
pub fn resolve_config(args: &StoreArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(root) = &args.data_dir {
        config.storage = StorageConfig::File { root: root.clone() };
    }
    if let Some(database) = &args.database {
        config.database = database.clone();
    }
    if let Some(collection) = &args.collection {
        config.collection = collection.clone();
    }
    Ok(config)
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = resolve_config(&args.store)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    SablonServer::new(config).serve().await?;
    Ok(())
}

fn cmd_check(args: StoreArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    let store = config.open_store()?;
    let report = self_check(store.as_ref(), &config.namespace()?);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("Checking {}", report.namespace.bold());
            for step in &report.steps {
                let mark = if step.passed { "✓".green() } else { "✗".red() };
                println!("  {mark} {:<14} {}", step.step.to_string(), step.detail.dimmed());
            }
        }
    }

    match report.failed_step() {
        None if report.passed() => {
            if matches!(format, OutputFormat::Text) {
                println!("{} Store is healthy.", "✓".green().bold());
            }
            Ok(())
        }
        Some(step) => anyhow::bail!("store check failed at step {step}"),
        None => anyhow::bail!("store check did not complete"),
    }
}

fn cmd_config(args: StoreArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
