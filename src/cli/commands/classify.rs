//! Classify command - answer "is this path under a mapping root?"

use crate::cli::args::{ClassifyArgs, OutputFormat};
use crate::config::Config;
use crate::error::CacheResult;
use crate::roots::{CachedStatus, RootCache};
use crate::workspace::Workspace;
use console::style;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Serialize)]
struct Classification {
    path: PathBuf,
    status: CachedStatus,
}

/// Execute the classify command
pub async fn execute(args: ClassifyArgs, _config: &Config) -> CacheResult<()> {
    let cache = RootCache::new();

    for path in &args.no_root {
        cache.put_no_mappings_for(path)?;
    }
    for file in &args.workspace {
        let workspace = Workspace::load(file).await?;
        debug!(
            "Loaded workspace {} with {} mapping(s)",
            workspace.name,
            workspace.mappings.len()
        );
        cache.put_mappings(&workspace.mappings)?;
    }

    let results: Vec<Classification> = args
        .paths
        .into_iter()
        .map(|path| {
            let status = cache.get(&path);
            Classification { path, status }
        })
        .collect();

    match args.format {
        OutputFormat::Table => print_table(&results),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Plain => {
            for r in &results {
                println!("{}\t{}", r.status, r.path.display());
            }
        }
    }

    Ok(())
}

fn print_table(results: &[Classification]) {
    println!(
        "{:<20} {}",
        style("STATUS").bold(),
        style("PATH").bold()
    );
    println!("{}", "-".repeat(60));

    for r in results {
        let status = match r.status {
            CachedStatus::IsMappingRoot => style(r.status.to_string()).green(),
            CachedStatus::UnderMappingRoot => style(r.status.to_string()).cyan(),
            CachedStatus::NoRoot => style(r.status.to_string()).yellow(),
            CachedStatus::Unknown => style(r.status.to_string()).dim(),
        };
        println!("{:<20} {}", status, r.path.display());
    }
}
