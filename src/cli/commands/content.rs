//! Content command - stage files through the revision content cache
//!
//! The cache lives only as long as the process, so this is a dry run of the
//! configured limits: every file is stored, then the report shows which
//! revisions survived eviction.

use crate::cli::args::{ContentArgs, OutputFormat};
use crate::config::Config;
use crate::content::RevisionContentCache;
use crate::error::CacheResult;
use console::style;
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct Staged {
    path: PathBuf,
    revision: u64,
    bytes: usize,
    retained: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    staged: Vec<Staged>,
    entries: usize,
    total_bytes: u64,
}

/// Execute the content command
pub async fn execute(args: ContentArgs, config: &Config) -> CacheResult<()> {
    let cache = RevisionContentCache::from_config(&config.content)?;

    let mut staged = Vec::with_capacity(args.files.len());
    for path in args.files {
        let content = cache.find_or_create(&path, args.revision, |out| {
            let mut source = File::open(&path)?;
            io::copy(&mut source, out).map(|_| ())
        })?;

        staged.push(Staged {
            path,
            revision: args.revision,
            bytes: content.len(),
            retained: false,
        });
    }

    for entry in &mut staged {
        entry.retained = cache.find(&entry.path, entry.revision).is_some();
    }

    let report = Report {
        staged,
        entries: cache.len(),
        total_bytes: cache.total_bytes(),
    };

    match args.format {
        OutputFormat::Table => print_table(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => {
            for s in &report.staged {
                println!(
                    "{}\t{}\t{}\t{}",
                    if s.retained { "kept" } else { "evicted" },
                    s.revision,
                    s.bytes,
                    s.path.display()
                );
            }
        }
    }

    Ok(())
}

fn print_table(report: &Report) {
    println!(
        "{:<10} {:>10} {:>12} {}",
        style("STATE").bold(),
        style("REVISION").bold(),
        style("BYTES").bold(),
        style("PATH").bold()
    );
    println!("{}", "-".repeat(60));

    for s in &report.staged {
        let state = if s.retained {
            style("kept").green()
        } else {
            style("evicted").yellow()
        };
        println!(
            "{:<10} {:>10} {:>12} {}",
            state,
            s.revision,
            s.bytes,
            s.path.display()
        );
    }

    println!();
    println!(
        "{} revision(s) cached, {} bytes",
        report.entries, report.total_bytes
    );
}
