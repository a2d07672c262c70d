//! Reconcile command - plan a workspace update

use crate::cli::args::{OutputFormat, ReconcileArgs};
use crate::config::Config;
use crate::error::CacheResult;
use crate::workspace::{plan_update, Mapping, Workspace, WorkspaceUpdate};
use console::style;

/// Execute the reconcile command
pub async fn execute(args: ReconcileArgs, _config: &Config) -> CacheResult<()> {
    let current = Workspace::load(&args.current).await?;
    let desired = Workspace::load(&args.desired).await?;
    desired.validate()?;

    let update = plan_update(&current, &desired);

    match args.format {
        OutputFormat::Table => print_table(&update),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&update)?),
        OutputFormat::Plain => print_plain(&update),
    }

    Ok(())
}

fn mapping_label(mapping: &Mapping) -> String {
    if mapping.cloaked {
        format!("{} (cloaked)", mapping.server_path)
    } else {
        format!("{} -> {}", mapping.server_path, mapping.local_path.display())
    }
}

fn print_table(update: &WorkspaceUpdate) {
    println!(
        "{} {}",
        style("Workspace").bold(),
        style(&update.workspace).cyan()
    );

    if update.leaves_mappings() {
        println!("  {}", style("mappings unchanged").dim());
    }
    for mapping in &update.to_remove {
        println!("  {} {}", style("remove").red(), mapping.server_path);
    }
    for mapping in &update.to_change {
        println!("  {} {}", style("map").green(), mapping_label(mapping));
    }

    println!(
        "  {} name={} comment={:?}",
        style("update").yellow(),
        update.new_name,
        update.new_comment
    );
}

fn print_plain(update: &WorkspaceUpdate) {
    for mapping in &update.to_remove {
        println!("remove\t{}", mapping.server_path);
    }
    for mapping in &update.to_change {
        let verb = if mapping.cloaked { "cloak" } else { "map" };
        println!(
            "{}\t{}\t{}",
            verb,
            mapping.server_path,
            mapping.local_path.display()
        );
    }
    println!("update\t{}\t{}", update.new_name, update.new_comment);
}
