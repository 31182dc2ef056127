//! `sift plan`: show prioritization and batching without analyzing

use crate::args::OptionArgs;
use crate::console::{CliConsole, format_bytes};
use crate::tree::TreeBuilder;
use colored::*;
use sift_core::{Orchestrator, PipelinePlan, SiftResult, load_options};
use std::path::Path;

pub async fn execute(path: &Path, args: &OptionArgs, json: bool) -> SiftResult<()> {
    let options = args.apply(load_options(Some(args.config.as_path()))?);
    let tree = TreeBuilder::new(path)
        .with_excludes(&args.excludes)
        .respect_gitignore(!args.no_gitignore)
        .build()?;

    let plan = Orchestrator::builder()
        .with_options(options)
        .build()
        .plan(&tree)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&CliConsole::new(true), &plan);
    }
    Ok(())
}

fn print_plan(console: &CliConsole, plan: &PipelinePlan) {
    console.print_header("Analysis Plan");
    console.print_row("Files", plan.files.len());
    console.print_row("Skipped", plan.skipped.to_string().yellow());
    console.print_row("Bytes", format_bytes(plan.total_bytes));
    console.print_row("Batches", plan.batches.len());

    let mut files = plan.files.iter();
    for batch in &plan.batches {
        println!();
        println!(
            "{} {}",
            format!("Batch {}", batch.index + 1).cyan().bold(),
            format!("({} files, {})", batch.files, format_bytes(batch.bytes)).dimmed()
        );
        for file in files.by_ref().take(batch.files) {
            println!("  {:>5}  {}", file.priority, file.path);
        }
    }
}
