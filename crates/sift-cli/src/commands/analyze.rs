//! `sift analyze`: run an analyzer over a project tree

use crate::analyzers::builtin_registry;
use crate::args::OptionArgs;
use crate::console::{CliConsole, format_bytes};
use crate::progress::BarProgressSink;
use crate::tree::TreeBuilder;
use colored::*;
use sift_core::{AnalysisOutcome, Orchestrator, PipelineReport, SiftResult, load_options};
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments of the analyze command
pub struct AnalyzeArgs {
    pub path: PathBuf,
    pub analyzer: Option<String>,
    pub options: OptionArgs,
    pub no_progress: bool,
    pub perf: bool,
    pub json: bool,
    pub verbose: bool,
}

pub async fn execute(args: AnalyzeArgs) -> SiftResult<()> {
    let console = console_for(&args);
    let show_bar = !args.no_progress && !args.json;

    let options = args
        .options
        .apply(load_options(Some(args.options.config.as_path()))?)
        .with_progress(show_bar)
        .with_performance_monitoring(args.perf);

    let tree = TreeBuilder::new(&args.path)
        .with_excludes(&args.options.excludes)
        .respect_gitignore(!args.options.no_gitignore)
        .build()?;
    console.info(&format!(
        "Found {} files under {}",
        tree.file_count(),
        args.path.display()
    ));

    let bar = show_bar.then(|| Arc::new(BarProgressSink::new()));
    let mut builder = Orchestrator::builder()
        .with_options(options)
        .with_registry(builtin_registry());
    if let Some(name) = &args.analyzer {
        builder = builder.with_analyzer_name(name.clone());
    }
    if let Some(bar) = &bar {
        builder = builder.with_progress_sink(bar.clone());
    }
    let mut orchestrator = builder.build();

    let token = orchestrator.cancellation_token();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight files");
            token.cancel();
        }
    });

    let result = orchestrator.run(&tree).await;
    ctrl_c.abort();
    if let Some(bar) = &bar {
        bar.finish();
    }
    let report = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&console, &report, orchestrator.cancellation_token().is_cancelled());
    Ok(())
}

/// Console for the run; JSON output keeps stdout free of anything else
fn console_for(args: &AnalyzeArgs) -> CliConsole {
    CliConsole::new(args.verbose && !args.json)
}

fn print_report(console: &CliConsole, report: &PipelineReport, cancelled: bool) {
    let metrics = &report.metrics;

    console.print_header("Analysis Summary");
    console.print_row("Files", metrics.total_files);
    console.print_row("Processed", metrics.processed.to_string().green());
    console.print_row("Failed", metrics.failed.to_string().red());
    console.print_row("Skipped", metrics.skipped.to_string().yellow());
    console.print_row("Batches", report.batches.len());
    console.print_row("Bytes", format_bytes(metrics.total_bytes));
    console.print_row("Elapsed", format!("{:.2}s", metrics.elapsed.as_secs_f64()));
    console.print_row("Throughput", format!("{:.3} MB/s", metrics.processing_speed));
    console.print_row("Peak concurrency", metrics.high_water_mark);

    for result in report.successes() {
        console.info(&format!(
            "{} {}",
            result.path,
            result
                .payload()
                .map(|p| p.to_string())
                .unwrap_or_default()
                .dimmed()
        ));
    }

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        println!();
        for failure in failures {
            let reason = match &failure.outcome {
                AnalysisOutcome::Failed { error } => error.as_str(),
                _ => "",
            };
            console.error(&format!(
                "{} after {} attempts: {}",
                failure.path, failure.attempts, reason
            ));
        }
    }

    println!();
    if cancelled {
        console.warn("Run was cancelled; remaining files were skipped");
    } else if metrics.failed > 0 {
        console.warn(&format!("Completed with {} failed files", metrics.failed));
    } else {
        console.success("Analysis complete");
    }
}
