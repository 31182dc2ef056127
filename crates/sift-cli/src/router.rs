//! Command routing logic for CLI

use crate::args::{Cli, Commands, ConfigAction};
use crate::commands::{self, AnalyzeArgs};
use sift_core::SiftResult;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> SiftResult<()> {
    let verbose = cli.verbose;
    match cli.command {
        Commands::Analyze {
            path,
            analyzer,
            options,
            no_progress,
            perf,
            json,
        } => {
            commands::analyze::execute(AnalyzeArgs {
                path,
                analyzer,
                options,
                no_progress,
                perf,
                json,
                verbose,
            })
            .await
        }
        Commands::Plan {
            path,
            options,
            json,
        } => commands::plan::execute(&path, &options, json).await,
        Commands::Config { action } => match action {
            ConfigAction::Show { config } => commands::config::show(&config).await,
        },
    }
}
