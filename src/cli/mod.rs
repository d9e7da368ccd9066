//! Command line interface for pypi_release.

mod args;
mod output;

pub use args::Args;
pub use output::OutputManager;

use crate::config::ReleaseConfig;
use crate::error::Result;
use crate::prompt::Prompter;
use crate::workflow::{ReleaseOutcome, ReleaseReport, ReleaseWorkflow};

/// Main CLI entry point; returns the process exit code
pub async fn run() -> Result<i32> {
    let _args = Args::parse_args();
    let output = OutputManager::default();

    let project_dir = std::env::current_dir()?;
    let config = ReleaseConfig::load(&project_dir)?;
    log::debug!("Configuration: {:?}", config);

    let workflow = ReleaseWorkflow::for_project(&project_dir, &config, &output);
    let mut prompter = Prompter::stdio();
    let report = workflow.run(&mut prompter).await?;

    report_outcome(&output, &report);
    Ok(0)
}

fn report_outcome(output: &OutputManager, report: &ReleaseReport) {
    output.println("");
    match &report.outcome {
        ReleaseOutcome::Published { commit: Some(_) } => output.success(&format!(
            "Released {} (committed and pushed)",
            report.state.new_version
        )),
        ReleaseOutcome::Published { commit: None } => output.success(&format!(
            "Released {}",
            report.state.new_version
        )),
        ReleaseOutcome::Cancelled { .. } => {
            output.info("Nothing was uploaded");
        }
    }
}
