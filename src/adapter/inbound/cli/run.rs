//! Handler for the `run` command.

use std::path::Path;

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::{ReconcileReport, WorkerSnapshot};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::runtime;
use crate::port::inbound::admin::FleetAdmin;

/// Longest decision text shown in the summary table.
const DECISION_WIDTH: usize = 60;

#[derive(Tabled)]
struct WorkerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Cycles")]
    cycles: String,
    #[tabled(rename = "Last decision")]
    decision: String,
}

impl From<&WorkerSnapshot> for WorkerRow {
    fn from(worker: &WorkerSnapshot) -> Self {
        let decision = worker
            .last_output
            .as_deref()
            .and_then(|text| text.lines().next())
            .map_or_else(|| "-".to_string(), |line| line.chars().take(DECISION_WIDTH).collect());
        Self {
            id: worker.id.to_string(),
            state: worker.state.to_string(),
            cycles: format!("{} ok / {} failed", worker.cycles_completed, worker.cycles_failed),
            decision,
        }
    }
}

/// Execute the run command: start the fleet and serve until Ctrl-C.
pub async fn execute(config_path: &Path, args: &RunArgs) -> Result<()> {
    let mut config = Config::load(config_path)?;
    if let Some(database) = &args.database {
        config.database = database.to_string_lossy().into_owned();
    }
    config.init_logging();

    print_startup_config(&config);

    let service = bootstrap::bootstrap(&config).await?;
    let report = runtime::start(&service).await?;
    print_report(&report);

    runtime::run_until(&service, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;

    print_workers(&service.list());
    output::success("Fleet stopped");
    Ok(())
}

fn print_workers(workers: &[WorkerSnapshot]) {
    if output::is_json() {
        output::json_output(json!({
            "workers": workers.iter().map(|w| json!({
                "trader_id": w.id,
                "state": w.state,
                "cycles_completed": w.cycles_completed,
                "cycles_failed": w.cycles_failed,
                "last_cycle_at": w.last_cycle_at,
                "last_output": w.last_output,
            })).collect::<Vec<_>>(),
        }));
        return;
    }
    if workers.is_empty() {
        return;
    }
    output::section("Workers");
    let rows: Vec<WorkerRow> = workers.iter().map(WorkerRow::from).collect();
    output::lines(&Table::new(rows).to_string());
}

fn print_startup_config(config: &Config) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Database", &config.database);
    output::field("Seeds", config.traders.len());
    output::field("Timeout", format!("{}s", config.llm.timeout_secs));
    output::field("Attempts", config.llm.max_attempts);
    output::field("Stop timeout", format!("{}s", config.fleet.stop_timeout_secs));
}

fn print_report(report: &ReconcileReport) {
    output::section("Startup");
    output::field("Added", report.added);
    for failure in &report.failures {
        output::warning(&format!(
            "{} {} failed: {}",
            failure.action, failure.id, failure.reason
        ));
    }
    output::success(&format!("Fleet running ({report})"));
    output::hint("send SIGHUP to reload, Ctrl-C to stop");
}
