//! Handlers for batch recomputation: `recalculate-all` and `serve`.

use serde_json::json;
use tokio::signal;
use tracing::info;

use crate::adapter::inbound::cli::context::Context;
use crate::adapter::inbound::cli::output;
use crate::application::analytics::scheduler::RecalculationScheduler;
use crate::error::Result;

/// Execute `recalculate-all`: one batch pass over every user.
pub async fn execute_once(ctx: &Context) -> Result<()> {
    let pb = output::spinner("Recomputing analytics for all users");
    let report = match ctx.service.recalculate_all_users().await {
        Ok(report) => report,
        Err(e) => {
            output::spinner_fail(&pb, "Could not list users");
            return Err(e);
        }
    };

    if output::is_json() {
        pb.finish_and_clear();
        let failed: Vec<_> = report
            .failed
            .iter()
            .map(|(user_id, error)| json!({ "userId": user_id, "error": error }))
            .collect();
        output::json_output(json!({
            "command": "recalculate-all",
            "succeeded": report.succeeded,
            "failed": failed,
        }));
        return Ok(());
    }

    output::spinner_success(
        &pb,
        &format!("Recomputed {} of {} users", report.succeeded, report.attempted()),
    );
    for (user_id, error) in &report.failed {
        output::warning(&format!("{user_id}: {error}"));
    }
    Ok(())
}

/// Execute `serve`: run the scheduler until Ctrl-C.
pub async fn execute_serve(ctx: &Context) -> Result<()> {
    let interval = ctx.config.analytics.recalculate_interval();
    let handle = RecalculationScheduler::new(ctx.service.clone(), interval).start();

    output::success(&format!(
        "Recomputing '{}' snapshots every {}h; press Ctrl-C to stop",
        ctx.service.policy().label,
        ctx.config.analytics.recalculate_interval_hours
    ));

    signal::ctrl_c().await?;
    info!("Shutdown signal received");
    handle.shutdown().await;
    output::note("Scheduler stopped");
    Ok(())
}
