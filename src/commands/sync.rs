use std::time::Duration;

use tracing::info;

use crate::cli::SyncArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::session::TriggerOutcome;

use super::inbox;

pub async fn run(ctx: &AppContext, args: SyncArgs) -> AppResult<()> {
    let filter = inbox::parse_filter(&args.category)?;
    let controller = match args.delay_ms {
        Some(delay_ms) => ctx.controller_with_delay(Duration::from_millis(delay_ms)),
        None => ctx.controller(),
    };

    inbox::ensure_authenticated(controller.start().await)?;

    let outcome = controller.trigger_sync().await;
    let status = match outcome {
        TriggerOutcome::Triggered { status } => status,
        TriggerOutcome::AlreadySyncing => {
            return Err(AppError::Api(
                "sync was not started: another sync is still running".to_string(),
            ));
        }
        TriggerOutcome::NotAuthenticated => {
            return Err(AppError::Auth(
                "sync was not started: not logged in".to_string(),
            ));
        }
    };

    if args.no_wait {
        let text = match status {
            Some(status) => format!(
                "{}: sync requested (backend answered {status})",
                ctx.profile
            ),
            None => format!("{}: sync request failed to reach the backend", ctx.profile),
        };
        return ctx.output.emit(&text, &outcome);
    }

    info!(
        delay_ms = controller.sync_delay().as_millis() as u64,
        "waiting for the scheduled refresh"
    );
    controller.wait_until_settled().await;

    inbox::ensure_authenticated(controller.session())?;
    inbox::show(ctx, &controller, filter)
}
