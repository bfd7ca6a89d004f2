use crate::api::Filter;
use crate::cli::InboxArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::session::{SessionController, SessionState};

pub async fn run(ctx: &AppContext, args: InboxArgs) -> AppResult<()> {
    let controller = ctx.controller();
    let filter = parse_filter(&args.category)?;

    ensure_authenticated(controller.start().await)?;
    show(ctx, &controller, filter)
}

pub(crate) fn parse_filter(raw: &str) -> AppResult<Filter> {
    if raw.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "--category must not be empty".to_string(),
        ));
    }
    Ok(raw.parse().unwrap_or_default())
}

pub(crate) fn ensure_authenticated(session: SessionState) -> AppResult<()> {
    if session == SessionState::Authenticated {
        return Ok(());
    }

    Err(AppError::Auth("not logged in. run `emailing login`".to_string()))
}

pub(crate) fn show(
    ctx: &AppContext,
    controller: &SessionController,
    filter: Filter,
) -> AppResult<()> {
    let heading = filter.to_string();
    controller.select_filter(filter);
    ctx.output
        .emit_emails(&heading, &controller.visible_emails())
}
