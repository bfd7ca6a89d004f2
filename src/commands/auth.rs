use serde::Serialize;

use crate::auth;
use crate::cli::CaptureArgs;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::session::{SessionState, View};

#[derive(Debug, Serialize)]
struct StatusReport {
    profile: String,
    base_url: String,
    session: SessionState,
    view: View,
}

pub fn login(ctx: &AppContext) -> AppResult<()> {
    let started = auth::start_login(&ctx.base_url)?;
    if !started.opened_browser {
        eprintln!(
            "open this URL in your browser to continue login:\n{}",
            started.login_url
        );
    }

    let text = format!(
        "{}: continue login in the browser, then run `emailing capture <url>` with the {}/auth?token=... address it lands on",
        ctx.profile,
        ctx.settings.app_url()?
    );
    ctx.output.emit(&text, &started)
}

pub fn capture(ctx: &AppContext, args: CaptureArgs) -> AppResult<()> {
    let outcome = auth::capture_token(&args.url, ctx.storage.as_ref())?;

    let text = if outcome.captured {
        format!(
            "{}: token stored in {}; continue at {}",
            ctx.profile,
            ctx.paths.storage_file(&ctx.profile).display(),
            outcome.location
        )
    } else {
        format!("{}: no token in redirect url", ctx.profile)
    };
    ctx.output.emit(&text, &outcome)
}

pub async fn status(ctx: &AppContext) -> AppResult<()> {
    let controller = ctx.controller();
    let session = controller.check_status().await;

    let report = StatusReport {
        profile: ctx.profile.clone(),
        base_url: ctx.base_url.clone(),
        session,
        view: controller.view(),
    };
    let text = match session {
        SessionState::Authenticated => format!("{}: authenticated", ctx.profile),
        _ => format!(
            "{}: logged out. run `emailing login` to connect",
            ctx.profile
        ),
    };
    ctx.output.emit(&text, &report)
}

pub async fn logout(ctx: &AppContext) -> AppResult<()> {
    let controller = ctx.controller();
    let outcome = controller.logout().await;

    let text = if outcome.remote_invalidated {
        format!("{}: logged out", ctx.profile)
    } else {
        format!(
            "{}: logged out locally (backend logout did not complete)",
            ctx.profile
        )
    };
    ctx.output.emit(&text, &outcome)
}
