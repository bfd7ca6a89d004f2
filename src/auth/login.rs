use std::process::Command;

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::api::endpoints;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
pub struct LoginStart {
    pub login_url: String,
    pub opened_browser: bool,
}

/// Sends the user to the backend's OAuth entry point. The backend redirects
/// back to the front end's `/auth` route with a `token` parameter once the
/// provider flow completes.
pub fn start_login(base_url: &str) -> AppResult<LoginStart> {
    let login_url = login_url(base_url)?;
    let opened_browser = open_browser(&login_url);

    Ok(LoginStart {
        login_url,
        opened_browser,
    })
}

pub fn login_url(base_url: &str) -> AppResult<String> {
    let mut url = Url::parse(base_url)?;
    url.set_path(endpoints::LOGIN);
    Ok(url.to_string())
}

fn open_browser(url: &str) -> bool {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        Command::new("xdg-open")
    };

    match command.arg(url).status() {
        Ok(status) => status.success(),
        Err(err) => {
            debug!(error = %err, "could not launch browser");
            false
        }
    }
}
