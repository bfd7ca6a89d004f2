pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{Settings, normalize_base_url};

use crate::error::{AppError, AppResult};

pub fn load_settings(paths: &AppPaths, profile: &str) -> AppResult<Settings> {
    settings::load(paths.settings_file(profile))
}

/// Profile names become file names, so they must not escape the profile
/// directories.
pub fn resolve_profile(requested: &str) -> AppResult<String> {
    let trimmed = requested.trim();
    if trimmed.is_empty() {
        return Ok("default".to_string());
    }

    if trimmed.contains(['/', '\\']) || trimmed.starts_with('.') {
        return Err(AppError::InvalidInput(format!(
            "invalid profile name `{trimmed}`"
        )));
    }

    Ok(trimmed.to_string())
}
