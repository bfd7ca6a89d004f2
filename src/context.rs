use std::sync::Arc;
use std::time::Duration;

use crate::api::HttpBackend;
use crate::auth::FileStorage;
use crate::config::{self, AppPaths, Settings};
use crate::error::AppResult;
use crate::output::Output;
use crate::session::SessionController;

#[derive(Debug)]
pub struct AppContext {
    pub profile: String,
    pub paths: AppPaths,
    pub settings: Settings,
    pub base_url: String,
    pub storage: Arc<FileStorage>,
    pub backend: Arc<HttpBackend>,
    pub output: Output,
}

impl AppContext {
    pub fn bootstrap(profile: String, json: bool, base_url: Option<String>) -> AppResult<Self> {
        let profile = config::resolve_profile(&profile)?;
        let paths = AppPaths::discover()?;
        let settings = config::load_settings(&paths, &profile)?;
        let base_url = settings.base_url(base_url.as_deref())?;
        let storage = Arc::new(FileStorage::new(&paths, &profile));
        let backend = Arc::new(HttpBackend::with_settings(&base_url, &settings)?);
        let output = Output::new(json);

        Ok(Self {
            profile,
            paths,
            settings,
            base_url,
            storage,
            backend,
            output,
        })
    }

    pub fn controller(&self) -> SessionController {
        self.controller_with_delay(self.settings.sync_delay())
    }

    pub fn controller_with_delay(&self, sync_delay: Duration) -> SessionController {
        SessionController::new(self.backend.clone(), self.storage.clone(), sync_delay)
    }
}
