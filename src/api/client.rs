use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;
use url::Url;

use crate::config::Settings;
use crate::error::{AppError, AppResult};

use super::endpoints;
use super::models::EmailRecord;

/// Calls the session controller makes against the mail-processing backend.
/// Every call carries the session credentials.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// `Ok` only for a 2xx answer from the status endpoint.
    async fn auth_status(&self) -> AppResult<()>;
    /// `Err(AppError::Unauthorized)` when the backend rejects the session.
    async fn list_emails(&self) -> AppResult<Vec<EmailRecord>>;
    /// Asks the backend to recompute; any HTTP answer counts as delivered.
    async fn trigger_sync(&self) -> AppResult<StatusCode>;
    async fn logout(&self) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> AppResult<Self> {
        Self::with_settings(base_url, &Settings::default())
    }

    pub fn with_settings(base_url: &str, settings: &Settings) -> AppResult<Self> {
        let base = Url::parse(base_url)?;
        let jar = Arc::new(Jar::default());
        if let Some(cookie) = settings.session_cookie() {
            jar.add_cookie_str(cookie, &base);
        }

        let mut builder = Client::builder().cookie_provider(jar);
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.set_path(endpoint);
        Ok(url)
    }

    async fn get(&self, endpoint: &str) -> AppResult<Response> {
        let url = self.endpoint_url(endpoint)?;
        let response = self.http.get(url).send().await?;
        debug!(endpoint, status = %response.status(), "backend answered");
        Ok(response)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn auth_status(&self) -> AppResult<()> {
        let response = self.get(endpoints::AUTH_STATUS).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_api_error(endpoints::AUTH_STATUS, status, &body))
    }

    async fn list_emails(&self) -> AppResult<Vec<EmailRecord>> {
        let response = self.get(endpoints::EMAILS).await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(map_api_error(endpoints::EMAILS, status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn trigger_sync(&self) -> AppResult<StatusCode> {
        let url = self.endpoint_url(endpoints::SYNC)?;
        let response = self.http.post(url).send().await?;
        let status = response.status();
        debug!(endpoint = endpoints::SYNC, %status, "backend answered");
        Ok(status)
    }

    async fn logout(&self) -> AppResult<()> {
        let response = self.get(endpoints::LOGOUT).await?;
        let status = response.status();
        if status.is_success() || status.is_redirection() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_api_error(endpoints::LOGOUT, status, &body))
    }
}

fn map_api_error(endpoint: &str, status: StatusCode, body: &str) -> AppError {
    let body = body.trim();
    let detail = parse_detail(body).unwrap_or_else(|| {
        if body.is_empty() {
            "no error details in response body".to_string()
        } else {
            body.to_string()
        }
    });

    if status == StatusCode::UNAUTHORIZED {
        return AppError::Unauthorized(format!("{endpoint} returned {status}: {detail}"));
    }

    AppError::Api(format!("{endpoint} failed ({status}): {detail}"))
}

// FastAPI error bodies look like `{"detail": "..."}`.
fn parse_detail(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) => Some(detail.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_unauthorized_status() {
        let error = map_api_error(
            endpoints::EMAILS,
            StatusCode::UNAUTHORIZED,
            r#"{"detail":"Not authenticated"}"#,
        );

        match error {
            AppError::Unauthorized(message) => {
                assert!(message.contains("Not authenticated"));
                assert!(message.contains("/emails"));
            }
            other => panic!("expected unauthorized error, got {other:?}"),
        }
    }

    #[test]
    fn maps_forbidden_as_api_error() {
        let error = map_api_error(endpoints::EMAILS, StatusCode::FORBIDDEN, "");
        match error {
            AppError::Api(message) => {
                assert!(message.contains("no error details"));
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn endpoint_url_replaces_path() {
        let backend = HttpBackend::new("http://localhost:8000").expect("client builds");
        assert_eq!(
            backend
                .endpoint_url(endpoints::AUTH_STATUS)
                .expect("url")
                .as_str(),
            "http://localhost:8000/auth/status"
        );
    }
}
