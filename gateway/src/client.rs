use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use session::manager::SessionAccess;

use crate::error::{ErrorBody, GatewayError};
use crate::nav::Navigator;
use crate::notify::{NoticeLevel, Notifier};

/// Gateway construction options.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL including the API prefix, e.g. `http://localhost:5000/api`.
    pub base_url: String,

    /// Per-request timeout. Requests run to completion or to this bound;
    /// there is no cancellation beyond it.
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Uniform request dispatch for the whole application.
///
/// Every call goes through a single routine that attaches the current
/// bearer token, normalizes failures into [`GatewayError`], and runs the
/// centralized side effects: user notifications, and on a rejected token a
/// forced logout plus redirect to the login screen. Callers only ever see
/// the normalized error.
pub struct GatewayClient {
    http: Client,
    base_url: String,
    session: Arc<dyn SessionAccess>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl GatewayClient {
    pub fn new(
        config: GatewayConfig,
        session: Arc<dyn SessionAccess>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(GatewayError::from_transport)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            notifier,
            navigator,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.dispatch(Method::GET, path, None, None, true).await
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        self.dispatch(Method::GET, path, Some(query), None, true)
            .await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.dispatch(Method::POST, path, None, Some(encode(body)?), true)
            .await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.dispatch(Method::PUT, path, None, Some(encode(body)?), true)
            .await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.dispatch(Method::PATCH, path, None, Some(encode(body)?), true)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.dispatch(Method::DELETE, path, None, None, true).await
    }

    /// Dispatch without bearer attachment and without the forced-logout
    /// side effects. The credential endpoints themselves go through here:
    /// a 401 from login is a bad password, not an expired session, and
    /// must leave any existing session untouched.
    pub async fn post_public<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.dispatch(Method::POST, path, None, Some(encode(body)?), false)
            .await
    }

    #[instrument(
        skip(self, body),
        fields(method = %method, path = %path),
        level = "debug"
    )]
    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<serde_json::Value>,
        authenticated: bool,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);

        if let Some(query) = query {
            req = req.query(query);
        }

        // Token is read at dispatch time, not at call-site creation time.
        if authenticated {
            if let Some(token) = self.session.bearer_token() {
                req = req.bearer_auth(token);
            }
        }

        if let Some(body) = &body {
            req = req.json(body);
        }

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                let err = GatewayError::from_transport(e);
                self.notify_transport(&err);
                return Err(err);
            }
        };

        let status = resp.status().as_u16();
        if resp.status().is_success() {
            debug!(status, "request succeeded");
            return resp
                .json::<T>()
                .await
                .map_err(|e| GatewayError::Decode(e.to_string()));
        }

        // An error body that does not decode still normalizes, with a
        // generic message.
        let body: ErrorBody = resp.json().await.unwrap_or_default();
        Err(self.handle_failure(status, body, authenticated).await)
    }

    /// Normalize a non-2xx response and run the centralized side effects.
    async fn handle_failure(
        &self,
        status: u16,
        body: ErrorBody,
        authenticated: bool,
    ) -> GatewayError {
        let err = GatewayError::from_response(status, body);

        match &err {
            GatewayError::SessionExpired { message } => {
                if !authenticated {
                    return GatewayError::AuthenticationFailed {
                        message: message.clone(),
                    };
                }

                // Skip the whole branch when the user is already on the
                // login screen, so rapid repeated 401s redirect at most
                // once and never loop.
                if !self.navigator.on_login_screen() {
                    self.session.force_clear().await;
                    self.notifier.notify(
                        NoticeLevel::Error,
                        "Session expired. Please log in again.",
                    );
                    self.navigator.go_to_login();
                }
            }
            GatewayError::PermissionDenied { message } => {
                self.notifier.notify(NoticeLevel::Error, message);
            }
            GatewayError::NotFound { message } => {
                // Notifying on every missing resource is pure noise.
                debug!(status, message = %message, "resource not found");
            }
            GatewayError::ValidationFailed {
                message,
                field_errors,
            } => {
                if field_errors.is_empty() {
                    self.notifier.notify(NoticeLevel::Error, message);
                } else {
                    for messages in field_errors.values() {
                        for m in messages {
                            self.notifier.notify(NoticeLevel::Error, m);
                        }
                    }
                }
            }
            GatewayError::RateLimited { .. } => {
                self.notifier.notify(
                    NoticeLevel::Error,
                    "Too many requests. Please try again later.",
                );
            }
            GatewayError::ServerError { .. } => {
                self.notifier
                    .notify(NoticeLevel::Error, "Server error. Please try again later.");
            }
            GatewayError::UnexpectedStatus { message, .. } => {
                self.notifier.notify(NoticeLevel::Error, message);
            }
            _ => {}
        }

        err
    }

    fn notify_transport(&self, err: &GatewayError) {
        let msg = match err {
            GatewayError::Timeout => {
                "Request timeout. Please check your connection and try again."
            }
            _ => "Network error. Please check your internet connection.",
        };
        self.notifier.notify(NoticeLevel::Error, msg);
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, GatewayError> {
    serde_json::to_value(body).map_err(|e| GatewayError::Decode(e.to_string()))
}
