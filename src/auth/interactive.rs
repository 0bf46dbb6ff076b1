use std::convert::Infallible;
use std::time::Duration;

use chrono::Utc;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::service::service_fn;
use hyper::{body, Request, Response, StatusCode};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};

use super::credential::Credential;
use super::error::AuthError;
use super::secrets::ClientSecrets;

const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/youtube.upload";
const DEFAULT_REDIRECT_PORT: u16 = 8080;
const DEFAULT_CALLBACK_PATH: &str = "/oauth2callback";
const DEFAULT_DEADLINE_SECS: u64 = 300;

const CONFIRMATION_HTML: &str = "<html><body><h3>Authorization received.</h3>\
<p>You can close this tab and return to the terminal.</p></body></html>";
const MISSING_CODE_HTML: &str = "<html><body><h3>Authorization failed.</h3>\
<p>The callback carried no authorization code.</p></body></html>";

/// Runs the one-shot authorization-code flow against a human in a browser.
///
/// A local listener is bound on the fixed redirect port *before* the
/// authorization URL is presented, so the provider cannot redirect into a
/// closed port. The listener lives until the callback fires or the deadline
/// elapses, whichever comes first, and is torn down on every exit path.
pub struct InteractiveAuthorizer {
    client: reqwest::Client,
    auth_url: String,
    token_url: String,
    scope: String,
    redirect_host: String,
    redirect_port: u16,
    callback_path: String,
    deadline: Duration,
    open_browser: bool,
}

impl Default for InteractiveAuthorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractiveAuthorizer {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            redirect_host: "localhost".to_string(),
            redirect_port: DEFAULT_REDIRECT_PORT,
            callback_path: DEFAULT_CALLBACK_PATH.to_string(),
            deadline: Duration::from_secs(DEFAULT_DEADLINE_SECS),
            open_browser: true,
        }
    }

    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_redirect_host(mut self, host: impl Into<String>) -> Self {
        self.redirect_host = host.into();
        self
    }

    pub fn with_redirect_port(mut self, port: u16) -> Self {
        self.redirect_port = port;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Disable the browser launch; the caller shows the URL some other way.
    pub fn with_open_browser(mut self, open: bool) -> Self {
        self.open_browser = open;
        self
    }

    /// URI the provider will redirect the consenting user back to.
    pub fn redirect_uri(&self) -> String {
        format!(
            "http://{}:{}{}",
            self.redirect_host, self.redirect_port, self.callback_path
        )
    }

    /// The authorization URL the human must visit.
    ///
    /// `access_type=offline` plus `prompt=consent` guarantees a refresh token
    /// is issued even when the user has consented before.
    pub fn authorization_url(&self, secrets: &ClientSecrets) -> String {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &secrets.client_id)
            .append_pair("redirect_uri", &self.redirect_uri())
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scope)
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .finish();
        format!("{}?{}", self.auth_url, query)
    }

    /// Run the full interactive flow: listen, prompt, capture, exchange.
    pub async fn authorize(&self, secrets: &ClientSecrets) -> Result<Credential, AuthError> {
        // Bind before the URL is shown; the redirect must not race the listener.
        let listener = TcpListener::bind(("127.0.0.1", self.redirect_port)).await?;

        let (tx, rx) = oneshot::channel();
        let callback_path = self.callback_path.clone();
        let server = tokio::spawn(async move {
            let _ = tx.send(wait_for_callback(listener, callback_path).await);
        });

        let url = self.authorization_url(secrets);
        tracing::info!(%url, "waiting for user to complete the OAuth consent flow");
        if self.open_browser {
            if let Err(err) = webbrowser::open(&url) {
                tracing::warn!(error = %err, "could not open browser; visit the URL manually");
            }
        }

        let code = match tokio::time::timeout(self.deadline, rx).await {
            Ok(received) => received
                .map_err(|_| AuthError::InvalidResponse("callback task dropped".to_string()))??,
            Err(_) => {
                // Deadline elapsed; dropping the task drops the listener.
                server.abort();
                return Err(AuthError::AuthorizationTimeout(self.deadline.as_secs()));
            }
        };

        self.exchange_code(secrets, &code).await
    }

    async fn exchange_code(
        &self,
        secrets: &ClientSecrets,
        code: &str,
    ) -> Result<Credential, AuthError> {
        let redirect_uri = self.redirect_uri();
        let resp = self
            .client
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(&[
                ("code", code),
                ("client_id", secrets.client_id.as_str()),
                ("client_secret", secrets.client_secret.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::InvalidResponse(format!(
                "code exchange failed with status {}",
                resp.status()
            )));
        }
        let payload: ExchangeResponse = resp.json().await?;
        Ok(Credential {
            access_token: payload.access_token,
            refresh_token: payload.refresh_token,
            expires_at: payload
                .expires_in
                .map(|secs| Utc::now() + chrono::Duration::seconds(secs)),
        })
    }
}

/// Serve the redirect endpoint until the expected path is hit once.
///
/// Connections are served one at a time with keep-alive off, so each
/// response is fully flushed before the listener can be torn down.
async fn wait_for_callback(
    listener: TcpListener,
    callback_path: String,
) -> Result<String, AuthError> {
    let (got, mut gotten) = mpsc::channel::<Result<String, AuthError>>(1);
    loop {
        let (stream, peer) = listener.accept().await?;
        tracing::debug!(%peer, "callback listener accepted a connection");
        let io = hyper_util::rt::TokioIo::new(stream);
        let got = got.clone();
        let path = callback_path.clone();
        let service = service_fn(move |req: Request<body::Incoming>| {
            let got = got.clone();
            let path = path.clone();
            async move {
                if req.uri().path() != path {
                    let mut resp = Response::new(Full::<Bytes>::from("not found"));
                    *resp.status_mut() = StatusCode::NOT_FOUND;
                    return Ok::<_, Infallible>(resp);
                }
                let code = req.uri().query().and_then(|query| {
                    form_urlencoded::parse(query.as_bytes())
                        .find(|(key, _)| key == "code")
                        .map(|(_, value)| value.into_owned())
                });
                match code {
                    Some(code) => {
                        let _ = got.try_send(Ok(code));
                        Ok(Response::new(Full::<Bytes>::from(CONFIRMATION_HTML)))
                    }
                    None => {
                        let _ = got.try_send(Err(AuthError::NoAuthorizationCode));
                        let mut resp = Response::new(Full::<Bytes>::from(MISSING_CODE_HTML));
                        *resp.status_mut() = StatusCode::BAD_REQUEST;
                        Ok(resp)
                    }
                }
            }
        });
        if let Err(err) = hyper::server::conn::http1::Builder::new()
            .keep_alive(false)
            .serve_connection(io, service)
            .await
        {
            tracing::debug!(error = %err, "callback connection ended with an error");
        }
        if let Ok(outcome) = gotten.try_recv() {
            return outcome;
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}
