//! Integration tests for the Prifam admin dashboard.
//!
//! Each test boots the full router on an ephemeral localhost port and drives
//! it over HTTP with a cookie-carrying client, so sessions, extractors and
//! templates are exercised exactly as a browser would.
//!
//! ```bash
//! cargo test -p prifam-integration-tests
//! ```

use std::net::SocketAddr;

use prifam_admin::config::AdminConfig;
use prifam_admin::routes;
use prifam_admin::state::AppState;
use reqwest::{Client, Response, redirect};

/// A running admin server plus a client with its own cookie jar.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    /// The server's state, for inspecting workspaces behind the HTTP surface.
    pub state: AppState,
}

impl TestContext {
    /// Boot the admin app with [`AdminConfig::local`].
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn new() -> Self {
        Self::with_config(AdminConfig::local()).await
    }

    /// Boot the admin app with a custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    #[allow(clippy::expect_used)]
    pub async fn with_config(config: AdminConfig) -> Self {
        let state = AppState::new(config).expect("Failed to create application state");
        state.spawn_workspace_sweeper();
        let addr = serve(routes::app(state.clone())).await;
        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: format!("http://{addr}"),
            state,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path.
    ///
    /// # Panics
    ///
    /// Panics if the request fails to send.
    #[allow(clippy::expect_used)]
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a URL-encoded form.
    ///
    /// # Panics
    ///
    /// Panics if the request fails to send.
    #[allow(clippy::expect_used)]
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Sign in and return the login response (a redirect on success).
    pub async fn login(&self, username: &str) -> Response {
        self.post_form("/", &[("username", username), ("password", "password")])
            .await
    }

    /// GET a page and return its body, asserting a 200.
    ///
    /// # Panics
    ///
    /// Panics if the status is not 200 or the body cannot be read.
    #[allow(clippy::expect_used)]
    pub async fn page(&self, path: &str) -> String {
        let resp = self.get(path).await;
        assert_eq!(resp.status(), 200, "GET {path}");
        resp.text().await.expect("Failed to read body")
    }
}

/// Serve a router on an ephemeral localhost port.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
#[allow(clippy::expect_used)]
pub async fn serve(app: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(resp: &Response) -> Option<&str> {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
