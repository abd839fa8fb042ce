//! User context resolution over file or HTTP
//!
//! The lookup base comes from configuration. `file://` bases are read from
//! local disk, anything else is fetched with an HTTP GET. The HTTP client is
//! supplied by the caller so timeouts and redirect policy are configured in
//! one place; the default `reqwest` policy follows redirects.

use tracing::{debug, warn};

use crate::context::UserContext;
use crate::error::{Error, Result};

const FILE_SCHEME: &str = "file://";

/// Build the per-user document locator under `base`.
///
/// The user name is lower-cased and URL-encoded, then joined to the base
/// with exactly one `/` whether or not the base already ends in one.
pub fn user_resource(base: &str, user_name: &str) -> String {
    let encoded = urlencoding::encode(&user_name.to_lowercase()).into_owned();
    format!("{}/{encoded}.json", base.trim_end_matches('/'))
}

/// Resolves login names to `UserContext` records.
#[derive(Debug, Clone)]
pub struct UserContextResolver {
    base: Option<String>,
    http_client: reqwest::Client,
}

impl UserContextResolver {
    /// Create a resolver. A `None` or blank base makes every lookup fail with
    /// `Error::NotConfigured`.
    pub fn new(base: Option<String>, http_client: reqwest::Client) -> Self {
        let base = base.filter(|b| !b.trim().is_empty());
        Self { base, http_client }
    }

    /// Configured lookup base, if any.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Resolve `user_name` to its context record.
    ///
    /// Errors:
    /// - `NotConfigured` when no lookup base is set
    /// - `Lookup` for any read, transport or parse failure
    /// - `NotConfirmed` when the record exists but is not confirmed yet
    /// - `AccountNotFound` when no record exists (HTTP status other than 200)
    pub async fn resolve(&self, user_name: &str) -> Result<UserContext> {
        debug!(user = user_name, "resolving user context");

        let Some(base) = self.base.as_deref() else {
            warn!(user = user_name, "user context lookup location is not configured");
            return Err(Error::NotConfigured);
        };

        let locator = user_resource(base, user_name);
        let record = match locator.strip_prefix(FILE_SCHEME) {
            Some(path) => Some(read_file(path, user_name).await?),
            None => self.fetch(&locator, user_name).await?,
        };

        let Some(context) = record else {
            warn!(user = user_name, "account not found");
            return Err(Error::AccountNotFound(user_name.to_string()));
        };

        if !context.confirmed {
            debug!(user = user_name, "account not yet confirmed");
            return Err(Error::NotConfirmed(user_name.to_string()));
        }

        debug!(user = user_name, endpoint = %context.endpoint_url, "resolved user context");
        Ok(context)
    }

    /// GET the record. `Ok(None)` when the directory answers with anything
    /// but 200.
    async fn fetch(&self, locator: &str, user_name: &str) -> Result<Option<UserContext>> {
        let response = self
            .http_client
            .get(locator)
            .send()
            .await
            .map_err(|e| lookup_error(user_name, "http", e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            debug!(user = user_name, status = status.as_u16(), "directory returned no record");
            return Ok(None);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| lookup_error(user_name, "http", e))?;
        parse(&body, user_name).map(Some)
    }
}

async fn read_file(path: &str, user_name: &str) -> Result<UserContext> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| lookup_error(user_name, "io", e))?;
    parse(&bytes, user_name)
}

fn parse(bytes: &[u8], user_name: &str) -> Result<UserContext> {
    serde_json::from_slice(bytes).map_err(|e| lookup_error(user_name, "json", e))
}

fn lookup_error(user_name: &str, kind: &'static str, err: impl std::fmt::Display) -> Error {
    warn!(user = user_name, kind, error = %err, "user context lookup failed");
    Error::Lookup {
        user: user_name.to_string(),
        kind,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{StatusCode, Uri};
    use axum::response::{IntoResponse, Redirect, Response};
    use tokio::net::TcpListener;

    const ALICE: &str = r#"{"user":"alice","email":"alice@example.com","url":"https://mail.example.com/owa/","confirmed":true}"#;
    const PENDING: &str = r#"{"user":"pending","url":"https://mail.example.com/owa/","confirmed":false}"#;

    /// Start an in-process directory service with a fixed set of records.
    async fn start_directory() -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let app = axum::Router::new().fallback(|uri: Uri| async move {
                let response: Response = match uri.path() {
                    "/users/alice.json" => (StatusCode::OK, ALICE).into_response(),
                    "/users/pending.json" => (StatusCode::OK, PENDING).into_response(),
                    "/users/broken.json" => (StatusCode::OK, "<html>").into_response(),
                    "/users/corp%5Cdave.json" => (
                        StatusCode::OK,
                        r#"{"user":"dave","url":"https://dave.example.com","confirmed":true}"#,
                    )
                        .into_response(),
                    "/moved/alice.json" => Redirect::temporary("/users/alice.json").into_response(),
                    "/users/flaky.json" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
                    _ => StatusCode::NOT_FOUND.into_response(),
                };
                response
            });
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), handle)
    }

    fn resolver(base: &str) -> UserContextResolver {
        UserContextResolver::new(Some(base.to_string()), reqwest::Client::new())
    }

    #[test]
    fn user_resource_single_separator() {
        assert_eq!(
            user_resource("https://dir.example.com/users", "alice"),
            "https://dir.example.com/users/alice.json"
        );
        assert_eq!(
            user_resource("https://dir.example.com/users/", "alice"),
            "https://dir.example.com/users/alice.json"
        );
    }

    #[test]
    fn user_resource_lowercases_and_encodes() {
        assert_eq!(
            user_resource("file:///srv/users", "CORP\\Dave"),
            "file:///srv/users/corp%5Cdave.json"
        );
        assert_eq!(
            user_resource("file:///srv/users", "Alice@Example.com"),
            "file:///srv/users/alice%40example.com.json"
        );
    }

    #[tokio::test]
    async fn missing_base_is_not_configured() {
        let r = UserContextResolver::new(None, reqwest::Client::new());
        assert!(matches!(r.resolve("alice").await, Err(Error::NotConfigured)));

        let blank = UserContextResolver::new(Some("  ".into()), reqwest::Client::new());
        assert!(blank.base().is_none());
        assert!(matches!(blank.resolve("alice").await, Err(Error::NotConfigured)));
    }

    #[tokio::test]
    async fn resolves_from_local_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("alice.json"), ALICE).unwrap();

        let base = format!("file://{}", dir.path().display());
        let ctx = resolver(&base).resolve("Alice").await.unwrap();
        assert_eq!(ctx.identity, "alice");
        assert_eq!(ctx.endpoint_url, "https://mail.example.com/owa/");
    }

    #[tokio::test]
    async fn missing_local_file_is_lookup_failure() {
        let dir = tempfile::tempdir().unwrap();
        let base = format!("file://{}/", dir.path().display());

        match resolver(&base).resolve("nobody").await {
            Err(Error::Lookup { user, kind, .. }) => {
                assert_eq!(user, "nobody");
                assert_eq!(kind, "io");
            }
            other => panic!("expected lookup failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unconfirmed_local_record_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pending.json"), PENDING).unwrap();

        let base = format!("file://{}", dir.path().display());
        let err = resolver(&base).resolve("pending").await.unwrap_err();
        assert!(matches!(err, Error::NotConfirmed(ref u) if u == "pending"), "got {err:?}");
    }

    #[tokio::test]
    async fn resolves_over_http() {
        let (url, _server) = start_directory().await;
        let ctx = resolver(&format!("{url}/users/")).resolve("alice").await.unwrap();
        assert_eq!(ctx.identity, "alice");
        assert_eq!(ctx.email, "alice@example.com");
    }

    #[tokio::test]
    async fn encodes_domain_names_over_http() {
        let (url, _server) = start_directory().await;
        let ctx = resolver(&format!("{url}/users"))
            .resolve("CORP\\dave")
            .await
            .unwrap();
        assert_eq!(ctx.identity, "dave");
    }

    #[tokio::test]
    async fn follows_redirects() {
        let (url, _server) = start_directory().await;
        let ctx = resolver(&format!("{url}/moved")).resolve("alice").await.unwrap();
        assert_eq!(ctx.identity, "alice");
    }

    #[tokio::test]
    async fn non_200_is_account_not_found() {
        let (url, _server) = start_directory().await;
        let r = resolver(&format!("{url}/users"));

        let err = r.resolve("ghost").await.unwrap_err();
        assert!(matches!(err, Error::AccountNotFound(ref u) if u == "ghost"), "got {err:?}");

        let err = r.resolve("flaky").await.unwrap_err();
        assert!(matches!(err, Error::AccountNotFound(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn unparseable_body_is_lookup_failure() {
        let (url, _server) = start_directory().await;
        let err = resolver(&format!("{url}/users"))
            .resolve("broken")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Lookup { kind: "json", .. }), "got {err:?}");
        assert!(err.to_string().contains("broken"));
    }

    #[tokio::test]
    async fn unconfirmed_http_record_is_rejected() {
        let (url, _server) = start_directory().await;
        let err = resolver(&format!("{url}/users"))
            .resolve("pending")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotConfirmed(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_directory_is_lookup_failure() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = resolver(&format!("http://{addr}/users"))
            .resolve("alice")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Lookup { kind: "http", .. }), "got {err:?}");
    }
}
