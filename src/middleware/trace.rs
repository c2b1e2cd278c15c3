//! TraceLayer span maker that keeps OAuth secrets out of the logs.
//!
//! OAuth callbacks carry the authorization `code` and `state` in the query
//! string; both are redacted before the URI is recorded on the span.

use axum::http::{Request, Uri};
use tower_http::trace::MakeSpan;
use tracing::Span;

const SENSITIVE_PARAMS: &[&str] = &[
    "code",
    "state",
    "access_token",
    "token",
    "password",
    "client_secret",
];

const REDACTED: &str = "[REDACTED]";

#[derive(Clone, Debug)]
pub struct SanitizedMakeSpan;

impl<B> MakeSpan<B> for SanitizedMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "http",
            method = %request.method(),
            uri = %sanitize_uri(request.uri()),
        )
    }
}

/// `/api/auth/google/callback?code=4/0Ab&state=xyz` becomes
/// `/api/auth/google/callback?code=[REDACTED]&state=[REDACTED]`
fn sanitize_uri(uri: &Uri) -> String {
    let Some(query) = uri.query() else {
        return uri.path().to_string();
    };

    let pairs: Vec<String> = url::form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| {
            if is_sensitive(&key) {
                format!("{key}={REDACTED}")
            } else if value.is_empty() {
                key.into_owned()
            } else {
                format!("{key}={value}")
            }
        })
        .collect();

    format!("{}?{}", uri.path(), pairs.join("&"))
}

fn is_sensitive(key: &str) -> bool {
    SENSITIVE_PARAMS
        .iter()
        .any(|s| key.eq_ignore_ascii_case(s))
}
