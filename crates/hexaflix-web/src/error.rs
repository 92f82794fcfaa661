use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use hexaflix_core::error::HexaflixError;

/// Application error type that renders as an HTML error page.
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("web error: {:#}", self.0);

        let body = format!(
            r#"<!doctype html>
<html><head><title>Error — HexaFlix</title>
<style>body{{font-family:system-ui;background:#10131a;color:#e6e6e6;display:flex;justify-content:center;align-items:center;height:100vh;margin:0}}
.err{{background:#1a2030;padding:2rem;border-radius:8px;border-left:4px solid #e74c3c;max-width:600px}}
h1{{color:#e74c3c;margin-top:0}}pre{{white-space:pre-wrap;color:#aaa}}</style>
</head><body><div class="err"><h1>Something went wrong</h1>
<p>Please try again later.</p>
<pre>{}</pre>
<p><a href="/" style="color:#e50914">Back to home</a></p></div></body></html>"#,
            html_escape(&format!("{:#}", self.0))
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// JSON API error type for REST endpoints.
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<HexaflixError> for ApiError {
    fn from(err: HexaflixError) -> Self {
        match &err {
            HexaflixError::NotFound(_) => Self::not_found(err.to_string()),
            HexaflixError::InvalidInput(_) => Self::bad_request(err.to_string()),
            _ => {
                tracing::error!("api error: {err}");
                Self::internal(err.to_string())
            }
        }
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
