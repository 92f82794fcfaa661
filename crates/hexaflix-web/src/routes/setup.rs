use std::sync::Arc;

use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use hexaflix_core::model::{validate_api_key, Session};
use serde::Deserialize;

use crate::error::AppError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/setup", get(setup_form).post(save_key))
        .route("/logout", post(logout))
}

#[derive(Template)]
#[template(path = "setup.html")]
struct SetupTemplate {
    error: String,
}

#[derive(Deserialize)]
pub struct SetupForm {
    api_key: String,
    #[serde(default)]
    username: String,
}

async fn setup_form() -> Result<Html<String>, AppError> {
    let tmpl = SetupTemplate {
        error: String::new(),
    };
    Ok(Html(tmpl.render()?))
}

async fn save_key(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SetupForm>,
) -> Result<Response, AppError> {
    let api_key = form.api_key.trim().to_string();
    if let Err(e) = validate_api_key(&api_key) {
        return render_error(e.to_string());
    }

    // Probe the key against the live API before saving it.
    let client = state.install_client(&api_key)?;
    match client.validate_key().await {
        Ok(true) => {}
        Ok(false) => {
            state.clear_client();
            return render_error("Invalid API key. Please try again.".to_string());
        }
        Err(e) => {
            state.clear_client();
            tracing::warn!("key validation failed: {e}");
            return render_error(
                "Could not reach the metadata service. Please try again later.".to_string(),
            );
        }
    }

    let mut session = Session::new(api_key);
    let username = form.username.trim();
    if !username.is_empty() {
        session = session.with_username(username.to_string());
    }
    state.profile.login(&session)?;

    Ok(Redirect::to("/").into_response())
}

async fn logout(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    state.profile.logout()?;
    state.clear_client();
    Ok(Redirect::to("/setup").into_response())
}

fn render_error(error: String) -> Result<Response, AppError> {
    let tmpl = SetupTemplate { error };
    Ok(Html(tmpl.render()?).into_response())
}
