mod api;
mod home;
mod movies;
mod search;
mod setup;
mod watchlist;

use std::sync::Arc;

use axum::Router;

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    home::routes()
        .merge(movies::routes())
        .merge(search::routes())
        .merge(watchlist::routes())
        .merge(setup::routes())
        .merge(api::routes())
}

#[cfg(test)]
mod tests;
