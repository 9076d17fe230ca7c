//! Route definitions for the edge service.

mod posts;

use axum::Router;

use crate::assets::AssetResolver;
use crate::state::AppState;
use crate::store::DocumentStore;

/// Builds the service router.
///
/// Everything is one fallback: the pipeline owns path matching (the optional
/// trailing slash rules out axum's exact-path dispatch) and decides per
/// request between rewriting and pass-through, so the asset origin is
/// consulted exactly once no matter where a request lands.
pub fn router<A: AssetResolver, S: DocumentStore>(state: AppState<A, S>) -> Router {
    Router::new()
        .fallback(posts::edge_entry::<A, S>)
        .with_state(state)
}
