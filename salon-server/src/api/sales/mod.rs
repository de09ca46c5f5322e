//! Sales API
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /api/sales | GET, POST | list newest first / record a sale |
//! | /api/sales/summary?period&date | GET | period summary vs the previous period |
//! | /api/sales/goals | GET, PUT | monthly goals |
//! | /api/sales/{id} | GET, PUT, DELETE | single record |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sales", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/summary", get(handler::summary))
        .route("/goals", get(handler::get_goals).put(handler::replace_goals))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
