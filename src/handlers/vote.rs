use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use log::warn;
use std::sync::Arc;

use crate::db::Database;
use crate::voting::{TallyResults, VoteOutcome, VotePayload};

// Undecodable bodies are answered with `ok: false` like any other malformed vote
pub async fn vote_handler(
    State(db): State<Arc<Database>>,
    Path(trip_id): Path<String>,
    payload: Result<Json<VotePayload>, JsonRejection>,
) -> Json<VoteOutcome> {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            warn!("Unreadable vote body for trip {}: {}", trip_id, rejection.body_text());
            return Json(VoteOutcome { ok: false });
        }
    };

    Json(db.cast_vote(&trip_id, payload).await)
}

pub async fn results_handler(
    State(db): State<Arc<Database>>,
    Path(trip_id): Path<String>,
) -> Json<TallyResults> {
    Json(db.results(&trip_id).await)
}
