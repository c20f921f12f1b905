mod vote;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::db::{Database, TripSummary};
use crate::error::AppError;
use crate::expenses::{ExpenseCreate, Settlement};
use crate::models::Category;
use crate::recommend::Itinerary;

#[derive(Debug, Default, Deserialize)]
pub struct TripCreate {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TripUpdate {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct JoinTrip {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptionCreate {
    #[serde(rename = "type")]
    pub kind: Category,
    #[serde(default)]
    pub label: String,
}

pub fn router(database: Arc<Database>, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    Router::new()
        .route("/", get(root_handler))
        .route("/trip", post(create_trip_handler))
        .route("/trip/{trip_id}", get(get_trip_handler).put(update_trip_handler))
        .route("/trip/{trip_id}/members", get(members_handler))
        .route("/trip/{trip_id}/options", get(options_handler).post(add_option_handler))
        .route("/trip/{trip_id}/join", post(join_handler))
        .route("/trip/{trip_id}/vote", post(vote::vote_handler))
        .route("/trip/{trip_id}/results", get(vote::results_handler))
        .route("/trip/{trip_id}/recommendations", get(recommendations_handler))
        .route("/trip/{trip_id}/itinerary", get(itinerary_handler))
        .route("/trip/{trip_id}/expense", post(add_expense_handler))
        .route("/trip/{trip_id}/expenses", get(expenses_handler))
        .route("/trip/{trip_id}/settle", get(settle_handler))
        .layer(cors)
        .with_state(database)
}

async fn root_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Trip vote API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn create_trip_handler(
    State(db): State<Arc<Database>>,
    body: Option<Json<TripCreate>>,
) -> Json<Value> {
    let Json(body) = body.unwrap_or_default();
    let trip_id = db.create_trip(body.title.as_deref()).await;
    Json(json!({ "trip_id": trip_id }))
}

async fn get_trip_handler(
    State(db): State<Arc<Database>>,
    Path(trip_id): Path<String>,
) -> Json<TripSummary> {
    Json(db.trip_summary(&trip_id).await)
}

async fn update_trip_handler(
    State(db): State<Arc<Database>>,
    Path(trip_id): Path<String>,
    Json(update): Json<TripUpdate>,
) -> Result<Json<Value>, AppError> {
    let title = db.rename_trip(&trip_id, &update.title).await?;
    Ok(Json(json!({ "ok": true, "title": title })))
}

async fn members_handler(
    State(db): State<Arc<Database>>,
    Path(trip_id): Path<String>,
) -> Json<Value> {
    Json(json!({ "members": db.members(&trip_id).await }))
}

async fn options_handler(
    State(db): State<Arc<Database>>,
    Path(trip_id): Path<String>,
) -> Json<Value> {
    let (title, options) = db.options(&trip_id).await;
    Json(json!({ "title": title, "options": options }))
}

async fn add_option_handler(
    State(db): State<Arc<Database>>,
    Path(trip_id): Path<String>,
    Json(option): Json<OptionCreate>,
) -> Result<Json<Value>, AppError> {
    let options = db.add_option(&trip_id, option.kind, &option.label).await?;
    Ok(Json(json!({ "ok": true, "options": options })))
}

async fn join_handler(
    State(db): State<Arc<Database>>,
    Path(trip_id): Path<String>,
    body: Option<Json<JoinTrip>>,
) -> Json<Value> {
    let Json(body) = body.unwrap_or_default();
    let member_id = db.join(&trip_id, body.name.as_deref()).await;
    Json(json!({ "member_id": member_id }))
}

async fn recommendations_handler(
    State(db): State<Arc<Database>>,
    Path(trip_id): Path<String>,
) -> Json<Value> {
    Json(json!({ "suggestions": db.recommendations(&trip_id).await }))
}

async fn itinerary_handler(
    State(db): State<Arc<Database>>,
    Path(trip_id): Path<String>,
) -> Result<Json<Itinerary>, AppError> {
    Ok(Json(db.itinerary(&trip_id).await?))
}

async fn add_expense_handler(
    State(db): State<Arc<Database>>,
    Path(trip_id): Path<String>,
    Json(expense): Json<ExpenseCreate>,
) -> Result<Json<Value>, AppError> {
    let (expense, total_spent) = db.add_expense(&trip_id, expense).await?;
    Ok(Json(json!({ "ok": true, "expense": expense, "total_spent": total_spent })))
}

async fn expenses_handler(
    State(db): State<Arc<Database>>,
    Path(trip_id): Path<String>,
) -> Json<Value> {
    let (expenses, total_spent) = db.expenses(&trip_id).await;
    Json(json!({ "expenses": expenses, "total_spent": total_spent }))
}

async fn settle_handler(
    State(db): State<Arc<Database>>,
    Path(trip_id): Path<String>,
) -> Json<Settlement> {
    Json(db.settle(&trip_id).await)
}
