use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::error::AppError;
use crate::expenses::{self, ExpenseCreate, Settlement};
use crate::models::{self, Category, Expense, Member, Trip, TripOptions};
use crate::recommend::{self, Itinerary, Suggestion};
use crate::voting::{self, TallyResults, VoteOutcome, VotePayload, Winner};

#[derive(Debug, Clone, Serialize)]
pub struct TripSummary {
    pub trip_id: String,
    pub title: String,
    pub member_count: usize,
    pub total_spent: f64,
    pub winner: Winner,
    pub created_at: DateTime<Utc>,
}

// In-memory trip store shared by every request.
// Each trip sits behind its own mutex so votes on one trip are applied one
// at a time without blocking other trips.
pub struct Database {
    trips: RwLock<HashMap<String, Arc<Mutex<Trip>>>>,
    recommendation_limit: usize,
}

impl Database {
    pub fn new(recommendation_limit: usize) -> Self {
        Self {
            trips: RwLock::new(HashMap::new()),
            recommendation_limit,
        }
    }

    // Unknown ids are created with default contents
    async fn trip(&self, trip_id: &str) -> Arc<Mutex<Trip>> {
        if let Some(trip) = self.trips.read().await.get(trip_id) {
            return Arc::clone(trip);
        }

        let mut trips = self.trips.write().await;
        if !trips.contains_key(trip_id) {
            debug!("Creating trip {} ({} already in memory)", trip_id, trips.len());
        }
        let trip = trips
            .entry(trip_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Trip::new(trip_id.to_string()))));
        Arc::clone(trip)
    }

    #[cfg(test)]
    pub async fn trip_count(&self) -> usize {
        self.trips.read().await.len()
    }

    pub async fn create_trip(&self, title: Option<&str>) -> String {
        let trip_id = models::new_id();
        let trip = self.trip(&trip_id).await;
        let mut trip = trip.lock().await;
        trip.title = models::normalize_title(title);
        info!("Created trip {} ({})", trip_id, trip.title);
        trip_id
    }

    pub async fn trip_summary(&self, trip_id: &str) -> TripSummary {
        let trip = self.trip(trip_id).await;
        let trip = trip.lock().await;
        TripSummary {
            trip_id: trip.id.clone(),
            title: trip.title.clone(),
            member_count: trip.members.len(),
            total_spent: trip.total_spent(),
            winner: voting::tally(&trip.ledger).winner,
            created_at: trip.created_at,
        }
    }

    pub async fn rename_trip(&self, trip_id: &str, title: &str) -> Result<String, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::bad_request("Title cannot be empty"));
        }

        let trip = self.trip(trip_id).await;
        let mut trip = trip.lock().await;
        trip.title = title.to_string();
        info!("Renamed trip {} to {}", trip_id, trip.title);
        Ok(trip.title.clone())
    }

    pub async fn members(&self, trip_id: &str) -> Vec<Member> {
        let trip = self.trip(trip_id).await;
        let trip = trip.lock().await;
        trip.member_list()
    }

    pub async fn options(&self, trip_id: &str) -> (String, TripOptions) {
        let trip = self.trip(trip_id).await;
        let mut trip = trip.lock().await;
        trip.options.normalize();
        (trip.title.clone(), trip.options.clone())
    }

    pub async fn add_option(
        &self,
        trip_id: &str,
        category: Category,
        label: &str,
    ) -> Result<TripOptions, AppError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(AppError::bad_request("label cannot be empty"));
        }

        let trip = self.trip(trip_id).await;
        let mut trip = trip.lock().await;
        if trip.options.add(category, label) {
            info!("Added {} option {} to trip {}", category.as_str(), label, trip_id);
        }
        Ok(trip.options.clone())
    }

    pub async fn join(&self, trip_id: &str, name: Option<&str>) -> String {
        let member_id = models::new_id();
        let name = models::normalize_name(name);

        let trip = self.trip(trip_id).await;
        let mut trip = trip.lock().await;
        info!("{} joined trip {} as {}", name, trip_id, member_id);
        trip.members.insert(member_id.clone(), name);
        member_id
    }

    pub async fn cast_vote(&self, trip_id: &str, payload: VotePayload) -> VoteOutcome {
        let Some(ballot) = payload.into_ballot() else {
            warn!("Rejected malformed vote for trip {}", trip_id);
            return VoteOutcome { ok: false };
        };

        let trip = self.trip(trip_id).await;
        let mut trip = trip.lock().await;
        let previous = trip
            .ledger
            .choice_of(&ballot.member_id, ballot.category)
            .map(str::to_string);
        trip.ledger.apply(&ballot);
        info!(
            "Recorded vote: trip_id={}, member_id={}, {}={} (was {:?})",
            trip_id,
            ballot.member_id,
            ballot.category.as_str(),
            ballot.option,
            previous
        );
        debug!(
            "{} now has {} of {} {} votes",
            ballot.option,
            trip.ledger.votes_for(ballot.category, &ballot.option),
            trip.ledger.total_votes(ballot.category),
            ballot.category.as_str()
        );
        VoteOutcome { ok: true }
    }

    pub async fn results(&self, trip_id: &str) -> TallyResults {
        let trip = self.trip(trip_id).await;
        let trip = trip.lock().await;
        voting::tally(&trip.ledger)
    }

    pub async fn add_expense(
        &self,
        trip_id: &str,
        expense: ExpenseCreate,
    ) -> Result<(Expense, f64), AppError> {
        let expense = expense.validate()?;

        let trip = self.trip(trip_id).await;
        let mut trip = trip.lock().await;
        info!(
            "Recorded expense of {:.2} paid by {} on trip {}",
            expense.amount, expense.paid_by, trip_id
        );
        trip.expenses.push(expense.clone());
        Ok((expense, trip.total_spent()))
    }

    pub async fn expenses(&self, trip_id: &str) -> (Vec<Expense>, f64) {
        let trip = self.trip(trip_id).await;
        let trip = trip.lock().await;
        (trip.expenses.clone(), trip.total_spent())
    }

    pub async fn settle(&self, trip_id: &str) -> Settlement {
        let trip = self.trip(trip_id).await;
        let trip = trip.lock().await;
        expenses::settle(trip_id, &trip.expenses)
    }

    pub async fn recommendations(&self, trip_id: &str) -> Vec<Suggestion> {
        let trip = self.trip(trip_id).await;
        let trip = trip.lock().await;
        let winner = voting::tally(&trip.ledger).winner.destination;
        recommend::recommendations(
            winner.as_deref(),
            trip.options.get(Category::Destination),
            self.recommendation_limit,
        )
    }

    pub async fn itinerary(&self, trip_id: &str) -> Result<Itinerary, AppError> {
        let trip = self.trip(trip_id).await;
        let trip = trip.lock().await;
        let winner = voting::tally(&trip.ledger)
            .winner
            .destination
            .ok_or_else(|| AppError::bad_request("No destination selected yet. Vote first!"))?;
        Ok(recommend::itinerary(trip_id, &winner, self.recommendation_limit))
    }
}
