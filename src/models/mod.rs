use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::voting::VoteLedger;

pub const DEFAULT_TITLE: &str = "Weekend Trip";
pub const ANONYMOUS: &str = "Anonymous";

const DEFAULT_DESTINATIONS: [&str; 5] = ["Lisbon", "Porto", "Barcelona", "Valencia", "Amsterdam"];
const DEFAULT_DATES: [&str; 4] = [
    "Feb 7 - Feb 9",
    "Feb 14 - Feb 16",
    "Mar 1 - Mar 3",
    "Mar 8 - Mar 10",
];

// A dimension being voted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Destination,
    Dates,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Destination, Category::Dates];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "destination" => Some(Category::Destination),
            "dates" => Some(Category::Dates),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Destination => "destination",
            Category::Dates => "dates",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripOptions {
    pub destination: Vec<String>,
    pub dates: Vec<String>,
}

impl Default for TripOptions {
    fn default() -> Self {
        Self {
            destination: DEFAULT_DESTINATIONS.iter().map(|s| s.to_string()).collect(),
            dates: DEFAULT_DATES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TripOptions {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Destination => &self.destination,
            Category::Dates => &self.dates,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Destination => &mut self.destination,
            Category::Dates => &mut self.dates,
        }
    }

    // Trim, drop blanks and case-insensitive duplicates in both lists
    pub fn normalize(&mut self) {
        for category in Category::ALL {
            let list = self.get_mut(category);
            *list = dedupe_keep_order(list);
        }
    }

    // Returns false when the label was already present
    pub fn add(&mut self, category: Category, label: &str) -> bool {
        let list = self.get_mut(category);
        let lowered = label.to_lowercase();
        let exists = list.iter().any(|x| x.trim().to_lowercase() == lowered);
        if !exists {
            list.insert(0, label.to_string());
        }
        *list = dedupe_keep_order(list);
        !exists
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub amount: f64,
    pub paid_by: String,
    pub split_between: Vec<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub member_id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Trip {
    pub id: String,
    pub title: String,
    pub members: HashMap<String, String>,
    pub options: TripOptions,
    pub ledger: VoteLedger,
    pub expenses: Vec<Expense>,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn new(id: String) -> Self {
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            members: HashMap::new(),
            options: TripOptions::default(),
            ledger: VoteLedger::default(),
            expenses: Vec::new(),
            created_at: Utc::now(),
        }
    }

    // Members sorted by display name, case-insensitively
    pub fn member_list(&self) -> Vec<Member> {
        let mut members: Vec<Member> = self
            .members
            .iter()
            .map(|(id, name)| Member {
                member_id: id.clone(),
                name: name.clone(),
            })
            .collect();
        members.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.member_id.cmp(&b.member_id))
        });
        members
    }

    pub fn total_spent(&self) -> f64 {
        round2(self.expenses.iter().map(|e| e.amount).sum())
    }
}

// Short lowercase identifier used for trips and members
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

pub fn normalize_title(raw: Option<&str>) -> String {
    normalize_or(raw, DEFAULT_TITLE)
}

pub fn normalize_name(raw: Option<&str>) -> String {
    normalize_or(raw, ANONYMOUS)
}

fn normalize_or(raw: Option<&str>, fallback: &str) -> String {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => fallback.to_string(),
    }
}

pub fn dedupe_keep_order(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .filter(|x| seen.insert(x.to_lowercase()))
        .map(str::to_string)
        .collect()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
