use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::AppError;
use crate::models::{Expense, round2};

// Balances inside this margin count as settled
const SETTLE_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseCreate {
    pub amount: f64,
    #[serde(default)]
    pub paid_by: String,
    #[serde(default)]
    pub split_between: Vec<String>,
    pub description: Option<String>,
}

impl ExpenseCreate {
    pub fn validate(self) -> Result<Expense, AppError> {
        let paid_by = self.paid_by.trim().to_string();
        let split_between: Vec<String> = self
            .split_between
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let description = match self.description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => "Expense".to_string(),
        };

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(AppError::bad_request("Amount must be > 0"));
        }
        if paid_by.is_empty() {
            return Err(AppError::bad_request("paid_by is required"));
        }
        if split_between.is_empty() {
            return Err(AppError::bad_request(
                "split_between must contain at least one name",
            ));
        }

        Ok(Expense {
            amount: self.amount,
            paid_by,
            split_between,
            description,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transfer {
    pub from_person: String,
    pub to_person: String,
    pub amount: f64,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}: £{:.2}", self.from_person, self.to_person, self.amount)
    }
}

// Net balance per person in first-seen order: positive is owed money
fn balances(expenses: &[Expense]) -> Vec<(String, f64)> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();

    let mut touch = |person: &str, delta: f64, order: &mut Vec<String>| {
        let balance = totals.entry(person.to_string()).or_insert_with(|| {
            order.push(person.to_string());
            0.0
        });
        *balance += delta;
    };

    for expense in expenses {
        let share = expense.amount / expense.split_between.len() as f64;
        touch(&expense.paid_by, expense.amount, &mut order);
        for person in &expense.split_between {
            touch(person, -share, &mut order);
        }
    }

    order
        .into_iter()
        .map(|person| {
            let balance = totals.get(&person).copied().unwrap_or(0.0);
            (person, balance)
        })
        .collect()
}

// Greedy settlement: the largest debtor pays the largest creditor until
// every balance is within a penny of zero.
pub fn calculate_settlements(expenses: &[Expense]) -> Vec<Transfer> {
    let mut creditors: Vec<(String, f64)> = Vec::new();
    let mut debtors: Vec<(String, f64)> = Vec::new();

    for (person, balance) in balances(expenses) {
        if balance > SETTLE_EPSILON {
            creditors.push((person, balance));
        } else if balance < -SETTLE_EPSILON {
            debtors.push((person, -balance));
        }
    }

    creditors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    debtors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut transfers = Vec::new();
    let (mut c, mut d) = (0, 0);

    while c < creditors.len() && d < debtors.len() {
        let amount = creditors[c].1.min(debtors[d].1);

        transfers.push(Transfer {
            from_person: debtors[d].0.clone(),
            to_person: creditors[c].0.clone(),
            amount,
        });

        creditors[c].1 -= amount;
        debtors[d].1 -= amount;

        if creditors[c].1 < SETTLE_EPSILON {
            c += 1;
        }
        if debtors[d].1 < SETTLE_EPSILON {
            d += 1;
        }
    }

    transfers
}

pub fn format_settlement_summary(transfers: &[Transfer]) -> String {
    if transfers.is_empty() {
        return "✅ All settled! No transfers needed.".to_string();
    }

    let mut summary = String::from("💰 Settlement Summary:\n");
    for transfer in transfers {
        summary.push_str(&format!("\n  {}", transfer));
    }
    summary
}

#[derive(Debug, Clone, Serialize)]
pub struct Settlement {
    pub trip_id: String,
    pub transfers: Vec<Transfer>,
    pub total_expenses: f64,
    pub summary: String,
}

pub fn settle(trip_id: &str, expenses: &[Expense]) -> Settlement {
    if expenses.is_empty() {
        return Settlement {
            trip_id: trip_id.to_string(),
            transfers: Vec::new(),
            total_expenses: 0.0,
            summary: "No expenses to settle".to_string(),
        };
    }

    let transfers = calculate_settlements(expenses);
    let summary = format_settlement_summary(&transfers);

    Settlement {
        trip_id: trip_id.to_string(),
        transfers: transfers
            .into_iter()
            .map(|t| Transfer {
                amount: round2(t.amount),
                ..t
            })
            .collect(),
        total_expenses: round2(expenses.iter().map(|e| e.amount).sum()),
        summary,
    }
}
