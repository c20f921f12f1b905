pub mod ledger;
pub mod tally;

use serde::{Deserialize, Serialize};

use crate::models::Category;

pub use ledger::VoteLedger;
pub use tally::tally;

// Raw vote body as sent by the client; every field may be missing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VotePayload {
    pub member_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub option: Option<String>,
}

// A vote that passed shape checks; labels are kept exactly as sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    pub member_id: String,
    pub category: Category,
    pub option: String,
}

impl VotePayload {
    pub fn into_ballot(self) -> Option<Ballot> {
        let member_id = non_blank(self.member_id)?;
        let category = Category::parse(&non_blank(self.kind)?)?;
        let option = non_blank(self.option)?;
        Some(Ballot {
            member_id,
            category,
            option,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteOutcome {
    pub ok: bool,
}

// One ranked row of a category tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyEntry {
    pub option: String,
    pub votes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub destination: Option<String>,
    pub dates: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyResults {
    pub destinations: Vec<TallyEntry>,
    pub dates: Vec<TallyEntry>,
    pub winner: Winner,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(member_id: Option<&str>, kind: Option<&str>, option: Option<&str>) -> VotePayload {
        VotePayload {
            member_id: member_id.map(str::to_string),
            kind: kind.map(str::to_string),
            option: option.map(str::to_string),
        }
    }

    #[test]
    fn test_complete_payload_becomes_ballot() {
        let ballot = payload(Some("m1"), Some("destination"), Some("Lisbon"))
            .into_ballot()
            .unwrap();
        assert_eq!(ballot.member_id, "m1");
        assert_eq!(ballot.category, Category::Destination);
        assert_eq!(ballot.option, "Lisbon");
    }

    #[test]
    fn test_option_label_is_not_trimmed() {
        let ballot = payload(Some("m1"), Some("destination"), Some(" Lisbon"))
            .into_ballot()
            .unwrap();
        assert_eq!(ballot.option, " Lisbon");
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        assert!(payload(None, Some("dates"), Some("Mar 1 - Mar 3")).into_ballot().is_none());
        assert!(payload(Some("m1"), None, Some("Lisbon")).into_ballot().is_none());
        assert!(payload(Some("m1"), Some("destination"), None).into_ballot().is_none());
        assert!(payload(Some("  "), Some("destination"), Some("Lisbon")).into_ballot().is_none());
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        assert!(payload(Some("m1"), Some("budget"), Some("cheap")).into_ballot().is_none());
    }

    #[test]
    fn test_payload_deserializes_type_field() {
        let raw = r#"{"member_id":"m1","type":"dates","option":"Feb 7 - Feb 9"}"#;
        let parsed: VotePayload = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.kind.as_deref(), Some("dates"));

        let empty: VotePayload = serde_json::from_str("{}").unwrap();
        assert!(empty.into_ballot().is_none());
    }

    #[test]
    fn test_empty_winner_serializes_as_nulls() {
        let json = serde_json::to_value(TallyResults::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "destinations": [],
                "dates": [],
                "winner": { "destination": null, "dates": null }
            })
        );
    }
}
