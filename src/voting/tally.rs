use crate::models::Category;
use crate::voting::{TallyEntry, TallyResults, VoteLedger, Winner};

pub fn tally(ledger: &VoteLedger) -> TallyResults {
    let destinations = ranked(ledger, Category::Destination);
    let dates = ranked(ledger, Category::Dates);

    let winner = Winner {
        destination: destinations.first().map(|entry| entry.option.clone()),
        dates: dates.first().map(|entry| entry.option.clone()),
    };

    TallyResults {
        destinations,
        dates,
        winner,
    }
}

// Highest count first; equal counts keep the order their entries were created in
fn ranked(ledger: &VoteLedger, category: Category) -> Vec<TallyEntry> {
    let mut rows: Vec<(&str, u32, u64)> = ledger
        .entries(category)
        .filter(|(_, entry)| entry.votes > 0)
        .map(|(option, entry)| (option, entry.votes, entry.seq))
        .collect();

    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    rows.into_iter()
        .map(|(option, votes, _)| TallyEntry {
            option: option.to_string(),
            votes,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEST: Category = Category::Destination;

    fn entry(option: &str, votes: u32) -> TallyEntry {
        TallyEntry {
            option: option.to_string(),
            votes,
        }
    }

    #[test]
    fn test_empty_ledger_has_no_winner() {
        let results = tally(&VoteLedger::default());
        assert!(results.destinations.is_empty());
        assert!(results.dates.is_empty());
        assert_eq!(results.winner, Winner::default());
    }

    #[test]
    fn test_changed_vote_leaves_only_new_choice() {
        let mut ledger = VoteLedger::default();
        ledger.apply_vote("m1", DEST, "Lisbon");
        ledger.apply_vote("m1", DEST, "Porto");

        let results = tally(&ledger);
        assert_eq!(results.destinations, vec![entry("Porto", 1)]);
        assert_eq!(results.winner.destination.as_deref(), Some("Porto"));
        assert_eq!(results.winner.dates, None);
    }

    #[test]
    fn test_two_members_same_option() {
        let mut ledger = VoteLedger::default();
        ledger.apply_vote("m1", DEST, "Lisbon");
        ledger.apply_vote("m2", DEST, "Lisbon");

        let results = tally(&ledger);
        assert_eq!(results.destinations, vec![entry("Lisbon", 2)]);
        assert_eq!(results.winner.destination.as_deref(), Some("Lisbon"));
    }

    #[test]
    fn test_sorted_descending() {
        let mut ledger = VoteLedger::default();
        ledger.apply_vote("m1", DEST, "Porto");
        ledger.apply_vote("m2", DEST, "Lisbon");
        ledger.apply_vote("m3", DEST, "Lisbon");
        ledger.apply_vote("m4", DEST, "Rome");
        ledger.apply_vote("m5", DEST, "Rome");
        ledger.apply_vote("m6", DEST, "Rome");

        let results = tally(&ledger);
        let votes: Vec<u32> = results.destinations.iter().map(|e| e.votes).collect();
        assert_eq!(votes, vec![3, 2, 1]);
        assert_eq!(results.winner.destination.as_deref(), Some("Rome"));
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut ledger = VoteLedger::default();
        ledger.apply_vote("m1", DEST, "Valencia");
        ledger.apply_vote("m2", DEST, "Amsterdam");
        ledger.apply_vote("m3", DEST, "Barcelona");

        let results = tally(&ledger);
        assert_eq!(
            results.destinations,
            vec![entry("Valencia", 1), entry("Amsterdam", 1), entry("Barcelona", 1)]
        );
        assert_eq!(results.winner.destination.as_deref(), Some("Valencia"));
    }

    #[test]
    fn test_repeated_vote_moves_behind_ties() {
        let mut ledger = VoteLedger::default();
        ledger.apply_vote("m1", DEST, "Lisbon");
        ledger.apply_vote("m2", DEST, "Porto");
        ledger.apply_vote("m1", DEST, "Lisbon");

        let results = tally(&ledger);
        assert_eq!(results.destinations, vec![entry("Porto", 1), entry("Lisbon", 1)]);
        assert_eq!(results.winner.destination.as_deref(), Some("Porto"));
    }

    #[test]
    fn test_pruned_option_never_listed_at_zero() {
        let mut ledger = VoteLedger::default();
        ledger.apply_vote("m1", DEST, "Lisbon");
        ledger.apply_vote("m1", DEST, "Porto");
        ledger.apply_vote("m1", Category::Dates, "Feb 7 - Feb 9");

        let results = tally(&ledger);
        assert!(results.destinations.iter().all(|e| e.votes > 0));
        assert!(!results.destinations.iter().any(|e| e.option == "Lisbon"));
        assert_eq!(results.dates, vec![entry("Feb 7 - Feb 9", 1)]);
    }
}
