use crate::models::Category;
use crate::voting::Ballot;
use log::debug;
use std::collections::HashMap;

// Live count for one option. `seq` records when the entry was created so
// equal counts rank in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionCount {
    pub votes: u32,
    pub seq: u64,
}

// Per-trip vote counts plus each member's current choice per category.
// A member holds at most one counted vote per category. Options whose count
// drops to zero are removed rather than kept at zero.
#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    counts: HashMap<Category, HashMap<String, OptionCount>>,
    choices: HashMap<String, HashMap<Category, String>>,
    next_seq: u64,
}

impl VoteLedger {
    pub fn apply(&mut self, ballot: &Ballot) {
        self.apply_vote(&ballot.member_id, ballot.category, &ballot.option);
    }

    pub fn apply_vote(&mut self, member_id: &str, category: Category, option: &str) {
        let previous = self
            .choices
            .get(member_id)
            .and_then(|choices| choices.get(&category))
            .cloned();

        if previous.as_deref() == Some(option) {
            debug!("Member {} repeated {} vote for {}", member_id, category.as_str(), option);
        }

        let counts = self.counts.entry(category).or_default();

        if let Some(previous) = previous {
            if let Some(entry) = counts.get_mut(&previous) {
                entry.votes = entry.votes.saturating_sub(1);
                if entry.votes == 0 {
                    counts.remove(&previous);
                }
            }
        }

        match counts.get_mut(option) {
            Some(entry) => entry.votes += 1,
            None => {
                counts.insert(
                    option.to_string(),
                    OptionCount {
                        votes: 1,
                        seq: self.next_seq,
                    },
                );
                self.next_seq += 1;
            }
        }

        self.choices
            .entry(member_id.to_string())
            .or_default()
            .insert(category, option.to_string());
    }

    pub fn votes_for(&self, category: Category, option: &str) -> u32 {
        self.counts
            .get(&category)
            .and_then(|counts| counts.get(option))
            .map(|entry| entry.votes)
            .unwrap_or(0)
    }

    pub fn choice_of(&self, member_id: &str, category: Category) -> Option<&str> {
        self.choices
            .get(member_id)
            .and_then(|choices| choices.get(&category))
            .map(String::as_str)
    }

    pub fn total_votes(&self, category: Category) -> u32 {
        self.counts
            .get(&category)
            .map(|counts| counts.values().map(|entry| entry.votes).sum())
            .unwrap_or(0)
    }

    pub fn entries(&self, category: Category) -> impl Iterator<Item = (&str, OptionCount)> {
        self.counts
            .get(&category)
            .into_iter()
            .flat_map(|counts| counts.iter().map(|(option, entry)| (option.as_str(), *entry)))
    }
}
