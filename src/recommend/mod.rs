use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub destination: String,
    pub reason: String,
}

impl Suggestion {
    fn new(destination: &str, reason: &str) -> Self {
        Self {
            destination: destination.to_string(),
            reason: reason.to_string(),
        }
    }
}

const STARTER_REASON: &str = "Vote first — here are starter ideas";
const WINNER_REASON: &str = "Winner of vote";
const STARTER_COUNT: usize = 3;

lazy_static! {
    // Anti-touristy picks keyed by lowercase city name
    static ref CURATED: HashMap<&'static str, Vec<Suggestion>> = {
        let mut m = HashMap::new();
        m.insert("london", vec![
            Suggestion::new("Little Venice canal walk", "✨ Calm waterside walk (less touristy)"),
            Suggestion::new("Victoria Park", "📍 Big local park with a relaxed vibe"),
            Suggestion::new("Columbia Road Flower Market (early)", "🌿 Local scene if you go early"),
        ]);
        m.insert("paris", vec![
            Suggestion::new("Parc des Buttes-Chaumont", "✨ Local hill-park views (less crowded)"),
            Suggestion::new("Canal Saint-Martin stroll", "📍 Local hangout area"),
            Suggestion::new("Marché d'Aligre", "🥐 Food market energy (not a mega-attraction)"),
        ]);
        m.insert("barcelona", vec![
            Suggestion::new("Poblenou Rambla", "✨ Local neighbourhood energy"),
            Suggestion::new("Parc del Clot", "📍 Chill park away from the main hotspots"),
            Suggestion::new("Sant Andreu streets", "☕ Small-town feel inside the city"),
        ]);
        m.insert("amsterdam", vec![
            Suggestion::new("Oosterpark", "✨ More local than the central canal loop"),
            Suggestion::new("De Pijp cafés (side streets)", "☕ Great vibe, less tourist flow"),
            Suggestion::new("Noord waterfront", "📍 Different side of the city"),
        ]);
        m.insert("lisbon", vec![
            Suggestion::new("Graça viewpoints", "✨ Quieter miradouros above Alfama"),
            Suggestion::new("Campo de Ourique market", "🥐 Neighbourhood food hall"),
            Suggestion::new("Marvila warehouses", "📍 Local breweries and galleries"),
        ]);
        m.insert("porto", vec![
            Suggestion::new("Jardins do Palácio de Cristal", "✨ Calm gardens with river views"),
            Suggestion::new("Bonfim side streets", "☕ Local cafés away from Ribeira"),
            Suggestion::new("Foz do Douro promenade", "📍 Seaside walk the locals use"),
        ]);
        m
    };

    static ref GENERIC: Vec<Suggestion> = vec![
        Suggestion::new("Local neighbourhood café", "☕ Anti-touristy pick (fallback)"),
        Suggestion::new("Less central park", "🌿 Quiet, local vibe (fallback)"),
        Suggestion::new("Independent food market", "🥐 Local scene (fallback)"),
    ];
}

fn curated(city: &str) -> Option<&'static [Suggestion]> {
    CURATED.get(city.trim().to_lowercase().as_str()).map(Vec::as_slice)
}

fn local_picks(city: &str) -> &'static [Suggestion] {
    curated(city).unwrap_or(GENERIC.as_slice())
}

// Suggestions for a trip given its winning destination (if any) and its
// destination options, capped at `limit`
pub fn recommendations(winner: Option<&str>, destinations: &[String], limit: usize) -> Vec<Suggestion> {
    let Some(winner) = winner else {
        return destinations
            .iter()
            .filter(|d| !d.trim().is_empty())
            .take(STARTER_COUNT.min(limit))
            .map(|d| Suggestion::new(d, STARTER_REASON))
            .collect();
    };

    std::iter::once(Suggestion::new(winner, WINNER_REASON))
        .chain(local_picks(winner).iter().cloned())
        .take(limit)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPlan {
    pub morning: String,
    pub afternoon: String,
    pub evening: String,
}

impl DayPlan {
    fn new(morning: String, afternoon: &str, evening: &str) -> Self {
        Self {
            morning,
            afternoon: afternoon.to_string(),
            evening: evening.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Itinerary {
    pub trip_id: String,
    pub destination: String,
    pub days: BTreeMap<String, DayPlan>,
    pub recommendations: Vec<Suggestion>,
}

// Three-day template for the winning destination. Curated places, when the
// city has them, replace the first few generic slots.
pub fn itinerary(trip_id: &str, destination: &str, limit: usize) -> Itinerary {
    let mut day_1 = DayPlan::new(
        format!("Explore {} (slow start)", destination),
        "Local lunch + walk",
        "Dinner in a neighbourhood",
    );
    let mut day_2 = DayPlan::new(
        "Museum / park".to_string(),
        "Markets / bookshops",
        "Low-key bars / sunset spot",
    );
    let day_3 = DayPlan::new("Brunch".to_string(), "Last sights", "Pack + depart");

    let places = curated(destination).unwrap_or(&[]);
    if let Some(place) = places.first() {
        day_1.morning = format!("Coffee / start at {}", place.destination);
    }
    if let Some(place) = places.get(1) {
        day_1.afternoon = format!("Wander around {}", place.destination);
    }
    if let Some(place) = places.get(2) {
        day_2.morning = format!("Go to {}", place.destination);
    }

    let mut days = BTreeMap::new();
    days.insert("day_1".to_string(), day_1);
    days.insert("day_2".to_string(), day_2);
    days.insert("day_3".to_string(), day_3);

    Itinerary {
        trip_id: trip_id.to_string(),
        destination: destination.to_string(),
        days,
        recommendations: local_picks(destination).iter().take(limit).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_starter_ideas_without_winner() {
        let dests = options(&["Lisbon", "Porto", "Barcelona", "Valencia"]);
        let suggestions = recommendations(None, &dests, 6);
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].destination, "Lisbon");
        assert!(suggestions.iter().all(|s| s.reason == STARTER_REASON));
    }

    #[test]
    fn test_winner_comes_first() {
        let suggestions = recommendations(Some("Paris"), &[], 6);
        assert_eq!(suggestions[0], Suggestion::new("Paris", WINNER_REASON));
        assert_eq!(suggestions[1].destination, "Parc des Buttes-Chaumont");
        assert_eq!(suggestions.len(), 4);
    }

    #[test]
    fn test_unknown_city_uses_generic_picks() {
        let suggestions = recommendations(Some("Reykjavik"), &[], 6);
        assert_eq!(suggestions[0].destination, "Reykjavik");
        assert_eq!(suggestions[1].destination, "Local neighbourhood café");
    }

    #[test]
    fn test_limit_is_respected() {
        assert_eq!(recommendations(Some("London"), &[], 2).len(), 2);
        assert!(recommendations(Some("London"), &[], 0).is_empty());
    }

    #[test]
    fn test_city_lookup_ignores_case() {
        assert!(curated("  AMSTERDAM ").is_some());
    }

    #[test]
    fn test_itinerary_uses_curated_places() {
        let plan = itinerary("t1", "Barcelona", 6);
        assert_eq!(plan.days["day_1"].morning, "Coffee / start at Poblenou Rambla");
        assert_eq!(plan.days["day_1"].afternoon, "Wander around Parc del Clot");
        assert_eq!(plan.days["day_2"].morning, "Go to Sant Andreu streets");
        assert_eq!(plan.days["day_3"].evening, "Pack + depart");
        assert_eq!(plan.recommendations.len(), 3);
    }

    #[test]
    fn test_itinerary_template_for_unknown_city() {
        let plan = itinerary("t1", "Valencia", 6);
        assert_eq!(plan.days["day_1"].morning, "Explore Valencia (slow start)");
        assert_eq!(plan.days["day_2"].morning, "Museum / park");
        assert_eq!(plan.days.len(), 3);
    }
}
