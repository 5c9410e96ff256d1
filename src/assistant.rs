use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::catalog::{self, Restaurant, CUISINE_KEYWORDS, MOOD_KEYWORDS, RESTAURANTS};

const GREETINGS: &[&str] = &[
    "Hey there, foodie! 🍽️",
    "Namaste! Ready to find something delicious?",
    "Hello! Let's satisfy those cravings!",
    "Hey! What's your tummy telling you today?",
];

const SURPRISE_INTROS: &[&str] = &[
    "Feeling adventurous? Here's my pick for you:",
    "Close your eyes and trust me on this one:",
    "The food gods have spoken! Try this:",
    "Let fate decide your next meal:",
];

const NO_MATCH_EXPLANATION: &str =
    "Hmm, I couldn't find an exact match, but here are some popular spots you might like!";
const NO_MATCH_FOLLOW_UP: &str =
    "Try telling me more about your mood or what cuisine you're craving!";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub restaurants: Vec<Restaurant>,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
}

pub fn greeting() -> &'static str {
    GREETINGS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(GREETINGS[0])
}

/// Mood labels whose keyword list matches the query. Case-insensitive
/// substring search, first keyword hit per mood is enough.
fn detect_moods(query: &str) -> Vec<&'static str> {
    let query = query.to_lowercase();
    MOOD_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| query.contains(kw)))
        .map(|(mood, _)| *mood)
        .collect()
}

/// Price tier signalled by the query, if any. 1 = budget, 2 = moderate,
/// 3 = expensive.
fn detect_price_preference(query: &str) -> Option<u8> {
    let query = query.to_lowercase();

    if ["cheap", "budget", "affordable", "pocket"]
        .iter()
        .any(|kw| query.contains(kw))
    {
        return Some(1);
    }
    if ["expensive", "premium", "fancy", "special occasion"]
        .iter()
        .any(|kw| query.contains(kw))
    {
        return Some(3);
    }
    if ["moderate", "mid-range"].iter().any(|kw| query.contains(kw)) {
        return Some(2);
    }

    None
}

fn detect_cuisines(query: &str) -> Vec<&'static str> {
    let query = query.to_lowercase();
    CUISINE_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| query.contains(kw)))
        .map(|(cuisine, _)| *cuisine)
        .collect()
}

/// Signal score from matched moods, price and cuisines, without the rating
/// bonus. Zero means the query matched nothing about this restaurant.
fn signal_score(
    restaurant: &Restaurant,
    moods: &[&str],
    price: Option<u8>,
    cuisines: &[&str],
) -> f32 {
    let mut score = 0.0;

    for mood in moods {
        let keywords = catalog::mood_keywords(mood);
        let tag_hit = restaurant
            .tags
            .iter()
            .any(|tag| keywords.contains(&tag.as_str()) || tag.contains(mood));
        if tag_hit {
            score += 3.0;
        }
    }

    if let Some(price) = price {
        if restaurant.price_range == price {
            score += 4.0;
        } else if restaurant.price_range.abs_diff(price) == 1 {
            score += 1.0;
        }
    }

    for cuisine in cuisines {
        let cuisine = cuisine.to_lowercase();
        if restaurant
            .cuisine
            .iter()
            .any(|c| c.to_lowercase().contains(&cuisine))
        {
            score += 5.0;
        }
    }

    score
}

fn generate_explanation(restaurant: &Restaurant, moods: &[&str], price: Option<u8>) -> String {
    let mut reasons: Vec<&str> = Vec::new();

    if price == Some(1) && restaurant.price_range == 1 {
        reasons.push("it's super budget-friendly");
    }
    if moods.contains(&"comfort") && restaurant.tags.iter().any(|t| t == "comfort" || t == "cozy") {
        reasons.push("it's the perfect comfort food");
    }
    if moods.contains(&"cheesy") && restaurant.tags.iter().any(|t| t.contains("chees")) {
        reasons.push("they've got the cheesiest options in town");
    }
    if moods.contains(&"spicy") && restaurant.tags.iter().any(|t| t == "spicy") {
        reasons.push("they bring the heat you're looking for");
    }
    if moods.contains(&"late-night") && restaurant.tags.iter().any(|t| t == "late-night") {
        reasons.push("they're open late for those midnight cravings");
    }
    if moods.contains(&"healthy") && restaurant.tags.iter().any(|t| t == "healthy") {
        reasons.push("it's fresh and healthy without compromising on taste");
    }
    if moods.contains(&"filling") && restaurant.tags.iter().any(|t| t == "filling") {
        reasons.push("their portions are legendary");
    }

    if reasons.is_empty() {
        reasons.push("it matches what you're looking for");
    }

    let specialty_note = restaurant
        .specialties
        .first()
        .map(|dish| format!(" Their {} is a must-try!", dish))
        .unwrap_or_default();

    format!(
        "Try **{}** because {}!{}",
        restaurant.name,
        reasons.join(" and "),
        specialty_note
    )
}

/// Score the whole catalog against the query and return the top 3 with a
/// templated explanation. Falls back to the first 3 catalog entries when no
/// signal matched any restaurant.
pub fn recommend(query: &str) -> RecommendationResult {
    let moods = detect_moods(query);
    let price = detect_price_preference(query);
    let cuisines = detect_cuisines(query);

    info!(
        "Recommendation query {:?}: moods={:?} price={:?} cuisines={:?}",
        query, moods, price, cuisines
    );

    let mut scored: Vec<(f32, f32, &'static Restaurant)> = RESTAURANTS
        .iter()
        .map(|r| {
            let signal = signal_score(r, &moods, price, &cuisines);
            (signal, signal + r.rating * 0.5, r)
        })
        .collect();

    // Stable sort: catalog order breaks ties.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    if scored.iter().all(|(signal, _, _)| *signal == 0.0) {
        debug!("No signal matched for query {:?}, using fallback", query);
        return RecommendationResult {
            restaurants: RESTAURANTS.iter().take(3).cloned().collect(),
            explanation: NO_MATCH_EXPLANATION.to_string(),
            follow_up: Some(NO_MATCH_FOLLOW_UP.to_string()),
        };
    }

    let top: Vec<&'static Restaurant> = scored.iter().take(3).map(|(_, _, r)| *r).collect();
    debug!(
        "Top picks for {:?}: {:?}",
        query,
        top.iter().map(|r| &r.name).collect::<Vec<_>>()
    );

    let explanation = generate_explanation(top[0], &moods, price);
    let follow_up = match top.len() {
        0 | 1 => None,
        2 => Some(format!(
            "Also check out **{}** and **{}** for similar vibes!",
            top[1].name, top[1].name
        )),
        _ => Some(format!(
            "Also check out **{}** and **{}** for similar vibes!",
            top[1].name, top[2].name
        )),
    };

    RecommendationResult {
        restaurants: top.into_iter().cloned().collect(),
        explanation,
        follow_up,
    }
}

/// Weighted random single pick, higher-rated places drawn more often.
pub fn surprise() -> RecommendationResult {
    let mut rng = rand::thread_rng();

    let weighted: Vec<&'static Restaurant> = RESTAURANTS
        .iter()
        .flat_map(|r| {
            let copies = (r.rating * 2.0).round().max(1.0) as usize;
            std::iter::repeat(r).take(copies)
        })
        .collect();

    let pick = weighted[rng.gen_range(0..weighted.len())];
    info!("Surprise pick: {}", pick.name);

    let intro = SURPRISE_INTROS
        .choose(&mut rng)
        .copied()
        .unwrap_or(SURPRISE_INTROS[0]);

    let fun_facts = [
        format!("With a {}⭐ rating, this place is loved by many!", pick.rating),
        pick.specialties
            .first()
            .map(|dish| format!("Pro tip: Their {} is absolutely legendary!", dish))
            .unwrap_or_else(|| format!("They have amazing {} cuisine!", pick.cuisine[0])),
        format!(
            "Average cost for two: ₹{} - great value!",
            pick.avg_price_for_two
        ),
        format!(
            "Cuisines: {} - perfect for your cravings!",
            pick.cuisine.join(", ")
        ),
    ];
    let fun_fact = fun_facts[rng.gen_range(0..fun_facts.len())].clone();

    RecommendationResult {
        restaurants: vec![pick.clone()],
        explanation: format!("{} **{}**! {}", intro, pick.name, pick.description),
        follow_up: Some(fun_fact),
    }
}
