use serde::{Deserialize, Serialize};
use log::debug;

/// Mood label -> keywords that signal it in free text. The same lists are
/// matched against restaurant tags when scoring. Tables are disjoint by
/// construction, so a keyword maps to exactly one mood.
pub const MOOD_KEYWORDS: &[(&str, &[&str])] = &[
    ("comfort", &["comfort", "cozy", "homely", "warm", "rainy", "soul food"]),
    ("spicy", &["spicy", "hot", "fiery", "chilli", "masaledar"]),
    ("cheesy", &["cheesy", "cheese", "loaded", "gooey"]),
    ("healthy", &["healthy", "light", "fresh", "salad", "diet", "clean eating"]),
    ("filling", &["filling", "hungry", "starving", "big portion", "heavy"]),
    ("late-night", &["late night", "late-night", "midnight", "after hours"]),
    ("sweet", &["sweet tooth", "craving sweet", "something sweet"]),
    ("quick", &["quick", "fast", "in a hurry", "grab"]),
];

/// Cuisine category -> keywords that signal it in free text.
pub const CUISINE_KEYWORDS: &[(&str, &[&str])] = &[
    ("North Indian", &["north indian", "punjabi", "tandoor", "dal", "roti", "naan"]),
    ("South Indian", &["south indian", "dosa", "idli", "sambar", "filter coffee"]),
    ("Chinese", &["chinese", "noodles", "manchurian", "hakka", "wok"]),
    ("Italian", &["italian", "pizza", "pasta", "cheese burst"]),
    ("Street Food", &["street food", "chaat", "pani puri", "gol gappa"]),
    ("Fast Food", &["fast food", "burger", "fries"]),
    ("Cafe", &["cafe", "coffee", "chai", "tea"]),
    ("Desserts", &["dessert", "ice cream", "mithai", "kulfi"]),
];

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub cuisine: Vec<String>,
    /// 1 = budget, 2 = moderate, 3 = expensive.
    pub price_range: u8,
    pub rating: f32,
    pub reviews: u32,
    pub location: String,
    pub address: String,
    pub distance: String,
    pub open_time: String,
    pub close_time: String,
    pub specialties: Vec<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub image: String,
    pub is_veg: bool,
    pub phone: String,
    #[serde(default)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub avg_price_for_two: u32,
}

lazy_static::lazy_static! {
    /// The full catalog, fixed for the process lifetime.
    pub static ref RESTAURANTS: Vec<Restaurant> =
        serde_json::from_str(include_str!("../data/restaurants.json"))
            .expect("data/restaurants.json must parse");
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogFilter {
    pub search: Option<String>,
    pub cuisine: Option<String>,
    pub price: Option<u8>,
    #[serde(default)]
    pub veg: bool,
}

/// Conjunctive filtering over the static catalog. Empty or absent filters
/// match everything; text matches are case-insensitive substring checks
/// against name, cuisines and tags.
pub fn filter_restaurants(filter: &CatalogFilter) -> Vec<&'static Restaurant> {
    let search = filter
        .search
        .as_deref()
        .map(str::to_lowercase)
        .filter(|s| !s.trim().is_empty());
    let cuisine = filter
        .cuisine
        .as_deref()
        .map(str::to_lowercase)
        .filter(|c| !c.trim().is_empty() && c != "all");

    let matches: Vec<&'static Restaurant> = RESTAURANTS
        .iter()
        .filter(|r| {
            let matches_search = search.as_deref().map_or(true, |s| {
                r.name.to_lowercase().contains(s)
                    || r.cuisine.iter().any(|c| c.to_lowercase().contains(s))
                    || r.tags.iter().any(|t| t.to_lowercase().contains(s))
            });
            let matches_cuisine = cuisine.as_deref().map_or(true, |c| {
                r.cuisine.iter().any(|rc| rc.to_lowercase().contains(c))
            });
            let matches_price = filter.price.map_or(true, |p| r.price_range == p);
            let matches_veg = !filter.veg || r.is_veg;

            matches_search && matches_cuisine && matches_price && matches_veg
        })
        .collect();

    debug!(
        "Catalog filter {:?} matched {} of {} restaurants",
        filter,
        matches.len(),
        RESTAURANTS.len()
    );
    matches
}

/// Keyword list for a mood label, empty if the label is unknown.
pub fn mood_keywords(mood: &str) -> &'static [&'static str] {
    MOOD_KEYWORDS
        .iter()
        .find(|(m, _)| *m == mood)
        .map(|(_, kws)| *kws)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_loads_and_is_well_formed() {
        assert_eq!(RESTAURANTS.len(), 20);
        let mut seen = HashSet::new();
        for r in RESTAURANTS.iter() {
            assert!(seen.insert(r.id.clone()), "duplicate id {}", r.id);
            assert!((1..=3).contains(&r.price_range), "{} price tier", r.name);
            assert!((0.0..=5.0).contains(&r.rating), "{} rating", r.name);
            assert!(!r.cuisine.is_empty(), "{} has no cuisine", r.name);
            assert!(!r.specialties.is_empty(), "{} has no specialties", r.name);
        }
    }

    #[test]
    fn keyword_tables_are_disjoint() {
        let mut seen = HashSet::new();
        for (_, kws) in MOOD_KEYWORDS.iter().chain(CUISINE_KEYWORDS.iter()) {
            for kw in *kws {
                assert!(seen.insert(*kw), "keyword {:?} appears twice", kw);
            }
        }
    }

    #[test]
    fn filter_by_cuisine_and_price() {
        let filter = CatalogFilter {
            cuisine: Some("South Indian".to_string()),
            price: Some(1),
            ..Default::default()
        };
        let hits = filter_restaurants(&filter);
        assert!(!hits.is_empty());
        for r in hits {
            assert_eq!(r.price_range, 1);
            assert!(r.cuisine.iter().any(|c| c.contains("South Indian")));
        }
    }

    #[test]
    fn veg_filter_excludes_non_veg() {
        let filter = CatalogFilter {
            veg: true,
            ..Default::default()
        };
        assert!(filter_restaurants(&filter).iter().all(|r| r.is_veg));
    }

    #[test]
    fn empty_filter_returns_whole_catalog() {
        let hits = filter_restaurants(&CatalogFilter::default());
        assert_eq!(hits.len(), RESTAURANTS.len());
    }

    #[test]
    fn search_matches_tags_case_insensitively() {
        let filter = CatalogFilter {
            search: Some("SPICY".to_string()),
            ..Default::default()
        };
        let hits = filter_restaurants(&filter);
        assert!(!hits.is_empty());
        for r in hits {
            let s = "spicy";
            assert!(
                r.name.to_lowercase().contains(s)
                    || r.cuisine.iter().any(|c| c.to_lowercase().contains(s))
                    || r.tags.iter().any(|t| t.to_lowercase().contains(s))
            );
        }
    }
}
