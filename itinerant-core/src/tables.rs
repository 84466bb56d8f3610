//! Declarative lookup tables.
//!
//! Category matching is a case-insensitive substring test against the
//! place's category label. Each table carries an explicit default entry used
//! when no rule matches, and is treated as read-only once loaded.

use std::collections::HashMap;

use geo::Coord;

use crate::{Place, TravelStyle};

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_owned()).collect()
}

fn matches_any(place: &Place, keywords: &[String]) -> bool {
    let category = place.category.to_lowercase();
    keywords.iter().any(|k| category.contains(k.as_str()))
}

/// Style to category-keyword table.
///
/// A style without an entry, or with an empty keyword list, accepts every
/// category.
///
/// # Examples
/// ```
/// use itinerant_core::{Place, StyleKeywords, TravelStyle};
///
/// let table = StyleKeywords::default();
/// let cafe = Place::unidentified("Onion", "Bakery Cafe");
/// assert!(table.matches(TravelStyle::Food, &cafe));
/// assert!(!table.matches(TravelStyle::Nature, &cafe));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct StyleKeywords {
    keywords: HashMap<TravelStyle, Vec<String>>,
}

impl Default for StyleKeywords {
    fn default() -> Self {
        let table = [
            (
                TravelStyle::Sightseeing,
                &[
                    "landmark", "attraction", "palace", "tower", "observatory", "view", "museum",
                    "park", "temple", "market", "gate", "village", "square", "bridge", "street",
                ][..],
            ),
            (
                TravelStyle::Culture,
                &[
                    "museum", "gallery", "palace", "temple", "heritage", "historic", "theater",
                    "theatre", "library", "shrine", "hanok", "art",
                ][..],
            ),
            (
                TravelStyle::Food,
                &[
                    "restaurant", "cafe", "bakery", "market", "food", "dessert", "eatery", "bbq",
                    "noodle", "bar",
                ][..],
            ),
            (
                TravelStyle::Nature,
                &[
                    "park", "mountain", "garden", "beach", "forest", "lake", "river", "trail",
                    "island", "waterfall",
                ][..],
            ),
            (
                TravelStyle::Shopping,
                &[
                    "shopping", "mall", "market", "store", "boutique", "department", "outlet",
                ][..],
            ),
            (
                TravelStyle::Nightlife,
                &["bar", "pub", "club", "night", "lounge", "rooftop", "brewery"][..],
            ),
            (
                TravelStyle::Activity,
                &[
                    "theme park", "amusement", "experience", "sports", "aquarium", "zoo", "ski",
                    "workshop", "cruise",
                ][..],
            ),
            (
                TravelStyle::Relaxation,
                &[
                    "spa", "sauna", "jjimjilbang", "hot spring", "cafe", "garden", "park", "beach",
                ][..],
            ),
        ];
        Self {
            keywords: table
                .into_iter()
                .map(|(style, words)| (style, owned(words)))
                .collect(),
        }
    }
}

impl StyleKeywords {
    /// Table with no entries, accepting every category for every style.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            keywords: HashMap::new(),
        }
    }

    /// Replace the keyword list for `style`.
    #[must_use]
    pub fn with_style<I, S>(mut self, style: TravelStyle, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.insert(
            style,
            keywords.into_iter().map(|k| k.into().to_lowercase()).collect(),
        );
        self
    }

    /// Report whether `place` fits `style`.
    #[must_use]
    pub fn matches(&self, style: TravelStyle, place: &Place) -> bool {
        self.keywords
            .get(&style)
            .is_none_or(|words| words.is_empty() || matches_any(place, words))
    }

    /// Style affinity in `0.0..=1.0`.
    ///
    /// `1.0` on a keyword hit, `0.5` when the style has no keyword list and
    /// `0.0` otherwise.
    #[must_use]
    pub fn affinity(&self, style: TravelStyle, place: &Place) -> f32 {
        match self.keywords.get(&style) {
            Some(words) if words.is_empty() => 0.5,
            None => 0.5,
            Some(words) if matches_any(place, words) => 1.0,
            Some(_) => 0.0,
        }
    }
}

/// One category rule of a [`BlockAffinity`] table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffinityRule {
    /// Category keywords that trigger this rule.
    pub keywords: Vec<String>,
    /// Preferred block names, best first.
    pub blocks: Vec<String>,
}

impl AffinityRule {
    fn new(keywords: &[&str], blocks: &[&str]) -> Self {
        Self {
            keywords: owned(keywords),
            blocks: owned(blocks),
        }
    }
}

/// Category to time-block preference table.
///
/// Rules are tried in order and the first whose keyword appears in the
/// place's category wins; the default preference order applies otherwise.
///
/// # Examples
/// ```
/// use itinerant_core::{BlockAffinity, Place};
///
/// let table = BlockAffinity::default();
/// let bbq = Place::unidentified("Maple Tree House", "Korean BBQ restaurant");
/// assert_eq!(table.preferences(&bbq)[0], "lunch");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BlockAffinity {
    /// Ordered rules.
    pub rules: Vec<AffinityRule>,
    /// Preference order for categories no rule matches.
    pub default: Vec<String>,
}

impl Default for BlockAffinity {
    fn default() -> Self {
        Self {
            rules: vec![
                AffinityRule::new(&["hotel", "accommodation", "lodging", "guesthouse"], &["evening"]),
                AffinityRule::new(
                    &["bar", "pub", "club", "night", "lounge", "rooftop"],
                    &["evening"],
                ),
                AffinityRule::new(
                    &["restaurant", "food", "bbq", "noodle", "eatery", "diner"],
                    &["lunch", "evening"],
                ),
                AffinityRule::new(
                    &["cafe", "bakery", "dessert", "tea"],
                    &["afternoon", "lunch"],
                ),
                AffinityRule::new(
                    &["observatory", "tower", "view"],
                    &["evening", "afternoon"],
                ),
                AffinityRule::new(
                    &["market", "shopping", "mall", "store", "boutique"],
                    &["afternoon", "evening"],
                ),
                AffinityRule::new(
                    &["museum", "gallery", "palace", "temple", "heritage", "historic"],
                    &["morning", "afternoon"],
                ),
                AffinityRule::new(
                    &["park", "garden", "mountain", "trail", "beach", "forest"],
                    &["morning", "afternoon"],
                ),
            ],
            default: owned(&["morning", "afternoon", "lunch", "evening"]),
        }
    }
}

impl BlockAffinity {
    /// Preferred block names for `place`, best first.
    #[must_use]
    pub fn preferences(&self, place: &Place) -> &[String] {
        self.rules
            .iter()
            .find(|rule| matches_any(place, &rule.keywords))
            .map_or(self.default.as_slice(), |rule| rule.blocks.as_slice())
    }
}

/// A named location in a [`CityLookup`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityEntry {
    /// Lowercase names and aliases matched by substring.
    pub names: Vec<String>,
    /// Representative coordinate.
    pub location: Coord<f64>,
}

impl CityEntry {
    fn new(names: &[&str], latitude: f64, longitude: f64) -> Self {
        Self {
            names: owned(names),
            location: Coord {
                x: longitude,
                y: latitude,
            },
        }
    }
}

/// Departure-string to coordinate table with a capital-city default.
///
/// # Examples
/// ```
/// use itinerant_core::CityLookup;
///
/// let cities = CityLookup::default();
/// let busan = cities.resolve("Busan Station").unwrap();
/// assert!((busan.y - 35.18).abs() < 0.01);
/// assert!(cities.resolve("Atlantis").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CityLookup {
    /// Known cities, tried in order.
    pub cities: Vec<CityEntry>,
    /// Location used when nothing matches.
    pub default: Coord<f64>,
}

impl Default for CityLookup {
    fn default() -> Self {
        Self {
            cities: vec![
                CityEntry::new(&["seoul", "서울"], 37.5663, 126.9779),
                CityEntry::new(&["busan", "pusan", "부산"], 35.1796, 129.0756),
                CityEntry::new(&["incheon", "인천"], 37.4563, 126.7052),
                CityEntry::new(&["jeju", "제주"], 33.4996, 126.5312),
                CityEntry::new(&["daegu", "대구"], 35.8714, 128.6014),
                CityEntry::new(&["daejeon", "대전"], 36.3504, 127.3845),
                CityEntry::new(&["gwangju", "광주"], 35.1595, 126.8526),
                CityEntry::new(&["gyeongju", "경주"], 35.8562, 129.2247),
                CityEntry::new(&["tokyo", "東京"], 35.6762, 139.6503),
                CityEntry::new(&["osaka", "大阪"], 34.6937, 135.5023),
            ],
            // Seoul City Hall.
            default: Coord {
                x: 126.9779,
                y: 37.5663,
            },
        }
    }
}

impl CityLookup {
    /// Resolve a free-text departure to coordinates.
    ///
    /// Accepts a literal `"lat,lon"` pair or any string containing a known
    /// city name. Returns `None` when nothing matches.
    #[must_use]
    pub fn resolve(&self, query: &str) -> Option<Coord<f64>> {
        if let Some(coord) = parse_lat_lon(query) {
            return Some(coord);
        }
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.cities
            .iter()
            .find(|city| city.names.iter().any(|name| needle.contains(name.as_str())))
            .map(|city| city.location)
    }

    /// Resolve `query`, falling back to the default location.
    ///
    /// The flag is `false` when the default was used.
    #[must_use]
    pub fn resolve_or_default(&self, query: &str) -> (Coord<f64>, bool) {
        self.resolve(query)
            .map_or((self.default, false), |coord| (coord, true))
    }
}

fn parse_lat_lon(query: &str) -> Option<Coord<f64>> {
    let (lat, lon) = query.split_once(',')?;
    let y: f64 = lat.trim().parse().ok()?;
    let x: f64 = lon.trim().parse().ok()?;
    let coord = Coord { x, y };
    crate::is_valid_coord(coord).then_some(coord)
}
