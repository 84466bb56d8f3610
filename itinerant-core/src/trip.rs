//! Trip-level parameters and their lenient interpretation.
//!
//! Everything here is supplied by upstream collaborators that may send
//! free-form strings. Unknown labels fall back to a default variant and
//! unparseable dates fall back to the caller's notion of "today"; neither is
//! ever an error.

use std::fmt;

use chrono::NaiveDate;
use log::warn;

macro_rules! lenient_label {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident, what = $what:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(from = "String", into = "String")
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical lowercase label.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Parse a label, returning `None` when it is not recognised.
            #[must_use]
            pub fn parse(raw: &str) -> Option<Self> {
                match raw.trim().to_lowercase().as_str() {
                    $($label $(| $alias)* => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::parse(raw).unwrap_or_else(|| {
                    if !raw.trim().is_empty() {
                        warn!(
                            "unknown {} {raw:?}; using {}",
                            $what,
                            Self::$default.as_str()
                        );
                    }
                    Self::$default
                })
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::from(raw.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_owned()
            }
        }
    };
}

lenient_label! {
    /// What the traveller mainly wants to do.
    ///
    /// # Examples
    /// ```
    /// use itinerant_core::TravelStyle;
    ///
    /// assert_eq!(TravelStyle::from("Foodie"), TravelStyle::Food);
    /// assert_eq!(TravelStyle::from("???"), TravelStyle::Sightseeing);
    /// ```
    TravelStyle, default = Sightseeing, what = "travel style" {
        /// Landmarks and viewpoints.
        #[default]
        Sightseeing => "sightseeing" | "tour" | "tourism" | "landmark",
        /// Museums, galleries, heritage.
        Culture => "culture" | "cultural" | "history" | "heritage" | "art",
        /// Restaurants, markets and cafes.
        Food => "food" | "foodie" | "gourmet" | "culinary" | "eating",
        /// Parks, mountains and the coast.
        Nature => "nature" | "outdoor" | "outdoors" | "hiking",
        /// Malls and markets.
        Shopping => "shopping" | "shop",
        /// Bars, clubs and evening shows.
        Nightlife => "nightlife" | "night" | "party",
        /// Theme parks and hands-on experiences.
        Activity => "activity" | "activities" | "adventure" | "experience",
        /// Spas and slow days.
        Relaxation => "relaxation" | "relax" | "healing" | "wellness" | "rest",
    }
}

lenient_label! {
    /// Who the traveller is travelling with.
    Companion, default = Solo, what = "companion" {
        /// Travelling alone.
        #[default]
        Solo => "solo" | "alone" | "single",
        /// Travelling as a couple.
        Couple => "couple" | "partner" | "honeymoon",
        /// Travelling with children or relatives.
        Family => "family" | "kids" | "children",
        /// Travelling with friends or colleagues.
        Group => "group" | "friends" | "team",
    }
}

lenient_label! {
    /// How the traveller moves between stops.
    TransportMode, default = Transit, what = "transport mode" {
        /// On foot.
        Walking => "walking" | "walk" | "foot",
        /// Public transport.
        #[default]
        Transit => "transit" | "public" | "subway" | "bus" | "metro",
        /// Car or taxi.
        Driving => "driving" | "drive" | "car" | "taxi",
    }
}

/// Parameters describing the trip as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TripParameters {
    /// Destination label passed to the candidate source.
    pub destination: String,
    /// First day of the trip as an ISO-8601 date.
    pub start_date: Option<String>,
    /// Last day of the trip as an ISO-8601 date, inclusive.
    pub end_date: Option<String>,
    /// Main travel style.
    pub style: TravelStyle,
    /// Travel companions.
    pub companion: Companion,
    /// Default transport mode.
    pub transport: TransportMode,
    /// Free-text departure location for the first day.
    pub departure: Option<String>,
}

/// Calendar days of a trip plus notes about any defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripDates {
    /// Consecutive days from start to end, inclusive.
    pub dates: Vec<NaiveDate>,
    /// Human-readable notes on defaults that were applied.
    pub warnings: Vec<String>,
}

impl TripParameters {
    /// Resolve the trip's calendar days.
    ///
    /// A missing or unparseable start falls back to `today`; a missing,
    /// unparseable or earlier end falls back to the start. At most
    /// `max_days` days are returned, and always at least one.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use itinerant_core::TripParameters;
    ///
    /// let trip = TripParameters {
    ///     start_date: Some("2025-05-01".into()),
    ///     end_date: Some("2025-05-03".into()),
    ///     ..TripParameters::default()
    /// };
    /// let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    /// assert_eq!(trip.trip_dates(today, 30).dates.len(), 3);
    /// ```
    #[must_use]
    pub fn trip_dates(&self, today: NaiveDate, max_days: usize) -> TripDates {
        let mut warnings = Vec::new();
        let start = match self.start_date.as_deref() {
            None => {
                warnings.push(format!("no start date supplied; using {today}"));
                today
            }
            Some(raw) => parse_date(raw).unwrap_or_else(|| {
                warnings.push(format!("start date {raw:?} could not be parsed; using {today}"));
                today
            }),
        };
        let end = match self.end_date.as_deref() {
            None => start,
            Some(raw) => match parse_date(raw) {
                Some(end) if end >= start => end,
                Some(_) => {
                    warnings.push("end date precedes start date; planning a single day".to_owned());
                    start
                }
                None => {
                    warnings.push(format!(
                        "end date {raw:?} could not be parsed; planning a single day"
                    ));
                    start
                }
            },
        };
        let cap = max_days.max(1);
        let mut dates: Vec<NaiveDate> = start
            .iter_days()
            .take_while(|d| *d <= end)
            .take(cap + 1)
            .collect();
        if dates.len() > cap {
            dates.truncate(cap);
            warnings.push(format!("trip truncated to {cap} days"));
        }
        for warning in &warnings {
            warn!("{warning}");
        }
        TripDates { dates, warnings }
    }
}

/// Parse the date formats upstream extractors are known to emit.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY.MM.DD` and any string whose
/// first ten characters are an ISO date, such as an RFC 3339 timestamp.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}
