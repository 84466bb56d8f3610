//! Time-pinned commitments sourced from booking documents.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use geo::Coord;

use crate::Place;

/// Default length of an event whose end time is unknown.
const DEFAULT_EVENT_MINUTES: i64 = 60;

/// Source type of a [`ConfirmedEvent`].
///
/// Parsing is lenient: unknown labels become [`EventKind::Other`].
///
/// # Examples
/// ```
/// use itinerant_core::EventKind;
///
/// assert_eq!(EventKind::from("FLIGHT"), EventKind::Flight);
/// assert_eq!(EventKind::from("check-in"), EventKind::Hotel);
/// assert_eq!(EventKind::from("concert"), EventKind::Other);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum EventKind {
    /// Arrival or departure flight.
    Flight,
    /// Accommodation booking.
    Hotel,
    /// Admission ticket for an attraction or show.
    Ticket,
    /// Restaurant reservation.
    Restaurant,
    /// Anything else with a pinned time.
    #[default]
    Other,
}

impl EventKind {
    /// Lowercase label used for serialisation and display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flight => "flight",
            Self::Hotel => "hotel",
            Self::Ticket => "ticket",
            Self::Restaurant => "restaurant",
            Self::Other => "other",
        }
    }

    /// Category assigned to the place derived from an event of this kind.
    #[must_use]
    pub const fn category(self) -> &'static str {
        match self {
            Self::Flight => "airport",
            Self::Hotel => "accommodation",
            Self::Ticket => "attraction",
            Self::Restaurant => "restaurant",
            Self::Other => "event",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "flight" | "airline" | "boarding" | "arrival" | "departure" => Self::Flight,
            "hotel" | "accommodation" | "lodging" | "stay" | "check-in" | "checkin" => Self::Hotel,
            "ticket" | "admission" | "show" | "tour" => Self::Ticket,
            "restaurant" | "reservation" | "dining" => Self::Restaurant,
            _ => Self::Other,
        }
    }
}

impl From<String> for EventKind {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<EventKind> for String {
    fn from(value: EventKind) -> Self {
        value.as_str().to_owned()
    }
}

/// A place-like commitment with a mandatory pinned start time.
///
/// Events are never moved by scheduling or routing. When `end` is absent the
/// event is assumed to last one hour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfirmedEvent {
    /// Where the commitment came from.
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: EventKind,
    /// Human-readable title, e.g. the airline and flight number.
    pub title: String,
    /// Address of the venue, used for the proximity bonus.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Option<String>,
    /// Venue position, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<Coord<f64>>,
    /// Pinned start.
    pub start: NaiveDateTime,
    /// Pinned end.
    #[cfg_attr(feature = "serde", serde(default))]
    pub end: Option<NaiveDateTime>,
    /// Booking reference, when the source document carried one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reference: Option<String>,
}

impl ConfirmedEvent {
    /// Construct an event with only the mandatory fields.
    #[must_use]
    pub fn new(kind: EventKind, title: impl Into<String>, start: NaiveDateTime) -> Self {
        Self {
            kind,
            title: title.into(),
            address: None,
            location: None,
            start,
            end: None,
            reference: None,
        }
    }

    /// Calendar date the event starts on.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Pinned end, defaulting to one hour after the start.
    #[must_use]
    pub fn end_time(&self) -> NaiveDateTime {
        self.end
            .filter(|end| *end > self.start)
            .unwrap_or_else(|| self.start + TimeDelta::minutes(DEFAULT_EVENT_MINUTES))
    }

    /// Project the event into an immovable [`Place`].
    ///
    /// The place identifier is the booking reference combined with the start
    /// time so two events from one booking stay distinct; events without a
    /// reference use their kind and start instead.
    #[must_use]
    pub fn to_place(&self) -> Place {
        let stamp = self.start.format("%Y%m%dT%H%M");
        let id = self.reference.as_ref().map_or_else(
            || format!("event:{}:{stamp}", self.kind),
            |reference| format!("{reference}:{stamp}"),
        );
        Place {
            id: Some(id),
            name: self.title.clone(),
            category: self.kind.category().to_owned(),
            location: self.location,
            address: self.address.clone(),
            is_fixed: true,
            fixed_time: Some(self.start),
            fixed_until: Some(self.end_time()),
            ..Place::default()
        }
    }
}
