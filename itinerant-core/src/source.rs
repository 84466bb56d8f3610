//! Read-only access to the candidate pool.

use crate::{Place, TravelStyle};

/// Query for candidate places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateQuery<'a> {
    /// Destination label, e.g. `"Seoul"`.
    pub destination: &'a str,
    /// Travel style the caller is planning for.
    pub style: TravelStyle,
}

/// Supply candidate places for a destination.
///
/// Implementations wrap whatever the candidate provider is (a cache, an API
/// client, a file). The planner consumes the iterator once per planning
/// call and performs no I/O of its own.
///
/// # Examples
/// ```
/// use itinerant_core::{CandidateQuery, InMemoryPlaceSource, Place, PlaceSource, TravelStyle};
///
/// let source = InMemoryPlaceSource::with_places([Place::new("1", "Insadong", "street")]);
/// let query = CandidateQuery { destination: "Seoul", style: TravelStyle::Culture };
/// assert_eq!(source.candidates(&query).count(), 1);
/// ```
pub trait PlaceSource: Send + Sync {
    /// Return every candidate for `query`.
    fn candidates(&self, query: &CandidateQuery<'_>) -> Box<dyn Iterator<Item = Place> + Send + '_>;
}

/// `PlaceSource` over a pre-fetched list of places.
///
/// The list is assumed to belong to the queried destination already, so the
/// query is not used for filtering.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlaceSource {
    places: Vec<Place>,
}

impl InMemoryPlaceSource {
    /// Create a source from a collection of places.
    pub fn with_places<I>(places: I) -> Self
    where
        I: IntoIterator<Item = Place>,
    {
        Self {
            places: places.into_iter().collect(),
        }
    }

    /// Number of places held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Report whether the source holds no places.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl PlaceSource for InMemoryPlaceSource {
    fn candidates(&self, query: &CandidateQuery<'_>) -> Box<dyn Iterator<Item = Place> + Send + '_> {
        let _ = query;
        Box::new(self.places.iter().cloned())
    }
}
