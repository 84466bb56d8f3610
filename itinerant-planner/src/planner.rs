//! `ItineraryPlanner`: the full clustering, augmentation, scheduling and
//! routing pipeline behind the [`Planner`] trait.

use std::time::Instant;

use chrono::{Local, NaiveDate};
use geo::Coord;
use itinerant_core::{
    CandidateIndex, CandidateQuery, ConfirmedEvent, ItineraryOutput, Place, PlaceSource,
    PlanError, PlanRequest, Planner, PlannerConfig, Scorer, ScoringContext, TripDates,
    UniquenessLedger, mean_coord,
};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    CandidateAugmenter, DayAllocator, DayParts, GeoClusterer, ItineraryAssembler, RouteOptimizer,
    TimeBlockScheduler,
};

/// Multi-day itinerary planner.
///
/// The planner is generic over the engine boundaries: a read-only candidate
/// source and a relevance scorer. Each call to [`Planner::plan`] owns its
/// own [`UniquenessLedger`] and random number generator, so calls are
/// independent and the planner can be shared between threads.
///
/// # Examples
/// ```
/// use itinerant_core::{InMemoryPlaceSource, Place, PlanRequest, Planner, TripParameters};
/// use itinerant_core::test_support::QualityScorer;
/// use itinerant_planner::ItineraryPlanner;
///
/// let pool = (0..8).map(|i| {
///     Place::new(format!("p{i}"), format!("Museum {i}"), "museum")
///         .at(37.57 + f64::from(i) * 0.002, 126.98)
///         .with_rating(4.5)
///         .with_quality(0.9)
/// });
/// let planner = ItineraryPlanner::new(InMemoryPlaceSource::with_places(pool), QualityScorer);
/// let request = PlanRequest {
///     trip: TripParameters {
///         destination: "Seoul".into(),
///         start_date: Some("2025-05-01".into()),
///         end_date: Some("2025-05-02".into()),
///         ..TripParameters::default()
///     },
///     ..PlanRequest::default()
/// };
/// let itinerary = planner.plan(&request).unwrap();
/// assert_eq!(itinerary.days.len(), 2);
/// assert_eq!(itinerary.total_places, 8);
/// ```
pub struct ItineraryPlanner<S, C>
where
    S: PlaceSource,
    C: Scorer,
{
    source: S,
    scorer: C,
    config: PlannerConfig,
}

impl<S, C> ItineraryPlanner<S, C>
where
    S: PlaceSource,
    C: Scorer,
{
    /// Construct a planner using default configuration.
    #[must_use]
    pub fn new(source: S, scorer: C) -> Self {
        Self::with_config(source, scorer, PlannerConfig::default())
    }

    /// Construct a planner with explicit configuration.
    #[must_use]
    pub const fn with_config(source: S, scorer: C, config: PlannerConfig) -> Self {
        Self {
            source,
            scorer,
            config,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    fn scored(&self, place: Place, context: &ScoringContext<'_>) -> Place {
        let score = self.scorer.score(&place, context);
        place.scored(score)
    }
}

impl<S, C> Planner for ItineraryPlanner<S, C>
where
    S: PlaceSource,
    C: Scorer,
{
    fn plan(&self, request: &PlanRequest) -> Result<ItineraryOutput, PlanError> {
        self.config.validate()?;
        let started_at = Instant::now();
        let trip = &request.trip;
        let today = request.today.unwrap_or_else(|| Local::now().date_naive());
        let TripDates {
            dates,
            mut warnings,
        } = trip.trip_dates(today, self.config.max_trip_days);

        let context = ScoringContext::new(trip.style, trip.companion, &self.config.style_keywords)
            .with_events(&request.events)
            .with_proximity_bonus(self.config.proximity_bonus);
        let query = CandidateQuery {
            destination: &trip.destination,
            style: trip.style,
        };
        let pool: Vec<Place> = self
            .source
            .candidates(&query)
            .map(|place| self.scored(place, &context))
            .collect();
        if pool.is_empty() && request.anchors.is_empty() {
            warn!("no candidates or anchors for {:?}", trip.destination);
            return Err(PlanError::NoPlacesAvailable {
                destination: trip.destination.clone(),
            });
        }
        let anchors: Vec<Place> = request
            .anchors
            .iter()
            .cloned()
            .map(|place| self.scored(place.user_selected(), &context))
            .collect();
        debug!(
            "planning {} day(s) from {} candidate(s) and {} anchor(s)",
            dates.len(),
            pool.len(),
            anchors.len()
        );

        let events_by_day = events_by_day(&dates, &request.events, &mut warnings);
        let mut ledger = UniquenessLedger::new(self.config.generic_tokens.clone());
        for (day, events) in events_by_day.iter().enumerate() {
            for event in events {
                if !ledger.claim_pinned(&event.to_place(), day) {
                    debug!("event {:?} is already planned", event.title);
                }
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
        let clustering = GeoClusterer::from_config(&self.config).cluster(&anchors, &mut rng);
        let mut allocation = DayAllocator::allocate(&clustering.clusters, dates.len());
        let mut anchors_by_day: Vec<Vec<Place>> = vec![Vec::new(); dates.len()];
        for (index, cluster) in clustering.clusters.iter().enumerate() {
            if let Some(day) = allocation.day_of(index)
                && let Some(list) = anchors_by_day.get_mut(day)
            {
                list.extend(cluster.members.iter().cloned());
            }
        }
        let spread = allocation.spread_unlocated(&clustering.unlocated);
        for (place, day) in clustering.unlocated.iter().zip(spread) {
            if let Some(list) = anchors_by_day.get_mut(day) {
                list.push(place.clone());
            }
        }
        for (day, list) in anchors_by_day.iter_mut().enumerate() {
            list.retain(|place| {
                let claimed = if is_pinned(place) {
                    ledger.claim_pinned(place, day)
                } else {
                    ledger.claim(place, day)
                };
                if !claimed {
                    let note = format!(
                        "{:?} is already planned for another day; skipped on day {}",
                        place.name,
                        day + 1
                    );
                    warn!("{note}");
                    warnings.push(note);
                }
                claimed
            });
        }

        let anchored = !clustering.clusters.is_empty();
        let fallback_centre = if anchored {
            mean_coord(clustering.clusters.iter().map(|c| c.centroid))
        } else {
            info!("no located anchors; planning around the candidate pool centre");
            mean_coord(pool.iter().filter_map(Place::valid_location))
        };

        let index = CandidateIndex::new(&pool);
        let augmenter = CandidateAugmenter::new(&self.config, &pool, &index);
        let scheduler = TimeBlockScheduler::from_config(&self.config);
        let router = RouteOptimizer::new(&self.config);
        let target = self.config.target_places_per_day;
        let mut days = Vec::with_capacity(dates.len());
        for (day, date) in dates.iter().enumerate() {
            let selected = anchors_by_day.get(day).map_or(&[][..], Vec::as_slice);
            let events = events_by_day.get(day).map_or(&[][..], Vec::as_slice);
            let mut centres: Vec<Coord<f64>> = allocation
                .clusters_for(day)
                .iter()
                .filter_map(|i| clustering.clusters.get(*i))
                .map(|c| c.centroid)
                .collect();
            if centres.is_empty() {
                centres.extend(fallback_centre);
            }

            let planned = selected.iter().filter(|p| !is_pinned(p)).count();
            let room = scheduler.room(selected, events);
            let wanted = target.saturating_sub(planned).min(room);
            if wanted < target.saturating_sub(planned) {
                debug!("day {}: pinned windows leave room for {room} more place(s)", day + 1);
            }
            let augmentation = augmenter.augment(day, &centres, trip.style, wanted, &mut ledger);
            let mut day_warnings = Vec::new();
            if augmentation.relaxed > 0 {
                day_warnings.push(format!(
                    "day {}: {} place(s) chosen with relaxed quality criteria",
                    day + 1,
                    augmentation.relaxed
                ));
            }

            let schedule =
                scheduler.schedule(*date, day, selected, &augmentation.places, events, &mut ledger);
            day_warnings.extend(schedule.warnings);
            let visits = schedule.plan.places().filter(|p| !is_pinned(p)).count();
            if visits < target {
                day_warnings.push(format!(
                    "day {}: only {visits} of {target} place(s) could be planned",
                    day + 1
                ));
            } else if visits > self.config.max_places_per_day {
                day_warnings.push(format!(
                    "day {}: {visits} place(s) exceed the daily maximum of {}",
                    day + 1,
                    self.config.max_places_per_day
                ));
            }

            let departure = if day == 0 {
                trip.departure.as_deref()
            } else {
                None
            };
            let routed = router.optimize(&schedule.plan, trip.transport, departure);
            day_warnings.extend(routed.warnings);
            days.push(DayParts {
                plan: schedule.plan,
                route: routed.route,
                warnings: day_warnings,
            });
        }

        let output = ItineraryAssembler::assemble(trip.destination.clone(), days, warnings);
        info!(
            "planned {} day(s), {} place(s), {:.1} km in {:?}",
            output.days.len(),
            output.total_places,
            output.total_distance_km,
            started_at.elapsed()
        );
        Ok(output)
    }
}

fn is_pinned(place: &Place) -> bool {
    place.pinned_at().is_some()
}

/// Bucket events by trip day; events outside the trip are reported and
/// ignored.
fn events_by_day(
    dates: &[NaiveDate],
    events: &[ConfirmedEvent],
    warnings: &mut Vec<String>,
) -> Vec<Vec<ConfirmedEvent>> {
    let mut by_day: Vec<Vec<ConfirmedEvent>> = vec![Vec::new(); dates.len()];
    for event in events {
        let date = event.date();
        match dates.iter().position(|d| *d == date) {
            Some(day) => {
                if let Some(list) = by_day.get_mut(day) {
                    list.push(event.clone());
                }
            }
            None => {
                let note = format!(
                    "event {:?} on {date} falls outside the trip dates; ignored",
                    event.title
                );
                warn!("{note}");
                warnings.push(note);
            }
        }
    }
    by_day
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use itinerant_core::{
        ConfigError, EventKind, InMemoryPlaceSource, TripParameters,
        test_support::{QualityScorer, place},
    };
    use rstest::{fixture, rstest};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).expect("valid date")
    }

    fn request(days: u32) -> PlanRequest {
        PlanRequest {
            trip: TripParameters {
                destination: "Seoul".to_owned(),
                start_date: Some("2025-05-01".to_owned()),
                end_date: Some(format!("2025-05-{days:02}")),
                ..TripParameters::default()
            },
            today: Some(date(1)),
            seed: 7,
            ..PlanRequest::default()
        }
    }

    #[fixture]
    fn pool() -> Vec<Place> {
        (0..12)
            .map(|i| place(&format!("c{i}"), 37.50 + f64::from(i) * 0.002, 127.02, "museum"))
            .collect()
    }

    fn planner(places: Vec<Place>) -> ItineraryPlanner<InMemoryPlaceSource, QualityScorer> {
        ItineraryPlanner::new(InMemoryPlaceSource::with_places(places), QualityScorer)
    }

    #[rstest]
    fn empty_pool_without_anchors_is_an_error() {
        let err = planner(Vec::new())
            .plan(&request(1))
            .expect_err("nothing to plan");
        assert_eq!(
            err,
            PlanError::NoPlacesAvailable {
                destination: "Seoul".to_owned()
            }
        );
    }

    #[rstest]
    fn invalid_config_is_rejected(pool: Vec<Place>) {
        let config = PlannerConfig {
            block_capacity: 0,
            ..PlannerConfig::default()
        };
        let planner = ItineraryPlanner::with_config(
            InMemoryPlaceSource::with_places(pool),
            QualityScorer,
            config,
        );
        let err = planner.plan(&request(1)).expect_err("invalid config");
        assert!(matches!(
            err,
            PlanError::InvalidConfig(ConfigError::NotPositive { .. })
        ));
    }

    #[rstest]
    fn anchors_alone_are_enough() {
        let mut req = request(1);
        req.anchors = vec![place("a", 37.5, 127.0, "museum")];
        let output = planner(Vec::new()).plan(&req).expect("plan");
        assert_eq!(output.total_places, 1);
        assert!(output.all_warnings().any(|w| w.contains("only 1 of 4")));
    }

    #[rstest]
    fn every_day_is_filled(pool: Vec<Place>) {
        let output = planner(pool).plan(&request(3)).expect("plan");
        assert_eq!(output.days.len(), 3);
        for day in &output.days {
            assert_eq!(day.plan.place_count(), 4);
        }
    }

    #[rstest]
    fn out_of_window_events_are_reported(pool: Vec<Place>) {
        let mut req = request(1);
        let late = date(9).and_time(NaiveTime::from_hms_opt(14, 0, 0).expect("valid time"));
        req.events = vec![ConfirmedEvent::new(EventKind::Ticket, "Concert", late)];
        let output = planner(pool).plan(&req).expect("plan");
        assert!(output.warnings.iter().any(|w| w.contains("outside the trip")));
        assert!(output.days.iter().all(|d| !d.has_fixed_schedule));
    }

    #[rstest]
    fn events_mark_their_day_fixed(pool: Vec<Place>) {
        let mut req = request(2);
        let arrival = date(2).and_time(NaiveTime::from_hms_opt(14, 0, 0).expect("valid time"));
        req.events = vec![ConfirmedEvent::new(EventKind::Flight, "Arrival", arrival)];
        let output = planner(pool).plan(&req).expect("plan");
        let flags: Vec<bool> = output.days.iter().map(|d| d.has_fixed_schedule).collect();
        assert_eq!(flags, [false, true]);
    }

    #[rstest]
    fn same_seed_same_itinerary(pool: Vec<Place>) {
        let mut req = request(2);
        req.anchors = vec![
            place("a1", 37.50, 127.00, "museum"),
            place("a2", 37.60, 127.10, "museum"),
            place("a3", 37.51, 127.01, "museum"),
        ];
        let planner = planner(pool);
        let first = planner.plan(&req).expect("plan");
        let second = planner.plan(&req).expect("plan");
        assert_eq!(first, second);
    }

    fn at(d: u32, h: u32) -> chrono::NaiveDateTime {
        date(d).and_time(NaiveTime::from_hms_opt(h, 0, 0).expect("valid time"))
    }

    #[rstest]
    fn bookings_sharing_a_title_appear_on_each_day(pool: Vec<Place>) {
        let mut req = request(3);
        let mut check_in = ConfirmedEvent::new(EventKind::Hotel, "Lotte Hotel Seoul", at(1, 15));
        check_in.reference = Some("BK1".to_owned());
        let mut check_out = check_in.clone();
        check_out.start = at(3, 11);
        req.events = vec![check_in, check_out];
        let output = planner(pool).plan(&req).expect("plan");
        let flags: Vec<bool> = output.days.iter().map(|d| d.has_fixed_schedule).collect();
        assert_eq!(flags, [true, false, true]);
        assert!(output.all_warnings().all(|w| !w.contains("already planned")));
    }

    #[rstest]
    fn busy_days_leave_candidates_for_later_days(pool: Vec<Place>) {
        let mut req = request(2);
        let mut tour = ConfirmedEvent::new(EventKind::Ticket, "Day tour", at(1, 9));
        tour.end = Some(at(1, 18));
        req.events = vec![tour];
        let output = planner(pool).plan(&req).expect("plan");
        let visits: Vec<usize> = output
            .days
            .iter()
            .map(|d| d.plan.places().filter(|p| !p.is_fixed).count())
            .collect();
        assert_eq!(visits, [2, 4]);
        let first = output.days.first().expect("first day");
        assert_eq!(first.plan.block("evening").map(<[Place]>::len), Some(2));
        assert!(output.all_warnings().all(|w| !w.contains("every time block is full")));
    }
}
