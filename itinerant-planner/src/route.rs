//! Ordering a day's places into a route.

use std::time::{Duration, Instant};

use chrono::{NaiveDateTime, TimeDelta};
use geo::Coord;
use itinerant_core::{
    DayPlan, Place, PlannerConfig, Route, RouteStop, Segment, TransportMode, segment_km,
};
use log::{debug, warn};

use crate::tour::{TwoOptLimits, nearest_neighbour, two_opt};

const ACCOMMODATION_KEYWORDS: &[&str] = &["accommodation", "hotel", "lodging", "guesthouse"];

/// A routed day plus any notes raised while routing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayRoute {
    /// The route.
    pub route: Route,
    /// Human-readable notes, e.g. an unrecognised departure.
    pub warnings: Vec<String>,
}

struct Stop {
    place: Place,
    movable: bool,
}

/// Builds a visiting order for a [`DayPlan`] without modifying it.
///
/// Places with a pinned time act as fixed anchors in time order. Flexible
/// places are interleaved into the gaps before, between and after the
/// anchors. A gap runs from the end of the previous pinned window, or the
/// dwell time after its start when the end is unknown, to the next pinned
/// start; a gap of `h` hours takes up to `h / gap_hours_per_stop` stops,
/// never more than `max_stops_per_gap`, chosen by nearest neighbour from the
/// preceding anchor. Each run of flexible stops is then improved with 2-opt
/// with its bounding anchors held in place.
///
/// When a departure is given it becomes a synthetic first stop, and an
/// accommodation among the flexible places is visited first.
#[derive(Debug, Clone, Copy)]
pub struct RouteOptimizer<'a> {
    config: &'a PlannerConfig,
}

impl<'a> RouteOptimizer<'a> {
    /// Construct an optimiser using `config` for speeds, dwell and limits.
    #[must_use]
    pub const fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Route `plan` for travel by `mode`, optionally from `departure`.
    #[must_use]
    pub fn optimize(&self, plan: &DayPlan, mode: TransportMode, departure: Option<&str>) -> DayRoute {
        let mut warnings = Vec::new();
        let mut fixed: Vec<(NaiveDateTime, Place)> = Vec::new();
        let mut flexible: Vec<Place> = Vec::new();
        for place in plan.places() {
            match (place.is_fixed, place.fixed_time) {
                (true, Some(time)) => fixed.push((time, place.clone())),
                _ => flexible.push(place.clone()),
            }
        }
        fixed.sort_by_key(|(time, _)| *time);

        let mut head = Vec::new();
        let departure_stop = departure
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                let (location, resolved) = self.config.cities.resolve_or_default(raw);
                if !resolved {
                    let note = format!(
                        "day {}: departure {raw:?} not recognised; starting from the default location",
                        plan.day_index + 1
                    );
                    warn!("{note}");
                    warnings.push(note);
                }
                RouteStop::Departure {
                    label: raw.to_owned(),
                    location,
                }
            });
        if departure_stop.is_some()
            && let Some(position) = flexible.iter().position(is_accommodation)
        {
            head.push(Stop {
                place: flexible.remove(position),
                movable: false,
            });
        }

        let start = departure_stop.as_ref().and_then(RouteStop::location);
        let mut stops = self.interleave(plan, start, head, fixed, flexible);
        self.improve(start, &mut stops);

        let mut ordered: Vec<RouteStop> = Vec::with_capacity(stops.len() + 1);
        ordered.extend(departure_stop);
        ordered.extend(stops.into_iter().map(|stop| RouteStop::Visit(stop.place)));
        DayRoute {
            route: self.summarise(ordered, mode),
            warnings,
        }
    }

    fn interleave(
        &self,
        plan: &DayPlan,
        start: Option<Coord<f64>>,
        head: Vec<Stop>,
        fixed: Vec<(NaiveDateTime, Place)>,
        mut flexible: Vec<Place>,
    ) -> Vec<Stop> {
        let mut cursor_location = head
            .last()
            .map_or(start, |stop| stop.place.valid_location().or(start));
        let mut cursor_time = plan.date.and_time(self.config.blocks.day_start());
        let mut stops = head;
        for (time, anchor) in fixed {
            let count = self.stops_for_gap(cursor_time, time).min(flexible.len());
            take_nearest(&mut flexible, cursor_location, count, &mut stops);
            cursor_location = anchor.valid_location().or(cursor_location);
            let dwell = TimeDelta::minutes(i64::from(self.config.dwell_minutes));
            cursor_time = cursor_time.max(anchor.pinned_until(dwell).unwrap_or(time));
            stops.push(Stop {
                place: anchor,
                movable: false,
            });
        }
        let rest = flexible.len();
        take_nearest(&mut flexible, cursor_location, rest, &mut stops);
        stops
    }

    #[expect(clippy::float_arithmetic, reason = "gap length in hours")]
    fn stops_for_gap(&self, from: NaiveDateTime, to: NaiveDateTime) -> usize {
        let minutes = (to - from).num_minutes().max(0);
        let hours = f64::from(u32::try_from(minutes).unwrap_or(u32::MAX)) / 60.0;
        let mut count: u32 = 0;
        while usize::try_from(count).is_ok_and(|c| c < self.config.max_stops_per_gap)
            && f64::from(count + 1) * self.config.gap_hours_per_stop <= hours
        {
            count += 1;
        }
        usize::try_from(count).unwrap_or(0)
    }

    fn improve(&self, start: Option<Coord<f64>>, stops: &mut [Stop]) {
        let deadline = self
            .config
            .two_opt_budget()
            .and_then(|budget| Instant::now().checked_add(budget));
        let limits = TwoOptLimits {
            max_passes: self.config.two_opt_max_passes,
            deadline,
        };
        let mut index = 0;
        while index < stops.len() {
            if !stops.get(index).is_some_and(|s| s.movable) {
                index += 1;
                continue;
            }
            let run_start = index;
            while stops.get(index).is_some_and(|s| s.movable) {
                index += 1;
            }
            let before = if run_start == 0 {
                start
            } else {
                stops.get(run_start - 1).and_then(|s| s.place.valid_location())
            };
            let after = stops.get(index).and_then(|s| s.place.valid_location());
            let Some(run) = stops.get_mut(run_start..index) else {
                continue;
            };
            let points: Vec<Option<Coord<f64>>> =
                run.iter().map(|s| s.place.valid_location()).collect();
            let mut order: Vec<usize> = (0..run.len()).collect();
            let applied = two_opt(&mut order, &points, before, after, limits);
            if applied > 0 {
                debug!("2-opt applied {applied} reversal(s) to a run of {}", run.len());
                reorder(run, &order);
            }
        }
    }

    fn summarise(&self, stops: Vec<RouteStop>, mode: TransportMode) -> Route {
        let segments: Vec<Segment> = stops
            .iter()
            .zip(stops.iter().skip(1))
            .enumerate()
            .map(|(from, (a, b))| {
                let distance_km = segment_km(a.location(), b.location());
                Segment {
                    from,
                    to: from + 1,
                    distance_km,
                    travel: self.config.speeds.travel_time(distance_km, mode),
                }
            })
            .collect();
        let total_distance_km = segments.iter().map(|s| s.distance_km).sum();
        let travel_duration = segments
            .iter()
            .fold(Duration::ZERO, |acc, s| acc.saturating_add(s.travel));
        let visits = u32::try_from(stops.iter().filter(|s| s.place().is_some()).count())
            .unwrap_or(u32::MAX);
        let dwell_duration = self.config.dwell().checked_mul(visits).unwrap_or(Duration::MAX);
        Route {
            stops,
            segments,
            total_distance_km,
            travel_duration,
            dwell_duration,
            total_duration: travel_duration.saturating_add(dwell_duration),
        }
    }
}

fn is_accommodation(place: &Place) -> bool {
    ACCOMMODATION_KEYWORDS.iter().any(|k| place.category_contains(k))
}

/// Move `count` places from `pool` to `out`, nearest neighbour from `from`.
fn take_nearest(pool: &mut Vec<Place>, from: Option<Coord<f64>>, count: usize, out: &mut Vec<Stop>) {
    if count == 0 || pool.is_empty() {
        return;
    }
    let points: Vec<Option<Coord<f64>>> = pool.iter().map(Place::valid_location).collect();
    let mut chosen: Vec<usize> = nearest_neighbour(from, &points).into_iter().take(count).collect();
    let picked: Vec<Place> = chosen.iter().filter_map(|i| pool.get(*i).cloned()).collect();
    chosen.sort_unstable_by(|a, b| b.cmp(a));
    for index in chosen {
        if index < pool.len() {
            pool.remove(index);
        }
    }
    out.extend(picked.into_iter().map(|place| Stop {
        place,
        movable: true,
    }));
}

fn reorder(run: &mut [Stop], order: &[usize]) {
    let mut taken: Vec<Option<Stop>> = Vec::with_capacity(run.len());
    for stop in run.iter_mut() {
        taken.push(Some(std::mem::replace(
            stop,
            Stop {
                place: Place::default(),
                movable: true,
            },
        )));
    }
    for (slot, source) in run.iter_mut().zip(order) {
        if let Some(stop) = taken.get_mut(*source).and_then(Option::take) {
            *slot = stop;
        }
    }
}
