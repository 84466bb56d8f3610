//! End-to-end planning scenarios.
//!
//! Each scenario drives [`ItineraryPlanner`] with the production scorer over
//! a hand-built candidate pool and checks the shape of the itinerary.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use geo::Coord;
use itinerant_core::test_support::place;
use itinerant_core::{
    ConfirmedEvent, EventKind, InMemoryPlaceSource, ItineraryOutput, Place, PlanRequest, Planner,
    PlannerConfig, RouteStop, TripParameters,
};
use itinerant_planner::ItineraryPlanner;
use itinerant_planner::tour::{TwoOptLimits, two_opt};
use itinerant_scorer::PlaceScoreCalculator;
use rstest::rstest;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid date")
}

fn trip(days: u64) -> PlanRequest {
    let end = start()
        .checked_add_days(chrono::Days::new(days - 1))
        .expect("valid end date");
    PlanRequest {
        trip: TripParameters {
            destination: "Seoul".to_owned(),
            start_date: Some(start().to_string()),
            end_date: Some(end.to_string()),
            ..TripParameters::default()
        },
        today: Some(start()),
        seed: 2025,
        ..PlanRequest::default()
    }
}

fn plan(pool: Vec<Place>, config: PlannerConfig, request: &PlanRequest) -> ItineraryOutput {
    ItineraryPlanner::with_config(
        InMemoryPlaceSource::with_places(pool),
        PlaceScoreCalculator::default(),
        config,
    )
    .plan(request)
    .expect("plan should succeed")
}

fn assert_no_repeated_ids(output: &ItineraryOutput) {
    let mut seen = HashSet::new();
    for day in &output.days {
        for place in day.plan.places() {
            let id = place.id.clone().expect("scenario places carry ids");
            assert!(seen.insert(id.clone()), "{id} is planned twice");
        }
    }
}

#[rstest]
fn single_anchor_feeds_both_days() {
    let anchor = place("anchor", 37.50, 127.02, "palace");
    let pool: Vec<Place> = (0..9)
        .map(|i| {
            let offset = f64::from(i) * 0.004;
            place(&format!("c{i}"), 37.49 + offset, 127.01 + offset, "museum")
        })
        .collect();
    let mut request = trip(2);
    request.anchors = vec![anchor];

    let output = plan(pool, PlannerConfig::default(), &request);

    assert_eq!(output.days.len(), 2);
    for day in &output.days {
        let count = day.plan.place_count();
        assert!((4..=6).contains(&count), "day has {count} places");
    }
    let first_day_ids: Vec<_> = output
        .days
        .first()
        .expect("first day")
        .plan
        .places()
        .filter_map(|p| p.id.as_deref())
        .collect();
    assert!(first_day_ids.contains(&"anchor"));
    assert_no_repeated_ids(&output);
}

#[rstest]
fn unanchored_trip_fills_every_day_from_the_pool() {
    let pool: Vec<Place> = (0..45_u32)
        .map(|i| {
            let row = f64::from(i / 9);
            let col = f64::from(i % 9);
            place(
                &format!("c{i}"),
                37.54 + row * 0.005,
                126.96 + col * 0.005,
                "park",
            )
        })
        .collect();

    let output = plan(pool, PlannerConfig::default(), &trip(3));

    assert_eq!(output.days.len(), 3);
    for day in &output.days {
        assert!(day.plan.place_count() >= 4);
    }
    assert!(output.all_warnings().all(|w| !w.contains("relaxed")));
    assert_no_repeated_ids(&output);
}

#[rstest]
fn pinned_arrival_splits_the_route() {
    let arrival_time = start().and_time(NaiveTime::from_hms_opt(14, 0, 0).expect("valid time"));
    let mut arrival = ConfirmedEvent::new(EventKind::Flight, "Arrival at Seoul Station", arrival_time);
    arrival.location = Some(Coord {
        x: 126.9707,
        y: 37.5547,
    });
    let pool = vec![
        place("w1", 37.550, 126.950, "museum"),
        place("w2", 37.550, 126.955, "museum"),
        place("e1", 37.555, 126.990, "museum"),
        place("e2", 37.555, 127.000, "museum"),
        place("e3", 37.555, 127.010, "museum"),
    ];
    let config = PlannerConfig {
        target_places_per_day: 5,
        ..PlannerConfig::default()
    };
    let mut request = trip(1);
    request.events = vec![arrival];

    let output = plan(pool, config, &request);
    let day = output.days.first().expect("one day");

    assert!(day.has_fixed_schedule);
    let lunch = day.plan.block("lunch").expect("lunch block");
    assert!(
        lunch
            .iter()
            .any(|p| p.is_fixed && p.fixed_time == Some(arrival_time))
    );

    let stops = &day.route.stops;
    assert_eq!(stops.len(), 6);
    let position = stops
        .iter()
        .position(|s| s.place().is_some_and(|p| p.is_fixed))
        .expect("event is routed");
    // 09:00 to 14:00 leaves room for two stops before the arrival.
    assert_eq!(position, 2);

    let location = |stop: &RouteStop| stop.location();
    let event_location = stops.get(position).and_then(location);
    let before: Vec<_> = stops.iter().take(position).map(location).collect();
    let after: Vec<_> = stops.iter().skip(position + 1).map(location).collect();
    for (points, head, tail) in [
        (before, None, event_location),
        (after, event_location, None),
    ] {
        let mut order: Vec<usize> = (0..points.len()).collect();
        let applied = two_opt(&mut order, &points, head, tail, TwoOptLimits::passes(10));
        assert_eq!(applied, 0, "flexible run is not locally optimal");
    }
}
