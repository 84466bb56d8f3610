//! Test helpers for writing plan inputs to a scratch workspace.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use itinerant_core::{Place, PlanRequest, TripParameters};
use tempfile::TempDir;

/// Scratch directory holding CLI inputs and outputs.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write a `days`-long Seoul request and return its path.
    pub(super) fn write_request(&self, days: u64) -> Utf8PathBuf {
        let path = self.path("request.json");
        let payload = serde_json::to_vec_pretty(&request(days)).expect("serialise request");
        write_utf8(&path, &payload);
        path
    }

    /// Write `count` museums and return the path.
    pub(super) fn write_candidates(&self, count: u32) -> Utf8PathBuf {
        let path = self.path("candidates.json");
        let payload = serde_json::to_vec_pretty(&museums(count)).expect("serialise pool");
        write_utf8(&path, &payload);
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

pub(super) fn request(days: u64) -> PlanRequest {
    let start = NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid date");
    let end = start
        .checked_add_days(chrono::Days::new(days.saturating_sub(1)))
        .expect("valid end date");
    PlanRequest {
        trip: TripParameters {
            destination: "Seoul".to_owned(),
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
            ..TripParameters::default()
        },
        seed: 11,
        today: Some(start),
        ..PlanRequest::default()
    }
}

pub(super) fn museums(count: u32) -> Vec<Place> {
    (0..count)
        .map(|i| {
            let step = f64::from(i) * 0.002;
            Place::new(format!("m{i}"), format!("Museum {i}"), "museum")
                .at(37.56 + step, 126.97 + step)
                .with_rating(4.5)
                .with_quality(0.8)
        })
        .collect()
}

/// Number of days in a serialised itinerary.
pub(super) fn day_count(json: &str) -> usize {
    let value: serde_json::Value = serde_json::from_str(json).expect("itinerary JSON");
    value
        .get("days")
        .and_then(serde_json::Value::as_array)
        .map_or(0, Vec::len)
}
