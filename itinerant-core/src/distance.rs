//! Great-circle helpers over WGS84 coordinates.
//!
//! Coordinates follow the `geo` convention used throughout the crate:
//! `x = longitude`, `y = latitude`, both in degrees.

use geo::{Coord, Distance, Haversine, Point};

/// Return the haversine distance between two coordinates in kilometres.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use itinerant_core::haversine_km;
///
/// let city_hall = Coord { x: 126.9779, y: 37.5663 };
/// let gangnam = Coord { x: 127.0276, y: 37.4979 };
/// let km = haversine_km(city_hall, gangnam);
/// assert!((8.0..10.0).contains(&km));
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "metres to kilometres conversion"
)]
pub fn haversine_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to)) / 1000.0
}

/// Report whether a coordinate is usable for distance calculations.
///
/// Non-finite values, out-of-range latitudes or longitudes, and the
/// `(0, 0)` sentinel that upstream providers emit for unknown positions are
/// all rejected.
#[must_use]
pub fn is_valid_coord(coord: Coord<f64>) -> bool {
    let finite = coord.x.is_finite() && coord.y.is_finite();
    let in_range = (-180.0..=180.0).contains(&coord.x) && (-90.0..=90.0).contains(&coord.y);
    let null_island = coord.x == 0.0 && coord.y == 0.0;
    finite && in_range && !null_island
}

/// Distance between two optional coordinates, treating anything missing or
/// invalid as a zero-length hop.
#[must_use]
pub fn segment_km(from: Option<Coord<f64>>, to: Option<Coord<f64>>) -> f64 {
    match (from, to) {
        (Some(a), Some(b)) if is_valid_coord(a) && is_valid_coord(b) => haversine_km(a, b),
        _ => 0.0,
    }
}

/// Arithmetic mean of the supplied coordinates.
///
/// Returns `None` for an empty input. Averaging in degree space is adequate
/// at city scale and avoids antimeridian handling the planner never needs.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "centroid computation averages coordinates"
)]
pub fn mean_coord<I>(coords: I) -> Option<Coord<f64>>
where
    I: IntoIterator<Item = Coord<f64>>,
{
    let (sum, count) = coords
        .into_iter()
        .fold((Coord { x: 0.0, y: 0.0 }, 0_usize), |(acc, n), c| {
            (
                Coord {
                    x: acc.x + c.x,
                    y: acc.y + c.y,
                },
                n + 1,
            )
        });
    if count == 0 {
        return None;
    }
    let n = count as f64;
    Some(Coord {
        x: sum.x / n,
        y: sum.y / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn identical_points_are_zero_apart() {
        let c = Coord { x: 127.02, y: 37.5 };
        assert!(haversine_km(c, c).abs() < 1e-9);
    }

    #[rstest]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = Coord { x: 127.0, y: 37.0 };
        let b = Coord { x: 127.0, y: 38.0 };
        let km = haversine_km(a, b);
        assert!((110.0..112.5).contains(&km), "got {km}");
    }

    #[rstest]
    #[case(Coord { x: 127.0, y: 37.5 }, true)]
    #[case(Coord { x: 0.0, y: 0.0 }, false)]
    #[case(Coord { x: f64::NAN, y: 37.5 }, false)]
    #[case(Coord { x: 127.0, y: 95.0 }, false)]
    #[case(Coord { x: 181.0, y: 10.0 }, false)]
    fn validity(#[case] coord: Coord<f64>, #[case] expected: bool) {
        assert_eq!(is_valid_coord(coord), expected);
    }

    #[rstest]
    fn missing_endpoint_contributes_nothing() {
        let a = Coord { x: 127.0, y: 37.5 };
        assert!(segment_km(Some(a), None).abs() < f64::EPSILON);
        assert!(segment_km(None, Some(a)).abs() < f64::EPSILON);
        assert!(segment_km(Some(a), Some(Coord { x: 0.0, y: 0.0 })).abs() < f64::EPSILON);
    }

    #[rstest]
    fn mean_of_nothing_is_none() {
        assert!(mean_coord(std::iter::empty()).is_none());
    }

    #[rstest]
    fn mean_averages_axes() {
        let centre = mean_coord([Coord { x: 127.0, y: 37.0 }, Coord { x: 128.0, y: 38.0 }])
            .expect("centre");
        assert!((centre.x - 127.5).abs() < 1e-9);
        assert!((centre.y - 37.5).abs() < 1e-9);
    }
}
