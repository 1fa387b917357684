//! Ground footprint computation for geotagged camera positions.
//!
//! Given the camera's physical sensor, focal length, pose, and height above
//! ground, derives the polygon the camera observed on the terrain. All plane
//! geometry happens in the UTM zone of the camera position; the result ring
//! is converted back to geographic coordinates.

use crate::utm::{from_projected, rotate, to_projected, UtmZone};
use crate::Result;

/// Pitch threshold above which gimbal telemetry is considered unreliable.
///
/// A camera tilted more than 30 degrees from straight down produces
/// footprints that stretch toward the horizon; noisy telemetry in that range
/// is replaced with an explicit nadir pose.
const PITCH_CLAMP_THRESHOLD_DEG: f64 = -60.0;

/// Straight-down pitch.
const NADIR_PITCH_DEG: f64 = -90.0;

/// Inputs for a footprint computation.
///
/// Angles are in degrees, lengths in millimeters, distances in meters.
#[derive(Debug, Clone, Copy)]
pub struct FootprintInput {
    /// Physical sensor width.
    pub sensor_width_mm: f64,
    /// Physical sensor height.
    pub sensor_height_mm: f64,
    /// Physical focal length.
    pub focal_length_mm: f64,
    /// Camera latitude in degrees.
    pub latitude: f64,
    /// Camera longitude in degrees.
    pub longitude: f64,
    /// Absolute altitude above mean sea level; 0.0 when unknown.
    pub absolute_altitude_m: f64,
    /// Height above ground.
    pub relative_altitude_m: f64,
    /// Gimbal pitch (-90 is straight down).
    pub pitch_deg: f64,
    /// Gimbal yaw (0 is north, clockwise positive).
    pub yaw_deg: f64,
    /// Gimbal roll.
    pub roll_deg: f64,
}

/// A geographic point with elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint3 {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Elevation in meters.
    pub elevation: f64,
}

/// A closed ground footprint ring.
///
/// Always holds exactly five points with the first repeated as the last.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    /// Ring points: upper-left, lower-left, lower-right, upper-right, and
    /// the closing upper-left again.
    pub ring: [GeoPoint3; 5],
}

/// Compute the ground footprint for a camera position and pose.
///
/// The caller is responsible for checking that sensor size, focal length,
/// and relative altitude are actually available; this function assumes the
/// inputs are present and only fails on projection errors.
pub fn compute_footprint(input: &FootprintInput) -> Result<Footprint> {
    let zone = UtmZone::from_lat_lon(input.latitude, input.longitude);
    let center = to_projected(input.latitude, input.longitude, zone)?;

    // Ground elevation under the camera: prefer absolute minus height above
    // ground when an absolute altitude is known.
    let ground_elevation = if input.absolute_altitude_m != 0.0 {
        input.absolute_altitude_m - input.relative_altitude_m
    } else {
        input.relative_altitude_m
    };

    // Field of view from the pinhole model
    let x_view = 2.0 * (input.sensor_width_mm / (2.0 * input.focal_length_mm)).atan();
    let y_view = 2.0 * (input.sensor_height_mm / (2.0 * input.focal_length_mm)).atan();

    let mut pitch = input.pitch_deg;
    if pitch > PITCH_CLAMP_THRESHOLD_DEG {
        pitch = NADIR_PITCH_DEG;
    }

    let alt = input.relative_altitude_m;
    let top = alt * ((90.0 + pitch).to_radians() + 0.5 * y_view).tan();
    let bottom = alt * ((90.0 + pitch).to_radians() - 0.5 * y_view).tan();
    let left = alt * (input.roll_deg.to_radians() - 0.5 * x_view).tan();
    let right = alt * (input.roll_deg.to_radians() + 0.5 * x_view).tan();

    let corners = [
        (center.0 + left, center.1 + top),     // upper left
        (center.0 + left, center.1 + bottom),  // lower left
        (center.0 + right, center.1 + bottom), // lower right
        (center.0 + right, center.1 + top),    // upper right
    ];

    let mut geographic = [GeoPoint3 {
        lat: 0.0,
        lon: 0.0,
        elevation: ground_elevation,
    }; 4];
    for (i, corner) in corners.iter().enumerate() {
        let rotated = rotate(*corner, center, -input.yaw_deg);
        let (lat, lon) = from_projected(rotated.0, rotated.1, zone)?;
        geographic[i].lat = lat;
        geographic[i].lon = lon;
    }

    Ok(Footprint {
        ring: [
            geographic[0],
            geographic[1],
            geographic[2],
            geographic[3],
            geographic[0],
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dji_nadir_input() -> FootprintInput {
        FootprintInput {
            sensor_width_mm: 6.3,
            sensor_height_mm: 4.7,
            focal_length_mm: 3.6,
            latitude: 45.0,
            longitude: 9.0,
            absolute_altitude_m: 0.0,
            relative_altitude_m: 50.0,
            pitch_deg: -90.0,
            yaw_deg: 0.0,
            roll_deg: 0.0,
        }
    }

    #[test]
    fn test_ring_is_closed_five_points() {
        let fp = compute_footprint(&dji_nadir_input()).unwrap();
        assert_eq!(fp.ring.len(), 5);
        assert_eq!(fp.ring[0], fp.ring[4]);
    }

    #[test]
    fn test_nadir_footprint_is_centered() {
        let input = dji_nadir_input();
        let fp = compute_footprint(&input).unwrap();

        // A nadir shot with zero roll and yaw is symmetric around the
        // camera position.
        let mean_lat: f64 = fp.ring[..4].iter().map(|p| p.lat).sum::<f64>() / 4.0;
        let mean_lon: f64 = fp.ring[..4].iter().map(|p| p.lon).sum::<f64>() / 4.0;
        assert!((mean_lat - input.latitude).abs() < 1e-7, "lat center: {mean_lat}");
        assert!((mean_lon - input.longitude).abs() < 1e-7, "lon center: {mean_lon}");

        // Axis aligned: the two upper corners share a latitude, the two
        // left corners share a longitude.
        assert!((fp.ring[0].lat - fp.ring[3].lat).abs() < 1e-9);
        assert!((fp.ring[1].lat - fp.ring[2].lat).abs() < 1e-9);
        assert!((fp.ring[0].lon - fp.ring[1].lon).abs() < 1e-9);
        assert!((fp.ring[2].lon - fp.ring[3].lon).abs() < 1e-9);
    }

    #[test]
    fn test_shallow_pitch_clamps_to_nadir() {
        let mut shallow = dji_nadir_input();
        shallow.pitch_deg = -10.0;
        let clamped = compute_footprint(&shallow).unwrap();
        let nadir = compute_footprint(&dji_nadir_input()).unwrap();

        for (a, b) in clamped.ring.iter().zip(nadir.ring.iter()) {
            assert!((a.lat - b.lat).abs() < 1e-12);
            assert!((a.lon - b.lon).abs() < 1e-12);
        }
    }

    #[test]
    fn test_steep_pitch_is_not_clamped() {
        let mut oblique = dji_nadir_input();
        oblique.pitch_deg = -70.0;
        let tilted = compute_footprint(&oblique).unwrap();
        let nadir = compute_footprint(&dji_nadir_input()).unwrap();
        assert_ne!(tilted.ring, nadir.ring);
    }

    #[test]
    fn test_yaw_preserves_center() {
        let mut rotated = dji_nadir_input();
        rotated.yaw_deg = 37.0;
        let fp = compute_footprint(&rotated).unwrap();

        let mean_lat: f64 = fp.ring[..4].iter().map(|p| p.lat).sum::<f64>() / 4.0;
        let mean_lon: f64 = fp.ring[..4].iter().map(|p| p.lon).sum::<f64>() / 4.0;
        assert!((mean_lat - rotated.latitude).abs() < 1e-7);
        assert!((mean_lon - rotated.longitude).abs() < 1e-7);
    }

    #[test]
    fn test_ground_elevation_from_absolute_altitude() {
        let mut input = dji_nadir_input();
        input.absolute_altitude_m = 320.0;
        let fp = compute_footprint(&input).unwrap();
        assert!((fp.ring[0].elevation - 270.0).abs() < 1e-9);

        // Unknown absolute altitude falls back to the relative altitude
        input.absolute_altitude_m = 0.0;
        let fp = compute_footprint(&input).unwrap();
        assert!((fp.ring[0].elevation - 50.0).abs() < 1e-9);
    }
}
