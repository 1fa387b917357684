//! Latitude/longitude to UTM conversion and plane geometry helpers.
//!
//! Projections are resolved through the crs-definitions EPSG database and
//! executed by proj4rs, so every UTM zone (EPSG 32601-32660 north,
//! 32701-32760 south) is available without a system PROJ install.

use crate::{GeoError, Result};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;

/// EPSG code of WGS84 geographic coordinates.
const WGS84_EPSG: u16 = 4326;

/// A UTM zone identified by number and hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtmZone {
    /// Zone number, 1-60.
    pub number: u8,
    /// True for the northern hemisphere.
    pub north: bool,
}

impl UtmZone {
    /// Select the UTM zone for a geographic coordinate.
    ///
    /// Uses the standard 6-degree longitude band rule; the hemisphere comes
    /// from the latitude sign.
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        let number = (((lon + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u8;
        Self {
            number,
            north: lat >= 0.0,
        }
    }

    /// The EPSG code of this zone's projected CRS.
    pub fn epsg(&self) -> u16 {
        if self.north {
            32600 + self.number as u16
        } else {
            32700 + self.number as u16
        }
    }
}

impl std::fmt::Display for UtmZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            self.number,
            if self.north { 'N' } else { 'S' }
        )
    }
}

/// Look up the PROJ definition for an EPSG code.
fn proj_for_epsg(epsg: u16) -> Result<Proj> {
    let def = crs_definitions::from_code(epsg).ok_or(GeoError::UnknownEpsg(epsg))?;
    Proj::from_proj_string(def.proj4).map_err(|e| GeoError::InvalidProjection {
        epsg,
        reason: format!("{e:?}"),
    })
}

/// Project a geographic coordinate into a UTM zone.
///
/// Returns `(easting, northing)` in meters.
pub fn to_projected(lat: f64, lon: f64, zone: UtmZone) -> Result<(f64, f64)> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(GeoError::InvalidCoordinate { lat, lon });
    }

    let src = proj_for_epsg(WGS84_EPSG)?;
    let dst = proj_for_epsg(zone.epsg())?;

    // proj4rs expects geographic coordinates in radians
    let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
    transform(&src, &dst, &mut point).map_err(|e| GeoError::TransformFailed {
        epsg: zone.epsg(),
        reason: format!("{e:?}"),
    })?;

    Ok((point.0, point.1))
}

/// Inverse-project a UTM coordinate back to geographic degrees.
///
/// Returns `(lat, lon)`.
pub fn from_projected(x: f64, y: f64, zone: UtmZone) -> Result<(f64, f64)> {
    let src = proj_for_epsg(zone.epsg())?;
    let dst = proj_for_epsg(WGS84_EPSG)?;

    let mut point = (x, y, 0.0);
    transform(&src, &dst, &mut point).map_err(|e| GeoError::TransformFailed {
        epsg: zone.epsg(),
        reason: format!("{e:?}"),
    })?;

    Ok((point.1.to_degrees(), point.0.to_degrees()))
}

/// Rotate a projected point about a center by an angle in degrees.
///
/// Positive angles rotate counterclockwise in the projected plane.
pub fn rotate(point: (f64, f64), center: (f64, f64), degrees: f64) -> (f64, f64) {
    let theta = degrees.to_radians();
    let (sin, cos) = theta.sin_cos();
    let dx = point.0 - center.0;
    let dy = point.1 - center.1;
    (
        center.0 + dx * cos - dy * sin,
        center.1 + dx * sin + dy * cos,
    )
}

/// Map a raster pixel coordinate to world coordinates through a 6-parameter
/// affine geotransform.
///
/// `x' = a0 + px * a1 + py * a2`, `y' = a3 + px * a4 + py * a5`.
pub fn apply_affine(pixel: (f64, f64), geotransform: &[f64; 6]) -> (f64, f64) {
    let (px, py) = pixel;
    (
        geotransform[0] + px * geotransform[1] + py * geotransform[2],
        geotransform[3] + px * geotransform[4] + py * geotransform[5],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zone_selection() {
        // Milan, Italy is in zone 32N
        let zone = UtmZone::from_lat_lon(45.46, 9.19);
        assert_eq!(zone.number, 32);
        assert!(zone.north);
        assert_eq!(zone.epsg(), 32632);

        // Sydney is in zone 56S
        let zone = UtmZone::from_lat_lon(-33.87, 151.21);
        assert_eq!(zone.number, 56);
        assert!(!zone.north);
        assert_eq!(zone.epsg(), 32756);

        // Longitude 180 clamps to zone 60
        let zone = UtmZone::from_lat_lon(0.0, 180.0);
        assert_eq!(zone.number, 60);
    }

    #[test]
    fn test_forward_projection_range() {
        let zone = UtmZone::from_lat_lon(52.0, 15.0);
        let (x, y) = to_projected(52.0, 15.0, zone).unwrap();
        // Easting near zone center is around 500 km, northing in millions
        assert!(x > 400_000.0 && x < 600_000.0, "easting: {x}");
        assert!(y > 5_000_000.0 && y < 6_000_000.0, "northing: {y}");
    }

    #[test]
    fn test_roundtrip_recovers_input() {
        let points = [
            (45.0, 9.0),
            (52.0, 15.0),
            (47.6062, -122.3321),
            (-33.8688, 151.2093),
            (0.5, 0.5),
        ];

        for (lat, lon) in points {
            let zone = UtmZone::from_lat_lon(lat, lon);
            let (x, y) = to_projected(lat, lon, zone).unwrap();
            let (lat2, lon2) = from_projected(x, y, zone).unwrap();
            assert!(
                (lat - lat2).abs() < 1e-6,
                "lat roundtrip: {lat} -> {lat2}"
            );
            assert!(
                (lon - lon2).abs() < 1e-6,
                "lon roundtrip: {lon} -> {lon2}"
            );
        }
    }

    #[test]
    fn test_invalid_coordinate_rejected() {
        let zone = UtmZone::from_lat_lon(45.0, 9.0);
        assert!(to_projected(95.0, 9.0, zone).is_err());
        assert!(to_projected(45.0, 190.0, zone).is_err());
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let (x, y) = rotate((1.0, 0.0), (0.0, 0.0), 90.0);
        assert_relative_eq!(x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(y, 1.0, epsilon = 1e-12);

        // Rotation about a non-origin center
        let (x, y) = rotate((2.0, 1.0), (1.0, 1.0), 180.0);
        assert_relative_eq!(x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_apply_affine() {
        // North-up geotransform: origin (100, 200), 0.5 m pixels
        let gt = [100.0, 0.5, 0.0, 200.0, 0.0, -0.5];
        let (x, y) = apply_affine((10.0, 20.0), &gt);
        assert_relative_eq!(x, 105.0);
        assert_relative_eq!(y, 190.0);
    }
}
