//! Entry geometry variants.
//!
//! Entries carry at most a 3D point (the capture position) and a 3D polygon
//! (the ground footprint), both in WGS84. The variant set is closed, so the
//! serializers are plain functions on a tagged union rather than a trait
//! object hierarchy.

use serde_json::{json, Value};

/// SRID of WGS84 geographic coordinates.
pub const WGS84_SRID: u32 = 4326;

/// A 3D coordinate: longitude, latitude, elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    /// Longitude in degrees.
    pub x: f64,
    /// Latitude in degrees.
    pub y: f64,
    /// Elevation in meters.
    pub z: f64,
}

impl Point3 {
    /// Create a point from longitude, latitude, elevation.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A single 3D point geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointGeometry {
    /// The point.
    pub point: Point3,
}

/// A closed 3D polygon ring geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonGeometry {
    /// Ring points, first equal to last.
    pub ring: Vec<Point3>,
}

/// The closed set of entry geometries.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single point.
    Point(PointGeometry),
    /// A closed polygon ring.
    Polygon(PolygonGeometry),
}

fn format_coord(p: &Point3) -> String {
    format!("{} {} {}", p.x, p.y, p.z)
}

fn parse_coord(raw: &str) -> Option<Point3> {
    let mut parts = raw.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    let z = parts.next().map_or(Some(0.0), |v| v.parse().ok())?;
    Some(Point3 { x, y, z })
}

impl PointGeometry {
    /// Create a point geometry from longitude, latitude, elevation.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            point: Point3::new(x, y, z),
        }
    }

    /// Well-known-text form: `POINT Z (x y z)`.
    pub fn to_wkt(&self) -> String {
        format!("POINT Z ({})", format_coord(&self.point))
    }

    /// Parse the `POINT Z (x y z)` form.
    pub fn from_wkt(wkt: &str) -> Option<Self> {
        let inner = wkt
            .trim()
            .strip_prefix("POINT Z")?
            .trim()
            .strip_prefix('(')?
            .strip_suffix(')')?;
        Some(Self {
            point: parse_coord(inner)?,
        })
    }

    /// GeoJSON geometry object.
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Point",
            "coordinates": [self.point.x, self.point.y, self.point.z],
        })
    }
}

impl PolygonGeometry {
    /// Build a polygon from a ring. The caller guarantees closure.
    pub fn new(ring: Vec<Point3>) -> Self {
        Self { ring }
    }

    /// True when the ring has at least four points and the first equals
    /// the last.
    pub fn is_closed(&self) -> bool {
        self.ring.len() >= 4 && self.ring.first() == self.ring.last()
    }

    /// Well-known-text form: `POLYGON Z ((x y z, ...))`.
    pub fn to_wkt(&self) -> String {
        let coords: Vec<String> = self.ring.iter().map(format_coord).collect();
        format!("POLYGON Z (({}))", coords.join(", "))
    }

    /// Parse the `POLYGON Z ((x y z, ...))` form.
    pub fn from_wkt(wkt: &str) -> Option<Self> {
        let inner = wkt
            .trim()
            .strip_prefix("POLYGON Z")?
            .trim()
            .strip_prefix("((")?
            .strip_suffix("))")?;
        let ring: Option<Vec<Point3>> = inner.split(',').map(parse_coord).collect();
        Some(Self { ring: ring? })
    }

    /// GeoJSON geometry object.
    pub fn to_geojson(&self) -> Value {
        let ring: Vec<Value> = self
            .ring
            .iter()
            .map(|p| json!([p.x, p.y, p.z]))
            .collect();
        json!({
            "type": "Polygon",
            "coordinates": [ring],
        })
    }
}

impl Geometry {
    /// Well-known-text form of either variant.
    pub fn to_wkt(&self) -> String {
        match self {
            Geometry::Point(p) => p.to_wkt(),
            Geometry::Polygon(p) => p.to_wkt(),
        }
    }

    /// GeoJSON geometry object of either variant.
    pub fn to_geojson(&self) -> Value {
        match self {
            Geometry::Point(p) => p.to_geojson(),
            Geometry::Polygon(p) => p.to_geojson(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_wkt_roundtrip() {
        let point = PointGeometry::new(9.19, 45.46, 120.5);
        let wkt = point.to_wkt();
        assert_eq!(wkt, "POINT Z (9.19 45.46 120.5)");
        assert_eq!(PointGeometry::from_wkt(&wkt).unwrap(), point);
    }

    #[test]
    fn test_polygon_wkt_roundtrip() {
        let ring = vec![
            Point3::new(9.0, 45.0, 100.0),
            Point3::new(9.0, 45.001, 100.0),
            Point3::new(9.001, 45.001, 100.0),
            Point3::new(9.001, 45.0, 100.0),
            Point3::new(9.0, 45.0, 100.0),
        ];
        let polygon = PolygonGeometry::new(ring);
        assert!(polygon.is_closed());

        let wkt = polygon.to_wkt();
        assert!(wkt.starts_with("POLYGON Z (("));
        assert_eq!(PolygonGeometry::from_wkt(&wkt).unwrap(), polygon);
    }

    #[test]
    fn test_point_geojson() {
        let geojson = PointGeometry::new(9.0, 45.0, 10.0).to_geojson();
        assert_eq!(geojson["type"], "Point");
        assert_eq!(geojson["coordinates"][2], 10.0);
    }

    #[test]
    fn test_polygon_geojson_single_ring() {
        let polygon = PolygonGeometry::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ]);
        let geojson = polygon.to_geojson();
        assert_eq!(geojson["type"], "Polygon");
        assert_eq!(geojson["coordinates"].as_array().unwrap().len(), 1);
        assert_eq!(
            geojson["coordinates"][0].as_array().unwrap().len(),
            4
        );
    }

    #[test]
    fn test_malformed_wkt() {
        assert!(PointGeometry::from_wkt("POINT (1 2)").is_none());
        assert!(PointGeometry::from_wkt("POINT Z (a b c)").is_none());
        assert!(PolygonGeometry::from_wkt("LINESTRING Z (1 2 3)").is_none());
    }
}
