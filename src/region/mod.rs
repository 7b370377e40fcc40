//! Province regions and the pure geometry that runs over them.
//!
//! Everything in here works on already-fetched data: splitting archipelago
//! provinces into islands, measuring regions for label and marker placement,
//! and laying markers out around a center.

mod anchors;
mod layout;
mod measure;
mod partition;

pub use anchors::{anchors_for, Anchor};
pub use layout::{layout, place_markers, ring_radius, Entity, Marker};
pub use measure::{measure, measure_all, Measurement};
pub use partition::{piece_centroid, split, split_region};

use geojson::{Feature, JsonObject, Value};
use glam::DVec2;

/// A closed ring of `(lon, lat)` coordinates, GeoJSON order
pub type Ring = Vec<(f64, f64)>;

/// Outer ring first, then holes
pub type Polygon = Vec<Ring>;

/// Property keys checked, in order, for a region's administrative name
pub const NAME_KEYS: [&str; 6] = ["name", "NAME", "NAME_2", "provincia", "nombre", "texto"];

/// Name used when a feature carries none of [`NAME_KEYS`]
pub const UNKNOWN_NAME: &str = "unknown";

/// A geographic position in degrees
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// As a plane vector with `x = lng`, `y = lat`
    #[inline(always)]
    pub fn to_vec(self) -> DVec2 {
        DVec2::new(self.lng, self.lat)
    }
}

/// Polygon or multi-polygon geometry of a region
#[derive(Clone, Debug, PartialEq)]
pub enum RegionGeometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl RegionGeometry {
    /// Convert a GeoJSON geometry value; anything that is not an areal
    /// geometry yields `None`
    pub fn from_geojson(value: &Value) -> Option<Self> {
        match value {
            Value::Polygon(rings) => Some(Self::Polygon(convert_polygon(rings))),
            Value::MultiPolygon(polygons) => Some(Self::MultiPolygon(
                polygons.iter().map(|rings| convert_polygon(rings)).collect(),
            )),
            _ => None,
        }
    }

    /// Every polygon piece, one for a plain polygon
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Self::Polygon(polygon) => std::slice::from_ref(polygon),
            Self::MultiPolygon(polygons) => polygons,
        }
    }

    /// All rings of all pieces
    pub fn rings(&self) -> impl Iterator<Item = &Ring> + '_ {
        self.polygons().iter().flatten()
    }

    /// All vertices of all rings
    pub fn vertices(&self) -> impl Iterator<Item = &(f64, f64)> + '_ {
        self.rings().flatten()
    }

    pub fn vertex_count(&self) -> usize {
        self.rings().map(Vec::len).sum()
    }

    /// `(min_lon, min_lat, max_lon, max_lat)`, or `None` without vertices
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        let mut vertices = self.vertices();
        let &(lon, lat) = vertices.next()?;
        Some(vertices.fold((lon, lat, lon, lat), |(x0, y0, x1, y1), &(x, y)| {
            (x0.min(x), y0.min(y), x1.max(x), y1.max(y))
        }))
    }

    /// Ray-casting containment test; holes are respected
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.polygons().iter().any(|polygon| {
            let mut rings = polygon.iter();
            match rings.next() {
                Some(outer) if ring_contains(outer, lon, lat) => {
                    !rings.any(|hole| ring_contains(hole, lon, lat))
                }
                _ => false,
            }
        })
    }
}

fn convert_polygon(rings: &[Vec<Vec<f64>>]) -> Polygon {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .filter_map(|position| Some((*position.first()?, *position.get(1)?)))
                .collect()
        })
        .collect()
}

fn ring_contains(ring: &Ring, lon: f64, lat: f64) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// An administrative region, possibly one island of an archipelago province
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Name as found in the source properties
    pub raw_name: String,
    /// Name occupancy and selection group by; the province for island pieces
    pub name: String,
    /// Human-facing label; the island name for island pieces
    pub label: String,
    /// Unique key per rendered region
    pub key: String,
    pub geometry: RegionGeometry,
}

impl Region {
    pub fn new(raw_name: impl Into<String>, geometry: RegionGeometry) -> Self {
        let raw_name = raw_name.into();
        Self {
            name: raw_name.clone(),
            label: raw_name.clone(),
            key: raw_name.clone(),
            raw_name,
            geometry,
        }
    }

    /// Build a region from a GeoJSON feature. Features without areal
    /// geometry are not regions.
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        let geometry = RegionGeometry::from_geojson(&feature.geometry.as_ref()?.value)?;
        Some(Self::new(resolve_name(feature.properties.as_ref()), geometry))
    }
}

/// First string property among [`NAME_KEYS`], else [`UNKNOWN_NAME`]
pub fn resolve_name(properties: Option<&JsonObject>) -> String {
    properties
        .and_then(|props| {
            NAME_KEYS
                .iter()
                .find_map(|key| props.get(*key).and_then(|v| v.as_str()))
        })
        .unwrap_or(UNKNOWN_NAME)
        .to_string()
}
