use super::{LatLng, Region};
use std::collections::HashMap;

/// Representative point and relative size of a region
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Measurement {
    /// Bounding-box center
    pub center: LatLng,
    /// Bounding-box area in square degrees. Only meaningful relative to
    /// other regions of the same dataset.
    pub score: f64,
}

/// Bounding-box center and area of a region's geometry. Geometry without
/// vertices measures as the origin with score 0.
pub fn measure(region: &Region) -> Measurement {
    match region.geometry.bbox() {
        Some((min_lon, min_lat, max_lon, max_lat)) => Measurement {
            center: LatLng::new((min_lat + max_lat) / 2.0, (min_lon + max_lon) / 2.0),
            score: (max_lat - min_lat).abs() * (max_lon - min_lon).abs(),
        },
        None => Measurement::default(),
    }
}

/// Measure every region, keyed by resolved name. When a name repeats the
/// entry with the strictly larger score wins; ties keep the first seen.
pub fn measure_all(regions: &[Region]) -> HashMap<String, Measurement> {
    let mut out: HashMap<String, Measurement> = HashMap::with_capacity(regions.len());
    for region in regions {
        let m = measure(region);
        match out.get_mut(&region.name) {
            Some(existing) if m.score > existing.score => *existing = m,
            Some(_) => {}
            None => {
                out.insert(region.name.clone(), m);
            }
        }
    }
    out
}
