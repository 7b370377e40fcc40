use super::{LatLng, Measurement};
use serde::Deserialize;
use std::collections::HashMap;
use std::f64::consts::TAU;

/// A user occupying a province, as supplied by the profile store
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub avatar_ref: Option<String>,
    pub region_name: String,
}

/// Render position for one entity
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    /// Index into the entity slice the markers were placed from
    pub entity: usize,
}

/// Ring radius in degrees for `n` markers
#[inline]
pub fn ring_radius(n: usize) -> f64 {
    (0.15 + n as f64 * 0.02).min(0.5)
}

/// Spread `n` positions on a ring around `center`. A single position sits on
/// the center itself.
pub fn layout(center: LatLng, n: usize) -> Vec<LatLng> {
    match n {
        0 => Vec::new(),
        1 => vec![center],
        _ => {
            let radius = ring_radius(n);
            (0..n)
                .map(|i| {
                    let angle = TAU * i as f64 / n as f64;
                    LatLng::new(
                        center.lat + radius * angle.cos(),
                        center.lng + radius * angle.sin(),
                    )
                })
                .collect()
        }
    }
}

/// Group entities by region and lay each group out around the region's
/// center. Groups come out in order of first appearance; entities whose
/// region was never measured get no marker.
pub fn place_markers(entities: &[Entity], measurements: &HashMap<String, Measurement>) -> Vec<Marker> {
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for (idx, entity) in entities.iter().enumerate() {
        let name = entity.region_name.as_str();
        let slot = *slots.entry(name).or_insert_with(|| {
            groups.push((name, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(idx);
    }

    let mut markers = Vec::with_capacity(entities.len());
    for (name, members) in groups {
        let Some(m) = measurements.get(name) else {
            tracing::debug!(region = name, count = members.len(), "no geometry for region, skipping markers");
            continue;
        };
        let positions = layout(m.center, members.len());
        markers.extend(
            positions
                .into_iter()
                .zip(members)
                .map(|(position, entity)| Marker { position, entity }),
        );
    }
    markers
}
