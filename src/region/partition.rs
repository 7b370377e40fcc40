use super::{anchors_for, Anchor, LatLng, Polygon, Region, RegionGeometry};
use tracing::{debug, warn};

/// Split every archipelago province into one region per island group.
/// Returns a new collection; other provinces pass through unchanged.
pub fn split(regions: &[Region]) -> Vec<Region> {
    regions.iter().flat_map(split_region).collect()
}

/// Split a single region. Never returns an empty vec.
pub fn split_region(region: &Region) -> Vec<Region> {
    let anchors = match (anchors_for(&region.raw_name), &region.geometry) {
        (Some(anchors), RegionGeometry::MultiPolygon(_)) => anchors,
        _ => return vec![region.clone()],
    };

    let mut groups: Vec<Vec<Polygon>> = vec![Vec::new(); anchors.len()];
    for piece in region.geometry.polygons() {
        if let Some(idx) = nearest_anchor(piece_centroid(piece), anchors) {
            groups[idx].push(piece.clone());
        }
    }

    let islands: Vec<Region> = anchors
        .iter()
        .zip(groups)
        .filter(|(_, pieces)| !pieces.is_empty())
        .map(|(anchor, pieces)| Region {
            raw_name: region.raw_name.clone(),
            name: region.name.clone(),
            label: anchor.label.to_string(),
            key: format!("{}/{}", region.name, anchor.label),
            geometry: RegionGeometry::MultiPolygon(pieces),
        })
        .collect();

    if islands.is_empty() {
        warn!(province = %region.name, "archipelago has no pieces, keeping it whole");
        return vec![region.clone()];
    }

    debug!(province = %region.name, islands = islands.len(), "split archipelago");
    islands
}

/// Unweighted mean of the outer ring's vertices. Every vertex counts,
/// including the closing one. An empty ring gives the origin.
pub fn piece_centroid(piece: &Polygon) -> LatLng {
    let Some(outer) = piece.first().filter(|ring| !ring.is_empty()) else {
        return LatLng::default();
    };
    let n = outer.len() as f64;
    let (sum_lon, sum_lat) = outer
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &(lon, lat)| (sx + lon, sy + lat));
    LatLng::new(sum_lat / n, sum_lon / n)
}

/// Index of the anchor closest to `point` by squared distance; the first
/// anchor wins ties
fn nearest_anchor(point: LatLng, anchors: &[Anchor]) -> Option<usize> {
    let p = point.to_vec();
    anchors
        .iter()
        .map(|a| LatLng::new(a.lat, a.lng).to_vec().distance_squared(p))
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (idx, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((idx, d)),
        })
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Ring;

    fn square(lat: f64, lng: f64, size: f64) -> Ring {
        vec![
            (lng, lat),
            (lng + size, lat),
            (lng + size, lat + size),
            (lng, lat + size),
            (lng, lat),
        ]
    }

    fn island(lat: f64, lng: f64) -> Polygon {
        vec![square(lat - 0.05, lng - 0.05, 0.1)]
    }

    fn baleares(pieces: Vec<Polygon>) -> Region {
        Region::new("Illes Balears", RegionGeometry::MultiPolygon(pieces))
    }

    #[test]
    fn test_piece_centroid_is_vertex_mean() {
        // Closing vertex is counted twice, so the mean leans toward (0, 0)
        let c = piece_centroid(&vec![square(0.0, 0.0, 1.0)]);
        assert!((c.lat - 0.4).abs() < 1e-12);
        assert!((c.lng - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_piece_centroid_empty_ring() {
        assert_eq!(piece_centroid(&vec![vec![]]), LatLng::default());
        assert_eq!(piece_centroid(&vec![]), LatLng::default());
    }

    #[test]
    fn test_mainland_passes_through() {
        let region = Region::new(
            "Madrid",
            RegionGeometry::MultiPolygon(vec![island(40.4, -3.7), island(40.6, -3.9)]),
        );
        let out = split_region(&region);
        assert_eq!(out, vec![region]);
    }

    #[test]
    fn test_archipelago_polygon_passes_through() {
        let region = Region::new("Las Palmas", RegionGeometry::Polygon(island(28.0, -15.5)));
        assert_eq!(split_region(&region), vec![region]);
    }

    #[test]
    fn test_balearic_split_into_four() {
        let region = baleares(vec![
            island(39.6, 2.9),   // Mallorca
            island(39.9, 4.0),   // Menorca
            island(39.0, 1.4),   // Ibiza
            island(38.7, 1.5),   // Formentera
            island(39.15, 2.95), // Cabrera, nearest Mallorca
        ]);
        let out = split_region(&region);

        let labels: Vec<&str> = out.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Mallorca", "Menorca", "Ibiza", "Formentera"]);
        for r in &out {
            assert_eq!(r.name, "Illes Balears");
            assert_eq!(r.key, format!("Illes Balears/{}", r.label));
        }
        assert_eq!(out[0].geometry.polygons().len(), 2);
    }

    #[test]
    fn test_las_palmas_split_into_three() {
        let region = Region::new(
            "Las Palmas",
            RegionGeometry::MultiPolygon(vec![
                island(28.95, -13.55), // Lanzarote
                island(27.95, -15.60), // Gran Canaria
                island(28.40, -14.00), // Fuerteventura
                island(29.23, -13.50), // La Graciosa, nearest Lanzarote
            ]),
        );
        let out = split_region(&region);

        let labels: Vec<&str> = out.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Gran Canaria", "Lanzarote", "Fuerteventura"]);
        assert!(out.iter().all(|r| r.name == "Las Palmas"));
        assert_eq!(out[1].key, "Las Palmas/Lanzarote");
        assert_eq!(out[1].geometry.polygons().len(), 2);
    }

    #[test]
    fn test_anchor_without_pieces_is_omitted() {
        let region = baleares(vec![island(39.6, 2.9), island(39.0, 1.4)]);
        let out = split_region(&region);
        let labels: Vec<&str> = out.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Mallorca", "Ibiza"]);
    }

    #[test]
    fn test_degenerate_archipelago_kept_whole() {
        let region = baleares(vec![]);
        assert_eq!(split_region(&region), vec![region]);
    }

    #[test]
    fn test_split_preserves_vertices() {
        let regions = vec![
            baleares(vec![island(39.6, 2.9), island(39.9, 4.0), island(38.7, 1.5)]),
            Region::new(
                "Santa Cruz de Tenerife",
                RegionGeometry::MultiPolygon(vec![
                    island(28.3, -16.6),
                    island(28.7, -17.8),
                    island(28.1, -17.2),
                    island(27.7, -18.0),
                ]),
            ),
            Region::new("Soria", RegionGeometry::Polygon(island(41.7, -2.5))),
        ];
        let before: usize = regions.iter().map(|r| r.geometry.vertex_count()).sum();
        let out = split(&regions);
        let after: usize = out.iter().map(|r| r.geometry.vertex_count()).sum();

        assert_eq!(before, after);
        assert_eq!(out.len(), 3 + 4 + 1);
        assert_eq!(out.last().map(|r| r.name.as_str()), Some("Soria"));
    }

    #[test]
    fn test_nearest_anchor_tie_goes_first() {
        let anchors = [
            Anchor { label: "A", lat: 0.0, lng: 1.0 },
            Anchor { label: "B", lat: 0.0, lng: -1.0 },
        ];
        assert_eq!(nearest_anchor(LatLng::new(0.0, 0.0), &anchors), Some(0));
        assert_eq!(nearest_anchor(LatLng::new(0.0, -0.5), &anchors), Some(1));
        assert_eq!(nearest_anchor(LatLng::new(0.0, 0.0), &[]), None);
    }
}
