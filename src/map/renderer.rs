use crate::braille::BrailleCanvas;
use crate::map::geometry::draw_ring;
use crate::map::projection::Viewport;
use crate::map::spatial::RegionIndex;
use crate::map::RegionStyle;
use crate::region::{measure, measure_all, split, Entity, LatLng, Marker, Measurement, Region};
use rayon::prelude::*;
use std::collections::HashMap;

/// Hit-test grid cell size in degrees
const INDEX_CELL_DEG: f64 = 0.5;

/// Below one character cell (2 braille px) per degree of longitude labels
/// pile up into noise; the fitted view of Spain sits well above this
const LABEL_MIN_PX_PER_DEG: f64 = 2.0;

/// Display settings for map layers
#[derive(Clone)]
pub struct DisplaySettings {
    pub show_labels: bool,
    pub show_markers: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_labels: true,
            show_markers: true,
        }
    }
}

/// A text label anchored at a character cell
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub col: u16,
    pub row: u16,
    pub text: String,
    pub style: RegionStyle,
}

/// One rendered frame: outlines plus the text drawn over them
pub struct MapLayers {
    pub outlines: BrailleCanvas,
    pub labels: Vec<Label>,
    /// (col, row, glyph) per marker
    pub markers: Vec<(u16, u16, char)>,
}

/// Province layer: the split regions, their measurements, and the style
/// currently applied to each province
pub struct MapRenderer {
    regions: Vec<Region>,
    /// Per resolved name, largest piece wins
    measurements: HashMap<String, Measurement>,
    /// Per rendered region, in `regions` order
    label_points: Vec<LatLng>,
    bboxes: Vec<Option<(f64, f64, f64, f64)>>,
    index: RegionIndex,
    styles: HashMap<String, RegionStyle>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
            measurements: HashMap::new(),
            label_points: Vec::new(),
            bboxes: Vec::new(),
            index: RegionIndex::new(INDEX_CELL_DEG),
            styles: HashMap::new(),
            settings: DisplaySettings::default(),
        }
    }

    /// Replace the layer with a freshly fetched collection. Archipelagos are
    /// split here; the input is left untouched.
    pub fn load(&mut self, source: &[Region]) {
        let regions = split(source);
        self.measurements = measure_all(&regions);
        self.label_points = regions.iter().map(|r| measure(r).center).collect();
        self.bboxes = regions.iter().map(|r| r.geometry.bbox()).collect();
        self.index = RegionIndex::build(&regions, INDEX_CELL_DEG);
        self.styles.clear();
        self.regions = regions;
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn measurements(&self) -> &HashMap<String, Measurement> {
        &self.measurements
    }

    /// Resolved province names, each once, in dataset order
    pub fn province_names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.regions
            .iter()
            .map(|r| r.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Resolved name of the province under (lon, lat)
    pub fn province_at(&self, lon: f64, lat: f64) -> Option<&str> {
        self.index
            .locate(&self.regions, lon, lat)
            .map(|idx| self.regions[idx].name.as_str())
    }

    /// `(min_lon, min_lat, max_lon, max_lat)` over every region
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.bboxes.iter().flatten().copied().reduce(|a, b| {
            (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3))
        })
    }

    /// Apply a style to every region of a province
    pub fn set_style(&mut self, name: &str, style: RegionStyle) {
        match style {
            RegionStyle::Default => {
                self.styles.remove(name);
            }
            _ => {
                self.styles.insert(name.to_string(), style);
            }
        }
    }

    pub fn style_of(&self, name: &str) -> RegionStyle {
        self.styles.get(name).copied().unwrap_or_default()
    }

    /// Render outlines, labels and markers for the viewport. `cols`/`rows`
    /// are the character dimensions of the target area.
    pub fn render(
        &self,
        cols: usize,
        rows: usize,
        viewport: &Viewport,
        markers: &[Marker],
        entities: &[Entity],
    ) -> MapLayers {
        let mut outlines = BrailleCanvas::new(cols, rows);

        // Projection is pure per region; drawing stays sequential so that
        // style priority decides shared cells
        let projected: Vec<(RegionStyle, Vec<Vec<(i32, i32)>>)> = self
            .regions
            .par_iter()
            .zip(self.bboxes.par_iter())
            .filter_map(|(region, bbox)| {
                let (min_lon, min_lat, max_lon, max_lat) = (*bbox)?;
                let min = viewport.project(min_lon, max_lat);
                let max = viewport.project(max_lon, min_lat);
                if !viewport.box_visible(min, max) {
                    return None;
                }
                let rings = region
                    .geometry
                    .rings()
                    .map(|ring| ring.iter().map(|&(lon, lat)| viewport.project(lon, lat)).collect())
                    .collect();
                Some((self.style_of(&region.name), rings))
            })
            .collect();

        for (style, rings) in &projected {
            for ring in rings {
                draw_ring(&mut outlines, ring, *style);
            }
        }

        let readable = viewport.pixels_per_degree() >= LABEL_MIN_PX_PER_DEG;
        let labels = if self.settings.show_labels && readable {
            self.labels(viewport, cols, rows)
        } else {
            Vec::new()
        };

        let markers = if self.settings.show_markers {
            marker_glyphs(viewport, markers, entities, cols, rows)
        } else {
            Vec::new()
        };

        MapLayers {
            outlines,
            labels,
            markers,
        }
    }

    /// Each region's label centred on its own bbox center, so islands are
    /// labelled individually
    fn labels(&self, viewport: &Viewport, cols: usize, rows: usize) -> Vec<Label> {
        self.regions
            .iter()
            .zip(&self.label_points)
            .filter_map(|(region, point)| {
                let (col, row) = to_cell(viewport, *point, cols, rows)?;
                let half = region.label.chars().count() as u16 / 2;
                Some(Label {
                    col: col.saturating_sub(half),
                    row,
                    text: region.label.clone(),
                    style: self.style_of(&region.name),
                })
            })
            .collect()
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Character cell for a position, `None` when off-canvas
fn to_cell(viewport: &Viewport, point: LatLng, cols: usize, rows: usize) -> Option<(u16, u16)> {
    let (px, py) = viewport.project(point.lng, point.lat);
    if px < 0 || py < 0 {
        return None;
    }
    let (col, row) = ((px / 2) as usize, (py / 4) as usize);
    (col < cols && row < rows).then_some((col as u16, row as u16))
}

/// Initial of the entity's display name at each marker position
fn marker_glyphs(
    viewport: &Viewport,
    markers: &[Marker],
    entities: &[Entity],
    cols: usize,
    rows: usize,
) -> Vec<(u16, u16, char)> {
    markers
        .iter()
        .filter_map(|marker| {
            let entity = entities.get(marker.entity)?;
            let glyph = entity
                .display_name
                .chars()
                .next()
                .map_or('●', |c| c.to_uppercase().next().unwrap_or(c));
            let (col, row) = to_cell(viewport, marker.position, cols, rows)?;
            Some((col, row, glyph))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{Polygon, RegionGeometry};

    fn island(lat: f64, lng: f64, size: f64) -> Polygon {
        vec![vec![
            (lng, lat),
            (lng + size, lat),
            (lng + size, lat + size),
            (lng, lat + size),
            (lng, lat),
        ]]
    }

    fn sample() -> Vec<Region> {
        vec![
            Region::new("Madrid", RegionGeometry::Polygon(island(40.0, -4.5, 1.0))),
            Region::new(
                "Illes Balears",
                RegionGeometry::MultiPolygon(vec![
                    island(39.3, 2.4, 0.9),  // Mallorca
                    island(39.8, 3.8, 0.4),  // Menorca
                    island(38.85, 1.25, 0.3), // Ibiza
                ]),
            ),
        ]
    }

    #[test]
    fn test_load_splits_and_measures() {
        let mut renderer = MapRenderer::new();
        renderer.load(&sample());

        assert_eq!(renderer.regions().len(), 4);
        assert_eq!(renderer.province_names(), ["Madrid", "Illes Balears"]);

        // Markers for the archipelago go to the largest island
        let balears = renderer.measurements()["Illes Balears"];
        assert!((balears.center.lat - 39.75).abs() < 1e-9);
        assert!((balears.center.lng - 2.85).abs() < 1e-9);
    }

    #[test]
    fn test_province_at_resolves_islands_to_province() {
        let mut renderer = MapRenderer::new();
        renderer.load(&sample());
        assert_eq!(renderer.province_at(4.0, 40.0), Some("Illes Balears"));
        assert_eq!(renderer.province_at(-4.0, 40.5), Some("Madrid"));
        assert_eq!(renderer.province_at(0.0, 0.0), None);
    }

    #[test]
    fn test_bounds() {
        let mut renderer = MapRenderer::new();
        assert_eq!(renderer.bounds(), None);
        renderer.load(&sample());
        let (min_lon, min_lat, max_lon, max_lat) = renderer.bounds().unwrap();
        assert_eq!((min_lon, min_lat), (-4.5, 38.85));
        assert!((max_lon - 4.2).abs() < 1e-9);
        assert_eq!(max_lat, 41.0);
    }

    #[test]
    fn test_fitted_view_shows_island_labels() {
        let mut renderer = MapRenderer::new();
        let mut regions = sample();
        regions.push(Region::new(
            "Santa Cruz de Tenerife",
            RegionGeometry::MultiPolygon(vec![island(28.0, -16.9, 0.5), island(27.6, -18.2, 0.2)]),
        ));
        renderer.load(&regions);

        // 80x24 terminal: 78x21 inner cells
        let mut viewport = Viewport::new(0.0, 0.0, 1.0, 156, 84);
        let (a, b, c, d) = renderer.bounds().unwrap();
        viewport.fit_bounds(a, b, c, d);

        let layers = renderer.render(78, 21, &viewport, &[], &[]);
        let texts: Vec<&str> = layers.labels.iter().map(|l| l.text.as_str()).collect();
        assert!(texts.contains(&"Mallorca"), "{texts:?}");
        assert!(texts.contains(&"Tenerife"), "{texts:?}");
    }

    #[test]
    fn test_world_view_hides_labels() {
        let mut renderer = MapRenderer::new();
        renderer.load(&sample());
        let viewport = Viewport::new(0.0, 0.0, 0.5, 156, 84);
        assert!(renderer.render(78, 21, &viewport, &[], &[]).labels.is_empty());
    }

    #[test]
    fn test_set_style_default_clears() {
        let mut renderer = MapRenderer::new();
        renderer.set_style("Madrid", RegionStyle::Hovered);
        assert_eq!(renderer.style_of("Madrid"), RegionStyle::Hovered);
        renderer.set_style("Madrid", RegionStyle::Default);
        assert_eq!(renderer.style_of("Madrid"), RegionStyle::Default);
    }

    #[test]
    fn test_render_draws_styled_outlines_and_markers() {
        let mut renderer = MapRenderer::new();
        renderer.load(&sample());
        renderer.set_style("Madrid", RegionStyle::Selected);

        let mut viewport = Viewport::new(0.0, 0.0, 1.0, 160, 96);
        let (a, b, c, d) = renderer.bounds().unwrap();
        viewport.fit_bounds(a, b, c, d);

        let entities = vec![Entity {
            id: "u1".into(),
            display_name: "ana".into(),
            avatar_ref: None,
            region_name: "Madrid".into(),
        }];
        let markers = vec![Marker { position: LatLng::new(40.5, -4.0), entity: 0 }];
        let layers = renderer.render(80, 24, &viewport, &markers, &entities);

        let selected_cells = (0..80)
            .flat_map(|c| (0..24).map(move |r| (c, r)))
            .filter(|&(c, r)| layers.outlines.cell(c, r).map(|(_, s)| s) == Some(RegionStyle::Selected))
            .count();
        assert!(selected_cells > 0);
        assert_eq!(layers.markers.len(), 1);
        assert_eq!(layers.markers[0].2, 'A');
    }
}
