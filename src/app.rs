use province_map::data::DatasetResult;
use province_map::map::{resolve_style, HoverTracker, MapRenderer, Viewport};
use province_map::region::{place_markers, Entity, Marker, Region};
use std::collections::HashMap;
use std::sync::mpsc::{Receiver, TryRecvError};
use tracing::{debug, info, warn};

/// Called with the resolved province name when a province is clicked.
/// Returns whether the selection is accepted.
pub type SelectionCallback = Box<dyn FnMut(&str) -> bool>;

/// State of the one-off dataset fetch
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Application state
pub struct App {
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub should_quit: bool,
    pub load_state: LoadState,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Whether the current press has moved, i.e. is a drag rather than a click
    dragged: bool,
    dataset_rx: Option<Receiver<DatasetResult>>,
    entities: Vec<Entity>,
    /// Occupant count per resolved province name
    occupancy: HashMap<String, usize>,
    markers: Vec<Marker>,
    hover: HoverTracker,
    selected: Option<String>,
    on_select: SelectionCallback,
}

/// Terminal cell to braille pixel, accounting for the 1-cell border
#[inline]
fn to_pixel(col: u16, row: u16) -> (i32, i32) {
    (col.saturating_sub(1) as i32 * 2, row.saturating_sub(1) as i32 * 4)
}

impl App {
    pub fn new(width: usize, height: usize, entities: Vec<Entity>, on_select: SelectionCallback) -> Self {
        let (pixel_width, pixel_height) = Self::pixel_size(width, height);
        let mut app = Self {
            viewport: Viewport::spain(pixel_width, pixel_height),
            map_renderer: MapRenderer::new(),
            should_quit: false,
            load_state: LoadState::Loading,
            last_mouse: None,
            dragged: false,
            dataset_rx: None,
            entities: Vec::new(),
            occupancy: HashMap::new(),
            markers: Vec::new(),
            hover: HoverTracker::default(),
            selected: None,
            on_select,
        };
        app.set_entities(entities);
        app
    }

    /// Braille gives 2x4 resolution per character. Account for the border
    /// (2 chars each way) and the status bar.
    fn pixel_size(width: usize, height: usize) -> (usize, usize) {
        (width.saturating_sub(2) * 2, height.saturating_sub(3) * 4)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        let (w, h) = Self::pixel_size(width, height);
        self.viewport.width = w;
        self.viewport.height = h;
    }

    /// Start waiting on a dataset fetch
    pub fn begin_load(&mut self, rx: Receiver<DatasetResult>) {
        self.load_state = LoadState::Loading;
        self.dataset_rx = Some(rx);
    }

    /// Pick up the fetch result if it has arrived
    pub fn poll_dataset(&mut self) {
        let Some(rx) = &self.dataset_rx else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                warn!("dataset loader exited without a result");
                self.dataset_rx = None;
                self.load_state = LoadState::Failed("dataset loader stopped unexpectedly".into());
                return;
            }
        };
        self.dataset_rx = None;
        match result {
            Ok(regions) => self.apply_dataset(&regions),
            Err(e) => self.load_state = LoadState::Failed(e.to_string()),
        }
    }

    /// Install a fetched region collection and frame it
    pub fn apply_dataset(&mut self, regions: &[Region]) {
        self.map_renderer.load(regions);
        self.load_state = LoadState::Ready;
        self.refresh_markers();
        self.restyle_all();
        self.fit_view();
    }

    /// Replace the occupant list; markers and occupancy styling follow
    pub fn set_entities(&mut self, entities: Vec<Entity>) {
        self.occupancy.clear();
        for entity in &entities {
            *self.occupancy.entry(entity.region_name.clone()).or_default() += 1;
        }
        self.entities = entities;
        self.refresh_markers();
        self.restyle_all();
    }

    fn refresh_markers(&mut self) {
        self.markers = place_markers(&self.entities, self.map_renderer.measurements());
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hover.current()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn occupants(&self, name: &str) -> usize {
        self.occupancy.get(name).copied().unwrap_or(0)
    }

    /// Recompute and apply the style of one province
    fn restyle(&mut self, name: &str) {
        let style = resolve_style(
            name,
            self.selected.as_deref(),
            self.hover.current(),
            self.occupants(name) > 0,
        );
        self.map_renderer.set_style(name, style);
    }

    fn restyle_all(&mut self) {
        let names: Vec<String> = self
            .map_renderer
            .province_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        for name in names {
            self.restyle(&name);
        }
    }

    /// Pointer moved to a terminal cell
    pub fn hover_at(&mut self, col: u16, row: u16) {
        let (px, py) = to_pixel(col, row);
        let (lon, lat) = self.viewport.unproject(px, py);
        match self.map_renderer.province_at(lon, lat).map(str::to_string) {
            Some(name) => self.enter(&name),
            None => self.clear_hover(),
        }
    }

    /// Pointer is over no province at all
    pub fn clear_hover(&mut self) {
        if let Some(prev) = self.hover.clear() {
            self.restyle(&prev);
        }
    }

    /// Pointer entered a province. The previous one is reset first even if
    /// its leave was never seen.
    pub fn enter(&mut self, name: &str) {
        if self.hover.current() == Some(name) {
            return;
        }
        if let Some(prev) = self.hover.enter(name) {
            self.restyle(&prev);
        }
        self.restyle(name);
    }

    pub fn leave(&mut self, name: &str) {
        if self.hover.leave(name) {
            self.restyle(name);
        }
    }

    /// Click on a terminal cell
    pub fn click_at(&mut self, col: u16, row: u16) {
        let (px, py) = to_pixel(col, row);
        let (lon, lat) = self.viewport.unproject(px, py);
        if let Some(name) = self.map_renderer.province_at(lon, lat).map(str::to_string) {
            self.activate(&name);
        }
    }

    /// Hand the province to the selection callback; only an accepted
    /// selection changes what is selected
    pub fn activate(&mut self, name: &str) {
        if !(self.on_select)(name) {
            debug!(province = name, "selection declined");
            return;
        }
        info!(province = name, "province selected");
        let previous = self.selected.replace(name.to_string());
        if let Some(prev) = previous.filter(|p| p != name) {
            self.restyle(&prev);
        }
        self.restyle(name);
    }

    /// Frame the whole dataset
    pub fn fit_view(&mut self) {
        if let Some((min_lon, min_lat, max_lon, max_lat)) = self.map_renderer.bounds() {
            self.viewport.fit_bounds(min_lon, min_lat, max_lon, max_lat);
        }
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        let (px, py) = to_pixel(col, row);
        self.viewport.zoom_in_at(px, py);
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        let (px, py) = to_pixel(col, row);
        self.viewport.zoom_out_at(px, py);
    }

    pub fn press(&mut self, col: u16, row: u16) {
        self.last_mouse = Some((col, row));
        self.dragged = false;
    }

    /// Pan by the mouse movement since the last event
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_col, last_row)) = self.last_mouse {
            let dx = last_col as i32 - col as i32;
            let dy = last_row as i32 - row as i32;
            if dx != 0 || dy != 0 {
                self.dragged = true;
                self.pan(dx * 2, dy * 4);
            }
        }
        self.last_mouse = Some((col, row));
    }

    /// Button released; returns true when the press was a click
    pub fn end_drag(&mut self) -> bool {
        let was_click = self.last_mouse.is_some() && !self.dragged;
        self.last_mouse = None;
        self.dragged = false;
        was_click
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.2}°{}, {:.2}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }
}
