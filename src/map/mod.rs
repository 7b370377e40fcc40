mod geometry;
mod hover;
mod projection;
mod renderer;
mod spatial;
mod style;

pub use hover::HoverTracker;
pub use projection::{Viewport, MAX_ZOOM, MIN_ZOOM};
pub use renderer::{DisplaySettings, Label, MapLayers, MapRenderer};
pub use style::{resolve_style, RegionStyle};
