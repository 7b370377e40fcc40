use glam::DVec2;
use std::f64::consts::PI;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 400.0;

/// Fraction of the canvas a fitted dataset may fill
const FIT_MARGIN: f64 = 0.9;

/// Web Mercator x/y in [0, 1] for a lon/lat pair
#[inline(always)]
fn to_unit(lon: f64, lat: f64) -> DVec2 {
    let lat_rad = lat.to_radians();
    DVec2::new(
        (lon + 180.0) / 360.0,
        (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0,
    )
}

#[inline(always)]
fn from_unit(unit: DVec2) -> (f64, f64) {
    let lon = unit.x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * unit.y)).sinh().atan().to_degrees();
    (lon, lat)
}

/// Visible map area in braille pixels
#[derive(Clone, Debug)]
pub struct Viewport {
    pub center_lon: f64,
    pub center_lat: f64,
    /// Higher = more zoomed in; 1.0 fits the whole world across the width
    pub zoom: f64,
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Peninsula and both archipelagos in view before any data arrives
    pub fn spain(width: usize, height: usize) -> Self {
        Self::new(-6.5, 36.5, 14.0, width, height)
    }

    #[inline(always)]
    fn scale(&self) -> f64 {
        self.zoom * self.width as f64
    }

    #[inline(always)]
    fn half_extent(&self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64) / 2.0
    }

    /// Pan by a braille pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let center = to_unit(self.center_lon, self.center_lat) + DVec2::new(dx as f64, dy as f64) / self.scale();
        let (lon, lat) = from_unit(center);
        self.center_lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
        self.center_lat = lat.clamp(-85.0, 85.0);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.5).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.5).max(MIN_ZOOM);
    }

    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.5);
    }

    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / 1.5);
    }

    /// Zoom keeping the point under (px, py) fixed on screen
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Center and zoom so the lon/lat box fills the canvas
    pub fn fit_bounds(&mut self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) {
        let lo = to_unit(min_lon, max_lat);
        let hi = to_unit(max_lon, min_lat);
        let (lon, lat) = from_unit((lo + hi) / 2.0);
        self.center_lon = lon;
        self.center_lat = lat;

        let span = (hi - lo).max(DVec2::splat(f64::EPSILON));
        let width = self.width.max(1) as f64;
        let fit_x = FIT_MARGIN / span.x;
        let fit_y = FIT_MARGIN * self.height as f64 / (width * span.y);
        self.zoom = fit_x.min(fit_y).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Braille pixel back to (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let offset = DVec2::new(px as f64, py as f64) - self.half_extent();
        from_unit(to_unit(self.center_lon, self.center_lat) + offset / self.scale())
    }

    /// (lon, lat) to braille pixel
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let offset = (to_unit(lon, lat) - to_unit(self.center_lon, self.center_lat)) * self.scale();
        let p = offset + self.half_extent();
        (p.x as i32, p.y as i32)
    }

    /// Whether a projected pixel box overlaps the canvas
    pub fn box_visible(&self, min: (i32, i32), max: (i32, i32)) -> bool {
        max.0 >= 0 && min.0 < self.width as i32 && max.1 >= 0 && min.1 < self.height as i32
    }

    /// Braille pixels per degree of longitude at the current zoom. Unlike
    /// `zoom` this does not depend on the canvas width.
    pub fn pixels_per_degree(&self) -> f64 {
        self.scale() / 360.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        assert_eq!(vp.project(0.0, 0.0), (50, 50));
    }

    #[test]
    fn test_unproject_round_trip() {
        let vp = Viewport::spain(200, 160);
        let (px, py) = vp.project(-3.7, 40.4);
        let (lon, lat) = vp.unproject(px, py);
        assert!((lon + 3.7).abs() < 0.2);
        assert!((lat - 40.4).abs() < 0.2);
    }

    #[test]
    fn test_pan() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        vp.pan(10, 0);
        assert!(vp.center_lon > 0.0);
        vp.pan(0, 10);
        assert!(vp.center_lat < 0.0);
    }

    #[test]
    fn test_fit_bounds_keeps_box_on_canvas() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 200, 160);
        vp.fit_bounds(-18.2, 27.6, 4.4, 43.8);

        for (lon, lat) in [(-18.2, 27.6), (4.4, 43.8), (-18.2, 43.8), (4.4, 27.6)] {
            let (px, py) = vp.project(lon, lat);
            assert!(vp.box_visible((px, py), (px, py)), "({lon}, {lat}) -> ({px}, {py})");
        }
        assert!(vp.zoom > 5.0);
    }

    #[test]
    fn test_pixels_per_degree_follows_width() {
        let narrow = Viewport::new(0.0, 0.0, 2.0, 180, 100);
        let wide = Viewport::new(0.0, 0.0, 1.0, 360, 100);
        assert_eq!(narrow.pixels_per_degree(), 1.0);
        assert_eq!(wide.pixels_per_degree(), 1.0);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut vp = Viewport::new(0.0, 0.0, MAX_ZOOM, 100, 100);
        vp.zoom_in();
        assert_eq!(vp.zoom, MAX_ZOOM);
    }
}
