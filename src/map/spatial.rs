use crate::region::Region;
use std::collections::HashMap;

/// Grid index over region bounding boxes for pointer hit-testing.
/// Each region is inserted into every cell its bbox overlaps, so a cell
/// lookup never misses a region; false positives are removed by the exact
/// containment test in [`RegionIndex::locate`].
pub struct RegionIndex {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl RegionIndex {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
        }
    }

    #[inline(always)]
    fn to_cell(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon / self.cell_size).floor() as i32;
        let y = (lat / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Index regions by position in the slice; regions without vertices are
    /// left out
    pub fn build(regions: &[Region], cell_size: f64) -> Self {
        let mut index = Self::new(cell_size);
        for (idx, region) in regions.iter().enumerate() {
            let Some((min_lon, min_lat, max_lon, max_lat)) = region.geometry.bbox() else {
                continue;
            };
            let min_cell = index.to_cell(min_lon, min_lat);
            let max_cell = index.to_cell(max_lon, max_lat);
            for y in min_cell.1..=max_cell.1 {
                for x in min_cell.0..=max_cell.0 {
                    index.cells.entry((x, y)).or_default().push(idx);
                }
            }
        }
        index
    }

    /// Index of the first region containing the point
    pub fn locate(&self, regions: &[Region], lon: f64, lat: f64) -> Option<usize> {
        self.cells
            .get(&self.to_cell(lon, lat))?
            .iter()
            .copied()
            .find(|&idx| regions.get(idx).is_some_and(|r| r.geometry.contains(lon, lat)))
    }
}
