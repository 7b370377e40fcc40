use crate::error::LoadError;
use crate::region::{Entity, Region};
use anyhow::{Context, Result};
use geojson::GeoJson;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use tracing::{info, warn};

/// Where the province GeoJSON comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetSource {
    Url(String),
    File(PathBuf),
}

impl DatasetSource {
    /// http(s) URLs are fetched, anything else is a file path
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            DatasetSource::Url(raw.to_string())
        } else {
            DatasetSource::File(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Url(url) => f.write_str(url),
            DatasetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub type DatasetResult = Result<Vec<Region>, LoadError>;

/// Fetch the dataset on a background thread. The receiver yields exactly one
/// result; there is no retry and no timeout.
pub fn spawn_fetch(source: DatasetSource) -> Receiver<DatasetResult> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(fetch_dataset(&source));
    });
    rx
}

/// Read the dataset and turn every areal feature into a region. Any failure,
/// transport or parse, is logged once here.
pub fn fetch_dataset(source: &DatasetSource) -> DatasetResult {
    info!(%source, "loading province dataset");
    let result = read_source(source).and_then(|mut bytes| parse_regions(&mut bytes));
    match &result {
        Ok(regions) => info!(count = regions.len(), "province dataset loaded"),
        Err(e) => warn!(%source, error = %e, "province dataset failed to load"),
    }
    result
}

fn read_source(source: &DatasetSource) -> Result<Vec<u8>, LoadError> {
    match source {
        DatasetSource::Url(url) => {
            let response = ureq::get(url).call()?;
            let mut body = Vec::new();
            response.into_reader().read_to_end(&mut body)?;
            Ok(body)
        }
        DatasetSource::File(path) => Ok(fs::read(path)?),
    }
}

/// Parse a GeoJSON feature collection. simd-json parses in place, hence the
/// mutable buffer.
pub fn parse_regions(bytes: &mut [u8]) -> DatasetResult {
    let geojson: GeoJson = simd_json::serde::from_slice(bytes)?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(LoadError::NotACollection);
    };

    let regions: Vec<Region> = collection
        .features
        .iter()
        .filter_map(Region::from_feature)
        .collect();

    let skipped = collection.features.len() - regions.len();
    if skipped > 0 {
        warn!(skipped, "features without polygon geometry ignored");
    }
    Ok(regions)
}

/// Load the occupant list. A missing file means nobody is on the map yet.
pub fn load_entities(path: &Path) -> Result<Vec<Entity>> {
    if !path.exists() {
        warn!(path = %path.display(), "entity file not found, starting with an empty map");
        return Ok(Vec::new());
    }
    let mut bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let entities: Vec<Entity> = simd_json::serde::from_slice(&mut bytes)
        .with_context(|| format!("parsing {}", path.display()))?;
    info!(count = entities.len(), "entities loaded");
    Ok(entities)
}
