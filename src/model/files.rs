//! On-disk data artifacts
//!
//! Scenic-area files accumulated over time come in three shapes:
//! `{"scenicAreas": [...]}` (current), a bare array (oldest), and
//! `{"results": [...]}` (written by an intermediate tool). The ambiguity is
//! resolved once here; everything downstream sees a plain `Vec<ScenicArea>`.

use crate::error::{Error, Result};
use crate::model::{ScenicArea, Spot};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The shapes a scenic-area file may take on disk
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScenicAreaFile {
    Wrapped {
        #[serde(rename = "scenicAreas")]
        scenic_areas: Vec<ScenicArea>,
    },
    Results {
        results: Vec<ScenicArea>,
    },
    Bare(Vec<ScenicArea>),
}

/// Canonical shape written back out
#[derive(Debug, Serialize)]
struct ScenicAreaFileOut<'a> {
    #[serde(rename = "scenicAreas")]
    scenic_areas: &'a [ScenicArea],
}

/// Load scenic areas from any of the supported file shapes
pub fn load_scenic_areas(path: &Path) -> Result<Vec<ScenicArea>> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::DataFile(format!("Failed to read {}: {}", path.display(), e)))?;

    let file: ScenicAreaFile = serde_json::from_str(&content)
        .map_err(|e| Error::DataFile(format!("Failed to parse {}: {}", path.display(), e)))?;

    Ok(match file {
        ScenicAreaFile::Wrapped { scenic_areas } => scenic_areas,
        ScenicAreaFile::Results { results } => results,
        ScenicAreaFile::Bare(areas) => areas,
    })
}

/// Write scenic areas back in the canonical `{"scenicAreas": [...]}` shape
pub fn save_scenic_areas(path: &Path, areas: &[ScenicArea]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::DataFile(format!("Failed to create directory: {}", e)))?;
    }

    let content = serde_json::to_string_pretty(&ScenicAreaFileOut {
        scenic_areas: areas,
    })?;
    fs::write(path, content)
        .map_err(|e| Error::DataFile(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok(())
}

/// Per-area spots artifact, written as `spots/<name>.json`
#[derive(Debug, Serialize, Deserialize)]
pub struct SpotsArtifact {
    pub results: Vec<Spot>,

    #[serde(rename = "scenicArea")]
    pub scenic_area: ScenicArea,

    /// Epoch milliseconds at write time
    pub timestamp: i64,
}

impl SpotsArtifact {
    /// Assemble an artifact stamped with the current time
    pub fn new(results: Vec<Spot>, scenic_area: ScenicArea) -> Self {
        Self {
            results,
            scenic_area,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Write this artifact under `dir`, named after the scenic area
    pub fn save(&self, dir: &Path) -> Result<std::path::PathBuf> {
        fs::create_dir_all(dir)
            .map_err(|e| Error::DataFile(format!("Failed to create directory: {}", e)))?;

        let path = dir.join(format!("{}.json", self.scenic_area.name));
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)
            .map_err(|e| Error::DataFile(format!("Failed to write {}: {}", path.display(), e)))?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_wrapped_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scenic-area.json");
        fs::write(
            &path,
            r#"{"scenicAreas": [{"name": "龙门石窟", "city": "洛阳", "level": "5A"}]}"#,
        )
        .unwrap();

        let areas = load_scenic_areas(&path).unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].name, "龙门石窟");
    }

    #[test]
    fn test_load_bare_array_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scenic-area.json");
        fs::write(&path, r#"[{"name": "西湖"}, {"name": "泰山"}]"#).unwrap();

        let areas = load_scenic_areas(&path).unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[1].name, "泰山");
    }

    #[test]
    fn test_load_results_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scenic-area.json");
        fs::write(&path, r#"{"results": [{"name": "黄山", "level": "5A"}]}"#).unwrap();

        let areas = load_scenic_areas(&path).unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].name, "黄山");
    }

    #[test]
    fn test_load_legacy_location_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scenic-area.json");
        fs::write(
            &path,
            r#"[{"name": "西湖", "location": {"lat": 30.24, "lng": 120.15}}]"#,
        )
        .unwrap();

        let areas = load_scenic_areas(&path).unwrap();
        assert!(areas[0].legacy_coordinates.is_some());
        assert!(areas[0].center.is_none());
    }

    #[test]
    fn test_save_load_round_trip_is_canonical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scenic-area.json");

        let areas = vec![ScenicArea::named("普陀山")];
        save_scenic_areas(&path, &areas).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("scenicAreas"));

        let loaded = load_scenic_areas(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "普陀山");
    }

    #[test]
    fn test_spots_artifact_save() {
        let dir = TempDir::new().unwrap();
        let artifact = SpotsArtifact::new(Vec::new(), ScenicArea::named("西湖"));
        let path = artifact.save(dir.path()).unwrap();

        assert!(path.ends_with("西湖.json"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("scenicArea"));
        assert!(content.contains("timestamp"));
    }
}
