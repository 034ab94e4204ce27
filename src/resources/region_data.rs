//! Geographic outlines used to seed the stippled map.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Coarse world outlines bundled with the binary.
const BUNDLED_REGIONS: &str = include_str!("../../assets/regions.json");

/// A closed ring of `[longitude, latitude]` pairs in degrees.
/// The closing edge back to the first point is implicit.
pub type Ring = Vec<[f32; 2]>;

/// A named group of disjoint polygons (e.g. a continent and its islands).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub polygons: Vec<Ring>,
}

/// All regions painted by the particle field.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionSet {
    pub regions: Vec<Region>,
}

impl RegionSet {
    /// The outlines compiled into the binary.
    pub fn bundled() -> Self {
        match Self::from_json(BUNDLED_REGIONS) {
            Ok(set) => set,
            Err(e) => {
                error!("Bundled region data is invalid: {}", e);
                Self::default()
            }
        }
    }

    /// Parses a region set from JSON text. Every coordinate must be a real
    /// longitude in [-180, 180] and latitude in [-90, 90].
    pub fn from_json(contents: &str) -> Result<Self, String> {
        let set: Self = serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse regions: {}", e))?;
        set.validate()?;
        Ok(set)
    }

    /// Rejects coordinates that fall off the globe.
    pub fn validate(&self) -> Result<(), String> {
        for region in &self.regions {
            for &[lon, lat] in region.polygons.iter().flatten() {
                if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
                    return Err(format!(
                        "Region '{}' has out-of-range coordinate [{}, {}]",
                        region.name, lon, lat
                    ));
                }
            }
        }
        Ok(())
    }

    /// Reads a region set from a JSON file.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read region file {:?}: {}", path, e))?;
        Self::from_json(&contents)
    }

    /// Builds a single-region set, mostly useful for tests and demos.
    pub fn single(name: impl Into<String>, polygons: Vec<Ring>) -> Self {
        Self {
            regions: vec![Region {
                name: name.into(),
                polygons,
            }],
        }
    }

    /// Iterates every polygon of every region.
    pub fn polygons(&self) -> impl Iterator<Item = &Ring> {
        self.regions.iter().flat_map(|r| r.polygons.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.polygons().next().is_none()
    }
}
