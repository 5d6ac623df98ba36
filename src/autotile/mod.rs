//! Auto-tile catalogue.
//!
//! Maps every structural role of a bordered rectangle (ground, four edges,
//! four inner corners, four outer corners) to an atlas pattern. The raw
//! [`AutoTileSpec`] is what gets loaded from RON/JSON; it must resolve into an
//! [`AutoTileConfig`] before any stamping starts.

use std::collections::BTreeMap;
use std::path::Path;

use bevy::math::IVec2;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TILE_SOURCE;
use crate::grid::TileCell;

/// Structural role of a tile inside a bordered room or corridor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileRole {
    Ground,
    /// Left wall
    L,
    /// Right wall
    R,
    /// Top wall
    T,
    /// Bottom wall
    B,
    InLt,
    InRt,
    InLb,
    InRb,
    OutLt,
    OutRt,
    OutLb,
    OutRb,
}

impl TileRole {
    pub const ALL: [TileRole; 13] = [
        TileRole::Ground,
        TileRole::L,
        TileRole::R,
        TileRole::T,
        TileRole::B,
        TileRole::InLt,
        TileRole::InRt,
        TileRole::InLb,
        TileRole::InRb,
        TileRole::OutLt,
        TileRole::OutRt,
        TileRole::OutLb,
        TileRole::OutRb,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Error type for tile catalogue loading and validation
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Tile role {0:?} has no pattern")]
    MissingRole(TileRole),
    #[error("Tile role {role:?} has invalid atlas coordinate {atlas}")]
    InvalidPattern { role: TileRole, atlas: IVec2 },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialisable, possibly incomplete catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoTileSpec {
    #[serde(default = "default_source_id")]
    pub source_id: u32,
    pub roles: BTreeMap<TileRole, IVec2>,
}

fn default_source_id() -> u32 {
    DEFAULT_TILE_SOURCE
}

impl Default for AutoTileSpec {
    fn default() -> Self {
        Self {
            source_id: DEFAULT_TILE_SOURCE,
            roles: BTreeMap::new(),
        }
    }
}

impl AutoTileSpec {
    /// Catalogue laid out as one atlas row, one column per role (in `TileRole::ALL` order)
    pub fn single_row(source_id: u32) -> Self {
        let roles = TileRole::ALL
            .iter()
            .enumerate()
            .map(|(i, role)| (*role, IVec2::new(i as i32, 0)))
            .collect();
        Self { source_id, roles }
    }

    pub fn with_role(mut self, role: TileRole, atlas: IVec2) -> Self {
        self.roles.insert(role, atlas);
        self
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from disk; `.json` files are parsed as JSON, anything else as RON
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&text),
            _ => Self::from_ron(&text),
        }
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn resolve(&self) -> Result<AutoTileConfig, ConfigError> {
        AutoTileConfig::from_spec(self)
    }
}

/// Validated catalogue: every role resolves to a pattern
#[derive(Debug, Clone, PartialEq)]
pub struct AutoTileConfig {
    patterns: [TileCell; 13],
}

impl AutoTileConfig {
    pub fn from_spec(spec: &AutoTileSpec) -> Result<Self, ConfigError> {
        let mut patterns = [TileCell::new(spec.source_id, IVec2::ZERO); 13];
        for role in TileRole::ALL {
            let atlas = *spec.roles.get(&role).ok_or(ConfigError::MissingRole(role))?;
            if atlas.x < 0 || atlas.y < 0 {
                return Err(ConfigError::InvalidPattern { role, atlas });
            }
            patterns[role.slot()] = TileCell::new(spec.source_id, atlas);
        }
        Ok(Self { patterns })
    }

    pub fn pattern(&self, role: TileRole) -> TileCell {
        self.patterns[role.slot()]
    }

    /// Reverse lookup, first role in `TileRole::ALL` order wins on duplicates
    pub fn role_of(&self, cell: TileCell) -> Option<TileRole> {
        TileRole::ALL
            .into_iter()
            .find(|role| self.patterns[role.slot()] == cell)
    }

    pub fn to_spec(&self) -> AutoTileSpec {
        let source_id = self.patterns[TileRole::Ground.slot()].source_id;
        let roles = TileRole::ALL
            .iter()
            .map(|role| (*role, self.patterns[role.slot()].atlas))
            .collect();
        AutoTileSpec { source_id, roles }
    }
}

impl TryFrom<&AutoTileSpec> for AutoTileConfig {
    type Error = ConfigError;

    fn try_from(spec: &AutoTileSpec) -> Result<Self, Self::Error> {
        Self::from_spec(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOGUE_RON: &str = r#"(
        source_id: 3,
        roles: {
            Ground: (0, 0),
            L: (1, 0),
            R: (2, 0),
            T: (3, 0),
            B: (4, 0),
            InLt: (0, 1),
            InRt: (1, 1),
            InLb: (2, 1),
            InRb: (3, 1),
            OutLt: (0, 2),
            OutRt: (1, 2),
            OutLb: (2, 2),
            OutRb: (3, 2),
        },
    )"#;

    #[test]
    fn test_single_row_resolves() {
        let config = AutoTileSpec::single_row(1).resolve().unwrap();
        assert_eq!(config.pattern(TileRole::Ground).atlas, IVec2::new(0, 0));
        assert_eq!(config.pattern(TileRole::OutRb).atlas, IVec2::new(12, 0));
        assert_eq!(config.pattern(TileRole::T).source_id, 1);
    }

    #[test]
    fn test_missing_role_rejected() {
        let mut spec = AutoTileSpec::single_row(1);
        spec.roles.remove(&TileRole::InLb);
        match spec.resolve() {
            Err(ConfigError::MissingRole(role)) => assert_eq!(role, TileRole::InLb),
            other => panic!("expected MissingRole, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_atlas_rejected() {
        let spec = AutoTileSpec::single_row(1).with_role(TileRole::B, IVec2::new(-1, 0));
        assert!(matches!(
            spec.resolve(),
            Err(ConfigError::InvalidPattern {
                role: TileRole::B,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_ron_catalogue() {
        let spec = AutoTileSpec::from_ron(CATALOGUE_RON).unwrap();
        assert_eq!(spec.source_id, 3);
        let config = spec.resolve().unwrap();
        assert_eq!(config.pattern(TileRole::InRb).atlas, IVec2::new(3, 1));
        assert_eq!(config.pattern(TileRole::OutLt), TileCell::new(3, IVec2::new(0, 2)));
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(matches!(
            AutoTileSpec::from_ron("(source_id: "),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AutoTileSpec::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_spec_roundtrip() {
        let config = AutoTileSpec::from_ron(CATALOGUE_RON)
            .unwrap()
            .resolve()
            .unwrap();
        let json = config.to_spec().to_json().unwrap();
        let restored = AutoTileSpec::from_json(&json).unwrap().resolve().unwrap();
        assert_eq!(restored, config);

        let ron_text = config.to_spec().to_ron().unwrap();
        let restored = AutoTileSpec::from_ron(&ron_text).unwrap().resolve().unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_role_of_reverse_lookup() {
        let config = AutoTileSpec::single_row(1).resolve().unwrap();
        assert_eq!(config.role_of(config.pattern(TileRole::R)), Some(TileRole::R));
        assert_eq!(config.role_of(TileCell::new(9, IVec2::ZERO)), None);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::Builder::new().suffix(".ron").tempfile().unwrap();
        file.write_all(CATALOGUE_RON.as_bytes()).unwrap();
        let spec = AutoTileSpec::load(file.path()).unwrap();
        assert_eq!(spec.roles.len(), 13);

        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        json_file.write_all(spec.to_json().unwrap().as_bytes()).unwrap();
        assert_eq!(AutoTileSpec::load(json_file.path()).unwrap(), spec);

        assert!(matches!(
            AutoTileSpec::load("/definitely/not/here.ron"),
            Err(ConfigError::Io(_))
        ));
    }
}
