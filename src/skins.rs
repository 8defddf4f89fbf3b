//! Cosmetic skin catalog
//!
//! Skins are tagged records validated once when the catalog is built; the
//! sim only ever sees a slot index into the active skin's sprite list.
//! Asset keys are handed to the loader collaborator verbatim.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Id of the free skin every profile starts with
pub const DEFAULT_SKIN: &str = "default";

/// One purchasable cosmetic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinDef {
    pub id: String,
    pub name: String,
    /// High-score threshold needed to buy
    pub price: u64,
    /// Free skins start unlocked
    pub unlocked: bool,
    /// Sprite keys for the asset collaborator
    pub assets: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate skin id `{0}`")]
    DuplicateId(String),
    #[error("skin `{0}` has no assets")]
    EmptyAssets(String),
    #[error("default skin missing from catalog")]
    MissingDefault,
    #[error("default skin must be free and unlocked")]
    LockedDefault,
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Validated skin collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinCatalog {
    skins: Vec<SkinDef>,
}

impl SkinCatalog {
    /// Build a catalog, checking every rule up front so later lookups can
    /// stay infallible.
    pub fn new(skins: Vec<SkinDef>) -> Result<Self, CatalogError> {
        for (i, skin) in skins.iter().enumerate() {
            if skins[..i].iter().any(|other| other.id == skin.id) {
                return Err(CatalogError::DuplicateId(skin.id.clone()));
            }
            if skin.assets.is_empty() {
                return Err(CatalogError::EmptyAssets(skin.id.clone()));
            }
        }
        let Some(default) = skins.iter().find(|s| s.id == DEFAULT_SKIN) else {
            return Err(CatalogError::MissingDefault);
        };
        if default.price != 0 || !default.unlocked {
            return Err(CatalogError::LockedDefault);
        }
        Ok(Self { skins })
    }

    /// Parse a catalog from its JSON form, then validate it
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let skins: Vec<SkinDef> = serde_json::from_str(json)?;
        Self::new(skins)
    }

    /// The skins that ship with the game
    pub fn builtin() -> Self {
        // Built in code, so validation happens in tests rather than at
        // every startup
        Self {
            skins: vec![
                SkinDef {
                    id: DEFAULT_SKIN.to_string(),
                    name: "Classic Berry".to_string(),
                    price: 0,
                    unlocked: true,
                    assets: vec![
                        "cranberry".to_string(),
                        "blueberry".to_string(),
                        "renderBerry".to_string(),
                        "strawberry".to_string(),
                    ],
                },
                SkinDef {
                    id: "reka".to_string(),
                    name: "Reka Berry".to_string(),
                    price: 10_000,
                    unlocked: false,
                    assets: vec!["reka".to_string()],
                },
                SkinDef {
                    id: "littleBrother".to_string(),
                    name: "Little Brother".to_string(),
                    price: 10_000,
                    unlocked: false,
                    assets: vec!["littleBrother".to_string()],
                },
                SkinDef {
                    id: "kashvi".to_string(),
                    name: "Kashvi".to_string(),
                    price: 10_000,
                    unlocked: false,
                    assets: vec!["kashvi".to_string()],
                },
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&SkinDef> {
        self.skins.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkinDef> {
        self.skins.iter()
    }

    /// Sprite key for a sim-side skin slot, wrapping past the end so any
    /// slot value maps to something drawable
    pub fn asset_for_slot<'a>(&'a self, skin_id: &str, slot: u8) -> Option<&'a str> {
        let skin = self.get(skin_id)?;
        let idx = usize::from(slot) % skin.assets.len();
        Some(&skin.assets[idx])
    }
}
