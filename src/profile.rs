//! Persisted player profile
//!
//! One JSON blob shared by the menu, shop, and settings collaborators:
//! best score, owned skins, active skin, blade color. The shop rule is
//! score-gated: a skin unlocks once the recorded high score covers its
//! price.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::skins::{DEFAULT_SKIN, SkinCatalog};

/// Fallback blade tint (white)
pub const DEFAULT_BLADE_COLOR: u32 = 0xFF_FF_FF;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub high_score: u64,
    pub unlocked_skins: Vec<String>,
    pub selected_skin: String,
    /// Blade tint as 0xRRGGBB
    pub blade_color: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            high_score: 0,
            unlocked_skins: vec![DEFAULT_SKIN.to_string()],
            selected_skin: DEFAULT_SKIN.to_string(),
            blade_color: DEFAULT_BLADE_COLOR,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("unknown skin id")]
    UnknownSkin,
    #[error("high score does not cover the price")]
    NotEnoughPoints,
    #[error("skin is still locked")]
    Locked,
}

impl Profile {
    /// Record a finished run. Returns true when the high score improved.
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }

    pub fn is_unlocked(&self, skin_id: &str) -> bool {
        self.unlocked_skins.iter().any(|id| id == skin_id)
    }

    /// Buy a skin; the high score is the currency and is not spent
    pub fn unlock_skin(
        &mut self,
        catalog: &SkinCatalog,
        skin_id: &str,
    ) -> Result<(), ProfileError> {
        let skin = catalog.get(skin_id).ok_or(ProfileError::UnknownSkin)?;
        if self.is_unlocked(skin_id) {
            return Ok(());
        }
        if self.high_score < skin.price {
            return Err(ProfileError::NotEnoughPoints);
        }
        self.unlocked_skins.push(skin_id.to_string());
        Ok(())
    }

    pub fn select_skin(&mut self, skin_id: &str) -> Result<(), ProfileError> {
        if !self.is_unlocked(skin_id) {
            return Err(ProfileError::Locked);
        }
        self.selected_skin = skin_id.to_string();
        Ok(())
    }

    /// Store a blade tint, masking stray high bits. Anything that does not
    /// survive the mask intact was not a color to begin with.
    pub fn set_blade_color(&mut self, color: u32) {
        self.blade_color = color & 0x00FF_FFFF;
    }

    /// Blade tint with the white fallback for profiles written before the
    /// field existed
    pub fn blade_color(&self) -> u32 {
        if self.blade_color > 0x00FF_FFFF {
            DEFAULT_BLADE_COLOR
        } else {
            self.blade_color
        }
    }
}
