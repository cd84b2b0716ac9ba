//! Battle configuration.
//!
//! Tunables shared by every resolution pass. Games build one `BattleConfig`
//! at startup (or deserialize it) and hand it to the resolver context.

use serde::{Deserialize, Serialize};

/// Rule constants for a battle.
///
/// ## Example
///
/// ```
/// use pet_battle::core::BattleConfig;
///
/// let config = BattleConfig::default().with_powerup_limit(4);
/// assert_eq!(config.powerup_limit, 4);
/// assert_eq!(config.max_anger, 100);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Power-up stages are clamped to `[-powerup_limit, powerup_limit]`.
    pub powerup_limit: i32,

    /// Default lower anger bound for a fresh battle pet.
    pub min_anger: i32,

    /// Default upper anger bound for a fresh battle pet.
    pub max_anger: i32,

    /// Anger a pet enters battle with.
    pub initial_anger: i32,

    /// Fraction of anger kept when a unit switches pets.
    pub pet_change_anger_ratio: f64,

    /// Maximum nesting of buff on-add/on-remove effect chains.
    pub max_hook_depth: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            powerup_limit: 6,
            min_anger: 0,
            max_anger: 100,
            initial_anger: 15,
            pet_change_anger_ratio: 0.8,
            max_hook_depth: 8,
        }
    }
}

impl BattleConfig {
    /// Set the power-up stage limit.
    #[must_use]
    pub fn with_powerup_limit(mut self, limit: i32) -> Self {
        self.powerup_limit = limit;
        self
    }

    /// Set default anger bounds.
    #[must_use]
    pub fn with_anger_bounds(mut self, min: i32, max: i32) -> Self {
        self.min_anger = min;
        self.max_anger = max;
        self
    }

    /// Set starting anger.
    #[must_use]
    pub fn with_initial_anger(mut self, anger: i32) -> Self {
        self.initial_anger = anger;
        self
    }

    /// Set the hook nesting limit.
    #[must_use]
    pub fn with_max_hook_depth(mut self, depth: u32) -> Self {
        self.max_hook_depth = depth;
        self
    }
}
