//! Reward and cost tables with the live defaults baked in.

use common::{GardenError, GardenResult};
use serde::Deserialize;

use crate::RewardGrant;

/// Tunable reward amounts, profile defaults and shop costs.
///
/// `Default` carries the live values; an optional JSON document can
/// override any subset of fields.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RewardConfig {
    /// Experience needed for one level; overflow rolls into level-ups.
    pub exp_cap: i32,
    pub default_points: i64,
    pub default_level: i32,
    pub default_current_exp: i32,
    pub default_completed_tasks: i64,
    pub default_check_in_days: i64,
    /// Bonus paid when any badge unlocks.
    pub badge_bonus: RewardGrant,
    pub check_in_bonus: RewardGrant,
    /// Paid for tasks that carry no posted reward.
    pub task_fallback: RewardGrant,
    pub experience_share: RewardGrant,
    pub proposal: RewardGrant,
    pub announcement: RewardGrant,
    pub species_discovery: RewardGrant,
    /// Stars to become a plot's responsible gardener.
    pub responsibility_cost: i64,
    pub name_card_cost: i64,
    /// Stars credited per yuan recharged.
    pub stars_per_yuan: i64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            exp_cap: 500,
            default_points: 2420,
            default_level: 5,
            default_current_exp: 320,
            default_completed_tasks: 42,
            default_check_in_days: 129,
            badge_bonus: RewardGrant::new(500, 50),
            check_in_bonus: RewardGrant::new(10, 10),
            task_fallback: RewardGrant::new(50, 10),
            experience_share: RewardGrant::new(200, 10),
            proposal: RewardGrant::new(100, 10),
            announcement: RewardGrant::new(50, 5),
            species_discovery: RewardGrant::new(50, 10),
            responsibility_cost: 2000,
            name_card_cost: 1000,
            stars_per_yuan: 10,
        }
    }
}

impl RewardConfig {
    /// Parses a configuration document.
    pub fn from_json_str(json: &str) -> GardenResult<Self> {
        serde_json::from_str(json).map_err(|e| GardenError::Parse(e.to_string()))
    }

    /// Loads the configuration from `path` if the file exists.
    pub fn load(path: &str) -> GardenResult<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Self::from_json_str(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_live_values() {
        let cfg = RewardConfig::default();
        assert_eq!(cfg.exp_cap, 500);
        assert_eq!(cfg.default_points, 2420);
        assert_eq!(cfg.badge_bonus, RewardGrant::new(500, 50));
        assert_eq!(cfg.responsibility_cost, 2000);
    }

    #[test]
    fn json_overrides_a_subset() {
        let cfg =
            RewardConfig::from_json_str(r#"{"expCap": 1000, "badgeBonus": {"stars": 5, "exp": 1}}"#)
                .unwrap();
        assert_eq!(cfg.exp_cap, 1000);
        assert_eq!(cfg.badge_bonus, RewardGrant::new(5, 1));
        // untouched fields keep their defaults
        assert_eq!(cfg.default_points, 2420);
    }

    #[test]
    fn load_nonexistent_returns_default() {
        let cfg = RewardConfig::load("/no/such/verdant.json").unwrap();
        assert_eq!(cfg, RewardConfig::default());
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(RewardConfig::from_json_str("{oops").is_err());
    }
}
