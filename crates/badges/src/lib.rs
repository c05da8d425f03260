//! Badge catalog and the at-most-once awarder.

use std::collections::HashMap;
use std::rc::Rc;

use chrono::{NaiveDate, Utc};
use common::{GardenError, GardenResult};
use counters::CounterRegistry;
use events::{Event, EventBus};
use handbook::Handbook;
use ledger::Ledger;
use log::info;
use serde::{Deserialize, Serialize};
use store::{keys, KeyValueStore};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Threshold gating one badge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Requirement {
    /// A named counter must reach `at_least`.
    Counter { key: &'static str, at_least: f64 },
    /// The species handbook must hold `at_least` distinct entries.
    SpeciesDiscovered { at_least: usize },
}

/// Immutable badge definition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BadgeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub requirement: Requirement,
}

/// Every badge the garden can award.
pub const CATALOG: [BadgeDef; 10] = [
    BadgeDef {
        id: "watering_master",
        name: "Watering Master",
        icon: "💧",
        description: "Water plots three times",
        requirement: Requirement::Counter {
            key: keys::WATERING_COUNT,
            at_least: 3.0,
        },
    },
    BadgeDef {
        id: "fertilizing_master",
        name: "Fertilizing Master",
        icon: "🌿",
        description: "Fertilize plots three times",
        requirement: Requirement::Counter {
            key: keys::FERTILIZING_COUNT,
            at_least: 3.0,
        },
    },
    BadgeDef {
        id: "weeding_master",
        name: "Weeding Master",
        icon: "🌱",
        description: "Weed plots three times",
        requirement: Requirement::Counter {
            key: keys::WEEDING_COUNT,
            at_least: 3.0,
        },
    },
    BadgeDef {
        id: "new_gardener",
        name: "Budding Gardener",
        icon: "🌱",
        description: "Adopt your first plot",
        requirement: Requirement::Counter {
            key: keys::ADOPTED_PLOTS_COUNT,
            at_least: 1.0,
        },
    },
    BadgeDef {
        id: "expert_gardener",
        name: "Gardening Expert",
        icon: "🌳",
        description: "Adopt five plots",
        requirement: Requirement::Counter {
            key: keys::ADOPTED_PLOTS_COUNT,
            at_least: 5.0,
        },
    },
    BadgeDef {
        id: "helpful",
        name: "Ever Helpful",
        icon: "🤝",
        description: "Share three gardening writeups",
        requirement: Requirement::Counter {
            key: keys::PROFILE_EXPERIENCE_SHARE_TIMES,
            at_least: 3.0,
        },
    },
    BadgeDef {
        id: "rich",
        name: "Big Spender",
        icon: "💰",
        description: "Recharge 100 yuan in total",
        requirement: Requirement::Counter {
            key: keys::TOTAL_RECHARGE,
            at_least: 100.0,
        },
    },
    BadgeDef {
        id: "very_rich",
        name: "High Roller",
        icon: "💎",
        description: "Recharge 1000 yuan in total",
        requirement: Requirement::Counter {
            key: keys::TOTAL_RECHARGE,
            at_least: 1000.0,
        },
    },
    BadgeDef {
        id: "gift_giver",
        name: "Rose Giver",
        icon: "🌹",
        description: "Send friends three gifts",
        requirement: Requirement::Counter {
            key: keys::GIFT_COUNT,
            at_least: 3.0,
        },
    },
    BadgeDef {
        id: "little_darwin",
        name: "Little Darwin",
        icon: "🔬",
        description: "Record three garden species",
        requirement: Requirement::SpeciesDiscovered { at_least: 3 },
    },
];

/// Persisted earned state for one badge.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeStatus {
    pub earned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earned_date: Option<String>,
}

/// Catalog entry merged with its earned state.
#[derive(Clone, Debug, PartialEq)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub earned: bool,
    pub earned_date: Option<String>,
}

impl Badge {
    fn from_def(def: &BadgeDef, status: Option<&BadgeStatus>) -> Self {
        Self {
            id: def.id.to_string(),
            name: def.name.to_string(),
            icon: def.icon.to_string(),
            description: def.description.to_string(),
            earned: status.map_or(false, |s| s.earned),
            earned_date: status.and_then(|s| s.earned_date.clone()),
        }
    }
}

/// Awards badges at most once and pays their bonus through the ledger.
pub struct BadgeBook {
    store: Rc<dyn KeyValueStore>,
    counters: CounterRegistry,
    handbook: Handbook,
    ledger: Rc<Ledger>,
    bus: Rc<EventBus>,
}

impl BadgeBook {
    /// Creates a badge book sharing `store` with the ledger.
    pub fn new(store: Rc<dyn KeyValueStore>, ledger: Rc<Ledger>, bus: Rc<EventBus>) -> Self {
        Self {
            counters: CounterRegistry::new(Rc::clone(&store)),
            handbook: Handbook::new(Rc::clone(&store)),
            store,
            ledger,
            bus,
        }
    }

    /// Looks up a catalog definition by id.
    pub fn definition(id: &str) -> Option<&'static BadgeDef> {
        CATALOG.iter().find(|b| b.id == id)
    }

    fn load_statuses(&self) -> HashMap<String, BadgeStatus> {
        self.store
            .read(keys::USER_BADGES)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn save_statuses(&self, statuses: &HashMap<String, BadgeStatus>) -> GardenResult<()> {
        let raw =
            serde_json::to_string(statuses).map_err(|e| GardenError::Parse(e.to_string()))?;
        self.store.write(keys::USER_BADGES, &raw)
    }

    /// The full catalog merged with earned state, in catalog order.
    pub fn all_badges(&self) -> Vec<Badge> {
        let statuses = self.load_statuses();
        CATALOG
            .iter()
            .map(|def| Badge::from_def(def, statuses.get(def.id)))
            .collect()
    }

    /// Number of badges earned so far.
    pub fn earned_count(&self) -> usize {
        self.load_statuses().values().filter(|s| s.earned).count()
    }

    fn requirement_met(&self, requirement: &Requirement) -> bool {
        match *requirement {
            // integer counters parse fine as decimals
            Requirement::Counter { key, at_least } => self.counters.get_decimal(key) >= at_least,
            Requirement::SpeciesDiscovered { at_least } => {
                self.handbook.discovered_count() >= at_least
            }
        }
    }

    /// Awards `badge_id` when its requirement is met and it has not been
    /// earned before. Unknown ids, unmet requirements and repeat calls all
    /// return `None`.
    pub fn check_and_award(&self, badge_id: &str) -> GardenResult<Option<Badge>> {
        self.check_and_award_on(badge_id, Utc::now().date_naive())
    }

    /// Date-injected body of [`BadgeBook::check_and_award`].
    pub fn check_and_award_on(
        &self,
        badge_id: &str,
        today: NaiveDate,
    ) -> GardenResult<Option<Badge>> {
        let Some(def) = Self::definition(badge_id) else {
            return Ok(None);
        };
        let mut statuses = self.load_statuses();
        if statuses.get(badge_id).map_or(false, |s| s.earned) {
            return Ok(None);
        }
        if !self.requirement_met(&def.requirement) {
            return Ok(None);
        }

        let earned_date = today.format(DATE_FORMAT).to_string();
        statuses.insert(
            badge_id.to_string(),
            BadgeStatus {
                earned: true,
                earned_date: Some(earned_date.clone()),
            },
        );
        self.save_statuses(&statuses)?;

        let bonus = self.ledger.config().badge_bonus;
        let outcome = self.ledger.apply_grant(bonus)?;
        info!("badge awarded: {}", def.id);
        self.bus.publish(&Event::BadgeUpdated {
            badge_id: def.id.to_string(),
            badge_name: def.name.to_string(),
            reward_stars: bonus.stars,
            reward_exp: bonus.exp,
            leveled_up: outcome.leveled_up,
        });

        Ok(Some(Badge {
            id: def.id.to_string(),
            name: def.name.to_string(),
            icon: def.icon.to_string(),
            description: def.description.to_string(),
            earned: true,
            earned_date: Some(earned_date),
        }))
    }

    /// Counts a watering and checks its badge.
    pub fn record_watering(&self) -> GardenResult<Option<Badge>> {
        self.counters.increment(keys::WATERING_COUNT)?;
        self.check_and_award("watering_master")
    }

    /// Counts a fertilizing and checks its badge.
    pub fn record_fertilizing(&self) -> GardenResult<Option<Badge>> {
        self.counters.increment(keys::FERTILIZING_COUNT)?;
        self.check_and_award("fertilizing_master")
    }

    /// Counts a weeding and checks its badge.
    pub fn record_weeding(&self) -> GardenResult<Option<Badge>> {
        self.counters.increment(keys::WEEDING_COUNT)?;
        self.check_and_award("weeding_master")
    }

    /// Counts a sent gift and checks its badge.
    pub fn record_gift(&self) -> GardenResult<Option<Badge>> {
        self.counters.increment(keys::GIFT_COUNT)?;
        self.check_and_award("gift_giver")
    }

    /// Counts an adopted plot and checks both adoption badges.
    pub fn record_adoption(&self) -> GardenResult<Vec<Badge>> {
        self.counters.increment(keys::ADOPTED_PLOTS_COUNT)?;
        let mut awarded = Vec::new();
        for id in ["new_gardener", "expert_gardener"] {
            if let Some(badge) = self.check_and_award(id)? {
                awarded.push(badge);
            }
        }
        Ok(awarded)
    }

    /// Accumulates a recharge amount and checks both recharge badges.
    pub fn record_recharge(&self, amount: f64) -> GardenResult<Vec<Badge>> {
        self.counters.add(keys::TOTAL_RECHARGE, amount)?;
        let mut awarded = Vec::new();
        for id in ["rich", "very_rich"] {
            if let Some(badge) = self.check_and_award(id)? {
                awarded.push(badge);
            }
        }
        Ok(awarded)
    }

    /// Counts a published writeup and checks its badge.
    pub fn record_experience_share(&self) -> GardenResult<Option<Badge>> {
        self.counters.increment(keys::PROFILE_EXPERIENCE_SHARE_TIMES)?;
        self.check_and_award("helpful")
    }

    /// Checks the species-collector badge against the handbook.
    pub fn check_species_collector(&self) -> GardenResult<Option<Badge>> {
        self.check_and_award("little_darwin")
    }
}
