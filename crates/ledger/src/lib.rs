//! Progression ledger: points, level and experience under reward grants.

mod config;

pub use config::RewardConfig;

use std::rc::Rc;

use chrono::{NaiveDate, Utc};
use common::{GardenError, GardenResult};
use events::{Event, EventBus};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use store::{keys, KeyValueStore};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A user's persistent progression snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progression {
    /// Spendable star balance.
    pub points: i64,
    pub level: i32,
    /// Experience toward the next level, always below the cap.
    pub current_exp: i32,
}

/// Stars and experience granted by one gameplay event.
///
/// Both amounts are non-negative; grants are the only way the ledger ever
/// moves upward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardGrant {
    pub stars: i64,
    pub exp: i32,
}

impl RewardGrant {
    /// Creates a grant of `stars` and `exp`.
    pub fn new(stars: i64, exp: i32) -> Self {
        Self { stars, exp }
    }
}

/// Result of applying a [`RewardGrant`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrantOutcome {
    pub progression: Progression,
    pub leveled_up: bool,
}

/// Result of a successful daily check-in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckInOutcome {
    pub progression: Progression,
    pub leveled_up: bool,
    pub check_in_days: i64,
}

/// Single writer for the progression keys.
///
/// Every mutation persists through the store and announces itself on the
/// event bus before returning. Failed operations leave both untouched.
pub struct Ledger {
    store: Rc<dyn KeyValueStore>,
    bus: Rc<EventBus>,
    config: RewardConfig,
}

impl Ledger {
    /// Creates a ledger with the default [`RewardConfig`].
    pub fn new(store: Rc<dyn KeyValueStore>, bus: Rc<EventBus>) -> Self {
        Self::with_config(store, bus, RewardConfig::default())
    }

    /// Creates a ledger with an explicit configuration.
    pub fn with_config(
        store: Rc<dyn KeyValueStore>,
        bus: Rc<EventBus>,
        config: RewardConfig,
    ) -> Self {
        Self { store, bus, config }
    }

    /// The active reward configuration.
    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Loads the persisted progression, substituting defaults per field.
    pub fn load(&self) -> Progression {
        Progression {
            points: self
                .store
                .read_i64(keys::PROFILE_POINTS, self.config.default_points),
            level: self
                .store
                .read_i64(keys::PROFILE_LEVEL, self.config.default_level as i64)
                as i32,
            current_exp: self.store.read_i64(
                keys::PROFILE_CURRENT_EXP,
                self.config.default_current_exp as i64,
            ) as i32,
        }
    }

    /// Adds `grant` to the ledger, rolling experience overflow into
    /// level-ups until the remainder sits below the cap.
    pub fn apply_grant(&self, grant: RewardGrant) -> GardenResult<GrantOutcome> {
        let state = self.load();
        let points = state.points + grant.stars;
        let mut current_exp = state.current_exp + grant.exp;
        let mut level = state.level;
        let mut leveled_up = false;
        while current_exp >= self.config.exp_cap {
            current_exp -= self.config.exp_cap;
            level += 1;
            leveled_up = true;
        }

        let progression = Progression {
            points,
            level,
            current_exp,
        };
        self.persist(&progression)?;
        debug!(
            "grant applied: stars +{} exp +{} -> {:?}",
            grant.stars, grant.exp, progression
        );
        self.bus.publish(&Event::PointsUpdated {
            points,
            level,
            current_exp,
            leveled_up,
        });
        Ok(GrantOutcome {
            progression,
            leveled_up,
        })
    }

    /// Removes `cost` stars, failing without any mutation when the balance
    /// is short.
    pub fn apply_spend(&self, cost: i64) -> GardenResult<Progression> {
        let state = self.load();
        if state.points < cost {
            return Err(GardenError::InsufficientFunds {
                cost,
                points: state.points,
            });
        }
        let progression = Progression {
            points: state.points - cost,
            ..state
        };
        self.persist(&progression)?;
        debug!("spend applied: stars -{} -> {:?}", cost, progression);
        self.bus.publish(&Event::PointsUpdated {
            points: progression.points,
            level: progression.level,
            current_exp: progression.current_exp,
            leveled_up: false,
        });
        Ok(progression)
    }

    /// Claims the daily check-in reward for the current UTC date.
    pub fn check_in(&self) -> GardenResult<CheckInOutcome> {
        self.check_in_on(Utc::now().date_naive())
    }

    /// Date-injected body of [`Ledger::check_in`].
    ///
    /// Idempotent per calendar day: a second call with the same `today`
    /// fails with [`GardenError::AlreadyCheckedIn`] and mutates nothing.
    pub fn check_in_on(&self, today: NaiveDate) -> GardenResult<CheckInOutcome> {
        let today = today.format(DATE_FORMAT).to_string();
        if self.store.read(keys::LAST_CHECK_IN_DATE).as_deref() == Some(today.as_str()) {
            return Err(GardenError::AlreadyCheckedIn);
        }

        let outcome = self.apply_grant(self.config.check_in_bonus)?;
        let days = self
            .store
            .read_i64(keys::PROFILE_CHECK_IN_DAYS, self.config.default_check_in_days)
            + 1;
        self.store.write(keys::PROFILE_CHECK_IN_DAYS, &days.to_string())?;
        self.store.write(keys::LAST_CHECK_IN_DATE, &today)?;
        info!("check-in recorded for {} (day {})", today, days);
        Ok(CheckInOutcome {
            progression: outcome.progression,
            leveled_up: outcome.leveled_up,
            check_in_days: days,
        })
    }

    fn persist(&self, p: &Progression) -> GardenResult<()> {
        self.store.write(keys::PROFILE_POINTS, &p.points.to_string())?;
        self.store.write(keys::PROFILE_LEVEL, &p.level.to_string())?;
        self.store
            .write(keys::PROFILE_CURRENT_EXP, &p.current_exp.to_string())
    }
}
