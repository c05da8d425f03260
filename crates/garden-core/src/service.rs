//! Gameplay actions composing the ledger, counters and badges.
//!
//! Every in-app event that touches the progression keys goes through one
//! method here, so each reward is granted and each counter advanced exactly
//! once per action.

use std::rc::Rc;

use badges::{Badge, BadgeBook};
use chrono::Utc;
use common::{GardenError, GardenResult};
use counters::CounterRegistry;
use events::EventBus;
use handbook::Handbook;
use ledger::{CheckInOutcome, GrantOutcome, Ledger, Progression, RewardConfig, RewardGrant};
use log::debug;
use store::{keys, KeyValueStore};
use tasks::{Task, TaskKind};

const DEFAULT_NAME: &str = "Garden Keeper";
const MAX_NAME_LEN: usize = 20;

/// Profile summary for display surfaces.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileSummary {
    pub name: String,
    pub progression: Progression,
    pub exp_cap: i32,
    pub check_in_days: i64,
    pub completed_tasks: i64,
    pub experience_shares: i64,
    pub proposals: i64,
    pub name_cards: i64,
}

/// Outcome of a reward-granting gameplay action.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionOutcome {
    /// The grant paid for the action itself, badge bonuses excluded.
    pub grant: RewardGrant,
    /// Progression after the action, badge bonuses included.
    pub progression: Progression,
    /// Whether the action's own grant caused a level-up.
    pub leveled_up: bool,
    /// Badges newly unlocked by the action.
    pub awarded: Vec<Badge>,
}

/// Facade over the progression subsystems.
pub struct GardenService {
    store: Rc<dyn KeyValueStore>,
    bus: Rc<EventBus>,
    ledger: Rc<Ledger>,
    counters: CounterRegistry,
    handbook: Handbook,
    badges: BadgeBook,
}

impl GardenService {
    /// Creates a service with the default [`RewardConfig`].
    pub fn new(store: Rc<dyn KeyValueStore>, bus: Rc<EventBus>) -> Self {
        Self::with_config(store, bus, RewardConfig::default())
    }

    /// Creates a service with an explicit configuration.
    pub fn with_config(
        store: Rc<dyn KeyValueStore>,
        bus: Rc<EventBus>,
        config: RewardConfig,
    ) -> Self {
        let ledger = Rc::new(Ledger::with_config(
            Rc::clone(&store),
            Rc::clone(&bus),
            config,
        ));
        Self {
            counters: CounterRegistry::new(Rc::clone(&store)),
            handbook: Handbook::new(Rc::clone(&store)),
            badges: BadgeBook::new(Rc::clone(&store), Rc::clone(&ledger), Rc::clone(&bus)),
            ledger,
            store,
            bus,
        }
    }

    /// The shared event bus.
    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    /// The progression ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The badge catalog and earned state.
    pub fn badges(&self) -> &BadgeBook {
        &self.badges
    }

    /// The species handbook.
    pub fn handbook(&self) -> &Handbook {
        &self.handbook
    }

    /// The gameplay counters.
    pub fn counters(&self) -> &CounterRegistry {
        &self.counters
    }

    /// The active reward configuration.
    pub fn config(&self) -> &RewardConfig {
        self.ledger.config()
    }

    /// Snapshot of the profile for display.
    pub fn profile(&self) -> ProfileSummary {
        let config = self.config();
        ProfileSummary {
            name: self
                .store
                .read(keys::PROFILE_NAME)
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            progression: self.ledger.load(),
            exp_cap: config.exp_cap,
            check_in_days: self
                .store
                .read_i64(keys::PROFILE_CHECK_IN_DAYS, config.default_check_in_days),
            completed_tasks: self
                .store
                .read_i64(keys::PROFILE_COMPLETED_TASKS, config.default_completed_tasks),
            experience_shares: self.store.read_i64(keys::PROFILE_EXPERIENCE_SHARE_TIMES, 0),
            proposals: self.store.read_i64(keys::PROFILE_PROPOSAL_TIMES, 0),
            name_cards: self.store.read_i64(keys::NAME_CARDS, 0),
        }
    }

    fn finish(
        &self,
        grant: RewardGrant,
        outcome: GrantOutcome,
        awarded: Vec<Badge>,
    ) -> ActionOutcome {
        // badge bonuses move the ledger after the base grant
        let progression = if awarded.is_empty() {
            outcome.progression
        } else {
            self.ledger.load()
        };
        ActionOutcome {
            grant,
            progression,
            leveled_up: outcome.leveled_up,
            awarded,
        }
    }

    /// Marks `task` complete: pays its posted reward (or the fallback),
    /// bumps the completed-task stat and advances the matching care
    /// counter for chore-type tasks.
    pub fn complete_task(&self, task: &Task) -> GardenResult<ActionOutcome> {
        let config = self.config();
        let grant = RewardGrant::new(
            task.reward.unwrap_or(config.task_fallback.stars),
            config.task_fallback.exp,
        );
        let outcome = self.ledger.apply_grant(grant)?;

        let done = self
            .store
            .read_i64(keys::PROFILE_COMPLETED_TASKS, config.default_completed_tasks)
            + 1;
        self.store
            .write(keys::PROFILE_COMPLETED_TASKS, &done.to_string())?;
        debug!("task {} completed ({} total)", task.id, done);

        let awarded = match task.kind {
            TaskKind::Watering => self.badges.record_watering()?.into_iter().collect(),
            TaskKind::Fertilizing => self.badges.record_fertilizing()?.into_iter().collect(),
            TaskKind::Weeding => self.badges.record_weeding()?.into_iter().collect(),
            _ => Vec::new(),
        };
        Ok(self.finish(grant, outcome, awarded))
    }

    /// Posts a help-wanted task, escrowing its reward up front.
    pub fn post_task(&self, reward: i64) -> GardenResult<Progression> {
        self.ledger.apply_spend(reward)
    }

    /// Waters a plot directly (outside any task).
    pub fn water_plot(&self) -> GardenResult<Option<Badge>> {
        self.badges.record_watering()
    }

    /// Fertilizes a plot directly.
    pub fn fertilize_plot(&self) -> GardenResult<Option<Badge>> {
        self.badges.record_fertilizing()
    }

    /// Weeds a plot directly.
    pub fn weed_plot(&self) -> GardenResult<Option<Badge>> {
        self.badges.record_weeding()
    }

    /// Sends a gift to a friend.
    pub fn send_gift(&self) -> GardenResult<Option<Badge>> {
        self.badges.record_gift()
    }

    /// Adopts a free plot.
    pub fn adopt_plot(&self) -> GardenResult<Vec<Badge>> {
        self.badges.record_adoption()
    }

    /// Buys responsibility for a plot.
    pub fn purchase_plot_responsibility(&self) -> GardenResult<Progression> {
        self.ledger.apply_spend(self.config().responsibility_cost)
    }

    /// Converts a cash recharge into stars and recharge-tier progress.
    pub fn recharge(&self, yuan: f64) -> GardenResult<ActionOutcome> {
        if yuan <= 0.0 {
            return Err(GardenError::InvalidOperation(
                "recharge amount must be positive".to_string(),
            ));
        }
        let stars = (yuan * self.config().stars_per_yuan as f64).round() as i64;
        let grant = RewardGrant::new(stars, 0);
        let outcome = self.ledger.apply_grant(grant)?;
        let awarded = self.badges.record_recharge(yuan)?;
        Ok(self.finish(grant, outcome, awarded))
    }

    /// Publishes a gardening writeup.
    pub fn share_experience(&self) -> GardenResult<ActionOutcome> {
        let grant = self.config().experience_share;
        let outcome = self.ledger.apply_grant(grant)?;
        let awarded = self.badges.record_experience_share()?.into_iter().collect();
        Ok(self.finish(grant, outcome, awarded))
    }

    /// Publishes a community proposal.
    pub fn publish_proposal(&self) -> GardenResult<ActionOutcome> {
        let grant = self.config().proposal;
        let outcome = self.ledger.apply_grant(grant)?;
        let times = self.store.read_i64(keys::PROFILE_PROPOSAL_TIMES, 0) + 1;
        self.store
            .write(keys::PROFILE_PROPOSAL_TIMES, &times.to_string())?;
        Ok(self.finish(grant, outcome, Vec::new()))
    }

    /// Posts a bulletin announcement.
    pub fn post_announcement(&self) -> GardenResult<ActionOutcome> {
        let grant = self.config().announcement;
        let outcome = self.ledger.apply_grant(grant)?;
        Ok(self.finish(grant, outcome, Vec::new()))
    }

    /// Records a species sighting. The first sighting of a species pays the
    /// discovery reward; repeats return `None` and change nothing.
    pub fn discover_species(
        &self,
        species_id: &str,
        name: &str,
    ) -> GardenResult<Option<ActionOutcome>> {
        if !self
            .handbook
            .record_discovery(species_id, name, Utc::now().date_naive())?
        {
            return Ok(None);
        }
        let grant = self.config().species_discovery;
        let outcome = self.ledger.apply_grant(grant)?;
        let awarded = self.badges.check_species_collector()?.into_iter().collect();
        Ok(Some(self.finish(grant, outcome, awarded)))
    }

    /// Claims the daily check-in reward.
    pub fn check_in(&self) -> GardenResult<CheckInOutcome> {
        self.ledger.check_in()
    }

    /// Buys one name card from the shop.
    pub fn buy_name_card(&self) -> GardenResult<Progression> {
        let progression = self.ledger.apply_spend(self.config().name_card_cost)?;
        let cards = self.store.read_i64(keys::NAME_CARDS, 0) + 1;
        self.store.write(keys::NAME_CARDS, &cards.to_string())?;
        Ok(progression)
    }

    /// Renames the profile, consuming one name card. Returns the cards
    /// remaining afterwards.
    pub fn rename(&self, new_name: &str) -> GardenResult<i64> {
        let name = new_name.trim();
        if name.is_empty() {
            return Err(GardenError::InvalidOperation(
                "name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(GardenError::InvalidOperation(format!(
                "name longer than {} characters",
                MAX_NAME_LEN
            )));
        }
        let cards = self.store.read_i64(keys::NAME_CARDS, 0);
        if cards == 0 {
            return Err(GardenError::InvalidOperation(
                "no name card available".to_string(),
            ));
        }
        self.store.write(keys::NAME_CARDS, &(cards - 1).to_string())?;
        self.store.write(keys::PROFILE_NAME, name)?;
        Ok(cards - 1)
    }
}
