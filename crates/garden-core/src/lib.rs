//! Garden engine entry point: service composition and the dashboard loop.

mod app;
mod service;

use std::rc::Rc;

use bracket_lib::prelude::*;

use common::GardenResult;
use events::EventBus;
use ledger::RewardConfig;
use store::FileStore;

pub use app::GardenApp;
pub use service::{ActionOutcome, GardenService, ProfileSummary};

const STORE_PATH: &str = "verdant_store.json";
const CONFIG_PATH: &str = "verdant.json";

/// Builds a [`GardenService`] over the on-disk store and configuration.
///
/// Both files are optional; a fresh install starts from defaults.
pub fn open_default_service() -> GardenResult<GardenService> {
    let store = Rc::new(FileStore::open(STORE_PATH)?);
    let bus = Rc::new(EventBus::new());
    let config = RewardConfig::load(CONFIG_PATH)?;
    Ok(GardenService::with_config(store, bus, config))
}

/// Runs the dashboard loop using [`bracket-lib`].
pub fn run() -> BError {
    let service = open_default_service()?;
    let context = BTermBuilder::simple(80, 25)?
        .with_title("Verdant")
        .build()?;
    main_loop(context, GardenApp::new(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{KeyValueStore, MemoryStore};
    use tasks::{Task, TaskKind, TaskPriority};

    fn service() -> GardenService {
        GardenService::new(Rc::new(MemoryStore::new()), Rc::new(EventBus::new()))
    }

    #[test]
    fn a_day_in_the_garden() {
        let service = service();

        // morning check-in, a chore, a writeup and a new species
        let check_in = service.check_in().unwrap();
        assert_eq!(check_in.progression.points, 2430);

        let mut task = Task::new(7, "Water bed 2", TaskKind::Watering, TaskPriority::High);
        task.reward = Some(80);
        service.complete_task(&task).unwrap();

        service.share_experience().unwrap();
        service
            .discover_species("ladybug", "Seven-spot Ladybird")
            .unwrap();

        // 2420 + 10 check-in + 80 task + 200 writeup + 50 discovery
        let state = service.ledger().load();
        assert_eq!(state.points, 2760);
        // 320 + 10 + 10 + 10 + 10 = 360 exp, still level 5
        assert_eq!(state.level, 5);
        assert_eq!(state.current_exp, 360);
    }

    #[test]
    fn service_state_survives_a_restart() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        {
            let service = GardenService::new(Rc::clone(&store), Rc::new(EventBus::new()));
            service.adopt_plot().unwrap();
            service.post_announcement().unwrap();
        }
        let service = GardenService::new(store, Rc::new(EventBus::new()));
        // 2420 + 500 adoption badge + 50 announcement
        assert_eq!(service.ledger().load().points, 2970);
        assert_eq!(service.badges().earned_count(), 1);
    }
}
