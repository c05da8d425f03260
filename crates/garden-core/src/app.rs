//! Interactive dashboard driving the garden service.

use std::cell::RefCell;
use std::rc::Rc;

use bracket_lib::prelude::*;
use events::{Event, Topic};
use tasks::{Task, TaskKind, TaskPriority};
use ui::{DashboardView, UIContext};

use crate::service::GardenService;

/// Sightings offered by the record-species key, cycled in order.
const SPECIES: [(&str, &str); 6] = [
    ("ladybug", "Seven-spot Ladybird"),
    ("earthworm", "Common Earthworm"),
    ("white_butterfly", "Cabbage White"),
    ("bumblebee", "Buff-tailed Bumblebee"),
    ("snail", "Garden Snail"),
    ("sparrow", "Tree Sparrow"),
];

/// Chores offered by the complete-task key, cycled in order.
const CHORES: [TaskKind; 4] = [
    TaskKind::Watering,
    TaskKind::Weeding,
    TaskKind::Fertilizing,
    TaskKind::Harvesting,
];

const DEMO_RECHARGE_YUAN: f64 = 30.0;

/// Terminal front end over [`GardenService`].
pub struct GardenApp {
    service: GardenService,
    ui: UIContext,
    /// Toast lines queued by bus subscribers, drained into the log.
    notices: Rc<RefCell<Vec<String>>>,
    next_species: usize,
    next_chore: usize,
}

impl GardenApp {
    /// Wraps `service` and subscribes the toast handlers.
    pub fn new(service: GardenService) -> Self {
        let notices = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&notices);
        service.bus().subscribe(Topic::PointsUpdated, move |event| {
            if let Event::PointsUpdated {
                leveled_up: true,
                level,
                ..
            } = event
            {
                sink.borrow_mut().push(format!("Level up! Now Lv.{}", level));
            }
        });

        let sink = Rc::clone(&notices);
        service.bus().subscribe(Topic::BadgeUpdated, move |event| {
            if let Event::BadgeUpdated {
                badge_name,
                reward_stars,
                reward_exp,
                ..
            } = event
            {
                sink.borrow_mut().push(format!(
                    "New badge: {} (+{} stars, +{} exp)",
                    badge_name, reward_stars, reward_exp
                ));
            }
        });

        Self {
            service,
            ui: UIContext::default(),
            notices,
            next_species: 0,
            next_chore: 0,
        }
    }

    fn log(&mut self, msg: &str) {
        self.ui.add_log(msg).ok();
    }

    fn log_result<T>(&mut self, result: common::GardenResult<T>, success: &str) {
        match result {
            Ok(_) => self.log(success),
            Err(e) => {
                let msg = format!("{}", e);
                self.log(&msg);
            }
        }
    }

    fn next_chore_task(&mut self) -> Task {
        let kind = CHORES[self.next_chore % CHORES.len()];
        self.next_chore += 1;
        Task::new(
            self.next_chore as u64,
            "Community chore",
            kind,
            TaskPriority::Medium,
        )
    }

    fn handle_key(&mut self, ctx: &mut BTerm, key: VirtualKeyCode) {
        use VirtualKeyCode::*;
        match key {
            W => {
                let result = self.service.water_plot();
                self.log_result(result, "Watered a plot.");
            }
            F => {
                let result = self.service.fertilize_plot();
                self.log_result(result, "Fertilized a plot.");
            }
            E => {
                let result = self.service.weed_plot();
                self.log_result(result, "Weeded a plot.");
            }
            G => {
                let result = self.service.send_gift();
                self.log_result(result, "Sent a friend a gift.");
            }
            A => {
                let result = self.service.adopt_plot();
                self.log_result(result, "Adopted a plot.");
            }
            P => match self.service.purchase_plot_responsibility() {
                Ok(p) => {
                    let msg = format!("Plot responsibility purchased ({} stars left).", p.points);
                    self.log(&msg);
                }
                Err(e) => {
                    let msg = format!("{}", e);
                    self.log(&msg);
                }
            },
            T => {
                let task = self.next_chore_task();
                match self.service.complete_task(&task) {
                    Ok(outcome) => {
                        let msg = format!(
                            "Chore complete: +{} stars, +{} exp.",
                            outcome.grant.stars, outcome.grant.exp
                        );
                        self.log(&msg);
                    }
                    Err(e) => {
                        let msg = format!("{}", e);
                        self.log(&msg);
                    }
                }
            }
            R => match self.service.recharge(DEMO_RECHARGE_YUAN) {
                Ok(outcome) => {
                    let msg = format!(
                        "Recharged {} yuan: +{} stars.",
                        DEMO_RECHARGE_YUAN, outcome.grant.stars
                    );
                    self.log(&msg);
                }
                Err(e) => {
                    let msg = format!("{}", e);
                    self.log(&msg);
                }
            },
            X => {
                let result = self.service.share_experience();
                self.log_result(result, "Writeup shared (+200 stars, +10 exp).");
            }
            O => {
                let result = self.service.publish_proposal();
                self.log_result(result, "Proposal published (+100 stars, +10 exp).");
            }
            U => {
                let result = self.service.post_announcement();
                self.log_result(result, "Announcement posted (+50 stars, +5 exp).");
            }
            D => {
                let (id, name) = SPECIES[self.next_species % SPECIES.len()];
                self.next_species += 1;
                match self.service.discover_species(id, name) {
                    Ok(Some(_)) => {
                        let msg = format!("Recorded {} in the handbook.", name);
                        self.log(&msg);
                    }
                    Ok(None) => {
                        let msg = format!("{} is already in the handbook.", name);
                        self.log(&msg);
                    }
                    Err(e) => {
                        let msg = format!("{}", e);
                        self.log(&msg);
                    }
                }
            }
            C => match self.service.check_in() {
                Ok(outcome) => {
                    let msg = format!("Checked in: day {}.", outcome.check_in_days);
                    self.log(&msg);
                }
                Err(e) => {
                    let msg = format!("{}", e);
                    self.log(&msg);
                }
            },
            M => {
                let result = self.service.buy_name_card();
                self.log_result(result, "Bought a name card.");
            }
            Key1 => self.ui.set_view(DashboardView::Overview),
            Key2 => self.ui.set_view(DashboardView::Badges),
            Key3 => self.ui.set_view(DashboardView::Handbook),
            H => self.ui.set_view(DashboardView::Help),
            PageUp => self.ui.scroll_up(),
            PageDown => self.ui.scroll_down(),
            Q => ctx.quit(),
            _ => {}
        }
    }

    fn drain_notices(&mut self) {
        let pending: Vec<String> = self.notices.borrow_mut().drain(..).collect();
        for notice in pending {
            self.ui.add_log(&notice).ok();
        }
    }

    fn draw(&self, ctx: &mut BTerm) {
        ctx.cls();
        self.ui.draw_header(ctx, "Verdant Community Garden");

        let profile = self.service.profile();
        let badges = self.service.badges().all_badges();
        let earned = badges.iter().filter(|b| b.earned).count();
        self.ui
            .draw_status(
                ctx,
                &profile.name,
                &profile.progression,
                profile.exp_cap,
                profile.check_in_days,
                profile.completed_tasks,
                earned,
                badges.len(),
            )
            .ok();

        let counters = self.service.counters();
        let rows = [
            ("Watering", counters.get(store::keys::WATERING_COUNT).to_string()),
            (
                "Fertilizing",
                counters.get(store::keys::FERTILIZING_COUNT).to_string(),
            ),
            ("Weeding", counters.get(store::keys::WEEDING_COUNT).to_string()),
            ("Gifts", counters.get(store::keys::GIFT_COUNT).to_string()),
            (
                "Plots",
                counters.get(store::keys::ADOPTED_PLOTS_COUNT).to_string(),
            ),
            (
                "Recharged",
                format!("{:.2}", counters.get_decimal(store::keys::TOTAL_RECHARGE)),
            ),
        ];
        self.ui.draw_counters(ctx, 7, &rows).ok();

        self.ui.draw_badges(ctx, &badges).ok();
        self.ui
            .draw_handbook(ctx, &self.service.handbook().discoveries())
            .ok();
        self.ui.draw_logs(ctx).ok();
        self.ui.draw_help(ctx).ok();
    }
}

impl GameState for GardenApp {
    fn tick(&mut self, ctx: &mut BTerm) {
        if let Some(key) = ctx.key {
            self.handle_key(ctx, key);
        }
        self.drain_notices();
        self.draw(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use events::EventBus;
    use store::MemoryStore;

    fn app() -> GardenApp {
        GardenApp::new(GardenService::new(
            Rc::new(MemoryStore::new()),
            Rc::new(EventBus::new()),
        ))
    }

    #[test]
    fn badge_toast_is_queued_for_the_log() {
        let mut app = app();
        for _ in 0..3 {
            app.service.send_gift().unwrap();
        }
        let pending = app.notices.borrow().clone();
        assert_eq!(pending.len(), 1);
        assert!(pending[0].contains("Rose Giver"));
        drop(pending);
        app.drain_notices();
        assert!(app.notices.borrow().is_empty());
    }

    #[test]
    fn level_up_toast_is_queued() {
        let app = app();
        // 320 exp + 10 * 18 chores of 10 exp crosses the 500 cap
        for _ in 0..18 {
            app.service
                .complete_task(&Task::new(1, "chore", TaskKind::Other, TaskPriority::Low))
                .unwrap();
        }
        let pending = app.notices.borrow();
        assert!(pending.iter().any(|n| n.contains("Level up")));
    }

    #[test]
    fn chores_cycle_through_the_kinds() {
        let mut app = app();
        let kinds: Vec<TaskKind> = (0..5).map(|_| app.next_chore_task().kind).collect();
        assert_eq!(kinds[0], TaskKind::Watering);
        assert_eq!(kinds[3], TaskKind::Harvesting);
        assert_eq!(kinds[4], TaskKind::Watering);
    }
}
