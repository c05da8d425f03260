//! Dashboard rendering for the garden ledger.

use badges::Badge;
use bracket_lib::prelude::{to_cp437, BTerm, BLACK, CYAN, GRAY, GREEN, RGB, WHITE, YELLOW};
use common::GardenResult;
use handbook::DiscoveryRecord;
use ledger::Progression;

const LOG_Y: i32 = 17;
const LOG_WINDOW: i32 = 7;
const SCREEN_WIDTH: i32 = 80;
const EXP_BAR_WIDTH: usize = 30;

/// Active dashboard screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashboardView {
    /// Profile stats, counters and the action log.
    Overview,
    /// The badge roster.
    Badges,
    /// Recorded species sightings.
    Handbook,
    /// Key reference.
    Help,
}

/// Colors for dashboard rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorPalette {
    pub heading: RGB,
    pub label: RGB,
    pub value: RGB,
    pub bar: RGB,
    pub highlight: RGB,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            heading: RGB::named(GREEN),
            label: RGB::named(GRAY),
            value: RGB::named(WHITE),
            bar: RGB::named(CYAN),
            highlight: RGB::named(YELLOW),
        }
    }
}

impl ColorPalette {
    /// Returns a high contrast palette.
    pub fn high_contrast() -> Self {
        Self {
            heading: RGB::named(WHITE),
            label: RGB::named(WHITE),
            value: RGB::named(WHITE),
            bar: RGB::named(YELLOW),
            highlight: RGB::named(YELLOW),
        }
    }
}

/// Message log and screen state for the dashboard.
pub struct UIContext {
    logs: Vec<String>,
    scroll: usize,
    view: DashboardView,
    palette: ColorPalette,
}

impl Default for UIContext {
    fn default() -> Self {
        Self {
            logs: Vec::new(),
            scroll: 0,
            view: DashboardView::Overview,
            palette: ColorPalette::default(),
        }
    }
}

impl UIContext {
    /// Sets the active screen.
    pub fn set_view(&mut self, view: DashboardView) {
        self.view = view;
    }

    /// Returns the active screen.
    pub fn view(&self) -> DashboardView {
        self.view
    }

    /// Appends a message to the action log.
    pub fn add_log(&mut self, msg: &str) -> GardenResult<()> {
        self.logs.push(msg.to_string());
        Ok(())
    }

    /// Scrolls the log view one line towards older entries.
    pub fn scroll_up(&mut self) {
        if self.scroll + (LOG_WINDOW as usize) < self.logs.len() {
            self.scroll += 1;
        }
    }

    /// Scrolls the log view one line towards newer entries.
    pub fn scroll_down(&mut self) {
        if self.scroll > 0 {
            self.scroll -= 1;
        }
    }

    /// Draws the screen title and a separator rule.
    pub fn draw_header(&self, ctx: &mut BTerm, title: &str) {
        ctx.print_color(2, 0, self.palette.heading, RGB::named(BLACK), title);
        for x in 0..SCREEN_WIDTH {
            ctx.set(x, 1, self.palette.label, RGB::named(BLACK), to_cp437('-'));
        }
    }

    /// Draws the profile stat block for the overview screen.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_status(
        &self,
        ctx: &mut BTerm,
        name: &str,
        progression: &Progression,
        exp_cap: i32,
        check_in_days: i64,
        completed_tasks: i64,
        badges_earned: usize,
        badges_total: usize,
    ) -> GardenResult<()> {
        if self.view != DashboardView::Overview {
            return Ok(());
        }
        ctx.print_color(
            2,
            2,
            self.palette.value,
            RGB::named(BLACK),
            format!("{}  Lv.{}", name, progression.level),
        );
        ctx.print_color(
            2,
            3,
            self.palette.highlight,
            RGB::named(BLACK),
            format!("Stars: {}", progression.points),
        );
        ctx.print_color(
            2,
            4,
            self.palette.bar,
            RGB::named(BLACK),
            exp_bar_string(progression.current_exp, exp_cap),
        );
        ctx.print(
            2,
            5,
            format!(
                "Check-ins: {}   Tasks done: {}   Badges: {}/{}",
                check_in_days, completed_tasks, badges_earned, badges_total
            ),
        );
        Ok(())
    }

    /// Draws a label/value strip for the gameplay counters.
    pub fn draw_counters(&self, ctx: &mut BTerm, y: i32, rows: &[(&str, String)]) -> GardenResult<()> {
        if self.view != DashboardView::Overview {
            return Ok(());
        }
        for (i, (label, value)) in rows.iter().enumerate() {
            ctx.print_color(
                2,
                y + i as i32,
                self.palette.label,
                RGB::named(BLACK),
                format!("{:<14} {}", label, value),
            );
        }
        Ok(())
    }

    /// Draws the badge roster when in `Badges` view.
    pub fn draw_badges(&self, ctx: &mut BTerm, badges: &[Badge]) -> GardenResult<()> {
        if self.view != DashboardView::Badges {
            return Ok(());
        }
        ctx.print_color(2, 2, self.palette.heading, RGB::named(BLACK), "Badges");
        for (i, line) in badge_strings(badges).iter().enumerate() {
            ctx.print(2, 4 + i as i32, line);
        }
        Ok(())
    }

    /// Draws the species handbook when in `Handbook` view.
    pub fn draw_handbook(
        &self,
        ctx: &mut BTerm,
        entries: &[(String, DiscoveryRecord)],
    ) -> GardenResult<()> {
        if self.view != DashboardView::Handbook {
            return Ok(());
        }
        ctx.print_color(
            2,
            2,
            self.palette.heading,
            RGB::named(BLACK),
            "Species Handbook",
        );
        if entries.is_empty() {
            ctx.print(2, 4, "No species recorded yet.");
            return Ok(());
        }
        for (i, line) in handbook_strings(entries).iter().enumerate() {
            ctx.print(2, 4 + i as i32, line);
        }
        Ok(())
    }

    /// Draws the scrolling action log below its separator rule.
    pub fn draw_logs(&self, ctx: &mut BTerm) -> GardenResult<()> {
        if self.view != DashboardView::Overview {
            return Ok(());
        }
        for x in 0..SCREEN_WIDTH {
            ctx.set(
                x,
                LOG_Y - 1,
                self.palette.label,
                RGB::named(BLACK),
                to_cp437('-'),
            );
        }
        let start = self
            .logs
            .len()
            .saturating_sub(LOG_WINDOW as usize + self.scroll);
        let end = std::cmp::min(start + LOG_WINDOW as usize, self.logs.len());
        for (i, line) in self.logs[start..end].iter().enumerate() {
            ctx.print(0, LOG_Y + i as i32, line);
        }
        Ok(())
    }

    /// Draws the key reference when in `Help` view.
    pub fn draw_help(&self, ctx: &mut BTerm) -> GardenResult<()> {
        if self.view != DashboardView::Help {
            return Ok(());
        }
        for (i, line) in help_strings().iter().enumerate() {
            ctx.print_centered(4 + i as i32, line);
        }
        Ok(())
    }
}

/// Renders the experience bar with its numeric readout.
pub fn exp_bar_string(current: i32, cap: i32) -> String {
    let filled = if cap > 0 {
        ((current.clamp(0, cap) as f32 / cap as f32) * EXP_BAR_WIDTH as f32).round() as usize
    } else {
        0
    };
    format!(
        "[{}{}] {}/{} EXP",
        "#".repeat(filled),
        "-".repeat(EXP_BAR_WIDTH - filled),
        current,
        cap
    )
}

/// One display line per badge, earned ones marked with an asterisk.
pub fn badge_strings(badges: &[Badge]) -> Vec<String> {
    badges
        .iter()
        .map(|badge| {
            let marker = if badge.earned { '*' } else { '.' };
            let date = badge.earned_date.as_deref().unwrap_or("");
            format!(
                "{} {:<18} {:<32} {}",
                marker, badge.name, badge.description, date
            )
        })
        .collect()
}

/// One display line per recorded species.
pub fn handbook_strings(entries: &[(String, DiscoveryRecord)]) -> Vec<String> {
    entries
        .iter()
        .map(|(id, record)| format!("{:<16} {:<28} {}", id, record.name, record.discovered_date))
        .collect()
}

/// Key reference lines for the help screen.
pub fn help_strings() -> Vec<String> {
    vec![
        "Verdant - key reference".to_string(),
        String::new(),
        "W water   F fertilize   E weed   G send gift".to_string(),
        "A adopt plot   P purchase plot responsibility".to_string(),
        "T complete next chore   R recharge 30 yuan".to_string(),
        "X share writeup   O publish proposal   U post announcement".to_string(),
        "D record species   C daily check-in   M buy name card".to_string(),
        "1 overview   2 badges   3 handbook   H help".to_string(),
        "PageUp/PageDown scroll log   Q quit".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_bar_is_empty_at_zero() {
        let bar = exp_bar_string(0, 500);
        assert!(bar.starts_with(&format!("[{}]", "-".repeat(EXP_BAR_WIDTH))));
        assert!(bar.ends_with("0/500 EXP"));
    }

    #[test]
    fn exp_bar_fills_proportionally() {
        let bar = exp_bar_string(250, 500);
        assert!(bar.contains(&"#".repeat(EXP_BAR_WIDTH / 2)));
        assert!(bar.ends_with("250/500 EXP"));
    }

    #[test]
    fn badge_lines_mark_earned_entries() {
        let badges = vec![
            Badge {
                id: "watering_master".into(),
                name: "Watering Master".into(),
                icon: "💧".into(),
                description: "Water plots three times".into(),
                earned: true,
                earned_date: Some("2024-03-01".into()),
            },
            Badge {
                id: "gift_giver".into(),
                name: "Rose Giver".into(),
                icon: "🌹".into(),
                description: "Send friends three gifts".into(),
                earned: false,
                earned_date: None,
            },
        ];
        let lines = badge_strings(&badges);
        assert!(lines[0].starts_with('*'));
        assert!(lines[0].ends_with("2024-03-01"));
        assert!(lines[1].starts_with('.'));
    }

    #[test]
    fn log_scrolling_is_clamped() {
        let mut ui = UIContext::default();
        for i in 0..3 {
            ui.add_log(&format!("line {}", i)).unwrap();
        }
        // fewer lines than the window: nothing to scroll
        ui.scroll_up();
        assert_eq!(ui.scroll, 0);
        ui.scroll_down();
        assert_eq!(ui.scroll, 0);

        for i in 3..20 {
            ui.add_log(&format!("line {}", i)).unwrap();
        }
        ui.scroll_up();
        ui.scroll_up();
        assert_eq!(ui.scroll, 2);
        ui.scroll_down();
        assert_eq!(ui.scroll, 1);
    }

    #[test]
    fn view_switches() {
        let mut ui = UIContext::default();
        assert_eq!(ui.view(), DashboardView::Overview);
        ui.set_view(DashboardView::Badges);
        assert_eq!(ui.view(), DashboardView::Badges);
    }

    #[test]
    fn help_mentions_every_action_key() {
        let text = help_strings().join("\n");
        for key in ["W water", "C daily check-in", "Q quit"] {
            assert!(text.contains(key), "missing {}", key);
        }
    }
}
