//! Chore-task domain: reward suggestions, urgency and ordering.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of garden chore.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Watering,
    Weeding,
    Fertilizing,
    Harvesting,
    Maintenance,
    Other,
}

/// Urgency assigned when the task is posted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Urgent,
    High,
    Medium,
    Low,
}

/// Lifecycle state of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Overdue,
    NeedsHelp,
}

/// A community chore task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub kind: TaskKind,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Stars escrowed by the poster; absent for community chores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<i64>,
}

impl Task {
    /// Creates a pending task with no deadline or posted reward.
    pub fn new(id: u64, title: &str, kind: TaskKind, priority: TaskPriority) -> Self {
        Self {
            id,
            title: title.to_string(),
            kind,
            priority,
            status: TaskStatus::Pending,
            due_date: None,
            completed_at: None,
            reward: None,
        }
    }
}

/// Base stars for a chore of the given kind.
pub fn base_points(kind: TaskKind) -> i64 {
    match kind {
        TaskKind::Watering => 10,
        TaskKind::Weeding => 15,
        TaskKind::Fertilizing => 20,
        TaskKind::Harvesting => 25,
        TaskKind::Maintenance => 30,
        TaskKind::Other => 10,
    }
}

/// Scaling applied for the task's priority.
pub fn priority_multiplier(priority: TaskPriority) -> f64 {
    match priority {
        TaskPriority::Urgent => 2.0,
        TaskPriority::High => 1.5,
        TaskPriority::Medium => 1.2,
        TaskPriority::Low => 1.0,
    }
}

/// Ordering weight for a priority; higher is more urgent.
pub fn priority_value(priority: TaskPriority) -> u8 {
    match priority {
        TaskPriority::Urgent => 4,
        TaskPriority::High => 3,
        TaskPriority::Medium => 2,
        TaskPriority::Low => 1,
    }
}

/// Suggested star reward for completing `task`.
///
/// Base points scale with priority; finishing ahead of the deadline adds a
/// further 20 percent. The result is rounded to the nearest star.
pub fn suggested_reward(task: &Task) -> i64 {
    let mut points = base_points(task.kind) as f64 * priority_multiplier(task.priority);
    if let (Some(due), Some(done)) = (task.due_date, task.completed_at) {
        if done < due {
            points *= 1.2;
        }
    }
    points.round() as i64
}

/// Whether `task` has slipped past its deadline without completing.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    match task.due_date {
        Some(due) => due < now && task.status != TaskStatus::Completed,
        None => false,
    }
}

/// Whether `task` is due within the next 24 hours.
pub fn is_due_soon(task: &Task, now: DateTime<Utc>) -> bool {
    let Some(due) = task.due_date else {
        return false;
    };
    let minutes = (due - now).num_minutes();
    minutes > 0 && minutes <= 24 * 60 && task.status != TaskStatus::Completed
}

/// Sorts overdue tasks first, then by priority, then by nearest deadline.
/// Tasks without a deadline sort last within their priority band.
pub fn sort_tasks(tasks: &mut [Task], now: DateTime<Utc>) {
    tasks.sort_by(|a, b| {
        is_overdue(b, now)
            .cmp(&is_overdue(a, now))
            .then_with(|| priority_value(b.priority).cmp(&priority_value(a.priority)))
            .then_with(|| match (a.due_date, b.due_date) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(x), Some(y)) => x.cmp(&y),
            })
    });
}

/// Tasks currently in `status`.
pub fn filter_by_status(tasks: &[Task], status: TaskStatus) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| t.status == status)
        .cloned()
        .collect()
}

/// Share of completed tasks as a rounded percentage.
pub fn completion_rate(tasks: &[Task]) -> u32 {
    if tasks.is_empty() {
        return 0;
    }
    let completed = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();
    ((completed as f64 / tasks.len() as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn base_points_per_kind() {
        assert_eq!(base_points(TaskKind::Watering), 10);
        assert_eq!(base_points(TaskKind::Maintenance), 30);
        assert_eq!(base_points(TaskKind::Other), 10);
    }

    #[test]
    fn urgent_watering_doubles() {
        let task = Task::new(1, "Water bed 3", TaskKind::Watering, TaskPriority::Urgent);
        assert_eq!(suggested_reward(&task), 20);
    }

    #[test]
    fn early_completion_earns_a_bonus() {
        let mut task = Task::new(1, "Weed bed 1", TaskKind::Weeding, TaskPriority::Medium);
        task.due_date = Some(at(10, 12));
        task.completed_at = Some(at(9, 12));
        task.status = TaskStatus::Completed;
        // 15 * 1.2 * 1.2 = 21.6, rounded
        assert_eq!(suggested_reward(&task), 22);
    }

    #[test]
    fn late_completion_earns_no_bonus() {
        let mut task = Task::new(1, "Weed bed 1", TaskKind::Weeding, TaskPriority::Medium);
        task.due_date = Some(at(9, 12));
        task.completed_at = Some(at(10, 12));
        task.status = TaskStatus::Completed;
        assert_eq!(suggested_reward(&task), 18);
    }

    #[test]
    fn overdue_requires_a_missed_deadline() {
        let now = at(10, 12);
        let mut task = Task::new(1, "Harvest", TaskKind::Harvesting, TaskPriority::Low);
        assert!(!is_overdue(&task, now));

        task.due_date = Some(at(9, 12));
        assert!(is_overdue(&task, now));

        task.status = TaskStatus::Completed;
        assert!(!is_overdue(&task, now));
    }

    #[test]
    fn due_soon_is_a_24_hour_window() {
        let now = at(10, 12);
        let mut task = Task::new(1, "Fertilize", TaskKind::Fertilizing, TaskPriority::High);
        task.due_date = Some(at(11, 11));
        assert!(is_due_soon(&task, now));

        task.due_date = Some(at(12, 12));
        assert!(!is_due_soon(&task, now));

        task.due_date = Some(at(9, 12));
        assert!(!is_due_soon(&task, now));
    }

    #[test]
    fn sort_puts_overdue_first_then_priority_then_deadline() {
        let now = at(10, 12);
        let mut low_overdue = Task::new(1, "a", TaskKind::Watering, TaskPriority::Low);
        low_overdue.due_date = Some(at(9, 0));
        let urgent = Task::new(2, "b", TaskKind::Watering, TaskPriority::Urgent);
        let mut high_late = Task::new(3, "c", TaskKind::Watering, TaskPriority::High);
        high_late.due_date = Some(at(12, 0));
        let mut high_soon = Task::new(4, "d", TaskKind::Watering, TaskPriority::High);
        high_soon.due_date = Some(at(11, 0));

        let mut tasks = vec![high_late.clone(), urgent.clone(), low_overdue.clone(), high_soon.clone()];
        sort_tasks(&mut tasks, now);
        let ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, [1, 2, 4, 3]);
    }

    #[test]
    fn undated_tasks_sort_last_in_their_band() {
        let now = at(10, 12);
        let undated = Task::new(1, "a", TaskKind::Watering, TaskPriority::High);
        let mut dated = Task::new(2, "b", TaskKind::Watering, TaskPriority::High);
        dated.due_date = Some(at(12, 0));

        let mut tasks = vec![undated, dated];
        sort_tasks(&mut tasks, now);
        assert_eq!(tasks[0].id, 2);
    }

    #[test]
    fn completion_rate_rounds() {
        let mut tasks = vec![
            Task::new(1, "a", TaskKind::Watering, TaskPriority::Low),
            Task::new(2, "b", TaskKind::Watering, TaskPriority::Low),
            Task::new(3, "c", TaskKind::Watering, TaskPriority::Low),
        ];
        assert_eq!(completion_rate(&tasks), 0);
        tasks[0].status = TaskStatus::Completed;
        assert_eq!(completion_rate(&tasks), 33);
        assert_eq!(completion_rate(&[]), 0);
    }

    #[test]
    fn filter_by_status_clones_matches() {
        let mut tasks = vec![
            Task::new(1, "a", TaskKind::Watering, TaskPriority::Low),
            Task::new(2, "b", TaskKind::Weeding, TaskPriority::Low),
        ];
        tasks[1].status = TaskStatus::Completed;
        let done = filter_by_status(&tasks, TaskStatus::Completed);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, 2);
    }
}
