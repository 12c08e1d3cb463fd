use crate::models::{AppData, HistoryEntry, Task};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rollover {
    /// No last visit was recorded; it is now set to today.
    FirstVisit,
    /// Already visited today. Nothing changes.
    SameDay,
    /// The day changed since the last visit. Progress was reset and, when any
    /// task had progress, the previous day was archived.
    DayChanged {
        previous: NaiveDate,
        archived: Option<HistoryEntry>,
    },
}

impl Rollover {
    pub fn changed(&self) -> bool {
        !matches!(self, Rollover::SameDay)
    }
}

/// Compares the recorded last visit against `today` and closes out the
/// previous day if needed. However many days were skipped, this is a single
/// transition producing at most one history entry.
pub fn run_rollover(data: &mut AppData, today: NaiveDate) -> Rollover {
    let previous = match data.last_visit_date {
        None => {
            data.last_visit_date = Some(today);
            return Rollover::FirstVisit;
        }
        Some(date) if date == today => return Rollover::SameDay,
        Some(date) => date,
    };

    let archived = summarize_day(data.tasks.tasks(), previous);
    if let Some(entry) = &archived {
        data.history.push(entry.clone());
    }

    for task in data.tasks.tasks_mut() {
        task.checked = 0;
    }
    data.last_visit_date = Some(today);

    Rollover::DayChanged { previous, archived }
}

/// Builds the history entry for `date`, or `None` when no task moved.
pub fn summarize_day(tasks: &[Task], date: NaiveDate) -> Option<HistoryEntry> {
    let touched: Vec<&Task> = tasks.iter().filter(|task| task.checked > 0).collect();
    if touched.is_empty() {
        return None;
    }

    Some(HistoryEntry {
        date,
        completed_tasks: touched.iter().filter(|task| task.is_complete()).count() as u32,
        completed_chunks: touched.iter().map(|task| task.checked).sum(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CHUNKS_PER_TASK;
    use crate::registry::TaskRegistry;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: &str, checked: u32) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            checked,
        }
    }

    fn data_with(tasks: Vec<Task>, last_visit: Option<NaiveDate>) -> AppData {
        AppData {
            tasks: TaskRegistry::from_tasks(tasks),
            history: Vec::new(),
            last_visit_date: last_visit,
        }
    }

    #[test]
    fn first_visit_only_records_the_date() {
        let today = day(2024, 3, 1);
        let mut data = data_with(vec![task("a", 2)], None);

        assert_eq!(run_rollover(&mut data, today), Rollover::FirstVisit);
        assert_eq!(data.last_visit_date, Some(today));
        assert!(data.history.is_empty());
        assert_eq!(data.tasks.tasks()[0].checked, 2);
    }

    #[test]
    fn day_change_archives_and_resets() {
        let yesterday = day(2024, 3, 1);
        let today = day(2024, 3, 2);
        let mut data = data_with(
            vec![task("a", CHUNKS_PER_TASK), task("b", 0), task("c", 3)],
            Some(yesterday),
        );

        let outcome = run_rollover(&mut data, today);
        let expected = HistoryEntry {
            date: yesterday,
            completed_tasks: 1,
            completed_chunks: 8,
        };
        assert_eq!(
            outcome,
            Rollover::DayChanged {
                previous: yesterday,
                archived: Some(expected.clone()),
            }
        );
        assert_eq!(data.history, vec![expected]);
        assert!(data.tasks.tasks().iter().all(|t| t.checked == 0));
        let ids: Vec<_> = data.tasks.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(data.last_visit_date, Some(today));
    }

    #[test]
    fn idle_day_leaves_no_history() {
        let mut data = data_with(vec![task("a", 0), task("b", 0)], Some(day(2024, 3, 1)));

        let outcome = run_rollover(&mut data, day(2024, 3, 2));
        assert!(matches!(outcome, Rollover::DayChanged { archived: None, .. }));
        assert!(data.history.is_empty());
        assert_eq!(data.last_visit_date, Some(day(2024, 3, 2)));
    }

    #[test]
    fn same_day_is_idempotent() {
        let today = day(2024, 3, 2);
        let mut data = data_with(vec![task("a", 4)], Some(day(2024, 3, 1)));

        run_rollover(&mut data, today);
        data.tasks.update_progress("a", 2);

        let outcome = run_rollover(&mut data, today);
        assert_eq!(outcome, Rollover::SameDay);
        assert!(!outcome.changed());
        assert_eq!(data.history.len(), 1);
        assert_eq!(data.tasks.tasks()[0].checked, 2);
    }

    #[test]
    fn multi_day_gap_collapses_to_one_entry() {
        let last = day(2024, 1, 10);
        let mut data = data_with(vec![task("a", 2)], Some(last));

        run_rollover(&mut data, day(2024, 1, 20));
        assert_eq!(data.history.len(), 1);
        assert_eq!(data.history[0].date, last);
    }
}
