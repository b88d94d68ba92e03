use crate::store::Task;

/// Urgency order: priority 1 first, then due text, then title. Tasks with
/// no due date sort ahead of dated ones at the same priority.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        a.priority.cmp(&b.priority)
            .then_with(|| a.due.cmp(&b.due))
            .then_with(|| a.title.cmp(&b.title))
    });
}

/// Fraction of completed tasks for the header gauge. Empty list reads as 0.
pub fn progress(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let done = tasks.iter().filter(|t| t.completed).count();
    done as f64 / tasks.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, priority: i64, due: Option<&str>, completed: bool) -> Task {
        Task {
            id:          title.to_owned(),
            title:       title.to_owned(),
            description: String::new(),
            due:         due.map(str::to_owned),
            priority,
            completed,
        }
    }

    #[test]
    fn sorts_by_priority_then_due_then_title() {
        let mut tasks = vec![
            task("b", 2, Some("2024-08-09T18:00:00.000Z"), false),
            task("a", 2, Some("2024-08-09T18:00:00.000Z"), false),
            task("late", 2, Some("2024-08-09T20:00:00.000Z"), false),
            task("urgent", 1, None, false),
        ];
        sort_tasks(&mut tasks);
        let order: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(order, ["urgent", "a", "b", "late"]);
    }

    #[test]
    fn progress_is_the_completed_fraction() {
        let tasks = vec![
            task("a", 1, None, true),
            task("b", 2, None, false),
            task("c", 3, None, false),
            task("d", 4, None, true),
        ];
        assert_eq!(progress(&tasks), 0.5);
    }

    #[test]
    fn progress_of_empty_list_is_zero() {
        assert_eq!(progress(&[]), 0.0);
    }
}
