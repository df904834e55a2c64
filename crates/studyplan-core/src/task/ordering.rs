//! Deterministic task ordering.
//!
//! Tasks sort by priority rank first (urgent before low) and by difficulty
//! rank second (easy before hard, to build momentum early). The sort is
//! stable: tasks with equal keys keep their input order.

use super::Task;

/// Return the tasks in queue order with `order` set to the 1-based position.
pub fn sort_tasks(tasks: impl IntoIterator<Item = Task>) -> Vec<Task> {
    let mut sorted: Vec<Task> = tasks.into_iter().collect();
    sort_in_place(&mut sorted);
    sorted
}

/// Sort a slice of tasks in place and renumber it.
pub fn sort_in_place(tasks: &mut [Task]) {
    // slice::sort_by_key is stable
    tasks.sort_by_key(sort_key);
    renumber(tasks);
}

/// Recompute the display rank without reordering.
pub fn renumber(tasks: &mut [Task]) {
    for (i, task) in tasks.iter_mut().enumerate() {
        task.order = i + 1;
    }
}

fn sort_key(task: &Task) -> (u8, u8) {
    (task.priority.rank(), task.difficulty.rank())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Difficulty, Priority};
    use proptest::prelude::*;

    fn task(name: &str, priority: Priority, difficulty: Difficulty) -> Task {
        Task::new(name)
            .with_priority(priority)
            .with_difficulty(difficulty)
    }

    fn names(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(sort_tasks(Vec::new()).is_empty());
    }

    #[test]
    fn urgent_ties_keep_input_order() {
        let tasks = vec![
            task("A", Priority::Urgent, Difficulty::Easy).with_estimate(1),
            task("B", Priority::High, Difficulty::Hard).with_estimate(2),
            task("C", Priority::Urgent, Difficulty::Hard).with_estimate(1),
        ];
        let sorted = sort_tasks(tasks);
        assert_eq!(names(&sorted), vec!["A", "C", "B"]);
        assert_eq!(
            sorted.iter().map(|t| t.order).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn easier_first_within_priority() {
        let tasks = vec![
            task("hard", Priority::Medium, Difficulty::Hard),
            task("easy", Priority::Medium, Difficulty::Easy),
            task("mid", Priority::Medium, Difficulty::Medium),
            task("low-easy", Priority::Low, Difficulty::Easy),
        ];
        assert_eq!(
            names(&sort_tasks(tasks)),
            vec!["easy", "mid", "hard", "low-easy"]
        );
    }

    fn arb_keys() -> impl Strategy<Value = Vec<(usize, usize)>> {
        prop::collection::vec((0..Priority::ALL.len(), 0..Difficulty::ALL.len()), 0..40)
    }

    fn build(keys: &[(usize, usize)]) -> Vec<Task> {
        keys.iter()
            .enumerate()
            .map(|(i, &(p, d))| task(&i.to_string(), Priority::ALL[p], Difficulty::ALL[d]))
            .collect()
    }

    proptest! {
        #[test]
        fn equal_keys_keep_relative_order(keys in arb_keys()) {
            let sorted = sort_tasks(build(&keys));
            for pair in sorted.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                if a.priority == b.priority && a.difficulty == b.difficulty {
                    let ia: usize = a.name.parse().unwrap();
                    let ib: usize = b.name.parse().unwrap();
                    prop_assert!(ia < ib);
                }
            }
        }

        #[test]
        fn more_urgent_always_precedes(keys in arb_keys()) {
            let sorted = sort_tasks(build(&keys));
            for (i, a) in sorted.iter().enumerate() {
                for b in &sorted[i + 1..] {
                    prop_assert!(a.priority.rank() <= b.priority.rank());
                    if a.priority == b.priority {
                        prop_assert!(a.difficulty.rank() <= b.difficulty.rank());
                    }
                }
            }
        }

        #[test]
        fn sorting_is_idempotent(keys in arb_keys()) {
            let once = sort_tasks(build(&keys));
            let twice = sort_tasks(once.clone());
            prop_assert_eq!(names(&once), names(&twice));
        }
    }
}
