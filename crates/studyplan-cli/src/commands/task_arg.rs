//! `--task name:priority:difficulty:units` parsing.

use studyplan_core::{Difficulty, Priority, TaskDraft};

/// Parse a task flag. Priority, difficulty and units are optional and
/// default to medium, medium and 1.
pub fn parse_task_arg(arg: &str) -> Result<TaskDraft, String> {
    let parts: Vec<&str> = arg.split(':').map(str::trim).collect();
    if parts.len() > 4 {
        return Err(format!(
            "expected name:priority:difficulty:units, got {} fields",
            parts.len()
        ));
    }
    let name = parts[0];
    if name.is_empty() {
        return Err("task name must not be blank".into());
    }

    let mut draft = TaskDraft::new(name);
    if let Some(p) = parts.get(1).filter(|p| !p.is_empty()) {
        draft = draft.priority(p.parse::<Priority>().map_err(|e| e.to_string())?);
    }
    if let Some(d) = parts.get(2).filter(|d| !d.is_empty()) {
        draft = draft.difficulty(d.parse::<Difficulty>().map_err(|e| e.to_string())?);
    }
    if let Some(u) = parts.get(3).filter(|u| !u.is_empty()) {
        let units = u
            .parse::<u32>()
            .map_err(|_| format!("invalid work units '{u}'"))?;
        if units == 0 {
            return Err("work units must be at least 1".into());
        }
        draft = draft.estimate(units);
    }
    Ok(draft)
}
