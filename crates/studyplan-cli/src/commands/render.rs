//! Terminal rendering of tasks and session events.

use studyplan_core::{Event, Phase, PomodoroSettings, SessionSummary, Task};

pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn print_tasks(tasks: &[Task], settings: &PomodoroSettings) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for task in tasks {
        println!(
            "{:>3}. {}  [{} / {}]  {} pomodoro{}",
            task.order,
            task.name,
            task.priority,
            task.difficulty,
            task.estimated_work_units,
            if task.estimated_work_units == 1 { "" } else { "s" }
        );
        if let Some(desc) = &task.description {
            println!("     {desc}");
        }
    }
    println!("Estimated time: {}", settings.format_estimate(tasks));
}

/// One line per event, or nothing for events that need no output.
pub fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::SessionStarted { task_count, .. } => {
            format!("Session started with {task_count} task(s).")
        }
        Event::PhaseStarted {
            phase: Phase::Idle, ..
        } => return None,
        Event::PhaseStarted {
            phase,
            duration_secs,
            running,
            ..
        } => format!(
            "{} {} ({})",
            phase.label(),
            if *running { "started" } else { "ready" },
            format_clock(*duration_secs)
        ),
        Event::TimerPaused { remaining_secs, .. } => {
            format!("Paused at {}.", format_clock(*remaining_secs))
        }
        Event::TimerResumed { remaining_secs, .. } => {
            format!("Resumed at {}.", format_clock(*remaining_secs))
        }
        Event::PhaseExpired { expired, .. } => format!("{} finished.", expired.label()),
        Event::CompletionRequested {
            name,
            work_units_spent,
            estimated_work_units,
            ..
        } => format!(
            "Did you finish \"{name}\"? ({work_units_spent}/{estimated_work_units} pomodoros) [c]omplete / [i]ncomplete"
        ),
        Event::TaskCompleted { name, .. } => format!("Completed \"{name}\"."),
        Event::TaskRequeued {
            name,
            index,
            remaining_work_units,
            ..
        } => format!(
            "\"{name}\" moved to position {} with {remaining_work_units} pomodoro(s) left.",
            index + 1
        ),
        Event::TaskAbandoned { name, .. } => {
            format!("\"{name}\" is out of planned pomodoros and marked incomplete.")
        }
        Event::TaskSkipped { to_index, .. } => format!("Skipped to task {}.", to_index + 1),
        Event::SessionCompleted {
            completed,
            incomplete,
            completed_work_cycles,
            ..
        } => format!(
            "Session complete: {completed} done, {incomplete} incomplete, {completed_work_cycles} pomodoro(s)."
        ),
        Event::TasksImported { count, .. } => format!("Imported {count} task(s)."),
        Event::TaskAdded { .. } | Event::TaskRemoved { .. } | Event::TimerStopped { .. } => {
            return None
        }
        Event::StateSnapshot {
            session_state,
            phase,
            remaining_secs,
            running,
            completed_work_cycles,
            awaiting_confirmation,
            pending,
            ..
        } => format!(
            "{session_state} | {} {} {} | {completed_work_cycles} pomodoro(s) | {pending} queued{}",
            phase.label(),
            format_clock(*remaining_secs),
            if *running { "running" } else { "paused" },
            if *awaiting_confirmation {
                " | waiting for [c]/[i]"
            } else {
                ""
            }
        ),
    };
    Some(line)
}

pub fn print_summary(summary: &SessionSummary) {
    println!(
        "Completed {} of {} task(s) in {} pomodoro(s).",
        summary.completed_count(),
        summary.total_tasks(),
        summary.completed_work_cycles
    );
    for task in &summary.completed {
        println!("  done        {}", task.name);
    }
    for task in &summary.incomplete {
        println!("  incomplete  {} ({} spent)", task.name, task.work_units_spent);
    }
    for task in &summary.pending {
        println!("  not started {}", task.name);
    }
}
