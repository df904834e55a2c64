use studyplan_core::{sort_tasks, Config, Task, TaskDraft};

use super::render::print_tasks;

pub fn run(drafts: Vec<TaskDraft>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tasks: Vec<Task> = drafts.into_iter().map(TaskDraft::into_task).collect();
    for task in &tasks {
        task.validate()?;
    }
    let sorted = sort_tasks(tasks);

    if json {
        println!("{}", serde_json::to_string_pretty(&sorted)?);
    } else {
        let settings = Config::load()?.settings()?;
        print_tasks(&sorted, &settings);
    }
    Ok(())
}
