use std::io::Read;

use studyplan_core::{sort_tasks, AnthropicExtractor, Config, TaskDraft, TaskExtractor};

use super::render::print_tasks;

pub async fn run(text: Option<String>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if text.trim().is_empty() {
        return Err("nothing to extract: pass a description or pipe one on stdin".into());
    }

    let config = Config::load()?;
    let extractor = AnthropicExtractor::from_config(&config.extractor)?;
    let drafts = extractor.extract(&text).await?;
    let tasks = sort_tasks(drafts.into_iter().map(TaskDraft::into_task));

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else {
        print_tasks(&tasks, &config.settings()?);
        for task in &tasks {
            if let Some(reasoning) = &task.reasoning {
                println!("- {}: {reasoning}", task.name);
            }
        }
    }
    Ok(())
}
