//! Interactive study session.
//!
//! One task owns the session and multiplexes stdin commands with timer ticks.

use studyplan_core::{
    AnthropicExtractor, Config, Event, IntervalTicker, StudySession, TaskDraft, Ticker,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::render::{describe, print_summary, print_tasks};

const HELP: &str = "\
commands:
  t   pause / resume the timer
  c   the active task is complete
  i   the active task needs more time
  s   skip to the next task
  st  show status
  h   show this help
  q   quit";

enum Flow {
    Continue,
    Quit,
}

struct Output {
    json: bool,
}

impl Output {
    fn events(&self, events: &[Event]) {
        for event in events {
            self.event(event);
        }
    }

    fn event(&self, event: &Event) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("error: {e}"),
            }
        } else if let Some(line) = describe(event) {
            println!("{line}");
        }
    }

    fn error(&self, err: &dyn std::error::Error) {
        eprintln!("error: {err}");
    }
}

pub async fn run(
    drafts: Vec<TaskDraft>,
    extract: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut session = StudySession::from_config(&config)?;
    let out = Output { json };

    for draft in drafts {
        session.add_task(draft)?;
    }
    if let Some(text) = extract {
        let extractor = AnthropicExtractor::from_config(&config.extractor)?;
        out.event(&session.import_text(&extractor, &text).await?);
    }

    if !json {
        print_tasks(session.queue().pending(), session.settings());
        println!("{HELP}");
    }
    out.events(&session.start_session()?);
    print_active(&session, &out);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = IntervalTicker::every_second();

    loop {
        let token = session.tick_token();
        let running = session.timer_state().running;
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let before = session.tick_token();
                if let Flow::Quit = handle(&mut session, line.trim(), &out) {
                    break;
                }
                if session.tick_token() != before {
                    ticker.restart();
                }
            }
            _ = ticker.tick(), if running => {
                let events = session.on_tick(token);
                if !events.is_empty() {
                    out.events(&events);
                    ticker.restart();
                }
            }
        }
        if session.is_complete() {
            break;
        }
    }

    finish(&mut session, &out)
}

fn handle(session: &mut StudySession, command: &str, out: &Output) -> Flow {
    let result = match command {
        "" => return Flow::Continue,
        "q" | "quit" => return Flow::Quit,
        "h" | "help" | "?" => {
            println!("{HELP}");
            return Flow::Continue;
        }
        "st" | "status" => {
            out.event(&session.snapshot());
            print_active(session, out);
            return Flow::Continue;
        }
        "t" => session
            .toggle_timer()
            .map(|e| e.into_iter().collect::<Vec<_>>()),
        "c" => session.confirm_task_complete(),
        "i" => session.confirm_task_incomplete(),
        "s" => session.skip_active_task(),
        other => {
            eprintln!("unknown command '{other}', type h for help");
            return Flow::Continue;
        }
    };

    match result {
        Ok(events) => {
            out.events(&events);
            if matches!(command, "c" | "i" | "s") {
                print_active(session, out);
            }
        }
        Err(e) => out.error(&e),
    }
    Flow::Continue
}

fn print_active(session: &StudySession, out: &Output) {
    if out.json {
        return;
    }
    if let Some(task) = session.active_task() {
        println!(
            "Now: {} ({}/{} pomodoros)",
            task.name, task.work_units_spent, task.initial_work_units
        );
        if let Some(next) = session.upcoming(1).first() {
            println!("Next: {}", next.name);
        }
    }
}

fn finish(session: &mut StudySession, out: &Output) -> Result<(), Box<dyn std::error::Error>> {
    let summary = session.summary();
    if out.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        print_summary(&summary);
    }
    let carried = session.return_to_dashboard()?;
    if !carried.is_empty() && !out.json {
        println!("{} task(s) carry over to the next session.", carried.len());
    }
    Ok(())
}
