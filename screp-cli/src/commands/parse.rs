//! `screp parse`: decode and print one event stream.

use anyhow::{Context, Result};
use screp::events::EventRecord;
use screp::Replay;

use crate::output::{self, OutputFormat};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum StreamArg {
    Game,
    Message,
    Tracker,
}

pub fn run(path: &str, stream: StreamArg, limit: Option<usize>) -> Result<()> {
    let replay = Replay::open(path).with_context(|| format!("opening {path}"))?;

    let records: Result<Vec<EventRecord>> = match stream {
        StreamArg::Game => take(replay.game_events(), limit),
        StreamArg::Message => take(replay.message_events(), limit),
        StreamArg::Tracker => take(replay.tracker_events(), limit),
    };
    let records = records.context("decoding event stream")?;

    match output::format() {
        OutputFormat::Json => {
            let value: Vec<_> = records
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "name": r.event_name,
                        "gameloop": r.gameloop,
                        "user_id": r.user_id,
                        "event_id": r.event_id,
                        "bits_consumed": r.bits_consumed,
                    })
                })
                .collect();
            output::print_json(&serde_json::json!(value));
        }
        OutputFormat::Text => {
            for r in &records {
                let name = r.event_name.unwrap_or("<unknown>");
                let user = r.user_id.map(|u| u.to_string()).unwrap_or_else(|| "-".to_string());
                println!("{:>10} loop={:<10} user={user:<4} bits={}", name, r.gameloop, r.bits_consumed);
            }
            println!("\n{} events", records.len());
        }
    }

    Ok(())
}

fn take<'a>(
    stream: impl Iterator<Item = screp::Result<EventRecord>> + 'a,
    limit: Option<usize>,
) -> Result<Vec<EventRecord>> {
    let mut out = Vec::new();
    for event in stream {
        if let Some(limit) = limit {
            if out.len() >= limit {
                break;
            }
        }
        out.push(event?);
    }
    Ok(out)
}
