//! `screp info`: the replay header plus archive-level facts.

use anyhow::{Context, Result};
use screp::normalize;
use screp::Replay;

use crate::output::{self, OutputFormat};

pub fn run(path: &str) -> Result<()> {
    let replay = Replay::open(path).with_context(|| format!("opening {path}"))?;
    let header = replay.header().context("decoding replay header")?;

    let build = normalize::engine_build(&header);
    let elapsed_loops = normalize::game_length_loops(&header);
    let format_version = replay.archive().format_version();
    let member_count = replay.member_names().len();

    let details = replay.details().ok();
    let match_info = details.as_ref().and_then(normalize::match_info);

    // `--locale` narrows the reported attribute scopes to one player slot;
    // unset, every scope the file recorded is listed.
    let locale = output::locale_filter();
    let attribute_scopes: Option<Vec<u8>> = replay.attributes().ok().map(|attrs| {
        attrs.scopes().filter(|&s| locale.is_none_or(|l| l == s)).collect()
    });

    match output::format() {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "engine_build": build,
                "elapsed_game_loops": elapsed_loops,
                "format_version": format!("{format_version:?}"),
                "member_count": member_count,
                "map_name": match_info.as_ref().map(|m| m.map_name.clone()),
                "players": match_info.as_ref().map(|m| {
                    m.players.iter().map(|p| serde_json::json!({
                        "name": p.name,
                        "race": p.race,
                        "team_id": p.team_id,
                        "result": p.result,
                    })).collect::<Vec<_>>()
                }),
                "attribute_scopes": attribute_scopes,
            });
            output::print_json(&value);
        }
        OutputFormat::Text => {
            println!("{}", output::heading("Replay header"));
            println!("engine build:    {}", display_opt(build));
            println!("elapsed loops:   {}", display_opt(elapsed_loops));
            println!();
            println!("{}", output::heading("Archive"));
            println!("format version:  {format_version:?}");
            println!("member files:    {member_count}");
            if let Some(info) = &match_info {
                println!();
                println!("{}", output::heading("Match"));
                println!("map:             {}", info.map_name);
                for player in &info.players {
                    println!(
                        "  {} ({}) team {} result {}",
                        player.name, player.race, player.team_id, player.result
                    );
                }
            }
            if let Some(scopes) = &attribute_scopes {
                println!();
                println!("{}", output::heading("Attributes"));
                println!("scopes:          {scopes:?}");
            }
        }
    }

    Ok(())
}

fn display_opt(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "unknown".to_string())
}
