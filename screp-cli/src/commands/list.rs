//! `screp list`: member file names, `(listfile)`-preferred.

use anyhow::{Context, Result};
use screp::Replay;

use crate::output::{self, OutputFormat};

pub fn run(path: &str) -> Result<()> {
    let replay = Replay::open(path).with_context(|| format!("opening {path}"))?;
    let names = replay.member_names();

    match output::format() {
        OutputFormat::Json => output::print_json(&serde_json::json!(names)),
        OutputFormat::Text => {
            for name in &names {
                println!("{name}");
            }
            println!("\n{} member files", names.len());
        }
    }

    Ok(())
}
