//! Special member files every archive driver tries: the optional
//! `(listfile)` and the fixed inventory used when it is absent (§4.C).

use std::io::{self, BufRead, Cursor};

use crate::error::Error;
use crate::Result;

/// The member-file names the driver always attempts, in the order a
/// human would expect to see them listed. Used when `(listfile)` is
/// absent or fails to resolve any entries.
///
/// `replay.tracker.events` is spelled with no trailing punctuation
/// (OQ2) — the source this was distilled from carries a stray backtick
/// on that one entry, which is a bug, not a format quirk.
pub const FIXED_MEMBER_FILES: &[&str] = &[
    "(attributes)",
    "(listfile)",
    "replay.attributes.events",
    "replay.details",
    "replay.game.events",
    "replay.initData",
    "replay.load.info",
    "replay.message.events",
    "replay.server.battlelobby",
    "replay.sync.events",
    "replay.tracker.events",
];

/// Parse a `(listfile)`'s decompressed bytes: one filename per line,
/// blank lines and `#`-prefixed comments skipped.
pub fn parse_listfile(data: &[u8]) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for line in io::BufReader::new(Cursor::new(data)).lines() {
        let line = line.map_err(Error::Io)?;
        let line = line.trim();
        if !line.is_empty() && !line.starts_with('#') {
            names.push(line.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_inventory_spells_tracker_events_cleanly() {
        assert!(FIXED_MEMBER_FILES.contains(&"replay.tracker.events"));
        assert!(!FIXED_MEMBER_FILES.iter().any(|n| n.ends_with('`')));
    }

    #[test]
    fn listfile_skips_blank_lines_and_comments() {
        let data = b"replay.details\r\n\r\n# a comment\r\nreplay.initData\n";
        let names = parse_listfile(data).unwrap();
        assert_eq!(names, vec!["replay.details", "replay.initData"]);
    }

    #[test]
    fn empty_listfile_yields_no_names() {
        assert!(parse_listfile(b"").unwrap().is_empty());
    }
}
