//! Integration tests for the `screp` binary, driven against a synthetic
//! in-memory replay archive written out to a temp file.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use screp::crypto::{encrypt_bytes, hash_string, hash_type};
use tempfile::tempdir;

const HEADER_SIZE: u32 = 0x20;

fn vint(value: i64) -> Vec<u8> {
    let sign = value < 0;
    let mut magnitude = value.unsigned_abs();
    let low6 = (magnitude & 0x3F) as u8;
    magnitude >>= 6;
    let mut out = vec![(sign as u8) | (low6 << 1) | if magnitude > 0 { 0x80 } else { 0 }];
    while magnitude > 0 {
        let low7 = (magnitude & 0x7F) as u8;
        magnitude >>= 7;
        out.push(low7 | if magnitude > 0 { 0x80 } else { 0 });
    }
    out
}

fn blob(data: &[u8]) -> Vec<u8> {
    let mut out = vec![2]; // tag::BLOB
    out.extend(vint(data.len() as i64));
    out.extend_from_slice(data);
    out
}

fn vint_field(value: i64) -> Vec<u8> {
    let mut out = vec![9]; // tag::VINT
    out.extend(vint(value));
    out
}

fn struct_value(fields: &[(i64, Vec<u8>)]) -> Vec<u8> {
    let mut out = vec![5]; // tag::STRUCT
    out.extend(vint(fields.len() as i64));
    for (tag, value) in fields {
        out.extend(vint(*tag));
        out.extend_from_slice(value);
    }
    out
}

fn array_value(elements: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0]; // tag::ARRAY
    out.extend(vint(elements.len() as i64));
    for e in elements {
        out.extend_from_slice(e);
    }
    out
}

fn header_bytes(build: i64, elapsed_loops: i64) -> Vec<u8> {
    let version = struct_value(&[(4, vint_field(build))]);
    struct_value(&[(1, version), (3, vint_field(elapsed_loops))])
}

fn details_bytes() -> Vec<u8> {
    let player = struct_value(&[
        (0, blob(b"Serral")),
        (2, blob(b"Zerg")),
        (5, vint_field(0)),
        (8, vint_field(1)),
    ]);
    struct_value(&[(0, array_value(&[player])), (1, blob(b"Ultralove LE"))])
}

fn encrypted_table(entries: &[Vec<u8>], table_name: &str) -> Vec<u8> {
    let mut raw: Vec<u8> = entries.iter().flatten().copied().collect();
    let key = hash_string(table_name, hash_type::FILE_KEY);
    encrypt_bytes(&mut raw, key);
    raw
}

fn hash_entry_bytes(name: &str, block_index: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&hash_string(name, hash_type::NAME_A).to_le_bytes());
    out.extend_from_slice(&hash_string(name, hash_type::NAME_B).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&block_index.to_le_bytes());
    out
}

const HASH_ENTRY_EMPTY: u32 = 0xFFFF_FFFF;

fn empty_hash_entry_bytes() -> Vec<u8> {
    let mut out = vec![0u8; 12];
    out.extend_from_slice(&HASH_ENTRY_EMPTY.to_le_bytes());
    out
}

fn block_entry_bytes(file_pos: u32, size: u32) -> Vec<u8> {
    const EXISTS: u32 = 0x8000_0000;
    let mut out = Vec::new();
    out.extend_from_slice(&file_pos.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&EXISTS.to_le_bytes());
    out
}

fn build_hash_table(table_size: u32, files: &[(&str, u32)]) -> Vec<u8> {
    let mut slots: Vec<Option<Vec<u8>>> = vec![None; table_size as usize];
    for &(name, block_index) in files {
        let start = hash_string(name, hash_type::TABLE_INDEX) % table_size;
        let mut index = start as usize;
        loop {
            if slots[index].is_none() {
                slots[index] = Some(hash_entry_bytes(name, block_index));
                break;
            }
            index = (index + 1) % table_size as usize;
        }
    }
    let entries: Vec<Vec<u8>> =
        slots.into_iter().map(|s| s.unwrap_or_else(empty_hash_entry_bytes)).collect();
    encrypted_table(&entries, "(hash table)")
}

fn build_replay_bytes() -> Vec<u8> {
    let header_payload = header_bytes(89720, 12345);
    let details = details_bytes();

    let mut body = Vec::new();
    let details_pos = HEADER_SIZE + body.len() as u32;
    body.extend_from_slice(&details);

    let hash_table_pos = HEADER_SIZE + body.len() as u32;
    let hash_table = build_hash_table(4, &[("replay.details", 0)]);
    body.extend_from_slice(&hash_table);

    let block_table_pos = HEADER_SIZE + body.len() as u32;
    let block_table =
        encrypted_table(&[block_entry_bytes(details_pos, details.len() as u32)], "(block table)");
    body.extend_from_slice(&block_table);

    let archive_size = HEADER_SIZE + body.len() as u32;

    let mut mpq_header = Vec::new();
    mpq_header.extend_from_slice(b"MPQ\x1A");
    mpq_header.extend_from_slice(&HEADER_SIZE.to_le_bytes());
    mpq_header.extend_from_slice(&archive_size.to_le_bytes());
    mpq_header.extend_from_slice(&0u16.to_le_bytes());
    mpq_header.extend_from_slice(&3u16.to_le_bytes());
    mpq_header.extend_from_slice(&hash_table_pos.to_le_bytes());
    mpq_header.extend_from_slice(&block_table_pos.to_le_bytes());
    mpq_header.extend_from_slice(&4u32.to_le_bytes());
    mpq_header.extend_from_slice(&1u32.to_le_bytes());

    let header_offset = 64u32;
    let mut out = Vec::new();
    out.extend_from_slice(b"MPQ\x1B");
    out.extend_from_slice(&512u32.to_le_bytes());
    out.extend_from_slice(&header_offset.to_le_bytes());
    out.extend_from_slice(&(header_payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&header_payload);
    out.resize(header_offset as usize, 0);
    out.extend_from_slice(&mpq_header);
    out.extend_from_slice(&body);
    out
}

fn fixture_path(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("fixture.SC2Replay");
    fs::write(&path, build_replay_bytes()).unwrap();
    path
}

#[test]
fn info_prints_header_and_match_facts() {
    let dir = tempdir().unwrap();
    let path = fixture_path(dir.path());

    Command::cargo_bin("screp")
        .unwrap()
        .arg("info")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("89720"))
        .stdout(predicate::str::contains("Ultralove LE"))
        .stdout(predicate::str::contains("Serral"));
}

#[test]
fn list_shows_the_details_member() {
    let dir = tempdir().unwrap();
    let path = fixture_path(dir.path());

    Command::cargo_bin("screp")
        .unwrap()
        .arg("list")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("replay.details"));
}

#[test]
fn extract_writes_the_requested_member_file() {
    let dir = tempdir().unwrap();
    let path = fixture_path(dir.path());
    let out_dir = dir.path().join("out");

    Command::cargo_bin("screp")
        .unwrap()
        .arg("extract")
        .arg(&path)
        .arg("--output")
        .arg(&out_dir)
        .arg("--file")
        .arg("replay.details")
        .assert()
        .success();

    assert!(out_dir.join("replay.details").exists());
}

#[test]
fn parse_on_an_absent_stream_reports_zero_events() {
    let dir = tempdir().unwrap();
    let path = fixture_path(dir.path());

    Command::cargo_bin("screp")
        .unwrap()
        .arg("parse")
        .arg(&path)
        .arg("--stream")
        .arg("tracker")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 events"));
}

#[test]
fn info_reports_a_clean_error_for_a_missing_file() {
    Command::cargo_bin("screp")
        .unwrap()
        .arg("info")
        .arg("/no/such/replay.SC2Replay")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}
