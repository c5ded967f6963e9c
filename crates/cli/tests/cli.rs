// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

mod common;
use common::*;

#[test]
fn help_lists_command_groups() {
    offsync()
        .arg("--help")
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Records:"))
        .stdout(predicate::str::contains("Synchronization:"))
        .stdout(predicate::str::contains("clear-cache"));
}

#[test]
fn missing_subcommand_fails() {
    offsync().assert().failure();
}

#[test]
fn send_while_offline_saves_locally() {
    let state = offline_state();

    offsync_in(&state)
        .args(["send", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning: offline"));

    assert!(state.path().join("store.json").is_file());

    offsync_in(&state)
        .arg("pending")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending messages: 1"));
}

#[test]
fn messages_json_reports_local_source() {
    let state = offline_state();
    offsync_in(&state).args(["send", "one"]).assert().success();

    let output = offsync_in(&state)
        .args(["messages", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing["source"], "local");
    assert_eq!(listing["records"][0]["msg"], "one");
    assert_eq!(listing["records"][0]["uploaded"], false);
}

#[test]
fn status_reports_offline() {
    let state = offline_state();
    offsync_in(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Queued requests: 0"))
        .stdout(predicate::str::contains("warning: offline"));
}

#[test]
fn sync_while_offline_warns() {
    let state = offline_state();
    offsync_in(&state)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing was synced"));
}

#[test]
fn upload_rejects_non_pdf() {
    let state = offline_state();
    let file = state.path().join("notes.txt");
    std::fs::write(&file, "plain text").unwrap();

    offsync_in(&state)
        .arg("upload")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid PDF"));
}

#[test]
fn upload_pdf_offline_is_kept_pending() {
    let state = offline_state();
    let file = state.path().join("report.pdf");
    std::fs::write(&file, b"%PDF-1.4 minimal").unwrap();

    offsync_in(&state)
        .arg("upload")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("report.pdf saved locally"));

    offsync_in(&state)
        .arg("pdfs")
        .assert()
        .success()
        .stdout(predicate::str::contains("(pending)"));
}

#[test]
fn delete_unknown_message_warns() {
    let state = offline_state();
    offsync_in(&state)
        .args(["delete-message", "msg_missing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning: no message"));
}

#[test]
fn show_message_offline_reads_local_copy() {
    let state = offline_state();
    let output = offsync_in(&state)
        .args(["send", "look me up", "--json"])
        .output()
        .unwrap();
    let saved: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = saved["record"]["id"].as_str().unwrap().to_string();

    offsync_in(&state)
        .args(["show-message", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("look me up"))
        .stdout(predicate::str::contains("info: message read from local"));

    offsync_in(&state)
        .args(["show-message", "msg_missing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning: no message"));
}

#[test]
fn fetch_api_post_offline_is_queued() {
    let state = offline_state();
    offsync_in(&state)
        .args([
            "fetch",
            "http://127.0.0.1:9/api/messages",
            "--post",
            r#"{"msg":"queued"}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("HTTP 202"))
        .stdout(predicate::str::contains("queued for replay"));

    offsync_in(&state)
        .arg("pending")
        .assert()
        .success()
        .stdout(predicate::str::contains("Queued requests: 1"));
}

#[test]
fn invalid_config_is_reported() {
    let state = TempDir::new().unwrap();
    write_config(state.path(), "api_base_url = \"ftp://nope\"\n");

    offsync_in(&state)
        .arg("pending")
        .assert()
        .failure()
        .stderr(predicate::str::contains("api_base_url"));
}
