//! CLI integration tests against a temporary database.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const TRADES: &str = r#"[
  {
    "symbol": "SPY",
    "openedAt": "2024-03-01",
    "closedAt": "2024-03-08T15:30:00Z",
    "netCredit": "100",
    "legs": [
      {"optionType": "put", "position": "short", "strike": "500", "expiry": "2024-03-15", "quantity": 1},
      {"optionType": "put", "position": "long", "strike": "495", "expiry": "2024-03-15", "quantity": 1}
    ]
  },
  {
    "symbol": "QQQ",
    "openedAt": "2024-03-02",
    "closedAt": "2024-03-04",
    "netDebit": "40"
  },
  {
    "symbol": "IWM",
    "openedAt": "2024-03-05"
  }
]"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    fn db(&self) -> PathBuf {
        self.dir.path().join("journal.db")
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write temp file");
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("strikebook");
        cmd.env_remove("STRIKEBOOK_DATABASE")
            .env("RUST_LOG", "warn")
            .arg("--config")
            .arg(self.config())
            .arg("--db")
            .arg(self.db());
        cmd
    }

    fn import(&self, user: &str, file: &Path) {
        self.cmd()
            .args(["import", "--user", user])
            .arg(file)
            .assert()
            .success();
    }
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).expect("utf8 stdout");
    let line = text.lines().last().expect("json line on stdout");
    serde_json::from_str(line).expect("stdout is json")
}

#[test]
fn help_lists_commands() {
    cargo_bin_cmd!("strikebook")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("summary"))
        .stdout(predicate::str::contains("refresh"))
        .stdout(predicate::str::contains("recalculate-all"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn import_then_summary_computes_and_then_serves_cache() {
    let ws = Workspace::new();
    let file = ws.write("trades.json", TRADES);
    ws.import("alice", &file);

    let first = json_stdout(ws.cmd().args(["--json", "summary", "--user", "alice"]));
    assert_eq!(first["command"], "summary");
    assert_eq!(first["userId"], "alice");
    let summary = &first["summary"];
    assert_eq!(summary["refreshed"], true);
    assert_eq!(summary["data"]["totals"]["closedTrades"], 2);
    assert_eq!(summary["data"]["totals"]["winRate"], "50.00");
    assert_eq!(summary["data"]["totals"]["averagePnl"], "30.00");
    assert_eq!(
        summary["data"]["strategyBreakdown"][0]["strategy"],
        "verticalSpread"
    );

    let second = json_stdout(ws.cmd().args(["--json", "summary", "--user", "alice"]));
    assert_eq!(second["summary"]["refreshed"], false);
    assert_eq!(second["summary"]["data"], summary["data"]);
}

#[test]
fn refresh_always_recomputes() {
    let ws = Workspace::new();
    let file = ws.write("trades.json", TRADES);
    ws.import("alice", &file);

    for _ in 0..2 {
        let value = json_stdout(ws.cmd().args(["--json", "refresh", "--user", "alice"]));
        assert_eq!(value["command"], "refresh");
        assert_eq!(value["summary"]["refreshed"], true);
    }
}

#[test]
fn unknown_user_gets_an_empty_summary() {
    let ws = Workspace::new();

    let value = json_stdout(ws.cmd().args(["--json", "summary", "--user", "nobody"]));
    let totals = &value["summary"]["data"]["totals"];
    assert_eq!(totals["closedTrades"], 0);
    assert_eq!(totals["expectancy"], "0.00");
}

#[test]
fn recalculate_all_covers_every_imported_user() {
    let ws = Workspace::new();
    let file = ws.write("trades.json", TRADES);
    ws.import("alice", &file);
    ws.import("bob", &file);

    let value = json_stdout(ws.cmd().args(["--json", "recalculate-all"]));
    assert_eq!(value["command"], "recalculate-all");
    assert_eq!(value["succeeded"], 2);
    assert_eq!(value["failed"].as_array().map(Vec::len), Some(0));
}

#[test]
fn text_summary_shows_tables() {
    let ws = Workspace::new();
    let file = ws.write("trades.json", TRADES);
    ws.import("alice", &file);

    ws.cmd()
        .args(["summary", "--user", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("By strategy"))
        .stdout(predicate::str::contains("verticalSpread"))
        .stdout(predicate::str::contains("Holding periods"));
}

#[test]
fn malformed_import_writes_nothing() {
    let ws = Workspace::new();
    let file = ws.write(
        "bad.json",
        r#"[{"symbol": "SPY", "openedAt": "2024-03-01"}, {"symbol": " ", "openedAt": "2024-03-01"}]"#,
    );

    ws.cmd()
        .args(["import", "--user", "alice"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("trade #2"));

    let value = json_stdout(ws.cmd().args(["--json", "recalculate-all"]));
    assert_eq!(value["succeeded"], 0);
}

#[test]
fn invalid_config_exits_nonzero() {
    let ws = Workspace::new();
    ws.write("config.toml", "[analytics]\nfreshness_hours = 0\n");

    ws.cmd()
        .args(["summary", "--user", "alice"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("freshness_hours"));
}

#[test]
fn import_conflicting_with_stored_trade_is_all_or_nothing() {
    let ws = Workspace::new();
    let first = ws.write(
        "first.json",
        r#"[{"id": "t-1", "symbol": "SPY", "openedAt": "2024-03-01", "closedAt": "2024-03-02", "netCredit": "5"}]"#,
    );
    ws.import("alice", &first);

    let second = ws.write(
        "second.json",
        r#"[
          {"id": "t-2", "symbol": "QQQ", "openedAt": "2024-03-03", "closedAt": "2024-03-04", "netCredit": "7"},
          {"id": "t-1", "symbol": "IWM", "openedAt": "2024-03-05", "closedAt": "2024-03-06", "netDebit": "1"}
        ]"#,
    );
    ws.cmd()
        .args(["import", "--user", "alice"])
        .arg(&second)
        .assert()
        .failure();

    let value = json_stdout(ws.cmd().args(["--json", "refresh", "--user", "alice"]));
    assert_eq!(value["summary"]["data"]["totals"]["closedTrades"], 1);
}

#[test]
fn import_with_repeated_id_writes_nothing() {
    let ws = Workspace::new();
    let file = ws.write(
        "dup.json",
        r#"[
          {"id": "dup", "symbol": "SPY", "openedAt": "2024-03-01"},
          {"id": "dup", "symbol": "QQQ", "openedAt": "2024-03-02"}
        ]"#,
    );

    ws.cmd()
        .args(["import", "--user", "alice"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate id"));

    let value = json_stdout(ws.cmd().args(["--json", "recalculate-all"]));
    assert_eq!(value["succeeded"], 0);
}
