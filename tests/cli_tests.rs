//! End-to-end tests driving the `todo` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A scratch repository root plus an isolated data dir for the log file.
struct CliEnv {
    repo: TempDir,
    data: TempDir,
}

impl CliEnv {
    fn new() -> Self {
        Self {
            repo: TempDir::new().expect("repo dir"),
            data: TempDir::new().expect("data dir"),
        }
    }

    fn root(&self) -> &Path {
        self.repo.path()
    }

    fn todo(&self) -> Command {
        let mut cmd = Command::cargo_bin("todo").expect("binary");
        cmd.arg("--dir")
            .arg(self.root())
            .env("HOME", self.data.path())
            .env("XDG_DATA_HOME", self.data.path())
            .env("NO_COLOR", "1");
        cmd
    }

    fn git_init(&self) -> bool {
        std::process::Command::new("git")
            .arg("init")
            .arg("-q")
            .arg(self.root())
            .env("HOME", self.data.path())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn init(&self) {
        self.todo().arg("init").assert().success();
    }

    fn new_item(&self, title: &str) -> String {
        let output = self.todo().args(["new", title]).output().expect("run todo new");
        assert!(output.status.success());
        String::from_utf8(output.stdout).expect("utf8").trim().to_string()
    }

    fn stdout(&self, args: &[&str]) -> String {
        let output = self.todo().args(args).output().expect("run todo");
        assert!(output.status.success(), "todo {:?} failed", args);
        String::from_utf8(output.stdout).expect("utf8")
    }
}

#[test]
fn init_outside_git_creates_store() {
    let env = CliEnv::new();
    env.todo().arg("init").assert().success().stdout(contains("initialized todo"));

    assert!(env.root().join(".todos/todos.jsonl").is_file());
    assert!(env.root().join(".todos/closed.jsonl").is_file());
    assert!(!env.root().join(".gitattributes").exists());
}

#[test]
fn init_twice_in_git_repo_is_idempotent() {
    let env = CliEnv::new();
    if !env.git_init() {
        eprintln!("git unavailable, skipping");
        return;
    }

    env.init();
    let id = env.new_item("Survives re-init");
    env.init();

    let attributes = fs::read_to_string(env.root().join(".gitattributes")).unwrap();
    assert_eq!(attributes, ".todos/todos.jsonl merge=todo\n.todos/closed.jsonl merge=todo\n");
    assert!(env.stdout(&["list"]).contains(&id));
}

#[test]
fn init_succeeds_when_git_config_is_locked() {
    let env = CliEnv::new();
    if !env.git_init() {
        eprintln!("git unavailable, skipping");
        return;
    }
    fs::write(env.root().join(".git/config.lock"), "").unwrap();

    env.todo().arg("init").assert().success().stdout(contains("initialized todo"));
    assert!(env.root().join(".todos/todos.jsonl").is_file());
    assert!(env.root().join(".gitattributes").is_file());
}

#[test]
fn new_prints_only_the_id() {
    let env = CliEnv::new();
    env.init();

    env.todo()
        .args(["new", "Write docs"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^td-[0-9a-f]{8}\n$").unwrap());
}

#[test]
fn mutating_commands_are_silent() {
    let env = CliEnv::new();
    env.init();
    let design = env.new_item("Design");
    let build = env.new_item("Build");

    env.todo().args(["dep", build.as_str(), design.as_str()]).assert().success().stdout("");
    env.todo().args(["summary", build.as_str(), "after design"]).assert().success().stdout("");
    env.todo().args(["close", design.as_str()]).assert().success().stdout("");

    let closed = env.stdout(&["list", "--closed"]);
    assert!(closed.contains(&design));
}

#[test]
fn list_json_prints_one_record_per_line() {
    let env = CliEnv::new();
    env.init();
    let a = env.new_item("First");
    let b = env.new_item("Second");
    env.todo().args(["dep", b.as_str(), a.as_str()]).assert().success();

    let out = env.stdout(&["list", "--json"]);
    let records: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(records.len(), 2);

    let mut expected = vec![a.clone(), b.clone()];
    expected.sort();
    let ids: Vec<&str> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, expected);

    let ready = env.stdout(&["ready", "--json"]);
    assert_eq!(ready.lines().count(), 1);
    assert!(ready.contains(&a));

    let blocked = env.stdout(&["blocked", "--json"]);
    assert_eq!(blocked.lines().count(), 1);
    assert!(blocked.contains(&b));
}

#[test]
fn newline_in_title_is_accepted() {
    let env = CliEnv::new();
    env.init();
    let id = env.new_item("first line\nsecond line");

    let out = env.stdout(&["show", id.as_str(), "--json"]);
    let record: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(record["title"], "first line\nsecond line");
}

#[test]
fn unknown_id_fails_with_message() {
    let env = CliEnv::new();
    env.init();

    env.todo()
        .args(["close", "td-nothere"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("todo:").and(contains("unknown id")));
}

#[test]
fn commands_before_init_fail() {
    let env = CliEnv::new();

    env.todo()
        .args(["new", "Too early"])
        .assert()
        .failure()
        .stderr(contains("not initialized"));
    assert!(!env.root().join(".todos").exists());
}

#[test]
fn merge_subcommand_rewrites_ours() {
    let env = CliEnv::new();
    let base = env.root().join("base");
    let ours = env.root().join("ours");
    let theirs = env.root().join("theirs");

    fs::write(&base, "").unwrap();
    fs::write(
        &ours,
        "{\"id\":\"td-0000000a\",\"title\":\"ours\",\"summary\":\"\",\"status\":\"open\",\"deps\":[],\"updated_at\":\"2024-03-01T12:00:00Z\"}\n",
    )
    .unwrap();
    fs::write(
        &theirs,
        "{\"id\":\"td-0000000a\",\"title\":\"theirs\",\"summary\":\"\",\"status\":\"open\",\"deps\":[],\"updated_at\":\"2024-03-01T12:00:05Z\"}\n",
    )
    .unwrap();

    env.todo().arg("merge").arg(&base).arg(&ours).arg(&theirs).assert().success();
    assert!(fs::read_to_string(&ours).unwrap().contains("\"title\":\"theirs\""));
}
