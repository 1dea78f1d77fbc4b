use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

struct Sandbox {
    home: tempfile::TempDir,
    db: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let home = tempfile::tempdir().unwrap();
        let db = home.path().join("data").join("penny.db");
        Self { home, db }
    }

    fn penny(&self) -> Command {
        let mut cmd = Command::cargo_bin("penny").unwrap();
        cmd.env("HOME", self.home.path())
            .env_remove("RUST_LOG")
            .arg("--db")
            .arg(&self.db);
        cmd
    }

    fn session_file(&self) -> PathBuf {
        self.db.parent().unwrap().join("session.json")
    }
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn add(sb: &Sandbox, amount: &str, category: &str, note: &str) {
    sb.penny()
        .args(["add", amount, "-c", category, "--date", &today(), "--note", note])
        .assert()
        .success()
        .stdout(predicate::str::contains(category));
}

#[test]
fn test_init_writes_settings_and_database() {
    let sb = Sandbox::new();
    let data_dir = sb.home.path().join("books");
    sb.penny()
        .args(["init", "--data-dir"])
        .arg(&data_dir)
        .args(["--budget", "500000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Penny is ready"))
        .stdout(predicate::str::contains("500,000원"));

    let settings = sb.home.path().join(".config/penny/settings.json");
    let content = std::fs::read_to_string(settings).unwrap();
    assert!(content.contains("500000"));
    assert!(data_dir.is_dir());
    assert!(sb.db.exists());
}

#[test]
fn test_ask_answers_from_recorded_expenses() {
    let sb = Sandbox::new();
    add(&sb, "10000", "식비", "점심 카드");
    add(&sb, "5000", "교통", "현금");

    sb.penny()
        .args(["ask", "이번 달 식비 얼마 썼어?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10,000원"))
        .stdout(predicate::str::contains("식비"));
}

#[test]
fn test_ask_remembers_previous_question_until_reset() {
    let sb = Sandbox::new();
    add(&sb, "10000", "식비", "");

    sb.penny().args(["ask", "이번 달 식비 얼마 썼어?"]).assert().success();
    assert!(sb.session_file().exists());

    sb.penny()
        .args(["ask", "지난달은?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("지난달 식비 지출은 총 0원이에요."));

    sb.penny().arg("reset").assert().success();
    assert!(!sb.session_file().exists());

    sb.penny()
        .args(["ask", "지난달은?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("지난달 지출은 총 0원이에요."));
}

#[test]
fn test_ask_out_of_scope() {
    let sb = Sandbox::new();
    sb.penny()
        .args(["ask", "tell", "me", "a", "joke"])
        .assert()
        .success()
        .stdout(predicate::str::contains("지출 내역에 대한 질문에만"));
}

#[test]
fn test_budget_from_settings() {
    let sb = Sandbox::new();
    sb.penny()
        .args(["init", "--data-dir"])
        .arg(sb.home.path().join("books"))
        .args(["--budget", "50000"])
        .assert()
        .success();
    add(&sb, "60000", "쇼핑", "");

    sb.penny()
        .args(["ask", "이번 달 예산 초과했어?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10,000원 초과했어요"));
}

#[test]
fn test_list_shows_month_table() {
    let sb = Sandbox::new();
    add(&sb, "12000", "식비", "김밥");
    sb.penny()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("김밥"))
        .stdout(predicate::str::contains("12,000원"));
}

#[test]
fn test_list_empty_month() {
    let sb = Sandbox::new();
    sb.penny()
        .args(["list", "--month", "2001-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2001년 1월"))
        .stdout(predicate::str::contains("지출 내역이 없어요"));
}

#[test]
fn test_add_rejects_bad_input() {
    let sb = Sandbox::new();
    sb.penny()
        .args(["add", "-c", "식비", "--", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: amount must be zero or more"));

    sb.penny()
        .args(["add", "1000", "-c", "식비", "--date", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
    assert!(!sb.db.exists());
}
