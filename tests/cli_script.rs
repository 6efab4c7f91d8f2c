use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::tempdir;

fn shell(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("finance_core_cli").unwrap();
    cmd.env("FINANCE_CORE_CLI_SCRIPT", "1")
        .env("FINANCE_CORE_HOME", home)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn script_mode_runs_a_budget_flow() {
    let home = tempdir().unwrap();
    let input = "\
add income Salary 1000 2024-01-05
add expense Food 200 2024-01-10
add expense Food 50 2024-01-20 \"corner shop\"
budget set Food 300 2024-01
budget set Food 400 2024-01
budget status 2024-01
list expense all 2024-01-15 2024-01-31
exit
";

    shell(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Recorded expense #3"))
        .stdout(contains("62.5%"))
        .stdout(contains("corner shop"))
        .stdout(contains("1 transaction(s)."));
}

#[test]
fn script_mode_reports_errors_and_keeps_going() {
    let home = tempdir().unwrap();
    let input = "add expense Food lots 2024-01-10\nbudgte status\ngoal add Bike 600\ngoal list\n";

    shell(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("invalid amount `lots`"))
        .stdout(contains("Suggestion: `budget`?"))
        .stdout(contains("Bike"))
        .stdout(contains("Recorded").not());
}

#[test]
fn sqlite_backend_persists_between_sessions() {
    let home = tempdir().unwrap();
    shell(home.path())
        .write_stdin("config set backend sqlite\n")
        .assert()
        .success();

    shell(home.path())
        .write_stdin("add expense Rent 900 2024-03-01\n")
        .assert()
        .success()
        .stdout(contains("Recorded expense #1"));

    shell(home.path())
        .write_stdin("list\nimport missing.json\n")
        .assert()
        .success()
        .stdout(contains("Rent"))
        .stdout(contains("only available with the memory backend"));

    assert!(home.path().join("ledger.db").exists());
}
