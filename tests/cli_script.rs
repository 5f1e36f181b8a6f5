use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use std::path::Path;

fn run_script(home: &Path, script: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("fintrack_cli")
        .unwrap()
        .env("FINTRACK_CLI_SCRIPT", "1")
        .env("FINTRACK_HOME", home)
        .env_remove("RUST_LOG")
        .write_stdin(script.to_string())
        .assert()
        .success()
}

#[test]
fn script_mode_tracks_balance_and_lists_entries() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "balance 100\nadd add 50 salary\nadd subtract 30 food\nlist\nexit\n",
    )
    .stdout(
        contains("Current balance: $150.00")
            .and(contains("Current balance: $120.00"))
            .and(contains("1. salary"))
            .and(contains("+ $50.00"))
            .and(contains("2. food"))
            .and(contains("- $30.00")),
    );
}

#[test]
fn data_survives_between_runs() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "balance 100\nadd add 50 salary\nadd subtract 30 food\ngoal 200\n",
    );

    let stored = std::fs::read_to_string(home.path().join("store.json")).unwrap();
    assert!(stored.contains(r#""balance": "120""#));
    assert!(stored.contains(r#"\"type\":\"subtract\""#));

    run_script(home.path(), "list\nprogress\n").stdout(
        contains("salary")
            .and(contains("Current balance: $120.00"))
            .and(contains("Achieved Balance: $120.00"))
            .and(contains("Remaining Balance: $80.00")),
    );
}

#[test]
fn overdraft_is_rejected_and_reported() {
    let home = tempfile::tempdir().unwrap();
    run_script(home.path(), "balance 10\nadd subtract 50 car\nlist\n").stdout(
        contains("Insufficient balance: requested 50.00, available 10.00")
            .and(contains("No transactions recorded.")),
    );
}

#[test]
fn edit_and_delete_adjust_the_balance() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "balance 100\nadd add 50 salary\nedit 1 20 gift\ndelete 1\nbalance\n",
    )
    .stdout(
        contains("Updated #1: + $20.00 gift")
            .and(contains("Current balance: $120.00"))
            .and(contains("Deleted #1: + $20.00 gift"))
            .and(contains("Current balance: $100.00")),
    );
}

#[test]
fn invalid_input_is_reported_without_stopping() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "add add lots bonus\nadd add 5\nedit 3 1 x\nblance 5\nbalance 7\n",
    )
    .stdout(
        contains("Invalid input")
            .and(contains("usage: add"))
            .and(contains("there is no transaction #3"))
            .and(contains("Did you mean `balance`?"))
            .and(contains("Balance set to $7.00.")),
    );
}

#[test]
fn backups_can_be_restored() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "balance 100\nbackup first snapshot\nbalance 5\nbackups\nrestore 1\n",
    )
    .stdout(
        contains("Backup created: store_")
            .and(contains("_first-snapshot.json"))
            .and(contains("Restored store_"))
            .and(contains("current balance: $100.00")),
    );
    assert!(home.path().join("backups").is_dir());
}

#[test]
fn config_changes_currency_display() {
    let home = tempfile::tempdir().unwrap();
    run_script(home.path(), "config set currency_symbol €\nbalance 12.5\n")
        .stdout(contains("Balance set to €12.50."));
    assert!(home.path().join("config").join("config.json").exists());

    run_script(home.path(), "config show\nversion\n").stdout(
        contains("currency_symbol")
            .and(contains("€"))
            .and(contains("FinTrack ")),
    );
}
