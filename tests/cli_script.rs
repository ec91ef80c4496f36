use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn script_command(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("spendtrack").expect("binary builds");
    cmd.env("SPENDTRACK_CLI_SCRIPT", "1")
        .env("SPENDTRACK_HOME", home.path())
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn scripted_session_tracks_salary_and_balance() {
    let home = TempDir::new().unwrap();
    script_command(&home)
        .write_stdin(concat!(
            "salary 50000\n",
            "add \"Car EMI\" 10000 EMI 2025-01-01\n",
            "balance 2025-06-15\n",
            "exit\n",
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("40000.00"))
        .stdout(predicate::str::contains("Balance on 2025-06-15"));
}

#[test]
fn breakdown_shows_category_shares() {
    let home = TempDir::new().unwrap();
    script_command(&home)
        .write_stdin(concat!(
            "salary 40000\n",
            "add \"Car EMI\" 10000 EMI 2025-01-01\n",
            "add \"SIP\" 10000 SAVING 2025-01-01\n",
            "breakdown 2025-03-10\n",
            "exit\n",
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("EMI"))
        .stdout(predicate::str::contains("25%"))
        .stdout(predicate::str::contains("REMAINING"));
}

#[test]
fn state_survives_between_runs() {
    let home = TempDir::new().unwrap();
    script_command(&home)
        .write_stdin("salary 12345\nexit\n")
        .assert()
        .success();

    script_command(&home)
        .write_stdin("salary\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("12345.00"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = TempDir::new().unwrap();
    script_command(&home)
        .write_stdin("balanec\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command"))
        .stdout(predicate::str::contains("balance"));
}

#[test]
fn invalid_input_is_reported_without_aborting_the_script() {
    let home = TempDir::new().unwrap();
    script_command(&home)
        .write_stdin(concat!(
            "add \"Backwards\" 500 OTHER 2025-05-01 --end 2025-04-01\n",
            "salary 777\n",
            "exit\n",
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("777.00"))
        .stderr(predicate::str::contains("precedes start date"));
}
