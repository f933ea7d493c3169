mod common;

use assert_cmd::Command;
use predicates::str::contains;

fn repay_cli(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("repay_cli").unwrap();
    cmd.env("REPAY_CLI_SCRIPT", "1")
        .env("REPAY_HOME", home)
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_adds_and_lists_payments() {
    let home = common::temp_base();
    let input = "add \"Shop A\" 10 --date 2024-01-01\n\
                 add \"Shop B\" 5 --date 2024-01-02\n\
                 handover-set 6\n\
                 sort price asc\n\
                 list\n\
                 summary\n\
                 exit\n";

    repay_cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Shop A"))
        .stdout(contains("Jan 2, 2024"))
        .stdout(contains("2 payment(s), total 15.00 zł"))
        .stdout(contains("Remaining    : 9.00 zł"));

    let stored = std::fs::read_to_string(home.join("data").join("payments.json")).unwrap();
    assert!(stored.contains("Shop B"));
}

#[test]
fn export_then_import_into_a_fresh_home() {
    let source = common::temp_base();
    let exports = common::temp_base();
    repay_cli(&source)
        .write_stdin(format!(
            "add Kiosk 3,5 --date 2024-03-01 --notes water\nhandover 2\nexport {}\n",
            exports.display()
        ))
        .assert()
        .success()
        .stdout(contains("Exported to"));

    let file = std::fs::read_dir(&exports)
        .unwrap()
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("repay_eksport_"))
        })
        .expect("export file written");

    let target = common::temp_base();
    repay_cli(&target)
        .write_stdin(format!("import {} --yes\nsummary\n", file.display()))
        .assert()
        .success()
        .stdout(contains("Imported 1 payment(s) and 1 handed-over amount(s)."))
        .stdout(contains("Remaining    : 1.50 zł"));
}

#[test]
fn unknown_command_suggests_closest_match() {
    let home = common::temp_base();
    repay_cli(&home)
        .write_stdin("sumary\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `sumary`"))
        .stdout(contains("Suggestion: `summary`?"));
}

#[test]
fn validation_messages_are_reported_without_stopping() {
    let home = common::temp_base();
    repay_cli(&home)
        .write_stdin("add Shop abc\nlist\n")
        .assert()
        .success()
        .stdout(contains("enter a valid price"))
        .stdout(contains("No payments yet."));
}
