use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn script(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("expenseflow").unwrap();
    cmd.env("EXPENSEFLOW_CLI_SCRIPT", "1")
        .env("EXPENSEFLOW_HOME", home)
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn script_mode_settles_shared_dinner() {
    let home = tempdir().unwrap();
    let input = "member add A\nmember add B\nmember add C\n\
                 expense add \"Team dinner\" 90 A\nbalances\nsettle\nexit\n";

    script(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Added member `A`."))
        .stdout(contains("+$60.00"))
        .stdout(contains("-$30.00"))
        .stdout(contains("B → A: $30.00"))
        .stdout(contains("C → A: $30.00"));
}

#[test]
fn ledger_survives_between_runs() {
    let home = tempdir().unwrap();
    script(home.path())
        .write_stdin("member add A\nmember add B\nexpense add Groceries 50 A\nexpense add Cinema 30 B\n")
        .assert()
        .success();

    script(home.path())
        .write_stdin("settle\nexpenses\n")
        .assert()
        .success()
        .stdout(contains("B → A: $10.00"))
        .stdout(contains("Total: $80.00"));

    let members =
        std::fs::read_to_string(home.path().join("data").join("expenseflow_members.json"))
            .unwrap();
    let members: Vec<String> = serde_json::from_str(&members).unwrap();
    assert_eq!(members, ["A", "B"]);
}

#[test]
fn empty_states_and_benign_errors_keep_running() {
    let home = tempdir().unwrap();
    script(home.path())
        .write_stdin("members\nmember remove Ghost\nexpense remove 12\nmember add A\nmember add A\nsettle\nmemberz\n")
        .assert()
        .success()
        .stdout(contains("Add members to get started"))
        .stdout(contains("member `Ghost`"))
        .stdout(contains("already a member"))
        .stdout(contains("Add expenses to see settlements"))
        .stdout(contains("Suggestion: `member`?"));
}

#[test]
fn even_split_reports_all_settled() {
    let home = tempdir().unwrap();
    script(home.path())
        .write_stdin("member add A\nmember add B\nexpense add Tea 10 A A\nexpense add Cake 10 B B\nsettle\nbalances\n")
        .assert()
        .success()
        .stdout(contains("All settled up!"))
        .stdout(contains("settled"));
}

#[test]
fn export_and_config_commands() {
    let home = tempdir().unwrap();
    let exports = home.path().join("exports");
    let input = format!(
        "config set currency_symbol €\nconfig set export_dir {}\nmember add A\nmember add B\n\
         expense add Fuel 40 A\nbalances\nexport\nconfig show\n",
        exports.display()
    );

    script(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("+€20.00"))
        .stdout(contains("Exported ledger to"))
        .stdout(contains("currency_symbol"));

    let written: Vec<_> = std::fs::read_dir(&exports)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("expenseflow-"));
    assert!(written[0].ends_with(".json"));

    let config = std::fs::read_to_string(home.path().join("config").join("config.json")).unwrap();
    assert!(config.contains("€"));
}
