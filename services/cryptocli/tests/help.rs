use std::process::Command;

#[test]
fn test_help_lists_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_cryptocli"))
        .arg("--help")
        .output()
        .expect("run cryptocli");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("tokenize"));
    assert!(stdout.contains("login"));
}

#[test]
fn test_subcommand_help_shows_flags() {
    let output = Command::new(env!("CARGO_BIN_EXE_cryptocli"))
        .args(["tokenize", "--help"])
        .output()
        .expect("run cryptocli");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--policyName"));
    assert!(stdout.contains("--tokenData"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_cryptocli"))
        .arg("frobnicate")
        .output()
        .expect("run cryptocli");

    assert_eq!(output.status.code(), Some(1));
}
