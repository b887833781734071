use std::{
    io::Write,
    process::{Command, Output, Stdio},
};

fn run_diplomacy(args: &[&str], script: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_diplomacy"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to launch the diplomacy binary");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(script.as_bytes())
        .expect("failed to send script");

    child.wait_with_output().expect("diplomacy binary did not finish")
}

#[test]
fn scripted_move_passes_the_turn_to_white() {
    let output = run_diplomacy(&["--events"], "click 6 7\nclick 5 7\n");

    assert!(output.status.success(), "replay should succeed: {output:?}");
    let stdout = String::from_utf8(output.stdout).expect("utf-8 stdout");
    assert!(stdout.starts_with("Welcome to Diplomacy.\n"));
    assert!(
        stdout.contains("\"EntityMoved\""),
        "move event missing in {stdout}"
    );
    assert!(
        stdout.contains("\n .  .  .  .  .  .  .  r\n"),
        "red piece should be drawn on row 5: {stdout}"
    );
    assert!(stdout.contains("round 0 | white to move"));
}

#[test]
fn malformed_script_reports_its_line() {
    let output = run_diplomacy(&[], "click 6 7\njump 1 1\n");

    assert!(!output.status.success(), "malformed script must fail");
    let stderr = String::from_utf8(output.stderr).expect("utf-8 stderr");
    assert!(
        stderr.contains("line 2: unknown step `jump`"),
        "stderr lacks the line number: {stderr}"
    );
}

#[test]
fn oversized_board_is_refused() {
    let output = run_diplomacy(&["--board-size", "4294967295"], "");

    assert!(!output.status.success(), "oversized board must fail");
    let stderr = String::from_utf8(output.stderr).expect("utf-8 stderr");
    assert!(
        stderr.contains("exceeds the maximum of 256"),
        "unexpected stderr: {stderr}"
    );
}
