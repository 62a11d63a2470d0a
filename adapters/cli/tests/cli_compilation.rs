use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "slotfall"])
        .status()
        .expect("failed to invoke cargo check for slotfall CLI binary");

    assert!(status.success(), "cargo check --bin slotfall should succeed");
}

#[test]
fn scripted_session_prints_board_and_queue() {
    let output = Command::new(env!("CARGO_BIN_EXE_slotfall"))
        .args(["--seed", "7", "--moves", "0@1,1"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run slotfall binary");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8 output");
    assert!(stdout.contains("[0] "));
    assert!(stdout.contains("[2] "));
}

#[test]
fn malformed_script_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_slotfall"))
        .args(["--moves", "nonsense"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run slotfall binary");

    assert!(!output.status.success());
}

#[test]
fn oversized_grid_fails_without_panicking() {
    let output = Command::new(env!("CARGO_BIN_EXE_slotfall"))
        .args(["--columns", "4294967295", "--rows", "4294967295"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run slotfall binary");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tile limit"), "unexpected stderr: {stderr}");
    assert!(!stderr.contains("panicked"));
}
