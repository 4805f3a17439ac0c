use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "prairie-burn"])
        .status()
        .expect("failed to invoke cargo check for prairie-burn CLI binary");

    assert!(status.success(), "cargo check --bin prairie-burn should succeed");
}

#[test]
fn terminal_frontend_plays_from_stdin() {
    let output = Command::new(env!("CARGO_BIN_EXE_prairie-burn"))
        .args(["--frontend", "terminal", "--plain", "--level", "1"])
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .and_then(|mut child| {
            use std::io::Write;
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(b"w\nw\nq\n")?;
            }
            child.wait_with_output()
        })
        .expect("failed to run prairie-burn");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome to Prairie Burn."));
    assert!(stdout.contains("Setup Phase: 2 wet squares remaining"));
}
