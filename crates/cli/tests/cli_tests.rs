//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "pump-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Irrigation Pump Predictor"),
        "Should show app name"
    );
    assert!(stdout.contains("predict"), "Should show predict command");
    assert!(stdout.contains("dataset"), "Should show dataset command");
    assert!(stdout.contains("init"), "Should show init command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "pump-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("pump"), "Should show binary name");
}

/// Test predict subcommand help
#[test]
fn test_predict_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "pump-cli", "--", "predict", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Predict help should succeed");
    assert!(stdout.contains("--model"), "Should show model option");
    assert!(stdout.contains("--soil"), "Should show soil option");
    assert!(stdout.contains("--temp"), "Should show temp option");
    assert!(stdout.contains("--hum"), "Should show hum option");
    assert!(stdout.contains("--from-db"), "Should show from-db option");
    assert!(
        stdout.contains("--device-id"),
        "Should show device-id option"
    );
    assert!(stdout.contains("--raw"), "Should show raw option");
    assert!(stdout.contains("--no-input"), "Should show no-input option");
}

/// Test dataset subcommand help
#[test]
fn test_dataset_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "pump-cli", "--", "dataset", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Dataset help should succeed");
    assert!(
        stdout.contains("--interval-minutes"),
        "Should show interval option"
    );
    assert!(stdout.contains("--lags"), "Should show lags option");
    assert!(stdout.contains("--horizon"), "Should show horizon option");
    assert!(stdout.contains("--since"), "Should show since option");
    assert!(stdout.contains("--format"), "Should show format option");
    assert!(stdout.contains("--output"), "Should show output option");
}

/// A missing model file must fail the run with a non-zero exit code
#[test]
fn test_predict_missing_model_fails() {
    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "pump-cli",
            "--",
            "predict",
            "--model",
            "/nonexistent/model.json",
            "--soil",
            "20",
            "--temp",
            "19",
            "--hum",
            "55",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(
        !output.status.success(),
        "Predict with a missing model file should exit non-zero"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("model artifact"),
        "Should report the artifact failure"
    );
}
