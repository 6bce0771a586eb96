//! Tests for the testbatch command line

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

fn testbatch() -> Command {
    let mut cmd = Command::cargo_bin("testbatch").unwrap();
    // Keep the environment from changing defaults under test
    for var in [
        "TESTBATCH_BATCH_SIZE",
        "TESTBATCH_SUFFIX",
        "TESTBATCH_SKIP_FILE",
        "TESTBATCH_INTERPRETER",
        "TESTBATCH_BRIDGE",
        "TESTBATCH_BROWSER_HELPER",
        "TESTBATCH_TIMEOUT",
        "TESTBATCH_STRICT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_invalid_target_is_usage_error() {
    let temp_dir = TempDir::new().unwrap();

    let output = testbatch()
        .args(["phone", &temp_dir.path().to_string_lossy()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("TESTRUN"), "no run should start: {}", stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid target: phone"), "stderr: {}", stderr);
}

#[test]
fn test_missing_directory_argument() {
    let output = testbatch().arg("desktop").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_directory_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope");

    let output = testbatch()
        .args(["desktop", &missing.to_string_lossy()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Test directory not found"), "stderr: {}", stderr);
}

#[cfg(unix)]
#[test]
fn test_summary_and_command_echo() {
    let temp_dir = TempDir::new().unwrap();
    let tests = temp_dir.path().join("tests");
    fs::create_dir(&tests).unwrap();
    for name in ["a.js", "b.js", "httpfoo.js", "z.js"] {
        fs::write(tests.join(name), "exit 0\n").unwrap();
    }
    fs::write(tests.join("skip.browser"), "b.js\n^z.js\n").unwrap();

    let output = testbatch()
        .args(["desktop", &tests.to_string_lossy(), "--interpreter", "sh"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("TESTRUN: Total tests: 4"), "stdout: {}", stdout);
    assert!(stdout.contains("TESTRUN: Tests to run multiple : 3"));
    assert!(stdout.contains("TESTRUN: Tests to run single: 1"));
    assert!(stdout.contains("TESTRUN: Tests skipped: 1"));
    assert!(stdout.contains("TESTRUN: Tests to run per invocation: 1"));
    assert!(stdout.contains(&format!("TESTSTR (desktop): sh {}/a.js", tests.display())));
    assert!(stdout.contains(&format!("TESTSTR (desktop): sh {}/httpfoo.js", tests.display())));
    assert!(stdout.contains(&format!("TESTSTR (desktop): sh {}/z.js", tests.display())));
    assert!(!stdout.contains("b.js"));
    assert!(stdout.contains("TESTRUN: Time to run tests: "));
}

#[cfg(unix)]
#[test]
fn test_missing_skip_file_warns() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.js"), "exit 0\n").unwrap();

    let output = testbatch()
        .args(["desktop", &temp_dir.path().to_string_lossy(), "--interpreter", "sh"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Warning: No skip file provided, running all tests"));
}

#[cfg(unix)]
#[test]
fn test_crash_exit_code_legacy_and_strict() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("crash.js"), "kill -KILL $$\n").unwrap();
    let dir = temp_dir.path().to_string_lossy().into_owned();

    let legacy = testbatch()
        .args(["desktop", &dir, "--interpreter", "sh"])
        .output()
        .unwrap();
    assert!(legacy.status.success());
    let stdout = String::from_utf8_lossy(&legacy.stdout);
    assert_eq!(stdout.matches("Test ** CRASHED **").count(), 1, "stdout: {}", stdout);

    let strict = testbatch()
        .args(["desktop", &dir, "--interpreter", "sh", "--strict"])
        .output()
        .unwrap();
    assert_eq!(strict.status.code(), Some(1));
}

#[cfg(unix)]
#[test]
fn test_pattern_and_batch_size_flags() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["a-net.js", "b-net.js", "c-fs.js"] {
        fs::write(temp_dir.path().join(name), "exit 0\n").unwrap();
    }
    let dir = temp_dir.path().to_string_lossy().into_owned();

    let output = testbatch()
        .args(["desktop", &dir, "net", "--interpreter", "sh", "--batch-size", "2"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!(
        "TESTSTR (desktop): sh {0}/a-net.js {0}/b-net.js",
        dir
    )));
    assert_eq!(stdout.matches("TESTSTR").count(), 1);
}
