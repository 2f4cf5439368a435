// Helpers for fatal-path tests.
//
// A fatal error aborts the whole process, so each such test re-runs its own
// test binary filtered down to itself, with FATAL_CHILD set. The child takes
// the aborting branch; the parent checks how it died.

use std::env;
use std::process::{Command, Output};

pub const FATAL_CHILD: &str = "CONDUIT_FATAL_CHILD";

/// True inside the re-run child process.
pub fn in_fatal_child() -> bool {
    env::var_os(FATAL_CHILD).is_some()
}

/// Re-run `test_name` from the current test binary in a child process.
pub fn run_fatal_child(test_name: &str) -> Output {
    let exe = env::current_exe().expect("current test binary");
    Command::new(exe)
        // --nocapture: captured output would be lost with the abort
        .args([test_name, "--exact", "--nocapture", "--test-threads=1"])
        .env(FATAL_CHILD, "1")
        .output()
        .expect("failed to spawn child test process")
}

/// Assert the child aborted (not a panic, not a clean exit) after printing
/// a fatal diagnostic containing `needle`.
pub fn assert_fatal(output: &Output, needle: &str) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    println!("child status: {:?}\nchild stderr:\n{stderr}", output.status);

    assert!(!output.status.success(), "child exited cleanly");
    // 101 is the test harness's exit code for a panicking test.
    assert_ne!(output.status.code(), Some(101), "child panicked instead of aborting");
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(output.status.signal(), Some(6), "child was not killed by SIGABRT");
    }
    assert!(stderr.contains("Fatal error"), "no fatal diagnostic on stderr");
    assert!(stderr.contains(needle), "diagnostic does not mention {needle:?}");
}
