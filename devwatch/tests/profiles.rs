//! Tests for profile load/save and resolution logic (non-interactive paths only)
use std::fs;
use std::process::Command;
use std::sync::Mutex;

use devwatch::profiles::profiles_path;

// Global lock to serialize tests that mutate process-wide environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn run_devwatch(config_home: &std::path::Path, args: &[&str]) -> (bool, String) {
    let exe = env!("CARGO_BIN_EXE_devwatch");
    let output = Command::new(exe)
        .env("XDG_CONFIG_HOME", config_home)
        .args(args)
        .output()
        .expect("run devwatch");
    let ok = output.status.success();
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (ok, text)
}

// Points this process at a fresh config dir so profiles_path() matches the child's.
fn isolated() -> tempfile::TempDir {
    let td = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", td.path());
    std::fs::create_dir_all(td.path().join("devwatch")).unwrap();
    td
}

#[test]
fn test_profile_created_on_first_use() {
    let _guard = ENV_LOCK.lock().unwrap();
    let td = isolated();
    // Profile + url => profiles.json written; --dry-run exits before connecting
    let (ok, out) = run_devwatch(td.path(), &["--profile", "unittest", "http://example:1", "--dry-run"]);
    assert!(ok, "{out}");
    let data = fs::read_to_string(profiles_path()).expect("profiles.json created");
    assert!(
        data.contains("unittest") && data.contains("http://example:1"),
        "profiles.json missing profile entry: {data}"
    );
}

#[test]
fn test_profile_overwrite_only_when_changed() {
    let _guard = ENV_LOCK.lock().unwrap();
    let td = isolated();
    run_devwatch(td.path(), &["--profile", "prod", "http://one:5000", "--dry-run"]);
    let first = fs::read_to_string(profiles_path()).unwrap();
    // Re-run identical (should not duplicate or corrupt)
    run_devwatch(td.path(), &["--profile", "prod", "http://one:5000", "--dry-run"]);
    let second = fs::read_to_string(profiles_path()).unwrap();
    assert_eq!(first, second, "Profile file changed despite identical input");
    // Overwrite with different URL using --save (no prompt path)
    run_devwatch(td.path(), &["--profile", "prod", "--save", "http://two:5000", "--dry-run"]);
    let third = fs::read_to_string(profiles_path()).unwrap();
    assert!(third.contains("two"), "Updated URL not written: {third}");
}

#[test]
fn test_profile_tls_ca_persisted_and_loaded() {
    let _guard = ENV_LOCK.lock().unwrap();
    let td = isolated();
    run_devwatch(
        td.path(),
        &["--profile", "secureX", "--tls-ca", "/tmp/cert.pem", "https://host:8443", "--dry-run"],
    );
    let data = fs::read_to_string(profiles_path()).unwrap();
    assert!(data.contains("secureX"));
    assert!(data.contains("cert.pem"));

    // Name alone resolves the stored entry
    let (ok, out) = run_devwatch(td.path(), &["-P", "secureX", "--dry-run"]);
    assert!(ok, "{out}");
    assert!(out.contains("https://host:8443"), "{out}");
}
