//! CLI arg parsing tests for devwatch (console)
use assert_cmd::Command;

fn run(args: &[&str]) -> (bool, String) {
    let output = Command::cargo_bin("devwatch")
        .expect("devwatch binary")
        .args(args)
        .output()
        .expect("run devwatch");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (output.status.success(), text)
}

#[test]
fn test_help_mentions_short_and_long_flags() {
    let (ok, text) = run(&["--help"]);
    assert!(ok);
    assert!(
        text.contains("--tls-ca")
            && text.contains("-t")
            && text.contains("--profile")
            && text.contains("-P")
            && text.contains("--dry-run"),
        "help text missing expected flags (--tls-ca/-t, --profile/-P, --dry-run)\n{text}"
    );
}

#[test]
fn test_flags_are_accepted_before_help() {
    // --help after other flags exits after parsing, with no network access
    for args in [
        &["--tls-ca", "/tmp/cert.pem", "--help"][..],
        &["-t", "/tmp/cert.pem", "--help"][..],
        &["--profile", "dev", "--help"][..],
        &["-P", "dev", "--save", "--help"][..],
    ] {
        let (ok, text) = run(args);
        assert!(ok, "devwatch {args:?} did not succeed");
        assert!(text.contains("Usage:"), "{text}");
    }
}

#[test]
fn test_second_positional_is_rejected() {
    let (_ok, text) = run(&["http://a:5000", "http://b:5000"]);
    assert!(text.contains("Unexpected argument"), "{text}");
}
