//! Entry point for the devwatch console. Parses args, resolves the backend profile and runs the App.

use devwatch::api::ApiClient;
use devwatch::app::App;
use devwatch::logging;
use devwatch::profiles::{
    compare_profile, load_profiles, save_profiles, ProfileChange, ProfileEntry, ProfileRequest,
    ResolveProfile,
};
use devwatch::settings::load_settings;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Child, Command};
use std::time::Duration;

const USAGE: &str = "[--tls-ca CERT_PEM|-t CERT_PEM] [--profile NAME|-P NAME] [--save] [--demo] [--dry-run] [http://HOST:PORT]";

#[derive(Debug, Default)]
struct ParsedArgs {
    url: Option<String>,
    tls_ca: Option<String>,
    profile: Option<String>,
    save: bool,
    demo: bool,
    dry_run: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "devwatch".into());
    let mut parsed = ParsedArgs::default();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(format!("Usage: {prog} {USAGE}")),
            "--tls-ca" | "-t" => parsed.tls_ca = it.next(),
            "--profile" | "-P" => parsed.profile = it.next(),
            "--save" => parsed.save = true,
            "--demo" => parsed.demo = true,
            "--dry-run" => parsed.dry_run = true,
            _ if arg.starts_with("--tls-ca=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        parsed.tls_ca = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with("--profile=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        parsed.profile = Some(v.to_string());
                    }
                }
            }
            _ => {
                if parsed.url.is_none() {
                    parsed.url = Some(arg);
                } else {
                    return Err(format!("Unexpected argument. Usage: {prog} {USAGE}"));
                }
            }
        }
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };
    logging::init();

    // Demo mode short-circuit (ignore other args)
    if parsed.demo || matches!(parsed.profile.as_deref(), Some("demo")) {
        return run_demo_mode().await;
    }

    let Some((url, tls_ca)) = resolve_backend(&parsed)? else {
        return Ok(());
    };
    if url == "demo" {
        return run_demo_mode().await;
    }

    if parsed.dry_run {
        eprintln!("backend: {url}");
        return Ok(());
    }
    run_console(&url, tls_ca.as_deref()).await
}

// Resolves (url, tls_ca) from args and profiles, persisting profile changes. None means abort quietly.
fn resolve_backend(parsed: &ParsedArgs) -> anyhow::Result<Option<(String, Option<String>)>> {
    let mut profiles = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        tls_ca: parsed.tls_ca.clone(),
    };

    match req.resolve(&profiles) {
        ResolveProfile::Direct(url, tls_ca) => {
            if let Some(name) = parsed.profile.as_ref() {
                let entry = ProfileEntry {
                    url: url.clone(),
                    tls_ca: tls_ca.clone(),
                };
                let write = match compare_profile(&profiles, name, &entry) {
                    ProfileChange::Unchanged => false,
                    // New profile: auto-save immediately
                    ProfileChange::Created => true,
                    ProfileChange::Differs => {
                        parsed.save
                            || prompt_yes_no(&format!("Overwrite existing profile '{name}'? [y/N]: "))
                    }
                };
                if write {
                    profiles.profiles.insert(name.clone(), entry);
                    save_profiles(&profiles)?;
                    tracing::info!(profile = %name, "profile saved");
                }
            }
            Ok(Some((url, tls_ca)))
        }
        ResolveProfile::Loaded(url, tls_ca) => Ok(Some((url, tls_ca))),
        ResolveProfile::PromptSelect(mut names) => {
            // Always offer the demo backend
            if !names.iter().any(|n| n == "demo") {
                names.push("demo".into());
            }
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let Some(name) = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| names.get(idx))
            else {
                return Ok(None);
            };
            if name == "demo" {
                return Ok(Some(("demo".into(), None)));
            }
            Ok(profiles
                .profiles
                .get(name)
                .map(|e| (e.url.clone(), e.tls_ca.clone())))
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter backend URL (http://HOST:PORT): ")?;
            let url = url.trim().to_string();
            if url.is_empty() {
                return Ok(None);
            }
            let ca = prompt_string("Enter TLS CA path (or leave blank): ")?;
            let ca = Some(ca.trim().to_string()).filter(|c| !c.is_empty());
            profiles.profiles.insert(
                name,
                ProfileEntry {
                    url: url.clone(),
                    tls_ca: ca.clone(),
                },
            );
            save_profiles(&profiles)?;
            Ok(Some((url, ca)))
        }
        ResolveProfile::None => {
            eprintln!("No backend URL provided and no profiles to select.");
            Ok(None)
        }
    }
}

async fn run_console(url: &str, tls_ca: Option<&str>) -> anyhow::Result<()> {
    let client = ApiClient::new(url, tls_ca)?;
    let config = load_settings();
    tracing::info!(backend = %client.base_url(), "console starting");
    let mut app = App::new(client, config);
    app.run().await
}

fn prompt_yes_no(prompt: &str) -> bool {
    matches!(
        prompt_string(prompt).map(|l| l.trim().to_ascii_lowercase()).as_deref(),
        Ok("y" | "yes")
    )
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

// --- Demo Mode ---

const DEMO_PORT: u16 = 5231;

async fn run_demo_mode() -> anyhow::Result<()> {
    let url = format!("http://127.0.0.1:{DEMO_PORT}");
    let child = spawn_demo_backend(DEMO_PORT)?;
    tokio::select! {
        res = run_console(&url, None) => { drop(child); res }
        _ = tokio::signal::ctrl_c() => {
            // Drop child (kills backend) then return
            drop(child);
            Ok(())
        }
    }
}

struct DemoGuard(Child);

impl Drop for DemoGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn spawn_demo_backend(port: u16) -> anyhow::Result<DemoGuard> {
    let candidate = find_demo_executable();
    tracing::info!(exe = %candidate.display(), port, "starting demo backend");
    let child = Command::new(candidate)
        .arg("--port")
        .arg(port.to_string())
        .env("DEVWATCH_DEMO_LOG", "warn")
        .spawn()?;
    // Give the backend a brief moment to start
    std::thread::sleep(Duration::from_millis(300));
    Ok(DemoGuard(child))
}

fn find_demo_executable() -> PathBuf {
    if let Some(parent) = env::current_exe().ok().as_deref().and_then(|e| e.parent()) {
        #[cfg(windows)]
        let name = "devwatch_demo.exe";
        #[cfg(not(windows))]
        let name = "devwatch_demo";
        let candidate = parent.join(name);
        if candidate.exists() {
            return candidate;
        }
    }
    // Fallback to relying on PATH
    PathBuf::from("devwatch_demo")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        std::iter::once("devwatch")
            .chain(v.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parses_short_long_and_assign_forms() {
        let p = parse_args(args(&["-t", "/ca.pem", "-P", "lab", "http://h:5000"])).unwrap();
        assert_eq!(p.tls_ca.as_deref(), Some("/ca.pem"));
        assert_eq!(p.profile.as_deref(), Some("lab"));
        assert_eq!(p.url.as_deref(), Some("http://h:5000"));

        let p = parse_args(args(&["--tls-ca=/x.pem", "--profile=prod", "--save", "--dry-run"])).unwrap();
        assert_eq!(p.tls_ca.as_deref(), Some("/x.pem"));
        assert_eq!(p.profile.as_deref(), Some("prod"));
        assert!(p.save && p.dry_run && !p.demo);
    }

    #[test]
    fn help_and_extra_positional_are_errors() {
        assert!(parse_args(args(&["--help"])).unwrap_err().starts_with("Usage:"));
        assert!(parse_args(args(&["http://a", "http://b"]))
            .unwrap_err()
            .starts_with("Unexpected argument"));
    }
}
