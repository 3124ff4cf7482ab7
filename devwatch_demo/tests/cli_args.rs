//! CLI smoke test for devwatch_demo (server)
use std::process::Command;
use std::time::{Duration, Instant};

#[test]
fn test_port_short_long_and_serves() {
    let exe = env!("CARGO_BIN_EXE_devwatch_demo");

    // Short -p: the process starts and stays up until killed
    let mut child = Command::new(exe)
        .args(["-p", "9556"])
        .env("DEVWATCH_DEMO_LOG", "warn")
        .spawn()
        .expect("spawn demo backend");
    std::thread::sleep(Duration::from_millis(150));
    assert!(child.try_wait().expect("poll child").is_none(), "demo exited early");
    let _ = child.kill();
    let _ = child.wait();

    // Long --port: wait for the socket and fetch the dashboard once
    let mut child = Command::new(exe)
        .args(["--port", "9557"])
        .env("DEVWATCH_DEMO_LOG", "warn")
        .spawn()
        .expect("spawn demo backend");
    let rt = tokio::runtime::Runtime::new().unwrap();
    let body = rt.block_on(async {
        let start = Instant::now();
        loop {
            match reqwest::get("http://127.0.0.1:9557/api/dashboard/data").await {
                Ok(r) => break r.text().await.unwrap(),
                Err(_) if start.elapsed() < Duration::from_secs(3) => {
                    tokio::time::sleep(Duration::from_millis(50)).await
                }
                Err(e) => panic!("demo backend never answered: {e}"),
            }
        }
    });
    let _ = child.kill();
    let _ = child.wait();
    assert!(body.contains("\"success\":true"), "{body}");
}
