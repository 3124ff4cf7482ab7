//! Synthetic monitoring backend for devwatch: same HTTP contract, fabricated readings.

pub mod metrics;
pub mod routes;
pub mod state;
pub mod types;

pub use routes::router;
pub use state::DemoState;

pub const DEFAULT_PORT: u16 = 5000;

/// Serve the demo API on an already-bound listener until the task is dropped.
pub async fn serve(listener: tokio::net::TcpListener, state: DemoState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

/// Port from `--port N`, `-p N` or `--port=N`; the long form wins over the short one.
pub fn parse_port<I: IntoIterator<Item = String>>(args: I, default_port: u16) -> u16 {
    let mut it = args.into_iter();
    let _ = it.next(); // program name
    let mut long: Option<String> = None;
    let mut short: Option<String> = None;
    while let Some(a) = it.next() {
        match a.as_str() {
            "--port" => long = it.next(),
            "-p" => short = it.next(),
            _ if a.starts_with("--port=") => {
                if let Some((_, v)) = a.split_once('=') {
                    long = Some(v.to_string());
                }
            }
            _ => {}
        }
    }
    long.or(short)
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(default_port)
}
