use std::{net::SocketAddr, path::PathBuf, time::Duration};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub timings_path: PathBuf,
    pub elapsed_dir: PathBuf,
    pub library_root: PathBuf,
    pub poll_interval: Duration,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

fn env_millis(key: &str, default: u64) -> Duration {
    let millis = std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default);
    Duration::from_millis(millis)
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("KM_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5002".to_string())
            .parse()
            .expect("Invalid KM_LISTEN_ADDR");
        let static_dir =
            PathBuf::from(std::env::var("KM_STATIC_DIR").unwrap_or_else(|_| "static".into()));
        let timings_path = std::env::var("KM_TIMINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| static_dir.join("slide_timings.json"));
        let elapsed_dir = std::env::var("KM_ELAPSED_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| static_dir.join("elapsed_times"));
        let library_root = std::env::var("KM_LIBRARY_ROOT")
            .or_else(|_| std::env::var("HOME"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let cors_allow = std::env::var("KM_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            listen_addr,
            static_dir,
            timings_path,
            elapsed_dir,
            library_root,
            poll_interval: env_millis("KM_POLL_INTERVAL_MS", 1000)
                .max(Duration::from_millis(1)),
            cors_allow,
            request_timeout: env_millis("KM_REQUEST_TIMEOUT_MS", 30000),
        }
    }

    /// A configuration rooted entirely in `static_dir`, listening on an
    /// ephemeral port.
    pub fn for_static_dir(
        static_dir: impl Into<PathBuf>,
        library_root: impl Into<PathBuf>,
    ) -> Self {
        let static_dir = static_dir.into();
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            timings_path: static_dir.join("slide_timings.json"),
            elapsed_dir: static_dir.join("elapsed_times"),
            static_dir,
            library_root: library_root.into(),
            poll_interval: Duration::from_millis(1000),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
        }
    }
}
