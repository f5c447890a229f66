use hive_client::api::ApiClient;
use hive_client::config::{Config, load_env_file};
use hive_client::transport::UreqTransport;
use hive_client::utils::summarize_device;
use hive_client::{DeviceRepository, HiveError};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Where the environment file came from, for the startup log.
enum EnvSource {
    Cli(PathBuf),
    Default(PathBuf),
}

fn run() -> Result<(), String> {
    // 1) Load config
    let cfg = Config::from_env()?;
    info!(
        "Config loaded (api_base={}, client_id={}, poll_interval={}s, http_timeout={}s)",
        cfg.api_base,
        cfg.client_id,
        cfg.poll_interval.as_secs(),
        cfg.http_timeout.as_secs()
    );

    // 2) Log in
    let transport = Arc::new(UreqTransport::new(cfg.http_timeout));
    let api = Arc::new(ApiClient::new(transport, cfg.api_base.clone(), cfg.client_id.clone()));
    let repo = DeviceRepository::connect(api, cfg.credentials.clone())
        .map_err(|e| format!("Hive login failed (check HIVE_USERNAME/HIVE_PASSWORD): {}", e))?;
    if let Some(user) = repo.user_id() {
        info!("Logged in as user {}", user.0);
    }

    // 3) Poll loop (steady cadence)
    info!("Starting poll loop: interval={}s", cfg.poll_interval.as_secs());
    let result = poll_loop(&repo, cfg.poll_interval);

    repo.close();
    result
}

fn poll_loop(repo: &DeviceRepository, interval: Duration) -> Result<(), String> {
    loop {
        let tick_start = Instant::now();

        match repo.list_devices() {
            Ok(devices) => {
                info!("Polled {} device(s)", devices.len());
                for device in &devices {
                    info!("  {}", summarize_device(device));
                }
            }
            // Worth another try on the next tick.
            Err(e @ (HiveError::Transport(_) | HiveError::UnknownApi { .. })) => {
                warn!("Polling devices failed: {}", e);
            }
            Err(e) => return Err(format!("Polling devices failed: {}", e)),
        }

        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}

fn configure_env_from_cli() -> Result<Option<EnvSource>, String> {
    let mut args = std::env::args().skip(1);
    let mut env_file: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        let path = match arg.as_str() {
            "--env-file" => args
                .next()
                .ok_or_else(|| "`--env-file` requires a path argument".to_string())?,
            s if s.starts_with("--env-file=") => s["--env-file=".len()..].to_string(),
            other => return Err(format!("unrecognised argument: {}", other)),
        };
        if path.is_empty() {
            return Err("`--env-file` requires a path argument".to_string());
        }
        if env_file.replace(PathBuf::from(path)).is_some() {
            return Err("`--env-file` provided more than once".to_string());
        }
    }

    match env_file {
        Some(path) => {
            if !path.is_file() {
                return Err(format!("env file not found: {}", path.display()));
            }
            load_env_file(&path)?;
            Ok(Some(EnvSource::Cli(path)))
        }
        None => {
            let default_path = PathBuf::from(".env");
            if default_path.is_file() {
                load_env_file(&default_path)?;
                Ok(Some(EnvSource::Default(default_path)))
            } else {
                Ok(None)
            }
        }
    }
}

fn main() {
    let env_source = match configure_env_from_cli() {
        Ok(source) => source,
        Err(err) => {
            eprintln!("fatal: {}", err);
            std::process::exit(1);
        }
    };

    // Init logging after environment so RUST_LOG from .env is respected.
    let default_filter = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_secs()
        .init();

    match &env_source {
        Some(EnvSource::Cli(path)) => info!("Environment loaded from CLI-specified file: {}", path.display()),
        Some(EnvSource::Default(path)) => info!("Environment loaded from default .env file: {}", path.display()),
        None => {}
    }

    info!(
        "hive-client {} (git {}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME_GIT_HASH")
    );
    if let Err(e) = run() {
        error!("fatal: {}", e);
        std::process::exit(1);
    }
}
