use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use reps_core::Clock;
use server::AppContext;
use services::{RecorderService, SeedCatalog};
use storage::repository::Storage;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidBind { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidBind { raw } => write!(f, "invalid --bind value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    db_url: String,
    bind: SocketAddr,
    seed_path: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--bind <addr>] [--seed <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db   sqlite:reps.sqlite3");
    eprintln!("  --bind 127.0.0.1:8080");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  REPS_DB_URL, REPS_BIND, REPS_SEED_PATH, RUST_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("REPS_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://reps.sqlite3".into(), normalize_sqlite_url);
        let mut bind: SocketAddr = std::env::var("REPS_BIND")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));
        let mut seed_path = std::env::var("REPS_SEED_PATH").ok();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--bind" => {
                    let value = require_value(args, "--bind")?;
                    bind = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidBind { raw: value.clone() })?;
                }
                "--seed" => {
                    seed_path = Some(require_value(args, "--seed")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            bind,
            seed_path,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn load_catalog(seed_path: Option<&str>) -> SeedCatalog {
    let Some(path) = seed_path else {
        tracing::warn!("no seed file configured; daily plans use the fallback item");
        return SeedCatalog::default();
    };
    match std::fs::read_to_string(path).map_err(|e| e.to_string()).and_then(|raw| {
        SeedCatalog::from_json(&raw).map_err(|e| e.to_string())
    }) {
        Ok(catalog) if !catalog.is_empty() => catalog,
        Ok(_) => {
            tracing::warn!(path, "seed file has no items; daily plans use the fallback item");
            SeedCatalog::default()
        }
        Err(error) => {
            tracing::warn!(path, %error, "failed to load seed file; daily plans use the fallback item");
            SeedCatalog::default()
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;

    let recorder = RecorderService::new(
        Clock::default_clock(),
        Arc::clone(&storage.profiles),
        Arc::clone(&storage.sessions),
        Arc::clone(&storage.attempts),
    );
    let catalog = load_catalog(parsed.seed_path.as_deref());

    let ctx = Arc::new(AppContext::new(recorder, catalog));
    server::serve(ctx, parsed.bind).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
