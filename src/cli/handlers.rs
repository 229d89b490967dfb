use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{self, AppState};
use crate::config::Config;
use crate::error::{MisionalError, Result};
use crate::model::{AreaId, Ward};
use crate::store::{SqliteWardStore, WardStore};

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(p) => Config::load(p),
        None => Ok(Config::default()),
    }
}

fn open_store(config: &Config, db: Option<PathBuf>) -> Result<(SqliteWardStore, PathBuf)> {
    let path = db.unwrap_or_else(|| config.db_path.clone());
    let store = SqliteWardStore::open(&path)?;
    Ok((store, path))
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Runtime::new()?)
}

pub fn handle_init(config: Option<PathBuf>, db: Option<PathBuf>) -> Result<()> {
    let config = load_config(config.as_ref())?;
    let (store, path) = open_store(&config, db)?;

    runtime()?.block_on(store.initialize(&config.wards))?;

    println!(
        "Seeded {} wards in {}",
        config.wards.len(),
        path.display()
    );
    Ok(())
}

pub fn handle_serve(
    config: Option<PathBuf>,
    bind: Option<SocketAddr>,
    db: Option<PathBuf>,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config(config.as_ref())?;
    let addr = bind.unwrap_or(config.bind_addr);
    let (store, _path) = open_store(&config, db)?;

    runtime()?.block_on(async {
        store.initialize(&config.wards).await?;
        let state = AppState {
            store: Arc::new(store),
        };
        api::serve(addr, state).await
    })
}

pub fn handle_wards(config: Option<PathBuf>, db: Option<PathBuf>, json: bool) -> Result<()> {
    let config = load_config(config.as_ref())?;
    let (store, _path) = open_store(&config, db)?;

    let wards = runtime()?.block_on(async {
        store.initialize(&config.wards).await?;
        store.list().await
    })?;

    if json {
        let rows: Vec<serde_json::Value> = wards
            .iter()
            .map(|w| {
                serde_json::json!({
                    "id": w.id,
                    "name": w.name,
                    "goals": w.plan.goal_count(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for ward in &wards {
            println!(
                "{:<12} {:<24} {} goals",
                ward.id,
                ward.name,
                ward.plan.goal_count()
            );
        }
    }

    Ok(())
}

pub fn handle_show(
    config: Option<PathBuf>,
    id: Option<String>,
    db: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = load_config(config.as_ref())?;
    let (store, _path) = open_store(&config, db)?;

    let ward: Ward = runtime()?.block_on(async {
        store.initialize(&config.wards).await?;
        match id {
            Some(id) => store
                .find_by_id(&id)
                .await?
                .ok_or(MisionalError::WardNotFound(id)),
            None => {
                let passphrase = read_passphrase()?;
                store
                    .find_by_passphrase(passphrase.trim())
                    .await?
                    .ok_or(MisionalError::AuthenticationFailed)
            }
        }
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ward.plan)?);
        return Ok(());
    }

    println!("{} ({})", ward.name, ward.id);
    for area in AreaId::ALL {
        let record = ward.plan.area(area);
        println!(
            "\n{}: {:.0}% complete",
            record.title,
            record.completion_percent()
        );
        if record.items.is_empty() {
            println!("  (no goals yet)");
            continue;
        }
        for (idx, item) in record.items.iter().enumerate() {
            let mark = if item.is_completed { "x" } else { " " };
            if item.when.is_empty() {
                println!("  {}. [{}] {}", idx + 1, mark, item.what);
            } else {
                println!("  {}. [{}] {} ({})", idx + 1, mark, item.what, item.when);
            }
        }
    }

    Ok(())
}

fn read_passphrase() -> Result<String> {
    if atty::is(atty::Stream::Stdin) {
        print!("Passphrase: ");
        io::stdout().flush()?;
    }
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
