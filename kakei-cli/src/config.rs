use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_kakei_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    /// REST root of the hosted store, e.g. https://xyz.example.co/rest/v1
    pub base_url: String,
    pub api_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreSection {
                base_url: "http://localhost:54321/rest/v1".to_string(),
                api_key: String::new(),
            },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_kakei_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}
