use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};

use crate::state::ensure_kakei_home;

/// Owner identity as issued by the external identity provider.
/// Without it every mutation fails the auth precondition.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthState {
    pub owner_id: Option<String>,
}

fn auth_path() -> Result<std::path::PathBuf> {
    Ok(ensure_kakei_home()?.join("auth.json"))
}

pub fn load_auth() -> Result<AuthState> {
    let p = auth_path()?;
    if !p.exists() {
        return Ok(AuthState::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s)?)
}

pub fn save_auth(auth: &AuthState) -> Result<()> {
    let p = auth_path()?;
    let s = serde_json::to_string_pretty(auth)?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn login() -> Result<()> {
    let mut auth = load_auth()?;
    let owner = prompt("Paste your owner id (from the identity provider)")?;
    if owner.is_empty() {
        bail!("owner id cannot be empty");
    }
    auth.owner_id = Some(owner);
    save_auth(&auth)?;
    println!("Saved owner identity to ~/.kakei/auth.json");
    Ok(())
}

pub fn show() -> Result<()> {
    let auth = load_auth()?;
    match auth.owner_id {
        Some(owner) => println!("Owner: {owner}"),
        None => println!("Not logged in. Run: kakei auth login"),
    }
    Ok(())
}
