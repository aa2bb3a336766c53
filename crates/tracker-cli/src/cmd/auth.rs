use crate::output::print_json;
use anyhow::Context;
use chrono::Utc;
use clap::Subcommand;
use std::path::Path;
use tracker_core::credentials::Credentials;
use tracker_core::paths;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum AuthSubcommand {
    /// Store a session cookie copied from a logged-in browser
    Set {
        /// Full `Cookie` header value
        #[arg(long)]
        cookie: String,
    },

    /// Report whether a session cookie is stored and how old it is
    Status,

    /// Delete the stored session cookie
    Clear,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// `env_cookie` is the value of `--cookie` / `TRACKER_COOKIE`, reported by
/// `status` because it shadows the stored file.
pub fn run(
    home: &Path,
    subcmd: AuthSubcommand,
    env_cookie: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        AuthSubcommand::Set { cookie } => set(home, &cookie, json),
        AuthSubcommand::Status => status(home, env_cookie, json),
        AuthSubcommand::Clear => clear(home, json),
    }
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

fn set(home: &Path, cookie: &str, json: bool) -> anyhow::Result<()> {
    let creds = Credentials::new(cookie);
    if creds.cookie.is_empty() {
        anyhow::bail!("cookie must not be empty");
    }
    creds.save(home).context("failed to save credentials")?;

    let path = paths::credentials_path(home);
    if json {
        print_json(&serde_json::json!({
            "saved": true,
            "path": path.display().to_string(),
        }))?;
    } else {
        println!("Saved session cookie to {}.", path.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

fn status(home: &Path, env_cookie: Option<&str>, json: bool) -> anyhow::Result<()> {
    let stored = Credentials::load(home).context("failed to read credentials")?;
    let from_env = env_cookie.map(str::trim).is_some_and(|c| !c.is_empty());
    let age_hours = stored
        .as_ref()
        .map(|c| c.age(Utc::now()).num_hours());

    if json {
        let source = match (from_env, &stored) {
            (true, _) => "env",
            (false, Some(_)) => "file",
            (false, None) => "none",
        };
        return print_json(&serde_json::json!({
            "authenticated": source != "none",
            "source": source,
            "saved_at": stored.as_ref().map(|c| c.saved_at),
            "age_hours": age_hours,
        }));
    }

    if from_env {
        println!("Using cookie from --cookie / TRACKER_COOKIE.");
    }
    match (&stored, age_hours) {
        (Some(creds), Some(hours)) => println!(
            "Stored cookie saved {} ({hours}h ago).",
            creds.saved_at.format("%Y-%m-%d %H:%M UTC")
        ),
        _ if from_env => println!("No stored cookie."),
        _ => println!("Not authenticated. Run 'tracker auth set --cookie <cookie>'."),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

fn clear(home: &Path, json: bool) -> anyhow::Result<()> {
    let removed = Credentials::clear(home).context("failed to remove credentials")?;
    if json {
        print_json(&serde_json::json!({ "removed": removed }))?;
    } else if removed {
        println!("Session cookie removed.");
    } else {
        println!("No stored session cookie.");
    }
    Ok(())
}
