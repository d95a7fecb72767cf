use std::path::Path;

use anyhow::{Context, Result};
use legends_core::Planner;
use legends_core::external::{ExternalUser, SyncResult, match_external_users};
use legends_core::sync::RemoteUpdate;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn match_external(planner: &mut Planner, file: &Path, select: bool) -> Result<()> {
    let result = match read_external_users(file) {
        Ok(external) => match_external_users(planner.users(), &external),
        Err(e) => {
            tracing::error!("Failed to read external users: {:#}", e);
            SyncResult::failed("Failed to sync external users")
        }
    };

    if !result.success {
        println!("{}", result.error.unwrap_or_default().red());
        return Ok(());
    }

    if result.user_ids.is_empty() {
        println!("{}", "No known legends matched".dimmed());
        return Ok(());
    }

    for id in &result.user_ids {
        if let Some(profile) = planner.users().get(id.as_str()) {
            println!("{}", profile.render());
        }

        if select && id != planner.editing_user() && planner.add_to_roster(id.as_str())? {
            println!("   {}", "added to roster".green());
        }
    }

    Ok(())
}

fn read_external_users(file: &Path) -> Result<Vec<ExternalUser>> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let users = serde_json::from_str(&content)
        .with_context(|| format!("Invalid external user list in {}", file.display()))?;
    Ok(users)
}

pub fn apply(planner: &mut Planner, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let update: RemoteUpdate = serde_json::from_str(&content)
        .with_context(|| format!("Invalid remote update in {}", file.display()))?;

    let document = update.document();
    planner.apply_remote(update);

    println!("Applied remote update to {}", document.bold());
    Ok(())
}

pub fn outbox(planner: &mut Planner, keep: bool) -> Result<()> {
    let writes = if keep {
        planner.pending_writes().to_vec()
    } else {
        planner.drain_outbox()
    };

    // One JSON document per line for the replication channel to consume
    for write in &writes {
        println!("{}", serde_json::to_string(write)?);
    }

    Ok(())
}

pub fn dump(planner: &Planner) -> Result<()> {
    println!("{}", planner.snapshot().to_json()?);
    Ok(())
}
