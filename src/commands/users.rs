use anyhow::Result;
use dialoguer::Confirm;
use legends_core::Planner;
use owo_colors::OwoColorize;

use crate::render::{Render, pluralize};

pub fn run(planner: &Planner) -> Result<()> {
    for user in planner.users().iter() {
        let marker = if user.id == *planner.editing_user() {
            "✎".yellow().to_string()
        } else if planner.roster().contains(user.id.as_str()) {
            "✓".green().to_string()
        } else {
            " ".to_string()
        };

        let slots = planner
            .directory()
            .record(user.id.as_str())
            .map(|r| r.slot_count())
            .unwrap_or(0);
        let summary = if slots == 0 {
            "no availability".to_string()
        } else {
            format!("{} {} free", slots, pluralize("slot", slots))
        };

        println!("{} {} {}", marker, user.render(), summary.dimmed());
    }

    Ok(())
}

pub fn new_legend(planner: &mut Planner, name: &str) -> Result<()> {
    let profile = planner.create_legend(name)?;
    println!("Created {}", profile.render());
    Ok(())
}

/// Returns whether anything was removed.
pub fn remove(planner: &mut Planner, user: &str, force: bool) -> Result<bool> {
    let profile = planner.users().require(user)?.clone();

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove availability of {}?", profile))
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(false);
        }
    }

    match planner.remove_participant(user) {
        Some(record) => println!(
            "Removed {} ({} {})",
            profile.render(),
            record.ranges.len(),
            pluralize("range", record.ranges.len())
        ),
        None => println!("{}", format!("{} had no availability", profile).dimmed()),
    }

    Ok(true)
}
