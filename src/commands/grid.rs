use anyhow::Result;
use legends_core::{Planner, SlotKey};
use owo_colors::OwoColorize;

use crate::render::{Render, render_grid};

pub fn run(planner: &Planner, from: u8, to: u8) -> Result<()> {
    if from >= to || to > 24 {
        anyhow::bail!("Invalid hour range {}..{}: expected 0 <= from < to <= 24", from, to);
    }

    let session = planner.session();
    let occupancy = planner.occupancy();

    println!(
        "{}",
        render_grid(|key| session.is_selected(key), &occupancy, from, to)
    );

    if !planner.roster().is_empty() {
        println!();
        println!(
            "{}",
            format!(
                "Overlay of {} legends, up to {} free at once",
                planner.roster().len(),
                occupancy.max()
            )
            .dimmed()
        );
    }

    Ok(())
}

pub fn free(planner: &Planner, key: &str) -> Result<()> {
    let key = SlotKey::decode(key)?;
    let free = planner.who_is_free(key);

    println!("{}", key.label().bold());

    if free.is_empty() {
        println!("   {}", "Nobody on the roster is free".dimmed());
        return Ok(());
    }

    for id in free {
        match planner.users().get(id.as_str()) {
            Some(profile) => println!("   {}", profile.render()),
            None => println!("   {}", id),
        }
    }

    Ok(())
}
