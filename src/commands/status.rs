use anyhow::Result;
use legends_core::Planner;
use owo_colors::OwoColorize;

use crate::render::{Render, pluralize};

pub fn run(planner: &Planner) -> Result<()> {
    let session = planner.session();
    let profile = planner.users().require(session.user_id().as_str())?;

    println!("{} [{}]", profile.render(), session.state().render());
    println!("{}", session.pending().render());

    println!();
    if planner.roster().is_empty() {
        println!("{}", "Roster is empty".dimmed());
    } else {
        let names: Vec<String> = planner
            .roster()
            .iter()
            .map(|id| match planner.users().get(id.as_str()) {
                Some(u) => u.to_string(),
                None => id.to_string(),
            })
            .collect();
        println!("Roster: {}", names.join(", "));
    }

    let pending = planner.pending_writes().len();
    if pending > 0 {
        println!(
            "{}",
            format!("{} {} waiting to sync", pending, pluralize("write", pending)).dimmed()
        );
    }

    Ok(())
}
