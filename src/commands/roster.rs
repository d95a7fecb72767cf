use anyhow::Result;
use legends_core::Planner;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn add(planner: &mut Planner, users: &[String]) -> Result<()> {
    for user in users {
        if planner.add_to_roster(user)? {
            println!("{} {}", "+".green(), user);
        } else {
            println!("{}", format!("{} is already on the roster", user).dimmed());
        }
    }
    Ok(())
}

pub fn remove(planner: &mut Planner, users: &[String]) -> Result<()> {
    for user in users {
        if planner.remove_from_roster(user) {
            println!("{} {}", "-".red(), user);
        } else {
            println!("{}", format!("{} is not on the roster", user).dimmed());
        }
    }
    Ok(())
}

pub fn toggle(planner: &mut Planner, user: &str) -> Result<()> {
    if planner.toggle_roster(user)? {
        println!("{} {}", "+".green(), user);
    } else {
        println!("{} {}", "-".red(), user);
    }
    Ok(())
}

pub fn list(planner: &Planner) -> Result<()> {
    if planner.roster().is_empty() {
        println!("{}", "Roster is empty".dimmed());
        return Ok(());
    }

    for id in planner.roster() {
        match planner.users().get(id.as_str()) {
            Some(profile) => println!("{}", profile.render()),
            None => println!("{}", id),
        }
        for range in planner.directory().get(id.as_str()) {
            println!("   {}", range.render());
        }
    }

    Ok(())
}
