use anyhow::Result;
use dialoguer::Confirm;
use legends_core::{Planner, SlotKey};
use owo_colors::OwoColorize;

use crate::render::{Render, pluralize};

pub fn run(planner: &mut Planner, user: Option<&str>) -> Result<()> {
    if let Some(user) = user {
        if planner.session().is_dirty() {
            println!(
                "{}",
                format!("Discarding unsaved edits of {}", planner.editing_user()).yellow()
            );
        }
        planner.switch_user(user)?;
    }

    planner.begin_edit();

    let profile = planner.users().require(planner.editing_user().as_str())?;
    println!("Editing as {}", profile.render());
    Ok(())
}

pub fn toggle(planner: &mut Planner, keys: &[String]) -> Result<()> {
    if !planner.session().is_editing() {
        anyhow::bail!(
            "Not in edit mode.\n\n\
            Start editing with:\n  \
            legends edit"
        );
    }

    // Reject the whole batch before touching the selection
    let keys = keys
        .iter()
        .map(|k| SlotKey::decode(k))
        .collect::<Result<Vec<_>, _>>()?;

    for key in keys {
        if planner.toggle_slot(key) {
            println!("{} {}", "+".green(), key.label().green());
        } else {
            println!("{} {}", "-".red(), key.label().red());
        }
    }

    Ok(())
}

/// Returns whether anything was committed.
pub fn save(planner: &mut Planner) -> Result<bool> {
    let Some(commit) = planner.save() else {
        println!("{}", "Not in edit mode, nothing to save".dimmed());
        return Ok(false);
    };

    let slots: usize = commit.ranges.iter().map(|r| r.len()).sum();
    println!(
        "Saved {} {} in {} {}",
        slots,
        pluralize("slot", slots),
        commit.ranges.len(),
        pluralize("range", commit.ranges.len())
    );
    for range in &commit.ranges {
        println!("   {}", range.render());
    }

    Ok(true)
}

/// Returns whether anything was reset.
pub fn reset(planner: &mut Planner, force: bool) -> Result<bool> {
    let pending = planner.session().pending();

    if pending.is_empty() {
        println!("{}", "Nothing to reset".dimmed());
        return Ok(false);
    }

    println!("{}", pending.render());

    if !force {
        println!();
        let total = pending.added.len() + pending.removed.len();
        let confirmed = Confirm::new()
            .with_prompt(format!("Discard {} {}?", total, pluralize("change", total)))
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(false);
        }
    }

    planner.reset();
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn toggle_with_malformed_key_changes_nothing() {
        let mut planner = Planner::demo().unwrap();
        planner.begin_edit();

        assert!(toggle(&mut planner, &keys(&["1-1", "1-2", "bogus"])).is_err());
        assert!(planner.session().working().is_empty());

        toggle(&mut planner, &keys(&["1-1", "1-2"])).unwrap();
        assert_eq!(planner.session().working().len(), 2);
    }

    #[test]
    fn toggle_requires_edit_mode() {
        let mut planner = Planner::demo().unwrap();
        assert!(toggle(&mut planner, &keys(&["1-1"])).is_err());
    }

    #[test]
    fn save_outside_edit_mode_reports_no_change() {
        let mut planner = Planner::demo().unwrap();
        assert!(!save(&mut planner).unwrap());

        planner.begin_edit();
        toggle(&mut planner, &keys(&["1-1"])).unwrap();
        assert!(save(&mut planner).unwrap());
        assert_eq!(planner.pending_writes().len(), 1);
    }
}
