//! TUI rendering for legends types.
//!
//! Extension traits that add colored terminal rendering to legends-core
//! types using owo_colors.

use legends_core::overlay::Occupancy;
use legends_core::session::{EditState, PendingChanges};
use legends_core::slot::{DAYS, SlotKey, day_label};
use legends_core::{TimeRange, UserProfile};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for UserProfile {
    fn render(&self) -> String {
        format!("{} {} {}", self.emoji, self.name.bold(), format!("({})", self.id).dimmed())
    }
}

impl Render for EditState {
    fn render(&self) -> String {
        match self {
            EditState::Viewing => self.to_string().dimmed().to_string(),
            EditState::Editing => self.to_string().yellow().to_string(),
        }
    }
}

impl Render for TimeRange {
    fn render(&self) -> String {
        format!("{} {}", "●".green(), self)
    }
}

/// Threshold for compact view (show counts instead of individual slots)
const COMPACT_THRESHOLD: usize = 8;

impl Render for PendingChanges {
    fn render(&self) -> String {
        if self.is_empty() {
            return "   No unsaved changes".dimmed().to_string();
        }

        let mut lines = Vec::new();

        if self.added.len() + self.removed.len() > COMPACT_THRESHOLD {
            if !self.added.is_empty() {
                let label = format!("({} {} added)", self.added.len(), pluralize("slot", self.added.len()));
                lines.push(format!("   {} {}", "+".green(), label.green()));
            }
            if !self.removed.is_empty() {
                let label = format!("({} {} removed)", self.removed.len(), pluralize("slot", self.removed.len()));
                lines.push(format!("   {} {}", "-".red(), label.red()));
            }
        } else {
            for key in &self.added {
                lines.push(format!("   {} {}", "+".green(), key.label().green()));
            }
            for key in &self.removed {
                lines.push(format!("   {} {}", "-".red(), key.label().red()));
            }
        }

        lines.join("\n")
    }
}

/// Week grid: one row per slot in `[from_hour, to_hour)`, one column per day.
///
/// `■` marks the editing user's selection; digits show how many roster
/// members are free, darker where more overlap.
pub fn render_grid(
    selected: impl Fn(SlotKey) -> bool,
    occupancy: &Occupancy,
    from_hour: u8,
    to_hour: u8,
) -> String {
    let mut lines = Vec::new();

    let header: String = (0..DAYS).map(|d| format!("{:^5}", day_label(d))).collect();
    lines.push(format!("{:>6} {}", "", header.bold()));

    for slot in (from_hour * 2)..(to_hour * 2) {
        let mut row = String::new();
        let mut time = String::new();

        for day in 0..DAYS {
            let Ok(key) = SlotKey::new(day, slot) else {
                continue;
            };
            if time.is_empty() {
                time = key.start_time().format("%H:%M").to_string();
            }
            row.push_str(&render_cell(selected(key), occupancy.count(key)));
        }

        let time = format!("{:>6}", time);
        let time = if slot % 2 == 0 { time } else { time.dimmed().to_string() };
        lines.push(format!("{} {}", time, row));
    }

    lines.join("\n")
}

fn render_cell(selected: bool, count: usize) -> String {
    match (selected, count) {
        (false, 0) => format!("{:^5}", "·").dimmed().to_string(),
        (true, 0) => format!("{:^5}", "■").green().to_string(),
        (false, n) => shade(&format!("{:^5}", n), n),
        (true, n) => shade(&format!("{:^5}", format!("■{}", n)), n),
    }
}

/// Heavier styling for higher overlap.
fn shade(text: &str, count: usize) -> String {
    match legends_core::overlay::overlap_alpha(count) {
        a if a >= 1.0 => text.black().on_green().bold().to_string(),
        a if a >= 0.9 => text.black().on_bright_green().to_string(),
        _ => text.green().to_string(),
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
