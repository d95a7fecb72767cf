//! Core availability model for legends.
//!
//! - [`slot`] and [`range`]: the weekly half-hour grid and the codec between
//!   slot sets and contiguous ranges
//! - [`session`]: the edit/save/reset workflow of the editing user
//! - [`directory`] and [`overlay`]: committed availability per user and the
//!   occupancy overlay across a roster
//! - [`planner`]: the context object tying these together for a UI

pub mod config;
pub mod directory;
pub mod error;
pub mod external;
pub mod overlay;
pub mod planner;
pub mod range;
pub mod roster;
pub mod session;
pub mod slot;
pub mod store;
pub mod sync;
pub mod users;

pub use directory::{AvailabilityDirectory, AvailabilityRecord};
pub use error::{LegendsError, LegendsResult};
pub use planner::Planner;
pub use range::{TimeRange, compress, expand};
pub use slot::SlotKey;
pub use users::{UserDirectory, UserId, UserProfile};
