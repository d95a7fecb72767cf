pub mod edit;
pub mod grid;
pub mod roster;
pub mod status;
pub mod sync;
pub mod users;
