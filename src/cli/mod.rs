//! CLI commands for foodbot.
//!
//! - **Read commands**: show, eatings
//! - **Write commands**: mark (set, default, forget), migrate

pub mod eatings;
pub mod mark;
pub mod migrate;
pub mod show;

pub use eatings::EatingsCommand;
pub use mark::{Mark, MarkCommand};
pub use migrate::MigrateCommand;
pub use show::ShowCommand;
