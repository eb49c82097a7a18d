pub mod bot;
pub mod config;
pub mod csv;
pub mod ladder;
pub mod model;
pub mod store;

pub use ladder::{Command, Ladder, LadderHandle, Ledger, Outcome};
pub use model::{MatchRecord, MatchResult, PlayerId, PlayerRecord, Standing};
pub use store::JsonStore;
