//! Game module - session context and item transfers

mod state;

pub use state::{Game, TransferError, unix_now};
