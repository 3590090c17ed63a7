//! Save/load system
//!
//! Handles session saving and loading.

pub mod save_game;

pub use save_game::{
    SaveData, SaveSummary, SAVE_VERSION,
    save_game, load_game, delete_save, read_save, write_save,
    save_exists, list_saves, save_path, save_directory,
};
