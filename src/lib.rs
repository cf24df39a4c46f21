//! mergeconflict: open issues drift across the terminal and the player
//! shoots them down with commit SHAs.

pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod game;
pub mod geometry;
pub mod highscores;
pub mod hud;
pub mod session;
pub mod source;

pub use error::{Error, Result};
