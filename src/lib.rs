//! Tank artillery duel: game logic, independent of any terminal or window.
//!
//! The binary in `main.rs` owns the loop, the input thread and the terminal
//! canvas; everything here is plain state plus the functions that move it
//! forward one event or one tick at a time.

pub mod compute;
pub mod config;
pub mod entities;
pub mod highscore;
pub mod input;
pub mod projectile;
pub mod render;
pub mod tank;
pub mod terrain;
pub mod turn;
