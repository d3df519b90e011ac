//! Terminal front end: owns the saved state, file reading and rendering.

pub mod alloc;
pub mod export;
pub mod funds;
pub mod import;
pub mod plan;
pub mod setup;
pub mod ui;
