//! Application orchestration: state, event loop plumbing and input handling.

pub mod cards;
pub mod event;
pub mod handler;
pub mod host;
pub mod state;
