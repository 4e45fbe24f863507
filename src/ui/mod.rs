//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the controller's card transforms and the page position
//! and turns them into cells on the terminal.  No input handling happens here.

pub mod cards;
pub mod layout;
pub mod page;
pub mod theme;
