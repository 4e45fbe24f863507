//! Headless card-stack controller.
//!
//! Nothing in this module depends on a terminal or rendering crate.  The
//! host supplies a [`host::Clock`], a [`host::Viewport`] and a
//! [`host::Renderer`]; [`stack::CardStack`] does the rest.

pub mod error;
pub mod gate;
pub mod host;
pub mod input;
pub mod progress;
pub mod stack;
pub mod transform;

#[cfg(test)]
pub mod testing;
