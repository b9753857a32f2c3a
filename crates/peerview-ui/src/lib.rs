//! Screen tree of the peerview client.
//!
//! Each screen is a feature slice:
//! - `intent.rs`: inputs + current state to a named action
//! - `model.rs`: state, lenses and reducers
//! - `navigation.rs`: actions to navigation effects
//! - `view.rs`: state to a view tree
//! - `mod.rs`: the [`Scope`](peerview_core::scope::Scope) wiring them together
//!
//! [`app::App`] is the composition root.

pub mod app;
pub mod screens;
