//! Core of the peerview client: scoped state, lenses and the global event bus.
//!
//! The screen tree is built from independent scopes. Each scope owns a slice
//! of state embedded in its parent through a [`lens::Lens`], reacts to inputs,
//! and talks to unrelated parts of the tree only through the
//! [`bus::EventBus`].
//!
//! Structure:
//! - `events`: the closed catalog of cross-tree notifications
//! - `bus`: the broadcast channel carrying them
//! - `lens` / `reducer`: state embedding and the reducer fold
//! - `merge`: source fan-in with a fixed tie-break
//! - `scope` / `runtime`: the component contract and its event loop
//! - `backend`: read-only collaborator feeds
//! - `effects` / `view`: what scopes hand back to the host

pub mod backend;
pub mod bus;
pub mod config;
pub mod effects;
pub mod events;
pub mod ids;
pub mod lens;
pub mod merge;
pub mod reducer;
pub mod runtime;
pub mod scope;
pub mod tab;
pub mod view;
