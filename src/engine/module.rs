//! Module Contract
//!
//! A module is a composable behavior unit attached to a host object:
//! particle store, weather simulator, sprite animator, physics, and so on.
//! Every module implements the same three-hook lifecycle:
//!
//! - `init` runs exactly once, at attachment, before any other hook
//! - `update` runs once per frame for every attached module
//! - `draw` runs once per frame after all `update`s complete
//!
//! Hooks default to no-ops so a module only overrides what it needs.
//! Sibling modules on the same host are reachable through the host's
//! keyed/typed lookup; a missing sibling is an absent capability the
//! caller handles with an early return, never an error.

use std::any::Any;

use super::context::FrameCtx;
use super::object::GameObject;

/// Fixed key identifying a module kind on its host.
///
/// One module per key per host; `Custom` covers game-specific modules
/// (platformer physics, AI, ...) that follow the same contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKey {
    Particles,
    Weather,
    Animation,
    Custom(&'static str),
}

/// The three-hook lifecycle every module implements.
///
/// During a hook call the module's own slot on the host is vacant, so
/// `host` exposes every *sibling* module; looking up your own key yields
/// `None`, which callers treat like any other absent capability.
pub trait Module: Any {
    /// Which slot this module occupies on its host.
    fn key(&self) -> ModuleKey;

    /// Priority modules update and draw before non-priority ones within
    /// the same frame (attachment order is kept within each class).
    fn priority(&self) -> bool {
        false
    }

    /// Runs once at attachment, before any `update`/`draw`.
    fn init(&mut self, host: &mut GameObject, ctx: &mut FrameCtx) {
        let _ = (host, ctx);
    }

    /// Per-frame simulation step.
    fn update(&mut self, host: &mut GameObject, ctx: &mut FrameCtx) {
        let _ = (host, ctx);
    }

    /// Per-frame render step, after every module's `update`.
    fn draw(&self, host: &GameObject, ctx: &FrameCtx) {
        let _ = (host, ctx);
    }

    /// Downcast support for typed sibling lookup.
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
