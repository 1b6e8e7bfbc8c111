//! Engine Foundation Module
//!
//! The simulation core: a per-object, per-frame module system driving
//! particle stores, the weather simulator, and sprite animation state
//! machines through a fixed update→draw pipeline.
//!
//! Key concepts:
//! - Module: a behavior unit with optional init/update/draw hooks
//! - GameObject: an entity with geometry that owns an ordered module set
//! - Stage: all live objects plus their lifecycle bookkeeping
//! - FrameCtx: dt, viewport and rng, passed explicitly to every hook
//!
//! Design philosophy:
//! - Single-threaded, cooperative frame stepping; nothing blocks a frame
//! - Configuration errors log and no-op; nothing here is fatal
//! - Timed effects (flash reverts, thunder cues) are owned by their
//!   module, so teardown cancels them for free

// Allow unused code - the engine surface is consumed by the authoring
// shell and hosted games, not only this demo binary
#![allow(dead_code)]

pub mod animation;
pub mod audio;
pub mod config;
pub mod context;
pub mod interp;
pub mod module;
pub mod object;
pub mod particles;
pub mod stage;
pub mod weather;

// Re-export main types
pub use animation::SpriteAnimator;
pub use audio::{SoundBank, SoundKey};
pub use config::EngineConfig;
pub use context::{FrameCtx, FrameRng};
pub use module::{Module, ModuleKey};
pub use object::GameObject;
pub use particles::{ParticleConfig, ParticleStore};
pub use stage::{ObjectId, Stage};
pub use weather::{Weather, WeatherKind, WeatherTuning};
