//! Stage
//!
//! The stage owns every live `GameObject` and is what the frame driver
//! talks to: once per frame it runs every object's `update` dispatch,
//! flushes deferred despawns, then runs every object's `draw` dispatch.
//!
//! Object handles use the generational index pattern so a stale `ObjectId`
//! held across a despawn can never alias an object that reused the slot:
//! the generation increments on reuse, invalidating old handles.

use super::context::FrameCtx;
use super::object::GameObject;

/// A unique handle to a stage object.
///
/// Index addresses the slot, generation distinguishes reuses of it. Two
/// ids with the same index but different generations are different
/// objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl ObjectId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Container for all live objects plus their lifecycle bookkeeping.
pub struct Stage {
    /// Object slots; `None` marks a free slot.
    slots: Vec<Option<GameObject>>,
    /// Generation counter per slot, incremented when the slot is freed.
    generations: Vec<u32>,
    /// Free slots available for reuse (LIFO).
    free_indices: Vec<u32>,
    /// Objects queued for despawn at end of the update pass.
    /// Deferred so a module can despawn objects mid-iteration safely.
    despawn_queue: Vec<ObjectId>,
}

impl Stage {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_indices: Vec::new(),
            despawn_queue: Vec::new(),
        }
    }

    /// Add an object to the stage, returning its handle.
    pub fn spawn(&mut self, object: GameObject) -> ObjectId {
        if let Some(index) = self.free_indices.pop() {
            let idx = index as usize;
            self.slots[idx] = Some(object);
            ObjectId::new(index, self.generations[idx])
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Some(object));
            self.generations.push(0);
            ObjectId::new(index, 0)
        }
    }

    /// Queue an object for despawn at the end of the current update pass.
    pub fn despawn(&mut self, id: ObjectId) {
        if self.is_alive(id) {
            self.despawn_queue.push(id);
        }
    }

    /// Remove an object right now. Prefer `despawn` during a frame.
    /// Dropping the object drops its modules and any timed effects they
    /// own, which is what makes late callbacks benign no-ops.
    pub fn despawn_immediate(&mut self, id: ObjectId) {
        if !self.is_alive(id) {
            return;
        }
        let idx = id.index as usize;
        self.slots[idx] = None;
        self.generations[idx] += 1;
        self.free_indices.push(id.index);
    }

    /// Whether the handle still refers to a live object.
    pub fn is_alive(&self, id: ObjectId) -> bool {
        let idx = id.index as usize;
        idx < self.slots.len()
            && self.generations[idx] == id.generation
            && self.slots[idx].is_some()
    }

    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        if !self.is_alive(id) {
            return None;
        }
        self.slots[id.index as usize].as_ref()
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        if !self.is_alive(id) {
            return None;
        }
        self.slots[id.index as usize].as_mut()
    }

    /// Number of live objects.
    pub fn object_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Run one simulation step: every live object's update dispatch, then
    /// the deferred despawns.
    ///
    /// One object's modules misbehaving (no-op'ing, logging) never stops
    /// the remaining objects from receiving their frame.
    pub fn update(&mut self, ctx: &mut FrameCtx) {
        for slot in &mut self.slots {
            if let Some(object) = slot {
                object.dispatch_update(ctx);
            }
        }
        self.flush_despawns();
    }

    /// Run every live object's draw dispatch. Call after `update`.
    pub fn draw(&mut self, ctx: &FrameCtx) {
        for slot in &mut self.slots {
            if let Some(object) = slot {
                object.dispatch_draw(ctx);
            }
        }
    }

    fn flush_despawns(&mut self) {
        let queue = std::mem::take(&mut self.despawn_queue);
        for id in queue {
            self.despawn_immediate(id);
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::module::{Module, ModuleKey};
    use macroquad::prelude::vec2;
    use std::any::Any;

    struct Ticker {
        ticks: u32,
    }

    impl Module for Ticker {
        fn key(&self) -> ModuleKey {
            ModuleKey::Custom("ticker")
        }
        fn update(&mut self, _host: &mut GameObject, _ctx: &mut FrameCtx) {
            self.ticks += 1;
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_spawn_and_despawn() {
        let mut stage = Stage::new();
        let a = stage.spawn(GameObject::default());
        let b = stage.spawn(GameObject::default());
        assert_eq!(stage.object_count(), 2);

        stage.despawn_immediate(a);
        assert_eq!(stage.object_count(), 1);
        assert!(!stage.is_alive(a));
        assert!(stage.is_alive(b));
        assert!(stage.object(a).is_none());
    }

    #[test]
    fn test_generation_prevents_stale_handle_reuse() {
        let mut stage = Stage::new();
        let a = stage.spawn(GameObject::default());
        stage.despawn_immediate(a);

        let b = stage.spawn(GameObject::default());
        assert_eq!(b.index(), a.index()); // Same slot
        assert_ne!(b.generation(), a.generation());
        assert!(!stage.is_alive(a));
        assert!(stage.is_alive(b));
    }

    #[test]
    fn test_deferred_despawn_flushes_after_update() {
        let mut stage = Stage::new();
        let a = stage.spawn(GameObject::default());
        stage.despawn(a);
        assert!(stage.is_alive(a)); // Still alive until the flush

        let mut ctx = FrameCtx::new(0.016, 320.0, 240.0);
        stage.update(&mut ctx);
        assert!(!stage.is_alive(a));
    }

    #[test]
    fn test_update_reaches_every_object() {
        let mut stage = Stage::new();
        let mut ctx = FrameCtx::new(0.016, 320.0, 240.0);

        let mut ids = Vec::new();
        for _ in 0..3 {
            let mut obj = GameObject::new(vec2(0.0, 0.0), vec2(16.0, 16.0));
            obj.attach(Box::new(Ticker { ticks: 0 }), &mut ctx);
            ids.push(stage.spawn(obj));
        }

        stage.update(&mut ctx);
        stage.update(&mut ctx);

        for id in ids {
            let obj = stage.object(id).unwrap();
            assert_eq!(obj.module::<Ticker>().unwrap().ticks, 2);
        }
    }
}
