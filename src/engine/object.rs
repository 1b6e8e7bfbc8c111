//! Host Objects
//!
//! A `GameObject` is an entity with position and size that owns an ordered
//! set of modules. The object dispatches the per-frame hooks: all `update`s
//! first, then all `draw`s, priority-flagged modules ahead of the rest in
//! both passes.
//!
//! Dispatch vacates the running module's slot for the duration of its hook
//! so the hook can borrow the host (and through it every sibling) mutably.
//! A vacated or detached slot reads as `None` from the lookup helpers.

use macroquad::prelude::{vec2, Vec2};

use super::context::FrameCtx;
use super::module::{Module, ModuleKey};

/// An entity with geometry and an ordered set of modules.
pub struct GameObject {
    /// Top-left position in world/screen space.
    pub pos: Vec2,
    /// Width/height of the host's bounds.
    pub size: Vec2,
    /// Module slots in attachment order. `None` marks a detached slot or
    /// the module currently running its hook.
    slots: Vec<Option<Box<dyn Module>>>,
}

impl GameObject {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            slots: Vec::new(),
        }
    }

    /// Center of the host bounds (sprite draws pivot here).
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Attach a module and run its `init` hook immediately.
    ///
    /// `init` observes the host with the new module's own slot vacant,
    /// the same view every later hook gets.
    pub fn attach(&mut self, mut module: Box<dyn Module>, ctx: &mut FrameCtx) {
        module.init(self, ctx);
        self.slots.push(Some(module));
    }

    /// Detach the module with the given key, returning it if present.
    /// The slot stays vacant; attachment order of the rest is unchanged.
    pub fn detach(&mut self, key: ModuleKey) -> Option<Box<dyn Module>> {
        self.slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|m| m.key() == key))
            .and_then(|slot| slot.take())
    }

    /// Whether a module with the given key is attached (and not mid-hook).
    pub fn has_module(&self, key: ModuleKey) -> bool {
        self.iter().any(|m| m.key() == key)
    }

    /// Look up a module by key.
    pub fn module_by_key(&self, key: ModuleKey) -> Option<&dyn Module> {
        self.iter().find(|m| m.key() == key)
    }

    /// Typed sibling lookup. Returns `None` when the module is absent,
    /// detached, or currently running its own hook.
    pub fn module<M: Module>(&self) -> Option<&M> {
        self.iter().find_map(|m| m.as_any().downcast_ref::<M>())
    }

    /// Typed mutable sibling lookup.
    pub fn module_mut<M: Module>(&mut self) -> Option<&mut M> {
        self.slots
            .iter_mut()
            .flatten()
            .find_map(|m| m.as_any_mut().downcast_mut::<M>())
    }

    /// Attached modules in attachment order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Module> {
        self.slots.iter().flatten().map(|m| m.as_ref())
    }

    /// Number of attached modules.
    pub fn module_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Run every module's `update` for this frame.
    /// Priority pass first, then the rest, attachment order within each.
    pub fn dispatch_update(&mut self, ctx: &mut FrameCtx) {
        // Snapshot the count: a hook may attach new modules, growing the
        // vec. Modules attached mid-frame start updating next frame.
        let count = self.slots.len();
        for priority_pass in [true, false] {
            for i in 0..count {
                let matches = self.slots[i]
                    .as_ref()
                    .is_some_and(|m| m.priority() == priority_pass);
                if !matches {
                    continue;
                }
                if let Some(mut module) = self.slots[i].take() {
                    module.update(self, ctx);
                    self.slots[i] = Some(module);
                }
            }
        }
    }

    /// Run every module's `draw` for this frame, same ordering rule as
    /// `dispatch_update`.
    pub fn dispatch_draw(&mut self, ctx: &FrameCtx) {
        let count = self.slots.len();
        for priority_pass in [true, false] {
            for i in 0..count {
                let matches = self.slots[i]
                    .as_ref()
                    .is_some_and(|m| m.priority() == priority_pass);
                if !matches {
                    continue;
                }
                if let Some(module) = self.slots[i].take() {
                    module.draw(self, ctx);
                    self.slots[i] = Some(module);
                }
            }
        }
    }
}

impl Default for GameObject {
    fn default() -> Self {
        Self::new(vec2(0.0, 0.0), vec2(32.0, 32.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    /// Records hook calls into a shared trace for ordering assertions.
    struct Probe {
        name: &'static str,
        priority: bool,
        init_calls: u32,
        trace: std::rc::Rc<std::cell::RefCell<Vec<&'static str>>>,
    }

    impl Module for Probe {
        fn key(&self) -> ModuleKey {
            ModuleKey::Custom(self.name)
        }
        fn priority(&self) -> bool {
            self.priority
        }
        fn init(&mut self, _host: &mut GameObject, _ctx: &mut FrameCtx) {
            self.init_calls += 1;
        }
        fn update(&mut self, _host: &mut GameObject, _ctx: &mut FrameCtx) {
            self.trace.borrow_mut().push(self.name);
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn probe(
        name: &'static str,
        priority: bool,
        trace: &std::rc::Rc<std::cell::RefCell<Vec<&'static str>>>,
    ) -> Box<Probe> {
        Box::new(Probe {
            name,
            priority,
            init_calls: 0,
            trace: trace.clone(),
        })
    }

    #[test]
    fn test_priority_modules_update_first() {
        let trace = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut ctx = FrameCtx::new(0.016, 320.0, 240.0);
        let mut obj = GameObject::default();

        obj.attach(probe("a", false, &trace), &mut ctx);
        obj.attach(probe("phys", true, &trace), &mut ctx);
        obj.attach(probe("b", false, &trace), &mut ctx);

        obj.dispatch_update(&mut ctx);
        assert_eq!(*trace.borrow(), vec!["phys", "a", "b"]);
    }

    #[test]
    fn test_init_runs_exactly_once_before_update() {
        let trace = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut ctx = FrameCtx::new(0.016, 320.0, 240.0);
        let mut obj = GameObject::default();

        obj.attach(probe("m", false, &trace), &mut ctx);
        obj.dispatch_update(&mut ctx);
        obj.dispatch_update(&mut ctx);

        let m = obj.module::<Probe>().unwrap();
        assert_eq!(m.init_calls, 1);
        assert_eq!(trace.borrow().len(), 2);
    }

    #[test]
    fn test_missing_sibling_is_absent_not_fatal() {
        let obj = GameObject::default();
        assert!(obj.module::<Probe>().is_none());
        assert!(!obj.has_module(ModuleKey::Custom("phys")));
        assert!(obj.module_by_key(ModuleKey::Weather).is_none());
    }

    #[test]
    fn test_detach_leaves_others_in_order() {
        let trace = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut ctx = FrameCtx::new(0.016, 320.0, 240.0);
        let mut obj = GameObject::default();

        obj.attach(probe("a", false, &trace), &mut ctx);
        obj.attach(probe("b", false, &trace), &mut ctx);
        obj.attach(probe("c", false, &trace), &mut ctx);

        let removed = obj.detach(ModuleKey::Custom("b"));
        assert!(removed.is_some());
        assert_eq!(obj.module_count(), 2);

        obj.dispatch_update(&mut ctx);
        assert_eq!(*trace.borrow(), vec!["a", "c"]);
    }

    /// A module that reads a sibling during its own update.
    struct Reader {
        saw_sibling: bool,
        saw_self: bool,
    }

    impl Module for Reader {
        fn key(&self) -> ModuleKey {
            ModuleKey::Custom("reader")
        }
        fn update(&mut self, host: &mut GameObject, _ctx: &mut FrameCtx) {
            self.saw_sibling = host.module::<Probe>().is_some();
            // Own slot is vacant while this hook runs
            self.saw_self = host.module::<Reader>().is_some();
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_sibling_lookup_during_update() {
        let trace = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut ctx = FrameCtx::new(0.016, 320.0, 240.0);
        let mut obj = GameObject::default();

        obj.attach(probe("phys", false, &trace), &mut ctx);
        obj.attach(
            Box::new(Reader {
                saw_sibling: false,
                saw_self: true,
            }),
            &mut ctx,
        );

        obj.dispatch_update(&mut ctx);
        let reader = obj.module::<Reader>().unwrap();
        assert!(reader.saw_sibling);
        assert!(!reader.saw_self);
    }
}
