//! Particle Store
//!
//! A bounded collection of short-lived particles with position/velocity
//! integration and visual decay (size, alpha, optional color fade), driven
//! once per frame through the module contract. Emission happens either
//! explicitly (`emit`/`emit_burst`) or automatically at a configured rate
//! through a fractional accumulator, which keeps the long-run rate
//! frame-rate independent.
//!
//! The store owns its particles exclusively; the cap is a hard invariant
//! and emission at capacity is an expected no-op, not an error.

use macroquad::prelude::{draw_circle, draw_rectangle, Color, Vec2};
use serde::{Deserialize, Serialize};

use super::context::{FrameCtx, FrameRng};
use super::interp::{lerp, lerp_color};
use super::module::{Module, ModuleKey};
use super::object::GameObject;

/// How a particle is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleShape {
    Circle,
    Rect,
}

/// A single live particle. Owned by the store that spawned it.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in seconds; monotonically decreasing.
    pub life: f32,
    /// Total lifetime, for interpolation.
    pub total_life: f32,
    pub size_start: f32,
    pub size_end: f32,
    pub size: f32,
    pub alpha_start: f32,
    pub alpha_end: f32,
    pub alpha: f32,
    pub color_start: Color,
    /// Color stays constant unless an end color was configured.
    pub color_end: Option<Color>,
    pub color: Color,
    pub gravity: f32,
    pub friction: f32,
    pub shape: ParticleShape,
}

/// Design-time particle template (stored in assets, RON/serde friendly).
///
/// Per-emit overrides fall back to the store's defaults via struct-update
/// syntax: `ParticleConfig { speed: 80.0, ..store.defaults() }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// Lifetime in seconds.
    pub life: f32,
    /// Base speed (pixels per second).
    pub speed: f32,
    /// Symmetric speed randomization half-window.
    pub speed_variation: f32,
    /// Base direction in radians (0 = +x, pi/2 = down the screen).
    pub direction: f32,
    /// Symmetric direction randomization half-window.
    pub direction_variation: f32,
    pub size: f32,
    pub size_end: f32,
    pub alpha: f32,
    pub alpha_end: f32,
    /// RGBA 0-1.
    pub color: [f32; 4],
    /// When absent, particle color never fades.
    pub color_end: Option<[f32; 4]>,
    /// Downward acceleration (pixels/s^2).
    pub gravity: f32,
    /// Per-second velocity retention (1.0 = none lost).
    pub friction: f32,
    pub shape: ParticleShape,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            life: 1.0,
            speed: 60.0,
            speed_variation: 20.0,
            direction: -std::f32::consts::FRAC_PI_2,
            direction_variation: std::f32::consts::FRAC_PI_4,
            size: 4.0,
            size_end: 0.0,
            alpha: 1.0,
            alpha_end: 0.0,
            color: [1.0, 1.0, 1.0, 1.0],
            color_end: None,
            gravity: 0.0,
            friction: 1.0,
            shape: ParticleShape::Circle,
        }
    }
}

/// Common effect presets.
impl ParticleConfig {
    /// Torch/camp fire: rises, orange fading to deep red.
    pub fn fire() -> Self {
        Self {
            life: 0.8,
            speed: 50.0,
            speed_variation: 20.0,
            direction: -std::f32::consts::FRAC_PI_2,
            direction_variation: 0.3,
            size: 6.0,
            size_end: 1.0,
            alpha: 0.9,
            alpha_end: 0.0,
            color: [1.0, 0.78, 0.2, 1.0],
            color_end: Some([0.78, 0.2, 0.0, 1.0]),
            gravity: -40.0,
            friction: 0.96,
            shape: ParticleShape::Circle,
        }
    }

    /// Impact sparks: fast, short-lived, yellow-white.
    pub fn sparks() -> Self {
        Self {
            life: 0.3,
            speed: 300.0,
            speed_variation: 150.0,
            direction: -std::f32::consts::FRAC_PI_2,
            direction_variation: std::f32::consts::PI,
            size: 2.0,
            size_end: 0.5,
            alpha: 1.0,
            alpha_end: 0.2,
            color: [1.0, 1.0, 0.78, 1.0],
            color_end: Some([1.0, 0.59, 0.0, 1.0]),
            gravity: 200.0,
            friction: 0.92,
            shape: ParticleShape::Rect,
        }
    }

    /// Floating dust motes: slow, gray, drifts upward a little.
    pub fn dust() -> Self {
        Self {
            life: 1.5,
            speed: 30.0,
            speed_variation: 20.0,
            direction: -std::f32::consts::FRAC_PI_2,
            direction_variation: std::f32::consts::PI,
            size: 3.0,
            size_end: 1.0,
            alpha: 0.5,
            alpha_end: 0.0,
            color: [0.59, 0.55, 0.51, 1.0],
            color_end: Some([0.31, 0.29, 0.27, 1.0]),
            gravity: -8.0,
            friction: 0.98,
            shape: ParticleShape::Circle,
        }
    }

    /// One-shot snow puff (landing impacts, footsteps).
    pub fn snowburst() -> Self {
        Self {
            life: 0.6,
            speed: 70.0,
            speed_variation: 30.0,
            direction: -std::f32::consts::FRAC_PI_2,
            direction_variation: 1.2,
            size: 3.0,
            size_end: 0.0,
            alpha: 0.9,
            alpha_end: 0.0,
            color: [0.94, 0.96, 1.0, 1.0],
            color_end: None,
            gravity: 120.0,
            friction: 0.95,
            shape: ParticleShape::Circle,
        }
    }
}

fn color_of(c: [f32; 4]) -> Color {
    Color::new(c[0], c[1], c[2], c[3])
}

/// Bounded particle collection driven by the module lifecycle.
pub struct ParticleStore {
    particles: Vec<Particle>,
    max_particles: usize,
    /// Automatic emissions per second.
    pub emission_rate: f32,
    /// When false, only explicit `emit`/`emit_burst` calls spawn.
    pub auto_emit: bool,
    defaults: ParticleConfig,
    /// Fractional-emission accumulator for the automatic rate.
    emit_accumulator: f32,
    /// Emission origin relative to the host center.
    pub emit_offset: Vec2,
}

impl ParticleStore {
    pub fn new(defaults: ParticleConfig, max_particles: usize) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles),
            max_particles,
            emission_rate: 10.0,
            auto_emit: false,
            defaults,
            emit_accumulator: 0.0,
            emit_offset: Vec2::ZERO,
        }
    }

    /// Copy of the default template, for struct-update overrides.
    pub fn defaults(&self) -> ParticleConfig {
        self.defaults.clone()
    }

    pub fn set_defaults(&mut self, defaults: ParticleConfig) {
        self.defaults = defaults;
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Spawn one particle at `origin` from the given template.
    ///
    /// Speed and direction are each randomized by their symmetric
    /// variation window; velocity is the polar projection of the result.
    /// Returns `None` when the store is at capacity (expected steady
    /// state, not an error).
    pub fn emit_with(
        &mut self,
        cfg: &ParticleConfig,
        origin: Vec2,
        rng: &mut FrameRng,
    ) -> Option<()> {
        if self.particles.len() >= self.max_particles {
            return None;
        }

        let speed = cfg.speed + (rng.next() - 0.5) * 2.0 * cfg.speed_variation;
        let direction = cfg.direction + (rng.next() - 0.5) * 2.0 * cfg.direction_variation;
        let vel = Vec2::new(direction.cos() * speed, direction.sin() * speed);

        let color = color_of(cfg.color);
        self.particles.push(Particle {
            pos: origin,
            vel,
            life: cfg.life,
            total_life: cfg.life,
            size_start: cfg.size,
            size_end: cfg.size_end,
            size: cfg.size,
            alpha_start: cfg.alpha,
            alpha_end: cfg.alpha_end,
            alpha: cfg.alpha,
            color_start: color,
            color_end: cfg.color_end.map(color_of),
            color,
            gravity: cfg.gravity,
            friction: cfg.friction,
            shape: cfg.shape,
        });
        Some(())
    }

    /// Spawn one particle from the store defaults.
    pub fn emit(&mut self, origin: Vec2, rng: &mut FrameRng) -> Option<()> {
        let cfg = self.defaults.clone();
        self.emit_with(&cfg, origin, rng)
    }

    /// Spawn up to `count` particles. Partial success at the cap:
    /// returns how many were actually spawned.
    pub fn emit_burst(
        &mut self,
        cfg: &ParticleConfig,
        origin: Vec2,
        count: usize,
        rng: &mut FrameRng,
    ) -> usize {
        let mut spawned = 0;
        for _ in 0..count {
            if self.emit_with(cfg, origin, rng).is_none() {
                break;
            }
            spawned += 1;
        }
        spawned
    }

    /// Drop every particle immediately.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Advance lifetimes, integrate motion, recompute decay visuals.
    /// Particles are gone the same frame their life reaches zero.
    pub fn step(&mut self, dt: f32) {
        self.particles.retain_mut(|p| {
            p.life -= dt;
            if p.life <= 0.0 {
                return false;
            }

            // friction is per-second retention; fold dt in
            let decay = p.friction.powf(dt);
            p.vel *= decay;
            p.vel.y += p.gravity * dt;
            p.pos += p.vel * dt;

            let elapsed = 1.0 - p.life / p.total_life;
            p.size = lerp(p.size_start, p.size_end, elapsed);
            p.alpha = lerp(p.alpha_start, p.alpha_end, elapsed);
            if let Some(end) = p.color_end {
                p.color = lerp_color(p.color_start, end, elapsed);
            }
            true
        });
    }

    /// Run the automatic-emission accumulator for one frame.
    /// While the accumulator exceeds one emission interval, spawn one and
    /// subtract the interval; the dt clamp bounds the catch-up burst.
    pub fn auto_emit_step(&mut self, origin: Vec2, dt: f32, rng: &mut FrameRng) {
        if !self.auto_emit || self.emission_rate <= 0.0 {
            return;
        }
        let interval = 1.0 / self.emission_rate;
        self.emit_accumulator += dt;
        while self.emit_accumulator >= interval {
            self.emit_accumulator -= interval;
            if self.emit(origin, rng).is_none() {
                break;
            }
        }
        // Capacity-blocked emissions are deferred, not queued: drop any
        // banked intervals so a full stretch never bursts out later
        self.emit_accumulator = self.emit_accumulator.min(interval);
    }
}

impl Module for ParticleStore {
    fn key(&self) -> ModuleKey {
        ModuleKey::Particles
    }

    fn update(&mut self, host: &mut GameObject, ctx: &mut FrameCtx) {
        let origin = host.center() + self.emit_offset;
        self.auto_emit_step(origin, ctx.dt, &mut ctx.rng);
        self.step(ctx.dt);
    }

    fn draw(&self, _host: &GameObject, _ctx: &FrameCtx) {
        for p in &self.particles {
            // Alpha rides in the per-call color, so no draw state leaks
            let color = Color::new(p.color.r, p.color.g, p.color.b, p.color.a * p.alpha);
            match p.shape {
                ParticleShape::Circle => {
                    draw_circle(p.pos.x, p.pos.y, p.size * 0.5, color);
                }
                ParticleShape::Rect => {
                    draw_rectangle(
                        p.pos.x - p.size * 0.5,
                        p.pos.y - p.size * 0.5,
                        p.size,
                        p.size,
                        color,
                    );
                }
            }
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
