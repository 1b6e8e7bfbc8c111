//! Sprite Animation State Machine
//!
//! Frame-indexed playback over a sprite sheet: rows map to animations,
//! columns to frames. Playback is frame-rate independent — the frame
//! timer accumulates `speed * dt` and carries its fractional remainder,
//! so a slow frame advances multiple frames instead of stalling.
//!
//! Unknown animation names and out-of-range frame requests are
//! configuration errors: logged (or ignored) and resolved to a no-op,
//! never propagated. A sheet texture that has not finished loading just
//! skips the draw for that frame and retries on the next one.

use std::collections::HashMap;

use macroquad::prelude::{draw_texture_ex, warn, Color, DrawTextureParams, Rect, Texture2D};
use serde::{Deserialize, Serialize};

use super::context::FrameCtx;
use super::module::{Module, ModuleKey};
use super::object::GameObject;

/// A named animation: a sheet row, its frame count, and an optional
/// playback speed that overrides the animator's current speed on `play`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationDef {
    pub row: u32,
    pub frame_count: u32,
    /// Frames per second; `None` keeps whatever speed is already set.
    pub fps: Option<f32>,
}

/// Timed overlay override from `flash`, reverting to the prior overlay.
#[derive(Debug, Clone, Copy)]
struct Flash {
    timer: f32,
    /// Overlay to restore when the flash ends.
    prev: Option<(Color, f32)>,
}

/// Sprite sheet playback module.
pub struct SpriteAnimator {
    /// Sheet texture; `None` until the async load lands.
    sheet: Option<Texture2D>,
    frame_w: f32,
    frame_h: f32,
    animations: HashMap<String, AnimationDef>,

    current: Option<String>,
    current_frame: u32,
    /// Fractional frame accumulator.
    frame_timer: f32,
    playing: bool,
    looping: bool,
    finished: bool,
    /// Frames per second.
    speed: f32,

    pub rotation: f32,
    pub flip_x: bool,
    pub flip_y: bool,
    pub alpha: f32,
    /// Flat color overlay composited over the frame: (color, strength).
    overlay: Option<(Color, f32)>,
    flash: Option<Flash>,
}

impl SpriteAnimator {
    pub fn new(frame_w: f32, frame_h: f32) -> Self {
        Self {
            sheet: None,
            frame_w,
            frame_h,
            animations: HashMap::new(),
            current: None,
            current_frame: 0,
            frame_timer: 0.0,
            playing: false,
            looping: false,
            finished: false,
            speed: 10.0,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
            alpha: 1.0,
            overlay: None,
            flash: None,
        }
    }

    /// Hand the animator its (asynchronously loaded) sheet texture.
    pub fn set_sheet(&mut self, texture: Texture2D) {
        self.sheet = Some(texture);
    }

    pub fn has_sheet(&self) -> bool {
        self.sheet.is_some()
    }

    /// Register or overwrite an animation. Current playback is untouched,
    /// even when overwriting the active name.
    pub fn add_animation(&mut self, name: &str, row: u32, frame_count: u32, fps: Option<f32>) {
        self.animations.insert(
            name.to_string(),
            AnimationDef {
                row,
                frame_count: frame_count.max(1),
                fps,
            },
        );
    }

    /// Start playing a named animation.
    ///
    /// Re-requesting the animation that is already playing is a no-op (no
    /// restart). An unregistered name is logged and ignored.
    pub fn play(&mut self, name: &str, looping: bool) {
        if self.playing && self.current.as_deref() == Some(name) {
            return;
        }
        let Some(def) = self.animations.get(name) else {
            warn!("play: unknown animation '{}'", name);
            return;
        };
        if let Some(fps) = def.fps {
            self.speed = fps;
        }
        self.current = Some(name.to_string());
        self.current_frame = 0;
        self.frame_timer = 0.0;
        self.playing = true;
        self.looping = looping;
        self.finished = false;
    }

    /// Pause playback; the frame position is kept.
    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Resume a stopped animation from where it paused.
    pub fn resume(&mut self) {
        if self.current.is_some() && !self.finished {
            self.playing = true;
        }
    }

    /// Jump to a frame. Requests outside `[0, frame_count)` are ignored.
    pub fn set_frame(&mut self, frame: u32) {
        let Some(def) = self.current_def() else {
            return;
        };
        if frame < def.frame_count {
            self.current_frame = frame;
            self.frame_timer = 0.0;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn current_animation(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, fps: f32) {
        self.speed = fps;
    }

    /// Set the flat color overlay (tint pass over the frame).
    pub fn set_overlay(&mut self, color: Color, strength: f32) {
        self.overlay = Some((color, strength.clamp(0.0, 1.0)));
    }

    pub fn clear_overlay(&mut self) {
        self.overlay = None;
    }

    /// Temporarily override the overlay for `duration` seconds, then
    /// revert to whatever overlay (or none) was set before. Fire and
    /// forget; torn-down modules take the pending revert with them.
    pub fn flash(&mut self, color: Color, duration: f32, strength: f32) {
        // A flash over a flash keeps the original revert target
        let prev = match self.flash {
            Some(f) => f.prev,
            None => self.overlay,
        };
        self.flash = Some(Flash {
            timer: duration,
            prev,
        });
        self.overlay = Some((color, strength.clamp(0.0, 1.0)));
    }

    fn current_def(&self) -> Option<&AnimationDef> {
        self.current.as_deref().and_then(|n| self.animations.get(n))
    }

    /// Advance playback by one frame's worth of time.
    pub fn step(&mut self, dt: f32) {
        // Flash revert runs even while playback is stopped
        if let Some(flash) = &mut self.flash {
            flash.timer -= dt;
            if flash.timer <= 0.0 {
                self.overlay = flash.prev;
                self.flash = None;
            }
        }

        if !self.playing {
            return;
        }
        let Some(def) = self.current_def() else {
            return;
        };
        let frame_count = def.frame_count;

        self.frame_timer += self.speed * dt;
        if self.frame_timer < 1.0 {
            return;
        }
        let advance = self.frame_timer.floor();
        self.frame_timer -= advance;
        self.current_frame += advance as u32;

        if self.current_frame >= frame_count {
            if self.looping {
                self.current_frame %= frame_count;
            } else {
                self.current_frame = frame_count - 1;
                self.playing = false;
                self.finished = true;
            }
        }
    }
}

impl Module for SpriteAnimator {
    fn key(&self) -> ModuleKey {
        ModuleKey::Animation
    }

    fn update(&mut self, _host: &mut GameObject, ctx: &mut FrameCtx) {
        self.step(ctx.dt);
    }

    fn draw(&self, host: &GameObject, _ctx: &FrameCtx) {
        // Sheet still loading, or nothing ever played: skip this frame
        let Some(sheet) = &self.sheet else {
            return;
        };
        let Some(def) = self.current_def() else {
            return;
        };

        let source = Rect::new(
            self.current_frame as f32 * self.frame_w,
            def.row as f32 * self.frame_h,
            self.frame_w,
            self.frame_h,
        );
        let params = DrawTextureParams {
            dest_size: Some(host.size),
            source: Some(source),
            rotation: self.rotation,
            flip_x: self.flip_x,
            flip_y: self.flip_y,
            pivot: None,
        };

        draw_texture_ex(
            sheet,
            host.pos.x,
            host.pos.y,
            Color::new(1.0, 1.0, 1.0, self.alpha),
            params.clone(),
        );

        // Overlay pass: the same frame tinted flat, scaled by strength.
        // The sprite's own alpha still masks the overlay.
        if let Some((color, strength)) = self.overlay {
            if strength > 0.0 {
                draw_texture_ex(
                    sheet,
                    host.pos.x,
                    host.pos.y,
                    Color::new(color.r, color.g, color.b, self.alpha * strength),
                    params,
                );
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
