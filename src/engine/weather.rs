//! Weather Simulator
//!
//! One module owning several specialized particle populations (rain, snow,
//! fog, dust, wind streaks), a cross-fade transition between weather
//! states, a day/night tint clock, and storm lightning with delayed
//! thunder cues.
//!
//! Switching weather changes the active kind immediately while intensity
//! fades linearly over the transition; the old population drains as its
//! members expire or leave the viewport instead of popping out, and the
//! new one ramps up by a configurable fraction of its shortfall per frame.

use macroquad::prelude::{
    draw_circle, draw_circle_lines, draw_line, draw_rectangle, Color, Vec2, WHITE,
};
use serde::{Deserialize, Serialize};

use super::audio::{SoundBank, SoundKey};
use super::context::{FrameCtx, FrameRng};
use super::interp::{lerp, lerp_color};
use super::module::{Module, ModuleKey};
use super::object::GameObject;

/// The weather states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherKind {
    Clear,
    Rain,
    Storm,
    Snow,
    Fog,
    Dust,
    Windy,
}

impl WeatherKind {
    /// Ambient sound slot for this weather, if any.
    fn ambient_sound(self) -> Option<SoundKey> {
        match self {
            WeatherKind::Rain | WeatherKind::Storm => Some(SoundKey::Rain),
            WeatherKind::Snow | WeatherKind::Windy => Some(SoundKey::Wind),
            WeatherKind::Fog => Some(SoundKey::Fog),
            WeatherKind::Clear | WeatherKind::Dust => None,
        }
    }
}

/// Tunable smoothing/density parameters (RON-overridable; unlisted
/// fields keep their defaults).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherTuning {
    /// Fraction of the population shortfall topped up per frame.
    /// A smoothing parameter, not a contract.
    pub catch_up_rate: f32,
    pub max_raindrops: usize,
    pub max_snowflakes: usize,
    pub max_fog_banks: usize,
    pub max_dust_motes: usize,
    pub max_wind_streaks: usize,
    /// Per-frame lightning probability at full intensity.
    pub lightning_chance: f32,
    /// Full-screen flash length in seconds.
    pub flash_duration: f32,
    pub thunder_delay_min: f32,
    pub thunder_delay_max: f32,
    /// Wall-clock seconds for a full 24 h cycle.
    pub day_length_secs: f32,
    pub sunrise_hour: f32,
    pub sunset_hour: f32,
    /// Length of the sunrise/sunset ramps, in hours.
    pub ramp_hours: f32,
}

impl Default for WeatherTuning {
    fn default() -> Self {
        Self {
            catch_up_rate: 0.08,
            max_raindrops: 220,
            max_snowflakes: 150,
            max_fog_banks: 12,
            max_dust_motes: 90,
            max_wind_streaks: 40,
            lightning_chance: 0.02,
            flash_duration: 0.12,
            thunder_delay_min: 0.4,
            thunder_delay_max: 2.5,
            day_length_secs: 120.0,
            sunrise_hour: 6.0,
            sunset_hour: 18.0,
            ramp_hours: 2.0,
        }
    }
}

/// Timed linear intensity fade. `timer <= 0` means settled on `target`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transition {
    pub from: f32,
    pub target: f32,
    pub timer: f32,
    pub duration: f32,
}

/// A delayed one-shot thunder cue, owned by the module.
/// Dropping the module drops the cue, which is the cancellation story.
#[derive(Debug, Clone, Copy)]
struct ThunderCue {
    remaining: f32,
    volume: f32,
}

const SPLASH_DURATION: f32 = 0.25;
const SPLASH_MAX_RADIUS: f32 = 6.0;

#[derive(Debug, Clone, Copy)]
enum DropState {
    Falling,
    /// Ground contact: expanding, fading ring for a fixed duration.
    Splash { timer: f32 },
}

#[derive(Debug, Clone, Copy)]
struct Raindrop {
    pos: Vec2,
    vel: Vec2,
    state: DropState,
}

#[derive(Debug, Clone, Copy)]
struct Snowflake {
    pos: Vec2,
    fall_speed: f32,
    drift_phase: f32,
    drift_speed: f32,
    size: f32,
}

#[derive(Debug, Clone, Copy)]
struct FogBank {
    pos: Vec2,
    speed: f32,
    radius: f32,
    alpha: f32,
}

#[derive(Debug, Clone, Copy)]
struct DustMote {
    pos: Vec2,
    vel: Vec2,
    phase: f32,
    size: f32,
}

#[derive(Debug, Clone, Copy)]
struct WindStreak {
    pos: Vec2,
    speed: f32,
    len: f32,
}

/// The weather module.
pub struct Weather {
    kind: WeatherKind,
    intensity: f32,
    transition: Transition,
    tuning: WeatherTuning,

    /// Hours in [0, 24), wrapping.
    time_of_day: f32,
    night_tint: Color,
    day_tint: Color,

    raindrops: Vec<Raindrop>,
    snowflakes: Vec<Snowflake>,
    fog_banks: Vec<FogBank>,
    dust_motes: Vec<DustMote>,
    wind_streaks: Vec<WindStreak>,

    /// Remaining full-screen lightning flash time.
    flash_timer: f32,
    pending_thunder: Vec<ThunderCue>,

    pub sounds: SoundBank,
}

impl Weather {
    pub fn new(tuning: WeatherTuning) -> Self {
        Self {
            kind: WeatherKind::Clear,
            intensity: 0.0,
            transition: Transition::default(),
            tuning,
            time_of_day: 12.0,
            night_tint: Color::new(0.04, 0.05, 0.15, 0.55),
            day_tint: Color::new(0.0, 0.0, 0.0, 0.0),
            raindrops: Vec::new(),
            snowflakes: Vec::new(),
            fog_banks: Vec::new(),
            dust_motes: Vec::new(),
            wind_streaks: Vec::new(),
            flash_timer: 0.0,
            pending_thunder: Vec::new(),
            sounds: SoundBank::new(),
        }
    }

    pub fn kind(&self) -> WeatherKind {
        self.kind
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    pub fn tuning(&self) -> &WeatherTuning {
        &self.tuning
    }

    pub fn time_of_day(&self) -> f32 {
        self.time_of_day
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_timer > 0.0
    }

    /// Request a weather state. A request for the kind and intensity the
    /// simulator already has (or is already fading toward) is a no-op:
    /// no transition reset, no ambient restart.
    ///
    /// Otherwise the kind switches immediately — so population update
    /// rules change concurrently with the fade — and intensity fades
    /// linearly from its current value over `transition_secs`.
    pub fn set_weather(&mut self, kind: WeatherKind, intensity: f32, transition_secs: f32) {
        let intensity = intensity.clamp(0.0, 1.0);
        if kind == self.kind && intensity == self.transition.target {
            return;
        }

        self.transition = Transition {
            from: self.intensity,
            target: intensity,
            timer: transition_secs.max(0.0),
            duration: transition_secs.max(0.0),
        };
        if self.transition.duration <= 0.0 {
            self.intensity = intensity;
        }
        self.kind = kind;
        self.sounds.set_ambient(kind.ambient_sound(), self.intensity);
    }

    /// Jump the clock to an hour value, wrapped into [0, 24).
    pub fn set_time(&mut self, hours: f32) {
        self.time_of_day = hours.rem_euclid(24.0);
    }

    /// Load a sound into a slot (async; playback no-ops until it lands).
    pub async fn load_sound(&mut self, key: SoundKey, path: &str) -> Result<(), String> {
        self.sounds.load(key, path).await
    }

    /// Day factor in [0,1]: 0 at night, ramping 0→1 after sunrise,
    /// 1 through the day, ramping 1→0 after sunset.
    pub fn day_factor(&self) -> f32 {
        let t = self.time_of_day;
        let sunrise = self.tuning.sunrise_hour;
        let sunset = self.tuning.sunset_hour;
        let ramp = self.tuning.ramp_hours;
        if t < sunrise {
            0.0
        } else if t < sunrise + ramp {
            (t - sunrise) / ramp
        } else if t < sunset {
            1.0
        } else if t < sunset + ramp {
            1.0 - (t - sunset) / ramp
        } else {
            0.0
        }
    }

    /// Current day/night tint overlay color.
    pub fn tint(&self) -> Color {
        lerp_color(self.night_tint, self.day_tint, self.day_factor())
    }

    /// One simulation step. Public so hosts outside the module runtime
    /// (and tests) can drive the simulator directly.
    pub fn step(&mut self, dt: f32, view_w: f32, view_h: f32, rng: &mut FrameRng) {
        // Clock
        self.time_of_day =
            (self.time_of_day + 24.0 * dt / self.tuning.day_length_secs).rem_euclid(24.0);

        // Intensity fade
        if self.transition.timer > 0.0 {
            self.transition.timer -= dt;
            if self.transition.timer <= 0.0 {
                self.transition.timer = 0.0;
                self.intensity = self.transition.target;
            } else {
                let progress = 1.0 - self.transition.timer / self.transition.duration;
                self.intensity = lerp(self.transition.from, self.transition.target, progress);
            }
        }
        self.sounds.set_ambient_volume(self.intensity);

        // Lightning (storm only), then the flash countdown
        if self.kind == WeatherKind::Storm
            && self.flash_timer <= 0.0
            && rng.chance(self.tuning.lightning_chance * self.intensity)
        {
            self.flash_timer = self.tuning.flash_duration;
            self.pending_thunder.push(ThunderCue {
                remaining: rng.range(self.tuning.thunder_delay_min, self.tuning.thunder_delay_max),
                volume: rng.range(0.4, 1.0),
            });
        }
        if self.flash_timer > 0.0 {
            self.flash_timer -= dt;
        }

        // Delayed thunder cues; firing against an unloaded sound is a no-op
        let sounds = &self.sounds;
        self.pending_thunder.retain_mut(|cue| {
            cue.remaining -= dt;
            if cue.remaining <= 0.0 {
                sounds.play_once(SoundKey::Thunder, cue.volume);
                false
            } else {
                true
            }
        });

        // Populations: the active kind ramps toward its intensity-scaled
        // cap, every other population drains naturally.
        let rain_active = matches!(self.kind, WeatherKind::Rain | WeatherKind::Storm);
        self.update_rain(dt, view_w, view_h, rng, rain_active);
        self.update_snow(dt, view_w, view_h, rng, self.kind == WeatherKind::Snow);
        self.update_fog(dt, view_w, view_h, rng, self.kind == WeatherKind::Fog);
        self.update_dust(dt, view_w, view_h, rng, self.kind == WeatherKind::Dust);
        self.update_wind(dt, view_w, view_h, rng, self.kind == WeatherKind::Windy);
    }

    /// Soft cap for an active population at current intensity.
    fn cap(&self, max: usize, active: bool) -> usize {
        if active {
            (self.intensity * max as f32) as usize
        } else {
            0
        }
    }

    /// Members to spawn this frame: a fraction of the shortfall, so the
    /// population ramps up instead of popping.
    fn top_up_count(&self, len: usize, cap: usize) -> usize {
        if len >= cap {
            return 0;
        }
        (((cap - len) as f32) * self.tuning.catch_up_rate).ceil() as usize
    }

    fn update_rain(&mut self, dt: f32, view_w: f32, view_h: f32, rng: &mut FrameRng, active: bool) {
        let ground = view_h;
        self.raindrops.retain_mut(|drop| match drop.state {
            DropState::Falling => {
                drop.pos += drop.vel * dt;
                if drop.pos.x < -60.0 || drop.pos.x > view_w + 60.0 {
                    return false;
                }
                if drop.pos.y >= ground {
                    drop.pos.y = ground;
                    drop.state = DropState::Splash {
                        timer: SPLASH_DURATION,
                    };
                }
                true
            }
            DropState::Splash { ref mut timer } => {
                *timer -= dt;
                *timer > 0.0
            }
        });

        let falling = self
            .raindrops
            .iter()
            .filter(|d| matches!(d.state, DropState::Falling))
            .count();
        let cap = self.cap(self.tuning.max_raindrops, active);
        for _ in 0..self.top_up_count(falling, cap) {
            self.raindrops.push(Raindrop {
                pos: Vec2::new(rng.range(-40.0, view_w + 40.0), rng.range(-view_h * 0.25, -4.0)),
                vel: Vec2::new(rng.range(-90.0, -40.0), rng.range(520.0, 760.0)),
                state: DropState::Falling,
            });
        }
    }

    fn update_snow(&mut self, dt: f32, view_w: f32, view_h: f32, rng: &mut FrameRng, active: bool) {
        let cap = self.cap(self.tuning.max_snowflakes, active);
        let len = self.snowflakes.len();
        self.snowflakes.retain_mut(|flake| {
            flake.drift_phase += flake.drift_speed * dt;
            flake.pos.x += flake.drift_phase.sin() * 18.0 * dt;
            flake.pos.y += flake.fall_speed * dt;
            if flake.pos.y > view_h + 4.0 {
                if len <= cap {
                    // Recycle to the top while the population is wanted
                    flake.pos.y = -4.0;
                    flake.pos.x = rng.range(0.0, view_w);
                    true
                } else {
                    false
                }
            } else {
                true
            }
        });

        let len = self.snowflakes.len();
        for _ in 0..self.top_up_count(len, cap) {
            self.snowflakes.push(Snowflake {
                pos: Vec2::new(rng.range(0.0, view_w), rng.range(-view_h * 0.2, -2.0)),
                fall_speed: rng.range(35.0, 85.0),
                drift_phase: rng.range(0.0, std::f32::consts::TAU),
                drift_speed: rng.range(0.8, 2.2),
                size: rng.range(1.5, 3.5),
            });
        }
    }

    fn update_fog(&mut self, dt: f32, view_w: f32, view_h: f32, rng: &mut FrameRng, active: bool) {
        let cap = self.cap(self.tuning.max_fog_banks, active);
        let len = self.fog_banks.len();
        self.fog_banks.retain_mut(|bank| {
            bank.pos.x += bank.speed * dt;
            if bank.pos.x - bank.radius > view_w {
                if len <= cap {
                    bank.pos.x = -bank.radius;
                    bank.pos.y = rng.range(view_h * 0.3, view_h);
                    true
                } else {
                    false
                }
            } else {
                true
            }
        });

        let len = self.fog_banks.len();
        for _ in 0..self.top_up_count(len, cap) {
            self.fog_banks.push(FogBank {
                pos: Vec2::new(rng.range(-100.0, view_w), rng.range(view_h * 0.3, view_h)),
                speed: rng.range(8.0, 26.0),
                radius: rng.range(80.0, 190.0),
                alpha: rng.range(0.05, 0.14),
            });
        }
    }

    fn update_dust(&mut self, dt: f32, view_w: f32, view_h: f32, rng: &mut FrameRng, active: bool) {
        let cap = self.cap(self.tuning.max_dust_motes, active);
        let len = self.dust_motes.len();
        self.dust_motes.retain_mut(|mote| {
            mote.phase += 2.0 * dt;
            mote.pos.x += (mote.vel.x + mote.phase.sin() * 12.0) * dt;
            mote.pos.y += mote.vel.y * dt;
            let out = mote.pos.x < -10.0
                || mote.pos.x > view_w + 10.0
                || mote.pos.y < -10.0
                || mote.pos.y > view_h + 10.0;
            if out {
                if len <= cap {
                    mote.pos = Vec2::new(rng.range(0.0, view_w), rng.range(0.0, view_h));
                    true
                } else {
                    false
                }
            } else {
                true
            }
        });

        let len = self.dust_motes.len();
        for _ in 0..self.top_up_count(len, cap) {
            self.dust_motes.push(DustMote {
                pos: Vec2::new(rng.range(0.0, view_w), rng.range(0.0, view_h)),
                vel: Vec2::new(rng.range(20.0, 70.0), rng.range(-14.0, 6.0)),
                phase: rng.range(0.0, std::f32::consts::TAU),
                size: rng.range(1.0, 2.5),
            });
        }
    }

    fn update_wind(&mut self, dt: f32, view_w: f32, view_h: f32, rng: &mut FrameRng, active: bool) {
        let cap = self.cap(self.tuning.max_wind_streaks, active);
        let len = self.wind_streaks.len();
        self.wind_streaks.retain_mut(|streak| {
            streak.pos.x += streak.speed * dt;
            if streak.pos.x - streak.len > view_w {
                if len <= cap {
                    streak.pos.x = -streak.len;
                    streak.pos.y = rng.range(0.0, view_h);
                    true
                } else {
                    false
                }
            } else {
                true
            }
        });

        let len = self.wind_streaks.len();
        for _ in 0..self.top_up_count(len, cap) {
            self.wind_streaks.push(WindStreak {
                pos: Vec2::new(rng.range(-80.0, view_w * 0.5), rng.range(0.0, view_h)),
                speed: rng.range(320.0, 620.0),
                len: rng.range(30.0, 90.0),
            });
        }
    }

    // Population sizes, mostly for tests and debug overlays
    pub fn raindrop_count(&self) -> usize {
        self.raindrops.len()
    }
    pub fn snowflake_count(&self) -> usize {
        self.snowflakes.len()
    }
    pub fn fog_bank_count(&self) -> usize {
        self.fog_banks.len()
    }
    pub fn dust_mote_count(&self) -> usize {
        self.dust_motes.len()
    }
    pub fn wind_streak_count(&self) -> usize {
        self.wind_streaks.len()
    }
    pub fn pending_thunder_count(&self) -> usize {
        self.pending_thunder.len()
    }

    fn draw_populations(&self, _view_w: f32, _view_h: f32) {
        let rain_color = Color::new(0.62, 0.71, 0.9, 0.55);
        for drop in &self.raindrops {
            match drop.state {
                DropState::Falling => {
                    let tail = drop.pos - drop.vel * 0.02;
                    draw_line(drop.pos.x, drop.pos.y, tail.x, tail.y, 1.0, rain_color);
                }
                DropState::Splash { timer } => {
                    let t = 1.0 - timer / SPLASH_DURATION;
                    let radius = SPLASH_MAX_RADIUS * t;
                    let alpha = 0.5 * (1.0 - t);
                    draw_circle_lines(
                        drop.pos.x,
                        drop.pos.y,
                        radius,
                        1.0,
                        Color::new(0.62, 0.71, 0.9, alpha),
                    );
                }
            }
        }

        for flake in &self.snowflakes {
            draw_circle(
                flake.pos.x,
                flake.pos.y,
                flake.size,
                Color::new(0.94, 0.96, 1.0, 0.85),
            );
        }

        for bank in &self.fog_banks {
            draw_circle(
                bank.pos.x,
                bank.pos.y,
                bank.radius,
                Color::new(0.75, 0.77, 0.8, bank.alpha),
            );
        }

        for mote in &self.dust_motes {
            draw_circle(
                mote.pos.x,
                mote.pos.y,
                mote.size,
                Color::new(0.76, 0.65, 0.45, 0.5),
            );
        }

        for streak in &self.wind_streaks {
            draw_line(
                streak.pos.x,
                streak.pos.y,
                streak.pos.x - streak.len,
                streak.pos.y,
                1.0,
                Color::new(0.85, 0.88, 0.9, 0.25),
            );
        }
    }
}

impl Module for Weather {
    fn key(&self) -> ModuleKey {
        ModuleKey::Weather
    }

    fn update(&mut self, _host: &mut GameObject, ctx: &mut FrameCtx) {
        self.step(ctx.dt, ctx.view_w, ctx.view_h, &mut ctx.rng);
    }

    /// Draw order: day/night tint, lightning flash, then the populations.
    /// Alpha rides in each call's color, so nothing leaks between draws.
    fn draw(&self, _host: &GameObject, ctx: &FrameCtx) {
        let tint = self.tint();
        if tint.a > 0.0 {
            draw_rectangle(0.0, 0.0, ctx.view_w, ctx.view_h, tint);
        }

        if self.flash_timer > 0.0 {
            let alpha = 0.55 * (self.flash_timer / self.tuning.flash_duration);
            draw_rectangle(
                0.0,
                0.0,
                ctx.view_w,
                ctx.view_h,
                Color::new(WHITE.r, WHITE.g, WHITE.b, alpha),
            );
        }

        self.draw_populations(ctx.view_w, ctx.view_h);
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f32 = 320.0;
    const H: f32 = 240.0;

    fn weather() -> Weather {
        Weather::new(WeatherTuning::default())
    }

    #[test]
    fn test_transition_midpoint_and_settle() {
        let mut w = weather();
        let mut rng = FrameRng::new(1);
        w.set_weather(WeatherKind::Rain, 1.0, 2.0);

        // 1 second in: timer = 1, halfway through the fade
        w.step(1.0, W, H, &mut rng);
        assert!((w.intensity() - 0.5).abs() < 1e-5);
        assert!((w.transition().timer - 1.0).abs() < 1e-5);

        // Past the end: snaps exactly to target
        w.step(1.5, W, H, &mut rng);
        assert_eq!(w.intensity(), 1.0);
        assert_eq!(w.transition().timer, 0.0);
    }

    #[test]
    fn test_set_weather_idempotent() {
        let mut w = weather();
        let mut rng = FrameRng::new(1);
        w.set_weather(WeatherKind::Snow, 0.8, 3.0);
        w.step(1.0, W, H, &mut rng);
        let before = w.transition();

        // Identical request mid-fade: no transition reset
        w.set_weather(WeatherKind::Snow, 0.8, 3.0);
        let after = w.transition();
        assert_eq!(before.timer, after.timer);
        assert_eq!(before.from, after.from);
        assert_eq!(w.sounds.ambient(), Some(SoundKey::Wind));
    }

    #[test]
    fn test_kind_switches_immediately_with_fade() {
        let mut w = weather();
        w.set_weather(WeatherKind::Fog, 1.0, 5.0);
        assert_eq!(w.kind(), WeatherKind::Fog);
        assert_eq!(w.intensity(), 0.0); // Fade has not started yet
        assert_eq!(w.sounds.ambient(), Some(SoundKey::Fog));
    }

    #[test]
    fn test_instant_transition() {
        let mut w = weather();
        w.set_weather(WeatherKind::Dust, 0.6, 0.0);
        assert_eq!(w.intensity(), 0.6);
        assert_eq!(w.sounds.ambient(), None);
    }

    #[test]
    fn test_population_ramps_without_popping() {
        let mut w = weather();
        let mut rng = FrameRng::new(3);
        w.set_weather(WeatherKind::Rain, 1.0, 0.0);

        w.step(1.0 / 60.0, W, H, &mut rng);
        let first = w.raindrop_count();
        let cap = w.tuning().max_raindrops;
        let expected = ((cap as f32) * w.tuning().catch_up_rate).ceil() as usize;
        assert_eq!(first, expected);
        assert!(first < cap);

        // Keep stepping: the falling population grows toward the cap and
        // never overshoots it (splash remnants ride on top, bounded by
        // the splash lifetime)
        for _ in 0..600 {
            w.step(1.0 / 60.0, W, H, &mut rng);
            assert!(w.raindrop_count() <= cap * 2);
        }
        assert!(w.raindrop_count() > cap / 2);
    }

    #[test]
    fn test_inactive_population_drains() {
        let mut w = weather();
        let mut rng = FrameRng::new(5);
        w.set_weather(WeatherKind::Windy, 1.0, 0.0);
        for _ in 0..120 {
            w.step(1.0 / 30.0, W, H, &mut rng);
        }
        assert!(w.wind_streak_count() > 0);

        // Switch away: streaks blow off-screen and are not replaced
        w.set_weather(WeatherKind::Clear, 0.0, 0.0);
        for _ in 0..600 {
            w.step(1.0 / 30.0, W, H, &mut rng);
        }
        assert_eq!(w.wind_streak_count(), 0);
    }

    #[test]
    fn test_raindrops_splash_then_expire() {
        let mut w = weather();
        let mut rng = FrameRng::new(7);
        w.set_weather(WeatherKind::Rain, 1.0, 0.0);
        w.step(1.0 / 60.0, W, H, &mut rng);
        assert!(w.raindrop_count() > 0);

        // Drops fall at >= 520 px/s from above a 240 px viewport: after a
        // simulated second they are splashing; splashes then time out
        w.set_weather(WeatherKind::Clear, 0.0, 0.0);
        for _ in 0..120 {
            w.step(1.0 / 60.0, W, H, &mut rng);
        }
        assert_eq!(w.raindrop_count(), 0);
    }

    #[test]
    fn test_storm_lightning_and_thunder_cue() {
        let tuning = WeatherTuning {
            lightning_chance: 1.0, // Certain trigger for the test
            ..WeatherTuning::default()
        };
        let mut w = Weather::new(tuning);
        let mut rng = FrameRng::new(11);
        w.set_weather(WeatherKind::Storm, 1.0, 0.0);

        w.step(1.0 / 60.0, W, H, &mut rng);
        assert!(w.is_flashing());
        assert_eq!(w.pending_thunder_count(), 1);

        // Stop the storm; the already-scheduled cue still fires
        // (silently, nothing loaded) within the max delay
        w.set_weather(WeatherKind::Clear, 0.0, 0.0);
        for _ in 0..240 {
            w.step(1.0 / 60.0, W, H, &mut rng);
        }
        assert_eq!(w.pending_thunder_count(), 0);
    }

    #[test]
    fn test_no_lightning_outside_storm() {
        let tuning = WeatherTuning {
            lightning_chance: 1.0,
            ..WeatherTuning::default()
        };
        let mut w = Weather::new(tuning);
        let mut rng = FrameRng::new(13);
        w.set_weather(WeatherKind::Rain, 1.0, 0.0);
        for _ in 0..60 {
            w.step(1.0 / 60.0, W, H, &mut rng);
        }
        assert!(!w.is_flashing());
    }

    #[test]
    fn test_day_factor_curve() {
        let mut w = weather();
        let sunrise = w.tuning().sunrise_hour;
        let sunset = w.tuning().sunset_hour;

        w.set_time(sunrise);
        assert_eq!(w.day_factor(), 0.0);
        assert_eq!(w.tint(), w.night_tint);

        w.set_time(sunrise + 2.0);
        assert_eq!(w.day_factor(), 1.0);
        assert_eq!(w.tint(), w.day_tint);

        // Strictly between: monotonic interpolation
        w.set_time(sunrise + 0.5);
        let a = w.day_factor();
        w.set_time(sunrise + 1.0);
        let b = w.day_factor();
        w.set_time(sunrise + 1.5);
        let c = w.day_factor();
        assert!(0.0 < a && a < b && b < c && c < 1.0);

        w.set_time(sunset + 1.0);
        assert!((w.day_factor() - 0.5).abs() < 1e-5);
        w.set_time(sunset + 3.0);
        assert_eq!(w.day_factor(), 0.0);
        w.set_time(0.0);
        assert_eq!(w.day_factor(), 0.0);
    }

    #[test]
    fn test_clock_advances_and_wraps() {
        let mut w = weather();
        let mut rng = FrameRng::new(1);
        w.set_time(23.9);
        // day_length 120 s → 0.2 h per simulated second
        for _ in 0..60 {
            w.step(1.0 / 60.0, W, H, &mut rng);
        }
        assert!(w.time_of_day() < 23.9);
        assert!((0.0..24.0).contains(&w.time_of_day()));

        w.set_time(-1.0);
        assert_eq!(w.time_of_day(), 23.0);
        w.set_time(25.5);
        assert_eq!(w.time_of_day(), 1.5);
    }
}
