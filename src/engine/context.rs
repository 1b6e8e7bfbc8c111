//! Frame Context
//!
//! Everything a module hook may need from the host for one frame, passed
//! explicitly instead of read from globals: the clamped delta time, the
//! viewport dimensions, and the frame randomness source.
//!
//! The rng is a deterministic xorshift so simulation behavior is
//! reproducible in tests without a platform rng.

/// Longest delta time the simulation will accept, in seconds.
/// Protects integration from spikes (tab switch, debugger pause).
pub const MAX_FRAME_DT: f32 = 0.1;

/// Fast xorshift PRNG (deterministic, seedable).
#[derive(Debug, Clone)]
pub struct FrameRng {
    state: u32,
}

impl FrameRng {
    pub fn new(seed: u32) -> Self {
        Self {
            // Xorshift has a fixed point at zero
            state: if seed == 0 { 0x9e3779b9 } else { seed },
        }
    }

    /// Uniform float in [0, 1).
    pub fn next(&mut self) -> f32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        // Keep strictly below 1.0 by using the top 24 bits
        (self.state >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform float in [min, max).
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next() * (max - min)
    }

    /// Bernoulli trial with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.next() < p
    }
}

impl Default for FrameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Per-frame simulation context handed to every module hook.
pub struct FrameCtx {
    /// Elapsed time since the previous frame, seconds, clamped to
    /// [`MAX_FRAME_DT`].
    pub dt: f32,
    /// Viewport width in pixels.
    pub view_w: f32,
    /// Viewport height in pixels.
    pub view_h: f32,
    /// Frame randomness source.
    pub rng: FrameRng,
}

impl FrameCtx {
    pub fn new(dt: f32, view_w: f32, view_h: f32) -> Self {
        Self {
            dt: dt.min(MAX_FRAME_DT),
            view_w,
            view_h,
            rng: FrameRng::default(),
        }
    }

    /// Context with a caller-chosen rng seed (tests, replays).
    pub fn with_seed(dt: f32, view_w: f32, view_h: f32, seed: u32) -> Self {
        Self {
            dt: dt.min(MAX_FRAME_DT),
            view_w,
            view_h,
            rng: FrameRng::new(seed),
        }
    }

    /// Refresh the per-frame inputs. The driver keeps one context alive
    /// for the whole session so the rng stream is not reset every frame.
    pub fn begin_frame(&mut self, dt: f32, view_w: f32, view_h: f32) {
        self.dt = dt.min(MAX_FRAME_DT);
        self.view_w = view_w;
        self.view_h = view_h;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_in_unit_range() {
        let mut rng = FrameRng::new(7);
        for _ in 0..1000 {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_rng_deterministic_per_seed() {
        let mut a = FrameRng::new(42);
        let mut b = FrameRng::new(42);
        for _ in 0..10 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn test_zero_seed_is_remapped() {
        // Xorshift is stuck at zero forever without the remap
        let mut rng = FrameRng::new(0);
        let sum: f32 = (0..8).map(|_| rng.next()).sum();
        assert!(sum > 0.0);
    }

    #[test]
    fn test_dt_clamped() {
        let ctx = FrameCtx::new(5.0, 320.0, 240.0);
        assert_eq!(ctx.dt, MAX_FRAME_DT);
    }
}
