//! SQUALL-2D: a browser-hosted 2D game engine
//!
//! The engine core is a per-object module runtime: particle stores, a
//! weather/day-night simulator and sprite animators all attach to host
//! objects and run through the same update→draw pipeline once per frame.
//! This binary is the frame driver plus a small demo stage; the authoring
//! tools live in a separate shell that talks to the same `engine` types.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod engine;

use macroquad::prelude::*;

use engine::{
    EngineConfig, FrameCtx, GameObject, ObjectId, ParticleConfig, ParticleStore, SoundKey,
    SpriteAnimator, Stage, Weather, WeatherKind,
};

/// FPS limit setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FpsLimit {
    /// 30 FPS (low-power hosts)
    Fps30,
    /// 60 FPS (smooth gameplay)
    #[default]
    Fps60,
    /// Unlocked (as fast as possible)
    Unlocked,
}

impl FpsLimit {
    /// Get the target frame time in seconds (None = unlocked)
    pub fn frame_time(&self) -> Option<f64> {
        match self {
            FpsLimit::Fps30 => Some(1.0 / 30.0),
            FpsLimit::Fps60 => Some(1.0 / 60.0),
            FpsLimit::Unlocked => None,
        }
    }

    /// Cycle to next value
    pub fn next(self) -> Self {
        match self {
            FpsLimit::Fps30 => FpsLimit::Fps60,
            FpsLimit::Fps60 => FpsLimit::Unlocked,
            FpsLimit::Unlocked => FpsLimit::Fps30,
        }
    }

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            FpsLimit::Fps30 => "30",
            FpsLimit::Fps60 => "60",
            FpsLimit::Unlocked => "Unlocked",
        }
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("SQUALL-2D v{}", VERSION),
        window_width: 960,
        window_height: 540,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Build the demo stage: a sky object carrying the weather simulator, a
/// hero sprite, and a brazier emitting fire particles.
async fn build_stage(config: &EngineConfig, ctx: &mut FrameCtx) -> (Stage, ObjectId, ObjectId) {
    let mut stage = Stage::new();

    // Sky: weather + day/night. Overlays are full-viewport, so the
    // host geometry is nominal. A burst-only particle store rides along
    // for screen-space spark effects.
    let mut weather = Weather::new(config.weather.clone());
    for (key, path) in [
        (SoundKey::Rain, "assets/sounds/rain.ogg"),
        (SoundKey::Wind, "assets/sounds/wind.ogg"),
        (SoundKey::Fog, "assets/sounds/fog.ogg"),
        (SoundKey::Thunder, "assets/sounds/thunder.ogg"),
    ] {
        if let Err(e) = weather.load_sound(key, path).await {
            println!("{}", e);
        }
    }
    let mut sky = GameObject::new(vec2(0.0, 0.0), vec2(ctx.view_w, ctx.view_h));
    sky.attach(Box::new(weather), ctx);
    sky.attach(
        Box::new(ParticleStore::new(
            ParticleConfig::sparks(),
            config.max_particles,
        )),
        ctx,
    );
    let sky_id = stage.spawn(sky);

    // Hero sprite: animation state machine over a 4-column sheet
    let mut animator = SpriteAnimator::new(32.0, 32.0);
    match load_texture("assets/sprites/hero.png").await {
        Ok(texture) => {
            texture.set_filter(FilterMode::Nearest);
            animator.set_sheet(texture);
            println!("Loaded hero sprite sheet");
        }
        Err(e) => {
            // State machine still runs; draw skips until a sheet exists
            println!("Failed to load hero sheet: {}", e);
        }
    }
    animator.add_animation("idle", 0, 4, Some(4.0));
    animator.add_animation("walk", 1, 4, Some(8.0));
    animator.play("idle", true);
    let mut hero = GameObject::new(vec2(140.0, 380.0), vec2(64.0, 64.0));
    hero.attach(Box::new(animator), ctx);
    let hero_id = stage.spawn(hero);

    // Brazier: auto-emitting fire
    let mut fire = ParticleStore::new(ParticleConfig::fire(), config.max_particles);
    fire.auto_emit = true;
    fire.emission_rate = 24.0;
    let mut brazier = GameObject::new(vec2(600.0, 420.0), vec2(16.0, 16.0));
    brazier.attach(Box::new(fire), ctx);
    stage.spawn(brazier);

    (stage, sky_id, hero_id)
}

fn handle_weather_keys(stage: &mut Stage, sky_id: ObjectId) {
    let requests = [
        (KeyCode::Key1, WeatherKind::Clear, 0.0),
        (KeyCode::Key2, WeatherKind::Rain, 0.7),
        (KeyCode::Key3, WeatherKind::Storm, 1.0),
        (KeyCode::Key4, WeatherKind::Snow, 0.8),
        (KeyCode::Key5, WeatherKind::Fog, 0.6),
        (KeyCode::Key6, WeatherKind::Dust, 0.5),
        (KeyCode::Key7, WeatherKind::Windy, 0.8),
    ];
    let Some(weather) = stage
        .object_mut(sky_id)
        .and_then(|sky| sky.module_mut::<Weather>())
    else {
        return;
    };

    for (key, kind, intensity) in requests {
        if is_key_pressed(key) {
            weather.set_weather(kind, intensity, 3.0);
        }
    }
    if is_key_down(KeyCode::LeftBracket) {
        weather.set_time(weather.time_of_day() - 0.1);
    }
    if is_key_down(KeyCode::RightBracket) {
        weather.set_time(weather.time_of_day() + 0.1);
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let config = EngineConfig::load_or_default("assets/engine.ron").await;

    // One context for the whole session so the rng stream persists
    let mut ctx = if config.rng_seed != 0 {
        FrameCtx::with_seed(0.0, screen_width(), screen_height(), config.rng_seed)
    } else {
        FrameCtx::new(0.0, screen_width(), screen_height())
    };

    let (mut stage, sky_id, hero_id) = build_stage(&config, &mut ctx).await;

    let mut playing = true;
    let mut fps_limit = FpsLimit::default();

    loop {
        let frame_start = get_time();
        ctx.begin_frame(get_frame_time(), screen_width(), screen_height());

        // --- Input ---
        handle_weather_keys(&mut stage, sky_id);
        if is_key_pressed(KeyCode::P) {
            playing = !playing;
        }
        if is_key_pressed(KeyCode::F) {
            fps_limit = fps_limit.next();
        }
        if is_key_pressed(KeyCode::Space) {
            // One-shot spark burst at the mouse cursor
            let (mx, my) = mouse_position();
            if let Some(store) = stage
                .object_mut(sky_id)
                .and_then(|sky| sky.module_mut::<ParticleStore>())
            {
                let cfg = store.defaults();
                store.emit_burst(&cfg, vec2(mx, my), 24, &mut ctx.rng);
            }
        }
        if let Some(animator) = stage
            .object_mut(hero_id)
            .and_then(|hero| hero.module_mut::<SpriteAnimator>())
        {
            if is_key_pressed(KeyCode::W) {
                animator.play("walk", true);
            }
            if is_key_pressed(KeyCode::I) {
                animator.play("idle", true);
            }
            if is_key_pressed(KeyCode::H) {
                animator.flash(RED, 0.15, 0.8);
            }
        }

        // --- Simulate, then draw ---
        clear_background(Color::new(0.35, 0.55, 0.7, 1.0));
        if playing {
            stage.update(&mut ctx);
        }
        stage.draw(&ctx);

        // --- HUD ---
        if let Some(weather) = stage.object(sky_id).and_then(|sky| sky.module::<Weather>()) {
            let line = format!(
                "{:?}  intensity {:.2}  clock {:04.1}h  fps cap {}{}",
                weather.kind(),
                weather.intensity(),
                weather.time_of_day(),
                fps_limit.label(),
                if playing { "" } else { "  [paused]" },
            );
            draw_text(&line, 12.0, 24.0, 20.0, WHITE);
            draw_text(
                "1-7 weather  [ ] time  space burst  w/i anim  h hit-flash  p pause  f fps",
                12.0,
                44.0,
                16.0,
                Color::new(1.0, 1.0, 1.0, 0.6),
            );
        }

        // Frame pacing (native only; the browser paces WASM itself)
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(target) = fps_limit.frame_time() {
            let elapsed = get_time() - frame_start;
            if elapsed < target {
                std::thread::sleep(std::time::Duration::from_secs_f64(target - elapsed));
            }
        }
        #[cfg(target_arch = "wasm32")]
        let _ = frame_start;

        next_frame().await
    }
}
