//! Sound Bank
//!
//! Keyed storage for asynchronously loaded sounds. Every playback path
//! tolerates a sound that has not finished loading (or failed to load):
//! missing entries are silent no-ops, never errors, so the simulation
//! never waits on audio.

use std::collections::HashMap;

use macroquad::audio::{load_sound, play_sound, set_sound_volume, stop_sound, PlaySoundParams, Sound};

/// The sound slots the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKey {
    Rain,
    Wind,
    Fog,
    Thunder,
}

/// Loaded sounds plus the currently looping ambient track.
#[derive(Default)]
pub struct SoundBank {
    sounds: HashMap<SoundKey, Sound>,
    ambient: Option<SoundKey>,
}

impl SoundBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a sound file into a slot. Errors are reported, not fatal;
    /// the slot simply stays empty and playback no-ops.
    pub async fn load(&mut self, key: SoundKey, path: &str) -> Result<(), String> {
        let sound = load_sound(path)
            .await
            .map_err(|e| format!("failed to load sound '{}': {}", path, e))?;
        println!("Loaded sound {:?} from {}", key, path);
        self.sounds.insert(key, sound);
        Ok(())
    }

    /// Insert an already-loaded sound (host-provided).
    pub fn insert(&mut self, key: SoundKey, sound: Sound) {
        self.sounds.insert(key, sound);
    }

    pub fn is_loaded(&self, key: SoundKey) -> bool {
        self.sounds.contains_key(&key)
    }

    /// Currently looping ambient slot, if any.
    pub fn ambient(&self) -> Option<SoundKey> {
        self.ambient
    }

    /// Swap the looping ambient track. Requesting the slot that is
    /// already playing is a no-op (no restart); `None` stops ambience.
    pub fn set_ambient(&mut self, key: Option<SoundKey>, volume: f32) {
        if key == self.ambient {
            return;
        }
        if let Some(old) = self.ambient.take() {
            if let Some(sound) = self.sounds.get(&old) {
                stop_sound(sound);
            }
        }
        if let Some(new) = key {
            if let Some(sound) = self.sounds.get(&new) {
                play_sound(
                    sound,
                    PlaySoundParams {
                        looped: true,
                        volume,
                    },
                );
            }
        }
        // Track the slot even while its load is pending so volume updates
        // apply once the sound exists
        self.ambient = key;
    }

    /// Adjust the ambient track's volume (tracks weather intensity).
    pub fn set_ambient_volume(&self, volume: f32) {
        if let Some(key) = self.ambient {
            if let Some(sound) = self.sounds.get(&key) {
                set_sound_volume(sound, volume);
            }
        }
    }

    /// Fire a one-shot cue (thunder) at the given volume.
    pub fn play_once(&self, key: SoundKey, volume: f32) {
        if let Some(sound) = self.sounds.get(&key) {
            play_sound(
                sound,
                PlaySoundParams {
                    looped: false,
                    volume,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // No Sound values can exist without an audio context, which is exactly
    // the not-ready case the bank must tolerate.

    #[test]
    fn test_unloaded_playback_is_silent_noop() {
        let bank = SoundBank::new();
        bank.play_once(SoundKey::Thunder, 0.8);
        bank.set_ambient_volume(0.5);
        assert!(!bank.is_loaded(SoundKey::Rain));
    }

    #[test]
    fn test_ambient_swap_tracks_requested_slot() {
        let mut bank = SoundBank::new();
        bank.set_ambient(Some(SoundKey::Rain), 1.0);
        assert_eq!(bank.ambient(), Some(SoundKey::Rain));

        // Same slot again: no restart, state unchanged
        bank.set_ambient(Some(SoundKey::Rain), 1.0);
        assert_eq!(bank.ambient(), Some(SoundKey::Rain));

        bank.set_ambient(None, 0.0);
        assert_eq!(bank.ambient(), None);
    }
}
