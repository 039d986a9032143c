//! Audio cue sink
//!
//! Turns simulation events into sound cues. Playback itself belongs to the
//! host's audio backend, which drains the queued cues once per frame.

use crate::settings::Settings;
use crate::sim::{EventSink, GameEvent, ObjectKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Coin picked up
    Coin,
    /// Life token picked up
    Heart,
    /// Rock struck
    Rock,
    /// Ambient sea loop
    Sea,
}

impl SoundEffect {
    /// Clip the backend should play
    pub fn clip(&self) -> &'static str {
        match self {
            SoundEffect::Coin => "static/sounds/coinSound.mp3",
            SoundEffect::Heart => "static/sounds/heartSound.mp3",
            SoundEffect::Rock => "static/sounds/rockSound.mp3",
            SoundEffect::Sea => "static/sounds/seaSound.mp3",
        }
    }

    pub fn for_hit(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Rock => SoundEffect::Rock,
            ObjectKind::Coin => SoundEffect::Coin,
            ObjectKind::Life => SoundEffect::Heart,
        }
    }
}

/// A cue waiting for the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCue {
    pub effect: SoundEffect,
    pub volume: f32,
    pub looping: bool,
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager {
    /// Sound stays off until the player turns it on
    enabled: bool,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    pending: Vec<SoundCue>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            enabled: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            pending: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.music_volume = settings.music_volume.clamp(0.0, 1.0);
        if settings.sound_enabled {
            audio.enable();
        }
        audio
    }

    /// Turn sound on; starts the sea ambience the first time
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        log::info!("Sound enabled");
        self.pending.push(SoundCue {
            effect: SoundEffect::Sea,
            volume: self.master_volume * self.music_volume,
            looping: true,
        });
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Queue a one-shot sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if !self.enabled {
            return;
        }
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return;
        }
        self.pending.push(SoundCue {
            effect,
            volume,
            looping: false,
        });
    }

    /// Cues queued since the last drain
    pub fn drain(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.pending)
    }
}

impl EventSink for AudioManager {
    fn on_event(&mut self, event: &GameEvent) {
        if let GameEvent::ObjectHit { kind, .. } = event {
            self.play(SoundEffect::for_hit(*kind));
        }
    }
}
