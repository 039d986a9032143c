//! Heads-up display and level-end screen model
//!
//! Holds exactly what the UI shows. It is updated from simulation events and
//! never reads the world directly, except for the progress bar and the
//! level-end summary which are sampled from the run state.

use crate::consts::PROGRESS_BAR_WIDTH;
use crate::sim::{EventSink, GameEvent, RunState};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hud {
    pub coin_text: String,
    pub life_text: String,
    /// Lives counter drawn in red
    pub life_danger: bool,
    pub level_text: String,
    /// Level-end screen, present once the level is over
    pub level_end: Option<LevelEndScreen>,
}

/// Level-end screen contents
#[derive(Debug, Clone, PartialEq)]
pub struct LevelEndScreen {
    pub title: String,
    pub status: String,
    pub coins: u32,
    pub show_next_level: bool,
    pub show_restart: bool,
}

impl LevelEndScreen {
    pub fn new(run: &RunState, failed: bool) -> Self {
        Self {
            title: format!("LEVEL {}", run.level),
            status: boat_status(run.lives_collected, failed).to_string(),
            coins: run.coins_collected,
            show_next_level: !failed,
            show_restart: failed,
        }
    }
}

/// Condition message for the end-of-level screen
pub fn boat_status(lives: i32, failed: bool) -> &'static str {
    if failed {
        return "NOOOO Captain!\n\nYour boat has sunk, you hit too many rocks!";
    }
    match lives {
        5.. => "NICE Captain!\n\nYour boat is in perfect condition!",
        1..=4 => "GOOD JOB Captain!\n\nYour boat is in decent condition.",
        0 => "No lives in the sea?\n\nYour ship is in the same condition as when you left!",
        _ => "CAREFUL Captain!\n\nYour ship almost sank. Try to hit fewer rocks next time!",
    }
}

/// Progress bar width in pixels
pub fn progress_width(run: &RunState) -> f32 {
    run.percent_complete() * PROGRESS_BAR_WIDTH
}

impl Hud {
    pub fn new() -> Self {
        Self {
            coin_text: "0".into(),
            life_text: "0".into(),
            ..Default::default()
        }
    }

    /// Build the level-end screen from the final run counters
    pub fn show_level_end(&mut self, run: &RunState, failed: bool) {
        self.level_end = Some(LevelEndScreen::new(run, failed));
    }
}

impl EventSink for Hud {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::CoinCollected(total) => self.coin_text = total.to_string(),
            GameEvent::LifeChanged(total) => {
                self.life_text = total.to_string();
                self.life_danger = *total <= 0;
            }
            GameEvent::LevelReady { level } => {
                self.coin_text = "0".into();
                self.life_text = "0".into();
                self.life_danger = false;
                self.level_text = format!("LEVEL {}", level);
                self.level_end = None;
            }
            _ => {}
        }
    }
}
