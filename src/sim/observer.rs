//! Outbound port to the presentation shell
//!
//! The engine reports everything the HUD needs through this trait. Shells
//! implement only what they draw; every method has a no-op default.

use serde::{Deserialize, Serialize};

use super::state::{HudSnapshot, MatchOutcome};

pub trait MatchObserver {
    /// Turn owner, hp, wind or gold changed
    fn state_changed(&mut self, _hud: &HudSnapshot) {}

    /// A line for the message box
    fn message(&mut self, _text: &str) {}

    /// The match ended; `name` is the winner's name or `"draw"`
    fn winner(&mut self, _outcome: MatchOutcome, _name: &str) {}

    /// Aim/fire/economy controls should be enabled or disabled
    fn controls_enabled_changed(&mut self, _enabled: bool) {}
}

/// Discards all notifications
impl MatchObserver for () {}

/// Forwards notifications to the `log` facade
#[derive(Debug, Default)]
pub struct LogObserver;

impl MatchObserver for LogObserver {
    fn state_changed(&mut self, hud: &HudSnapshot) {
        log::debug!(
            "HUD: turn={} left={}/{} right={}/{} wind={:+.1} gold={:.0}/{:.0}",
            hud.turn_owner,
            hud.hp_left,
            hud.max_hp_left,
            hud.hp_right,
            hud.max_hp_right,
            hud.wind,
            hud.gold_left,
            hud.gold_right
        );
    }

    fn message(&mut self, text: &str) {
        log::info!("{}", text);
    }

    fn winner(&mut self, _outcome: MatchOutcome, name: &str) {
        log::info!("Match over - winner: {}", name);
    }

    fn controls_enabled_changed(&mut self, enabled: bool) {
        log::debug!("Controls {}", if enabled { "enabled" } else { "disabled" });
    }
}

/// One recorded notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObserverEvent {
    State(HudSnapshot),
    Message(String),
    Winner { outcome: MatchOutcome, name: String },
    Controls(bool),
}

/// Keeps every notification in order (tests and replays)
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub events: Vec<ObserverEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| match e {
            ObserverEvent::Message(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn last_message(&self) -> Option<&str> {
        self.messages().last()
    }

    pub fn last_state(&self) -> Option<&HudSnapshot> {
        self.events.iter().rev().find_map(|e| match e {
            ObserverEvent::State(hud) => Some(hud),
            _ => None,
        })
    }

    /// Latest controls flag, if any was reported
    pub fn controls_enabled(&self) -> Option<bool> {
        self.events.iter().rev().find_map(|e| match e {
            ObserverEvent::Controls(enabled) => Some(*enabled),
            _ => None,
        })
    }

    pub fn winner(&self) -> Option<(MatchOutcome, &str)> {
        self.events.iter().find_map(|e| match e {
            ObserverEvent::Winner { outcome, name } => Some((*outcome, name.as_str())),
            _ => None,
        })
    }
}

impl MatchObserver for RecordingObserver {
    fn state_changed(&mut self, hud: &HudSnapshot) {
        self.events.push(ObserverEvent::State(hud.clone()));
    }

    fn message(&mut self, text: &str) {
        self.events.push(ObserverEvent::Message(text.to_string()));
    }

    fn winner(&mut self, outcome: MatchOutcome, name: &str) {
        self.events.push(ObserverEvent::Winner {
            outcome,
            name: name.to_string(),
        });
    }

    fn controls_enabled_changed(&mut self, enabled: bool) {
        self.events.push(ObserverEvent::Controls(enabled));
    }
}
