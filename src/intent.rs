//! Requests from the engines to the host's audio output.
//!
//! The engines own no playback device. They queue intents and the host drains them
//! after each `select`/`tick` call and plays them however it likes.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SoundIntent {
    /// Sound this MIDI note
    Play { midi: u8 },
}
