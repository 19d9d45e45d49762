//! Song-mode type definitions

use serde::Serialize;

use crate::note::StaffNote;
use crate::session::{Judgement, LastJudgement, SessionSummary};

/// Note length used to space a song's notes on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rhythm {
    Whole,
    Half,
    Quarter,
    Eighth,
    /// Any other length, in beats
    Custom(f64),
}

impl Rhythm {
    /// Beats each note lasts
    pub fn beats_per_note(&self) -> f64 {
        match self {
            Rhythm::Whole => 4.0,
            Rhythm::Half => 2.0,
            Rhythm::Quarter => 1.0,
            Rhythm::Eighth => 0.5,
            Rhythm::Custom(beats) => *beats,
        }
    }

    /// Parse "whole", "half", "quarter", "eighth" or a positive number of beats
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whole" => Some(Rhythm::Whole),
            "half" => Some(Rhythm::Half),
            "quarter" => Some(Rhythm::Quarter),
            "eighth" => Some(Rhythm::Eighth),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|beats| beats.is_finite() && *beats > 0.0)
                .map(Rhythm::Custom),
        }
    }

    /// Custom lengths that are not positive fall back to a quarter note
    pub fn sanitized(self) -> Self {
        match self {
            Rhythm::Custom(beats) if !(beats.is_finite() && beats > 0.0) => {
                tracing::warn!(beats, "invalid rhythm, using quarter notes");
                Rhythm::Quarter
            }
            other => other,
        }
    }
}

/// One note of the song timeline.
///
/// `judgement` is written once, when the note is hit, tapped wrong or passes its
/// miss window. Only a timeline rebuild clears it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNoteEvent {
    pub id: usize,
    /// Seconds from the start of the song
    pub scheduled_time: f64,
    pub position: StaffNote,
    pub judgement: Option<Judgement>,
}

/// Sound-anchor change waiting for its fire time.
///
/// `epoch` is the session it was scheduled in; a rebuilt timeline never applies it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingAnchor {
    pub fire_at: f64,
    pub note: StaffNote,
    pub epoch: u64,
}

/// Read-only view of a song session for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongSnapshot {
    /// Note at the cursor, `None` once every note is judged
    pub current_note: Option<StaffNote>,
    /// Ledger lines the current note needs
    pub ledger_lines: Vec<u8>,
    pub cursor: usize,
    pub event_count: usize,
    pub current_time: f64,
    pub progress: f64,
    pub combo: u32,
    pub accuracy: f64,
    pub total_judged: u32,
    pub total_correct: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_judgement: Option<LastJudgement>,
    pub pulse_active: bool,
    pub is_running: bool,
    pub is_paused: bool,
    pub is_finished: bool,
    pub bpm: f64,
    pub scroll_speed: f64,
    pub summary: SessionSummary,
}
