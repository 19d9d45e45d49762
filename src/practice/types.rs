//! Practice-mode type definitions

use serde::Serialize;

use crate::note::StaffNote;
use crate::session::{Judgement, LastJudgement, SessionSummary};

/// Where the question loop is.
///
/// ```text
/// Idle ──start──▶ Armed ──select / timeout──▶ Locked ──delay──▶ Armed ...
///   ▲                                                              │
///   └────────────────────────────stop──────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum QuestionState {
    #[default]
    Idle,
    /// Waiting for an answer to the current target
    Armed { time_limit: f64, time_remaining: f64 },
    /// Answer recorded; the next question is drawn once `resume_in` runs out.
    /// `time_remaining` is the answer timer frozen at the moment of the answer.
    Locked {
        judgement: Judgement,
        time_remaining: f64,
        resume_in: f64,
    },
}

impl QuestionState {
    pub fn phase(&self) -> PracticePhase {
        match self {
            QuestionState::Idle => PracticePhase::Idle,
            QuestionState::Armed { .. } => PracticePhase::Armed,
            QuestionState::Locked { .. } => PracticePhase::Locked,
        }
    }
}

/// [`QuestionState`] without its payload, for snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticePhase {
    Idle,
    Armed,
    Locked,
}

/// Read-only view of a practice session for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSnapshot {
    pub phase: PracticePhase,
    pub target: Option<StaffNote>,
    /// Ledger lines the target needs
    pub ledger_lines: Vec<u8>,
    pub time_limit: f64,
    pub time_remaining: f64,
    /// `time_remaining / time_limit`, for a countdown bar
    pub time_fraction: f64,
    pub combo: u32,
    pub best_combo: u32,
    pub accuracy: f64,
    pub total_answered: u32,
    pub total_correct: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_judgement: Option<LastJudgement>,
    pub pulse_active: bool,
    pub elapsed: f64,
    pub summary: SessionSummary,
}
