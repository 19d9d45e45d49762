//! Scoring state shared by both judgement engines.

use serde::Serialize;

/// Slack for comparing accumulated tick time against a deadline
pub(crate) const TIME_EPSILON: f64 = 1e-9;

/// Outcome of one question or scheduled note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Judgement {
    Perfect,
    Miss,
}

impl Judgement {
    pub fn is_correct(self) -> bool {
        self == Judgement::Perfect
    }
}

/// The most recent judgement and the session time it happened at.
///
/// Hosts use `at` to show a short feedback pulse; the engine does not animate it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastJudgement {
    pub judgement: Judgement,
    pub at: f64,
}

impl LastJudgement {
    pub fn is_pulsing(&self, now: f64, pulse: f64) -> bool {
        now >= self.at && now - self.at < pulse
    }
}

/// Running totals for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub combo: u32,
    pub best_combo: u32,
    pub total_answered: u32,
    pub total_correct: u32,
}

impl SessionStats {
    pub fn record(&mut self, judgement: Judgement) {
        self.total_answered += 1;
        if judgement.is_correct() {
            self.total_correct += 1;
            self.combo += 1;
            self.best_combo = self.best_combo.max(self.combo);
        } else {
            self.combo = 0;
        }
    }

    /// Fraction of correct answers, 0 before the first answer
    pub fn accuracy(&self) -> f64 {
        if self.total_answered == 0 {
            0.0
        } else {
            self.total_correct as f64 / self.total_answered as f64
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total_answered: self.total_answered,
            total_correct: self.total_correct,
            best_combo: self.best_combo,
            accuracy: self.accuracy(),
        }
    }
}

/// End-of-session results
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_answered: u32,
    pub total_correct: u32,
    pub best_combo: u32,
    pub accuracy: f64,
}
