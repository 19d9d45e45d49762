//! Timed question loop
//!
//! One target note at a time. Each question gets an answer timer that grows with the
//! combo; answering (or running out of time) locks the loop for a short feedback delay
//! before the next target is drawn from the [`SequenceGenerator`].

use rand::rngs::SmallRng;
use rand::Rng;

use crate::config::TrainerConfig;
use crate::generator::SequenceGenerator;
use crate::intent::SoundIntent;
use crate::note::{NoteLetter, StaffNote};
use crate::note_space;
use crate::session::{Judgement, LastJudgement, SessionStats, SessionSummary, TIME_EPSILON};
use crate::staff;

use super::types::{PracticeSnapshot, QuestionState};

/// Default clock step of practice mode, in seconds
pub const PRACTICE_TICK: f64 = 0.05;

#[derive(Debug, Clone)]
pub struct TimedQuestionEngine<R: Rng = SmallRng> {
    config: TrainerConfig,
    generator: SequenceGenerator<R>,
    state: QuestionState,
    target: Option<StaffNote>,
    time_limit: f64,
    elapsed: f64,
    stats: SessionStats,
    last_judgement: Option<LastJudgement>,
    intents: Vec<SoundIntent>,
}

impl TimedQuestionEngine<SmallRng> {
    /// Engine drawing from the configured pool; seeded from `config.seed` when set.
    ///
    /// # Example
    /// ```
    /// use sightread::{TimedQuestionEngine, TrainerConfig};
    ///
    /// let config = TrainerConfig { seed: Some(3), ..TrainerConfig::default() };
    /// let mut engine = TimedQuestionEngine::new(config);
    /// engine.start();
    /// let target = engine.target().unwrap();
    /// assert!(engine.select(target.letter).unwrap().is_correct());
    /// assert_eq!(engine.combo(), 1);
    /// ```
    pub fn new(config: TrainerConfig) -> Self {
        let config = config.sanitized();
        let generator = match config.seed {
            Some(seed) => SequenceGenerator::with_seed(config.pool(), seed),
            None => SequenceGenerator::new(config.pool()),
        };
        Self::from_parts(config, generator)
    }
}

impl<R: Rng> TimedQuestionEngine<R> {
    /// Engine drawing targets with the given random source
    pub fn with_rng(config: TrainerConfig, rng: R) -> Self {
        let config = config.sanitized();
        let generator = SequenceGenerator::with_rng(config.pool(), rng);
        Self::from_parts(config, generator)
    }

    fn from_parts(config: TrainerConfig, generator: SequenceGenerator<R>) -> Self {
        // sanitized config keeps the distance within 1..=MAX_STEPWISE_DISTANCE
        let generator = generator
            .with_stepwise(config.tuning.stepwise_bias, config.tuning.stepwise_distance as i32);
        Self {
            time_limit: config.practice.time_limit(0),
            config,
            generator,
            state: QuestionState::Idle,
            target: None,
            elapsed: 0.0,
            stats: SessionStats::default(),
            last_judgement: None,
            intents: Vec::new(),
        }
    }

    /// Start a fresh session with the first question. No-op unless idle.
    pub fn start(&mut self) {
        if self.state != QuestionState::Idle {
            return;
        }
        self.stats = SessionStats::default();
        self.last_judgement = None;
        self.elapsed = 0.0;
        self.intents.clear();
        self.generator.reset();
        tracing::debug!(pool = self.generator.pool().len(), "practice session started");
        self.next_question();
    }

    /// Return to idle, dropping the current question and any pending transition
    pub fn stop(&mut self) {
        if self.state == QuestionState::Idle {
            return;
        }
        self.state = QuestionState::Idle;
        self.target = None;
        tracing::debug!(
            answered = self.stats.total_answered,
            correct = self.stats.total_correct,
            "practice session stopped"
        );
    }

    /// Advance the loop by one configured step
    pub fn tick(&mut self) {
        let step = self.config.practice.tick;
        match self.state {
            QuestionState::Idle => {}
            QuestionState::Armed {
                time_limit,
                time_remaining,
            } => {
                self.elapsed += step;
                let time_remaining = time_remaining - step;
                if time_remaining <= TIME_EPSILON {
                    tracing::trace!(question = ?self.target.map(|n| n.name()), "question timed out");
                    self.resolve(Judgement::Miss, 0.0);
                } else {
                    self.state = QuestionState::Armed {
                        time_limit,
                        time_remaining,
                    };
                }
            }
            QuestionState::Locked {
                judgement,
                time_remaining,
                resume_in,
            } => {
                self.elapsed += step;
                let resume_in = resume_in - step;
                if resume_in <= TIME_EPSILON {
                    self.next_question();
                } else {
                    self.state = QuestionState::Locked {
                        judgement,
                        time_remaining,
                        resume_in,
                    };
                }
            }
        }
    }

    /// Answer the current question. Ignored unless a question is armed.
    pub fn select(&mut self, letter: NoteLetter) -> Option<Judgement> {
        let QuestionState::Armed { time_remaining, .. } = self.state else {
            return None;
        };
        let target = self.target?;
        self.voice(letter, &target);

        let judgement = if letter == target.letter {
            Judgement::Perfect
        } else {
            Judgement::Miss
        };
        tracing::trace!(%letter, question = %target, ?judgement, "answer judged");
        self.resolve(judgement, time_remaining);
        Some(judgement)
    }

    fn resolve(&mut self, judgement: Judgement, time_remaining: f64) {
        self.stats.record(judgement);
        self.last_judgement = Some(LastJudgement {
            judgement,
            at: self.elapsed,
        });
        let resume_in = if judgement.is_correct() {
            self.config.practice.correct_delay
        } else {
            self.config.practice.miss_delay
        };
        self.state = QuestionState::Locked {
            judgement,
            time_remaining: time_remaining.max(0.0),
            resume_in,
        };
    }

    fn next_question(&mut self) {
        let target = self.generator.next_note();
        self.time_limit = self.config.practice.time_limit(self.stats.combo);
        self.target = Some(target);
        self.state = QuestionState::Armed {
            time_limit: self.time_limit,
            time_remaining: self.time_limit,
        };
        tracing::debug!(question = %target, time_limit = self.time_limit, "next question");
    }

    fn voice(&mut self, letter: NoteLetter, target: &StaffNote) {
        let note = note_space::preferred(
            self.config.clef,
            letter,
            self.config.index_range(),
            Some(target),
        );
        self.intents.push(SoundIntent::Play {
            midi: note.midi_number(),
        });
    }

    /// Take the sound intents queued since the last call
    pub fn drain_intents(&mut self) -> Vec<SoundIntent> {
        std::mem::take(&mut self.intents)
    }

    pub fn state(&self) -> QuestionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != QuestionState::Idle
    }

    /// Note currently asked for, `None` while idle
    pub fn target(&self) -> Option<StaffNote> {
        self.target
    }

    /// Answer time of the current (or last) question
    pub fn time_limit(&self) -> f64 {
        self.time_limit
    }

    pub fn time_remaining(&self) -> f64 {
        match self.state {
            QuestionState::Idle => 0.0,
            QuestionState::Armed { time_remaining, .. } => time_remaining,
            QuestionState::Locked { time_remaining, .. } => time_remaining,
        }
    }

    /// Session time in seconds, advanced by every tick while running
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn combo(&self) -> u32 {
        self.stats.combo
    }

    pub fn best_combo(&self) -> u32 {
        self.stats.best_combo
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn accuracy(&self) -> f64 {
        self.stats.accuracy()
    }

    pub fn last_judgement(&self) -> Option<LastJudgement> {
        self.last_judgement
    }

    pub fn summary(&self) -> SessionSummary {
        self.stats.summary()
    }

    pub fn snapshot(&self) -> PracticeSnapshot {
        let time_remaining = self.time_remaining();
        let time_fraction = if self.time_limit > 0.0 {
            (time_remaining / self.time_limit).clamp(0.0, 1.0)
        } else {
            0.0
        };
        PracticeSnapshot {
            phase: self.state.phase(),
            target: self.target,
            ledger_lines: self
                .target
                .map(|n| staff::ledger_line_indices(n.index))
                .unwrap_or_default(),
            time_limit: self.time_limit,
            time_remaining,
            time_fraction,
            combo: self.stats.combo,
            best_combo: self.stats.best_combo,
            accuracy: self.accuracy(),
            total_answered: self.stats.total_answered,
            total_correct: self.stats.total_correct,
            last_judgement: self.last_judgement,
            pulse_active: self
                .last_judgement
                .is_some_and(|j| j.is_pulsing(self.elapsed, self.config.tuning.judgement_pulse)),
            elapsed: self.elapsed,
            summary: self.summary(),
        }
    }
}
