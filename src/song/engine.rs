//! Scheduled-event judgement loop
//!
//! The engine owns a timeline of notes and a session clock. The host drives it with
//! `tick(delta)` (normally [`SONG_TICK`] seconds) and feeds taps through `select`.
//! Nothing happens on its own: there are no threads or timers, so the same calls
//! always produce the same session.
//!
//! Per tick, in order:
//! 1. advance the clock,
//! 2. apply the pending sound anchor if its fire time has passed,
//! 3. sweep: skip notes already judged, then miss every note whose miss window
//!    has closed, stopping at the first note still in its window.

use crate::config::{clamp_bpm, TrainerConfig};
use crate::intent::SoundIntent;
use crate::note::{NoteLetter, StaffNote};
use crate::note_space;
use crate::session::{Judgement, LastJudgement, SessionStats, SessionSummary, TIME_EPSILON};
use crate::staff;

use super::timeline::build_timeline;
use super::types::{PendingAnchor, ScheduledNoteEvent, SongSnapshot};

/// Clock step the host is expected to drive song mode with, in seconds
pub const SONG_TICK: f64 = 0.02;

#[derive(Debug, Clone)]
pub struct ScheduledEventEngine {
    config: TrainerConfig,
    notes: Vec<StaffNote>,
    events: Vec<ScheduledNoteEvent>,
    cursor: usize,
    current_time: f64,
    running: bool,
    is_paused: bool,
    is_finished: bool,
    stats: SessionStats,
    last_judgement: Option<LastJudgement>,
    sound_anchor: Option<StaffNote>,
    pending_anchor: Option<PendingAnchor>,
    epoch: u64,
    intents: Vec<SoundIntent>,
}

impl ScheduledEventEngine {
    /// Build an engine for `notes`; call [`start`](Self::start) to begin the session.
    ///
    /// # Example
    /// ```
    /// use sightread::{song::ScheduledEventEngine, songs, ClefMode, Judgement, NoteLetter, TrainerConfig};
    ///
    /// let notes = songs::parse_note_list("C4 D4 E4", ClefMode::Treble)?;
    /// let mut engine = ScheduledEventEngine::new(notes, TrainerConfig::default());
    /// engine.start();
    /// assert_eq!(engine.select(NoteLetter::C), Some(Judgement::Perfect));
    /// # Ok::<(), sightread::TrainerError>(())
    /// ```
    pub fn new(notes: Vec<StaffNote>, config: TrainerConfig) -> Self {
        let mut engine = Self {
            config: config.sanitized(),
            notes,
            events: Vec::new(),
            cursor: 0,
            current_time: 0.0,
            running: false,
            is_paused: false,
            is_finished: false,
            stats: SessionStats::default(),
            last_judgement: None,
            sound_anchor: None,
            pending_anchor: None,
            epoch: 0,
            intents: Vec::new(),
        };
        engine.rebuild();
        engine
    }

    /// Begin a fresh session. No-op while a session is already running.
    ///
    /// A session that finished on its own still counts as running, so its results stay
    /// readable; use [`restart`](Self::restart) to play it again.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.rebuild();
        self.running = true;
        tracing::debug!(events = self.events.len(), bpm = self.config.bpm, "song session started");
    }

    /// End the session. Later ticks and taps are ignored until the next start/restart.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.is_paused = false;
        self.pending_anchor = None;
        self.epoch += 1;
        tracing::debug!(cursor = self.cursor, "song session stopped");
    }

    pub fn pause(&mut self) {
        if self.running && !self.is_finished && !self.is_paused {
            self.is_paused = true;
            tracing::debug!(time = self.current_time, "song session paused");
        }
    }

    /// Continue from where the clock stopped
    pub fn resume(&mut self) {
        if self.is_paused {
            self.is_paused = false;
            tracing::debug!(time = self.current_time, "song session resumed");
        }
    }

    /// Rebuild the timeline from the same notes, optionally at a new tempo, and run it
    pub fn restart(&mut self, new_bpm: Option<f64>) {
        if let Some(bpm) = new_bpm {
            self.config.bpm = clamp_bpm(bpm);
        }
        self.rebuild();
        self.running = true;
        tracing::debug!(bpm = self.config.bpm, "song session restarted");
    }

    /// Replace the song and rebuild, keeping the running state
    pub fn set_notes(&mut self, notes: Vec<StaffNote>) {
        self.notes = notes;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.events = build_timeline(&self.notes, self.config.bpm, self.config.rhythm);
        self.cursor = 0;
        self.current_time = 0.0;
        self.is_paused = false;
        self.is_finished = self.events.is_empty();
        self.stats = SessionStats::default();
        self.last_judgement = None;
        self.sound_anchor = self.events.first().map(|e| e.position);
        self.pending_anchor = None;
        self.epoch += 1;
        self.intents.clear();
    }

    fn is_live(&self) -> bool {
        self.running && !self.is_paused && !self.is_finished
    }

    /// Advance the session clock by `delta` seconds
    pub fn tick(&mut self, delta: f64) {
        if !self.is_live() || !delta.is_finite() || delta <= 0.0 {
            return;
        }
        self.current_time += delta;
        self.apply_due_anchor();
        self.sweep();
    }

    fn apply_due_anchor(&mut self) {
        let Some(pending) = self.pending_anchor else {
            return;
        };
        if pending.epoch != self.epoch {
            self.pending_anchor = None;
            return;
        }
        if self.current_time + TIME_EPSILON >= pending.fire_at {
            self.sound_anchor = Some(pending.note);
            self.pending_anchor = None;
        }
    }

    fn sweep(&mut self) {
        while self.cursor < self.events.len() && self.events[self.cursor].judgement.is_some() {
            self.cursor += 1;
        }

        let miss_window = self.config.tuning.miss_window;
        while self.cursor < self.events.len()
            && self.current_time > self.events[self.cursor].scheduled_time + miss_window + TIME_EPSILON
        {
            tracing::trace!(id = self.events[self.cursor].id, "note passed without a tap");
            self.judge_cursor(Judgement::Miss);
            self.schedule_anchor(self.current_time + miss_window);
        }

        if self.cursor >= self.events.len() {
            self.finish();
        }
    }

    /// Tap a note letter; returns the judgement when the tap landed in a note's window.
    ///
    /// Taps outside the current note's window are not attributed to any note.
    pub fn select(&mut self, letter: NoteLetter) -> Option<Judgement> {
        if !self.is_live() {
            return None;
        }
        self.voice(letter);

        let event = self.events.get(self.cursor)?;
        let dt = event.scheduled_time - self.current_time;
        if dt.abs() > self.config.tuning.hit_window + TIME_EPSILON {
            tracing::trace!(%letter, dt, "tap outside the hit window");
            return None;
        }

        let judgement = if letter == event.position.letter {
            Judgement::Perfect
        } else {
            Judgement::Miss
        };
        tracing::trace!(%letter, id = event.id, dt, ?judgement, "tap judged");
        self.judge_cursor(judgement);
        self.schedule_anchor(self.current_time + self.config.tuning.hit_window);

        if self.cursor >= self.events.len() {
            self.finish();
        }
        Some(judgement)
    }

    fn judge_cursor(&mut self, judgement: Judgement) {
        let event = &mut self.events[self.cursor];
        if event.judgement.is_none() {
            event.judgement = Some(judgement);
            self.stats.record(judgement);
            self.last_judgement = Some(LastJudgement {
                judgement,
                at: self.current_time,
            });
        }
        self.cursor += 1;
    }

    /// Move the sound anchor to the note now at the cursor once `fire_at` is reached.
    ///
    /// Deferred so the octave taps are voiced in does not jump while the judgement
    /// feedback for the previous note is still showing.
    fn schedule_anchor(&mut self, fire_at: f64) {
        if let Some(next) = self.events.get(self.cursor) {
            self.pending_anchor = Some(PendingAnchor {
                fire_at,
                note: next.position,
                epoch: self.epoch,
            });
        }
    }

    fn voice(&mut self, letter: NoteLetter) {
        let note = note_space::preferred(
            self.config.clef,
            letter,
            self.config.index_range(),
            self.sound_anchor.as_ref(),
        );
        self.intents.push(SoundIntent::Play {
            midi: note.midi_number(),
        });
    }

    fn finish(&mut self) {
        if !self.is_finished {
            self.is_finished = true;
            tracing::debug!(
                judged = self.stats.total_answered,
                correct = self.stats.total_correct,
                "song session finished"
            );
        }
    }

    /// Take the sound intents queued since the last call
    pub fn drain_intents(&mut self) -> Vec<SoundIntent> {
        std::mem::take(&mut self.intents)
    }

    pub fn events(&self) -> &[ScheduledNoteEvent] {
        &self.events
    }

    pub fn notes(&self) -> &[StaffNote] {
        &self.notes
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn bpm(&self) -> f64 {
        self.config.bpm
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn is_finished(&self) -> bool {
        self.is_finished
    }

    pub fn combo(&self) -> u32 {
        self.stats.combo
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn last_judgement(&self) -> Option<LastJudgement> {
        self.last_judgement
    }

    /// Note taps are currently voiced around
    pub fn sound_anchor(&self) -> Option<StaffNote> {
        self.sound_anchor
    }

    pub fn pending_anchor(&self) -> Option<PendingAnchor> {
        self.pending_anchor
    }

    /// Fraction of notes passed, 0 for an empty song
    pub fn progress(&self) -> f64 {
        if self.events.is_empty() {
            0.0
        } else {
            self.cursor as f64 / self.events.len() as f64
        }
    }

    /// Correct notes over judged notes, 0 before the first judgement
    pub fn accuracy(&self) -> f64 {
        self.stats.accuracy()
    }

    pub fn scroll_speed_multiplier(&self) -> f64 {
        self.config.tuning.scroll_speed_multiplier(self.config.bpm)
    }

    pub fn summary(&self) -> SessionSummary {
        self.stats.summary()
    }

    pub fn snapshot(&self) -> SongSnapshot {
        let current_note = self.events.get(self.cursor).map(|e| e.position);
        SongSnapshot {
            current_note,
            ledger_lines: current_note
                .map(|n| staff::ledger_line_indices(n.index))
                .unwrap_or_default(),
            cursor: self.cursor,
            event_count: self.events.len(),
            current_time: self.current_time,
            progress: self.progress(),
            combo: self.stats.combo,
            accuracy: self.accuracy(),
            total_judged: self.stats.total_answered,
            total_correct: self.stats.total_correct,
            last_judgement: self.last_judgement,
            pulse_active: self
                .last_judgement
                .is_some_and(|j| j.is_pulsing(self.current_time, self.config.tuning.judgement_pulse)),
            is_running: self.running,
            is_paused: self.is_paused,
            is_finished: self.is_finished,
            bpm: self.config.bpm,
            scroll_speed: self.scroll_speed_multiplier(),
            summary: self.summary(),
        }
    }
}
