//! Timeline construction
//!
//! Notes are evenly spaced: note `i` is due at `i * (60 / bpm) * beats_per_note`
//! seconds.

use crate::note::StaffNote;

use super::types::{Rhythm, ScheduledNoteEvent};

/// Seconds between consecutive notes
pub fn note_interval(bpm: f64, rhythm: Rhythm) -> f64 {
    (60.0 / bpm) * rhythm.beats_per_note()
}

/// Schedule every note, unjudged.
///
/// # Example
/// ```
/// use sightread::song::{build_timeline, Rhythm};
/// use sightread::{note_space, Clef};
///
/// let notes = note_space::positions_for(Clef::Treble);
/// let events = build_timeline(&notes[..5], 80.0, Rhythm::Quarter);
/// assert_eq!(events[0].scheduled_time, 0.0);
/// assert_eq!(events[4].scheduled_time, 3.0);
/// ```
pub fn build_timeline(notes: &[StaffNote], bpm: f64, rhythm: Rhythm) -> Vec<ScheduledNoteEvent> {
    let interval = note_interval(bpm, rhythm);
    notes
        .iter()
        .enumerate()
        .map(|(id, position)| ScheduledNoteEvent {
            id,
            scheduled_time: id as f64 * interval,
            position: *position,
            judgement: None,
        })
        .collect()
}

/// Total length of a timeline: the last note's time
pub fn duration(events: &[ScheduledNoteEvent]) -> f64 {
    events.last().map_or(0.0, |e| e.scheduled_time)
}
