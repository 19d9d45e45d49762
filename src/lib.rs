//! # sightread
//!
//! Core of a music sight-reading trainer: note generation, the two judgement loops and
//! the staff geometry they depend on. The crate owns no clock, window or audio device.
//! Hosts drive the engines with `tick`/`select`, render their snapshots and play the
//! sound intents they emit.
//!
//! ```rust
//! use sightread::{Judgement, TrainerConfig};
//!
//! let mut engine = sightread::song_engine("twinkle", &TrainerConfig::default())?;
//! engine.start();
//! assert_eq!(engine.select(sightread::NoteLetter::C), Some(Judgement::Perfect));
//! # Ok::<(), sightread::TrainerError>(())
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod intent;
pub mod note;
pub mod note_space;
pub mod practice;
pub mod session;
pub mod song;
pub mod songs;
pub mod staff;

pub use config::{PracticeTiming, TrainerConfig, Tuning};
pub use error::*;
pub use generator::SequenceGenerator;
pub use intent::SoundIntent;
pub use note::{Clef, ClefMode, NoteLetter, StaffNote};
pub use practice::{PracticeSnapshot, TimedQuestionEngine};
pub use session::{Judgement, LastJudgement, SessionStats, SessionSummary};
pub use song::{Rhythm, ScheduledEventEngine, SongSnapshot};

/// Song-mode engine for a catalog song, using the song's clef, tempo and rhythm.
pub fn song_engine(name: &str, config: &TrainerConfig) -> Result<ScheduledEventEngine, TrainerError> {
    let song = songs::find(name)
        .ok_or_else(|| TrainerError::ConfigError(format!("Unknown song: {}", name)))?;
    Ok(ScheduledEventEngine::new(song.staff_notes()?, song.config(config)))
}

/// Song-mode engine for a note list written in the note-list notation
pub fn song_engine_from_text(
    notes: &str,
    config: &TrainerConfig,
) -> Result<ScheduledEventEngine, TrainerError> {
    let notes = songs::parse_note_list(notes, config.clef)?;
    Ok(ScheduledEventEngine::new(notes, config.clone()))
}

/// Practice-mode engine from YAML configuration
pub fn practice_engine(config_yaml: &str) -> Result<TimedQuestionEngine, TrainerError> {
    Ok(TimedQuestionEngine::new(TrainerConfig::from_yaml(config_yaml)?))
}
