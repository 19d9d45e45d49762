//! # Song Mode
//!
//! Judge taps against a fixed, evenly timed sequence of notes.
//!
//! ## Sub-modules
//! - `types` - Rhythm, ScheduledNoteEvent, SongSnapshot
//! - `timeline` - scheduling notes at a tempo
//! - `engine` - the tick-driven judgement loop
//!
//! ## Judgement
//!
//! The note at the cursor accepts a tap while `|scheduled_time - current_time|` is
//! within the hit window (0.42 s by default). A tap of the right letter is
//! `Perfect`, any other letter is `Miss`, and either way the cursor moves on.
//! Taps outside the window are ignored. A note nobody tapped is missed
//! automatically once the clock passes `scheduled_time + miss_window`.
//!
//! ## Example
//! ```rust
//! use sightread::song::{ScheduledEventEngine, SONG_TICK};
//! use sightread::{songs, ClefMode, Judgement, NoteLetter, TrainerConfig};
//!
//! let notes = songs::parse_note_list("C4 D4", ClefMode::Treble)?;
//! let mut engine = ScheduledEventEngine::new(notes, TrainerConfig::default());
//! engine.start();
//!
//! assert_eq!(engine.select(NoteLetter::C), Some(Judgement::Perfect));
//!
//! // D4 is due at 0.75 s at 80 bpm; nobody taps it
//! for _ in 0..70 {
//!     engine.tick(SONG_TICK);
//! }
//! assert!(engine.is_finished());
//! assert_eq!(engine.accuracy(), 0.5);
//! # Ok::<(), sightread::TrainerError>(())
//! ```

mod engine;
mod timeline;
mod types;


pub use engine::{ScheduledEventEngine, SONG_TICK};
pub use timeline::{build_timeline, duration, note_interval};
pub use types::{PendingAnchor, Rhythm, ScheduledNoteEvent, SongSnapshot};
