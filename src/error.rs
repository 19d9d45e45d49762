//! # Error Types
//!
//! The engines never fail: out-of-range settings are clamped and empty pools fall
//! back to a default. Errors only come from the text boundaries of the crate, the
//! YAML trainer configuration and the note-list notation used by the song catalog.
//!
//! ## Usage
//! ```rust
//! use sightread::{songs, ClefMode, TrainerError};
//!
//! match songs::parse_note_list("C4 D4 X9", ClefMode::Treble) {
//!     Ok(notes) => println!("{} notes", notes.len()),
//!     Err(TrainerError::NoteParseError { position, token, .. }) => {
//!         eprintln!("bad note '{}' at {}", token, position);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    /// Invalid trainer configuration.
    ///
    /// # Example
    /// ```
    /// # use sightread::TrainerError;
    /// let err = TrainerError::ConfigError("index-range must have two entries".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: index-range must have two entries");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A note-list token that is not `<Letter><Octave>`.
    ///
    /// `position` is the zero-based token index in the list.
    ///
    /// # Example
    /// ```
    /// # use sightread::TrainerError;
    /// let err = TrainerError::NoteParseError {
    ///     position: 2,
    ///     token: "H4".to_string(),
    ///     message: "unknown note letter 'H'".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Note parse error at token 2 ('H4'): unknown note letter 'H'");
    /// ```
    #[error("Note parse error at token {position} ('{token}'): {message}")]
    NoteParseError {
        position: usize,
        token: String,
        message: String,
    },

    /// YAML that could not be deserialized at all.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
