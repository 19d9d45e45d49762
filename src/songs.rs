//! Built-in melodies and the note-list notation they are written in.
//!
//! A note list is whitespace-separated `<Letter><Octave>` tokens, e.g. `"E4 E4 F4 G4"`.
//! Letters are case-insensitive; commas between tokens are allowed. Pitches the staff
//! cannot show are moved to the nearest slot of the same letter.

use crate::config::TrainerConfig;
use crate::error::TrainerError;
use crate::note::{ClefMode, NoteLetter, StaffNote};
use crate::note_space;
use crate::song::Rhythm;

/// A melody in the catalog with the settings it is meant to be played at
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub name: &'static str,
    pub title: &'static str,
    pub bpm: f64,
    pub rhythm: Rhythm,
    pub clef: ClefMode,
    pub notes: &'static str,
}

static SONGS: &[Song] = &[
    Song {
        name: "ode-to-joy",
        title: "Ode to Joy",
        bpm: 90.0,
        rhythm: Rhythm::Quarter,
        clef: ClefMode::Treble,
        notes: "E4 E4 F4 G4 G4 F4 E4 D4 C4 C4 D4 E4 E4 D4 D4 \
                E4 E4 F4 G4 G4 F4 E4 D4 C4 C4 D4 E4 D4 C4 C4",
    },
    Song {
        name: "twinkle",
        title: "Twinkle, Twinkle, Little Star",
        bpm: 80.0,
        rhythm: Rhythm::Quarter,
        clef: ClefMode::Treble,
        notes: "C4 C4 G4 G4 A4 A4 G4 F4 F4 E4 E4 D4 D4 C4 \
                G4 G4 F4 F4 E4 E4 D4 G4 G4 F4 F4 E4 E4 D4",
    },
    Song {
        name: "mary",
        title: "Mary Had a Little Lamb",
        bpm: 100.0,
        rhythm: Rhythm::Quarter,
        clef: ClefMode::Treble,
        notes: "E4 D4 C4 D4 E4 E4 E4 D4 D4 D4 E4 G4 G4 \
                E4 D4 C4 D4 E4 E4 E4 E4 D4 D4 E4 D4 C4",
    },
    Song {
        name: "frere-jacques",
        title: "Frère Jacques",
        bpm: 96.0,
        rhythm: Rhythm::Quarter,
        clef: ClefMode::Bass,
        notes: "C3 D3 E3 C3 C3 D3 E3 C3 E3 F3 G3 E3 F3 G3",
    },
    Song {
        name: "grand-scale",
        title: "C Major Scale Across the Grand Staff",
        bpm: 120.0,
        rhythm: Rhythm::Eighth,
        clef: ClefMode::Grand,
        notes: "C3 D3 E3 F3 G3 A3 B3 C4 D4 E4 F4 G4 A4 B4 C5 \
                C5 B4 A4 G4 F4 E4 D4 C4 B3 A3 G3 F3 E3 D3 C3",
    },
];

impl Song {
    /// The melody resolved onto the song's staff
    pub fn staff_notes(&self) -> Result<Vec<StaffNote>, TrainerError> {
        parse_note_list(self.notes, self.clef)
    }

    /// `base` with this song's clef, tempo and rhythm
    pub fn config(&self, base: &TrainerConfig) -> TrainerConfig {
        TrainerConfig {
            clef: self.clef,
            bpm: self.bpm,
            rhythm: self.rhythm,
            ..base.clone()
        }
    }
}

/// Every built-in song
pub fn catalog() -> &'static [Song] {
    SONGS
}

/// Look up a song by name
pub fn find(name: &str) -> Option<&'static Song> {
    SONGS.iter().find(|s| s.name == name)
}

/// List all song names
pub fn list_songs() -> Vec<&'static str> {
    SONGS.iter().map(|s| s.name).collect()
}

/// Parse a note list onto the staff of `mode`.
///
/// # Example
/// ```
/// use sightread::{songs, ClefMode};
///
/// let notes = songs::parse_note_list("c4, E4 g4", ClefMode::Treble)?;
/// let names: Vec<String> = notes.iter().map(|n| n.name()).collect();
/// assert_eq!(names, ["C4", "E4", "G4"]);
/// # Ok::<(), sightread::TrainerError>(())
/// ```
pub fn parse_note_list(text: &str, mode: ClefMode) -> Result<Vec<StaffNote>, TrainerError> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(position, token)| parse_token(position, token, mode))
        .collect()
}

fn parse_token(position: usize, token: &str, mode: ClefMode) -> Result<StaffNote, TrainerError> {
    let error = |message: String| TrainerError::NoteParseError {
        position,
        token: token.to_string(),
        message,
    };

    let mut chars = token.chars();
    let first = chars.next().ok_or_else(|| error("empty token".to_string()))?;
    let letter = NoteLetter::from_char(first)
        .ok_or_else(|| error(format!("unknown note letter '{}'", first)))?;

    let rest = chars.as_str();
    if rest.is_empty() {
        return Err(error("missing octave".to_string()));
    }
    let octave: i8 = rest
        .parse()
        .map_err(|_| error(format!("invalid octave '{}'", rest)))?;

    Ok(note_space::resolve(letter, octave, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Clef;

    fn names(notes: &[StaffNote]) -> Vec<String> {
        notes.iter().map(|n| n.name()).collect()
    }

    #[test]
    fn test_parse_simple_list() {
        let notes = parse_note_list("C4 D4 E4", ClefMode::Treble).unwrap();
        assert_eq!(names(&notes), vec!["C4", "D4", "E4"]);
        assert_eq!(notes[0].index, 2);
        assert!(notes.iter().all(|n| n.clef == Clef::Treble));
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_note_list("   ", ClefMode::Treble).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_letter() {
        let err = parse_note_list("C4 D4 H4", ClefMode::Treble).unwrap_err();
        match err {
            TrainerError::NoteParseError {
                position,
                token,
                message,
            } => {
                assert_eq!(position, 2);
                assert_eq!(token, "H4");
                assert_eq!(message, "unknown note letter 'H'");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_and_invalid_octave() {
        let err = parse_note_list("C", ClefMode::Treble).unwrap_err();
        assert_eq!(err.to_string(), "Note parse error at token 0 ('C'): missing octave");

        let err = parse_note_list("C4 Dx", ClefMode::Treble).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Note parse error at token 1 ('Dx'): invalid octave 'x'"
        );
    }

    #[test]
    fn test_off_staff_pitch_moves_to_nearest_slot() {
        // treble runs A3..C6
        let notes = parse_note_list("C2 C7", ClefMode::Treble).unwrap();
        assert_eq!(names(&notes), vec!["C4", "C6"]);
    }

    #[test]
    fn test_grand_mode_splits_at_middle_c() {
        let notes = parse_note_list("B3 C4", ClefMode::Grand).unwrap();
        assert_eq!(notes[0].clef, Clef::Bass);
        assert_eq!(notes[1].clef, Clef::Treble);
    }

    #[test]
    fn test_catalog_parses_exactly() {
        for song in catalog() {
            let notes = song.staff_notes().unwrap();
            let source: Vec<String> = song
                .notes
                .split_whitespace()
                .map(|t| t.to_string())
                .collect();
            assert_eq!(names(&notes), source, "{} moved a note", song.name);
        }
    }

    #[test]
    fn test_find_and_list() {
        assert_eq!(list_songs().len(), catalog().len());
        let song = find("frere-jacques").unwrap();
        assert_eq!(song.clef, ClefMode::Bass);
        assert!(find("no-such-song").is_none());
    }

    #[test]
    fn test_song_config() {
        let song = find("grand-scale").unwrap();
        let config = song.config(&TrainerConfig::default());
        assert_eq!(config.clef, ClefMode::Grand);
        assert_eq!(config.bpm, 120.0);
        assert_eq!(config.rhythm, Rhythm::Eighth);
    }
}
