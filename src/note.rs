//! # Note Types
//!
//! Value types shared by every part of the trainer.
//!
//! ```text
//! StaffNote
//!   ├── index: 0..=16       vertical slot on one clef's staff (4..=12 are the five lines)
//!   ├── letter: NoteLetter  C D E F G A B
//!   ├── octave: i8          scientific pitch octave (C4 = middle C)
//!   ├── clef: Clef          treble | bass
//!   └── is_ledger_line      the slot itself is a ledger line (0, 2, 14, 16)
//! ```
//!
//! ## Numbering
//! - `midi_number = (octave + 1) * 12 + semitone_offset(letter)`, so C4 = 60.
//! - `diatonic_index = octave * 7 + diatonic_offset(letter)`, so one step on the staff
//!   is a difference of 1 regardless of letter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven natural note letters, ordered C to B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NoteLetter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteLetter {
    pub const ALL: [NoteLetter; 7] = [
        NoteLetter::C,
        NoteLetter::D,
        NoteLetter::E,
        NoteLetter::F,
        NoteLetter::G,
        NoteLetter::A,
        NoteLetter::B,
    ];

    /// Position within the octave on the white-key scale (C = 0 .. B = 6)
    pub fn diatonic_offset(self) -> i32 {
        match self {
            NoteLetter::C => 0,
            NoteLetter::D => 1,
            NoteLetter::E => 2,
            NoteLetter::F => 3,
            NoteLetter::G => 4,
            NoteLetter::A => 5,
            NoteLetter::B => 6,
        }
    }

    /// Semitones above C
    pub fn semitone_offset(self) -> i32 {
        match self {
            NoteLetter::C => 0,
            NoteLetter::D => 2,
            NoteLetter::E => 4,
            NoteLetter::F => 5,
            NoteLetter::G => 7,
            NoteLetter::A => 9,
            NoteLetter::B => 11,
        }
    }

    /// Letter from a diatonic offset, wrapping into 0..7
    pub fn from_diatonic_offset(offset: i32) -> Self {
        Self::ALL[offset.rem_euclid(7) as usize]
    }

    /// Letter for a natural pitch class (0..12), `None` for black keys
    pub fn from_semitone_offset(semitone: i32) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.semitone_offset() == semitone.rem_euclid(12))
    }

    /// Parse an upper- or lower-case letter
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(NoteLetter::C),
            'D' => Some(NoteLetter::D),
            'E' => Some(NoteLetter::E),
            'F' => Some(NoteLetter::F),
            'G' => Some(NoteLetter::G),
            'A' => Some(NoteLetter::A),
            'B' => Some(NoteLetter::B),
            _ => None,
        }
    }
}

impl fmt::Display for NoteLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    Treble,
    Bass,
}

impl Clef {
    /// Letter and octave of slot 0 (a ledger line two lines below the staff)
    pub fn anchor(self) -> (NoteLetter, i8) {
        match self {
            Clef::Treble => (NoteLetter::A, 3),
            Clef::Bass => (NoteLetter::C, 2),
        }
    }

    pub fn other(self) -> Self {
        match self {
            Clef::Treble => Clef::Bass,
            Clef::Bass => Clef::Treble,
        }
    }
}

/// Which staff (or both) questions are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClefMode {
    #[default]
    Treble,
    Bass,
    Grand,
}

impl ClefMode {
    /// Clefs covered by this mode, preferred clef first
    pub fn clefs(self) -> &'static [Clef] {
        match self {
            ClefMode::Treble => &[Clef::Treble],
            ClefMode::Bass => &[Clef::Bass],
            ClefMode::Grand => &[Clef::Treble, Clef::Bass],
        }
    }
}

/// A natural note at a fixed slot of one clef's staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffNote {
    pub index: u8,
    pub letter: NoteLetter,
    pub octave: i8,
    pub clef: Clef,
    pub is_ledger_line: bool,
}

impl StaffNote {
    pub fn midi_number(&self) -> u8 {
        ((self.octave as i32 + 1) * 12 + self.letter.semitone_offset()).clamp(0, 127) as u8
    }

    pub fn diatonic_index(&self) -> i32 {
        self.octave as i32 * 7 + self.letter.diatonic_offset()
    }

    /// Staff steps between two notes (always non-negative)
    pub fn diatonic_distance(&self, other: &StaffNote) -> i32 {
        (self.diatonic_index() - other.diatonic_index()).abs()
    }

    /// Scientific pitch name, e.g. "C4"
    pub fn name(&self) -> String {
        format!("{}{}", self.letter, self.octave)
    }
}

impl fmt::Display for StaffNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.octave)
    }
}
