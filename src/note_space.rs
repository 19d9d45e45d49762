//! # Note Space
//!
//! Static mapping between natural pitches and staff slots.
//!
//! Each clef has a pool of 17 slots. Slot 0 is the clef's anchor (A3 for treble,
//! C2 for bass) and every slot above it is the next letter in the C-D-E-F-G-A-B cycle,
//! so the five staff lines sit at slots 4, 6, 8, 10 and 12:
//!
//! ```text
//! slot    0  1  2  3  4  5  6  7  8  9  10 11 12 13 14 15 16
//! treble  A3 B3 C4 D4 E4 F4 G4 A4 B4 C5 D5 E5 F5 G5 A5 B5 C6
//! bass    C2 D2 E2 F2 G2 A2 B2 C3 D3 E3 F3 G3 A3 B3 C4 D4 E4
//! ```
//!
//! The grand pool is both clefs merged and sorted by diatonic index. All lookups here
//! are pure and never fail: a pitch missing from the requested clef resolves to the
//! nearest same-letter slot instead.

use std::ops::RangeInclusive;

use crate::note::{Clef, ClefMode, NoteLetter, StaffNote};

/// Number of slots per clef
pub const SLOT_COUNT: u8 = 17;

/// Highest slot index
pub const TOP_SLOT: u8 = SLOT_COUNT - 1;

/// MIDI numbers at or above this go to the treble staff in grand mode
pub const GRAND_SPLIT_MIDI: u8 = 60;

fn slot(clef: Clef, index: u8) -> StaffNote {
    let (anchor_letter, anchor_octave) = clef.anchor();
    let diatonic = anchor_octave as i32 * 7 + anchor_letter.diatonic_offset() + index as i32;
    StaffNote {
        index,
        letter: NoteLetter::from_diatonic_offset(diatonic),
        octave: diatonic.div_euclid(7) as i8,
        clef,
        is_ledger_line: index % 2 == 0 && !(4..=12).contains(&index),
    }
}

/// The 17 slots of one clef, lowest first
pub fn positions_for(clef: Clef) -> Vec<StaffNote> {
    (0..SLOT_COUNT).map(|i| slot(clef, i)).collect()
}

/// Treble and bass slots merged, sorted by diatonic index (treble first on equal pitch)
pub fn grand_positions() -> Vec<StaffNote> {
    let mut all = positions_for(Clef::Treble);
    all.extend(positions_for(Clef::Bass));
    all.sort_by_key(|n| n.diatonic_index());
    all
}

pub fn positions_for_mode(mode: ClefMode) -> Vec<StaffNote> {
    match mode {
        ClefMode::Treble => positions_for(Clef::Treble),
        ClefMode::Bass => positions_for(Clef::Bass),
        ClefMode::Grand => grand_positions(),
    }
}

/// Pool used when a requested pool would otherwise be empty
pub fn default_pool() -> Vec<StaffNote> {
    positions_for(Clef::Treble)
}

/// Candidate pool for a session: slots of `mode` within `range` whose letter is allowed.
///
/// An empty selection falls back to the whole pool of `mode`.
///
/// # Example
/// ```
/// use sightread::{note_space, ClefMode, NoteLetter};
///
/// let pool = note_space::pool(ClefMode::Treble, &[NoteLetter::E, NoteLetter::G], 4..=8);
/// let names: Vec<String> = pool.iter().map(|n| n.name()).collect();
/// assert_eq!(names, vec!["E4", "G4"]);
/// ```
pub fn pool(mode: ClefMode, letters: &[NoteLetter], range: RangeInclusive<u8>) -> Vec<StaffNote> {
    let selected: Vec<StaffNote> = positions_for_mode(mode)
        .into_iter()
        .filter(|n| range.contains(&n.index) && letters.contains(&n.letter))
        .collect();

    if selected.is_empty() {
        tracing::warn!(?mode, ?letters, ?range, "empty note pool, using every slot of the clef");
        return positions_for_mode(mode);
    }
    selected
}

/// Exact slot for a letter and octave.
///
/// In grand mode the clef is chosen by pitch (MIDI >= 60 treble, else bass) and the
/// other clef is tried when the pitch is not on the preferred one.
pub fn exact(letter: NoteLetter, octave: i8, mode: ClefMode) -> Option<StaffNote> {
    let find = |clef: Clef| {
        positions_for(clef)
            .into_iter()
            .find(|n| n.letter == letter && n.octave == octave)
    };

    match mode {
        ClefMode::Treble => find(Clef::Treble),
        ClefMode::Bass => find(Clef::Bass),
        ClefMode::Grand => {
            let preferred = preferred_clef(letter, octave);
            find(preferred).or_else(|| find(preferred.other()))
        }
    }
}

/// Clef a pitch belongs to on the grand staff
pub fn preferred_clef(letter: NoteLetter, octave: i8) -> Clef {
    let midi = (octave as i32 + 1) * 12 + letter.semitone_offset();
    if midi >= GRAND_SPLIT_MIDI as i32 {
        Clef::Treble
    } else {
        Clef::Bass
    }
}

/// Same-letter slot of `mode` closest to `target_diatonic` (lower slot wins ties)
pub fn nearest(letter: NoteLetter, target_diatonic: i32, mode: ClefMode) -> StaffNote {
    positions_for_mode(mode)
        .into_iter()
        .filter(|n| n.letter == letter)
        .min_by_key(|n| (n.diatonic_index() - target_diatonic).abs())
        // every 17-slot pool holds each letter at least twice
        .unwrap_or_else(|| slot(Clef::Treble, letter_slot_in_treble(letter)))
}

fn letter_slot_in_treble(letter: NoteLetter) -> u8 {
    // A3 is slot 0, so the letter's first appearance is its offset from A
    ((letter.diatonic_offset() - NoteLetter::A.diatonic_offset()).rem_euclid(7)) as u8
}

/// Slot for a letter and octave, falling back through the nearest same-letter slot.
///
/// In grand mode the fallback searches the pitch's preferred clef.
pub fn resolve(letter: NoteLetter, octave: i8, mode: ClefMode) -> StaffNote {
    if let Some(found) = exact(letter, octave, mode) {
        return found;
    }

    let target = octave as i32 * 7 + letter.diatonic_offset();
    let search_mode = match mode {
        ClefMode::Grand => match preferred_clef(letter, octave) {
            Clef::Treble => ClefMode::Treble,
            Clef::Bass => ClefMode::Bass,
        },
        other => other,
    };
    tracing::debug!(%letter, octave, ?mode, "pitch not on staff, using nearest slot");
    nearest(letter, target, search_mode)
}

/// Slot for a natural MIDI note, `None` for black keys or pitches off the staff
pub fn by_midi(midi: u8, mode: ClefMode) -> Option<StaffNote> {
    let letter = NoteLetter::from_semitone_offset(midi as i32)?;
    let octave = (midi as i32 / 12 - 1) as i8;
    exact(letter, octave, mode)
}

/// Slot of `letter` inside `range` to voice or display it.
///
/// With a previous note the slot nearest to it wins; otherwise the slot closest to the
/// middle of the range. When the range holds no slot of that letter, the nearest
/// same-letter slot anywhere in `mode` is used.
///
/// # Example
/// ```
/// use sightread::{note_space, ClefMode, NoteLetter};
///
/// // E appears at E4 (slot 4) and E5 (slot 11); without context the middle of 0..=16 wins
/// let e = note_space::preferred(ClefMode::Treble, NoteLetter::E, 0..=16, None);
/// assert_eq!(e.name(), "E5");
///
/// let d4 = note_space::exact(NoteLetter::D, 4, ClefMode::Treble).unwrap();
/// let e = note_space::preferred(ClefMode::Treble, NoteLetter::E, 0..=16, Some(&d4));
/// assert_eq!(e.name(), "E4");
/// ```
pub fn preferred(
    mode: ClefMode,
    letter: NoteLetter,
    range: RangeInclusive<u8>,
    previous: Option<&StaffNote>,
) -> StaffNote {
    let candidates: Vec<StaffNote> = positions_for_mode(mode)
        .into_iter()
        .filter(|n| n.letter == letter && range.contains(&n.index))
        .collect();

    let middle_twice = *range.start() as i32 + *range.end() as i32;

    let chosen = match previous {
        Some(prev) => candidates
            .iter()
            .min_by_key(|n| (n.diatonic_index() - prev.diatonic_index()).abs())
            .copied(),
        None => candidates
            .iter()
            .min_by_key(|n| (n.index as i32 * 2 - middle_twice).abs())
            .copied(),
    };

    chosen.unwrap_or_else(|| {
        let target = match previous {
            Some(prev) => prev.diatonic_index(),
            None => {
                let clef = mode.clefs()[0];
                let middle = (middle_twice / 2).clamp(0, TOP_SLOT as i32) as u8;
                slot(clef, middle).diatonic_index()
            }
        };
        nearest(letter, target, mode)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(notes: &[StaffNote]) -> Vec<String> {
        notes.iter().map(|n| n.name()).collect()
    }

    #[test]
    fn test_treble_pool_layout() {
        let treble = positions_for(Clef::Treble);
        assert_eq!(treble.len(), 17);
        assert_eq!(treble[0].name(), "A3");
        assert_eq!(treble[2].name(), "C4");
        assert_eq!(treble[16].name(), "C6");
        // staff lines E4 G4 B4 D5 F5
        let lines: Vec<String> = [4, 6, 8, 10, 12].iter().map(|&i| treble[i].name()).collect();
        assert_eq!(lines, vec!["E4", "G4", "B4", "D5", "F5"]);
    }

    #[test]
    fn test_bass_pool_layout() {
        let bass = positions_for(Clef::Bass);
        assert_eq!(bass[0].name(), "C2");
        assert_eq!(bass[16].name(), "E4");
        let lines: Vec<String> = [4, 6, 8, 10, 12].iter().map(|&i| bass[i].name()).collect();
        assert_eq!(lines, vec!["G2", "B2", "D3", "F3", "A3"]);
    }

    #[test]
    fn test_slots_step_one_letter_at_a_time() {
        for clef in [Clef::Treble, Clef::Bass] {
            let pool = positions_for(clef);
            for pair in pool.windows(2) {
                assert_eq!(pair[1].diatonic_index() - pair[0].diatonic_index(), 1);
                assert_eq!(pair[1].index, pair[0].index + 1);
            }
        }
    }

    #[test]
    fn test_ledger_line_flags() {
        let treble = positions_for(Clef::Treble);
        let flagged: Vec<u8> = treble.iter().filter(|n| n.is_ledger_line).map(|n| n.index).collect();
        assert_eq!(flagged, vec![0, 2, 14, 16]);
    }

    #[test]
    fn test_grand_pool_sorted() {
        let grand = grand_positions();
        assert_eq!(grand.len(), 34);
        for pair in grand.windows(2) {
            assert!(pair[0].diatonic_index() <= pair[1].diatonic_index());
        }
        assert_eq!(grand[0].name(), "C2");
        assert_eq!(grand[33].name(), "C6");
    }

    #[test]
    fn test_exact_and_grand_routing() {
        let c4 = exact(NoteLetter::C, 4, ClefMode::Grand).unwrap();
        assert_eq!(c4.clef, Clef::Treble);

        let b3 = exact(NoteLetter::B, 3, ClefMode::Grand).unwrap();
        assert_eq!(b3.clef, Clef::Bass);

        // C2 is only on the bass staff
        let c2 = exact(NoteLetter::C, 2, ClefMode::Grand).unwrap();
        assert_eq!(c2.clef, Clef::Bass);

        // C6 prefers treble and is there
        assert_eq!(exact(NoteLetter::C, 6, ClefMode::Grand).unwrap().index, 16);

        assert!(exact(NoteLetter::C, 2, ClefMode::Treble).is_none());
        assert!(exact(NoteLetter::C, 7, ClefMode::Grand).is_none());
    }

    #[test]
    fn test_resolve_falls_back_to_nearest_same_letter() {
        let g = resolve(NoteLetter::G, 2, ClefMode::Treble);
        assert_eq!(g.name(), "G4");

        let c = resolve(NoteLetter::C, 7, ClefMode::Grand);
        assert_eq!(c.name(), "C6");
        assert_eq!(c.clef, Clef::Treble);
    }

    #[test]
    fn test_by_midi() {
        assert_eq!(by_midi(60, ClefMode::Grand).unwrap().clef, Clef::Treble);
        assert_eq!(by_midi(59, ClefMode::Grand).unwrap().clef, Clef::Bass);
        assert!(by_midi(61, ClefMode::Grand).is_none());
        assert!(by_midi(24, ClefMode::Grand).is_none());
    }

    #[test]
    fn test_pool_filtering_and_fallback() {
        let pool = pool(ClefMode::Treble, &[NoteLetter::C], 0..=16);
        assert_eq!(names(&pool), vec!["C4", "C5", "C6"]);

        let empty = super::pool(ClefMode::Bass, &[NoteLetter::C], 1..=6);
        assert_eq!(empty.len(), 17);
    }

    #[test]
    fn test_preferred_uses_previous_note() {
        let a5 = exact(NoteLetter::A, 5, ClefMode::Treble).unwrap();
        let c = preferred(ClefMode::Treble, NoteLetter::C, 0..=16, Some(&a5));
        assert_eq!(c.name(), "C6");

        let a3 = exact(NoteLetter::A, 3, ClefMode::Treble).unwrap();
        let c = preferred(ClefMode::Treble, NoteLetter::C, 0..=16, Some(&a3));
        assert_eq!(c.name(), "C4");
    }

    #[test]
    fn test_preferred_outside_range_falls_back() {
        // no C between slots 3 and 8
        let c = preferred(ClefMode::Treble, NoteLetter::C, 3..=8, None);
        assert_eq!(c.letter, NoteLetter::C);
        assert_eq!(c.name(), "C4");
    }
}
