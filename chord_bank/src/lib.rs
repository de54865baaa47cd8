//! # chord_bank
//!
//! Chord definitions for a six-string guitar in standard tuning.
//!
//! A chord file holds one chord per line:
//!
//! ```text
//! A:0|2|2|1|0|0
//! E:0|2|2|0|0|0
//! D:x|x|0|2|3|2
//! ```
//!
//! Each of the six `|`-separated entries is either `x` (string not played)
//! or a signed fret offset added to the open-string MIDI note of that
//! string.  Strings are listed low to high.
//!
//! ## Quick start
//!
//! ```rust
//! use chord_bank::ChordBank;
//!
//! let bank: ChordBank = "A:0|2|2|1|0|0\nE:0|2|2|0|0|0".parse().unwrap();
//! assert_eq!(bank.count(), 2);
//! assert_eq!(
//!     bank.note_offsets_for("A").unwrap(),
//!     &[Some(40), Some(47), Some(52), Some(56), Some(59), Some(64)],
//! );
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Tuning
// ════════════════════════════════════════════════════════════════════════════

/// Number of strings on the instrument.
pub const STRING_COUNT: usize = 6;

/// Open-string MIDI notes in standard tuning, low E to high E.
pub const STANDARD_TUNING: [u8; STRING_COUNT] = [40, 45, 50, 55, 59, 64];

/// Sentinel used by [`Chord::as_sentinel_notes`] for a muted string.
pub const MUTED: i16 = -1;

/// Resolved MIDI note per string; `None` means the string is not played.
pub type StringNotes = [Option<u8>; STRING_COUNT];

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Scientific pitch name for a MIDI note (`60` → `"C4"`).
pub fn note_name(note: u8) -> String {
    let octave = note as i32 / 12 - 1;
    format!("{}{}", NOTE_NAMES[(note % 12) as usize], octave)
}

// ════════════════════════════════════════════════════════════════════════════
// ChordError
// ════════════════════════════════════════════════════════════════════════════

/// Failure to build a [`ChordBank`].
#[derive(Error, Debug)]
pub enum ChordError {
    /// A line does not match `name:f1|f2|f3|f4|f5|f6`.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// The source contains no chords; at least one zone is required.
    #[error("chord file contains no chords")]
    Empty,

    /// The chord file could not be read.
    #[error("cannot read chord file: {0}")]
    Io(#[from] std::io::Error),
}

/// A fret offset that does not land on a MIDI note.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("string {string} fret {fret} resolves outside MIDI notes 0–127")]
pub struct FretOutOfRange {
    pub string: usize,
    pub fret:   i32,
}

// ════════════════════════════════════════════════════════════════════════════
// Chord
// ════════════════════════════════════════════════════════════════════════════

/// A named chord, one resolved note (or mute) per string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chord {
    pub name:         String,
    pub string_notes: StringNotes,
}

impl Chord {
    pub fn new(name: &str, string_notes: StringNotes) -> Self {
        Chord { name: name.to_string(), string_notes }
    }

    /// Build a chord from fret offsets relative to [`STANDARD_TUNING`].
    ///
    /// Fails when a resolved note falls outside the MIDI range 0–127.
    pub fn from_frets(name: &str, frets: [Option<i32>; STRING_COUNT]) -> Result<Self, FretOutOfRange> {
        let mut string_notes = [None; STRING_COUNT];
        for (string, fret) in frets.iter().enumerate() {
            if let Some(offset) = *fret {
                let note = (STANDARD_TUNING[string] as i32)
                    .checked_add(offset)
                    .filter(|n| (0..=127).contains(n))
                    .ok_or(FretOutOfRange { string, fret: offset })?;
                string_notes[string] = Some(note as u8);
            }
        }
        Ok(Chord::new(name, string_notes))
    }

    /// `(string index, note)` for every played string, low to high.
    pub fn played_notes(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.string_notes
            .iter()
            .enumerate()
            .filter_map(|(string, note)| note.map(|n| (string, n)))
    }

    /// Notes with muted strings written as [`MUTED`].
    pub fn as_sentinel_notes(&self) -> [i16; STRING_COUNT] {
        let mut out = [MUTED; STRING_COUNT];
        for (string, note) in self.played_notes() {
            out[string] = note as i16;
        }
        out
    }

    /// Inverse of [`Chord::as_sentinel_notes`]: any negative entry is muted.
    pub fn from_sentinel_notes(name: &str, notes: [i16; STRING_COUNT]) -> Self {
        let mut string_notes = [None; STRING_COUNT];
        for (string, &n) in notes.iter().enumerate() {
            if (0..=127).contains(&n) {
                string_notes[string] = Some(n as u8);
            }
        }
        Chord::new(name, string_notes)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for (string, note) in self.string_notes.iter().enumerate() {
            if string > 0 { write!(f, " ")?; }
            match note {
                Some(n) => write!(f, "{}", note_name(*n))?,
                None    => write!(f, "x")?,
            }
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ChordBank
// ════════════════════════════════════════════════════════════════════════════

/// All chords of a chord file, in file order.
///
/// The order matters: chord `i` is assigned to fretboard zone `i`, so
/// [`ChordBank::count`] fixes the number of zones.  A bank is never empty.
#[derive(Clone, Debug)]
pub struct ChordBank {
    chords: Vec<Chord>,
}

impl ChordBank {
    /// Read and parse a chord file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChordError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse chord definitions from text.  Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, ChordError> {
        let mut chords = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() { continue; }
            let chord = parse_line(line)
                .map_err(|reason| ChordError::Parse { line: idx + 1, reason })?;
            chords.push(chord);
        }
        Self::from_chords(chords)
    }

    /// Wrap already-resolved chords.
    pub fn from_chords(chords: Vec<Chord>) -> Result<Self, ChordError> {
        if chords.is_empty() {
            return Err(ChordError::Empty);
        }
        Ok(ChordBank { chords })
    }

    /// Number of chords (and therefore fretboard zones); always ≥ 1.
    pub fn count(&self) -> usize { self.chords.len() }

    /// Chord assigned to zone `index`.
    pub fn get(&self, index: usize) -> Option<&Chord> { self.chords.get(index) }

    /// First chord called `name`.
    pub fn chord(&self, name: &str) -> Option<&Chord> {
        self.chords.iter().find(|c| c.name == name)
    }

    /// Resolved MIDI notes of the chord called `name`.
    pub fn note_offsets_for(&self, name: &str) -> Option<&StringNotes> {
        self.chord(name).map(|c| &c.string_notes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chord> { self.chords.iter() }

    pub fn names(&self) -> Vec<&str> {
        self.chords.iter().map(|c| c.name.as_str()).collect()
    }
}

impl FromStr for ChordBank {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

/// Parse one trimmed, non-empty line.
fn parse_line(line: &str) -> Result<Chord, String> {
    let (name, frets) = line
        .split_once(':')
        .ok_or_else(|| format!("expected `name:f1|f2|f3|f4|f5|f6`, got {:?}", line))?;

    let name = name.trim();
    if name.is_empty() {
        return Err("chord name is empty".to_string());
    }

    let entries: Vec<&str> = frets.split('|').map(str::trim).collect();
    if entries.len() != STRING_COUNT {
        return Err(format!(
            "chord {:?} has {} entries, expected {}",
            name, entries.len(), STRING_COUNT
        ));
    }

    let mut parsed = [None; STRING_COUNT];
    for (string, entry) in entries.iter().enumerate() {
        if entry.eq_ignore_ascii_case("x") { continue; }
        let offset: i32 = entry.parse().map_err(|_| {
            format!("chord {:?} string {}: {:?} is neither `x` nor a fret number", name, string, entry)
        })?;
        parsed[string] = Some(offset);
    }

    Chord::from_frets(name, parsed).map_err(|e| format!("chord {:?}: {}", name, e))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_chord_file() {
        let bank = ChordBank::parse("A:0|2|2|1|0|0\nE:0|2|2|0|0|0").unwrap();
        assert_eq!(bank.count(), 2);
        assert_eq!(
            bank.note_offsets_for("A").unwrap(),
            &[Some(40), Some(47), Some(52), Some(56), Some(59), Some(64)]
        );
        assert_eq!(bank.names(), vec!["A", "E"]);
    }

    #[test]
    fn muted_strings() {
        let bank = ChordBank::parse("D:x|x|0|2|3|2").unwrap();
        let d = bank.get(0).unwrap();
        assert_eq!(d.string_notes, [None, None, Some(50), Some(57), Some(62), Some(66)]);
        assert_eq!(d.played_notes().count(), 4);
        assert_eq!(d.as_sentinel_notes(), [-1, -1, 50, 57, 62, 66]);
    }

    #[test]
    fn upper_case_mute_and_negative_offset() {
        let bank = ChordBank::parse("odd:X|-1|0|0|0|0").unwrap();
        assert_eq!(bank.get(0).unwrap().string_notes[0], None);
        assert_eq!(bank.get(0).unwrap().string_notes[1], Some(44));
    }

    #[test]
    fn blank_lines_and_whitespace_ignored() {
        let bank = ChordBank::parse("\n  G : 3 | 2 | 0 | 0 | 0 | 3  \n\n\r\nC:x|3|2|0|1|0\n").unwrap();
        assert_eq!(bank.count(), 2);
        assert_eq!(bank.get(0).unwrap().name, "G");
        assert_eq!(bank.get(0).unwrap().string_notes[5], Some(67));
    }

    #[test]
    fn empty_file_rejected() {
        assert!(matches!(ChordBank::parse(""), Err(ChordError::Empty)));
        assert!(matches!(ChordBank::parse("\n \n"), Err(ChordError::Empty)));
    }

    #[test]
    fn missing_colon_reports_line() {
        match ChordBank::parse("A:0|2|2|1|0|0\nE 0|2|2|0|0|0") {
            Err(ChordError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn wrong_entry_count_rejected() {
        assert!(matches!(
            ChordBank::parse("A:0|2|2|1|0"),
            Err(ChordError::Parse { line: 1, .. })
        ));
        assert!(ChordBank::parse("A:0|2|2|1|0|0|0").is_err());
    }

    #[test]
    fn non_numeric_entry_rejected() {
        assert!(ChordBank::parse("A:0|2|two|1|0|0").is_err());
        assert!(ChordBank::parse(":0|2|2|1|0|0").is_err());
    }

    #[test]
    fn out_of_range_note_rejected() {
        assert!(ChordBank::parse("low:-41|0|0|0|0|0").is_err());
        assert!(ChordBank::parse("high:0|0|0|0|0|64").is_err());
        assert!(ChordBank::parse("edge:-40|0|0|0|0|63").is_ok());
    }

    #[test]
    fn extreme_offsets_are_parse_errors() {
        for line in ["A:2147483647|0|0|0|0|0", "A:0|0|0|0|0|-2147483648"] {
            match ChordBank::parse(line) {
                Err(ChordError::Parse { line: 1, reason }) => assert!(reason.contains("0–127")),
                other => panic!("{:?} gave {:?}", line, other.map(|b| b.count())),
            }
        }
    }

    #[test]
    fn from_frets_reports_offending_string() {
        let err = Chord::from_frets("bad", [Some(0), Some(0), Some(0), Some(0), Some(0), Some(i32::MAX)]).unwrap_err();
        assert_eq!(err, FretOutOfRange { string: 5, fret: i32::MAX });
    }

    #[test]
    fn unknown_name_has_no_notes() {
        let bank = ChordBank::parse("A:0|2|2|1|0|0").unwrap();
        assert!(bank.note_offsets_for("Bm").is_none());
    }

    #[test]
    fn sentinel_round_trip() {
        let c = Chord::from_sentinel_notes("c", [40, -1, 52, -1, -1, 64]);
        assert_eq!(c.played_notes().map(|(s, _)| s).collect::<Vec<_>>(), vec![0, 2, 5]);
        assert_eq!(c.as_sentinel_notes(), [40, -1, 52, -1, -1, 64]);
    }

    #[test]
    fn note_names() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(40), "E2");
        assert_eq!(note_name(61), "C#4");
        assert_eq!(note_name(0), "C-1");
    }

    #[test]
    fn display_lists_names() {
        let bank = ChordBank::parse("D:x|x|0|2|3|2").unwrap();
        assert_eq!(bank.get(0).unwrap().to_string(), "D:x x D3 A3 D4 F#4");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        assert!(matches!(
            ChordBank::load("/definitely/not/here.chords"),
            Err(ChordError::Io(_))
        ));
    }
}
