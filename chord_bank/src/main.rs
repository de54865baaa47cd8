//! Validate a chord file and show how each chord resolves on the fretboard.
//!
//! Usage: `chord_check <CHORD_FILE>`

use chord_bank::{note_name, ChordBank, STANDARD_TUNING, STRING_COUNT};

fn main() {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: chord_check <CHORD_FILE>");
        std::process::exit(2);
    };

    let bank = match ChordBank::load(&path) {
        Ok(b)  => b,
        Err(e) => {
            eprintln!("{}: {}", path, e);
            std::process::exit(1);
        }
    };

    println!();
    println!("  ┌─ {} ({} chords → {} zones) ─", path, bank.count(), bank.count());
    print!("  │  {:<8}", "tuning");
    for open in STANDARD_TUNING {
        print!(" {:>4}", note_name(open));
    }
    println!();
    println!("  │");

    for (zone, chord) in bank.iter().enumerate() {
        print!("  │  {:<8}", chord.name);
        for string in 0..STRING_COUNT {
            match chord.string_notes[string] {
                Some(n) => print!(" {:>4}", note_name(n)),
                None    => print!(" {:>4}", "x"),
            }
        }
        println!("   zone {}", zone);
    }
    println!("  └─");
    println!();
}
