//! Line-based three-way merge of files, similar to `git merge-file`.
//!
//! ```sh
//! cargo run --example merge-file -- current.txt ancestor.txt next.txt [previous|next|current]
//! ```
//!
//! Prints the merged file and reports conflicts on stderr.

use std::{env, error::Error, fs, process::ExitCode};

use reconcile_sequence::{Fallback, LogLevel, MergeConfig, merge};

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let arguments = env::args().skip(1).collect::<Vec<_>>();
    let [current, ancestor, next, rest @ ..] = arguments.as_slice() else {
        eprintln!("Usage: merge-file <current> <ancestor> <next> [previous|next|current]");
        return Ok(ExitCode::from(2));
    };

    let fallback = match rest.first() {
        Some(fallback) => fallback.parse::<Fallback>()?,
        None => Fallback::default(),
    };

    let current = fs::read_to_string(current)?;
    let ancestor = fs::read_to_string(ancestor)?;
    let next = fs::read_to_string(next)?;

    let result = merge(
        &lines(&ancestor),
        &lines(&next),
        &lines(&current),
        &MergeConfig::new(fallback),
    );

    for entry in result.log().entries() {
        let level = match entry.level {
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        };
        eprintln!("{level}: {}", entry.message);
    }

    for conflict in result.conflicts() {
        eprintln!(
            "conflict at line {}: {} ancestor, {} next and {} current lines, resolved with {fallback}",
            conflict.index() + 1,
            conflict.previous_elements().len(),
            conflict.next_elements().len(),
            conflict.current_elements().len(),
        );
    }

    match result.merged() {
        Some(merged) => {
            print!("{}", merged.concat());
            Ok(ExitCode::from(u8::try_from(result.conflicts().len()).unwrap_or(u8::MAX)))
        }
        None => {
            eprintln!("The merge needs a decision, the current file was emptied");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Splits keeping the line endings so that joining restores the text.
fn lines(text: &str) -> Vec<&str> { text.split_inclusive('\n').collect() }
