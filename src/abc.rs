//! # ABC Tempo Rewriting
//!
//! Line-oriented surgery on ABC notation source. The only field this module
//! touches is the tempo directive (`Q:`); every other line passes through
//! verbatim, in its original order.
//!
//! ## Rules
//! - If the source already carries a `Q:` line, every `Q:` line is rewritten
//!   to the new value. Replacing all occurrences avoids stale tempi in later
//!   passages of multi-section tunes.
//! - Otherwise a new directive is inserted immediately after the first `K:`
//!   (key/mode) line, which by convention ends the ABC header.
//! - Matching is anchored to the start of the line, so an inline `[Q:...]`
//!   field or a `Q:` buried in lyrics is never touched.
//!
//! ## Example
//! ```rust
//! use ceol::abc::set_tempo;
//!
//! let tune = "X:1\nK:Dmaj\nABcd efga";
//! assert_eq!(set_tempo(tune, 90), "X:1\nK:Dmaj\nQ:1/4=90\nABcd efga");
//! ```

use tracing::warn;

/// Reference note duration for injected tempo directives: `Q:1/4=<bpm>`
/// means `<bpm>` quarter notes per minute.
const TEMPO_UNIT: &str = "1/4";

fn is_tempo_line(line: &str) -> bool {
    line.starts_with("Q:")
}

fn is_key_line(line: &str) -> bool {
    line.starts_with("K:")
}

/// Set the playback tempo of an ABC tune, in quarter-note beats per minute.
///
/// Pure and idempotent: applying the same tempo twice yields the same text,
/// and no line other than a tempo directive is ever altered.
///
/// A tune with no `K:` line has no insertion anchor; the source is returned
/// unchanged and the condition is logged.
pub fn set_tempo(source: &str, tempo: u32) -> String {
    let directive = format!("Q:{}={}", TEMPO_UNIT, tempo);

    let mut out: Vec<&str> = Vec::new();
    if source.lines().any(is_tempo_line) {
        for line in source.lines() {
            if is_tempo_line(line) {
                out.push(&directive);
            } else {
                out.push(line);
            }
        }
    } else {
        let mut inserted = false;
        for line in source.lines() {
            out.push(line);
            // Only the first key line anchors the insertion; a mid-tune key
            // change must not grow a second directive.
            if !inserted && is_key_line(line) {
                out.push(&directive);
                inserted = true;
            }
        }
        if !inserted {
            warn!("no K: line in ABC source, tempo directive not inserted");
            return source.to_string();
        }
    }

    let mut result = out.join("\n");
    if source.ends_with('\n') {
        result.push('\n');
    }
    result
}
