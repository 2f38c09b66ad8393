//! Size-bounding of run output without losing grading data.
//!
//! Student code can print unbounded text, so stored logs keep only a head
//! and tail segment. The discarded middle is scanned for score lines first
//! and any found are reinserted at the truncation point, so running the
//! extractor over a truncated log grades the same as over the full text.

use score::has_score_prefix;

/// Size of the log head kept verbatim.
pub const MAX_LOG_SIZE: usize = 30_000;
/// Size of the log tail kept verbatim.
pub const LAST_SEGMENT_SIZE: usize = 1_000;
/// Upper bound on how much discarded middle is scanned for score lines.
pub const MAX_TO_SCAN: usize = 1_000_000;

/// Marks the spot where output was cut.
pub const TRUNCATION_MARKER: &str = "...";
/// Substituted for the score scan when the discarded middle is too large.
pub const SCAN_LIMIT_NOTICE: &str = "too much output to scan";

/// Truncates an oversized log to a head and tail segment, cut on line
/// boundaries so no line is ever split. Score lines found in the discarded
/// middle are reinserted verbatim at the cut, unless the middle exceeds
/// [`MAX_TO_SCAN`], in which case a notice is substituted.
pub fn truncate_log(full: &str) -> String {
    if full.len() <= MAX_LOG_SIZE + LAST_SEGMENT_SIZE {
        return full.to_string();
    }
    let bytes = full.as_bytes();
    // Cut points land just after a newline, so both cuts sit on char
    // boundaries and the kept segments hold only whole lines.
    let head_end = bytes[..MAX_LOG_SIZE]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let tail_floor = full.len() - LAST_SEGMENT_SIZE;
    let tail_start = bytes[tail_floor..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| tail_floor + i + 1)
        .unwrap_or(full.len());

    let head = &full[..head_end];
    let middle = &full[head_end..tail_start];
    let tail = &full[tail_start..];

    let mut rescued = String::new();
    if middle.len() > MAX_TO_SCAN {
        rescued.push_str(SCAN_LIMIT_NOTICE);
        rescued.push('\n');
    } else {
        for line in middle.lines() {
            if has_score_prefix(line) {
                rescued.push_str(line);
                rescued.push('\n');
            }
        }
    }

    let mut out = String::with_capacity(head.len() + rescued.len() + tail.len() + 8);
    out.push_str(head);
    out.push_str(TRUNCATION_MARKER);
    out.push('\n');
    if !rescued.is_empty() {
        out.push_str(&rescued);
        out.push_str(TRUNCATION_MARKER);
        out.push('\n');
    }
    out.push_str(tail);
    out
}
