//! Transcript assembly from decoded segments.

use crate::whisper::Segment;

/// Join segment texts into the final transcript.
///
/// Each text is trimmed, empty texts are dropped, and the remainder is
/// joined with single spaces. The result never carries leading or trailing
/// whitespace.
pub fn assemble(segments: &[Segment]) -> String {
    let parts: Vec<&str> = segments
        .iter()
        .map(|seg| seg.text.trim())
        .filter(|text| !text.is_empty())
        .collect();

    parts.join(" ")
}
