use regex::Regex;

use super::interface::{TranscriptSegment, TranscriptionResult};

/// Grammar for one line of engine stdout:
///
/// ```text
/// line := '[' TIMESTAMP ' --> ' TIMESTAMP ']' text
///       | text
/// TIMESTAMP := HH ':' MM ':' SS '.' mmm
/// ```
///
/// A leading bracketed timestamp pair becomes the segment timing and the
/// trimmed remainder its text; a line without the prefix is a whole-line
/// segment; blank lines are skipped.
const TIMESTAMPED_LINE: &str =
    r"^\[(\d{2,}):(\d{2}):(\d{2})\.(\d{3}) --> (\d{2,}):(\d{2}):(\d{2})\.(\d{3})\]\s*(.*)$";

/// Parse accumulated engine stdout into an ordered transcript.
///
/// Line order is emission order; it is preserved as-is.
pub fn parse_transcript(stdout: &str) -> TranscriptionResult {
    let pattern = Regex::new(TIMESTAMPED_LINE).unwrap();
    let mut segments = Vec::new();

    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match pattern.captures(line) {
            Some(caps) => {
                let text = caps[9].trim();
                if text.is_empty() {
                    continue;
                }
                segments.push(TranscriptSegment {
                    text: text.to_string(),
                    start_ms: timestamp_ms(&caps[1], &caps[2], &caps[3], &caps[4]),
                    end_ms: timestamp_ms(&caps[5], &caps[6], &caps[7], &caps[8]),
                });
            }
            None => segments.push(TranscriptSegment::text_only(line)),
        }
    }

    TranscriptionResult::new(segments)
}

fn timestamp_ms(hours: &str, minutes: &str, seconds: &str, millis: &str) -> Option<u64> {
    let hours: u64 = hours.parse().ok()?;
    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;
    let millis: u64 = millis.parse().ok()?;
    Some(((hours * 60 + minutes) * 60 + seconds) * 1000 + millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamped_lines_become_timed_segments() {
        let stdout = "[00:00:00.000 --> 00:00:02.500]  Hello there.\n\
                      [00:00:02.500 --> 00:00:04.000]  General Kenobi.\n";
        let result = parse_transcript(stdout);

        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.segments[0].text, "Hello there.");
        assert_eq!(result.segments[0].start_ms, Some(0));
        assert_eq!(result.segments[0].end_ms, Some(2500));
        assert_eq!(result.segments[1].text, "General Kenobi.");
        assert_eq!(result.segments[1].start_ms, Some(2500));
        assert_eq!(result.segments[1].end_ms, Some(4000));
    }

    #[test]
    fn plain_lines_become_untimed_segments() {
        let result = parse_transcript("just some text\nanother line\n");

        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.segments[0], TranscriptSegment::text_only("just some text"));
        assert_eq!(result.segments[0].start_ms, None);
    }

    #[test]
    fn blank_lines_and_empty_segments_are_skipped() {
        let stdout = "\n[00:00:00.000 --> 00:00:01.000]   \n\nhello\n\n";
        let result = parse_transcript(stdout);

        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].text, "hello");
    }

    #[test]
    fn emission_order_is_preserved() {
        let stdout = "[00:00:05.000 --> 00:00:06.000] later\n\
                      [00:00:01.000 --> 00:00:02.000] earlier\n";
        let result = parse_transcript(stdout);

        // Whatever the engine emitted first stays first, even with
        // out-of-order timestamps.
        assert_eq!(result.segments[0].text, "later");
        assert_eq!(result.segments[1].text, "earlier");
    }

    #[test]
    fn hours_beyond_two_digits_parse() {
        let stdout = "[100:00:00.000 --> 100:00:01.000] marathon\n";
        let result = parse_transcript(stdout);

        assert_eq!(result.segments[0].start_ms, Some(100 * 3600 * 1000));
    }

    #[test]
    fn flatten_joins_segments_with_newlines() {
        let result = parse_transcript("first\nsecond\n");
        assert_eq!(result.flatten(), "first\nsecond");
    }

    #[test]
    fn empty_stdout_yields_empty_transcript() {
        let result = parse_transcript("");
        assert!(result.is_empty());
        assert_eq!(result.flatten(), "");
    }
}
