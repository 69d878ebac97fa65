//! State machine turning response body chunks into text fragments.
//!
//! The assembler owns the stream buffer for one in-flight request. Each
//! framed line resolves to a [`LineOutcome`]; a data line whose JSON does
//! not parse is held (not spliced back into the buffer) and retried before
//! any other line once more bytes arrive.
//!
//! Malformed-line policy, identical in both passes: a payload that fails to
//! parse is treated as cut short and retried when more input arrives. Once
//! the body is exhausted no more input can arrive, so during [`finish`] a
//! payload that still fails is dropped with a warning.
//!
//! [`finish`]: StreamAssembler::finish

use tracing::{debug, warn};

use claimchat_types::error::ChatError;

use super::decoder::Utf8ChunkDecoder;
use super::event::{classify_line, extract_delta, Delta, LineKind};
use super::framer::LineFramer;

/// Signals emitted to the consumer of the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSignal {
    /// A non-empty text fragment, in arrival order.
    Fragment(String),
    /// The `data: [DONE]` terminator was seen.
    Done,
}

/// Outcome of processing a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Payload did not parse; wait for more bytes.
    NeedMoreInput,
    Fragment(String),
    /// Comment, blank, unused field, or a control event without text.
    Skip,
    StreamEnded,
}

/// Incremental assembler for one response body.
#[derive(Debug, Default)]
pub struct StreamAssembler {
    decoder: Utf8ChunkDecoder,
    framer: LineFramer,
    /// A line whose payload failed to parse, retried first on the next pass.
    held: Option<String>,
    ended: bool,
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the terminator has been seen. Further input is ignored.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Feed one body chunk and collect the signals it completes.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<StreamSignal> {
        if self.ended {
            return Vec::new();
        }
        self.decoder.decode(chunk, self.framer.buffer_mut());
        self.drain_lines(false)
    }

    /// Signal that the body is exhausted and flush whatever is buffered.
    ///
    /// The unterminated final line, if any, is processed as a complete line.
    /// Fails only if the body ended inside a multi-byte character.
    pub fn finish(&mut self) -> Result<Vec<StreamSignal>, ChatError> {
        if self.ended {
            return Ok(Vec::new());
        }
        self.decoder.finish()?;
        Ok(self.drain_lines(true))
    }

    fn drain_lines(&mut self, flushing: bool) -> Vec<StreamSignal> {
        let mut signals = Vec::new();

        loop {
            let line = match self.held.take().or_else(|| self.framer.next_line()) {
                Some(line) => line,
                None if flushing => match self.framer.take_remainder() {
                    Some(line) => line,
                    None => break,
                },
                None => break,
            };

            match process_line(&line) {
                LineOutcome::Skip => {}
                LineOutcome::Fragment(text) => signals.push(StreamSignal::Fragment(text)),
                LineOutcome::StreamEnded => {
                    debug!("stream terminator received");
                    self.ended = true;
                    signals.push(StreamSignal::Done);
                    break;
                }
                LineOutcome::NeedMoreInput if flushing => {
                    warn!(line_len = line.len(), "dropping unparseable data line at end of stream");
                }
                LineOutcome::NeedMoreInput => {
                    debug!(line_len = line.len(), "data line incomplete, waiting for more input");
                    self.held = Some(line);
                    break;
                }
            }
        }

        signals
    }
}

/// Run one line through the event filter and delta extractor.
pub fn process_line(line: &str) -> LineOutcome {
    match classify_line(line) {
        LineKind::Ignored => LineOutcome::Skip,
        LineKind::Terminator => LineOutcome::StreamEnded,
        LineKind::Data(payload) => match extract_delta(payload) {
            Delta::Text(text) => LineOutcome::Fragment(text),
            Delta::NoContent => LineOutcome::Skip,
            Delta::Incomplete => LineOutcome::NeedMoreInput,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_line(text: &str) -> String {
        format!(
            "data: {}\n",
            serde_json::json!({ "choices": [{ "index": 0, "delta": { "content": text } }] })
        )
    }

    fn sample_stream() -> String {
        let mut body = String::new();
        body.push_str(": OPENROUTER PROCESSING\n\n");
        body.push_str("data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n");
        for piece in ["In ", "Ontario, ", "the limitation ", "period is ", "two years — ", "généralement."] {
            body.push_str(&chunk_line(piece));
            body.push('\n');
        }
        body.push_str("data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n");
        body.push_str("data: [DONE]\n\n");
        body
    }

    const SAMPLE_TEXT: &str = "In Ontario, the limitation period is two years — généralement.";

    fn run(chunks: &[&[u8]]) -> (String, bool) {
        let mut assembler = StreamAssembler::new();
        let mut signals = Vec::new();
        for chunk in chunks {
            signals.extend(assembler.push_chunk(chunk));
        }
        signals.extend(assembler.finish().unwrap());

        let mut text = String::new();
        let mut done = false;
        for signal in signals {
            match signal {
                StreamSignal::Fragment(t) => text.push_str(&t),
                StreamSignal::Done => done = true,
            }
        }
        (text, done)
    }

    #[test]
    fn test_split_json_across_chunks() {
        let (text, done) = run(&[
            b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel",
            b"lo\"}}]}\n",
            b"data: [DONE]\n",
        ]);
        assert_eq!(text, "Hello");
        assert!(done);
    }

    #[test]
    fn test_whole_stream_in_one_chunk() {
        let body = sample_stream();
        let (text, done) = run(&[body.as_bytes()]);
        assert_eq!(text, SAMPLE_TEXT);
        assert!(done);
    }

    #[test]
    fn test_every_fixed_chunk_size_gives_same_text() {
        let body = sample_stream();
        let bytes = body.as_bytes();
        for size in 1..=bytes.len() {
            let chunks: Vec<&[u8]> = bytes.chunks(size).collect();
            let (text, done) = run(&chunks);
            assert_eq!(text, SAMPLE_TEXT, "chunk size {size}");
            assert!(done, "chunk size {size}");
        }
    }

    #[test]
    fn test_data_line_split_at_every_offset() {
        let line = chunk_line("Réponse complète");
        let bytes = line.as_bytes();
        for offset in 0..=bytes.len() {
            let (head, tail) = bytes.split_at(offset);
            let (text, _) = run(&[head, tail, b"data: [DONE]\n"]);
            assert_eq!(text, "Réponse complète", "split at byte {offset}");
        }
    }

    #[test]
    fn test_comments_and_done_only_yield_nothing() {
        let (text, done) = run(&[b":keep-alive\n\n: ping\n", b"data: [DONE]\n"]);
        assert!(text.is_empty());
        assert!(done);
    }

    #[test]
    fn test_input_after_terminator_is_ignored() {
        let mut assembler = StreamAssembler::new();
        let signals = assembler.push_chunk(
            format!("data: [DONE]\n{}", chunk_line("late")).as_bytes(),
        );
        assert_eq!(signals, vec![StreamSignal::Done]);
        assert!(assembler.is_ended());
        assert!(assembler.push_chunk(chunk_line("later").as_bytes()).is_empty());
        assert!(assembler.finish().unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_final_line_is_flushed() {
        let mut assembler = StreamAssembler::new();
        let line = chunk_line("tail");
        let unterminated = line.trim_end_matches('\n');
        assert!(assembler.push_chunk(unterminated.as_bytes()).is_empty());
        assert_eq!(
            assembler.finish().unwrap(),
            vec![StreamSignal::Fragment("tail".to_string())]
        );
    }

    #[test]
    fn test_malformed_line_is_held_and_blocks_later_lines() {
        let mut assembler = StreamAssembler::new();
        let mut input = String::from("data: {not json\n");
        input.push_str(&chunk_line("after"));

        assert!(assembler.push_chunk(input.as_bytes()).is_empty());
        // Retried first on the next chunk, still malformed, still blocking.
        assert!(assembler.push_chunk(b": ping\n").is_empty());

        // At end of stream the malformed line is dropped and the rest flows.
        assert_eq!(
            assembler.finish().unwrap(),
            vec![StreamSignal::Fragment("after".to_string())]
        );
    }

    #[test]
    fn test_process_line_outcomes() {
        assert_eq!(process_line(":hb"), LineOutcome::Skip);
        assert_eq!(process_line("data: [DONE]"), LineOutcome::StreamEnded);
        assert_eq!(process_line("data: {\"choices\""), LineOutcome::NeedMoreInput);
        assert_eq!(
            process_line(chunk_line("x").trim_end()),
            LineOutcome::Fragment("x".to_string())
        );
    }
}
