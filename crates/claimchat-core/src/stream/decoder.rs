//! Streaming-safe UTF-8 decoding of response body chunks.

use claimchat_types::error::ChatError;

/// Decodes byte chunks into text, holding back an incomplete multi-byte
/// sequence at the end of a chunk until the next chunk completes it.
///
/// Invalid sequences (as opposed to merely split ones) decode to
/// U+FFFD, the same as a non-fatal text decoder.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk`, appending every complete character to `out`.
    pub fn decode(&mut self, chunk: &[u8], out: &mut String) {
        self.pending.extend_from_slice(chunk);

        let mut rest: &[u8] = &self.pending;
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        // Unexpected end of input: a split character.
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        let tail = rest.to_vec();
        self.pending = tail;
    }

    /// Number of bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Signal end of input.
    ///
    /// Fails if the stream ended in the middle of a multi-byte character.
    pub fn finish(&mut self) -> Result<(), ChatError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let len = self.pending.len();
        self.pending.clear();
        Err(ChatError::Decode(format!(
            "stream ended with {len} byte(s) of an incomplete UTF-8 sequence"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ascii_passes_through() {
        let mut decoder = Utf8ChunkDecoder::new();
        let mut out = String::new();
        decoder.decode(b"data: hi\n", &mut out);
        assert_eq!(out, "data: hi\n");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_split_character_is_held_until_completed() {
        // "é" is 0xC3 0xA9; "€" is 0xE2 0x82 0xAC.
        let mut decoder = Utf8ChunkDecoder::new();
        let mut out = String::new();

        decoder.decode(b"caf\xC3", &mut out);
        assert_eq!(out, "caf");
        assert_eq!(decoder.pending_len(), 1);

        decoder.decode(b"\xA9 \xE2", &mut out);
        assert_eq!(out, "café ");

        decoder.decode(b"\x82", &mut out);
        decoder.decode(b"\xAC", &mut out);
        assert_eq!(out, "café €");
        assert!(!out.contains(char::REPLACEMENT_CHARACTER));
        assert!(decoder.finish().is_ok());
    }

    #[test]
    fn test_every_byte_split_matches_whole_decode() {
        let text = "Réclamation — dommages: 10 000 $ ✓";
        let mut decoder = Utf8ChunkDecoder::new();
        let mut out = String::new();
        for byte in text.as_bytes() {
            decoder.decode(std::slice::from_ref(byte), &mut out);
        }
        assert_eq!(out, text);
    }

    #[test]
    fn test_invalid_byte_becomes_replacement_character() {
        let mut decoder = Utf8ChunkDecoder::new();
        let mut out = String::new();
        decoder.decode(b"a\xFFb", &mut out);
        assert_eq!(out, "a\u{FFFD}b");
        assert!(decoder.finish().is_ok());
    }

    #[test]
    fn test_finish_mid_sequence_is_an_error() {
        let mut decoder = Utf8ChunkDecoder::new();
        let mut out = String::new();
        decoder.decode(b"ok\xE2\x82", &mut out);
        assert_eq!(out, "ok");
        assert!(matches!(decoder.finish(), Err(ChatError::Decode(_))));
    }
}
