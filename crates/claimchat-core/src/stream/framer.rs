//! Newline framing over the decoded text buffer.

/// Splits a growing text buffer into complete lines.
///
/// A line is only yielded once its `\n` terminator has arrived; whatever
/// follows the last terminator stays buffered for the next chunk. Consumed
/// lines are tracked by offset and removed in one go before the next append.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: String,
    /// Start of the unconsumed text in `buffer`.
    read: usize,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable access to the buffer so the decoder can append in place.
    pub fn buffer_mut(&mut self) -> &mut String {
        self.compact();
        &mut self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.read == self.buffer.len()
    }

    /// Take the next complete line, without its terminator or trailing `\r`.
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.buffer[self.read..].find('\n')? + self.read;
        let mut line = self.buffer[self.read..end].to_string();
        self.read = end + 1;
        strip_carriage_return(&mut line);
        Some(line)
    }

    /// Take whatever is left as a final, unterminated line.
    pub fn take_remainder(&mut self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let mut line = self.buffer.split_off(self.read);
        self.buffer.clear();
        self.read = 0;
        strip_carriage_return(&mut line);
        Some(line)
    }

    fn compact(&mut self) {
        if self.read > 0 {
            self.buffer.drain(..self.read);
            self.read = 0;
        }
    }
}

fn strip_carriage_return(line: &mut String) {
    if line.ends_with('\r') {
        line.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yields_complete_lines_only() {
        let mut framer = LineFramer::new();
        framer.buffer_mut().push_str("one\ntwo\nthr");
        assert_eq!(framer.next_line().as_deref(), Some("one"));
        assert_eq!(framer.next_line().as_deref(), Some("two"));
        assert_eq!(framer.next_line(), None);

        framer.buffer_mut().push_str("ee\n");
        assert_eq!(framer.next_line().as_deref(), Some("three"));
        assert!(framer.is_empty());
    }

    #[test]
    fn test_strips_carriage_return() {
        let mut framer = LineFramer::new();
        framer.buffer_mut().push_str("data: x\r\n\r\n");
        assert_eq!(framer.next_line().as_deref(), Some("data: x"));
        assert_eq!(framer.next_line().as_deref(), Some(""));
    }

    #[test]
    fn test_take_remainder() {
        let mut framer = LineFramer::new();
        framer.buffer_mut().push_str("done\ntrailing\r");
        assert_eq!(framer.next_line().as_deref(), Some("done"));
        assert_eq!(framer.take_remainder().as_deref(), Some("trailing"));
        assert_eq!(framer.take_remainder(), None);
    }

    #[test]
    fn test_many_lines_in_one_chunk_are_consumed_in_place() {
        let mut framer = LineFramer::new();
        let chunk: String = (0..1000).map(|i| format!("data: {i}\n")).collect();
        framer.buffer_mut().push_str(&chunk);
        framer.buffer_mut().push_str("tail");

        for i in 0..1000 {
            assert_eq!(framer.next_line(), Some(format!("data: {i}")));
        }
        assert_eq!(framer.next_line(), None);
        assert!(!framer.is_empty());

        // Consumed lines are dropped before the next append.
        assert_eq!(framer.buffer_mut().as_str(), "tail");
        framer.buffer_mut().push_str("\n");
        assert_eq!(framer.next_line().as_deref(), Some("tail"));
        assert!(framer.is_empty());
    }
}
