//! Incremental event-stream parsing.
//!
//! Bytes flow through four stages, leaves first:
//!
//! 1. [`decoder::Utf8ChunkDecoder`] -- bytes to text, holding split code points
//! 2. [`framer::LineFramer`] -- text to complete lines
//! 3. [`event::classify_line`] / [`event::extract_delta`] -- lines to payloads
//!    and payloads to text fragments
//! 4. [`assembler::StreamAssembler`] -- the state machine tying them together
//!
//! [`fragments`] adapts a response body into a stream of [`StreamSignal`]s.

pub mod assembler;
pub mod decoder;
pub mod event;
pub mod framer;

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use claimchat_types::error::ChatError;

use crate::chat::transport::ByteStream;

pub use self::assembler::{StreamAssembler, StreamSignal};

/// Map a response body to a stream of [`StreamSignal`]s.
///
/// Reads are issued one at a time, in arrival order. The stream ends right
/// after [`StreamSignal::Done`]; the body is dropped at that point and no
/// further reads are made. When the body is exhausted without a terminator
/// the assembler is flushed so an unterminated final line is not lost.
pub fn fragments(
    body: ByteStream,
) -> Pin<Box<dyn Stream<Item = Result<StreamSignal, ChatError>> + Send + 'static>> {
    Box::pin(async_stream::try_stream! {
        let mut body = body;
        let mut assembler = StreamAssembler::new();
        let mut terminated = false;

        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            for signal in assembler.push_chunk(&chunk) {
                terminated = signal == StreamSignal::Done;
                yield signal;
            }
            if terminated {
                break;
            }
        }

        if !terminated {
            for signal in assembler.finish()? {
                yield signal;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(chunks: Vec<&'static [u8]>) -> ByteStream {
        Box::pin(futures_util::stream::iter(
            chunks.into_iter().map(|c| Ok(c.to_vec())),
        ))
    }

    async fn collect(body: ByteStream) -> Vec<Result<StreamSignal, ChatError>> {
        fragments(body).collect().await
    }

    #[tokio::test]
    async fn test_stops_reading_after_terminator() {
        let events = collect(body(vec![
            b"data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n",
            b"data: [DONE]\n",
            b"data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n",
        ]))
        .await;

        let signals: Vec<StreamSignal> = events.into_iter().map(Result::unwrap).collect();
        assert_eq!(
            signals,
            vec![StreamSignal::Fragment("Hi".to_string()), StreamSignal::Done]
        );
    }

    #[tokio::test]
    async fn test_flushes_unterminated_final_line() {
        let events = collect(body(vec![
            b"data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\n",
            b"data: {\"choices\":[{\"delta\":{\"content\":\"B\"}}]}",
        ]))
        .await;

        let signals: Vec<StreamSignal> = events.into_iter().map(Result::unwrap).collect();
        assert_eq!(
            signals,
            vec![
                StreamSignal::Fragment("A".to_string()),
                StreamSignal::Fragment("B".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_body_error_is_propagated() {
        let body: ByteStream = Box::pin(futures_util::stream::iter(vec![
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\n".to_vec()),
            Err(ChatError::Stream("connection reset".to_string())),
        ]));
        let events = collect(body).await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Ok(StreamSignal::Fragment(ref t)) if t == "A"));
        assert!(matches!(events[1], Err(ChatError::Stream(_))));
    }

    #[tokio::test]
    async fn test_dangling_multibyte_sequence_is_a_decode_error() {
        // First two bytes of a three-byte character, then end of stream.
        let events = collect(body(vec![b"data: [\"\xE2\x82"])).await;
        assert!(matches!(events.last(), Some(Err(ChatError::Decode(_)))));
    }
}
