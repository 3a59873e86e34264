//! Streaming JSON parse
//!
//! [`JsonStreamParser`] accumulates raw text chunks and recovers a
//! best-effort partial value after each one; [`parse_json_stream`]
//! drives it over an async chunk stream.

use futures::{Stream, StreamExt};
use serde_json::Value;

use crate::error::{LodestarError, Result};

use super::{json::JsonOutputParser, OutputParser};

/// Lifecycle of one streaming parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// No chunk received yet
    Empty,

    /// Chunks are arriving; partial values are being recomputed
    Accumulating,

    /// End-of-stream reached and the final strict parse succeeded
    Complete,

    /// The final strict parse failed; terminal
    Failed,
}

/// Incremental parser over an accumulating text buffer
///
/// Each parse owns its private accumulator; it is never shared between
/// streams. Dropping the parser abandons the accumulator without
/// finalizing any partial result.
#[derive(Debug)]
pub struct JsonStreamParser {
    parser: JsonOutputParser,
    buffer: String,
    state: StreamState,
    last: Option<Value>,
}

impl JsonStreamParser {
    /// Create a parser in the [`StreamState::Empty`] state
    pub fn new() -> Self {
        Self {
            parser: JsonOutputParser::new(),
            buffer: String::new(),
            state: StreamState::Empty,
            last: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Latest best-effort partial value, if any prefix was decodable
    pub fn partial(&self) -> Option<&Value> {
        self.last.as_ref()
    }

    /// Append a chunk and recompute the partial value.
    ///
    /// Returns the partial when it extends the previously returned one;
    /// `Ok(None)` when no further progress is decodable yet. Decode
    /// failures are suppressed here: only [`finish`](Self::finish) can
    /// report a malformed document.
    ///
    /// # Errors
    ///
    /// Returns [`LodestarError::Configuration`] when the stream was
    /// already finished.
    pub fn push(&mut self, chunk: &str) -> Result<Option<Value>> {
        if matches!(self.state, StreamState::Complete | StreamState::Failed) {
            return Err(LodestarError::Configuration(
                "push after end-of-stream".to_string(),
            ));
        }

        self.state = StreamState::Accumulating;
        self.buffer.push_str(chunk);

        // Re-evaluate the full accumulated text, not the delta
        match self.parser.parse_partial(&self.buffer) {
            Some(value) if self.last.as_ref() != Some(&value) => {
                self.last = Some(value.clone());
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }

    /// Signal end-of-stream and strictly parse the accumulated text.
    ///
    /// # Errors
    ///
    /// Returns [`LodestarError::Parse`] when the complete document is
    /// malformed; the parser then stays in [`StreamState::Failed`].
    pub fn finish(&mut self) -> Result<Value> {
        match self.parser.parse(&self.buffer) {
            Ok(value) => {
                self.state = StreamState::Complete;
                self.last = Some(value.clone());
                Ok(value)
            }
            Err(e) => {
                self.state = StreamState::Failed;
                Err(e)
            }
        }
    }
}

impl Default for JsonStreamParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an async stream of text chunks into a stream of JSON values.
///
/// Yields each newly-extended partial value as chunks arrive, then the
/// strict final value (or a parse error) at end-of-stream. Dropping the
/// returned stream abandons the accumulator; no partial result is
/// finalized.
pub fn parse_json_stream<S>(chunks: S) -> impl Stream<Item = Result<Value>> + Send
where
    S: Stream<Item = String> + Send + 'static,
{
    async_stream::stream! {
        let mut parser = JsonStreamParser::new();
        let mut chunks = Box::pin(chunks);

        while let Some(chunk) = chunks.next().await {
            match parser.push(&chunk) {
                Ok(Some(partial)) => yield Ok(partial),
                Ok(None) => {}
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }

        yield parser.finish();
    }
}
