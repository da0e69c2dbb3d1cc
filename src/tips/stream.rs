//! Pull-based reader turning a streamed completion into chef tip fragments
//!
//! [`TipStream`] is a small state machine:
//!
//! ```text
//! Connecting --ok--> Streaming --end of body--> Finished
//!     |                  |
//!     +--error/timeout---+--error/timeout--> Fallback --exhausted--> Finished
//! ```
//!
//! Every failure is absorbed: the consumer receives a finite sequence of
//! fragments and never an error.

use crate::api::{
    parse_sse_line, ApiError, ByteStream, LineBuffer, SseEvent, Utf8Decoder,
};
use crate::fallback::FallbackTips;
use futures_util::future::BoxFuture;
use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

/// Resolves to the response body once the request has been accepted
pub type ConnectFuture = BoxFuture<'static, Result<ByteStream, ApiError>>;

/// Bounds on how long the reader waits for the transport
#[derive(Debug, Clone, Copy)]
pub struct StreamTimeouts {
    /// Until the response status is known
    pub connect: Duration,
    /// For each body chunk
    pub chunk: Duration,
}

impl Default for StreamTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(15),
            chunk: Duration::from_secs(30),
        }
    }
}

enum ReaderState {
    Connecting(ConnectFuture),
    Streaming(ByteStream),
    Fallback(std::slice::Iter<'static, &'static str>),
    Finished,
}

/// Lazy, ordered sequence of text fragments of the chef's answer.
///
/// Nothing is sent until the first call to [`TipStream::next_delta`].
/// Dropping the stream closes the connection.
pub struct TipStream {
    state: ReaderState,
    decoder: Utf8Decoder,
    lines: LineBuffer,
    /// Deltas parsed from the current chunk, not yet handed out
    ready: VecDeque<String>,
    fallback: &'static FallbackTips,
    timeouts: StreamTimeouts,
    delivered: usize,
    used_fallback: bool,
}

impl TipStream {
    fn with_state(state: ReaderState, fallback: &'static FallbackTips, timeouts: StreamTimeouts) -> Self {
        Self {
            state,
            decoder: Utf8Decoder::new(),
            lines: LineBuffer::new(),
            ready: VecDeque::new(),
            fallback,
            timeouts,
            delivered: 0,
            used_fallback: false,
        }
    }

    /// Canned tips only, one item per tip
    pub fn fallback(fallback: &'static FallbackTips) -> Self {
        let mut stream = Self::with_state(ReaderState::Finished, fallback, StreamTimeouts::default());
        stream.switch_to_fallback();
        stream
    }

    /// Read the body produced by `connect` once it resolves
    pub fn connect(
        connect: ConnectFuture,
        fallback: &'static FallbackTips,
        timeouts: StreamTimeouts,
    ) -> Self {
        Self::with_state(ReaderState::Connecting(connect), fallback, timeouts)
    }

    /// Read an already opened body
    pub fn from_body(body: ByteStream, fallback: &'static FallbackTips, timeouts: StreamTimeouts) -> Self {
        Self::with_state(ReaderState::Streaming(body), fallback, timeouts)
    }

    /// Number of fragments handed out so far
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Whether canned tips were (or are being) served
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    pub fn is_finished(&self) -> bool {
        self.ready.is_empty() && matches!(self.state, ReaderState::Finished)
    }

    /// Produce the next fragment, or None once the sequence is exhausted.
    ///
    /// Not cancel-safe: dropping a pending call ends the sequence.
    pub async fn next_delta(&mut self) -> Option<String> {
        let delta = self.advance().await;
        if delta.is_some() {
            self.delivered += 1;
        }
        delta
    }

    async fn advance(&mut self) -> Option<String> {
        loop {
            if let Some(delta) = self.ready.pop_front() {
                return Some(delta);
            }

            match std::mem::replace(&mut self.state, ReaderState::Finished) {
                ReaderState::Connecting(connect) => {
                    match timeout(self.timeouts.connect, connect).await {
                        Ok(Ok(body)) => {
                            debug!("Chef tips stream opened");
                            self.state = ReaderState::Streaming(body);
                        }
                        Ok(Err(ApiError::MissingCredential)) => {
                            debug!("No API key configured, serving fallback tips");
                            self.switch_to_fallback();
                        }
                        Ok(Err(e)) => {
                            warn!("Chef tips request failed, serving fallback tips: {}", e);
                            self.switch_to_fallback();
                        }
                        Err(_) => {
                            warn!(
                                "Chef tips request failed, serving fallback tips: {}",
                                ApiError::Timeout("response")
                            );
                            self.switch_to_fallback();
                        }
                    }
                }
                ReaderState::Streaming(mut body) => {
                    let next = timeout(self.timeouts.chunk, body.next()).await;
                    match next {
                        Ok(Some(Ok(chunk))) => {
                            self.consume(&chunk);
                            self.state = ReaderState::Streaming(body);
                        }
                        Ok(Some(Err(e))) => {
                            warn!(
                                "Chef tips stream interrupted after {} fragments, appending fallback tips: {}",
                                self.delivered, e
                            );
                            self.abandon_body(body);
                        }
                        Ok(None) => {
                            self.finish_body();
                        }
                        Err(_) => {
                            warn!(
                                "Chef tips stream interrupted after {} fragments, appending fallback tips: {}",
                                self.delivered,
                                ApiError::Timeout("next chunk")
                            );
                            self.abandon_body(body);
                        }
                    }
                }
                ReaderState::Fallback(mut tips) => {
                    if let Some(tip) = tips.next() {
                        self.state = ReaderState::Fallback(tips);
                        return Some((*tip).to_string());
                    }
                }
                ReaderState::Finished => return None,
            }
        }
    }

    /// Decode one chunk and queue the text of every completed `data: ` line
    fn consume(&mut self, chunk: &[u8]) {
        let text = self.decoder.decode(chunk);
        for line in self.lines.push(&text) {
            match parse_sse_line(&line) {
                Some(SseEvent::TextDelta(delta)) => self.ready.push_back(delta),
                Some(SseEvent::Done) => trace!("Chef tips stream sent [DONE]"),
                None => {}
            }
        }
    }

    fn finish_body(&mut self) {
        let partial = self.lines.discard();
        if !partial.is_empty() {
            trace!("Dropping unterminated line at end of stream ({} bytes)", partial.len());
        }
        let dropped = self.decoder.finish();
        if dropped > 0 {
            trace!("Dropping {} undecodable bytes at end of stream", dropped);
        }
        debug!("Chef tips stream finished after {} fragments", self.delivered);
    }

    fn abandon_body(&mut self, body: ByteStream) {
        // Release the connection before serving canned tips
        drop(body);
        self.lines.discard();
        self.decoder.finish();
        self.switch_to_fallback();
    }

    fn switch_to_fallback(&mut self) {
        self.used_fallback = true;
        self.state = ReaderState::Fallback(self.fallback.tips.iter());
    }

    /// Adapt into a [`Stream`] of fragments
    pub fn into_stream(self) -> impl Stream<Item = String> + Send {
        stream::unfold(self, |mut tips| async move {
            tips.next_delta().await.map(|delta| (delta, tips))
        })
    }

    /// Drain the whole sequence into one string
    pub async fn collect_text(mut self) -> String {
        let mut text = String::new();
        while let Some(delta) = self.next_delta().await {
            text.push_str(&delta);
        }
        text
    }
}
