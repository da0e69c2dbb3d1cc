//! Chunk-boundary-safe text decoding for streamed response bodies
//!
//! Transport chunks can end anywhere, including inside a multi-byte UTF-8
//! character or in the middle of an SSE line. [`Utf8Decoder`] carries the
//! incomplete character over to the next chunk and [`LineBuffer`] carries
//! the incomplete line.

use std::borrow::Cow;

/// Incremental UTF-8 decoder
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    /// Bytes of a character that is not complete yet (at most 3)
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk. Invalid sequences become U+FFFD; an incomplete
    /// sequence at the end of the chunk is kept for the next call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // `valid` is well-formed, so this borrows without replacing anything
                    if let Cow::Borrowed(s) = String::from_utf8_lossy(valid) {
                        out.push_str(s);
                    }

                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Bytes held back waiting for the rest of a character
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// End of stream: drop any incomplete trailing character.
    /// Returns the number of bytes discarded.
    pub fn finish(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}

/// Accumulates decoded text and hands out complete lines.
///
/// After every [`LineBuffer::push`] the buffer holds only the trailing partial
/// line, which never contains a newline.
#[derive(Debug, Default)]
pub struct LineBuffer {
    partial: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text and return every line it completed, without the `\n`
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.partial.push_str(text);

        let Some(last_newline) = self.partial.rfind('\n') else {
            return Vec::new();
        };

        let tail = self.partial.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.partial, tail);

        complete[..last_newline]
            .split('\n')
            .map(str::to_string)
            .collect()
    }

    /// The unterminated trailing line
    pub fn partial(&self) -> &str {
        &self.partial
    }

    /// End of stream: an unterminated line is not actionable and is dropped.
    /// Returns what was discarded.
    pub fn discard(&mut self) -> String {
        std::mem::take(&mut self.partial)
    }
}
