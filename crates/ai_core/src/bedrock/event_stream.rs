//! AWS event-stream framing for `invoke-with-response-stream`
//!
//! Frame layout (all integers big endian):
//!
//! ```text
//! | total len u32 | headers len u32 | prelude crc u32 | headers | payload | message crc u32 |
//! ```
//!
//! Frames arrive split across arbitrary HTTP chunks, so the decoder buffers
//! until a whole frame is present. Both CRC32 checksums are verified; the
//! prelude checksum before its lengths are trusted.

use std::collections::HashMap;
use std::fmt::Display;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::{Buf, Bytes, BytesMut};
use futures::future;
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::InvocationError;
use crate::ports::ChunkStream;

const PRELUDE_LEN: usize = 12;
const MESSAGE_CRC_LEN: usize = 4;
const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// One complete frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// String-valued headers; other header types are skipped
    pub headers: HashMap<String, String>,
    pub payload: Bytes,
}

impl Frame {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct ChunkPayload {
    bytes: String,
}

#[derive(Debug, Deserialize)]
struct ExceptionPayload {
    #[serde(default, alias = "Message")]
    message: Option<String>,
}

/// Reassembles frames from a byte stream
#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    buffer: BytesMut,
}

impl EventStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffered bytes not yet part of a complete frame
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Append bytes and return the payload of every `chunk` event completed by them
    pub fn decode(&mut self, data: &[u8]) -> Vec<Result<Bytes, InvocationError>> {
        self.buffer.extend_from_slice(data);

        let mut chunks = Vec::new();
        loop {
            match self.next_frame() {
                Ok(Some(frame)) => match chunk_bytes(&frame) {
                    Ok(Some(bytes)) => chunks.push(Ok(bytes)),
                    Ok(None) => {},
                    Err(e) => {
                        chunks.push(Err(e));
                        break;
                    },
                },
                Ok(None) => break,
                Err(e) => {
                    self.buffer.clear();
                    chunks.push(Err(e));
                    break;
                },
            }
        }
        chunks
    }

    /// Error for bytes left over once the body has ended
    pub fn finish(&mut self) -> Option<InvocationError> {
        if self.buffer.is_empty() {
            return None;
        }
        let left = self.buffer.len();
        self.buffer.clear();
        Some(InvocationError::Transport(format!(
            "stream ended inside an event-stream frame ({left} bytes left)"
        )))
    }

    /// Split off the next complete frame, if one is buffered
    pub fn next_frame(&mut self) -> Result<Option<Frame>, InvocationError> {
        if self.buffer.len() < PRELUDE_LEN {
            return Ok(None);
        }

        let mut prelude = &self.buffer[..PRELUDE_LEN];
        let total_len = prelude.get_u32() as usize;
        let headers_len = prelude.get_u32() as usize;
        let prelude_crc = prelude.get_u32();

        if crc32fast::hash(&self.buffer[..PRELUDE_LEN - 4]) != prelude_crc {
            return Err(InvocationError::invalid_response(
                "event-stream prelude checksum mismatch",
            ));
        }

        if total_len > MAX_FRAME_LEN || total_len < PRELUDE_LEN + headers_len + MESSAGE_CRC_LEN {
            return Err(InvocationError::invalid_response(format!(
                "malformed event-stream frame (total {total_len}, headers {headers_len})"
            )));
        }
        if self.buffer.len() < total_len {
            return Ok(None);
        }

        let message_end = total_len - MESSAGE_CRC_LEN;
        let mut trailer = &self.buffer[message_end..total_len];
        let message_crc = trailer.get_u32();
        if crc32fast::hash(&self.buffer[..message_end]) != message_crc {
            return Err(InvocationError::invalid_response(
                "event-stream message checksum mismatch",
            ));
        }

        let mut frame = self.buffer.split_to(total_len).freeze();
        frame.advance(PRELUDE_LEN);
        let headers = parse_headers(frame.split_to(headers_len))?;
        let payload = frame.split_to(total_len - PRELUDE_LEN - headers_len - MESSAGE_CRC_LEN);

        trace!(len = total_len, "Decoded event-stream frame");
        Ok(Some(Frame { headers, payload }))
    }
}

fn take(buf: &mut Bytes, len: usize) -> Result<Bytes, InvocationError> {
    if buf.remaining() < len {
        return Err(InvocationError::invalid_response(
            "truncated event-stream header",
        ));
    }
    Ok(buf.split_to(len))
}

fn parse_headers(mut buf: Bytes) -> Result<HashMap<String, String>, InvocationError> {
    let mut headers = HashMap::new();

    while buf.has_remaining() {
        let name_len = usize::from(take(&mut buf, 1)?.get_u8());
        let name = String::from_utf8_lossy(&take(&mut buf, name_len)?).into_owned();
        let value_type = take(&mut buf, 1)?.get_u8();

        match value_type {
            0 | 1 => {},
            2 => {
                take(&mut buf, 1)?;
            },
            3 => {
                take(&mut buf, 2)?;
            },
            4 => {
                take(&mut buf, 4)?;
            },
            5 | 8 => {
                take(&mut buf, 8)?;
            },
            9 => {
                take(&mut buf, 16)?;
            },
            6 | 7 => {
                let len = usize::from(take(&mut buf, 2)?.get_u16());
                let value = take(&mut buf, len)?;
                if value_type == 7 {
                    headers.insert(name, String::from_utf8_lossy(&value).into_owned());
                }
            },
            other => {
                return Err(InvocationError::invalid_response(format!(
                    "unknown event-stream header type {other}"
                )));
            },
        }
    }

    Ok(headers)
}

/// Extract the model chunk carried by a frame
///
/// Returns `None` for events that carry no model output.
pub fn chunk_bytes(frame: &Frame) -> Result<Option<Bytes>, InvocationError> {
    match frame.header(":message-type") {
        Some("event") => {
            if frame.header(":event-type") != Some("chunk") {
                debug!(event = ?frame.header(":event-type"), "Skipping event");
                return Ok(None);
            }
            let chunk: ChunkPayload =
                serde_json::from_slice(&frame.payload).map_err(InvocationError::invalid_response)?;
            let bytes = STANDARD
                .decode(chunk.bytes)
                .map_err(|e| InvocationError::invalid_response(format!("bad chunk encoding: {e}")))?;
            Ok(Some(Bytes::from(bytes)))
        },
        Some("exception") => {
            let kind = frame.header(":exception-type").unwrap_or("exception");
            let message = serde_json::from_slice::<ExceptionPayload>(&frame.payload)
                .ok()
                .and_then(|payload| payload.message)
                .unwrap_or_else(|| String::from_utf8_lossy(&frame.payload).into_owned());
            Err(InvocationError::Transport(format!("{kind}: {message}")))
        },
        Some("error") => {
            let code = frame.header(":error-code").unwrap_or("error");
            let message = frame.header(":error-message").unwrap_or_default();
            Err(InvocationError::Transport(format!("{code}: {message}")))
        },
        other => Err(InvocationError::invalid_response(format!(
            "unexpected event-stream message type {other:?}"
        ))),
    }
}

/// Decode an HTTP body stream into model chunks
pub fn create_stream<S, E>(body: S) -> ChunkStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let mut decoder = EventStreamDecoder::new();

    let chunk_stream = body
        .map(Some)
        .chain(stream::once(future::ready(None)))
        .map(move |item| match item {
            Some(Ok(bytes)) => decoder.decode(&bytes),
            Some(Err(e)) => vec![Err(InvocationError::Transport(format!("Stream error: {e}")))],
            None => decoder.finish().map(Err).into_iter().collect(),
        })
        .flat_map(stream::iter);

    Box::pin(chunk_stream)
}


#[cfg(test)]
mod tests {
    use bytes::{BufMut, BytesMut};

    use super::test_frames::{chunk_frame, exception_frame, frame};
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn decodes_single_chunk_event() {
        let mut decoder = EventStreamDecoder::new();
        let chunks = decoder.decode(&chunk_frame(r#"{"text":"a"}"#));

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap().as_ref(), br#"{"text":"a"}"#);
        assert_eq!(decoder.buffered(), 0);
    }

    #[test]
    fn reassembles_frames_split_across_reads() {
        let mut data = chunk_frame(r#"{"text":"a"}"#);
        data.extend(chunk_frame(r#"{"text":"b"}"#));

        let mut decoder = EventStreamDecoder::new();
        let (head, tail) = data.split_at(20);

        assert!(decoder.decode(head).is_empty());
        let chunks = decoder.decode(tail);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].as_ref().unwrap().as_ref(), br#"{"text":"b"}"#);
    }

    #[test]
    fn byte_at_a_time_still_decodes() {
        let data = chunk_frame(r#"{"generation":"x"}"#);
        let mut decoder = EventStreamDecoder::new();
        let mut chunks = Vec::new();
        for byte in &data {
            chunks.extend(decoder.decode(std::slice::from_ref(byte)));
        }
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn exception_frame_is_a_transport_error() {
        let mut decoder = EventStreamDecoder::new();
        let chunks = decoder.decode(&exception_frame("throttlingException", "Too many requests"));

        let err = chunks[0].as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(
            err.to_string(),
            "Transport error: throttlingException: Too many requests"
        );
    }

    #[test]
    fn non_chunk_events_are_skipped() {
        let mut decoder = EventStreamDecoder::new();
        let data = frame(
            &[(":message-type", "event"), (":event-type", "initial-response")],
            b"{}",
        );
        assert!(decoder.decode(&data).is_empty());
    }

    #[test]
    fn non_string_headers_are_skipped() {
        let mut headers = BytesMut::new();
        headers.put_u8(4);
        headers.put_slice(b"flag");
        headers.put_u8(0);
        headers.put_u8(3);
        headers.put_slice(b"num");
        headers.put_u8(4);
        headers.put_u32(7);
        headers.put_u8(13);
        headers.put_slice(b":message-type");
        headers.put_u8(7);
        headers.put_u16(5);
        headers.put_slice(b"event");

        let parsed = parse_headers(headers.freeze()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[":message-type"], "event");
    }

    #[test]
    fn impossible_lengths_are_rejected() {
        let mut data = BytesMut::new();
        data.put_u32(8);
        data.put_u32(100);
        data.put_u32(crc32fast::hash(&data));

        let mut decoder = EventStreamDecoder::new();
        let chunks = decoder.decode(&data);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_err());
        assert_eq!(decoder.buffered(), 0);
    }

    #[tokio::test]
    async fn stream_yields_chunks_in_order() {
        let mut data = chunk_frame(r#"{"text":"a"}"#);
        data.extend(chunk_frame(r#"{"text":"b"}"#));
        let (head, tail) = data.split_at(30);

        let body = stream::iter(vec![
            Ok::<_, std::io::Error>(Bytes::copy_from_slice(head)),
            Ok(Bytes::copy_from_slice(tail)),
        ]);

        let chunks: Vec<_> = create_stream(body).collect().await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].as_ref().unwrap().as_ref(), br#"{"text":"a"}"#);
    }

    #[tokio::test]
    async fn body_error_becomes_transport_error() {
        let body = stream::iter(vec![Err::<Bytes, _>(std::io::Error::other("reset"))]);
        let chunks: Vec<_> = create_stream(body).collect().await;
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].as_ref().unwrap_err().to_string().contains("reset"));
    }

    #[test]
    fn corrupted_prelude_is_rejected_before_lengths_are_trusted() {
        let mut data = chunk_frame(r#"{"text":"a"}"#);
        data[3] ^= 0xFF;

        let mut decoder = EventStreamDecoder::new();
        let chunks = decoder.decode(&data);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].as_ref().unwrap_err().to_string().contains("prelude checksum"));
        assert_eq!(decoder.buffered(), 0);
    }

    #[test]
    fn corrupted_payload_fails_message_checksum() {
        let mut data = chunk_frame(r#"{"text":"a"}"#);
        let last_payload_byte = data.len() - 5;
        data[last_payload_byte] ^= 0x01;

        let chunks = EventStreamDecoder::new().decode(&data);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].as_ref().unwrap_err().to_string().contains("message checksum"));
    }

    #[test]
    fn finish_reports_partial_frame() {
        let data = chunk_frame(r#"{"text":"a"}"#);
        let mut decoder = EventStreamDecoder::new();
        assert!(decoder.decode(&data[..data.len() - 3]).is_empty());

        let err = decoder.finish().unwrap();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(decoder.buffered(), 0);
        assert!(decoder.finish().is_none());
    }

    #[tokio::test]
    async fn body_ending_mid_frame_ends_with_transport_error() {
        let mut data = chunk_frame(r#"{"generation":"Dre"}"#);
        let second = chunk_frame(r#"{"generation":"ams"}"#);
        data.extend_from_slice(&second[..second.len() / 2]);

        let body = stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from(data))]);
        let chunks: Vec<_> = create_stream(body).collect().await;

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].as_ref().unwrap().as_ref(), br#"{"generation":"Dre"}"#);
        assert!(
            chunks[1]
                .as_ref()
                .unwrap_err()
                .to_string()
                .contains("inside an event-stream frame")
        );
    }

    #[tokio::test]
    async fn cut_stream_is_not_a_result_for_transport_close_providers() {
        use crate::providers::{Llama2Codec, StreamTermination};
        use crate::streaming::decode_stream;
        use std::sync::Arc;

        let mut data = chunk_frame(r#"{"generation":"Dre","stop_reason":null}"#);
        let second = chunk_frame(r#"{"generation":"ams","stop_reason":null}"#);
        data.extend_from_slice(&second[..second.len() / 2]);

        let body = stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from(data))]);
        let events: Vec<_> = decode_stream(
            create_stream(body),
            Arc::new(Llama2Codec),
            StreamTermination::TransportClose,
        )
        .collect()
        .await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].as_ref().unwrap().text, "Dre");
        assert_eq!(events[1].as_ref().unwrap_err().kind(), ErrorKind::Transport);
    }
}
