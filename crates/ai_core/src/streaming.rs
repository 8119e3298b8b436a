//! Incremental decoding of streamed responses

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, trace};

use crate::error::InvocationError;
use crate::ports::{ChunkStream, EventStream};
use crate::providers::{ProviderCodec, StreamTermination};

struct DecodeState<C: ?Sized> {
    chunks: ChunkStream,
    codec: Arc<C>,
    termination: StreamTermination,
    done: bool,
}

/// Turn raw transport chunks into stream events
///
/// Each chunk is decoded on its own as soon as it arrives. The sequence ends
/// after a final event, after the first error, or when the transport closes.
/// A provider that marks its last chunk and closes without sending it yields
/// one transport error instead of ending quietly.
pub fn decode_stream<C>(
    chunks: ChunkStream,
    codec: Arc<C>,
    termination: StreamTermination,
) -> EventStream
where
    C: ProviderCodec + ?Sized,
{
    let state = DecodeState {
        chunks,
        codec,
        termination,
        done: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        if state.done {
            return None;
        }

        match state.chunks.next().await {
            Some(Ok(bytes)) => {
                trace!(len = bytes.len(), "Decoding stream chunk");
                let event = state.codec.decode_chunk(&bytes);
                state.done = event.as_ref().map_or(true, |event| event.is_final);
                Some((event, state))
            },
            Some(Err(e)) => {
                state.done = true;
                Some((Err(e), state))
            },
            None => {
                state.done = true;
                match state.termination {
                    StreamTermination::TransportClose => {
                        debug!("Stream closed by transport");
                        None
                    },
                    StreamTermination::FinalMarker => Some((
                        Err(InvocationError::Transport(
                            "stream closed before the final chunk".to_string(),
                        )),
                        state,
                    )),
                }
            },
        }
    }))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use domain::StreamEvent;

    use super::*;
    use crate::error::ErrorKind;
    use crate::providers::{CohereCommandCodec, Llama2Codec};

    fn chunks(items: Vec<Result<&'static str, InvocationError>>) -> ChunkStream {
        Box::pin(stream::iter(
            items
                .into_iter()
                .map(|item| item.map(|s| Bytes::from_static(s.as_bytes()))),
        ))
    }

    #[tokio::test]
    async fn ends_after_final_chunk() {
        let source = chunks(vec![
            Ok(r#"{"text":"a","is_finished":false}"#),
            Ok(r#"{"text":"b","is_finished":false}"#),
            Ok(r#"{"text":"c","is_finished":true}"#),
            Ok(r#"{"text":"ignored","is_finished":false}"#),
        ]);

        let events: Vec<_> =
            decode_stream(source, Arc::new(CohereCommandCodec), StreamTermination::FinalMarker)
                .collect()
                .await;

        assert_eq!(events.len(), 3);
        let events: Vec<StreamEvent> = events.into_iter().map(Result::unwrap).collect();
        assert_eq!(events[0].text, "a");
        assert_eq!(events[1].text, "b");
        assert_eq!(events[2].text, "c");
        assert!(!events[1].is_final);
        assert!(events[2].is_final);
    }

    #[tokio::test]
    async fn undecodable_chunk_ends_with_one_error() {
        let source = chunks(vec![
            Ok(r#"{"text":"a","is_finished":false}"#),
            Ok("{garbage"),
            Ok(r#"{"text":"c","is_finished":true}"#),
        ]);

        let events: Vec<_> =
            decode_stream(source, Arc::new(CohereCommandCodec), StreamTermination::FinalMarker)
                .collect()
                .await;

        assert_eq!(events.len(), 2);
        assert!(events[0].is_ok());
        assert_eq!(events[1].as_ref().unwrap_err().kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn transport_error_mid_stream_ends_the_sequence() {
        let source = chunks(vec![
            Ok(r#"{"text":"a","is_finished":false}"#),
            Err(InvocationError::Transport("connection reset".into())),
            Ok(r#"{"text":"c","is_finished":true}"#),
        ]);

        let events: Vec<_> =
            decode_stream(source, Arc::new(CohereCommandCodec), StreamTermination::FinalMarker)
                .collect()
                .await;

        assert_eq!(events.len(), 2);
        assert!(events[1].as_ref().unwrap_err().to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn early_close_without_final_marker_is_an_error() {
        let source = chunks(vec![Ok(r#"{"text":"a","is_finished":false}"#)]);

        let events: Vec<_> =
            decode_stream(source, Arc::new(CohereCommandCodec), StreamTermination::FinalMarker)
                .collect()
                .await;

        assert_eq!(events.len(), 2);
        let err = events[1].as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().contains("before the final chunk"));
    }

    #[tokio::test]
    async fn transport_close_ends_quietly() {
        let source = chunks(vec![
            Ok(r#"{"generation":"Dre","stop_reason":null}"#),
            Ok(r#"{"generation":"ams","stop_reason":null}"#),
        ]);

        let events: Vec<_> =
            decode_stream(source, Arc::new(Llama2Codec), StreamTermination::TransportClose)
                .collect()
                .await;

        let texts: Vec<_> = events.into_iter().map(|e| e.unwrap().text).collect();
        assert_eq!(texts, ["Dre", "ams"]);
    }

    #[tokio::test]
    async fn empty_stream_with_transport_close_yields_nothing() {
        let events: Vec<_> = decode_stream(
            chunks(Vec::new()),
            Arc::new(Llama2Codec),
            StreamTermination::TransportClose,
        )
        .collect()
        .await;
        assert!(events.is_empty());
    }
}
