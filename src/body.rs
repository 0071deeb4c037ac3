//! Response body duplication.
//!
//! A body stream can only be read once. `tee` drains it into a buffer and
//! hands back a replay body, so the bytes can be inspected and still be sent
//! to the client unchanged.

use axum::body::Body;
use bytes::{Bytes, BytesMut};
use futures_util::{stream, StreamExt};
use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use thiserror::Error;

/// Why a body could not be buffered. The replay body is still deliverable.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("body exceeds buffer limit of {limit} bytes")]
    TooLarge { limit: usize },

    #[error("body stream failed: {0}")]
    Stream(String),
}

/// Whether the body carries any bytes worth digesting.
pub fn is_present(body: &Body) -> bool {
    !body.is_end_stream() && body.size_hint().exact() != Some(0)
}

/// Split `body` into a replay body and, when it fits in `limit`, a full copy.
///
/// When buffering stops early the replay body yields what was already read
/// followed by the rest of the stream, or by the stream's error. Trailers
/// are not carried over.
pub async fn tee(mut body: Body, limit: usize) -> (Body, Result<Bytes, BodyError>) {
    if body
        .size_hint()
        .upper()
        .is_some_and(|upper| upper > limit as u64)
    {
        return (body, Err(BodyError::TooLarge { limit }));
    }

    let mut buffered = BytesMut::new();
    while let Some(frame) = body.frame().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                let reason = e.to_string();
                let replay = stream::iter([Ok(buffered.freeze()), Err(e)]);
                return (Body::from_stream(replay), Err(BodyError::Stream(reason)));
            }
        };

        let Ok(data) = frame.into_data() else {
            continue;
        };
        buffered.extend_from_slice(&data);

        if buffered.len() > limit {
            let prefix = stream::iter([Ok::<_, axum::Error>(buffered.freeze())]);
            let replay = prefix.chain(body.into_data_stream());
            return (Body::from_stream(replay), Err(BodyError::TooLarge { limit }));
        }
    }

    let bytes = buffered.freeze();
    (Body::from(bytes.clone()), Ok(bytes))
}
