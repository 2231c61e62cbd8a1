//! Streaming response assembly.
//!
//! Filters the engine's chunk stream down to displayable fragments and
//! concatenates them, in arrival order, into the final assistant text.
//! Pacing belongs to the engine; nothing is buffered beyond the
//! concatenation and nothing is reordered.

use futures::stream::{self, Stream, StreamExt};
use chat_types::{ChatError, Result};
use crate::ports::ResponseChunk;

/// Lazy, finite, non-restartable stream of non-empty content fragments.
///
/// Ends at `Done` or when the engine stream ends. An engine error is
/// yielded once as `ChatError::Stream` and terminates the stream.
pub fn fragments<S>(chunks: S) -> impl Stream<Item = Result<String>>
where
    S: Stream<Item = ResponseChunk> + Unpin,
{
    stream::unfold(Some(chunks), |state| async move {
        let mut chunks = state?;
        loop {
            match chunks.next().await {
                Some(ResponseChunk::Content(text)) if !text.is_empty() => {
                    return Some((Ok(text), Some(chunks)));
                }
                Some(ResponseChunk::Content(_)) | Some(ResponseChunk::Metadata(_)) => continue,
                Some(ResponseChunk::Error(message)) => {
                    return Some((Err(ChatError::Stream(message)), None));
                }
                Some(ResponseChunk::Done) | None => return None,
            }
        }
    })
}

/// Drive `chunks` to completion, handing each fragment to `on_fragment`
/// as it arrives, and return the accumulated text.
///
/// On a mid-stream error nothing is returned but the error; fragments
/// already forwarded stay forwarded.
pub async fn assemble<S, F>(chunks: S, mut on_fragment: F) -> Result<String>
where
    S: Stream<Item = ResponseChunk> + Unpin,
    F: FnMut(&str),
{
    let fragments = fragments(chunks);
    futures::pin_mut!(fragments);

    let mut text = String::new();
    let mut count = 0usize;
    while let Some(fragment) = fragments.next().await {
        let fragment = fragment?;
        on_fragment(&fragment);
        text.push_str(&fragment);
        count += 1;
    }

    log::debug!("Assembled {} fragments ({} bytes)", count, text.len());
    Ok(text)
}
