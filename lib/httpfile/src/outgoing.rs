//! Request bodies as handed to hyper.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::{Frame, SizeHint};
use tokio::sync::oneshot;

use crate::{Body, Error, StreamingBody};

/// Largest frame cut from an in-memory body.
const CHUNK_SIZE: usize = 64 * 1024;

enum Source {
    Bytes(Bytes),
    Stream(StreamingBody),
}

/// A request body that reports when hyper has taken its last frame.
///
/// In-memory bodies are cut into frames of at most 64 KiB, so hyper pulls
/// them as the connection drains instead of all at once and the report
/// lands close to the end of the upload.
pub(crate) struct Outgoing {
    source: Source,
    done: bool,
    sent: Option<oneshot::Sender<()>>,
}

impl std::fmt::Debug for Outgoing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outgoing")
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl Outgoing {
    pub(crate) fn new(body: Body, sent: oneshot::Sender<()>) -> Self {
        let source = match body {
            Body::Empty => Source::Bytes(Bytes::new()),
            Body::Full(bytes) => Source::Bytes(bytes),
            Body::Stream(stream) => Source::Stream(stream),
        };
        let mut outgoing = Self {
            source,
            done: false,
            sent: Some(sent),
        };
        if matches!(&outgoing.source, Source::Bytes(bytes) if bytes.is_empty()) {
            outgoing.finish();
        }
        outgoing
    }

    fn finish(&mut self) {
        self.done = true;
        if let Some(sent) = self.sent.take() {
            // Nobody listens once the exchange is over
            let _ = sent.send(());
        }
    }
}

impl http_body::Body for Outgoing {
    type Data = Bytes;
    type Error = Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, Error>>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        let polled = match &mut this.source {
            Source::Bytes(bytes) => {
                let chunk = bytes.split_to(bytes.len().min(CHUNK_SIZE));
                Poll::Ready(Some(Ok(Frame::data(chunk))))
            }
            Source::Stream(stream) => stream
                .as_mut()
                .poll_next(cx)
                .map(|item| item.map(|chunk| chunk.map(Frame::data))),
        };

        let drained = matches!(&this.source, Source::Bytes(bytes) if bytes.is_empty());
        match &polled {
            Poll::Ready(None | Some(Err(_))) => this.finish(),
            Poll::Ready(Some(Ok(_))) if drained => this.finish(),
            _ => {}
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        self.done
    }

    fn size_hint(&self) -> SizeHint {
        match &self.source {
            Source::Bytes(bytes) => {
                SizeHint::with_exact(u64::try_from(bytes.len()).unwrap_or(u64::MAX))
            }
            Source::Stream(_) if self.done => SizeHint::with_exact(0),
            Source::Stream(_) => SizeHint::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use http_body::Body as _;
    use http_body_util::BodyExt;

    use super::*;
    use crate::Result;

    async fn next_data(body: &mut Outgoing) -> Option<Bytes> {
        let frame = body.frame().await?.ok()?;
        frame.into_data().ok()
    }

    #[tokio::test]
    async fn empty_body_is_sent_at_once() {
        let (tx, mut rx) = oneshot::channel();
        let mut body = Outgoing::new(Body::Empty, tx);

        check!(body.is_end_stream());
        check!(body.size_hint().exact() == Some(0));
        check!(rx.try_recv().is_ok());
        check!(next_data(&mut body).await.is_none());
    }

    #[tokio::test]
    async fn full_body_is_cut_into_frames() {
        let (tx, mut rx) = oneshot::channel();
        let data = Bytes::from(vec![7_u8; CHUNK_SIZE * 2 + 10]);
        let mut body = Outgoing::new(Body::Full(data), tx);

        check!(body.size_hint().exact() == Some(u64::try_from(CHUNK_SIZE * 2 + 10).unwrap_or(0)));

        let_assert!(Some(first) = next_data(&mut body).await);
        check!(first.len() == CHUNK_SIZE);
        let_assert!(Some(second) = next_data(&mut body).await);
        check!(second.len() == CHUNK_SIZE);
        check!(rx.try_recv().is_err());

        let_assert!(Some(last) = next_data(&mut body).await);
        check!(last.len() == 10);
        check!(body.is_end_stream());
        check!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn stream_body_reports_after_its_end() {
        let (tx, mut rx) = oneshot::channel();
        let chunks: Vec<Result<Bytes>> = vec![Ok(Bytes::from("ab")), Ok(Bytes::from("cd"))];
        let mut body = Outgoing::new(Body::from_stream(futures_util::stream::iter(chunks)), tx);

        check!(body.size_hint().exact().is_none());
        check!(next_data(&mut body).await.as_deref() == Some(&b"ab"[..]));
        check!(next_data(&mut body).await.as_deref() == Some(&b"cd"[..]));
        check!(rx.try_recv().is_err());

        check!(next_data(&mut body).await.is_none());
        check!(body.is_end_stream());
        check!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn failing_stream_reports_too() {
        let (tx, mut rx) = oneshot::channel();
        let chunks: Vec<Result<Bytes>> = vec![Err(Error::connection("reader failed"))];
        let mut body = Outgoing::new(Body::from_stream(futures_util::stream::iter(chunks)), tx);

        let_assert!(Some(Err(err)) = body.frame().await);
        check!(err.is_connection());
        check!(rx.try_recv().is_ok());
    }
}
