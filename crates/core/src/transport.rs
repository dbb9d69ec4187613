//! Transport layer: one connection per command, newline-terminated frames.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const READ_CHUNK: usize = 4096;
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Moves one encoded request to the host and returns the raw response frame.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send `payload` (already newline-terminated) and return the bytes the
    /// host answered with.
    async fn exchange(&self, payload: &[u8]) -> BridgeResult<Vec<u8>>;

    /// Human-readable endpoint, for logs.
    fn endpoint(&self) -> String;
}

/// Plain TCP transport. Every exchange opens and closes its own connection.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    host: String,
    port: u16,
    connect_timeout: Duration,
    io_timeout: Option<Duration>,
    max_response_bytes: usize,
}

impl TcpTransport {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            connect_timeout: config.connect_timeout(),
            io_timeout: config.io_timeout(),
            max_response_bytes: config.max_response_bytes,
        }
    }

    async fn connect(&self) -> BridgeResult<TcpStream> {
        let addr = self.endpoint();
        match tokio::time::timeout(
            self.connect_timeout,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(source)) => Err(BridgeError::Connect { addr, source }),
            Err(_) => Err(BridgeError::Timeout {
                stage: "connecting",
                after: self.connect_timeout,
            }),
        }
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn exchange(&self, payload: &[u8]) -> BridgeResult<Vec<u8>> {
        let mut stream = self.connect().await?;

        with_timeout(self.io_timeout, "sending request", stream.write_all(payload)).await??;
        let frame = with_timeout(
            self.io_timeout,
            "reading response",
            read_frame(&mut stream, self.max_response_bytes),
        )
        .await??;

        // Best effort; the response is already in hand.
        if let Err(e) = stream.shutdown().await {
            debug!(error = %e, "Socket shutdown failed");
        }

        Ok(frame)
    }

    fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

async fn with_timeout<F: Future>(
    limit: Option<Duration>,
    stage: &'static str,
    fut: F,
) -> BridgeResult<F::Output> {
    match limit {
        Some(after) => tokio::time::timeout(after, fut)
            .await
            .map_err(|_| BridgeError::Timeout { stage, after }),
        None => Ok(fut.await),
    }
}

/// Read until the accumulated buffer ends with `\n` or the peer closes.
///
/// The host does not length-prefix responses; a trailing newline at a read
/// boundary is the only frame delimiter.
pub async fn read_frame<R>(reader: &mut R, max_bytes: usize) -> BridgeResult<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
        if buffer.ends_with(b"\n") {
            break;
        }
        if buffer.len() > max_bytes {
            return Err(BridgeError::FrameTooLarge { limit: max_bytes });
        }
    }

    Ok(buffer)
}

/// Strip an optional UTF-8 byte-order mark and surrounding whitespace.
pub fn frame_text(frame: &[u8]) -> BridgeResult<&str> {
    let bytes = frame.strip_prefix(UTF8_BOM).unwrap_or(frame);
    Ok(std::str::from_utf8(bytes)?.trim())
}

/// Decode a response frame into JSON.
pub fn decode_response(frame: &[u8]) -> BridgeResult<Value> {
    let text = frame_text(frame)?;
    if text.is_empty() {
        return Err(BridgeError::EmptyResponse);
    }
    serde_json::from_str(text).map_err(BridgeError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;
    use tokio::net::TcpListener;

    /// Yields exactly one queued chunk per read call.
    struct ChunkedReader {
        chunks: VecDeque<Vec<u8>>,
        reads: usize,
    }

    impl ChunkedReader {
        fn new(chunks: &[&[u8]]) -> Self {
            Self {
                chunks: chunks.iter().map(|c| c.to_vec()).collect(),
                reads: 0,
            }
        }
    }

    impl AsyncRead for ChunkedReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            self.reads += 1;
            if let Some(chunk) = self.chunks.pop_front() {
                buf.put_slice(&chunk);
            }
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_read_frame_single_chunk() {
        let mut reader = ChunkedReader::new(&[b"{\"success\":true}\n"]);
        let frame = read_frame(&mut reader, 1024).await.unwrap();
        assert_eq!(frame, b"{\"success\":true}\n");
    }

    #[tokio::test]
    async fn test_read_frame_multi_chunk_matches_single_chunk() {
        let payload: &[u8] = b"{\"success\":true,\"data\":{\"name\":\"Doc\",\"componentCount\":2}}\n";

        let mut single = ChunkedReader::new(&[payload]);
        let mut split = ChunkedReader::new(&[&payload[..7], &payload[7..30], &payload[30..]]);

        let a = read_frame(&mut single, 1024).await.unwrap();
        let b = read_frame(&mut split, 1024).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(decode_response(&a).unwrap(), decode_response(&b).unwrap());
    }

    #[tokio::test]
    async fn test_read_frame_stops_at_trailing_newline() {
        // Anything queued after the newline-terminated chunk is never read
        let mut reader = ChunkedReader::new(&[b"{\"a\":1}\n", b"garbage"]);
        let frame = read_frame(&mut reader, 1024).await.unwrap();

        assert_eq!(frame, b"{\"a\":1}\n");
        assert_eq!(reader.reads, 1);
        assert_eq!(reader.chunks.len(), 1);
    }

    #[tokio::test]
    async fn test_read_frame_until_eof_without_newline() {
        let mut reader = ChunkedReader::new(&[b"{\"a\":", b"1}"]);
        let frame = read_frame(&mut reader, 1024).await.unwrap();
        assert_eq!(frame, b"{\"a\":1}");
    }

    #[tokio::test]
    async fn test_read_frame_size_limit() {
        let mut reader = ChunkedReader::new(&[b"0123456789", b"0123456789"]);
        let result = read_frame(&mut reader, 15).await;
        assert!(matches!(result, Err(BridgeError::FrameTooLarge { limit: 15 })));
    }

    #[test]
    fn test_decode_strips_bom_and_whitespace() {
        let frame = b"\xEF\xBB\xBF  {\"success\": true}\r\n";
        assert_eq!(decode_response(frame).unwrap(), json!({"success": true}));
        assert_eq!(frame_text(frame).unwrap(), "{\"success\": true}");
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode_response(b""), Err(BridgeError::EmptyResponse)));
        assert!(matches!(decode_response(b"  \n"), Err(BridgeError::EmptyResponse)));
        assert!(matches!(decode_response(b"\xFF\xFE\n"), Err(BridgeError::Utf8(_))));
        assert!(matches!(decode_response(b"{\"success\":\n"), Err(BridgeError::Json(_))));
    }

    #[tokio::test]
    async fn test_tcp_exchange() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let host = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_frame(&mut socket, 1024).await.unwrap();
            socket.write_all(b"{\"success\":true,").await.unwrap();
            socket.write_all(b"\"data\":null}\n").await.unwrap();
            request
        });

        let config = BridgeConfig {
            host: "127.0.0.1".to_string(),
            port,
            ..Default::default()
        };
        let transport = TcpTransport::new(&config);

        let frame = transport.exchange(b"{\"type\":\"ping\"}\n").await.unwrap();
        assert_eq!(
            decode_response(&frame).unwrap(),
            json!({"success": true, "data": null})
        );
        assert_eq!(host.await.unwrap(), b"{\"type\":\"ping\"}\n");
    }

    #[tokio::test]
    async fn test_tcp_connect_refused() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = BridgeConfig {
            host: "127.0.0.1".to_string(),
            port,
            ..Default::default()
        };
        let result = TcpTransport::new(&config).exchange(b"{}\n").await;
        assert!(matches!(result, Err(BridgeError::Connect { .. })));
    }

    #[tokio::test]
    async fn test_tcp_read_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let _host = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            // Hold the connection open without answering
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let config = BridgeConfig {
            host: "127.0.0.1".to_string(),
            port,
            io_timeout_ms: 100,
            ..Default::default()
        };
        let result = TcpTransport::new(&config).exchange(b"{}\n").await;
        assert!(matches!(
            result,
            Err(BridgeError::Timeout { stage: "reading response", .. })
        ));
    }
}
