//! Line-delimited JSON pipe to the native host process.
//!
//! Outbound frames carry a request id and the request text. The host
//! answers each id exactly once with `ok` or `error`, and may send `push`
//! frames at any time.

use std::collections::HashMap;
use std::io;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use ifl03_bridge::gateway::QUERY_DROPPED_CODE;
use ifl03_bridge::{BridgeGateway, GatewayFailure};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};

type Reply = oneshot::Sender<Result<String, GatewayFailure>>;

#[derive(Serialize)]
struct OutFrame<'a> {
    id: u64,
    request: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InFrame {
    Failed { id: u64, error: ErrorBody },
    Answered { id: u64, ok: Value },
    Push { push: Value },
}

#[derive(Default)]
struct Pending {
    closed: bool,
    waiters: HashMap<u64, Reply>,
}

#[derive(Default)]
struct Shared {
    pending: Mutex<Pending>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take(&self, id: u64) -> Option<Reply> {
        self.lock().waiters.remove(&id)
    }

    /// Mark the pipe dead and fail every outstanding query.
    fn close(&self) {
        let waiters = {
            let mut pending = self.lock();
            pending.closed = true;
            std::mem::take(&mut pending.waiters)
        };
        if !waiters.is_empty() {
            tracing::warn!(pending = waiters.len(), "host pipe closed with queries in flight");
        }
        for (_, reply) in waiters {
            let _ = reply.send(Err(GatewayFailure::dropped()));
        }
    }
}

/// [`BridgeGateway`] over a host's stdin/stdout.
pub struct PipeGateway {
    outbound: mpsc::UnboundedSender<String>,
    shared: Arc<Shared>,
    next_id: AtomicU64,
}

impl PipeGateway {
    /// Start the reader and writer tasks. Returns the gateway and the
    /// stream of pushed state texts.
    pub fn spawn<R, W>(reader: R, writer: W) -> (Self, mpsc::UnboundedReceiver<String>)
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let shared = Arc::new(Shared::default());
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (push_tx, push_rx) = mpsc::unbounded_channel();

        tokio::spawn(write_loop(writer, outbound_rx, Arc::clone(&shared)));
        tokio::spawn(read_loop(reader, push_tx, Arc::clone(&shared)));

        let gateway = Self {
            outbound,
            shared,
            next_id: AtomicU64::new(1),
        };
        (gateway, push_rx)
    }
}

#[async_trait]
impl BridgeGateway for PipeGateway {
    async fn query(&self, request: String) -> Result<String, GatewayFailure> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.shared.lock();
            if pending.closed {
                return Err(GatewayFailure::new(
                    QUERY_DROPPED_CODE,
                    "host pipe closed",
                ));
            }
            pending.waiters.insert(id, tx);
        }

        let frame = serde_json::to_string(&OutFrame { id, request: &request })
            .map_err(|e| GatewayFailure::new(QUERY_DROPPED_CODE, e.to_string()))?;
        if self.outbound.send(frame).is_err() {
            self.shared.take(id);
            return Err(GatewayFailure::new(
                QUERY_DROPPED_CODE,
                "host writer stopped",
            ));
        }

        rx.await.unwrap_or_else(|_| Err(GatewayFailure::dropped()))
    }
}

async fn write_loop<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<String>, shared: Arc<Shared>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(mut line) = rx.recv().await {
        line.push('\n');
        let written = async {
            writer.write_all(line.as_bytes()).await?;
            writer.flush().await
        }
        .await;
        if let Err(e) = written {
            tracing::warn!(error = %e, "host pipe write failed");
            shared.close();
            return;
        }
    }
}

async fn read_loop<R>(reader: R, pushes: mpsc::UnboundedSender<String>, shared: Arc<Shared>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                dispatch(&line, &pushes, &shared);
            }
            Ok(None) => {
                tracing::info!("host pipe reached end of stream");
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "host pipe read failed");
                break;
            }
        }
    }
    shared.close();
}

fn dispatch(line: &str, pushes: &mpsc::UnboundedSender<String>, shared: &Shared) {
    let frame: InFrame = match serde_json::from_str(line) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(line_len = line.len(), error = %e, "unreadable host frame");
            return;
        }
    };

    match frame {
        InFrame::Answered { id, ok } => match shared.take(id) {
            Some(reply) => {
                let _ = reply.send(Ok(value_text(ok)));
            }
            None => tracing::debug!(id, "answer for unknown query"),
        },
        InFrame::Failed { id, error } => match shared.take(id) {
            Some(reply) => {
                let _ = reply.send(Err(GatewayFailure::new(error.code, error.message)));
            }
            None => tracing::debug!(id, "failure for unknown query"),
        },
        InFrame::Push { push } => {
            let _ = pushes.send(value_text(push));
        }
    }
}

/// A string payload is already state text; anything else is re-encoded.
fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Launch the host executable with piped stdio.
pub fn spawn_host(
    program: &str,
    args: &[String],
) -> io::Result<(PipeGateway, mpsc::UnboundedReceiver<String>, Child)> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("host stdin unavailable"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("host stdout unavailable"))?;

    tracing::info!(program, pid = ?child.id(), "host process started");
    let (gateway, pushes) = PipeGateway::spawn(stdout, stdin);
    Ok((gateway, pushes, child))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{duplex, split, DuplexStream, Lines, ReadHalf, WriteHalf};

    struct FakeHost {
        lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
        out: WriteHalf<DuplexStream>,
    }

    impl FakeHost {
        async fn next_frame(&mut self) -> Value {
            let line = self.lines.next_line().await.unwrap().unwrap();
            serde_json::from_str(&line).unwrap()
        }

        async fn send(&mut self, line: &str) {
            self.out.write_all(line.as_bytes()).await.unwrap();
            self.out.write_all(b"\n").await.unwrap();
            self.out.flush().await.unwrap();
        }
    }

    fn connect() -> (Arc<PipeGateway>, mpsc::UnboundedReceiver<String>, FakeHost) {
        let (ours, theirs) = duplex(16 * 1024);
        let (r, w) = split(ours);
        let (gateway, pushes) = PipeGateway::spawn(r, w);
        let (hr, hw) = split(theirs);
        let host = FakeHost {
            lines: BufReader::new(hr).lines(),
            out: hw,
        };
        (Arc::new(gateway), pushes, host)
    }

    fn query(
        gateway: &Arc<PipeGateway>,
        request: &str,
    ) -> tokio::task::JoinHandle<Result<String, GatewayFailure>> {
        let gateway = Arc::clone(gateway);
        let request = request.to_string();
        tokio::spawn(async move { gateway.query(request).await })
    }

    #[tokio::test]
    async fn answer_resolves_query() {
        let (gateway, _pushes, mut host) = connect();
        let call = query(&gateway, r#"{"cmd":"getState"}"#);

        let frame = host.next_frame().await;
        assert_eq!(frame["request"], json!(r#"{"cmd":"getState"}"#));
        let id = frame["id"].as_u64().unwrap();

        host.send(&format!(r#"{{"id":{id},"ok":{{"uiEdit":true}}}}"#)).await;
        assert_eq!(call.await.unwrap().unwrap(), r#"{"uiEdit":true}"#);
    }

    #[tokio::test]
    async fn string_answer_passes_through() {
        let (gateway, _pushes, mut host) = connect();
        let call = query(&gateway, r#"{"cmd":"saveSettings"}"#);
        let id = host.next_frame().await["id"].as_u64().unwrap();

        host.send(&format!(r#"{{"id":{id},"ok":""}}"#)).await;
        assert_eq!(call.await.unwrap().unwrap(), "");
    }

    #[tokio::test]
    async fn error_frame_fails_query() {
        let (gateway, _pushes, mut host) = connect();
        let call = query(&gateway, r#"{"cmd":"bogus"}"#);
        let id = host.next_frame().await["id"].as_u64().unwrap();

        host.send(&format!(
            r#"{{"id":{id},"error":{{"code":400,"message":"unknown command"}}}}"#
        ))
        .await;
        assert_eq!(
            call.await.unwrap().unwrap_err(),
            GatewayFailure::new(400, "unknown command")
        );
    }

    #[tokio::test]
    async fn answers_match_by_id() {
        let (gateway, _pushes, mut host) = connect();
        let first = query(&gateway, "a");
        let a = host.next_frame().await;
        let second = query(&gateway, "b");
        let b = host.next_frame().await;

        host.send(&format!(r#"{{"id":{},"ok":"for-b"}}"#, b["id"])).await;
        host.send(&format!(r#"{{"id":{},"ok":"for-a"}}"#, a["id"])).await;

        assert_eq!(first.await.unwrap().unwrap(), "for-a");
        assert_eq!(second.await.unwrap().unwrap(), "for-b");
    }

    #[tokio::test]
    async fn pushes_are_forwarded() {
        let (_gateway, mut pushes, mut host) = connect();
        host.send(r#"{"push":{"connectionStatus":"DRIVING"}}"#).await;
        assert_eq!(
            pushes.recv().await.unwrap(),
            r#"{"connectionStatus":"DRIVING"}"#
        );
    }

    #[tokio::test]
    async fn garbage_line_is_skipped() {
        let (gateway, _pushes, mut host) = connect();
        let call = query(&gateway, "x");
        let id = host.next_frame().await["id"].as_u64().unwrap();

        host.send("not a frame").await;
        host.send(&format!(r#"{{"id":{id},"ok":null}}"#)).await;
        assert_eq!(call.await.unwrap().unwrap(), "null");
    }

    #[tokio::test]
    async fn end_of_stream_fails_pending_and_later_queries() {
        let (gateway, _pushes, mut host) = connect();
        let call = query(&gateway, "x");
        host.next_frame().await;
        drop(host);

        let err = call.await.unwrap().unwrap_err();
        assert_eq!(err.code, QUERY_DROPPED_CODE);

        let err = gateway.query("y".into()).await.unwrap_err();
        assert_eq!(err.code, QUERY_DROPPED_CODE);
        assert_eq!(err.message, "host pipe closed");
    }
}
