//! Blocking msgpack-RPC client for a child process.
//!
//! One reader thread decodes the child's stdout into a channel. Calls
//! are strictly one at a time: write a request, then wait (bounded by
//! the client timeout) for the response carrying the same id.

pub mod codec;

use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use rmpv::Value;

use crate::session::SessionError;

pub use codec::Incoming;

type IncomingResult = Result<Incoming, SessionError>;

pub struct RpcClient {
    writer: Box<dyn Write + Send>,
    incoming: Receiver<IncomingResult>,
    child: Option<Child>,
    next_id: u64,
    timeout: Duration,
}

impl RpcClient {
    /// Spawn `program args..` and talk to it over its stdio.
    pub fn spawn(program: &Path, args: &[&str], timeout: Duration) -> Result<Self, SessionError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                SessionError::Unavailable(format!("failed to start {}: {err}", program.display()))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SessionError::Unavailable("child stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SessionError::Unavailable("child stdout unavailable".to_string()))?;

        tracing::debug!(program = %program.display(), ?args, pid = child.id(), "session spawned");
        let mut client = Self::from_streams(stdout, stdin, timeout)?;
        client.child = Some(child);
        Ok(client)
    }

    /// Build a client over arbitrary streams.
    pub fn from_streams<R, W>(reader: R, writer: W, timeout: Duration) -> Result<Self, SessionError>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        std::thread::Builder::new()
            .name("rpc-reader".to_string())
            .spawn(move || reader_loop(reader, &tx))
            .map_err(|err| {
                SessionError::Unavailable(format!("failed to start reader thread: {err}"))
            })?;
        Ok(Self {
            writer: Box::new(BufWriter::new(writer)),
            incoming: rx,
            child: None,
            next_id: 1,
            timeout,
        })
    }

    /// Issue one request and block until its response arrives.
    pub fn call(&mut self, method: &str, params: Vec<Value>) -> Result<Value, SessionError> {
        let _scope = crate::perf::scope("rpc.call");
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        let request = codec::encode_request(id, method, params);
        codec::write_message(&mut self.writer, &request)?;
        tracing::debug!(id, method, "rpc request");
        crate::perf::log_event("rpc.request", format!("id={id} method={method}"));

        let deadline = Instant::now() + self.timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.incoming.recv_timeout(remaining) {
                Ok(Ok(Incoming::Response { id: got, error, result })) if got == id => {
                    return match error {
                        Some(error) => Err(SessionError::Remote {
                            method: method.to_string(),
                            message: codec::describe_error(&error),
                        }),
                        None => Ok(result),
                    };
                }
                Ok(Ok(Incoming::Response { id: got, .. })) => {
                    tracing::debug!(expected = id, got, "discarding stale response");
                }
                Ok(Ok(Incoming::Notification { method, params })) => {
                    tracing::debug!(%method, params = params.len(), "ignoring notification");
                }
                Ok(Ok(Incoming::Request { id: req_id, method })) => {
                    tracing::debug!(%method, "refusing session request");
                    let reply = codec::encode_response(
                        req_id,
                        Some(Value::from(format!("{method} is not supported"))),
                        Value::Nil,
                    );
                    codec::write_message(&mut self.writer, &reply)?;
                }
                Ok(Err(err)) => return Err(err),
                Err(RecvTimeoutError::Timeout) => {
                    tracing::error!(%method, timeout = ?self.timeout, "session timed out");
                    return Err(SessionError::Timeout {
                        method: method.to_string(),
                        timeout: self.timeout,
                    });
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(SessionError::Unavailable(
                        "session closed its output".to_string(),
                    ));
                }
            }
        }
    }
}

impl Drop for RpcClient {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn reader_loop<R: Read>(reader: R, tx: &Sender<IncomingResult>) {
    let mut reader = BufReader::new(reader);
    loop {
        match codec::read_message(&mut reader) {
            Ok(Some(msg)) => {
                if tx.send(Ok(msg)).is_err() {
                    return;
                }
            }
            Ok(None) => {
                tracing::debug!("session output closed");
                return;
            }
            Err(err) => {
                tracing::warn!(error = %err, "session read failed");
                let _ = tx.send(Err(err));
                return;
            }
        }
    }
}
