//! Child process execution with optional stdin data and timeout.
//!
//! Stdin is fed and stdout/stderr are drained on their own threads while the
//! caller waits, so a child that never reads its input cannot block the
//! deadline.

use std::io::{self, Read, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::error::CipherError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Run a command to completion, capturing stdout and stderr.
///
/// `stdin` is written to the child and closed; without it the child gets
/// a null stdin. With a `timeout`, a child still running past it is killed.
pub(crate) fn run(
    mut command: Command,
    stdin: Option<&[u8]>,
    timeout: Option<Duration>,
) -> Result<Output, CipherError> {
    let program = command.get_program().to_string_lossy().to_string();

    command
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command
        .spawn()
        .map_err(|source| CipherError::Spawn { program, source })?;

    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);
    let writer = match (stdin, child.stdin.take()) {
        (Some(bytes), Some(pipe)) => Some(feed(pipe, bytes)),
        _ => None,
    };

    let status = match timeout {
        None => child.wait().map_err(CipherError::Wait)?,
        Some(limit) => wait_with_deadline(&mut child, limit)?,
    };

    if let Some(writer) = writer {
        join(writer).map_err(CipherError::Stdin)?;
    }

    Ok(Output {
        status,
        stdout: collect(stdout)?,
        stderr: collect(stderr)?,
    })
}

fn wait_with_deadline(child: &mut Child, limit: Duration) -> Result<ExitStatus, CipherError> {
    let started = Instant::now();

    loop {
        if let Some(status) = child.try_wait().map_err(CipherError::Wait)? {
            return Ok(status);
        }
        if started.elapsed() >= limit {
            debug!(pid = child.id(), ?limit, "killing timed out process");
            let _ = child.kill();
            let _ = child.wait();
            return Err(CipherError::TimedOut(limit));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Write `bytes` to the child's stdin and close it.
fn feed(mut pipe: ChildStdin, bytes: &[u8]) -> JoinHandle<io::Result<()>> {
    let bytes = Zeroizing::new(bytes.to_vec());
    thread::spawn(move || {
        trace!(len = bytes.len(), "writing plaintext to stdin");
        match pipe.write_all(&bytes) {
            // a child that exits without reading stdin reports its own error
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
            other => other,
        }
    })
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join<T>(handle: JoinHandle<io::Result<T>>) -> io::Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "pipe thread panicked")))
}

fn collect(handle: Option<JoinHandle<io::Result<Vec<u8>>>>) -> Result<Vec<u8>, CipherError> {
    match handle {
        None => Ok(Vec::new()),
        Some(handle) => join(handle).map_err(CipherError::Wait),
    }
}
