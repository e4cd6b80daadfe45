//! Graphviz subprocess invocation.
//!
//! The source is piped to `dot -Tsvg` on stdin and the SVG read back from
//! stdout. Pipes are serviced on helper threads so a large graph can't
//! deadlock on a full pipe buffer while the main thread polls for exit.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::consts::{DEFAULT_COMMAND, DEFAULT_TIMEOUT, POLL_INTERVAL, SVG_FLAG};
use crate::error::RenderError;

/// Renders DOT source to SVG bytes.
///
/// Implemented by [`DotCommand`] for real rendering; tests substitute fakes.
pub trait DotRunner: Send + Sync {
    /// Render one themed DOT source to SVG.
    fn render(&self, source: &str) -> Result<Vec<u8>, RenderError>;
}

/// Runs the Graphviz `dot` executable with a time limit.
#[derive(Debug, Clone)]
pub struct DotCommand {
    program: String,
    timeout: Duration,
}

impl Default for DotCommand {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}

impl DotCommand {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the time limit after which the process is killed.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll the child until it exits or the deadline passes.
    fn wait_with_deadline(&self, child: &mut Child) -> Result<ExitStatus, RenderError> {
        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if start.elapsed() > self.timeout {
                tracing::warn!(
                    program = %self.program,
                    timeout_secs = self.timeout.as_secs_f64(),
                    "renderer timed out, terminating"
                );
                let _ = child.kill();
                let _ = child.wait();
                return Err(RenderError::Timeout {
                    program: self.program.clone(),
                    timeout: self.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

impl DotRunner for DotCommand {
    fn render(&self, source: &str) -> Result<Vec<u8>, RenderError> {
        let mut child = Command::new(&self.program)
            .arg(SVG_FLAG)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);
        let writer = child.stdin.take().map(|mut stdin| {
            let input = source.as_bytes().to_vec();
            // Dropping stdin at the end of the thread closes the pipe
            thread::spawn(move || stdin.write_all(&input))
        });

        let status = self.wait_with_deadline(&mut child)?;

        let stdout = stdout.and_then(|h| h.join().ok()).unwrap_or_default();
        let stderr = stderr.and_then(|h| h.join().ok()).unwrap_or_default();
        let write_result = writer.and_then(|h| h.join().ok());

        if !status.success() {
            return Err(RenderError::Exit {
                program: self.program.clone(),
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_owned(),
            });
        }
        if let Some(Err(e)) = write_result {
            return Err(RenderError::Io(e));
        }

        tracing::debug!(program = %self.program, bytes = stdout.len(), "rendered diagram");
        Ok(stdout)
    }
}
