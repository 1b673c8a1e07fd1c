//! render
//!
//! Hand-off to an external Graphviz renderer.
//!
//! The core's responsibility ends at delivering well-formed DOT text:
//! the renderer runs as a subprocess (`dot -Txdot` by default), reads
//! the text on stdin, and whatever it writes to stdout is returned to
//! the caller verbatim. The renderer's exit status is reported but not
//! interpreted; only failing to start the process is an error.

use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;

/// Errors from the renderer hand-off.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer executable could not be started.
    #[error("failed to run renderer '{program}': {source}")]
    Spawn {
        /// The executable that was attempted
        program: String,
        /// The underlying spawn error
        source: std::io::Error,
    },

    /// I/O failure while feeding or draining the subprocess.
    #[error("renderer i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// What the renderer produced.
#[derive(Debug)]
pub struct RenderOutput {
    /// Captured stdout
    pub bytes: Vec<u8>,
    /// Exit status code, when the process reported one
    pub status: Option<i32>,
}

/// Pipe DOT text through `<program> -T<format>` and capture stdout.
pub fn pipe_through(dot_text: &str, program: &str, format: &str) -> Result<RenderOutput, RenderError> {
    run_filter(program, &[format!("-T{}", format)], dot_text.as_bytes())
}

/// Run a filter subprocess: write `input` to its stdin, collect stdout.
fn run_filter(program: &str, args: &[String], input: &[u8]) -> Result<RenderOutput, RenderError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|source| RenderError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(input) {
            Ok(()) => {}
            // A renderer that exits before draining stdin closes the
            // pipe; its status and output are still worth collecting
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Err(e) => return Err(e.into()),
        }
    }

    let output = child.wait_with_output()?;
    Ok(RenderOutput {
        bytes: output.stdout,
        status: output.status.code(),
    })
}
