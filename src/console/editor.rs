//! Line input for the console.
//!
//! The read loop only sees the [`LineEditor`] trait. Interactive sessions use
//! rustyline (prompt, history, line editing); piped input and tests use
//! [`ScriptedEditor`], which reads plain lines and never prints a prompt.

use anyhow::{Context, Result};
use std::io::BufRead;

/// What one prompt of the console produced
#[derive(Debug, PartialEq, Eq)]
pub enum ReadResult {
    /// One command line, terminator stripped
    Line(String),
    /// Ctrl+C at the prompt; the console discards the line and prompts again
    Interrupted,
    /// Ctrl+D, a closed pipe, or the end of a script
    Eof,
}

/// Source of command lines for [`crate::Console::run`]
pub trait LineEditor {
    /// Fetch the next command line, showing `prompt` if the source is interactive
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Remember a non-empty command for recall; sources without history ignore it
    fn add_history(&mut self, _line: &str) {}
}

// ============================================================================
// SCRIPTED EDITOR
// ============================================================================

/// Reads lines from any buffered reader, one command per line.
pub struct ScriptedEditor<R: BufRead> {
    reader: R,
}

impl<R: BufRead> ScriptedEditor<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineEditor for ScriptedEditor<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        let mut raw = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut raw)
            .context("Failed to read input line")?;

        if read == 0 {
            return Ok(ReadResult::Eof);
        }

        // Bytes that are not UTF-8 become U+FFFD; the line is still dispatched
        let line = String::from_utf8_lossy(&raw);
        Ok(ReadResult::Line(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

// ============================================================================
// RUSTYLINE EDITOR
// ============================================================================

#[cfg(feature = "editor")]
pub use interactive::RustylineEditor;

#[cfg(feature = "editor")]
mod interactive {
    use super::{LineEditor, ReadResult};
    use anyhow::{anyhow, Result};
    use rustyline::error::ReadlineError;
    use rustyline::history::DefaultHistory;
    use rustyline::{Config, Editor};

    /// Line editor implementation using rustyline.
    pub struct RustylineEditor {
        editor: Editor<(), DefaultHistory>,
    }

    impl RustylineEditor {
        /// Creates a new rustyline-based editor.
        ///
        /// # Errors
        ///
        /// Returns an error if the terminal cannot be initialized.
        pub fn new() -> Result<Self> {
            let config = Config::builder().auto_add_history(false).build();
            let editor = Editor::with_config(config)
                .map_err(|e| anyhow!("Failed to initialize line editor: {}", e))?;

            Ok(Self { editor })
        }
    }

    impl LineEditor for RustylineEditor {
        fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
            match self.editor.readline(prompt) {
                Ok(line) => Ok(ReadResult::Line(line)),
                Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
                Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
                Err(e) => Err(anyhow!("Failed to read input line: {}", e)),
            }
        }

        fn add_history(&mut self, line: &str) {
            let _ = self.editor.add_history_entry(line);
        }
    }
}
