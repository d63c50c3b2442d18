//! NER through an external process speaking JSON lines.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use super::{EntityRecognizer, EntitySpan};
use crate::error::NerError;

/// Runs a recognizer program once per page.
///
/// The page text is written to the child's stdin; every non-empty stdout line
/// must be a JSON object `{"label": ..., "text": ...}`. A GiNZA wrapper script
/// is the intended backend.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    /// Create from a program and its arguments (`["python", "ner.py"]`).
    pub fn new(command: &[String]) -> Result<Self, NerError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| NerError::Spawn("empty recognizer command".to_string()))?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn parse_output(stdout: &str) -> Result<Vec<EntitySpan>, NerError> {
        let mut spans = Vec::new();

        for (index, line) in stdout.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let span: EntitySpan = serde_json::from_str(line).map_err(|e| NerError::Protocol {
                line: index + 1,
                reason: e.to_string(),
            })?;
            trace!("[{}] {}", span.label, span.text);
            spans.push(span);
        }

        Ok(spans)
    }
}

impl EntityRecognizer for CommandRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, NerError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| NerError::Spawn(format!("{}: {}", self.program, e)))?;

        // Feed stdin from another thread so a chatty child cannot fill its
        // stdout pipe while we are still writing.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| NerError::Spawn("stdin not captured".to_string()))?;
        let input = text.to_owned();
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child
            .wait_with_output()
            .map_err(|e| NerError::Spawn(e.to_string()))?;

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("Recognizer closed stdin early: {}", e),
            Err(_) => return Err(NerError::Spawn("stdin writer panicked".to_string())),
        }

        if !output.status.success() {
            return Err(NerError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let spans = Self::parse_output(&stdout)?;
        debug!("Recognizer returned {} entities", spans.len());

        Ok(spans)
    }
}
