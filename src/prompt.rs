//! Where answers to the generator's questions come from.

use std::io::{self, BufRead, Write};
use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};

/// Asks one question and returns the raw answer. An empty string is a valid
/// answer, distinct from a failure.
pub trait InputProvider {
    fn prompt(&mut self, message: &str) -> Result<String>;
}

impl<T: InputProvider + ?Sized> InputProvider for &mut T {
    fn prompt(&mut self, message: &str) -> Result<String> {
        (**self).prompt(message)
    }
}

impl<T: InputProvider + ?Sized> InputProvider for Box<T> {
    fn prompt(&mut self, message: &str) -> Result<String> {
        (**self).prompt(message)
    }
}

/// Interactive prompts: question on one stream, answer read line by line
/// from another.
pub struct ConsoleInput<R = io::StdinLock<'static>, W = io::Stderr> {
    reader: R,
    writer: W,
}

impl ConsoleInput {
    /// Questions go to stderr so generated SQL on stdout stays clean.
    pub fn stdio() -> Self {
        Self { reader: io::stdin().lock(), writer: io::stderr() }
    }
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> InputProvider for ConsoleInput<R, W> {
    fn prompt(&mut self, message: &str) -> Result<String> {
        debug!(prompt = message, "asking on the console");
        writeln!(self.writer, "{message}")
            .and_then(|_| self.writer.flush())
            .map_err(|e| Error::io("<console>", e))?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| Error::io("<console>", e))?;
        if read == 0 {
            return Err(Error::Prompt { prompt: message.to_string() });
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Canned answers keyed by the exact prompt text. Keeps a log of every prompt
/// it was asked, in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    answers: IndexMap<String, String>,
    default: Option<String>,
    asked: Vec<String>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers file: a JSON object of `"prompt": "answer"` pairs.
    pub fn from_file(path: &Path) -> Result<Self> {
        let answers: IndexMap<String, String> = crate::path_de::read_json_file(path)?;
        Ok(Self { answers, ..Self::default() })
    }

    pub fn from_answers(answers: IndexMap<String, String>) -> Self {
        Self { answers, ..Self::default() }
    }

    pub fn answer(mut self, prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        self.answers.insert(prompt.into(), answer.into());
        self
    }

    /// Answer for any prompt without a specific entry.
    pub fn with_default(mut self, answer: impl Into<String>) -> Self {
        self.default = Some(answer.into());
        self
    }

    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl InputProvider for ScriptedInput {
    fn prompt(&mut self, message: &str) -> Result<String> {
        self.asked.push(message.to_string());
        let answer = self
            .answers
            .get(message)
            .or(self.default.as_ref())
            .cloned()
            .ok_or_else(|| Error::MissingAnswer { prompt: message.to_string() })?;
        debug!(prompt = message, answer = %answer, "scripted answer");
        Ok(answer)
    }
}

// ------------------------------- Tests ------------------------------------ //
