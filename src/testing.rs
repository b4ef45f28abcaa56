//! Scripted fakes for driving workflows without real processes or a terminal.

use crate::console::Console;
use crate::git::runner::{CommandResult, Invocation, Runner};
use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::collections::VecDeque;

pub fn ok(stdout: &str) -> CommandResult {
    CommandResult {
        stdout: stdout.to_string(),
        stderr: String::new(),
        code: 0,
    }
}

pub fn failed(code: i32, stderr: &str) -> CommandResult {
    CommandResult {
        stdout: String::new(),
        stderr: stderr.to_string(),
        code,
    }
}

/// Replies to commands in the exact order they were scripted. An unexpected
/// or out-of-order command is an error, so tests also pin down the sequence.
#[derive(Default)]
pub struct ScriptedRunner {
    script: RefCell<VecDeque<(String, Option<CommandResult>)>>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, command: &str, result: CommandResult) -> Self {
        self.script.borrow_mut().push_back((command.to_string(), Some(result)));
        self
    }

    /// The command fails to start (program not found).
    pub fn spawn_error(self, command: &str) -> Self {
        self.script.borrow_mut().push_back((command.to_string(), None));
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|i| i.to_string()).collect()
    }

    pub fn remaining(&self) -> usize {
        self.script.borrow().len()
    }
}

impl Runner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        self.calls.borrow_mut().push(invocation.clone());
        let shown = invocation.to_string();
        let (expected, result) = self
            .script
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("unexpected command: {}", shown))?;
        if expected != shown {
            return Err(anyhow!("expected '{}', got '{}'", expected, shown));
        }
        result.ok_or_else(|| anyhow!("failed to start '{}'", shown))
    }
}

/// Records everything printed and answers prompts from a queue. Running out
/// of answers behaves like end of input.
#[derive(Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    pub transcript: Vec<String>,
    pub questions: Vec<String>,
}

impl ScriptedConsole {
    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }
}

impl Console for ScriptedConsole {
    fn info(&mut self, msg: &str) {
        self.transcript.push(format!("info: {}", msg));
    }

    fn success(&mut self, msg: &str) {
        self.transcript.push(format!("success: {}", msg));
    }

    fn warn(&mut self, msg: &str) {
        self.transcript.push(format!("warn: {}", msg));
    }

    fn error(&mut self, msg: &str) {
        self.transcript.push(format!("error: {}", msg));
    }

    fn hint(&mut self, msg: &str) {
        self.transcript.push(format!("hint: {}", msg));
    }

    fn block(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        self.questions.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}
