use anyhow::{Context, Result};
use crossterm::style::Stylize;
use std::io::{self, BufRead, Write};

/// Progress output and interactive prompts.
pub trait Console {
    fn info(&mut self, msg: &str);
    fn success(&mut self, msg: &str);
    fn warn(&mut self, msg: &str);
    fn error(&mut self, msg: &str);
    fn hint(&mut self, msg: &str);
    /// Verbatim multi-line text (file lists, command output).
    fn block(&mut self, text: &str);
    /// Read one line of free text. End of input yields an empty string.
    fn ask(&mut self, question: &str) -> Result<String>;

    /// Yes/no question defaulting to no: an empty answer declines.
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(&format!("{} (y/N): ", question))?;
        Ok(is_affirmative(&answer))
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Styled stdout/stderr output with answers read from stdin.
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        use std::io::IsTerminal;
        if !io::stdout().is_terminal() {
            crossterm::style::force_color_output(false);
        }
        TerminalConsole
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn info(&mut self, msg: &str) {
        println!("{} {}", "::".cyan().bold(), msg);
    }

    fn success(&mut self, msg: &str) {
        println!("{} {}", "✔".green().bold(), msg);
    }

    fn warn(&mut self, msg: &str) {
        println!("{} {}", "!".yellow().bold(), msg.yellow());
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{} {}", "✘".red().bold(), msg.red());
    }

    fn hint(&mut self, msg: &str) {
        println!("  {} {}", "hint:".dim(), msg.dim());
    }

    fn block(&mut self, text: &str) {
        for line in text.lines() {
            println!("    {}", line);
        }
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        print!("{} {}", "?".magenta().bold(), question);
        io::stdout().flush().context("Failed to flush stdout")?;
        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Failed to read from stdin")?;
        if answer.is_empty() {
            // EOF: keep the transcript tidy.
            println!();
        }
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }
}
