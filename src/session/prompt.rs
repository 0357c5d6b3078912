//! Line-prompted input
//!
//! `Prompter` is generic over its reader and writer so whole flows can be
//! driven from a byte buffer in tests.

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::core::error::{MpsaError, Result};
use crate::core::util::parse_yes_no;
use crate::session::interrupt::Interrupt;

pub struct Prompter<R, W> {
    input: R,
    output: W,
    interrupt: Option<Interrupt>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            interrupt: None,
        }
    }

    /// Answers read after a Ctrl-C become `UserAbort`
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// Where flows write their display output
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Print `question` and read one trimmed line; `None` at end of input.
    ///
    /// Fails with `UserAbort` when Ctrl-C was pressed before the read returned.
    pub fn read_line(&mut self, question: &str) -> Result<Option<String>> {
        if let Some(interrupt) = &self.interrupt {
            if interrupt.is_pending() {
                return Err(MpsaError::UserAbort);
            }
            interrupt.begin_read();
        }
        write!(self.output, "{}", question.green())?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line);
        if let Some(interrupt) = &self.interrupt {
            interrupt.end_read();
            if interrupt.is_pending() {
                writeln!(self.output)?;
                return Err(MpsaError::UserAbort);
            }
        }

        if read? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like `read_line`, but end of input aborts the running action
    pub fn ask(&mut self, question: &str) -> Result<String> {
        self.read_line(question)?.ok_or(MpsaError::UserAbort)
    }

    /// Non-empty answer; an empty one prints `missing` and yields `None`
    pub fn ask_required(&mut self, question: &str, missing: &str) -> Result<Option<String>> {
        let answer = self.ask(question)?;
        if answer.is_empty() {
            self.error(missing)?;
            return Ok(None);
        }
        Ok(Some(answer))
    }

    /// Yes/no question with a default for empty input
    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let answer = self.ask(question)?;
        Ok(parse_yes_no(&answer, default))
    }

    /// Pick `1..=count`; invalid input prints an error and yields `None`
    pub fn choose(&mut self, question: &str, count: usize) -> Result<Option<usize>> {
        let answer = self.ask(question)?;
        match answer.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => Ok(Some(n)),
            Ok(_) => {
                self.error("Invalid choice")?;
                Ok(None)
            }
            Err(_) => {
                self.error("Please enter a number")?;
                Ok(None)
            }
        }
    }

    /// Numbered option list
    pub fn menu(&mut self, items: &[&str]) -> io::Result<()> {
        for (i, item) in items.iter().enumerate() {
            writeln!(self.output, "{} {}", format!("{})", i + 1).yellow(), item.green())?;
        }
        Ok(())
    }

    pub fn heading(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.output, "\n{}", format!("===== {} =====", title).cyan().bold())
    }

    pub fn info(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    pub fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.yellow())
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.red())
    }

    pub fn success(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.green())
    }
}

/// A search root picked from a numbered list
#[derive(Debug, Clone)]
pub enum Target {
    Fixed { label: String, path: PathBuf },
    Custom,
}

impl Target {
    pub fn fixed(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Target::Fixed {
            label: label.into(),
            path: path.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Target::Fixed { label, .. } => label,
            Target::Custom => "Custom path",
        }
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Show `targets`, read the choice and resolve custom paths
    pub fn pick_target(&mut self, targets: &[Target]) -> Result<Option<PathBuf>> {
        let labels: Vec<&str> = targets.iter().map(Target::label).collect();
        self.menu(&labels)?;
        let choice = match self.choose(&format!("Select target [1-{}]: ", targets.len()), targets.len())? {
            Some(n) => n,
            None => return Ok(None),
        };

        match &targets[choice - 1] {
            Target::Fixed { path, .. } => Ok(Some(path.clone())),
            Target::Custom => {
                let path = self.ask_required("Enter full path: ", "Path required")?;
                Ok(path.map(PathBuf::from))
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn scripted(answers: &str) -> Prompter<io::Cursor<Vec<u8>>, Vec<u8>> {
    Prompter::new(io::Cursor::new(answers.as_bytes().to_vec()), Vec::new())
}
