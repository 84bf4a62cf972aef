//! Command definitions
//!
//! A remote console command: a verb plus arguments rendered to one line.

use std::fmt;

use crate::error::{GateError, Result};

/// Longest command line the server accepts in one EXEC packet (bytes)
pub const MAX_COMMAND_LEN: usize = 1446;

/// An immutable, validated command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    verb: String,
    args: Vec<String>,
}

impl Command {
    /// Build a command from a verb and its arguments
    ///
    /// Fails if the verb is empty or contains whitespace, if an argument is
    /// blank, if any part contains a line terminator or NUL, or if the rendered
    /// line exceeds [`MAX_COMMAND_LEN`].
    pub fn new<I, S>(verb: impl Into<String>, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let verb = verb.into();
        if verb.is_empty() || verb.chars().any(char::is_whitespace) {
            return Err(GateError::InvalidCommand(format!(
                "verb must be a single non-empty word, got {:?}",
                verb
            )));
        }
        reject_control(&verb)?;

        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        for arg in &args {
            if arg.trim().is_empty() {
                return Err(GateError::InvalidCommand(format!(
                    "blank argument to {:?}",
                    verb
                )));
            }
            reject_control(arg)?;
        }

        let command = Self { verb, args };
        let rendered_len = command.render().len();
        if rendered_len > MAX_COMMAND_LEN {
            return Err(GateError::InvalidCommand(format!(
                "command is {} bytes (max {})",
                rendered_len, MAX_COMMAND_LEN
            )));
        }

        Ok(command)
    }

    /// `difficulty` query form
    pub fn get_difficulty() -> Self {
        Self::bare("difficulty")
    }

    /// `difficulty <level>`
    pub fn set_difficulty(level: &str) -> Result<Self> {
        Self::new("difficulty", [level])
    }

    /// `gamerule <rule> <value>`
    pub fn set_gamerule(rule: &str, value: &str) -> Result<Self> {
        Self::new("gamerule", [rule, value])
    }

    /// `stop`
    pub fn stop() -> Self {
        Self::bare("stop")
    }

    fn bare(verb: &str) -> Self {
        Self {
            verb: verb.to_string(),
            args: Vec::new(),
        }
    }

    /// The command verb
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// The command arguments
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Render to a single line, arguments separated by one space
    pub fn render(&self) -> String {
        let mut line = self.verb.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Validate an already rendered command line
///
/// Same rules as [`Command::new`] applied to the whole line.
pub fn validate_line(line: &str) -> Result<()> {
    if line.trim().is_empty() {
        return Err(GateError::InvalidCommand("empty command line".to_string()));
    }
    reject_control(line)?;
    if line.len() > MAX_COMMAND_LEN {
        return Err(GateError::InvalidCommand(format!(
            "command is {} bytes (max {})",
            line.len(),
            MAX_COMMAND_LEN
        )));
    }
    Ok(())
}

fn reject_control(part: &str) -> Result<()> {
    if part.contains(&['\r', '\n', '\0'][..]) {
        return Err(GateError::InvalidCommand(format!(
            "line terminator or NUL in {:?}",
            part
        )));
    }
    Ok(())
}
