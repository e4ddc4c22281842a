#![forbid(unsafe_code)]

//! Edit-script replay for textfence fields.
//!
//! A script is one command per line. Blank lines and lines starting with `#`
//! are skipped. After every command the task queue is drained, so each step
//! shows the settled field.
//!
//! | Command | Effect |
//! |---|---|
//! | `type <text>` | type `<text>` one char at a time, draining after each |
//! | `paste <text>` | append `<text>` in one edit |
//! | `backspace [n]` | remove the last `n` chars (default 1) |
//! | `delete <offset> <len>` | remove a char range |
//! | `clear` | remove everything |
//! | `max <n>` | set the max length (`0` = unbounded) |
//! | `input-type <name>` | select a named rule (text field only) |
//! | `pattern [<regex>]` | install a custom rule, or none (text field only) |
//! | `secret` / `text` | switch to a fresh secret / text field |
//! | `reveal on\|off` | show or mask secret content |
//!
//! ```
//! use fence::FieldConfig;
//! use fence_harness::{Session, parse_script};
//!
//! let script = parse_script("input-type integer\ntype 12a3\n").unwrap();
//! let mut session = Session::new(FieldConfig::default());
//! for step in &script {
//!     session.apply(&step.command).unwrap();
//! }
//! assert_eq!(session.display(), "123");
//! ```

use std::fmt;

use fence::{
    FieldConfig, FieldState, InputType, LimitedSecretField, LimitedTextField, Pattern, TaskQueue,
};

/// Tasks a single command may run before the harness gives up.
pub const TASK_BUDGET: usize = 64;

/// One script instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Type text one char at a time.
    Type(String),
    /// Append text in one edit.
    Paste(String),
    /// Remove the last `n` chars.
    Backspace(usize),
    /// Remove a char range.
    Delete {
        /// Char offset.
        offset: usize,
        /// Char count.
        len: usize,
    },
    /// Remove everything.
    Clear,
    /// Set the max length.
    MaxLength(usize),
    /// Select a named rule. Unknown names were already mapped to `None`.
    InputType(InputType),
    /// Install a custom rule (source), or none.
    Pattern(Option<String>),
    /// Switch to a fresh secret field.
    Secret,
    /// Switch to a fresh text field.
    Text,
    /// Show (`true`) or mask secret content.
    Reveal(bool),
}

/// A command plus the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// 1-based line number.
    pub line: usize,
    /// Original line, trimmed.
    pub source: String,
    /// Parsed command.
    pub command: Command,
}

/// A script line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    /// 1-based line number.
    pub line: usize,
    /// What was wrong.
    pub message: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScriptError {}

/// Parse a whole script.
pub fn parse_script(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let command = parse_command(trimmed).map_err(|message| ScriptError { line, message })?;
        steps.push(Step {
            line,
            source: trimmed.to_string(),
            command,
        });
    }
    Ok(steps)
}

/// Parse a single non-empty line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim_start()),
        None => (line, ""),
    };

    match verb {
        "type" => Ok(Command::Type(required_text(verb, rest)?)),
        "paste" => Ok(Command::Paste(required_text(verb, rest)?)),
        "backspace" => match rest {
            "" => Ok(Command::Backspace(1)),
            n => Ok(Command::Backspace(parse_number("count", n)?)),
        },
        "delete" => {
            let mut args = rest.split_whitespace();
            match (args.next(), args.next(), args.next()) {
                (Some(offset), Some(len), None) => Ok(Command::Delete {
                    offset: parse_number("offset", offset)?,
                    len: parse_number("length", len)?,
                }),
                _ => Err("usage: delete <offset> <len>".to_string()),
            }
        }
        "clear" => no_args(verb, rest, Command::Clear),
        "max" => Ok(Command::MaxLength(parse_number("max length", rest)?)),
        "input-type" => {
            let input_type = rest.parse::<InputType>().unwrap_or_else(|err| {
                tracing::warn!(%err, "falling back to no constraint");
                InputType::None
            });
            Ok(Command::InputType(input_type))
        }
        "pattern" => Ok(Command::Pattern((!rest.is_empty()).then(|| rest.to_string()))),
        "secret" => no_args(verb, rest, Command::Secret),
        "text" => no_args(verb, rest, Command::Text),
        "reveal" => match rest {
            "on" | "true" | "1" => Ok(Command::Reveal(true)),
            "off" | "false" | "0" => Ok(Command::Reveal(false)),
            _ => Err("usage: reveal on|off".to_string()),
        },
        _ => Err(format!("unknown command `{verb}`")),
    }
}

fn required_text(verb: &str, rest: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("usage: {verb} <text>"))
    } else {
        Ok(rest.to_string())
    }
}

fn no_args(verb: &str, rest: &str, command: Command) -> Result<Command, String> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(format!("`{verb}` takes no arguments"))
    }
}

fn parse_number(what: &str, value: &str) -> Result<usize, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("expected {what} as a non-negative integer, got `{value}`"))
}

enum ActiveField {
    Text(LimitedTextField),
    Secret(LimitedSecretField),
}

/// A field under test plus the queue that settles it.
pub struct Session {
    field: ActiveField,
    queue: TaskQueue,
    columns: usize,
}

impl Session {
    /// Start with a text field built from `config`.
    #[must_use]
    pub fn new(config: FieldConfig) -> Self {
        let queue = TaskQueue::new();
        let columns = config.columns;
        let field = ActiveField::Text(LimitedTextField::new(queue.scheduler(), config));
        Self {
            field,
            queue,
            columns,
        }
    }

    /// Execute one command and drain the queue.
    pub fn apply(&mut self, command: &Command) -> fence::Result<()> {
        match command {
            Command::Type(text) => {
                for ch in text.chars() {
                    self.push_str(ch.encode_utf8(&mut [0; 4]))?;
                    self.settle()?;
                }
            }
            Command::Paste(text) => self.push_str(text)?,
            Command::Backspace(n) => {
                for _ in 0..*n {
                    let removed = match &self.field {
                        ActiveField::Text(f) => f.backspace()?,
                        ActiveField::Secret(f) => f.backspace()?,
                    };
                    if !removed {
                        break;
                    }
                }
            }
            Command::Delete { offset, len } => match &self.field {
                ActiveField::Text(f) => f.remove(*offset, *len)?,
                ActiveField::Secret(f) => f.remove(*offset, *len)?,
            },
            Command::Clear => match &self.field {
                ActiveField::Text(f) => f.clear()?,
                ActiveField::Secret(f) => f.clear()?,
            },
            Command::MaxLength(max) => match &self.field {
                ActiveField::Text(f) => f.set_max_length(*max)?,
                ActiveField::Secret(f) => f.set_max_length(*max)?,
            },
            Command::InputType(input_type) => match &self.field {
                ActiveField::Text(f) => f.set_input_type(*input_type)?,
                ActiveField::Secret(_) => tracing::warn!("input-type ignored by secret field"),
            },
            Command::Pattern(source) => match &self.field {
                ActiveField::Text(f) => {
                    let pattern = source.as_deref().map(Pattern::new).transpose()?;
                    f.set_pattern(pattern)?;
                }
                ActiveField::Secret(_) => tracing::warn!("pattern ignored by secret field"),
            },
            Command::Secret => {
                let config = self.fresh_config();
                self.field =
                    ActiveField::Secret(LimitedSecretField::new(self.queue.scheduler(), config));
            }
            Command::Text => {
                let config = self.fresh_config();
                self.field =
                    ActiveField::Text(LimitedTextField::new(self.queue.scheduler(), config));
            }
            Command::Reveal(revealed) => match &mut self.field {
                ActiveField::Secret(f) => f.set_revealed(*revealed),
                ActiveField::Text(_) => tracing::warn!("reveal ignored by text field"),
            },
        }
        self.settle()
    }

    /// Run queued corrections. Fails if they do not settle within
    /// [`TASK_BUDGET`] tasks.
    pub fn settle(&self) -> fence::Result<()> {
        let ran = self.queue.run_until_idle(TASK_BUDGET)?;
        if ran > 0 {
            tracing::debug!(ran, "corrections applied");
        }
        Ok(())
    }

    /// What the field would show.
    #[must_use]
    pub fn display(&self) -> String {
        match &self.field {
            ActiveField::Text(f) => f.text(),
            ActiveField::Secret(f) => f.display_text(),
        }
    }

    /// Real content, unmasked.
    #[must_use]
    pub fn text(&self) -> String {
        match &self.field {
            ActiveField::Text(f) => f.text(),
            ActiveField::Secret(f) => f.text(),
        }
    }

    /// Correction state of the field.
    #[must_use]
    pub fn state(&self) -> FieldState {
        match &self.field {
            ActiveField::Text(f) => f.state(),
            ActiveField::Secret(f) => f.state(),
        }
    }

    /// Short label for the active field kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match &self.field {
            ActiveField::Text(_) => "text",
            ActiveField::Secret(_) => "secret",
        }
    }

    fn push_str(&self, s: &str) -> fence::Result<()> {
        match &self.field {
            ActiveField::Text(f) => f.push_str(s)?,
            ActiveField::Secret(f) => f.push_str(s)?,
        }
        Ok(())
    }

    fn fresh_config(&self) -> FieldConfig {
        let max_length = match &self.field {
            ActiveField::Text(f) => f.max_length(),
            ActiveField::Secret(f) => f.max_length(),
        };
        FieldConfig::default()
            .with_columns(self.columns)
            .with_max_length(max_length)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("kind", &self.kind())
            .field("display", &self.display())
            .field("queue", &self.queue)
            .finish()
    }
}
