//! Script language parsing and execution.
//!
//! One command per line. Keywords are case-insensitive; blank lines and lines
//! starting with `#` are skipped.
//!
//! ```text
//! SET <key> <value...>   value is the rest of the line, "" for empty
//! GET <key>              prints the value or NULL
//! DELETE <key>
//! BEGIN | COMMIT | ROLLBACK
//! DEPTH | DUMP | STATS
//! ```

use layerkv_core::{Config, CoreError, KeyValueStore, TransactionManager};
use thiserror::Error;
use tracing::debug;

/// Printed by `GET` for an absent key.
pub const NULL: &str = "NULL";

/// Errors raised while running a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The first word of the line is not a command.
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand {
        /// 1-based line number.
        line: usize,
        /// The offending word.
        command: String,
    },

    /// A required argument is missing.
    #[error("line {line}: {command} requires a {argument}")]
    MissingArgument {
        /// 1-based line number.
        line: usize,
        /// The command keyword.
        command: &'static str,
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// Extra words follow a command that takes none (or fewer).
    #[error("line {line}: unexpected argument '{argument}' for {command}")]
    UnexpectedArgument {
        /// 1-based line number.
        line: usize,
        /// The command keyword.
        command: &'static str,
        /// The extra text.
        argument: String,
    },

    /// The transaction manager rejected the command.
    #[error("line {line}: {source}")]
    Transaction {
        /// 1-based line number.
        line: usize,
        /// The underlying error.
        source: CoreError,
    },
}

/// A parsed script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    /// `SET key value`
    Set {
        /// Key
        key: String,
        /// Value
        value: String,
    },
    /// `GET key`
    Get {
        /// Key
        key: String,
    },
    /// `DELETE key`
    Delete {
        /// Key
        key: String,
    },
    /// `BEGIN`
    Begin,
    /// `COMMIT`
    Commit,
    /// `ROLLBACK`
    Rollback,
    /// `DEPTH`
    Depth,
    /// `DUMP`
    Dump,
    /// `STATS`
    Stats,
}

/// Splits off the first whitespace-delimited word.
fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

fn no_args(line: usize, command: &'static str, rest: &str) -> Result<(), ScriptError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ScriptError::UnexpectedArgument {
            line,
            command,
            argument: rest.to_string(),
        })
    }
}

fn key_arg(line: usize, command: &'static str, rest: &str) -> Result<String, ScriptError> {
    let (key, extra) = split_word(rest);
    if key.is_empty() {
        return Err(ScriptError::MissingArgument {
            line,
            command,
            argument: "key",
        });
    }
    no_args(line, command, extra)?;
    Ok(key.to_string())
}

/// Parses one line. Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(text: &str, line: usize) -> Result<Option<ScriptCommand>, ScriptError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = split_word(text);
    let command = match word.to_ascii_uppercase().as_str() {
        "SET" => {
            let (key, value) = split_word(rest);
            if key.is_empty() {
                return Err(ScriptError::MissingArgument {
                    line,
                    command: "SET",
                    argument: "key",
                });
            }
            let value = match value.trim_end() {
                "" => {
                    return Err(ScriptError::MissingArgument {
                        line,
                        command: "SET",
                        argument: "value",
                    })
                }
                "\"\"" => String::new(),
                value => value.to_string(),
            };
            ScriptCommand::Set {
                key: key.to_string(),
                value,
            }
        }
        "GET" => ScriptCommand::Get {
            key: key_arg(line, "GET", rest)?,
        },
        "DELETE" => ScriptCommand::Delete {
            key: key_arg(line, "DELETE", rest)?,
        },
        "BEGIN" => {
            no_args(line, "BEGIN", rest)?;
            ScriptCommand::Begin
        }
        "COMMIT" => {
            no_args(line, "COMMIT", rest)?;
            ScriptCommand::Commit
        }
        "ROLLBACK" => {
            no_args(line, "ROLLBACK", rest)?;
            ScriptCommand::Rollback
        }
        "DEPTH" => {
            no_args(line, "DEPTH", rest)?;
            ScriptCommand::Depth
        }
        "DUMP" => {
            no_args(line, "DUMP", rest)?;
            ScriptCommand::Dump
        }
        "STATS" => {
            no_args(line, "STATS", rest)?;
            ScriptCommand::Stats
        }
        _ => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: word.to_string(),
            })
        }
    };
    Ok(Some(command))
}

/// A transaction manager driven by script commands.
#[derive(Debug)]
pub struct Session {
    manager: TransactionManager,
}

impl Session {
    /// Creates a session over an empty store.
    pub fn new(config: Config) -> Self {
        Self {
            manager: TransactionManager::with_config(config),
        }
    }

    /// Returns the underlying manager.
    pub fn manager(&self) -> &TransactionManager {
        &self.manager
    }

    /// Parses and executes one line, returning any text it prints.
    pub fn run_line(&mut self, text: &str, line: usize) -> Result<Option<String>, ScriptError> {
        match parse_line(text, line)? {
            Some(command) => self
                .execute(&command)
                .map_err(|source| ScriptError::Transaction { line, source }),
            None => Ok(None),
        }
    }

    /// Executes one command, returning any text it prints.
    pub fn execute(&mut self, command: &ScriptCommand) -> Result<Option<String>, CoreError> {
        debug!(?command, depth = self.manager.depth(), "execute");
        let output = match command {
            ScriptCommand::Set { key, value } => {
                self.manager.set(key.as_str(), value.as_str());
                None
            }
            ScriptCommand::Get { key } => {
                Some(self.manager.get(key).unwrap_or(NULL).to_string())
            }
            ScriptCommand::Delete { key } => {
                self.manager.delete(key.as_str());
                None
            }
            ScriptCommand::Begin => {
                self.manager.start_transaction();
                None
            }
            ScriptCommand::Commit => {
                self.manager.commit()?;
                None
            }
            ScriptCommand::Rollback => {
                self.manager.rollback()?;
                None
            }
            ScriptCommand::Depth => Some(self.manager.depth().to_string()),
            ScriptCommand::Dump => {
                let entries = self.manager.store().snapshot();
                if entries.is_empty() {
                    Some("(empty)".to_string())
                } else {
                    Some(
                        entries
                            .iter()
                            .map(|(k, v)| format!("{k}={v}"))
                            .collect::<Vec<_>>()
                            .join("\n"),
                    )
                }
            }
            ScriptCommand::Stats => {
                let stats = self.manager.stats();
                Some(format!(
                    "started={} committed={} rolled_back={} implicit={} sets={} deletes={} undone={} max_depth={}",
                    stats.transactions_started,
                    stats.transactions_committed,
                    stats.transactions_rolled_back,
                    stats.implicit_transactions,
                    stats.sets,
                    stats.deletes,
                    stats.records_undone,
                    stats.max_depth,
                ))
            }
        };
        Ok(output)
    }
}
