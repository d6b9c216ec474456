// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Command-line input logic and state management.
//!
//! This module implements the `:` command line: a text input component that,
//! when a line is submitted, parses it into a [`Command`] and posts it to the
//! event loop. Parse failures are posted too, so they show up as a toast.

use std::{path::PathBuf, sync::mpsc::Sender};

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use thiserror::Error;
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{
    events::AppEvent,
    i18n::Language,
    model::{FeedOrder, MediaId, ModerationAction},
    theme::ThemeMode,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Quit,
    Next,
    /// `None` toggles the current order.
    Order(Option<FeedOrder>),
    Lang(Option<Language>),
    Theme(Option<ThemeMode>),
    Name { first: String, last: String },
    Table(String),
    Logout,
    Upload { path: PathBuf, caption: Option<String> },
    Uploads,
    Delete(MediaId),
    Moderate(MediaId, ModerationAction),
    Stats,
    Purge(String),
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("{command}: missing {argument}")]
    MissingArgument { command: &'static str, argument: &'static str },

    #[error("{command}: invalid value '{value}'")]
    InvalidArgument { command: &'static str, value: String },

    #[error("purge: add 'confirm' after the PIN")]
    Unconfirmed,

    #[error("Unterminated quote")]
    UnterminatedQuote,
}

impl Command {
    /// Parses a command line. Arguments are split on whitespace; single or
    /// double quotes keep a path or caption containing spaces together.
    pub(crate) fn parse(line: &str) -> Result<Command, CommandError> {
        let words = split_words(line)?;
        let parts: Vec<&str> = words.iter().map(String::as_str).collect();

        match parts.as_slice() {
            ["q"] | ["quit"] => Ok(Command::Quit),
            ["next"] | ["n"] => Ok(Command::Next),

            ["order"] => Ok(Command::Order(None)),
            ["order", "newest"] => Ok(Command::Order(Some(FeedOrder::Newest))),
            ["order", "random"] => Ok(Command::Order(Some(FeedOrder::Random))),
            ["order", _, extra, ..] => Err(invalid("order", extra)),
            ["order", other] => Err(invalid("order", other)),

            ["lang"] => Ok(Command::Lang(None)),
            ["lang", code] => Language::parse(code)
                .map(|language| Command::Lang(Some(language)))
                .ok_or_else(|| invalid("lang", code)),
            ["lang", _, extra, ..] => Err(invalid("lang", extra)),

            ["theme"] => Ok(Command::Theme(None)),
            ["theme", mode] => ThemeMode::parse(mode)
                .map(|mode| Command::Theme(Some(mode)))
                .ok_or_else(|| invalid("theme", mode)),
            ["theme", _, extra, ..] => Err(invalid("theme", extra)),

            ["name"] => Err(missing("name", "first name")),
            ["name", _] => Err(missing("name", "last name")),
            ["name", first, last @ ..] => Ok(Command::Name {
                first: first.to_string(),
                last: last.join(" "),
            }),

            ["table"] => Err(missing("table", "table number")),
            ["table", number] if number.chars().all(|c| c.is_ascii_digit()) => Ok(Command::Table(number.to_string())),
            ["table", _, extra, ..] => Err(invalid("table", extra)),
            ["table", other] => Err(invalid("table", other)),

            ["logout"] => Ok(Command::Logout),

            ["upload"] => Err(missing("upload", "file path")),
            ["upload", path, caption @ ..] => Ok(Command::Upload {
                path: PathBuf::from(path),
                caption: (!caption.is_empty()).then(|| caption.join(" ")),
            }),

            ["uploads"] => Ok(Command::Uploads),

            ["delete"] => Err(missing("delete", "media id")),
            ["delete", id] => Ok(Command::Delete(media_id("delete", id)?)),
            ["delete", _, extra, ..] => Err(invalid("delete", extra)),

            [verb @ ("hide" | "unhide" | "star" | "unstar" | "remove"), rest @ ..] => {
                let action = moderation_action(verb);
                match rest {
                    [] => Err(missing(action.as_str(), "media id")),
                    [id] => Ok(Command::Moderate(media_id(action.as_str(), id)?, action)),
                    [_, extra, ..] => Err(invalid(action.as_str(), extra)),
                }
            }

            ["stats"] => Ok(Command::Stats),

            ["purge"] => Err(missing("purge", "PIN")),
            ["purge", _] => Err(CommandError::Unconfirmed),
            ["purge", pin, "confirm"] => Ok(Command::Purge(pin.to_string())),
            ["purge", _, other, ..] => Err(invalid("purge", other)),

            [] => Err(CommandError::Unknown(String::new())),
            [cmd, ..] => Err(CommandError::Unknown(cmd.to_string())),
        }
    }
}

fn split_words(line: &str) -> Result<Vec<String>, CommandError> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => word.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            (None, c) => {
                word.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_word {
        words.push(word);
    }
    Ok(words)
}

fn moderation_action(verb: &str) -> ModerationAction {
    match verb {
        "hide" => ModerationAction::Hide,
        "unhide" => ModerationAction::Unhide,
        "star" => ModerationAction::Star,
        "unstar" => ModerationAction::Unstar,
        _ => ModerationAction::Delete,
    }
}

fn media_id(command: &'static str, value: &str) -> Result<MediaId, CommandError> {
    value
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .map(MediaId)
        .ok_or_else(|| invalid(command, value))
}

fn missing(command: &'static str, argument: &'static str) -> CommandError {
    CommandError::MissingArgument { command, argument }
}

fn invalid(command: &'static str, value: &str) -> CommandError {
    CommandError::InvalidArgument {
        command,
        value: value.to_string(),
    }
}

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    /// Feeds a terminal event to the command line. Returns `true` if the
    /// event was consumed.
    pub(crate) fn handle_event(&mut self, event: Event, event_tx: &Sender<AppEvent>) -> Result<bool> {
        let Event::Key(key_event) = &event else {
            return Ok(false);
        };

        if !self.active {
            if key_event.code == KeyCode::Char(':') {
                self.active = true;
                return Ok(true);
            }
            return Ok(false);
        }

        match key_event.code {
            KeyCode::Esc => {
                self.active = false;
                self.input.reset();
            }

            KeyCode::Enter => {
                let buffer = self.input.value().trim().to_string();
                self.input.reset();
                self.active = false;

                if !buffer.is_empty() {
                    let event = match Command::parse(&buffer) {
                        Ok(command) => AppEvent::RunCommand(command),
                        Err(e) => AppEvent::CommandFailed(e),
                    };
                    event_tx.send(event)?;
                }
            }

            _ => {
                self.input.handle_event(&event);
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_line(commander: &mut Commander, tx: &Sender<AppEvent>, line: &str) {
        commander.handle_event(key(KeyCode::Char(':')), tx).unwrap();
        for c in line.chars() {
            commander.handle_event(key(KeyCode::Char(c)), tx).unwrap();
        }
        commander.handle_event(key(KeyCode::Enter), tx).unwrap();
    }

    #[test]
    fn parses_playback_commands() {
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
        assert_eq!(Command::parse("  next "), Ok(Command::Next));
        assert_eq!(Command::parse("order"), Ok(Command::Order(None)));
        assert_eq!(Command::parse("order random"), Ok(Command::Order(Some(FeedOrder::Random))));
        assert_eq!(Command::parse("lang es"), Ok(Command::Lang(Some(Language::Es))));
        assert_eq!(Command::parse("theme light"), Ok(Command::Theme(Some(ThemeMode::Light))));
    }

    #[test]
    fn rejects_unknown_values() {
        assert_eq!(
            Command::parse("order oldest"),
            Err(CommandError::InvalidArgument {
                command: "order",
                value: "oldest".to_string()
            })
        );
        assert!(Command::parse("lang fr").is_err());
        assert_eq!(Command::parse("dance"), Err(CommandError::Unknown("dance".to_string())));
    }

    #[test]
    fn name_keeps_multi_word_last_names() {
        assert_eq!(
            Command::parse("name Ana de la Cruz"),
            Ok(Command::Name {
                first: "Ana".to_string(),
                last: "de la Cruz".to_string()
            })
        );
        assert_eq!(
            Command::parse("name Ana"),
            Err(CommandError::MissingArgument {
                command: "name",
                argument: "last name"
            })
        );
    }

    #[test]
    fn upload_caption_is_optional() {
        assert_eq!(
            Command::parse("upload /tmp/a.jpg"),
            Ok(Command::Upload {
                path: PathBuf::from("/tmp/a.jpg"),
                caption: None
            })
        );
        assert_eq!(
            Command::parse("upload /tmp/a.jpg the first dance"),
            Ok(Command::Upload {
                path: PathBuf::from("/tmp/a.jpg"),
                caption: Some("the first dance".to_string())
            })
        );
    }

    #[test]
    fn quoted_path_keeps_its_spaces() {
        assert_eq!(
            Command::parse(r#"upload "/home/ana/Wedding Photos/cake.jpg" 'the cake' !"#),
            Ok(Command::Upload {
                path: PathBuf::from("/home/ana/Wedding Photos/cake.jpg"),
                caption: Some("the cake !".to_string())
            })
        );
        assert_eq!(Command::parse(r#"upload "/tmp/a b.jpg"#), Err(CommandError::UnterminatedQuote));
    }

    #[test]
    fn extra_arguments_are_reported() {
        let extra = |command: &'static str| -> Result<Command, CommandError> {
            Err(CommandError::InvalidArgument {
                command,
                value: "x".to_string(),
            })
        };

        assert_eq!(Command::parse("lang en x"), extra("lang"));
        assert_eq!(Command::parse("theme dark x"), extra("theme"));
        assert_eq!(Command::parse("table 5 x"), extra("table"));
        assert_eq!(Command::parse("order newest x"), extra("order"));
        assert_eq!(Command::parse("delete 3 x"), extra("delete"));
    }

    #[test]
    fn moderation_verbs_map_to_actions() {
        assert_eq!(Command::parse("star 7"), Ok(Command::Moderate(MediaId(7), ModerationAction::Star)));
        assert_eq!(Command::parse("remove 9"), Ok(Command::Moderate(MediaId(9), ModerationAction::Delete)));
        assert_eq!(Command::parse("delete 3"), Ok(Command::Delete(MediaId(3))));
        assert!(Command::parse("hide abc").is_err());
        assert!(Command::parse("hide 0").is_err());
    }

    #[test]
    fn table_must_be_numeric() {
        assert_eq!(Command::parse("table 12"), Ok(Command::Table("12".to_string())));
        assert!(Command::parse("table twelve").is_err());
    }

    #[test]
    fn purge_requires_confirmation() {
        assert_eq!(Command::parse("purge 1234"), Err(CommandError::Unconfirmed));
        assert_eq!(Command::parse("purge 1234 confirm"), Ok(Command::Purge("1234".to_string())));
    }

    #[test]
    fn submitted_line_is_posted_as_command() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        type_line(&mut commander, &tx, "order newest");

        assert!(!commander.active());
        assert!(matches!(
            rx.try_recv(),
            Ok(AppEvent::RunCommand(Command::Order(Some(FeedOrder::Newest))))
        ));
    }

    #[test]
    fn parse_failure_is_posted_as_error() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        type_line(&mut commander, &tx, "purge 42");

        assert!(matches!(rx.try_recv(), Ok(AppEvent::CommandFailed(CommandError::Unconfirmed))));
    }

    #[test]
    fn inactive_commander_ignores_other_keys() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        assert!(!commander.handle_event(key(KeyCode::Char('n')), &tx).unwrap());
        assert!(commander.handle_event(key(KeyCode::Char(':')), &tx).unwrap());
        assert!(commander.handle_event(key(KeyCode::Esc), &tx).unwrap());
        assert!(!commander.active());
        assert!(rx.try_recv().is_err());
    }
}
