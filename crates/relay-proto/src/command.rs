//! Command grammar carried inside frame payloads.
//!
//! Every client frame holds one command. The keyword is the first
//! whitespace-delimited token and is case-sensitive:
//!
//! ```text
//! NAME <name>
//! GET_NAMES
//! MSG <target> <text...>
//! BLOCK <name>
//! EXIT
//! ```
//!
//! `MSG` text runs to the end of the payload and may contain spaces.

use std::fmt;

use thiserror::Error;

/// Reserved `MSG` target that fans a message out to every named client.
pub const BROADCAST_TARGET: &str = "broadcast";

/// Whether `name` is the reserved broadcast token.
///
/// The comparison ignores ASCII case, and is used both to refuse the token as
/// a display name and to recognise it as a `MSG` target.
pub fn is_broadcast(name: &str) -> bool {
    name.eq_ignore_ascii_case(BROADCAST_TARGET)
}

/// A parsed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `NAME <name>`: claim a display name.
    Name(String),
    /// `GET_NAMES`: list the names currently in use.
    GetNames,
    /// `MSG <target> <text>`: send to one name or to [`BROADCAST_TARGET`].
    Msg {
        /// Recipient name or the broadcast token.
        target: String,
        /// Message body.
        text: String,
    },
    /// `BLOCK <name>`: refuse further messages from `name`.
    Block(String),
    /// `EXIT`: leave and close the connection.
    Exit,
}

/// Reasons a payload is not a well-formed command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Nothing but whitespace.
    #[error("empty command")]
    Empty,

    /// `NAME` without an argument.
    #[error("name not specified")]
    MissingName,

    /// `BLOCK` without an argument.
    #[error("nobody specified to block")]
    MissingBlockee,

    /// `MSG` missing its target or its text.
    #[error("MSG needs a target and a message")]
    MalformedMsg,

    /// A known keyword followed by unexpected arguments.
    #[error("too many arguments for {0}")]
    TooManyArguments(&'static str),

    /// Unrecognised keyword.
    #[error("unknown command: {0}")]
    Unknown(String),
}

/// Split off the first whitespace-delimited word; the rest is left-trimmed.
fn split_word(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

fn single_arg(
    rest: &str,
    keyword: &'static str,
    missing: CommandError,
) -> Result<String, CommandError> {
    let (arg, extra) = split_word(rest);
    if arg.is_empty() {
        return Err(missing);
    }
    if !extra.is_empty() {
        return Err(CommandError::TooManyArguments(keyword));
    }
    Ok(arg.to_string())
}

fn no_args(rest: &str, keyword: &'static str, command: Command) -> Result<Command, CommandError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::TooManyArguments(keyword))
    }
}

impl Command {
    /// Parse a frame payload.
    pub fn parse(text: &str) -> Result<Self, CommandError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CommandError::Empty);
        }

        let (keyword, rest) = split_word(text);
        match keyword {
            "NAME" => single_arg(rest, "NAME", CommandError::MissingName).map(Self::Name),
            "GET_NAMES" => no_args(rest, "GET_NAMES", Self::GetNames),
            "MSG" => {
                let (target, body) = split_word(rest);
                if target.is_empty() || body.is_empty() {
                    return Err(CommandError::MalformedMsg);
                }
                Ok(Self::Msg {
                    target: target.to_string(),
                    text: body.to_string(),
                })
            }
            "BLOCK" => single_arg(rest, "BLOCK", CommandError::MissingBlockee).map(Self::Block),
            "EXIT" => no_args(rest, "EXIT", Self::Exit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// The command keyword, for logging.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Name(_) => "NAME",
            Self::GetNames => "GET_NAMES",
            Self::Msg { .. } => "MSG",
            Self::Block(_) => "BLOCK",
            Self::Exit => "EXIT",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "NAME {name}"),
            Self::GetNames => f.write_str("GET_NAMES"),
            Self::Msg { target, text } => write!(f, "MSG {target} {text}"),
            Self::Block(name) => write!(f, "BLOCK {name}"),
            Self::Exit => f.write_str("EXIT"),
        }
    }
}

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name() {
        assert_eq!(
            Command::parse("NAME alice"),
            Ok(Command::Name("alice".to_string()))
        );
        assert_eq!(
            Command::parse("  NAME   bob  "),
            Ok(Command::Name("bob".to_string()))
        );
        assert_eq!(Command::parse("NAME"), Err(CommandError::MissingName));
        assert_eq!(
            Command::parse("NAME a b"),
            Err(CommandError::TooManyArguments("NAME"))
        );
    }

    #[test]
    fn test_parse_msg_keeps_inner_spacing() {
        assert_eq!(
            Command::parse("MSG bob hello   there, bob"),
            Ok(Command::Msg {
                target: "bob".to_string(),
                text: "hello   there, bob".to_string(),
            })
        );
        assert_eq!(
            Command::parse("MSG  broadcast\thi"),
            Ok(Command::Msg {
                target: "broadcast".to_string(),
                text: "hi".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_msg_malformed() {
        assert_eq!(Command::parse("MSG"), Err(CommandError::MalformedMsg));
        assert_eq!(Command::parse("MSG bob"), Err(CommandError::MalformedMsg));
        assert_eq!(Command::parse("MSG bob   "), Err(CommandError::MalformedMsg));
    }

    #[test]
    fn test_parse_no_arg_commands() {
        assert_eq!(Command::parse("GET_NAMES"), Ok(Command::GetNames));
        assert_eq!(Command::parse("EXIT"), Ok(Command::Exit));
        assert_eq!(
            Command::parse("EXIT now"),
            Err(CommandError::TooManyArguments("EXIT"))
        );
        assert_eq!(
            Command::parse("GET_NAMES all"),
            Err(CommandError::TooManyArguments("GET_NAMES"))
        );
    }

    #[test]
    fn test_parse_block() {
        assert_eq!(
            Command::parse("BLOCK carol"),
            Ok(Command::Block("carol".to_string()))
        );
        assert_eq!(Command::parse("BLOCK"), Err(CommandError::MissingBlockee));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(
            Command::parse("name alice"),
            Err(CommandError::Unknown("name".to_string()))
        );
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
    }

    #[test]
    fn test_display_reparses() {
        let cmd = Command::Msg {
            target: "bob".to_string(),
            text: "see you at 5".to_string(),
        };
        assert_eq!(cmd.to_string(), "MSG bob see you at 5");
        assert_eq!(cmd.to_string().parse::<Command>(), Ok(cmd));
    }

    #[test]
    fn test_is_broadcast() {
        assert!(is_broadcast("broadcast"));
        assert!(is_broadcast("BROADCAST"));
        assert!(is_broadcast("Broadcast"));
        assert!(!is_broadcast("broadcaster"));
    }
}
