//! Unified error handling for relayd.
//!
//! This module provides the error hierarchy for command handling, with
//! conversions from the protocol and registry layers, client-visible reply
//! text, and static codes for log labeling.
//!
//! Connection-fatal failures (framing, transport) never reach this type; they
//! are [`relay_proto::ProtocolError`]s handled at the connection boundary.

use relay_proto::CommandError;
use thiserror::Error;

use crate::state::RegistryError;

/// Which part of the taxonomy a [`HandlerError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The command or its arguments were refused.
    Validation,
    /// The recipient refuses messages from the sender.
    Permission,
}

/// Errors that can occur during command handling.
///
/// Every variant is recoverable: the sender gets one `ERROR:` reply and the
/// connection stays open.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("empty command")]
    EmptyCommand,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("too many arguments for {0}")]
    TooManyArguments(&'static str),

    #[error("name not specified")]
    NameNotSpecified,

    #[error("name cannot be empty")]
    EmptyName,

    #[error("name is reserved: {0}")]
    ReservedName(String),

    #[error("name already in use: {0}")]
    NameInUse(String),

    #[error("name too long: {0} bytes")]
    NameTooLong(usize),

    #[error("not registered")]
    NotRegistered,

    #[error("malformed MSG")]
    MalformedMsg,

    #[error("no such recipient: {0}")]
    RecipientNotFound(String),

    #[error("blocked by recipient: {0}")]
    BlockedByRecipient(String),

    #[error("message too long: {0} bytes")]
    MessageTooLong(usize),

    #[error("nobody specified to block")]
    MissingBlockee,

    #[error("cannot block yourself")]
    SelfBlock,

    #[error("no such user to block: {0}")]
    BlockeeNotFound(String),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyCommand => "empty_command",
            Self::UnknownCommand(_) => "unknown_command",
            Self::TooManyArguments(_) => "too_many_arguments",
            Self::NameNotSpecified => "name_not_specified",
            Self::EmptyName => "empty_name",
            Self::ReservedName(_) => "reserved_name",
            Self::NameInUse(_) => "name_in_use",
            Self::NameTooLong(_) => "name_too_long",
            Self::NotRegistered => "not_registered",
            Self::MalformedMsg => "malformed_msg",
            Self::RecipientNotFound(_) => "recipient_not_found",
            Self::BlockedByRecipient(_) => "blocked_by_recipient",
            Self::MessageTooLong(_) => "message_too_long",
            Self::MissingBlockee => "missing_blockee",
            Self::SelfBlock => "self_block",
            Self::BlockeeNotFound(_) => "blockee_not_found",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BlockedByRecipient(_) => ErrorKind::Permission,
            _ => ErrorKind::Validation,
        }
    }

    /// The reply frame sent back to the client.
    pub fn to_reply(&self) -> String {
        let reason = match self {
            Self::EmptyCommand => "Empty command",
            Self::UnknownCommand(_) => "Unknown command",
            Self::TooManyArguments(keyword @ ("GET_NAMES" | "EXIT")) => {
                return format!("ERROR: {keyword} takes no arguments");
            }
            Self::TooManyArguments(keyword) => {
                return format!("ERROR: {keyword} takes exactly one argument");
            }
            Self::NameNotSpecified => "Name not specified",
            Self::EmptyName => "Name cannot be empty",
            Self::ReservedName(_) => "Name is reserved",
            Self::NameInUse(_) => "Name already in use",
            Self::NameTooLong(_) => "Name too long",
            Self::NotRegistered => "Set your name first",
            Self::MalformedMsg => "Incorrect MSG format. Use MSG <name> <message>",
            Self::RecipientNotFound(_) => "Recipient not found",
            Self::BlockedByRecipient(_) => "You are blocked by the recipient",
            Self::MessageTooLong(_) => "Message too long",
            Self::MissingBlockee => "Specify who to block",
            Self::SelfBlock => "Cannot block yourself",
            Self::BlockeeNotFound(_) => "User to block not found",
        };
        format!("ERROR: {reason}")
    }
}

impl From<CommandError> for HandlerError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Empty => Self::EmptyCommand,
            CommandError::MissingName => Self::NameNotSpecified,
            CommandError::MissingBlockee => Self::MissingBlockee,
            CommandError::MalformedMsg => Self::MalformedMsg,
            CommandError::TooManyArguments(keyword) => Self::TooManyArguments(keyword),
            CommandError::Unknown(keyword) => Self::UnknownCommand(keyword),
        }
    }
}

impl From<RegistryError> for HandlerError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::EmptyName => Self::EmptyName,
            RegistryError::ReservedName(name) => Self::ReservedName(name),
            RegistryError::DuplicateName(name) => Self::NameInUse(name),
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult<T> = Result<T, HandlerError>;
