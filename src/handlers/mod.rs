//! Command handlers.
//!
//! [`dispatch`] is the only place protocol semantics live: it takes one frame
//! of text from a connection, applies it to the registry and block store, and
//! returns the frames to send in response. It keeps no state of its own
//! between calls and performs no I/O.

mod connection;
mod messaging;
mod user_query;
mod user_status;

pub(crate) use connection::release;

use crate::error::{HandlerError, HandlerResult};
use crate::state::{BlockStore, ConnId, Registry};
use relay_proto::Command;
use tracing::debug;

/// Mutable state a command may touch, plus who sent it.
pub struct Context<'a> {
    /// Connection the command arrived on.
    pub sender: ConnId,
    pub registry: &'a mut Registry,
    pub blocks: &'a mut BlockStore,
}

impl Context<'_> {
    /// The sender's display name, required by commands that act as a user.
    fn sender_name(&self) -> HandlerResult<String> {
        self.registry
            .name_of(self.sender)
            .map(str::to_string)
            .ok_or(HandlerError::NotRegistered)
    }
}

/// One outgoing frame and the connection it is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub to: ConnId,
    pub text: String,
}

/// Everything a command produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Frames to queue, in order.
    pub deliveries: Vec<Delivery>,
    /// Close the sender once its queued frames are flushed.
    pub close: bool,
}

impl Dispatch {
    /// A single frame to `to`.
    pub fn reply(to: ConnId, text: impl Into<String>) -> Self {
        let mut dispatch = Self::default();
        dispatch.push(to, text);
        dispatch
    }

    /// Nothing to send; close the sender.
    pub fn close() -> Self {
        Self {
            deliveries: Vec::new(),
            close: true,
        }
    }

    pub fn push(&mut self, to: ConnId, text: impl Into<String>) {
        self.deliveries.push(Delivery {
            to,
            text: text.into(),
        });
    }
}

/// Interpret one frame from `ctx.sender`.
///
/// Rejected or malformed commands produce exactly one `ERROR:` frame
/// addressed back to the sender.
pub fn dispatch(ctx: &mut Context<'_>, text: &str) -> Dispatch {
    let result = Command::parse(text)
        .map_err(HandlerError::from)
        .and_then(|command| {
            debug!(conn = %ctx.sender, command = command.keyword(), "dispatching");
            match command {
                Command::Name(name) => connection::handle_name(ctx, &name),
                Command::GetNames => user_query::handle_get_names(ctx),
                Command::Msg { target, text } => messaging::handle_msg(ctx, &target, &text),
                Command::Block(name) => user_status::handle_block(ctx, &name),
                Command::Exit => connection::handle_exit(ctx),
            }
        });

    result.unwrap_or_else(|err| {
        debug!(
            conn = %ctx.sender,
            code = err.error_code(),
            error = %err,
            "command rejected"
        );
        Dispatch::reply(ctx.sender, err.to_reply())
    })
}
