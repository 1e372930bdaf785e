//! User status handler: BLOCK
//!
//! There is no way to lift a block; it lasts until either name is released.

use super::{Context, Dispatch};
use crate::error::{HandlerError, HandlerResult};
use tracing::info;

/// Handler for BLOCK command.
///
/// `BLOCK <name>`
///
/// Stops `name` from messaging the sender, directly or by broadcast.
pub(super) fn handle_block(ctx: &mut Context<'_>, blockee: &str) -> HandlerResult<Dispatch> {
    let sender_name = ctx.sender_name()?;

    if sender_name == blockee {
        return Err(HandlerError::SelfBlock);
    }
    if ctx.registry.conn_of(blockee).is_none() {
        return Err(HandlerError::BlockeeNotFound(blockee.to_string()));
    }

    if ctx.blocks.block(&sender_name, blockee) {
        info!(conn = %ctx.sender, blocker = %sender_name, blockee, "user blocked");
    }
    Ok(Dispatch::reply(ctx.sender, "User blocked"))
}
