//! Messaging handler: MSG
//!
//! Direct messages go to one named recipient; the reserved broadcast target
//! fans out to every other named client. In both cases the block relation is
//! checked from the recipient's side.

use super::{Context, Dispatch};
use crate::error::{HandlerError, HandlerResult};
use relay_proto::{frame, is_broadcast};
use tracing::debug;

/// Acknowledgment sent to the originator of a broadcast.
pub(super) const BROADCAST_ACK: &str = "Broadcast sent";

/// Refuse bodies that would not fit in a single frame once prefixed.
fn check_fits(body: &str) -> HandlerResult<()> {
    frame::check_payload(body).map_err(|_| HandlerError::MessageTooLong(body.len()))
}

/// Handler for MSG command.
///
/// `MSG <target> <text...>`
pub(super) fn handle_msg(ctx: &mut Context<'_>, target: &str, text: &str) -> HandlerResult<Dispatch> {
    let sender_name = ctx.sender_name()?;

    if is_broadcast(target) {
        return broadcast(ctx, &sender_name, text);
    }

    let recipient = ctx
        .registry
        .conn_of(target)
        .ok_or_else(|| HandlerError::RecipientNotFound(target.to_string()))?;

    if ctx.blocks.is_blocked(target, &sender_name) {
        return Err(HandlerError::BlockedByRecipient(target.to_string()));
    }

    let body = format!("{sender_name} sent: {text}");
    check_fits(&body)?;
    Ok(Dispatch::reply(recipient, body))
}

fn broadcast(ctx: &Context<'_>, sender_name: &str, text: &str) -> HandlerResult<Dispatch> {
    let body = format!("{sender_name} broadcasted: {text}");
    check_fits(&body)?;

    let mut dispatch = Dispatch::default();
    for (conn, name) in ctx.registry.iter() {
        if conn == ctx.sender || ctx.blocks.is_blocked(name, sender_name) {
            continue;
        }
        dispatch.push(conn, body.as_str());
    }
    debug!(
        conn = %ctx.sender,
        recipients = dispatch.deliveries.len(),
        "broadcast fanned out"
    );

    dispatch.push(ctx.sender, BROADCAST_ACK);
    Ok(dispatch)
}
