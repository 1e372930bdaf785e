//! Connection handlers: NAME, EXIT
//!
//! Handles claiming a display name and leaving the relay.

use super::{Context, Dispatch};
use crate::error::{HandlerError, HandlerResult};
use crate::state::{Assigned, BlockStore, ConnId, Registry};
use relay_proto::frame;
use tracing::{debug, info};

/// Handler for NAME command.
///
/// `NAME <name>`
///
/// Claims `name` for the sender. A sender that already has a name is renamed,
/// and its block relations follow it.
pub(super) fn handle_name(ctx: &mut Context<'_>, name: &str) -> HandlerResult<Dispatch> {
    // A name whose greeting cannot be framed would be taken without the
    // client ever hearing back.
    let greeting = format!("HELLO {name}");
    if frame::check_payload(&greeting).is_err() {
        return Err(HandlerError::NameTooLong(name.len()));
    }

    match ctx.registry.assign(ctx.sender, name)? {
        Assigned::New => info!(conn = %ctx.sender, name = %name, "name registered"),
        Assigned::Unchanged => {}
        Assigned::Renamed { old } => {
            ctx.blocks.rename(&old, name);
            info!(conn = %ctx.sender, old = %old, name = %name, "name changed");
        }
    }
    Ok(Dispatch::reply(ctx.sender, greeting))
}

/// Handler for EXIT command.
///
/// `EXIT`
///
/// Releases the sender's name and asks for the connection to be closed.
pub(super) fn handle_exit(ctx: &mut Context<'_>) -> HandlerResult<Dispatch> {
    release(ctx.registry, ctx.blocks, ctx.sender);
    Ok(Dispatch::close())
}

/// Drop `conn`'s name and the block list it held.
///
/// Shared by EXIT and by the hub when a connection goes away on its own.
pub(crate) fn release(
    registry: &mut Registry,
    blocks: &mut BlockStore,
    conn: ConnId,
) -> Option<String> {
    let name = registry.unassign(conn)?;
    blocks.forget(&name);
    debug!(%conn, name = %name, "name released");
    Some(name)
}
