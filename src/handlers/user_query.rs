//! User query handler: GET_NAMES

use super::{Context, Dispatch};
use crate::error::HandlerResult;
use relay_proto::MAX_PAYLOAD_LEN;

/// Reply to GET_NAMES when nobody has a name yet.
pub(super) const NO_CLIENTS: &str = "No clients connected";

/// Appended when the listing had to be cut to fit one frame.
pub(super) const TRUNCATED: &str = ", ...";

const SEPARATOR: &str = ", ";

/// Join `names`, dropping trailing names once the listing would not fit in
/// a single frame.
fn list_names(names: &[&str]) -> String {
    let mut listing = String::new();
    for (i, name) in names.iter().enumerate() {
        let sep = if i == 0 { "" } else { SEPARATOR };
        let is_last = i + 1 == names.len();
        let reserve = if is_last { 0 } else { TRUNCATED.len() };
        if listing.len() + sep.len() + name.len() + reserve > MAX_PAYLOAD_LEN {
            listing.push_str(TRUNCATED);
            break;
        }
        listing.push_str(sep);
        listing.push_str(name);
    }
    listing
}

/// Handler for GET_NAMES command.
///
/// `GET_NAMES`
///
/// Replies with every registered name, comma-separated, in registration order.
pub(super) fn handle_get_names(ctx: &mut Context<'_>) -> HandlerResult<Dispatch> {
    let text = if ctx.registry.is_empty() {
        NO_CLIENTS.to_string()
    } else {
        list_names(&ctx.registry.all_names())
    };
    Ok(Dispatch::reply(ctx.sender, text))
}
