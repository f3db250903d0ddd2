use tracing::debug;

use super::source_mask;
use crate::casemap::irc_eq;
use crate::error::{MessageError, Result};
use crate::message::Message;
use crate::registry::Context;
use crate::user::User;

pub(crate) fn handle_ping(ctx: &mut Context<'_>, msg: &Message) -> Result<()> {
    let token = msg
        .param(0)
        .ok_or_else(|| MessageError::not_enough(msg.command(), 1, 0))?;
    ctx.send_pong(token);
    debug!("answered PING");
    Ok(())
}

/// ERR_NICKNAMEINUSE: retry once with `_` appended.
pub(crate) fn handle_nickname_in_use(ctx: &mut Context<'_>, msg: &Message) -> Result<()> {
    if msg.params().len() < 3 {
        return Ok(());
    }
    let rejected = &msg.params()[1];
    let session = ctx.session_mut();
    if !irc_eq(rejected, session.user().nickname()) {
        return Ok(());
    }
    if !session.claim_nick_retry() {
        debug!(nickname = %rejected, "nickname still in use, not retrying");
        return Ok(());
    }

    let nickname = format!("{}_", session.user().nickname());
    session.user_mut().set_nickname(nickname.as_str());
    debug!(%nickname, "nickname in use, trying alternative");
    ctx.send_nick(&nickname);
    Ok(())
}

/// NICK: follow renames of the local user.
pub(crate) fn handle_nick(ctx: &mut Context<'_>, msg: &Message) -> Result<()> {
    let [nickname] = msg.params() else {
        return Ok(());
    };
    let user = User::from_hostmask(source_mask(msg)?);
    let session = ctx.session_mut();
    if session.is_local_user(&user) {
        debug!(from = user.nickname(), to = %nickname, "local nickname changed");
        session.user_mut().set_nickname(nickname.as_str());
    }
    Ok(())
}
