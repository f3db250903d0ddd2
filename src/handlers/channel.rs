use tracing::debug;

use super::{channel_param, source_mask};
use crate::config::Dialect;
use crate::error::{MessageError, Result};
use crate::event::Event;
use crate::message::Message;
use crate::registry::Context;
use crate::user::User;

/// JOIN: an unknown channel means the local user joined it.
pub(crate) fn handle_join(ctx: &mut Context<'_>, msg: &Message) -> Result<()> {
    let name = channel_param(msg)?;
    let mask = source_mask(msg)?;
    let session = ctx.session_mut();

    if !session.roster().contains(name) {
        let channel = session.new_channel(name);
        session.roster_mut().insert(channel)?;
        if session.dialect() == Dialect::Twitch {
            // Room state is incomplete until ROOMSTATE; the join event waits for it.
            debug!(channel = name, "joined, waiting for ROOMSTATE");
            return Ok(());
        }
        session.user_mut().update(&mask);
        debug!(channel = name, "joined");
    }

    let channel = session
        .roster()
        .get(name)
        .cloned()
        .ok_or_else(|| MessageError::unknown_channel(msg.command(), name))?;
    ctx.emit(Event::ChannelJoined {
        channel,
        user: User::from_hostmask(mask),
    });
    Ok(())
}

/// PART: the local user leaving drops the channel from the roster.
pub(crate) fn handle_part(ctx: &mut Context<'_>, msg: &Message) -> Result<()> {
    let name = channel_param(msg)?;
    if !ctx.session().roster().contains(name) {
        return Err(MessageError::unknown_channel(msg.command(), name).into());
    }
    let user = User::from_hostmask(source_mask(msg)?);
    let session = ctx.session_mut();

    if session.is_local_user(&user) {
        if let Some(channel) = session.roster_mut().remove(name) {
            debug!(channel = name, "left");
            ctx.emit(Event::ChannelLeft { channel });
        }
    } else if let Some(channel) = session.roster().get(name).cloned() {
        ctx.emit(Event::UserLeft { channel, user });
    }
    Ok(())
}

/// MODE: tracks `+o`/`-o` on joined channels. User modes are ignored.
///
/// Each `o` takes the next nickname argument, starting at parameter 2;
/// other argument-taking modes are skipped over.
pub(crate) fn handle_mode(ctx: &mut Context<'_>, msg: &Message) -> Result<()> {
    let (target, flags) = match msg.params() {
        [target, flags, ..] => (target.as_str(), flags.as_str()),
        params => return Err(MessageError::not_enough(msg.command(), 2, params.len()).into()),
    };
    let Some(name) = target.strip_prefix('#') else {
        return Ok(());
    };
    if !ctx.session().roster().contains(name) {
        return Err(MessageError::unknown_channel(msg.command(), name).into());
    }

    let mut grant = flags.starts_with('+');
    let mut next_arg = 2;
    for mode in flags.chars() {
        match mode {
            '+' => grant = true,
            '-' => grant = false,
            'o' => {
                let nickname = msg.param(next_arg).ok_or_else(|| {
                    MessageError::not_enough(msg.command(), next_arg + 1, msg.params().len())
                })?;
                next_arg += 1;
                operator_changed(ctx, name, User::new(nickname), grant);
            }
            'v' | 'h' | 'b' | 'e' | 'I' | 'k' => next_arg += 1,
            'l' if grant => next_arg += 1,
            _ => {}
        }
    }
    Ok(())
}

fn operator_changed(ctx: &mut Context<'_>, name: &str, user: User, granted: bool) {
    let session = ctx.session_mut();
    let is_local = session.is_local_user(&user);
    let Some(channel) = session.roster_mut().get_mut(name) else {
        return;
    };
    if is_local {
        channel.set_operator(granted);
    }
    let channel = channel.clone();
    ctx.emit(Event::OperatorStatusChanged {
        channel,
        user,
        granted,
    });
}
