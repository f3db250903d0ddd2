//! The Twitch handler layer, installed over the base layer.

use std::time::Duration;

use tracing::debug;

use super::tags::{numeric_tag, parse_badges, required_numeric, required_tag};
use super::{SubscriptionPlan, TwitchUserInfo};
use crate::channel::Channel;
use crate::error::{MessageError, Result};
use crate::event::{Cheer, Event, Subscription};
use crate::handlers::{channel_param, messaging};
use crate::message::Message;
use crate::registry::{Context, HandlerEntry};
use crate::targeted::TargetedMessage;
use crate::user::{Source, User};

pub const TWITCH_HANDLERS: &[HandlerEntry] = &[
    HandlerEntry {
        commands: &["PRIVMSG"],
        handler: handle_privmsg,
    },
    HandlerEntry {
        commands: &["USERNOTICE"],
        handler: handle_usernotice,
    },
    HandlerEntry {
        commands: &["ROOMSTATE"],
        handler: handle_roomstate,
    },
    HandlerEntry {
        commands: &["USERSTATE"],
        handler: handle_userstate,
    },
    HandlerEntry {
        commands: &["CLEARCHAT"],
        handler: handle_clearchat,
    },
    HandlerEntry {
        commands: &["HOSTTARGET"],
        handler: handle_hosttarget,
    },
];

/// Parameter 0 as the name of a joined channel.
fn joined_channel<'m>(ctx: &Context<'_>, msg: &'m Message) -> Result<&'m str, MessageError> {
    let name = channel_param(msg)?;
    if ctx.session().roster().contains(name) {
        Ok(name)
    } else {
        Err(MessageError::unknown_channel(msg.command(), name))
    }
}

fn channel_snapshot(ctx: &Context<'_>, msg: &Message, name: &str) -> Result<Channel, MessageError> {
    ctx.session()
        .roster()
        .get(name)
        .cloned()
        .ok_or_else(|| MessageError::unknown_channel(msg.command(), name))
}

/// PRIVMSG: messages carrying bits are cheers.
fn handle_privmsg(ctx: &mut Context<'_>, msg: &Message) -> Result<()> {
    if !msg.has_tag("bits") {
        return messaging::handle_targeted(ctx, msg);
    }

    let tm = TargetedMessage::resolve(ctx.session(), msg)?;
    let channel = match tm.channel() {
        Some(channel) => channel.clone(),
        None => {
            let name = channel_param(msg)?;
            return Err(MessageError::unknown_channel(msg.command(), name).into());
        }
    };
    let text = tm.text().to_owned();
    let user = match tm.into_source() {
        Source::User(user) => user,
        Source::Server(_) => {
            return Err(MessageError::invalid_source(msg.command(), msg.prefix()).into())
        }
    };
    let bits = required_numeric(msg, "bits")?;

    ctx.emit(Event::UserCheered(Cheer {
        user,
        channel,
        text,
        bits,
    }));
    Ok(())
}

/// USERNOTICE: subscriptions and gifted subscriptions.
fn handle_usernotice(ctx: &mut Context<'_>, msg: &Message) -> Result<()> {
    let name = joined_channel(ctx, msg)?;
    let login = required_tag(msg, "login")?;
    let user = User::new(login).with_twitch(TwitchUserInfo::from_message(msg));
    let notice = required_tag(msg, "msg-id")?;
    let text = msg.param(1).map(str::to_owned);

    let subscription = match notice {
        "sub" | "resub" => {
            let months = required_numeric(msg, "msg-param-cumulative-months")?;
            let plan = SubscriptionPlan::from_tag(required_tag(msg, "msg-param-sub-plan")?);
            let streak = if msg.tag("msg-param-should-share-streak") == Some("1") {
                Some(required_numeric(msg, "msg-param-streak-months")?)
            } else {
                None
            };
            Subscription {
                user: Some(user),
                channel: channel_snapshot(ctx, msg, name)?,
                plan,
                text,
                months,
                streak,
                is_gift: false,
                is_anonymous: false,
                recipient: None,
            }
        }
        "subgift" | "anonsubgift" => {
            let months = required_numeric(msg, "msg-param-months")?;
            let plan = SubscriptionPlan::from_tag(required_tag(msg, "msg-param-sub-plan")?);
            let recipient_id = required_numeric(msg, "msg-param-recipient-id")?;
            let recipient_login = required_tag(msg, "msg-param-recipient-user-name")?;
            let recipient_display = required_tag(msg, "msg-param-recipient-display-name")?;
            let recipient = User::new(recipient_login).with_twitch(TwitchUserInfo {
                display_name: Some(recipient_display.to_owned()),
                user_id: Some(recipient_id),
                ..TwitchUserInfo::default()
            });
            let is_anonymous = notice == "anonsubgift";

            Subscription {
                user: if is_anonymous { None } else { Some(user) },
                channel: channel_snapshot(ctx, msg, name)?,
                plan,
                text,
                months,
                streak: None,
                is_gift: true,
                is_anonymous,
                recipient: Some(recipient),
            }
        }
        other => {
            debug!(msg_id = other, "ignoring USERNOTICE");
            return Ok(());
        }
    };

    ctx.emit(Event::UserSubscribed(subscription));
    Ok(())
}

/// ROOMSTATE: incremental room flags. The first one for a channel raises
/// the deferred join event.
fn handle_roomstate(ctx: &mut Context<'_>, msg: &Message) -> Result<()> {
    let name = joined_channel(ctx, msg)?;
    let emote_only = numeric_tag::<i64>(msg, "emote-only");
    let followers_only = numeric_tag::<i64>(msg, "followers-only");
    let r9k = numeric_tag::<i64>(msg, "r9k");
    let slow = numeric_tag::<u32>(msg, "slow");
    let subs_only = numeric_tag::<i64>(msg, "subs-only");

    let session = ctx.session_mut();
    let local_user = session.user().clone();
    let Some(channel) = session.roster_mut().get_mut(name) else {
        return Err(MessageError::unknown_channel(msg.command(), name).into());
    };
    let Some(state) = channel.twitch_state_mut() else {
        debug!(channel = name, "ROOMSTATE for a channel without room state");
        return Ok(());
    };

    if let Some(value) = emote_only {
        state.emote_only = value == 1;
    }
    if let Some(minutes) = followers_only {
        state.followers_only = u32::try_from(minutes).ok();
    }
    if let Some(value) = r9k {
        state.r9k = value == 1;
    }
    if let Some(seconds) = slow {
        state.slow_seconds = seconds;
    }
    if let Some(value) = subs_only {
        state.subs_only = value == 1;
    }

    if !state.joined_event_fired {
        state.joined_event_fired = true;
        let channel = channel.clone();
        debug!(channel = name, "joined");
        ctx.emit(Event::ChannelJoined {
            channel,
            user: local_user,
        });
    }
    Ok(())
}

/// USERSTATE: the local user's flags in a channel.
fn handle_userstate(ctx: &mut Context<'_>, msg: &Message) -> Result<()> {
    let name = joined_channel(ctx, msg)?;
    let subscriber = msg
        .tag("badges")
        .map(|raw| parse_badges(raw).contains_key("subscriber"));
    let moderator = numeric_tag::<i64>(msg, "mod");

    let state = ctx
        .session_mut()
        .roster_mut()
        .get_mut(name)
        .and_then(|channel| channel.twitch_state_mut());
    if let Some(state) = state {
        if let Some(subscriber) = subscriber {
            state.is_subscriber = subscriber;
        }
        if let Some(value) = moderator {
            state.is_moderator = value == 1;
        }
    }
    Ok(())
}

/// CLEARCHAT: a ban without duration, a timeout with one.
fn handle_clearchat(ctx: &mut Context<'_>, msg: &Message) -> Result<()> {
    let seconds = numeric_tag::<u64>(msg, "ban-duration").unwrap_or(0);
    let login = match msg.params() {
        [_, login] => login.as_str(),
        [_] => {
            debug!("chat cleared");
            return Ok(());
        }
        [] => return Err(MessageError::not_enough(msg.command(), 1, 0).into()),
        _ => return Err(MessageError::syntax(msg.command(), "too many parameters").into()),
    };
    let name = joined_channel(ctx, msg)?;
    let channel = channel_snapshot(ctx, msg, name)?;
    let user = User::new(login);

    let event = if seconds == 0 {
        Event::UserBanned { channel, user }
    } else {
        Event::UserTimedOut {
            channel,
            user,
            duration: Duration::from_secs(seconds),
        }
    };
    ctx.emit(event);
    Ok(())
}

/// HOSTTARGET: `<target> <viewers>`, `-` for none.
fn handle_hosttarget(ctx: &mut Context<'_>, msg: &Message) -> Result<()> {
    let name = joined_channel(ctx, msg)?;
    let hosting = msg
        .param(1)
        .ok_or_else(|| MessageError::not_enough(msg.command(), 2, msg.params().len()))?;
    let (target, viewers) = match hosting.split(' ').collect::<Vec<_>>()[..] {
        [target, viewers] => (target, viewers),
        _ => return Err(MessageError::syntax(msg.command(), "expected `<target> <viewers>`").into()),
    };
    let viewers = match viewers {
        "-" => 0,
        count => count
            .parse()
            .map_err(|_| MessageError::syntax(msg.command(), format!("bad viewer count {:?}", count)))?,
    };
    let channel = channel_snapshot(ctx, msg, name)?;

    let event = if target == "-" {
        Event::HostModeStopped { channel, viewers }
    } else {
        Event::HostModeStarted {
            channel,
            target: target.to_owned(),
            viewers,
        }
    };
    ctx.emit(event);
    Ok(())
}
