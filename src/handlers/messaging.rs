use tracing::debug;

use crate::error::Result;
use crate::event::{ChannelMessage, Event, PrivateMessage};
use crate::message::Message;
use crate::registry::Context;
use crate::targeted::{MessageType, Target, TargetedMessage};

/// PRIVMSG and NOTICE.
pub(crate) fn handle_targeted(ctx: &mut Context<'_>, msg: &Message) -> Result<()> {
    let tm = TargetedMessage::resolve(ctx.session(), msg)?;
    if let Some(event) = targeted_event(tm) {
        ctx.emit(event);
    }
    Ok(())
}

fn targeted_event(tm: TargetedMessage<'_>) -> Option<Event> {
    let kind = tm.kind();
    let text = tm.text().to_owned();
    let tags = tm.owned_tags();

    match tm.target() {
        Some(Target::Channel(channel)) => {
            let message = ChannelMessage {
                channel: channel.clone(),
                source: tm.into_source(),
                text,
                tags,
            };
            match kind {
                MessageType::Privmsg => Some(Event::ChannelMessage(message)),
                MessageType::Notice => Some(Event::ChannelNotice(message)),
                MessageType::Unknown => None,
            }
        }
        Some(Target::User(user)) => {
            let message = PrivateMessage {
                recipient: user.clone(),
                source: tm.into_source(),
                text,
                tags,
            };
            match kind {
                MessageType::Privmsg => Some(Event::UserMessage(message)),
                MessageType::Notice => Some(Event::UserNotice(message)),
                MessageType::Unknown => None,
            }
        }
        None => {
            debug!("no event for a message to an unjoined channel");
            None
        }
    }
}
