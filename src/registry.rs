//! Command dispatch.
//!
//! A [`Registry`] maps command names to handlers. It is assembled from
//! layers: the base layer rejects duplicate names, a dialect layer
//! overrides base entries, and callers may add one handler per unclaimed
//! command at runtime.
//!
//! Handlers are synchronous. They read and mutate the [`Session`] through a
//! [`Context`] and queue outbound lines and events on it; the client writes
//! and publishes those once the handler returns.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::Dialect;
use crate::error::{ClientError, Result};
use crate::event::Event;
use crate::message::Message;
use crate::state::Session;

/// Signature of a built-in handler.
pub type HandlerFn = fn(&mut Context<'_>, &Message) -> Result<()>;

/// A registered handler.
pub type Handler = Arc<dyn Fn(&mut Context<'_>, &Message) -> Result<()> + Send + Sync>;

/// One row of a handler table: a function and the commands it serves.
#[derive(Clone, Copy)]
pub struct HandlerEntry {
    /// Command names, upper case.
    pub commands: &'static [&'static str],
    /// The handler.
    pub handler: HandlerFn,
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

/// What a handler sees while it runs.
pub struct Context<'a> {
    session: &'a mut Session,
    outbound: Vec<String>,
    events: Vec<Event>,
}

impl<'a> Context<'a> {
    /// A context over `session` with empty buffers.
    pub fn new(session: &'a mut Session) -> Self {
        Context {
            session,
            outbound: Vec::new(),
            events: Vec::new(),
        }
    }

    /// The connection state.
    pub fn session(&self) -> &Session {
        self.session
    }

    /// Mutable connection state.
    pub fn session_mut(&mut self) -> &mut Session {
        self.session
    }

    /// Queue a raw line for sending.
    pub fn send(&mut self, line: impl Into<String>) {
        self.outbound.push(line.into());
    }

    /// Queue `NICK <nickname>`.
    pub fn send_nick(&mut self, nickname: &str) {
        self.send(format!("NICK {}", nickname));
    }

    /// Queue `PONG :<token>`.
    pub fn send_pong(&mut self, token: &str) {
        self.send(format!("PONG :{}", token));
    }

    /// Queue an event for publication.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Lines queued so far.
    pub fn outbound(&self) -> &[String] {
        &self.outbound
    }

    /// Events queued so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Release the session, keeping the queued lines and events.
    pub fn into_parts(self) -> (Vec<String>, Vec<Event>) {
        (self.outbound, self.events)
    }
}

/// Command name to handler table.
#[derive(Clone, Default)]
pub struct Registry {
    handlers: HashMap<String, Handler>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut commands: Vec<_> = self.handlers.keys().collect();
        commands.sort();
        f.debug_struct("Registry").field("commands", &commands).finish()
    }
}

impl Registry {
    /// Build a registry from a base layer. Two entries claiming one
    /// command is a programming error.
    pub fn from_layer(layer: &[HandlerEntry]) -> std::result::Result<Self, ClientError> {
        let mut registry = Registry::default();
        for entry in layer {
            for &command in entry.commands {
                if registry.handlers.contains_key(command) {
                    return Err(ClientError::DuplicateHandler(command));
                }
                registry.handlers.insert(command.to_owned(), wrap(entry.handler));
            }
        }
        Ok(registry)
    }

    /// Install a dialect layer, replacing base handlers of the same names.
    pub fn overlay(&mut self, layer: &[HandlerEntry]) {
        for entry in layer {
            for &command in entry.commands {
                if self
                    .handlers
                    .insert(command.to_owned(), wrap(entry.handler))
                    .is_some()
                {
                    debug!(command, "base handler overridden");
                }
            }
        }
    }

    /// The registry for a dialect: the base layer plus the dialect's own.
    pub fn for_dialect(dialect: Dialect) -> std::result::Result<Self, ClientError> {
        let mut registry = Registry::from_layer(crate::handlers::BASE_HANDLERS)?;
        if dialect == Dialect::Twitch {
            registry.overlay(crate::twitch::handlers::TWITCH_HANDLERS);
        }
        Ok(registry)
    }

    /// Add a handler for a command no layer has claimed.
    pub fn register<F>(&mut self, command: &str, handler: F) -> std::result::Result<(), ClientError>
    where
        F: Fn(&mut Context<'_>, &Message) -> Result<()> + Send + Sync + 'static,
    {
        let command = command.to_ascii_uppercase();
        if self.handlers.contains_key(&command) {
            return Err(ClientError::HandlerExists(command));
        }
        self.handlers.insert(command, Arc::new(handler));
        Ok(())
    }

    /// The handler for a command, looked up case-insensitively.
    pub fn get(&self, command: &str) -> Option<&Handler> {
        self.handlers.get(command.to_ascii_uppercase().as_str())
    }

    /// Returns `true` if a handler serves `command`.
    pub fn contains(&self, command: &str) -> bool {
        self.get(command).is_some()
    }

    /// Number of commands served.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no command is served.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the handler for `msg`, if there is one.
    ///
    /// Returns `Ok(false)` for commands nobody handles; those are routine
    /// and not an error.
    pub fn dispatch(&self, ctx: &mut Context<'_>, msg: &Message) -> Result<bool> {
        match self.get(msg.command()) {
            Some(handler) => (handler.as_ref())(ctx, msg).map(|()| true),
            None => Ok(false),
        }
    }
}

fn wrap(handler: HandlerFn) -> Handler {
    Arc::new(handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IrcError, MessageError};

    fn first(ctx: &mut Context<'_>, _: &Message) -> Result<()> {
        ctx.send("FIRST");
        Ok(())
    }

    fn second(ctx: &mut Context<'_>, _: &Message) -> Result<()> {
        ctx.send("SECOND");
        Ok(())
    }

    fn run(registry: &Registry, line: &str) -> (bool, Vec<String>) {
        let mut session = Session::new("me", Dialect::Standard);
        let mut ctx = Context::new(&mut session);
        let handled = registry.dispatch(&mut ctx, &Message::parse(line)).unwrap();
        (handled, ctx.into_parts().0)
    }

    #[test]
    fn test_base_layer_rejects_duplicates() {
        let layer = [
            HandlerEntry {
                commands: &["PING", "PONG"],
                handler: first,
            },
            HandlerEntry {
                commands: &["PONG"],
                handler: second,
            },
        ];
        assert_eq!(
            Registry::from_layer(&layer).unwrap_err(),
            ClientError::DuplicateHandler("PONG")
        );
    }

    #[test]
    fn test_overlay_replaces() {
        let mut registry = Registry::from_layer(&[HandlerEntry {
            commands: &["PRIVMSG", "NOTICE"],
            handler: first,
        }])
        .unwrap();
        registry.overlay(&[HandlerEntry {
            commands: &["PRIVMSG"],
            handler: second,
        }]);

        assert_eq!(run(&registry, ":a!b@c PRIVMSG #x :y").1, ["SECOND"]);
        assert_eq!(run(&registry, ":a!b@c NOTICE #x :y").1, ["FIRST"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_runtime_register_needs_free_name() {
        let mut registry = Registry::from_layer(&[HandlerEntry {
            commands: &["PING"],
            handler: first,
        }])
        .unwrap();

        assert_eq!(
            registry.register("ping", |_, _| Ok(())),
            Err(ClientError::HandlerExists("PING".into()))
        );
        registry
            .register("whois", |ctx, _| {
                ctx.send("GOT WHOIS");
                Ok(())
            })
            .unwrap();
        assert!(registry.contains("WHOIS"));
        assert_eq!(run(&registry, ":s WHOIS x").1, ["GOT WHOIS"]);
    }

    #[test]
    fn test_unknown_command_ignored() {
        let registry = Registry::for_dialect(Dialect::Standard).unwrap();
        assert_eq!(run(&registry, ":server 372 me :- motd"), (false, vec![]));
    }

    #[test]
    fn test_handler_error_returned() {
        let mut registry = Registry::default();
        registry
            .register("FAIL", |_, msg| {
                Err(MessageError::not_enough(msg.command(), 1, 0).into())
            })
            .unwrap();

        let mut session = Session::new("me", Dialect::Standard);
        let mut ctx = Context::new(&mut session);
        let err = registry
            .dispatch(&mut ctx, &Message::parse(":s FAIL"))
            .unwrap_err();
        assert!(matches!(err, IrcError::Protocol(_)));
    }

    #[test]
    fn test_twitch_dialect_adds_commands() {
        let standard = Registry::for_dialect(Dialect::Standard).unwrap();
        let twitch = Registry::for_dialect(Dialect::Twitch).unwrap();
        assert!(!standard.contains("ROOMSTATE"));
        assert!(twitch.contains("ROOMSTATE"));
        assert!(twitch.contains("JOIN"));
        assert!(twitch.len() > standard.len());
    }
}
