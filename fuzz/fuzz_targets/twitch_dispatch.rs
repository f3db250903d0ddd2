//! Fuzz target for the Twitch handler layer
//!
//! Dispatches arbitrary lines against a session with one joined channel.
//! Handlers may reject a line, but must never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_client::{Channel, Context, Dialect, Message, Registry, Session};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(registry) = Registry::for_dialect(Dialect::Twitch) else {
        return;
    };
    let mut session = Session::new("fuzzer", Dialect::Twitch);
    let _ = session.roster_mut().insert(Channel::twitch("chan"));

    let msg = Message::parse(input);
    let mut ctx = Context::new(&mut session);
    let _ = registry.dispatch(&mut ctx, &msg);
});
