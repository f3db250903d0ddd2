//! Benchmarks for line parsing, serialization and dispatch.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use slirc_client::twitch::parse_badges;
use slirc_client::{Channel, Context, Dialect, Message, Registry, Session};

/// Simple PING message
const SIMPLE_MESSAGE: &str = "PING :irc.example.com";

/// Message with prefix
const PREFIX_MESSAGE: &str = ":nick!user@host PRIVMSG #channel :Hello, world!";

/// Twitch chat line
const TWITCH_MESSAGE: &str = "@badge-info=subscriber/14;badges=moderator/1,subscriber/12,bits/1000;color=#1E90FF;display-name=Ronni;emotes=;id=b34ccfc7-4977-403a-8a94-33c6bac34fb8;mod=1;room-id=12345;subscriber=1;tmi-sent-ts=1507246572675;turbo=0;user-id=1337;user-type=mod :ronni!ronni@ronni.tmi.twitch.tv PRIVMSG #dallas :Kappa Keepo Kappa";

/// Subscription notice with escaped values
const USERNOTICE: &str = "@badge-info=;badges=staff/1,broadcaster/1;display-name=Ronni;login=ronni;msg-id=resub;msg-param-cumulative-months=6;msg-param-should-share-streak=1;msg-param-streak-months=2;msg-param-sub-plan=Prime;system-msg=ronni\\shas\\ssubscribed\\sfor\\s6\\smonths!;user-id=1337 :tmi.twitch.tv USERNOTICE #dallas :Great stream -- keep it up!";

/// Numeric response
const NUMERIC_RESPONSE: &str = ":irc.server.net 001 nickname :Welcome to the IRC Network nickname!user@host";

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Message Parsing");

    for (name, line) in [
        ("simple_ping", SIMPLE_MESSAGE),
        ("with_prefix", PREFIX_MESSAGE),
        ("twitch_chat", TWITCH_MESSAGE),
        ("usernotice", USERNOTICE),
        ("numeric_response", NUMERIC_RESPONSE),
    ] {
        group.bench_function(name, |b| b.iter(|| black_box(Message::parse(black_box(line)))));
    }

    group.finish();
}

fn benchmark_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Message Serialization");

    let with_prefix = Message::parse(PREFIX_MESSAGE);
    let twitch = Message::parse(TWITCH_MESSAGE);

    group.bench_function("with_prefix", |b| {
        b.iter(|| black_box(black_box(&with_prefix).to_string()))
    });
    group.bench_function("twitch_chat", |b| {
        b.iter(|| black_box(black_box(&twitch).to_string()))
    });

    group.finish();
}

fn benchmark_badges(c: &mut Criterion) {
    let badges = Message::parse(TWITCH_MESSAGE)
        .tag("badges")
        .map(str::to_owned)
        .unwrap_or_default();

    c.bench_function("parse_badges", |b| {
        b.iter(|| black_box(parse_badges(black_box(&badges))))
    });
}

fn benchmark_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Dispatch");

    let registry = Registry::for_dialect(Dialect::Twitch).unwrap();
    let mut session = Session::new("mybot", Dialect::Twitch);
    session.roster_mut().insert(Channel::twitch("dallas")).unwrap();

    for (name, line) in [("privmsg", TWITCH_MESSAGE), ("usernotice", USERNOTICE)] {
        let msg = Message::parse(line);
        group.bench_with_input(BenchmarkId::new("twitch", name), &msg, |b, msg| {
            b.iter(|| {
                let mut ctx = Context::new(&mut session);
                let _ = registry.dispatch(&mut ctx, black_box(msg));
                black_box(ctx.into_parts())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parsing,
    benchmark_serialization,
    benchmark_badges,
    benchmark_dispatch,
);

criterion_main!(benches);
