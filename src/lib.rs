//! # slirc-client
//!
//! An async IRC client core with an extensible command registry, outbound
//! flood control and support for the Twitch chat dialect.
//!
//! ## Features
//!
//! - Tolerant IRC line parsing with IRCv3 tags
//! - User identity, hostmasks and a per-connection channel roster
//! - PRIVMSG/NOTICE resolution into typed channel and private messages
//! - A command registry with overridable dialect layers and ad-hoc handlers
//! - Fixed-delay and windowed rate-limit pacing of outbound lines
//! - Twitch badges, room state, subscriptions, cheers, bans and hosting
//!
//! The pure half (parsing, identity, dispatch, Twitch decoding) has no
//! runtime dependency; the `tokio` feature adds the transport, the flood
//! controller and the [`Client`] itself.

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Parsing lines
//!
//! ```rust
//! use slirc_client::Message;
//!
//! let msg = Message::parse("@a=1;b;c=3 :nick!ident@host PRIVMSG #chan :hello world");
//! assert_eq!(msg.command(), "PRIVMSG");
//! assert_eq!(msg.params(), ["#chan", "hello world"]);
//! assert_eq!(msg.tag("c"), Some("3"));
//! assert!(!msg.has_tag("b"));
//! ```
//!
//! ### Running a client
//!
//! ```no_run
//! use slirc_client::twitch::RATE_LIMIT_NORMAL;
//! use slirc_client::{Client, ClientConfig, Event};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientConfig::twitch("mybot", "oauth:secret", RATE_LIMIT_NORMAL))?;
//! let mut events = client.subscribe();
//! client.connect().await?;
//! client.join_channel("somestreamer").await?;
//!
//! while let Ok(event) = events.recv().await {
//!     match event {
//!         Event::UserCheered(cheer) => println!("{} cheered {}", cheer.user, cheer.bits),
//!         Event::Disconnected { .. } => break,
//!         _ => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod casemap;
pub mod channel;
pub mod config;
pub mod error;
pub mod event;
pub mod handlers;
pub mod hostmask;
pub mod message;
pub mod registry;
pub mod state;
pub mod targeted;
pub mod twitch;
pub mod user;

#[cfg(feature = "tokio")]
pub mod client;
#[cfg(feature = "tokio")]
pub mod flood;
#[cfg(feature = "tokio")]
pub mod line;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::casemap::{irc_eq, irc_to_lower};
pub use self::channel::{Channel, MessageTarget};
pub use self::config::{ClientConfig, Dialect, FloodConfig, RegistrationInfo};
pub use self::error::{ClientError, IrcError, MessageError, ProtocolError};
pub use self::event::{ChannelMessage, Cheer, Event, PrivateMessage, RawLine, Subscription};
pub use self::hostmask::HostMask;
pub use self::message::{Message, Tags};
pub use self::registry::{Context, Handler, HandlerEntry, HandlerFn, Registry};
pub use self::state::{ConnectionState, Roster, Session};
pub use self::targeted::{MessageType, Target, TargetedMessage};
pub use self::twitch::{SubscriptionPlan, TwitchChannelState, TwitchUserInfo};
pub use self::user::{Server, Source, SourceType, User};

#[cfg(feature = "tokio")]
pub use self::client::Client;
#[cfg(feature = "tokio")]
pub use self::flood::{AntiFlood, FixedDelay, FloodPolicy, Outbound, RateLimit};
#[cfg(feature = "tokio")]
pub use self::line::{LineCodec, MAX_LINE_LEN};
#[cfg(feature = "tokio")]
pub use self::transport::{LineReader, LineWriter, Transport};
