// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: terminal capability decoding and keyboard/IME input decoding.
//!
//! # Role in Weft
//! `weft-core` is the terminal I/O layer underneath the widget tree. It answers
//! two questions: which control sequences does this terminal understand, and
//! what did the user just type.
//!
//! # Primary responsibilities
//! - **CapabilityStore**: immutable boolean/numeric/string capability tables.
//! - **Terminfo / termcap decoding**: compiled `tic` images and classic
//!   colon-delimited termcap text.
//! - **Resolver**: locates capability data for a terminal name and degrades
//!   through termcap and a bundled xterm description instead of failing.
//! - **Key decoding**: classifies input chunks into [`event::KeyEvent`]s.
//! - **IME composition**: buffers runs of Hangul/Kana/Han input until a
//!   natural break and reports composition progress.
//! - **InputPipeline**: threads raw input through the IME and key decoder and
//!   emits [`event::InputEvent`]s in arrival order.
//!
//! # How it fits in the system
//! Screen and widget code read capabilities from a shared
//! [`capability_store::CapabilityStore`] and consume `InputEvent`s; nothing in
//! this crate renders or lays out anything.

pub mod capability_names;
pub mod capability_resolver;
pub mod capability_store;
pub mod error;
pub mod event;
pub mod ime;
pub mod input_pipeline;
pub mod key_decoder;
pub mod logging;
pub mod shared_capabilities;
pub mod termcap;
pub mod terminfo;

pub use capability_resolver::{Resolution, Resolver, ResolverConfig};
pub use capability_store::CapabilityStore;
pub use error::{CapsError, FormatReason};
pub use event::{InputEvent, KeyEvent, KeyName, Modifiers};
pub use input_pipeline::{InputConfig, InputPipeline};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};
