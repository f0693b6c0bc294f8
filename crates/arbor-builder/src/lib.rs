//! Arbor Builder - Deferred fluent render-tree construction
//!
//! Describes one node at a time through chained calls and emits it to a
//! [`RenderSink`](arbor_sink::RenderSink) only once the description is
//! complete, as one ordered, minimal instruction stream.
//!
//! # Example
//! ```rust,ignore
//! use arbor_builder::TreeBuilder;
//! use arbor_sink::RecordingSink;
//!
//! let mut sink = RecordingSink::new();
//! let mut builder = TreeBuilder::new(&mut sink);
//! builder
//!     .open_element("div")?
//!     .attribute("class", "a ")?
//!     .attribute("class", "b")?
//!     .content("hi")
//!     .close()?;
//! ```

mod attributes;
mod builder;
mod config;
mod content_queue;
mod emit;
mod error;
mod fragment;
mod pending;
mod scope;
mod sequence;
mod typed;

pub use attributes::{AttributeBag, ReduceRules};
pub use builder::TreeBuilder;
pub use config::BuilderConfig;
pub use content_queue::ContentQueue;
pub use error::{BuildError, BuildResult, ConfigError};
pub use fragment::{fragment, fragment_with_config};
pub use pending::{NodeKind, PendingNode};
pub use scope::NodeScope;
pub use sequence::SequenceAllocator;
pub use typed::{Member, Typed};
