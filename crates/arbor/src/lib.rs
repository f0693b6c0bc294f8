//! Arbor
//!
//! Deferred, fluent construction of render trees.
//!
//! Nodes are described one at a time through chained calls on a
//! [`TreeBuilder`]; each node reaches the [`RenderSink`] only once its
//! description is complete, as one ordered instruction stream.
//!
//! # Crates
//! - [`sink`]: the instruction protocol and the bundled sinks
//! - [`builder`]: the builder itself
//!
//! # Example
//! ```rust,ignore
//! use arbor::prelude::*;
//!
//! let mut frames = FrameBuffer::new();
//! let mut builder = TreeBuilder::new(&mut frames);
//! builder
//!     .open_element("div")?
//!     .class("card")
//!     .content("hello")
//!     .close()?;
//! ```

pub use arbor_builder as builder;
pub use arbor_sink as sink;

pub use arbor_builder::{
    BuildError, BuildResult, BuilderConfig, ConfigError, Member, NodeKind, NodeScope, TreeBuilder,
    declare_members, fragment, fragment_with_config,
};
pub use arbor_sink::{
    AttrValue, ComponentType, Content, FrameBuffer, Key, RecordingSink, RenderFragment,
    RenderMode, RenderSink, Sequence, SinkError, SinkResult,
};

/// Arbor version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use arbor_builder::{
        BuildError, BuildResult, BuilderConfig, Member, NodeKind, TreeBuilder, declare_members,
        fragment,
    };
    pub use arbor_sink::{
        AttrValue, ComponentType, Content, EventHandler, FrameBuffer, Key, RecordingSink,
        ReferenceHandle, RenderFragment, RenderMode, RenderSink, Sequence,
    };
}
