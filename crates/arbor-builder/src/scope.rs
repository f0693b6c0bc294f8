//! Scoped close
//!
//! A [`NodeScope`] closes (and so flushes) the node it was opened for when
//! it goes out of scope, including on early returns through `?`.

use std::ops::{Deref, DerefMut};

use arbor_sink::RenderSink;

use crate::{BuildResult, TreeBuilder};

/// Guard that closes the pending node on drop
///
/// Dereferences to the builder so the node can be populated through it.
/// Call [`finish`](Self::finish) to close explicitly and observe errors;
/// errors from a drop-time close can only be logged.
pub struct NodeScope<'b, 's, S: RenderSink + ?Sized> {
    builder: &'b mut TreeBuilder<'s, S>,
    finished: bool,
}

impl<'b, 's, S: RenderSink + ?Sized> NodeScope<'b, 's, S> {
    pub(crate) fn new(builder: &'b mut TreeBuilder<'s, S>) -> Self {
        Self {
            builder,
            finished: false,
        }
    }

    /// Close the node now
    pub fn finish(mut self) -> BuildResult<()> {
        self.finished = true;
        self.builder.close()
    }
}

impl<'s, S: RenderSink + ?Sized> Deref for NodeScope<'_, 's, S> {
    type Target = TreeBuilder<'s, S>;

    fn deref(&self) -> &Self::Target {
        &*self.builder
    }
}

impl<S: RenderSink + ?Sized> DerefMut for NodeScope<'_, '_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.builder
    }
}

impl<S: RenderSink + ?Sized> Drop for NodeScope<'_, '_, S> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if std::thread::panicking() {
            tracing::warn!("scope dropped during panic, node not flushed");
            return;
        }
        if let Err(err) = self.builder.close() {
            tracing::error!(error = %err, "failed to close scoped node");
        }
    }
}
