//! Child content producers

use std::fmt;
use std::rc::Rc;

use crate::{RenderSink, SinkResult};

type FragmentFn = dyn Fn(&mut dyn RenderSink) -> SinkResult<()>;

/// Callable that emits a nested sub-tree into a sink
#[derive(Clone)]
pub struct RenderFragment(Rc<FragmentFn>);

impl RenderFragment {
    pub fn new(render: impl Fn(&mut dyn RenderSink) -> SinkResult<()> + 'static) -> Self {
        Self(Rc::new(render))
    }

    /// Emit the fragment into `sink`
    pub fn render(&self, sink: &mut dyn RenderSink) -> SinkResult<()> {
        (self.0)(sink)
    }
}

impl fmt::Debug for RenderFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderFragment(..)")
    }
}

/// One piece of child content
#[derive(Debug, Clone)]
pub enum Content {
    /// Plain text (escaped by the sink)
    Text(String),
    /// Raw markup, emitted verbatim
    Markup(String),
    /// Nested sub-tree
    Fragment(RenderFragment),
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text(text.into())
    }

    pub fn markup(markup: impl Into<String>) -> Self {
        Content::Markup(markup.into())
    }
}

/// Conversion into optional content; `None` is ignored by the builder
pub trait IntoContent {
    fn into_content(self) -> Option<Content>;
}

impl IntoContent for Content {
    fn into_content(self) -> Option<Content> {
        Some(self)
    }
}

impl IntoContent for &str {
    fn into_content(self) -> Option<Content> {
        Some(Content::Text(self.to_string()))
    }
}

impl IntoContent for String {
    fn into_content(self) -> Option<Content> {
        Some(Content::Text(self))
    }
}

impl IntoContent for RenderFragment {
    fn into_content(self) -> Option<Content> {
        Some(Content::Fragment(self))
    }
}

impl<T: IntoContent> IntoContent for Option<T> {
    fn into_content(self) -> Option<Content> {
        self.and_then(IntoContent::into_content)
    }
}
