//! Example: Basic usage of Arbor
//!
//! Builds a small page twice: once into a markup-printing sink, once into
//! a frame buffer.

use arbor::prelude::*;
use arbor::sink::{AttributeMap, ReferenceCapture, SinkResult};

struct Greeting;

/// Sink that prints nodes as indented markup
#[derive(Default)]
struct MarkupPrinter {
    out: String,
    open: Vec<String>,
    /// Open tag not yet terminated with `>`
    unterminated: bool,
}

impl MarkupPrinter {
    fn indent(&self) -> String {
        "  ".repeat(self.open.len())
    }

    fn terminate(&mut self) {
        if self.unterminated {
            self.out.push_str(">\n");
            self.unterminated = false;
        }
    }

    fn push_open(&mut self, tag: String) {
        self.terminate();
        self.out.push_str(&format!("{}<{tag}", self.indent()));
        self.open.push(tag);
        self.unterminated = true;
    }

    fn pop_close(&mut self) {
        self.terminate();
        if let Some(tag) = self.open.pop() {
            let name = tag.split_whitespace().next().unwrap_or_default().to_string();
            self.out.push_str(&format!("{}</{name}>\n", self.indent()));
        }
    }
}

impl RenderSink for MarkupPrinter {
    fn open_element(&mut self, _seq: Sequence, name: &str) -> SinkResult<()> {
        self.push_open(name.to_string());
        Ok(())
    }

    fn open_component(&mut self, _seq: Sequence, component: ComponentType) -> SinkResult<()> {
        self.push_open(component.short_name().to_string());
        Ok(())
    }

    fn open_region(&mut self, _seq: Sequence) -> SinkResult<()> {
        Ok(())
    }

    fn set_key(&mut self, key: Key) -> SinkResult<()> {
        self.out.push_str(&format!(" key=\"{key}\""));
        Ok(())
    }

    fn add_attributes(&mut self, _seq: Sequence, attributes: AttributeMap) -> SinkResult<()> {
        for (name, value) in attributes.iter() {
            match value {
                AttrValue::Text(text) => self.out.push_str(&format!(" {name}=\"{text}\"")),
                AttrValue::Bool(true) => self.out.push_str(&format!(" {name}")),
                AttrValue::Bool(false) | AttrValue::Handler(_) => {}
                AttrValue::Int(i) => self.out.push_str(&format!(" {name}=\"{i}\"")),
                AttrValue::Float(f) => self.out.push_str(&format!(" {name}=\"{f}\"")),
            }
        }
        Ok(())
    }

    fn add_content(&mut self, _seq: Sequence, content: Content) -> SinkResult<()> {
        self.terminate();
        match content {
            Content::Text(text) | Content::Markup(text) => {
                self.out.push_str(&format!("{}{text}\n", self.indent()));
                Ok(())
            }
            Content::Fragment(fragment) => fragment.render(self),
        }
    }

    fn capture_element_reference(
        &mut self,
        _seq: Sequence,
        _capture: ReferenceCapture,
    ) -> SinkResult<()> {
        Ok(())
    }

    fn capture_component_reference(
        &mut self,
        _seq: Sequence,
        _capture: ReferenceCapture,
    ) -> SinkResult<()> {
        Ok(())
    }

    fn close_element(&mut self) -> SinkResult<()> {
        self.pop_close();
        Ok(())
    }

    fn close_component(&mut self) -> SinkResult<()> {
        self.pop_close();
        Ok(())
    }

    fn close_region(&mut self) -> SinkResult<()> {
        Ok(())
    }
}

fn build<S: RenderSink + ?Sized>(builder: &mut TreeBuilder<'_, S>) -> BuildResult<()> {
    let items = fragment(|b| {
        for (i, label) in ["alpha", "beta", "gamma"].into_iter().enumerate() {
            b.open_element("li")?.key(i as i64).content(label);
        }
        Ok(())
    });

    builder.with_element("section", |b| {
        b.class("card").class("wide").style("padding: 4px");
        b.content(fragment(|b| {
            b.open_element("h2")?.content("Arbor");
            Ok(())
        }));
        b.content(fragment(move |b| {
            b.open_element("ul")?.content(items.clone());
            Ok(())
        }));
        Ok(())
    })?;

    builder
        .open_component_of::<Greeting>()?
        .attribute("name", "world")?
        .render_mode(RenderMode::new("interactive"))
        .close()
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Arbor v{}", arbor::VERSION);

    let mut printer = MarkupPrinter::default();
    build(&mut TreeBuilder::new(&mut printer))?;
    println!("{}", printer.out);

    let mut frames = FrameBuffer::new();
    build(&mut TreeBuilder::new(&mut frames))?;
    for frame in frames.finish()? {
        println!("{:>4}  {:?}", frame.sequence, frame.data);
    }

    Ok(())
}
