//! Protocol tests - sinks driven directly through `RenderSink`
//!
//! Covers the default trait methods, nested fragments and frame layout.

use arbor_sink::{
    AttrValue, AttributeMap, ComponentType, Content, FrameBuffer, FrameData, Key, RecordedContent,
    RecordingSink, RenderFragment, RenderMode, RenderSink, Sequence, SinkCall, SinkResult,
};

struct Clock;

/// Sink that only counts opens, relying on the default render mode hook
#[derive(Default)]
struct OpenCounter {
    opens: usize,
}

impl RenderSink for OpenCounter {
    fn open_element(&mut self, _seq: Sequence, _name: &str) -> SinkResult<()> {
        self.opens += 1;
        Ok(())
    }
    fn open_component(&mut self, _seq: Sequence, _component: ComponentType) -> SinkResult<()> {
        self.opens += 1;
        Ok(())
    }
    fn open_region(&mut self, _seq: Sequence) -> SinkResult<()> {
        self.opens += 1;
        Ok(())
    }
    fn set_key(&mut self, _key: Key) -> SinkResult<()> {
        Ok(())
    }
    fn add_attributes(&mut self, _seq: Sequence, _attributes: AttributeMap) -> SinkResult<()> {
        Ok(())
    }
    fn add_content(&mut self, _seq: Sequence, content: Content) -> SinkResult<()> {
        if let Content::Fragment(fragment) = content {
            fragment.render(self)?;
        }
        Ok(())
    }
    fn capture_element_reference(
        &mut self,
        _seq: Sequence,
        _capture: arbor_sink::ReferenceCapture,
    ) -> SinkResult<()> {
        Ok(())
    }
    fn capture_component_reference(
        &mut self,
        _seq: Sequence,
        _capture: arbor_sink::ReferenceCapture,
    ) -> SinkResult<()> {
        Ok(())
    }
    fn close_element(&mut self) -> SinkResult<()> {
        Ok(())
    }
    fn close_component(&mut self) -> SinkResult<()> {
        Ok(())
    }
    fn close_region(&mut self) -> SinkResult<()> {
        Ok(())
    }
}

fn list_fragment() -> RenderFragment {
    RenderFragment::new(|sink| {
        sink.open_element(Sequence(0), "li")?;
        sink.add_content(Sequence(1), Content::text("item"))?;
        sink.close_element()
    })
}

#[test]
fn test_default_render_mode_is_accepted() {
    let mut sink = OpenCounter::default();
    sink.open_component(Sequence(0), ComponentType::of::<Clock>()).unwrap();
    sink.set_render_mode(RenderMode::new("server")).unwrap();
    sink.close_component().unwrap();
    assert_eq!(sink.opens, 1);
}

#[test]
fn test_fragment_reaches_any_sink() {
    let mut sink = OpenCounter::default();
    sink.open_element(Sequence(0), "ul").unwrap();
    sink.add_content(Sequence(2), Content::Fragment(list_fragment())).unwrap();
    sink.close_element().unwrap();
    assert_eq!(sink.opens, 2);
}

#[test]
fn test_recording_nested_fragment() {
    let outer = RenderFragment::new(|sink| {
        sink.open_region(Sequence(0))?;
        sink.add_content(Sequence(1), Content::Fragment(list_fragment()))?;
        sink.close_region()
    });

    let mut sink = RecordingSink::new();
    sink.add_content(Sequence(7), Content::Fragment(outer)).unwrap();

    let SinkCall::AddContent { content: RecordedContent::Fragment(region), .. } = &sink.calls()[0]
    else {
        panic!("expected outer fragment");
    };
    assert_eq!(region[0], SinkCall::OpenRegion { seq: Sequence(0) });
    let SinkCall::AddContent { content: RecordedContent::Fragment(items), .. } = &region[1] else {
        panic!("expected inner fragment");
    };
    assert_eq!(items.len(), 3);
    assert_eq!(
        items[1],
        SinkCall::AddContent { seq: Sequence(1), content: RecordedContent::Text("item".into()) }
    );
}

#[test]
fn test_frame_layout_of_component() {
    let mut buf = FrameBuffer::new();
    buf.open_component(Sequence(0), ComponentType::of::<Clock>()).unwrap();
    buf.set_key(Key::Text("clock".into())).unwrap();
    buf.add_attributes(
        Sequence(1),
        [("interval", AttrValue::Int(1000)), ("label", AttrValue::Text("UTC".into()))]
            .into_iter()
            .collect(),
    )
    .unwrap();
    buf.set_render_mode(RenderMode::new("interactive")).unwrap();
    buf.add_content(Sequence(2), Content::markup("<b>now</b>")).unwrap();
    buf.close_component().unwrap();

    let frames = buf.finish().unwrap();
    assert_eq!(frames.len(), 4);
    let FrameData::Component { key, render_mode, subtree_length, .. } = &frames[0].data else {
        panic!("expected component frame");
    };
    assert_eq!(key.as_ref().map(ToString::to_string).as_deref(), Some("clock"));
    assert_eq!(render_mode.as_ref().map(RenderMode::name), Some("interactive"));
    assert_eq!(*subtree_length, 4);
    assert_eq!(frames[1].data, FrameData::Attribute {
        name: "interval".into(),
        value: AttrValue::Int(1000),
    });
    assert_eq!(frames[3].data, FrameData::Markup("<b>now</b>".into()));
}

#[test]
fn test_render_mode_rejected_after_content() {
    let mut buf = FrameBuffer::new();
    buf.open_component(Sequence(0), ComponentType::of::<Clock>()).unwrap();
    buf.add_attributes(Sequence(1), AttributeMap::new()).unwrap();
    buf.add_content(Sequence(2), Content::text("tick")).unwrap();
    assert!(buf.set_render_mode(RenderMode::new("server")).is_err());
}
