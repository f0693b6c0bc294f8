//! Reference capture
//!
//! A node may register a callback that receives a handle to the live
//! element or component instance once the sink has materialised it.

use std::fmt;
use std::rc::Rc;

/// Handle to a materialised element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(pub u64);

/// Handle to a materialised component instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentRef(pub u64);

/// Handle passed to a capture callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceHandle {
    Element(ElementRef),
    Component(ComponentRef),
}

/// Callback receiving a [`ReferenceHandle`]
#[derive(Clone)]
pub struct ReferenceCapture(Rc<dyn Fn(ReferenceHandle)>);

impl ReferenceCapture {
    pub fn new(capture: impl Fn(ReferenceHandle) + 'static) -> Self {
        Self(Rc::new(capture))
    }

    /// Deliver a handle to the callback
    pub fn invoke(&self, handle: ReferenceHandle) {
        (self.0)(handle)
    }
}

impl fmt::Debug for ReferenceCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReferenceCapture(..)")
    }
}
