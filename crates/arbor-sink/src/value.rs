//! Attribute values and node keys
//!
//! Values are kept raw (not stringified) so that the builder can tell text
//! apart from everything else when it merges repeated writes.

use std::fmt;
use std::rc::Rc;

/// Raw attribute value
#[derive(Clone)]
pub enum AttrValue {
    /// Text value (the only kind that concatenates on repeated writes)
    Text(String),
    /// Boolean flag, e.g. `disabled`
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Event handler callback
    Handler(EventHandler),
}

impl AttrValue {
    /// Borrow the text if this is a text value
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this is a text value
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, AttrValue::Text(_))
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => write!(f, "{s:?}"),
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Int(i) => write!(f, "{i}"),
            AttrValue::Float(x) => write!(f, "{x}"),
            AttrValue::Handler(h) => write!(f, "{h:?}"),
        }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttrValue::Text(a), AttrValue::Text(b)) => a == b,
            (AttrValue::Bool(a), AttrValue::Bool(b)) => a == b,
            (AttrValue::Int(a), AttrValue::Int(b)) => a == b,
            (AttrValue::Float(a), AttrValue::Float(b)) => a == b,
            (AttrValue::Handler(a), AttrValue::Handler(b)) => a == b,
            _ => false,
        }
    }
}

/// Event handler attached as an attribute value
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn()>);

impl EventHandler {
    pub fn new(handler: impl Fn() + 'static) -> Self {
        Self(Rc::new(handler))
    }

    /// Invoke the handler
    pub fn invoke(&self) {
        (self.0)()
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandler(..)")
    }
}

/// Handlers compare by identity
impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Conversion into an optional attribute value
///
/// `None` means "absent": the builder ignores the write entirely.
pub trait IntoAttrValue {
    fn into_attr_value(self) -> Option<AttrValue>;
}

impl IntoAttrValue for AttrValue {
    fn into_attr_value(self) -> Option<AttrValue> {
        Some(self)
    }
}

impl IntoAttrValue for &str {
    fn into_attr_value(self) -> Option<AttrValue> {
        Some(AttrValue::Text(self.to_string()))
    }
}

impl IntoAttrValue for String {
    fn into_attr_value(self) -> Option<AttrValue> {
        Some(AttrValue::Text(self))
    }
}

impl IntoAttrValue for &String {
    fn into_attr_value(self) -> Option<AttrValue> {
        Some(AttrValue::Text(self.clone()))
    }
}

impl IntoAttrValue for bool {
    fn into_attr_value(self) -> Option<AttrValue> {
        Some(AttrValue::Bool(self))
    }
}

macro_rules! int_attr_value {
    ($($ty:ty),*) => {
        $(
            impl IntoAttrValue for $ty {
                fn into_attr_value(self) -> Option<AttrValue> {
                    Some(AttrValue::Int(i64::from(self)))
                }
            }
        )*
    };
}

int_attr_value!(i8, i16, i32, i64, u8, u16, u32);

impl IntoAttrValue for f32 {
    fn into_attr_value(self) -> Option<AttrValue> {
        Some(AttrValue::Float(f64::from(self)))
    }
}

impl IntoAttrValue for f64 {
    fn into_attr_value(self) -> Option<AttrValue> {
        Some(AttrValue::Float(self))
    }
}

impl IntoAttrValue for EventHandler {
    fn into_attr_value(self) -> Option<AttrValue> {
        Some(AttrValue::Handler(self))
    }
}

impl<T: IntoAttrValue> IntoAttrValue for Option<T> {
    fn into_attr_value(self) -> Option<AttrValue> {
        self.and_then(IntoAttrValue::into_attr_value)
    }
}

/// Reduced attributes of one node, in first-write order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeMap {
    entries: Vec<(String, AttrValue)>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry (names are expected to be unique)
    pub fn push(&mut self, name: impl Into<String>, value: AttrValue) {
        self.entries.push((name.into(), value));
    }

    /// Get a value by name
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attribute names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<N: Into<String>> FromIterator<(N, AttrValue)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (N, AttrValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }
}

impl IntoIterator for AttributeMap {
    type Item = (String, AttrValue);
    type IntoIter = std::vec::IntoIter<(String, AttrValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Identity key used by sinks to match nodes across renders
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Int(i64),
    Text(Rc<str>),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::Text(s) => f.write_str(s),
        }
    }
}

/// Conversion into an optional key; `None` leaves the node unkeyed
pub trait IntoKey {
    fn into_key(self) -> Option<Key>;
}

impl IntoKey for Key {
    fn into_key(self) -> Option<Key> {
        Some(self)
    }
}

impl IntoKey for &str {
    fn into_key(self) -> Option<Key> {
        Some(Key::Text(Rc::from(self)))
    }
}

impl IntoKey for String {
    fn into_key(self) -> Option<Key> {
        Some(Key::Text(Rc::from(self)))
    }
}

macro_rules! int_key {
    ($($ty:ty),*) => {
        $(
            impl IntoKey for $ty {
                fn into_key(self) -> Option<Key> {
                    Some(Key::Int(i64::from(self)))
                }
            }
        )*
    };
}

int_key!(i8, i16, i32, i64, u8, u16, u32);

impl<T: IntoKey> IntoKey for Option<T> {
    fn into_key(self) -> Option<Key> {
        self.and_then(IntoKey::into_key)
    }
}
