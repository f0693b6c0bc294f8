//! Attribute Bag
//!
//! Collects every write made to a node's attributes and reduces them once,
//! at flush time. Names keep the position of their first write; values of
//! one name keep their write order.

use std::collections::HashMap;

use arbor_sink::{AttrValue, AttributeMap};

/// How the bag is reduced
#[derive(Debug, Clone, Copy)]
pub struct ReduceRules<'a> {
    /// Name of the class attribute
    pub class_attribute: &'a str,
    /// Trim whitespace around the reduced class text
    pub trim_class: bool,
}

/// Ordered multimap of attribute name to raw values
#[derive(Debug, Clone, Default)]
pub struct AttributeBag {
    entries: Vec<(String, Vec<AttrValue>)>,
    by_name: HashMap<String, usize>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `name`
    pub fn push(&mut self, name: &str, value: AttrValue) {
        if let Some(&index) = self.by_name.get(name) {
            self.entries[index].1.push(value);
        } else {
            self.by_name.insert(name.to_string(), self.entries.len());
            self.entries.push((name.to_string(), vec![value]));
        }
    }

    /// Raw values written under `name`
    pub fn values(&self, name: &str) -> Option<&[AttrValue]> {
        self.by_name
            .get(name)
            .map(|&index| self.entries[index].1.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_name.clear();
    }

    /// Reduce every name to a single value, consuming the bag
    pub fn reduce(self, rules: ReduceRules<'_>) -> AttributeMap {
        self.entries
            .into_iter()
            .filter_map(|(name, values)| {
                let mut value = fold_values(values)?;
                if rules.trim_class && name == rules.class_attribute {
                    if let AttrValue::Text(text) = &mut value {
                        trim_in_place(text);
                    }
                }
                Some((name, value))
            })
            .collect()
    }
}

/// Left fold: text followed by text concatenates, anything else replaces
fn fold_values(values: Vec<AttrValue>) -> Option<AttrValue> {
    let mut acc: Option<AttrValue> = None;
    for value in values {
        acc = match (acc, value) {
            (Some(AttrValue::Text(mut joined)), AttrValue::Text(next)) => {
                joined.push_str(&next);
                Some(AttrValue::Text(joined))
            }
            (_, value) => Some(value),
        };
    }
    acc
}

fn trim_in_place(text: &mut String) {
    let trimmed = text.trim();
    if trimmed.len() != text.len() {
        *text = trimmed.to_string();
    }
}
