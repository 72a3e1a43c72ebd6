//! In-memory stand-in for a page's DOM.
//!
//! A page declares the element ids it owns up front. Render passes and
//! event handlers then write through the setters below; writes to an id
//! that was never declared are dropped, the same way a page script skips
//! elements missing from its markup.

use std::collections::{BTreeMap, BTreeSet};

/// One `<option>` of a select control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Observable state of a single control.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub checked: bool,
    pub value: String,
    pub text: String,
    pub hidden: bool,
    pub disabled: bool,
    pub classes: BTreeSet<String>,
    pub options: Vec<SelectOption>,
    pub items: Vec<String>,
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    elements: BTreeMap<String, Element>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut surface = Self::new();
        for id in ids {
            surface.declare(id);
        }
        surface
    }

    /// Declare an element; an existing element keeps its state.
    pub fn declare(&mut self, id: impl Into<String>) {
        self.elements.entry(id.into()).or_default();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    // -- Reads --

    pub fn is_checked(&self, id: &str) -> Option<bool> {
        self.element(id).map(|e| e.checked)
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.element(id).map(|e| e.value.as_str())
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.element(id).map(|e| e.text.as_str())
    }

    pub fn is_hidden(&self, id: &str) -> Option<bool> {
        self.element(id).map(|e| e.hidden)
    }

    pub fn is_disabled(&self, id: &str) -> Option<bool> {
        self.element(id).map(|e| e.disabled)
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.classes.contains(class))
    }

    // -- Writes --

    pub fn set_checked(&mut self, id: &str, checked: bool) {
        self.with(id, |e| e.checked = checked);
    }

    pub fn set_value(&mut self, id: &str, value: impl Into<String>) {
        let value = value.into();
        self.with(id, |e| e.value = value);
    }

    pub fn set_text(&mut self, id: &str, text: impl Into<String>) {
        let text = text.into();
        self.with(id, |e| e.text = text);
    }

    pub fn set_hidden(&mut self, id: &str, hidden: bool) {
        self.with(id, |e| e.hidden = hidden);
    }

    pub fn set_disabled(&mut self, id: &str, disabled: bool) {
        self.with(id, |e| e.disabled = disabled);
    }

    /// Replace the whole class list from a space-separated string.
    pub fn set_class_name(&mut self, id: &str, class_name: &str) {
        self.with(id, |e| {
            e.classes = class_name.split_whitespace().map(str::to_string).collect();
        });
    }

    pub fn add_classes(&mut self, id: &str, classes: &[&str]) {
        self.with(id, |e| {
            e.classes.extend(classes.iter().map(|c| c.to_string()));
        });
    }

    pub fn remove_classes(&mut self, id: &str, classes: &[&str]) {
        self.with(id, |e| {
            for class in classes {
                e.classes.remove(*class);
            }
        });
    }

    pub fn toggle_classes(&mut self, id: &str, classes: &[&str], on: bool) {
        if on {
            self.add_classes(id, classes);
        } else {
            self.remove_classes(id, classes);
        }
    }

    pub fn set_options(&mut self, id: &str, options: Vec<SelectOption>) {
        self.with(id, |e| e.options = options);
    }

    pub fn set_items(&mut self, id: &str, items: Vec<String>) {
        self.with(id, |e| e.items = items);
    }

    /// Swap the generated children of a container.
    ///
    /// Previous children are removed from the surface and the new ones are
    /// declared with the given state. A missing container is left alone.
    pub fn replace_children(&mut self, parent: &str, children: Vec<(String, Element)>) {
        let Some(old) = self.elements.get(parent).map(|e| e.children.clone()) else {
            return;
        };
        for id in old {
            self.elements.remove(&id);
        }
        let ids: Vec<String> = children.iter().map(|(id, _)| id.clone()).collect();
        for (id, element) in children {
            self.elements.insert(id, element);
        }
        self.with(parent, |e| e.children = ids);
    }

    pub fn children(&self, parent: &str) -> Vec<&str> {
        self.element(parent)
            .map(|e| e.children.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn with(&mut self, id: &str, f: impl FnOnce(&mut Element)) {
        if let Some(element) = self.elements.get_mut(id) {
            f(element);
        }
    }
}
