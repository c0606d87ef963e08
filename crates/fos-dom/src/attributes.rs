//! Element Attributes
//!
//! Attribute manipulation: get, set, remove, has.

use std::collections::HashMap;

/// Named node map (attribute collection)
#[derive(Debug, Clone, Default)]
pub struct NamedNodeMap {
    attributes: Vec<Attr>,
    by_name: HashMap<String, usize>,
}

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            value: value.into(),
        }
    }
}

impl NamedNodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of attributes
    pub fn length(&self) -> usize {
        self.attributes.len()
    }

    /// Iterate attributes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }

    /// Get attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.by_name
            .get(&name)
            .and_then(|&i| self.attributes.get(i))
            .map(|a| a.value.as_str())
    }

    /// Set attribute, returning the previous value
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Option<String> {
        let attr = Attr::new(name, value);
        if let Some(&index) = self.by_name.get(&attr.name) {
            let old = std::mem::replace(&mut self.attributes[index], attr);
            Some(old.value)
        } else {
            self.by_name.insert(attr.name.clone(), self.attributes.len());
            self.attributes.push(attr);
            None
        }
    }

    /// Remove attribute by name
    pub fn remove_attribute(&mut self, name: &str) -> Option<Attr> {
        let name = name.to_ascii_lowercase();
        let index = self.by_name.remove(&name)?;
        for idx in self.by_name.values_mut() {
            if *idx > index {
                *idx -= 1;
            }
        }
        Some(self.attributes.remove(index))
    }

    /// Check if attribute exists
    pub fn has_attribute(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_ascii_lowercase())
    }
}
