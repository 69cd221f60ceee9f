//! Section/key document model for filter files
//!
//! Filter files use a minimal INI dialect:
//!
//! ```text
//! [Directory]
//! black_name="node_modules", "dist"
//!
//! [Common]
//! max_upload=0
//! ```
//!
//! Only two line shapes are understood: `[name]` headers and `key=value`
//! assignments inside a section. Everything else (comments, stray text,
//! assignments before the first header) is dropped on parse, so
//! [`ConfigDocument::render`] is a normalizing rewrite rather than a patch.

use std::fmt;

/// One `key=value` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

/// A named section with its assignments in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub entries: Vec<KeyValue>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Value of `key`, if assigned.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|kv| kv.key == key)
            .map(|kv| kv.value.as_str())
    }

    /// Assign `key`, keeping the position of an existing entry.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|kv| kv.key == key) {
            Some(kv) => kv.value = value,
            None => self.entries.push(KeyValue {
                key: key.to_string(),
                value,
            }),
        }
    }
}

/// Parsed filter file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    sections: Vec<Section>,
}

impl ConfigDocument {
    /// Parse raw file text.
    ///
    /// Repeated headers reopen the earlier section; repeated keys within a
    /// section keep their first position and take the last value.
    pub fn parse(source: &str) -> Self {
        let mut doc = Self::default();
        let mut current: Option<usize> = None;

        for line in source.lines() {
            let trimmed = line.trim();
            if let Some(name) = header_name(trimmed) {
                current = Some(doc.index_or_insert(name));
            } else if let (Some(idx), Some((key, value))) = (current, trimmed.split_once('=')) {
                doc.sections[idx].set(key.trim(), value.trim());
            }
        }

        doc
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Get a section, appending an empty one if absent.
    ///
    /// The returned flag is `true` when the section was created.
    pub fn ensure_section(&mut self, name: &str) -> (&mut Section, bool) {
        let existed = self.section(name).is_some();
        let idx = self.index_or_insert(name);
        (&mut self.sections[idx], !existed)
    }

    /// Serialize every section as a header, its assignments, and a blank line.
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn index_or_insert(&mut self, name: &str) -> usize {
        match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        }
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for kv in &section.entries {
                writeln!(f, "{}={}", kv.key, kv.value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn header_name(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
}
