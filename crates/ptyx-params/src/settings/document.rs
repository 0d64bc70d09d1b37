//! TOML settings document model.

use indexmap::IndexMap;
use toml::{Table, Value};

/// Ordered sections of `key = text` entries.
///
/// Reading accepts string values as well as bare integers, floats, booleans
/// and datetimes (converted to their text form). Arrays and nested tables are
/// skipped. Writing always emits string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsDocument {
    sections: IndexMap<String, IndexMap<String, String>>,
}

impl SettingsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Any syntax error rejects the whole document.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let table: Table = toml::from_str(text)?;
        let mut document = Self::new();

        for (section_name, section) in table {
            let Value::Table(entries) = section else {
                tracing::debug!(key = %section_name, "skipping top-level entry outside a section");
                continue;
            };

            let section = document.section_mut(&section_name);
            for (key, value) in entries {
                match scalar_text(&value) {
                    Some(text) => {
                        section.insert(key, text);
                    }
                    None => tracing::debug!(
                        section = %section_name,
                        key = %key,
                        value_type = value.type_str(),
                        "skipping non-scalar settings value"
                    ),
                }
            }
        }

        Ok(document)
    }

    /// Render as TOML, one table per section in insertion order.
    pub fn render(&self) -> Result<String, toml::ser::Error> {
        let mut table = Table::new();
        for (section_name, entries) in &self.sections {
            let entries: Table = entries
                .iter()
                .map(|(key, text)| (key.clone(), Value::String(text.clone())))
                .collect();
            table.insert(section_name.clone(), Value::Table(entries));
        }
        toml::to_string(&table)
    }

    /// Entries of `name`, creating an empty section when missing.
    pub fn section_mut(&mut self, name: &str) -> &mut IndexMap<String, String> {
        self.sections.entry(name.to_string()).or_default()
    }

    pub fn section(&self, name: &str) -> Option<&IndexMap<String, String>> {
        self.sections.get(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &IndexMap<String, String>)> {
        self.sections
            .iter()
            .map(|(name, entries)| (name.as_str(), entries))
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Integer(number) => Some(number.to_string()),
        Value::Float(number) => Some(format!("{number:?}")),
        Value::Boolean(flag) => Some(flag.to_string()),
        Value::Datetime(datetime) => Some(datetime.to_string()),
        Value::Array(_) | Value::Table(_) => None,
    }
}
