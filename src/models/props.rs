// ============================================================================
// DECLARED PROPS - What a component was given, before classification
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Value;
use yew::Callback;

use crate::models::{ConfigurationSnapshot, MapEvent};

pub type Handler = Callback<MapEvent>;

/// A single declared property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Value(Value),
    Handler(Handler),
}

/// Declared properties of a map component, keyed by prop name.
///
/// Classification happens on demand: [`DeclaredProps::snapshot`] gives the
/// recognized configuration view, [`DeclaredProps::handlers`] gives the
/// handler set. A `null` value is the same as not declaring the prop.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeclaredProps {
    entries: BTreeMap<String, PropValue>,
}

impl DeclaredProps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: declare a plain value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder: declare a handler under its prop name, e.g. `"onClick"`.
    pub fn handler(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.entries.insert(name.into(), PropValue::Handler(handler));
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), PropValue::Value(value.into()));
    }

    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        self.entries.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.get(name)
    }

    /// Plain value of a prop, skipping handlers and nulls.
    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.entries.get(name) {
            Some(PropValue::Value(value)) if !value.is_null() => Some(value),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Configuration view restricted to `recognized` names.
    pub fn snapshot(&self, recognized: &[&str]) -> ConfigurationSnapshot {
        self.entries
            .iter()
            .filter(|(name, _)| recognized.contains(&name.as_str()))
            .filter_map(|(name, value)| match value {
                PropValue::Value(value) if !value.is_null() => Some((name.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    /// Every handler-shaped prop, keyed by event name.
    pub fn handlers(&self) -> HandlerSet {
        self.entries
            .iter()
            .filter_map(|(name, value)| match value {
                PropValue::Handler(handler) => {
                    event_name(name).map(|event| (event, handler.clone()))
                }
                PropValue::Value(_) => None,
            })
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, PropValue)> for DeclaredProps {
    fn from_iter<I: IntoIterator<Item = (K, PropValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// `onSomeRandomEvent` -> `someRandomEvent`. `None` unless the name is `on`
/// followed by an uppercase letter.
pub fn event_name(prop: &str) -> Option<String> {
    let rest = prop.strip_prefix("on")?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    let mut event = String::with_capacity(rest.len());
    event.push(first.to_ascii_lowercase());
    event.push_str(chars.as_str());
    Some(event)
}

/// Event name -> callback. Callback identity is pointer identity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HandlerSet {
    handlers: BTreeMap<String, Handler>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, event: impl Into<String>, handler: Handler) -> Option<Handler> {
        self.handlers.insert(event.into(), handler)
    }

    pub fn get(&self, event: &str) -> Option<&Handler> {
        self.handlers.get(event)
    }

    pub fn remove(&mut self, event: &str) -> Option<Handler> {
        self.handlers.remove(event)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Handler)> {
        self.handlers.iter().map(|(event, handler)| (event.as_str(), handler))
    }
}

impl FromIterator<(String, Handler)> for HandlerSet {
    fn from_iter<I: IntoIterator<Item = (String, Handler)>>(iter: I) -> Self {
        Self {
            handlers: iter.into_iter().collect(),
        }
    }
}
