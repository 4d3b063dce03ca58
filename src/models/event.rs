use serde_json::Value;
use wasm_bindgen::JsValue;

/// Payload emitted by the mapping library. Never inspected or rewritten on
/// the way to a handler.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventPayload {
    #[default]
    Empty,
    Data(Value),
    Js(JsValue),
}

/// Event delivered to a `on*` handler.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEvent {
    pub name: String,
    pub payload: EventPayload,
}

impl MapEvent {
    pub fn new(name: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// JSON payload, if the library emitted one.
    pub fn data(&self) -> Option<&Value> {
        match &self.payload {
            EventPayload::Data(value) => Some(value),
            _ => None,
        }
    }
}
