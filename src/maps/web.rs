// ============================================================================
// LEAFLET - MapLibrary backed by the global `L` namespace (wasm32 only)
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::traits::{
    Container, Evented, LayerObject, LibraryRef, MapLibrary, MapObject, MarkerObject, ObjectId,
    TileLayerObject,
};
use crate::error::{LibraryError, LibraryResult};
use crate::models::{ConfigurationSnapshot, EventPayload, Handler, LatLng, MapEvent};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = L, js_name = map, catch)]
    fn leaflet_map(container: &JsValue, options: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = L, js_name = marker, catch)]
    fn leaflet_marker(position: &JsValue, options: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer, catch)]
    fn leaflet_tile_layer(url: &str, options: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = L, js_name = icon, catch)]
    fn leaflet_icon(options: &JsValue) -> Result<JsValue, JsValue>;
}

/// Leaflet as a [`MapLibrary`].
#[derive(Default)]
pub struct Leaflet {
    next_id: Cell<u64>,
}

impl Leaflet {
    pub fn new() -> Self {
        Self::default()
    }

    fn wrap(&self, raw: JsValue) -> JsObject {
        let id = ObjectId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        JsObject {
            id,
            raw,
            subscriptions: RefCell::new(Vec::new()),
        }
    }
}

impl LibraryRef {
    pub fn leaflet() -> Self {
        LibraryRef::new(Leaflet::new())
    }
}

impl MapLibrary for Leaflet {
    fn create_map(
        &self,
        container: &Container,
        options: &ConfigurationSnapshot,
    ) -> LibraryResult<Rc<dyn MapObject>> {
        let target = match container {
            Container::Element(element) => JsValue::from(element.clone()),
            Container::Id(id) => JsValue::from_str(id),
        };
        let raw = leaflet_map(&target, &to_js(options)?)?;
        log::info!("🗺️ Leaflet map created");
        Ok(Rc::new(WebMap(self.wrap(raw))))
    }

    fn create_marker(
        &self,
        position: LatLng,
        options: &ConfigurationSnapshot,
    ) -> LibraryResult<Rc<dyn MarkerObject>> {
        let js_options = to_js(options)?;
        if let Some(icon) = options.get("icon") {
            js_sys::Reflect::set(&js_options, &JsValue::from_str("icon"), &make_icon(icon)?)?;
        }
        let raw = leaflet_marker(&lat_lng(position), &js_options)?;
        Ok(Rc::new(WebMarker(self.wrap(raw))))
    }

    fn create_tile_layer(
        &self,
        url: &str,
        options: &ConfigurationSnapshot,
    ) -> LibraryResult<Rc<dyn TileLayerObject>> {
        let raw = leaflet_tile_layer(url, &to_js(options)?)?;
        Ok(Rc::new(WebTileLayer(self.wrap(raw))))
    }
}

fn to_js(options: &ConfigurationSnapshot) -> LibraryResult<JsValue> {
    options
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| LibraryError::new(err.to_string()))
}

fn lat_lng(position: LatLng) -> JsValue {
    js_sys::Array::of2(&JsValue::from_f64(position.lat), &JsValue::from_f64(position.lng)).into()
}

fn optional_number(value: Option<f64>) -> JsValue {
    value.map_or(JsValue::UNDEFINED, JsValue::from_f64)
}

/// A URL string becomes `L.icon({ iconUrl })`, an object is passed as icon options.
fn make_icon(icon: &Value) -> LibraryResult<JsValue> {
    let options = match icon {
        Value::String(url) => serde_json::json!({ "iconUrl": url }),
        other => other.clone(),
    };
    let options = options
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| LibraryError::new(err.to_string()))?;
    Ok(leaflet_icon(&options)?)
}

// ============================================================================
// JS OBJECT - method calls and listener bookkeeping shared by every handle
// ============================================================================

struct Subscription {
    event: String,
    handler: Handler,
    closure: Closure<dyn FnMut(JsValue)>,
}

struct JsObject {
    id: ObjectId,
    raw: JsValue,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl JsObject {
    fn call(&self, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
        let function: js_sys::Function =
            js_sys::Reflect::get(&self.raw, &JsValue::from_str(method))?.dyn_into()?;
        let args: js_sys::Array = args.iter().collect();
        function.apply(&self.raw, &args)
    }

    /// Enable/disable a Leaflet handler (`dragging`, `scrollWheelZoom`, ...).
    /// Before the handler exists only `options[option]` is updated.
    fn toggle(&self, handler: &str, option: &str, enabled: bool) -> Result<(), JsValue> {
        let target = js_sys::Reflect::get(&self.raw, &JsValue::from_str(handler))?;
        if target.is_object() {
            let method = if enabled { "enable" } else { "disable" };
            let function: js_sys::Function =
                js_sys::Reflect::get(&target, &JsValue::from_str(method))?.dyn_into()?;
            function.call0(&target)?;
        } else {
            let options = js_sys::Reflect::get(&self.raw, &JsValue::from_str("options"))?;
            js_sys::Reflect::set(&options, &JsValue::from_str(option), &JsValue::from_bool(enabled))?;
        }
        Ok(())
    }
}

impl Evented for JsObject {
    fn on(&self, event: &str, handler: &Handler) -> LibraryResult<()> {
        let name = event.to_string();
        let callback = handler.clone();
        let closure = Closure::wrap(Box::new(move |payload: JsValue| {
            callback.emit(MapEvent::new(name.clone(), EventPayload::Js(payload)));
        }) as Box<dyn FnMut(JsValue)>);

        self.call("on", &[JsValue::from_str(event), closure.as_ref().clone()])?;
        self.subscriptions.borrow_mut().push(Subscription {
            event: event.to_string(),
            handler: handler.clone(),
            closure,
        });
        Ok(())
    }

    fn off(&self, event: &str, handler: &Handler) -> LibraryResult<()> {
        let listener = {
            let subscriptions = self.subscriptions.borrow();
            subscriptions
                .iter()
                .position(|sub| sub.event == event && &sub.handler == handler)
                .map(|index| (index, subscriptions[index].closure.as_ref().clone()))
        };
        let Some((index, listener)) = listener else {
            return Ok(());
        };
        // Keep the closure alive until Leaflet has let go of it.
        self.call("off", &[JsValue::from_str(event), listener])?;
        self.subscriptions.borrow_mut().remove(index);
        Ok(())
    }

    fn fire(&self, event: &str, payload: EventPayload) -> LibraryResult<()> {
        let data = match payload {
            EventPayload::Empty => JsValue::UNDEFINED,
            EventPayload::Js(value) => value,
            EventPayload::Data(value) => value
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .map_err(|err| LibraryError::new(err.to_string()))?,
        };
        self.call("fire", &[JsValue::from_str(event), data])?;
        Ok(())
    }
}

macro_rules! delegate_evented {
    ($ty:ty) => {
        impl Evented for $ty {
            fn on(&self, event: &str, handler: &Handler) -> LibraryResult<()> {
                self.0.on(event, handler)
            }

            fn off(&self, event: &str, handler: &Handler) -> LibraryResult<()> {
                self.0.off(event, handler)
            }

            fn fire(&self, event: &str, payload: EventPayload) -> LibraryResult<()> {
                self.0.fire(event, payload)
            }
        }
    };
}

macro_rules! web_layer {
    ($ty:ty) => {
        delegate_evented!($ty);

        impl LayerObject for $ty {
            fn id(&self) -> ObjectId {
                self.0.id
            }

            fn remove(&self) -> LibraryResult<()> {
                self.0.call("remove", &[])?;
                Ok(())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

fn raw_layer(layer: &dyn LayerObject) -> LibraryResult<&JsValue> {
    let any = layer.as_any();
    any.downcast_ref::<WebMarker>()
        .map(|marker| &marker.0.raw)
        .or_else(|| any.downcast_ref::<WebTileLayer>().map(|tiles| &tiles.0.raw))
        .ok_or_else(|| LibraryError::new(format!("layer {} was not created by Leaflet", layer.id())))
}

// ============================================================================
// MAP
// ============================================================================

struct WebMap(JsObject);

delegate_evented!(WebMap);

impl MapObject for WebMap {
    fn id(&self) -> ObjectId {
        self.0.id
    }

    fn add_layer(&self, layer: &dyn LayerObject) -> LibraryResult<()> {
        self.0.call("addLayer", &[raw_layer(layer)?.clone()])?;
        Ok(())
    }

    fn remove_layer(&self, layer: &dyn LayerObject) {
        let Ok(raw) = raw_layer(layer) else {
            return;
        };
        if let Err(err) = self.0.call("removeLayer", &[raw.clone()]) {
            log::warn!("⚠️ removeLayer failed on {}: {:?}", self.0.id, err);
        }
    }

    fn has_layer(&self, layer: &dyn LayerObject) -> bool {
        raw_layer(layer)
            .ok()
            .and_then(|raw| self.0.call("hasLayer", &[raw.clone()]).ok())
            .and_then(|result| result.as_bool())
            .unwrap_or(false)
    }

    fn set_view(&self, center: LatLng, zoom: f64) -> LibraryResult<()> {
        self.0.call("setView", &[lat_lng(center), JsValue::from_f64(zoom)])?;
        Ok(())
    }

    fn set_zoom(&self, zoom: f64) -> LibraryResult<()> {
        self.0.call("setZoom", &[JsValue::from_f64(zoom)])?;
        Ok(())
    }

    fn zoom(&self) -> Option<f64> {
        self.0
            .call("getZoom", &[])
            .ok()
            .and_then(|zoom| zoom.as_f64())
            .filter(|zoom| !zoom.is_nan())
    }

    fn set_min_zoom(&self, zoom: Option<f64>) -> LibraryResult<()> {
        self.0.call("setMinZoom", &[optional_number(zoom)])?;
        Ok(())
    }

    fn set_max_zoom(&self, zoom: Option<f64>) -> LibraryResult<()> {
        self.0.call("setMaxZoom", &[optional_number(zoom)])?;
        Ok(())
    }

    fn set_max_bounds(&self, bounds: Option<&Value>) -> LibraryResult<()> {
        let bounds = match bounds {
            Some(bounds) => bounds
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .map_err(|err| LibraryError::new(err.to_string()))?,
            None => JsValue::NULL,
        };
        self.0.call("setMaxBounds", &[bounds])?;
        Ok(())
    }

    fn set_interaction(&self, handler: &str, enabled: bool) -> LibraryResult<()> {
        self.0.toggle(handler, handler, enabled)?;
        Ok(())
    }

    fn remove(&self) -> LibraryResult<()> {
        self.0.call("remove", &[])?;
        Ok(())
    }
}

// ============================================================================
// LAYERS
// ============================================================================

struct WebMarker(JsObject);

web_layer!(WebMarker);

impl MarkerObject for WebMarker {
    fn as_layer(&self) -> &dyn LayerObject {
        self
    }

    fn set_lat_lng(&self, position: LatLng) -> LibraryResult<()> {
        self.0.call("setLatLng", &[lat_lng(position)])?;
        Ok(())
    }

    fn set_opacity(&self, opacity: f64) -> LibraryResult<()> {
        self.0.call("setOpacity", &[JsValue::from_f64(opacity)])?;
        Ok(())
    }

    fn set_z_index_offset(&self, offset: f64) -> LibraryResult<()> {
        self.0.call("setZIndexOffset", &[JsValue::from_f64(offset)])?;
        Ok(())
    }

    fn set_icon(&self, icon: &Value) -> LibraryResult<()> {
        self.0.call("setIcon", &[make_icon(icon)?])?;
        Ok(())
    }

    fn set_draggable(&self, draggable: bool) -> LibraryResult<()> {
        self.0.toggle("dragging", "draggable", draggable)?;
        Ok(())
    }
}

struct WebTileLayer(JsObject);

web_layer!(WebTileLayer);

impl TileLayerObject for WebTileLayer {
    fn as_layer(&self) -> &dyn LayerObject {
        self
    }

    fn set_url(&self, url: &str) -> LibraryResult<()> {
        self.0.call("setUrl", &[JsValue::from_str(url)])?;
        Ok(())
    }

    fn set_opacity(&self, opacity: f64) -> LibraryResult<()> {
        self.0.call("setOpacity", &[JsValue::from_f64(opacity)])?;
        Ok(())
    }

    fn set_z_index(&self, z_index: f64) -> LibraryResult<()> {
        self.0.call("setZIndex", &[JsValue::from_f64(z_index)])?;
        Ok(())
    }
}
