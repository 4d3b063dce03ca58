use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::LibraryResult;
use crate::models::{ConfigurationSnapshot, EventPayload, Handler, LatLng};

/// Identity of an object created by a [`MapLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a map gets mounted.
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    Element(web_sys::Element),
    Id(String),
}

/// Event emitter side of every managed object.
pub trait Evented {
    fn on(&self, event: &str, handler: &Handler) -> LibraryResult<()>;

    /// Removes the subscription made with the same event name and callback.
    /// Unknown subscriptions are a no-op.
    fn off(&self, event: &str, handler: &Handler) -> LibraryResult<()>;

    fn fire(&self, event: &str, payload: EventPayload) -> LibraryResult<()>;
}

/// Anything a map can hold as a layer.
pub trait LayerObject: Evented {
    fn id(&self) -> ObjectId;

    /// Disposal call. Also takes the layer off whatever map holds it.
    fn remove(&self) -> LibraryResult<()>;

    fn as_any(&self) -> &dyn Any;
}

/// Root surface.
pub trait MapObject: Evented {
    fn id(&self) -> ObjectId;

    fn add_layer(&self, layer: &dyn LayerObject) -> LibraryResult<()>;

    /// Must be a no-op for layers the map does not hold.
    fn remove_layer(&self, layer: &dyn LayerObject);

    fn has_layer(&self, layer: &dyn LayerObject) -> bool;

    fn set_view(&self, center: LatLng, zoom: f64) -> LibraryResult<()>;

    fn set_zoom(&self, zoom: f64) -> LibraryResult<()>;

    fn zoom(&self) -> Option<f64>;

    fn set_min_zoom(&self, zoom: Option<f64>) -> LibraryResult<()>;

    fn set_max_zoom(&self, zoom: Option<f64>) -> LibraryResult<()>;

    fn set_max_bounds(&self, bounds: Option<&Value>) -> LibraryResult<()>;

    /// Toggle an interaction handler such as `dragging` or `scrollWheelZoom`.
    fn set_interaction(&self, handler: &str, enabled: bool) -> LibraryResult<()>;

    /// Disposal call. Removes every layer still on the map.
    fn remove(&self) -> LibraryResult<()>;
}

pub trait MarkerObject: LayerObject {
    fn as_layer(&self) -> &dyn LayerObject;

    fn set_lat_lng(&self, position: LatLng) -> LibraryResult<()>;

    fn set_opacity(&self, opacity: f64) -> LibraryResult<()>;

    fn set_z_index_offset(&self, offset: f64) -> LibraryResult<()>;

    fn set_icon(&self, icon: &Value) -> LibraryResult<()>;

    fn set_draggable(&self, draggable: bool) -> LibraryResult<()>;
}

pub trait TileLayerObject: LayerObject {
    fn as_layer(&self) -> &dyn LayerObject;

    fn set_url(&self, url: &str) -> LibraryResult<()>;

    fn set_opacity(&self, opacity: f64) -> LibraryResult<()>;

    fn set_z_index(&self, z_index: f64) -> LibraryResult<()>;
}

/// The wrapped mapping library, injected rather than reached through a
/// global so a fake can stand in for it.
pub trait MapLibrary {
    fn create_map(
        &self,
        container: &Container,
        options: &ConfigurationSnapshot,
    ) -> LibraryResult<Rc<dyn MapObject>>;

    fn create_marker(
        &self,
        position: LatLng,
        options: &ConfigurationSnapshot,
    ) -> LibraryResult<Rc<dyn MarkerObject>>;

    fn create_tile_layer(
        &self,
        url: &str,
        options: &ConfigurationSnapshot,
    ) -> LibraryResult<Rc<dyn TileLayerObject>>;
}

/// Shared library handle, comparable by identity so it can live in Yew props.
#[derive(Clone)]
pub struct LibraryRef(pub Rc<dyn MapLibrary>);

impl LibraryRef {
    pub fn new(library: impl MapLibrary + 'static) -> Self {
        Self(Rc::new(library))
    }
}

impl PartialEq for LibraryRef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.0) as *const (),
            Rc::as_ptr(&other.0) as *const (),
        )
    }
}

impl fmt::Debug for LibraryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LibraryRef(..)")
    }
}
