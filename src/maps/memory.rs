// ============================================================================
// MEMORY LIBRARY - In-process stand-in for the mapping library
// ============================================================================
// Keeps the object graph (layers, listeners) in memory and journals every
// call so a headless host or a test can see exactly what was asked of it.
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::{Rc, Weak};

use serde_json::Value;

use super::traits::{
    Container, Evented, LayerObject, MapLibrary, MapObject, MarkerObject, ObjectId,
    TileLayerObject,
};
use crate::error::{LibraryError, LibraryResult};
use crate::models::{ConfigurationSnapshot, EventPayload, Handler, LatLng, MapEvent};

/// One call made against the library or one of its objects.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateMap { id: ObjectId, container: Container, options: ConfigurationSnapshot },
    CreateMarker { id: ObjectId, position: LatLng, options: ConfigurationSnapshot },
    CreateTileLayer { id: ObjectId, url: String, options: ConfigurationSnapshot },
    On { id: ObjectId, event: String },
    Off { id: ObjectId, event: String },
    AddLayer { map: ObjectId, layer: ObjectId },
    RemoveLayer { map: ObjectId, layer: ObjectId },
    SetView { id: ObjectId, center: LatLng, zoom: f64 },
    SetZoom { id: ObjectId, zoom: f64 },
    SetMinZoom { id: ObjectId, zoom: Option<f64> },
    SetMaxZoom { id: ObjectId, zoom: Option<f64> },
    SetMaxBounds { id: ObjectId, bounds: Option<Value> },
    SetInteraction { id: ObjectId, handler: String, enabled: bool },
    SetLatLng { id: ObjectId, position: LatLng },
    SetOpacity { id: ObjectId, opacity: f64 },
    SetZIndexOffset { id: ObjectId, offset: f64 },
    SetIcon { id: ObjectId, icon: Value },
    SetDraggable { id: ObjectId, draggable: bool },
    SetUrl { id: ObjectId, url: String },
    SetZIndex { id: ObjectId, z_index: f64 },
    Remove { id: ObjectId },
}

impl Call {
    pub fn is_constructor(&self) -> bool {
        matches!(
            self,
            Call::CreateMap { .. } | Call::CreateMarker { .. } | Call::CreateTileLayer { .. }
        )
    }

    /// Leaflet method this call stands for (`L.map`, `setZoom`, ...).
    pub fn method(&self) -> &'static str {
        match self {
            Call::CreateMap { .. } => "map",
            Call::CreateMarker { .. } => "marker",
            Call::CreateTileLayer { .. } => "tileLayer",
            Call::On { .. } => "on",
            Call::Off { .. } => "off",
            Call::AddLayer { .. } => "addLayer",
            Call::RemoveLayer { .. } => "removeLayer",
            Call::SetView { .. } => "setView",
            Call::SetZoom { .. } => "setZoom",
            Call::SetMinZoom { .. } => "setMinZoom",
            Call::SetMaxZoom { .. } => "setMaxZoom",
            Call::SetMaxBounds { .. } => "setMaxBounds",
            Call::SetInteraction { enabled: true, .. }
            | Call::SetDraggable { draggable: true, .. } => "enable",
            Call::SetInteraction { enabled: false, .. }
            | Call::SetDraggable { draggable: false, .. } => "disable",
            Call::SetLatLng { .. } => "setLatLng",
            Call::SetOpacity { .. } => "setOpacity",
            Call::SetZIndexOffset { .. } => "setZIndexOffset",
            Call::SetIcon { .. } => "setIcon",
            Call::SetUrl { .. } => "setUrl",
            Call::SetZIndex { .. } => "setZIndex",
            Call::Remove { .. } => "remove",
        }
    }
}

type LayerSet = Rc<RefCell<BTreeSet<ObjectId>>>;

#[derive(Default)]
struct Shared {
    journal: RefCell<Vec<Call>>,
    next_id: Cell<u64>,
    listeners: RefCell<BTreeMap<ObjectId, Rc<Listeners>>>,
    layers: RefCell<BTreeMap<ObjectId, LayerSet>>,
    rejected: RefCell<BTreeSet<String>>,
    failing: RefCell<BTreeSet<String>>,
}

impl Shared {
    /// Journal `call`, unless its method was set to fail.
    fn record(&self, call: Call) -> LibraryResult<()> {
        let method = call.method();
        if self.failing.borrow().contains(method) {
            return Err(LibraryError::new(format!("{}() failed", method)));
        }
        self.journal.borrow_mut().push(call);
        Ok(())
    }

    fn next_id(&self) -> ObjectId {
        let id = ObjectId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        id
    }

    /// Forget a removed object.
    fn release(&self, id: ObjectId) {
        self.listeners.borrow_mut().remove(&id);
        self.layers.borrow_mut().remove(&id);
    }
}

/// Recording implementation of [`MapLibrary`]. Clones share state.
#[derive(Clone, Default)]
pub struct MemoryLibrary {
    shared: Rc<Shared>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every successful call so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.shared.journal.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.shared.journal.borrow_mut().clear();
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.shared.journal.borrow().iter().filter(|call| predicate(call)).count()
    }

    /// Live subscriptions on an object.
    pub fn listener_count(&self, id: ObjectId) -> usize {
        self.shared
            .listeners
            .borrow()
            .get(&id)
            .map_or(0, |listeners| listeners.len())
    }

    /// Layers currently held by a live map.
    pub fn layers_of(&self, map: ObjectId) -> Vec<ObjectId> {
        self.shared
            .layers
            .borrow()
            .get(&map)
            .map(|layers| layers.borrow().iter().copied().collect())
            .unwrap_or_default()
    }

    /// Objects created and not yet removed.
    pub fn live_objects(&self) -> usize {
        self.shared.listeners.borrow().len()
    }

    /// Make constructors fail whenever `option` is present, the way the real
    /// library throws on an invalid option value.
    pub fn reject(&self, option: impl Into<String>) {
        self.shared.rejected.borrow_mut().insert(option.into());
    }

    /// Make every later call of `method` (see [`Call::method`]) fail.
    /// `removeLayer` never fails.
    pub fn fail(&self, method: impl Into<String>) {
        self.shared.failing.borrow_mut().insert(method.into());
    }

    pub fn clear_failures(&self) {
        self.shared.failing.borrow_mut().clear();
    }

    fn check(&self, options: &ConfigurationSnapshot) -> LibraryResult<()> {
        let rejected = self.shared.rejected.borrow();
        match options.iter().find(|(name, _)| rejected.contains(*name)) {
            Some((name, value)) => Err(LibraryError::new(format!(
                "Invalid value for option {}: {}",
                name, value
            ))),
            None => Ok(()),
        }
    }

    fn core(&self, id: ObjectId) -> Core {
        let listeners = Rc::new(Listeners::default());
        self.shared.listeners.borrow_mut().insert(id, listeners.clone());
        Core {
            id,
            shared: self.shared.clone(),
            listeners,
        }
    }

    fn layer(&self, id: ObjectId) -> LayerCore {
        LayerCore {
            core: self.core(id),
            host: RefCell::new(None),
        }
    }
}

impl MapLibrary for MemoryLibrary {
    fn create_map(
        &self,
        container: &Container,
        options: &ConfigurationSnapshot,
    ) -> LibraryResult<Rc<dyn MapObject>> {
        self.check(options)?;
        let id = self.shared.next_id();
        self.shared.record(Call::CreateMap {
            id,
            container: container.clone(),
            options: options.clone(),
        })?;
        let layers = LayerSet::default();
        self.shared.layers.borrow_mut().insert(id, layers.clone());
        Ok(Rc::new(MemoryMap {
            core: self.core(id),
            layers,
            zoom: Cell::new(options.number("zoom")),
            removed: Cell::new(false),
        }))
    }

    fn create_marker(
        &self,
        position: LatLng,
        options: &ConfigurationSnapshot,
    ) -> LibraryResult<Rc<dyn MarkerObject>> {
        self.check(options)?;
        let id = self.shared.next_id();
        self.shared.record(Call::CreateMarker {
            id,
            position,
            options: options.clone(),
        })?;
        Ok(Rc::new(MemoryMarker { layer: self.layer(id) }))
    }

    fn create_tile_layer(
        &self,
        url: &str,
        options: &ConfigurationSnapshot,
    ) -> LibraryResult<Rc<dyn TileLayerObject>> {
        self.check(options)?;
        let id = self.shared.next_id();
        self.shared.record(Call::CreateTileLayer {
            id,
            url: url.to_string(),
            options: options.clone(),
        })?;
        Ok(Rc::new(MemoryTileLayer { layer: self.layer(id) }))
    }
}

// ============================================================================
// LISTENERS
// ============================================================================

#[derive(Default)]
struct Listeners {
    entries: RefCell<Vec<(String, Handler)>>,
}

impl Listeners {
    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

/// Identity, journal access and subscriptions shared by every object.
struct Core {
    id: ObjectId,
    shared: Rc<Shared>,
    listeners: Rc<Listeners>,
}

impl Core {
    fn record(&self, call: Call) -> LibraryResult<()> {
        self.shared.record(call)
    }
}

impl Evented for Core {
    fn on(&self, event: &str, handler: &Handler) -> LibraryResult<()> {
        self.record(Call::On {
            id: self.id,
            event: event.to_string(),
        })?;
        self.listeners
            .entries
            .borrow_mut()
            .push((event.to_string(), handler.clone()));
        Ok(())
    }

    fn off(&self, event: &str, handler: &Handler) -> LibraryResult<()> {
        self.record(Call::Off {
            id: self.id,
            event: event.to_string(),
        })?;
        self.listeners
            .entries
            .borrow_mut()
            .retain(|(name, subscribed)| !(name == event && subscribed == handler));
        Ok(())
    }

    fn fire(&self, event: &str, payload: EventPayload) -> LibraryResult<()> {
        // Handlers may subscribe or unsubscribe while running.
        let matching: Vec<Handler> = self
            .listeners
            .entries
            .borrow()
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in matching {
            handler.emit(MapEvent::new(event, payload.clone()));
        }
        Ok(())
    }
}

macro_rules! delegate_evented {
    ($ty:ty, $($core:ident).+) => {
        impl Evented for $ty {
            fn on(&self, event: &str, handler: &Handler) -> LibraryResult<()> {
                self.$($core).+.on(event, handler)
            }

            fn off(&self, event: &str, handler: &Handler) -> LibraryResult<()> {
                self.$($core).+.off(event, handler)
            }

            fn fire(&self, event: &str, payload: EventPayload) -> LibraryResult<()> {
                self.$($core).+.fire(event, payload)
            }
        }
    };
}

// ============================================================================
// MAP
// ============================================================================

struct MemoryMap {
    core: Core,
    layers: LayerSet,
    zoom: Cell<Option<f64>>,
    removed: Cell<bool>,
}

impl MemoryMap {
    fn live(&self) -> LibraryResult<()> {
        if self.removed.get() {
            Err(LibraryError::new(format!("map {} has been removed", self.core.id)))
        } else {
            Ok(())
        }
    }
}

delegate_evented!(MemoryMap, core);

impl MapObject for MemoryMap {
    fn id(&self) -> ObjectId {
        self.core.id
    }

    fn add_layer(&self, layer: &dyn LayerObject) -> LibraryResult<()> {
        self.live()?;
        self.core.record(Call::AddLayer {
            map: self.core.id,
            layer: layer.id(),
        })?;
        self.layers.borrow_mut().insert(layer.id());
        if let Some(core) = layer_core(layer) {
            *core.host.borrow_mut() = Some(Rc::downgrade(&self.layers));
        }
        Ok(())
    }

    fn remove_layer(&self, layer: &dyn LayerObject) {
        self.core.shared.journal.borrow_mut().push(Call::RemoveLayer {
            map: self.core.id,
            layer: layer.id(),
        });
        if self.layers.borrow_mut().remove(&layer.id()) {
            if let Some(core) = layer_core(layer) {
                core.host.borrow_mut().take();
            }
        }
    }

    fn has_layer(&self, layer: &dyn LayerObject) -> bool {
        self.layers.borrow().contains(&layer.id())
    }

    fn set_view(&self, center: LatLng, zoom: f64) -> LibraryResult<()> {
        self.live()?;
        self.core.record(Call::SetView {
            id: self.core.id,
            center,
            zoom,
        })?;
        self.zoom.set(Some(zoom));
        Ok(())
    }

    fn set_zoom(&self, zoom: f64) -> LibraryResult<()> {
        self.live()?;
        self.core.record(Call::SetZoom { id: self.core.id, zoom })?;
        self.zoom.set(Some(zoom));
        Ok(())
    }

    fn zoom(&self) -> Option<f64> {
        self.zoom.get()
    }

    fn set_min_zoom(&self, zoom: Option<f64>) -> LibraryResult<()> {
        self.live()?;
        self.core.record(Call::SetMinZoom { id: self.core.id, zoom })
    }

    fn set_max_zoom(&self, zoom: Option<f64>) -> LibraryResult<()> {
        self.live()?;
        self.core.record(Call::SetMaxZoom { id: self.core.id, zoom })
    }

    fn set_max_bounds(&self, bounds: Option<&Value>) -> LibraryResult<()> {
        self.live()?;
        self.core.record(Call::SetMaxBounds {
            id: self.core.id,
            bounds: bounds.cloned(),
        })
    }

    fn set_interaction(&self, handler: &str, enabled: bool) -> LibraryResult<()> {
        self.live()?;
        self.core.record(Call::SetInteraction {
            id: self.core.id,
            handler: handler.to_string(),
            enabled,
        })
    }

    fn remove(&self) -> LibraryResult<()> {
        self.core.record(Call::Remove { id: self.core.id })?;
        self.layers.borrow_mut().clear();
        self.removed.set(true);
        self.core.shared.release(self.core.id);
        Ok(())
    }
}

// ============================================================================
// LAYERS
// ============================================================================

struct LayerCore {
    core: Core,
    host: RefCell<Option<Weak<RefCell<BTreeSet<ObjectId>>>>>,
}

impl LayerCore {
    fn remove(&self) -> LibraryResult<()> {
        self.core.record(Call::Remove { id: self.core.id })?;
        if let Some(layers) = self.host.borrow_mut().take().and_then(|host| host.upgrade()) {
            layers.borrow_mut().remove(&self.core.id);
        }
        self.core.shared.release(self.core.id);
        Ok(())
    }
}

fn layer_core(layer: &dyn LayerObject) -> Option<&LayerCore> {
    let any = layer.as_any();
    any.downcast_ref::<MemoryMarker>()
        .map(|marker| &marker.layer)
        .or_else(|| any.downcast_ref::<MemoryTileLayer>().map(|tiles| &tiles.layer))
}

macro_rules! layer_impls {
    ($ty:ty) => {
        delegate_evented!($ty, layer.core);

        impl LayerObject for $ty {
            fn id(&self) -> ObjectId {
                self.layer.core.id
            }

            fn remove(&self) -> LibraryResult<()> {
                self.layer.remove()
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

struct MemoryMarker {
    layer: LayerCore,
}

layer_impls!(MemoryMarker);

impl MemoryMarker {
    fn record(&self, call: Call) -> LibraryResult<()> {
        self.layer.core.record(call)
    }
}

impl MarkerObject for MemoryMarker {
    fn as_layer(&self) -> &dyn LayerObject {
        self
    }

    fn set_lat_lng(&self, position: LatLng) -> LibraryResult<()> {
        self.record(Call::SetLatLng { id: self.id(), position })
    }

    fn set_opacity(&self, opacity: f64) -> LibraryResult<()> {
        self.record(Call::SetOpacity { id: self.id(), opacity })
    }

    fn set_z_index_offset(&self, offset: f64) -> LibraryResult<()> {
        self.record(Call::SetZIndexOffset { id: self.id(), offset })
    }

    fn set_icon(&self, icon: &Value) -> LibraryResult<()> {
        self.record(Call::SetIcon {
            id: self.id(),
            icon: icon.clone(),
        })
    }

    fn set_draggable(&self, draggable: bool) -> LibraryResult<()> {
        self.record(Call::SetDraggable { id: self.id(), draggable })
    }
}

struct MemoryTileLayer {
    layer: LayerCore,
}

layer_impls!(MemoryTileLayer);

impl MemoryTileLayer {
    fn record(&self, call: Call) -> LibraryResult<()> {
        self.layer.core.record(call)
    }
}

impl TileLayerObject for MemoryTileLayer {
    fn as_layer(&self) -> &dyn LayerObject {
        self
    }

    fn set_url(&self, url: &str) -> LibraryResult<()> {
        self.record(Call::SetUrl {
            id: self.id(),
            url: url.to_string(),
        })
    }

    fn set_opacity(&self, opacity: f64) -> LibraryResult<()> {
        self.record(Call::SetOpacity { id: self.id(), opacity })
    }

    fn set_z_index(&self, z_index: f64) -> LibraryResult<()> {
        self.record(Call::SetZIndex { id: self.id(), z_index })
    }
}
