// ============================================================================
// OBJECT KINDS - Map, Marker, TileLayer
// ============================================================================

use std::rc::Rc;

use serde_json::Value;

use crate::config::CONFIG;
use crate::error::{AdapterError, AdapterResult, LibraryResult};
use crate::lifecycle::adapter::{Applied, ObjectKind};
use crate::lifecycle::context::ComponentContext;
use crate::lifecycle::reconciler::{sync, SyncReport};
use crate::maps::{LayerObject, MapObject, MarkerObject, ObjectId, TileLayerObject};
use crate::models::{
    ConfigurationSnapshot, DeclaredProps, HandlerSet, LatLng, Reconfiguration, MAP_OPTIONS,
    MARKER_OPTIONS, TILE_LAYER_OPTIONS,
};

/// Map interaction handlers that can be toggled on a live map.
const INTERACTIONS: &[&str] = &[
    "boxZoom",
    "doubleClickZoom",
    "dragging",
    "keyboard",
    "scrollWheelZoom",
    "touchZoom",
];

fn next_center(next: &ConfigurationSnapshot) -> Option<LatLng> {
    next.get("center").and_then(LatLng::from_value)
}

// ============================================================================
// MAP
// ============================================================================

pub struct MapKind;

impl ObjectKind for MapKind {
    type Object = Rc<dyn MapObject>;

    const NAME: &'static str = "Map";
    const OPTIONS: &'static [&'static str] = MAP_OPTIONS;

    fn construct(
        ctx: &ComponentContext,
        _props: &DeclaredProps,
        options: &ConfigurationSnapshot,
    ) -> AdapterResult<Self::Object> {
        let library = ctx.require_library(Self::NAME)?;
        let container = ctx.require_container(Self::NAME)?;
        let map = library.0.create_map(container, options)?;

        // Leaflet only sets a view on its own when both are given.
        if !(options.contains("center") && options.contains("zoom")) {
            let center = options
                .get("center")
                .and_then(LatLng::from_value)
                .unwrap_or(CONFIG.default_center);
            let zoom = options.number("zoom").unwrap_or(CONFIG.default_zoom);
            if let Err(err) = map.set_view(center, zoom) {
                if let Err(cleanup) = map.remove() {
                    log::warn!("⚠️ Map {} could not be removed: {}", map.id(), cleanup);
                }
                return Err(err.into());
            }
        }
        Ok(map)
    }

    fn apply(map: &Self::Object, name: &str, change: &Reconfiguration<'_>) -> LibraryResult<Applied> {
        let next = change.next;
        match name {
            "center" => match next_center(next) {
                Some(center) => {
                    let zoom = next
                        .number("zoom")
                        .or_else(|| map.zoom())
                        .unwrap_or(CONFIG.default_zoom);
                    map.set_view(center, zoom)?;
                    Ok(Applied::Mutated)
                }
                None => Ok(Applied::Unset),
            },
            "zoom" if change.is_changed("center") && next_center(next).is_some() => {
                Ok(Applied::Folded)
            }
            "zoom" => match next.number("zoom") {
                Some(zoom) => {
                    map.set_zoom(zoom)?;
                    Ok(Applied::Mutated)
                }
                None => Ok(Applied::Unset),
            },
            "minZoom" => {
                map.set_min_zoom(next.number("minZoom"))?;
                Ok(Applied::Mutated)
            }
            "maxZoom" => {
                map.set_max_zoom(next.number("maxZoom"))?;
                Ok(Applied::Mutated)
            }
            "maxBounds" => {
                map.set_max_bounds(next.get("maxBounds"))?;
                Ok(Applied::Mutated)
            }
            handler if INTERACTIONS.contains(&handler) => {
                map.set_interaction(handler, next.boolean(handler).unwrap_or(true))?;
                Ok(Applied::Mutated)
            }
            _ => Ok(Applied::ConstructionOnly),
        }
    }

    fn sync_handlers(
        map: &Self::Object,
        subscribed: &mut HandlerSet,
        new: &HandlerSet,
    ) -> LibraryResult<SyncReport> {
        sync(subscribed, new, &**map)
    }

    fn id(map: &Self::Object) -> ObjectId {
        map.id()
    }

    fn release(map: &Self::Object) -> LibraryResult<()> {
        map.remove()
    }
}

// ============================================================================
// MARKER
// ============================================================================

pub struct MarkerKind;

impl ObjectKind for MarkerKind {
    type Object = Rc<dyn MarkerObject>;

    const NAME: &'static str = "Marker";
    const OPTIONS: &'static [&'static str] = MARKER_OPTIONS;
    const POSITIONAL: &'static [&'static str] = &["position"];

    fn construct(
        ctx: &ComponentContext,
        props: &DeclaredProps,
        options: &ConfigurationSnapshot,
    ) -> AdapterResult<Self::Object> {
        let map = ctx.require_map(Self::NAME)?;
        let position = props
            .value("position")
            .and_then(LatLng::from_value)
            .ok_or_else(|| AdapterError::missing(Self::NAME, "position"))?;
        Ok(map.library().0.create_marker(position, options)?)
    }

    fn apply(
        marker: &Self::Object,
        name: &str,
        change: &Reconfiguration<'_>,
    ) -> LibraryResult<Applied> {
        let next = change.next;
        match name {
            "position" => match next.get("position").and_then(LatLng::from_value) {
                Some(position) => {
                    marker.set_lat_lng(position)?;
                    Ok(Applied::Mutated)
                }
                None => {
                    log::warn!("⚠️ Marker {} lost its position; keeping the last one", marker.id());
                    Ok(Applied::Unset)
                }
            },
            "opacity" => {
                marker.set_opacity(next.number("opacity").unwrap_or(1.0))?;
                Ok(Applied::Mutated)
            }
            "zIndexOffset" => {
                marker.set_z_index_offset(next.number("zIndexOffset").unwrap_or(0.0))?;
                Ok(Applied::Mutated)
            }
            "icon" => match next.get("icon") {
                Some(icon) => {
                    marker.set_icon(icon)?;
                    Ok(Applied::Mutated)
                }
                None => Ok(Applied::Unset),
            },
            "draggable" => {
                marker.set_draggable(next.boolean("draggable").unwrap_or(false))?;
                Ok(Applied::Mutated)
            }
            _ => Ok(Applied::ConstructionOnly),
        }
    }

    fn sync_handlers(
        marker: &Self::Object,
        subscribed: &mut HandlerSet,
        new: &HandlerSet,
    ) -> LibraryResult<SyncReport> {
        sync(subscribed, new, &**marker)
    }

    fn as_layer(marker: &Self::Object) -> Option<&dyn LayerObject> {
        Some(marker.as_layer())
    }

    fn id(marker: &Self::Object) -> ObjectId {
        marker.id()
    }

    fn release(marker: &Self::Object) -> LibraryResult<()> {
        marker.remove()
    }
}

// ============================================================================
// TILE LAYER
// ============================================================================

pub struct TileLayerKind;

impl ObjectKind for TileLayerKind {
    type Object = Rc<dyn TileLayerObject>;

    const NAME: &'static str = "TileLayer";
    const OPTIONS: &'static [&'static str] = TILE_LAYER_OPTIONS;
    const POSITIONAL: &'static [&'static str] = &["url"];

    fn construct(
        ctx: &ComponentContext,
        props: &DeclaredProps,
        options: &ConfigurationSnapshot,
    ) -> AdapterResult<Self::Object> {
        let map = ctx.require_map(Self::NAME)?;
        let url = props
            .value("url")
            .and_then(Value::as_str)
            .ok_or_else(|| AdapterError::missing(Self::NAME, "url"))?;
        Ok(map.library().0.create_tile_layer(url, options)?)
    }

    fn apply(
        tiles: &Self::Object,
        name: &str,
        change: &Reconfiguration<'_>,
    ) -> LibraryResult<Applied> {
        let next = change.next;
        match name {
            "url" => match next.string("url") {
                Some(url) => {
                    tiles.set_url(url)?;
                    Ok(Applied::Mutated)
                }
                None => Ok(Applied::Unset),
            },
            "opacity" => {
                tiles.set_opacity(next.number("opacity").unwrap_or(1.0))?;
                Ok(Applied::Mutated)
            }
            "zIndex" => {
                tiles.set_z_index(next.number("zIndex").unwrap_or(1.0))?;
                Ok(Applied::Mutated)
            }
            _ => Ok(Applied::ConstructionOnly),
        }
    }

    fn sync_handlers(
        tiles: &Self::Object,
        subscribed: &mut HandlerSet,
        new: &HandlerSet,
    ) -> LibraryResult<SyncReport> {
        sync(subscribed, new, &**tiles)
    }

    fn as_layer(tiles: &Self::Object) -> Option<&dyn LayerObject> {
        Some(tiles.as_layer())
    }

    fn id(tiles: &Self::Object) -> ObjectId {
        tiles.id()
    }

    fn release(tiles: &Self::Object) -> LibraryResult<()> {
        tiles.remove()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::adapter::LifecycleAdapter;
    use crate::lifecycle::context::MapContext;
    use crate::maps::{Call, Container, LibraryRef, MapLibrary, MemoryLibrary};
    use serde_json::json;

    fn mounted_map(props: DeclaredProps) -> (MemoryLibrary, LifecycleAdapter<MapKind>, ObjectId) {
        let memory = MemoryLibrary::new();
        let mut adapter = LifecycleAdapter::<MapKind>::new();
        adapter
            .mount(
                &ComponentContext::root(LibraryRef::new(memory.clone()), Container::Id("map".into())),
                props,
            )
            .unwrap();
        let id = MapKind::id(adapter.object().unwrap());
        memory.clear_calls();
        (memory, adapter, id)
    }

    #[test]
    fn map_without_view_gets_default_view() {
        let memory = MemoryLibrary::new();
        let mut adapter = LifecycleAdapter::<MapKind>::new();
        adapter
            .mount(
                &ComponentContext::root(LibraryRef::new(memory.clone()), Container::Id("map".into())),
                DeclaredProps::new().with("zoom", 4),
            )
            .unwrap();

        let id = MapKind::id(adapter.object().unwrap());
        assert!(memory.calls().contains(&Call::SetView {
            id,
            center: CONFIG.default_center,
            zoom: 4.0,
        }));
    }

    #[test]
    fn map_with_full_view_is_left_alone() {
        let memory = MemoryLibrary::new();
        let mut adapter = LifecycleAdapter::<MapKind>::new();
        adapter
            .mount(
                &ComponentContext::root(LibraryRef::new(memory.clone()), Container::Id("map".into())),
                DeclaredProps::new()
                    .with("center", json!([59.3, 18.0]))
                    .with("zoom", 10),
            )
            .unwrap();

        assert_eq!(memory.count(|call| matches!(call, Call::SetView { .. })), 0);
    }

    #[test]
    fn center_and_zoom_change_together_as_one_set_view() {
        let (memory, mut adapter, id) = mounted_map(
            DeclaredProps::new()
                .with("center", json!([59.3, 18.0]))
                .with("zoom", 10),
        );

        adapter
            .update(
                &ComponentContext::default(),
                DeclaredProps::new()
                    .with("center", json!({ "lat": 48.85, "lng": 2.35 }))
                    .with("zoom", 12),
            )
            .unwrap();

        assert_eq!(
            memory.calls(),
            vec![Call::SetView {
                id,
                center: LatLng::new(48.85, 2.35),
                zoom: 12.0,
            }]
        );
    }

    #[test]
    fn zoom_alone_uses_set_zoom() {
        let (memory, mut adapter, id) = mounted_map(
            DeclaredProps::new()
                .with("center", json!([59.3, 18.0]))
                .with("zoom", 10),
        );

        adapter
            .update(
                &ComponentContext::default(),
                DeclaredProps::new()
                    .with("center", json!([59.3, 18.0]))
                    .with("zoom", 11),
            )
            .unwrap();

        assert_eq!(memory.calls(), vec![Call::SetZoom { id, zoom: 11.0 }]);
    }

    #[test]
    fn unreadable_center_does_not_swallow_a_zoom_change() {
        let (memory, mut adapter, id) = mounted_map(
            DeclaredProps::new()
                .with("center", json!([59.3, 18.0]))
                .with("zoom", 10),
        );

        adapter
            .update(
                &ComponentContext::default(),
                DeclaredProps::new()
                    .with("center", "somewhere north")
                    .with("zoom", 12),
            )
            .unwrap();

        assert_eq!(memory.calls(), vec![Call::SetZoom { id, zoom: 12.0 }]);
    }

    #[test]
    fn map_limits_and_interactions_are_live() {
        let (memory, mut adapter, id) = mounted_map(DeclaredProps::new().with("maxZoom", 3));

        adapter
            .update(
                &ComponentContext::default(),
                DeclaredProps::new()
                    .with("minZoom", 2)
                    .with("scrollWheelZoom", false)
                    .with("zoomControl", false),
            )
            .unwrap();

        assert_eq!(
            memory.calls(),
            vec![
                Call::SetMaxZoom { id, zoom: None },
                Call::SetMinZoom { id, zoom: Some(2.0) },
                Call::SetInteraction {
                    id,
                    handler: "scrollWheelZoom".into(),
                    enabled: false,
                },
            ]
        );
    }

    #[test]
    fn tile_layer_url_and_z_index_are_live() {
        let memory = MemoryLibrary::new();
        let library = LibraryRef::new(memory.clone());
        let map = memory
            .create_map(&Container::Id("map".into()), &ConfigurationSnapshot::default())
            .unwrap();
        let ctx = ComponentContext::within(Some(MapContext::new(map, library)));
        let mut adapter = LifecycleAdapter::<TileLayerKind>::new();
        adapter
            .mount(
                &ctx,
                DeclaredProps::new()
                    .with("url", "https://a.tiles.example/{z}/{x}/{y}.png")
                    .with("subdomains", "abc"),
            )
            .unwrap();
        let id = TileLayerKind::id(adapter.object().unwrap());
        memory.clear_calls();

        adapter
            .update(
                &ctx,
                DeclaredProps::new()
                    .with("url", "https://b.tiles.example/{z}/{x}/{y}.png")
                    .with("subdomains", "xyz")
                    .with("zIndex", 5),
            )
            .unwrap();

        assert_eq!(
            memory.calls(),
            vec![
                Call::SetUrl {
                    id,
                    url: "https://b.tiles.example/{z}/{x}/{y}.png".into(),
                },
                Call::SetZIndex { id, z_index: 5.0 },
            ]
        );
    }

    #[test]
    fn marker_position_icon_and_dragging_are_live() {
        let memory = MemoryLibrary::new();
        let library = LibraryRef::new(memory.clone());
        let map = memory
            .create_map(&Container::Id("map".into()), &ConfigurationSnapshot::default())
            .unwrap();
        let ctx = ComponentContext::within(Some(MapContext::new(map, library)));
        let mut adapter = LifecycleAdapter::<MarkerKind>::new();
        adapter
            .mount(&ctx, DeclaredProps::new().with("position", json!([59.3367, 18.0667])))
            .unwrap();
        let id = MarkerKind::id(adapter.object().unwrap());
        memory.clear_calls();

        adapter
            .update(
                &ctx,
                DeclaredProps::new()
                    .with("position", json!([59.0, 18.0]))
                    .with("icon", "pin.png")
                    .with("draggable", true),
            )
            .unwrap();

        assert_eq!(
            memory.calls(),
            vec![
                Call::SetDraggable { id, draggable: true },
                Call::SetIcon { id, icon: json!("pin.png") },
                Call::SetLatLng {
                    id,
                    position: LatLng::new(59.0, 18.0),
                },
            ]
        );
    }
}
