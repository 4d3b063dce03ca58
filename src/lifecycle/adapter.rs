// ============================================================================
// LIFECYCLE ADAPTER - One external object per component instance
// ============================================================================
// Construct on mount, apply option deltas on update, release on unmount.
// Within one update: options, then handlers, then attachment.
// ============================================================================

use std::fmt;

use crate::error::{AdapterError, AdapterResult, LibraryResult};
use crate::lifecycle::attachment::Attachment;
use crate::lifecycle::context::ComponentContext;
use crate::lifecycle::reconciler::SyncReport;
use crate::maps::{LayerObject, ObjectId};
use crate::models::{ConfigurationSnapshot, DeclaredProps, HandlerSet, Reconfiguration};

/// Outcome of pushing one changed option to the live object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The kind's mutator was called.
    Mutated,
    /// Handled by the mutator of another option changed in the same update.
    Folded,
    /// The option was removed and the library has nothing to restore.
    Unset,
    /// Construction-only option; the change does not reach the live object.
    ConstructionOnly,
}

/// A kind of managed external object (map, marker, tile layer).
pub trait ObjectKind: 'static {
    type Object;

    const NAME: &'static str;

    /// Options passed to the library constructor.
    const OPTIONS: &'static [&'static str];

    /// Props passed positionally to the constructor but still tracked for
    /// reconfiguration.
    const POSITIONAL: &'static [&'static str] = &[];

    /// Validate required context, then call the library constructor with
    /// `options`. No library call may happen before validation passes.
    fn construct(
        ctx: &ComponentContext,
        props: &DeclaredProps,
        options: &ConfigurationSnapshot,
    ) -> AdapterResult<Self::Object>;

    fn apply(
        object: &Self::Object,
        name: &str,
        change: &Reconfiguration<'_>,
    ) -> LibraryResult<Applied>;

    /// Move the object from `subscribed` to `new`, keeping `subscribed`
    /// equal to what the object holds even when the library fails.
    fn sync_handlers(
        object: &Self::Object,
        subscribed: &mut HandlerSet,
        new: &HandlerSet,
    ) -> LibraryResult<SyncReport>;

    /// Layer view of the object, for kinds that attach to a map.
    fn as_layer(_object: &Self::Object) -> Option<&dyn LayerObject> {
        None
    }

    fn id(object: &Self::Object) -> ObjectId;

    /// Library disposal call.
    fn release(object: &Self::Object) -> LibraryResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Unmounted,
    Constructing,
    Live,
    Destroying,
    Destroyed,
}

impl fmt::Display for AdapterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdapterState::Unmounted => "unmounted",
            AdapterState::Constructing => "constructing",
            AdapterState::Live => "live",
            AdapterState::Destroying => "destroying",
            AdapterState::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

pub struct LifecycleAdapter<K: ObjectKind> {
    state: AdapterState,
    object: Option<K::Object>,
    config: ConfigurationSnapshot,
    handlers: HandlerSet,
    attachment: Option<Attachment>,
}

impl<K: ObjectKind> LifecycleAdapter<K> {
    pub fn new() -> Self {
        Self {
            state: AdapterState::Unmounted,
            object: None,
            config: ConfigurationSnapshot::default(),
            handlers: HandlerSet::new(),
            attachment: None,
        }
    }

    pub fn state(&self) -> AdapterState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state == AdapterState::Live
    }

    /// The managed object while live.
    pub fn object(&self) -> Option<&K::Object> {
        self.object.as_ref()
    }

    /// Tracked configuration (options plus positional props) last applied.
    pub fn config(&self) -> &ConfigurationSnapshot {
        &self.config
    }

    pub fn handlers(&self) -> &HandlerSet {
        &self.handlers
    }

    /// Map the object is currently attached to.
    pub fn attached_to(&self) -> Option<ObjectId> {
        self.attachment.as_ref().map(Attachment::parent_id)
    }

    fn tracked(props: &DeclaredProps) -> ConfigurationSnapshot {
        props.snapshot(&[K::OPTIONS, K::POSITIONAL].concat())
    }

    /// Construct. A failure leaves the adapter `Unmounted` with nothing
    /// subscribed or attached.
    pub fn mount(&mut self, ctx: &ComponentContext, props: DeclaredProps) -> AdapterResult<()> {
        if self.state != AdapterState::Unmounted {
            log::warn!("⚠️ {} mount ignored: adapter is {}", K::NAME, self.state);
            return Ok(());
        }
        self.state = AdapterState::Constructing;

        let config = Self::tracked(&props);
        let options = config.restrict(K::OPTIONS);
        let object = match K::construct(ctx, &props, &options) {
            Ok(object) => object,
            Err(err) => {
                self.state = AdapterState::Unmounted;
                return Err(err);
            }
        };

        let mut handlers = HandlerSet::new();
        if let Err(err) = K::sync_handlers(&object, &mut handlers, &props.handlers()) {
            self.abandon(&object, handlers);
            return Err(err.into());
        }

        let attachment = match (ctx.map.as_ref(), K::as_layer(&object)) {
            (Some(map), Some(layer)) => match Attachment::attach(map.map().clone(), layer) {
                Ok(attachment) => Some(attachment),
                Err(err) => {
                    self.abandon(&object, handlers);
                    return Err(err.into());
                }
            },
            _ => None,
        };

        log::info!(
            "✅ {} {} live ({} options, {} handlers)",
            K::NAME,
            K::id(&object),
            options.len(),
            handlers.len()
        );
        self.object = Some(object);
        self.config = config;
        self.handlers = handlers;
        self.attachment = attachment;
        self.state = AdapterState::Live;
        Ok(())
    }

    /// Roll back a half-built object. The error that caused the rollback is
    /// the one reported, so failures here are only logged.
    fn abandon(&mut self, object: &K::Object, mut handlers: HandlerSet) {
        if let Err(err) = K::sync_handlers(object, &mut handlers, &HandlerSet::new()) {
            log::warn!("⚠️ {} rollback could not unsubscribe: {}", K::NAME, err);
        }
        if let Err(err) = K::release(object) {
            log::warn!("⚠️ {} rollback could not release: {}", K::NAME, err);
        }
        self.state = AdapterState::Unmounted;
    }

    /// Reconfigure, sync handlers, then follow the contextual map if it
    /// changed. Identical props make no library calls.
    ///
    /// A library error stops the option pass at the failing option; handlers
    /// and attachment are still brought up to date before the first error is
    /// returned. The tracked configuration only records options that reached
    /// the object, so the next update retries the rest.
    pub fn update(&mut self, ctx: &ComponentContext, props: DeclaredProps) -> AdapterResult<()> {
        if self.state != AdapterState::Live {
            log::warn!("⚠️ {} update ignored: adapter is {}", K::NAME, self.state);
            return Ok(());
        }
        let Some(object) = self.object.as_ref() else {
            return Ok(());
        };
        let mut failure: Option<AdapterError> = None;

        let previous = self.config.clone();
        let next = Self::tracked(&props);
        let change = Reconfiguration::new(&previous, &next);
        for name in &change.changed {
            match K::apply(object, name, &change) {
                Ok(applied) => {
                    log::debug!("⚙️ {} {} `{}`: {:?}", K::NAME, K::id(object), name, applied);
                    self.config.assign(name, next.get(name).cloned());
                }
                Err(err) => {
                    log::error!("❌ {} {} `{}`: {}", K::NAME, K::id(object), name, err);
                    failure = Some(err.into());
                    break;
                }
            }
        }

        if let Err(err) = K::sync_handlers(object, &mut self.handlers, &props.handlers()) {
            log::error!("❌ {} {} handlers: {}", K::NAME, K::id(object), err);
            failure.get_or_insert(err.into());
        }

        if let Some(layer) = K::as_layer(object) {
            let current = self.attachment.as_ref().map(Attachment::parent_id);
            let target = ctx.map.as_ref();
            if current != target.map(|map| map.id()) {
                if let Some(previous) = self.attachment.take() {
                    previous.detach(layer);
                }
                if let Some(map) = target {
                    match Attachment::attach(map.map().clone(), layer) {
                        Ok(attachment) => self.attachment = Some(attachment),
                        Err(err) => {
                            failure.get_or_insert(err.into());
                        }
                    }
                }
            }
        }

        failure.map_or(Ok(()), Err)
    }

    /// Unsubscribe everything, detach, then release. Every step runs even if
    /// an earlier one fails; the first library error is returned. Terminal;
    /// later calls are logged no-ops.
    pub fn destroy(&mut self) -> AdapterResult<()> {
        if self.state != AdapterState::Live {
            log::warn!("⚠️ {} destroy ignored: adapter is {}", K::NAME, self.state);
            return Ok(());
        }
        self.state = AdapterState::Destroying;
        let mut failure = None;

        if let Some(object) = self.object.take() {
            if let Err(err) = K::sync_handlers(&object, &mut self.handlers, &HandlerSet::new()) {
                failure = Some(err);
            }
            if let (Some(attachment), Some(layer)) = (self.attachment.take(), K::as_layer(&object)) {
                attachment.detach(layer);
            }
            if let Err(err) = K::release(&object) {
                failure.get_or_insert(err);
            }
            log::info!("🗑️ {} {} released", K::NAME, K::id(&object));
        }
        // Whatever was still subscribed went away with the object.
        self.handlers = HandlerSet::new();
        self.state = AdapterState::Destroyed;

        match failure {
            Some(err) => {
                log::error!("❌ {} destroy: {}", K::NAME, err);
                Err(err.into())
            }
            None => Ok(()),
        }
    }
}

impl<K: ObjectKind> Default for LifecycleAdapter<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ObjectKind> Drop for LifecycleAdapter<K> {
    fn drop(&mut self) {
        if self.state == AdapterState::Live {
            // Already logged by destroy.
            let _ = self.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdapterError;
    use crate::lifecycle::context::MapContext;
    use crate::lifecycle::kinds::{MapKind, MarkerKind, TileLayerKind};
    use crate::maps::{Call, Container, LibraryRef, MapLibrary, MapObject, MemoryLibrary};
    use crate::models::{EventPayload, LatLng, MapEvent, MAP_OPTIONS};
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;
    use yew::Callback;

    fn library() -> (MemoryLibrary, LibraryRef) {
        let memory = MemoryLibrary::new();
        (memory.clone(), LibraryRef::new(memory))
    }

    fn live_map(memory: &MemoryLibrary, library: &LibraryRef) -> MapContext {
        let map = memory
            .create_map(&Container::Id("map".into()), &ConfigurationSnapshot::default())
            .unwrap();
        MapContext::new(map, library.clone())
    }

    fn marker_props() -> DeclaredProps {
        DeclaredProps::new().with("position", json!([59.3367, 18.0667]))
    }

    fn counter() -> (Callback<MapEvent>, Rc<Cell<u32>>) {
        let hits = Rc::new(Cell::new(0));
        let sink = hits.clone();
        (Callback::from(move |_: MapEvent| sink.set(sink.get() + 1)), hits)
    }

    #[test]
    fn map_constructor_gets_exactly_the_recognized_options() {
        let (memory, library) = library();
        let mut props = DeclaredProps::new();
        let declared = json!({
            "attributionControl": true,
            "boundsOptions": { "paddingTopLeft": [0, 1] },
            "crs": [],
            "inertiaDeceleration": 300,
            "layers": [],
            "maxZoom": 3,
            "minZoom": 2,
            "preferCanvas": true,
            "wheelPxPerZoomLevel": 1,
            "zoomControl": false,
        });
        for (name, value) in declared.as_object().unwrap() {
            props.set(name.clone(), value.clone());
        }
        props.set("nonMapOption", true);

        let mut adapter = LifecycleAdapter::<MapKind>::new();
        adapter
            .mount(&ComponentContext::root(library, Container::Id("map".into())), props)
            .unwrap();

        let calls = memory.calls();
        let Call::CreateMap { options, .. } = &calls[0] else {
            panic!("first call should construct the map");
        };
        assert_eq!(options.len(), 10);
        assert!(!options.contains("nonMapOption"));
        for (name, value) in declared.as_object().unwrap() {
            assert!(MAP_OPTIONS.contains(&name.as_str()));
            assert_eq!(options.get(name), Some(value));
        }
    }

    #[test]
    fn marker_constructor_gets_options_without_position() {
        let (memory, library) = library();
        let map = live_map(&memory, &library);
        let props = marker_props()
            .with("alt", "tiny")
            .with("opacity", 0.5)
            .with("riseOffset", 20)
            .with("arbitrary", true);

        let mut adapter = LifecycleAdapter::<MarkerKind>::new();
        adapter.mount(&ComponentContext::within(Some(map)), props).unwrap();

        let created = memory
            .calls()
            .into_iter()
            .find_map(|call| match call {
                Call::CreateMarker { position, options, .. } => Some((position, options)),
                _ => None,
            })
            .unwrap();
        assert_eq!(created.0, LatLng::new(59.3367, 18.0667));
        assert_eq!(
            created.1.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["alt", "opacity", "riseOffset"]
        );
    }

    #[test]
    fn destroy_disposes_exactly_once() {
        let (memory, library) = library();
        let map = live_map(&memory, &library);
        let mut adapter = LifecycleAdapter::<MarkerKind>::new();
        adapter
            .mount(&ComponentContext::within(Some(map)), marker_props())
            .unwrap();
        let id = MarkerKind::id(adapter.object().unwrap());

        adapter.destroy().unwrap();
        adapter.destroy().unwrap();
        drop(adapter);

        assert_eq!(memory.count(|call| *call == Call::Remove { id }), 1);
    }

    #[test]
    fn dropping_a_live_adapter_releases_it() {
        let (memory, library) = library();
        let map = live_map(&memory, &library);
        let mut adapter = LifecycleAdapter::<TileLayerKind>::new();
        adapter
            .mount(
                &ComponentContext::within(Some(map.clone())),
                DeclaredProps::new().with("url", "https://tiles.example/{z}/{x}/{y}.png"),
            )
            .unwrap();
        let tiles = adapter.object().unwrap().clone();

        drop(adapter);

        assert_eq!(memory.count(|call| *call == Call::Remove { id: tiles.id() }), 1);
        assert!(!map.map().has_layer(tiles.as_layer()));
    }

    #[test]
    fn unmount_leaves_no_live_subscriptions() {
        let (memory, library) = library();
        let map = live_map(&memory, &library);
        let (on_close, closes) = counter();
        let mut adapter = LifecycleAdapter::<MarkerKind>::new();
        adapter
            .mount(
                &ComponentContext::within(Some(map)),
                marker_props().handler("onClose", on_close),
            )
            .unwrap();
        let marker = adapter.object().unwrap().clone();

        adapter.destroy().unwrap();
        marker.fire("close", EventPayload::Empty).unwrap();

        assert_eq!(closes.get(), 0);
        assert_eq!(memory.listener_count(marker.id()), 0);
        assert!(adapter.handlers().is_empty());
    }

    #[test]
    fn handlers_follow_prop_changes() {
        let (memory, library) = library();
        let ctx = ComponentContext::within(Some(live_map(&memory, &library)));
        let (on_sun_goes_down, downs) = counter();
        let (on_sun_goes_up, ups) = counter();
        let mut adapter = LifecycleAdapter::<MarkerKind>::new();
        adapter
            .mount(&ctx, marker_props().handler("onSunGoesDown", on_sun_goes_down))
            .unwrap();
        let marker = adapter.object().unwrap().clone();

        adapter
            .update(&ctx, marker_props().handler("onSunGoesUp", on_sun_goes_up))
            .unwrap();
        marker.fire("sunGoesDown", EventPayload::Empty).unwrap();
        marker
            .fire("sunGoesUp", EventPayload::Data(json!({ "bubbles": false })))
            .unwrap();

        assert_eq!((downs.get(), ups.get()), (0, 1));
        assert_eq!(adapter.handlers().events().collect::<Vec<_>>(), vec!["sunGoesUp"]);
    }

    #[test]
    fn payload_reaches_handler_unmodified() {
        let (memory, library) = library();
        let ctx = ComponentContext::within(Some(live_map(&memory, &library)));
        let seen = Rc::new(std::cell::RefCell::new(None));
        let sink = seen.clone();
        let mut adapter = LifecycleAdapter::<MarkerKind>::new();
        adapter
            .mount(
                &ctx,
                marker_props().handler(
                    "onSomeRandomEvent",
                    Callback::from(move |event: MapEvent| *sink.borrow_mut() = Some(event)),
                ),
            )
            .unwrap();

        let payload = EventPayload::Data(json!({ "bubbles": true, "type": "random" }));
        adapter
            .object()
            .unwrap()
            .fire("someRandomEvent", payload.clone())
            .unwrap();

        assert_eq!(
            seen.borrow().clone(),
            Some(MapEvent::new("someRandomEvent", payload))
        );
    }

    #[test]
    fn missing_map_fails_before_any_library_call() {
        let (memory, _) = library();
        let mut adapter = LifecycleAdapter::<MarkerKind>::new();

        let err = adapter
            .mount(&ComponentContext::within(None), marker_props())
            .unwrap_err();

        assert_eq!(err, AdapterError::missing("Marker", "map"));
        assert!(err.to_string().contains("map"));
        assert!(memory.calls().is_empty());
        assert_eq!(adapter.state(), AdapterState::Unmounted);
    }

    #[test]
    fn missing_position_and_url_are_named() {
        let (memory, library) = library();
        let ctx = ComponentContext::within(Some(live_map(&memory, &library)));
        memory.clear_calls();

        let err = LifecycleAdapter::<MarkerKind>::new()
            .mount(&ctx, DeclaredProps::new().with("position", json!(null)))
            .unwrap_err();
        assert_eq!(err.missing_field(), Some("position"));

        let err = LifecycleAdapter::<TileLayerKind>::new()
            .mount(&ctx, DeclaredProps::new().with("opacity", 0.4))
            .unwrap_err();
        assert_eq!(err.missing_field(), Some("url"));

        assert_eq!(memory.count(Call::is_constructor), 0);
    }

    #[test]
    fn map_requires_library_and_container() {
        let (memory, library) = library();

        let err = LifecycleAdapter::<MapKind>::new()
            .mount(&ComponentContext::default(), DeclaredProps::new())
            .unwrap_err();
        assert_eq!(err.missing_field(), Some("library"));

        let ctx = ComponentContext {
            library: Some(library),
            ..ComponentContext::default()
        };
        let err = LifecycleAdapter::<MapKind>::new()
            .mount(&ctx, DeclaredProps::new())
            .unwrap_err();
        assert_eq!(err.missing_field(), Some("container"));
        assert!(memory.calls().is_empty());
    }

    #[test]
    fn library_errors_propagate_unchanged() {
        let (memory, library) = library();
        memory.reject("crs");
        let mut adapter = LifecycleAdapter::<MapKind>::new();

        let err = adapter
            .mount(
                &ComponentContext::root(library, Container::Id("map".into())),
                DeclaredProps::new().with("crs", "EPSG:0"),
            )
            .unwrap_err();

        assert!(matches!(err, AdapterError::Library(_)));
        assert_eq!(err.to_string(), "Invalid value for option crs: \"EPSG:0\"");
    }

    #[test]
    fn identical_update_makes_no_library_calls() {
        let (memory, library) = library();
        let ctx = ComponentContext::within(Some(live_map(&memory, &library)));
        let (on_click, _) = counter();
        let props = marker_props().with("opacity", 0.5).handler("onClick", on_click);
        let mut adapter = LifecycleAdapter::<MarkerKind>::new();
        adapter.mount(&ctx, props.clone()).unwrap();
        memory.clear_calls();

        adapter.update(&ctx, props).unwrap();

        assert!(memory.calls().is_empty());
    }

    #[test]
    fn construction_only_option_is_not_reapplied() {
        let (memory, library) = library();
        let ctx = ComponentContext::within(Some(live_map(&memory, &library)));
        let mut adapter = LifecycleAdapter::<MarkerKind>::new();
        adapter.mount(&ctx, marker_props().with("title", "hi")).unwrap();
        memory.clear_calls();

        adapter
            .update(&ctx, marker_props().with("title", "hi there"))
            .unwrap();

        assert!(memory.calls().is_empty());
        assert_eq!(adapter.config().string("title"), Some("hi there"));
    }

    #[test]
    fn only_changed_mutators_fire() {
        let (memory, library) = library();
        let ctx = ComponentContext::within(Some(live_map(&memory, &library)));
        let mut adapter = LifecycleAdapter::<MarkerKind>::new();
        adapter
            .mount(&ctx, marker_props().with("opacity", 0.5).with("zIndexOffset", 100))
            .unwrap();
        let id = MarkerKind::id(adapter.object().unwrap());
        memory.clear_calls();

        adapter
            .update(&ctx, marker_props().with("zIndexOffset", 100))
            .unwrap();

        assert_eq!(memory.calls(), vec![Call::SetOpacity { id, opacity: 1.0 }]);
    }

    #[test]
    fn update_and_destroy_outside_live_are_ignored() {
        let (memory, library) = library();
        let ctx = ComponentContext::within(Some(live_map(&memory, &library)));
        memory.clear_calls();
        let mut adapter = LifecycleAdapter::<MarkerKind>::new();

        adapter.update(&ctx, marker_props()).unwrap();
        adapter.destroy().unwrap();

        assert_eq!(adapter.state(), AdapterState::Unmounted);
        assert!(memory.calls().is_empty());
    }

    #[test]
    fn failed_mutator_keeps_config_in_step_with_the_object() {
        let (memory, library) = library();
        let ctx = ComponentContext::within(Some(live_map(&memory, &library)));
        let (on_click, clicks) = counter();
        let mut adapter = LifecycleAdapter::<MarkerKind>::new();
        adapter
            .mount(&ctx, marker_props().with("opacity", 0.5).with("zIndexOffset", 10))
            .unwrap();
        let id = MarkerKind::id(adapter.object().unwrap());
        memory.fail("setZIndexOffset");
        memory.clear_calls();

        let next = marker_props()
            .with("draggable", true)
            .with("opacity", 0.8)
            .with("zIndexOffset", 20)
            .handler("onClick", on_click);
        let err = adapter.update(&ctx, next.clone()).unwrap_err();

        assert_eq!(err.to_string(), "setZIndexOffset() failed");
        // draggable and opacity reached the object before the failure
        assert_eq!(adapter.config().boolean("draggable"), Some(true));
        assert_eq!(adapter.config().number("opacity"), Some(0.8));
        assert_eq!(adapter.config().number("zIndexOffset"), Some(10.0));
        // handlers were still synced
        assert_eq!(adapter.handlers().events().collect::<Vec<_>>(), vec!["click"]);
        adapter.object().unwrap().fire("click", EventPayload::Empty).unwrap();
        assert_eq!(clicks.get(), 1);

        memory.clear_failures();
        memory.clear_calls();
        adapter.update(&ctx, next).unwrap();
        assert_eq!(memory.calls(), vec![Call::SetZIndexOffset { id, offset: 20.0 }]);
    }

    #[test]
    fn failed_subscribe_on_mount_rolls_back() {
        let (memory, library) = library();
        let map = live_map(&memory, &library);
        let (on_click, _) = counter();
        memory.fail("on");
        let mut adapter = LifecycleAdapter::<MarkerKind>::new();

        let err = adapter
            .mount(
                &ComponentContext::within(Some(map.clone())),
                marker_props().handler("onClick", on_click),
            )
            .unwrap_err();

        assert_eq!(err.to_string(), "on() failed");
        assert_eq!(adapter.state(), AdapterState::Unmounted);
        assert_eq!(memory.count(|call| matches!(call, Call::Remove { .. })), 1);
        assert!(memory.layers_of(map.id()).is_empty());
    }

    #[test]
    fn failed_release_is_reported_once_and_still_terminal() {
        let (memory, library) = library();
        let map = live_map(&memory, &library);
        let (on_click, _) = counter();
        let mut adapter = LifecycleAdapter::<MarkerKind>::new();
        adapter
            .mount(
                &ComponentContext::within(Some(map.clone())),
                marker_props().handler("onClick", on_click),
            )
            .unwrap();
        let marker = adapter.object().unwrap().clone();
        memory.fail("remove");

        let err = adapter.destroy().unwrap_err();

        assert_eq!(err.to_string(), "remove() failed");
        assert_eq!(adapter.state(), AdapterState::Destroyed);
        assert_eq!(memory.listener_count(marker.id()), 0);
        assert!(!map.map().has_layer(marker.as_layer()));
        adapter.destroy().unwrap();
    }
}
