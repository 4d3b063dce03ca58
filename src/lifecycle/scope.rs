// ============================================================================
// MAP SCOPE - Map adapter plus the context slot its descendants read
// ============================================================================

use crate::error::AdapterResult;
use crate::lifecycle::adapter::LifecycleAdapter;
use crate::lifecycle::context::{ComponentContext, MapContext};
use crate::lifecycle::kinds::MapKind;
use crate::maps::{Container, LibraryRef};
use crate::models::DeclaredProps;
use crate::state::ContextSlot;

/// A map component instance: owns the map adapter and publishes the live map
/// to descendants after Construct, retracting it before Destroy.
pub struct MapScope {
    adapter: LifecycleAdapter<MapKind>,
    slot: ContextSlot<MapContext>,
    /// Library and container id the live map was built with.
    built_with: Option<(LibraryRef, Option<String>)>,
}

impl MapScope {
    pub fn new() -> Self {
        Self {
            adapter: LifecycleAdapter::new(),
            slot: ContextSlot::new(),
            built_with: None,
        }
    }

    /// Slot descendants read their parent map from. Empty until mounted.
    pub fn context_slot(&self) -> ContextSlot<MapContext> {
        self.slot.clone()
    }

    pub fn adapter(&self) -> &LifecycleAdapter<MapKind> {
        &self.adapter
    }

    pub fn is_live(&self) -> bool {
        self.adapter.is_live()
    }

    pub fn mount(
        &mut self,
        library: LibraryRef,
        container: Container,
        props: DeclaredProps,
    ) -> AdapterResult<()> {
        let element_id = match &container {
            Container::Id(id) => Some(id.clone()),
            Container::Element(element) => Some(element.id()).filter(|id| !id.is_empty()),
        };
        let ctx = ComponentContext::root(library.clone(), container);
        self.adapter.mount(&ctx, props)?;
        if let Some(map) = self.adapter.object() {
            self.built_with = Some((library.clone(), element_id));
            self.slot.publish(MapContext::new(map.clone(), library));
        }
        Ok(())
    }

    pub fn update(&mut self, props: DeclaredProps) -> AdapterResult<()> {
        self.adapter.update(&ComponentContext::default(), props)
    }

    /// Names of the props that differ from what the live map was built
    /// with. The map keeps its library and container until it is remounted.
    pub fn fixed_prop_changes(&self, library: &LibraryRef, id: Option<&str>) -> Vec<&'static str> {
        let Some((built_library, built_id)) = &self.built_with else {
            return Vec::new();
        };
        let mut changed = Vec::new();
        if built_library != library {
            changed.push("library");
        }
        if built_id.as_deref() != id {
            changed.push("id");
        }
        changed
    }

    pub fn unmount(&mut self) -> AdapterResult<()> {
        self.slot.retract();
        self.built_with = None;
        self.adapter.destroy()
    }
}

impl Default for MapScope {
    fn default() -> Self {
        Self::new()
    }
}
