// ============================================================================
// CONTEXT - What a component receives from its surroundings
// ============================================================================

use std::fmt;
use std::rc::Rc;

use crate::error::{AdapterError, AdapterResult};
use crate::maps::{Container, LibraryRef, MapObject, ObjectId};

/// Contextual value a map exposes to its descendants once it is live.
#[derive(Clone)]
pub struct MapContext {
    map: Rc<dyn MapObject>,
    library: LibraryRef,
}

impl MapContext {
    pub fn new(map: Rc<dyn MapObject>, library: LibraryRef) -> Self {
        Self { map, library }
    }

    pub fn map(&self) -> &Rc<dyn MapObject> {
        &self.map
    }

    pub fn library(&self) -> &LibraryRef {
        &self.library
    }

    pub fn id(&self) -> ObjectId {
        self.map.id()
    }
}

impl PartialEq for MapContext {
    fn eq(&self, other: &Self) -> bool {
        self.map.id() == other.map.id() && self.library == other.library
    }
}

impl fmt::Debug for MapContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapContext").field("map", &self.map.id()).finish()
    }
}

/// Required context handed to Construct and Reconfigure.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComponentContext {
    pub library: Option<LibraryRef>,
    pub container: Option<Container>,
    pub map: Option<MapContext>,
}

impl ComponentContext {
    /// Context of a root map mounted into `container`.
    pub fn root(library: LibraryRef, container: Container) -> Self {
        Self {
            library: Some(library),
            container: Some(container),
            map: None,
        }
    }

    /// Context of a layer rendered under a map. `None` when there is no
    /// live map above it.
    pub fn within(map: Option<MapContext>) -> Self {
        Self {
            library: map.as_ref().map(|ctx| ctx.library().clone()),
            container: None,
            map,
        }
    }

    pub fn require_map(&self, component: &'static str) -> AdapterResult<&MapContext> {
        self.map
            .as_ref()
            .ok_or_else(|| AdapterError::missing(component, "map"))
    }

    pub fn require_library(&self, component: &'static str) -> AdapterResult<&LibraryRef> {
        self.library
            .as_ref()
            .ok_or_else(|| AdapterError::missing(component, "library"))
    }

    pub fn require_container(&self, component: &'static str) -> AdapterResult<&Container> {
        self.container
            .as_ref()
            .ok_or_else(|| AdapterError::missing(component, "container"))
    }
}
