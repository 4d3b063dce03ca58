// ============================================================================
// LIFECYCLE MODULE - Keeping external map objects in step with components
// ============================================================================

pub mod adapter;
pub mod attachment;
pub mod context;
pub mod kinds;
pub mod reconciler;
pub mod scope;

pub use adapter::{AdapterState, Applied, LifecycleAdapter, ObjectKind};
pub use attachment::Attachment;
pub use context::{ComponentContext, MapContext};
pub use kinds::{MapKind, MarkerKind, TileLayerKind};
pub use reconciler::{sync, SyncReport};
pub use scope::MapScope;
