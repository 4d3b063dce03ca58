// ============================================================================
// LEAFLET-YEW - Declarative Yew components over an imperative map library
// ============================================================================
// - maps: the wrapped library (traits, in-memory fake, Leaflet backend)
// - lifecycle: construct / reconfigure / destroy of each external object
// - state: context slot a map hands to its descendants
// - hooks + components: the Yew surface
// ============================================================================

pub mod components;
pub mod config;
pub mod error;
pub mod hooks;
pub mod lifecycle;
pub mod maps;
pub mod models;
pub mod state;

pub use components::{Map, Marker, TileLayer};
pub use config::CONFIG;
pub use error::{AdapterError, AdapterResult, LibraryError, LibraryResult};
pub use lifecycle::{AdapterState, LifecycleAdapter, MapContext, MapKind, MarkerKind, TileLayerKind};
pub use maps::{LibraryRef, MapLibrary, MemoryLibrary};
pub use models::{DeclaredProps, EventPayload, LatLng, MapEvent};

/// Installs the panic hook and the console logger, honouring
/// `ENABLE_LOGGING` and `LOG_LEVEL`. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    use std::sync::Once;

    static INIT: Once = Once::new();

    console_error_panic_hook::set_once();
    INIT.call_once(|| {
        if CONFIG.enable_logging {
            wasm_logger::init(wasm_logger::Config::new(CONFIG.level()));
            log::info!("🗺️ leaflet-yew logging at {}", CONFIG.level());
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {}
