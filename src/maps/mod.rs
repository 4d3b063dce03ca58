// Wrapped mapping library: the traits every backend implements, plus the
// backends themselves

pub mod memory;
pub mod traits;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use memory::{Call, MemoryLibrary};
pub use traits::{
    Container, Evented, LayerObject, LibraryRef, MapLibrary, MapObject, MarkerObject, ObjectId,
    TileLayerObject,
};

#[cfg(target_arch = "wasm32")]
pub use web::Leaflet;
