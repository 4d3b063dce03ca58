pub mod map;
pub mod marker;
pub mod tile_layer;

pub use map::{Map, MapProps};
pub use marker::{Marker, MarkerProps};
pub use tile_layer::{TileLayer, TileLayerProps};
