pub mod event;
pub mod latlng;
pub mod options;
pub mod props;

pub use event::{EventPayload, MapEvent};
pub use latlng::LatLng;
pub use options::{
    ConfigurationSnapshot, Reconfiguration, MAP_OPTIONS, MARKER_OPTIONS, TILE_LAYER_OPTIONS,
};
pub use props::{event_name, DeclaredProps, Handler, HandlerSet, PropValue};
