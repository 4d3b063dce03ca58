pub mod use_layer_adapter;

pub use use_layer_adapter::use_layer_adapter;
