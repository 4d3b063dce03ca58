use yew::prelude::*;

use crate::hooks::use_layer_adapter;
use crate::lifecycle::TileLayerKind;
use crate::models::DeclaredProps;

#[derive(Properties, PartialEq)]
pub struct TileLayerProps {
    /// Must declare `url`.
    #[prop_or_default]
    pub options: DeclaredProps,
}

#[function_component(TileLayer)]
pub fn tile_layer(props: &TileLayerProps) -> Html {
    use_layer_adapter::<TileLayerKind>(&props.options);
    Html::default()
}
