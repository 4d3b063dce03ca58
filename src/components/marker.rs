use yew::prelude::*;

use crate::hooks::use_layer_adapter;
use crate::lifecycle::MarkerKind;
use crate::models::DeclaredProps;

#[derive(Properties, PartialEq)]
pub struct MarkerProps {
    /// Must declare `position`. Handlers go in as `onClick`, `onDragend`...
    #[prop_or_default]
    pub options: DeclaredProps,
}

/// A marker on the enclosing [`Map`](super::Map). Renders nothing itself.
#[function_component(Marker)]
pub fn marker(props: &MarkerProps) -> Html {
    use_layer_adapter::<MarkerKind>(&props.options);
    Html::default()
}
