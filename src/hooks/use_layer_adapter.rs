// ============================================================================
// USE LAYER ADAPTER HOOK - Drives a LifecycleAdapter from a Yew component
// ============================================================================

use yew::prelude::*;

use crate::lifecycle::{ComponentContext, LifecycleAdapter, MapContext, ObjectKind};
use crate::maps::ObjectId;
use crate::models::DeclaredProps;

/// Mounts a layer of kind `K` onto the nearest enclosing map and keeps it in
/// step with `options`. Returns the id of the map the layer is attached to.
///
/// Panics if the layer cannot be constructed, the same way a component
/// rendered outside its required provider fails.
#[hook]
pub fn use_layer_adapter<K>(options: &DeclaredProps) -> Option<ObjectId>
where
    K: ObjectKind,
{
    let map = use_context::<MapContext>();
    let adapter = use_mut_ref(LifecycleAdapter::<K>::new);
    let attached = use_state_eq(|| None::<ObjectId>);

    {
        let adapter = adapter.clone();
        let attached = attached.clone();
        use_effect_with((map, options.clone()), move |(map, options)| {
            let ctx = ComponentContext::within(map.clone());
            let mut adapter = adapter.borrow_mut();
            let result = if adapter.is_live() {
                adapter.update(&ctx, options.clone())
            } else {
                adapter.mount(&ctx, options.clone())
            };
            if let Err(error) = result {
                log::error!("❌ {}: {}", K::NAME, error);
                panic!("{}", error);
            }
            attached.set(adapter.attached_to());
            || ()
        });
    }

    {
        let adapter = adapter.clone();
        use_effect_with((), move |_| {
            move || {
                // Already logged by destroy.
                let _ = adapter.borrow_mut().destroy();
            }
        });
    }

    *attached
}
