// ============================================================================
// MAP COMPONENT - Root of a map tree
// ============================================================================

use yew::prelude::*;

use crate::lifecycle::{MapContext, MapScope};
use crate::maps::{Container, LibraryRef};
use crate::models::DeclaredProps;

/// `library` and `id` are read once, when the map is constructed. Changing
/// them later logs a warning and leaves the live map as it is; remount the
/// component (for example with a new `key`) to rebuild it.
#[derive(Properties, PartialEq)]
pub struct MapProps {
    pub library: LibraryRef,
    #[prop_or_default]
    pub options: DeclaredProps,
    #[prop_or_default]
    pub id: Option<AttrValue>,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub style: Option<AttrValue>,
    #[prop_or_default]
    pub children: Html,
}

/// Renders the map container and, once the map is live, its children with
/// the map available through `use_context::<MapContext>()`.
#[function_component(Map)]
pub fn map(props: &MapProps) -> Html {
    let node = use_node_ref();
    let scope = use_mut_ref(MapScope::new);
    let published = use_state(|| None::<MapContext>);

    // Construct once the container element is in the DOM
    {
        let node = node.clone();
        let scope = scope.clone();
        let published = published.clone();
        let library = props.library.clone();
        let options = props.options.clone();
        let id = props.id.clone();

        use_effect_with((), move |_| {
            let container = match node.cast::<web_sys::Element>() {
                Some(element) => Container::Element(element),
                None => Container::Id(id.map(|id| id.to_string()).unwrap_or_default()),
            };

            scope
                .borrow()
                .context_slot()
                .subscribe(move |map| published.set(map.cloned()));

            if let Err(error) = scope.borrow_mut().mount(library, container, options) {
                log::error!("❌ Map: {}", error);
                panic!("{}", error);
            }

            move || {
                // Already logged by destroy.
                let _ = scope.borrow_mut().unmount();
            }
        });
    }

    {
        let scope = scope.clone();
        use_effect_with(
            (props.library.clone(), props.id.clone()),
            move |(library, id)| {
                let changed = scope.borrow().fixed_prop_changes(library, id.as_deref());
                if !changed.is_empty() {
                    log::warn!("⚠️ Map: {:?} changed after construction and were ignored", changed);
                }
                || ()
            },
        );
    }

    {
        let scope = scope.clone();
        use_effect_with(props.options.clone(), move |options| {
            let mut scope = scope.borrow_mut();
            if scope.is_live() {
                if let Err(error) = scope.update(options.clone()) {
                    log::error!("❌ Map: {}", error);
                    panic!("{}", error);
                }
            }
            || ()
        });
    }

    html! {
        <>
            <div
                ref={node}
                id={props.id.clone()}
                class={props.class.clone()}
                style={props.style.clone()}
            />
            if let Some(map) = (*published).clone() {
                <ContextProvider<MapContext> context={map}>
                    { props.children.clone() }
                </ContextProvider<MapContext>>
            }
        </>
    }
}
