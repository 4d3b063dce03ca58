use std::rc::Rc;

use crate::error::LibraryResult;
use crate::maps::{LayerObject, MapObject, ObjectId};

/// Registration of a child layer on its parent map.
pub struct Attachment {
    parent: Rc<dyn MapObject>,
}

impl Attachment {
    pub fn attach(parent: Rc<dyn MapObject>, child: &dyn LayerObject) -> LibraryResult<Self> {
        parent.add_layer(child)?;
        log::debug!("📎 layer {} attached to map {}", child.id(), parent.id());
        Ok(Self { parent })
    }

    pub fn parent_id(&self) -> ObjectId {
        self.parent.id()
    }

    /// Never fails: a relation the parent already dropped (or a parent that
    /// is itself being destroyed) makes this a no-op.
    pub fn detach(self, child: &dyn LayerObject) {
        if self.parent.has_layer(child) {
            self.parent.remove_layer(child);
            log::debug!("📎 layer {} detached from map {}", child.id(), self.parent.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::{Call, Container, MapLibrary, MemoryLibrary};
    use crate::models::{ConfigurationSnapshot, LatLng};

    #[test]
    fn detach_after_parent_removal_is_a_noop() {
        let library = MemoryLibrary::new();
        let map = library
            .create_map(&Container::Id("map".into()), &ConfigurationSnapshot::default())
            .unwrap();
        let marker = library
            .create_marker(LatLng::new(1.0, 1.0), &ConfigurationSnapshot::default())
            .unwrap();
        let attachment = Attachment::attach(map.clone(), marker.as_layer()).unwrap();
        assert!(map.has_layer(marker.as_layer()));

        map.remove().unwrap();
        library.clear_calls();
        attachment.detach(marker.as_layer());

        assert_eq!(library.count(|call| matches!(call, Call::RemoveLayer { .. })), 0);
    }
}
