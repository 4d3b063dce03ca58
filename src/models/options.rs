// ============================================================================
// CONFIGURATION SNAPSHOT - Recognized option view of declared props
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Options `L.Map` accepts at construction.
pub const MAP_OPTIONS: &[&str] = &[
    "attributionControl",
    "bounceAtZoomLimits",
    "boundsOptions",
    "boxZoom",
    "center",
    "closePopupOnClick",
    "crs",
    "doubleClickZoom",
    "dragging",
    "easeLinearity",
    "fadeAnimation",
    "inertia",
    "inertiaDeceleration",
    "inertiaMaxSpeed",
    "keyboard",
    "keyboardPanDelta",
    "layers",
    "markerZoomAnimation",
    "maxBounds",
    "maxBoundsViscosity",
    "maxZoom",
    "minZoom",
    "preferCanvas",
    "renderer",
    "scrollWheelZoom",
    "tap",
    "tapTolerance",
    "touchZoom",
    "trackResize",
    "transform3DLimit",
    "wheelDebounceTime",
    "wheelPxPerZoomLevel",
    "worldCopyJump",
    "zoom",
    "zoomAnimation",
    "zoomAnimationThreshold",
    "zoomControl",
    "zoomDelta",
    "zoomSnap",
];

/// Options `L.Marker` accepts at construction. `position` is positional.
pub const MARKER_OPTIONS: &[&str] = &[
    "alt",
    "attribution",
    "autoPan",
    "autoPanPadding",
    "autoPanSpeed",
    "bubblingMouseEvents",
    "draggable",
    "icon",
    "interactive",
    "keyboard",
    "opacity",
    "pane",
    "riseOffset",
    "riseOnHover",
    "shadowPane",
    "title",
    "zIndexOffset",
];

/// Options `L.TileLayer` accepts at construction. `url` is positional.
pub const TILE_LAYER_OPTIONS: &[&str] = &[
    "attribution",
    "bounds",
    "className",
    "crossOrigin",
    "detectRetina",
    "errorTileUrl",
    "keepBuffer",
    "maxNativeZoom",
    "maxZoom",
    "minNativeZoom",
    "minZoom",
    "noWrap",
    "opacity",
    "pane",
    "referrerPolicy",
    "subdomains",
    "tileSize",
    "tms",
    "updateInterval",
    "updateWhenIdle",
    "updateWhenZooming",
    "zIndex",
    "zoomOffset",
    "zoomReverse",
];

/// Option-name -> value view at one point in time.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ConfigurationSnapshot {
    options: BTreeMap<String, Value>,
}

impl ConfigurationSnapshot {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.options.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Sub-view containing only `names`.
    pub fn restrict(&self, names: &[&str]) -> ConfigurationSnapshot {
        self.options
            .iter()
            .filter(|(name, _)| names.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Names whose value differs between `self` and `next`, including names
    /// present on only one side. Shallow equality per option.
    pub fn changed<'a>(&'a self, next: &'a ConfigurationSnapshot) -> Vec<&'a str> {
        let mut changed: Vec<&str> = self
            .options
            .iter()
            .filter(|(name, value)| next.options.get(*name) != Some(*value))
            .map(|(name, _)| name.as_str())
            .collect();
        changed.extend(
            next.options
                .keys()
                .filter(|name| !self.options.contains_key(*name))
                .map(String::as_str),
        );
        changed.sort_unstable();
        changed
    }

    /// Record the value one option now has on the live object. `None`
    /// forgets the option.
    pub fn assign(&mut self, name: &str, value: Option<Value>) {
        match value {
            Some(value) => {
                self.options.insert(name.to_string(), value);
            }
            None => {
                self.options.remove(name);
            }
        }
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.options.get(name).and_then(Value::as_f64)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.options.get(name).and_then(Value::as_bool)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.options.get(name).and_then(Value::as_str)
    }
}

impl FromIterator<(String, Value)> for ConfigurationSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().collect(),
        }
    }
}

/// Old and new snapshot of one reconfiguration, handed to per-kind mutators.
#[derive(Debug)]
pub struct Reconfiguration<'a> {
    pub previous: &'a ConfigurationSnapshot,
    pub next: &'a ConfigurationSnapshot,
    pub changed: Vec<&'a str>,
}

impl<'a> Reconfiguration<'a> {
    pub fn new(previous: &'a ConfigurationSnapshot, next: &'a ConfigurationSnapshot) -> Self {
        Self {
            previous,
            next,
            changed: previous.changed(next),
        }
    }

    pub fn is_changed(&self, name: &str) -> bool {
        self.changed.contains(&name)
    }
}
