// ============================================================================
// EVENT RECONCILER - Keep subscriptions equal to the declared handler set
// ============================================================================

use crate::error::LibraryResult;
use crate::maps::Evented;
use crate::models::{Handler, HandlerSet};

/// What one [`sync`] did to the target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub subscribed: Vec<String>,
    pub unsubscribed: Vec<String>,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.subscribed.is_empty() && self.unsubscribed.is_empty()
    }
}

/// Move `target` from the `subscribed` handlers to the `new` ones.
///
/// Stale or replaced callbacks are unsubscribed first, then new or replaced
/// callbacks are subscribed. Events whose callback is the same `Rc` on both
/// sides are not touched.
///
/// `subscribed` is updated after every successful call, so when the library
/// fails part way it still lists exactly what `target` holds.
pub fn sync<E: Evented + ?Sized>(
    subscribed: &mut HandlerSet,
    new: &HandlerSet,
    target: &E,
) -> LibraryResult<SyncReport> {
    let mut report = SyncReport::default();

    let stale: Vec<(String, Handler)> = subscribed
        .iter()
        .filter(|(event, handler)| new.get(event) != Some(*handler))
        .map(|(event, handler)| (event.to_string(), handler.clone()))
        .collect();
    for (event, handler) in stale {
        target.off(&event, &handler)?;
        subscribed.remove(&event);
        report.unsubscribed.push(event);
    }

    for (event, handler) in new.iter() {
        if subscribed.get(event) != Some(handler) {
            target.on(event, handler)?;
            subscribed.insert(event, handler.clone());
            report.subscribed.push(event.to_string());
        }
    }

    if !report.is_noop() {
        log::debug!(
            "🔌 handlers synced: +{:?} -{:?}",
            report.subscribed,
            report.unsubscribed
        );
    }
    Ok(report)
}
