//! Single source of truth for the shared search cycle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SearchError;
use crate::widgets::{WidgetDescriptor, WidgetsState};

/// Immutable snapshot of the shared search cycle.
///
/// Owned exclusively by [`StateStore`]; every transition installs a brand
/// new value, callers never observe in-place mutation. Serializes with
/// camel-cased keys so a hydration snapshot can come straight off a
/// server-rendered payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchState {
    /// Last successful primary response payload, if any.
    pub results: Option<Value>,
    /// Last error surfaced by either request kind. Cleared by the next
    /// successful primary response; a new error leaves stale `results`
    /// visible as the last known good payload.
    pub error: Option<SearchError>,
    /// True from primary dispatch until its response or error is recorded.
    pub searching: bool,
    /// Same contract as `searching` for the facet-value request kind. The
    /// two kinds never block or clear each other's flags.
    pub searching_for_facet_values: bool,
    /// Parameter-namespace key to widget-contributed state fragment.
    pub widgets: WidgetsState,
    /// Descriptors for registered widgets, in registration order at the
    /// time of computation.
    pub metadata: Vec<WidgetDescriptor>,
    /// Facet name to last facet-value response payload.
    pub facet_values: Map<String, Value>,
}

/// Listener invoked synchronously after each state transition.
type StateListener = Box<dyn FnMut(&SearchState) + Send>;

/// Token returned by [`StateStore::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subscription(u64);

/// Holds the current [`SearchState`] and notifies subscribers on change.
pub struct StateStore {
    state: SearchState,
    listeners: Vec<(Subscription, StateListener)>,
    next_subscription: u64,
}

impl StateStore {
    /// Create a store seeded with the provided snapshot.
    pub(crate) fn new(initial: SearchState) -> Self {
        Self {
            state: initial,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current snapshot. The value is replaced wholesale by the next
    /// transition.
    #[must_use]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Register a listener invoked after every subsequent transition.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&SearchState) + Send + 'static,
    ) -> Subscription {
        let token = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((token, Box::new(listener)));
        token
    }

    /// Drop a previously registered listener. Unknown tokens are a no-op.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.listeners.retain(|(token, _)| *token != subscription);
    }

    /// Install `next` as the current snapshot and notify every listener.
    pub(crate) fn transition(&mut self, next: SearchState) {
        self.state = next;
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }
}
