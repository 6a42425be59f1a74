//! Widgets are the registered participants of the shared search cycle.
//!
//! Each widget carries an optional capability set: it may refine the
//! outgoing query parameters, publish a metadata descriptor, and merge its
//! slice of a proposed widgets-state value. Every capability defaults to an
//! identity step, so a widget only overrides the hooks it contributes.

mod fold;
mod registry;
#[cfg(test)]
mod tests;

pub(crate) use fold::{fold_metadata, fold_parameters, fold_transition};
pub use registry::WidgetRegistry;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outgoing query parameters accumulated across widget contributions.
pub type QueryParameters = Map<String, Value>;

/// Per-namespace widget state fragments, read back by widgets and never
/// interpreted by the network layer.
pub type WidgetsState = Map<String, Value>;

/// Descriptor published by a widget for external enumeration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetDescriptor {
    /// Stable identifier surfaced through
    /// [`widget_ids`](crate::SearchCoordinator::widget_ids). A descriptor
    /// without an id is still kept in metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Any additional fields the widget chose to publish.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WidgetDescriptor {
    /// Descriptor carrying only an identifier.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            extra: Map::new(),
        }
    }
}

/// A registered participant contributing to the shared search cycle.
pub trait SearchWidget: Send + Sync {
    /// Descriptor for external enumeration. `None` means the widget does not
    /// contribute metadata.
    fn descriptor(&self, widgets_state: &WidgetsState) -> Option<WidgetDescriptor> {
        let _ = widgets_state;
        None
    }

    /// Refine the outgoing query parameters. Receives the accumulator
    /// produced by the previous widget in registration order.
    fn search_parameters(&self, current: QueryParameters) -> QueryParameters {
        current
    }

    /// Merge this widget's slice of a proposed widgets-state value into the
    /// accumulator.
    fn transition_state(&self, next: &WidgetsState, current: WidgetsState) -> WidgetsState {
        let _ = next;
        current
    }
}
