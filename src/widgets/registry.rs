use std::sync::Arc;

use super::SearchWidget;

/// Ordered collection of all widgets contributing to the current cycle.
///
/// Registration order is the canonical iteration order for metadata and
/// parameter folding. Widgets are never deduplicated: the same reference
/// registered twice appears twice and contributes twice.
#[derive(Clone, Default)]
pub struct WidgetRegistry {
    widgets: Vec<Arc<dyn SearchWidget>>,
}

impl WidgetRegistry {
    /// Create a registry without any widgets registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a widget to the registry.
    pub fn register(&mut self, widget: Arc<dyn SearchWidget>) {
        self.widgets.push(widget);
    }

    /// Remove the first registered occurrence of `widget`.
    ///
    /// Deregistering a widget that is not currently registered is a no-op.
    /// Returns `true` when a widget was removed.
    pub fn deregister(&mut self, widget: &Arc<dyn SearchWidget>) -> bool {
        match self
            .widgets
            .iter()
            .position(|registered| Arc::ptr_eq(registered, widget))
        {
            Some(index) => {
                self.widgets.remove(index);
                true
            }
            None => false,
        }
    }

    /// All registered widgets in registration order.
    #[must_use]
    pub fn widgets(&self) -> &[Arc<dyn SearchWidget>] {
        &self.widgets
    }

    /// Number of registered widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns `true` when no widgets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
