use std::sync::Arc;

use super::{QueryParameters, SearchWidget, WidgetDescriptor, WidgetsState};

/// Fold every widget's parameter contribution over the base parameters.
///
/// Later-registered widgets receive the accumulator produced by earlier
/// ones, so they override or refine earlier contributions. Widgets without
/// the capability pass the accumulator through unchanged.
pub(crate) fn fold_parameters(
    base: &QueryParameters,
    widgets: &[Arc<dyn SearchWidget>],
) -> QueryParameters {
    widgets
        .iter()
        .fold(base.clone(), |current, widget| {
            widget.search_parameters(current)
        })
}

/// Collect descriptors from every widget that publishes one, preserving
/// registration order. Descriptors without an id are kept with whatever
/// fields they carry.
pub(crate) fn fold_metadata(
    widgets: &[Arc<dyn SearchWidget>],
    widgets_state: &WidgetsState,
) -> Vec<WidgetDescriptor> {
    widgets
        .iter()
        .filter_map(|widget| widget.descriptor(widgets_state))
        .collect()
}

/// Thread a proposed widgets-state value through every transition hook.
///
/// The accumulator starts at the caller-supplied value, so with zero
/// widgets the input comes back unchanged.
pub(crate) fn fold_transition(
    widgets: &[Arc<dyn SearchWidget>],
    next: &WidgetsState,
) -> WidgetsState {
    widgets.iter().fold(next.clone(), |current, widget| {
        widget.transition_state(next, current)
    })
}
