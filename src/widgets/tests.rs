use std::sync::Arc;

use serde_json::{Value, json};

use super::{
    QueryParameters, SearchWidget, WidgetDescriptor, WidgetRegistry, WidgetsState, fold_metadata,
    fold_parameters, fold_transition,
};

struct PlainWidget;

impl SearchWidget for PlainWidget {}

struct ParameterWidget {
    key: &'static str,
    value: &'static str,
}

impl SearchWidget for ParameterWidget {
    fn search_parameters(&self, mut current: QueryParameters) -> QueryParameters {
        current.insert(self.key.to_string(), Value::from(self.value));
        current
    }
}

/// Appends its marker to a `refinements` array so tests can observe both
/// fold order and contribution counts.
struct ChainWidget {
    marker: &'static str,
}

impl SearchWidget for ChainWidget {
    fn search_parameters(&self, mut current: QueryParameters) -> QueryParameters {
        let mut chain = match current.remove("refinements") {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        };
        chain.push(Value::from(self.marker));
        current.insert("refinements".to_string(), Value::Array(chain));
        current
    }
}

struct DescriptorWidget {
    id: &'static str,
}

impl SearchWidget for DescriptorWidget {
    fn descriptor(&self, _widgets_state: &WidgetsState) -> Option<WidgetDescriptor> {
        Some(WidgetDescriptor::with_id(self.id))
    }
}

struct AnonymousDescriptorWidget;

impl SearchWidget for AnonymousDescriptorWidget {
    fn descriptor(&self, widgets_state: &WidgetsState) -> Option<WidgetDescriptor> {
        let mut descriptor = WidgetDescriptor::default();
        descriptor
            .extra
            .insert("namespaces".to_string(), Value::from(widgets_state.len()));
        Some(descriptor)
    }
}

struct TransitionWidget {
    key: &'static str,
    value: i64,
}

impl SearchWidget for TransitionWidget {
    fn transition_state(&self, _next: &WidgetsState, mut current: WidgetsState) -> WidgetsState {
        current.insert(self.key.to_string(), json!(self.value));
        current
    }
}

fn widgets_state() -> WidgetsState {
    WidgetsState::new()
}

#[test]
fn registration_order_is_preserved() {
    let mut registry = WidgetRegistry::new();
    let first: Arc<dyn SearchWidget> = Arc::new(DescriptorWidget { id: "first" });
    let second: Arc<dyn SearchWidget> = Arc::new(DescriptorWidget { id: "second" });
    registry.register(Arc::clone(&first));
    registry.register(Arc::clone(&second));

    let ids: Vec<_> = fold_metadata(registry.widgets(), &widgets_state())
        .into_iter()
        .filter_map(|descriptor| descriptor.id)
        .collect();
    assert_eq!(ids, vec!["first", "second"]);
}

#[test]
fn duplicate_registration_contributes_twice() {
    let mut registry = WidgetRegistry::new();
    let widget: Arc<dyn SearchWidget> = Arc::new(ChainWidget { marker: "w" });
    registry.register(Arc::clone(&widget));
    registry.register(Arc::clone(&widget));
    assert_eq!(registry.len(), 2);

    let parameters = fold_parameters(&QueryParameters::new(), registry.widgets());
    assert_eq!(parameters["refinements"], json!(["w", "w"]));
}

#[test]
fn deregister_removes_first_occurrence_only() {
    let mut registry = WidgetRegistry::new();
    let widget: Arc<dyn SearchWidget> = Arc::new(PlainWidget);
    registry.register(Arc::clone(&widget));
    registry.register(Arc::clone(&widget));

    assert!(registry.deregister(&widget));
    assert_eq!(registry.len(), 1);
    assert!(registry.deregister(&widget));
    assert!(registry.is_empty());
}

#[test]
fn deregistering_an_unknown_widget_is_a_noop() {
    let mut registry = WidgetRegistry::new();
    registry.register(Arc::new(PlainWidget));

    let stranger: Arc<dyn SearchWidget> = Arc::new(PlainWidget);
    assert!(!registry.deregister(&stranger));
    assert_eq!(registry.len(), 1);
}

#[test]
fn parameters_fold_left_to_right_so_later_widgets_win() {
    let mut registry = WidgetRegistry::new();
    registry.register(Arc::new(ParameterWidget {
        key: "query",
        value: "early",
    }));
    registry.register(Arc::new(ParameterWidget {
        key: "query",
        value: "late",
    }));

    let mut base = QueryParameters::new();
    base.insert("hitsPerPage".to_string(), json!(10));
    let parameters = fold_parameters(&base, registry.widgets());

    assert_eq!(parameters["query"], json!("late"));
    assert_eq!(parameters["hitsPerPage"], json!(10));
}

#[test]
fn capability_less_widgets_are_identity_fold_steps() {
    let mut registry = WidgetRegistry::new();
    registry.register(Arc::new(PlainWidget));
    registry.register(Arc::new(ParameterWidget {
        key: "query",
        value: "phone",
    }));
    registry.register(Arc::new(PlainWidget));

    let parameters = fold_parameters(&QueryParameters::new(), registry.widgets());
    assert_eq!(parameters.len(), 1);
    assert_eq!(parameters["query"], json!("phone"));
}

#[test]
fn metadata_skips_widgets_without_the_capability() {
    let mut registry = WidgetRegistry::new();
    registry.register(Arc::new(PlainWidget));
    registry.register(Arc::new(DescriptorWidget { id: "menu" }));

    let metadata = fold_metadata(registry.widgets(), &widgets_state());
    assert_eq!(metadata.len(), 1);
    assert_eq!(metadata[0].id.as_deref(), Some("menu"));
}

#[test]
fn idless_descriptors_are_still_included() {
    let mut registry = WidgetRegistry::new();
    registry.register(Arc::new(AnonymousDescriptorWidget));

    let mut state = widgets_state();
    state.insert("query".to_string(), json!({ "query": "phone" }));
    let metadata = fold_metadata(registry.widgets(), &state);

    assert_eq!(metadata.len(), 1);
    assert_eq!(metadata[0].id, None);
    assert_eq!(metadata[0].extra["namespaces"], json!(1));
}

#[test]
fn transition_with_zero_widgets_is_identity() {
    let registry = WidgetRegistry::new();
    let mut next = widgets_state();
    next.insert("page".to_string(), json!(3));

    assert_eq!(fold_transition(registry.widgets(), &next), next);
}

#[test]
fn transition_composes_hooks_left_to_right() {
    let mut registry = WidgetRegistry::new();
    registry.register(Arc::new(TransitionWidget { key: "a", value: 1 }));
    registry.register(Arc::new(TransitionWidget { key: "b", value: 2 }));

    let merged = fold_transition(registry.widgets(), &widgets_state());
    assert_eq!(merged["a"], json!(1));
    assert_eq!(merged["b"], json!(2));
    assert_eq!(merged.len(), 2);
}

#[test]
fn transition_is_idempotent_given_a_stable_registry() {
    let mut registry = WidgetRegistry::new();
    registry.register(Arc::new(TransitionWidget { key: "a", value: 1 }));

    let first = fold_transition(registry.widgets(), &widgets_state());
    let second = fold_transition(registry.widgets(), &widgets_state());
    assert_eq!(first, second);
}
