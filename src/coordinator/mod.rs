//! The coordinator ties the registry, store, scheduler and client slot into
//! one context object. Construct one per search experience and thread it
//! through the rendering layer; there is no process-wide instance.


use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use serde_json::Value;
use tracing::{debug, trace};

use crate::client::{
    ClientSlot, Completion, CompletionEnvelope, DispatchTicket, FacetValuesRequest, SearchRequest,
    SearchService,
};
use crate::scheduler::{RequestKind, Scheduler};
use crate::state::{SearchState, StateStore, Subscription};
use crate::widgets::{
    QueryParameters, SearchWidget, WidgetRegistry, WidgetsState, fold_metadata, fold_parameters,
    fold_transition,
};

/// Agent string advertised to clients exposing an agent hook.
const AGENT: &str = concat!("querysync (", env!("CARGO_PKG_VERSION"), ")");

/// Construction contract for [`SearchCoordinator`].
pub struct CoordinatorConfig {
    index_name: String,
    client: Arc<dyn SearchService>,
    initial_state: WidgetsState,
    search_parameters: QueryParameters,
    results_state: Option<Value>,
}

impl CoordinatorConfig {
    /// Required inputs: the default query target and the remote client.
    #[must_use]
    pub fn new(index_name: impl Into<String>, client: Arc<dyn SearchService>) -> Self {
        Self {
            index_name: index_name.into(),
            client,
            initial_state: WidgetsState::new(),
            search_parameters: QueryParameters::new(),
            results_state: None,
        }
    }

    /// Seed per-widget state fragments before the first tick.
    #[must_use]
    pub fn initial_state(mut self, initial_state: WidgetsState) -> Self {
        self.initial_state = initial_state;
        self
    }

    /// Base parameters merged under all widget contributions.
    #[must_use]
    pub fn search_parameters(mut self, parameters: QueryParameters) -> Self {
        self.search_parameters = parameters;
        self
    }

    /// Pre-hydrate `results` without an initial network round-trip.
    #[must_use]
    pub fn results_state(mut self, results: Value) -> Self {
        self.results_state = Some(results);
        self
    }
}

/// Orchestrates a dynamic set of widgets around one shared search cycle.
///
/// Widget registrations, deregistrations, external state updates and client
/// swaps only raise dirty flags; [`tick`](Self::tick) flushes them into at
/// most one dispatch per request kind and applies any completions queued by
/// the client since the previous tick.
pub struct SearchCoordinator {
    registry: WidgetRegistry,
    store: StateStore,
    scheduler: Scheduler,
    client: ClientSlot,
    index_name: String,
    base_parameters: QueryParameters,
    completion_tx: Sender<CompletionEnvelope>,
    completion_rx: Receiver<CompletionEnvelope>,
}

impl SearchCoordinator {
    /// Build a coordinator from its construction contract.
    #[must_use]
    pub fn new(config: CoordinatorConfig) -> Self {
        let CoordinatorConfig {
            index_name,
            client,
            initial_state,
            search_parameters,
            results_state,
        } = config;
        client.append_agent(AGENT);
        let (completion_tx, completion_rx) = mpsc::channel();
        let store = StateStore::new(SearchState {
            results: results_state,
            widgets: initial_state,
            ..SearchState::default()
        });
        Self {
            registry: WidgetRegistry::new(),
            store,
            scheduler: Scheduler::new(),
            client: ClientSlot::new(client),
            index_name,
            base_parameters: search_parameters,
            completion_tx,
            completion_rx,
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> &SearchState {
        self.store.state()
    }

    /// Register a listener invoked after every state transition.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&SearchState) + Send + 'static,
    ) -> Subscription {
        self.store.subscribe(listener)
    }

    /// Drop a previously registered listener.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.store.unsubscribe(subscription);
    }

    /// Register a widget. Its contributions take effect on the next tick.
    pub fn register_widget(&mut self, widget: Arc<dyn SearchWidget>) {
        self.registry.register(widget);
        self.scheduler.mark_dirty(RequestKind::Search);
    }

    /// Deregister the first registered occurrence of `widget`.
    ///
    /// Deregistering a widget that is not registered is a no-op and raises
    /// no dirty flag.
    pub fn deregister_widget(&mut self, widget: &Arc<dyn SearchWidget>) {
        if self.registry.deregister(widget) {
            self.scheduler.mark_dirty(RequestKind::Search);
        }
    }

    /// All registered widgets in registration order.
    #[must_use]
    pub fn widgets(&self) -> &[Arc<dyn SearchWidget>] {
        self.registry.widgets()
    }

    /// Identifiers published through current metadata. Order tracks
    /// registration order; consumers may sort.
    #[must_use]
    pub fn widget_ids(&self) -> Vec<String> {
        self.store
            .state()
            .metadata
            .iter()
            .filter_map(|descriptor| descriptor.id.clone())
            .collect()
    }

    /// Thread a proposed widgets-state value through every registered
    /// transition hook, left to right. With zero widgets the input is
    /// returned unchanged.
    #[must_use]
    pub fn transition_state(&self, next: WidgetsState) -> WidgetsState {
        fold_transition(self.registry.widgets(), &next)
    }

    /// Install a new widgets-state mapping, refresh metadata against it and
    /// schedule a dispatch for the next tick.
    pub fn update_widgets_state(&mut self, next: WidgetsState) {
        let metadata = fold_metadata(self.registry.widgets(), &next);
        let mut state = self.store.state().clone();
        state.widgets = next;
        state.metadata = metadata;
        self.store.transition(state);
        self.scheduler.mark_dirty(RequestKind::Search);
    }

    /// Arm a facet-value lookup for the next tick. Bursts within a tick
    /// collapse to the last query.
    pub fn search_for_facet_values(
        &mut self,
        facet_name: impl Into<String>,
        query: impl Into<String>,
    ) {
        self.scheduler.arm_facet_query(facet_name.into(), query.into());
    }

    /// Swap the remote client used for all future dispatches.
    ///
    /// Completions still in flight against the old client are invalidated
    /// and silently discarded. The swap itself counts as a dirty signal, so
    /// one dispatch fires against the new client on the next tick even
    /// without further widget mutation.
    pub fn update_client(&mut self, client: Arc<dyn SearchService>) {
        client.append_agent(AGENT);
        self.client.replace(client);
        self.scheduler.invalidate_live();
        self.scheduler.mark_dirty(RequestKind::Search);
        debug!("search client swapped");
    }

    /// Swallow the next scheduled dispatch, then restore normal triggering.
    pub fn skip_search(&mut self) {
        self.scheduler.arm_skip();
    }

    /// Advance one scheduling tick: apply completions queued since the last
    /// tick, then flush at most one dispatch per request kind.
    pub fn tick(&mut self) {
        self.drain_completions();
        self.flush_search();
        self.flush_facet_values();
    }

    fn drain_completions(&mut self) {
        loop {
            match self.completion_rx.try_recv() {
                Ok(envelope) => self.apply_completion(envelope),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn apply_completion(&mut self, envelope: CompletionEnvelope) {
        let DispatchTicket {
            kind,
            generation,
            facet_name,
        } = envelope.ticket;
        if !self.scheduler.accepts(kind, generation) {
            debug!(?kind, generation, "discarding stale completion");
            return;
        }
        self.scheduler.settle(kind);

        let mut state = self.store.state().clone();
        match (kind, envelope.outcome) {
            (RequestKind::Search, Ok(payload)) => {
                state.results = Some(payload);
                state.error = None;
                state.searching = false;
            }
            (RequestKind::Search, Err(error)) => {
                state.error = Some(error);
                state.searching = false;
            }
            (RequestKind::FacetValues, Ok(payload)) => {
                if let Some(facet_name) = facet_name {
                    state.facet_values.insert(facet_name, payload);
                }
                state.searching_for_facet_values = false;
            }
            (RequestKind::FacetValues, Err(error)) => {
                state.error = Some(error);
                state.searching_for_facet_values = false;
            }
        }
        self.store.transition(state);
    }

    fn flush_search(&mut self) {
        if !self.scheduler.take_dirty(RequestKind::Search) {
            return;
        }
        let metadata = fold_metadata(self.registry.widgets(), &self.store.state().widgets);
        if self.scheduler.consume_skip() {
            trace!("skip armed, swallowing search dispatch");
            let mut state = self.store.state().clone();
            state.metadata = metadata;
            self.store.transition(state);
            return;
        }

        let parameters = fold_parameters(&self.base_parameters, self.registry.widgets());
        let generation = self.scheduler.begin_dispatch(RequestKind::Search);
        let mut state = self.store.state().clone();
        state.metadata = metadata;
        state.searching = true;
        self.store.transition(state);

        let completion = Completion::new(
            DispatchTicket {
                kind: RequestKind::Search,
                generation,
                facet_name: None,
            },
            self.completion_tx.clone(),
        );
        debug!(generation, "dispatching search");
        self.client.client().search(
            SearchRequest {
                index: self.index_name.clone(),
                parameters,
            },
            completion,
        );
    }

    fn flush_facet_values(&mut self) {
        if !self.scheduler.take_dirty(RequestKind::FacetValues) {
            return;
        }
        let Some((facet_name, query)) = self.scheduler.take_facet_query() else {
            return;
        };
        if self.scheduler.consume_skip() {
            trace!("skip armed, swallowing facet-value dispatch");
            return;
        }

        let generation = self.scheduler.begin_dispatch(RequestKind::FacetValues);
        let mut state = self.store.state().clone();
        state.searching_for_facet_values = true;
        self.store.transition(state);

        let completion = Completion::new(
            DispatchTicket {
                kind: RequestKind::FacetValues,
                generation,
                facet_name: Some(facet_name.clone()),
            },
            self.completion_tx.clone(),
        );
        debug!(generation, facet = %facet_name, "dispatching facet-value lookup");
        self.client.client().search_facet_values(
            FacetValuesRequest {
                index: self.index_name.clone(),
                facet_name,
                query,
            },
            completion,
        );
    }
}
