//! Boundary to the remote search service.
//!
//! The coordinator never awaits the client: each dispatch hands the client a
//! single-use [`Completion`] token, and the resulting envelope is drained
//! from a channel at the next scheduling tick. Clients may resolve the
//! completion inside the call (callback style) or from another thread later
//! (promise style); both look the same from the coordinator's side.

use std::sync::Arc;
use std::sync::mpsc::Sender;

use serde_json::Value;

use crate::error::SearchError;
use crate::scheduler::RequestKind;
use crate::widgets::QueryParameters;

/// Primary query shipped to the remote service.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchRequest {
    /// Index the query targets.
    pub index: String,
    /// Parameters folded from the base set and every widget contribution.
    pub parameters: QueryParameters,
}

/// Facet-value lookup shipped to the remote service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacetValuesRequest {
    /// Index the lookup targets.
    pub index: String,
    /// Facet whose values are being enumerated.
    pub facet_name: String,
    /// User-supplied refinement query.
    pub query: String,
}

/// Externally owned remote search service.
pub trait SearchService: Send + Sync {
    /// Execute a primary query, settling `completion` exactly once.
    fn search(&self, request: SearchRequest, completion: Completion);

    /// Execute a facet-value lookup.
    ///
    /// The default rejects with [`SearchError::FacetValuesUnsupported`] so
    /// clients without the capability stay usable for primary queries.
    fn search_facet_values(&self, request: FacetValuesRequest, completion: Completion) {
        let _ = request;
        completion.reject(SearchError::FacetValuesUnsupported);
    }

    /// Advertise an integration agent string. No-op by default.
    fn append_agent(&self, agent: &str) {
        let _ = agent;
    }
}

/// Correlation data attached to a dispatch at issue time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DispatchTicket {
    pub(crate) kind: RequestKind,
    pub(crate) generation: u64,
    /// Facet the payload should be recorded under, for facet-value
    /// dispatches.
    pub(crate) facet_name: Option<String>,
}

/// Envelope delivered back to the coordinator on the completion channel.
pub(crate) struct CompletionEnvelope {
    pub(crate) ticket: DispatchTicket,
    pub(crate) outcome: Result<Value, SearchError>,
}

/// Single-use token handed to the client with each dispatch.
///
/// The consuming methods make settle-exactly-once a compile-time guarantee.
/// Dropping a completion without settling leaves the request permanently in
/// flight, the same as a promise that never settles.
pub struct Completion {
    ticket: DispatchTicket,
    tx: Sender<CompletionEnvelope>,
}

impl Completion {
    pub(crate) fn new(ticket: DispatchTicket, tx: Sender<CompletionEnvelope>) -> Self {
        Self { ticket, tx }
    }

    /// Record a successful response payload.
    pub fn resolve(self, payload: Value) {
        let _ = self.tx.send(CompletionEnvelope {
            ticket: self.ticket,
            outcome: Ok(payload),
        });
    }

    /// Record a failed request.
    pub fn reject(self, error: SearchError) {
        let _ = self.tx.send(CompletionEnvelope {
            ticket: self.ticket,
            outcome: Err(error),
        });
    }
}

/// Holder for the active client reference.
///
/// The slot itself is dumb; stale-response suppression after a swap lives in
/// the scheduler's generation ledger.
pub(crate) struct ClientSlot {
    client: Arc<dyn SearchService>,
}

impl ClientSlot {
    pub(crate) fn new(client: Arc<dyn SearchService>) -> Self {
        Self { client }
    }

    pub(crate) fn client(&self) -> &Arc<dyn SearchService> {
        &self.client
    }

    pub(crate) fn replace(&mut self, client: Arc<dyn SearchService>) {
        self.client = client;
    }
}
