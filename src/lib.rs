//! Coordination core for UI widgets sharing a single remote search cycle.
//!
//! A [`SearchCoordinator`] owns the single source of truth for search state,
//! batches widget-driven triggers into at most one dispatch per scheduling
//! tick, and keeps subscribers decoupled from the widgets that caused a
//! request. The remote service stays behind the [`SearchService`] trait so
//! embedders can inject, and hot-swap, any transport.

pub mod client;
pub mod coordinator;
pub mod error;
mod scheduler;
pub mod state;
pub mod widgets;

pub use client::{Completion, FacetValuesRequest, SearchRequest, SearchService};
pub use coordinator::{CoordinatorConfig, SearchCoordinator};
pub use error::SearchError;
pub use state::{SearchState, StateStore, Subscription};
pub use widgets::{QueryParameters, SearchWidget, WidgetDescriptor, WidgetRegistry, WidgetsState};
