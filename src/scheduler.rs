//! Per-kind dispatch scheduling and the generation ledger.
//!
//! Each request kind runs an independent two-state (idle/pending) machine:
//! dirty signals raise the pending flag, and the coordinator's tick flushes
//! at most one dispatch per kind no matter how many signals accumulated.
//! Every dispatch is tagged with a generation token; a completion is only
//! applied while its generation is still the kind's live one, which is how
//! superseded and post-swap responses are discarded.

/// The two independent request kinds the scheduler drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RequestKind {
    Search,
    FacetValues,
}

#[derive(Default)]
struct KindState {
    dirty: bool,
    /// Generation of the only completion currently allowed to land.
    live: Option<u64>,
}

pub(crate) struct Scheduler {
    search: KindState,
    facet_values: KindState,
    /// Facet query armed for the next tick; bursts within a tick collapse
    /// to the most recent one.
    pending_facet_query: Option<(String, String)>,
    next_generation: u64,
    skip_armed: bool,
}

impl Scheduler {
    pub(crate) fn new() -> Self {
        Self {
            search: KindState::default(),
            facet_values: KindState::default(),
            pending_facet_query: None,
            next_generation: 0,
            skip_armed: false,
        }
    }

    fn kind(&self, kind: RequestKind) -> &KindState {
        match kind {
            RequestKind::Search => &self.search,
            RequestKind::FacetValues => &self.facet_values,
        }
    }

    fn kind_mut(&mut self, kind: RequestKind) -> &mut KindState {
        match kind {
            RequestKind::Search => &mut self.search,
            RequestKind::FacetValues => &mut self.facet_values,
        }
    }

    /// Raise the pending flag for `kind`.
    pub(crate) fn mark_dirty(&mut self, kind: RequestKind) {
        self.kind_mut(kind).dirty = true;
    }

    /// Lower and report the pending flag for `kind`.
    pub(crate) fn take_dirty(&mut self, kind: RequestKind) -> bool {
        std::mem::take(&mut self.kind_mut(kind).dirty)
    }

    /// Arm a facet-value lookup, replacing any query armed earlier in the
    /// same tick.
    pub(crate) fn arm_facet_query(&mut self, facet_name: String, query: String) {
        self.pending_facet_query = Some((facet_name, query));
        self.mark_dirty(RequestKind::FacetValues);
    }

    pub(crate) fn take_facet_query(&mut self) -> Option<(String, String)> {
        self.pending_facet_query.take()
    }

    /// Arm the one-shot suppression of the next dispatch.
    pub(crate) fn arm_skip(&mut self) {
        self.skip_armed = true;
    }

    /// Consume the one-shot suppression if armed.
    pub(crate) fn consume_skip(&mut self) -> bool {
        std::mem::take(&mut self.skip_armed)
    }

    /// Allocate a generation token and record it as the kind's only live
    /// dispatch. Any earlier in-flight dispatch of the kind becomes stale.
    pub(crate) fn begin_dispatch(&mut self, kind: RequestKind) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.kind_mut(kind).live = Some(generation);
        generation
    }

    /// Whether a completion for `generation` is still current for its kind.
    pub(crate) fn accepts(&self, kind: RequestKind, generation: u64) -> bool {
        self.kind(kind).live == Some(generation)
    }

    /// Retire the kind's live dispatch after its completion was applied.
    pub(crate) fn settle(&mut self, kind: RequestKind) {
        self.kind_mut(kind).live = None;
    }

    /// Invalidate every in-flight dispatch. Called on client swap so
    /// responses issued against the old client can never land.
    pub(crate) fn invalidate_live(&mut self) {
        self.search.live = None;
        self.facet_values.live = None;
    }
}
