//! Ordered middleware queue with an identity registry.
//!
//! The queue keeps two structures in lockstep: the ordered entries and the
//! set of identities present in them. An identity is in the set iff its unit
//! is in the entries. Every mutation checks its preconditions first and only
//! then touches both structures.

use crate::middleware::SharedMiddleware;
use stagehand_core::{MiddlewareId, MiddlewareTag, PipelineError, PipelineResult, TagMatch};
use std::collections::HashSet;
use std::sync::Arc;

pub(crate) const EMPTY_NAME: &str = "middleware reports an empty name";

pub(crate) struct MiddlewareQueue<Req, Res> {
    entries: Vec<SharedMiddleware<Req, Res>>,
    registered: HashSet<MiddlewareId>,
    tag_match: TagMatch,
}

impl<Req: 'static, Res: 'static> MiddlewareQueue<Req, Res> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            registered: HashSet::new(),
            tag_match: TagMatch::default(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn tag_match(&self) -> TagMatch {
        self.tag_match
    }

    pub(crate) fn set_tag_match(&mut self, mode: TagMatch) {
        self.tag_match = mode;
    }

    pub(crate) fn contains(&self, id: MiddlewareId) -> bool {
        self.registered.contains(&id)
    }

    pub(crate) fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|unit| unit.name()).collect()
    }

    /// First index whose unit matches `tag` under the current mode.
    pub(crate) fn find_tag(&self, tag: MiddlewareTag) -> Option<usize> {
        self.entries
            .iter()
            .position(|unit| self.tag_match.matches(tag, unit.tag(), &unit.lineage()))
    }

    /// First index holding the unit with identity `id`.
    pub(crate) fn find_object(&self, id: MiddlewareId) -> Option<usize> {
        self.entries
            .iter()
            .position(|unit| MiddlewareId::of(unit) == id)
    }

    /// Inserts `unit` at `index`, shifting later entries back by one.
    pub(crate) fn insert(&mut self, index: usize, unit: SharedMiddleware<Req, Res>) -> PipelineResult<()> {
        let id = self.admit(index, &unit)?;
        debug_assert!(index <= self.entries.len());
        self.registered.insert(id);
        self.entries.insert(index, unit);
        Ok(())
    }

    /// Overwrites the entry at `index`, returning the unit it held.
    pub(crate) fn replace(
        &mut self,
        index: usize,
        unit: SharedMiddleware<Req, Res>,
    ) -> PipelineResult<SharedMiddleware<Req, Res>> {
        let id = self.admit(index, &unit)?;
        let previous = std::mem::replace(&mut self.entries[index], unit);
        self.registered.remove(&MiddlewareId::of(&previous));
        self.registered.insert(id);
        Ok(previous)
    }

    /// Shallow copy of the entries: new sequence, shared units.
    pub(crate) fn snapshot(&self) -> Vec<SharedMiddleware<Req, Res>> {
        self.entries.iter().map(Arc::clone).collect()
    }

    /// Checks that `unit` may occupy `index`: it has a name and is not queued yet.
    fn admit(&self, index: usize, unit: &SharedMiddleware<Req, Res>) -> PipelineResult<MiddlewareId> {
        if unit.name().is_empty() {
            return Err(PipelineError::invalid_queue(index, EMPTY_NAME));
        }
        let id = MiddlewareId::of(unit);
        if self.contains(id) {
            return Err(PipelineError::duplicate(unit.name(), id));
        }
        Ok(id)
    }
}
