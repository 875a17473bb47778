//! The call registry: keyed collection of service calls plus the
//! cross-call invariants (single active timer, bulk archiving, grouping).

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use fieldserve_core::{CallId, DomainError, DomainResult};

use crate::call::{CallStatus, MediaKind, MediaStatus, ServiceCall};

/// Payload for registering a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCall {
    #[serde(default)]
    pub id: Option<CallId>,
    pub fsa: String,
    pub store_code: String,
    #[serde(default)]
    pub pdv: Option<String>,
}

/// Calls of one store within a day bucket, sorted by FSA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreBucket {
    pub store_code: String,
    pub calls: Vec<ServiceCall>,
}

/// All calls of one calendar day, stores ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub stores: Vec<StoreBucket>,
}

/// Explicit store object for tracked calls.
///
/// Single-writer by construction; persistence is the caller's concern and
/// happens as a whole snapshot after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRegistry {
    calls: Vec<ServiceCall>,
}

impl CallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from a persisted snapshot.
    pub fn from_calls(calls: Vec<ServiceCall>) -> Self {
        Self { calls }
    }

    pub fn calls(&self) -> &[ServiceCall] {
        &self.calls
    }

    pub fn call(&self, id: CallId) -> Option<&ServiceCall> {
        self.calls.iter().find(|c| c.id() == id)
    }

    fn call_mut(&mut self, id: CallId) -> DomainResult<&mut ServiceCall> {
        self.calls
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or(DomainError::NotFound)
    }

    /// Everything not yet archived.
    pub fn active_calls(&self) -> Vec<&ServiceCall> {
        self.calls
            .iter()
            .filter(|c| c.status() != CallStatus::Archived)
            .collect()
    }

    /// Register a call; a fresh id is assigned when none is supplied.
    pub fn add_call(&mut self, new: NewCall, now: DateTime<Utc>) -> DomainResult<CallId> {
        let id = new.id.unwrap_or_default();
        if self.call(id).is_some() {
            return Err(DomainError::conflict(format!("call '{id}' already exists")));
        }

        let call = ServiceCall::open(id, new.fsa, new.store_code, new.pdv, now)?;
        self.calls.insert(0, call);
        Ok(id)
    }

    /// Explicit hard delete.
    pub fn remove_call(&mut self, id: CallId) -> DomainResult<ServiceCall> {
        let index = self
            .calls
            .iter()
            .position(|c| c.id() == id)
            .ok_or(DomainError::NotFound)?;
        Ok(self.calls.remove(index))
    }

    pub fn update_media(
        &mut self,
        id: CallId,
        kind: MediaKind,
        status: MediaStatus,
        payload: Option<String>,
    ) -> DomainResult<()> {
        self.call_mut(id)?.set_media(kind, status, payload);
        Ok(())
    }

    /// Start the timer on `id`, clearing any other running timer first.
    ///
    /// Exactly one call may be timing at any moment, system-wide.
    pub fn start_timer(&mut self, id: CallId, now: DateTime<Utc>) -> DomainResult<()> {
        if self.call(id).is_none() {
            return Err(DomainError::NotFound);
        }
        for call in self.calls.iter_mut().filter(|c| c.id() != id) {
            call.clear_running_timer();
        }
        self.call_mut(id)?.start_timer(now)
    }

    /// Stop the timer on `id`; returns the minutes folded in (0 when idle).
    pub fn stop_timer(&mut self, id: CallId, now: DateTime<Utc>) -> DomainResult<u64> {
        Ok(self.call_mut(id)?.stop_timer(now))
    }

    pub fn reset_timer(&mut self, id: CallId) -> DomainResult<()> {
        self.call_mut(id)?.reset_timer();
        Ok(())
    }

    pub fn complete_call(&mut self, id: CallId, now: DateTime<Utc>) -> DomainResult<()> {
        self.call_mut(id)?.complete(now)
    }

    /// Bulk-archive every completed call; returns how many moved.
    pub fn archive_completed(&mut self) -> usize {
        let mut moved = 0;
        for c in self.calls.iter_mut() {
            if c.archive() {
                moved += 1;
            }
        }
        moved
    }

    /// History view: day buckets (most recent first), stores ascending,
    /// calls within a store ordered by FSA.
    ///
    /// A running call buckets under its timer start; everything else under
    /// the day it was opened.
    pub fn grouped(&self) -> Vec<DayBucket> {
        let mut buckets: BTreeMap<NaiveDate, BTreeMap<String, Vec<ServiceCall>>> = BTreeMap::new();
        for call in &self.calls {
            let date = call
                .time_started()
                .unwrap_or_else(|| call.opened_at())
                .date_naive();
            buckets
                .entry(date)
                .or_default()
                .entry(call.store_code().to_string())
                .or_default()
                .push(call.clone());
        }

        buckets
            .into_iter()
            .rev()
            .map(|(date, stores)| DayBucket {
                date,
                stores: stores
                    .into_iter()
                    .map(|(store_code, mut calls)| {
                        calls.sort_by(|a, b| a.fsa().cmp(b.fsa()));
                        StoreBucket { store_code, calls }
                    })
                    .collect(),
            })
            .collect()
    }
}
