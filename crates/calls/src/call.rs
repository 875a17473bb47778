//! A single field-service call: media checklist, timer, status lifecycle.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fieldserve_core::{CallId, DomainError, DomainResult};

/// Evidence the technician must capture during a visit.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Serial,
    DefectPhoto,
    SolutionVideo,
    WorkbenchPhoto,
    ReplacementSerial,
}

impl MediaKind {
    pub const ALL: [MediaKind; 5] = [
        MediaKind::Serial,
        MediaKind::DefectPhoto,
        MediaKind::SolutionVideo,
        MediaKind::WorkbenchPhoto,
        MediaKind::ReplacementSerial,
    ];

    /// Everything but the optional replacement-serial photo.
    pub const MANDATORY: [MediaKind; 4] = [
        MediaKind::Serial,
        MediaKind::DefectPhoto,
        MediaKind::SolutionVideo,
        MediaKind::WorkbenchPhoto,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MediaKind::Serial => "serial",
            MediaKind::DefectPhoto => "defect_photo",
            MediaKind::SolutionVideo => "solution_video",
            MediaKind::WorkbenchPhoto => "workbench_photo",
            MediaKind::ReplacementSerial => "replacement_serial",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    Missing,
    Uploaded,
}

/// Checklist slot: status plus an opaque embedded payload (data URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub status: MediaStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl MediaEntry {
    pub fn missing() -> Self {
        Self {
            status: MediaStatus::Missing,
            payload: None,
        }
    }
}

/// Call lifecycle. Transitions are monotonic: Open -> Completed -> Archived.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Open,
    Completed,
    Archived,
}

impl core::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            CallStatus::Open => "open",
            CallStatus::Completed => "completed",
            CallStatus::Archived => "archived",
        };
        f.write_str(s)
    }
}

/// One tracked service call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCall {
    id: CallId,
    fsa: String,
    store_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pdv: Option<String>,
    status: CallStatus,
    media: BTreeMap<MediaKind, MediaEntry>,
    opened_at: DateTime<Utc>,
    #[serde(default)]
    time_started: Option<DateTime<Utc>>,
    #[serde(default)]
    accumulated_minutes: u64,
}

fn default_media() -> BTreeMap<MediaKind, MediaEntry> {
    MediaKind::ALL
        .iter()
        .map(|k| (*k, MediaEntry::missing()))
        .collect()
}

impl ServiceCall {
    /// Open a fresh call.
    pub fn open(
        id: CallId,
        fsa: impl Into<String>,
        store_code: impl Into<String>,
        pdv: Option<String>,
        opened_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let fsa = fsa.into();
        let store_code = store_code.into();
        if fsa.trim().is_empty() {
            return Err(DomainError::validation("fsa cannot be empty"));
        }
        if store_code.trim().is_empty() {
            return Err(DomainError::validation("store code cannot be empty"));
        }

        Ok(Self {
            id,
            fsa,
            store_code,
            pdv: pdv.filter(|p| !p.trim().is_empty()),
            status: CallStatus::Open,
            media: default_media(),
            opened_at,
            time_started: None,
            accumulated_minutes: 0,
        })
    }

    /// Rebuild a call from persisted parts (snapshot migration support).
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: CallId,
        fsa: String,
        store_code: String,
        pdv: Option<String>,
        status: CallStatus,
        media: BTreeMap<MediaKind, MediaEntry>,
        opened_at: DateTime<Utc>,
        time_started: Option<DateTime<Utc>>,
        accumulated_minutes: u64,
    ) -> Self {
        let mut full_media = default_media();
        full_media.extend(media);
        Self {
            id,
            fsa,
            store_code,
            pdv,
            status,
            media: full_media,
            opened_at,
            time_started,
            accumulated_minutes,
        }
    }

    pub fn id(&self) -> CallId {
        self.id
    }

    pub fn fsa(&self) -> &str {
        &self.fsa
    }

    pub fn store_code(&self) -> &str {
        &self.store_code
    }

    pub fn pdv(&self) -> Option<&str> {
        self.pdv.as_deref()
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn time_started(&self) -> Option<DateTime<Utc>> {
        self.time_started
    }

    pub fn accumulated_minutes(&self) -> u64 {
        self.accumulated_minutes
    }

    pub fn media(&self) -> &BTreeMap<MediaKind, MediaEntry> {
        &self.media
    }

    pub fn media_status(&self, kind: MediaKind) -> MediaStatus {
        self.media
            .get(&kind)
            .map(|e| e.status)
            .unwrap_or(MediaStatus::Missing)
    }

    /// Mandatory kinds still waiting for an upload.
    pub fn missing_mandatory(&self) -> Vec<MediaKind> {
        MediaKind::MANDATORY
            .iter()
            .copied()
            .filter(|k| self.media_status(*k) != MediaStatus::Uploaded)
            .collect()
    }

    pub fn set_media(&mut self, kind: MediaKind, status: MediaStatus, payload: Option<String>) {
        self.media.insert(kind, MediaEntry { status, payload });
    }

    /// Start (or keep) this call's timer.
    ///
    /// Idempotent on a running call: the original start instant is kept.
    pub fn start_timer(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != CallStatus::Open {
            return Err(DomainError::conflict(format!(
                "cannot start timer on a {} call",
                self.status
            )));
        }
        if self.time_started.is_none() {
            self.time_started = Some(now);
        }
        Ok(())
    }

    /// Stop the timer, folding the elapsed whole minutes (rounded, clamped to
    /// zero) into the accumulator. Returns 0 when no timer was running.
    pub fn stop_timer(&mut self, now: DateTime<Utc>) -> u64 {
        let Some(started) = self.time_started.take() else {
            return 0;
        };
        let elapsed_ms = (now - started).num_milliseconds().max(0);
        let minutes = ((elapsed_ms + 30_000) / 60_000) as u64;
        self.accumulated_minutes += minutes;
        minutes
    }

    /// Explicit reset: clears the timer and zeroes the accumulator.
    pub fn reset_timer(&mut self) {
        self.time_started = None;
        self.accumulated_minutes = 0;
    }

    pub(crate) fn clear_running_timer(&mut self) {
        self.time_started = None;
    }

    /// Complete the call: mandatory media must all be uploaded.
    pub fn complete(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != CallStatus::Open {
            return Err(DomainError::conflict(format!(
                "cannot complete a {} call",
                self.status
            )));
        }

        let missing = self.missing_mandatory();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(MediaKind::key).collect();
            return Err(DomainError::validation(format!(
                "missing mandatory media: {}",
                names.join(", ")
            )));
        }

        self.stop_timer(now);
        self.status = CallStatus::Completed;
        Ok(())
    }

    /// Completed -> Archived; anything else is untouched.
    pub(crate) fn archive(&mut self) -> bool {
        if self.status == CallStatus::Completed {
            self.status = CallStatus::Archived;
            self.time_started = None;
            true
        } else {
            false
        }
    }
}
