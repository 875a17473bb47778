//! Versioned snapshots and default fallback.
//!
//! Persisted state is never trusted: every load validates the shape, applies
//! the one explicit migration from the legacy layout, and falls back to
//! defaults on any mismatch. Malformed individual entries are skipped, not
//! fatal.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use fieldserve_calls::{CallRegistry, CallStatus, MediaEntry, MediaKind, MediaStatus, ServiceCall};
use fieldserve_core::CallId;

use crate::kv::{BlobStore, keys};

/// Load a JSON value from a key, falling back to `default` on any absence,
/// parse error or shape mismatch.
pub fn load_json_or<T, F>(store: &impl BlobStore, key: &str, default: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let Some(raw) = store.get(key) else {
        return default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, "persisted state unreadable, using defaults: {e}");
            default()
        }
    }
}

/// Persist a JSON value under a key (failures are logged by the store).
pub fn save_json<T: Serialize>(store: &impl BlobStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => store.put(key, raw),
        Err(e) => tracing::error!(key, "failed to serialize state: {e}"),
    }
}

#[derive(Serialize)]
struct SnapshotEnvelope<'a> {
    version: u32,
    calls: &'a [ServiceCall],
}

/// The call-registry snapshot under [`keys::CALLS`].
pub struct CallsSnapshot;

impl CallsSnapshot {
    pub const VERSION: u32 = 2;

    /// Persist the whole registry.
    pub fn save(store: &impl BlobStore, registry: &CallRegistry) {
        save_json(
            store,
            keys::CALLS,
            &SnapshotEnvelope {
                version: Self::VERSION,
                calls: registry.calls(),
            },
        );
    }

    /// Load the registry, migrating the legacy bare-array layout and falling
    /// back to an empty registry on anything unreadable.
    pub fn load(store: &impl BlobStore, now: DateTime<Utc>) -> CallRegistry {
        let Some(raw) = store.get(keys::CALLS) else {
            return CallRegistry::new();
        };

        let value: JsonValue = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("call snapshot unreadable, starting empty: {e}");
                return CallRegistry::new();
            }
        };

        let calls = match &value {
            JsonValue::Object(envelope)
                if envelope.get("version").and_then(JsonValue::as_u64)
                    == Some(Self::VERSION as u64) =>
            {
                envelope
                    .get("calls")
                    .and_then(JsonValue::as_array)
                    .cloned()
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|entry| match serde_json::from_value::<ServiceCall>(entry) {
                        Ok(call) => Some(call),
                        Err(e) => {
                            tracing::warn!("skipping malformed call entry: {e}");
                            None
                        }
                    })
                    .collect()
            }
            // Legacy layout: a bare array of camelCase records.
            JsonValue::Array(entries) => entries
                .iter()
                .filter_map(|entry| migrate_legacy_call(entry, now))
                .collect(),
            _ => {
                tracing::warn!("call snapshot has an unknown shape, starting empty");
                Vec::new()
            }
        };

        CallRegistry::from_calls(calls)
    }
}

/// Up-convert one legacy record; unusable entries are dropped.
fn migrate_legacy_call(value: &JsonValue, now: DateTime<Utc>) -> Option<ServiceCall> {
    let obj = value.as_object()?;

    let fsa = obj.get("fsa")?.as_str()?.trim().to_string();
    let store_code = obj.get("codigoLoja")?.as_str()?.trim().to_string();
    if fsa.is_empty() || store_code.is_empty() {
        tracing::warn!("skipping legacy call without fsa/store code");
        return None;
    }

    // Legacy ids were free-form strings; anything that is not a uuid gets a
    // fresh one.
    let id = obj
        .get("id")
        .and_then(JsonValue::as_str)
        .and_then(|s| CallId::from_str(s).ok())
        .unwrap_or_default();

    let pdv = obj
        .get("pdv")
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    let status = match obj.get("status").and_then(JsonValue::as_str) {
        Some("completed") => CallStatus::Completed,
        Some("archived") => CallStatus::Archived,
        _ => CallStatus::Open,
    };

    let mut media = BTreeMap::new();
    if let Some(photos) = obj.get("photos").and_then(JsonValue::as_object) {
        for (key, entry) in photos {
            let Ok(kind) = serde_json::from_value::<MediaKind>(JsonValue::String(key.clone()))
            else {
                continue;
            };
            let status = match entry.as_str() {
                Some("uploaded") => MediaStatus::Uploaded,
                _ => MediaStatus::Missing,
            };
            media.insert(kind, MediaEntry { status, payload: None });
        }
    }

    let opened_at = obj
        .get("openedAt")
        .and_then(JsonValue::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now);

    let time_started = obj
        .get("timeStarted")
        .and_then(JsonValue::as_i64)
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single());

    let accumulated_minutes = obj
        .get("timeTotalServiceMinutes")
        .and_then(JsonValue::as_u64)
        .unwrap_or(0);

    Some(ServiceCall::restore(
        id,
        fsa,
        store_code,
        pdv,
        status,
        media,
        opened_at,
        time_started,
        accumulated_minutes,
    ))
}

#[cfg(test)]
mod tests {
    use fieldserve_calls::NewCall;

    use crate::kv::MemoryBlobStore;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap()
    }

    #[test]
    fn missing_key_loads_empty() {
        let store = MemoryBlobStore::new();
        assert!(CallsSnapshot::load(&store, now()).calls().is_empty());
    }

    #[test]
    fn save_load_round_trip() {
        let store = MemoryBlobStore::new();
        let mut registry = CallRegistry::new();
        registry
            .add_call(
                NewCall {
                    id: None,
                    fsa: "FSA-1".into(),
                    store_code: "1250".into(),
                    pdv: Some("312".into()),
                },
                now(),
            )
            .unwrap();

        CallsSnapshot::save(&store, &registry);
        let loaded = CallsSnapshot::load(&store, now());
        assert_eq!(loaded, registry);
    }

    #[test]
    fn corrupt_snapshot_falls_back_to_empty() {
        let store = MemoryBlobStore::new();
        store.put(keys::CALLS, "{not json".into());
        assert!(CallsSnapshot::load(&store, now()).calls().is_empty());

        store.put(keys::CALLS, "42".into());
        assert!(CallsSnapshot::load(&store, now()).calls().is_empty());

        store.put(keys::CALLS, r#"{"version": 99, "calls": []}"#.into());
        assert!(CallsSnapshot::load(&store, now()).calls().is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let store = MemoryBlobStore::new();
        let mut registry = CallRegistry::new();
        registry
            .add_call(
                NewCall {
                    id: None,
                    fsa: "FSA-1".into(),
                    store_code: "1250".into(),
                    pdv: None,
                },
                now(),
            )
            .unwrap();
        let good = serde_json::to_value(&registry.calls()[0]).unwrap();
        let envelope = serde_json::json!({
            "version": CallsSnapshot::VERSION,
            "calls": [good, {"garbage": true}],
        });
        store.put(keys::CALLS, envelope.to_string());

        let loaded = CallsSnapshot::load(&store, now());
        assert_eq!(loaded.calls().len(), 1);
        assert_eq!(loaded.calls()[0].fsa(), "FSA-1");
    }

    #[test]
    fn legacy_array_layout_is_migrated() {
        let store = MemoryBlobStore::new();
        let legacy = serde_json::json!([
            {
                "id": "call-1709999999-ab12",
                "fsa": "FSA-9",
                "codigoLoja": "1250",
                "pdv": "312",
                "status": "open",
                "photos": {"serial": "uploaded", "defect_photo": "missing"},
                "openedAt": "2024-03-08T09:00:00Z",
                "timeStarted": null,
                "timeTotalServiceMinutes": 35
            },
            {"fsa": "", "codigoLoja": "1250"}
        ]);
        store.put(keys::CALLS, legacy.to_string());

        let loaded = CallsSnapshot::load(&store, now());
        assert_eq!(loaded.calls().len(), 1);
        let call = &loaded.calls()[0];
        assert_eq!(call.fsa(), "FSA-9");
        assert_eq!(call.accumulated_minutes(), 35);
        assert_eq!(call.media_status(MediaKind::Serial), MediaStatus::Uploaded);
        // Unlisted kinds are filled in as missing.
        assert_eq!(
            call.media_status(MediaKind::WorkbenchPhoto),
            MediaStatus::Missing
        );
        assert_eq!(call.status(), CallStatus::Open);
    }

    #[test]
    fn load_json_or_uses_default_on_mismatch() {
        let store = MemoryBlobStore::new();
        store.put("k", "\"not a number\"".into());
        let value: u32 = load_json_or(&store, "k", || 7);
        assert_eq!(value, 7);

        save_json(&store, "k", &42u32);
        let value: u32 = load_json_or(&store, "k", || 7);
        assert_eq!(value, 42);
    }
}
