use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::models::{Booking, ChangeEvent, ChangeKind};
use crate::state::AppState;

/// The device-local "my bookings" list: the set of bookings this session
/// created, persisted to one file so it survives restarts. Not the source
/// of truth: a mirror kept consistent by write-through on its own actions
/// and by reconciliation against remote delete events.
#[derive(Debug)]
pub struct ClientRegistry {
    path: PathBuf,
    bookings: Vec<Booking>,
}

impl ClientRegistry {
    /// Hydrate from disk. Corrupt or unreadable state is discarded with a
    /// log line; it must never take the application down.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let bookings = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "discarding corrupt registry state");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Self { path, bookings }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn contains(&self, id: i64) -> bool {
        self.bookings.iter().any(|b| b.id == id)
    }

    /// Start tracking a booking this session just created. Write-through:
    /// memory and disk update together.
    pub fn track(&mut self, booking: Booking) {
        self.bookings.push(booking);
        self.persist();
    }

    /// Stop tracking after a local cancel. Returns whether anything was
    /// removed.
    pub fn untrack(&mut self, id: i64) -> bool {
        let before = self.bookings.len();
        self.bookings.retain(|b| b.id != id);
        let removed = self.bookings.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Feed one remote change event through [`reconcile`] and persist the
    /// result if it changed the set. Returns whether it did.
    pub fn apply_event(&mut self, event: &ChangeEvent) -> bool {
        match reconcile(&self.bookings, event) {
            Some(next) => {
                self.bookings = next;
                self.persist();
                true
            }
            None => false,
        }
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.bookings)
            .map_err(anyhow::Error::from)
            .and_then(|json| fs::write(&self.path, json).map_err(anyhow::Error::from));
        if let Err(e) = result {
            // local-state failures are logged, never surfaced
            tracing::error!(error = %e, path = %self.path.display(), "failed to persist registry");
        }
    }
}

/// Pure reconciliation step: `(local set, remote event) -> new local set`.
/// Only a DELETE of a tracked id changes anything; `None` means the event
/// leaves the set untouched. This is how the registry learns of
/// admin-initiated cancellations without any user action.
pub fn reconcile(set: &[Booking], event: &ChangeEvent) -> Option<Vec<Booking>> {
    if event.kind != ChangeKind::Delete {
        return None;
    }
    let id = event.old_id?;
    if !set.iter().any(|b| b.id == id) {
        return None;
    }
    Some(set.iter().filter(|b| b.id != id).cloned().collect())
}

/// Long-lived task watching the global change feed for deletes. Lagged
/// receivers skip ahead; correctness returns with the next event or
/// explicit re-query, matching the feed's best-effort delivery contract.
pub fn spawn_reconciler(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    let mut rx = state.changes_tx.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let removed = state.registry.lock().unwrap().apply_event(&event);
                    if removed {
                        tracing::info!(id = ?event.old_id, "tracked booking removed remotely");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "change feed lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn booking(id: i64) -> Booking {
        Booking {
            id,
            created_at: chrono::Utc::now().naive_utc(),
            date: NaiveDate::parse_from_str("2025-06-15", "%Y-%m-%d").unwrap(),
            time_slot: "10:00".to_string(),
            client_name: "Jeton".to_string(),
            client_phone: "049111222".to_string(),
            service_type: "Qethje flokësh (Barber)".to_string(),
            is_completed: false,
            user_id: None,
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("barberbook-registry-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_reconcile_removes_tracked_booking_on_delete() {
        let set = vec![booking(1), booking(2)];
        let next = reconcile(&set, &ChangeEvent::deleted(1)).unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].id, 2);
    }

    #[test]
    fn test_reconcile_ignores_untracked_delete() {
        let set = vec![booking(1)];
        assert!(reconcile(&set, &ChangeEvent::deleted(42)).is_none());
    }

    #[test]
    fn test_reconcile_ignores_inserts_and_updates() {
        let set = vec![booking(1)];
        assert!(reconcile(&set, &ChangeEvent::inserted(booking(3))).is_none());
        assert!(reconcile(&set, &ChangeEvent::updated(booking(1))).is_none());
    }

    #[test]
    fn test_load_missing_file_starts_empty() {
        let registry = ClientRegistry::load(temp_path("missing-nonexistent"));
        assert!(registry.bookings().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_starts_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json at all").unwrap();
        let registry = ClientRegistry::load(&path);
        assert!(registry.bookings().is_empty());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_track_is_write_through() {
        let path = temp_path("track");
        let _ = fs::remove_file(&path);

        let mut registry = ClientRegistry::load(&path);
        registry.track(booking(7));
        assert!(registry.contains(7));

        // a fresh load sees the persisted entry
        let reloaded = ClientRegistry::load(&path);
        assert_eq!(reloaded.bookings().len(), 1);
        assert_eq!(reloaded.bookings()[0].id, 7);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_untrack_persists_removal() {
        let path = temp_path("untrack");
        let _ = fs::remove_file(&path);

        let mut registry = ClientRegistry::load(&path);
        registry.track(booking(7));
        assert!(registry.untrack(7));
        assert!(!registry.untrack(7));

        let reloaded = ClientRegistry::load(&path);
        assert!(reloaded.bookings().is_empty());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_apply_remote_delete_persists() {
        let path = temp_path("apply-event");
        let _ = fs::remove_file(&path);

        let mut registry = ClientRegistry::load(&path);
        registry.track(booking(5));
        registry.track(booking(6));

        assert!(registry.apply_event(&ChangeEvent::deleted(5)));
        assert!(!registry.apply_event(&ChangeEvent::deleted(5)));

        let reloaded = ClientRegistry::load(&path);
        assert_eq!(reloaded.bookings().len(), 1);
        assert_eq!(reloaded.bookings()[0].id, 6);
        let _ = fs::remove_file(&path);
    }
}
