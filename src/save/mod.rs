use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::shared::*;

pub mod backend;

#[cfg(target_arch = "wasm32")]
pub use backend::BrowserStorageBackend;
#[cfg(not(target_arch = "wasm32"))]
pub use backend::FileBackend;
pub use backend::{MemoryBackend, PersistenceBackend, PersistenceError, Table};

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Snapshot the farm for the session user.
#[derive(Event, Debug, Clone, Default)]
pub struct SaveGameRequestEvent;

/// Restore the session user's farm snapshot.
#[derive(Event, Debug, Clone, Default)]
pub struct LoadGameRequestEvent;

/// Sent by SavePlugin after a save attempt (success or failure).
#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub success: bool,
}

/// Sent by SavePlugin after a load attempt.
#[derive(Event, Debug, Clone)]
pub struct LoadCompleteEvent {
    pub success: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// ADAPTER
// ═══════════════════════════════════════════════════════════════════════

/// The injected storage backend plus the boundary that turns its failures
/// into `bool` / `Option`. Nothing here ever panics or propagates an error.
///
/// Insert your own before adding `SavePlugin` to choose the backend.
#[derive(Resource)]
pub struct Persistence {
    backend: Box<dyn PersistenceBackend>,
}

impl Default for Persistence {
    fn default() -> Self {
        Self::new(MemoryBackend::new())
    }
}

impl Persistence {
    pub fn new(backend: impl PersistenceBackend) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn save_user_progress(&mut self, user: &User) -> bool {
        match self.backend.put_user(user) {
            Ok(()) => true,
            Err(e) => {
                error!("[Save] Error saving user progress for '{}': {}", user.id, e);
                false
            }
        }
    }

    pub fn load_user_progress(&self, user_id: &str) -> Option<User> {
        self.backend.get_user(user_id).unwrap_or_else(|e| {
            error!("[Save] Error loading user progress for '{}': {}", user_id, e);
            None
        })
    }

    pub fn save_game_state<T: Serialize>(&mut self, user_id: &str, state: &T) -> bool {
        let result = serde_json::to_value(state)
            .map_err(PersistenceError::from)
            .and_then(|doc| self.backend.put(Table::GameStates, user_id, &doc));
        match result {
            Ok(()) => true,
            Err(e) => {
                error!("[Save] Error saving game state for '{}': {}", user_id, e);
                false
            }
        }
    }

    pub fn load_game_state<T: DeserializeOwned>(&self, user_id: &str) -> Option<T> {
        let result = self
            .backend
            .get(Table::GameStates, user_id)
            .and_then(|doc| doc.map(serde_json::from_value).transpose().map_err(Into::into));
        result.unwrap_or_else(|e| {
            error!("[Save] Error loading game state for '{}': {}", user_id, e);
            None
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Persistence>()
            .add_event::<SaveGameRequestEvent>()
            .add_event::<LoadGameRequestEvent>()
            .add_event::<SaveCompleteEvent>()
            .add_event::<LoadCompleteEvent>()
            .add_systems(
                Update,
                (
                    handle_user_save,
                    handle_user_load,
                    handle_save_request,
                    handle_load_request,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Copies the live ledger into the session user, then writes the record.
pub fn handle_user_save(
    mut requests: EventReader<SaveUserProgressEvent>,
    mut session: ResMut<Session>,
    ledger: Res<ResourceLedger>,
    mut persistence: ResMut<Persistence>,
    mut saved: EventWriter<UserProgressSavedEvent>,
) {
    // Several requests in one frame collapse into one write.
    if requests.read().count() == 0 {
        return;
    }
    let success = match session.user.as_mut() {
        Some(user) => {
            user.resources = ledger.clone();
            persistence.save_user_progress(user)
        }
        None => false,
    };
    saved.send(UserProgressSavedEvent { success });
}

pub fn handle_user_load(
    mut requests: EventReader<LoadUserProgressEvent>,
    mut session: ResMut<Session>,
    persistence: Res<Persistence>,
    mut loaded: EventWriter<UserProgressLoadedEvent>,
) {
    for ev in requests.read() {
        let found = match persistence.load_user_progress(&ev.user_id) {
            Some(user) => {
                info!("[Save] Loaded user '{}'", user.id);
                session.user = Some(user);
                true
            }
            None => false,
        };
        loaded.send(UserProgressLoadedEvent {
            user_id: ev.user_id.clone(),
            found,
        });
    }
}

pub fn handle_save_request(
    mut requests: EventReader<SaveGameRequestEvent>,
    session: Res<Session>,
    grid: Res<FarmGrid>,
    ledger: Res<ResourceLedger>,
    mut persistence: ResMut<Persistence>,
    mut complete: EventWriter<SaveCompleteEvent>,
) {
    for _ in requests.read() {
        let Some(user_id) = session.user_id() else {
            warn!("[Save] Save requested with nobody logged in");
            complete.send(SaveCompleteEvent { success: false });
            continue;
        };
        let snapshot = FarmSnapshot {
            grid: grid.clone(),
            ledger: ledger.clone(),
        };
        let success = persistence.save_game_state(user_id, &snapshot);
        if success {
            info!("[Save] Farm saved for '{}'", user_id);
        }
        complete.send(SaveCompleteEvent { success });
    }
}

/// Restores the snapshot when it exists, is well formed, and matches the live
/// grid's dimensions. A failed load leaves the current farm in place.
pub fn handle_load_request(
    mut requests: EventReader<LoadGameRequestEvent>,
    session: Res<Session>,
    mut grid: ResMut<FarmGrid>,
    mut ledger: ResMut<ResourceLedger>,
    persistence: Res<Persistence>,
    mut complete: EventWriter<LoadCompleteEvent>,
    mut changed: EventWriter<FarmChangedEvent>,
    mut ledger_changed: EventWriter<LedgerChangedEvent>,
) {
    for _ in requests.read() {
        let snapshot = session
            .user_id()
            .and_then(|id| persistence.load_game_state::<FarmSnapshot>(id))
            .filter(|s| s.grid.is_consistent() && s.grid.same_shape(&grid));
        let Some(snapshot) = snapshot else {
            warn!("[Save] No usable farm snapshot to load");
            complete.send(LoadCompleteEvent { success: false });
            continue;
        };

        *grid = snapshot.grid;
        *ledger = snapshot.ledger;
        for ((row, col), cell) in grid.iter() {
            changed.send(FarmChangedEvent {
                row,
                col,
                cell: *cell,
            });
        }
        ledger_changed.send(LedgerChangedEvent {
            money: ledger.money,
            reason: "Loaded farm".to_string(),
        });
        info!("[Save] Farm restored ({} planted)", grid.occupied().count());
        complete.send(LoadCompleteEvent { success: true });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            username: "Jane".to_string(),
            email: String::new(),
            avatar: None,
            farm_level: 1,
            experience: 40,
            achievements: vec!["first_harvest".to_string()],
            resources: ResourceLedger::new(100, HashMap::from([(CropType::Wheat, 5)])),
            last_login: 1_700_000_000,
        }
    }

    #[test]
    fn test_user_round_trip() {
        let mut p = Persistence::default();
        assert!(p.save_user_progress(&user("jane")));
        assert_eq!(p.load_user_progress("jane"), Some(user("jane")));
        assert_eq!(p.load_user_progress("nobody"), None);
    }

    #[test]
    fn test_failures_become_sentinels() {
        let mut p = Persistence::default();
        assert!(!p.save_user_progress(&user("")));
        assert!(!p.save_game_state("bad id", &1u32));
        assert_eq!(p.load_game_state::<u32>("bad id"), None);
    }

    #[test]
    fn test_game_state_round_trip() {
        let mut p = Persistence::default();
        let mut grid = FarmGrid::new(2, 3);
        *grid.get_mut(1, 1).unwrap() = Some(CropInstance::planted(CropType::Tomato));
        let snapshot = FarmSnapshot {
            grid,
            ledger: ResourceLedger::new(7, HashMap::new()),
        };
        assert!(p.save_game_state("jane", &snapshot));
        assert_eq!(p.load_game_state::<FarmSnapshot>("jane"), Some(snapshot));
    }

    #[test]
    fn test_overflowing_grid_blob_is_caught() {
        let mut p = Persistence::default();
        let blob = serde_json::json!({
            "grid": { "rows": usize::MAX, "cols": 2, "cells": [] },
            "ledger": { "money": 0, "seeds": {} },
        });
        assert!(p.save_game_state("jane", &blob));
        let snapshot = p.load_game_state::<FarmSnapshot>("jane").unwrap();
        assert!(!snapshot.grid.is_consistent());
    }

    #[test]
    fn test_wrong_shape_state_loads_as_none() {
        let mut p = Persistence::default();
        assert!(p.save_game_state("jane", &"not a farm"));
        assert_eq!(p.load_game_state::<FarmSnapshot>("jane"), None);
    }
}
