//! Shared fixture for the orchestrator scenario tests.

#![allow(dead_code)]

use muster_core::{ActorId, Footprint, Occupant, RosterStore, TokenId};
use muster_party::{Host, LiveAgent, Party, PartyConfig};
use muster_test_utils::{GridScene, MemoryRosterStore, RecordingLifecycle};

pub const CELL: f64 = 100.0;

/// A scene, a lifecycle mirroring into it, and a roster store.
pub struct World {
    pub scene: GridScene,
    pub life: RecordingLifecycle,
    pub store: MemoryRosterStore,
}

impl World {
    pub fn new(scene: GridScene) -> Self {
        let life = RecordingLifecycle::new(scene.shared_occupants());
        Self {
            scene,
            life,
            store: MemoryRosterStore::new(),
        }
    }

    /// An open 11×11 floor.
    pub fn open() -> Self {
        Self::new(GridScene::new(CELL, 11, 11))
    }

    pub fn host(&mut self) -> Host<'_> {
        Host::new(self.scene.view(), &mut self.life, &mut self.store)
    }

    /// Put a one-cell agent on `(col, row)`; token and actor share `id`.
    pub fn spawn(&self, id: u64, col: i32, row: i32) -> LiveAgent {
        let top_left = self.scene.cell(col, row);
        self.scene
            .shared_occupants()
            .lock()
            .expect("occupants")
            .push(Occupant {
                token: TokenId(id),
                top_left,
                footprint: Footprint::UNIT,
            });
        LiveAgent::new(TokenId(id), ActorId(id), top_left)
    }

    /// Cell of the token most recently restored from `original`.
    pub fn restored_cell(&self, original: TokenId) -> Option<(i32, i32)> {
        let token = self.life.restored(original)?;
        self.life.position(token).map(|p| self.scene.cell_of(p))
    }

    /// Cell a token currently stands on.
    pub fn cell_of(&self, token: TokenId) -> Option<(i32, i32)> {
        self.life.position(token).map(|p| self.scene.cell_of(p))
    }

    pub fn is_group(&self, surrogate: TokenId) -> bool {
        self.store.load(surrogate).expect("load").is_some()
    }
}

pub fn party() -> Party {
    Party::new(PartyConfig::default()).expect("default config is valid")
}
