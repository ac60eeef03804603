//! Benchmark profiles for the Muster placement engine.
//!
//! Provides pre-built scenes and agent clusters for benchmarking:
//!
//! - [`open_floor`]: an empty square floor
//! - [`cluttered_floor`]: the same floor with seeded one-cell wall segments
//! - [`spawn_block`]: a deterministic square block of one-cell agents

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use muster_core::{ActorId, Footprint, Occupant, SceneGrid, TokenId};
use muster_party::LiveAgent;
use muster_test_utils::GridScene;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Cell size used by every profile.
pub const CELL: f64 = 100.0;

/// Build an empty `side`×`side` floor.
pub fn open_floor(side: u32) -> GridScene {
    GridScene::new(CELL, side, side)
}

/// Build a `side`×`side` floor with `walls` one-cell wall segments.
///
/// Segments lie on cell edges and never within three cells of the floor's
/// center cell, so a block spawned there can always gather and disperse.
pub fn cluttered_floor(side: u32, walls: usize, seed: u64) -> GridScene {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut scene = open_floor(side);
    let mid = (side / 2) as i32;
    let mut placed = 0;
    while placed < walls {
        let col = rng.random_range(0..side as i32);
        let row = rng.random_range(0..side as i32);
        if (col - mid).abs() <= 3 && (row - mid).abs() <= 3 {
            continue;
        }
        let (x, y) = (f64::from(col) * CELL, f64::from(row) * CELL);
        scene = if rng.random_bool(0.5) {
            scene.with_wall((x, y), (x + CELL, y))
        } else {
            scene.with_wall((x, y), (x, y + CELL))
        };
        placed += 1;
    }
    scene
}

/// Place `n` one-cell agents in a square block centered on the floor.
///
/// Tokens and actors are numbered from 1. Agents are added to the scene's
/// occupant list so they take part in occupancy queries.
pub fn spawn_block(scene: &GridScene, n: usize) -> Vec<LiveAgent> {
    let side = (n as f64).sqrt().ceil() as i32;
    let mid = (scene.bounds().width / CELL / 2.0).floor() as i32;
    let start = mid - side / 2;
    let occupants = scene.shared_occupants();
    let mut guard = occupants.lock().unwrap_or_else(|e| e.into_inner());
    (0..n)
        .map(|i| {
            let i = i as i32;
            let top_left = scene.cell(start + i % side, start + i / side);
            let id = i as u64 + 1;
            guard.push(Occupant {
                token: TokenId(id),
                top_left,
                footprint: Footprint::UNIT,
            });
            LiveAgent::new(TokenId(id), ActorId(id), top_left)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexSet;

    #[test]
    fn block_is_distinct_and_centered() {
        let scene = open_floor(21);
        let agents = spawn_block(&scene, 9);
        let cells: IndexSet<(i32, i32)> = agents
            .iter()
            .map(|a| scene.cell_of(a.top_left))
            .collect();
        assert_eq!(cells.len(), 9);
        assert!(cells.contains(&(10, 10)));
        assert_eq!(scene.all_occupants().len(), 9);
    }

    #[test]
    fn cluttered_floor_is_deterministic() {
        let a = cluttered_floor(31, 40, 7);
        let b = cluttered_floor(31, 40, 7);
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }
}
