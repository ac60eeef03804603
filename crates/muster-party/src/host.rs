//! The collaborators a group operation runs against.

use muster_core::{
    ActorId, AgentDescriptor, AgentLifecycle, AgentSnapshot, Point, Presentation, Rank,
    RosterStore, SceneView, SimAttributes, TokenId,
};

/// Host capabilities for one operation.
///
/// The scene is read-only; token changes go through `lifecycle` and
/// roster changes through `store`.
pub struct Host<'h> {
    /// Grid, walls and occupants.
    pub scene: SceneView<'h>,
    /// Token creation, movement and deletion.
    pub lifecycle: &'h mut dyn AgentLifecycle,
    /// Roster persistence.
    pub store: &'h mut dyn RosterStore,
}

impl<'h> Host<'h> {
    /// Bundle the collaborators.
    pub fn new(
        scene: SceneView<'h>,
        lifecycle: &'h mut dyn AgentLifecycle,
        store: &'h mut dyn RosterStore,
    ) -> Self {
        Self {
            scene,
            lifecycle,
            store,
        }
    }
}

/// A token currently in the scene, as handed to `gather` or `add_member`.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveAgent {
    /// The token.
    pub token: TokenId,
    /// Its underlying entity.
    pub actor: ActorId,
    /// Visual properties.
    pub presentation: Presentation,
    /// Simulation attributes.
    pub attributes: SimAttributes,
    /// Current top-left corner.
    pub top_left: Point,
    /// Whether the token is itself a group surrogate.
    pub surrogate: bool,
}

impl LiveAgent {
    /// A plain agent with default presentation and attributes.
    pub fn new(token: TokenId, actor: ActorId, top_left: Point) -> Self {
        Self {
            token,
            actor,
            presentation: Presentation::default(),
            attributes: SimAttributes::default(),
            top_left,
            surrogate: false,
        }
    }

    /// World center of the token's footprint.
    pub fn center(&self, cell_size: f64) -> Point {
        self.presentation
            .footprint
            .center_at(self.top_left, cell_size)
    }

    pub(crate) fn snapshot(&self, order: u32) -> AgentSnapshot {
        AgentSnapshot {
            token: self.token,
            actor: self.actor,
            presentation: self.presentation.clone(),
            attributes: self.attributes.clone(),
            rank: Rank {
                order,
                ..Rank::default()
            },
            offset: None,
        }
    }
}

/// Descriptor that recreates a member at `top_left`.
pub(crate) fn restore_descriptor(member: &AgentSnapshot, top_left: Point) -> AgentDescriptor {
    AgentDescriptor {
        actor: member.actor,
        presentation: member.presentation.clone(),
        attributes: member.attributes.clone(),
        top_left,
        restores: Some(member.token),
        surrogate: false,
    }
}
