//! Agent snapshots and the roster of a merged group.
//!
//! An [`AgentSnapshot`] captures everything needed to recreate one token
//! after the group disperses. A [`Roster`] is the ordered list of
//! snapshots behind one surrogate, plus the group's facing and default
//! formation.

use crate::error::RosterError;
use crate::geom::{Footprint, GridOffset};
use crate::id::{ActorId, TokenId};
use indexmap::{IndexMap, IndexSet};

/// Visual properties carried through a merge untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Display name.
    pub name: String,
    /// Image path or URL, opaque to the core.
    pub image: String,
    /// Footprint in grid units.
    pub footprint: Footprint,
    /// Visual scale multiplier.
    pub scale: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            name: String::new(),
            image: String::new(),
            footprint: Footprint::UNIT,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

/// Allegiance of a token toward the observing side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Openly hostile.
    Hostile,
    /// Neither hostile nor friendly.
    #[default]
    Neutral,
    /// Allied.
    Friendly,
    /// Allegiance hidden from observers.
    Secret,
}

/// Vision descriptor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vision {
    /// Whether the token has sight at all.
    pub enabled: bool,
    /// Sight range in scene distance units.
    pub range: f64,
    /// Host-defined vision mode (e.g. "basic", "darkvision").
    pub mode: String,
}

/// Emitted light descriptor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightSource {
    /// Dim light radius.
    pub dim: f64,
    /// Bright light radius.
    pub bright: f64,
    /// Tint, if any.
    pub color: Option<String>,
    /// Host-defined animation name, if any.
    pub animation: Option<String>,
}

/// Simulation attributes the core stores but never interprets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimAttributes {
    /// Elevation above the scene floor.
    pub elevation: f64,
    /// Allegiance.
    pub disposition: Disposition,
    /// Sight.
    pub vision: Vision,
    /// Emitted light.
    pub light: LightSource,
}

/// Advisory role tag within a group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    /// Occupies rank 0.
    Leader,
    /// Ordinary member.
    #[default]
    Member,
    /// Host-defined role (e.g. "scout", "rearguard").
    Custom(String),
}

/// Placement order and role of one agent.
///
/// Order is advisory except that order 0 is always the anchor slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rank {
    /// Position in gather/placement order.
    pub order: u32,
    /// Role tag.
    pub role: Role,
}

/// One original token captured at gather time.
///
/// `token` and `actor` never change after capture. `offset` is the
/// remembered grid position relative to the anchor and stays `None`
/// until something assigns it.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentSnapshot {
    /// The token this snapshot replaced.
    pub token: TokenId,
    /// The token's underlying entity.
    pub actor: ActorId,
    /// Visual properties.
    pub presentation: Presentation,
    /// Simulation attributes.
    pub attributes: SimAttributes,
    /// Order and role.
    pub rank: Rank,
    /// Remembered offset from the anchor cell, conventionally `-2..=2`.
    pub offset: Option<GridOffset>,
}

impl AgentSnapshot {
    /// Create a snapshot with default presentation and attributes.
    pub fn new(token: TokenId, actor: ActorId) -> Self {
        Self {
            token,
            actor,
            presentation: Presentation::default(),
            attributes: SimAttributes::default(),
            rank: Rank::default(),
            offset: None,
        }
    }

    /// Set the remembered offset (builder style).
    pub fn with_offset(mut self, offset: GridOffset) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Named built-in formation patterns.
///
/// The generators live in `muster-formation`; the enum lives here so a
/// [`Roster`] can record its group's default formation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FormationKind {
    /// Centered row.
    #[default]
    Line,
    /// Apex forward, ranks fanning back alternately left and right.
    Wedge,
    /// Center plus concentric rings.
    Ring,
    /// Filled square, row-major.
    Block,
    /// Single column behind rank 0.
    File,
}

impl FormationKind {
    /// All built-in kinds in listing order.
    pub const ALL: [FormationKind; 5] = [
        FormationKind::Line,
        FormationKind::Wedge,
        FormationKind::Ring,
        FormationKind::Block,
        FormationKind::File,
    ];

    /// Stable identifier.
    pub fn id(self) -> &'static str {
        match self {
            FormationKind::Line => "line",
            FormationKind::Wedge => "wedge",
            FormationKind::Ring => "ring",
            FormationKind::Block => "block",
            FormationKind::File => "file",
        }
    }

    /// Look up a kind by its identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }
}

/// The ordered snapshot list behind one surrogate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    /// Members in rank order.
    pub members: Vec<AgentSnapshot>,
    /// Group facing in degrees (0 = north).
    pub facing: f64,
    /// Formation used when no member has a remembered offset.
    pub formation: FormationKind,
}

impl Roster {
    /// Create a roster facing north.
    pub fn new(members: Vec<AgentSnapshot>, formation: FormationKind) -> Self {
        Self {
            members,
            facing: 0.0,
            formation,
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the roster has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Look up a member by token.
    pub fn member(&self, token: TokenId) -> Option<&AgentSnapshot> {
        self.members.iter().find(|m| m.token == token)
    }

    /// Index of a member by token.
    pub fn position_of(&self, token: TokenId) -> Option<usize> {
        self.members.iter().position(|m| m.token == token)
    }

    /// Whether any member remembers an offset.
    pub fn has_memory(&self) -> bool {
        self.members.iter().any(|m| m.offset.is_some())
    }

    /// Offsets currently claimed, in member order.
    pub fn claimed_offsets(&self) -> IndexSet<GridOffset> {
        self.members.iter().filter_map(|m| m.offset).collect()
    }

    /// Remove a member, renumbering the remaining ranks.
    pub fn remove(&mut self, token: TokenId) -> Option<AgentSnapshot> {
        let idx = self.position_of(token)?;
        let removed = self.members.remove(idx);
        self.renumber();
        Some(removed)
    }

    /// Rewrite rank orders to match member order.
    ///
    /// The member at index 0 becomes the leader; a former leader elsewhere
    /// is demoted to an ordinary member. Custom roles are kept.
    pub fn renumber(&mut self) {
        for (i, m) in self.members.iter_mut().enumerate() {
            m.rank.order = i as u32;
            if i == 0 {
                m.rank.role = Role::Leader;
            } else if m.rank.role == Role::Leader {
                m.rank.role = Role::Member;
            }
        }
    }

    /// Move `token` to `offset`, swapping with whichever member held it.
    ///
    /// Returns the token that was displaced, if any. The displaced member
    /// takes the mover's previous offset (or none, if it had none).
    pub fn set_offset(
        &mut self,
        token: TokenId,
        offset: GridOffset,
    ) -> Result<Option<TokenId>, RosterError> {
        let idx = self
            .position_of(token)
            .ok_or(RosterError::UnknownMember { token })?;
        let previous = self.members[idx].offset;
        let holder = self
            .members
            .iter()
            .position(|m| m.token != token && m.offset == Some(offset));
        self.members[idx].offset = Some(offset);
        let displaced = holder.map(|h| {
            self.members[h].offset = previous;
            self.members[h].token
        });
        Ok(displaced)
    }

    /// Check identity and offset uniqueness.
    pub fn validate(&self) -> Result<(), RosterError> {
        let mut tokens = IndexSet::with_capacity(self.members.len());
        let mut offsets: IndexMap<GridOffset, TokenId> = IndexMap::new();
        for m in &self.members {
            if !tokens.insert(m.token) {
                return Err(RosterError::DuplicateIdentity { token: m.token });
            }
            if let Some(offset) = m.offset {
                if let Some(&first) = offsets.get(&offset) {
                    return Err(RosterError::DuplicateOffset {
                        offset,
                        first,
                        second: m.token,
                    });
                }
                offsets.insert(offset, m.token);
            }
        }
        Ok(())
    }
}
