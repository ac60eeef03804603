//! Recording lifecycle mock.

use crate::scene::SharedOccupants;
use indexmap::{IndexMap, IndexSet};
use muster_core::{
    ActorId, AgentDescriptor, AgentLifecycle, Occupant, Point, ProviderError, TokenId,
};

/// One call observed by [`RecordingLifecycle`].
#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleEvent {
    Created {
        token: TokenId,
        actor: ActorId,
        top_left: Point,
        surrogate: bool,
    },
    Moved {
        token: TokenId,
        top_left: Point,
    },
    Deleted {
        token: TokenId,
    },
}

/// Lifecycle mock that mirrors every change into a shared occupant list.
///
/// New tokens are numbered from 1000 upward. Individual actors can be
/// made to fail creation, and individual tokens to fail deletion.
#[derive(Debug)]
pub struct RecordingLifecycle {
    occupants: SharedOccupants,
    next_id: u64,
    events: Vec<LifecycleEvent>,
    descriptors: IndexMap<TokenId, AgentDescriptor>,
    fail_create: IndexSet<ActorId>,
    fail_delete: IndexSet<TokenId>,
}

impl RecordingLifecycle {
    pub fn new(occupants: SharedOccupants) -> Self {
        Self {
            occupants,
            next_id: 1000,
            events: Vec::new(),
            descriptors: IndexMap::new(),
            fail_create: IndexSet::new(),
            fail_delete: IndexSet::new(),
        }
    }

    /// Make every creation for `actor` fail with `NotFound`.
    pub fn fail_create_for(&mut self, actor: ActorId) {
        self.fail_create.insert(actor);
    }

    /// Make deleting `token` fail with `Rejected`.
    pub fn fail_delete_for(&mut self, token: TokenId) {
        self.fail_delete.insert(token);
    }

    /// Every call so far, in order.
    pub fn events(&self) -> &[LifecycleEvent] {
        &self.events
    }

    /// Descriptor a created token was built from.
    pub fn descriptor(&self, token: TokenId) -> Option<&AgentDescriptor> {
        self.descriptors.get(&token)
    }

    /// Tokens created so far, in creation order.
    pub fn created(&self) -> Vec<TokenId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                LifecycleEvent::Created { token, .. } => Some(*token),
                _ => None,
            })
            .collect()
    }

    /// Token most recently created from a descriptor restoring `original`.
    pub fn restored(&self, original: TokenId) -> Option<TokenId> {
        self.descriptors
            .iter()
            .rev()
            .find(|(_, d)| d.restores == Some(original))
            .map(|(t, _)| *t)
    }

    /// Current top-left of a placed token.
    pub fn position(&self, token: TokenId) -> Option<Point> {
        self.lock()
            .iter()
            .find(|o| o.token == token)
            .map(|o| o.top_left)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Occupant>> {
        self.occupants.lock().expect("occupant list poisoned")
    }
}

impl AgentLifecycle for RecordingLifecycle {
    fn create(&mut self, descriptor: &AgentDescriptor) -> Result<TokenId, ProviderError> {
        if self.fail_create.contains(&descriptor.actor) {
            return Err(ProviderError::Rejected {
                reason: format!("{} no longer exists", descriptor.actor),
            });
        }
        let token = TokenId(self.next_id);
        self.next_id += 1;
        self.lock().push(Occupant {
            token,
            top_left: descriptor.top_left,
            footprint: descriptor.presentation.footprint,
        });
        self.descriptors.insert(token, descriptor.clone());
        self.events.push(LifecycleEvent::Created {
            token,
            actor: descriptor.actor,
            top_left: descriptor.top_left,
            surrogate: descriptor.surrogate,
        });
        Ok(token)
    }

    fn move_to(&mut self, token: TokenId, top_left: Point) -> Result<(), ProviderError> {
        {
            let mut occupants = self.lock();
            let occupant = occupants
                .iter_mut()
                .find(|o| o.token == token)
                .ok_or(ProviderError::NotFound { token })?;
            occupant.top_left = top_left;
        }
        self.events.push(LifecycleEvent::Moved { token, top_left });
        Ok(())
    }

    fn delete(&mut self, token: TokenId) -> Result<(), ProviderError> {
        if self.fail_delete.contains(&token) {
            return Err(ProviderError::Rejected {
                reason: format!("{token} is locked"),
            });
        }
        {
            let mut occupants = self.lock();
            let before = occupants.len();
            occupants.retain(|o| o.token != token);
            if occupants.len() == before {
                return Err(ProviderError::NotFound { token });
            }
        }
        self.events.push(LifecycleEvent::Deleted { token });
        Ok(())
    }
}
