//! The formation library: built-ins plus saved patterns.

use crate::binding::{apply_bindings, bind_slots, Binding};
use crate::custom::{CustomPattern, PatternSlot};
use crate::error::FormationError;
use crate::pattern::{generate, SlotOffset};
use crate::store::PatternStore;
use indexmap::{IndexMap, IndexSet};
use muster_core::{FormationKind, GridOffset, Roster};
use tracing::{debug, info};

/// A resolved formation, built-in or saved.
#[derive(Clone, Debug, PartialEq)]
pub enum FormationDefinition {
    /// A built-in generator.
    Builtin(FormationKind),
    /// A saved slot list.
    Custom(CustomPattern),
}

impl FormationDefinition {
    /// Name the definition is listed under.
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(kind) => kind.id(),
            Self::Custom(p) => &p.name,
        }
    }

    /// Up to `count` slots rotated by `facing`.
    ///
    /// Built-ins always yield exactly `count`; saved patterns yield at
    /// most as many slots as they hold.
    pub fn slots(&self, count: usize, facing: f64) -> Vec<SlotOffset> {
        match self {
            Self::Builtin(kind) => generate(*kind, count, facing),
            Self::Custom(p) => p
                .rotated(facing)
                .into_iter()
                .take(count)
                .enumerate()
                .map(|(i, s)| SlotOffset {
                    offset: s.offset,
                    rank: i as u32,
                })
                .collect(),
        }
    }
}

/// Listing entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternSummary {
    /// Name to pass to [`FormationLibrary::get_pattern`].
    pub name: String,
    /// Whether this is a built-in generator.
    pub builtin: bool,
    /// Slot count for saved patterns; built-ins fit any count.
    pub slots: Option<usize>,
}

/// Built-in formations plus a write-through cache of saved patterns.
#[derive(Debug)]
pub struct FormationLibrary<S: PatternStore> {
    store: S,
    saved: IndexMap<String, CustomPattern>,
}

impl<S: PatternStore> FormationLibrary<S> {
    /// Open a library over `store`, loading its patterns.
    pub fn open(store: S) -> Result<Self, FormationError> {
        let saved = store.load_patterns()?;
        debug!(saved = saved.len(), "formation library opened");
        Ok(Self { store, saved })
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Built-ins first, then saved patterns in save order.
    pub fn list_patterns(&self) -> Vec<PatternSummary> {
        FormationKind::ALL
            .iter()
            .map(|k| PatternSummary {
                name: k.id().to_string(),
                builtin: true,
                slots: None,
            })
            .chain(self.saved.values().map(|p| PatternSummary {
                name: p.name.clone(),
                builtin: false,
                slots: Some(p.len()),
            }))
            .collect()
    }

    /// Look up a pattern by name.
    pub fn get_pattern(&self, name: &str) -> Option<FormationDefinition> {
        if let Some(kind) = FormationKind::from_id(name) {
            return Some(FormationDefinition::Builtin(kind));
        }
        self.saved.get(name).cloned().map(FormationDefinition::Custom)
    }

    /// Save (or replace) a pattern and persist the whole set.
    ///
    /// Names are trimmed. Slots must be distinct and inside `-2..=2`. If
    /// the store refuses the write, the library keeps its previous state.
    pub fn save_pattern(&mut self, mut pattern: CustomPattern) -> Result<(), FormationError> {
        pattern.name = pattern.name.trim().to_string();
        validate(&pattern)?;
        let name = pattern.name.clone();
        let mut next = self.saved.clone();
        next.insert(name.clone(), pattern);
        self.store.store_patterns(&next)?;
        self.saved = next;
        info!(pattern = %name, "formation saved");
        Ok(())
    }

    /// Delete a saved pattern and persist the whole set.
    pub fn delete_pattern(&mut self, name: &str) -> Result<CustomPattern, FormationError> {
        if FormationKind::from_id(name).is_some() {
            return Err(FormationError::ReservedName { name: name.into() });
        }
        let mut next = self.saved.clone();
        let removed = next
            .shift_remove(name)
            .ok_or_else(|| FormationError::UnknownPattern { name: name.into() })?;
        self.store.store_patterns(&next)?;
        self.saved = next;
        info!(pattern = %name, "formation deleted");
        Ok(removed)
    }

    /// Re-seat `roster` into the named pattern.
    ///
    /// A saved pattern is bound slot by slot (see [`bind_slots`]). A
    /// built-in name switches the roster's formation and clears every
    /// remembered offset, so the next dispersal lays the group out fresh.
    pub fn apply_pattern_to_roster(
        &self,
        name: &str,
        roster: &mut Roster,
    ) -> Result<Vec<Binding>, FormationError> {
        match self.get_pattern(name) {
            Some(FormationDefinition::Builtin(kind)) => {
                roster.formation = kind;
                for m in &mut roster.members {
                    m.offset = None;
                }
                Ok(Vec::new())
            }
            Some(FormationDefinition::Custom(pattern)) => {
                let bindings = bind_slots(&pattern.slots, &roster.members);
                apply_bindings(roster, &bindings);
                debug!(pattern = %name, members = roster.len(), "pattern applied");
                Ok(bindings)
            }
            None => Err(FormationError::UnknownPattern { name: name.into() }),
        }
    }
}

fn validate(pattern: &CustomPattern) -> Result<(), FormationError> {
    let name = &pattern.name;
    if name.is_empty() {
        return Err(FormationError::InvalidName { name: name.clone() });
    }
    if FormationKind::from_id(name).is_some() {
        return Err(FormationError::ReservedName { name: name.clone() });
    }
    if pattern.slots.is_empty() {
        return Err(FormationError::EmptyPattern { name: name.clone() });
    }
    let mut seen: IndexSet<GridOffset> = IndexSet::with_capacity(pattern.slots.len());
    for PatternSlot { offset, .. } in &pattern.slots {
        if !offset.in_arrangement_grid() || !seen.insert(*offset) {
            return Err(FormationError::InvalidSlot {
                name: name.clone(),
                offset: *offset,
            });
        }
    }
    Ok(())
}
