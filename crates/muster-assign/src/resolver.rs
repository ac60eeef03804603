//! Two-pass placement: propose a source per member, then validate.

use crate::config::ResolverConfig;
use crate::resolution::{Placement, PlacementTier, ResolveMode, Resolution};
use crate::source::{rotate_sources, PositionSource};
use muster_core::{AgentSnapshot, CellKey, GridOffset, Point, TokenSet};
use muster_formation::{bind_slots, CustomPattern, FormationDefinition, SlotMatch};
use muster_grid::{Candidate, OccupancyMap, Placer, ReachableSet};
use smallvec::SmallVec;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Inputs for one dispersal.
#[derive(Clone, Copy, Debug)]
pub struct ResolveRequest<'r> {
    /// World center all offsets are measured from.
    pub anchor: Point,
    /// Members in rank order.
    pub members: &'r [AgentSnapshot],
    /// Group facing in degrees.
    pub facing: f64,
    /// Formation for geometry mode.
    pub formation: &'r FormationDefinition,
    /// Saved pattern to bind into instead of using remembered offsets.
    pub pattern: Option<&'r CustomPattern>,
    /// Cells reachable from the anchor.
    pub reachable: &'r ReachableSet,
    /// Tokens ignored by occupancy tests (normally the surrogate).
    pub exclude: &'r TokenSet,
}

/// Maps a roster onto concrete cells.
pub struct Resolver<'p, 'a> {
    placer: &'p Placer<'a>,
    config: ResolverConfig,
}

impl<'p, 'a> Resolver<'p, 'a> {
    /// Create a resolver searching with `placer`.
    pub fn new(placer: &'p Placer<'a>, config: ResolverConfig) -> Self {
        Self { placer, config }
    }

    /// Resolve every member to a cell.
    ///
    /// Mode selection: a saved pattern if one is given, otherwise memory
    /// when any member remembers an offset, otherwise geometry. Members
    /// whose proposal fails validation go through the fallback searches
    /// and, as a last resort, are stacked on the anchor cell.
    pub fn resolve(&self, req: &ResolveRequest<'_>) -> Resolution {
        let anchor_tl = self.placer.origin_top_left(req.anchor);
        let (mode, sources) = self.propose(req, anchor_tl);
        debug!(mode = %mode, members = req.members.len(), "resolving placements");

        let margin = self.placer.config().overlap_margin * self.cell_size();
        let occupancy = OccupancyMap::capture(self.placer.scene(), req.exclude, margin);
        let mut claimed: HashSet<CellKey> = HashSet::new();
        let mut placed: Vec<Option<(Point, PlacementTier)>> = vec![None; req.members.len()];

        // Anchor slots first so nobody else can claim the anchor cell.
        let anchored = |s: &Option<PositionSource>| s.as_ref().is_some_and(|s| s.is_anchor_slot());
        let order = (0..sources.len())
            .filter(|&i| anchored(&sources[i]))
            .chain((0..sources.len()).filter(|&i| !anchored(&sources[i])));
        for i in order {
            let Some(source) = &sources[i] else {
                continue;
            };
            if let Some(hit) = self.validate(source, anchor_tl, req, &occupancy, &claimed) {
                claimed.insert(self.key(hit.0));
                placed[i] = Some(hit);
            }
        }

        self.fill_unresolved(req, anchor_tl, &mut placed, &mut claimed);

        let placements = req
            .members
            .iter()
            .zip(placed)
            .map(|(m, hit)| {
                let (top_left, tier) = hit.unwrap_or((anchor_tl, PlacementTier::Stacked));
                Placement {
                    token: m.token,
                    top_left,
                    tier,
                }
            })
            .collect();
        Resolution::new(mode, placements)
    }

    fn cell_size(&self) -> f64 {
        self.placer.scene().cell_size()
    }

    fn key(&self, top_left: Point) -> CellKey {
        let half = self.cell_size() / 2.0;
        CellKey::from_center(Point::new(top_left.x + half, top_left.y + half))
    }

    fn cell_at(&self, anchor_tl: Point, offset: GridOffset) -> Point {
        self.placer
            .scene()
            .grid
            .snap_top_left(anchor_tl.offset_by(offset, self.cell_size()))
    }

    fn propose(
        &self,
        req: &ResolveRequest<'_>,
        anchor_tl: Point,
    ) -> (ResolveMode, Vec<Option<PositionSource>>) {
        if let Some(pattern) = req.pattern {
            let mut sources: Vec<_> = bind_slots(&pattern.slots, req.members)
                .into_iter()
                .map(|b| {
                    let offset = b.offset?;
                    let slot = pattern
                        .slots
                        .iter()
                        .find(|s| s.offset == offset)
                        .filter(|_| b.matched != SlotMatch::Spiral);
                    Some(match slot {
                        Some(s) => PositionSource::BoundSlot(s.clone()),
                        None => PositionSource::Remembered(offset),
                    })
                })
                .collect();
            rotate_sources(&mut sources, req.facing);
            return (ResolveMode::Pattern, sources);
        }
        if req.members.iter().any(|m| m.offset.is_some()) {
            let mut sources: Vec<_> = req
                .members
                .iter()
                .map(|m| m.offset.map(PositionSource::Remembered))
                .collect();
            rotate_sources(&mut sources, req.facing);
            return (ResolveMode::Memory, sources);
        }
        (ResolveMode::Geometry, self.propose_geometry(req, anchor_tl))
    }

    /// Nearest-fit of ideal formation cells onto reachable candidates.
    fn propose_geometry(
        &self,
        req: &ResolveRequest<'_>,
        anchor_tl: Point,
    ) -> Vec<Option<PositionSource>> {
        let n = req.members.len();
        let cs = self.cell_size();
        let slots = req.formation.slots(n, req.facing);
        let radius = slots.iter().map(|s| s.offset.chebyshev()).max().unwrap_or(0) as usize;
        let side = 2 * radius + 1;
        let candidates = self
            .placer
            .find_reachable_candidates(req.anchor, n.max(side * side), req.exclude);

        let center = Point::new(anchor_tl.x + cs / 2.0, anchor_tl.y + cs / 2.0);
        let mut used = vec![false; candidates.len()];
        let mut out: Vec<Option<PositionSource>> = vec![None; n];
        for (i, slot) in slots.iter().enumerate() {
            let ideal = center + slot.to_world(cs);
            let best = candidates
                .iter()
                .enumerate()
                .filter(|(j, _)| !used[*j])
                .min_by(|(_, a), (_, b)| a.center.distance(ideal).total_cmp(&b.center.distance(ideal)));
            if let Some((j, c)) = best {
                used[j] = true;
                out[i] = Some(PositionSource::Reachable(*c));
            }
        }
        let mut rest = candidates
            .iter()
            .zip(&used)
            .filter(|(_, taken)| !**taken)
            .map(|(c, _)| *c);
        for o in out.iter_mut().skip(slots.len()) {
            match rest.next() {
                Some(c) => *o = Some(PositionSource::Reachable(c)),
                None => break,
            }
        }
        out
    }

    fn validate(
        &self,
        source: &PositionSource,
        anchor_tl: Point,
        req: &ResolveRequest<'_>,
        occupancy: &OccupancyMap,
        claimed: &HashSet<CellKey>,
    ) -> Option<(Point, PlacementTier)> {
        let tier = match source {
            PositionSource::Reachable(c) => {
                return (!claimed.contains(&c.key())).then_some((c.top_left, PlacementTier::Geometry));
            }
            PositionSource::Remembered(_) => PlacementTier::Memory,
            PositionSource::BoundSlot(_) => PlacementTier::Slot,
        };
        let offset = source.offset()?;
        let top_left = self.cell_at(anchor_tl, offset);
        if offset.is_origin() {
            return Some((top_left, tier));
        }
        let key = self.key(top_left);
        let ok = req.reachable.contains(key) && !claimed.contains(&key) && occupancy.is_free(top_left);
        ok.then_some((top_left, tier))
    }

    /// Fallback and emergency searches for members still without a cell.
    fn fill_unresolved(
        &self,
        req: &ResolveRequest<'_>,
        anchor_tl: Point,
        placed: &mut [Option<(Point, PlacementTier)>],
        claimed: &mut HashSet<CellKey>,
    ) {
        let mut pending: SmallVec<[usize; 8]> =
            (0..placed.len()).filter(|&i| placed[i].is_none()).collect();
        if pending.is_empty() {
            return;
        }
        let mut want = pending.len() + claimed.len() + self.config.fallback_padding;
        for tier in [PlacementTier::Fallback, PlacementTier::Emergency] {
            if pending.is_empty() {
                break;
            }
            let fresh: Vec<Candidate> = self
                .placer
                .find_reachable_candidates(req.anchor, want, req.exclude)
                .into_iter()
                .filter(|c| !claimed.contains(&c.key()))
                .collect();
            debug!(tier = ?tier, pending = pending.len(), want, fresh = fresh.len(), "fallback search");
            let mut fresh = fresh.into_iter();
            let mut still: SmallVec<[usize; 8]> = SmallVec::new();
            for i in pending.drain(..) {
                match fresh.next() {
                    Some(c) => {
                        claimed.insert(c.key());
                        placed[i] = Some((c.top_left, tier));
                    }
                    None => still.push(i),
                }
            }
            pending = still;
            want += self.config.emergency_padding;
        }
        for i in pending {
            warn!(token = %req.members[i].token, "no free cell left, stacking on the anchor");
            placed[i] = Some((anchor_tl, PlacementTier::Stacked));
        }
    }
}
