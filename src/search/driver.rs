//! Generic drivers over a branching scheme.
//!
//! # Algorithm
//!
//! Four strategies share the [`BranchingScheme`] contract: a greedy
//! rollout (always descend into the first feasible child), best-first
//! search (min-guide heap, one child per pop with the parent re-queued,
//! dominance map, incumbent pool), a single beam pass (best `width` nodes
//! per depth layer by guide), and iterative beam search (widths grow
//! geometrically, the incumbent pool carries across passes, so the best
//! cost never worsens as the width cap rises).
//!
//! Wall-clock budgets are checked at expansion boundaries only; when the
//! budget runs out the best incumbent found so far is returned with
//! `completed = false`.
//!
//! # Reference
//!
//! Ow, P.S., Morton, T.E. (1988). "Filtered beam search in scheduling",
//! *International Journal of Production Research* 26(1), 35-62.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

use log::{debug, trace};

use super::scheme::BranchingScheme;

/// Outcome of a driver run.
#[derive(Debug, Clone)]
pub struct SearchResult<I> {
    /// Best leaf found, if any.
    pub best: Option<I>,
    /// Number of child nodes generated.
    pub nodes_generated: usize,
    /// `false` when the run stopped on its time budget or a truncated
    /// beam pass, so better solutions may exist.
    pub completed: bool,
}

/// Configuration for [`best_first_search`].
#[derive(Debug, Clone, Default)]
pub struct BestFirstConfig {
    /// Wall-clock budget; `None` runs to completion.
    pub time_limit: Option<Duration>,
}

/// Configuration for [`beam_search`].
#[derive(Debug, Clone)]
pub struct BeamConfig {
    /// Maximum number of nodes kept per depth layer.
    pub width: usize,
    /// Wall-clock budget; `None` runs the pass to completion.
    pub time_limit: Option<Duration>,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            width: 64,
            time_limit: None,
        }
    }
}

/// Configuration for [`iterative_beam_search`].
#[derive(Debug, Clone)]
pub struct IterativeBeamConfig {
    /// Width of the first pass.
    pub initial_width: usize,
    /// Multiplier applied to the width between passes.
    pub growth_factor: usize,
    /// Width cap; `None` keeps growing until a pass is exhaustive.
    pub max_width: Option<usize>,
    /// Wall-clock budget shared by all passes.
    pub time_limit: Option<Duration>,
}

impl Default for IterativeBeamConfig {
    fn default() -> Self {
        Self {
            initial_width: 1,
            growth_factor: 2,
            max_width: None,
            time_limit: None,
        }
    }
}

struct HeapEntry<I> {
    guide: f64,
    id: I,
}

impl<I: Ord> PartialEq for HeapEntry<I> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<I: Ord> Eq for HeapEntry<I> {}

impl<I: Ord> PartialOrd for HeapEntry<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I: Ord> Ord for HeapEntry<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.guide
            .total_cmp(&other.guide)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Adds a leaf to the incumbent pool.
///
/// A strictly better leaf replaces the pool; an equally good, distinct
/// leaf joins it. Returns `true` when the pool's best improved.
fn offer<S: BranchingScheme>(scheme: &S, pool: &mut Vec<S::NodeId>, candidate: S::NodeId) -> bool {
    let Some(&best) = pool.first() else {
        pool.push(candidate);
        return true;
    };
    if scheme.better(candidate, best) {
        pool.clear();
        pool.push(candidate);
        return true;
    }
    if !scheme.better(best, candidate) && !pool.iter().any(|&kept| scheme.equals(kept, candidate)) {
        pool.push(candidate);
    }
    false
}

fn past(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

/// Descends into the first feasible child of every node until a leaf is
/// reached.
pub fn greedy<S: BranchingScheme>(scheme: &mut S) -> SearchResult<S::NodeId> {
    let mut nodes_generated = 0;
    let mut current = scheme.root();
    let mut best = None;
    loop {
        if scheme.leaf(current) {
            best = Some(current);
            break;
        }
        match scheme.next_child(current) {
            Some(child) => {
                nodes_generated += 1;
                current = child;
            }
            None => break,
        }
    }
    SearchResult {
        best,
        nodes_generated,
        completed: true,
    }
}

/// Expands nodes in ascending guide order until the queue drains or the
/// time budget expires.
///
/// Each pop generates one child and re-queues the parent while it stays
/// fertile. Closed children are discharged against the incumbent via the
/// scheme's bound; open children pass through a dominance map keyed on
/// the scheme's buckets.
pub fn best_first_search<S: BranchingScheme>(
    scheme: &mut S,
    config: &BestFirstConfig,
) -> SearchResult<S::NodeId> {
    let deadline = config.time_limit.map(|limit| Instant::now() + limit);
    let mut pool: Vec<S::NodeId> = Vec::new();
    let mut dominance: HashMap<S::Bucket, S::NodeId> = HashMap::new();
    let mut queue = BinaryHeap::new();
    let mut nodes_generated = 0;
    let mut completed = true;

    let root = scheme.root();
    queue.push(std::cmp::Reverse(HeapEntry {
        guide: scheme.guide(root),
        id: root,
    }));

    while let Some(std::cmp::Reverse(entry)) = queue.pop() {
        if past(deadline) {
            completed = false;
            break;
        }
        let node = entry.id;
        let Some(child) = scheme.next_child(node) else {
            continue;
        };
        nodes_generated += 1;
        if !scheme.infertile(node) {
            queue.push(std::cmp::Reverse(HeapEntry {
                guide: scheme.guide(node),
                id: node,
            }));
        }

        if let Some(&incumbent) = pool.first() {
            if scheme.bound(child, incumbent) {
                continue;
            }
        }
        if scheme.leaf(child) {
            if offer(scheme, &mut pool, child) {
                debug!("best-first incumbent improved to {}", scheme.guide(child));
            }
            continue;
        }
        match dominance.entry(scheme.bucket(child)) {
            Entry::Occupied(mut occupied) => {
                let existing = *occupied.get();
                if scheme.dominates(existing, child) {
                    continue;
                }
                if scheme.dominates(child, existing) {
                    occupied.insert(child);
                }
                queue.push(std::cmp::Reverse(HeapEntry {
                    guide: scheme.guide(child),
                    id: child,
                }));
            }
            Entry::Vacant(vacant) => {
                vacant.insert(child);
                queue.push(std::cmp::Reverse(HeapEntry {
                    guide: scheme.guide(child),
                    id: child,
                }));
            }
        }
    }

    SearchResult {
        best: pool.first().copied(),
        nodes_generated,
        completed,
    }
}

struct PassOutcome {
    truncated: bool,
    hit_deadline: bool,
}

fn beam_pass<S: BranchingScheme>(
    scheme: &mut S,
    width: usize,
    deadline: Option<Instant>,
    pool: &mut Vec<S::NodeId>,
    nodes_generated: &mut usize,
) -> PassOutcome {
    let root = scheme.root();
    let mut layer = vec![root];
    let mut truncated = false;
    let mut depth = 0;

    while !layer.is_empty() {
        let mut next_layer: Vec<S::NodeId> = Vec::new();
        let mut buckets: HashMap<S::Bucket, usize> = HashMap::new();
        for index in 0..layer.len() {
            if past(deadline) {
                return PassOutcome {
                    truncated,
                    hit_deadline: true,
                };
            }
            let node = layer[index];
            while let Some(child) = scheme.next_child(node) {
                *nodes_generated += 1;
                if scheme.leaf(child) {
                    if let Some(&incumbent) = pool.first() {
                        if scheme.bound(child, incumbent) {
                            continue;
                        }
                    }
                    if offer(scheme, pool, child) {
                        debug!("beam incumbent improved to {}", scheme.guide(child));
                    }
                    continue;
                }
                match buckets.entry(scheme.bucket(child)) {
                    Entry::Occupied(occupied) => {
                        let slot = *occupied.get();
                        if scheme.dominates(next_layer[slot], child) {
                            continue;
                        }
                        if scheme.dominates(child, next_layer[slot]) {
                            next_layer[slot] = child;
                        } else {
                            next_layer.push(child);
                        }
                    }
                    Entry::Vacant(vacant) => {
                        vacant.insert(next_layer.len());
                        next_layer.push(child);
                    }
                }
            }
        }
        if next_layer.len() > width {
            next_layer.sort_by(|&a, &b| {
                scheme
                    .guide(a)
                    .total_cmp(&scheme.guide(b))
                    .then_with(|| a.cmp(&b))
            });
            next_layer.truncate(width);
            truncated = true;
        }
        depth += 1;
        trace!("beam depth {}, layer size {}", depth, next_layer.len());
        layer = next_layer;
    }

    PassOutcome {
        truncated,
        hit_deadline: false,
    }
}

/// Runs a single beam pass with a fixed layer width.
pub fn beam_search<S: BranchingScheme>(
    scheme: &mut S,
    config: &BeamConfig,
) -> SearchResult<S::NodeId> {
    let deadline = config.time_limit.map(|limit| Instant::now() + limit);
    let mut pool: Vec<S::NodeId> = Vec::new();
    let mut nodes_generated = 0;
    let outcome = beam_pass(
        scheme,
        config.width.max(1),
        deadline,
        &mut pool,
        &mut nodes_generated,
    );
    SearchResult {
        best: pool.first().copied(),
        nodes_generated,
        completed: !outcome.truncated && !outcome.hit_deadline,
    }
}

/// Runs beam passes of geometrically growing width, carrying the
/// incumbent pool across passes.
///
/// Stops when a pass completes without truncation (the search space was
/// covered), when the width cap is reached, or when the time budget
/// expires.
pub fn iterative_beam_search<S: BranchingScheme>(
    scheme: &mut S,
    config: &IterativeBeamConfig,
) -> SearchResult<S::NodeId> {
    let deadline = config.time_limit.map(|limit| Instant::now() + limit);
    let mut pool: Vec<S::NodeId> = Vec::new();
    let mut nodes_generated = 0;
    let mut completed = false;
    let mut width = config.initial_width.max(1);
    let growth = config.growth_factor.max(2);

    loop {
        let outcome = beam_pass(scheme, width, deadline, &mut pool, &mut nodes_generated);
        debug!(
            "beam pass at width {} done, best guide {:?}",
            width,
            pool.first().map(|&id| scheme.guide(id))
        );
        if outcome.hit_deadline {
            break;
        }
        if !outcome.truncated {
            completed = true;
            break;
        }
        if config.max_width.is_some_and(|max| width >= max) {
            break;
        }
        width = width.saturating_mul(growth);
        if let Some(max) = config.max_width {
            width = width.min(max);
        }
    }

    SearchResult {
        best: pool.first().copied(),
        nodes_generated,
        completed,
    }
}
