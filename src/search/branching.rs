//! Branching scheme for elementary tours over slotted locations.
//!
//! Search nodes are partial depot-to-depot tours. Every node records the
//! last visited (location, interval) pair, the time at which that visit
//! releases, the accumulated arc cost, and the set of visited locations.
//! Candidate moves are shared by all nodes: one entry per (location,
//! interval) pair, ordered by nondecreasing interval end so that urgent
//! slots are tried first, with the single depot-return move placed last.
//! Each node walks this list with a private cursor, skipping visited
//! locations and slots its release time can no longer catch.
//!
//! Nodes live in an arena owned by the scheme; parent links are indices
//! into it, and the whole arena is released when the scheme is dropped.

use std::hash::{Hash, Hasher};

use crate::models::{Instance, Tour};

use super::scheme::BranchingScheme;

struct Node {
    parent: Option<usize>,
    last: usize,
    interval: usize,
    elapsed: i64,
    cost: f64,
    visited: Vec<bool>,
    cursor: usize,
}

/// Dominance signature of a partial tour.
///
/// Hashes on (last location, interval, accumulated cost); equality
/// additionally requires identical visited sets, so only interchangeable
/// states ever share a bucket.
#[derive(Debug, Clone)]
pub struct TourBucket {
    last: usize,
    interval: usize,
    cost_bits: u64,
    visited: Vec<bool>,
}

impl PartialEq for TourBucket {
    fn eq(&self, other: &Self) -> bool {
        self.last == other.last
            && self.interval == other.interval
            && self.cost_bits == other.cost_bits
            && self.visited == other.visited
    }
}

impl Eq for TourBucket {}

impl Hash for TourBucket {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.last.hash(state);
        self.interval.hash(state);
        self.cost_bits.hash(state);
    }
}

/// Elementary-tour branching over an instance.
///
/// Implements [`BranchingScheme`] for the drivers in
/// [`crate::search`]. A child extends its parent by one visit; the
/// depot-return move closes the tour and yields a leaf. Children of the
/// root skip the arrival check since the depot departure time is free.
///
/// # Examples
///
/// ```
/// use espptw::models::{Instance, VisitInterval};
/// use espptw::search::{greedy, TourBranching};
///
/// let mut instance = Instance::new();
/// let depot = VisitInterval::new(0, 0).unwrap();
/// instance.add_location(vec![depot], 0.0, 0.0, 0.0).unwrap();
/// let iv = VisitInterval::new(0, 100).unwrap();
/// instance.add_location(vec![iv], 3.0, 4.0, 0.0).unwrap();
///
/// let mut scheme = TourBranching::new(&instance);
/// let result = greedy(&mut scheme);
/// let tour = scheme.to_tour(result.best.unwrap());
/// assert_eq!(tour.locations(), &[1]);
/// assert_eq!(tour.cost(), 10.0);
/// ```
pub struct TourBranching<'a> {
    instance: &'a Instance,
    candidates: Vec<(usize, usize)>,
    nodes: Vec<Node>,
}

impl<'a> TourBranching<'a> {
    /// Creates a branching scheme over the given instance.
    pub fn new(instance: &'a Instance) -> Self {
        let mut candidates: Vec<(usize, usize)> = Vec::new();
        for location in instance.locations().iter().skip(1) {
            for k in 0..location.intervals().len() {
                candidates.push((location.id(), k));
            }
        }
        candidates.sort_by_key(|&(loc, k)| {
            (instance.location(loc).intervals()[k].end(), loc, k)
        });
        if !instance.is_empty() {
            candidates.push((0, 0));
        }
        Self {
            instance,
            candidates,
            nodes: Vec::new(),
        }
    }

    /// Reconstructs the tour ending at the given node by walking parent
    /// links; the trailing depot of a closed tour is dropped.
    pub fn to_tour(&self, node: usize) -> Tour {
        let cost = self.nodes[node].cost;
        let mut ids = Vec::new();
        let mut current = node;
        while let Some(parent) = self.nodes[current].parent {
            ids.push(self.nodes[current].last);
            current = parent;
        }
        ids.reverse();
        if ids.last() == Some(&0) {
            ids.pop();
        }
        Tour::new(ids, cost)
    }

    fn push_node(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

impl BranchingScheme for TourBranching<'_> {
    type NodeId = usize;
    type Bucket = TourBucket;

    fn root(&mut self) -> usize {
        let visited = vec![false; self.instance.len()];
        self.push_node(Node {
            parent: None,
            last: 0,
            interval: 0,
            elapsed: 0,
            cost: 0.0,
            visited,
            cursor: 0,
        })
    }

    fn next_child(&mut self, parent: usize) -> Option<usize> {
        loop {
            let cursor = self.nodes[parent].cursor;
            if cursor >= self.candidates.len() {
                return None;
            }
            self.nodes[parent].cursor += 1;
            let (loc, interval) = self.candidates[cursor];

            if loc == 0 {
                let p = &self.nodes[parent];
                // Closing the never-opened tour costs nothing.
                let added = if p.last == 0 {
                    0.0
                } else {
                    self.instance.cost(p.last, 0)
                };
                let child = Node {
                    parent: Some(parent),
                    last: 0,
                    interval: 0,
                    elapsed: p.elapsed + self.instance.duration(p.last, 0),
                    cost: p.cost + added,
                    visited: p.visited.clone(),
                    cursor: self.candidates.len(),
                };
                return Some(self.push_node(child));
            }

            let p = &self.nodes[parent];
            if p.visited[loc] {
                continue;
            }
            let slot = self.instance.location(loc).intervals()[interval];
            if p.parent.is_some()
                && !slot.admits(p.elapsed + self.instance.duration(p.last, loc))
            {
                continue;
            }
            let mut visited = p.visited.clone();
            visited[loc] = true;
            let child = Node {
                parent: Some(parent),
                last: loc,
                interval,
                elapsed: slot.end(),
                cost: p.cost + self.instance.cost(p.last, loc),
                visited,
                cursor: 0,
            };
            return Some(self.push_node(child));
        }
    }

    fn infertile(&self, node: usize) -> bool {
        self.nodes[node].cursor >= self.candidates.len()
    }

    fn leaf(&self, node: usize) -> bool {
        let n = &self.nodes[node];
        n.last == 0 && n.parent.is_some()
    }

    fn guide(&self, node: usize) -> f64 {
        self.nodes[node].cost
    }

    fn bound(&self, node: usize, incumbent: usize) -> bool {
        self.leaf(node)
            && self.leaf(incumbent)
            && self.nodes[incumbent].cost <= self.nodes[node].cost
    }

    fn better(&self, a: usize, b: usize) -> bool {
        self.leaf(a) && self.leaf(b) && self.nodes[a].cost < self.nodes[b].cost
    }

    fn equals(&self, a: usize, b: usize) -> bool {
        let mut x = Some(a);
        let mut y = Some(b);
        while let (Some(i), Some(j)) = (x, y) {
            let ni = &self.nodes[i];
            let nj = &self.nodes[j];
            if ni.last != nj.last || ni.interval != nj.interval {
                return false;
            }
            x = ni.parent;
            y = nj.parent;
        }
        x.is_none() && y.is_none()
    }

    fn bucket(&self, node: usize) -> TourBucket {
        let n = &self.nodes[node];
        TourBucket {
            last: n.last,
            interval: n.interval,
            cost_bits: n.cost.to_bits(),
            visited: n.visited.clone(),
        }
    }

    fn dominates(&self, a: usize, b: usize) -> bool {
        self.nodes[a].cost <= self.nodes[b].cost
    }
}
