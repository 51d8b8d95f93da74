//! Lane Planner
//!
//! Partitions a batch into lanes: connected components of the "shares a
//! ledger key" relation, found with a disjoint-set forest. Each lane lists
//! its operations in chain order; lanes are independent of each other.

use std::collections::HashMap;

use ix_01_validation::LocatedOperation;

use crate::domain::keys::{ledger_keys, LedgerKey};

/// One lane: indices into the planned batch, in chain order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lane {
    pub operations: Vec<usize>,
}

/// Union-find with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}

/// Group `batch` into lanes.
///
/// Operations are visited by `(block_height, tx_index)`, ties kept in input
/// order. Lanes come back ordered by their earliest operation.
pub fn plan_lanes(batch: &[LocatedOperation]) -> Vec<Lane> {
    let mut order: Vec<usize> = (0..batch.len()).collect();
    order.sort_by_key(|&i| batch[i].location);

    let mut sets = DisjointSet::new(batch.len());
    let mut first_owner: HashMap<LedgerKey, usize> = HashMap::new();
    for &i in &order {
        for key in ledger_keys(&batch[i].operation) {
            match first_owner.get(&key) {
                Some(&owner) => sets.union(owner, i),
                None => {
                    first_owner.insert(key, i);
                }
            }
        }
    }

    let mut lanes: Vec<Lane> = Vec::new();
    let mut lane_of_root: HashMap<usize, usize> = HashMap::new();
    for &i in &order {
        let root = sets.find(i);
        let lane = *lane_of_root.entry(root).or_insert_with(|| {
            lanes.push(Lane {
                operations: Vec::new(),
            });
            lanes.len() - 1
        });
        lanes[lane].operations.push(i);
    }
    lanes
}
