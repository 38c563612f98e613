//! Referential graph
//!
//! Parent → child foreign-key edges between the entities a customer owns.
//! The orchestrator walks this data; adding a dependent table means adding
//! an edge here, not new delete code.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

/// Entities that take part in cascades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Entity {
    Customer,
    DietaryRestriction,
    Reservation,
    DiningSession,
    Feedback,
    Order,
    OrderDetail,
}

impl Entity {
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Customer => "customers",
            Self::DietaryRestriction => "dietary_restrictions",
            Self::Reservation => "reservations",
            Self::DiningSession => "dining_sessions",
            Self::Feedback => "feedback",
            Self::Order => "orders",
            Self::OrderDetail => "order_details",
        }
    }

    pub const fn primary_key(&self) -> &'static str {
        match self {
            Self::Customer => "customer_id",
            Self::DietaryRestriction => "restriction_id",
            Self::Reservation => "reservation_id",
            Self::DiningSession => "session_id",
            Self::Feedback => "feedback_id",
            Self::Order => "order_id",
            Self::OrderDetail => "detail_id",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// `child.foreign_key` references `parent.primary_key`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub parent: Entity,
    pub child: Entity,
    pub foreign_key: &'static str,
}

impl Edge {
    pub const fn new(parent: Entity, child: Entity, foreign_key: &'static str) -> Self {
        Self {
            parent,
            child,
            foreign_key,
        }
    }
}

/// Customer-owned dependency edges. List order carries no deletion
/// precedence; [`ReferentialGraph::deletion_plan`] derives it.
pub const RESTAURANT_EDGES: &[Edge] = &[
    Edge::new(Entity::Customer, Entity::DietaryRestriction, "customer_id"),
    Edge::new(Entity::Customer, Entity::Reservation, "customer_id"),
    Edge::new(Entity::Reservation, Entity::DiningSession, "reservation_id"),
    Edge::new(Entity::DiningSession, Entity::Feedback, "session_id"),
    Edge::new(Entity::DiningSession, Entity::Order, "session_id"),
    Edge::new(Entity::Order, Entity::OrderDetail, "order_id"),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("dependency cycle reachable from {0}")]
    Cycle(Entity),
}

/// One entity in a plan, with the edges through which its rows are found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    pub entity: Entity,
    /// Longest path from the root
    pub depth: usize,
    /// Incoming edges from other entities in the plan
    pub via: Vec<Edge>,
}

/// Entities reachable from a root, ordered parents-first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPlan {
    root: Entity,
    steps: Vec<PlanStep>,
}

impl DeletionPlan {
    pub fn root(&self) -> Entity {
        self.root
    }

    /// Ascending depth: the order in which dependent ids are resolved.
    /// The root is first.
    pub fn resolution_order(&self) -> impl Iterator<Item = &PlanStep> {
        self.steps.iter()
    }

    /// Descending depth: every child is deleted before any of its parents.
    /// The root is last.
    pub fn deletion_order(&self) -> impl Iterator<Item = &PlanStep> {
        self.steps.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Immutable edge list consulted by the cascade orchestrator
#[derive(Debug, Clone, Copy)]
pub struct ReferentialGraph {
    edges: &'static [Edge],
}

impl Default for ReferentialGraph {
    fn default() -> Self {
        Self::restaurant()
    }
}

impl ReferentialGraph {
    pub const fn new(edges: &'static [Edge]) -> Self {
        Self { edges }
    }

    pub const fn restaurant() -> Self {
        Self::new(RESTAURANT_EDGES)
    }

    pub fn edges(&self) -> &[Edge] {
        self.edges
    }

    pub fn children(&self, parent: Entity) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.parent == parent)
    }

    /// Order the subgraph reachable from `root` by longest-path depth
    /// (Kahn's algorithm restricted to reachable nodes). Ties keep
    /// first-seen order.
    pub fn deletion_plan(&self, root: Entity) -> Result<DeletionPlan, GraphError> {
        // Reachable set
        let mut reachable = BTreeSet::from([root]);
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            for edge in self.children(node) {
                if reachable.insert(edge.child) {
                    stack.push(edge.child);
                }
            }
        }

        let edges: Vec<&Edge> = self
            .edges
            .iter()
            .filter(|e| reachable.contains(&e.parent))
            .collect();

        let mut in_degree: BTreeMap<Entity, usize> =
            reachable.iter().map(|&n| (n, 0)).collect();
        for edge in &edges {
            *in_degree.entry(edge.child).or_default() += 1;
        }
        if in_degree.get(&root).copied().unwrap_or(0) > 0 {
            return Err(GraphError::Cycle(root));
        }

        let mut depth: BTreeMap<Entity, usize> = BTreeMap::from([(root, 0)]);
        let mut queue = VecDeque::from([root]);
        let mut steps = Vec::with_capacity(reachable.len());

        while let Some(node) = queue.pop_front() {
            let node_depth = depth.get(&node).copied().unwrap_or(0);
            steps.push(PlanStep {
                entity: node,
                depth: node_depth,
                via: edges
                    .iter()
                    .filter(|e| e.child == node)
                    .map(|e| **e)
                    .collect(),
            });

            for edge in edges.iter().filter(|e| e.parent == node) {
                let d = depth.entry(edge.child).or_default();
                *d = (*d).max(node_depth + 1);
                if let Some(remaining) = in_degree.get_mut(&edge.child) {
                    *remaining -= 1;
                    if *remaining == 0 {
                        queue.push_back(edge.child);
                    }
                }
            }
        }

        if steps.len() != reachable.len() {
            return Err(GraphError::Cycle(root));
        }

        // Kahn already yields parents first; make depth monotonic for siblings
        // that became ready in different rounds.
        steps.sort_by_key(|s| s.depth);

        Ok(DeletionPlan { root, steps })
    }
}
