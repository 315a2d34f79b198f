use std::rc::Rc;

use goap_core::WorldState;

use crate::ActionId;

/// One position in the search tree.
///
/// Nodes are immutable once built. Children share their ancestors through `Rc`, so the winning
/// leaf keeps exactly its own chain alive after the rest of the tree is dropped.
#[derive(Debug)]
pub struct Node {
    parent: Option<Rc<Node>>,
    action: Option<ActionId>,
    precondition: usize,
    cost: u32,
    world: WorldState,
}

impl Node {
    pub fn root(world: WorldState) -> Self {
        Self {
            parent: None,
            action: None,
            precondition: 0,
            cost: 0,
            world,
        }
    }

    pub fn child(
        parent: Rc<Node>,
        action: ActionId,
        precondition: usize,
        cost: u32,
        world: WorldState,
    ) -> Self {
        Self {
            parent: Some(parent),
            action: Some(action),
            precondition,
            cost,
            world,
        }
    }

    pub fn parent(&self) -> Option<&Node> {
        self.parent.as_deref()
    }

    pub fn action(&self) -> Option<ActionId> {
        self.action
    }

    pub fn precondition(&self) -> usize {
        self.precondition
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of actions between the root and this node.
    pub fn depth(&self) -> usize {
        self.path().len() - 1
    }

    /// Chain from the root down to this node, inclusive.
    pub fn path(&self) -> Vec<&Node> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(node) = current {
            chain.push(node);
            current = node.parent();
        }
        chain.reverse();
        chain
    }
}
