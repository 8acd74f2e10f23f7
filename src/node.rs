//! Game tree nodes for the minimax search.
//!
//! A node owns its board and one optional child per pit. A slot is `None`
//! when sowing from that pit is illegal or the node has not been expanded.
//! Dropping a node drops its whole subtree, so a tree built by one search
//! iteration is released as soon as its root goes out of scope.

use crate::board::Board;
use crate::constants::PITS;

/// A node in the minimax search tree.
#[derive(Debug)]
pub struct Node {
    /// The position at this node
    pub board: Board,
    /// Value propagated by the last search through this node, from side 0's view
    pub utility: i32,
    /// Child reached by sowing each pit, indexed by pit
    children: [Option<Box<Node>>; PITS],
}

impl Default for Node {
    fn default() -> Self {
        Self::new(&Board::new())
    }
}

impl Node {
    /// Create an unexpanded node holding a copy of `board`.
    pub fn new(board: &Board) -> Self {
        Self {
            board: board.clone(),
            utility: 0,
            children: std::array::from_fn(|_| None),
        }
    }

    /// True when no child slot is occupied.
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub fn child(&self, pit: usize) -> Option<&Node> {
        self.children.get(pit)?.as_deref()
    }

    pub(crate) fn child_mut(&mut self, pit: usize) -> Option<&mut Node> {
        self.children.get_mut(pit)?.as_deref_mut()
    }

    /// Fill or clear the slot for `pit`, dropping whatever subtree was there.
    pub(crate) fn set_child(&mut self, pit: usize, child: Option<Node>) {
        self.children[pit] = child.map(Box::new);
    }

    /// Present children with the pit that produced them, in pit order.
    pub fn children(&self) -> impl Iterator<Item = (usize, &Node)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(pit, child)| child.as_deref().map(|node| (pit, node)))
    }

    /// The child with the strictly greatest utility; ties keep the lowest pit.
    pub fn best_child(&self) -> Option<(usize, &Node)> {
        self.children().fold(None, |best, (pit, node)| match best {
            Some((_, current)) if node.utility <= current.utility => best,
            _ => Some((pit, node)),
        })
    }

    /// Number of nodes in this subtree, this node included.
    pub fn size(&self) -> usize {
        1 + self.children().map(|(_, child)| child.size()).sum::<usize>()
    }
}
