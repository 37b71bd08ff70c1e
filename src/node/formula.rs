use core::str::FromStr;

use generational_arena::{Arena, Index};
use rust_decimal::Decimal;
use tracing::{debug, instrument, trace};

use crate::error::NodeError;
use super::{Arity, Container, NodeKind, NodeType, Slots};

/// A handle to one node of a [Formula]. Handles stay valid across edits elsewhere in the tree, and
/// become dangling (resolving to `None`) once their node is removed.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct NodeId(Index);

/// One entry of the node arena.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    slots: Option<Slots>,
}

impl Node {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// The container holding this node, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The slots of this node, if it is a container.
    pub fn container(&self) -> Option<&Slots> {
        self.slots.as_ref()
    }

    pub fn children(&self) -> Vec<NodeId> {
        self.slots.as_ref().map_or_else(Vec::new, Slots::to_vec)
    }

    pub fn child_count(&self) -> usize {
        self.slots.as_ref().map_or(0, Container::child_count)
    }

    pub fn is_container(&self) -> bool {
        self.slots.is_some()
    }

    pub fn is_unary_node(&self) -> bool {
        matches!(self.slots, Some(Slots::Unary(_)))
    }

    pub fn is_binary_node(&self) -> bool {
        matches!(self.slots, Some(Slots::Binary(_, _)))
    }

    pub fn is_flex_node(&self) -> bool {
        matches!(self.slots, Some(Slots::Flex(_)))
    }

    pub fn is_operation(&self) -> bool {
        self.node_type().is_operation()
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == NodeKind::Empty
    }
}

/// What was left behind in a slot after its node was taken out.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub(crate) enum Vacancy {
    /// The slot now holds this node.
    Filled(NodeId),

    /// The slot was removed from its flex container, shifting later children down.
    Closed { parent: NodeId, index: usize },
}

/// An expression tree. Every node is owned by exactly one slot of its parent, or is the root.
///
/// Cloning a formula copies the whole tree. Node handles of the original also address the
/// corresponding nodes of the copy, but the two trees are otherwise independent.
#[derive(Debug, Clone)]
pub struct Formula {
    arena: Arena<Node>,
    root: NodeId,
}

impl Default for Formula {
    fn default() -> Self {
        Self::new(NodeType::Empty)
    }
}

impl Formula {
    /// Creates a single-node formula. Containers are created with placeholders in their slots.
    pub fn new(node_type: NodeType) -> Self {
        Self::from_kind(node_type.default_kind())
    }

    /// Like [new](Formula::new), but with a payload.
    pub fn from_kind(kind: NodeKind) -> Self {
        let mut arena = Arena::new();
        let root = Self::alloc(&mut arena, kind, None);
        Self { arena, root }
    }

    /// Builds a formula bottom-up from a root payload and fully built child trees. The children
    /// must fit the arity of the root.
    pub fn compose(kind: NodeKind, children: Vec<Formula>) -> Result<Formula, NodeError> {
        let arity = kind.node_type().arity();
        let fits = match arity {
            Arity::Leaf => children.is_empty(),
            Arity::Unary => children.len() == 1,
            Arity::Binary => children.len() == 2,
            Arity::Flex => true,
        };
        if !fits {
            return Err(NodeError::ArityMismatch { arity, given: children.len() });
        }

        let mut arena = Arena::new();
        let root = NodeId(arena.insert(Node { kind, parent: None, slots: None }));
        let mut formula = Formula { arena, root };

        let ids = children.iter()
            .map(|child| formula.import(child, child.root, Some(root)))
            .collect::<Vec<_>>();
        if let Some(node) = formula.arena.get_mut(root.0) {
            node.slots = Slots::from_children(arity, &ids);
        }

        Ok(formula)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id.0)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(Node::kind)
    }

    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.node(id).map(Node::node_type)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.node(id)?.container()?.child(index)
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.node(id).map_or(0, Node::child_count)
    }

    /// The slot index of `id` within its parent.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.node(parent)?.container()?.index_of(id)
    }

    /// The number of nodes in the tree, placeholders included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// True when the whole formula is a single placeholder, as a fresh formula is.
    pub fn is_placeholder_root(&self) -> bool {
        self.node(self.root).map_or(true, Node::is_placeholder)
    }

    /// True if `ancestor` is `id` itself or lies on the path from `id` to the root.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    /// Every node of the subtree rooted at `id`, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = vec![];
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else { continue };
            result.push(current);
            stack.extend(node.children().into_iter().rev());
        }
        result
    }

    /// Finds the first node of the given type in pre-order.
    pub fn find(&self, node_type: NodeType) -> Option<NodeId> {
        self.descendants(self.root).into_iter()
            .find(|&id| self.node_type(id) == Some(node_type))
    }

    /// A deep copy of the subtree rooted at `id`, as a formula of its own.
    pub fn subtree(&self, id: NodeId) -> Option<Formula> {
        self.node(id)?;

        let mut copy = Formula::default();
        let placeholder = copy.root;
        copy.root = copy.import(self, id, None);
        copy.arena.remove(placeholder.0);
        Some(copy)
    }

    /// Structural equality between a subtree of this formula and a subtree of `other`.
    pub fn subtree_eq(&self, id: NodeId, other: &Formula, other_id: NodeId) -> bool {
        let (Some(a), Some(b)) = (self.node(id), other.node(other_id)) else {
            return false;
        };
        if a.kind != b.kind || a.child_count() != b.child_count() {
            return false;
        }

        a.children().into_iter()
            .zip(b.children())
            .all(|(x, y)| self.subtree_eq(x, other, y))
    }

    /// True when the whole formula is ready to be handed to a kernel: no placeholders remain and
    /// every literal is well-formed.
    pub fn is_valid(&self) -> bool {
        self.is_subtree_valid(self.root)
    }

    pub fn is_subtree_valid(&self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else { return false };

        let valid = match &node.kind {
            NodeKind::Empty => false,
            NodeKind::Number(text) => Decimal::from_str(text).is_ok(),
            NodeKind::Variable(v) => !v.name.is_empty(),
            NodeKind::Function(name) => !name.is_empty(),
            _ => true,
        };

        valid && node.children().into_iter().all(|c| self.is_subtree_valid(c))
    }

    /// Replaces the child in slot `index` of `parent` with `child`, discarding the previous
    /// occupant. If there is no such slot, `child` is discarded instead and the tree is unchanged.
    #[instrument(level = "trace", skip(self, child))]
    pub fn set_child(&mut self, parent: NodeId, index: usize, child: Formula) -> Result<NodeId, NodeError> {
        let count = self.node(parent).ok_or(NodeError::NotInTree)?.child_count();
        let Some(old) = self.child(parent, index) else {
            debug!(index, count, "rejected set_child, dropping offered node");
            return Err(NodeError::OutOfRange { index, count });
        };

        Ok(self.replace_subtree(old, &child))
    }

    /// Replaces the subtree rooted at `at` with a copy of `tree`, returning the root of the copy.
    /// This is how externally parsed results are merged into an existing formula.
    #[instrument(level = "trace", skip(self, tree))]
    pub fn graft(&mut self, at: NodeId, tree: &Formula) -> Result<NodeId, NodeError> {
        if !self.contains(at) {
            debug!("rejected graft, target not in tree");
            return Err(NodeError::NotInTree);
        }

        Ok(self.replace_subtree(at, tree))
    }

    /// Replaces the subtree rooted at `at` with a fresh node of the given kind, with placeholders in
    /// its slots.
    #[instrument(level = "trace", skip(self))]
    pub fn replace_node(&mut self, at: NodeId, kind: NodeKind) -> Result<NodeId, NodeError> {
        if !self.contains(at) {
            debug!("rejected replace, target not in tree");
            return Err(NodeError::NotInTree);
        }

        let new = Self::alloc(&mut self.arena, kind, None);
        self.swap_into_slot(at, new);
        self.drop_subtree(at);
        Ok(new)
    }

    /// Removes the subtree rooted at `id`. Its parent is told about it: a unary or binary parent
    /// gets a placeholder in the slot, a flex parent loses the slot. Deleting the root leaves a
    /// placeholder root.
    #[instrument(level = "trace", skip(self))]
    pub fn delete(&mut self, id: NodeId) -> Result<(), NodeError> {
        self.vacate(id).map(|_| ())
    }

    /// Inserts `child` into a flex container at slot `index`, shifting later children up.
    #[instrument(level = "trace", skip(self, child))]
    pub fn insert_child(&mut self, flex: NodeId, index: usize, child: &Formula) -> Result<NodeId, NodeError> {
        let node = self.node(flex).ok_or(NodeError::NotInTree)?;
        if !node.is_flex_node() {
            debug!("rejected insert_child on fixed-arity node");
            return Err(NodeError::NotFlex(node.node_type()));
        }
        let count = node.child_count();
        if index > count {
            return Err(NodeError::OutOfRange { index, count });
        }

        let new = self.import(child, child.root, Some(flex));
        if let Some(Slots::Flex(children)) = self.slots_mut(flex) {
            children.insert(index, new);
        }
        Ok(new)
    }

    /// Appends a placeholder slot to a flex container.
    pub fn push_placeholder(&mut self, flex: NodeId) -> Result<NodeId, NodeError> {
        let count = self.child_count(flex);
        self.insert_child(flex, count, &Formula::default())
    }

    /// Removes the child in slot `index`, like [delete](Formula::delete).
    pub fn remove_child(&mut self, parent: NodeId, index: usize) -> Result<(), NodeError> {
        let count = self.node(parent).ok_or(NodeError::NotInTree)?.child_count();
        let child = self.child(parent, index).ok_or(NodeError::OutOfRange { index, count })?;
        self.delete(child)
    }

    /// Makes the children of an argument list the arguments of a function, replacing whatever
    /// arguments the function had. The argument list is left with no children; if it was itself
    /// an argument of the function, it is discarded along with the old arguments.
    #[instrument(level = "trace", skip(self))]
    pub fn transfer_arguments(&mut self, function: NodeId, list: NodeId) -> Result<(), NodeError> {
        self.expect_type(function, NodeType::Function)?;
        self.expect_type(list, NodeType::ArgumentList)?;
        if self.is_ancestor(list, function) {
            debug!("rejected transfer_arguments, function is inside the list");
            return Err(NodeError::WouldCycle);
        }

        let arguments = self.node(list).map_or_else(Vec::new, Node::children);
        if let Some(slots) = self.slots_mut(list) {
            *slots = Slots::Flex(vec![]);
        }

        let old = self.node(function).map_or_else(Vec::new, Node::children);
        for &argument in &arguments {
            if let Some(node) = self.arena.get_mut(argument.0) {
                node.parent = Some(function);
            }
        }
        if let Some(slots) = self.slots_mut(function) {
            *slots = Slots::Flex(arguments);
        }
        for child in old {
            self.drop_subtree(child);
        }

        Ok(())
    }

    pub(crate) fn expect_type(&self, id: NodeId, expected: NodeType) -> Result<(), NodeError> {
        let found = self.node_type(id).ok_or(NodeError::NotInTree)?;
        if found != expected {
            return Err(NodeError::WrongType { expected, found });
        }
        Ok(())
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        self.arena.get_mut(id.0).map(|n| &mut n.kind)
    }

    /// Takes `id` out of the tree and reports what filled its place.
    pub(crate) fn vacate(&mut self, id: NodeId) -> Result<Vacancy, NodeError> {
        let parent = self.node(id).ok_or(NodeError::NotInTree)?.parent;

        match parent {
            Some(p) if self.node(p).is_some_and(Node::is_flex_node) => {
                let index = self.index_in_parent(id).ok_or(NodeError::NotInTree)?;
                if let Some(Slots::Flex(children)) = self.slots_mut(p) {
                    children.remove(index);
                }
                self.drop_subtree(id);
                trace!(?p, index, "closed flex slot");
                Ok(Vacancy::Closed { parent: p, index })
            }
            _ => {
                let placeholder = Self::alloc(&mut self.arena, NodeKind::Empty, None);
                self.swap_into_slot(id, placeholder);
                self.drop_subtree(id);
                Ok(Vacancy::Filled(placeholder))
            }
        }
    }

    /// Replaces `id` with its child `keep`, discarding the rest of `id`'s subtree.
    pub(crate) fn splice(&mut self, id: NodeId, keep: NodeId) -> Result<NodeId, NodeError> {
        if self.parent(keep) != Some(id) {
            return Err(NodeError::NotInTree);
        }
        let index = self.index_in_parent(keep).ok_or(NodeError::NotInTree)?;

        let placeholder = Self::alloc(&mut self.arena, NodeKind::Empty, Some(id));
        if let Some(slots) = self.slots_mut(id) {
            slots.set(index, placeholder);
        }
        self.swap_into_slot(id, keep);
        self.drop_subtree(id);
        Ok(keep)
    }

    /// Puts a new container of the given kind into `id`'s slot, and moves `id` into the new
    /// container's first slot (or last, if `into_last` is set).
    pub(crate) fn wrap(&mut self, id: NodeId, kind: NodeKind, into_last: bool) -> Result<NodeId, NodeError> {
        let node_type = kind.node_type();
        if !self.contains(id) {
            return Err(NodeError::NotInTree);
        }
        if !node_type.is_container() {
            return Err(NodeError::CannotAdopt(node_type));
        }

        let new = Self::alloc(&mut self.arena, kind, None);
        self.swap_into_slot(id, new);

        let index = if into_last { self.child_count(new).saturating_sub(1) } else { 0 };
        let previous = self.slots_mut(new).and_then(|slots| slots.set(index, id));
        if let Some(node) = self.arena.get_mut(id.0) {
            node.parent = Some(new);
        }
        if let Some(previous) = previous {
            self.drop_subtree(previous);
        }

        Ok(new)
    }

    /// Creates a node in `arena`, with placeholders in any slots it has.
    fn alloc(arena: &mut Arena<Node>, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let node_type = kind.node_type();
        let id = NodeId(arena.insert(Node { kind, parent, slots: None }));

        if node_type.is_container() {
            let children = (0..node_type.initial_slots())
                .map(|_| NodeId(arena.insert(Node { kind: NodeKind::Empty, parent: Some(id), slots: None })))
                .collect::<Vec<_>>();
            if let Some(node) = arena.get_mut(id.0) {
                node.slots = Slots::from_children(node_type.arity(), &children);
            }
        }

        id
    }

    /// Copies the subtree rooted at `id` of `other` into this arena, below `parent`. The copy is
    /// not placed into any slot of `parent`; that is up to the caller.
    fn import(&mut self, other: &Formula, id: NodeId, parent: Option<NodeId>) -> NodeId {
        let Some(source) = other.node(id) else {
            return Self::alloc(&mut self.arena, NodeKind::Empty, parent);
        };

        let new = NodeId(self.arena.insert(Node { kind: source.kind.clone(), parent, slots: None }));
        if let Some(slots) = &source.slots {
            let children = slots.to_vec().into_iter()
                .map(|child| self.import(other, child, Some(new)))
                .collect::<Vec<_>>();
            if let Some(node) = self.arena.get_mut(new.0) {
                node.slots = Slots::from_children(slots.arity(), &children);
            }
        }

        new
    }

    fn replace_subtree(&mut self, old: NodeId, tree: &Formula) -> NodeId {
        let new = self.import(tree, tree.root, None);
        self.swap_into_slot(old, new);
        self.drop_subtree(old);
        new
    }

    /// Moves `new` into the slot held by `old` (or makes it the root). `old` is detached but still
    /// allocated.
    fn swap_into_slot(&mut self, old: NodeId, new: NodeId) {
        let parent = self.parent(old);
        match parent {
            Some(p) => {
                let index = self.index_in_parent(old);
                if let (Some(index), Some(slots)) = (index, self.slots_mut(p)) {
                    slots.set(index, new);
                }
            }
            None => self.root = new,
        }

        if let Some(node) = self.arena.get_mut(new.0) {
            node.parent = parent;
        }
        if let Some(node) = self.arena.get_mut(old.0) {
            node.parent = None;
        }
    }

    fn drop_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.arena.remove(id.0) {
            for child in node.children() {
                self.drop_subtree(child);
            }
        }
    }

    fn slots_mut(&mut self, id: NodeId) -> Option<&mut Slots> {
        self.arena.get_mut(id.0).and_then(|n| n.slots.as_mut())
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.subtree_eq(self.root, other, other.root)
    }
}

impl Eq for Formula {}
