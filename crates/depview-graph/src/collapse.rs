use crate::tree_model::TreeModel;
use depview_core::NodeId;
use std::collections::{HashMap, HashSet};

/// Hidden node -> top-level master that currently stands in for it.
pub type HiddenNodeMap = HashMap<NodeId, NodeId>;

/// One collapsed group: a master node plus everything folded behind it.
///
/// Both member lists are private copies taken at construction, so later changes to
/// the caller's collections never leak into an existing group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseData {
    master: NodeId,
    children_nodes: Vec<NodeId>,
    children_collapse: Vec<CollapseData>,
}

impl CollapseData {
    pub fn new(
        master: NodeId,
        children_nodes: &[NodeId],
        children_collapse: impl IntoIterator<Item = CollapseData>,
    ) -> Self {
        Self {
            master,
            children_nodes: children_nodes.to_vec(),
            children_collapse: children_collapse.into_iter().collect(),
        }
    }

    pub fn master_node(&self) -> NodeId {
        self.master
    }

    /// Plain nodes folded directly into this group.
    pub fn children_nodes(&self) -> &[NodeId] {
        &self.children_nodes
    }

    /// Groups that were top-level before this one absorbed them.
    pub fn children_collapse(&self) -> &[CollapseData] {
        &self.children_collapse
    }

    /// Direct members plus the members (and masters) of every nested group.
    pub fn member_nodes(&self) -> Vec<NodeId> {
        let mut result = Vec::new();
        self.collect_members(&mut result);
        result
    }

    fn collect_members(&self, result: &mut Vec<NodeId>) {
        result.extend_from_slice(&self.children_nodes);
        for nested in &self.children_collapse {
            result.push(nested.master);
            nested.collect_members(result);
        }
    }

    /// Remove the group headed by `master` from anywhere below this one.
    fn detach_nested(&mut self, master: NodeId) -> Option<CollapseData> {
        if let Some(index) = self
            .children_collapse
            .iter()
            .position(|nested| nested.master == master)
        {
            return Some(self.children_collapse.remove(index));
        }
        self.children_collapse
            .iter_mut()
            .find_map(|nested| nested.detach_nested(master))
    }
}

/// Registry of the currently top-level collapse groups, keyed by master.
///
/// A master nested inside another group is never a top-level key at the same time.
/// Groups remember the order they were registered in; when two groups share a member,
/// the earlier one claims it. Single owner only; callers must serialize access.
#[derive(Debug, Clone, Default)]
pub struct Collapser {
    collapsed: HashMap<NodeId, CollapseData>,
    order: Vec<NodeId>,
}

impl Collapser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.collapsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collapsed.is_empty()
    }

    pub fn is_master(&self, node: NodeId) -> bool {
        self.collapsed.contains_key(&node)
    }

    /// Top-level masters in registration order.
    pub fn masters(&self) -> &[NodeId] {
        &self.order
    }

    pub fn get_collapse_data(&self, master: NodeId) -> Option<&CollapseData> {
        self.collapsed.get(&master)
    }

    fn take_top_level(&mut self, master: NodeId) -> Option<(usize, CollapseData)> {
        let slot = self.order.iter().position(|&node| node == master)?;
        self.order.remove(slot);
        let data = self.collapsed.remove(&master)?;
        Some((slot, data))
    }

    /// Fold `picked` behind `master`.
    ///
    /// Any picked node that is itself a top-level master moves, group and all, into
    /// the new group's nested list. If `master` already heads a group nested somewhere
    /// else, that copy is detached first; a top-level group it already heads is
    /// replaced in place. The master need not be one of the picked nodes.
    /// `erase` is accepted for callers that pass it but has no effect on the result.
    pub fn collapse(
        &mut self,
        master: NodeId,
        picked: &[NodeId],
        erase: bool,
    ) -> &CollapseData {
        let mut nested: Vec<CollapseData> = picked
            .iter()
            .filter_map(|&node| self.take_top_level(node).map(|(_, data)| data))
            .collect();

        tracing::trace!(
            master = master.0,
            picked = picked.len(),
            nested = nested.len(),
            erase,
            "collapse"
        );

        for parent in self.collapsed.values_mut().chain(nested.iter_mut()) {
            if parent.detach_nested(master).is_some() {
                tracing::debug!(
                    "Detached group {} from enclosing group {}",
                    master,
                    parent.master
                );
            }
        }

        let data = CollapseData::new(master, picked, nested);
        if self.collapsed.insert(master, data).is_some() {
            tracing::debug!("Replaced existing collapse group for master {}", master);
        } else {
            self.order.push(master);
        }
        &self.collapsed[&master]
    }

    /// Remove the group headed by `master` and re-promote its nested groups.
    ///
    /// Restored groups take the removed group's place in registration order.
    /// `delete_group` is accepted but nested groups are always restored.
    pub fn uncollapse(&mut self, master: NodeId, delete_group: bool) -> Option<CollapseData> {
        let Some((slot, data)) = self.take_top_level(master) else {
            tracing::debug!("No collapse group for master {}", master);
            return None;
        };

        tracing::trace!(
            master = master.0,
            restored = data.children_collapse.len(),
            delete_group,
            "uncollapse"
        );

        for (offset, nested) in data.children_collapse.iter().enumerate() {
            self.collapsed.insert(nested.master, nested.clone());
            self.order.insert(slot + offset, nested.master);
        }
        Some(data)
    }

    /// Map every hidden member, however deeply nested, to its top-level master.
    ///
    /// Top-level masters are never hidden. A member shared by several groups goes to
    /// the group registered first.
    pub fn build_hidden_node_map(&self) -> HiddenNodeMap {
        let mut result = HiddenNodeMap::new();
        for &master in &self.order {
            let Some(data) = self.collapsed.get(&master) else {
                continue;
            };
            for member in data.member_nodes() {
                if !self.collapsed.contains_key(&member) {
                    result.entry(member).or_insert(master);
                }
            }
        }
        result
    }

    pub fn get_master_node_set(&self) -> HashSet<NodeId> {
        self.collapsed.keys().copied().collect()
    }

    pub fn add_master_nodes(&self, dest: &mut impl Extend<NodeId>) {
        dest.extend(self.order.iter().copied());
    }

    /// Collapse every interior node with its successors, deepest first.
    ///
    /// Walking the post-order means a node's successors are grouped before the node
    /// itself, so each group ends up nested inside its ancestor's group.
    pub fn collapse_tree(&mut self, tree: &TreeModel, universe: &[NodeId]) {
        for master in tree.topo_sort(universe) {
            let mut picked = vec![master];
            picked.extend(
                tree.successors_of(master)
                    .into_iter()
                    .filter(|&node| node != master),
            );
            self.collapse(master, &picked, false);
        }
    }
}
