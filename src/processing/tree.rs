//! Subnet tree built by repeated splitting.
//!
//! Nodes own their children by value. The block's CIDR identifies a node: no
//! two nodes of one tree share a network address and prefix. Display state
//! such as "expanded" is kept by the caller, keyed by that CIDR.

use super::split::split_subnet;
use crate::error::Result;
use crate::models::{calculate_subnet, Cidr, SubnetInfo};
use std::collections::HashSet;

/// Number of nodes in the tree rooted at `node`, itself included.
pub fn count_nodes(node: &SubnetInfo) -> usize {
    1 + node
        .children
        .as_ref()
        .map_or(0, |c| count_nodes(&c[0]) + count_nodes(&c[1]))
}

/// Every node in pre-order, lower half before upper half.
pub fn collect_all(node: &SubnetInfo) -> Vec<&SubnetInfo> {
    let mut out = Vec::new();
    walk_all(node, &mut out);
    out
}

fn walk_all<'a>(node: &'a SubnetInfo, out: &mut Vec<&'a SubnetInfo>) {
    out.push(node);
    if let Some(children) = &node.children {
        for child in children.iter() {
            walk_all(child, out);
        }
    }
}

/// Nodes a tree view would show, in pre-order.
///
/// With `hide_parents`, a split node is replaced by its descendants. Otherwise
/// a node is shown and its children follow only if it is in `expanded`.
pub fn collect_visible<'a>(
    node: &'a SubnetInfo,
    hide_parents: bool,
    expanded: &HashSet<Cidr>,
) -> Vec<&'a SubnetInfo> {
    let mut out = Vec::new();
    walk_visible(node, hide_parents, expanded, &mut out);
    out
}

fn walk_visible<'a>(
    node: &'a SubnetInfo,
    hide_parents: bool,
    expanded: &HashSet<Cidr>,
    out: &mut Vec<&'a SubnetInfo>,
) {
    match &node.children {
        Some(children) if hide_parents => {
            for child in children.iter() {
                walk_visible(child, hide_parents, expanded, out);
            }
        }
        Some(children) => {
            out.push(node);
            if expanded.contains(&node.cidr) {
                for child in children.iter() {
                    walk_visible(child, hide_parents, expanded, out);
                }
            }
        }
        None => out.push(node),
    }
}

/// A split tree with its node count kept alongside, so the size cap can be
/// checked without walking the tree on every split.
#[derive(Debug, Clone)]
pub struct SubnetTree {
    root: SubnetInfo,
    node_count: usize,
}

impl SubnetTree {
    /// Start a tree from a CIDR string.
    pub fn new(cidr: &str) -> Result<SubnetTree> {
        Ok(SubnetTree::from_info(calculate_subnet(cidr)?))
    }

    pub fn from_info(root: SubnetInfo) -> SubnetTree {
        let node_count = count_nodes(&root);
        SubnetTree { root, node_count }
    }

    pub fn root(&self) -> &SubnetInfo {
        &self.root
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn find(&self, cidr: &Cidr) -> Option<&SubnetInfo> {
        find_node(&self.root, &cidr.canonical())
    }

    fn find_mut(&mut self, cidr: &Cidr) -> Option<&mut SubnetInfo> {
        find_node_mut(&mut self.root, &cidr.canonical())
    }

    /// Split the node identified by `cidr`. Returns false when no such node
    /// exists or it is already split.
    pub fn split(&mut self, cidr: &Cidr) -> Result<bool> {
        let size = self.node_count;
        let node = match self.find_mut(cidr) {
            Some(node) if !node.is_split() => node,
            _ => return Ok(false),
        };
        let children = split_subnet(node, size)?;
        node.children = Some(Box::new(children));
        self.node_count += 2;
        Ok(true)
    }

    /// Drop every descendant of the node identified by `cidr`.
    pub fn join(&mut self, cidr: &Cidr) -> bool {
        let Some(node) = self.find_mut(cidr) else {
            return false;
        };
        let Some(children) = node.children.take() else {
            return false;
        };
        let removed = count_nodes(&children[0]) + count_nodes(&children[1]);
        self.node_count -= removed;
        true
    }

    /// Split the node and its descendants `levels` levels deep. Host routes
    /// (/32) are left as leaves. Stops at the first error, keeping the splits
    /// made so far.
    pub fn split_to_depth(&mut self, cidr: &Cidr, levels: u8) -> Result<()> {
        let mut frontier = vec![cidr.canonical()];
        for _ in 0..levels {
            let mut next = Vec::new();
            for node_cidr in frontier {
                let splittable = self.find(&node_cidr).is_some_and(|n| n.can_split);
                if !splittable {
                    continue;
                }
                self.split(&node_cidr)?;
                if let Some(children) = self.find(&node_cidr).and_then(|n| n.children.as_ref()) {
                    next.extend(children.iter().map(|c| c.cidr));
                }
            }
            frontier = next;
        }
        Ok(())
    }

    pub fn collect_all(&self) -> Vec<&SubnetInfo> {
        collect_all(&self.root)
    }

    pub fn collect_visible(
        &self,
        hide_parents: bool,
        expanded: &HashSet<Cidr>,
    ) -> Vec<&SubnetInfo> {
        collect_visible(&self.root, hide_parents, expanded)
    }
}

fn descends(node: &SubnetInfo, target: &Cidr) -> bool {
    node.prefix <= target.prefix() && node.cidr.contains(target.addr())
}

fn find_node<'a>(node: &'a SubnetInfo, target: &Cidr) -> Option<&'a SubnetInfo> {
    if node.cidr == *target {
        return Some(node);
    }
    let child = node.children.as_ref()?.iter().find(|c| descends(c, target))?;
    find_node(child, target)
}

fn find_node_mut<'a>(node: &'a mut SubnetInfo, target: &Cidr) -> Option<&'a mut SubnetInfo> {
    if node.cidr == *target {
        return Some(node);
    }
    let child = node
        .children
        .as_mut()?
        .iter_mut()
        .find(|c| descends(c, target))?;
    find_node_mut(child, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CidrError;
    use crate::processing::MAX_TREE_NODES;

    fn cidr(s: &str) -> Cidr {
        Cidr::parse(s).unwrap()
    }

    fn names(nodes: &[&SubnetInfo]) -> Vec<String> {
        nodes.iter().map(|n| n.cidr.to_string()).collect()
    }

    #[test]
    fn test_split_and_count() {
        let mut tree = SubnetTree::new("10.0.0.0/24").unwrap();
        assert_eq!(tree.node_count(), 1);
        assert!(tree.split(&cidr("10.0.0.0/24")).unwrap());
        assert!(tree.split(&cidr("10.0.0.128/25")).unwrap());
        assert_eq!(tree.node_count(), 5);
        assert_eq!(count_nodes(tree.root()), 5);
        // already split
        assert!(!tree.split(&cidr("10.0.0.0/24")).unwrap());
        // not in tree
        assert!(!tree.split(&cidr("10.0.1.0/25")).unwrap());
        assert_eq!(
            names(&tree.collect_all()),
            vec![
                "10.0.0.0/24",
                "10.0.0.0/25",
                "10.0.0.128/25",
                "10.0.0.128/26",
                "10.0.0.192/26"
            ]
        );
    }

    #[test]
    fn test_find() {
        let mut tree = SubnetTree::new("10.0.0.0/24").unwrap();
        tree.split_to_depth(&cidr("10.0.0.0/24"), 3).unwrap();
        assert_eq!(tree.node_count(), 15);
        let node = tree.find(&cidr("10.0.0.96/27")).unwrap();
        assert_eq!(node.broadcast.to_string(), "10.0.0.127");
        assert!(tree.find(&cidr("10.0.0.96/28")).is_none());
        assert!(tree.find(&cidr("10.0.1.0/24")).is_none());
    }

    #[test]
    fn test_join() {
        let mut tree = SubnetTree::new("10.0.0.0/24").unwrap();
        tree.split_to_depth(&cidr("10.0.0.0/24"), 2).unwrap();
        assert_eq!(tree.node_count(), 7);
        assert!(tree.join(&cidr("10.0.0.0/25")));
        assert_eq!(tree.node_count(), 5);
        assert!(!tree.join(&cidr("10.0.0.0/25")));
        assert!(tree.join(&cidr("10.0.0.0/24")));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_split_to_depth_stops_at_hosts() {
        let mut tree = SubnetTree::new("10.0.0.0/31").unwrap();
        tree.split_to_depth(&cidr("10.0.0.0/31"), 4).unwrap();
        assert_eq!(tree.node_count(), 3);
        assert_eq!(
            tree.split(&cidr("10.0.0.1/32")).unwrap_err(),
            CidrError::CannotSplit("10.0.0.1/32".to_string())
        );
    }

    #[test]
    fn test_collect_visible() {
        let mut tree = SubnetTree::new("192.168.0.0/24").unwrap();
        tree.split(&cidr("192.168.0.0/24")).unwrap();
        tree.split(&cidr("192.168.0.0/25")).unwrap();

        let none = HashSet::new();
        assert_eq!(names(&tree.collect_visible(false, &none)), vec!["192.168.0.0/24"]);

        let expanded: HashSet<Cidr> = [cidr("192.168.0.0/24")].into_iter().collect();
        assert_eq!(
            names(&tree.collect_visible(false, &expanded)),
            vec!["192.168.0.0/24", "192.168.0.0/25", "192.168.0.128/25"]
        );

        assert_eq!(
            names(&tree.collect_visible(true, &none)),
            vec!["192.168.0.0/26", "192.168.0.64/26", "192.168.0.128/25"]
        );
    }

    #[test]
    fn test_tree_size_cap_checked_before_split() {
        // Trees from one root always hold an odd count. The split at 9_999
        // nodes still passes the `>= MAX_TREE_NODES` check and lands on
        // 10_001, so the cap can be overshot by exactly one node, never more.
        let mut tree = SubnetTree::new("10.0.0.0/8").unwrap();
        let mut frontier = vec![tree.root().cidr];
        let err = loop {
            let node = frontier.remove(0);
            match tree.split(&node) {
                Ok(_) => {
                    let children = tree.find(&node).and_then(|n| n.children.as_ref()).unwrap();
                    frontier.extend(children.iter().map(|c| c.cidr));
                }
                Err(e) => break e,
            }
        };
        assert_eq!(
            err,
            CidrError::TreeSizeLimitExceeded {
                size: 10_001,
                limit: MAX_TREE_NODES
            }
        );
        assert_eq!(tree.node_count(), MAX_TREE_NODES + 1);
        assert_eq!(count_nodes(tree.root()), MAX_TREE_NODES + 1);
        // a refused split leaves the tree untouched
        assert!(tree.split(&frontier[0]).is_err());
        assert_eq!(count_nodes(tree.root()), MAX_TREE_NODES + 1);
    }
}
