// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Detached sanitized tree
//!
//! An arena of nodes keyed by [`NodeId`]. The sanitizer mutates the tree in
//! place during its walk (subtree removal, unwrapping, attribute edits).
//! Sanitize calls are synchronous and single-threaded, so the arena carries
//! no locks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a new unique node ID
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Root of a detached fragment
    Fragment,
    /// Element node
    Element,
    /// Text node
    Text,
    /// Comment node
    Comment,
}

/// Internal node data
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Node type
    pub node_type: NodeType,
    /// Tag name (for elements, lowercase)
    pub tag_name: Option<String>,
    /// Text content (for text/comment nodes)
    pub text: Option<String>,
    /// Attributes in source order (lowercase names)
    pub attributes: Vec<(String, String)>,
    /// Parent node ID
    pub parent: Option<NodeId>,
    /// Child node IDs in order
    pub children: Vec<NodeId>,
}

impl NodeData {
    fn empty(node_type: NodeType) -> Self {
        Self {
            node_type,
            tag_name: None,
            text: None,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create element node data
    pub fn element(tag_name: impl Into<String>) -> Self {
        let mut data = Self::empty(NodeType::Element);
        data.tag_name = Some(tag_name.into().to_lowercase());
        data
    }

    /// Create text node data
    pub fn text(content: impl Into<String>) -> Self {
        let mut data = Self::empty(NodeType::Text);
        data.text = Some(content.into());
        data
    }

    /// Create comment node data
    pub fn comment(content: impl Into<String>) -> Self {
        let mut data = Self::empty(NodeType::Comment);
        data.text = Some(content.into());
        data
    }
}

/// A detached, owned tree of sanitized (or not-yet-sanitized) nodes
#[derive(Debug, Clone)]
pub struct Fragment {
    nodes: HashMap<NodeId, NodeData>,
    root: NodeId,
}

impl Default for Fragment {
    fn default() -> Self {
        Self::new()
    }
}

impl Fragment {
    /// Create an empty fragment
    pub fn new() -> Self {
        let root = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root, NodeData::empty(NodeType::Fragment));
        Self { nodes, root }
    }

    /// The fragment root (never an element)
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Insert a node and attach it as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, mut data: NodeData) -> NodeId {
        let id = NodeId::new();
        data.parent = Some(parent);
        self.nodes.insert(id, data);
        if let Some(parent_data) = self.nodes.get_mut(&parent) {
            parent_data.children.push(id);
        }
        id
    }

    /// Read access to a node
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(&id)
    }

    /// Mutable access to a node
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(&id)
    }

    /// Node type, if the node exists
    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.nodes.get(&id).map(|n| n.node_type)
    }

    /// Lowercase tag name of an element node
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).and_then(|n| n.tag_name.as_deref())
    }

    /// Child at position `index`, re-read on every call because the walk
    /// mutates the child list
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.nodes
            .get(&id)
            .and_then(|n| n.children.get(index).copied())
    }

    /// Number of children
    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes.get(&id).map(|n| n.children.len()).unwrap_or(0)
    }

    /// Detach a node from its parent and delete it with its whole subtree
    pub fn remove_subtree(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(parent_data) = self.nodes.get_mut(&parent) {
                parent_data.children.retain(|&c| c != id);
            }
        }
        self.delete_recursive(id);
    }

    fn delete_recursive(&mut self, id: NodeId) {
        if let Some(data) = self.nodes.remove(&id) {
            for child in data.children {
                self.delete_recursive(child);
            }
        }
    }

    /// Remove a node but promote its children into its place, preserving
    /// document order
    pub fn unwrap(&mut self, id: NodeId) {
        let (parent, children) = match self.nodes.get(&id) {
            Some(data) => match data.parent {
                Some(parent) => (parent, data.children.clone()),
                None => return,
            },
            None => return,
        };

        for &child in &children {
            if let Some(child_data) = self.nodes.get_mut(&child) {
                child_data.parent = Some(parent);
            }
        }
        if let Some(parent_data) = self.nodes.get_mut(&parent) {
            if let Some(pos) = parent_data.children.iter().position(|&c| c == id) {
                parent_data.children.splice(pos..=pos, children);
            }
        }
        self.nodes.remove(&id);
    }

    /// Replace all children of a node with a single text node
    pub fn set_text_content(&mut self, id: NodeId, content: impl Into<String>) {
        let children = match self.nodes.get(&id) {
            Some(data) => data.children.clone(),
            None => return,
        };
        for child in children {
            if let Some(child_data) = self.nodes.get_mut(&child) {
                child_data.parent = None;
            }
            self.delete_recursive(child);
        }
        if let Some(data) = self.nodes.get_mut(&id) {
            data.children.clear();
        }
        self.append(id, NodeData::text(content));
    }

    /// Collect the concatenated text of a subtree
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(data) = self.nodes.get(&id) {
            match data.node_type {
                NodeType::Text => out.push_str(data.text.as_deref().unwrap_or("")),
                NodeType::Element | NodeType::Fragment => {
                    for &child in &data.children {
                        self.collect_text(child, out);
                    }
                }
                NodeType::Comment => {}
            }
        }
    }

    /// Remove a single attribute from an element
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(data) = self.nodes.get_mut(&id) {
            data.attributes.retain(|(n, _)| n != name);
        }
    }

    /// Overwrite an attribute value in place, preserving position
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(data) = self.nodes.get_mut(&id) {
            let value = value.into();
            if let Some(slot) = data.attributes.iter_mut().find(|(n, _)| n == name) {
                slot.1 = value;
            } else {
                data.attributes.push((name.to_string(), value));
            }
        }
    }

    /// True when the fragment holds no nodes besides its root
    pub fn is_empty(&self) -> bool {
        self.child_count(self.root) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Fragment, NodeId, NodeId, NodeId) {
        // <div><b>bold</b>tail</div>
        let mut frag = Fragment::new();
        let div = frag.append(frag.root(), NodeData::element("div"));
        let b = frag.append(div, NodeData::element("b"));
        let text = frag.append(b, NodeData::text("bold"));
        frag.append(div, NodeData::text("tail"));
        (frag, div, b, text)
    }

    #[test]
    fn test_node_id_unique() {
        assert_ne!(NodeId::new(), NodeId::new());
    }

    #[test]
    fn test_append_and_children() {
        let (frag, div, b, _) = sample();
        assert_eq!(frag.child_count(div), 2);
        assert_eq!(frag.child_at(div, 0), Some(b));
        assert_eq!(frag.tag_name(b), Some("b"));
    }

    #[test]
    fn test_remove_subtree() {
        let (mut frag, div, b, text) = sample();
        frag.remove_subtree(b);
        assert_eq!(frag.child_count(div), 1);
        assert!(frag.get(b).is_none());
        assert!(frag.get(text).is_none());
    }

    #[test]
    fn test_unwrap_promotes_children_in_place() {
        let (mut frag, div, b, text) = sample();
        frag.unwrap(b);
        assert!(frag.get(b).is_none());
        assert_eq!(frag.child_at(div, 0), Some(text));
        assert_eq!(frag.get(text).unwrap().parent, Some(div));
        assert_eq!(frag.text_content(div), "boldtail");
    }

    #[test]
    fn test_attributes() {
        let mut frag = Fragment::new();
        let a = frag.append(frag.root(), NodeData::element("a"));
        frag.set_attribute(a, "href", "/x");
        frag.set_attribute(a, "title", "t");
        frag.set_attribute(a, "href", "/y");
        assert_eq!(
            frag.get(a).unwrap().attributes,
            vec![
                ("href".to_string(), "/y".to_string()),
                ("title".to_string(), "t".to_string())
            ]
        );
        frag.remove_attribute(a, "href");
        assert_eq!(frag.get(a).unwrap().attributes.len(), 1);
    }

    #[test]
    fn test_set_text_content() {
        let (mut frag, div, _, _) = sample();
        frag.set_text_content(div, "plain");
        assert_eq!(frag.child_count(div), 1);
        assert_eq!(frag.text_content(div), "plain");
    }
}
