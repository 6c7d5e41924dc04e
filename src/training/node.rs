//! Decision tree nodes
//!
//! A tree is a [`DecisionNode`]: either a leaf label or a split on one
//! attribute with one [`Branch`] per value observed while building. On the
//! wire a tree is the nested mapping `{attribute: {value: subtree}}` with
//! leaves written as bare labels.

use crate::data::Row;
use crate::error::{Id3Error, Result};
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Decision tree node
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionNode {
    /// Terminal node holding the predicted label
    Leaf(String),
    /// Internal node splitting on a categorical attribute
    Split {
        attribute: String,
        branches: Vec<Branch>,
    },
}

/// Edge from a split to the subtree for one attribute value
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub value: String,
    pub node: DecisionNode,
}

/// Conjunction of `attribute = value` tests leading to a label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub conditions: Vec<(String, String)>,
    pub label: String,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return write!(f, "ALWAYS {}", self.label);
        }
        let tests: Vec<String> = self
            .conditions
            .iter()
            .map(|(attr, value)| format!("{} = {}", attr, value))
            .collect();
        write!(f, "IF {} THEN {}", tests.join(" AND "), self.label)
    }
}

impl DecisionNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        DecisionNode::Leaf(label.into())
    }

    pub fn split(attribute: impl Into<String>, branches: Vec<Branch>) -> Self {
        DecisionNode::Split {
            attribute: attribute.into(),
            branches,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, DecisionNode::Leaf(_))
    }

    /// Label of a leaf
    pub fn label(&self) -> Option<&str> {
        match self {
            DecisionNode::Leaf(label) => Some(label.as_str()),
            DecisionNode::Split { .. } => None,
        }
    }

    /// Attribute of a split
    pub fn attribute(&self) -> Option<&str> {
        match self {
            DecisionNode::Leaf(_) => None,
            DecisionNode::Split { attribute, .. } => Some(attribute.as_str()),
        }
    }

    pub fn branches(&self) -> &[Branch] {
        match self {
            DecisionNode::Leaf(_) => &[],
            DecisionNode::Split { branches, .. } => branches.as_slice(),
        }
    }

    /// Subtree for `value` under a split
    pub fn child(&self, value: &str) -> Option<&DecisionNode> {
        self.branches()
            .iter()
            .find(|b| b.value == value)
            .map(|b| &b.node)
    }

    /// Number of splits on the longest root-to-leaf path (a lone leaf is 0)
    pub fn depth(&self) -> usize {
        match self {
            DecisionNode::Leaf(_) => 0,
            DecisionNode::Split { branches, .. } => {
                1 + branches.iter().map(|b| b.node.depth()).max().unwrap_or(0)
            }
        }
    }

    pub fn n_leaves(&self) -> usize {
        match self {
            DecisionNode::Leaf(_) => 1,
            DecisionNode::Split { branches, .. } => branches.iter().map(|b| b.node.n_leaves()).sum(),
        }
    }

    pub fn n_splits(&self) -> usize {
        match self {
            DecisionNode::Leaf(_) => 0,
            DecisionNode::Split { branches, .. } => {
                1 + branches.iter().map(|b| b.node.n_splits()).sum::<usize>()
            }
        }
    }

    /// Distinct leaf labels in depth-first order
    pub fn labels(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                DecisionNode::Leaf(label) => {
                    if seen.insert(label.as_str()) {
                        out.push(label.as_str());
                    }
                }
                DecisionNode::Split { branches, .. } => {
                    stack.extend(branches.iter().rev().map(|b| &b.node));
                }
            }
        }
        out
    }

    /// One rule per root-to-leaf path, left to right
    pub fn rules(&self) -> Vec<Rule> {
        let mut rules = Vec::new();
        let mut stack: Vec<(&DecisionNode, Vec<(String, String)>)> = vec![(self, Vec::new())];
        while let Some((node, conditions)) = stack.pop() {
            match node {
                DecisionNode::Leaf(label) => rules.push(Rule {
                    conditions,
                    label: label.clone(),
                }),
                DecisionNode::Split { attribute, branches } => {
                    for branch in branches.iter().rev() {
                        let mut path = conditions.clone();
                        path.push((attribute.clone(), branch.value.clone()));
                        stack.push((&branch.node, path));
                    }
                }
            }
        }
        rules
    }

    /// Follow the row's values down to a leaf
    pub fn predict<'t>(&'t self, row: &Row<'_>) -> Result<&'t str> {
        let mut node = self;
        loop {
            match node {
                DecisionNode::Leaf(label) => return Ok(label.as_str()),
                DecisionNode::Split { attribute, .. } => {
                    let value = row
                        .get(attribute)
                        .ok_or_else(|| Id3Error::FeatureNotFound(attribute.clone()))?;
                    node = node.child(value).ok_or_else(|| Id3Error::UnseenValue {
                        attribute: attribute.clone(),
                        value: value.to_string(),
                    })?;
                }
            }
        }
    }

    /// ASCII rendering, one line per node
    pub fn render(&self) -> String {
        let mut out = String::new();
        match self {
            DecisionNode::Leaf(label) => {
                out.push_str("=> ");
                out.push_str(label);
                out.push('\n');
            }
            DecisionNode::Split { attribute, branches } => {
                out.push_str(&format!("[{}]\n", attribute));
                render_branches(branches, "", &mut out);
            }
        }
        out
    }
}

fn render_branches(branches: &[Branch], prefix: &str, out: &mut String) {
    for (i, branch) in branches.iter().enumerate() {
        let is_last = i + 1 == branches.len();
        let connector = if is_last { "└── " } else { "├── " };
        match &branch.node {
            DecisionNode::Leaf(label) => {
                out.push_str(&format!("{}{}{} => {}\n", prefix, connector, branch.value, label));
            }
            DecisionNode::Split { attribute, branches } => {
                out.push_str(&format!("{}{}{} -> [{}]\n", prefix, connector, branch.value, attribute));
                let next = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
                render_branches(branches, &next, out);
            }
        }
    }
}

impl fmt::Display for DecisionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ─── Nested-mapping serde ──────────────────────────────────────────────────────

struct BranchesRef<'a>(&'a [Branch]);

impl Serialize for BranchesRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for branch in self.0 {
            map.serialize_entry(&branch.value, &branch.node)?;
        }
        map.end()
    }
}

impl Serialize for DecisionNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DecisionNode::Leaf(label) => serializer.serialize_str(label),
            DecisionNode::Split { attribute, branches } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(attribute, &BranchesRef(branches))?;
                map.end()
            }
        }
    }
}

struct Branches(Vec<Branch>);

impl<'de> Deserialize<'de> for Branches {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct BranchesVisitor;

        impl<'de> Visitor<'de> for BranchesVisitor {
            type Value = Branches;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of attribute values to subtrees")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Branches, A::Error> {
                let mut branches = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((value, node)) = map.next_entry::<String, DecisionNode>()? {
                    if branches.iter().any(|b: &Branch| b.value == value) {
                        return Err(de::Error::custom(format!("duplicate branch '{}'", value)));
                    }
                    branches.push(Branch { value, node });
                }
                if branches.is_empty() {
                    return Err(de::Error::invalid_length(0, &self));
                }
                Ok(Branches(branches))
            }
        }

        deserializer.deserialize_map(BranchesVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = DecisionNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a leaf label or a single-entry map of attribute to branches")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<DecisionNode, E> {
        Ok(DecisionNode::Leaf(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<DecisionNode, E> {
        Ok(DecisionNode::Leaf(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<DecisionNode, E> {
        Ok(DecisionNode::Leaf(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<DecisionNode, E> {
        Ok(DecisionNode::Leaf(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<DecisionNode, E> {
        Ok(DecisionNode::Leaf(v.to_string()))
    }

    // Debug formatting keeps the fractional part, so `1.0` stays "1.0"
    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<DecisionNode, E> {
        Ok(DecisionNode::Leaf(format!("{:?}", v)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<DecisionNode, A::Error> {
        let (attribute, branches) = map
            .next_entry::<String, Branches>()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        if map.next_key::<IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(2, &self));
        }
        Ok(DecisionNode::Split {
            attribute,
            branches: branches.0,
        })
    }
}

impl<'de> Deserialize<'de> for DecisionNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}
