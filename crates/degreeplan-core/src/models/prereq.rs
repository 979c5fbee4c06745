//! Prerequisite logic trees as stored in the catalog.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Recursive AND/OR structure whose leaves are course codes ("CS 225").
///
/// Serialized as `{"and": [...]}`, `{"or": [...]}` or a bare string leaf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PrereqTree {
    Course(String),
    All { and: Vec<PrereqTree> },
    Any { or: Vec<PrereqTree> },
}

impl PrereqTree {
    /// Every course code referenced anywhere in the tree.
    ///
    /// AND/OR structure is discarded; codes are whitespace-normalized.
    pub fn flatten(&self) -> BTreeSet<String> {
        let mut codes = BTreeSet::new();
        self.collect(&mut codes);
        codes
    }

    fn collect(&self, codes: &mut BTreeSet<String>) {
        match self {
            PrereqTree::Course(code) => {
                let code = code.split_whitespace().collect::<Vec<_>>().join(" ");
                if !code.is_empty() {
                    codes.insert(code);
                }
            }
            PrereqTree::All { and: children } | PrereqTree::Any { or: children } => {
                for child in children {
                    child.collect(codes);
                }
            }
        }
    }
}
