//! Collects operations in document order and turns them into a submittable batch.
//!
//! # Backward construction
//!
//! Every top-level operation targets the same anchor (index 1). Inserting at a
//! fixed anchor pushes previously inserted content further down, so replaying
//! the operations last-to-first rebuilds the page top-to-bottom. The translator
//! therefore emits in natural document order and this module performs the one
//! reversal the destination requires:
//!
//! 1. [`backward`] reverses the top-level list. Groups move as a whole.
//! 2. [`flatten`] expands each operation into its primitive requests, walking
//!    groups in their stored order.
//!
//! [`assemble`] is the composition of the two.

use crate::ir::operations::{OpItem, Operation, OperationKind, OperationList};
use crate::ir::requests::Request;
use std::collections::BTreeSet;

/// Insertion point of all top-level page content.
pub const BODY_ANCHOR: usize = 1;

/// Accumulates the operations produced for one anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitter {
    anchor: usize,
    items: OperationList,
    linked_titles: BTreeSet<String>,
}

impl Emitter {
    /// An emitter whose operations all target `anchor`.
    pub fn at(anchor: usize) -> Self {
        Emitter {
            anchor,
            items: Vec::new(),
            linked_titles: BTreeSet::new(),
        }
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn push(&mut self, kind: OperationKind) {
        self.items
            .push(OpItem::Single(Operation::new(self.anchor, kind)));
    }

    /// Appends an indivisible group.
    pub fn push_group(&mut self, group: OperationList) {
        self.items.push(OpItem::Group(group));
    }

    /// Remembers that the page links to an already converted title.
    pub fn record_link(&mut self, title: &str) {
        self.linked_titles.insert(title.to_string());
    }

    /// Moves the link records of a nested emitter (a table cell) into this one.
    pub fn absorb_links(&mut self, other: &mut Emitter) {
        self.linked_titles.append(&mut other.linked_titles);
    }

    pub fn items(&self) -> &[OpItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_parts(self) -> (OperationList, BTreeSet<String>) {
        (self.items, self.linked_titles)
    }
}

/// Reverses the top-level sequence, leaving groups untouched.
pub fn backward(list: OperationList) -> OperationList {
    let mut list = list;
    list.reverse();
    list
}

/// Expands operations into primitives, preserving order.
pub fn flatten(list: &[OpItem]) -> Vec<Request> {
    let mut requests = Vec::new();
    flatten_into(list, &mut requests);
    requests
}

fn flatten_into(list: &[OpItem], requests: &mut Vec<Request>) {
    for item in list {
        match item {
            OpItem::Single(operation) => requests.extend(operation.to_requests()),
            OpItem::Group(group) => flatten_into(group, requests),
        }
    }
}

/// Turns a document-order operation list into the batch to submit.
pub fn assemble(list: OperationList) -> Vec<Request> {
    flatten(&backward(list))
}

/// Counts logical operations, looking inside groups.
pub fn count_operations(list: &[OpItem]) -> usize {
    list.iter()
        .map(|item| match item {
            OpItem::Single(_) => 1,
            OpItem::Group(group) => count_operations(group),
        })
        .sum()
}
