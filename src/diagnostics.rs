//! Diagnostics trees.
//!
//! A [`DiagnosticNode`] mirrors the structure being validated: each node is
//! associated with a source `E` (a value, a data node id, ...) and carries the
//! errors of type `T` found for that source. Children are owned; the ancestor
//! chain of an error is recovered by [`DiagnosticNode::flatten`].

use serde::Serialize;

/// A tree of accumulated validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticNode<E, T> {
    pub source: E,
    pub errors: Vec<T>,
    pub children: Vec<DiagnosticNode<E, T>>,
}

impl<E, T> DiagnosticNode<E, T> {
    /// Create an empty diagnostics node for `source`.
    pub fn new(source: E) -> Self {
        Self {
            source,
            errors: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a node that carries a single error.
    pub fn with_error(source: E, error: T) -> Self {
        Self {
            source,
            errors: vec![error],
            children: Vec::new(),
        }
    }

    /// True iff this node or any descendant carries at least one error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.children.iter().any(DiagnosticNode::has_errors)
    }

    pub fn add_error(&mut self, error: T) {
        self.errors.push(error);
    }

    /// Attach a child. Children without errors are kept as well so the tree
    /// mirrors the validated structure.
    pub fn add_child(&mut self, child: DiagnosticNode<E, T>) {
        self.children.push(child);
    }

    /// Total number of errors in this subtree.
    pub fn error_count(&self) -> usize {
        self.errors.len()
            + self
                .children
                .iter()
                .map(DiagnosticNode::error_count)
                .sum::<usize>()
    }

    /// Every error in the subtree together with the chain of sources leading
    /// to it, root first. Depth-first, children in insertion order.
    pub fn flatten(&self) -> Vec<(Vec<&E>, &T)> {
        let mut out = Vec::new();
        let mut chain = Vec::new();
        self.collect(&mut chain, &mut out);
        out
    }

    fn collect<'a>(&'a self, chain: &mut Vec<&'a E>, out: &mut Vec<(Vec<&'a E>, &'a T)>) {
        chain.push(&self.source);
        for error in &self.errors {
            out.push((chain.clone(), error));
        }
        for child in &self.children {
            child.collect(chain, out);
        }
        chain.pop();
    }

    /// Drop every child subtree that carries no error.
    pub fn prune(&mut self) {
        self.children.retain(DiagnosticNode::has_errors);
        for child in &mut self.children {
            child.prune();
        }
    }
}

impl<E: Default, T> Default for DiagnosticNode<E, T> {
    fn default() -> Self {
        Self::new(E::default())
    }
}
