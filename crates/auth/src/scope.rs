//! Scope nesting used to resolve inherited grants.

use std::collections::HashMap;
use std::sync::Arc;

use accessgate_core::ScopeId;

/// Deepest chain of parents walked before giving up.
///
/// Guards against malformed (cyclic) hierarchies; real trees are far shallower.
pub const MAX_SCOPE_DEPTH: usize = 64;

/// Parent lookup for hierarchical multi-tenancy.
pub trait ScopeHierarchy: Send + Sync {
    /// Direct parent of `scope`, or `None` for a root (or unknown) scope.
    fn parent_of(&self, scope: ScopeId) -> Option<ScopeId>;

    /// Whether `ancestor` is `scope` itself or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: ScopeId, scope: ScopeId) -> bool {
        let mut current = scope;
        for _ in 0..=MAX_SCOPE_DEPTH {
            if current == ancestor {
                return true;
            }
            match self.parent_of(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }
}

impl<H> ScopeHierarchy for Arc<H>
where
    H: ScopeHierarchy + ?Sized,
{
    fn parent_of(&self, scope: ScopeId) -> Option<ScopeId> {
        (**self).parent_of(scope)
    }
}

/// No nesting: every scope is its own root.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlatScopes;

impl ScopeHierarchy for FlatScopes {
    fn parent_of(&self, _scope: ScopeId) -> Option<ScopeId> {
        None
    }
}

/// Parent map built once at startup.
#[derive(Debug, Default, Clone)]
pub struct ScopeTree {
    parents: HashMap<ScopeId, ScopeId>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `child` under `parent`. A later call for the same child re-parents it.
    pub fn with_child(mut self, parent: ScopeId, child: ScopeId) -> Self {
        self.parents.insert(child, parent);
        self
    }
}

impl ScopeHierarchy for ScopeTree {
    fn parent_of(&self, scope: ScopeId) -> Option<ScopeId> {
        self.parents.get(&scope).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_scopes_only_match_themselves() {
        let a = ScopeId::new();
        let b = ScopeId::new();
        assert!(FlatScopes.is_ancestor_or_self(a, a));
        assert!(!FlatScopes.is_ancestor_or_self(a, b));
    }

    #[test]
    fn ancestry_is_transitive_and_one_way() {
        let root = ScopeId::new();
        let mid = ScopeId::new();
        let leaf = ScopeId::new();
        let tree = ScopeTree::new().with_child(root, mid).with_child(mid, leaf);

        assert!(tree.is_ancestor_or_self(root, leaf));
        assert!(tree.is_ancestor_or_self(mid, leaf));
        assert!(!tree.is_ancestor_or_self(leaf, root));
        assert!(!tree.is_ancestor_or_self(leaf, mid));
    }

    #[test]
    fn siblings_are_unrelated() {
        let root = ScopeId::new();
        let left = ScopeId::new();
        let right = ScopeId::new();
        let tree = ScopeTree::new().with_child(root, left).with_child(root, right);

        assert!(!tree.is_ancestor_or_self(left, right));
        assert!(!tree.is_ancestor_or_self(right, left));
    }

    #[test]
    fn cycles_terminate() {
        let a = ScopeId::new();
        let b = ScopeId::new();
        let tree = ScopeTree::new().with_child(a, b).with_child(b, a);

        assert!(!tree.is_ancestor_or_self(ScopeId::new(), a));
        assert!(tree.is_ancestor_or_self(b, a));
    }
}
