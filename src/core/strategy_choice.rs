//! Strategy Choice Table.
//!
//! Maps name prefixes to strategy assignments on top of the [`NameTree`]. The
//! effective strategy for a name is the assignment at its nearest
//! ancestor-or-self carrying one. Root is assigned at construction and can be
//! replaced but never erased, so lookups are total.

use crate::core::error::NfdError;
use crate::core::name::Name;
use crate::core::name_tree::{NameTree, NodeId};
use crate::core::strategy::{Strategy, StrategyRegistry};

/// Receives forwarding-scope migrations when assignments change.
///
/// Called once per affected scope, after the table reflects the new assignment
/// and before the mutating call returns.
pub trait StrategyTransition {
    fn on_strategy_change(&mut self, scope: &Name, old: &dyn Strategy, new: &dyn Strategy);
}

/// Transition hook that only records the change in the log.
pub struct LogTransition;

impl StrategyTransition for LogTransition {
    fn on_strategy_change(&mut self, scope: &Name, old: &dyn Strategy, new: &dyn Strategy) {
        log::debug!("scope {} moved from {} to {}", scope, old.name(), new.name());
    }
}

pub struct StrategyChoice {
    tree: NameTree<Name>,
    registry: StrategyRegistry,
    transition: Box<dyn StrategyTransition>,
    assigned: usize,
}

impl StrategyChoice {
    /// Builds a table whose root is assigned to `default_strategy`.
    pub fn new(default_strategy: Box<dyn Strategy>) -> Self {
        let default_id = default_strategy.name().clone();
        let mut registry = StrategyRegistry::new();
        // A fresh registry cannot already hold the id.
        let _ = registry.install(default_strategy);
        let mut tree = NameTree::new();
        let root = tree.root();
        tree.set_payload(root, default_id);
        Self {
            tree,
            registry,
            transition: Box::new(LogTransition),
            assigned: 1,
        }
    }

    pub fn set_transition(&mut self, transition: Box<dyn StrategyTransition>) {
        self.transition = transition;
    }

    pub fn install(&mut self, strategy: Box<dyn Strategy>) -> Result<(), NfdError> {
        self.registry.install(strategy)
    }

    pub fn has_strategy(&self, id: &Name) -> bool {
        self.registry.has_strategy(id)
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Assigns `strategy_id` to `prefix`.
    ///
    /// Fails with `UnknownStrategy` and leaves the table untouched when the id is
    /// not installed. Re-assigning the current strategy is a successful no-op.
    pub fn insert(&mut self, prefix: &Name, strategy_id: &Name) -> Result<(), NfdError> {
        if !self.registry.has_strategy(strategy_id) {
            return Err(NfdError::UnknownStrategy(strategy_id.clone()));
        }
        let node = self.tree.insert(prefix);
        if self.tree.payload(node) == Some(strategy_id) {
            return Ok(());
        }

        let affected = self.affected_scopes(node);
        match self.tree.set_payload(node, strategy_id.clone()) {
            Some(old) => log::info!("strategy for {} changed from {} to {}", prefix, old, strategy_id),
            None => {
                self.assigned += 1;
                log::info!("strategy for {} set to {}", prefix, strategy_id);
            }
        }
        self.notify(affected);
        Ok(())
    }

    /// Removes the explicit assignment at `prefix`.
    ///
    /// Returns whether an assignment existed. Root is rejected with
    /// `CannotUnsetRoot`.
    pub fn erase(&mut self, prefix: &Name) -> Result<bool, NfdError> {
        if prefix.is_empty() {
            return Err(NfdError::CannotUnsetRoot);
        }
        let Some(node) = self.tree.find(prefix) else {
            return Ok(false);
        };
        if self.tree.payload(node).is_none() {
            return Ok(false);
        }

        let affected = self.affected_scopes(node);
        if let Some(old) = self.tree.take_payload(node) {
            self.assigned -= 1;
            log::info!("strategy {} unset from {}", old, prefix);
        }
        self.notify(affected);
        self.tree.erase_if_empty(node);
        Ok(true)
    }

    /// Replaces the root assignment.
    pub fn set_default_strategy(&mut self, strategy_id: &Name) -> Result<(), NfdError> {
        self.insert(&Name::root(), strategy_id)
    }

    /// Explicit assignment at exactly `prefix`.
    pub fn get(&self, prefix: &Name) -> Option<&Name> {
        self.tree.find(prefix).and_then(|node| self.tree.payload(node))
    }

    /// Strategy id effective for `name` by longest prefix match.
    pub fn find_effective_strategy_name(&self, name: &Name) -> &Name {
        let node = self
            .tree
            .find_longest_prefix_match_with(name, |payload| payload.is_some())
            .unwrap_or_else(|| self.tree.root());
        self.tree
            .payload(node)
            .or_else(|| self.tree.payload(self.tree.root()))
            .expect("root always carries an assignment")
    }

    pub fn find_effective_strategy(&self, name: &Name) -> &dyn Strategy {
        let id = self.find_effective_strategy_name(name);
        self.registry
            .get(id)
            .expect("assigned strategies are always installed")
    }

    pub fn get_default(&self) -> &dyn Strategy {
        self.find_effective_strategy(&Name::root())
    }

    /// Number of explicit assignments, root included.
    pub fn len(&self) -> usize {
        self.assigned
    }

    /// Always false: root carries an assignment from construction and cannot
    /// be erased.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Explicit assignments in prefix order.
    pub fn entries(&self) -> Vec<(Name, Name)> {
        let mut out: Vec<(Name, Name)> = self
            .tree
            .descendants(self.tree.root())
            .into_iter()
            .filter_map(|node| {
                let prefix = self.tree.prefix(node)?;
                let id = self.tree.payload(node)?;
                Some((prefix.clone(), id.clone()))
            })
            .collect();
        out.sort();
        out
    }

    /// Scopes whose effective strategy flows through `node`, with the strategy
    /// each currently resolves to. Traversal stops at nodes assigned their own.
    fn affected_scopes(&self, node: NodeId) -> Vec<(Name, Name)> {
        self.tree
            .descendants_where(node, |_, payload| payload.is_none())
            .into_iter()
            .filter(|scope| *scope == node || self.tree.payload(*scope).is_none())
            .filter_map(|scope| {
                let prefix = self.tree.prefix(scope)?.clone();
                let current = self.find_effective_strategy_name(&prefix).clone();
                Some((prefix, current))
            })
            .collect()
    }

    fn notify(&mut self, affected: Vec<(Name, Name)>) {
        for (scope, old_id) in affected {
            let new_id = self.find_effective_strategy_name(&scope).clone();
            if new_id == old_id {
                continue;
            }
            let (Ok(old), Ok(new)) = (self.registry.get(&old_id), self.registry.get(&new_id)) else {
                continue;
            };
            self.transition.on_strategy_change(&scope, old, new);
        }
    }
}
