//! A directed graph over opaque string keys: file pkg paths, component
//! identifiers (prefixed `component:`) and scope keys.
//!
//! The program mutates edges as files come and go; scopes subscribe to
//! their own key and are told about any structural change reachable from
//! it. Handlers must be idempotent and must not call back into the
//! graph.

use rustc_hash::{FxHashMap, FxHashSet};

type ChangeHandler = Box<dyn FnMut(&str)>;

#[derive(Debug, Default)]
struct Node {
    /// Outgoing edges in insertion order. The order is load-bearing: it
    /// drives [`DependencyGraph::all_dependencies`] and with it every
    /// deterministic file enumeration downstream.
    dependencies: Vec<String>,
}

struct HandlerEntry {
    id: u64,
    callback: ChangeHandler,
}

/// Token returned by [`DependencyGraph::on_change`]. Hand it back to
/// [`DependencyGraph::unsubscribe`] when the subscriber goes away; the
/// release is explicit, never left to drop order.
#[derive(Debug)]
pub struct Subscription {
    key: String,
    id: u64,
}

#[derive(Default)]
pub struct DependencyGraph {
    nodes: FxHashMap<String, Node>,
    handlers: FxHashMap<String, Vec<HandlerEntry>>,
    next_subscription_id: u64,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the edge `from -> to` and notifies subscribers that can
    /// reach `from`. Adding an edge that already exists is a no-op and
    /// notifies nobody.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let node = self.nodes.entry(from.to_string()).or_default();
        if node.dependencies.iter().any(|dependency| dependency == to) {
            return;
        }
        node.dependencies.push(to.to_string());
        tracing::trace!(from, to, "dependency edge added");
        self.notify(from);
    }

    /// Removes the edge `from -> to`. Removing a missing edge is a
    /// no-op and notifies nobody.
    pub fn remove_edge(&mut self, from: &str, to: &str) {
        let Some(node) = self.nodes.get_mut(from) else {
            return;
        };
        let Some(index) = node
            .dependencies
            .iter()
            .position(|dependency| dependency == to)
        else {
            return;
        };
        node.dependencies.remove(index);
        tracing::trace!(from, to, "dependency edge removed");
        self.notify(from);
    }

    /// Signals that `key` changed without a structural edge mutation,
    /// e.g. because the file behind it was re-parsed. Subscribers are
    /// notified exactly as for an edge update on `key`.
    pub fn mark_changed(&mut self, key: &str) {
        tracing::trace!(key, "dependency key marked changed");
        self.notify(key);
    }

    /// The direct dependencies of `key`, in edge insertion order.
    #[must_use]
    pub fn direct_dependencies(&self, key: &str) -> Vec<String> {
        self.nodes
            .get(key)
            .map(|node| node.dependencies.clone())
            .unwrap_or_default()
    }

    /// The transitive dependency closure of `key` in depth-first
    /// preorder following edge insertion order, deduplicated, excluding
    /// `key` itself. Cycles are tolerated.
    #[must_use]
    pub fn all_dependencies(&self, key: &str) -> Vec<String> {
        let mut seen = FxHashSet::default();
        seen.insert(key.to_string());
        let mut result = Vec::new();
        self.collect_dependencies(key, &mut seen, &mut result);
        result
    }

    fn collect_dependencies(
        &self,
        key: &str,
        seen: &mut FxHashSet<String>,
        result: &mut Vec<String>,
    ) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        for dependency in &node.dependencies {
            if seen.insert(dependency.clone()) {
                result.push(dependency.clone());
                self.collect_dependencies(dependency, seen, result);
            }
        }
    }

    /// Subscribes `handler` to changes reachable from `key`. When
    /// `emit_immediately` is set the handler fires once, synchronously,
    /// with the subscription key, before this call returns. Handlers
    /// always receive their own subscription key.
    pub fn on_change(
        &mut self,
        key: &str,
        emit_immediately: bool,
        mut handler: impl FnMut(&str) + 'static,
    ) -> Subscription {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        if emit_immediately {
            handler(key);
        }
        self.handlers
            .entry(key.to_string())
            .or_default()
            .push(HandlerEntry {
                id,
                callback: Box::new(handler),
            });
        Subscription {
            key: key.to_string(),
            id,
        }
    }

    /// Releases a subscription. Unknown tokens are ignored.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        if let Some(entries) = self.handlers.get_mut(&subscription.key) {
            entries.retain(|entry| entry.id != subscription.id);
            if entries.is_empty() {
                self.handlers.remove(&subscription.key);
            }
        }
    }

    /// Whether `to` is in the transitive dependency closure of `from`.
    fn reaches(&self, from: &str, to: &str) -> bool {
        let mut seen = FxHashSet::default();
        let mut stack = vec![from];
        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            for dependency in &node.dependencies {
                if dependency == to {
                    return true;
                }
                if seen.insert(dependency.as_str()) {
                    stack.push(dependency);
                }
            }
        }
        false
    }

    fn notify(&mut self, changed: &str) {
        let affected: Vec<String> = self
            .handlers
            .keys()
            .filter(|subscribed| subscribed.as_str() == changed || self.reaches(subscribed, changed))
            .cloned()
            .collect();
        for key in affected {
            if let Some(entries) = self.handlers.get_mut(&key) {
                for entry in entries.iter_mut() {
                    (entry.callback)(&key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::DependencyGraph;

    fn counter(graph: &mut DependencyGraph, key: &str, emit_immediately: bool) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        graph.on_change(key, emit_immediately, move |_| {
            inner.set(inner.get() + 1);
        });
        count
    }

    #[test]
    fn transitive_closure_is_preordered_and_deduped() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("a", "c");
        graph.add_edge("b", "c");
        graph.add_edge("c", "d");

        assert_eq!(graph.all_dependencies("a"), vec!["b", "c", "d"]);
        assert_eq!(graph.all_dependencies("b"), vec!["c", "d"]);
        assert_eq!(graph.all_dependencies("d"), Vec::<String>::new());
    }

    #[test]
    fn cycles_are_tolerated() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "a");

        assert_eq!(graph.all_dependencies("a"), vec!["b"]);
        assert_eq!(graph.all_dependencies("b"), vec!["a"]);
    }

    #[test]
    fn immediate_emit_fires_once_with_subscription_key() {
        let mut graph = DependencyGraph::new();
        let seen: Rc<Cell<bool>> = Rc::new(Cell::new(false));
        let inner = Rc::clone(&seen);
        graph.on_change("scope:main", true, move |key| {
            assert_eq!(key, "scope:main");
            inner.set(true);
        });
        assert!(seen.get());
    }

    #[test]
    fn edge_updates_notify_reachable_subscribers() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("scope:main", "a");
        graph.add_edge("a", "b");
        let count = counter(&mut graph, "scope:main", false);

        graph.add_edge("b", "c");
        assert_eq!(count.get(), 1);

        graph.add_edge("scope:main", "z");
        assert_eq!(count.get(), 2);

        // unrelated key
        graph.add_edge("other", "x");
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn redundant_mutations_do_not_notify() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("scope:main", "a");
        let count = counter(&mut graph, "scope:main", false);

        graph.add_edge("scope:main", "a");
        graph.remove_edge("scope:main", "missing");
        graph.remove_edge("nobody", "a");
        assert_eq!(count.get(), 0);

        graph.remove_edge("scope:main", "a");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn mark_changed_reaches_transitive_dependents() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("scope:main", "a");
        graph.add_edge("a", "b");
        let count = counter(&mut graph, "scope:main", false);

        graph.mark_changed("b");
        assert_eq!(count.get(), 1);

        graph.mark_changed("scope:main");
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut graph = DependencyGraph::new();
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        let subscription = graph.on_change("scope:main", false, move |_| {
            inner.set(inner.get() + 1);
        });

        graph.add_edge("scope:main", "a");
        assert_eq!(count.get(), 1);

        graph.unsubscribe(subscription);
        graph.add_edge("scope:main", "b");
        assert_eq!(count.get(), 1);
    }
}
