use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

/// A node in the lexical environment tree: an ordered mapping from name to
/// binding plus an optional parent. The analyzer instantiates it with
/// `V = Type`, the evaluator with `V = Value`.
///
/// Nodes are shared (`Rc`) because object types/values keep their defining
/// scope alive, and interior-mutable (`RefCell`) because bindings are added
/// while the owning pass walks the tree.
#[derive(Debug)]
pub struct Scope<V> {
    parent: Option<Rc<Scope<V>>>,
    bindings: RefCell<IndexMap<String, V>>,
}

impl<V: Clone> Scope<V> {
    /// A scope with no parent: the root of a chain, or an object scope.
    pub fn root() -> Rc<Self> {
        Rc::new(Scope {
            parent: None,
            bindings: RefCell::new(IndexMap::new()),
        })
    }

    pub fn child(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Scope {
            parent: Some(Rc::clone(parent)),
            bindings: RefCell::new(IndexMap::new()),
        })
    }

    /// Binds `name` in this node. Fails if the name is already bound here;
    /// shadowing an outer binding is allowed.
    pub fn define(&self, name: impl Into<String>, value: V) -> Result<(), String> {
        let name = name.into();
        let mut bindings = self.bindings.borrow_mut();
        if bindings.contains_key(&name) {
            return Err(format!("{} is already defined in this scope", name));
        }
        bindings.insert(name, value);
        Ok(())
    }

    /// Looks up `name` in this node or, unless `current_only`, up the chain.
    pub fn get(&self, name: &str, current_only: bool) -> Option<V> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        if current_only {
            return None;
        }
        self.parent.as_ref().and_then(|p| p.get(name, false))
    }

    /// Rebinds the nearest enclosing binding of `name`. Returns false when
    /// the name is not bound anywhere in the chain.
    pub fn set(&self, name: &str, value: V) -> bool {
        let mut bindings = self.bindings.borrow_mut();
        if let Some(slot) = bindings.get_mut(name) {
            *slot = value;
            return true;
        }
        drop(bindings);
        match &self.parent {
            Some(parent) => parent.set(name, value),
            None => false,
        }
    }

    /// The names bound in this node, in definition order.
    pub fn names(&self) -> Vec<String> {
        self.bindings.borrow().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_get() {
        let scope = Scope::root();
        scope.define("x", 1).unwrap();
        assert_eq!(scope.get("x", true), Some(1));
        assert_eq!(scope.get("y", true), None);
    }

    #[test]
    fn duplicate_define_fails() {
        let scope = Scope::root();
        scope.define("x", 1).unwrap();
        assert!(scope.define("x", 2).is_err());
        assert_eq!(scope.get("x", true), Some(1));
    }

    #[test]
    fn child_sees_parent_bindings() {
        let parent = Scope::root();
        parent.define("x", 1).unwrap();
        let child = Scope::child(&parent);
        assert_eq!(child.get("x", false), Some(1));
        assert_eq!(child.get("x", true), None);
    }

    #[test]
    fn child_bindings_are_invisible_to_parent() {
        let parent = Scope::root();
        let child = Scope::child(&parent);
        child.define("x", 1).unwrap();
        assert_eq!(parent.get("x", true), None);
        assert_eq!(parent.get("x", false), None);
    }

    #[test]
    fn shadowing_is_allowed() {
        let parent = Scope::root();
        parent.define("x", 1).unwrap();
        let child = Scope::child(&parent);
        child.define("x", 2).unwrap();
        assert_eq!(child.get("x", false), Some(2));
        assert_eq!(parent.get("x", false), Some(1));
    }

    #[test]
    fn set_mutates_nearest_enclosing_binding() {
        let parent = Scope::root();
        parent.define("x", 1).unwrap();
        let child = Scope::child(&parent);
        assert!(child.set("x", 5));
        assert_eq!(parent.get("x", true), Some(5));

        child.define("x", 2).unwrap();
        assert!(child.set("x", 7));
        assert_eq!(child.get("x", true), Some(7));
        assert_eq!(parent.get("x", true), Some(5));
    }

    #[test]
    fn set_fails_for_unbound_name() {
        let scope: Rc<Scope<i32>> = Scope::root();
        assert!(!scope.set("missing", 1));
    }

    #[test]
    fn names_preserve_definition_order() {
        let scope = Scope::root();
        scope.define("b", 1).unwrap();
        scope.define("a", 2).unwrap();
        scope.define("c", 3).unwrap();
        assert_eq!(scope.names(), vec!["b", "a", "c"]);
    }
}
