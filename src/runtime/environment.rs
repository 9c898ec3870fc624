use std::collections::HashMap;
use std::mem;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::runtime::Value;

/// Lexical environment: a persistent chain of scopes, innermost first.
///
/// Scopes are reference counted and shared between the evaluator and every
/// closure that captured them. Binding into the current scope goes through
/// [`Rc::make_mut`], so a scope that a closure already holds is copied rather
/// than mutated: the closure keeps seeing exactly the bindings that existed
/// when it was created.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Innermost scope
    head: Rc<Scope>,
}

/// Single scope in the environment
#[derive(Debug, Clone, Default)]
struct Scope {
    /// Variables defined in this scope
    variables: HashMap<String, Value>,
    /// Enclosing scope (None for the global scope)
    parent: Option<Rc<Scope>>,
}

impl Environment {
    /// Creates a new environment with an empty global scope
    pub fn new() -> Self {
        Environment {
            head: Rc::new(Scope::default()),
        }
    }

    /// Returns a new environment with a fresh scope on top of this chain
    pub fn enclosed(&self) -> Self {
        Environment {
            head: Rc::new(Scope {
                variables: HashMap::new(),
                parent: Some(Rc::clone(&self.head)),
            }),
        }
    }

    /// Enters a new nested scope
    pub fn enter_scope(&mut self) {
        *self = self.enclosed();
    }

    /// Exits the current scope and returns to parent scope
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.head.parent.clone() {
            self.head = parent;
        }
    }

    /// Defines a new variable in the current scope
    ///
    /// A name may be bound once per scope; shadowing an outer binding is fine.
    pub fn define(&mut self, name: String, value: Value) -> Result<()> {
        if self.head.variables.contains_key(&name) {
            return Err(Error::DuplicateBinding { name });
        }
        Rc::make_mut(&mut self.head).variables.insert(name, value);
        Ok(())
    }

    /// Gets the value of a variable, walking the scope chain from innermost to outermost
    pub fn get(&self, name: &str) -> Result<Value> {
        self.lookup(name)
            .cloned()
            .ok_or_else(|| Error::UndefinedIdentifier {
                name: name.to_string(),
            })
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        let mut scope = Some(&self.head);
        while let Some(current) = scope {
            if let Some(value) = current.variables.get(name) {
                return Some(value);
            }
            scope = current.parent.as_ref();
        }
        None
    }

    /// Checks if a variable exists in any scope
    pub fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Exits the current scope, moving its bindings into the parent scope
    ///
    /// A binding replaces a parent binding of the same name. Closures that
    /// captured either scope keep the versions they captured. At the global
    /// scope this does nothing.
    pub fn commit_scope(&mut self) {
        let Some(parent) = self.head.parent.clone() else {
            return;
        };
        let committed = mem::replace(&mut self.head, parent);
        let variables = match Rc::try_unwrap(committed) {
            Ok(scope) => scope.variables,
            Err(shared) => shared.variables.clone(),
        };
        if !variables.is_empty() {
            Rc::make_mut(&mut self.head).variables.extend(variables);
        }
    }

    /// Returns the current scope depth (1 for global scope)
    pub fn scope_depth(&self) -> usize {
        let mut depth = 1;
        let mut scope = &self.head;
        while let Some(parent) = &scope.parent {
            depth += 1;
            scope = parent;
        }
        depth
    }

    /// Captures the chain as it is right now, for a closure
    pub fn snapshot(&self) -> Environment {
        self.clone()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
