//! Variable bindings consulted during evaluation
//!
//! A `ContextModel` maps variable names to expressions. Binding a name twice
//! overwrites the earlier binding. `with_binding` offers push/recurse/pop
//! scoping so recursive callers (bisection, function calls) leave the
//! context exactly as they found it.
//!
//! Names whose bindings are being evaluated are tracked, so a binding that
//! reaches its own name again fails with [`EvalError::CyclicBinding`]. A
//! scope that rebinds a name starts a fresh binding for it.

use crate::error::{EvalError, EvalResult};
use crate::expr::Expr;
use std::collections::HashMap;

/// Mapping from variable name to its currently bound expression
#[derive(Debug, Clone, Default)]
pub struct ContextModel {
    bindings: HashMap<String, Expr>,
    resolving: Vec<String>,
}

impl ContextModel {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing and returning any previous binding
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Expr>) -> Option<Expr> {
        self.bindings.insert(name.into(), value.into())
    }

    /// Remove a binding
    pub fn unbind(&mut self, name: &str) -> Option<Expr> {
        self.bindings.remove(name)
    }

    /// Look up the expression bound to `name`
    pub fn get(&self, name: &str) -> EvalResult<&Expr> {
        self.bindings
            .get(name)
            .ok_or_else(|| EvalError::UnboundVariable(name.to_string()))
    }

    /// Whether `name` is bound
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no variable is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Evaluate the binding of `name` with `f`.
    ///
    /// Fails with [`EvalError::CyclicBinding`] when `name` is already being
    /// resolved further up the evaluation.
    pub(crate) fn resolve<R>(
        &mut self,
        name: &str,
        f: impl FnOnce(&Expr, &mut ContextModel) -> EvalResult<R>,
    ) -> EvalResult<R> {
        if self.resolving.iter().any(|n| n == name) {
            return Err(EvalError::CyclicBinding(name.to_string()));
        }
        let bound = self.get(name)?.clone();
        self.resolving.push(name.to_string());
        let result = f(&bound, self);
        self.resolving.pop();
        result
    }

    /// Bind `name` for the duration of `f`, then restore the previous state.
    pub fn with_binding<R>(
        &mut self,
        name: &str,
        value: Expr,
        f: impl FnOnce(&mut ContextModel) -> R,
    ) -> R {
        let resolving = self.shadow(&[name]);
        let previous = self.bindings.insert(name.to_string(), value);
        let result = f(self);
        self.restore(name, previous);
        self.resolving = resolving;
        result
    }

    /// Bind several names at once for the duration of `f`.
    pub fn with_bindings<R>(
        &mut self,
        bindings: Vec<(String, Expr)>,
        f: impl FnOnce(&mut ContextModel) -> R,
    ) -> R {
        let names: Vec<&str> = bindings.iter().map(|(name, _)| name.as_str()).collect();
        let resolving = self.shadow(&names);
        let mut saved = Vec::with_capacity(bindings.len());
        for (name, value) in bindings {
            let previous = self.bindings.insert(name.clone(), value);
            saved.push((name, previous));
        }
        let result = f(self);
        // Pop in reverse so a name bound twice ends up with its original value
        for (name, previous) in saved.into_iter().rev() {
            self.restore(&name, previous);
        }
        self.resolving = resolving;
        result
    }

    /// Forget that `names` are being resolved; returns the state to restore
    fn shadow(&mut self, names: &[&str]) -> Vec<String> {
        let saved = self.resolving.clone();
        self.resolving.retain(|n| !names.contains(&n.as_str()));
        saved
    }

    fn restore(&mut self, name: &str, previous: Option<Expr>) {
        match previous {
            Some(value) => {
                self.bindings.insert(name.to_string(), value);
            }
            None => {
                self.bindings.remove(name);
            }
        }
    }
}
