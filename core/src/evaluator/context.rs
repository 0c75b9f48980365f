//! Per-evaluation state.

use std::borrow::Cow;

use serde_json::Value;
use tracing::trace;

use crate::{
    api::EvaluationOptions,
    functions::{FunctionError, FunctionRegistry, MethodRegistry},
    scope_stack::ScopeStack,
    stdlib::{NO_METHODS, STDLIB},
    values::ValueKind,
};

/// Everything an evaluation needs besides the expression itself.
///
/// The context borrows the root document and, until the host registers
/// something of its own, the shared standard library. It may be reused for
/// several evaluations but must not be shared between threads while one is
/// running.
///
/// # Example
///
/// ```
/// use jel_core::{EvaluationContext, Expression, Value};
/// use serde_json::json;
///
/// let doc = json!({ "name": "jel" });
/// let mut ctx = EvaluationContext::new(&doc);
/// ctx.register_function("shout", 1, |args| {
///     Ok(Value::from(format!("{}!", args[0].as_str().unwrap_or_default())))
/// });
///
/// let expr = Expression::parse("#shout(name)").unwrap();
/// assert_eq!(expr.evaluate_in(&mut ctx).unwrap(), json!("jel!"));
/// assert_eq!(ctx.depth(), 0);
/// ```
#[derive(Debug)]
pub struct EvaluationContext<'a> {
    pub(super) root: &'a Value,
    pub(super) scopes: ScopeStack<Value>,
    pub(super) functions: Cow<'a, FunctionRegistry>,
    pub(super) methods: Cow<'a, MethodRegistry>,
    pub(super) options: EvaluationOptions,
    /// Current evaluator recursion depth, checked against `options.max_depth`.
    pub(super) eval_depth: usize,
}

impl<'a> EvaluationContext<'a> {
    /// A context over `root` with the standard library and no methods.
    pub fn new(root: &'a Value) -> Self {
        Self::with_functions(root, &STDLIB)
    }

    /// A context over `root` resolving `#name(args)` in `functions` only.
    pub fn with_functions(root: &'a Value, functions: &'a FunctionRegistry) -> Self {
        Self {
            root,
            scopes: ScopeStack::new(),
            functions: Cow::Borrowed(functions),
            methods: Cow::Borrowed(&*NO_METHODS),
            options: EvaluationOptions::default(),
            eval_depth: 0,
        }
    }

    pub fn with_methods(mut self, methods: &'a MethodRegistry) -> Self {
        self.methods = Cow::Borrowed(methods);
        self
    }

    pub fn with_options(mut self, options: EvaluationOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a function for this context only. The shared registry is
    /// copied on the first registration.
    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        arity: usize,
        function: impl Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.functions.to_mut().register(name, arity, function);
        self
    }

    /// Register a method callable as `name(args)` on values of `kind`.
    pub fn register_method(
        &mut self,
        kind: ValueKind,
        name: impl Into<String>,
        arity: usize,
        method: impl Fn(&Value, &[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.methods.to_mut().register(kind, name, arity, method);
        self
    }

    pub fn root(&self) -> &Value {
        self.root
    }

    /// The value `#this` refers to: the innermost scope, or the root.
    pub fn active(&self) -> &Value {
        self.scopes.active(self.root)
    }

    /// Number of scopes currently pushed. Zero outside of an evaluation.
    pub fn depth(&self) -> usize {
        self.scopes.depth()
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn methods(&self) -> &MethodRegistry {
        &self.methods
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Run `f` with `value` as the active scope.
    ///
    /// The scope is popped again whatever `f` returns, so a failing
    /// sub-evaluation never leaves the stack unbalanced.
    pub(crate) fn with_scope<T>(&mut self, value: Value, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scopes.push(value);
        trace!(depth = self.scopes.depth(), "scope pushed");
        let result = f(self);
        let popped = self.scopes.pop();
        debug_assert!(popped.is_ok(), "scope stack underflow");
        trace!(depth = self.scopes.depth(), "scope popped");
        result
    }
}
