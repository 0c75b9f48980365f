//! Native function and method registries.
//!
//! Functions are invoked as `#name(args)` and resolved by `(name, arity)`.
//! Methods are invoked as `name(args)` on the active value and resolved by
//! `(kind of the active value, name, arity)`. Both registries are plain maps
//! that host code fills before evaluation; lookups borrow the name instead of
//! allocating a key.

use core::fmt;
use std::sync::Arc;

use hashbrown::{Equivalent, HashMap};
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use crate::values::ValueKind;

/// Failure reported by a native function or method.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunctionError {
    #[error("argument {index} must be {expected}, found {found}")]
    ArgumentType {
        index: usize,
        expected: &'static str,
        found: ValueKind,
    },

    #[error("{0}")]
    Message(String),
}

impl FunctionError {
    pub fn message(message: impl Into<String>) -> Self {
        FunctionError::Message(message.into())
    }
}

type NativeFn = dyn Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync;
type NativeMethodFn = dyn Fn(&Value, &[Value]) -> Result<Value, FunctionError> + Send + Sync;

/// Shared handle to a host function taking already evaluated arguments.
#[derive(Clone)]
pub struct NativeFunction(Arc<NativeFn>);

impl NativeFunction {
    pub fn new(
        function: impl Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(function))
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, FunctionError> {
        (self.0)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NativeFunction(..)")
    }
}

/// Shared handle to a host method; the receiver is the active value.
#[derive(Clone)]
pub struct NativeMethod(Arc<NativeMethodFn>);

impl NativeMethod {
    pub fn new(
        method: impl Fn(&Value, &[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(method))
    }

    pub fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value, FunctionError> {
        (self.0)(receiver, args)
    }
}

impl fmt::Debug for NativeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NativeMethod(..)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FunctionKey {
    name: String,
    arity: usize,
}

// Hashes exactly like `FunctionKey`: `&str` and `String` hash the same.
#[derive(Hash)]
struct FunctionKeyRef<'a> {
    name: &'a str,
    arity: usize,
}

impl Equivalent<FunctionKey> for FunctionKeyRef<'_> {
    fn equivalent(&self, key: &FunctionKey) -> bool {
        self.name == key.name && self.arity == key.arity
    }
}

/// Functions callable as `#name(args)`, keyed by name and argument count.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<FunctionKey, NativeFunction>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function` under `(name, arity)`, replacing any previous
    /// entry with the same key.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        arity: usize,
        function: impl Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    ) -> &mut Self {
        let name = name.into();
        trace!(%name, arity, "registering function");
        self.functions
            .insert(FunctionKey { name, arity }, NativeFunction::new(function));
        self
    }

    pub fn get(&self, name: &str, arity: usize) -> Option<&NativeFunction> {
        self.functions.get(&FunctionKeyRef { name, arity })
    }

    pub fn contains(&self, name: &str, arity: usize) -> bool {
        self.get(name, arity).is_some()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered `(name, arity)` pairs, sorted.
    pub fn signatures(&self) -> Vec<(&str, usize)> {
        let mut signatures: Vec<_> = self
            .functions
            .keys()
            .map(|key| (key.name.as_str(), key.arity))
            .collect();
        signatures.sort_unstable();
        signatures
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MethodKey {
    kind: ValueKind,
    name: String,
    arity: usize,
}

#[derive(Hash)]
struct MethodKeyRef<'a> {
    kind: ValueKind,
    name: &'a str,
    arity: usize,
}

impl Equivalent<MethodKey> for MethodKeyRef<'_> {
    fn equivalent(&self, key: &MethodKey) -> bool {
        self.kind == key.kind && self.name == key.name && self.arity == key.arity
    }
}

/// Methods callable as `receiver.name(args)`, keyed by the receiver's kind,
/// the method name and argument count.
#[derive(Debug, Clone, Default)]
pub struct MethodRegistry {
    methods: HashMap<MethodKey, NativeMethod>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: ValueKind,
        name: impl Into<String>,
        arity: usize,
        method: impl Fn(&Value, &[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    ) -> &mut Self {
        let name = name.into();
        trace!(%kind, %name, arity, "registering method");
        self.methods
            .insert(MethodKey { kind, name, arity }, NativeMethod::new(method));
        self
    }

    pub fn get(&self, kind: ValueKind, name: &str, arity: usize) -> Option<&NativeMethod> {
        self.methods.get(&MethodKeyRef { kind, name, arity })
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

// Argument helpers for native implementations.

pub fn str_arg(args: &[Value], index: usize) -> Result<&str, FunctionError> {
    match &args[index] {
        Value::String(s) => Ok(s),
        other => Err(type_error(index, "a string", other)),
    }
}

pub fn array_arg(args: &[Value], index: usize) -> Result<&[Value], FunctionError> {
    match &args[index] {
        Value::Array(items) => Ok(items),
        other => Err(type_error(index, "an array", other)),
    }
}

pub fn type_error(index: usize, expected: &'static str, found: &Value) -> FunctionError {
    FunctionError::ArgumentType {
        index,
        expected,
        found: ValueKind::of(found),
    }
}
