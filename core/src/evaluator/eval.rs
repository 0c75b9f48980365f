//! Core evaluation logic.

use serde_json::{Map, Value};
use tracing::trace;

use crate::{
    evaluator::{
        EvalError, EvalErrorKind, EvaluationContext,
        operators::{arithmetic, comparison},
    },
    parser::{ArithmeticOp, LogicalOp, Node, NodeKind, SelectionMode, UnaryOp},
    values::{self, ValueKind, is_truthy},
};

type EvalResult = Result<Value, EvalError>;

// Grow the stack when less than 128KB remains (4MB each time)
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

impl EvaluationContext<'_> {
    fn error(&self, node: &Node, kind: EvalErrorKind) -> EvalError {
        EvalError::new(kind, node.span.clone())
    }

    /// Evaluate `node` against this context.
    ///
    /// The scope stack is left exactly as it was found, whether the
    /// evaluation succeeds or not.
    pub fn evaluate(&mut self, node: &Node) -> EvalResult {
        self.eval_node(node)
    }

    /// Evaluate a node with depth tracking.
    pub(crate) fn eval_node(&mut self, node: &Node) -> EvalResult {
        if self.eval_depth >= self.options.max_depth {
            return Err(self.error(
                node,
                EvalErrorKind::DepthExceeded {
                    max_depth: self.options.max_depth,
                },
            ));
        }

        self.eval_depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.eval_node_inner(node)
        });
        self.eval_depth -= 1;

        result
    }

    fn eval_node_inner(&mut self, node: &Node) -> EvalResult {
        match &node.kind {
            NodeKind::Literal(literal) => Ok(literal.to_value()),

            NodeKind::Assign { .. } => Err(self.error(
                node,
                EvalErrorKind::Unsupported {
                    construct: "assignment",
                },
            )),

            NodeKind::Elvis { value, fallback } => {
                let value = self.eval_node(value)?;
                if value.is_null() {
                    self.eval_node(fallback)
                } else {
                    Ok(value)
                }
            }

            NodeKind::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                if is_truthy(&self.eval_node(condition)?) {
                    self.eval_node(then_branch)
                } else {
                    self.eval_node(else_branch)
                }
            }

            NodeKind::Logical { op, left, right } => {
                let left = is_truthy(&self.eval_node(left)?);
                // Short-circuit: the right operand is only evaluated when it
                // can change the outcome.
                let result = match op {
                    LogicalOp::And if !left => false,
                    LogicalOp::Or if left => true,
                    _ => is_truthy(&self.eval_node(right)?),
                };
                Ok(Value::Bool(result))
            }

            NodeKind::Unary { op, operand } => {
                let value = self.eval_node(operand)?;
                let zero = Value::from(0);
                let result = match op {
                    UnaryOp::Not => return Ok(Value::Bool(!is_truthy(&value))),
                    UnaryOp::Plus => arithmetic(ArithmeticOp::Add, &value, &zero),
                    UnaryOp::Minus => arithmetic(ArithmeticOp::Sub, &zero, &value),
                };
                result.map_err(|kind| self.error(node, kind))
            }

            NodeKind::Comparison { op, left, right } => {
                let left = self.eval_node(left)?;
                let right = self.eval_node(right)?;
                Ok(Value::Bool(comparison(*op, &left, &right)))
            }

            NodeKind::Arithmetic { op, left, right } => {
                let left = self.eval_node(left)?;
                let right = self.eval_node(right)?;
                arithmetic(*op, &left, &right).map_err(|kind| self.error(node, kind))
            }

            NodeKind::FunctionCall { name, args } => self.eval_function_call(node, name, args),

            NodeKind::Variable(name) => match name.as_str() {
                "this" => Ok(self.active().clone()),
                "root" => Ok(self.root.clone()),
                _ => Err(self.error(node, EvalErrorKind::UnknownVariable { name: name.clone() })),
            },

            NodeKind::MethodCall {
                name,
                args,
                null_safe,
            } => self.eval_method_call(node, name, args, *null_safe),

            NodeKind::Property { name, null_safe } => match self.active() {
                Value::Object(map) => Ok(map.get(name).cloned().unwrap_or(Value::Null)),
                _ if *null_safe => Ok(Value::Null),
                Value::Null => Err(self.error(
                    node,
                    EvalErrorKind::NullReceiver {
                        operation: format!("read property '{name}'"),
                    },
                )),
                other => {
                    let found = ValueKind::of(other);
                    Err(self.error(
                        node,
                        EvalErrorKind::NotAnObject {
                            name: name.clone(),
                            found,
                        },
                    ))
                }
            },

            NodeKind::Projection { expr, null_safe } => {
                let Some(items) = self.collection(node, "project", *null_safe)? else {
                    return Ok(Value::Null);
                };
                let mut results = Vec::with_capacity(items.len());
                for item in items {
                    results.push(self.with_scope(item, |ctx| ctx.eval_node(expr))?);
                }
                Ok(Value::Array(results))
            }

            NodeKind::Flat { expr, null_safe } => {
                let Some(items) = self.collection(node, "flat-project", *null_safe)? else {
                    return Ok(Value::Null);
                };
                let mut results = Vec::new();
                for item in items {
                    match self.with_scope(item, |ctx| ctx.eval_node(expr))? {
                        Value::Array(inner) => results.extend(inner),
                        other => {
                            let found = ValueKind::of(&other);
                            return Err(self.error(node, EvalErrorKind::FlatNotArray { found }));
                        }
                    }
                }
                Ok(Value::Array(results))
            }

            NodeKind::Selection {
                mode,
                predicate,
                null_safe,
            } => {
                let Some(items) = self.collection(node, "select", *null_safe)? else {
                    return Ok(Value::Null);
                };
                self.eval_selection(*mode, predicate, items)
            }

            NodeKind::Indexer { index } => self.eval_indexer(node, index),

            NodeKind::InlineList(items) => items
                .iter()
                .map(|item| self.eval_node(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),

            NodeKind::InlineMap(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (key_node, value_node) in entries {
                    let key = match self.eval_node(key_node)? {
                        Value::String(key) => key,
                        Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
                        other => {
                            let found = ValueKind::of(&other);
                            return Err(
                                self.error(key_node, EvalErrorKind::InvalidMapKey { found })
                            );
                        }
                    };
                    let value = self.eval_node(value_node)?;
                    map.insert(key, value);
                }
                Ok(Value::Object(map))
            }

            NodeKind::Compound(steps) => {
                let Some((first, rest)) = steps.split_first() else {
                    return Ok(self.active().clone());
                };
                let mut current = self.eval_node(first)?;
                for step in rest {
                    current = self.with_scope(current, |ctx| ctx.eval_node(step))?;
                }
                Ok(current)
            }
        }
    }

    fn eval_function_call(&mut self, node: &Node, name: &str, args: &[Node]) -> EvalResult {
        // Resolve before touching the arguments; the handle is cloned so the
        // registry borrow ends before arguments are evaluated.
        let Some(function) = self.functions.get(name, args.len()).cloned() else {
            return Err(self.error(
                node,
                EvalErrorKind::UnknownFunction {
                    name: name.to_string(),
                    arity: args.len(),
                },
            ));
        };

        let args = self.eval_args(args)?;
        trace!(function = name, arity = args.len(), "calling function");
        function.call(&args).map_err(|error| {
            self.error(
                node,
                EvalErrorKind::FunctionFailed {
                    name: format!("#{name}"),
                    error,
                },
            )
        })
    }

    fn eval_method_call(
        &mut self,
        node: &Node,
        name: &str,
        args: &[Node],
        null_safe: bool,
    ) -> EvalResult {
        let receiver = self.active().clone();
        if receiver.is_null() {
            if null_safe {
                return Ok(Value::Null);
            }
            return Err(self.error(
                node,
                EvalErrorKind::NullReceiver {
                    operation: format!("call method '{name}'"),
                },
            ));
        }

        let kind = ValueKind::of(&receiver);
        let Some(method) = self.methods.get(kind, name, args.len()).cloned() else {
            return Err(self.error(
                node,
                EvalErrorKind::UnsupportedMethod {
                    kind,
                    name: name.to_string(),
                    arity: args.len(),
                },
            ));
        };

        let args = self.eval_args(args)?;
        trace!(method = name, %kind, arity = args.len(), "calling method");
        method.call(&receiver, &args).map_err(|error| {
            self.error(
                node,
                EvalErrorKind::FunctionFailed {
                    name: name.to_string(),
                    error,
                },
            )
        })
    }

    fn eval_args(&mut self, args: &[Node]) -> Result<Vec<Value>, EvalError> {
        args.iter().map(|arg| self.eval_node(arg)).collect()
    }

    /// Elements of the active collection, or `None` when a null-safe
    /// operation meets null.
    fn collection(
        &self,
        node: &Node,
        operation: &str,
        null_safe: bool,
    ) -> Result<Option<Vec<Value>>, EvalError> {
        let active = self.active();
        if active.is_null() {
            if null_safe {
                return Ok(None);
            }
            return Err(self.error(
                node,
                EvalErrorKind::NullReceiver {
                    operation: operation.to_string(),
                },
            ));
        }
        match values::elements(active) {
            Some(items) => Ok(Some(items)),
            None => Err(self.error(
                node,
                EvalErrorKind::NotACollection {
                    found: ValueKind::of(active),
                },
            )),
        }
    }

    fn eval_selection(
        &mut self,
        mode: SelectionMode,
        predicate: &Node,
        items: Vec<Value>,
    ) -> EvalResult {
        match mode {
            SelectionMode::All => {
                let mut matches = Vec::new();
                for item in items {
                    if self.matches(predicate, &item)? {
                        matches.push(item);
                    }
                }
                Ok(Value::Array(matches))
            }
            SelectionMode::First => self.find(predicate, items.into_iter()),
            SelectionMode::Last => self.find(predicate, items.into_iter().rev()),
        }
    }

    fn find(&mut self, predicate: &Node, items: impl Iterator<Item = Value>) -> EvalResult {
        for item in items {
            if self.matches(predicate, &item)? {
                return Ok(item);
            }
        }
        Ok(Value::Null)
    }

    fn matches(&mut self, predicate: &Node, item: &Value) -> Result<bool, EvalError> {
        let result = self.with_scope(item.clone(), |ctx| ctx.eval_node(predicate))?;
        Ok(is_truthy(&result))
    }

    fn eval_indexer(&mut self, node: &Node, index: &Node) -> EvalResult {
        if self.active().is_null() {
            return Err(self.error(
                node,
                EvalErrorKind::NullReceiver {
                    operation: "index".to_string(),
                },
            ));
        }
        let index = self.eval_node(index)?;
        let target = self.active();

        match (target, &index) {
            (Value::String(s), Value::Number(n)) if n.is_i64() => {
                let i = n.as_i64().unwrap_or_default();
                let len = s.chars().count();
                usize::try_from(i)
                    .ok()
                    .and_then(|i| s.chars().nth(i))
                    .map(|ch| Value::String(ch.to_string()))
                    .ok_or_else(|| {
                        self.error(node, EvalErrorKind::IndexOutOfBounds { index: i, len })
                    })
            }
            (Value::Array(items), Value::Number(n)) if n.is_i64() => {
                let i = n.as_i64().unwrap_or_default();
                usize::try_from(i)
                    .ok()
                    .and_then(|i| items.get(i))
                    .cloned()
                    .ok_or_else(|| {
                        self.error(
                            node,
                            EvalErrorKind::IndexOutOfBounds {
                                index: i,
                                len: items.len(),
                            },
                        )
                    })
            }
            (Value::Object(map), Value::String(key)) => map.get(key).cloned().ok_or_else(|| {
                self.error(node, EvalErrorKind::KeyNotFound { key: key.clone() })
            }),
            (Value::String(_) | Value::Array(_) | Value::Object(_), _) => Err(self.error(
                node,
                EvalErrorKind::InvalidIndex {
                    target: ValueKind::of(target),
                    index: ValueKind::of(&index),
                },
            )),
            _ => Err(self.error(
                node,
                EvalErrorKind::NotIndexable {
                    found: ValueKind::of(target),
                },
            )),
        }
    }
}
