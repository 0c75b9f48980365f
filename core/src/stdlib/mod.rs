//! Jel Standard Library
//!
//! Native functions available to every expression through `#name(args)`:
//! - String: `join`, `split`, `upper`, `lower`, `trim`
//! - Collection: `size`, `keys`
//!
//! Contexts borrow the shared [`STDLIB`] registry and only copy it when the
//! host registers extra functions.

use once_cell::sync::Lazy;

use crate::functions::{FunctionRegistry, MethodRegistry};

pub mod collection;
pub mod string;

pub use collection::register_collection_functions;
pub use string::register_string_functions;

/// The default function registry, built once per process.
pub static STDLIB: Lazy<FunctionRegistry> = Lazy::new(|| {
    let mut registry = FunctionRegistry::new();
    register_stdlib(&mut registry);
    registry
});

/// No methods are registered by default; hosts add them per context.
pub static NO_METHODS: Lazy<MethodRegistry> = Lazy::new(MethodRegistry::new);

/// Register all standard library functions in `registry`.
///
/// Use this when building a registry from scratch that should still offer
/// the builtins.
///
/// # Example
///
/// ```
/// use jel_core::FunctionRegistry;
/// use jel_core::stdlib::register_stdlib;
///
/// let mut registry = FunctionRegistry::new();
/// register_stdlib(&mut registry);
/// assert!(registry.contains("join", 2));
/// ```
pub fn register_stdlib(registry: &mut FunctionRegistry) {
    register_string_functions(registry);
    register_collection_functions(registry);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdlib_signatures() {
        assert_eq!(
            STDLIB.signatures(),
            vec![
                ("join", 2),
                ("keys", 1),
                ("lower", 1),
                ("size", 1),
                ("split", 2),
                ("trim", 1),
                ("upper", 1),
            ]
        );
    }

    #[test]
    fn test_no_default_methods() {
        assert!(NO_METHODS.is_empty());
    }
}
