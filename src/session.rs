use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use crate::engine::{BuiltinEngine, ExpressionEngine};
use crate::error::NavigationError;
use crate::navigator::Navigator;
use crate::registry::{FunctionMetadata, FunctionRegistry};
use crate::value::Value;

/// Shared state between the CLI, the interactive browser and completion.
///
/// Cloning is cheap and every clone sees the same engine and registry.
/// Readers running while the engine is swapped observe either the old or
/// the new engine, never a mix.
#[derive(Clone)]
pub struct Session {
    /// Active expression engine
    engine: Arc<RwLock<Arc<dyn ExpressionEngine>>>,

    /// Function documentation used by completion and `functions`
    registry: Arc<RwLock<FunctionRegistry>>,
}

impl Session {
    /// Create a session around `engine`.
    ///
    /// The registry is built from the engine's functions and macros.
    pub fn new(engine: Arc<dyn ExpressionEngine>) -> Self {
        let registry = FunctionRegistry::with_functions(environment(engine.as_ref()));
        Self {
            engine: Arc::new(RwLock::new(engine)),
            registry: Arc::new(RwLock::new(registry)),
        }
    }

    /// Get the active engine.
    pub fn engine(&self) -> Arc<dyn ExpressionEngine> {
        Arc::clone(&*self.engine.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the active engine.
    ///
    /// The registry is left untouched; call [`Session::reload_functions`] to
    /// rebuild it from the new engine.
    pub fn set_engine(&self, engine: Arc<dyn ExpressionEngine>) {
        info!(engine = engine.name(), "switching expression engine");
        *self.engine.write().unwrap_or_else(PoisonError::into_inner) = engine;
    }

    /// Rebuild the registry from the active engine's environment.
    pub fn reload_functions(&self) {
        let functions = environment(self.engine().as_ref());
        self.registry_mut().load(functions);
    }

    /// Replace the registry contents.
    pub fn load_functions(&self, functions: impl IntoIterator<Item = FunctionMetadata>) {
        self.registry_mut().load(functions);
    }

    /// Merge `"name(args) - description"` suggestions into the registry.
    pub fn supplement_functions<S: AsRef<str>>(&self, suggestions: &[S]) {
        self.registry_mut().supplement(suggestions);
    }

    /// Read access to the registry.
    ///
    /// # Returns
    /// * `RwLockReadGuard` - Guard; writers block until it is dropped
    pub fn registry(&self) -> RwLockReadGuard<'_, FunctionRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, FunctionRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Navigator bound to the active engine.
    pub fn navigator(&self) -> Navigator {
        Navigator::new(self.engine())
    }

    /// Resolve `input` against `root` with the active engine.
    pub fn resolve(&self, root: &Value, input: &str) -> Result<Value, NavigationError> {
        self.navigator().resolve(root, input)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Arc::new(BuiltinEngine::new()))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("engine", &self.engine().name())
            .field("functions", &self.registry().len())
            .finish()
    }
}

fn environment(engine: &dyn ExpressionEngine) -> Vec<FunctionMetadata> {
    let mut functions = engine.functions();
    functions.extend(engine.macros());
    functions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Expr;
    use crate::error::EvalError;

    /// Engine that answers every expression with a fixed value
    struct ConstantEngine(Value);

    impl ExpressionEngine for ConstantEngine {
        fn name(&self) -> &str {
            "constant"
        }

        fn compile(&self, _expr: &str) -> Result<Expr, EvalError> {
            Ok(Expr::Literal(self.0.clone()))
        }

        fn evaluate(&self, _expr: &str, _root: &Value) -> Result<Value, EvalError> {
            Ok(self.0.clone())
        }

        fn functions(&self) -> Vec<FunctionMetadata> {
            vec![FunctionMetadata::new("answer", "answer() -> int", "The answer")]
        }

        fn macros(&self) -> Vec<FunctionMetadata> {
            Vec::new()
        }
    }

    #[test]
    fn test_registry_built_from_engine() {
        let session = Session::default();
        let registry = session.registry();
        assert!(registry.get("size").is_some());
        assert!(registry.get("filter").is_some());
    }

    #[test]
    fn test_engine_swap_is_shared_between_clones() {
        let session = Session::default();
        let other = session.clone();
        let root = Value::from(serde_json::json!({"a": 1}));

        assert_eq!(other.resolve(&root, "_.a + 1").unwrap(), Value::Int(2));
        session.set_engine(Arc::new(ConstantEngine(Value::Int(42))));
        assert_eq!(other.resolve(&root, "_.a + 1").unwrap(), Value::Int(42));
        assert_eq!(other.engine().name(), "constant");

        // registry is only rebuilt on request
        assert!(other.registry().get("answer").is_none());
        session.reload_functions();
        assert!(other.registry().get("answer").is_some());
        assert!(other.registry().get("size").is_none());
    }

    #[test]
    fn test_supplement_through_session() {
        let session = Session::default();
        session.supplement_functions(&["shout(s) - Uppercase and add '!'"]);
        assert_eq!(
            session.registry().get("shout").unwrap().category,
            "general"
        );
    }
}
