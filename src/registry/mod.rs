//! Test registration
//!
//! Tests are registered at startup through suites (a declaring type in a
//! namespace). Each registration resolves the callable handle once, so the
//! executor never looks tests up by name at run time.
//!
//! ```ignore
//! let mut registry = Registry::new();
//! registry
//!     .suite("net::http", "ClientTests")
//!     .category("Net/HTTP")
//!     .add(TestDef::sync("check", |_| Ok(())))?;
//! ```

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use crate::models::{CategoryPath, Identity, Parameter, TestCase};

/// Future returned by a registered test
pub type TestFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Callable handle of a registered test, taking resolved argument values
pub type TestFn = Arc<dyn Fn(Vec<Value>) -> TestFuture + Send + Sync>;

/// Registration errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("test {identity} declares {expected} parameters but case '{case}' provides {provided}")]
    ArityMismatch {
        identity: Identity,
        case: String,
        expected: usize,
        provided: usize,
    },

    #[error("test {0} is already registered")]
    Duplicate(Identity),
}

/// One explicit case of a parameterised test
#[derive(Clone, Debug)]
pub struct CaseDef {
    name: Option<String>,
    values: Vec<Value>,
}

impl CaseDef {
    pub fn new(values: Vec<Value>) -> Self {
        Self { name: None, values }
    }

    pub fn named(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: Some(name.into()),
            values,
        }
    }
}

/// Definition of a test method before it is attached to a suite
pub struct TestDef {
    method: String,
    name: Option<String>,
    category: CategoryPath,
    params: Vec<(String, String)>,
    cases: Vec<CaseDef>,
    func: TestFn,
}

impl TestDef {
    /// An async test
    pub fn new<F, Fut>(method: impl Into<String>, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let func: TestFn = Arc::new(move |args: Vec<Value>| -> TestFuture { Box::pin(func(args)) });
        Self::with_handle(method, func)
    }

    /// A synchronous test; the body runs when the returned future is polled
    pub fn sync<F>(method: impl Into<String>, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let func = Arc::new(func);
        let handle: TestFn = Arc::new(move |args: Vec<Value>| -> TestFuture {
            let func = Arc::clone(&func);
            Box::pin(async move { func(args) })
        });
        Self::with_handle(method, handle)
    }

    fn with_handle(method: impl Into<String>, func: TestFn) -> Self {
        Self {
            method: method.into(),
            name: None,
            category: CategoryPath::default(),
            params: Vec::new(),
            cases: Vec::new(),
            func,
        }
    }

    /// Display name; defaults to the method name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Method-level category, appended to the suite category
    pub fn category(mut self, path: &str) -> Self {
        self.category = CategoryPath::parse(path);
        self
    }

    /// Declare a parameter (in call order)
    pub fn param(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.params.push((name.into(), type_name.into()));
        self
    }

    pub fn case(mut self, case: CaseDef) -> Self {
        self.cases.push(case);
        self
    }
}

/// Ordered collection of discovered cases plus their callable handles
#[derive(Default)]
pub struct Registry {
    cases: Vec<Arc<TestCase>>,
    handles: HashMap<Identity, TestFn>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start registering tests declared by `type_name` in `namespace`
    pub fn suite(
        &mut self,
        namespace: impl Into<String>,
        type_name: impl Into<String>,
    ) -> SuiteBuilder<'_> {
        SuiteBuilder {
            registry: self,
            namespace: namespace.into(),
            type_name: type_name.into(),
            category: CategoryPath::default(),
        }
    }

    /// All cases in registration order
    pub fn cases(&self) -> &[Arc<TestCase>] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Callable handle resolved at registration time
    pub fn handle(&self, identity: &Identity) -> Option<&TestFn> {
        self.handles.get(identity)
    }

    /// Identity → handle map shared with the executor
    pub fn handles(&self) -> Arc<HashMap<Identity, TestFn>> {
        Arc::new(self.handles.clone())
    }

    fn register(
        &mut self,
        namespace: &str,
        type_name: &str,
        suite_category: &CategoryPath,
        def: TestDef,
    ) -> Result<(), RegistryError> {
        let identity = Identity::new(namespace, type_name, def.method.as_str());
        if self.handles.contains_key(&identity) {
            return Err(RegistryError::Duplicate(identity));
        }

        let test_name = def.name.clone().unwrap_or_else(|| def.method.clone());
        let category = suite_category.join(&def.category);

        if let Some(bad) = def
            .cases
            .iter()
            .find(|case| case.values.len() != def.params.len())
        {
            return Err(RegistryError::ArityMismatch {
                case: bad.name.clone().unwrap_or_default(),
                expected: def.params.len(),
                provided: bad.values.len(),
                identity,
            });
        }

        if def.cases.is_empty() {
            self.cases.push(Arc::new(
                TestCase::new(identity.clone(), test_name).with_category(category),
            ));
        } else {
            for case in def.cases {
                let case_name = case
                    .name
                    .unwrap_or_else(|| format!("Case{}", self.cases.len()));
                let parameters = def
                    .params
                    .iter()
                    .zip(case.values)
                    .map(|((name, type_name), value)| Parameter::new(name, type_name, value))
                    .collect();

                self.cases.push(Arc::new(
                    TestCase::new(identity.clone(), test_name.clone())
                        .with_case(case_name, parameters)
                        .with_category(category.clone()),
                ));
            }
        }

        debug!("Registered {}", identity);
        self.handles.insert(identity, def.func);
        Ok(())
    }
}

/// Registers tests for one declaring type
pub struct SuiteBuilder<'a> {
    registry: &'a mut Registry,
    namespace: String,
    type_name: String,
    category: CategoryPath,
}

impl SuiteBuilder<'_> {
    /// Suite-level category, prefixed to every test's category
    pub fn category(mut self, path: &str) -> Self {
        self.category = CategoryPath::parse(path);
        self
    }

    pub fn add(&mut self, def: TestDef) -> Result<&mut Self, RegistryError> {
        self.registry
            .register(&self.namespace, &self.type_name, &self.category, def)?;
        Ok(self)
    }
}

/// Deserialize argument `index` of a test call
pub fn arg<T: DeserializeOwned>(args: &[Value], index: usize) -> anyhow::Result<T> {
    let value = args
        .get(index)
        .ok_or_else(|| anyhow::anyhow!("missing argument {index} (got {} arguments)", args.len()))?;
    serde_json::from_value(value.clone())
        .map_err(|e| anyhow::anyhow!("argument {index} has the wrong type: {e}"))
}
