//! Behavior module resolution and the per-page lifecycle contract.
//!
//! Each resolvable path (and each layout a page is nested under) may expose
//! a behavior module: a setup function receiving an optional pre-loaded data
//! payload and a hook-registration callback, returning an optional cleanup.
//! Modules are resolved through an explicit registry keyed by trimmed path
//! segments; a missing or failing module degrades to a no-op unit rather
//! than aborting the navigation, since not every path has page-specific
//! behavior.

use crate::config::RouterConfig;
use anyhow::Error;
use dom::Document;
use futures::future::{LocalBoxFuture, join_all};
use log::{debug, warn};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Teardown callback contributed by an active module.
pub type Cleanup = Box<dyn FnOnce()>;

/// Invoked when a navigation stalls past the loading delay; the returned
/// cleanup runs once resolution completes.
pub type LoadingHook = Box<dyn FnOnce() -> Option<Cleanup>>;

/// Context handed to a module's setup: the data payload it requested and
/// the loading-hook registration callback.
pub struct SetupContext<'a> {
    data: Option<&'a Value>,
    loading_hooks: &'a mut Vec<LoadingHook>,
}

impl<'a> SetupContext<'a> {
    pub(crate) fn new(data: Option<&'a Value>, loading_hooks: &'a mut Vec<LoadingHook>) -> Self {
        Self {
            data,
            loading_hooks,
        }
    }

    /// The pre-loaded data payload, when the module declared it needs one.
    #[must_use]
    pub const fn data(&self) -> Option<&'a Value> {
        self.data
    }

    /// Register a hook to run if the next navigation stalls while loading.
    pub fn on_loading(&mut self, hook: impl FnOnce() -> Option<Cleanup> + 'static) {
        self.loading_hooks.push(Box::new(hook));
    }
}

/// A page's or layout's behavior module.
pub trait BehaviorModule {
    /// Whether a co-located data unit must be loaded and passed to setup.
    fn needs_data(&self) -> bool {
        false
    }

    /// Per-page setup; the returned cleanup runs before the next page's
    /// modules are set up.
    fn setup(&self, ctx: &mut SetupContext<'_>) -> Option<Cleanup>;
}

/// Loads a behavior module; loading is a suspension point and happens fresh
/// on every navigation into the module's path.
pub trait ModuleLoader {
    /// # Errors
    /// Returns an error if the module cannot be produced; the caller
    /// degrades to a no-op unit.
    fn load(&self) -> LocalBoxFuture<'_, Result<Rc<dyn BehaviorModule>, Error>>;
}

/// Loads the data unit co-located with a module.
pub trait DataSource {
    /// # Errors
    /// Returns an error if the payload cannot be produced.
    fn load(&self) -> LocalBoxFuture<'_, Result<Value, Error>>;
}

/// [`ModuleLoader`] for a module constructed ahead of time.
pub struct StaticLoader {
    module: Rc<dyn BehaviorModule>,
}

impl StaticLoader {
    #[must_use]
    pub fn new(module: Rc<dyn BehaviorModule>) -> Rc<Self> {
        Rc::new(Self { module })
    }
}

impl ModuleLoader for StaticLoader {
    fn load(&self) -> LocalBoxFuture<'_, Result<Rc<dyn BehaviorModule>, Error>> {
        let module = Rc::clone(&self.module);
        Box::pin(async move { Ok(module) })
    }
}

/// Typed outcome of a registry lookup; a missing key is a value, not an
/// exception.
pub enum ModuleResolution {
    Found(Rc<dyn ModuleLoader>),
    NotFound,
}

/// Registry mapping path and layout keys to module loaders and data
/// sources.
#[derive(Default)]
pub struct ScriptRegistry {
    modules: HashMap<String, Rc<dyn ModuleLoader>>,
    data: HashMap<String, Rc<dyn DataSource>>,
}

impl ScriptRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_module(&mut self, key: impl Into<String>, loader: Rc<dyn ModuleLoader>) {
        self.modules.insert(key.into(), loader);
    }

    pub fn register_data(&mut self, key: impl Into<String>, source: Rc<dyn DataSource>) {
        self.data.insert(key.into(), source);
    }

    /// Look up the loader for a path or layout key.
    #[must_use]
    pub fn resolve(&self, key: &str) -> ModuleResolution {
        self.modules
            .get(key)
            .map_or(ModuleResolution::NotFound, |loader| {
                ModuleResolution::Found(Rc::clone(loader))
            })
    }

    #[must_use]
    pub fn data_source(&self, key: &str) -> Option<Rc<dyn DataSource>> {
        self.data.get(key).map(Rc::clone)
    }
}

/// A resolved behavior module together with its pre-loaded data payload.
pub struct ScriptUnit {
    module: Rc<dyn BehaviorModule>,
    data: Option<Value>,
}

struct NoopModule;

impl BehaviorModule for NoopModule {
    fn setup(&self, _ctx: &mut SetupContext<'_>) -> Option<Cleanup> {
        None
    }
}

impl ScriptUnit {
    #[must_use]
    pub fn new(module: Rc<dyn BehaviorModule>, data: Option<Value>) -> Self {
        Self { module, data }
    }

    /// Unit whose setup does nothing; the shape resolution failures degrade
    /// to.
    #[must_use]
    pub fn noop() -> Self {
        Self {
            module: Rc::new(NoopModule),
            data: None,
        }
    }

    /// Run the module's setup, collecting any loading hooks it registers,
    /// and return its cleanup.
    pub fn run(self, loading_hooks: &mut Vec<LoadingHook>) -> Option<Cleanup> {
        let mut ctx = SetupContext::new(self.data.as_ref(), loading_hooks);
        self.module.setup(&mut ctx)
    }
}

/// Derive a module key from a URL path by trimming leading and trailing
/// slashes.
#[must_use]
pub fn module_key(pathname: &str) -> &str {
    pathname.trim_matches('/')
}

/// Resolve a key to a unit, loading its data payload when requested.
/// Fail-soft: a missing module, a load error, or a missing/failing data
/// unit all degrade to a no-op unit.
pub async fn resolve_unit(registry: &ScriptRegistry, key: &str) -> ScriptUnit {
    let loader = match registry.resolve(key) {
        ModuleResolution::Found(loader) => loader,
        ModuleResolution::NotFound => {
            debug!("no behavior module registered for {key:?}");
            return ScriptUnit::noop();
        }
    };
    let module = match loader.load().await {
        Ok(module) => module,
        Err(err) => {
            warn!("behavior module {key:?} failed to load, continuing: {err}");
            return ScriptUnit::noop();
        }
    };
    let data = if module.needs_data() {
        let Some(source) = registry.data_source(key) else {
            warn!("module {key:?} requests a data unit but none is registered");
            return ScriptUnit::noop();
        };
        match source.load().await {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("data unit for {key:?} failed to load, continuing: {err}");
                return ScriptUnit::noop();
            }
        }
    } else {
        None
    };
    ScriptUnit { module, data }
}

/// Layout module keys for a page: every distinct marker value on its
/// boundary chain that names a layout, in document order, with the implicit
/// top-level layout key appended when the chain does not already carry it.
/// Each layout module is set up once per navigation however many times its
/// marker appears.
#[must_use]
pub fn layout_keys(doc: &Document, config: &RouterConfig) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for (_, value) in doc.elements_with_attr(&config.marker_attr) {
        if value.starts_with(&config.layout_prefix) && seen.insert(value.clone()) {
            keys.push(value);
        }
    }
    if seen.insert(config.layout_prefix.clone()) {
        keys.push(config.layout_prefix.clone());
    }
    keys
}

/// Resolve every layout key concurrently.
pub async fn load_layout_units(registry: &ScriptRegistry, keys: &[String]) -> Vec<ScriptUnit> {
    join_all(keys.iter().map(|key| resolve_unit(registry, key))).await
}
