//! The consumer-facing extension registry.

use std::collections::BTreeMap;

use ext_config::{ConfigMap, ExtensionConfig};
use ext_fs::{NormalizedPath, io};

use crate::cache::ConfigCache;
use crate::hooks::{Collaborators, ComponentHelper, HelperSpec};
use crate::options::{ComponentFile, FileConventions, ManagerOptions};
use crate::scanner::{ExtensionScanner, ScanOutcome};
use crate::{ManagerError, Result};

struct HelperSlot {
    spec: HelperSpec,
    instance: Option<Box<dyn ComponentHelper>>,
}

/// Scans the extension root on construction, registers every enabled
/// extension with the collaborators and answers lookups afterwards.
///
/// ```rust,no_run
/// use ext_manager::{ExtensionManager, ManagerOptions};
///
/// let mut manager = ExtensionManager::new(ManagerOptions::new("extensions"))?;
/// if manager.is_extension_active("history") {
///     let private = manager.private_config("history")?;
///     println!("{}", private.len());
/// }
/// manager.on_route_shutdown();
/// # Ok::<(), ext_manager::ManagerError>(())
/// ```
pub struct ExtensionManager {
    scanner: ExtensionScanner,
    cache: ConfigCache,
    conventions: FileConventions,
    collaborators: Collaborators,
    url_base: String,
    scan: ScanOutcome,
    components: BTreeMap<String, ExtensionConfig>,
    helpers: BTreeMap<String, HelperSlot>,
    helpers_called: bool,
}

impl ExtensionManager {
    pub fn new(options: ManagerOptions) -> Result<Self> {
        Self::with_collaborators(options, Collaborators::default())
    }

    /// Build a manager and run the first scan.
    ///
    /// An existing root is made absolute so descriptor paths are too; a
    /// missing one is kept as given and the scan reports it.
    pub fn with_collaborators(options: ManagerOptions, collaborators: Collaborators) -> Result<Self> {
        let root = NormalizedPath::canonicalize(&options.extensions_dir)
            .unwrap_or_else(|_| NormalizedPath::new(&options.extensions_dir));
        let mut manager = Self {
            scanner: ExtensionScanner::new(root),
            cache: ConfigCache::new(options.cache_file.as_path()),
            conventions: options.conventions,
            collaborators,
            url_base: String::new(),
            scan: ScanOutcome::default(),
            components: BTreeMap::new(),
            helpers: BTreeMap::new(),
            helpers_called: false,
        };
        if !options.component_url_base.is_empty() {
            manager.set_component_url_base(&options.component_url_base);
        }
        manager.rescan()?;
        Ok(manager)
    }

    /// Run a scan pass and register the result.
    ///
    /// Every enabled extension is handed to the collaborators again. Helpers
    /// whose spec did not change keep their instance; helpers first seen
    /// after [`on_route_shutdown`](Self::on_route_shutdown) already ran are
    /// initialized on registration.
    pub fn rescan(&mut self) -> Result<&ScanOutcome> {
        self.scan = self.scanner.scan(&self.cache)?;
        self.components.clear();
        let mut previous = std::mem::take(&mut self.helpers);
        self.register_all(&mut previous);
        Ok(&self.scan)
    }

    pub fn last_scan(&self) -> &ScanOutcome {
        &self.scan
    }

    pub fn cache(&self) -> &ConfigCache {
        &self.cache
    }

    pub fn root(&self) -> &NormalizedPath {
        self.scanner.root()
    }

    /// Every registered descriptor, enabled or not.
    pub fn extensions(&self) -> &BTreeMap<String, ExtensionConfig> {
        &self.scan.extensions
    }

    pub fn extension_config(&self, name: &str) -> Option<&ExtensionConfig> {
        self.scan.extensions.get(name)
    }

    pub fn is_extension_registered(&self, name: &str) -> bool {
        self.scan.extensions.contains_key(name)
    }

    pub fn is_extension_active(&self, name: &str) -> bool {
        self.extension_config(name).is_some_and(ExtensionConfig::enabled)
    }

    /// Enabled extensions that ship a controller.
    pub fn components(&self) -> &BTreeMap<String, ExtensionConfig> {
        &self.components
    }

    pub fn is_component_registered(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn helper_specs(&self) -> impl Iterator<Item = &HelperSpec> {
        self.helpers.values().map(|slot| &slot.spec)
    }

    /// `<url base><name>/`
    pub fn component_url(&self, name: &str) -> Result<String> {
        self.registered(name)?;
        Ok(format!("{}{name}/", self.url_base))
    }

    /// Set the URL prefix, stripped of leading and trailing slashes and
    /// then ended with one `/`.
    ///
    /// An empty `component_url_base` in the options never reaches this
    /// setter, so component URLs stay relative (`<name>/`).
    pub fn set_component_url_base(&mut self, base: &str) {
        self.url_base = format!("{}/", base.trim_matches(['/', '\\']));
    }

    pub fn component_url_base(&self) -> &str {
        &self.url_base
    }

    /// The extension root with a trailing `/`, or `<root>/<name>` for a
    /// named extension.
    pub fn extension_path(&self, name: Option<&str>) -> String {
        let root = self.root().to_dir_string();
        match name {
            Some(name) => format!("{root}{name}"),
            None => root,
        }
    }

    /// The extension's template directory, defaulting to its own directory.
    pub fn component_template_path(&self, name: &str) -> Result<String> {
        let config = self.registered(name)?;
        let dir = self.dir_of(name, config);
        Ok(match config.templates() {
            Some(templates) => format!("{dir}{templates}"),
            None => dir,
        })
    }

    /// The extension's helper directory, if one is configured.
    pub fn component_helper_path(&self, name: &str) -> Result<Option<String>> {
        let config = self.registered(name)?;
        Ok(config
            .helpers()
            .map(|helpers| format!("{}{helpers}", self.dir_of(name, config))))
    }

    /// The extension's `private` section; empty when it declares none.
    pub fn private_config(&self, name: &str) -> Result<ConfigMap> {
        let config = self.registered(name)?;
        Ok(config.private().cloned().unwrap_or_default())
    }

    /// `(extension, directory)` for every extension whose declared language
    /// directory exists.
    pub fn language_paths(&self) -> Vec<(String, String)> {
        self.scan
            .extensions
            .iter()
            .filter_map(|(name, config)| {
                let languages = config.languages()?;
                let path = format!("{}{languages}", self.dir_of(name, config));
                NormalizedPath::new(&path)
                    .is_dir()
                    .then(|| (name.clone(), path))
            })
            .collect()
    }

    /// The loaded helper of a component.
    pub fn component_helper(&self, name: &str) -> Result<&dyn ComponentHelper> {
        self.registered(name)?;
        self.helpers
            .get(name)
            .and_then(|slot| slot.instance.as_deref())
            .map(|helper| helper as &dyn ComponentHelper)
            .ok_or_else(|| ManagerError::NoHelper(name.to_string()))
    }

    /// Route-shutdown hook: load and initialize every helper, once.
    ///
    /// Returns how many helpers were initialized; later calls return 0.
    pub fn on_route_shutdown(&mut self) -> usize {
        if self.helpers_called {
            return 0;
        }
        self.helpers_called = true;

        let names: Vec<String> = self.helpers.keys().cloned().collect();
        let mut initialized = 0;
        for name in names {
            if let Err(e) = load_helper(&mut self.helpers, &mut self.collaborators, &name) {
                tracing::warn!(component = %name, error = %e, "failed to load helper");
                continue;
            }
            let Some(helper) = self
                .helpers
                .get_mut(&name)
                .and_then(|slot| slot.instance.as_mut())
            else {
                continue;
            };
            match helper.init() {
                Ok(()) => initialized += 1,
                Err(e) => tracing::warn!(component = %name, error = %e, "helper init failed"),
            }
        }
        tracing::debug!(initialized, "component helpers initialized");
        initialized
    }

    fn registered(&self, name: &str) -> Result<&ExtensionConfig> {
        self.extension_config(name)
            .ok_or_else(|| ManagerError::NotRegistered(name.to_string()))
    }

    fn dir_of(&self, name: &str, config: &ExtensionConfig) -> String {
        config
            .path()
            .map(str::to_string)
            .unwrap_or_else(|| self.scanner.loader().extension_dir(name).to_dir_string())
    }

    fn register_all(&mut self, previous: &mut BTreeMap<String, HelperSlot>) {
        let enabled: Vec<(String, ExtensionConfig)> = self
            .scan
            .extensions
            .iter()
            .filter(|(_, config)| config.enabled())
            .map(|(name, config)| (name.clone(), config.clone()))
            .collect();
        for (name, config) in enabled {
            let dir = self.dir_of(&name, &config);
            self.register_extension(&name, &dir, &config, previous);
        }
    }

    fn register_extension(
        &mut self,
        name: &str,
        dir: &str,
        config: &ExtensionConfig,
        previous: &mut BTreeMap<String, HelperSlot>,
    ) {
        let view = &mut self.collaborators.view;
        warn_on_failure(name, "view", view.add_script_path(dir));
        if let Some(templates) = config.templates() {
            warn_on_failure(name, "view", view.add_script_path(&format!("{dir}{templates}")));
        }

        let dir_path = NormalizedPath::new(dir);
        if dir_path.join(&self.conventions.controller_file(name)).is_file() {
            self.add_component(name, &dir_path, config, previous);
        }

        let entries = match io::list_dir(&dir_path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(extension = %name, error = %e, "cannot list extension directory");
                return;
            }
        };
        for entry in entries.iter().filter(|entry| !entry.is_dir) {
            let Some((kind, key)) = self.conventions.classify(&entry.name) else {
                continue;
            };
            let collaborators = &mut self.collaborators;
            match kind {
                ComponentFile::Module => {
                    let module_config = config.for_module(&key);
                    for context in module_config.contexts() {
                        let result = collaborators.modules.register(
                            name,
                            &entry.name,
                            &context,
                            &module_config,
                        );
                        warn_on_failure(name, "module registry", result);
                    }
                }
                ComponentFile::Plugin => {
                    let result = collaborators.plugins.add_plugin(&key, &entry.name, dir, config);
                    warn_on_failure(name, "plugin manager", result);
                }
                ComponentFile::Wrapper => {
                    let private = config.private().cloned().unwrap_or_default();
                    let result = collaborators.wrappers.add_wrapper(&key, dir, &private);
                    warn_on_failure(name, "wrapper manager", result);
                }
            }
        }
    }

    fn add_component(
        &mut self,
        name: &str,
        dir: &NormalizedPath,
        config: &ExtensionConfig,
        previous: &mut BTreeMap<String, HelperSlot>,
    ) {
        let helper_path = dir.join(&self.conventions.helper_file(name));
        if io::is_readable(&helper_path) {
            let spec = HelperSpec {
                component: name.to_string(),
                path: helper_path.as_str().to_string(),
                class: self.conventions.helper_class(name),
                events: config.helper_events(),
            };
            let slot = match previous.remove(name) {
                Some(slot) if slot.spec == spec => slot,
                _ => HelperSlot {
                    spec,
                    instance: None,
                },
            };
            let fresh = slot.instance.is_none();
            // helpers bound to events must exist before the first event fires
            let load = fresh && (!slot.spec.events.is_empty() || self.helpers_called);
            self.helpers.insert(name.to_string(), slot);

            if load {
                match load_helper(&mut self.helpers, &mut self.collaborators, name) {
                    Ok(()) if self.helpers_called => self.init_late(name),
                    Ok(()) => {}
                    Err(e) => tracing::warn!(component = %name, error = %e, "failed to load helper"),
                }
            }
        }

        tracing::debug!(component = %name, "registered component");
        self.components.insert(name.to_string(), config.clone());
    }

    /// Initialize a helper that missed the route-shutdown pass.
    fn init_late(&mut self, name: &str) {
        let Some(helper) = self
            .helpers
            .get_mut(name)
            .and_then(|slot| slot.instance.as_mut())
        else {
            return;
        };
        if let Err(e) = helper.init() {
            tracing::warn!(component = %name, error = %e, "helper init failed");
        }
    }
}

/// Instantiate a helper if it is not loaded yet and bind it to its events.
fn load_helper(
    helpers: &mut BTreeMap<String, HelperSlot>,
    collaborators: &mut Collaborators,
    name: &str,
) -> Result<()> {
    let slot = helpers
        .get_mut(name)
        .ok_or_else(|| ManagerError::NoHelper(name.to_string()))?;
    if slot.instance.is_some() {
        return Ok(());
    }

    let instance = collaborators.helpers.load(&slot.spec)?;
    for event in &slot.spec.events {
        warn_on_failure(name, "event dispatcher", collaborators.events.register(event, name));
    }
    slot.instance = Some(instance);
    Ok(())
}

fn warn_on_failure(extension: &str, collaborator: &str, result: crate::hooks::HookResult) {
    if let Err(e) = result {
        tracing::warn!(%extension, %collaborator, error = %e, "hand-off failed");
    }
}
