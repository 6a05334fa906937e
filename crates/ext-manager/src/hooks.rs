//! Collaborator hand-offs.
//!
//! The manager hands every enabled extension's artifacts to external
//! registries it does not interpret: template search paths to the view
//! layer, modules to the module registry, plugins and wrappers to their
//! managers, helper instances to the event dispatcher. Each hand-off returns
//! a `Result<(), HookError>`; failures are logged by the caller and do not
//! abort registration.
//!
//! [`Collaborators::default`] discards every hand-off. [`Recorder`] keeps
//! them as [`Registration`] values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ext_config::{ConfigMap, ExtensionConfig};
use serde::Serialize;

/// A collaborator rejected a hand-off.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type HookResult = std::result::Result<(), HookError>;

pub trait ViewLayer {
    fn add_script_path(&mut self, path: &str) -> HookResult;
}

pub trait ModuleRegistry {
    fn register(
        &mut self,
        extension: &str,
        module_file: &str,
        context: &str,
        config: &ExtensionConfig,
    ) -> HookResult;
}

pub trait PluginManager {
    fn add_plugin(
        &mut self,
        key: &str,
        file_name: &str,
        path: &str,
        config: &ExtensionConfig,
    ) -> HookResult;
}

pub trait WrapperManager {
    fn add_wrapper(&mut self, key: &str, path: &str, private_config: &ConfigMap) -> HookResult;
}

pub trait EventDispatcher {
    fn register(&mut self, event: &str, component: &str) -> HookResult;
}

/// A component's helper object.
pub trait ComponentHelper {
    /// Called once per process from the route-shutdown hook.
    fn init(&mut self) -> HookResult;
}

/// Instantiates helpers from their specs.
pub trait HelperLoader {
    fn load(&mut self, spec: &HelperSpec) -> std::result::Result<Box<dyn ComponentHelper>, HookError>;
}

/// Where a component's helper lives and which events it listens to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelperSpec {
    pub component: String,
    pub path: String,
    pub class: String,
    pub events: Vec<String>,
}

/// The full set of collaborators the manager hands off to.
pub struct Collaborators {
    pub view: Box<dyn ViewLayer>,
    pub modules: Box<dyn ModuleRegistry>,
    pub plugins: Box<dyn PluginManager>,
    pub wrappers: Box<dyn WrapperManager>,
    pub events: Box<dyn EventDispatcher>,
    pub helpers: Box<dyn HelperLoader>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            view: Box::new(Noop),
            modules: Box::new(Noop),
            plugins: Box::new(Noop),
            wrappers: Box::new(Noop),
            events: Box::new(Noop),
            helpers: Box::new(Noop),
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Accepts and discards every hand-off.
#[derive(Debug, Clone, Copy, Default)]
pub struct Noop;

impl ViewLayer for Noop {
    fn add_script_path(&mut self, _path: &str) -> HookResult {
        Ok(())
    }
}

impl ModuleRegistry for Noop {
    fn register(&mut self, _: &str, _: &str, _: &str, _: &ExtensionConfig) -> HookResult {
        Ok(())
    }
}

impl PluginManager for Noop {
    fn add_plugin(&mut self, _: &str, _: &str, _: &str, _: &ExtensionConfig) -> HookResult {
        Ok(())
    }
}

impl WrapperManager for Noop {
    fn add_wrapper(&mut self, _: &str, _: &str, _: &ConfigMap) -> HookResult {
        Ok(())
    }
}

impl EventDispatcher for Noop {
    fn register(&mut self, _: &str, _: &str) -> HookResult {
        Ok(())
    }
}

impl ComponentHelper for Noop {
    fn init(&mut self) -> HookResult {
        Ok(())
    }
}

impl HelperLoader for Noop {
    fn load(&mut self, _spec: &HelperSpec) -> std::result::Result<Box<dyn ComponentHelper>, HookError> {
        Ok(Box::new(Noop))
    }
}

/// One recorded hand-off.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Registration {
    ScriptPath {
        path: String,
    },
    Module {
        extension: String,
        module_file: String,
        context: String,
        config: ExtensionConfig,
    },
    Plugin {
        key: String,
        file_name: String,
        path: String,
    },
    Wrapper {
        key: String,
        path: String,
        private_config: ConfigMap,
    },
    Event {
        event: String,
        component: String,
    },
    HelperLoaded {
        component: String,
        class: String,
    },
    HelperInit {
        component: String,
    },
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScriptPath { path } => write!(f, "script path {path}"),
            Self::Module {
                extension,
                module_file,
                context,
                ..
            } => write!(f, "module {extension}/{module_file} in {context}"),
            Self::Plugin { key, file_name, .. } => write!(f, "plugin {key} ({file_name})"),
            Self::Wrapper { key, path, .. } => write!(f, "wrapper {key} at {path}"),
            Self::Event { event, component } => write!(f, "event {event} -> {component}"),
            Self::HelperLoaded { component, class } => write!(f, "helper {class} for {component}"),
            Self::HelperInit { component } => write!(f, "helper init {component}"),
        }
    }
}

/// Collaborators that record every hand-off in order.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Rc<RefCell<Vec<Registration>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collaborator set writing into this recorder.
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            view: Box::new(self.clone()),
            modules: Box::new(self.clone()),
            plugins: Box::new(self.clone()),
            wrappers: Box::new(self.clone()),
            events: Box::new(self.clone()),
            helpers: Box::new(self.clone()),
        }
    }

    pub fn entries(&self) -> Vec<Registration> {
        self.log.borrow().clone()
    }

    pub fn take(&self) -> Vec<Registration> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    fn push(&self, registration: Registration) -> HookResult {
        self.log.borrow_mut().push(registration);
        Ok(())
    }
}

impl ViewLayer for Recorder {
    fn add_script_path(&mut self, path: &str) -> HookResult {
        self.push(Registration::ScriptPath { path: path.into() })
    }
}

impl ModuleRegistry for Recorder {
    fn register(
        &mut self,
        extension: &str,
        module_file: &str,
        context: &str,
        config: &ExtensionConfig,
    ) -> HookResult {
        self.push(Registration::Module {
            extension: extension.into(),
            module_file: module_file.into(),
            context: context.into(),
            config: config.clone(),
        })
    }
}

impl PluginManager for Recorder {
    fn add_plugin(
        &mut self,
        key: &str,
        file_name: &str,
        path: &str,
        _config: &ExtensionConfig,
    ) -> HookResult {
        self.push(Registration::Plugin {
            key: key.into(),
            file_name: file_name.into(),
            path: path.into(),
        })
    }
}

impl WrapperManager for Recorder {
    fn add_wrapper(&mut self, key: &str, path: &str, private_config: &ConfigMap) -> HookResult {
        self.push(Registration::Wrapper {
            key: key.into(),
            path: path.into(),
            private_config: private_config.clone(),
        })
    }
}

impl EventDispatcher for Recorder {
    fn register(&mut self, event: &str, component: &str) -> HookResult {
        self.push(Registration::Event {
            event: event.into(),
            component: component.into(),
        })
    }
}

impl HelperLoader for Recorder {
    fn load(&mut self, spec: &HelperSpec) -> std::result::Result<Box<dyn ComponentHelper>, HookError> {
        self.push(Registration::HelperLoaded {
            component: spec.component.clone(),
            class: spec.class.clone(),
        })?;
        Ok(Box::new(RecordedHelper {
            component: spec.component.clone(),
            recorder: self.clone(),
        }))
    }
}

struct RecordedHelper {
    component: String,
    recorder: Recorder,
}

impl ComponentHelper for RecordedHelper {
    fn init(&mut self) -> HookResult {
        self.recorder.push(Registration::HelperInit {
            component: self.component.clone(),
        })
    }
}
