//! Extension discovery, caching and registry.
//!
//! - [`scanner`] - walks the extension root and decides, from modification
//!   times, which extensions need their configuration rebuilt
//! - [`cache`] - the persisted snapshot of merged configurations
//! - [`manager`] - the registry handed to the rest of the application
//! - [`hooks`] - collaborator traits receiving registrations
//! - [`options`] - manager options and file naming conventions

pub mod cache;
pub mod error;
pub mod hooks;
pub mod manager;
pub mod options;
pub mod scanner;

pub use cache::{CacheEntries, CacheSnapshot, ConfigCache};
pub use error::{ManagerError, Result};
pub use hooks::{
    Collaborators, ComponentHelper, EventDispatcher, HelperLoader, HelperSpec, HookError,
    HookResult, ModuleRegistry, Noop, PluginManager, Recorder, Registration, ViewLayer,
    WrapperManager,
};
pub use manager::ExtensionManager;
pub use options::{ComponentFile, DEFAULT_CACHE_FILE, FileConventions, ManagerOptions};
pub use scanner::{ChangeKind, ExtensionScanner, RESERVED_DIRS, ScanOutcome};
