pub mod module_registry;

pub use module_registry::{Attribution, Caller, ModuleInfo, ModuleRegistry};
