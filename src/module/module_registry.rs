use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CORE_MODULE_ID: &str = "botpress";
pub const CORE_MODULE_NAME: &str = "Botpress";
pub const DEFAULT_ICON: &str = "view_module";
pub const DEFAULT_URL: &str = "/";

/// A loaded module as seen by the notification center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    pub name: String,
    pub root_dir: PathBuf,
    pub menu_icon: Option<String>,
    pub menu_text: Option<String>,
}

/// Who is asking for a notification to be created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Caller {
    #[default]
    Core,
    Module(String),
    /// A source path inside some module's root directory.
    Path(PathBuf),
}

/// Display identity stamped onto a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub module_id: String,
    pub icon: String,
    pub name: String,
    pub default_url: String,
}

impl Attribution {
    pub fn core() -> Self {
        Self {
            module_id: CORE_MODULE_ID.to_string(),
            icon: DEFAULT_ICON.to_string(),
            name: CORE_MODULE_NAME.to_string(),
            default_url: DEFAULT_URL.to_string(),
        }
    }
}

impl From<&ModuleInfo> for Attribution {
    fn from(module: &ModuleInfo) -> Self {
        Self {
            module_id: module.name.clone(),
            icon: module
                .menu_icon
                .clone()
                .unwrap_or_else(|| DEFAULT_ICON.to_string()),
            name: module
                .menu_text
                .clone()
                .unwrap_or_else(|| module.name.clone()),
            default_url: format!("/modules/{}", module.name),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Arc<Vec<ModuleInfo>>,
}

impl ModuleRegistry {
    pub fn new(modules: Vec<ModuleInfo>) -> Self {
        Self {
            modules: Arc::new(modules),
        }
    }

    /// Loads a JSON array of modules.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read module registry {}", path.display()))?;
        let modules: Vec<ModuleInfo> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid module registry {}", path.display()))?;

        tracing::info!("Loaded {} module(s) from {}", modules.len(), path.display());
        Ok(Self::new(modules))
    }

    pub fn modules(&self) -> &[ModuleInfo] {
        &self.modules
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ModuleInfo> {
        self.modules.iter().find(|module| module.name == name)
    }

    /// The module whose root directory contains `path`; the deepest root wins.
    pub fn find_by_path(&self, path: &Path) -> Option<&ModuleInfo> {
        self.modules
            .iter()
            .filter(|module| path.starts_with(&module.root_dir))
            .max_by_key(|module| module.root_dir.components().count())
    }

    pub fn resolve(&self, caller: &Caller) -> Attribution {
        let module = match caller {
            Caller::Core => None,
            Caller::Module(name) => self.find_by_name(name),
            Caller::Path(path) => self.find_by_path(path),
        };

        match module {
            Some(module) => Attribution::from(module),
            None => {
                if *caller != Caller::Core {
                    tracing::debug!("No registered module for {:?}, attributing to core", caller);
                }
                Attribution::core()
            }
        }
    }
}
