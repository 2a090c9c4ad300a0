//! Scripted models loaded from YAML.
//!
//! ```yaml
//! name: wiki_smoke
//! actions:
//!   e_main: "SUCCESS. Browsed to Main Page."
//!   v_about:
//!     - "SUCCESS. Arrived at About Page."
//!     - "FAILURE: wrong page"
//! ```
//!
//! A list answers one message per call; its last message repeats.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::ActionProvider;
use crate::error::{WalkError, WalkResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Script {
    Fixed(String),
    Sequence(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptFile {
    #[serde(default)]
    name: Option<String>,
    actions: BTreeMap<String, Script>,
}

#[derive(Debug, Clone)]
struct ScriptedAction {
    messages: Vec<String>,
    calls: usize,
}

impl ScriptedAction {
    fn next(&mut self) -> String {
        let idx = self.calls.min(self.messages.len() - 1);
        self.calls += 1;
        self.messages[idx].clone()
    }
}

/// Model whose actions answer canned messages.
#[derive(Debug, Clone)]
pub struct ScriptedModel {
    name: String,
    actions: BTreeMap<String, ScriptedAction>,
}

impl ScriptedModel {
    pub fn from_path(path: &Path) -> WalkResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| WalkError::ModelResolve {
            name: path.display().to_string(),
            message: format!("failed to read model file: {e}"),
        })?;
        let default_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("scripted")
            .to_string();
        Self::from_yaml(&content, &default_name)
    }

    pub fn from_yaml(content: &str, default_name: &str) -> WalkResult<Self> {
        let file: ScriptFile =
            serde_yaml::from_str(content).map_err(|e| WalkError::ModelResolve {
                name: default_name.to_string(),
                message: format!("invalid model script: {e}"),
            })?;

        let name = file.name.unwrap_or_else(|| default_name.to_string());
        let mut actions = BTreeMap::new();
        for (step, script) in file.actions {
            let messages = match script {
                Script::Fixed(m) => vec![m],
                Script::Sequence(ms) => ms,
            };
            if messages.is_empty() {
                return Err(WalkError::ModelResolve {
                    name,
                    message: format!("action {step} has no messages"),
                });
            }
            actions.insert(step, ScriptedAction { messages, calls: 0 });
        }

        Ok(Self { name, actions })
    }
}

impl ActionProvider for ScriptedModel {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn action_names(&self) -> Vec<&str> {
        self.actions.keys().map(String::as_str).collect()
    }

    fn contains(&self, step: &str) -> bool {
        self.actions.contains_key(step)
    }

    fn invoke(&mut self, step: &str) -> Option<String> {
        self.actions.get_mut(step).map(ScriptedAction::next)
    }
}
