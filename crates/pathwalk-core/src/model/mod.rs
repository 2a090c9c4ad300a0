//! Model capability interface.
//!
//! A model is a named set of zero-argument actions, one per step name the
//! engine can produce. Tables are built once when the model is loaded; an
//! unknown step is a lookup miss, never a reflective call.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{WalkError, WalkResult};

pub mod scripted;
pub mod wikipedia;

pub use scripted::ScriptedModel;

/// Provider of named actions, owned by one walk at a time.
pub trait ActionProvider: Send {
    fn model_name(&self) -> &str;

    /// Sorted action names.
    fn action_names(&self) -> Vec<&str>;

    fn contains(&self, step: &str) -> bool;

    /// Run the action named `step`; `None` when no such action exists.
    fn invoke(&mut self, step: &str) -> Option<String>;
}

/// Boxed action over the model's session state.
pub type Action<S> = Box<dyn FnMut(&mut S) -> String + Send>;

/// Action table over owned session state `S`.
pub struct ActionTable<S> {
    name: String,
    state: S,
    actions: BTreeMap<String, Action<S>>,
}

impl<S: Send> ActionTable<S> {
    pub fn new(name: impl Into<String>, state: S) -> Self {
        Self {
            name: name.into(),
            state,
            actions: BTreeMap::new(),
        }
    }

    pub fn with_action<F>(mut self, step: impl Into<String>, action: F) -> Self
    where
        F: FnMut(&mut S) -> String + Send + 'static,
    {
        self.actions.insert(step.into(), Box::new(action));
        self
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

impl<S> fmt::Debug for ActionTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionTable")
            .field("name", &self.name)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<S: Send> ActionProvider for ActionTable<S> {
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
        let action = self.actions.get_mut(step)?;
        Some(action(&mut self.state))
    }
}

/// Names of the models compiled into this crate.
pub fn builtin_models() -> &'static [&'static str] {
    &[wikipedia::MODEL_NAME]
}

fn builtin(name: &str) -> Option<Box<dyn ActionProvider>> {
    match name {
        wikipedia::MODEL_NAME => Some(Box::new(wikipedia::model())),
        _ => None,
    }
}

/// Build a fresh model handle from a name or path.
///
/// `.yaml`/`.yml` files load a [`ScriptedModel`]. Anything else is matched by
/// file stem against [`builtin_models`], so `models/wikipedia_navigation_models.rb`
/// and `wikipedia_navigation_models` name the same model.
pub fn resolve(spec: &str) -> WalkResult<Box<dyn ActionProvider>> {
    let path = Path::new(spec);
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    if is_yaml {
        return Ok(Box::new(ScriptedModel::from_path(path)?));
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(spec)
        .to_string();

    builtin(&stem).ok_or_else(|| WalkError::ModelResolve {
        name: spec.to_string(),
        message: format!(
            "no built-in model named {stem} (available: {})",
            builtin_models().join(", ")
        ),
    })
}
