//! Model action dispatch.

use tracing::debug;

use crate::error::{WalkError, WalkResult};
use crate::model::ActionProvider;
use crate::outcome::Outcome;

/// Invoke the action named `step` and classify its message.
///
/// Fails with [`WalkError::UnknownAction`] when the model has no such action.
/// A failing action is still `Ok(Outcome::Failure(..))`; the caller decides
/// whether that ends the walk.
pub fn dispatch(model: &mut dyn ActionProvider, step: &str) -> WalkResult<Outcome> {
    let Some(message) = model.invoke(step) else {
        return Err(WalkError::UnknownAction {
            step: step.to_string(),
            model: model.model_name().to_string(),
        });
    };

    let outcome = Outcome::classify(message);
    debug!(step, model = model.model_name(), outcome = ?outcome, "dispatched action");
    Ok(outcome)
}
