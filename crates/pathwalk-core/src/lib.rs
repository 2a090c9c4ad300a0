//! Model-based test walk driver.
//!
//! Requests abstract test steps from a graph traversal engine (GraphWalker
//! REST API), dispatches each step to a model action, records the walk, and
//! replays saved walks without the engine.
//!
//! # Quick Start
//!
//! ```no_run
//! use pathwalk_core::{model, EngineConfig, NoopListener, TraversalClient, WalkDriver};
//!
//! # async fn example() -> pathwalk_core::WalkResult<()> {
//! let client = TraversalClient::new(EngineConfig::from_env())?;
//! let mut driver = WalkDriver::new()
//!     .with_model(model::resolve("wikipedia_navigation_models")?)
//!     .with_recording("walks");
//!
//! let report = driver.run_live(&client, &mut NoopListener).await?;
//! println!("{} steps, stopped: {}", report.step_count, report.termination);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `PATHWALK_ENGINE_URL` | Engine base URL (default: `http://localhost:8887/graphwalker`) |
//! | `PATHWALK_ENGINE_TIMEOUT` | Request timeout in seconds (default: none) |

pub mod dispatch;
pub mod driver;
pub mod engine;
pub mod error;
pub mod model;
pub mod outcome;
pub mod recorder;
pub mod replay;
pub mod report;

pub use dispatch::dispatch;
pub use driver::{DriverState, NoopListener, WalkDriver, WalkListener};
pub use engine::{Endpoint, EngineConfig, TraversalClient, TraversalSession, DEFAULT_ENGINE_URL};
pub use error::{WalkError, WalkResult};
pub use model::{ActionProvider, ActionTable, ScriptedModel};
pub use outcome::Outcome;
pub use recorder::{walk_file_name, WalkRecorder, WALK_FILE_EXTENSION};
pub use replay::WalkLog;
pub use report::{StopReason, WalkMode, WalkReport};
