//! Task supervision and failure reporting
//!
//! Each collector loop runs as one spawned task with an owned handle. The
//! task's [`Resilience`] tier decides what a failure means: a `Fatal` task
//! hands the error to whoever joins it (the process then exits), while a
//! `Contained` task logs the error and finishes quietly, leaving the process
//! running without it.

use crate::app::models::Resilience;
use crate::{Error, Result};
use std::error::Error as StdError;
use std::future::Future;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Log a failure with a fresh correlation identifier
///
/// Emits the message, the debug rendering of the error and every nested
/// source, all tagged with the same identifier, and returns that identifier.
pub fn report_failure(component: &str, context: &str, failure: &Error) -> Uuid {
    let correlation_id = Uuid::new_v4();
    error!(
        correlation_id = %correlation_id,
        "{}: Correlation ID {}. {} failed. Error: {}",
        component, correlation_id, context, failure
    );
    error!(
        correlation_id = %correlation_id,
        "{}: Correlation ID {}. Detail: {:?}",
        component, correlation_id, failure
    );

    let mut source = failure.source();
    while let Some(inner) = source {
        error!(
            correlation_id = %correlation_id,
            "{}: Correlation ID {}. Inner error: {}",
            component, correlation_id, inner
        );
        source = inner.source();
    }

    correlation_id
}

/// How a supervised task ended without a fatal error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The task returned normally
    Completed,
    /// A contained task failed and will not run again
    Disabled { correlation_id: Uuid },
}

/// A spawned task together with its resilience tier
#[derive(Debug)]
pub struct SupervisedTask {
    name: String,
    resilience: Resilience,
    handle: JoinHandle<Result<TaskOutcome>>,
}

/// Spawn a task under supervision
pub fn spawn_supervised<F>(name: impl Into<String>, resilience: Resilience, task: F) -> SupervisedTask
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    let name = name.into();
    let task_name = name.clone();

    let handle = tokio::spawn(async move {
        match task.await {
            Ok(()) => Ok(TaskOutcome::Completed),
            Err(e) => match resilience {
                Resilience::Contained => {
                    let correlation_id = report_failure(&task_name, "Processing", &e);
                    warn!(
                        "{}: replay stopped permanently after failure {}",
                        task_name, correlation_id
                    );
                    Ok(TaskOutcome::Disabled { correlation_id })
                }
                Resilience::Fatal => Err(e),
            },
        }
    });

    SupervisedTask {
        name,
        resilience,
        handle,
    }
}

impl SupervisedTask {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resilience(&self) -> Resilience {
        self.resilience
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Wait for the task to end
    ///
    /// Fatal failures are logged with a correlation identifier and returned
    /// as errors. Panics are treated as fatal regardless of tier.
    pub async fn join(self) -> Result<TaskOutcome> {
        let outcome = match self.handle.await {
            Ok(result) => result,
            Err(join_error) => Err(Error::task_join(&self.name, join_error.to_string())),
        };

        match &outcome {
            Ok(TaskOutcome::Completed) => info!("{}: task completed", self.name),
            Ok(TaskOutcome::Disabled { correlation_id }) => {
                info!("{}: task disabled ({})", self.name, correlation_id)
            }
            Err(e) => {
                report_failure(&self.name, "Processing", e);
            }
        }

        outcome
    }
}
