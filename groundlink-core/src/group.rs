//! ## groundlink-core::group
//! **Fail-fast supervision of concurrent pipeline tasks**
//!
//! All tasks share one cancellation token, derived from the caller's. The
//! first task to fail cancels the token so its siblings wind down, and
//! [`TaskGroup::wait`] reports that first failure once every task has exited.

use std::future::Future;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::error::PipelineError;

type TaskOutcome = (String, Result<(), PipelineError>);

pub struct TaskGroup {
    cancel: CancellationToken,
    tasks: JoinSet<TaskOutcome>,
}

impl TaskGroup {
    pub fn new(parent: &CancellationToken) -> Self {
        Self {
            cancel: parent.child_token(),
            tasks: JoinSet::new(),
        }
    }

    /// Token shared by every task in the group.
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn spawn<F, Fut>(&mut self, name: impl Into<String>, task: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<(), PipelineError>> + Send + 'static,
    {
        let name = name.into();
        let fut = task(self.cancel.clone());
        self.tasks.spawn(async move { (name, fut.await) });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits for every task and returns the first error, if any.
    pub async fn wait(mut self) -> Result<(), PipelineError> {
        let mut first_error = None;

        while let Some(joined) = self.tasks.join_next().await {
            let err = match joined {
                Ok((name, Ok(()))) => {
                    debug!(task = %name, "Task finished");
                    continue;
                }
                Ok((name, Err(err))) => {
                    error!(task = %name, error = %err, "Task failed, cancelling group");
                    err
                }
                Err(join_error) => {
                    error!(error = %join_error, "Task aborted, cancelling group");
                    PipelineError::Task(join_error.to_string())
                }
            };

            self.cancel.cancel();
            first_error.get_or_insert(err);
        }

        first_error.map_or(Ok(()), Err)
    }
}
