//! Bounded-concurrency task batches.
//!
//! # Responsibilities
//! - Run a fixed list of tasks on a fixed number of workers
//! - Capture each task's error on the task itself
//! - Report failures in task-list order once the batch is done
//!
//! # Design Decisions
//! - One pool per batch; nothing carries over between batches
//! - A failing or panicking task never stops its siblings
//! - Workers run on the blocking thread pool since page tasks do file I/O
//! - No cancellation: a hung task holds `run` open

use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::Span;

use crate::routing::PageError;

/// Work performed by a task.
pub type Work = Box<dyn FnOnce() -> Result<(), PageError> + Send>;

/// Why a task failed.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Failed(#[from] PageError),

    #[error("task panicked: {0}")]
    Panicked(String),

    /// The worker holding the task failed, so its outcome is unknown.
    #[error("task outcome lost: pool worker failed")]
    Lost,
}

/// A named unit of work paired with its logger.
pub struct Task {
    name: String,
    span: Span,
    work: Option<Work>,
    executed: bool,
    error: Option<TaskError>,
}

impl Task {
    pub fn new(name: impl Into<String>, span: Span, work: Work) -> Self {
        Self {
            name: name.into(),
            span,
            work: Some(work),
            executed: false,
            error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Whether the task has run.
    pub fn executed(&self) -> bool {
        self.executed
    }

    pub fn error(&self) -> Option<&TaskError> {
        self.error.as_ref()
    }

    fn lost(name: String, span: Span) -> Self {
        Self {
            name,
            span,
            work: None,
            executed: false,
            error: Some(TaskError::Lost),
        }
    }

    fn execute(&mut self) {
        let Some(work) = self.work.take() else {
            return;
        };
        let _guard = self.span.enter();

        let outcome = panic::catch_unwind(AssertUnwindSafe(work));
        self.executed = true;
        self.error = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(TaskError::Failed(e)),
            Err(payload) => Some(TaskError::Panicked(panic_message(payload.as_ref()))),
        };
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("executed", &self.executed)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

type Queue = Arc<Mutex<VecDeque<(usize, Task)>>>;

/// A batch of tasks and the number of workers that will run it.
#[derive(Debug)]
pub struct Pool {
    tasks: Vec<Task>,
    concurrency: usize,
}

impl Pool {
    /// Create a batch. A concurrency of zero is treated as one.
    pub fn new(tasks: Vec<Task>, concurrency: usize) -> Self {
        Self {
            tasks,
            concurrency: concurrency.max(1),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Run every task exactly once and wait for all of them.
    pub async fn run(&mut self) {
        let total = self.tasks.len();
        if total == 0 {
            return;
        }

        let names: Vec<(String, Span)> = self
            .tasks
            .iter()
            .map(|task| (task.name.clone(), task.span.clone()))
            .collect();
        let queue: Queue = Arc::new(Mutex::new(self.tasks.drain(..).enumerate().collect()));
        let workers = self.concurrency.min(total);
        tracing::debug!(tasks = total, workers, "Pool starting");

        let mut set = JoinSet::new();
        for worker in 0..workers {
            let queue = Arc::clone(&queue);
            set.spawn_blocking(move || work_loop(worker, &queue));
        }

        let mut slots: Vec<Option<Task>> = (0..total).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(done) => {
                    for (index, task) in done {
                        slots[index] = Some(task);
                    }
                }
                Err(e) => tracing::error!(error = %e, "Pool worker failed"),
            }
        }

        self.tasks = restore(slots, names);
        tracing::debug!(
            tasks = self.tasks.len(),
            failed = self.failed(),
            "Pool finished"
        );
    }

    /// Call `f` for every failed task, in task-list order.
    pub fn each_error<F>(&self, mut f: F)
    where
        F: FnMut(&Task, &TaskError),
    {
        for task in &self.tasks {
            if let Some(error) = &task.error {
                f(task, error);
            }
        }
    }

    fn failed(&self) -> usize {
        self.tasks.iter().filter(|t| t.error.is_some()).count()
    }
}

// Slots a failed worker never handed back become `Lost` tasks, so the
// task list keeps its length and order.
fn restore(slots: Vec<Option<Task>>, names: Vec<(String, Span)>) -> Vec<Task> {
    slots
        .into_iter()
        .zip(names)
        .map(|(slot, (name, span))| slot.unwrap_or_else(|| Task::lost(name, span)))
        .collect()
}

fn work_loop(worker: usize, queue: &Mutex<VecDeque<(usize, Task)>>) -> Vec<(usize, Task)> {
    let mut done = Vec::new();
    loop {
        // Release the queue lock before running the task.
        let next = queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let Some((index, mut task)) = next else {
            break;
        };
        tracing::trace!(worker, task = %task.name, "Task picked up");
        task.execute();
        done.push((index, task));
    }
    done
}
