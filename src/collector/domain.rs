//! Execution domains.
//!
//! A domain is a named thread draining a FIFO task queue. The collector runs
//! one collection task per domain per cycle, and all of its own state changes
//! happen on the signaling domain.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::thread::{self, JoinHandle, ThreadId};

use crossbeam_channel::{Receiver, Sender};

use crate::error::DomainError;

/// Work posted to a domain.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// The domains that contribute to every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Signaling,
    Worker,
    Network,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Signaling, Domain::Worker, Domain::Network];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Signaling => "signaling",
            Domain::Worker => "worker",
            Domain::Network => "network",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A thread with an unbounded task queue.
pub struct ExecutionDomain {
    name: String,
    tx: Option<Sender<Task>>,
    thread_id: ThreadId,
    handle: Option<JoinHandle<()>>,
}

impl ExecutionDomain {
    pub fn spawn(name: &str) -> Result<Self, DomainError> {
        let (tx, rx) = crossbeam_channel::unbounded::<Task>();
        let handle = thread::Builder::new()
            .name(format!("peerstats-{}", name))
            .spawn({
                let name = name.to_string();
                move || run(&name, rx)
            })
            .map_err(|source| DomainError::Spawn {
                name: name.to_string(),
                source,
            })?;

        log::debug!("DOMAIN_STARTED name={}", name);

        Ok(Self {
            name: name.to_string(),
            tx: Some(tx),
            thread_id: handle.thread().id(),
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the calling thread is this domain's thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Queue `task` behind everything already posted. Never blocks.
    ///
    /// Returns `false` if the domain thread is gone and the task was dropped.
    #[must_use]
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let posted = self
            .tx
            .as_ref()
            .map(|tx| tx.send(Box::new(task)).is_ok())
            .unwrap_or(false);
        if !posted {
            log::warn!("DOMAIN_POST_DROPPED name={}", self.name);
        }
        posted
    }
}

/// Drain the queue until every sender is gone. A panicking task aborts the
/// process.
fn run(name: &str, rx: Receiver<Task>) {
    while let Ok(task) = rx.recv() {
        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            log::error!("DOMAIN_TASK_PANICKED name={} action=abort", name);
            process::abort();
        }
    }
}

impl fmt::Debug for ExecutionDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionDomain")
            .field("name", &self.name)
            .field("thread_id", &self.thread_id)
            .finish()
    }
}

impl Drop for ExecutionDomain {
    fn drop(&mut self) {
        // Closing the queue lets the thread exit once it drains.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            // The last owner may be a task running on this very domain.
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
        log::debug!("DOMAIN_STOPPED name={}", self.name);
    }
}

/// One execution domain per [`Domain`].
#[derive(Debug)]
pub struct DomainSet {
    signaling: ExecutionDomain,
    worker: ExecutionDomain,
    network: ExecutionDomain,
}

impl DomainSet {
    pub fn spawn() -> Result<Self, DomainError> {
        Ok(Self {
            signaling: ExecutionDomain::spawn(Domain::Signaling.as_str())?,
            worker: ExecutionDomain::spawn(Domain::Worker.as_str())?,
            network: ExecutionDomain::spawn(Domain::Network.as_str())?,
        })
    }

    pub fn get(&self, domain: Domain) -> &ExecutionDomain {
        match domain {
            Domain::Signaling => &self.signaling,
            Domain::Worker => &self.worker,
            Domain::Network => &self.network,
        }
    }

    pub fn signaling(&self) -> &ExecutionDomain {
        &self.signaling
    }
}
