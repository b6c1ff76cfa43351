//! Per-identity aggregation workers.
//!
//! Each `(company, manager)` pair gets one tokio task fed by an unbounded queue, so recomputes
//! for the same manager never overlap while different managers proceed in parallel. Jobs that
//! queue up while a recompute runs are folded into the next one: every waiting ticket receives
//! the same result, and that result reflects every insert made before its job was scheduled.
//! A worker whose queue is empty after a recompute unregisters itself and exits; the next job for
//! that manager starts a fresh one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::domain::{CompanyId, FormSubmission, ManagerKey};
use super::repository::{AggregateStore, ResponseStore};
use super::service::{AggregateRefresh, AssessmentService, ServiceError, SubmissionReceipt};

pub type DispatchOutcome = Result<AggregateRefresh, DispatchError>;

type IdentityKey = (CompanyId, ManagerKey);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("no assessments found for manager '{manager}' in company '{company}'")]
    NotFound {
        company: CompanyId,
        manager: ManagerKey,
    },
    #[error("aggregation failed: {0}")]
    Failed(String),
    #[error("aggregation dispatcher is shut down")]
    Closed,
    #[error("aggregation worker stopped before replying")]
    WorkerGone,
    #[error("no tokio runtime available to host aggregation workers")]
    NoRuntime,
}

impl From<ServiceError> for DispatchError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::ManagerNotFound { company, manager } => {
                Self::NotFound { company, manager }
            }
            other => Self::Failed(other.to_string()),
        }
    }
}

/// Handle on a scheduled recompute. Dropping it does not cancel the job.
#[derive(Debug)]
pub struct AggregationTicket {
    receiver: oneshot::Receiver<DispatchOutcome>,
}

impl AggregationTicket {
    fn resolved(outcome: DispatchOutcome) -> Self {
        let (sender, receiver) = oneshot::channel();
        let _ = sender.send(outcome);
        Self { receiver }
    }

    pub async fn wait(self) -> DispatchOutcome {
        self.receiver
            .await
            .unwrap_or_else(|_| Err(DispatchError::WorkerGone))
    }
}

struct AggregationJob {
    reply: oneshot::Sender<DispatchOutcome>,
}

struct Worker {
    id: u64,
    sender: mpsc::UnboundedSender<AggregationJob>,
    task: JoinHandle<()>,
}

type WorkerMap = Arc<Mutex<HashMap<IdentityKey, Worker>>>;

pub struct AggregationDispatcher<R, A> {
    service: Arc<AssessmentService<R, A>>,
    runtime: Handle,
    workers: WorkerMap,
    next_worker_id: AtomicU64,
    closed: AtomicBool,
}

impl<R, A> AggregationDispatcher<R, A>
where
    R: ResponseStore + 'static,
    A: AggregateStore + 'static,
{
    pub fn new(service: Arc<AssessmentService<R, A>>, runtime: Handle) -> Self {
        Self {
            service,
            runtime,
            workers: Arc::new(Mutex::new(HashMap::new())),
            next_worker_id: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Binds to the runtime the caller is running on.
    pub fn try_current(service: Arc<AssessmentService<R, A>>) -> Result<Self, DispatchError> {
        let runtime = Handle::try_current().map_err(|_| DispatchError::NoRuntime)?;
        Ok(Self::new(service, runtime))
    }

    pub fn service(&self) -> &AssessmentService<R, A> {
        &self.service
    }

    /// Queues a recompute for one manager and returns immediately.
    ///
    /// Starts a worker when the manager has none, or when its previous worker has died.
    pub fn schedule(&self, company: &CompanyId, manager: &ManagerKey) -> AggregationTicket {
        let key = (company.clone(), manager.clone());
        let mut workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
        // Checked under the lock so a worker is never added after shutdown drained the map.
        if self.closed.load(Ordering::Acquire) {
            return AggregationTicket::resolved(Err(DispatchError::Closed));
        }

        let (reply, receiver) = oneshot::channel();
        let job = AggregationJob { reply };
        let job = match workers.get(&key) {
            Some(worker) => match worker.sender.send(job) {
                Ok(()) => return AggregationTicket { receiver },
                Err(mpsc::error::SendError(job)) => {
                    warn!(
                        company = %company,
                        manager = %manager,
                        "replacing dead aggregation worker"
                    );
                    job
                }
            },
            None => job,
        };

        let worker = self.spawn_worker(key.clone());
        let sent = worker.sender.send(job);
        workers.insert(key, worker);
        match sent {
            Ok(()) => AggregationTicket { receiver },
            Err(_) => AggregationTicket::resolved(Err(DispatchError::WorkerGone)),
        }
    }

    /// Stores the submission, then schedules the manager's recompute.
    ///
    /// Scheduling happens only after the insert returned, so the recompute always sees it.
    pub fn submit_and_schedule(
        &self,
        company: &CompanyId,
        submission: FormSubmission,
    ) -> Result<(SubmissionReceipt, AggregationTicket), ServiceError> {
        let receipt = self.service.submit(company, submission)?;
        let ticket = self.schedule(&receipt.company, &receipt.manager);
        Ok((receipt, ticket))
    }

    /// Workers currently alive. Idle workers retire, so this drops back once queues drain.
    pub fn worker_count(&self) -> usize {
        self.workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Stops accepting jobs, lets queued jobs finish, and waits for every worker.
    pub async fn shutdown(&self) {
        let workers: Vec<Worker> = {
            let mut workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
            self.closed.store(true, Ordering::Release);
            workers.drain().map(|(_, worker)| worker).collect()
        };

        for Worker { sender, task, .. } in workers {
            drop(sender);
            if let Err(err) = task.await {
                error!(error = %err, "aggregation worker panicked");
            }
        }
    }

    fn spawn_worker(&self, key: IdentityKey) -> Worker {
        let id = self.next_worker_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();
        let task = self.runtime.spawn(run_worker(
            self.service.clone(),
            self.workers.clone(),
            id,
            key,
            receiver,
        ));
        Worker { id, sender, task }
    }
}

async fn run_worker<R, A>(
    service: Arc<AssessmentService<R, A>>,
    workers: WorkerMap,
    id: u64,
    key: IdentityKey,
    mut receiver: mpsc::UnboundedReceiver<AggregationJob>,
) where
    R: ResponseStore + 'static,
    A: AggregateStore + 'static,
{
    let (company, manager) = key.clone();
    debug!(company = %company, manager = %manager, "aggregation worker started");

    let mut next = receiver.recv().await;
    while let Some(job) = next {
        let mut replies = vec![job.reply];
        while let Ok(queued) = receiver.try_recv() {
            replies.push(queued.reply);
        }

        let outcome = recompute(service.clone(), company.clone(), manager.clone()).await;
        if replies.len() > 1 {
            debug!(
                company = %company,
                manager = %manager,
                coalesced = replies.len(),
                "coalesced aggregation jobs"
            );
        }

        // `schedule` sends while holding the map lock, so an empty queue seen under the lock
        // stays empty until this worker is unregistered.
        next = {
            let mut map = workers.lock().unwrap_or_else(PoisonError::into_inner);
            match receiver.try_recv() {
                Ok(queued) => Some(queued),
                Err(_) => {
                    if map.get(&key).is_some_and(|worker| worker.id == id) {
                        map.remove(&key);
                    }
                    None
                }
            }
        };

        for reply in replies {
            let _ = reply.send(outcome.clone());
        }
    }

    debug!(company = %company, manager = %manager, "aggregation worker stopped");
}

async fn recompute<R, A>(
    service: Arc<AssessmentService<R, A>>,
    company: CompanyId,
    manager: ManagerKey,
) -> DispatchOutcome
where
    R: ResponseStore + 'static,
    A: AggregateStore + 'static,
{
    let (log_company, log_manager) = (company.clone(), manager.clone());
    match tokio::task::spawn_blocking(move || service.refresh(&company, &manager)).await {
        Ok(Ok(refresh)) => Ok(refresh),
        Ok(Err(err)) => {
            warn!(
                company = %log_company,
                manager = %log_manager,
                error = %err,
                "aggregation failed"
            );
            Err(err.into())
        }
        Err(err) => {
            error!(
                company = %log_company,
                manager = %log_manager,
                error = %err,
                "aggregation task aborted"
            );
            Err(DispatchError::Failed(err.to_string()))
        }
    }
}
