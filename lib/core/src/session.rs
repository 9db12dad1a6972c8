// Background query dispatch for interactive callers
// One worker thread per session; newer submissions supersede older ones

use crate::corpus::CorpusHandle;
use crate::ranker::{recommend, Recommendations};
use crate::Result;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of one submitted query, tagged with its ticket
#[derive(Debug)]
pub struct QueryOutcome {
    pub ticket: u64,
    pub query: String,
    pub result: Result<Recommendations>,
}

struct QueryJob {
    ticket: u64,
    query: String,
    k: usize,
}

struct SessionState {
    pending: VecDeque<QueryJob>,
    latest_ticket: u64,
    latest: Option<QueryOutcome>,
    running: bool,
}

struct Shared {
    state: Mutex<SessionState>,
    job_ready: Condvar,
    result_ready: Condvar,
}

/// Runs recommendations off the caller's thread with last-query-wins
/// semantics
///
/// Every [`submit`](QuerySession::submit) returns a ticket. Only the outcome
/// of the newest ticket is ever handed back; queued jobs that have been
/// superseded are skipped and results of superseded jobs that were already
/// running are dropped.
pub struct QuerySession {
    corpus: Arc<CorpusHandle>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl QuerySession {
    pub fn new(corpus: Arc<CorpusHandle>) -> Result<Self> {
        let shared = Arc::new(Shared {
            state: Mutex::new(SessionState {
                pending: VecDeque::new(),
                latest_ticket: 0,
                latest: None,
                running: true,
            }),
            job_ready: Condvar::new(),
            result_ready: Condvar::new(),
        });

        let worker_shared = shared.clone();
        let worker_corpus = corpus.clone();
        let worker = thread::Builder::new()
            .name("query-session".to_string())
            .spawn(move || run_worker(worker_shared, worker_corpus))?;

        Ok(Self {
            corpus,
            shared,
            worker: Some(worker),
        })
    }

    /// Submit a query with the corpus's configured `top_k`
    pub fn submit(&self, query: impl Into<String>) -> u64 {
        self.submit_with_k(query, self.corpus.config().top_k)
    }

    pub fn submit_with_k(&self, query: impl Into<String>, k: usize) -> u64 {
        let mut state = self.shared.state.lock();
        state.latest_ticket += 1;
        let ticket = state.latest_ticket;

        let superseded = state.pending.len();
        if superseded > 0 {
            debug!(superseded, "dropping queued queries");
        }
        state.pending.clear();
        state.pending.push_back(QueryJob {
            ticket,
            query: query.into(),
            k,
        });
        self.shared.job_ready.notify_one();
        ticket
    }

    /// Ticket of the most recent submission, 0 before the first one
    pub fn latest_ticket(&self) -> u64 {
        self.shared.state.lock().latest_ticket
    }

    /// Take the newest outcome if it has arrived
    pub fn try_latest(&self) -> Option<QueryOutcome> {
        let mut state = self.shared.state.lock();
        take_current(&mut state)
    }

    /// Block until the newest submission completes or `timeout` elapses
    pub fn wait_latest(&self, timeout: Duration) -> Option<QueryOutcome> {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        loop {
            if let Some(outcome) = take_current(&mut state) {
                return Some(outcome);
            }
            if state.latest_ticket == 0 {
                return None;
            }
            if self
                .shared
                .result_ready
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                return take_current(&mut state);
            }
        }
    }

    pub fn corpus(&self) -> &Arc<CorpusHandle> {
        &self.corpus
    }
}

impl Drop for QuerySession {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.running = false;
            state.pending.clear();
        }
        self.shared.job_ready.notify_all();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn take_current(state: &mut SessionState) -> Option<QueryOutcome> {
    match &state.latest {
        Some(outcome) if outcome.ticket == state.latest_ticket => state.latest.take(),
        _ => None,
    }
}

fn run_worker(shared: Arc<Shared>, corpus: Arc<CorpusHandle>) {
    loop {
        let job = {
            let mut state = shared.state.lock();
            while state.pending.is_empty() && state.running {
                shared.job_ready.wait(&mut state);
            }
            if !state.running {
                break;
            }
            match state.pending.pop_front() {
                Some(job) if job.ticket == state.latest_ticket => job,
                Some(job) => {
                    debug!(ticket = job.ticket, "skipping superseded query");
                    continue;
                }
                None => continue,
            }
        };

        let result = recommend(&corpus, &job.query, job.k);

        let mut state = shared.state.lock();
        if job.ticket == state.latest_ticket {
            state.latest = Some(QueryOutcome {
                ticket: job.ticket,
                query: job.query,
                result,
            });
            shared.result_ready.notify_all();
        } else {
            debug!(
                ticket = job.ticket,
                latest = state.latest_ticket,
                "discarding stale result"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::item::Item;
    use crate::Error;

    fn session() -> QuerySession {
        let corpus = CorpusHandle::from_items(
            vec![
                Item::new("Avatar").with_genres("Action Adventure"),
                Item::new("Avengers").with_genres("Action Adventure"),
                Item::new("Titanic").with_genres("Drama Romance"),
            ],
            EngineConfig::default(),
        )
        .unwrap();
        QuerySession::new(Arc::new(corpus)).unwrap()
    }

    #[test]
    fn test_single_query() {
        let session = session();
        let ticket = session.submit("avatar");
        let outcome = session.wait_latest(Duration::from_secs(5)).unwrap();

        assert_eq!(outcome.ticket, ticket);
        let recs = outcome.result.unwrap();
        assert_eq!(recs.items[0].title, "Avengers");
    }

    #[test]
    fn test_last_query_wins() {
        let session = session();
        session.submit("avatar");
        session.submit("titanic");
        let last = session.submit("venger");

        let outcome = session.wait_latest(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.ticket, last);
        assert_eq!(outcome.query, "venger");
        assert_eq!(outcome.result.unwrap().query_title, "Avengers");
        assert!(session.try_latest().is_none());
    }

    #[test]
    fn test_not_found_does_not_poison_session() {
        let session = session();
        session.submit("Nonexistent Movie");
        let outcome = session.wait_latest(Duration::from_secs(5)).unwrap();
        assert!(matches!(outcome.result, Err(Error::NotFound(_))));

        session.submit("Titanic");
        let outcome = session.wait_latest(Duration::from_secs(5)).unwrap();
        assert!(outcome.result.is_ok());
    }

    #[test]
    fn test_wait_without_submission() {
        let session = session();
        assert_eq!(session.latest_ticket(), 0);
        assert!(session.wait_latest(Duration::from_millis(10)).is_none());
    }
}
