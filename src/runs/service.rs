//! The mock runs API: listing and lookup with simulated latency and faults.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::catalog::RunCatalog;
use super::error::{Result, RunsError};
use super::fault::{FaultInjector, FaultPolicy, NoFaults};
use super::model::AgentRun;
use super::query::{Page, RunsQuery};

/// Asynchronous access to runs, as consumed by HTTP handlers.
#[async_trait]
pub trait RunsApi: Send + Sync + fmt::Debug {
    /// List a page of runs matching `query`.
    async fn list_runs(&self, query: &RunsQuery) -> Result<Page>;

    /// Look up a single run by exact identifier.
    async fn get_run(&self, run_id: &str) -> Result<AgentRun>;

    /// Size of the backing collection.
    fn total_runs(&self) -> usize;
}

/// Simulated network latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    /// Lower bound of the listing delay.
    pub list_min: Duration,
    /// Upper bound of the listing delay.
    pub list_max: Duration,
    /// Fixed lookup delay.
    pub get: Duration,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            list_min: Duration::from_millis(800),
            list_max: Duration::from_millis(1200),
            get: Duration::from_millis(1000),
        }
    }
}

impl LatencyProfile {
    /// No delay at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            list_min: Duration::ZERO,
            list_max: Duration::ZERO,
            get: Duration::ZERO,
        }
    }
}

/// In-memory runs service over an immutable [`RunCatalog`].
///
/// Cloning is cheap; clones share the catalog and fault state.
#[derive(Debug, Clone)]
pub struct RunsService {
    inner: Arc<ServiceInner>,
}

#[derive(Debug)]
struct ServiceInner {
    catalog: RunCatalog,
    faults: FaultInjector,
    latency: LatencyProfile,
    jitter: Mutex<StdRng>,
}

impl RunsService {
    /// Create a service with default latency and no fault injection.
    #[must_use]
    pub fn new(catalog: RunCatalog) -> Self {
        Self::with_options(catalog, Arc::new(NoFaults), LatencyProfile::default(), 0)
    }

    /// Create a service with an explicit fault policy, latency profile, and
    /// seed for latency jitter.
    #[must_use]
    pub fn with_options(
        catalog: RunCatalog,
        policy: Arc<dyn FaultPolicy>,
        latency: LatencyProfile,
        seed: u64,
    ) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                catalog,
                faults: FaultInjector::new(policy),
                latency,
                jitter: Mutex::new(StdRng::seed_from_u64(seed)),
            }),
        }
    }

    /// The backing collection.
    #[must_use]
    pub fn catalog(&self) -> &RunCatalog {
        &self.inner.catalog
    }

    /// Injected failures still armed.
    #[must_use]
    pub fn pending_faults(&self) -> u32 {
        self.inner.faults.pending()
    }

    /// List a page of runs.
    ///
    /// Sleeps for a randomized delay first. Fails with
    /// [`RunsError::Transient`] while a fault burst is armed.
    pub async fn list(&self, query: &RunsQuery) -> Result<Page> {
        tokio::time::sleep(self.list_delay()).await;

        self.inner.faults.check()?;
        let page = query.apply(self.inner.catalog.runs())?;
        self.inner.faults.record_success();

        debug!(
            name: "runs.list",
            search = %query.search,
            status = query.status.as_str(),
            sort = query.sort_order.as_str(),
            page = page.page,
            total = page.total,
            "Listed runs"
        );
        Ok(page)
    }

    /// Look up one run by identifier.
    pub async fn get(&self, run_id: &str) -> Result<AgentRun> {
        tokio::time::sleep(self.inner.latency.get).await;

        self.inner
            .catalog
            .find(run_id)
            .cloned()
            .ok_or_else(|| RunsError::NotFound {
                run_id: run_id.to_string(),
            })
    }

    fn list_delay(&self) -> Duration {
        let LatencyProfile {
            list_min, list_max, ..
        } = self.inner.latency;
        if list_max <= list_min {
            return list_min;
        }

        let mut rng = self.inner.jitter.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(list_min..=list_max)
    }
}

#[async_trait]
impl RunsApi for RunsService {
    async fn list_runs(&self, query: &RunsQuery) -> Result<Page> {
        self.list(query).await
    }

    async fn get_run(&self, run_id: &str) -> Result<AgentRun> {
        self.get(run_id).await
    }

    fn total_runs(&self) -> usize {
        self.inner.catalog.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::fault::ScriptedFaults;
    use crate::runs::model::RunStatus;
    use chrono::{DateTime, Utc};
    use tokio::time::Instant;

    fn catalog() -> RunCatalog {
        let now = DateTime::parse_from_rfc3339("2026-10-18T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        RunCatalog::generate(50, 99, now)
    }

    fn instant_service(policy: Arc<dyn FaultPolicy>) -> RunsService {
        RunsService::with_options(catalog(), policy, LatencyProfile::none(), 1)
    }

    #[tokio::test]
    async fn test_list_first_page() {
        let service = instant_service(Arc::new(NoFaults));
        let page = service.list(&RunsQuery::new()).await.unwrap();

        assert_eq!(page.runs.len(), 10);
        assert_eq!(page.total, 50);
        assert_eq!(page.total_pages, 5);
    }

    #[tokio::test]
    async fn test_list_is_idempotent_without_faults() {
        let service = instant_service(Arc::new(NoFaults));
        let query = RunsQuery::new()
            .with_status(RunStatus::Succeeded)
            .with_page_size(4);

        let first = service.list(&query).await.unwrap();
        let second = service.list(&query).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fault_burst_then_recovery() {
        // First success arms one failure, the next arms two.
        let service = instant_service(Arc::new(ScriptedFaults::new([1, 2])));
        let query = RunsQuery::new();

        assert!(service.list(&query).await.is_ok());
        assert_eq!(service.list(&query).await, Err(RunsError::Transient));
        assert!(service.list(&query).await.is_ok());
        assert_eq!(service.list(&query).await, Err(RunsError::Transient));
        assert_eq!(service.list(&query).await, Err(RunsError::Transient));
        assert!(service.list(&query).await.is_ok());
        assert!(service.list(&query).await.is_ok());
        assert_eq!(service.pending_faults(), 0);
    }

    #[tokio::test]
    async fn test_invalid_query_does_not_arm_faults() {
        let service = instant_service(Arc::new(ScriptedFaults::new([1])));
        let bad = RunsQuery::new().with_page(0);

        assert!(matches!(
            service.list(&bad).await,
            Err(RunsError::InvalidQuery(_))
        ));
        assert_eq!(service.pending_faults(), 0);
    }

    #[tokio::test]
    async fn test_lookup_is_not_subject_to_faults() {
        let service = instant_service(Arc::new(ScriptedFaults::new([2])));
        service.list(&RunsQuery::new()).await.unwrap();
        assert_eq!(service.pending_faults(), 2);

        let run = service.get("run-01").await.unwrap();
        assert_eq!(run.run_id, "run-01");
        assert_eq!(service.pending_faults(), 2);
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let service = instant_service(Arc::new(NoFaults));
        assert_eq!(
            service.get("run-99").await,
            Err(RunsError::NotFound {
                run_id: "run-99".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_every_catalog_id_resolves() {
        let service = instant_service(Arc::new(NoFaults));
        let ids: Vec<String> = service
            .catalog()
            .runs()
            .iter()
            .map(|r| r.run_id.clone())
            .collect();
        for id in ids {
            assert_eq!(service.get(&id).await.unwrap().run_id, id);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_latency_within_bounds() {
        let latency = LatencyProfile {
            list_min: Duration::from_millis(800),
            list_max: Duration::from_millis(1200),
            get: Duration::from_millis(1000),
        };
        let service = RunsService::with_options(catalog(), Arc::new(NoFaults), latency, 5);

        for _ in 0..5 {
            let started = Instant::now();
            service.list(&RunsQuery::new()).await.unwrap();
            let elapsed = started.elapsed();
            assert!(elapsed >= Duration::from_millis(800), "{elapsed:?}");
            assert!(elapsed <= Duration::from_millis(1250), "{elapsed:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_latency_is_fixed() {
        let service = RunsService::new(catalog());
        let started = Instant::now();
        service.get("run-02").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_calls_do_not_serialize() {
        let service = RunsService::new(catalog());
        let started = Instant::now();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.get("run-05").await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Eight sequential lookups would take eight seconds.
        assert!(started.elapsed() < Duration::from_millis(2000));
    }
}
