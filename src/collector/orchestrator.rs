//! Stats collector: cached, single-flight report aggregation.
//!
//! A request either gets the cached report (if it is fresh) or joins the
//! running cycle, starting one if none is running. A cycle posts one
//! collection task to each execution domain; each task produces a partial
//! report and hands it back to the signaling domain, which merges it. When the
//! last partial arrives the merged report is cached and delivered to every
//! waiting callback.
//!
//! All collector state is touched only from the signaling domain. Public
//! methods post to it and return immediately, so callbacks always run on the
//! signaling thread, never on the caller's stack.

use std::fmt;
use std::process;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use parking_lot::Mutex;

use super::domain::{Domain, DomainSet};
use super::producers::{EmptyProducer, PartialProducer, SessionProducer};
use crate::clock::{Clock, SystemClock};
use crate::config::CollectorConfig;
use crate::error::DomainError;
use crate::logging::structured::LogContext;
use crate::session::SessionInfo;
use crate::stats::StatsReport;

/// Receives a delivered report. Invoked exactly once, on the signaling domain.
pub type StatsCallback = Box<dyn FnOnce(Arc<StatsReport>) + Send + 'static>;

#[derive(Default)]
struct CollectorState {
    cached_report: Option<Arc<StatsReport>>,
    /// Monotonic time at which the cached report's cycle started.
    cache_timestamp_us: i64,
    num_pending_partial_reports: usize,
    partial_report: Option<StatsReport>,
    partial_report_timestamp_us: i64,
    callbacks: Vec<StatsCallback>,
    cycle: Option<LogContext>,
}

/// Aggregates per-domain partial reports into cached, shared snapshots.
pub struct StatsCollector {
    domains: DomainSet,
    signaling_producer: Arc<dyn PartialProducer>,
    worker_producer: Arc<dyn PartialProducer>,
    network_producer: Arc<dyn PartialProducer>,
    clock: Arc<dyn Clock>,
    cache_lifetime_us: i64,
    state: Mutex<CollectorState>,
}

impl StatsCollector {
    /// Collector over `session` with its own domain threads and the system clock.
    pub fn new(
        session: Arc<dyn SessionInfo>,
        config: CollectorConfig,
    ) -> Result<Arc<Self>, DomainError> {
        Self::builder(session).config(config).build()
    }

    pub fn builder(session: Arc<dyn SessionInfo>) -> StatsCollectorBuilder {
        StatsCollectorBuilder::new(session)
    }

    /// Request a report. `callback` is invoked once with the delivered report.
    ///
    /// Requests made while a cycle is running are served by that cycle, and
    /// all of them receive the same report instance.
    pub fn get_stats_report<F>(self: &Arc<Self>, callback: F)
    where
        F: FnOnce(Arc<StatsReport>) + Send + 'static,
    {
        let this = Arc::clone(self);
        let callback: StatsCallback = Box::new(callback);
        self.post_to(Domain::Signaling, move || this.get_stats_report_s(callback));
    }

    /// Request a report, delivered through the returned channel.
    pub fn request_report(self: &Arc<Self>) -> Receiver<Arc<StatsReport>> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        self.get_stats_report(move |report| {
            // Requester may have stopped waiting.
            let _ = tx.send(report);
        });
        rx
    }

    /// Drop the cached report so the next request starts a new cycle.
    /// A running cycle is not affected.
    pub fn clear_cached_stats_report(self: &Arc<Self>) {
        let this = Arc::clone(self);
        self.post_to(Domain::Signaling, move || {
            this.state.lock().cached_report = None;
            log::debug!("STATS_CACHE_CLEARED");
        });
    }

    pub fn cache_lifetime_us(&self) -> i64 {
        self.cache_lifetime_us
    }

    /// Queue `task` on `domain`. Domains live as long as the collector, so a
    /// closed queue aborts the process.
    fn post_to<F>(&self, domain: Domain, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.domains.get(domain).post(task) {
            log::error!("STATS_DOMAIN_UNAVAILABLE domain={} action=abort", domain);
            process::abort();
        }
    }

    fn producer(&self, domain: Domain) -> &dyn PartialProducer {
        match domain {
            Domain::Signaling => self.signaling_producer.as_ref(),
            Domain::Worker => self.worker_producer.as_ref(),
            Domain::Network => self.network_producer.as_ref(),
        }
    }

    fn get_stats_report_s(self: &Arc<Self>, callback: StatsCallback) {
        debug_assert!(self.domains.signaling().is_current());

        let mut state = self.state.lock();
        state.callbacks.push(callback);

        let cache_now_us = self.clock.monotonic_us();
        let cache_age_us = cache_now_us - state.cache_timestamp_us;
        let fresh = state
            .cached_report
            .clone()
            .filter(|_| cache_age_us <= self.cache_lifetime_us);

        if let Some(report) = fresh {
            let callbacks = std::mem::take(&mut state.callbacks);
            drop(state);
            log::debug!(
                "STATS_CACHE_HIT age_us={} callbacks={}",
                cache_age_us,
                callbacks.len()
            );
            deliver(&report, callbacks);
        } else if state.num_pending_partial_reports == 0 {
            // Record timestamps use the wall clock, independently of the
            // monotonic clock that ages the cache.
            let timestamp_us = self.clock.utc_us();
            let ctx = LogContext::new_cycle();

            state.num_pending_partial_reports = Domain::ALL.len();
            state.partial_report_timestamp_us = cache_now_us;
            state.cycle = Some(ctx.clone());
            drop(state);

            log::info!("{} STATS_CYCLE_STARTED timestamp_us={}", ctx, timestamp_us);

            for domain in Domain::ALL {
                let this = Arc::clone(self);
                let domain_ctx = ctx.with_domain(domain.as_str());
                self.post_to(domain, move || {
                    this.produce_partial_results(domain, timestamp_us, domain_ctx)
                });
            }
        } else {
            log::debug!(
                "STATS_CYCLE_JOINED pending={} callbacks={}",
                state.num_pending_partial_reports,
                state.callbacks.len()
            );
        }
    }

    fn produce_partial_results(
        self: &Arc<Self>,
        domain: Domain,
        timestamp_us: i64,
        ctx: LogContext,
    ) {
        debug_assert!(self.domains.get(domain).is_current());

        let mut report = StatsReport::new();
        self.producer(domain).produce(timestamp_us, &mut report, &ctx);
        log::debug!("{} PARTIAL_REPORT_PRODUCED records={}", ctx, report.len());

        self.add_partial_results(report);
    }

    fn add_partial_results(self: &Arc<Self>, partial_report: StatsReport) {
        if !self.domains.signaling().is_current() {
            let this = Arc::clone(self);
            self.post_to(Domain::Signaling, move || {
                this.add_partial_results_s(partial_report)
            });
            return;
        }
        self.add_partial_results_s(partial_report);
    }

    fn add_partial_results_s(&self, partial_report: StatsReport) {
        debug_assert!(self.domains.signaling().is_current());

        let mut guard = self.state.lock();
        let state = &mut *guard;
        debug_assert!(state.num_pending_partial_reports > 0);

        if let Some(accumulated) = &mut state.partial_report {
            accumulated.take_members_from(partial_report);
        } else {
            state.partial_report = Some(partial_report);
        }
        state.num_pending_partial_reports -= 1;

        if state.num_pending_partial_reports > 0 {
            return;
        }

        let report = Arc::new(state.partial_report.take().unwrap_or_default());
        state.cache_timestamp_us = state.partial_report_timestamp_us;
        state.cached_report = Some(Arc::clone(&report));
        let callbacks = std::mem::take(&mut state.callbacks);
        let ctx = state.cycle.take().unwrap_or_else(|| LogContext::new("unknown"));
        drop(guard);

        log::info!(
            "{} STATS_REPORT_DELIVERED records={} callbacks={}",
            ctx,
            report.len(),
            callbacks.len()
        );
        deliver(&report, callbacks);
    }
}

fn deliver(report: &Arc<StatsReport>, callbacks: Vec<StatsCallback>) {
    for callback in callbacks {
        callback(Arc::clone(report));
    }
}

impl fmt::Debug for StatsCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsCollector")
            .field("domains", &self.domains)
            .field("cache_lifetime_us", &self.cache_lifetime_us)
            .finish_non_exhaustive()
    }
}

/// Builder for [`StatsCollector`].
///
/// By default the signaling domain produces session stats and the worker and
/// network domains contribute empty partials.
pub struct StatsCollectorBuilder {
    session: Arc<dyn SessionInfo>,
    config: CollectorConfig,
    clock: Option<Arc<dyn Clock>>,
    signaling_producer: Option<Arc<dyn PartialProducer>>,
    worker_producer: Option<Arc<dyn PartialProducer>>,
    network_producer: Option<Arc<dyn PartialProducer>>,
}

impl StatsCollectorBuilder {
    pub fn new(session: Arc<dyn SessionInfo>) -> Self {
        Self {
            session,
            config: CollectorConfig::default(),
            clock: None,
            signaling_producer: None,
            worker_producer: None,
            network_producer: None,
        }
    }

    pub fn config(mut self, config: CollectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replace the producer run on `domain`.
    pub fn producer(mut self, domain: Domain, producer: Arc<dyn PartialProducer>) -> Self {
        match domain {
            Domain::Signaling => self.signaling_producer = Some(producer),
            Domain::Worker => self.worker_producer = Some(producer),
            Domain::Network => self.network_producer = Some(producer),
        }
        self
    }

    pub fn build(self) -> Result<Arc<StatsCollector>, DomainError> {
        let domains = DomainSet::spawn()?;

        let signaling_producer: Arc<dyn PartialProducer> = match self.signaling_producer {
            Some(producer) => producer,
            None => Arc::new(SessionProducer::new(self.session)),
        };
        let worker_producer: Arc<dyn PartialProducer> = match self.worker_producer {
            Some(producer) => producer,
            None => Arc::new(EmptyProducer),
        };
        let network_producer: Arc<dyn PartialProducer> = match self.network_producer {
            Some(producer) => producer,
            None => Arc::new(EmptyProducer),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock::new()),
        };

        log::info!(
            "STATS_COLLECTOR_CREATED cache_lifetime_ms={}",
            self.config.cache_lifetime.as_millis()
        );

        Ok(Arc::new(StatsCollector {
            domains,
            signaling_producer,
            worker_producer,
            network_producer,
            clock,
            cache_lifetime_us: self.config.cache_lifetime_us(),
            state: Mutex::new(CollectorState::default()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use crate::session::{DataChannelState, SessionStats, SslCertificate};
    use std::time::Duration;

    struct NoSession;

    impl SessionInfo for NoSession {
        fn transport_stats(&self) -> Option<SessionStats> {
            None
        }

        fn local_certificate(&self, _transport_name: &str) -> Option<SslCertificate> {
            None
        }

        fn remote_certificate(&self, _transport_name: &str) -> Option<SslCertificate> {
            None
        }

        fn data_channel_states(&self) -> Vec<DataChannelState> {
            Vec::new()
        }
    }

    #[test]
    fn test_builder_applies_config() {
        let collector = StatsCollector::builder(Arc::new(NoSession))
            .config(CollectorConfig::with_cache_lifetime(Duration::from_millis(5)))
            .build()
            .unwrap();
        assert_eq!(collector.cache_lifetime_us(), 5_000);
    }

    #[test]
    fn test_clear_within_lifetime_starts_new_cycle() {
        let clock = Arc::new(FakeClock::new());
        let collector = StatsCollector::builder(Arc::new(NoSession))
            .clock(clock)
            .build()
            .unwrap();
        let timeout = Duration::from_secs(1);

        let a = collector.request_report().recv_timeout(timeout).unwrap();
        collector.clear_cached_stats_report();
        let b = collector.request_report().recv_timeout(timeout).unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(*a, *b);
    }
}
