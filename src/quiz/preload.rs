//! Preload barrier.
//!
//! Waits for every image probe to settle (loaded or failed) or for the timeout,
//! whichever comes first. Probes are plain futures so the barrier runs the same
//! on the host (tests) and in the browser (image load events).

use std::future::Future;

use futures::future::{self, Either};
use futures::stream::{FuturesUnordered, StreamExt};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeResult {
    Loaded,
    Failed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreloadReport {
    pub total: usize,
    pub loaded: usize,
    pub failed: usize,
    pub timed_out: bool,
}

impl PreloadReport {
    fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    fn record(&mut self, result: ProbeResult) {
        match result {
            ProbeResult::Loaded => self.loaded += 1,
            ProbeResult::Failed => self.failed += 1,
        }
    }

    pub fn settled(&self) -> usize {
        self.loaded + self.failed
    }

    /// Probes still outstanding when the barrier released.
    pub fn unresolved(&self) -> usize {
        self.total - self.settled()
    }
}

/// Drives all probes concurrently and returns once they have all settled or
/// `timeout` resolves. Zero probes release immediately.
pub async fn await_all_settled<P, T>(probes: Vec<P>, timeout: T) -> PreloadReport
where
    P: Future<Output = ProbeResult>,
    T: Future<Output = ()>,
{
    let mut pending: FuturesUnordered<P> = probes.into_iter().collect();
    let mut report = PreloadReport::new(pending.len());
    let mut timeout = Box::pin(timeout);

    while report.settled() < report.total {
        match future::select(pending.next(), timeout.as_mut()).await {
            Either::Left((Some(result), _)) => report.record(result),
            Either::Left((None, _)) => break,
            Either::Right(((), _)) => {
                report.timed_out = true;
                log::warn!(
                    "preload timed out with {} of {} images unresolved",
                    report.unresolved(),
                    report.total
                );
                break;
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future::BoxFuture;
    use futures::FutureExt;

    #[test]
    fn failures_count_as_settled() {
        let probes = vec![
            future::ready(ProbeResult::Loaded),
            future::ready(ProbeResult::Failed),
            future::ready(ProbeResult::Loaded),
        ];
        let report = block_on(await_all_settled(probes, future::pending()));
        assert_eq!(
            report,
            PreloadReport {
                total: 3,
                loaded: 2,
                failed: 1,
                timed_out: false
            }
        );
    }

    #[test]
    fn zero_probes_release_immediately() {
        let probes: Vec<future::Ready<ProbeResult>> = Vec::new();
        let report = block_on(await_all_settled(probes, future::pending()));
        assert_eq!(report.total, 0);
        assert!(!report.timed_out);
    }

    #[test]
    fn stuck_probes_released_by_timeout() {
        let probes: Vec<BoxFuture<'static, ProbeResult>> = vec![
            future::ready(ProbeResult::Loaded).boxed(),
            future::pending().boxed(),
            future::pending().boxed(),
        ];
        let report = block_on(await_all_settled(probes, future::ready(())));
        assert!(report.timed_out);
        assert!(report.settled() <= 1);
        assert_eq!(report.total, 3);
    }

    #[test]
    fn nothing_resolvable_still_releases() {
        let probes: Vec<future::Pending<ProbeResult>> = vec![future::pending(), future::pending()];
        let report = block_on(await_all_settled(probes, future::ready(())));
        assert!(report.timed_out);
        assert_eq!(report.unresolved(), 2);
    }
}
