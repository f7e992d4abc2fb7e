use std::time::Duration;

use log::debug;
use tokio::time::{sleep_until, Instant};

use crate::config::RetryConfig;

/// Lets the driver see whether an attempt found its mount point
pub trait MountStatus {
    fn mount_missing(&self) -> bool;
}

/// Bounded schedule of attempts for work whose target may render late.
///
/// Every delay is an offset from the moment driving starts. An attempt that
/// reports a missing mount point earns one follow-up `mount_retry` later;
/// follow-ups never earn further follow-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    delays: Vec<Duration>,
    mount_retry: Option<Duration>,
}

impl RetryPolicy {
    pub fn new(mut delays: Vec<Duration>, mount_retry: Option<Duration>) -> Self {
        delays.sort();
        Self { delays, mount_retry }
    }

    /// A single attempt right away, for trees that are already complete
    pub fn immediate() -> Self {
        Self::new(vec![Duration::ZERO], None)
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.delays(), config.mount_retry())
    }

    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    pub fn mount_retry(&self) -> Option<Duration> {
        self.mount_retry
    }

    /// Offsets of the regular attempts, ignoring follow-ups
    pub fn schedule(&self) -> Vec<Duration> {
        self.delays.clone()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    at: Duration,
    follow_up: bool,
}

/// Run `attempt` at every offset of `policy`, plus one follow-up per miss.
///
/// Attempts happen in offset order on the calling task; outcomes are returned
/// in the order the attempts ran.
pub async fn drive<F, R>(policy: &RetryPolicy, mut attempt: F) -> Vec<R>
where
    F: FnMut() -> R,
    R: MountStatus,
{
    let start = Instant::now();
    let mut queue: Vec<Pending> = policy
        .delays
        .iter()
        .map(|at| Pending { at: *at, follow_up: false })
        .collect();
    let mut outcomes = Vec::with_capacity(queue.len());

    while !queue.is_empty() {
        let next = queue.remove(0);
        sleep_until(start + next.at).await;

        let outcome = attempt();
        if outcome.mount_missing() && !next.follow_up {
            if let Some(retry) = policy.mount_retry {
                let at = next.at + retry;
                debug!("Mount point missing at {:?}, retrying at {:?}", next.at, at);
                // Keep the queue ordered; ties run in insertion order
                let position = queue
                    .iter()
                    .position(|pending| pending.at > at)
                    .unwrap_or(queue.len());
                queue.insert(position, Pending { at, follow_up: true });
            }
        }
        outcomes.push(outcome);
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Probe {
        missing: bool,
        at: Duration,
    }

    impl MountStatus for Probe {
        fn mount_missing(&self) -> bool {
            self.missing
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.schedule(), vec![ms(100), ms(500), ms(1000)]);
        assert_eq!(policy.mount_retry(), Some(ms(100)));
    }

    #[test]
    fn test_delays_are_sorted() {
        let policy = RetryPolicy::new(vec![ms(900), ms(10)], None);
        assert_eq!(policy.delays(), &[ms(10), ms(900)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_delays_run_when_mount_present() {
        let start = Instant::now();
        let outcomes = drive(&RetryPolicy::default(), || Probe {
            missing: false,
            at: start.elapsed(),
        })
        .await;

        let times: Vec<_> = outcomes.iter().map(|o| o.at).collect();
        assert_eq!(times, vec![ms(100), ms(500), ms(1000)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_mount_earns_one_follow_up() {
        let start = Instant::now();
        let mut calls = 0;
        // Mount point appears from the third call on
        let outcomes = drive(&RetryPolicy::default(), || {
            calls += 1;
            Probe {
                missing: calls < 3,
                at: start.elapsed(),
            }
        })
        .await;

        let times: Vec<_> = outcomes.iter().map(|o| o.at).collect();
        assert_eq!(times, vec![ms(100), ms(200), ms(500), ms(1000)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_follow_ups_do_not_chain() {
        let start = Instant::now();
        let outcomes = drive(&RetryPolicy::new(vec![ms(100)], Some(ms(100))), || Probe {
            missing: true,
            at: start.elapsed(),
        })
        .await;

        let times: Vec<_> = outcomes.iter().map(|o| o.at).collect();
        assert_eq!(times, vec![ms(100), ms(200)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_follow_up_interleaves_with_later_delays() {
        let start = Instant::now();
        let policy = RetryPolicy::new(vec![ms(100), ms(150)], Some(ms(100)));
        let mut calls = 0;
        let outcomes = drive(&policy, || {
            calls += 1;
            Probe {
                missing: calls == 1,
                at: start.elapsed(),
            }
        })
        .await;

        let times: Vec<_> = outcomes.iter().map(|o| o.at).collect();
        assert_eq!(times, vec![ms(100), ms(150), ms(200)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_policy_never_attempts() {
        let outcomes = drive(&RetryPolicy::new(Vec::new(), Some(ms(100))), || Probe {
            missing: true,
            at: Duration::ZERO,
        })
        .await;
        assert!(outcomes.is_empty());
    }
}
