// SPDX-License-Identifier: Apache-2.0

//! Rotating pool of RPC endpoints for a single chain.
//!
//! All endpoints serve the same chain; the pool tracks one active endpoint
//! and rotates to the next (round-robin by index) when the active endpoint
//! accumulates too many failures inside a sliding time window. Rotation is
//! driven entirely by [`EndpointPool::report_failure`] calls from the caller;
//! the pool never probes endpoints on its own.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use alloy_network::AnyNetwork;
use alloy_provider::{ProviderBuilder, RootProvider};
use tracing::{debug, warn};
use url::Url;

use crate::errors::RpcError;

/// Type alias for a pooled provider using `AnyNetwork`
pub type PooledProvider = Arc<RootProvider<AnyNetwork>>;

/// When to give up on the active endpoint.
#[derive(Debug, Clone, Copy)]
pub struct FailurePolicy {
    /// Failures within the window that trigger rotation
    pub max_fails: usize,
    /// Sliding window over which failures are counted
    pub window: Duration,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self {
            max_fails: 3,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug)]
struct PoolState {
    active: usize,
    /// Failure timestamps for the active endpoint, oldest first.
    failures: Vec<Instant>,
}

/// Pool of interchangeable RPC endpoints with failure-driven rotation.
///
/// Providers are constructed eagerly so URL problems surface at build time,
/// not mid-query. Failure bookkeeping sits behind a mutex so the pool can be
/// consulted through a shared reference from retry loops.
#[derive(Debug)]
pub struct EndpointPool {
    urls: Vec<Url>,
    providers: Vec<PooledProvider>,
    policy: FailurePolicy,
    state: Mutex<PoolState>,
}

impl EndpointPool {
    /// Build a pool from endpoint URLs.
    ///
    /// # Errors
    ///
    /// An empty list is a configuration error, as is any unparseable URL.
    pub fn new(endpoints: &[String], policy: FailurePolicy) -> Result<Self, RpcError> {
        if endpoints.is_empty() {
            return Err(RpcError::NoEndpoints);
        }

        let mut urls = Vec::with_capacity(endpoints.len());
        let mut providers = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let url: Url = endpoint.parse().map_err(|e| {
                warn!(url = endpoint, error = ?e, "Invalid endpoint URL");
                RpcError::InvalidEndpointUrl {
                    url: endpoint.clone(),
                }
            })?;
            providers.push(Arc::new(create_provider(url.clone())));
            urls.push(url);
        }
        debug!(endpoints = urls.len(), "Built endpoint pool");

        Ok(Self {
            urls,
            providers,
            policy,
            state: Mutex::new(PoolState {
                active: 0,
                failures: Vec::new(),
            }),
        })
    }

    /// The provider for the currently active endpoint.
    #[must_use]
    pub fn current(&self) -> PooledProvider {
        Arc::clone(&self.providers[self.lock_state().active])
    }

    /// The URL of the currently active endpoint.
    #[must_use]
    pub fn current_url(&self) -> Url {
        self.urls[self.lock_state().active].clone()
    }

    /// Number of configured endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Always false; construction rejects empty pools.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Record a failure against the active endpoint.
    ///
    /// Returns `true` when the failure tipped the endpoint over its policy
    /// threshold and the pool rotated to the next endpoint. Rotation resets
    /// the failure count, so a newly activated endpoint always gets a full
    /// window of grace.
    pub fn report_failure(&self) -> bool {
        self.record_failure_at(Instant::now())
    }

    fn record_failure_at(&self, now: Instant) -> bool {
        let mut state = self.lock_state();
        state
            .failures
            .retain(|at| now.duration_since(*at) <= self.policy.window);
        state.failures.push(now);

        if state.failures.len() >= self.policy.max_fails {
            let from = state.active;
            state.active = (state.active + 1) % self.providers.len();
            state.failures.clear();
            warn!(
                from = %self.urls[from],
                to = %self.urls[state.active],
                max_fails = self.policy.max_fails,
                "Endpoint failure threshold reached, rotating"
            );
            true
        } else {
            false
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, PoolState> {
        // State is plain bookkeeping; a poisoned guard still holds it intact.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Bare `RootProvider` without fillers; this crate only reads chain state.
fn create_provider(url: Url) -> RootProvider<AnyNetwork> {
    ProviderBuilder::new()
        .disable_recommended_fillers()
        .network::<AnyNetwork>()
        .connect_http(url)
}
