use std::sync::Arc;
use std::time::Duration;

use valuscope_core::{PercentileConfig, SeriesSource, ValuscopeConfig, ValuscopeError};

/// Orchestrator that fetches raw series from registered sources and runs the
/// valuation pipelines over them.
pub struct Valuscope {
    pub(crate) sources: Vec<Arc<dyn SeriesSource>>,
    pub(crate) cfg: ValuscopeConfig,
}

/// Builder for constructing a `Valuscope` orchestrator with custom configuration.
pub struct ValuscopeBuilder {
    sources: Vec<Arc<dyn SeriesSource>>,
    cfg: ValuscopeConfig,
}

impl Default for ValuscopeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ValuscopeBuilder {
    /// Create a new builder with the default configuration.
    ///
    /// Starts with no sources; register at least one via [`Self::with_source`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: vec![],
            cfg: ValuscopeConfig::default(),
        }
    }

    /// Register a series source.
    ///
    /// Sources are tried in registration order. A source is only skipped once
    /// its retries are exhausted; any other error is returned as-is.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn SeriesSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: ValuscopeConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Set the percentile path parameters.
    #[must_use]
    pub const fn percentile(mut self, cfg: PercentileConfig) -> Self {
        self.cfg.percentile = cfg;
        self
    }

    /// Trailing window length, in valid observations.
    #[must_use]
    pub const fn window(mut self, window: usize) -> Self {
        self.cfg.percentile.window = window;
        self
    }

    /// Minimum valid observations before a percentile is emitted.
    #[must_use]
    pub const fn min_samples(mut self, min_samples: usize) -> Self {
        self.cfg.percentile.min_samples = min_samples;
        self
    }

    /// Half-width of the outlier band, in standard deviations.
    #[must_use]
    pub const fn sigma(mut self, sigma: f64) -> Self {
        self.cfg.percentile.sigma = sigma;
        self
    }

    /// Total attempts per source call, the first one included.
    #[must_use]
    pub const fn retry_attempts(mut self, attempts: u32) -> Self {
        self.cfg.retry.attempts = attempts;
        self
    }

    /// Fixed delay slept between two attempts.
    #[must_use]
    pub const fn retry_delay(mut self, delay: Duration) -> Self {
        self.cfg.retry.delay = delay;
        self
    }

    /// Timeout applied to every single attempt.
    #[must_use]
    pub const fn source_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.source_timeout = timeout;
        self
    }

    /// Universe used for valuation series when the caller does not name one.
    #[must_use]
    pub fn default_universe(mut self, universe: impl Into<String>) -> Self {
        self.cfg.default_universe = universe.into();
        self
    }

    /// Build the `Valuscope` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no source has been registered, if the retry
    /// policy allows no attempt, or if the percentile parameters are invalid.
    pub fn build(self) -> Result<Valuscope, ValuscopeError> {
        if self.sources.is_empty() {
            return Err(ValuscopeError::InvalidArg(
                "no sources registered; add at least one via with_source(...)".to_string(),
            ));
        }
        if self.cfg.retry.attempts == 0 {
            return Err(ValuscopeError::InvalidArg(
                "retry attempts must be at least 1".to_string(),
            ));
        }
        if self.cfg.source_timeout.is_zero() {
            return Err(ValuscopeError::InvalidArg(
                "source timeout must be positive".to_string(),
            ));
        }
        self.cfg.percentile.validate()?;

        Ok(Valuscope {
            sources: self.sources,
            cfg: self.cfg,
        })
    }
}

impl Valuscope {
    /// Start building a new `Valuscope` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use valuscope::Valuscope;
    ///
    /// let vs = Valuscope::builder()
    ///     .with_source(Arc::new(MySource::new()))
    ///     .window(1260)
    ///     .retry_attempts(3)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> ValuscopeBuilder {
        ValuscopeBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ValuscopeConfig {
        &self.cfg
    }

    /// Wrap a source future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "valuscope::core::source_call_with_timeout",
            skip(fut),
            fields(
                source = source_name,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn source_call_with_timeout<T, Fut>(
        source_name: &'static str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, ValuscopeError>
    where
        Fut: std::future::Future<Output = Result<T, ValuscopeError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(ValuscopeError::source_timeout(source_name, capability)))
    }

    /// Run `call` against one source with the configured timeout and bounded retry.
    ///
    /// Transient failures (retrieval errors, timeouts) are retried after a
    /// fixed delay; anything else is returned immediately. When every attempt
    /// fails the result is `RetriesExhausted` carrying the last failure.
    pub(crate) async fn call_with_retry<T, F, Fut>(
        &self,
        source: &Arc<dyn SeriesSource>,
        capability: &'static str,
        call: F,
    ) -> Result<T, ValuscopeError>
    where
        F: Fn(Arc<dyn SeriesSource>) -> Fut,
        Fut: std::future::Future<Output = Result<T, ValuscopeError>>,
    {
        let attempts = self.cfg.retry.attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let fut = call(Arc::clone(source));
            let err = match Self::source_call_with_timeout(source.name(), capability, self.cfg.source_timeout, fut).await {
                Ok(v) => return Ok(v),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => e,
            };

            #[cfg(feature = "tracing")]
            tracing::warn!(
                source = source.name(),
                capability,
                attempt,
                attempts,
                error = %err,
                "source call failed"
            );

            if attempt >= attempts {
                return Err(ValuscopeError::RetriesExhausted {
                    capability: capability.to_string(),
                    attempts,
                    last: Box::new(err),
                });
            }
            tokio::time::sleep(self.cfg.retry.delay).await;
        }
    }

    /// Fetch through the registered sources in order.
    ///
    /// The next source is tried only when the current one exhausted its
    /// retries; the error of the last source tried is returned when none succeeds.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "valuscope::core::fetch", skip(self, call))
    )]
    pub(crate) async fn fetch<T, F, Fut>(&self, capability: &'static str, call: F) -> Result<T, ValuscopeError>
    where
        F: Fn(Arc<dyn SeriesSource>) -> Fut,
        Fut: std::future::Future<Output = Result<T, ValuscopeError>>,
    {
        let mut last: Option<ValuscopeError> = None;
        for source in &self.sources {
            match self.call_with_retry(source, capability, &call).await {
                Ok(v) => return Ok(v),
                Err(e @ ValuscopeError::RetriesExhausted { .. }) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(source = source.name(), capability, "source exhausted, trying next");
                    last = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last.unwrap_or_else(|| ValuscopeError::InvalidArg("no sources registered".to_string())))
    }
}
