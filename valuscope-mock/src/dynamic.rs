use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use valuscope_core::{SeriesSource, Table, TimeSeries, ValuationMetric, ValuscopeError};

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(ValuscopeError),
    /// Fail with the error for the next `remaining` calls, then return the value.
    Flaky {
        remaining: u32,
        error: ValuscopeError,
        value: T,
    },
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    price_rules: HashMap<String, MockBehavior<Table>>,
    index_rules: HashMap<String, MockBehavior<Table>>,
    valuation_rules: HashMap<(ValuationMetric, String), MockBehavior<TimeSeries>>,
    roe_rules: HashMap<String, MockBehavior<TimeSeries>>,
    calls: HashMap<&'static str, u32>,
}

enum Step<T> {
    Ready(Result<T, ValuscopeError>),
    Hang,
}

/// Take the next step of a rule, advancing `Flaky` counters in place.
fn next_step<T: Clone>(rule: Option<&mut MockBehavior<T>>, missing: impl FnOnce() -> ValuscopeError) -> Step<T> {
    match rule {
        None => Step::Ready(Err(missing())),
        Some(MockBehavior::Return(v)) => Step::Ready(Ok(v.clone())),
        Some(MockBehavior::Fail(e)) => Step::Ready(Err(e.clone())),
        Some(MockBehavior::Hang) => Step::Hang,
        Some(MockBehavior::Flaky { remaining, error, value }) => {
            if *remaining > 0 {
                *remaining -= 1;
                Step::Ready(Err(error.clone()))
            } else {
                Step::Ready(Ok(value.clone()))
            }
        }
    }
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `price_history` calls for a stock code (any date range).
    pub async fn set_price_behavior(&self, code: &str, behavior: MockBehavior<Table>) {
        self.state.lock().await.price_rules.insert(code.to_string(), behavior);
    }

    /// Set the behavior for `index_history` calls for an index code.
    pub async fn set_index_behavior(&self, code: &str, behavior: MockBehavior<Table>) {
        self.state.lock().await.index_rules.insert(code.to_string(), behavior);
    }

    /// Set the behavior for `valuation` calls for a metric and universe.
    pub async fn set_valuation_behavior(
        &self,
        metric: ValuationMetric,
        universe: &str,
        behavior: MockBehavior<TimeSeries>,
    ) {
        let mut guard = self.state.lock().await;
        guard.valuation_rules.insert((metric, universe.to_string()), behavior);
    }

    /// Set the behavior for `roe` calls for a stock code.
    pub async fn set_roe_behavior(&self, code: &str, behavior: MockBehavior<TimeSeries>) {
        self.state.lock().await.roe_rules.insert(code.to_string(), behavior);
    }

    /// Number of calls made to a capability (`"price_history"`, `"index_history"`,
    /// `"valuation"`, `"roe"`).
    pub async fn calls(&self, capability: &str) -> u32 {
        self.state.lock().await.calls.get(capability).copied().unwrap_or(0)
    }

    /// Clear all configured behaviors and call counters.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.price_rules.clear();
        guard.index_rules.clear();
        guard.valuation_rules.clear();
        guard.roe_rules.clear();
        guard.calls.clear();
    }
}

/// A source that defers all behavior to an external controller.
///
/// Inputs without a configured rule fail with a retrieval error.
pub struct DynamicMockSource {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockSource {
    /// Create a new dynamic mock source and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<dyn SeriesSource>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn SeriesSource>, controller)
    }

    fn unconfigured(&self, what: String) -> ValuscopeError {
        ValuscopeError::retrieval(self.name, format!("no behavior configured for {what}"))
    }

    async fn resolve<T>(step: Step<T>) -> Result<T, ValuscopeError> {
        match step {
            Step::Ready(result) => result,
            Step::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl SeriesSource for DynamicMockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn price_history(&self, code: &str, _start: NaiveDate, _end: NaiveDate) -> Result<Table, ValuscopeError> {
        // snapshot the step without holding the lock across the await below
        let step = {
            let mut guard = self.state.lock().await;
            *guard.calls.entry("price_history").or_default() += 1;
            next_step(guard.price_rules.get_mut(code), || self.unconfigured(format!("prices of {code}")))
        };
        Self::resolve(step).await
    }

    async fn index_history(&self, code: &str) -> Result<Table, ValuscopeError> {
        let step = {
            let mut guard = self.state.lock().await;
            *guard.calls.entry("index_history").or_default() += 1;
            next_step(guard.index_rules.get_mut(code), || self.unconfigured(format!("index {code}")))
        };
        Self::resolve(step).await
    }

    async fn valuation(&self, metric: ValuationMetric, universe: &str) -> Result<TimeSeries, ValuscopeError> {
        let step = {
            let mut guard = self.state.lock().await;
            *guard.calls.entry("valuation").or_default() += 1;
            next_step(
                guard.valuation_rules.get_mut(&(metric, universe.to_string())),
                || self.unconfigured(format!("{metric} of {universe}")),
            )
        };
        Self::resolve(step).await
    }

    async fn roe(&self, code: &str) -> Result<TimeSeries, ValuscopeError> {
        let step = {
            let mut guard = self.state.lock().await;
            *guard.calls.entry("roe").or_default() += 1;
            next_step(guard.roe_rules.get_mut(code), || self.unconfigured(format!("roe of {code}")))
        };
        Self::resolve(step).await
    }
}
