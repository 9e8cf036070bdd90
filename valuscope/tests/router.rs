mod helpers;

#[path = "router/core/router_builder.rs"]
mod router_builder;
#[path = "router/core/router_retry.rs"]
mod router_retry;

#[path = "router/router_filter.rs"]
mod router_filter;
#[path = "router/router_indicator.rs"]
mod router_indicator;
#[path = "router/router_snapshot.rs"]
mod router_snapshot;
#[path = "router/router_valuation.rs"]
mod router_valuation;
