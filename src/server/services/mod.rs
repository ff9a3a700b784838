pub mod latency_services;
pub mod location_services;
pub mod relay_services;
pub mod route_context;
pub mod route_services;
pub mod server_probe_services;
pub mod theme_services;
pub mod time_sync_services;

pub use latency_services::DynLatencyService;
pub use location_services::DynLocationService;
pub use relay_services::DynRelayService;
pub use route_context::RouteContext;
