pub mod logging;
pub mod metrics;
pub mod trace_context;

pub use self::logging::{filter_directive, init_tracing};
pub use self::metrics::{get_metrics, init_metrics, record_delivery};
pub use self::trace_context::{
    REQUEST_ID_HEADER, TRACEPARENT_HEADER, TRACESTATE_HEADER, extract_request_id,
    extract_traceparent, inject_trace_context, inject_trace_headers,
};
