//! Request logging
//!
//! Provides structured logging with trace IDs for request correlation.

mod trace_context;

pub use trace_context::{generate_trace_id, RequestSpan, TraceContext};
