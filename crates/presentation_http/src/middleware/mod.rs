//! HTTP middleware components
//!
//! Fault injection for the wrapped routes, request IDs for every response and
//! a validating JSON extractor for the control endpoints.

pub mod fault_injection;
pub mod request_id;
pub mod validation;

pub use fault_injection::{FaultInjectionLayer, FaultInjectionService, INJECTED_ERROR_BODY};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer, RequestIdService};
pub use validation::{ValidatedJson, ValidationError};
