//! HTTP API module for the Payroll Engine.
//!
//! Exposes deduction computation, cycle scanning, readiness scoring and
//! pay run creation as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CycleRequest, DeductionRequest};
pub use response::{ApiError, ApiErrorResponse, DeductionResponse, ScanEntry, ScanResponse};
pub use state::AppState;
