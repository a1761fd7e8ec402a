//! Application use cases (business logic orchestration).

mod apply_to_job;
mod close_job;
mod enter_area;
mod fetch_job;
mod list_applicants;
mod list_applications;
mod login;
mod logout;

pub use apply_to_job::*;
pub use close_job::*;
pub use enter_area::*;
pub use fetch_job::*;
pub use list_applicants::*;
pub use list_applications::*;
pub use login::*;
pub use logout::*;

use hireloop_domain::ApiResponse;
use serde::de::DeserializeOwned;

use crate::error::{ApplicationError, ApplicationResult};

/// Unwraps an authenticated fetch, mapping a forced logout to `SessionExpired`.
fn require_session(response: Option<ApiResponse>) -> ApplicationResult<ApiResponse> {
    response.ok_or(ApplicationError::SessionExpired)
}

/// Passes 2xx responses through and turns anything else into `Rejected`.
fn ensure_success(response: ApiResponse) -> ApplicationResult<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApplicationError::Rejected {
            status: response.status,
            body: response.body,
        })
    }
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> ApplicationResult<T> {
    response
        .json()
        .map_err(|e| ApplicationError::InvalidResponse(e.to_string()))
}
