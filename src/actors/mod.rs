pub mod dashboard;
pub mod detail;

pub use dashboard::{DashboardHandle, DashboardMessage, DashboardView, LookupOutcome, LookupPhase};
pub use detail::{DetailHandle, DetailMessage, DetailView, SectionStatus};

use crate::error::ExplorerError;
use ractor::rpc::CallResult;
use ractor::MessagingErr;

/// Flatten a ractor RPC into our error type.
pub(crate) fn call_result<T, M>(
    what: &str,
    result: Result<CallResult<T>, MessagingErr<M>>,
) -> Result<T, ExplorerError>
where
    M: std::fmt::Debug,
{
    match result {
        Ok(CallResult::Success(value)) => Ok(value),
        Ok(CallResult::Timeout) => Err(ExplorerError::Actor(format!("{}: timed out", what))),
        Ok(CallResult::SenderError) => {
            Err(ExplorerError::Actor(format!("{}: reply channel dropped", what)))
        }
        Err(e) => Err(ExplorerError::Actor(format!("{}: {}", what, e))),
    }
}
