//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::reports::ReportsServiceError;

pub(crate) fn into_status_error(error: ReportsServiceError) -> StatusError {
    match error {
        ReportsServiceError::Range(source) => StatusError::bad_request()
            .brief("Report range is out of bounds")
            .detail(source.to_string()),
        ReportsServiceError::Sql(source) => {
            error!("failed to build report: {source}");

            StatusError::internal_server_error()
        }
    }
}
