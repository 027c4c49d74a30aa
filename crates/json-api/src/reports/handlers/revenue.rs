//! Revenue Trend Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::reports::{
    models::{RevenueBucket, RevenueTrend},
    trend::Granularity,
};

use crate::{extensions::*, reports::errors::into_status_error, state::State};

const DEFAULT_PERIODS: u32 = 30;

/// Revenue Bucket Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RevenueBucketResponse {
    /// First day of the bucket (UTC), `YYYY-MM-DD`
    pub period_start: String,

    pub revenue: u64,
}

impl From<RevenueBucket> for RevenueBucketResponse {
    fn from(bucket: RevenueBucket) -> Self {
        Self {
            period_start: bucket.period_start.to_string(),
            revenue: bucket.revenue,
        }
    }
}

/// Revenue Trend Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RevenueTrendResponse {
    pub granularity: String,

    /// Oldest first; buckets without delivered orders report zero
    pub buckets: Vec<RevenueBucketResponse>,
}

impl From<RevenueTrend> for RevenueTrendResponse {
    fn from(trend: RevenueTrend) -> Self {
        Self {
            granularity: trend.granularity.to_string(),
            buckets: trend.buckets.into_iter().map(Into::into).collect(),
        }
    }
}

/// Revenue Trend Handler
///
/// Delivered revenue per day, week or month over the trailing periods.
#[endpoint(
    tags("reports"),
    summary = "Revenue Trend",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Revenue per period"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown granularity"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    granularity: QueryParam<String, false>,
    periods: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<RevenueTrendResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let granularity = granularity
        .into_inner()
        .map(|value| value.parse::<Granularity>())
        .transpose()
        .or_400("could not parse \"granularity\" query parameter")?
        .unwrap_or_default();

    let periods = periods.into_inner().unwrap_or(DEFAULT_PERIODS);

    let trend = state
        .app
        .reports
        .revenue_trend(granularity, periods, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(trend.into()))
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::reports::MockReportsService;

    use crate::test_helpers::{TestMocks, admin_service};

    use super::*;

    fn make_service(reports: MockReportsService) -> Service {
        admin_service(
            TestMocks {
                reports,
                ..TestMocks::default()
            },
            Router::with_path("admin/reports/revenue").get(handler),
        )
    }

    #[tokio::test]
    async fn test_defaults_to_thirty_days() -> TestResult {
        let mut reports = MockReportsService::new();

        reports
            .expect_revenue_trend()
            .once()
            .withf(|granularity, periods, _| {
                *granularity == Granularity::Day && *periods == DEFAULT_PERIODS
            })
            .return_once(|granularity, _, _| {
                Ok(RevenueTrend {
                    granularity,
                    buckets: vec![
                        RevenueBucket {
                            period_start: date(2026, 3, 1),
                            revenue: 0,
                        },
                        RevenueBucket {
                            period_start: date(2026, 3, 2),
                            revenue: 45_00,
                        },
                    ],
                })
            });

        let mut res = TestClient::get("http://example.com/admin/reports/revenue")
            .send(&make_service(reports))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: RevenueTrendResponse = res.take_json().await?;

        assert_eq!(body.granularity, "day");
        assert_eq!(body.buckets.len(), 2);
        assert_eq!(body.buckets[1].period_start, "2026-03-02");
        assert_eq!(body.buckets[1].revenue, 45_00);

        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_trend_passes_periods_through() {
        let mut reports = MockReportsService::new();

        reports
            .expect_revenue_trend()
            .once()
            .withf(|granularity, periods, _| *granularity == Granularity::Month && *periods == 12)
            .return_once(|granularity, _, _| {
                Ok(RevenueTrend {
                    granularity,
                    buckets: Vec::new(),
                })
            });

        let res = TestClient::get("http://example.com/admin/reports/revenue?granularity=month&periods=12")
            .send(&make_service(reports))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_unknown_granularity_is_400() {
        let mut reports = MockReportsService::new();

        reports.expect_revenue_trend().never();

        let res = TestClient::get("http://example.com/admin/reports/revenue?granularity=hour")
            .send(&make_service(reports))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
