use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rusoto_ce::GetCostAndUsageResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{error, warn};

use crate::config::BillingConfig;
use crate::cost_explorer_client::QueryCostAndUsage;
use crate::cost_query::{CostFilter, CostQuery};
use crate::error::BillingApiError;
use crate::summary::{summarize, BillingSummary};
use crate::time_range::TimeRange;

static CORS_HEADERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut headers = HashMap::new();
    headers.insert("Access-Control-Allow-Origin", "*");
    headers.insert("Access-Control-Allow-Headers", "Content-Type");
    headers.insert("Access-Control-Allow-Methods", "GET, POST, OPTIONS");
    headers
});

type QueryBatch = (
    GetCostAndUsageResponse,
    GetCostAndUsageResponse,
    GetCostAndUsageResponse,
);

/// The slice of the API Gateway proxy event this endpoint cares about.
/// Everything else in the payload is ignored; the computation is
/// date-driven, not parameter-driven.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingRequest {
    pub http_method: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillingResponse {
    pub status_code: u16,
    pub headers: HashMap<&'static str, &'static str>,
    pub body: String,
}

impl BillingResponse {
    fn preflight() -> BillingResponse {
        BillingResponse {
            status_code: 200,
            headers: CORS_HEADERS.clone(),
            body: String::new(),
        }
    }

    fn ok(body: String) -> BillingResponse {
        let mut headers = CORS_HEADERS.clone();
        headers.insert("Content-Type", "application/json");
        BillingResponse {
            status_code: 200,
            headers,
            body,
        }
    }

    fn failure(error: &BillingApiError) -> BillingResponse {
        let mut headers = HashMap::new();
        headers.insert("Access-Control-Allow-Origin", "*");
        headers.insert("Content-Type", "application/json");
        BillingResponse {
            status_code: 500,
            headers,
            body: serde_json::json!({
                "error": "Failed to fetch billing data",
                "message": error.to_string(),
            })
            .to_string(),
        }
    }
}

pub struct BillingHandler<C> {
    client: C,
    config: BillingConfig,
}

impl<C: QueryCostAndUsage + Send + Sync> BillingHandler<C> {
    pub fn new(client: C, config: BillingConfig) -> Self {
        BillingHandler { client, config }
    }

    pub async fn handle(&self, event: Value) -> BillingResponse {
        let request: BillingRequest = serde_json::from_value(event).unwrap_or_default();
        if request.http_method.as_deref() == Some("OPTIONS") {
            return BillingResponse::preflight();
        }

        match self.build_summary(Utc::now()).await {
            Ok(summary) => match serde_json::to_string(&summary) {
                Ok(body) => BillingResponse::ok(body),
                Err(e) => BillingResponse::failure(&BillingApiError::from(e)),
            },
            Err(e) => {
                error!("failed to fetch billing data: {}", e);
                BillingResponse::failure(&e)
            }
        }
    }

    async fn build_summary(&self, now: DateTime<Utc>) -> Result<BillingSummary, BillingApiError> {
        let today = TimeRange::today(now);
        let this_month = TimeRange::month_to_date(now)?;
        let last_month = TimeRange::previous_month(now)?;

        let tag_filter = CostFilter::ProjectTag(self.config.project_tag.clone());
        let (daily, current, previous) = match self
            .query_batch(&today, &this_month, &last_month, tag_filter)
            .await
        {
            Ok(batch) => batch,
            Err(e) => {
                warn!("tag filtering failed, retrying with resource id filter: {}", e);
                let resource_filter = CostFilter::ResourceIds(self.config.resource_ids());
                self.query_batch(&today, &this_month, &last_month, resource_filter)
                    .await?
            }
        };

        summarize(&daily, &current, &previous, now)
    }

    /// Issues the three queries concurrently; the batch is atomic, any
    /// single failure fails the whole batch.
    async fn query_batch(
        &self,
        today: &TimeRange,
        this_month: &TimeRange,
        last_month: &TimeRange,
        filter: CostFilter,
    ) -> Result<QueryBatch, BillingApiError> {
        let daily = CostQuery::daily_by_service(today.clone(), filter.clone());
        let current = CostQuery::monthly_total(this_month.clone(), filter.clone());
        let previous = CostQuery::monthly_total(last_month.clone(), filter);

        tokio::try_join!(
            self.client.cost_and_usage(&daily),
            self.client.cost_and_usage(&current),
            self.client.cost_and_usage(&previous),
        )
    }
}
