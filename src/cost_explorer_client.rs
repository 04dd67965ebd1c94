use async_trait::async_trait;
use rusoto_ce::{CostExplorer, CostExplorerClient, GetCostAndUsageResponse};
use rusoto_core::Region;

use crate::cost_query::CostQuery;
use crate::error::BillingApiError;

pub struct CostUsageClient {
    client: CostExplorerClient,
}

#[async_trait]
pub trait QueryCostAndUsage {
    async fn cost_and_usage(
        &self,
        query: &CostQuery,
    ) -> Result<GetCostAndUsageResponse, BillingApiError>;
}

#[async_trait]
impl QueryCostAndUsage for CostUsageClient {
    async fn cost_and_usage(
        &self,
        query: &CostQuery,
    ) -> Result<GetCostAndUsageResponse, BillingApiError> {
        let response = self.client.get_cost_and_usage(query.to_request()).await?;
        Ok(response)
    }
}

impl CostUsageClient {
    /// Cost Explorer is only served out of us-east-1.
    pub fn new() -> Self {
        CostUsageClient {
            client: CostExplorerClient::new(Region::UsEast1),
        }
    }

    fn new_with_client(client: CostExplorerClient) -> Self {
        CostUsageClient { client }
    }
}

#[cfg(test)]
mod tests {
    use crate::cost_explorer_client::{CostUsageClient, QueryCostAndUsage};
    use crate::cost_query::{CostFilter, CostQuery};
    use crate::time_range::TimeRange;
    use chrono::{DateTime, Utc};
    use rusoto_ce::CostExplorerClient;
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MockResponseReader, ReadMockResponse,
    };
    use std::str::FromStr;

    fn query() -> CostQuery {
        let now = DateTime::<Utc>::from_str("2020-12-15T08:30:00.0+00:00").unwrap();
        CostQuery::daily_by_service(
            TimeRange::today(now),
            CostFilter::ProjectTag("portfolio-website".to_string()),
        )
    }

    #[tokio::test]
    async fn test_cost_and_usage() {
        let mock = CostExplorerClient::new_with(
            MockRequestDispatcher::default().with_body(&*MockResponseReader::read_response(
                "test_resources/valid",
                "get_cost_and_usage.json",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = CostUsageClient::new_with_client(mock);
        let response = client.cost_and_usage(&query()).await.unwrap();

        let results = response.results_by_time.unwrap();
        assert_eq!(results.len(), 1);
        let groups = results[0].groups.as_ref().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[0].keys,
            Some(vec!["Amazon Simple Storage Service".to_string()])
        );
        assert_eq!(
            groups[0]
                .metrics
                .as_ref()
                .unwrap()
                .get("UnblendedCost")
                .unwrap()
                .amount,
            Some("1.20".to_string())
        );
    }

    #[tokio::test]
    async fn test_cost_and_usage_error() {
        let mock = CostExplorerClient::new_with(
            MockRequestDispatcher::with_status(400).with_body(&*MockResponseReader::read_response(
                "test_resources/error",
                "get_cost_and_usage.json",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = CostUsageClient::new_with_client(mock);
        let result = client.cost_and_usage(&query()).await;

        assert!(result.is_err());
    }
}
