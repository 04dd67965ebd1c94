use rusoto_ce::{
    DateInterval, DimensionValues, Expression, GetCostAndUsageRequest, GroupDefinition, TagValues,
};

use crate::time_range::TimeRange;

pub const METRIC_UNBLENDED_COST: &str = "UnblendedCost";

const DEFAULT_METRICS: [&'static str; 1] = [METRIC_UNBLENDED_COST];
const PROJECT_TAG_KEY: &str = "Project";
const RESOURCE_ID_DIMENSION: &str = "RESOURCE_ID";
const SERVICE_DIMENSION: &str = "SERVICE";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Granularity {
    Daily,
    Monthly,
}

impl Granularity {
    fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "DAILY",
            Granularity::Monthly => "MONTHLY",
        }
    }
}

/// Exactly one filter shape is active per query. Tag filtering is the
/// primary shape; resource identifiers are the fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum CostFilter {
    ProjectTag(String),
    ResourceIds(Vec<String>),
}

impl CostFilter {
    fn to_expression(&self) -> Expression {
        match self {
            CostFilter::ProjectTag(value) => Expression {
                tags: Some(TagValues {
                    key: Some(PROJECT_TAG_KEY.to_string()),
                    values: Some(vec![value.clone()]),
                    ..Default::default()
                }),
                ..Default::default()
            },
            CostFilter::ResourceIds(ids) => Expression {
                dimensions: Some(DimensionValues {
                    key: Some(RESOURCE_ID_DIMENSION.to_string()),
                    values: Some(ids.clone()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostQuery {
    pub time_range: TimeRange,
    pub granularity: Granularity,
    pub group_by_service: bool,
    pub filter: CostFilter,
}

impl CostQuery {
    /// Per-service breakdown for a single day.
    pub fn daily_by_service(time_range: TimeRange, filter: CostFilter) -> CostQuery {
        CostQuery {
            time_range,
            granularity: Granularity::Daily,
            group_by_service: true,
            filter,
        }
    }

    /// Ungrouped period total.
    pub fn monthly_total(time_range: TimeRange, filter: CostFilter) -> CostQuery {
        CostQuery {
            time_range,
            granularity: Granularity::Monthly,
            group_by_service: false,
            filter,
        }
    }

    pub fn to_request(&self) -> GetCostAndUsageRequest {
        let group_by = if self.group_by_service {
            Some(vec![GroupDefinition {
                key: Some(SERVICE_DIMENSION.to_string()),
                type_: Some("DIMENSION".to_string()),
            }])
        } else {
            None
        };

        GetCostAndUsageRequest {
            time_period: DateInterval {
                start: self.time_range.start_string(),
                end: self.time_range.end_string(),
            },
            granularity: self.granularity.as_str().to_string(),
            metrics: DEFAULT_METRICS
                .iter()
                .map(|metric| metric.to_string())
                .collect(),
            group_by,
            filter: Some(self.filter.to_expression()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cost_query::{CostFilter, CostQuery, Granularity};
    use crate::time_range::TimeRange;
    use chrono::{DateTime, Utc};
    use std::str::FromStr;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_str("2020-12-15T08:30:00.0+00:00").unwrap()
    }

    #[tokio::test]
    async fn test_daily_request_groups_by_service() {
        let query = CostQuery::daily_by_service(
            TimeRange::today(now()),
            CostFilter::ProjectTag("portfolio-website".to_string()),
        );
        let request = query.to_request();

        assert_eq!(request.time_period.start, "2020-12-15");
        assert_eq!(request.time_period.end, "2020-12-15");
        assert_eq!(request.granularity, "DAILY");
        assert_eq!(request.metrics, vec!["UnblendedCost".to_string()]);

        let group_by = request.group_by.unwrap();
        assert_eq!(group_by.len(), 1);
        assert_eq!(group_by[0].key, Some("SERVICE".to_string()));
        assert_eq!(group_by[0].type_, Some("DIMENSION".to_string()));

        let tags = request.filter.unwrap().tags.unwrap();
        assert_eq!(tags.key, Some("Project".to_string()));
        assert_eq!(tags.values, Some(vec!["portfolio-website".to_string()]));
    }

    #[tokio::test]
    async fn test_monthly_request_is_ungrouped() {
        let query = CostQuery::monthly_total(
            TimeRange::month_to_date(now()).unwrap(),
            CostFilter::ProjectTag("portfolio-website".to_string()),
        );
        let request = query.to_request();

        assert_eq!(request.time_period.start, "2020-12-01");
        assert_eq!(request.time_period.end, "2020-12-15");
        assert_eq!(request.granularity, "MONTHLY");
        assert_eq!(request.group_by, None);
    }

    #[tokio::test]
    async fn test_resource_id_filter_expression() {
        let query = CostQuery::monthly_total(
            TimeRange::previous_month(now()).unwrap(),
            CostFilter::ResourceIds(vec![
                "example-bucket".to_string(),
                "E123EXAMPLE".to_string(),
                "example-billing-api".to_string(),
            ]),
        );
        let filter = query.to_request().filter.unwrap();

        assert_eq!(filter.tags, None);
        let dimensions = filter.dimensions.unwrap();
        assert_eq!(dimensions.key, Some("RESOURCE_ID".to_string()));
        assert_eq!(
            dimensions.values,
            Some(vec![
                "example-bucket".to_string(),
                "E123EXAMPLE".to_string(),
                "example-billing-api".to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn test_granularity_names() {
        assert_eq!(Granularity::Daily.as_str(), "DAILY");
        assert_eq!(Granularity::Monthly.as_str(), "MONTHLY");
    }
}
