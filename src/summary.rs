use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use chrono::{DateTime, SecondsFormat, Utc};
use rusoto_ce::GetCostAndUsageResponse;
use serde::Serialize;
use std::ops::Add;
use std::str::FromStr;

use crate::cost_query::METRIC_UNBLENDED_COST;
use crate::error::BillingApiError;

/// Display bucket for a Cost Explorer service name. Classification is a
/// case-sensitive substring match, first match wins; anything else lands in
/// `Unclassified` and contributes to the daily total only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServiceBucket {
    S3,
    CloudFront,
    Lambda,
    Unclassified,
}

impl ServiceBucket {
    pub fn classify(service: &str) -> ServiceBucket {
        if service.contains("S3") {
            ServiceBucket::S3
        } else if service.contains("CloudFront") {
            ServiceBucket::CloudFront
        } else if service.contains("Lambda") {
            ServiceBucket::Lambda
        } else {
            ServiceBucket::Unclassified
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DailyCosts {
    pub total: f64,
    pub s3: f64,
    pub cloudfront: f64,
    pub lambda: f64,
    pub cloudflare: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MonthlyCosts {
    pub current: f64,
    pub previous: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BillingSummary {
    pub daily: DailyCosts,
    pub monthly: MonthlyCosts,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

/// Builds the response entity from the three raw Cost Explorer results:
/// one DAILY query grouped by service and two MONTHLY period totals.
pub fn summarize(
    daily: &GetCostAndUsageResponse,
    current_month: &GetCostAndUsageResponse,
    previous_month: &GetCostAndUsageResponse,
    generated_at: DateTime<Utc>,
) -> Result<BillingSummary, BillingApiError> {
    Ok(BillingSummary {
        daily: aggregate_daily(daily)?,
        monthly: MonthlyCosts {
            current: monthly_total(current_month)?,
            previous: monthly_total(previous_month)?,
        },
        last_updated: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

fn aggregate_daily(response: &GetCostAndUsageResponse) -> Result<DailyCosts, BillingApiError> {
    let mut s3 = BigDecimal::zero();
    let mut cloudfront = BigDecimal::zero();
    let mut lambda = BigDecimal::zero();
    let mut unclassified = BigDecimal::zero();

    let groups = response
        .results_by_time
        .as_ref()
        .and_then(|results| results.first())
        .and_then(|result| result.groups.as_ref());

    if let Some(groups) = groups {
        for group in groups {
            let service = group
                .keys
                .as_ref()
                .and_then(|keys| keys.first())
                .ok_or(BillingApiError::NoneValue)?;
            let amount = group
                .metrics
                .as_ref()
                .and_then(|metrics| metrics.get(METRIC_UNBLENDED_COST))
                .and_then(|metric| metric.amount.as_ref())
                .ok_or(BillingApiError::NoneValue)?;
            let cost = parse_amount(amount)?;

            match ServiceBucket::classify(service) {
                ServiceBucket::S3 => s3 = s3.add(cost),
                ServiceBucket::CloudFront => cloudfront = cloudfront.add(cost),
                ServiceBucket::Lambda => lambda = lambda.add(cost),
                ServiceBucket::Unclassified => unclassified = unclassified.add(cost),
            }
        }
    }

    // Cloudflare runs on its free plan and is not visible to Cost Explorer;
    // it still participates in the total so a paid plan would roll up.
    let cloudflare = BigDecimal::zero();
    let total = s3
        .clone()
        .add(cloudfront.clone())
        .add(lambda.clone())
        .add(unclassified)
        .add(cloudflare.clone());

    Ok(DailyCosts {
        total: to_f64(&total)?,
        s3: to_f64(&s3)?,
        cloudfront: to_f64(&cloudfront)?,
        lambda: to_f64(&lambda)?,
        cloudflare: to_f64(&cloudflare)?,
    })
}

fn monthly_total(response: &GetCostAndUsageResponse) -> Result<f64, BillingApiError> {
    let amount = response
        .results_by_time
        .as_ref()
        .and_then(|results| results.first())
        .and_then(|result| result.total.as_ref())
        .and_then(|total| total.get(METRIC_UNBLENDED_COST))
        .and_then(|metric| metric.amount.as_ref());

    match amount {
        Some(amount) => to_f64(&parse_amount(amount)?),
        None => Ok(0.0),
    }
}

fn parse_amount(amount: &str) -> Result<BigDecimal, BillingApiError> {
    BigDecimal::from_str(amount).map_err(|_| BillingApiError::ParseAmount(amount.to_string()))
}

fn to_f64(value: &BigDecimal) -> Result<f64, BillingApiError> {
    value.to_f64().ok_or(BillingApiError::ToPrimitive)
}
