use serde::Serialize;
use std::env;

const DEFAULT_PROJECT_TAG: &str = "portfolio-website";
const DEFAULT_BUCKET_NAME: &str = "abhishek-portfolio-website";
const DEFAULT_DISTRIBUTION_ID: &str = "E1B34WDBG65GFG";
const DEFAULT_FUNCTION_NAME: &str = "portfolio-billing-api";

/// Read once at process start and passed to the handler; never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingConfig {
    pub project_tag: String,
    pub bucket_name: String,
    pub distribution_id: String,
    pub function_name: String,
}

impl BillingConfig {
    pub fn from_env() -> BillingConfig {
        BillingConfig {
            project_tag: env_or("PROJECT_TAG", DEFAULT_PROJECT_TAG),
            bucket_name: env_or("BUCKET_NAME", DEFAULT_BUCKET_NAME),
            distribution_id: env_or("DISTRIBUTION_ID", DEFAULT_DISTRIBUTION_ID),
            function_name: env_or("FUNCTION_NAME", DEFAULT_FUNCTION_NAME),
        }
    }

    /// Resource identifiers for the fallback `RESOURCE_ID` filter.
    pub fn resource_ids(&self) -> Vec<String> {
        vec![
            self.bucket_name.clone(),
            self.distribution_id.clone(),
            self.function_name.clone(),
        ]
    }

    pub fn frontend(&self) -> FrontendConfig {
        FrontendConfig {
            bucket_name: self.bucket_name.clone(),
            function_name: self.function_name.clone(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// The two identifiers the front-end page reads as plain data.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrontendConfig {
    pub bucket_name: String,
    pub function_name: String,
}
