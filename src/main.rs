mod config;
mod cost_explorer_client;
mod cost_query;
mod error;
mod handler;
mod summary;
mod time_range;

use lambda_runtime::{handler_fn, Context, Error};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::BillingConfig;
use crate::cost_explorer_client::CostUsageClient;
use crate::handler::BillingHandler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = BillingConfig::from_env();
    info!(
        "serving billing summaries for project {}, frontend config {}",
        config.project_tag,
        serde_json::to_string(&config.frontend())?
    );

    let handler = Arc::new(BillingHandler::new(CostUsageClient::new(), config));
    lambda_runtime::run(handler_fn(move |event: Value, _context: Context| {
        billing_handler(Arc::clone(&handler), event)
    }))
    .await?;
    Ok(())
}

async fn billing_handler(
    handler: Arc<BillingHandler<CostUsageClient>>,
    event: Value,
) -> Result<Value, Error> {
    let response = handler.handle(event).await;
    Ok(serde_json::to_value(response)?)
}
