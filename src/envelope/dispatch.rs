//! Tool dispatcher: envelope in, handler call, envelope out.
//!
//! No business logic here: look up the function, bind its parameters by
//! exact name, call the handler, wrap its text.

use super::{ToolRequest, ToolResponse};
use crate::catalog::Catalog;
use crate::storage::{QueryAuditLog, ReservationLedger};
use crate::tools::{
    AvailabilityCalculator, CatalogQueryEngine, ReservationRecorder, ToolArguments, ToolCatalog,
    FN_CHECK_AVAILABILITY, FN_FIND_RESTAURANTS, FN_MAKE_RESERVATION,
};
use crate::types::{Error, InvocationId, QueryConfig, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

/// Routes tool calls to the three handlers. Cheap to share behind `Arc`.
#[derive(Debug)]
pub struct ToolDispatcher {
    tools: ToolCatalog,
    availability: AvailabilityCalculator,
    reservations: ReservationRecorder,
    query: CatalogQueryEngine,
}

impl ToolDispatcher {
    pub fn new(
        catalog: Arc<Catalog>,
        ledger: Arc<dyn ReservationLedger>,
        audit: Arc<dyn QueryAuditLog>,
    ) -> Self {
        Self {
            tools: ToolCatalog::standard(),
            availability: AvailabilityCalculator::new(catalog.clone(), ledger.clone()),
            reservations: ReservationRecorder::new(ledger),
            query: CatalogQueryEngine::new(catalog, audit),
        }
    }

    pub fn with_query_config(mut self, config: &QueryConfig) -> Self {
        self.query = self.query.with_max_results(config.max_results);
        self
    }

    pub fn tools(&self) -> &ToolCatalog {
        &self.tools
    }

    /// Handle one tool call.
    ///
    /// Query statement errors come back inside the response body; every
    /// other failure is returned as `Err` for the caller to surface.
    pub async fn dispatch(&self, request: ToolRequest) -> Result<ToolResponse> {
        let invocation_id = InvocationId::new();
        let span = tracing::info_span!(
            "tool_call",
            invocation_id = %invocation_id,
            action_group = %request.action_group,
            function = %request.function,
        );

        async move {
            tracing::debug!(parameters = request.parameters.len(), "tool call received");

            match self.route(&request).await {
                Ok(body) => {
                    tracing::info!("tool call completed");
                    Ok(ToolResponse::text(request, body))
                }
                Err(err) => {
                    tracing::warn!(code = err.code(), error = %err, "tool call failed");
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// [`ToolDispatcher::dispatch`] over raw JSON.
    pub async fn dispatch_value(&self, raw: Value) -> Result<Value> {
        let request: ToolRequest = serde_json::from_value(raw)?;
        let response = self.dispatch(request).await?;
        Ok(serde_json::to_value(response)?)
    }

    async fn route(&self, request: &ToolRequest) -> Result<String> {
        let entry = self
            .tools
            .get(&request.function)
            .ok_or_else(|| Error::not_found(format!("Unknown tool function: {}", request.function)))?;
        let args = entry.bind(&request.parameters)?;

        match entry.function.as_str() {
            FN_CHECK_AVAILABILITY => self.check_availability(&args).await,
            FN_FIND_RESTAURANTS => self.find_restaurants(&args).await,
            FN_MAKE_RESERVATION => self.make_reservation(&args).await,
            other => Err(Error::internal(format!("no handler for {}", other))),
        }
    }

    async fn check_availability(&self, args: &ToolArguments) -> Result<String> {
        let restaurant_name = args.str("restaurant_name")?;
        let availability = self.availability.remaining_capacity(restaurant_name).await?;
        Ok(availability.to_string())
    }

    async fn find_restaurants(&self, args: &ToolArguments) -> Result<String> {
        let sql = args.str("sql_query")?;
        self.query.query_text(sql).await
    }

    async fn make_reservation(&self, args: &ToolArguments) -> Result<String> {
        let ack = self
            .reservations
            .make_reservation(
                args.str("restaurant_name")?,
                args.str("main_guest_name")?,
                args.int("number_of_persons")?,
            )
            .await?;
        Ok(ack.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryAuditLog, MemoryLedger};
    use crate::tools::ACTION_GROUP_FIND;
    use tracing_test::traced_test;

    fn dispatcher() -> ToolDispatcher {
        ToolDispatcher::new(
            Arc::new(Catalog::default()),
            Arc::new(MemoryLedger::new()),
            Arc::new(MemoryAuditLog::new()),
        )
    }

    #[tokio::test]
    async fn test_unknown_function_is_not_found() {
        let request = ToolRequest::new("Misc", "cancel_reservation");
        let err = dispatcher().dispatch(request).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_failures_are_logged_with_code() {
        let request = ToolRequest::new(ACTION_GROUP_FIND, FN_FIND_RESTAURANTS);
        let err = dispatcher().dispatch(request).await.unwrap_err();
        assert!(matches!(err, Error::ParameterMissing(_)));
        assert!(logs_contain("PARAMETER_MISSING"));
    }

    #[tokio::test]
    async fn test_malformed_envelope_is_serialization_error() {
        let err = dispatcher()
            .dispatch_value(serde_json::json!({"function": 3}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
