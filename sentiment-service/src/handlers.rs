use axum::response::IntoResponse;
use axum::Json;
use sentiment_core::error::Error;
use sentiment_core::handler::{ApiHandlerInventory, DynHandlerFuture};
use sentiment_core::{inventory, ApiMetadata, ApiParameter, ApiResponse, ParamIn};
use serde_json::Value;
use tracing::{debug, warn};

use crate::classifier;
use crate::dtos::{SentimentQuery, SentimentResponse};

pub const ANALYZE_SENTIMENT_PATH: &str = "/api/sentiment";

/// Classify the sentiment of a text
///
/// Returns `negative` if the text contains "bad" or "hate", otherwise
/// `positive` if it contains "great", "love" or "good", otherwise `neutral`.
/// Matching is case-insensitive and by substring.
pub fn analyze_sentiment(query: &SentimentQuery) -> SentimentResponse {
    let sentiment = classifier::classify(&query.text);
    debug!(%sentiment, text_len = query.text.len(), "classified text");
    SentimentResponse { sentiment }
}

fn analyze_sentiment_handler(params: &Value) -> DynHandlerFuture {
    let result = serde_json::from_value::<SentimentQuery>(params.clone())
        .map_err(|e| {
            warn!(error = %e, "rejected sentiment query");
            Error::InvalidParams(e.to_string())
        })
        .map(|query| Json(analyze_sentiment(&query)).into_response());
    Box::pin(async move { result })
}

inventory::submit! {
    ApiHandlerInventory {
        operation_id: "analyze_sentiment",
        handler: analyze_sentiment_handler,
    }
}

inventory::submit! {
    ApiMetadata {
        operation_id: "analyze_sentiment",
        method: "GET",
        path: ANALYZE_SENTIMENT_PATH,
        summary: "Classify the sentiment of a text",
        description: "Classifies the `text` query parameter as negative, positive or neutral by case-insensitive keyword lookup.",
        parameters: &[ApiParameter {
            name: "query",
            param_in: ParamIn::Query,
            description: "Text to classify",
            required: true,
            type_name: "SentimentQuery",
        }],
        responses: &[
            ApiResponse {
                status_code: 200,
                description: "The sentiment label",
                type_name: Some("SentimentResponse"),
            },
            ApiResponse {
                status_code: 400,
                description: "Missing or malformed `text` parameter",
                type_name: Some("ErrorBody"),
            },
        ],
    }
}

/// A dummy function to ensure the linker includes this module.
pub fn load() {}
