use sentiment_core::{inventory, schema_of, ApiDtoMetadata};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use crate::classifier::Sentiment;

/// Query string of the sentiment endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SentimentQuery {
    /// Free text to classify. May be empty.
    pub text: String,
}

/// Result of classifying a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResponse {
    pub sentiment: Sentiment,
}

inventory::submit! {
    ApiDtoMetadata { name: "SentimentQuery", schema_provider: schema_of::<SentimentQuery> }
}

inventory::submit! {
    ApiDtoMetadata { name: "SentimentResponse", schema_provider: schema_of::<SentimentResponse> }
}

inventory::submit! {
    ApiDtoMetadata { name: "Sentiment", schema_provider: schema_of::<Sentiment> }
}

/// A dummy function to ensure the linker includes this module.
pub fn load() {}
