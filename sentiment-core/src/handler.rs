// Copyright 2024 The Forgejo Authors. All rights reserved.
// SPDX-License-Identifier: MIT

use std::future::Future;
use std::pin::Pin;

use axum::response::Response;
use serde_json::Value;

pub type DynHandlerFuture = Pin<Box<dyn Future<Output = crate::error::Result<Response>> + Send + 'static>>;

/// A type-erased handler for an API operation.
///
/// `handler` receives the merged request parameters as a JSON object whose
/// keys are parameter names. It is expected to deserialize what it needs
/// before returning the future, since the future must be `'static`.
pub struct ApiHandlerInventory {
    /// Links the handler to its OpenAPI operation.
    pub operation_id: &'static str,
    pub handler: fn(&Value) -> DynHandlerFuture,
}

inventory::collect!(ApiHandlerInventory);

impl std::fmt::Debug for ApiHandlerInventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiHandlerInventory")
            .field("operation_id", &self.operation_id)
            .finish()
    }
}

/// Looks up a registered handler by operation id.
pub fn find_handler(operation_id: &str) -> Option<fn(&Value) -> DynHandlerFuture> {
    inventory::iter::<ApiHandlerInventory>
        .into_iter()
        .find(|inv| inv.operation_id == operation_id)
        .map(|inv| inv.handler)
}
