// Copyright 2024 The Forgejo Authors. All rights reserved.
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use axum::body::Body;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path};
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodFilter, MethodRouter};
use axum::Router;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use utoipa::openapi::path::Operation;
use utoipa::openapi::{OpenApi, PathItem};

use crate::error::{Error, Result};
use crate::handler::find_handler;

/// Merges path captures and query-string pairs into one JSON object.
///
/// Every value stays a JSON string; handlers decide how to interpret them.
/// Query pairs are applied after path captures. The values of a repeated
/// query key are joined with `,` in order of appearance.
async fn extract_and_merge_params(req: Request<Body>) -> std::result::Result<Value, Response> {
    let (mut parts, _body) = req.into_parts();

    let path_params: HashMap<String, String> =
        match Path::<HashMap<String, String>>::from_request_parts(&mut parts, &()).await {
            Ok(Path(params)) => params,
            Err(PathRejection::MissingPathParams(_)) => HashMap::new(),
            Err(e) => return Err(e.into_response()),
        };

    let mut merged: Map<String, Value> = path_params
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();

    if let Some(query_str) = parts.uri.query() {
        let query = parse_query(query_str).map_err(IntoResponse::into_response)?;
        for (k, v) in query {
            merged.insert(k, Value::String(v));
        }
    }

    Ok(Value::Object(merged))
}

/// Decodes a query string, joining repeated keys with `,`.
///
/// Rejects `%` escapes that are not followed by two hex digits;
/// `serde_urlencoded` alone would decode them lossily.
fn parse_query(query_str: &str) -> Result<Vec<(String, String)>> {
    if let Some(pos) = find_invalid_escape(query_str) {
        return Err(Error::InvalidParams(format!(
            "malformed query string: invalid percent-encoding at byte {pos}"
        )));
    }

    let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(query_str)
        .map_err(|e| Error::InvalidParams(format!("malformed query string: {e}")))?;

    let mut joined: Vec<(String, String)> = Vec::with_capacity(pairs.len());
    for (k, v) in pairs {
        match joined.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, values)) => {
                values.push(',');
                values.push_str(&v);
            }
            None => joined.push((k, v)),
        }
    }
    Ok(joined)
}

fn find_invalid_escape(query_str: &str) -> Option<usize> {
    let bytes = query_str.as_bytes();
    bytes.iter().enumerate().find_map(|(i, &b)| {
        let valid = b != b'%'
            || matches!(
                (bytes.get(i + 1), bytes.get(i + 2)),
                (Some(h), Some(l)) if h.is_ascii_hexdigit() && l.is_ascii_hexdigit()
            );
        (!valid).then_some(i)
    })
}

/// Derives an `axum::Router` from an OpenAPI document.
///
/// A route is mounted for every operation whose `operationId` has a handler
/// registered through `ApiHandlerInventory`.
#[derive(Default, Clone)]
pub struct RestRouterBuilder {
    openapi: Option<OpenApi>,
}

impl RestRouterBuilder {
    /// Creates an empty builder; an OpenAPI document must be supplied before `build`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the OpenAPI document whose operations are mounted.
    pub fn openapi(mut self, openapi: OpenApi) -> Self {
        self.openapi = Some(openapi);
        self
    }

    /// Builds the router.
    ///
    /// Fails with `Error::SpecError` when no document was supplied. Operations
    /// without an `operationId` or without a registered handler are skipped.
    pub fn build(self) -> Result<Router> {
        let openapi = self.openapi.ok_or_else(|| {
            Error::SpecError("OpenAPI document not provided".to_string())
        })?;

        let mut router = Router::new();

        for (path, path_item) in openapi.paths.paths.iter() {
            let mut method_router: Option<MethodRouter> = None;

            for (method, operation) in operations_from_path_item(path_item) {
                let Some(op_id) = operation.operation_id.as_deref() else {
                    warn!(%path, "operation without operationId, not mounted");
                    continue;
                };
                let Some(handler_fn) = find_handler(op_id) else {
                    warn!(%path, operation_id = op_id, "no handler registered, not mounted");
                    continue;
                };

                let route_handler = move |req: Request<Body>| async move {
                    match extract_and_merge_params(req).await {
                        Ok(params) => match handler_fn(&params).await {
                            Ok(resp) => resp,
                            Err(e) => e.into_response(),
                        },
                        Err(response) => response,
                    }
                };

                debug!(%path, operation_id = op_id, "mounting route");
                method_router = Some(match method_router {
                    Some(existing) => existing.on(method, route_handler),
                    None => axum::routing::on(method, route_handler),
                });
            }

            if let Some(method_router) = method_router {
                router = router.route(path, method_router);
            }
        }

        Ok(router)
    }
}

fn operations_from_path_item(path_item: &PathItem) -> Vec<(MethodFilter, &Operation)> {
    [
        (MethodFilter::GET, &path_item.get),
        (MethodFilter::POST, &path_item.post),
        (MethodFilter::PUT, &path_item.put),
        (MethodFilter::DELETE, &path_item.delete),
        (MethodFilter::PATCH, &path_item.patch),
        (MethodFilter::OPTIONS, &path_item.options),
        (MethodFilter::HEAD, &path_item.head),
        (MethodFilter::TRACE, &path_item.trace),
    ]
    .into_iter()
    .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{rest_router_from_inventory, ServiceInfo};
    use crate::{inventory, ApiMetadata, ApiParameter, ApiResponse, ParamIn};
    use crate::handler::{ApiHandlerInventory, DynHandlerFuture};
    use axum::http::StatusCode;
    use axum::Json;
    use tower::ServiceExt;

    fn echo_params(params: &Value) -> DynHandlerFuture {
        let params = params.clone();
        Box::pin(async move { Ok(Json(params).into_response()) })
    }

    fn always_reject(_params: &Value) -> DynHandlerFuture {
        Box::pin(async move { Err(Error::InvalidParams("nothing is ever valid".to_string())) })
    }

    inventory::submit! {
        ApiHandlerInventory { operation_id: "echo_params", handler: echo_params }
    }

    inventory::submit! {
        ApiHandlerInventory { operation_id: "always_reject", handler: always_reject }
    }

    inventory::submit! {
        ApiMetadata {
            operation_id: "echo_params",
            method: "GET",
            path: "/test/echo/{name}",
            summary: "Echo parameters",
            description: "Returns the merged request parameters.",
            parameters: &[ApiParameter {
                name: "name",
                param_in: ParamIn::Path,
                description: "Any name",
                required: true,
                type_name: "String",
            }],
            responses: &[ApiResponse { status_code: 200, description: "Echo", type_name: None }],
        }
    }

    inventory::submit! {
        ApiMetadata {
            operation_id: "always_reject",
            method: "GET",
            path: "/test/reject",
            summary: "Reject",
            description: "Always fails with a client error.",
            parameters: &[],
            responses: &[ApiResponse { status_code: 400, description: "Rejected", type_name: Some("ErrorBody") }],
        }
    }

    const INFO: ServiceInfo = ServiceInfo {
        title: "router-test",
        version: "0.0.1",
        description: "router test",
        tag: "Test",
    };

    async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn merges_path_and_query_params_as_strings() {
        let router = rest_router_from_inventory(&INFO).unwrap();
        let (status, body) = get(router, "/test/echo/alice?greeting=hi%20there&n=42&flag=true").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "alice");
        assert_eq!(body["greeting"], "hi there");
        assert_eq!(body["n"], "42");
        assert_eq!(body["flag"], "true");
    }

    #[tokio::test]
    async fn repeated_query_key_joins_values_with_commas() {
        let router = rest_router_from_inventory(&INFO).unwrap();
        let (status, body) = get(router, "/test/echo/bob?x=first&y=1&x=second&x=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["x"], "first,second,");
        assert_eq!(body["y"], "1");
    }

    #[tokio::test]
    async fn invalid_percent_escape_is_a_client_error() {
        for uri in ["/test/echo/bob?x=%ZZbad", "/test/echo/bob?x=ok&%%%", "/test/echo/bob?x=50%"] {
            let router = rest_router_from_inventory(&INFO).unwrap();
            let (status, body) = get(router, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
            assert!(body["error"].as_str().unwrap().contains("malformed query string"));
        }
    }

    #[test]
    fn parse_query_decodes_and_joins() {
        let pairs = parse_query("text=I+hate+it&text=ok&lang=en%2DGB").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("text".to_string(), "I hate it,ok".to_string()),
                ("lang".to_string(), "en-GB".to_string()),
            ]
        );
        assert_eq!(find_invalid_escape("a=%4"), Some(2));
        assert_eq!(find_invalid_escape("a=%41%2f"), None);
    }

    #[tokio::test]
    async fn handler_errors_become_json_error_responses() {
        let router = rest_router_from_inventory(&INFO).unwrap();
        let (status, body) = get(router, "/test/reject").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid parameters: nothing is ever valid");
    }

    #[tokio::test]
    async fn only_declared_methods_are_routed() {
        let router = rest_router_from_inventory(&INFO).unwrap();
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/test/echo/alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn build_without_openapi_is_a_spec_error() {
        let err = RestRouterBuilder::new().build().unwrap_err();
        assert!(matches!(err, Error::SpecError(_)));
    }

    #[test]
    fn finds_registered_handlers_by_operation_id() {
        assert!(find_handler("echo_params").is_some());
        assert!(find_handler("no_such_operation").is_none());
    }
}
