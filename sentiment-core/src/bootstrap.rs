// Copyright 2024 The Forgejo Authors. All rights reserved.
// SPDX-License-Identifier: MIT

use crate::{openapi_utils, rest_router_builder::RestRouterBuilder};
use utoipa::openapi::OpenApi;

/// Top-level information stamped into the generated OpenAPI document.
#[derive(Debug, Clone, Copy)]
pub struct ServiceInfo {
    pub title: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    /// Tag applied to every operation.
    pub tag: &'static str,
}

/// Builds the OpenAPI document from inventory metadata.
pub fn build_openapi_from_inventory(info: &ServiceInfo) -> OpenApi {
    openapi_utils::build_openapi_basic(info)
}

/// Builds the REST router directly from inventory metadata.
pub fn rest_router_from_inventory(info: &ServiceInfo) -> crate::error::Result<axum::Router> {
    rest_router_from_openapi(build_openapi_from_inventory(info))
}

/// Builds the REST router from an existing OpenAPI document.
pub fn rest_router_from_openapi(openapi: OpenApi) -> crate::error::Result<axum::Router> {
    RestRouterBuilder::new().openapi(openapi).build()
}
