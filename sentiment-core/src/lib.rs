// Copyright 2024 The Forgejo Authors. All rights reserved.
// SPDX-License-Identifier: MIT

//! # sentiment-core
//!
//! Domain-free plumbing for the sentiment service. Operations are declared as
//! `'static` metadata and collected with [`inventory`]; an OpenAPI document is
//! assembled from that metadata, and the `axum` router is derived from the
//! document by matching each `operationId` to a registered handler.

pub mod bootstrap;
pub mod error;
pub mod handler;
pub mod openapi_utils;
pub mod rest_router_builder;

// Re-exported so service crates can `submit!` without depending on these directly.
pub use inventory;
pub use utoipa;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamIn {
    Query,
    Path,
}

/// A single declared parameter of an operation.
///
/// For [`ParamIn::Query`], `type_name` may name an object DTO; its properties
/// are then expanded into individual query parameters.
#[derive(Debug)]
pub struct ApiParameter {
    pub name: &'static str,
    pub param_in: ParamIn,
    pub description: &'static str,
    pub required: bool,
    pub type_name: &'static str,
}

#[derive(Debug)]
pub struct ApiResponse {
    pub status_code: u16,
    pub description: &'static str,
    pub type_name: Option<&'static str>,
}

#[derive(Debug)]
pub struct ApiMetadata {
    pub operation_id: &'static str,
    pub method: &'static str,
    pub path: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ApiParameter],
    pub responses: &'static [ApiResponse],
}
inventory::collect!(ApiMetadata);

pub struct ApiDtoMetadata {
    pub name: &'static str,
    pub schema_provider: fn() -> (String, utoipa::openapi::RefOr<utoipa::openapi::Schema>),
}
inventory::collect!(ApiDtoMetadata);

/// Schema provider for any `utoipa::ToSchema` type, usable in [`ApiDtoMetadata`].
pub fn schema_of<T: utoipa::ToSchema>() -> (String, utoipa::openapi::RefOr<utoipa::openapi::Schema>) {
    (T::name().into_owned(), T::schema())
}
