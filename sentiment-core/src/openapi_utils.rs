// Copyright 2024 The Forgejo Authors. All rights reserved.
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use tracing::warn;
use utoipa::openapi::path::{HttpMethod, Operation, OperationBuilder, Parameter, ParameterBuilder, ParameterIn, PathItem};
use utoipa::openapi::schema::{ObjectBuilder, Type};
use utoipa::openapi::{self, ComponentsBuilder, ContentBuilder, RefOr, Required, ResponseBuilder, ResponsesBuilder, Schema};

use crate::bootstrap::ServiceInfo;
use crate::error::ErrorBody;
use crate::{inventory, schema_of, ApiDtoMetadata, ApiMetadata, ApiParameter, ParamIn};

type SchemaMap = HashMap<String, RefOr<Schema>>;

/// Builds an OpenAPI document from every `ApiMetadata` and `ApiDtoMetadata`
/// registered through `inventory`.
pub fn build_openapi_basic(info: &ServiceInfo) -> openapi::OpenApi {
    let mut openapi = openapi::OpenApiBuilder::new()
        .info(
            openapi::InfoBuilder::new()
                .title(info.title)
                .version(info.version)
                .description(Some(info.description))
                .build(),
        )
        .paths(openapi::Paths::new())
        .build();

    let components = collect_component_schemas();
    let schemas = with_primitive_schemas(components.clone());

    for metadata in inventory::iter::<ApiMetadata> {
        let Some(http_method) = parse_http_method(metadata.method) else {
            warn!(
                operation_id = metadata.operation_id,
                method = metadata.method,
                "skipping operation with unsupported HTTP method"
            );
            continue;
        };

        let operation = build_operation(metadata, info.tag, &schemas);
        let path_item = openapi
            .paths
            .paths
            .entry(metadata.path.to_string())
            .or_default();
        set_operation(path_item, http_method, operation);
    }

    openapi.components = Some(
        ComponentsBuilder::new()
            .schemas_from_iter(components)
            .build(),
    );

    openapi
}

/// Registered DTO schemas plus `ErrorBody`; these become `components.schemas`.
fn collect_component_schemas() -> SchemaMap {
    let mut schemas: SchemaMap = inventory::iter::<ApiDtoMetadata>
        .into_iter()
        .map(|dto| (dto.schema_provider)())
        .collect();

    let (error_name, error_schema) = schema_of::<ErrorBody>();
    schemas.entry(error_name).or_insert(error_schema);
    schemas
}

/// Adds inline schemas for Rust primitive type names. Used only to resolve
/// `type_name`s, never published as components.
fn with_primitive_schemas(mut schemas: SchemaMap) -> SchemaMap {
    let primitive = |ty: Type| RefOr::T(Schema::Object(ObjectBuilder::new().schema_type(ty).build()));
    for name in ["String", "&str"] {
        schemas.entry(name.into()).or_insert_with(|| primitive(Type::String));
    }
    for name in ["i32", "i64", "u32", "u64"] {
        schemas.entry(name.into()).or_insert_with(|| primitive(Type::Integer));
    }
    for name in ["f32", "f64"] {
        schemas.entry(name.into()).or_insert_with(|| primitive(Type::Number));
    }
    schemas.entry("bool".into()).or_insert_with(|| primitive(Type::Boolean));

    schemas
}

fn build_operation(metadata: &ApiMetadata, tag: &str, schemas: &SchemaMap) -> Operation {
    let mut operation_builder = OperationBuilder::new()
        .operation_id(Some(metadata.operation_id.to_string()))
        .summary(Some(metadata.summary.to_string()))
        .description(Some(metadata.description.to_string()))
        .tag(tag);

    for param in metadata.parameters {
        for built_parameter in build_parameters(param, schemas) {
            operation_builder = operation_builder.parameter(built_parameter);
        }
    }

    let mut responses_builder = ResponsesBuilder::new();
    for resp in metadata.responses {
        let mut response_builder = ResponseBuilder::new().description(resp.description);
        if let Some(schema_ref) = resp.type_name.and_then(|name| schemas.get(name)) {
            response_builder = response_builder.content(
                "application/json",
                ContentBuilder::new().schema(Some(schema_ref.clone())).build(),
            );
        }
        responses_builder = responses_builder.response(resp.status_code.to_string(), response_builder.build());
    }

    operation_builder.responses(responses_builder.build()).build()
}

/// Expands one declared parameter into OpenAPI parameters.
///
/// A query parameter typed as an object DTO becomes one query parameter per
/// property; everything else maps one-to-one. `parameter_in` must be set
/// before `required`, since the builder forces `required` for path parameters.
fn build_parameters(param: &ApiParameter, schemas: &SchemaMap) -> Vec<Parameter> {
    let schema_ref = schemas
        .get(param.type_name)
        .cloned()
        .unwrap_or_else(|| RefOr::T(Schema::default()));

    match param.param_in {
        ParamIn::Path => vec![ParameterBuilder::new()
            .name(param.name)
            .parameter_in(ParameterIn::Path)
            .required(Required::True)
            .description(Some(param.description))
            .schema(Some(schema_ref))
            .build()],
        ParamIn::Query => match &schema_ref {
            RefOr::T(Schema::Object(obj)) if !obj.properties.is_empty() => obj
                .properties
                .iter()
                .map(|(prop_name, prop_schema)| {
                    let is_required = obj.required.iter().any(|r| r == prop_name);
                    ParameterBuilder::new()
                        .name(prop_name)
                        .parameter_in(ParameterIn::Query)
                        .required(required(is_required))
                        .description(Some(param.description))
                        .schema(Some(prop_schema.clone()))
                        .build()
                })
                .collect(),
            _ => vec![ParameterBuilder::new()
                .name(param.name)
                .parameter_in(ParameterIn::Query)
                .required(required(param.required))
                .description(Some(param.description))
                .schema(Some(schema_ref))
                .build()],
        },
    }
}

fn required(flag: bool) -> Required {
    if flag {
        Required::True
    } else {
        Required::False
    }
}

fn parse_http_method(method: &str) -> Option<HttpMethod> {
    match method.to_lowercase().as_str() {
        "get" => Some(HttpMethod::Get),
        "post" => Some(HttpMethod::Post),
        "put" => Some(HttpMethod::Put),
        "delete" => Some(HttpMethod::Delete),
        "patch" => Some(HttpMethod::Patch),
        "options" => Some(HttpMethod::Options),
        "head" => Some(HttpMethod::Head),
        "trace" => Some(HttpMethod::Trace),
        _ => None,
    }
}

fn set_operation(path_item: &mut PathItem, method: HttpMethod, operation: Operation) {
    match method {
        HttpMethod::Get => path_item.get = Some(operation),
        HttpMethod::Post => path_item.post = Some(operation),
        HttpMethod::Put => path_item.put = Some(operation),
        HttpMethod::Delete => path_item.delete = Some(operation),
        HttpMethod::Options => path_item.options = Some(operation),
        HttpMethod::Head => path_item.head = Some(operation),
        HttpMethod::Patch => path_item.patch = Some(operation),
        HttpMethod::Trace => path_item.trace = Some(operation),
    }
}
