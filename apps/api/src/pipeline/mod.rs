//! Server-side reliability pipeline for raw model output:
//! Response Recovery → Schema Validator → typed decode. Time-budget
//! normalization runs afterwards on the typed value (see [`normalize`]).
//!
//! Every stage is a synchronous transformation over one request's payload.
//! The only shared state is the read-only [`schema::SchemaRegistry`].

pub mod normalize;
pub mod recovery;
pub mod schema;

use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::errors::AppError;
use crate::pipeline::recovery::{parse_with_recovery, DiagnosticSink};
use crate::pipeline::schema::{ResponseKind, SchemaRegistry};

/// Recovers, validates and decodes one model response of the given kind.
pub fn process_model_output<T: DeserializeOwned>(
    raw: &str,
    kind: ResponseKind,
    schemas: &SchemaRegistry,
    sink: &dyn DiagnosticSink,
) -> Result<T, AppError> {
    let value = parse_with_recovery(raw, sink)?;

    schemas
        .validate(kind, &value)
        .map_err(|violations| AppError::schema(kind.subject(), violations))?;

    // The schema is stricter than the types, so this only fails on a schema/type drift.
    serde_json::from_value(value)
        .with_context(|| format!("{} passed schema validation but failed to decode", kind.subject()))
        .map_err(AppError::Internal)
}
