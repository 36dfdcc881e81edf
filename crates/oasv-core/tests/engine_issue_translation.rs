//! # Engine Issue Translation
//!
//! Feeds issue batches in the engine JSON shape through augmentation and
//! translation and checks the serialized envelope clients receive.

use oasv_core::{augment_enum_messages, to_validation_error, RawValidationIssue, ValidationError};
use serde_json::json;

fn translate(status: u16, raw: serde_json::Value) -> serde_json::Value {
    let issues: Vec<RawValidationIssue> = serde_json::from_value(raw).unwrap();
    let envelope = to_validation_error(status, &augment_enum_messages(&issues));
    serde_json::to_value(envelope).unwrap()
}

#[test]
fn mixed_batch_translates_in_order() {
    let body = translate(
        400,
        json!([
            {
                "keyword": "required",
                "dataPath": ".body",
                "schemaPath": "#/required",
                "params": { "missingProperty": "name" },
                "message": "should have required property 'name'"
            },
            {
                "keyword": "enum",
                "dataPath": ".body.status",
                "schemaPath": "#/properties/status/enum",
                "params": { "allowedValues": ["available", "pending", "sold"] },
                "message": "should be equal to one of the allowed values"
            },
            {
                "keyword": "additionalProperties",
                "dataPath": ".body",
                "schemaPath": "#/additionalProperties",
                "params": { "additionalProperty": "colour" },
                "message": "should NOT have additional properties"
            },
            {
                "keyword": "type",
                "dataPath": ".body.tags[0]",
                "schemaPath": "#/properties/tags/items/type",
                "params": { "type": "string" },
                "message": "should be string"
            }
        ]),
    );

    assert_eq!(
        body,
        json!({
            "status": 400,
            "errors": [
                {
                    "path": ".body.name",
                    "message": "should have required property 'name'",
                    "errorCode": "required.openapi.validation"
                },
                {
                    "path": ".body.status",
                    "message": "should be equal to one of the allowed values: available, pending, sold",
                    "errorCode": "enum.openapi.validation"
                },
                {
                    "path": ".body.colour",
                    "message": "should NOT have additional properties",
                    "errorCode": "additionalProperties.openapi.validation"
                },
                {
                    "path": ".body.tags[0]",
                    "message": "should be string",
                    "errorCode": "type.openapi.validation"
                }
            ]
        })
    );
}

#[test]
fn root_level_schema_violation_reports_schema_path() {
    let body = translate(
        400,
        json!([{
            "keyword": "oneOf",
            "dataPath": "",
            "schemaPath": "#/oneOf",
            "params": { "passingSchemas": null },
            "message": "should match exactly one schema in oneOf"
        }]),
    );
    assert_eq!(body["errors"][0]["path"], "#/oneOf");
    assert_eq!(body["errors"][0]["errorCode"], "oneOf.openapi.validation");
}

#[test]
fn empty_batch_keeps_status() {
    let body = translate(422, json!([]));
    assert_eq!(body, json!({ "status": 422, "errors": [] }));

    let envelope: ValidationError = serde_json::from_value(body).unwrap();
    assert!(envelope.is_empty());
}
