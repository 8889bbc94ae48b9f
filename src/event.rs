//! Conversion of DynamoDB Streams records into the Lambda event payload shape
//!
//! The staged envelope must look exactly like what a deployed function
//! receives from the stream: camelCase record fields, PascalCase fields
//! inside `dynamodb`, and attribute values kept in DynamoDB JSON encoding.

use std::collections::HashMap;

use aws_sdk_dynamodbstreams::types::{AttributeValue, Identity, Record, StreamRecord};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::warn;

/// One change record in the shape a deployed function receives.
///
/// The relay never inspects the contents after conversion; records are
/// forwarded to the sink verbatim.
pub type ChangeRecord = Value;

/// The batch envelope staged on disk for the invocation tool.
#[derive(Debug, Serialize)]
pub struct EventEnvelope<'a> {
    #[serde(rename = "Records")]
    pub records: &'a [ChangeRecord],
}

/// Convert one provider record into the Lambda event shape.
///
/// Absent fields are omitted rather than serialized as `null`, matching the
/// wire shape of the stream API itself.
pub fn record_to_event(record: &Record) -> ChangeRecord {
    let mut event = Map::new();
    if let Some(id) = record.event_id() {
        event.insert("eventID".to_string(), Value::from(id));
    }
    if let Some(name) = record.event_name() {
        event.insert("eventName".to_string(), Value::from(name.as_str()));
    }
    if let Some(version) = record.event_version() {
        event.insert("eventVersion".to_string(), Value::from(version));
    }
    if let Some(source) = record.event_source() {
        event.insert("eventSource".to_string(), Value::from(source));
    }
    if let Some(region) = record.aws_region() {
        event.insert("awsRegion".to_string(), Value::from(region));
    }
    if let Some(change) = record.dynamodb() {
        event.insert("dynamodb".to_string(), stream_record_to_json(change));
    }
    if let Some(identity) = record.user_identity() {
        event.insert("userIdentity".to_string(), identity_to_json(identity));
    }
    Value::Object(event)
}

fn stream_record_to_json(change: &StreamRecord) -> Value {
    let mut body = Map::new();
    if let Some(created) = change.approximate_creation_date_time() {
        // Epoch seconds with the fractional part preserved
        if let Some(seconds) = serde_json::Number::from_f64(created.as_secs_f64()) {
            body.insert(
                "ApproximateCreationDateTime".to_string(),
                Value::Number(seconds),
            );
        }
    }
    if let Some(keys) = change.keys() {
        body.insert("Keys".to_string(), image_to_json(keys));
    }
    if let Some(image) = change.new_image() {
        body.insert("NewImage".to_string(), image_to_json(image));
    }
    if let Some(image) = change.old_image() {
        body.insert("OldImage".to_string(), image_to_json(image));
    }
    if let Some(sequence) = change.sequence_number() {
        body.insert("SequenceNumber".to_string(), Value::from(sequence));
    }
    if let Some(size) = change.size_bytes() {
        body.insert("SizeBytes".to_string(), Value::from(size));
    }
    if let Some(view) = change.stream_view_type() {
        body.insert("StreamViewType".to_string(), Value::from(view.as_str()));
    }
    Value::Object(body)
}

fn identity_to_json(identity: &Identity) -> Value {
    let mut body = Map::new();
    if let Some(principal) = identity.principal_id() {
        body.insert("principalId".to_string(), Value::from(principal));
    }
    if let Some(kind) = identity.r#type() {
        body.insert("type".to_string(), Value::from(kind));
    }
    Value::Object(body)
}

fn image_to_json(image: &HashMap<String, AttributeValue>) -> Value {
    let mut object = Map::new();
    for (name, value) in image {
        object.insert(name.clone(), attribute_to_json(value));
    }
    Value::Object(object)
}

fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(text) => json!({ "S": text }),
        AttributeValue::N(number) => json!({ "N": number }),
        AttributeValue::B(blob) => json!({ "B": STANDARD.encode(blob.as_ref()) }),
        AttributeValue::Ss(items) => json!({ "SS": items }),
        AttributeValue::Ns(items) => json!({ "NS": items }),
        AttributeValue::Bs(blobs) => {
            let encoded: Vec<String> = blobs
                .iter()
                .map(|blob| STANDARD.encode(blob.as_ref()))
                .collect();
            json!({ "BS": encoded })
        }
        AttributeValue::M(entries) => {
            let mut object = Map::new();
            for (name, nested) in entries {
                object.insert(name.clone(), attribute_to_json(nested));
            }
            json!({ "M": object })
        }
        AttributeValue::L(items) => {
            let list: Vec<Value> = items.iter().map(attribute_to_json).collect();
            json!({ "L": list })
        }
        AttributeValue::Bool(flag) => json!({ "BOOL": flag }),
        AttributeValue::Null(_) => json!({ "NULL": true }),
        other => {
            warn!(?other, "Skipping unrecognized attribute value variant");
            Value::Null
        }
    }
}
