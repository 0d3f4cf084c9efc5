//! Object-store upload notifications (S3 event format)

use serde::{Deserialize, Serialize};

use super::TriggerError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<UploadRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketEntity,
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketEntity {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntity {
    /// URL-encoded object key as delivered by the notification
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Bucket and decoded key of an uploaded object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    pub bucket: String,
    pub key: String,
}

impl UploadEvent {
    /// Single-record event, as emitted after an upload through the API
    pub fn for_object(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            records: vec![UploadRecord {
                s3: S3Entity {
                    bucket: BucketEntity {
                        name: bucket.into(),
                    },
                    object: ObjectEntity {
                        key: encode_key(&key.into()),
                        size: None,
                    },
                },
            }],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, TriggerError> {
        serde_json::from_str(json)
            .map_err(|e| TriggerError::InvalidEvent(format!("Malformed event: {}", e)))
    }

    /// The first record's object; later records are ignored
    pub fn uploaded_object(&self) -> Result<UploadedObject, TriggerError> {
        let record = self
            .records
            .first()
            .ok_or_else(|| TriggerError::InvalidEvent("Event has no records".to_string()))?;

        Ok(UploadedObject {
            bucket: record.s3.bucket.name.clone(),
            key: decode_key(&record.s3.object.key)?,
        })
    }
}

/// Escapes the characters that `decode_key` treats specially
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for ch in key.chars() {
        match ch {
            '%' => encoded.push_str("%25"),
            '+' => encoded.push_str("%2B"),
            ' ' => encoded.push('+'),
            other => encoded.push(other),
        }
    }
    encoded
}

/// Decodes form-style URL encoding: `+` is a space, `%XX` a byte
fn decode_key(raw: &str) -> Result<String, TriggerError> {
    let invalid = || TriggerError::InvalidEvent(format!("Invalid object key encoding: {}", raw));
    let mut bytes = Vec::with_capacity(raw.len());
    let mut input = raw.bytes();

    while let Some(byte) = input.next() {
        match byte {
            b'+' => bytes.push(b' '),
            b'%' => {
                let hex = [input.next().ok_or_else(invalid)?, input.next().ok_or_else(invalid)?];
                let hex = std::str::from_utf8(&hex).map_err(|_| invalid())?;
                bytes.push(u8::from_str_radix(hex, 16).map_err(|_| invalid())?);
            }
            other => bytes.push(other),
        }
    }

    String::from_utf8(bytes).map_err(|_| invalid())
}
