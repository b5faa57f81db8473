use nostr_sdk::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::Error;

pub const RECORD_VERSION: &str = "2";

const RESERVED_FIELDS: [&str; 3] = ["key", "version", "event"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordVersion {
    V2,
}

impl RecordVersion {
    pub fn parse(value: &str) -> Result<Self, Error> {
        match value {
            "2" => Ok(Self::V2),
            other => Err(Error::UnsupportedVersion(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2 => RECORD_VERSION,
        }
    }
}

/// Metadata is flattened into the top level. Reserved fields win on collision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemeralKeyRecord {
    pub key: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl EphemeralKeyRecord {
    pub fn new(target: &Keys, event: Option<String>, metadata: Map<String, Value>) -> Self {
        Self {
            key: target.secret_key().to_secret_hex(),
            version: RECORD_VERSION.to_string(),
            event,
            metadata: strip_reserved(metadata),
        }
    }

    pub fn record_version(&self) -> Result<RecordVersion, Error> {
        RecordVersion::parse(&self.version)
    }

    pub fn keys(&self) -> Result<Keys, Error> {
        Keys::parse(&self.key).map_err(|err| Error::MalformedRecord(err.to_string()))
    }
}

pub fn encode(
    target: &Keys,
    event: Option<&str>,
    metadata: &Map<String, Value>,
) -> Result<String, Error> {
    let record = EphemeralKeyRecord::new(target, event.map(String::from), metadata.clone());
    Ok(serde_json::to_string(&record)?)
}

pub fn decode(content: &str) -> Result<EphemeralKeyRecord, Error> {
    let value: Value =
        serde_json::from_str(content).map_err(|err| Error::MalformedRecord(err.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| Error::MalformedRecord("record is not a JSON object".to_string()))?;

    match object.get("key") {
        Some(Value::String(_)) => {}
        Some(_) => return Err(Error::MalformedRecord("key is not a string".to_string())),
        None => return Err(Error::MalformedRecord("missing key".to_string())),
    }

    let version = match object.get("version") {
        Some(Value::String(version)) => version.as_str(),
        Some(other) => return Err(Error::UnsupportedVersion(other.to_string())),
        None => return Err(Error::UnsupportedVersion("<missing>".to_string())),
    };

    match RecordVersion::parse(version)? {
        RecordVersion::V2 => serde_json::from_value(value)
            .map_err(|err| Error::MalformedRecord(err.to_string())),
    }
}

fn strip_reserved(mut metadata: Map<String, Value>) -> Map<String, Value> {
    for field in RESERVED_FIELDS {
        if metadata.remove(field).is_some() {
            warn!(field, "Dropping metadata entry that collides with a reserved record field");
        }
    }
    metadata
}
