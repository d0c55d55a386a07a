//! Typed tool parameters and upstream response shapes.
//!
//! Response records name the fields the tools document and keep everything
//! else in an `extra` map, so unknown upstream fields survive a round trip.

pub mod code_defender;
pub mod cyberfraud;

use crate::errors::ToolError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A response field that tells a missing key (`None`) apart from an
/// explicit `null` (`Some(None)`), so both reach the caller as sent.
pub type Nullable<T> = Option<Option<T>>;

pub(crate) mod nullable {
    use serde::{Deserialize, Deserializer};

    /// Only runs when the key is present; pair it with `#[serde(default)]`.
    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Turns already schema-checked tool arguments into a typed parameter object.
pub fn parse_params<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|err| ToolError::invalid_input(format!("Invalid arguments for {}: {}", tool, err)))
}

/// Hands a typed upstream response back to the tool layer as plain JSON.
pub fn into_data<T: Serialize>(response: T) -> Result<Value, ToolError> {
    Ok(serde_json::to_value(response)?)
}
