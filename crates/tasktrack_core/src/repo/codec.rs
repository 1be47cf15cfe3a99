//! Column codecs between domain value types and datastore values.
//!
//! Timestamps and durations are stored as their canonical text.

use crate::db::{FromValue, Value};
use crate::model::task::{Priority, Status};
use crate::model::time::{Duration, Time};

impl From<Time> for Value {
    fn from(value: Time) -> Self {
        Value::Text(value.to_string())
    }
}

impl FromValue for Time {
    fn from_value(value: &Value) -> Result<Self, String> {
        let text = String::from_value(value)?;
        Time::parse(&text).map_err(|err| err.to_string())
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Value::Text(value.to_string())
    }
}

impl FromValue for Duration {
    fn from_value(value: &Value) -> Result<Self, String> {
        let text = String::from_value(value)?;
        Duration::parse(&text).map_err(|err| err.to_string())
    }
}

impl From<Status> for Value {
    fn from(value: Status) -> Self {
        Value::Text(value.as_str().to_string())
    }
}

impl FromValue for Status {
    fn from_value(value: &Value) -> Result<Self, String> {
        let text = String::from_value(value)?;
        text.parse::<Status>().map_err(|err| err.to_string())
    }
}

impl From<Priority> for Value {
    fn from(value: Priority) -> Self {
        Value::Integer(i64::from(value.value()))
    }
}

impl FromValue for Priority {
    fn from_value(value: &Value) -> Result<Self, String> {
        let raw = i64::from_value(value)?;
        let narrow = u8::try_from(raw).map_err(|_| format!("priority {raw} is out of range"))?;
        Priority::new(narrow).map_err(|err| err.to_string())
    }
}
