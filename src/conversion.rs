// Author: Dustin Pilgrim
// License: MIT

use crate::ast::{Mapping, Node};
use crate::{DbError, Value};

impl TryFrom<Value> for String {
    type Error = DbError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(DbError::TypeError {
                message: format!("Expected string, got {}", value.type_name()),
                hint: Some("Use a string value in the document".into()),
                code: Some(401),
            }),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = DbError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Integer(n) => Ok(n),
            Value::String(ref s) => s.trim().parse().map_err(|_| DbError::TypeError {
                message: format!("Expected integer, got string '{}'", s),
                hint: Some("Use an integer value in the document".into()),
                code: Some(402),
            }),
            _ => Err(DbError::TypeError {
                message: format!("Expected integer, got {}", value.type_name()),
                hint: Some("Use an integer value in the document".into()),
                code: Some(402),
            }),
        }
    }
}

impl TryFrom<Value> for u32 {
    type Error = DbError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let n = i64::try_from(value)?;
        u32::try_from(n).map_err(|_| DbError::TypeError {
            message: format!("Number {} out of range for u32", n),
            hint: Some("Use a number between 0 and 4294967295".into()),
            code: Some(403),
        })
    }
}

impl TryFrom<Value> for bool {
    type Error = DbError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::String(ref s) if s == "false" => Ok(false),
            _ => Err(DbError::TypeError {
                message: format!("Expected boolean, got {}", value.type_name()),
                hint: Some("Only the exact strings \"true\" and \"false\" are booleans".into()),
                code: Some(404),
            }),
        }
    }
}

impl TryFrom<Value> for Vec<String> {
    type Error = DbError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Sequence(items) => items
                .into_iter()
                .map(|item| match item {
                    Node::String(s) => Ok(s),
                    other => Err(DbError::TypeError {
                        message: format!("Expected a sequence of strings, found {:?}", other),
                        hint: None,
                        code: Some(405),
                    }),
                })
                .collect(),
            _ => Err(DbError::TypeError {
                message: format!("Expected sequence, got {}", value.type_name()),
                hint: Some("Use an array [...] in the document, or alias one with #{...}".into()),
                code: Some(405),
            }),
        }
    }
}

impl TryFrom<Value> for Mapping {
    type Error = DbError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Mapping(items) => Ok(items),
            _ => Err(DbError::TypeError {
                message: format!("Expected mapping, got {}", value.type_name()),
                hint: Some("Use an object {...} in the document".into()),
                code: Some(406),
            }),
        }
    }
}

impl<T> TryFrom<Value> for Option<T>
where
    T: TryFrom<Value, Error = DbError>,
{
    type Error = DbError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(None),
            v => Ok(Some(T::try_from(v)?)),
        }
    }
}
