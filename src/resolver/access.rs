use super::*;

impl<'d> Resolver<'d> {
    /// Get a typed value using dot notation.
    ///
    /// # Examples
    /// ```
    /// # use platdb::{Document, Resolver};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let doc = Document::from_json_str(r#"{
    ///     "k": { "priority": 51, "ack": { "name": "Android Common Kernel", "fs": ["fs.busybox"] } }
    /// }"#)?;
    /// let resolver = Resolver::new(&doc);
    /// let name: String = resolver.get("k.ack.name", None)?;
    /// let priority: i64 = resolver.get("k.ack.priority", None)?;
    /// let fs: Vec<String> = resolver.get("k.ack.fs", None)?;
    /// assert_eq!(priority, 51);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns error if the path doesn't resolve or the value can't be converted to `T`.
    pub fn get<T>(&self, keypath: &str, context: Option<&str>) -> Result<T, DbError>
    where
        T: TryFrom<Value, Error = DbError>,
    {
        let value = self.lookup(keypath, context, false)?;
        T::try_from(value).map_err(|e| with_key(e, keypath))
    }

    /// Get an optional typed value: `None` if the key is missing or `"null"`.
    pub fn get_optional<T>(&self, keypath: &str, context: Option<&str>) -> Result<Option<T>, DbError>
    where
        T: TryFrom<Value, Error = DbError>,
    {
        match self.lookup(keypath, context, true)? {
            Value::Null => Ok(None),
            value => T::try_from(value).map(Some).map_err(|e| with_key(e, keypath)),
        }
    }

    /// Get a value, or `default` when the key is absent.
    ///
    /// Only absence falls back: a `"null"` value, a missing key, or a template that needs
    /// one. Reference and conversion errors are still returned.
    pub fn get_or<T>(&self, keypath: &str, context: Option<&str>, default: T) -> Result<T, DbError>
    where
        T: TryFrom<Value, Error = DbError>,
    {
        match self.get_optional(keypath, context) {
            Ok(value) => Ok(value.unwrap_or(default)),
            Err(e) if e.is_not_found() => Ok(default),
            Err(e) => Err(e),
        }
    }

    /// Whether `keypath` resolves to something other than the absence value.
    pub fn has(&self, keypath: &str, context: Option<&str>) -> bool {
        matches!(self.lookup(keypath, context, true), Ok(ref v) if !v.is_null())
    }

    /// Keys of the mapping at `keypath`, in authored order.
    pub fn keys(&self, keypath: &str, context: Option<&str>) -> Result<Vec<String>, DbError> {
        match self.lookup(keypath, context, false)? {
            Value::Mapping(items) => Ok(items.keys().cloned().collect()),
            other => Err(DbError::TypeError {
                message: format!("Path '{}' is a {}, not a mapping", keypath, other.type_name()),
                hint: Some("Only mappings have keys".into()),
                code: Some(406),
            }),
        }
    }
}

/// Prefix conversion errors with the key path they came from.
fn with_key(e: DbError, keypath: &str) -> DbError {
    match e {
        DbError::TypeError { message, hint, code } => DbError::TypeError {
            message: format!("{}\n  → at '{}'", message, keypath),
            hint,
            code,
        },
        other => other,
    }
}
