use std::fmt;

/// The main error type for document loading and key resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum DbError {
    /// The walk ran out of nodes, or a value resolved to `null` where absence is not allowed.
    NotFound {
        key: String,
        context: Option<String>,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// A string value carries an unequal number of `{` and `}`.
    MalformedReference {
        key: String,
        value: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// A string value is exactly the template of its own key path.
    SelfReference {
        key: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Substitution stopped making progress, or nested lookups exceeded the depth limit.
    NonTerminatingReference {
        key: String,
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// `@` had to be substituted but the caller supplied no context.
    InvalidContext {
        key: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    TypeError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    FileError {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when the authored source cannot be turned into a document.
    ParseError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

fn suffix(hint: &Option<String>, code: &Option<u32>) -> String {
    format!(
        "{}{}",
        hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
        code.map_or(String::new(), |c| format!(" Code: {}", c))
    )
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::NotFound { key, context, hint, code } =>
                write!(f, "[PLATDB] Not Found: lookup of '{}' (context={}) returned nothing{}",
                    key,
                    context.as_deref().unwrap_or("<none>"),
                    suffix(hint, code)
                ),
            DbError::MalformedReference { key, value, hint, code } =>
                write!(f, "[PLATDB] Malformed Reference: '{}' gives '{}' with imbalanced '{{' and '}}'{}",
                    key, value,
                    suffix(hint, code)
                ),
            DbError::SelfReference { key, hint, code } =>
                write!(f, "[PLATDB] Self Reference: '{}' resolves to its own template{}",
                    key,
                    suffix(hint, code)
                ),
            DbError::NonTerminatingReference { key, message, hint, code } =>
                write!(f, "[PLATDB] Non-terminating Reference in '{}': {}{}",
                    key, message,
                    suffix(hint, code)
                ),
            DbError::InvalidContext { key, hint, code } =>
                write!(f, "[PLATDB] Invalid Context: '{}' uses '@' but no context was supplied{}",
                    key,
                    suffix(hint, code)
                ),
            DbError::TypeError { message, hint, code } =>
                write!(f, "[PLATDB] Type Error: {}{}",
                    message,
                    suffix(hint, code)
                ),
            DbError::FileError { message, path, hint, code } =>
                write!(f, "[PLATDB] File Error '{}': {}{}",
                    path, message,
                    suffix(hint, code)
                ),
            DbError::ParseError { message, hint, code } =>
                write!(f, "[PLATDB] Parse Error: {}{}",
                    message,
                    suffix(hint, code)
                ),
        }
    }
}

impl std::error::Error for DbError {}

impl DbError {
    pub fn not_found(key: &str, context: Option<&str>) -> Self {
        DbError::NotFound {
            key: key.to_string(),
            context: context.map(str::to_string),
            hint: Some("Check that the key path exists, or allow absence for optional keys".into()),
            code: Some(101),
        }
    }

    pub fn malformed(key: &str, value: &str) -> Self {
        DbError::MalformedReference {
            key: key.to_string(),
            value: value.to_string(),
            hint: Some("Every '{' needs a matching '}'".into()),
            code: Some(102),
        }
    }

    pub fn self_reference(key: &str) -> Self {
        DbError::SelfReference {
            key: key.to_string(),
            hint: Some(format!("'{}' cannot be defined as '{{{}}}'", key, key)),
            code: Some(103),
        }
    }

    pub fn no_progress(key: &str, token: &str) -> Self {
        DbError::NonTerminatingReference {
            key: key.to_string(),
            message: format!("substitution of '{}' made no progress, even against the root", token),
            hint: Some("Look for a template that refers back to itself".into()),
            code: Some(104),
        }
    }

    pub fn too_deep(key: &str, depth: usize) -> Self {
        DbError::NonTerminatingReference {
            key: key.to_string(),
            message: format!("nested lookups exceeded the depth limit of {}", depth),
            hint: Some("Look for templates that refer to each other in a cycle".into()),
            code: Some(105),
        }
    }

    pub fn invalid_context(key: &str) -> Self {
        DbError::InvalidContext {
            key: key.to_string(),
            hint: Some("Pass the platform key path as the lookup context".into()),
            code: Some(106),
        }
    }

    /// Helper for file-related errors when loading documents.
    pub fn file_error(message: String, path: String) -> Self {
        DbError::FileError {
            message,
            path,
            hint: Some("Check file path and permissions".into()),
            code: Some(300),
        }
    }

    /// The numeric error code, if any.
    pub fn code(&self) -> Option<u32> {
        match self {
            DbError::NotFound { code, .. }
            | DbError::MalformedReference { code, .. }
            | DbError::SelfReference { code, .. }
            | DbError::NonTerminatingReference { code, .. }
            | DbError::InvalidContext { code, .. }
            | DbError::TypeError { code, .. }
            | DbError::FileError { code, .. }
            | DbError::ParseError { code, .. } => *code,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}
