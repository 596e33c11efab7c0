//! Resolver for inheriting, templated platform configuration documents.
//!
//! A [`Document`] is an immutable tree of mappings. Keys declared on a mapping are
//! inherited by everything beneath it, string values may embed `{key.path}` templates or
//! alias whole subtrees with `#{key.path}`, and `@` inside a reference stands for the
//! caller's context. [`Resolver`] answers key path lookups against it.

pub mod ast;
pub mod check;
pub mod error;
pub mod export;
pub mod grammar;
pub mod loader;
pub mod policy;
pub mod resolver;
pub mod utils;

mod conversion;

pub use ast::{Document, Mapping, Node, Value};
pub use check::{check_document, CheckOptions, CheckReport};
pub use error::DbError;
pub use policy::{Accumulate, ErrorPolicy, FailFast, Failure};
pub use resolver::{Resolver, ResolverOptions, Scope};
