// Author: Dustin Pilgrim
// License: MIT

use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::ast::{Document, Mapping, Node, Value};
use crate::grammar::{self, Literal};
use crate::policy::{ErrorPolicy, Failure};
use crate::utils::join_key;
use crate::DbError;

mod access;
mod scope;

pub use scope::Scope;

/// Highest accepted `max_depth`. Every nested lookup costs several stack frames, so larger
/// bounds would overflow the stack before the limit could trip.
pub const MAX_DEPTH_CEILING: usize = 128;

/// Tunables for resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Maximum number of nested lookups a single resolution may trigger, at most
    /// [`MAX_DEPTH_CEILING`].
    #[serde(deserialize_with = "clamped_depth")]
    pub max_depth: usize,
}

impl ResolverOptions {
    /// The same options with `max_depth` brought under [`MAX_DEPTH_CEILING`].
    pub fn clamped(self) -> Self {
        if self.max_depth > MAX_DEPTH_CEILING {
            warn!(
                requested = self.max_depth,
                ceiling = MAX_DEPTH_CEILING,
                "max_depth above the ceiling, clamping"
            );
        }
        Self {
            max_depth: self.max_depth.min(MAX_DEPTH_CEILING),
        }
    }
}

fn clamped_depth<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let depth = usize::deserialize(deserializer)?;
    Ok(ResolverOptions { max_depth: depth }.clamped().max_depth)
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// Resolves key paths against a borrowed, immutable document.
///
/// The resolver keeps no state between calls; every lookup builds its own scope chain.
///
/// # Examples
/// ```
/// # use platdb::{Document, Resolver, Value};
/// let doc = Document::from_json_str(r#"{
///     "arm": { "rel": "18.10", "title": "Software {rel}" }
/// }"#).unwrap();
/// let resolver = Resolver::new(&doc);
/// assert_eq!(
///     resolver.lookup("arm.title", None, false).unwrap(),
///     Value::String("Software 18.10".into())
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'d> {
    document: &'d Document,
    options: ResolverOptions,
}

/// A resolved value that still borrows containers from the document.
#[derive(Debug)]
enum Resolved<'d> {
    Null,
    True,
    Text(String),
    Integer(i64),
    Mapping(&'d Mapping),
    Sequence(&'d [Node]),
}

impl<'d> Resolved<'d> {
    fn is_null(&self) -> bool {
        matches!(self, Resolved::Null)
    }

    fn into_value(self) -> Value {
        match self {
            Resolved::Null => Value::Null,
            Resolved::True => Value::Bool(true),
            Resolved::Text(s) => Value::String(s),
            Resolved::Integer(n) => Value::Integer(n),
            Resolved::Mapping(m) => Value::Mapping(m.clone()),
            Resolved::Sequence(items) => Value::Sequence(items.to_vec()),
        }
    }

    /// The text spliced into a template in place of `{keypath}`.
    fn into_template_text(self, keypath: &str, context: Option<&str>) -> Result<String, DbError> {
        match self {
            Resolved::Text(s) => Ok(s),
            Resolved::Integer(n) => Ok(n.to_string()),
            Resolved::True => Ok("true".into()),
            Resolved::Null => Err(DbError::not_found(keypath, context)),
            Resolved::Mapping(_) | Resolved::Sequence(_) => Err(DbError::TypeError {
                message: format!("'{}' is not a scalar and cannot be embedded in a template", keypath),
                hint: Some(format!("Use '#{{{}}}' as the whole value to alias it instead", keypath)),
                code: Some(407),
            }),
        }
    }
}

impl From<Literal> for Resolved<'_> {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Null => Resolved::Null,
            Literal::True => Resolved::True,
        }
    }
}

/// Where the retry of a stalled substitution looks the token up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Local,
    Root,
}

/// The node a walk ended on, or the value a structural reference led to.
enum Terminal<'d> {
    Node(&'d Node),
    Alias(Resolved<'d>),
}

impl<'d> Resolver<'d> {
    pub fn new(document: &'d Document) -> Self {
        Self::with_options(document, ResolverOptions::default())
    }

    /// `options.max_depth` is clamped to [`MAX_DEPTH_CEILING`].
    pub fn with_options(document: &'d Document, options: ResolverOptions) -> Self {
        Self {
            document,
            options: options.clamped(),
        }
    }

    pub fn document(&self) -> &'d Document {
        self.document
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    /// Resolve `keypath`, substituting `context` for `@` in any reference it meets.
    ///
    /// With `allow_absent` a missing key (or a `"null"` value) resolves to `Value::Null`;
    /// without it, that is a `NotFound` error. Every other failure is an error either way.
    pub fn lookup(
        &self,
        keypath: &str,
        context: Option<&str>,
        allow_absent: bool,
    ) -> Result<Value, DbError> {
        self.resolve(Scope::root(self.document), keypath, context, allow_absent, 0)
            .map(Resolved::into_value)
    }

    /// Resolve `root.key` for each of `keys`, in order. The first failure is returned.
    pub fn multilookup<S: AsRef<str>>(
        &self,
        root: &str,
        keys: &[S],
        context: Option<&str>,
        allow_absent: bool,
    ) -> Result<Vec<Value>, DbError> {
        keys.iter()
            .map(|key| self.lookup(&join_key(root, key.as_ref()), context, allow_absent))
            .collect()
    }

    /// Like [`lookup`](Self::lookup), but hands a failure to `policy`.
    ///
    /// Returns `Ok(None)` when the policy recorded the failure and lets the run continue.
    pub fn lookup_with<P: ErrorPolicy + ?Sized>(
        &self,
        policy: &mut P,
        keypath: &str,
        context: Option<&str>,
        allow_absent: bool,
    ) -> Result<Option<Value>, DbError> {
        match self.lookup(keypath, context, allow_absent) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                policy.report(Failure::new(keypath, context, error))?;
                Ok(None)
            }
        }
    }

    pub fn multilookup_with<P: ErrorPolicy + ?Sized, S: AsRef<str>>(
        &self,
        policy: &mut P,
        root: &str,
        keys: &[S],
        context: Option<&str>,
        allow_absent: bool,
    ) -> Result<Vec<Option<Value>>, DbError> {
        keys.iter()
            .map(|key| self.lookup_with(policy, &join_key(root, key.as_ref()), context, allow_absent))
            .collect()
    }

    fn resolve(
        &self,
        scope: Scope<'d>,
        keypath: &str,
        context: Option<&str>,
        allow_absent: bool,
        depth: usize,
    ) -> Result<Resolved<'d>, DbError> {
        if depth > self.options.max_depth {
            return Err(DbError::too_deep(keypath, self.options.max_depth));
        }
        debug!(key = keypath, context, allow_absent, depth, "lookup");

        let key = grammar::substitute_context(keypath, context)?;
        let resolved = match self.walk(scope, &key, context, depth)? {
            None => Resolved::Null,
            Some((Terminal::Alias(value), _)) => value,
            Some((Terminal::Node(node), scope)) => match node {
                Node::String(raw) => self.render(raw, keypath, &key, &scope, context, depth)?,
                Node::Integer(n) => Resolved::Integer(*n),
                Node::Mapping(m) => Resolved::Mapping(m),
                Node::Sequence(items) => Resolved::Sequence(items),
            },
        };

        if resolved.is_null() && !allow_absent {
            return Err(DbError::not_found(keypath, context));
        }
        Ok(resolved)
    }

    /// Walk `key` segment by segment, layering every mapping entered onto `scope`.
    ///
    /// Structural references met along the way are followed, so a walk may continue
    /// inside an aliased mapping. Returns `None` when a segment is found nowhere.
    fn walk(
        &self,
        mut scope: Scope<'d>,
        key: &str,
        context: Option<&str>,
        depth: usize,
    ) -> Result<Option<(Terminal<'d>, Scope<'d>)>, DbError> {
        let mut terminal = None;

        for segment in key.split('.') {
            let Some(node) = scope.get(segment) else {
                debug!(key, segment, "segment not found");
                return Ok(None);
            };

            let step = match node.as_str().and_then(grammar::structural_target) {
                Some(target) => {
                    debug!(key, segment, target, "following structural reference");
                    let alias = self.resolve(scope.clone(), target, context, false, depth + 1)?;
                    if let Resolved::Mapping(m) = &alias {
                        scope.enter(*m);
                    }
                    Terminal::Alias(alias)
                }
                None => {
                    if let Node::Mapping(m) = node {
                        scope.enter(m);
                    }
                    Terminal::Node(node)
                }
            };
            terminal = Some(step);
        }

        debug!(key, layers = scope.depth(), "walk finished");
        Ok(terminal.map(|t| (t, scope)))
    }

    /// Post-process a string found at the end of a walk: reserved literals, then
    /// template substitution against the scope the walk ended in.
    fn render(
        &self,
        raw: &str,
        keypath: &str,
        key: &str,
        scope: &Scope<'d>,
        context: Option<&str>,
        depth: usize,
    ) -> Result<Resolved<'d>, DbError> {
        debug!(key = keypath, value = raw, "got");

        if let Some(literal) = grammar::reserved_literal(raw) {
            return Ok(literal.into());
        }
        let is_own_template =
            |s: &str| s == grammar::template_of(keypath) || s == grammar::template_of(key);
        let expanded = match context {
            Some(ctx) => raw.replace(grammar::CONTEXT_TOKEN, ctx),
            None => raw.to_string(),
        };
        if is_own_template(raw) || is_own_template(&expanded) {
            return Err(DbError::self_reference(keypath));
        }
        if !grammar::braces_balanced(raw) {
            return Err(DbError::malformed(keypath, raw));
        }

        let mut text = raw.to_string();
        while text.contains('{') {
            let Some(template) = grammar::first_template(&text) else {
                return Err(DbError::malformed(keypath, &text));
            };
            let token = template.token.to_string();
            let target = grammar::substitute_context(template.keypath, context)?;

            let next = substitute_pass(keypath, &text, &token, |tier| {
                let scope = match tier {
                    Tier::Local => scope.clone(),
                    Tier::Root => Scope::root(self.document),
                };
                self.resolve(scope, &target, context, false, depth + 1)?
                    .into_template_text(&target, context)
            })?;

            if !grammar::braces_balanced(&next) {
                return Err(DbError::malformed(keypath, &next));
            }
            text = next;
        }

        Ok(Resolved::Text(text))
    }
}

/// Replace every occurrence of `token` in `text` with what `resolve` yields for it.
///
/// If the local scope gives back text that changes nothing, the token is looked up once
/// more against the document root. A second pass without progress means the reference
/// can never terminate.
fn substitute_pass<F>(key: &str, text: &str, token: &str, mut resolve: F) -> Result<String, DbError>
where
    F: FnMut(Tier) -> Result<String, DbError>,
{
    let sub = resolve(Tier::Local)?;
    let next = text.replace(token, &sub);
    debug!(key, token, sub = %sub, result = %next, "substitution");
    if next != text {
        return Ok(next);
    }

    warn!(key, token, "substitution made no progress, retrying against the document root");
    let sub = resolve(Tier::Root)?;
    let next = text.replace(token, &sub);
    debug!(key, token, sub = %sub, result = %next, "resubstitution");
    if next == text {
        return Err(DbError::no_progress(key, token));
    }
    Ok(next)
}
