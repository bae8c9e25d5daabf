//! Building a [`SourceSet`] from configured source names.

use crate::context::ExtractionContext;
use crate::error::UnknownSource;
use crate::header::{HeaderSource, HEADER};
use crate::path::{PathSource, PATH};
use crate::query::{QuerySource, QUERY};
use crate::value::{ContextSource, CONTEXT};
use recordbind_decoder::{SourceSet, StringsSource, ValueSource};
use std::sync::Arc;

/// Built-in string source names, in default priority order.
pub const STRING_SOURCES: [&str; 3] = [QUERY, PATH, HEADER];

/// Built-in value source names.
pub const VALUE_SOURCES: [&str; 1] = [CONTEXT];

/// Returns the built-in string source called `name`.
#[must_use]
pub fn strings_source(name: &str) -> Option<Arc<dyn StringsSource<ExtractionContext>>> {
    match name {
        QUERY => Some(Arc::new(QuerySource)),
        PATH => Some(Arc::new(PathSource)),
        HEADER => Some(Arc::new(HeaderSource)),
        _ => None,
    }
}

/// Returns the built-in value source called `name`.
#[must_use]
pub fn value_source(name: &str) -> Option<Arc<dyn ValueSource<ExtractionContext>>> {
    match name {
        CONTEXT => Some(Arc::new(ContextSource)),
        _ => None,
    }
}

/// Builds a source set with the named built-in sources, in the given order.
///
/// # Errors
///
/// Returns [`UnknownSource`] for a name with no built-in source.
///
/// # Example
///
/// ```rust
/// use recordbind_extract::build_sources;
///
/// let sources = build_sources(&["header", "query"], &["ctx"]).unwrap();
/// assert_eq!(sources.string_keys(), vec!["header", "query"]);
/// assert!(build_sources(&["cookie"], &[] as &[&str]).is_err());
/// ```
pub fn build_sources<S: AsRef<str>>(
    strings: &[S],
    values: &[S],
) -> Result<SourceSet<ExtractionContext>, UnknownSource> {
    let mut set = SourceSet::new();
    for name in strings {
        let name = name.as_ref();
        let source = strings_source(name).ok_or_else(|| UnknownSource {
            flavour: "string",
            name: name.to_owned(),
        })?;
        set.push_strings(source);
    }
    for name in values {
        let name = name.as_ref();
        let source = value_source(name).ok_or_else(|| UnknownSource {
            flavour: "value",
            name: name.to_owned(),
        })?;
        set.push_values(source);
    }
    Ok(set)
}

/// The built-in sources in default order: query, path, header, then ctx.
#[must_use]
pub fn http_sources() -> SourceSet<ExtractionContext> {
    SourceSet::new()
        .with_strings(QuerySource)
        .with_strings(PathSource)
        .with_strings(HeaderSource)
        .with_values(ContextSource)
}
