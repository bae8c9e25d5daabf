//! Type schema analysis.
//!
//! The analyzer walks a record's [`TypeInfo`] once, in declaration order, and
//! decides for every field whether it is bound directly (a leaf), bound
//! through a nested schema, or ignored.

use crate::error::AnalysisError;
use crate::paths::SourcePaths;
use crate::schema::{FieldDescriptor, Schema, TypeCategory};
use recordbind_core::{Bindable, Capabilities, FieldInfo, Shape, TypeInfo};

/// Directive holding a field's static fallback value.
pub const DEFAULT_DIRECTIVE: &str = "default";

/// Directive holding a field's multi-value delimiter.
pub const EXPLODER_DIRECTIVE: &str = "exploder";

/// Separator used to compose nested string-source keys.
pub const DEFAULT_SEPARATOR: &str = ".";

/// What the analyzer does with fields it cannot bind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalysisPolicy {
    /// Silently drop the field.
    #[default]
    FailOpen,
    /// Reject the type if the field carries a source directive.
    Strict,
}

/// Builds [`Schema`]s from type metadata.
///
/// # Example
///
/// ```rust
/// use recordbind_schema::Analyzer;
/// use recordbind_core::{FieldInfo, Bindable, Shape, TypeInfo};
///
/// let fields = vec![
///     FieldInfo::new("number", <i32 as Bindable>::type_info).with_tags(&[("query", "n")]),
///     FieldInfo::new("ignored", <String as Bindable>::type_info),
/// ];
/// let target = TypeInfo::of::<()>(Shape::Record(fields));
///
/// let schema = Analyzer::new(["query", "path"], ["ctx"]).analyze(&target).unwrap();
/// assert_eq!(schema.resolvable().len(), 1);
/// assert_eq!(schema.resolvable()[0].source_paths().get("query"), Some("n"));
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer {
    string_keys: Vec<String>,
    value_keys: Vec<String>,
    separator: String,
    policy: AnalysisPolicy,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            string_keys: Vec::new(),
            value_keys: Vec::new(),
            separator: DEFAULT_SEPARATOR.to_owned(),
            policy: AnalysisPolicy::default(),
        }
    }
}

// Splits off one level of `Option`. `None` means two levels.
fn peel(declared: &TypeInfo) -> Option<(&TypeInfo, bool)> {
    match declared.shape() {
        Shape::Nullable(inner) => match inner.shape() {
            Shape::Nullable(_) => None,
            _ => Some((inner.as_ref(), true)),
        },
        _ => Some((declared, false)),
    }
}

fn classify(target: &TypeInfo, nullable: bool, capabilities: Capabilities) -> Option<TypeCategory> {
    if capabilities.any() {
        return Some(TypeCategory::Capability(capabilities));
    }
    match target.shape() {
        Shape::Scalar(kind) if nullable => Some(TypeCategory::NullableScalar(*kind)),
        Shape::Scalar(kind) => Some(TypeCategory::Scalar(*kind)),
        Shape::Duration => Some(TypeCategory::Duration),
        _ => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

impl Analyzer {
    /// Creates an analyzer recognizing the given string-source and
    /// value-source directive names.
    pub fn new<S, V>(string_keys: S, value_keys: V) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            string_keys: string_keys.into_iter().map(Into::into).collect(),
            value_keys: value_keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the separator for nested string-source keys.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sets the analysis policy.
    pub fn with_policy(mut self, policy: AnalysisPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// String-source directive names.
    pub fn string_keys(&self) -> &[String] {
        &self.string_keys
    }

    /// Value-source directive names.
    pub fn value_keys(&self) -> &[String] {
        &self.value_keys
    }

    /// Nested key separator.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Analysis policy.
    pub fn policy(&self) -> AnalysisPolicy {
        self.policy
    }

    /// Analyzes `T`.
    pub fn analyze_type<T: Bindable>(&self) -> Result<Schema, AnalysisError> {
        self.analyze(&T::type_info())
    }

    /// Analyzes a record type, or a record behind one `Option`.
    ///
    /// A target behind two levels of `Option` yields an empty schema.
    pub fn analyze(&self, target: &TypeInfo) -> Result<Schema, AnalysisError> {
        let mut schema = Schema::root();
        let Some((record, _)) = peel(target) else {
            return Ok(schema);
        };
        let Shape::Record(fields) = record.shape() else {
            return Err(AnalysisError::NotARecord {
                type_name: target.name(),
            });
        };
        self.walk(&mut schema, &SourcePaths::new(), fields, "")?;
        Ok(schema)
    }

    fn walk(
        &self,
        schema: &mut Schema,
        inherited: &SourcePaths,
        fields: &[FieldInfo],
        prefix: &str,
    ) -> Result<(), AnalysisError> {
        for (index, field) in fields.iter().enumerate() {
            let field_path = if prefix.is_empty() {
                field.name().to_owned()
            } else {
                format!("{prefix}.{}", field.name())
            };
            let declared = field.type_info();

            let Some((target, nullable)) = peel(&declared) else {
                if self.policy == AnalysisPolicy::Strict && self.has_directive(field) {
                    return Err(AnalysisError::DoubleIndirection {
                        field: field_path,
                        type_name: declared.name(),
                    });
                }
                continue;
            };
            let capabilities = declared.capabilities().union(target.capabilities());

            let mut paths = inherited.clone();
            let has_directive = self.collect(field, &mut paths);
            let has_value_key = paths.contains_any(self.value_keys.iter().map(String::as_str));

            if !has_value_key {
                if let Shape::Record(nested) = target.shape() {
                    let nested_prefix = if field.is_flattened() {
                        prefix
                    } else {
                        field_path.as_str()
                    };
                    let mut child = Schema::child(index);
                    self.walk(&mut child, &paths, nested, nested_prefix)?;
                    if !child.is_empty() {
                        schema.children.push(child);
                        continue;
                    }
                    if !capabilities.any() {
                        continue;
                    }
                }
            }

            let category = match target.shape() {
                Shape::Sequence(element) | Shape::Array { element, .. } if !capabilities.any() => {
                    let Some((item, item_nullable)) = peel(element) else {
                        if self.policy == AnalysisPolicy::Strict && has_directive {
                            return Err(AnalysisError::DoubleIndirection {
                                field: field_path,
                                type_name: declared.name(),
                            });
                        }
                        continue;
                    };
                    let item_capabilities = element.capabilities().union(item.capabilities());
                    classify(item, item_nullable, item_capabilities)
                        .map(|c| TypeCategory::Collection(Box::new(c)))
                }
                _ => classify(target, nullable, capabilities),
            };

            if !(has_value_key || (has_directive && category.is_some())) {
                if self.policy == AnalysisPolicy::Strict && has_directive {
                    return Err(AnalysisError::Unclassifiable {
                        field: field_path,
                        type_name: declared.name(),
                    });
                }
                continue;
            }

            schema.resolvable.push(FieldDescriptor {
                field_path,
                index_path: smallvec::smallvec![index],
                source_paths: paths,
                category: category.unwrap_or(TypeCategory::Opaque),
                type_name: declared.name(),
                default_value: non_empty(field.tag(DEFAULT_DIRECTIVE)),
                exploder: non_empty(field.tag(EXPLODER_DIRECTIVE)),
            });
        }
        Ok(())
    }

    fn has_directive(&self, field: &FieldInfo) -> bool {
        self.string_keys
            .iter()
            .chain(&self.value_keys)
            .any(|key| field.tag(key).is_some())
    }

    // Adds the field's own directives to `paths`; returns whether it had any.
    fn collect(&self, field: &FieldInfo, paths: &mut SourcePaths) -> bool {
        let mut found = false;
        for key in &self.string_keys {
            if let Some(value) = field.tag(key) {
                paths.compose(key, value, &self.separator);
                found = true;
            }
        }
        for key in &self.value_keys {
            if let Some(value) = field.tag(key) {
                paths.set_literal(key, value);
                found = true;
            }
        }
        found
    }
}
