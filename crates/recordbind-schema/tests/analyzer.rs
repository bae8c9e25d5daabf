//! Analyzer behavior over derived record types.

use proptest::prelude::*;
use recordbind_core::{Capabilities, Json, Parsed, ScalarKind};
use recordbind_macros::Bindable;
use recordbind_schema::{
    AnalysisError, AnalysisPolicy, Analyzer, Schema, SchemaCache, TypeCategory,
};
use std::sync::Arc;
use std::time::Duration;

fn analyzer() -> Analyzer {
    Analyzer::new(["query", "path", "header"], ["ctx"])
}

fn analyze<T: recordbind_core::Bindable>() -> Schema {
    analyzer().analyze_type::<T>().expect("analysis")
}

#[derive(Default, Bindable)]
struct AllScalars {
    #[bind(query = "String")]
    string: String,
    #[bind(query = "Bool")]
    boolean: bool,
    #[bind(query = "Isize")]
    isize: isize,
    #[bind(query = "I8")]
    i8: i8,
    #[bind(query = "I16")]
    i16: i16,
    #[bind(query = "I32")]
    i32: i32,
    #[bind(query = "I64")]
    i64: i64,
    #[bind(query = "Usize")]
    usize: usize,
    #[bind(query = "U8")]
    u8: u8,
    #[bind(query = "U16")]
    u16: u16,
    #[bind(query = "U32")]
    u32: u32,
    #[bind(query = "U64")]
    u64: u64,
    #[bind(query = "F32")]
    f32: f32,
    #[bind(query = "F64")]
    f64: f64,
}

#[test]
fn test_all_scalars_resolvable() {
    let schema = analyze::<AllScalars>();
    assert_eq!(schema.resolvable().len(), 14);
    assert!(schema.children().is_empty());
    assert!(schema.is_root());
    assert_eq!(
        schema.resolvable()[6].category(),
        &TypeCategory::Scalar(ScalarKind::I64)
    );
}

#[derive(Default, Bindable)]
struct Untagged {
    #[allow(dead_code)]
    name: String,
}

#[test]
fn test_field_without_directive_is_ignored() {
    let schema = analyze::<Untagged>();
    assert!(schema.is_empty());
}

#[derive(Default, Bindable)]
struct WithDirectives {
    #[bind(query = "name", default = "default value")]
    name: String,
    #[bind(query = "alias", path = "aliasPath")]
    alias: String,
    #[bind(default = "orphan")]
    orphan: String,
    #[bind(query = "empty", default = "", exploder = "")]
    empty: String,
}

#[test]
fn test_default_and_multiple_sources() {
    let schema = analyze::<WithDirectives>();
    assert_eq!(schema.resolvable().len(), 3);

    let name = &schema.resolvable()[0];
    assert_eq!(name.source_paths().get("query"), Some("name"));
    assert_eq!(name.default_value(), Some("default value"));

    let alias = &schema.resolvable()[1];
    assert_eq!(alias.source_paths().get("query"), Some("alias"));
    assert_eq!(alias.source_paths().get("path"), Some("aliasPath"));

    let empty = &schema.resolvable()[2];
    assert_eq!(empty.default_value(), None);
    assert_eq!(empty.exploder(), None);
    assert_eq!(empty.index_path(), &[3]);
}

#[derive(Default, Bindable)]
struct Nullables {
    #[bind(query = "name")]
    name: Option<String>,
    #[bind(query = "twice")]
    twice: Option<Option<i32>>,
    #[bind(query = "wait")]
    wait: Option<Duration>,
}

#[test]
fn test_single_nullable_accepted_double_dropped() {
    let schema = analyze::<Nullables>();
    assert_eq!(schema.resolvable().len(), 2);
    assert_eq!(
        schema.resolvable()[0].category(),
        &TypeCategory::NullableScalar(ScalarKind::Str)
    );
    assert_eq!(schema.resolvable()[1].category(), &TypeCategory::Duration);
    assert_eq!(schema.resolvable()[1].field_path(), "wait");
}

#[test]
fn test_double_nullable_rejected_when_strict() {
    let err = analyzer()
        .with_policy(AnalysisPolicy::Strict)
        .analyze_type::<Nullables>()
        .unwrap_err();
    assert_eq!(
        err,
        AnalysisError::DoubleIndirection {
            field: "twice".into(),
            type_name: std::any::type_name::<Option<Option<i32>>>(),
        }
    );
}

#[derive(Default, Bindable)]
struct Collections {
    #[bind(query = "names", exploder = ",")]
    names: Vec<String>,
    #[bind(query = "maybe")]
    maybe: Vec<Option<u8>>,
    #[bind(query = "twice")]
    twice: Vec<Option<Option<u8>>>,
    #[bind(query = "fixed")]
    fixed: [f64; 3],
}

#[test]
fn test_collections_classify_elements() {
    let schema = analyze::<Collections>();
    let categories: Vec<_> = schema
        .resolvable()
        .iter()
        .map(|d| d.category().clone())
        .collect();
    assert_eq!(
        categories,
        vec![
            TypeCategory::Collection(Box::new(TypeCategory::Scalar(ScalarKind::Str))),
            TypeCategory::Collection(Box::new(TypeCategory::NullableScalar(ScalarKind::U8))),
            TypeCategory::Collection(Box::new(TypeCategory::Scalar(ScalarKind::F64))),
        ]
    );
    assert_eq!(schema.resolvable()[0].exploder(), Some(","));
    assert!(schema.resolvable()[0].category().is_collection());
}

#[derive(Default, Bindable)]
struct Filter {
    #[bind(query = "name")]
    name: String,
    #[bind(path = "id")]
    id: u64,
}

#[derive(Default, Bindable)]
struct NestedClearPath {
    #[allow(dead_code)]
    skipped: i32,
    #[bind(query = "filter")]
    filter: Filter,
}

#[derive(Default, Bindable)]
struct NestedUnclearPath {
    filter: Filter,
}

#[test]
fn test_nested_record_composes_string_paths() {
    let schema = analyze::<NestedClearPath>();
    assert!(schema.resolvable().is_empty());
    assert_eq!(schema.children().len(), 1);

    let child = &schema.children()[0];
    assert!(!child.is_root());
    assert_eq!(child.index_path(), &[1]);
    assert_eq!(child.resolvable()[0].source_paths().get("query"), Some("filter.name"));
    assert_eq!(child.resolvable()[0].field_path(), "filter.name");
    assert_eq!(child.resolvable()[1].source_paths().get("path"), Some("id"));
}

#[test]
fn test_nested_record_without_own_directive() {
    let schema = analyze::<NestedUnclearPath>();
    let child = &schema.children()[0];
    assert_eq!(child.resolvable()[0].source_paths().get("query"), Some("name"));
}

#[test]
fn test_custom_separator() {
    let schema = analyzer()
        .with_separator("_")
        .analyze_type::<NestedClearPath>()
        .unwrap();
    assert_eq!(
        schema.children()[0].resolvable()[0].source_paths().get("query"),
        Some("filter_name")
    );
}

#[derive(Default, Bindable)]
struct Embedded {
    #[allow(dead_code)]
    marker: i32,
    #[bind(flatten)]
    scalars: Option<AllScalars>,
}

#[test]
fn test_flattened_record_behind_option() {
    let schema = analyze::<Embedded>();
    assert!(schema.resolvable().is_empty());
    assert_eq!(schema.children().len(), 1);
    let child = &schema.children()[0];
    assert_eq!(child.index_path(), &[1]);
    assert_eq!(child.resolvable().len(), 14);
    assert_eq!(child.resolvable()[0].field_path(), "string");
    assert_eq!(schema.field_count(), 14);
}

#[derive(Debug, Default, Clone, PartialEq, serde::Deserialize)]
struct Criteria {
    age: u32,
}

#[derive(Default, Bindable)]
struct Empty {}

#[derive(Default, Bindable)]
struct Capable {
    #[bind(query = "criteria")]
    criteria: Json<Criteria>,
    #[bind(header = "x-ip")]
    ip: Option<Parsed<u32>>,
    #[bind(query = "empty")]
    empty: Empty,
    #[bind(query = "unsupported")]
    unsupported: Vec<Empty>,
}

#[test]
fn test_capability_fields_and_unsupported_shapes() {
    let schema = analyze::<Capable>();
    assert!(schema.children().is_empty());
    assert_eq!(schema.resolvable().len(), 2);
    assert_eq!(
        schema.resolvable()[0].category(),
        &TypeCategory::Capability(Capabilities::STRUCTURED)
    );
    assert_eq!(
        schema.resolvable()[1].category(),
        &TypeCategory::Capability(Capabilities::TEXT)
    );
}

#[test]
fn test_unclassifiable_rejected_when_strict() {
    let err = analyzer()
        .with_policy(AnalysisPolicy::Strict)
        .analyze_type::<Capable>()
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Unclassifiable { ref field, .. } if field == "unsupported"));
}

#[derive(Debug, Clone, Default)]
struct Session {
    #[allow(dead_code)]
    user: String,
}

impl recordbind_core::Bindable for Session {
    fn type_info() -> recordbind_core::TypeInfo {
        recordbind_core::TypeInfo::of::<Self>(recordbind_core::Shape::Opaque)
    }

    fn slot(&mut self) -> recordbind_core::Slot<'_> {
        recordbind_core::Slot::Opaque
    }

    fn assign_opaque(&mut self, value: &recordbind_core::Opaque) -> bool {
        recordbind_core::assign_from(self, value)
    }
}

#[derive(Default, Bindable)]
struct FromContext {
    #[bind(ctx = "session")]
    session: Session,
    #[bind(ctx = "filter")]
    filter: Filter,
    #[bind(query = "outer")]
    nested: ContextInner,
}

#[derive(Default, Bindable)]
struct ContextInner {
    #[bind(ctx = "inner")]
    value: Session,
}

#[test]
fn test_value_keys_bind_any_type_literally() {
    let schema = analyze::<FromContext>();
    assert_eq!(schema.resolvable().len(), 2);
    assert_eq!(schema.resolvable()[0].category(), &TypeCategory::Opaque);
    assert_eq!(schema.resolvable()[1].category(), &TypeCategory::Opaque);
    assert_eq!(schema.resolvable()[1].source_paths().get("ctx"), Some("filter"));

    let child = &schema.children()[0];
    let inner = &child.resolvable()[0];
    assert_eq!(inner.source_paths().get("ctx"), Some("inner"));
    assert_eq!(inner.source_paths().get("query"), Some("outer"));
}

#[test]
fn test_root_must_be_record() {
    let err = analyzer().analyze_type::<u8>().unwrap_err();
    assert_eq!(err, AnalysisError::NotARecord { type_name: "u8" });
}

#[test]
fn test_root_behind_options() {
    assert_eq!(analyze::<Option<Filter>>().resolvable().len(), 2);
    assert!(analyze::<Option<Option<Filter>>>().is_empty());
}

#[test]
fn test_cache_returns_shared_schema() {
    let cache = SchemaCache::new(analyzer());
    assert!(cache.is_empty());
    let first = cache.get_or_analyze::<Filter>().unwrap();
    let second = cache.get_or_analyze::<Filter>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(cache.contains::<Filter>());
    assert!(!cache.contains::<Capable>());
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_concurrent_access() {
    let cache = Arc::new(SchemaCache::new(analyzer()));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || cache.get_or_analyze::<NestedClearPath>().unwrap())
        })
        .collect();
    let schemas: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(schemas.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(cache.len(), 1);
}

proptest! {
    #[test]
    fn prop_analysis_is_idempotent(separator in "[._/:-]{1,2}", strict in any::<bool>()) {
        let policy = if strict { AnalysisPolicy::Strict } else { AnalysisPolicy::FailOpen };
        let analyzer = analyzer().with_separator(separator).with_policy(policy);
        let first = analyzer.analyze_type::<NestedClearPath>().unwrap();
        let second = analyzer.analyze_type::<NestedClearPath>().unwrap();
        prop_assert_eq!(first, second);
    }
}
