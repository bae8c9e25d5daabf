//! End-to-end binding through the facade.

use http::StatusCode;
use recordbind::prelude::*;
use recordbind::ErrorClass;
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Default, Bindable)]
#[bind(crate = "recordbind::core")]
struct Number {
    #[bind(query = "n")]
    number: i32,
}

#[derive(Debug, Default, Bindable)]
#[bind(crate = "recordbind::core")]
struct Filter {
    #[bind(query = "owner")]
    owner: Option<String>,
    #[bind(query = "tags", exploder = ",")]
    tags: Vec<String>,
}

#[derive(Debug, Default, Bindable)]
#[bind(crate = "recordbind::core")]
struct ListInvoices {
    #[bind(path = "account")]
    account: u64,
    #[bind(header = "x-request-id", query = "request_id")]
    request_id: String,
    #[bind(query = "window", default = "1h")]
    window: Duration,
    #[bind(query = "f")]
    filter: Option<Filter>,
}

#[derive(Debug, Default, Deserialize, Bindable)]
#[serde(default)]
#[bind(crate = "recordbind::core")]
struct UpdateProfile {
    #[serde(skip)]
    #[bind(path = "id")]
    id: u64,
    display_name: String,
    #[bind(query = "locale")]
    locale: String,
}

impl Validate for UpdateProfile {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.display_name.trim().is_empty() {
            errors.add("display_name", "cannot be blank");
        }
        if self.locale.len() > 5 {
            errors.add("locale", "too long");
        }
        errors.into_result()
    }
}

static GUARD_CHECKS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Default, Bindable)]
#[bind(crate = "recordbind::core")]
struct Guarded {
    #[bind(path = "id")]
    id: u64,
}

impl Validate for Guarded {
    fn validate(&self) -> Result<(), ValidationErrors> {
        GUARD_CHECKS.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Default, Bindable)]
#[bind(crate = "recordbind::core")]
struct Ambiguous {
    #[bind(query = "id")]
    id: u32,
    #[bind(query = "maybe")]
    maybe: Option<Option<u32>>,
}

#[derive(Debug, Default, PartialEq, Bindable)]
#[bind(crate = "recordbind::core")]
struct Shipping {
    #[bind(query = "zip")]
    zip: Option<u32>,
    #[bind(query = "ch")]
    ch: Parsed<char>,
    #[bind(query = "ids", exploder = ",")]
    ids: Vec<u32>,
}

fn request(uri: &str) -> recordbind::extract::ExtractionContextBuilder {
    ExtractionContext::builder().uri(uri.parse().unwrap())
}

#[test]
fn test_integer_from_query() {
    let binder = Binder::with_defaults();
    let number: Number = binder.bind(&request("/?n=12").build()).unwrap();
    assert_eq!(number.number, 12);
}

#[test]
fn test_failed_field_keeps_prior_value() {
    let binder = Binder::with_defaults();
    let prior = || Shipping {
        zip: None,
        ch: Parsed('q'),
        ids: vec![9, 9, 9],
    };

    for uri in ["/?zip=abc", "/?ch=zz", "/?ids=1,x"] {
        let mut target = prior();
        let result = binder.bind_into(&request(uri).build(), &mut target);
        assert!(result.is_err(), "{uri} should fail");
        assert_eq!(target, prior(), "{uri} changed the target");
    }
}

#[test]
fn test_invalid_integer_renders_field_message() {
    let binder = Binder::with_defaults();
    let err = binder
        .bind::<Number>(&request("/?n=abc").build())
        .unwrap_err();

    let PipelineError::Bind(bind) = &err else {
        panic!("expected a bind error, got {err:?}");
    };
    assert_eq!(bind.kind(), ErrorKind::InvalidInteger);
    assert_eq!(bind.key(), Some("n"));
    assert_eq!(bind.value(), Some("abc"));

    let payload = ErrorPayload::new(&err);
    assert_eq!(payload.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(payload.error, ErrorClass::InvalidArgument);
    assert!(payload.fields["n"].starts_with("with query parameter: invalid integer"));
}

#[test]
fn test_full_request() {
    let binder = Binder::with_defaults();
    let ctx = request("/accounts/9/invoices?window=15m&f.owner=ana&f.tags=a,b")
        .path_param("account", "9")
        .header("x-request-id", "req-7")
        .build();

    let list: ListInvoices = binder.bind(&ctx).unwrap();
    assert_eq!(list.account, 9);
    assert_eq!(list.request_id, "req-7");
    assert_eq!(list.window, Duration::from_secs(15 * 60));

    let filter = list.filter.unwrap();
    assert_eq!(filter.owner.as_deref(), Some("ana"));
    assert_eq!(filter.tags, vec!["a", "b"]);
}

#[test]
fn test_nested_record_left_empty() {
    let binder = Binder::with_defaults();
    let ctx = request("/").path_param("account", "1").build();

    let list: ListInvoices = binder.bind(&ctx).unwrap();
    assert!(list.filter.is_none());
    assert_eq!(list.window, Duration::from_secs(3600));
    assert!(list.request_id.is_empty());
}

#[test]
fn test_configured_priority() {
    let ctx = request("/?request_id=from-query")
        .header("x-request-id", "from-header")
        .build();

    let default_order: ListInvoices = Binder::with_defaults().bind(&ctx).unwrap();
    assert_eq!(default_order.request_id, "from-query");

    let config = ConfigLoader::new()
        .with_string(
            r#"
                [sources]
                strings = ["header", "query", "path"]
            "#,
            "toml",
        )
        .unwrap()
        .load()
        .unwrap();
    let header_first: ListInvoices = Binder::from_config(&config).unwrap().bind(&ctx).unwrap();
    assert_eq!(header_first.request_id, "from-header");
}

#[test]
fn test_custom_separator() {
    let mut config = BinderConfig::default();
    config.sources.path_separator = "_".to_owned();
    let binder = Binder::from_config(&config).unwrap();

    let ctx = request("/?f_owner=ben").path_param("account", "2").build();
    let list: ListInvoices = binder.bind(&ctx).unwrap();
    assert_eq!(list.filter.unwrap().owner.as_deref(), Some("ben"));
}

#[test]
fn test_body_then_sources() {
    let binder = Binder::with_defaults();
    let ctx = request("/profiles/3?locale=fr")
        .path_param("id", "3")
        .body(r#"{"display_name": "Ada", "locale": "en"}"#)
        .build();

    let profile: UpdateProfile = binder.bind_request(&ctx).unwrap();
    assert_eq!(profile.id, 3);
    assert_eq!(profile.display_name, "Ada");
    assert_eq!(profile.locale, "fr");
}

#[test]
fn test_body_kept_without_source_value() {
    let binder = Binder::with_defaults();
    let ctx = request("/profiles/3")
        .path_param("id", "3")
        .body(r#"{"display_name": "Ada", "locale": "en"}"#)
        .build();

    let profile: UpdateProfile = binder.bind_with_body(&ctx).unwrap();
    assert_eq!(profile.locale, "en");
}

#[test]
fn test_malformed_body() {
    let binder = Binder::with_defaults();
    let ctx = request("/").body("{not json").build();

    let err = binder.bind_with_body::<UpdateProfile>(&ctx).unwrap_err();
    assert!(matches!(err, PipelineError::Body(_)));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_body_limit_from_config() {
    let mut config = BinderConfig::default();
    config.body.max_bytes = 8;
    let binder = Binder::from_config(&config).unwrap();
    let ctx = request("/")
        .body(r#"{"display_name": "a rather long name"}"#)
        .build();

    let err = binder.bind_with_body::<UpdateProfile>(&ctx).unwrap_err();
    let payload = ErrorPayload::new(&err);
    assert_eq!(payload.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(payload.error, ErrorClass::PayloadTooLarge);
}

#[test]
fn test_validation_failure() {
    let binder = Binder::with_defaults();
    let ctx = request("/profiles/3?locale=klingon")
        .path_param("id", "3")
        .body(r#"{"display_name": " "}"#)
        .build();

    let err = binder.bind_request::<UpdateProfile>(&ctx).unwrap_err();
    let PipelineError::Validation(errors) = &err else {
        panic!("expected validation errors, got {err:?}");
    };
    assert_eq!(errors.get("display_name"), Some("cannot be blank"));
    assert_eq!(errors.get("locale"), Some("too long"));

    let payload = ErrorPayload::new(&err);
    assert_eq!(payload.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(payload.fields.len(), 2);
}

#[test]
fn test_validation_skipped_after_decode_failure() {
    let binder = Binder::with_defaults();
    let ctx = request("/").path_param("id", "x").build();

    let err = binder.bind_validated::<Guarded>(&ctx).unwrap_err();
    assert!(matches!(err, PipelineError::Bind(_)));
    assert_eq!(GUARD_CHECKS.load(Ordering::SeqCst), 0);

    let ok = request("/").path_param("id", "8").build();
    assert_eq!(binder.bind_validated::<Guarded>(&ok).unwrap().id, 8);
    assert_eq!(GUARD_CHECKS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_fail_open_drops_unbindable_field() {
    let binder = Binder::with_defaults();
    let schema = binder.register::<Ambiguous>().unwrap();
    assert!(schema.find("maybe").is_none());

    let value: Ambiguous = binder.bind(&request("/?id=4&maybe=5").build()).unwrap();
    assert_eq!(value.id, 4);
    assert!(value.maybe.is_none());
}

#[test]
fn test_strict_rejects_unbindable_field() {
    let config = BinderConfig::development();
    assert!(config.analysis.strict);
    let binder = Binder::from_config(&config).unwrap();

    let err = binder
        .bind::<Ambiguous>(&request("/?id=4").build())
        .unwrap_err();
    assert!(matches!(err, PipelineError::Analysis(_)));
    assert_eq!(ErrorPayload::new(&err).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_context_value() {
    #[derive(Default, Bindable)]
    #[bind(crate = "recordbind::core")]
    struct Scoped {
        #[bind(ctx = "tenant")]
        tenant: Option<String>,
        #[bind(ctx = "user")]
        user: String,
    }

    let binder = Binder::with_defaults();
    let ctx = request("/")
        .value("user", Opaque::new(String::from("u-1")))
        .build();

    let scoped: Scoped = binder.bind(&ctx).unwrap();
    assert_eq!(scoped.user, "u-1");
    assert!(scoped.tenant.is_none());
}
