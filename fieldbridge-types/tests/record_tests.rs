use fieldbridge_types::{
    record, records_equal, Callback, DescribedRecord, FieldKind, Record, ScalarKind, TypeError,
    UnsupportedKind, Value, WireTimestamp,
};
use pretty_assertions::assert_eq;

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Tag as "Tag" {
        pub label: String,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Profile as "Profile" {
        pub id: i64,
        pub nickname: Option<String>,
        #[sensitive]
        pub secret: String,
        pub avatar: Vec<u8>,
        pub scores: Vec<i32>,
        pub seen_at: WireTimestamp,
        pub main_tag: Tag => record,
        pub extra_tag: Option<Tag> => optional_record,
        pub tags: Vec<Tag> => records,
        pub on_change: Callback,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct TreeNode as "TreeNode" {
        pub value: i32,
        pub children: Vec<TreeNode> => records,
    }
}

fn tag(label: &str) -> Tag {
    Tag {
        label: label.to_string(),
    }
}

// ── Descriptor ───────────────────────────────────────────────────

#[test]
fn descriptor_lists_fields_in_declaration_order() {
    let names: Vec<_> = Profile::type_descriptor()
        .fields()
        .iter()
        .map(|f| f.name())
        .collect();
    assert_eq!(
        names,
        vec![
            "id", "nickname", "secret", "avatar", "scores", "seen_at", "main_tag", "extra_tag",
            "tags", "on_change"
        ]
    );
}

#[test]
fn descriptor_indexes_match_positions() {
    for (position, field) in Profile::type_descriptor().fields().iter().enumerate() {
        assert_eq!(field.index(), position);
    }
}

#[test]
fn descriptor_kinds() {
    let d = Profile::type_descriptor();
    assert_eq!(d.field("id").unwrap().kind(), FieldKind::scalar(ScalarKind::I64));
    assert_eq!(
        d.field("nickname").unwrap().kind(),
        FieldKind::optional(ScalarKind::String)
    );
    assert_eq!(d.field("avatar").unwrap().kind(), FieldKind::scalar(ScalarKind::Bytes));
    assert_eq!(d.field("scores").unwrap().kind(), FieldKind::ScalarList(ScalarKind::I32));
    assert_eq!(
        d.field("seen_at").unwrap().kind(),
        FieldKind::scalar(ScalarKind::Timestamp)
    );
    assert_eq!(
        d.field("on_change").unwrap().kind().unsupported(),
        Some(UnsupportedKind::Function)
    );
    assert!(matches!(
        d.field("main_tag").unwrap().kind(),
        FieldKind::Record { optional: false, .. }
    ));
    assert!(matches!(
        d.field("extra_tag").unwrap().kind(),
        FieldKind::Record { optional: true, .. }
    ));
    assert_eq!(
        d.field("tags").unwrap().kind().nested_descriptor().map(|n| n.name()),
        Some("Tag")
    );
}

#[test]
fn sensitive_marker_is_recorded() {
    let d = Profile::type_descriptor();
    assert!(d.field("secret").unwrap().is_sensitive());
    assert!(!d.field("id").unwrap().is_sensitive());
}

#[test]
fn field_lookup_is_case_sensitive() {
    let d = Profile::type_descriptor();
    assert!(d.field("id").is_some());
    assert!(d.field("Id").is_none());
    assert!(d.field("ID").is_none());
}

#[test]
fn descriptor_is_a_singleton() {
    assert!(std::ptr::eq(Profile::type_descriptor(), Profile::default().descriptor()));
}

#[test]
fn self_referential_descriptor_resolves() {
    let d = TreeNode::type_descriptor();
    let nested = d.field("children").unwrap().kind().nested_descriptor().unwrap();
    assert!(std::ptr::eq(d, nested));
}

#[test]
fn instantiate_creates_default_record() {
    let instance = Profile::type_descriptor().instantiate();
    let profile = instance.as_any().downcast_ref::<Profile>().unwrap();
    assert_eq!(profile, &Profile::default());
}

#[test]
fn descriptor_json_view() {
    let json = Tag::type_descriptor().to_json();
    assert_eq!(json["name"], "Tag");
    assert_eq!(json["fields"][0]["name"], "label");
    assert_eq!(json["fields"][0]["kind"], "string");
    assert_eq!(json["fields"][0]["sensitive"], false);
}

// ── Accessors ────────────────────────────────────────────────────

#[test]
fn get_and_set_scalars_by_index() {
    let mut p = Profile::default();
    p.set_field(0, Value::I64(42)).unwrap();
    p.set_field(1, Value::from("neo")).unwrap();
    assert_eq!(p.id, 42);
    assert_eq!(p.nickname.as_deref(), Some("neo"));
    assert_eq!(p.get_field(0), Some(Value::I64(42)));
    assert_eq!(p.get_field(1), Some(Value::from("neo")));
}

#[test]
fn optional_scalar_accepts_null() {
    let mut p = Profile {
        nickname: Some("x".into()),
        ..Profile::default()
    };
    p.set_by_name("nickname", Value::Null).unwrap();
    assert_eq!(p.nickname, None);
    assert_eq!(p.get_by_name("nickname"), Some(Value::Null));
}

#[test]
fn wrong_shape_is_rejected() {
    let mut p = Profile::default();
    let err = p.set_by_name("id", Value::from("nope")).unwrap_err();
    assert_eq!(
        err,
        TypeError::InvalidValue {
            record: "Profile",
            field: "id",
            expected: "i64".into(),
            actual: "string",
        }
    );
    assert_eq!(p.id, 0);
}

#[test]
fn out_of_range_index() {
    let mut p = Profile::default();
    assert_eq!(p.get_field(99), None);
    assert!(matches!(
        p.set_field(99, Value::Null),
        Err(TypeError::FieldIndexOutOfRange { index: 99, .. })
    ));
}

#[test]
fn unknown_field_name() {
    let mut p = Profile::default();
    assert_eq!(p.get_by_name("missing"), None);
    assert!(matches!(
        p.set_by_name("missing", Value::Null),
        Err(TypeError::UnknownField { .. })
    ));
}

#[test]
fn scalar_list_roundtrip() {
    let mut p = Profile::default();
    p.set_by_name("scores", Value::List(vec![Value::I32(1), Value::I32(2)]))
        .unwrap();
    assert_eq!(p.scores, vec![1, 2]);
}

#[test]
fn scalar_list_rejects_mixed_elements() {
    let mut p = Profile::default();
    let result = p.set_by_name("scores", Value::List(vec![Value::I32(1), Value::I64(2)]));
    assert!(result.is_err());
    assert!(p.scores.is_empty());
}

#[test]
fn nested_record_roundtrip() {
    let mut p = Profile::default();
    p.set_by_name("main_tag", Value::Record(Box::new(tag("a"))))
        .unwrap();
    p.set_by_name("extra_tag", Value::Record(Box::new(tag("b"))))
        .unwrap();
    assert_eq!(p.main_tag, tag("a"));
    assert_eq!(p.extra_tag, Some(tag("b")));

    p.set_by_name("extra_tag", Value::Null).unwrap();
    assert_eq!(p.extra_tag, None);
}

#[test]
fn nested_record_of_wrong_type_is_rejected() {
    let mut p = Profile::default();
    let other = TreeNode::default();
    assert!(p.set_by_name("main_tag", Value::Record(Box::new(other))).is_err());
}

#[test]
fn record_list_roundtrip() {
    let mut p = Profile::default();
    let items = Value::List(vec![
        Value::Record(Box::new(tag("x"))),
        Value::Record(Box::new(tag("y"))),
    ]);
    p.set_by_name("tags", items).unwrap();
    assert_eq!(p.tags, vec![tag("x"), tag("y")]);
}

#[test]
fn callback_reads_as_null_and_rejects_writes() {
    let mut p = Profile {
        on_change: Callback::new(|| {}),
        ..Profile::default()
    };
    assert_eq!(p.get_by_name("on_change"), Some(Value::Null));
    assert!(p.set_by_name("on_change", Value::Null).is_err());
    assert!(p.on_change.is_set());
}

#[test]
fn records_equal_compares_field_by_field() {
    let a = Profile {
        id: 1,
        tags: vec![tag("t")],
        ..Profile::default()
    };
    let mut b = a.clone();
    assert!(records_equal(&a, &b));
    b.tags.push(tag("u"));
    assert!(!records_equal(&a, &b));
    assert!(!records_equal(&a, &tag("t")));
}
