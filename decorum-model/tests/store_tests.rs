use decorum_model::{
    DeclaredType, ElementType, Error, PrimitiveKind, PropertyDeclaration, PropertyStore,
    PropertyValue, Schema, Value, hash,
};
use pretty_assertions::assert_eq;

fn int_seq() -> DeclaredType {
    DeclaredType::Sequence(ElementType::Primitive(PrimitiveKind::Int))
}

fn marker_schema() -> Schema {
    Schema::new(
        "com.example.Marker",
        vec![
            PropertyDeclaration::string("string"),
            PropertyDeclaration::sequence("integer", ElementType::Primitive(PrimitiveKind::Int)),
            PropertyDeclaration::boolean("enabled").with_default(true),
        ],
    )
    .unwrap()
}

// ── PropertyValue ────────────────────────────────────────────────

#[test]
fn new_cell_holds_empty_value() {
    let cell = PropertyValue::new("integer", int_seq()).unwrap();
    assert_eq!(cell.name(), "integer");
    assert_eq!(cell.value(), &Value::Sequence(vec![]));
}

#[test]
fn from_declaration_uses_default() {
    let decl = PropertyDeclaration::boolean("enabled").with_default(true);
    let cell = PropertyValue::from_declaration(&decl).unwrap();
    assert_eq!(cell.value(), &Value::Boolean(true));
}

#[test]
fn set_value_replaces() {
    let mut cell = PropertyValue::new("integer", int_seq()).unwrap();
    cell.set_value(Value::from(vec![4])).unwrap();
    assert_eq!(cell.value(), &Value::from(vec![4]));
    cell.set_value(Value::from(vec![4, 5, 6])).unwrap();
    assert_eq!(cell.value(), &Value::from(vec![4, 5, 6]));
}

#[test]
fn incompatible_value_rejected_and_cell_unchanged() {
    let mut cell = PropertyValue::new("integer", int_seq()).unwrap();
    cell.set_value(Value::from(vec![4])).unwrap();

    let before = cell.value().clone();
    let err = cell.set_value(Value::Boolean(false)).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(cell.value(), &before);
}

#[test]
fn with_value_rejects_nonconforming() {
    assert!(PropertyValue::with_value("x", int_seq(), Value::Int(1)).is_err());
    assert!(PropertyValue::with_value("x", int_seq(), Value::from(vec![1])).is_ok());
}

#[test]
fn cells_equal_by_name_and_value() {
    let a = PropertyValue::with_value("integer", int_seq(), Value::from(vec![4, 5, 6])).unwrap();
    let b = PropertyValue::with_value("integer", int_seq(), Value::from(vec![4, 5, 6])).unwrap();
    let reversed =
        PropertyValue::with_value("integer", int_seq(), Value::from(vec![6, 5, 4])).unwrap();
    let renamed = PropertyValue::with_value("other", int_seq(), Value::from(vec![4, 5, 6])).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, reversed);
    assert_ne!(a, renamed);
}

#[test]
fn cell_hash_and_rendering() {
    let cell = PropertyValue::with_value("integer", int_seq(), Value::from(vec![4])).unwrap();
    assert_eq!(cell.value_hash_code(), 31 + 4);
    assert_eq!(cell.hash_code(), hash::member("integer", 35));
    assert_eq!(cell.value_to_string(), "[4]");
    assert_eq!(cell.to_string(), "integer=[4]");
}

// ── PropertyStore ────────────────────────────────────────────────

#[test]
fn store_seeded_in_declaration_order() {
    let store = PropertyStore::from_schema(&marker_schema()).unwrap();
    let names: Vec<&str> = store.iter().map(PropertyValue::name).collect();
    assert_eq!(names, vec!["string", "integer", "enabled"]);
    assert_eq!(store.len(), 3);
    assert_eq!(store.slot("integer"), Some(1));
    assert_eq!(store.value("enabled"), Some(&Value::Boolean(true)));
    assert_eq!(store.value("string"), Some(&Value::from("")));
}

#[test]
fn store_set_unknown_name_rejected() {
    let mut store = PropertyStore::from_schema(&marker_schema()).unwrap();
    let err = store.set("doesnotexist", Value::Boolean(false)).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn store_set_incompatible_rejected() {
    let mut store = PropertyStore::from_schema(&marker_schema()).unwrap();
    store.set("integer", Value::from(vec![4])).unwrap();
    assert!(store.set("integer", Value::Boolean(false)).is_err());
    assert_eq!(store.value("integer"), Some(&Value::from(vec![4])));
}

#[test]
fn duplicate_cells_rejected() {
    let a = PropertyValue::new("x", int_seq()).unwrap();
    let b = PropertyValue::new("x", int_seq()).unwrap();
    assert!(PropertyStore::from_properties(vec![a, b]).is_err());
}

#[test]
fn store_hash_is_sum_of_members() {
    let schema = Schema::new(
        "com.example.A",
        vec![PropertyDeclaration::int("a").with_default(5)],
    )
    .unwrap();
    let store = PropertyStore::from_schema(&schema).unwrap();
    assert_eq!(store.hash_code(), (127 * 97) ^ 5);
}

#[test]
fn store_equality_and_hash_ignore_order() {
    let forward = PropertyStore::from_properties(vec![
        PropertyValue::with_value("a", int_seq(), Value::from(vec![1])).unwrap(),
        PropertyValue::with_value(
            "b",
            DeclaredType::Scalar(ElementType::String),
            Value::from("x"),
        )
        .unwrap(),
    ])
    .unwrap();
    let backward = PropertyStore::from_properties(vec![
        PropertyValue::with_value(
            "b",
            DeclaredType::Scalar(ElementType::String),
            Value::from("x"),
        )
        .unwrap(),
        PropertyValue::with_value("a", int_seq(), Value::from(vec![1])).unwrap(),
    ])
    .unwrap();

    assert_eq!(forward, backward);
    assert_eq!(forward.hash_code(), backward.hash_code());
    assert_eq!(forward.render("T"), "@T(a=[1], b=x)");
    assert_eq!(backward.render("T"), "@T(b=x, a=[1])");
}

#[test]
fn store_render() {
    let mut store = PropertyStore::from_schema(&marker_schema()).unwrap();
    store.set("integer", Value::from(vec![4, 5])).unwrap();
    store.set("string", Value::from("X")).unwrap();
    assert_eq!(
        store.render("com.example.Marker"),
        "@com.example.Marker(string=X, integer=[4, 5], enabled=true)"
    );
    assert_eq!(PropertyStore::default().render("E"), "@E()");
}

#[test]
fn describe_is_detached() {
    let mut store = PropertyStore::from_schema(&marker_schema()).unwrap();
    let mut snapshot = store.describe();
    snapshot[1].set_value(Value::from(vec![9])).unwrap();
    assert_eq!(store.value("integer"), Some(&Value::Sequence(vec![])));

    store.set("integer", Value::from(vec![1])).unwrap();
    assert_eq!(snapshot[1].value(), &Value::from(vec![9]));
}
