//! Produced instances against natively declared decorator values.

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, LazyLock};

use decorum_model::{
    AccessError, Decorator, DecoratorRecord, ElementType, Error, PrimitiveKind,
    PropertyDeclaration, Schema, Value, contract,
};
use decorum_proxy::{DecoratorProxy, ProducedInstance};
use pretty_assertions::assert_eq;

static MARKER: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    Arc::new(
        Schema::new(
            "com.example.Marker",
            vec![
                PropertyDeclaration::string("string"),
                PropertyDeclaration::sequence("integer", ElementType::Primitive(PrimitiveKind::Int)),
            ],
        )
        .unwrap(),
    )
});

/// The native counterpart of `@Marker(string = .., integer = {..})`.
struct Marker {
    string: String,
    integer: Vec<i32>,
}

impl Decorator for Marker {
    fn schema(&self) -> &Arc<Schema> {
        &MARKER
    }

    fn property(&self, name: &str) -> Result<Value, AccessError> {
        match name {
            "string" => Ok(Value::from(self.string.as_str())),
            "integer" => Ok(Value::from(self.integer.clone())),
            other => Err(AccessError::NoSuchMember(other.to_string())),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl PartialEq for Marker {
    fn eq(&self, other: &Self) -> bool {
        contract::equals(self, other).unwrap_or(false)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&contract::render(self).map_err(|_| fmt::Error)?)
    }
}

/// Same accessors as `Marker`, but `integer` cannot be reached.
struct Sealed;

impl Decorator for Sealed {
    fn schema(&self) -> &Arc<Schema> {
        &MARKER
    }

    fn property(&self, name: &str) -> Result<Value, AccessError> {
        match name {
            "string" => Ok(Value::from("X")),
            other => Err(AccessError::Inaccessible {
                name: other.to_string(),
                reason: "accessor is private".into(),
            }),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Same accessors as `Marker`, but `integer` raises.
struct Raising;

impl Decorator for Raising {
    fn schema(&self) -> &Arc<Schema> {
        &MARKER
    }

    fn property(&self, name: &str) -> Result<Value, AccessError> {
        match name {
            "string" => Ok(Value::from("X")),
            other => Err(AccessError::Failed {
                name: other.to_string(),
                reason: "raised".into(),
            }),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn produced(string: &str, integer: Vec<i32>) -> ProducedInstance {
    let proxy = DecoratorProxy::new(Arc::clone(&MARKER)).unwrap();
    proxy.set_property("string", string).unwrap();
    proxy.set_property("integer", integer).unwrap();
    proxy.instance()
}

fn native(string: &str, integer: Vec<i32>) -> Marker {
    Marker {
        string: string.to_string(),
        integer,
    }
}

// ── Equality ─────────────────────────────────────────────────────

#[test]
fn reflexive() {
    let current = produced("X", vec![4]);
    assert!(current.equals(&current).unwrap());
    assert_eq!(current, current.clone());
}

#[test]
fn unmodified_instances_are_equal() {
    let a = DecoratorProxy::new(Arc::clone(&MARKER)).unwrap().instance();
    let b = DecoratorProxy::new(Arc::clone(&MARKER)).unwrap().instance();
    assert_eq!(a, b);
    assert_eq!(a.hash_code(), b.hash_code());
}

#[test]
fn produced_and_native_equal_both_ways() {
    let current = produced("X", vec![4]);
    let expected = native("X", vec![4]);

    assert!(current.equals(&expected).unwrap());
    assert!(contract::equals(&expected, &current).unwrap());
    assert!(expected == native("X", vec![4]));
}

#[test]
fn produced_and_native_differ_on_order() {
    let current = produced("X", vec![4, 5, 6]);
    let expected = native("X", vec![6, 5, 4]);

    assert!(!current.equals(&expected).unwrap());
    assert!(!contract::equals(&expected, &current).unwrap());
}

#[test]
fn produced_instances_populated_in_any_order() {
    let a = DecoratorProxy::new(Arc::clone(&MARKER)).unwrap();
    a.set_property("string", "X").unwrap();
    a.set_property("integer", vec![1, 2]).unwrap();

    let b = DecoratorProxy::new(Arc::clone(&MARKER)).unwrap();
    b.set_property("integer", vec![1, 2]).unwrap();
    b.set_property("string", "X").unwrap();

    assert_eq!(a.instance(), b.instance());
    assert_eq!(b.instance(), a.instance());
    assert_eq!(a.instance().hash_code(), b.instance().hash_code());
}

#[test]
fn produced_and_record_equal() {
    let current = produced("X", vec![4]);
    let record = current.snapshot().unwrap();
    assert!(current.equals(&record).unwrap());
    assert!(contract::equals(&record, &current).unwrap());
}

#[test]
fn different_schema_not_equal() {
    let other = Arc::new(
        Schema::new(
            "com.example.Other",
            MARKER.properties.clone(),
        )
        .unwrap(),
    );
    let a = DecoratorProxy::new(other).unwrap().instance();
    let b = DecoratorProxy::new(Arc::clone(&MARKER)).unwrap().instance();
    assert_ne!(a, b);
    assert!(!a.equals(&b).unwrap());
}

#[test]
fn opposite_comparisons_with_writers_complete() {
    let a = DecoratorProxy::new(Arc::clone(&MARKER)).unwrap();
    let b = DecoratorProxy::new(Arc::clone(&MARKER)).unwrap();

    std::thread::scope(|scope| {
        for round in 0..4 {
            let (left, right) = if round % 2 == 0 { (&a, &b) } else { (&b, &a) };
            scope.spawn(move || {
                for _ in 0..200 {
                    left.instance().equals(&right.instance()).unwrap();
                }
            });
            scope.spawn(move || {
                for i in 0..200 {
                    left.set_property("integer", vec![i]).unwrap();
                }
            });
        }
    });

    a.set_property("integer", vec![1]).unwrap();
    b.set_property("integer", vec![1]).unwrap();
    a.set_property("string", "same").unwrap();
    b.set_property("string", "same").unwrap();
    assert!(a.instance().equals(&b.instance()).unwrap());
}

#[test]
fn raising_accessor_reads_as_not_equal() {
    let current = produced("X", vec![4]);
    assert!(!current.equals(&Raising).unwrap());
}

#[test]
fn inaccessible_accessor_surfaces() {
    let current = produced("X", vec![4]);
    assert!(matches!(
        current.equals(&Sealed),
        Err(Error::InternalInvariantViolation(_))
    ));
}

// ── Hash ─────────────────────────────────────────────────────────

#[test]
fn hash_matches_native() {
    let current = produced("X", vec![4]);
    let expected = native("X", vec![4]);
    assert_eq!(current.hash_code(), contract::hash_code(&expected).unwrap());
}

#[test]
fn hash_is_stable() {
    let current = produced("X", vec![4]);
    let first = current.hash_code();
    for _ in 0..3 {
        assert_eq!(current.hash_code(), first);
    }
}

#[test]
fn hash_follows_assignments() {
    let proxy = DecoratorProxy::new(Arc::clone(&MARKER)).unwrap();
    let instance = proxy.instance();
    let before = instance.hash_code();
    proxy.set_property("integer", vec![4]).unwrap();
    assert_ne!(instance.hash_code(), before);
}

#[test]
fn instances_work_as_set_members() {
    let mut set = HashSet::new();
    set.insert(produced("X", vec![4]));
    set.insert(produced("X", vec![4]));
    set.insert(produced("Y", vec![4]));
    assert_eq!(set.len(), 2);
}

// ── Rendering ────────────────────────────────────────────────────

#[test]
fn to_string_matches_native() {
    let current = produced("X", vec![4]);
    let expected = native("X", vec![4]);
    assert_eq!(current.to_string(), expected.to_string());
    assert_eq!(current.to_string(), "@com.example.Marker(string=X, integer=[4])");
}

#[test]
fn to_string_uses_declaration_order() {
    let proxy = DecoratorProxy::new(Arc::clone(&MARKER)).unwrap();
    proxy.set_property("integer", vec![7]).unwrap();
    proxy.set_property("string", "late").unwrap();
    assert_eq!(
        proxy.instance().to_string(),
        "@com.example.Marker(string=late, integer=[7])"
    );
}

#[test]
fn empty_schema_renders_empty_parens() {
    let schema = Arc::new(Schema::new("com.example.Flag", vec![]).unwrap());
    let instance = DecoratorProxy::new(schema).unwrap().instance();
    assert_eq!(instance.to_string(), "@com.example.Flag()");
    assert_eq!(instance.hash_code(), 0);
}

// ── Nesting ──────────────────────────────────────────────────────

#[test]
fn native_can_be_nested() {
    let outer = Arc::new(
        Schema::new(
            "com.example.Outer",
            vec![PropertyDeclaration::sequence(
                "markers",
                ElementType::Decorator(Arc::clone(&MARKER)),
            )],
        )
        .unwrap(),
    );
    let proxy = DecoratorProxy::new(outer).unwrap();
    let first = DecoratorRecord::capture(&native("a", vec![1])).unwrap();
    let second = produced("b", vec![2]).snapshot().unwrap();
    proxy
        .set_property("markers", vec![Value::from(first), Value::from(second)])
        .unwrap();

    assert_eq!(
        proxy.instance().to_string(),
        "@com.example.Outer(markers=[@com.example.Marker(string=a, integer=[1]), \
         @com.example.Marker(string=b, integer=[2])])"
    );
}
