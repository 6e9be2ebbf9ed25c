//! End-to-end behavior of the engine over derived and built-in types.

use std::any::Any;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::convert::Infallible;
use std::fmt::Debug;
use std::rc::Rc;
use std::sync::Arc;

use vc_json::__macro_exports::{boxed, downcast_ref, next_arg, unbox};
use vc_json::config::FamilyMapping;
use vc_json::error::BoxError;
use vc_json::derive::Typed;
use vc_json::info::{ConstructorInfo, FieldInfo, ForeignConstruction, ForeignInfo, NonGenericTypeInfoCell};
use vc_json::info::{ParamInfo, TypeInfo, TypeRef};
use vc_json::{Decimal, ErrorKind, Json, JsonConfig, JsonObject, JsonPath, JsonValue, Strategy, TypeDescriptor, Typed};

fn parse(text: &str) -> JsonValue {
    serde_json::from_str(text).unwrap()
}

fn round_trip<T: Typed + PartialEq + Debug>(json: &Json, value: T) {
    let encoded = json.encode(&value).unwrap();
    let decoded: T = json.decode(&encoded).unwrap();
    assert_eq!(decoded, value, "through {encoded}");
}

// -----------------------------------------------------------------------------
// Round trips

#[derive(Typed, Debug, PartialEq)]
struct Inventory {
    owner: String,
    counts: BTreeMap<String, u32>,
    by_id: BTreeMap<i64, String>,
    tags: BTreeSet<String>,
    slots: [Option<u8>; 3],
    pair: (u16, String),
    history: VecDeque<f64>,
    note: Option<String>,
}

#[test]
fn scalars_round_trip() {
    let json = Json::default();
    round_trip(&json, u64::MAX);
    round_trip(&json, i64::MIN);
    round_trip(&json, i128::MAX);
    round_trip(&json, 0_u8);
    round_trip(&json, -1.5_f64);
    round_trip(&json, true);
    round_trip(&json, 'λ');
    round_trip(&json, String::from("line\nbreak \"quoted\""));
}

#[test]
fn containers_round_trip() {
    let json = Json::default();
    round_trip(&json, Vec::<u64>::new());
    round_trip(&json, vec![Some(1_i32), None, Some(i32::MIN)]);
    round_trip(&json, BTreeSet::from([3_u16, 1, 2]));
    round_trip(&json, BTreeMap::from([(7_i32, String::from("seven")), (-1, String::from("minus"))]));
    round_trip(&json, (1_u8, String::from("two"), false));
    round_trip(&json, Box::new(42_u32));
    round_trip(&json, Rc::new(String::from("shared")));
    round_trip(&json, Arc::new(vec![u64::MAX]));
    round_trip(&json, Option::<String>::None);
}

#[test]
fn records_round_trip() {
    let json = Json::default();
    round_trip(
        &json,
        Inventory {
            owner: String::from("ada"),
            counts: BTreeMap::from([(String::from("bolts"), 12)]),
            by_id: BTreeMap::from([(i64::MIN, String::from("first"))]),
            tags: BTreeSet::from([String::from("a"), String::from("b")]),
            slots: [Some(1), None, Some(u8::MAX)],
            pair: (9, String::from("nine")),
            history: VecDeque::from([0.5, -2.25]),
            note: None,
        },
    );
}

#[test]
fn null_in_nullable_positions() {
    let json = Json::default();
    let decoded: Vec<Option<String>> = json.decode(&parse(r#"["a", null]"#)).unwrap();
    assert_eq!(decoded, [Some(String::from("a")), None]);
    assert_eq!(json.encode_to_string(&decoded).unwrap(), r#"["a",null]"#);

    let err = json.decode::<Vec<String>>(&parse(r#"["a", null]"#)).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DecodeMismatch { .. }));
    assert_eq!(err.path().to_string(), "/1");
}

#[test]
fn huge_exponents_do_not_fit_integers() {
    let json = Json::default();
    let huge = JsonValue::Decimal("1e9223372036854775807".parse().unwrap());
    let err = json.decode::<u8>(&huge).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DecodeMismatch { .. }));
    assert!(json.decode::<i128>(&huge).is_err());
}

#[test]
fn map_keys_use_their_text() {
    let json = Json::default();
    let map = BTreeMap::from([(2_i32, true), (10, false)]);
    assert_eq!(json.encode_to_string(&map).unwrap(), r#"{"2":true,"10":false}"#);
}

// -----------------------------------------------------------------------------
// Resolution

#[test]
fn resolution_hits_the_cache() {
    let json = Json::default();
    let descriptor = TypeDescriptor::of::<Inventory>();
    let first = json.resolve(&descriptor).unwrap();
    let second = json.resolve(&descriptor).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.strategy(), Strategy::Object);
}

#[test]
fn explicit_mapping_beats_container_rule() {
    let mut config = JsonConfig::default();
    config.register_decoder(|value: &JsonValue| -> Result<Vec<u8>, String> {
        value
            .as_str()
            .map(|text| text.bytes().collect())
            .ok_or_else(|| String::from("expected text"))
    });
    let json = Json::new(config);

    let codec = json.resolve(&TypeDescriptor::of::<Vec<u8>>()).unwrap();
    assert_eq!(codec.strategy(), Strategy::Mapping);
    assert_eq!(json.decode::<Vec<u8>>(&JsonValue::from("ab")).unwrap(), [b'a', b'b']);

    let err = json.decode::<Vec<u8>>(&parse("[1]")).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::CustomMappingFailure { .. }));
}

#[derive(Typed, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
    label: Option<String>,
}

#[test]
fn every_missing_property_is_listed() {
    let err = Json::default().decode::<Point>(&parse(r#"{"label":"origin"}"#)).unwrap_err();
    let ErrorKind::MissingRequiredProperty { properties, .. } = err.kind() else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(properties, &["x", "y"]);
}

#[derive(Typed, Debug, PartialEq)]
struct Department {
    name: String,
    head: Option<Box<Employee>>,
}

#[derive(Typed, Debug, PartialEq)]
struct Employee {
    name: String,
    department: Option<Box<Department>>,
}

#[test]
fn cyclic_type_graphs_resolve() {
    let json = Json::default();
    json.resolve(&TypeDescriptor::of::<Department>()).unwrap();
    json.resolve(&TypeDescriptor::of::<Employee>()).unwrap();

    round_trip(
        &json,
        Department {
            name: String::from("research"),
            head: Some(Box::new(Employee {
                name: String::from("grace"),
                department: Some(Box::new(Department {
                    name: String::from("compilers"),
                    head: None,
                })),
            })),
        },
    );
}

// -----------------------------------------------------------------------------
// Polymorphism

#[derive(Typed, Debug, PartialEq)]
struct Const {
    number: f64,
}

#[derive(Typed, Debug, PartialEq)]
struct Add {
    left: Box<Expr>,
    right: Box<Expr>,
}

#[derive(Typed, Debug, PartialEq)]
enum Expr {
    Const(Const),
    Add(Add),
}

#[test]
fn families_dispatch_on_the_discriminator() {
    let json = Json::default();
    let decoded: Expr = json.decode(&parse(r#"{"class":"Const","number":2.0}"#)).unwrap();
    assert_eq!(decoded, Expr::Const(Const { number: 2.0 }));

    let err = json.decode::<Expr>(&parse(r#"{"class":"Bogus"}"#)).unwrap_err();
    let ErrorKind::UnknownDiscriminatorValue { value, known, .. } = err.kind() else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(value, "Bogus");
    assert_eq!(known, &["Const", "Add"]);
}

#[test]
fn families_write_the_discriminator_first() {
    let json = Json::default();
    let expr = Expr::Add(Add {
        left: Box::new(Expr::Const(Const { number: 1.0 })),
        right: Box::new(Expr::Const(Const { number: -3.5 })),
    });
    let encoded = json.encode(&expr).unwrap();
    let object = encoded.as_object().unwrap();
    assert_eq!(object.keys().next(), Some("class"));
    assert_eq!(object.get("class"), Some(&JsonValue::from("Add")));
    round_trip(&json, expr);
}

#[test]
fn missing_discriminator_is_reported() {
    let err = Json::default().decode::<Expr>(&parse(r#"{"number":1}"#)).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MissingRequiredProperty { .. }));
}

#[test]
fn document_path_discriminators() {
    let mut config = JsonConfig::default();
    config.register_family::<Block>(
        FamilyMapping::new()
            .path(JsonPath::parse("/meta/kind").unwrap())
            .variant::<Text>("text")
            .variant::<Image>("image"),
    );
    let json = Json::new(config);

    let block: Block = json.decode(&parse(r#"{"meta":{"kind":"image"},"url":"a.png"}"#)).unwrap();
    assert_eq!(
        block,
        Block::Image(Image {
            meta: Meta { kind: String::from("image") },
            url: String::from("a.png"),
        })
    );

    let err = json.decode::<Block>(&parse(r#"{"meta":{"kind":"video"},"url":"a.mp4"}"#)).unwrap_err();
    let ErrorKind::UnknownDiscriminatorValue { value, known, .. } = err.kind() else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(value, "video");
    assert_eq!(known, &["text", "image"]);

    let text = Block::Text(Text {
        meta: Meta { kind: String::from("text") },
        body: String::from("hi"),
    });
    assert_eq!(json.encode_to_string(&text).unwrap(), r#"{"meta":{"kind":"text"},"body":"hi"}"#);
    round_trip(&json, text);
}

#[derive(Typed, Debug, PartialEq)]
struct Meta {
    kind: String,
}

#[derive(Typed, Debug, PartialEq)]
struct Text {
    meta: Meta,
    body: String,
}

#[derive(Typed, Debug, PartialEq)]
struct Image {
    meta: Meta,
    url: String,
}

#[derive(Typed, Debug, PartialEq)]
enum Block {
    Text(Text),
    Image(Image),
}

// -----------------------------------------------------------------------------
// Encode mappings

#[test]
fn variant_mapping_beats_family_mapping() {
    let mut config = JsonConfig::default();
    config
        .register_encoder(|_: &Expr| Ok::<_, Infallible>(JsonValue::from("expr")))
        .register_encoder(|value: &Const| Ok::<_, Infallible>(JsonValue::from(format!("const {}", value.number))));
    let json = Json::new(config);

    let constant = Expr::Const(Const { number: 2.5 });
    assert_eq!(json.encode(&constant).unwrap(), JsonValue::from("const 2.5"));

    let sum = Expr::Add(Add {
        left: Box::new(Expr::Const(Const { number: 1.0 })),
        right: Box::new(Expr::Const(Const { number: 2.0 })),
    });
    assert_eq!(json.encode(&sum).unwrap(), JsonValue::from("expr"));

    let codec = json.resolve(&TypeDescriptor::of::<Expr>()).unwrap();
    assert_eq!(codec.encode_strategy(), Strategy::Family);
}

#[test]
fn variant_mapping_to_an_object_keeps_the_tag() {
    let mut config = JsonConfig::default();
    config.register_encoder(|value: &Const| -> Result<JsonValue, BoxError> {
        let mut object = JsonObject::new();
        object.insert(String::from("n"), JsonValue::from(value.number.to_string()))?;
        Ok(JsonValue::Object(object))
    });
    let json = Json::new(config);
    assert_eq!(
        json.encode_to_string(&Expr::Const(Const { number: 4.0 })).unwrap(),
        r#"{"class":"Const","n":"4"}"#
    );
}

#[test]
fn inner_mapping_beats_option_mapping() {
    let mut config = JsonConfig::default();
    config
        .register_encoder(|_: &Option<u32>| Ok::<_, Infallible>(JsonValue::from("opt")))
        .register_encoder(|_: &u32| Ok::<_, Infallible>(JsonValue::from("u32")));
    let json = Json::new(config);

    assert_eq!(json.encode(&Some(3_u32)).unwrap(), JsonValue::from("u32"));
    assert_eq!(json.encode(&None::<u32>).unwrap(), JsonValue::from("opt"));
}

#[test]
fn option_mapping_applies_without_inner_mapping() {
    let mut config = JsonConfig::default();
    config.register_encoder(|value: &Option<u32>| {
        Ok::<_, Infallible>(value.map_or(JsonValue::from("none"), |v| JsonValue::from(format!("#{v}"))))
    });
    let json = Json::new(config);

    assert_eq!(json.encode(&Some(3_u32)).unwrap(), JsonValue::from("#3"));
    assert_eq!(json.encode(&None::<u32>).unwrap(), JsonValue::from("none"));
    assert_eq!(json.encode(&3_u32).unwrap(), JsonValue::from(3));
}

// -----------------------------------------------------------------------------
// Policies

#[derive(Typed, Debug, PartialEq)]
struct Greeting {
    field1: String,
    field2: i32,
}

#[test]
fn extra_properties_follow_the_policy() {
    let input = parse(r#"{"field1":"Hello","field2":123,"extra":"x"}"#);

    let err = Json::default().decode::<Greeting>(&input).unwrap_err();
    let ErrorKind::UnknownProperty { properties, .. } = err.kind() else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(properties, &["extra"]);

    let mut config = JsonConfig::default();
    config.set_allow_extra(true);
    let decoded: Greeting = Json::new(config).decode(&input).unwrap();
    assert_eq!(
        decoded,
        Greeting {
            field1: String::from("Hello"),
            field2: 123,
        }
    );
}

#[test]
fn global_include_nulls() {
    let point = Point { x: 1, y: 2, label: None };
    assert_eq!(Json::default().encode_to_string(&point).unwrap(), r#"{"x":1,"y":2}"#);

    let mut config = JsonConfig::default();
    config.set_include_nulls(true);
    let json = Json::new(config);
    assert_eq!(json.encode_to_string(&point).unwrap(), r#"{"x":1,"y":2,"label":null}"#);
    round_trip(&json, point);
}

#[derive(Typed, Debug, PartialEq)]
struct Ledger {
    total: u128,
    rate: Decimal,
    count: u64,
}

#[test]
fn big_numbers_as_strings() {
    let ledger = Ledger {
        total: u128::MAX,
        rate: "0.125".parse().unwrap(),
        count: 7,
    };
    assert_eq!(
        Json::default().encode_to_string(&ledger).unwrap(),
        r#"{"total":340282366920938463463374607431768211455,"rate":0.125,"count":7}"#
    );

    let mut config = JsonConfig::default();
    config.set_big_numbers_as_strings(true);
    let json = Json::new(config);
    assert_eq!(
        json.encode_to_string(&ledger).unwrap(),
        r#"{"total":"340282366920938463463374607431768211455","rate":"0.125","count":7}"#
    );
    round_trip(&json, ledger);
}

#[test]
fn sets_reject_duplicates() {
    let err = Json::default()
        .decode::<BTreeSet<String>>(&parse(r#"["abc","def","abc"]"#))
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DuplicateSetElement { index: 2, .. }));
    assert_eq!(err.path().to_string(), "/2");
}

// -----------------------------------------------------------------------------
// Object graphs

#[derive(Typed)]
struct Link {
    id: u32,
    next: Option<Rc<RefCell<Link>>>,
}

#[test]
fn self_reference_is_circular() {
    let link = Rc::new(RefCell::new(Link { id: 1, next: None }));
    link.borrow_mut().next = Some(Rc::clone(&link));

    let err = Json::default().encode(&link).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::CircularReference { .. }));

    link.borrow_mut().next = None;
}

#[test]
fn longer_cycles_are_circular() {
    let first = Rc::new(RefCell::new(Link { id: 1, next: None }));
    let second = Rc::new(RefCell::new(Link {
        id: 2,
        next: Some(Rc::clone(&first)),
    }));
    first.borrow_mut().next = Some(Rc::clone(&second));

    let err = Json::default().encode(&first).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::CircularReference { .. }));

    first.borrow_mut().next = None;
}

#[test]
fn shared_but_acyclic_graphs_encode() {
    let shared = Rc::new(RefCell::new(Link { id: 9, next: None }));
    let pair = vec![Rc::clone(&shared), shared];
    let encoded = Json::default().encode_to_string(&pair).unwrap();
    assert_eq!(encoded, r#"[{"id":9},{"id":9}]"#);
}

// -----------------------------------------------------------------------------
// Foreign types

#[derive(Debug)]
struct Celsius(f64);

impl Typed for Celsius {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::Foreign(ForeignInfo::new::<Self>(
                &[],
                ForeignConstruction::Wrapper {
                    param: TypeRef::of::<f64>(),
                    build: |arg| unbox::<f64>(arg).map(|degrees| boxed(Celsius(degrees))),
                    unwrap: |value| downcast_ref::<Celsius>(value).map(|c| &c.0 as &dyn Any),
                },
            ))
        })
    }
}

#[test]
fn foreign_wrappers_are_written_as_their_value() {
    let json = Json::default();
    assert_eq!(strategy(&json, TypeDescriptor::of::<Celsius>()), Strategy::Foreign);
    assert_eq!(json.encode_to_string(&Celsius(21.5)).unwrap(), "21.5");

    let decoded: Celsius = json.decode(&parse("-3.25")).unwrap();
    assert_eq!(decoded.0, -3.25);
    let err = json.decode::<Celsius>(&parse(r#""warm""#)).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DecodeMismatch { .. }));
}

#[derive(Debug, PartialEq)]
struct Endpoint {
    host: String,
    port: u16,
}

impl Typed for Endpoint {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            let host = FieldInfo::new("host", TypeRef::of::<String>(), |value| {
                downcast_ref::<Endpoint>(value).map(|e| &e.host as &dyn Any)
            });
            let port = FieldInfo::new("port", TypeRef::of::<u16>(), |value| {
                downcast_ref::<Endpoint>(value).map(|e| &e.port as &dyn Any)
            });
            let params = [
                ParamInfo::new("host", TypeRef::of::<String>()),
                ParamInfo::new("port", TypeRef::of::<u16>()).with_default(|| boxed(80_u16)),
            ];
            let constructor = ConstructorInfo::new(&params, |args| {
                let mut args = args.into_iter();
                Ok(boxed(Endpoint {
                    host: next_arg(&mut args)?,
                    port: next_arg(&mut args)?,
                }))
            });
            TypeInfo::Foreign(ForeignInfo::new::<Self>(
                &[host, port],
                ForeignConstruction::Constructor(constructor),
            ))
        })
    }
}

#[test]
fn foreign_constructors_take_named_parameters() {
    let json = Json::default();
    assert_eq!(strategy(&json, TypeDescriptor::of::<Endpoint>()), Strategy::Foreign);

    let endpoint: Endpoint = json.decode(&parse(r#"{"host":"example.org"}"#)).unwrap();
    assert_eq!(
        endpoint,
        Endpoint {
            host: String::from("example.org"),
            port: 80,
        }
    );
    assert_eq!(json.encode_to_string(&endpoint).unwrap(), r#"{"host":"example.org","port":80}"#);
    round_trip(&json, Endpoint { host: String::from("localhost"), port: 8080 });

    let err = json.decode::<Endpoint>(&parse(r#"{"port":1}"#)).unwrap_err();
    let ErrorKind::MissingRequiredProperty { properties, .. } = err.kind() else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(properties, &["host"]);
}

fn strategy(json: &Json, descriptor: TypeDescriptor) -> Strategy {
    json.resolve(&descriptor).unwrap().strategy()
}
