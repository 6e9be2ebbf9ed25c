//! `#[derive(Typed)]` shapes and attributes, observed through the engine.

use std::collections::BTreeMap;

use vc_json::config::FamilyMapping;
use vc_json::derive::Typed;
use vc_json::{ErrorKind, Json, JsonConfig, JsonValue, Strategy, TypeDescriptor};

fn parse(text: &str) -> JsonValue {
    serde_json::from_str(text).unwrap()
}

fn strategy_of<T: vc_json::Typed>(json: &Json) -> Strategy {
    json.resolve(&TypeDescriptor::of::<T>()).unwrap().strategy()
}

// -----------------------------------------------------------------------------
// Field attributes

fn default_region() -> String {
    String::from("eu")
}

#[derive(Typed, Debug, PartialEq)]
struct Account {
    #[json(rename = "userName")]
    user_name: String,
    #[json(ignore)]
    session: Option<u64>,
    #[json(default)]
    retries: u8,
    #[json(default = default_region)]
    region: String,
    #[json(include_null)]
    email: Option<String>,
}

#[test]
fn field_attributes_shape_the_wire_form() {
    let json = Json::default();
    let account: Account = json.decode(&parse(r#"{"userName":"kim","session":5}"#)).unwrap();
    assert_eq!(
        account,
        Account {
            user_name: String::from("kim"),
            session: None,
            retries: 0,
            region: String::from("eu"),
            email: None,
        }
    );
    assert_eq!(
        json.encode_to_string(&account).unwrap(),
        r#"{"userName":"kim","retries":0,"region":"eu","email":null}"#
    );

    let err = json.decode::<Account>(&parse(r#"{"user_name":"kim"}"#)).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnknownProperty { .. }));
}

struct Alias(&'static str);

impl Alias {
    fn name(&self) -> &str {
        self.0
    }
}

#[derive(Typed, Debug, PartialEq)]
struct Row {
    #[json(@Alias("row_id"))]
    id: u32,
    label: String,
}

#[test]
fn custom_annotations_are_recognized_by_configuration() {
    let row = Row {
        id: 1,
        label: String::from("first"),
    };
    assert_eq!(Json::default().encode_to_string(&row).unwrap(), r#"{"id":1,"label":"first"}"#);

    let mut config = JsonConfig::default();
    config.recognize_rename::<Alias>(Alias::name);
    let json = Json::new(config);
    assert_eq!(json.encode_to_string(&row).unwrap(), r#"{"row_id":1,"label":"first"}"#);
    assert_eq!(json.decode::<Row>(&parse(r#"{"row_id":1,"label":"first"}"#)).unwrap(), row);
}

// -----------------------------------------------------------------------------
// Type attributes

#[derive(Typed, Debug, PartialEq)]
#[json(allow_extra)]
struct Lenient {
    a: u8,
    b: u8,
}

#[derive(Typed, Debug, PartialEq)]
#[json(include_all)]
struct Sparse {
    a: Option<u8>,
    b: Option<u8>,
}

#[test]
fn type_policies() {
    let json = Json::default();
    let lenient: Lenient = json.decode(&parse(r#"{"a":1,"b":2,"c":3}"#)).unwrap();
    assert_eq!(lenient, Lenient { a: 1, b: 2 });

    let sparse = Sparse { a: None, b: Some(2) };
    assert_eq!(json.encode_to_string(&sparse).unwrap(), r#"{"a":null,"b":2}"#);
}

#[derive(Typed, Debug, PartialEq)]
#[json(opaque, factory(String, Version::parse), to_json = Version::render)]
struct Version {
    major: u32,
    minor: u32,
}

impl Version {
    fn parse(value: &JsonValue) -> Result<Self, String> {
        let text = value.as_str().ok_or_else(|| String::from("expected text"))?;
        let (major, minor) = text
            .split_once('.')
            .ok_or_else(|| format!("`{text}` is not `major.minor`"))?;
        let number = |part: &str| part.parse::<u32>().map_err(|err| err.to_string());
        Ok(Self {
            major: number(major)?,
            minor: number(minor)?,
        })
    }

    fn render(&self) -> JsonValue {
        JsonValue::from(format!("{}.{}", self.major, self.minor))
    }
}

#[test]
fn factories_and_to_json() {
    let json = Json::default();
    let codec = json.resolve(&TypeDescriptor::of::<Version>()).unwrap();
    assert_eq!(codec.strategy(), Strategy::Factory);
    assert_eq!(codec.encode_strategy(), Strategy::ToJson);

    let version: Version = json.decode(&JsonValue::from("1.12")).unwrap();
    assert_eq!(version, Version { major: 1, minor: 12 });
    assert_eq!(json.encode(&version).unwrap(), JsonValue::from("1.12"));

    let err = json.decode::<Version>(&JsonValue::from("one")).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DecodeMismatch { .. }));
    let err = json.decode::<Version>(&JsonValue::from(12)).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DecodeMismatch { .. }));
}

#[derive(Typed, Debug, PartialEq)]
#[json(constructor(Window::square, "side"))]
struct Window {
    width: u32,
    height: u32,
    #[json(default)]
    side: u32,
}

impl Window {
    fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
            side,
        }
    }
}

#[test]
fn declared_constructors_are_tried_in_order() {
    let json = Json::default();
    let window: Window = json.decode(&parse(r#"{"width":2,"height":3}"#)).unwrap();
    assert_eq!(
        window,
        Window {
            width: 2,
            height: 3,
            side: 0,
        }
    );

    let square: Window = json.decode(&parse(r#"{"side":4}"#)).unwrap();
    assert_eq!(square, Window::square(4));

    let scalar: Window = json.decode(&JsonValue::from(7)).unwrap();
    assert_eq!(scalar, Window::square(7));
}

#[derive(Typed, Debug, PartialEq)]
#[json(constructor(Interval::around, "center", "radius"))]
struct Interval {
    low: i32,
    high: i32,
    center: i32,
    radius: i32,
}

impl Interval {
    fn around(center: i32, radius: i32) -> Self {
        Self {
            low: center - radius,
            high: center + radius,
            center,
            radius,
        }
    }
}

#[test]
fn no_satisfiable_constructor_is_a_mismatch() {
    let json = Json::default();
    let around: Interval = json.decode(&parse(r#"{"center":5,"radius":2}"#)).unwrap();
    assert_eq!(around, Interval::around(5, 2));

    let err = json.decode::<Interval>(&parse(r#"{"low":1,"center":5}"#)).unwrap_err();
    let ErrorKind::DecodeMismatch { reason, .. } = err.kind() else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(reason, "no constructor matches the properties: low, center");
}

#[derive(Typed, Debug, PartialEq)]
#[json(delegate)]
struct Headers {
    entries: BTreeMap<String, String>,
}

#[test]
fn delegating_types_are_written_as_their_content() {
    let json = Json::default();
    assert_eq!(strategy_of::<Headers>(&json), Strategy::Delegating);

    let headers: Headers = json.decode(&parse(r#"{"accept":"*/*"}"#)).unwrap();
    assert_eq!(headers.entries.get("accept").map(String::as_str), Some("*/*"));
    assert_eq!(json.encode_to_string(&headers).unwrap(), r#"{"accept":"*/*"}"#);
}

// -----------------------------------------------------------------------------
// Shapes

#[derive(Typed, Debug, PartialEq)]
struct UserId(u64);

#[derive(Typed, Debug, PartialEq)]
struct Span(u32, u32);

#[derive(Typed, Debug, PartialEq)]
struct Marker;

#[test]
fn tuple_and_unit_structs() {
    let json = Json::default();

    assert_eq!(strategy_of::<UserId>(&json), Strategy::SingleArgConstructor);
    assert_eq!(json.encode_to_string(&UserId(7)).unwrap(), "7");
    assert_eq!(json.decode::<UserId>(&JsonValue::from(7)).unwrap(), UserId(7));

    assert_eq!(json.encode_to_string(&Span(1, 2)).unwrap(), r#"{"0":1,"1":2}"#);
    assert_eq!(json.decode::<Span>(&parse(r#"{"0":1,"1":2}"#)).unwrap(), Span(1, 2));

    assert_eq!(strategy_of::<Marker>(&json), Strategy::Singleton);
    assert_eq!(json.encode_to_string(&Marker).unwrap(), "{}");
    assert_eq!(json.decode::<Marker>(&parse("{}")).unwrap(), Marker);
    let err = json.decode::<Marker>(&parse(r#"{"a":1}"#)).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnknownProperty { .. }));
}

#[derive(Typed, Debug, PartialEq)]
enum Color {
    Red,
    #[json(rename = "green")]
    Green,
}

#[test]
fn unit_enums_are_written_as_names() {
    let json = Json::default();
    assert_eq!(strategy_of::<Color>(&json), Strategy::Enum);
    assert_eq!(json.encode(&Color::Green).unwrap(), JsonValue::from("green"));
    assert_eq!(json.decode::<Color>(&JsonValue::from("Red")).unwrap(), Color::Red);

    let err = json.decode::<Color>(&JsonValue::from("Green")).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DecodeMismatch { .. }));
}

#[derive(Typed, Debug, PartialEq)]
struct Circle {
    radius: u32,
}

#[derive(Typed, Debug, PartialEq)]
struct Square {
    side: u32,
}

#[derive(Typed, Debug, PartialEq)]
enum Shape {
    #[json(rename = "circle")]
    Circle(Circle),
    Square(Square),
}

#[test]
fn family_tags_and_discriminators() {
    let json = Json::default();
    assert_eq!(
        json.encode_to_string(&Shape::Circle(Circle { radius: 1 })).unwrap(),
        r#"{"class":"circle","radius":1}"#
    );

    let mut config = JsonConfig::default();
    config.set_discriminator("kind");
    let json = Json::new(config);
    let shape: Shape = json.decode(&parse(r#"{"kind":"Square","side":2}"#)).unwrap();
    assert_eq!(shape, Shape::Square(Square { side: 2 }));
}

#[test]
fn registered_family_mapping_replaces_derived_tags() {
    let mut config = JsonConfig::default();
    config.register_family::<Shape>(FamilyMapping::new().property("type").variant::<Circle>("round"));
    let json = Json::new(config);

    let shape: Shape = json.decode(&parse(r#"{"type":"round","radius":3}"#)).unwrap();
    assert_eq!(shape, Shape::Circle(Circle { radius: 3 }));

    let err = json.decode::<Shape>(&parse(r#"{"type":"Square","side":3}"#)).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnknownDiscriminatorValue { .. }));

    let err = json.encode(&Shape::Square(Square { side: 1 })).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Unencodable { .. }));
}

// -----------------------------------------------------------------------------
// Generics

#[derive(Typed, Debug, PartialEq)]
struct Page<T> {
    items: Vec<T>,
    first: Option<T>,
    total: T,
}

#[test]
fn generic_fields_follow_the_instantiation() {
    let json = Json::default();

    let numbers: Page<u32> = json.decode(&parse(r#"{"items":[1,2],"first":1,"total":2}"#)).unwrap();
    assert_eq!(
        numbers,
        Page {
            items: vec![1, 2],
            first: Some(1),
            total: 2,
        }
    );

    let words = Page {
        items: vec![String::from("a")],
        first: None,
        total: String::from("one"),
    };
    let encoded = json.encode(&words).unwrap();
    assert_eq!(encoded.to_json_string(), r#"{"items":["a"],"total":"one"}"#);
    assert_eq!(json.decode::<Page<String>>(&encoded).unwrap(), words);

    let err = json.decode::<Page<u32>>(&parse(r#"{"items":[],"total":"x"}"#)).unwrap_err();
    assert_eq!(err.path().to_string(), "/total");
}
