//! End-to-end scenarios for the flag-and-identity policy variant.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use palisade_colors::{Color, ColorsModule};
use palisade_gate::{configure, RestrictionModule, RestrictionPolicy, TypeRestrictions};
use palisade_mapper::{
    Field, JsonShaped, MapError, Mapper, PropertyMeta, Shape, TypeToken,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn gated(policy: TypeRestrictions) -> Mapper {
    init_tracing();
    configure(Mapper::builder(), policy).build()
}

fn assert_denied(err: MapError, type_name: &str) {
    assert!(err.is_not_permitted(), "expected denial, got {err:?}");
    assert!(
        err.to_string().contains(type_name),
        "denial does not name {type_name}: {err}"
    );
}

#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
struct Vehicle {
    name: String,
    wheels: i32,
}

impl JsonShaped for Vehicle {
    fn shape() -> Shape {
        Shape::structure(
            TypeToken::of::<Vehicle>("Vehicle"),
            vec![
                Field::new("name", Shape::of::<String>())
                    .with_meta(PropertyMeta::named("name").required(true)),
                Field::new("wheels", Shape::of::<i32>())
                    .with_meta(PropertyMeta::named("wheels").required(true)),
            ],
        )
    }
}

#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
struct Credentials {
    user: String,
    secret: Option<String>,
}

impl JsonShaped for Credentials {
    fn shape() -> Shape {
        Shape::structure(
            TypeToken::of::<Credentials>("Credentials"),
            vec![
                Field::new("user", Shape::of::<String>())
                    .with_meta(PropertyMeta::named("user").required(true)),
                // No metadata: never mapped under explicit introspection.
                Field::new("secret", Shape::of::<Option<String>>()),
            ],
        )
    }
}

#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
enum Fuel {
    Petrol,
    Electric,
}

impl JsonShaped for Fuel {
    fn shape() -> Shape {
        Shape::enumeration(TypeToken::of::<Fuel>("Fuel"), &["Petrol", "Electric"])
    }
}

#[test]
fn reject_all() {
    let mapper = gated(TypeRestrictions::builder().build());

    assert_denied(mapper.read_value::<i32>("1").unwrap_err(), "i32");
    assert_denied(mapper.write_value(&1i32).unwrap_err(), "i32");
}

#[test]
fn permit_int() {
    let mapper = gated(TypeRestrictions::builder().permit::<i32>().build());

    assert_eq!(mapper.read_value::<i32>("1").unwrap(), 1);
    assert_eq!(mapper.write_value(&1i32).unwrap(), "1");

    assert_denied(mapper.read_value::<i64>("1").unwrap_err(), "i64");
    assert_denied(mapper.write_value(&1i64).unwrap_err(), "i64");
}

#[test]
fn permit_set_int() {
    let mapper = gated(
        TypeRestrictions::builder()
            .permit_sets(true)
            .permit::<i32>()
            .build(),
    );

    let set: HashSet<i32> = mapper.read_value("[1]").unwrap();
    assert_eq!(set, HashSet::from([1]));
    assert_eq!(mapper.write_value(&set).unwrap(), "[1]");

    // The category is open but the element identity is not.
    assert_denied(mapper.read_value::<HashSet<i64>>("[1]").unwrap_err(), "i64");
    assert_denied(
        mapper.write_value(&HashSet::from([1i64])).unwrap_err(),
        "i64",
    );
}

#[test]
fn permit_list_int() {
    let mapper = gated(
        TypeRestrictions::builder()
            .permit_lists(true)
            .permit::<i32>()
            .build(),
    );

    assert_eq!(mapper.read_value::<Vec<i32>>("[1]").unwrap(), vec![1]);
    assert_eq!(mapper.write_value(&vec![1i32]).unwrap(), "[1]");

    assert_denied(mapper.read_value::<Vec<i64>>("[1]").unwrap_err(), "i64");
    // Sets were not opened.
    assert_denied(
        mapper.read_value::<HashSet<i32>>("[1]").unwrap_err(),
        "Set<i32>",
    );
}

#[test]
fn permit_optional_int() {
    let mapper = gated(
        TypeRestrictions::builder()
            .permit_optionals(true)
            .permit::<i32>()
            .build(),
    );

    assert_eq!(mapper.read_value::<Option<i32>>("1").unwrap(), Some(1));
    assert_eq!(mapper.read_value::<Option<i32>>("null").unwrap(), None);
    assert_eq!(mapper.write_value(&Some(1i32)).unwrap(), "1");

    assert_denied(mapper.read_value::<Option<i64>>("1").unwrap_err(), "i64");
    assert_denied(mapper.write_value(&Some(1i64)).unwrap_err(), "i64");
}

#[test]
fn permit_map() {
    let mapper = gated(
        TypeRestrictions::builder()
            .permit_maps(true)
            .permit::<String>()
            .permit::<i32>()
            .build(),
    );

    let map: BTreeMap<String, String> = mapper
        .read_value("{\"23\":\"x\",\"24\":\"y\"}")
        .unwrap();
    assert_eq!(map.get("23").map(String::as_str), Some("x"));

    let counts = BTreeMap::from([("x".to_string(), 1i32)]);
    assert_eq!(mapper.write_value(&counts).unwrap(), "{\"x\":1}");

    assert_denied(
        mapper
            .read_value::<BTreeMap<String, i64>>("{\"23\":23}")
            .unwrap_err(),
        "i64",
    );
    assert_denied(
        mapper
            .write_value(&BTreeMap::from([("x".to_string(), 1i64)]))
            .unwrap_err(),
        "i64",
    );
}

#[test]
fn map_keys_are_checked_independently() {
    // String values are permitted, String keys are not.
    let mapper = gated(
        TypeRestrictions::builder()
            .permit_maps(true)
            .permit::<i32>()
            .build(),
    );

    let map: BTreeMap<i32, i32> = mapper.read_value("{\"1\":2}").unwrap();
    assert_eq!(map.get(&1), Some(&2));

    assert_denied(
        mapper
            .read_value::<BTreeMap<String, i32>>("{\"a\":1}")
            .unwrap_err(),
        "String",
    );
    assert_denied(
        mapper
            .write_value(&BTreeMap::from([("a".to_string(), 1i32)]))
            .unwrap_err(),
        "String",
    );
}

#[test]
fn denial_is_observed_at_first_use() {
    let mapper = gated(TypeRestrictions::builder().permit_lists(true).build());

    // Mapper construction succeeded and empty input never invokes the
    // element sentinel.
    assert_eq!(mapper.read_value::<Vec<i64>>("[]").unwrap(), Vec::<i64>::new());
    assert_denied(mapper.read_value::<Vec<i64>>("[1]").unwrap_err(), "i64");
    // Denial is permanent, not poisoned by prior use.
    assert_eq!(mapper.read_value::<Vec<i64>>("[]").unwrap(), Vec::<i64>::new());
}

#[test]
fn permit_enum() {
    let mapper = gated(TypeRestrictions::builder().permit::<Fuel>().build());

    assert_eq!(mapper.read_value::<Fuel>("\"Petrol\"").unwrap(), Fuel::Petrol);
    assert_eq!(mapper.write_value(&Fuel::Electric).unwrap(), "\"Electric\"");

    let mapper = gated(TypeRestrictions::builder().permit::<i32>().build());
    assert_denied(mapper.read_value::<Fuel>("\"Petrol\"").unwrap_err(), "Fuel");
}

#[test]
fn permit_array() {
    let mapper = gated(
        TypeRestrictions::builder()
            .permit::<Box<[i32]>>()
            .permit::<i32>()
            .build(),
    );

    let array: Box<[i32]> = mapper.read_value("[1,2]").unwrap();
    assert_eq!(array.as_ref(), &[1, 2]);
    assert_eq!(mapper.write_value(&array).unwrap(), "[1,2]");

    // A different element width is a different array identity.
    assert_denied(
        mapper.read_value::<Box<[i64]>>("[1]").unwrap_err(),
        "[i64]",
    );
}

#[test]
fn permit_struct() {
    let policy = TypeRestrictions::builder()
        .permit::<Vehicle>()
        .permit::<String>()
        .permit::<i32>()
        .build();
    let mapper = gated(policy);

    let vehicle: Vehicle = mapper
        .read_value("{\"name\":\"car\",\"wheels\":4}")
        .unwrap();
    assert_eq!(vehicle.wheels, 4);
    let emitted = mapper.write_value(&vehicle).unwrap();
    let back: Vehicle = mapper.read_value(&emitted).unwrap();
    assert_eq!(back, vehicle);

    let mapper = gated(TypeRestrictions::builder().permit::<String>().permit::<i32>().build());
    assert_denied(
        mapper
            .read_value::<Vehicle>("{\"name\":\"car\",\"wheels\":4}")
            .unwrap_err(),
        "Vehicle",
    );
}

#[test]
fn undeclared_properties_never_map() {
    let mapper = gated(
        TypeRestrictions::builder()
            .permit::<Credentials>()
            .permit::<String>()
            .build(),
    );

    let creds: Credentials = mapper
        .read_value("{\"user\":\"alice\",\"secret\":\"hunter2\"}")
        .unwrap();
    assert_eq!(creds.user, "alice");
    assert_eq!(creds.secret, None);

    let emitted = mapper
        .write_value(&Credentials {
            user: "alice".to_string(),
            secret: Some("hunter2".to_string()),
        })
        .unwrap();
    assert!(!emitted.contains("hunter2"));
    assert!(emitted.contains("alice"));
}

#[test]
fn color_codec_is_still_gated() {
    let policy = TypeRestrictions::builder()
        .permit_optionals(true)
        .permit::<Color>()
        .build();
    let mapper = configure(Mapper::builder().with_module(&ColorsModule), policy).build();

    let color: Color = mapper.read_value("\"#ff0000\"").unwrap();
    assert_eq!(color.r, 1.0);
    assert_eq!(
        mapper.read_value::<Option<Color>>("null").unwrap(),
        None
    );
    assert_eq!(mapper.write_value(&color).unwrap(), "\"#ff0000\"");

    // A malformed literal is an ordinary mismatch, not a denial.
    let err = mapper.read_value::<Color>("\"red\"").unwrap_err();
    assert!(matches!(err, MapError::Mismatch { .. }), "got {err:?}");

    // Without the permit, the installed codec is unreachable.
    let mapper = configure(
        Mapper::builder().with_module(&ColorsModule),
        TypeRestrictions::builder().build(),
    )
    .build();
    assert_denied(mapper.read_value::<Color>("\"#ff0000\"").unwrap_err(), "Color");
}

#[test]
fn module_without_explicit_introspection() {
    // The lighter profile: adapters only, conventional property
    // resolution left in place.
    let policy = TypeRestrictions::builder().permit::<i32>().build();
    let mapper = Mapper::builder()
        .with_module(&RestrictionModule::new(policy))
        .build();

    assert_eq!(mapper.read_value::<i32>("1").unwrap(), 1);
    assert_denied(mapper.read_value::<i64>("1").unwrap_err(), "i64");
}

struct CountingPolicy {
    inner: TypeRestrictions,
    checks: AtomicUsize,
}

impl RestrictionPolicy for CountingPolicy {
    fn permits(&self, shape: &Shape) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.inner.permits(shape)
    }

    fn permits_key(&self, key: &TypeToken) -> bool {
        self.inner.permits_key(key)
    }
}

#[test]
fn checks_run_once_per_distinct_type() {
    init_tracing();
    let policy = Arc::new(CountingPolicy {
        inner: TypeRestrictions::builder().permit::<i32>().build(),
        checks: AtomicUsize::new(0),
    });
    let mapper = Mapper::builder()
        .with_reader_modifier(Arc::new(palisade_gate::RestrictedReaders::new(
            policy.clone(),
        )))
        .build();

    assert_eq!(mapper.read_value::<i32>("1").unwrap(), 1);
    let after_first = policy.checks.load(Ordering::SeqCst);
    assert!(after_first > 0);

    for _ in 0..10 {
        assert_eq!(mapper.read_value::<i32>("2").unwrap(), 2);
    }
    assert_eq!(policy.checks.load(Ordering::SeqCst), after_first);
}
