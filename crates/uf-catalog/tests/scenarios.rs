//! Integration tests for quantity parsing, canonicalization and conversion
//! against the embedded UCUM core catalog.

use rust_decimal_macros::dec;
use uf_catalog::{builtin, from_yaml_str, load_json, load_yaml};
use uf_convert::{Quantity, SystemOfUnits};
use uf_core::{Exponential, UfError};

fn ucum() -> SystemOfUnits {
    builtin().unwrap()
}

fn assert_approximates(actual: &Quantity, expected: &Quantity) {
    assert!(
        actual.approximates(expected) && expected.approximates(actual),
        "{actual} does not approximate {expected}"
    );
}

#[test]
fn pound_force_in_base_units() {
    let sys = ucum();
    let force = sys.canonical_str("4.0[lbf_av]").unwrap();
    assert_eq!(force.metric.symbols(), "g.m.s-2");
    let expected = sys.quantity("18kg.m.s-2").unwrap().unprefixed();
    assert_approximates(&force, &expected);
}

#[test]
fn pressure_in_base_units() {
    let sys = ucum();
    let psi = sys.canonical_str("2.000[psi]").unwrap();
    assert_eq!(psi.metric.symbols(), "g.m-1.s-2");
    assert_approximates(&psi, &sys.quantity("1.379e7g.m-1.s-2").unwrap());

    let mercury = sys.canonical_str("120mm[Hg]").unwrap();
    assert_approximates(&mercury, &sys.quantity("1.6e7g.m-1.s-2").unwrap());
    assert!(mercury.same_dimension(&psi));
}

#[test]
fn speed_in_base_units() {
    let sys = ucum();
    let speed = sys.canonical_str("10.0km/h").unwrap();
    assert_eq!(speed.metric.symbols(), "m.s-1");
    assert_approximates(&speed, &sys.quantity("2.8m/s").unwrap());
}

#[test]
fn dimensionless_constants_fold_into_the_value() {
    let sys = ucum();
    let q = sys.canonical_str("2.000[pi].kg").unwrap();
    assert_eq!(q.metric.symbols(), "g");
    assert_approximates(&q, &sys.quantity("6.283kg").unwrap());

    let angle = sys.canonical_str("180.00deg").unwrap();
    assert_eq!(angle.metric.symbols(), "rad");
    assert_approximates(&angle, &sys.quantity("3.1416rad").unwrap());

    let moles = sys.canonical_str("1.0mol").unwrap();
    assert!(moles.is_dimless());
    assert_eq!(moles.value.exponent(), 23);
    assert!(moles.value.approximates(&"6.0e23".parse().unwrap()));

    let share = sys.canonical_str("25%").unwrap();
    assert!(share.is_dimless());
    assert!(share.value.approximates(&"2.5e-1".parse().unwrap()));
}

#[test]
fn quantity_arithmetic() {
    let sys = ucum();
    let a = sys.quantity("4.0km").unwrap();
    let b = sys.quantity("2.0km").unwrap();
    let area = a.mul(&b);
    assert_eq!(area.metric.symbols(), "km2");
    assert_approximates(&area, &sys.quantity("8e6m2").unwrap());

    let f1 = sys.quantity("4.0kg.m/s2").unwrap();
    let f2 = sys.quantity("2.0e3g.m.s-2").unwrap();
    let sum = f1.add(&f2).unwrap();
    assert_eq!(sum.metric.symbols(), "g.m.s-2");
    assert!(sum.value.approximates(&"6.0e3".parse().unwrap()));

    let length = sys.quantity("4.0m").unwrap();
    assert!(matches!(
        length.add(&sys.quantity("2.0s").unwrap()).unwrap_err(),
        UfError::DimensionMismatch { .. }
    ));
}

#[test]
fn metric_products() {
    let sys = ucum();
    let kg = sys.metric("kg").unwrap();
    let accel = sys.metric("m/s2").unwrap();
    let force = &kg * &accel;
    assert_eq!(force.symbols(), "kg.m.s-2");
    assert_eq!(&force / &kg, accel);
    let m = sys.metric("m").unwrap();
    let s2 = sys.metric("s2").unwrap();
    assert_eq!(&m / &s2, accel);
    assert_ne!(kg, sys.metric("g").unwrap());
    assert_eq!(sys.metric("km.mm").unwrap(), sys.metric("m2").unwrap());
    assert_eq!(force.dimension_text(), "mass^1.length^1.time^-2");
}

#[test]
fn conversion_to_base_targets() {
    let sys = ucum();
    let foot = sys.convert_str("1.0[ft_i]", "cm").unwrap();
    assert_eq!(foot.metric.symbols(), "cm");
    assert!((foot.value.to_f64() - 30.48).abs() < 1e-9);

    let day = sys.convert_str("1d", "ks").unwrap();
    assert!((day.value.to_f64() - 86.4).abs() < 1e-9);

    let newton = sys.convert_str("1.0N", "kg.m.s-2").unwrap();
    assert!((newton.value.to_f64() - 1.0).abs() < 1e-12);

    assert!(matches!(
        sys.convert_str("10.0m/s", "km/h").unwrap_err(),
        UfError::NotImplemented { .. }
    ));
    assert!(matches!(
        sys.convert_str("10.0m", "s").unwrap_err(),
        UfError::DimensionMismatch { .. }
    ));
}

#[test]
fn volumes_use_prefixed_rule_targets() {
    let sys = ucum();
    let q = sys.canonical_str("2.0L").unwrap();
    assert_eq!(q.metric.symbols(), "m3");
    assert!(q.value.approximates(&"2.0e-3".parse().unwrap()));

    let rate = sys.canonical_str("90mL/min/{1.73_m2}").unwrap();
    assert_eq!(rate.metric.symbols(), "m3.s-1");
    assert!((rate.value.to_f64() - 1.5e-6).abs() < 1e-15);
}

#[test]
fn special_units_are_not_convertible() {
    let sys = ucum();
    assert!(sys.metric("Cel").is_ok());
    assert!(sys.conversions().iter().all(|c| c.from().symbols() != "Cel"));
    assert!(matches!(
        sys.canonical_str("37Cel").unwrap_err(),
        UfError::NonConvertible { .. }
    ));
}

#[test]
fn malformed_input() {
    let sys = ucum();
    assert!(sys.quantity("4").unwrap().is_dimless());
    assert!(!sys.quantity("4.3[in_i]").unwrap().is_dimless());
    for bad in ["4,4[in_i]", "4.0 [in_i]", "[in_i]", "4.0{a}m"] {
        let err = sys.quantity(bad).unwrap_err();
        assert!(matches!(err, UfError::Format { .. }), "{bad}: {err}");
    }
    assert!(matches!(
        sys.quantity("4.0[foo]").unwrap_err(),
        UfError::UnresolvedSymbol { .. }
    ));
}

#[test]
fn canonical_is_stable() {
    let sys = ucum();
    for text in ["4.0[lbf_av]", "2.000[psi]", "10.0km/h", "3.0[mi_i]", "1.5atm"] {
        let once = sys.canonical_str(text).unwrap();
        let twice = sys.canonical(&once).unwrap();
        assert!(once.is_in_base_units());
        assert_approximates(&once, &twice);
    }
}

#[test]
fn custom_catalog_files() {
    let yaml = r#"
config:
  error_digit: 5
  prefix_match: longest
prefixes:
  - { name: deci, symbol: d, factor: "1e-1" }
  - { name: deka, symbol: da, factor: "1e1" }
units:
  - { name: meter, symbol: m, dimension: length }
  - { name: furlong, symbol: fur }
conversions:
  - { symbol: fur, formula: dam, coefficient: "20.1168" }
"#;
    let sys = from_yaml_str(yaml).unwrap();
    assert_eq!(sys.number("4.0").unwrap().error(), dec!(0.5));

    let q = sys.canonical_str("1.00fur").unwrap();
    assert!((q.value.to_f64() - 201.168).abs() < 1e-9);

    let dir = std::env::temp_dir();
    let yaml_path = dir.join("uf_catalog_custom.yaml");
    std::fs::write(&yaml_path, yaml).unwrap();
    let loaded = load_yaml(&yaml_path).unwrap();
    assert_eq!(loaded.conversions().len(), 1);

    let json = r#"{
        "units": [{ "name": "second", "symbol": "s", "dimension": "time" },
                  { "name": "minute", "symbol": "min" }],
        "conversions": [{ "symbol": "min", "formula": "s", "coefficient": "60" }]
    }"#;
    let json_path = dir.join("uf_catalog_custom.json");
    std::fs::write(&json_path, json).unwrap();
    let sys = load_json(&json_path).unwrap();
    let q = sys.canonical_str("2.0min").unwrap();
    assert_eq!(q.value, Exponential::new(dec!(1.20), 2, dec!(0.06)));
}

#[test]
fn cyclic_catalogs_are_rejected() {
    let err = from_yaml_str(
        r#"
units:
  - { name: a, symbol: a }
  - { name: b, symbol: b }
conversions:
  - { symbol: a, formula: b }
  - { symbol: b, formula: a }
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("cycle through a, b"), "{err}");
}
