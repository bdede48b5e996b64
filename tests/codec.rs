//! Codec tests: fixed-point, complex and cluster encode/decode, rounding, wrapping and
//! validation errors.

use nifpga_fxp::{
    BitArray, ClusterType, ClusterValue, CodecError, Complex, ComplexFixedPointType, FixedPointType,
    TypeDescriptor, Value,
};

fn bits(s: &str) -> BitArray {
    s.parse().expect("bits")
}

fn fxp(integer: i32, fractional: i32, signed: bool) -> TypeDescriptor {
    FixedPointType::new(integer, fractional, signed).expect("fxp").into()
}

fn cfxp(integer: i32, fractional: i32) -> TypeDescriptor {
    ComplexFixedPointType::new(integer, fractional).expect("cfxp").into()
}

fn sample_cluster() -> ClusterType {
    ClusterType::new([
        ("e1", fxp(4, 4, true)),
        ("e2", fxp(8, 0, false)),
        ("e3", cfxp(2, 3)),
    ])
    .expect("cluster")
}

// ==================== Fixed-point ====================

#[test]
fn test_signed_all_ones_is_minus_one() {
    let t = FixedPointType::new(8, 0, true).unwrap();
    assert_eq!(t.decode(&bits("11111111")).unwrap(), Value::Integer(-1));
    assert_eq!(t.encode(&Value::from(-1)).unwrap(), bits("11111111"));
}

#[test]
fn test_integer_zero() {
    let t = FixedPointType::new(8, 0, true).unwrap();
    assert_eq!(t.encode(&Value::Integer(0)).unwrap(), BitArray::zeros(8));
}

#[test]
fn test_fractional_encode() {
    let t = FixedPointType::new(4, 4, true).unwrap();
    assert_eq!(t.encode(&Value::Real(1.5)).unwrap(), bits("0001_1000"));
    assert_eq!(t.encode(&Value::Real(-1.5)).unwrap(), bits("1110_1000"));
    assert_eq!(t.decode(&bits("1110_1000")).unwrap(), Value::Real(-1.5));
}

#[test]
fn test_fractional_decode_is_real_integer_decode_is_integer() {
    let frac = FixedPointType::new(4, 4, false).unwrap();
    assert_eq!(frac.decode(&bits("0001_0000")).unwrap(), Value::Real(1.0));
    let int = FixedPointType::new(8, 0, false).unwrap();
    assert_eq!(int.decode(&bits("0001_0000")).unwrap(), Value::Integer(16));
}

#[test]
fn test_unsigned_negative_rejected() {
    let t = FixedPointType::new(8, 0, false).unwrap();
    let err = t.encode(&Value::from(-1)).unwrap_err();
    assert!(matches!(err, CodecError::Domain(_)), "{err}");
    assert!(err.to_string().contains("negative value for unsigned fixed-point"));

    let frac = FixedPointType::new(2, 3, false).unwrap();
    assert!(matches!(frac.encode(&Value::Real(-0.1)), Err(CodecError::Domain(_))));
}

#[test]
fn test_non_finite_rejected() {
    let t = FixedPointType::new(4, 4, true).unwrap();
    assert!(matches!(t.encode(&Value::Real(f64::NAN)), Err(CodecError::Domain(_))));
    assert!(matches!(t.encode(&Value::Real(f64::INFINITY)), Err(CodecError::Domain(_))));
}

#[test]
fn test_rounding_ties_away_from_zero() {
    let t = FixedPointType::new(4, 1, true).unwrap();
    // 0.25 scales to 0.5, -0.25 to -0.5: both round away from zero.
    assert_eq!(t.encode(&Value::Real(0.25)).unwrap(), bits("00001"));
    assert_eq!(t.encode(&Value::Real(-0.25)).unwrap(), bits("11111"));
    assert_eq!(t.decode(&bits("11111")).unwrap(), Value::Real(-0.5));

    let int = FixedPointType::new(8, 0, true).unwrap();
    assert_eq!(int.encode(&Value::Real(2.5)).unwrap(), bits("00000011"));
    assert_eq!(int.encode(&Value::Real(-2.5)).unwrap(), bits("11111101"));
    assert_eq!(int.encode(&Value::Real(2.4)).unwrap(), bits("00000010"));
}

#[test]
fn test_out_of_range_wraps() {
    let t = FixedPointType::new(4, 0, true).unwrap();
    assert_eq!(t.encode(&Value::from(9)).unwrap(), bits("1001"));
    assert_eq!(t.decode(&bits("1001")).unwrap(), Value::Integer(-7));

    let u = FixedPointType::new(4, 0, false).unwrap();
    assert_eq!(u.encode(&Value::from(17)).unwrap(), bits("0001"));
}

#[test]
fn test_negative_integer_bits() {
    let t = FixedPointType::new(-3, 15, true).unwrap();
    assert_eq!(t.num_bits(), 12);
    assert_eq!(t.type_name(), "I-3.15");
    let encoded = t.encode(&Value::Real(0.001)).unwrap();
    assert_eq!(encoded.len(), 12);
    let decoded = t.decode(&encoded).unwrap().as_f64().unwrap();
    assert!((decoded - 0.001).abs() <= 2f64.powi(-15));
    assert_eq!(decoded, 33.0 / 32768.0);
}

#[test]
fn test_wide_lanes() {
    let t = FixedPointType::new(128, 0, true).unwrap();
    let all_ones = t.encode(&Value::from(-1)).unwrap();
    assert_eq!(all_ones.len(), 128);
    assert!(all_ones.iter().all(|b| b));
    assert_eq!(t.decode(&all_ones).unwrap(), Value::Integer(-1));

    let u64_type = FixedPointType::new(64, 0, false).unwrap();
    let max = Value::from(u64::MAX);
    assert_eq!(u64_type.decode(&u64_type.encode(&max).unwrap()).unwrap(), max);
}

#[test]
fn test_unsigned_lanes_stop_at_127_bits() {
    assert!(matches!(
        FixedPointType::new(128, 0, false),
        Err(CodecError::InvalidWidth { integer_bits: 128, fractional_bits: 0 })
    ));
    assert!(matches!(FixedPointType::new(120, 8, false), Err(CodecError::InvalidWidth { .. })));

    let t = FixedPointType::new(127, 0, false).unwrap();
    let all_ones = BitArray::from(vec![true; 127]);
    assert_eq!(t.decode(&all_ones).unwrap(), Value::Integer(i128::MAX));

    let frac = FixedPointType::new(119, 8, false).unwrap();
    let mut msb_only = vec![false; 127];
    msb_only[0] = true;
    let decoded = frac.decode(&BitArray::from(msb_only)).unwrap();
    assert_eq!(decoded, Value::Real(2f64.powi(118)));
}

#[test]
fn test_out_of_range_reals_wrap() {
    let t = FixedPointType::new(8, 0, true).unwrap();
    assert_eq!(t.encode(&Value::Real(2f64.powi(130))).unwrap(), BitArray::zeros(8));
    assert_eq!(t.encode(&Value::Real(-300.0)).unwrap(), bits("11010100"));

    let wide = FixedPointType::new(100, 0, true).unwrap();
    let minus_one = wide.encode(&Value::Real(-1.0)).unwrap();
    assert!(minus_one.iter().all(|b| b));

    let q = FixedPointType::new(64, 64, true).unwrap();
    let encoded = q.encode(&Value::Real(2f64.powi(63))).unwrap();
    assert_eq!(encoded.get(0), Some(true));
    assert!(encoded.iter().skip(1).all(|b| !b));
    assert_eq!(q.decode(&encoded).unwrap(), Value::Real(-(2f64.powi(63))));
}

#[test]
fn test_invalid_widths() {
    assert!(matches!(
        FixedPointType::new(0, 0, true),
        Err(CodecError::InvalidWidth { integer_bits: 0, fractional_bits: 0 })
    ));
    assert!(matches!(FixedPointType::new(-4, 2, true), Err(CodecError::InvalidWidth { .. })));
    assert!(matches!(FixedPointType::new(100, 29, false), Err(CodecError::InvalidWidth { .. })));
    assert!(matches!(ComplexFixedPointType::new(0, 0), Err(CodecError::InvalidWidth { .. })));
}

#[test]
fn test_decode_wrong_length() {
    let t = fxp(8, 0, true);
    assert!(matches!(
        t.decode(&bits("1111111")),
        Err(CodecError::Shape { expected: 8, actual: 7 })
    ));
}

#[test]
fn test_type_names() {
    assert_eq!(fxp(8, 8, true).type_name(), "I8.8");
    assert_eq!(fxp(2, 3, false).type_name(), "U2.3");
    assert_eq!(fxp(32, 0, true).type_name(), "I32");
    assert_eq!(cfxp(4, 4).type_name(), "C4.4");
}

// ==================== Complex ====================

#[test]
fn test_complex_layout_real_then_imaginary() {
    let t = ComplexFixedPointType::new(8, 0).unwrap();
    assert_eq!(t.num_bits(), 16);
    let encoded = t.encode(&Value::Complex(Complex::new(1.0, -1.0))).unwrap();
    assert_eq!(encoded.slice(0..8), bits("00000001"));
    assert_eq!(encoded.slice(8..16), bits("11111111"));

    let narrow = ComplexFixedPointType::new(4, 0).unwrap();
    assert_eq!(narrow.encode(&Complex::new(1.0, -1.0).into()).unwrap(), bits("0001_1111"));
}

#[test]
fn test_complex_decode() {
    let t = ComplexFixedPointType::new(4, 4).unwrap();
    let decoded = t.decode(&bits("0001_1000_1111_1100")).unwrap();
    assert_eq!(decoded, Value::Complex(Complex::new(1.5, -0.25)));
}

#[test]
fn test_complex_accepts_real_scalar() {
    let t = ComplexFixedPointType::new(4, 0).unwrap();
    assert_eq!(t.encode(&Value::Real(3.0)).unwrap(), bits("0011_0000"));
}

#[test]
fn test_complex_rejects_cluster() {
    let t = cfxp(4, 0);
    let err = t.encode(&Value::Cluster(ClusterValue::new())).unwrap_err();
    assert!(matches!(err, CodecError::TypeMismatch { found: "cluster", .. }));
}

// ==================== Clusters ====================

#[test]
fn test_cluster_round_trip() {
    let cluster = sample_cluster();
    assert_eq!(cluster.num_bits(), 8 + 8 + 10);

    let mut v = cluster.empty_value();
    v.set("e1", 1);
    v.set("e2", 128);
    v.set("e3", Complex::new(1.0, -1.0));
    let encoded = cluster.encode(&v).unwrap();
    assert_eq!(encoded.len(), 26);
    assert_eq!(encoded, bits("00010000_10000000_01000_11000"));

    let decoded = cluster.decode(&encoded).unwrap();
    assert_eq!(decoded.get("e1").and_then(Value::as_f64), Some(1.0));
    assert_eq!(decoded.get("e2"), Some(&Value::Integer(128)));
    assert_eq!(decoded.get("e3"), Some(&Value::Complex(Complex::new(1.0, -1.0))));
    let names: Vec<&str> = decoded.field_names().collect();
    assert_eq!(names, ["e1", "e2", "e3"]);
}

#[test]
fn test_cluster_empty_value_and_schema() {
    let cluster = sample_cluster();
    let empty = cluster.empty_value();
    assert_eq!(empty.get("e1"), Some(&Value::Real(0.0)));
    assert_eq!(empty.get("e2"), Some(&Value::Integer(0)));
    assert_eq!(empty.get("e3"), Some(&Value::Complex(Complex::default())));
    assert_eq!(cluster.encode(&empty).unwrap(), BitArray::zeros(26));

    let schema = cluster.schema();
    assert_eq!(
        schema,
        vec![
            ("e1".to_string(), "I4.4".to_string()),
            ("e2".to_string(), "U8".to_string()),
            ("e3".to_string(), "C2.3".to_string()),
        ]
    );
}

#[test]
fn test_cluster_missing_field() {
    let cluster = sample_cluster();
    let mut v = cluster.empty_value();
    v.remove("e2");
    match cluster.encode(&v) {
        Err(CodecError::FieldSetMismatch { expected, actual }) => {
            assert_eq!(expected, ["e1", "e2", "e3"]);
            assert_eq!(actual, ["e1", "e3"]);
        }
        other => panic!("expected FieldSetMismatch, got {:?}", other),
    }
}

#[test]
fn test_cluster_extra_field() {
    let cluster = sample_cluster();
    let mut v = cluster.empty_value();
    v.set("e4", 1);
    assert!(matches!(cluster.encode(&v), Err(CodecError::FieldSetMismatch { .. })));
}

#[test]
fn test_cluster_field_order_in_value_does_not_matter() {
    let cluster = sample_cluster();
    let v: ClusterValue = [
        ("e3", Value::Complex(Complex::new(0.5, 0.0))),
        ("e2", Value::Integer(3)),
        ("e1", Value::Real(-1.0)),
    ]
    .into_iter()
    .collect();
    let decoded = cluster.decode(&cluster.encode(&v).unwrap()).unwrap();
    assert_eq!(decoded.get("e1"), Some(&Value::Real(-1.0)));
    assert_eq!(decoded.get("e2"), Some(&Value::Integer(3)));
    assert_eq!(decoded.get("e3"), Some(&Value::Complex(Complex::new(0.5, 0.0))));
}

#[test]
fn test_cluster_size_mismatch() {
    let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let types = vec![fxp(8, 0, true), fxp(8, 0, false), fxp(5, 5, true)];
    let err = ClusterType::with_declared_size(names, types, 24).unwrap_err();
    assert!(matches!(err, CodecError::SizeMismatch { computed: 26, declared: 24 }));
}

#[test]
fn test_cluster_name_type_count_mismatch() {
    let err = ClusterType::with_declared_size(vec!["a".to_string()], vec![], 0).unwrap_err();
    assert!(matches!(err, CodecError::FieldCountMismatch { names: 1, types: 0 }));
}

#[test]
fn test_cluster_duplicate_field() {
    let err = ClusterType::new([("a", fxp(8, 0, true)), ("a", fxp(8, 0, true))]).unwrap_err();
    assert!(matches!(err, CodecError::DuplicateField(name) if name == "a"));
}

#[test]
fn test_nested_cluster() {
    let inner =
        ClusterType::new([("flag", FixedPointType::boolean().into()), ("n", fxp(3, 0, false))])
            .unwrap();
    let outer =
        ClusterType::new([("head", fxp(4, 0, true)), ("body", inner.clone().into())]).unwrap();
    assert_eq!(outer.num_bits(), 8);

    let mut v = outer.empty_value();
    v.set("head", -2);
    let body = v.get_mut("body").and_then(Value::as_cluster_mut).expect("body");
    body.set("flag", true);
    body.set("n", 5);
    let encoded = outer.encode(&v).unwrap();
    assert_eq!(encoded, bits("1110_1_101"));

    let decoded = outer.decode(&encoded).unwrap();
    let body = decoded.get("body").and_then(Value::as_cluster).expect("body");
    assert_eq!(body.get("flag").and_then(Value::as_bool), Some(true));
    assert_eq!(body.get("n"), Some(&Value::Integer(5)));
}

#[test]
fn test_nested_error_names_field() {
    let inner = ClusterType::new([("n", fxp(3, 0, false))]).unwrap();
    let outer = ClusterType::new([("body", TypeDescriptor::from(inner))]).unwrap();
    let mut v = outer.empty_value();
    v.get_mut("body")
        .and_then(Value::as_cluster_mut)
        .expect("body")
        .set("n", -1);
    let err = outer.encode(&v).unwrap_err();
    assert!(matches!(&err, CodecError::Field { field, .. } if field == "body"));
    assert!(matches!(err.root(), CodecError::Domain(_)));
    assert!(err.to_string().starts_with("field body: field n:"));
}

#[test]
fn test_cluster_descriptor_rejects_scalar_value() {
    let t: TypeDescriptor = sample_cluster().into();
    assert!(matches!(
        t.encode(&Value::Integer(0)),
        Err(CodecError::TypeMismatch { found: "integer", .. })
    ));
    assert!(matches!(
        fxp(8, 0, true).encode(&Value::Cluster(ClusterValue::new())),
        Err(CodecError::TypeMismatch { found: "cluster", .. })
    ));
}

#[test]
fn test_cluster_decode_wrong_length() {
    let cluster = sample_cluster();
    assert!(matches!(
        cluster.decode(&BitArray::zeros(25)),
        Err(CodecError::Shape { expected: 26, actual: 25 })
    ));
}

// ==================== Element runs ====================

#[test]
fn test_element_runs() {
    let t = fxp(8, 0, true);
    let values = vec![Value::from(1), Value::from(-1), Value::from(100)];
    let packed = t.encode_elements(&values).unwrap();
    assert_eq!(packed.len(), 24);
    assert_eq!(t.decode_elements(&packed).unwrap(), values);

    assert!(matches!(
        t.decode_elements(&BitArray::zeros(20)),
        Err(CodecError::ElementRun { element_bits: 8, actual: 20 })
    ));
}

#[test]
fn test_element_runs_of_empty_cluster() {
    let t: TypeDescriptor =
        ClusterType::new(Vec::<(String, TypeDescriptor)>::new()).unwrap().into();
    assert_eq!(t.num_bits(), 0);
    assert!(t.decode_elements(&BitArray::new()).unwrap().is_empty());
    assert!(t.decode_elements(&BitArray::zeros(1)).is_err());
}

// ==================== Transport words ====================

#[test]
fn test_cluster_through_transport_words() {
    let cluster = sample_cluster();
    let mut v = cluster.empty_value();
    v.set("e1", -0.5);
    v.set("e2", 7);
    let encoded = cluster.encode(&v).unwrap();
    let words = encoded.to_words();
    assert_eq!(words.len(), 1);
    let back = BitArray::from_words(&words, cluster.num_bits()).unwrap();
    assert_eq!(cluster.decode(&back).unwrap(), cluster.decode(&encoded).unwrap());
}
