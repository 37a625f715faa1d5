//! Structural equality for value trees.
//!
//! Unlike the derived `PartialEq`, these ignore undefined object entries and
//! key order, and treat `NaN` as equal to itself. Dates compare by their
//! epoch milliseconds.

use indexmap::IndexMap;

use crate::shape::present_entries;
use crate::value::{MaybeAbsent, RichValue, WireValue};

/// Deep equality for [`RichValue`] trees.
///
/// # Examples
///
/// ```
/// use date_json::{deep_equal, DateInstant, RichValue};
///
/// let a = RichValue::object([
///     ("at", RichValue::from(DateInstant::from_millis(5).unwrap())),
///     ("gone", RichValue::Undefined),
/// ]);
/// let b = RichValue::object([("at", RichValue::from(DateInstant::from_millis(5).unwrap()))]);
/// assert!(deep_equal(&a, &b));
/// ```
pub fn deep_equal(a: &RichValue, b: &RichValue) -> bool {
    match (a, b) {
        (RichValue::Undefined, RichValue::Undefined) => true,
        (RichValue::Null, RichValue::Null) => true,
        (RichValue::Bool(a), RichValue::Bool(b)) => a == b,
        (RichValue::Number(a), RichValue::Number(b)) => numbers_equal(*a, *b),
        (RichValue::Str(a), RichValue::Str(b)) => a == b,
        (RichValue::Date(a), RichValue::Date(b)) => a.epoch_millis() == b.epoch_millis(),
        (RichValue::Array(a), RichValue::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| deep_equal(a, b))
        }
        (RichValue::Object(a), RichValue::Object(b)) => objects_equal(a, b, deep_equal),
        (RichValue::Function(a), RichValue::Function(b)) => a == b,
        (RichValue::Binary(a), RichValue::Binary(b)) => a == b,
        (
            RichValue::RegExp { source, flags },
            RichValue::RegExp {
                source: other_source,
                flags: other_flags,
            },
        ) => source == other_source && flags == other_flags,
        (RichValue::BigInt(a), RichValue::BigInt(b)) => a == b,
        (RichValue::Symbol(a), RichValue::Symbol(b)) => a == b,
        _ => false,
    }
}

/// Deep equality for [`WireValue`] trees.
pub fn deep_equal_wire(a: &WireValue, b: &WireValue) -> bool {
    match (a, b) {
        (WireValue::Undefined, WireValue::Undefined) => true,
        (WireValue::Null, WireValue::Null) => true,
        (WireValue::Bool(a), WireValue::Bool(b)) => a == b,
        (WireValue::Number(a), WireValue::Number(b)) => numbers_equal(*a, *b),
        (WireValue::Str(a), WireValue::Str(b)) => a == b,
        (WireValue::Array(a), WireValue::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| deep_equal_wire(a, b))
        }
        (WireValue::Object(a), WireValue::Object(b)) => objects_equal(a, b, deep_equal_wire),
        (WireValue::Function(a), WireValue::Function(b)) => a == b,
        _ => false,
    }
}

fn numbers_equal(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn objects_equal<V: MaybeAbsent>(
    a: &IndexMap<String, V>,
    b: &IndexMap<String, V>,
    eq: fn(&V, &V) -> bool,
) -> bool {
    if present_entries(a).count() != present_entries(b).count() {
        return false;
    }
    present_entries(a).all(|(key, val_a)| match b.get(key) {
        Some(val_b) if !val_b.is_absent() => eq(val_a, val_b),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Callable, DateInstant};

    fn date(ms: i64) -> RichValue {
        RichValue::Date(DateInstant::from_millis(ms).unwrap())
    }

    #[test]
    fn test_scalars() {
        assert!(deep_equal(&RichValue::from(1), &RichValue::from(1.0)));
        assert!(!deep_equal(&RichValue::from(1), &RichValue::from(2)));
        assert!(!deep_equal(&RichValue::from(0), &RichValue::Null));
        assert!(!deep_equal(&RichValue::from(""), &RichValue::Null));
        assert!(!deep_equal(&RichValue::from(1), &RichValue::from(true)));
        assert!(!deep_equal(&RichValue::Null, &RichValue::Undefined));
    }

    #[test]
    fn test_nan_equals_nan() {
        assert!(deep_equal(&RichValue::from(f64::NAN), &RichValue::from(f64::NAN)));
        assert!(deep_equal_wire(&WireValue::Number(f64::NAN), &WireValue::Number(f64::NAN)));
    }

    #[test]
    fn test_dates() {
        assert!(deep_equal(&date(5), &date(5)));
        assert!(!deep_equal(&date(5), &date(6)));
        assert!(!deep_equal(&date(5), &RichValue::from(5)));
    }

    #[test]
    fn test_objects_ignore_order_and_undefined() {
        let a = RichValue::object([
            ("a", RichValue::from(1)),
            ("b", RichValue::from("2")),
            ("c", RichValue::Undefined),
        ]);
        let b = RichValue::object([("b", RichValue::from("2")), ("a", RichValue::from(1))]);
        assert!(deep_equal(&a, &b));
        assert!(deep_equal(&b, &a));
    }

    #[test]
    fn test_objects_differ() {
        let a = RichValue::object([("a", RichValue::from(1))]);
        let b = RichValue::object([("a", RichValue::from(1)), ("b", RichValue::Null)]);
        let c = RichValue::object([("d", RichValue::from(1))]);
        assert!(!deep_equal(&a, &b));
        assert!(!deep_equal(&a, &c));
    }

    #[test]
    fn test_arrays() {
        let a = RichValue::Array(vec![RichValue::from(1), date(2)]);
        let b = RichValue::Array(vec![RichValue::from(1), date(2)]);
        let c = RichValue::Array(vec![date(2), RichValue::from(1)]);
        assert!(deep_equal(&a, &b));
        assert!(!deep_equal(&a, &c));
        assert!(!deep_equal(&a, &RichValue::Array(vec![RichValue::from(1)])));
        assert!(!deep_equal(&RichValue::Array(vec![]), &RichValue::object::<&str, _>([])));
    }

    #[test]
    fn test_array_holes_are_significant() {
        let a = RichValue::Array(vec![RichValue::Undefined]);
        let b = RichValue::Array(vec![]);
        assert!(!deep_equal(&a, &b));
    }

    #[test]
    fn test_functions_by_identity() {
        let f = Callable::new(|_| RichValue::Null);
        let g = Callable::new(|_| RichValue::Null);
        assert!(deep_equal(&RichValue::Function(f.clone()), &RichValue::Function(f)));
        assert!(!deep_equal(
            &RichValue::Function(g),
            &RichValue::Function(Callable::new(|_| RichValue::Null))
        ));
    }

    #[test]
    fn test_wire_nested() {
        let a = WireValue::object([(
            "events",
            WireValue::Array(vec![WireValue::object([
                ("at", WireValue::object([("$date", WireValue::Number(5.0))])),
                ("tag", WireValue::from("x")),
            ])]),
        )]);
        assert!(deep_equal_wire(&a, &a.clone()));
        assert!(!deep_equal_wire(&a, &WireValue::Null));
    }
}
