//! Shape predicates shared by the encoder and decoder.

use indexmap::IndexMap;

use crate::value::MaybeAbsent;

/// The single key of a date marker object.
pub const DATE_KEY: &str = "$date";

/// Default limit on nested arrays/objects before a walk gives up. Matches
/// `serde_json`'s parser limit and stays well inside a 2 MiB thread stack in
/// debug builds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Entries whose value is not absent.
pub fn present_entries<V: MaybeAbsent>(
    map: &IndexMap<String, V>,
) -> impl Iterator<Item = (&String, &V)> {
    map.iter().filter(|(_, v)| !v.is_absent())
}

/// Returns the `$date` value when `map` has exactly one present key and that
/// key is `$date`. The value itself is not inspected.
pub fn date_marker_candidate<V: MaybeAbsent>(map: &IndexMap<String, V>) -> Option<&V> {
    let mut present = present_entries(map);
    match (present.next(), present.next()) {
        (Some((key, value)), None) if key == DATE_KEY => Some(value),
        _ => None,
    }
}
