//! E-Rezept prescription ids.
//!
//! A prescription id has the form `160.ddd.ddd.ddd.ddd.dd`: the flow type
//! `160` (Muster 16, pharmacy-only medicinal products), four groups of three
//! digits and a final group of two digits. All groups are random; the last one
//! is not a computed check digit.

use rand::Rng;

/// Flow type prefix of every generated id.
pub const FLOW_TYPE: &str = "160";

/// Generates a new prescription id.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    let mut group = || rng.gen_range(0..1000u32);
    let (a, b, c, d) = (group(), group(), group(), group());
    let check = rng.gen_range(0..100u32);
    format!("{FLOW_TYPE}.{a:03}.{b:03}.{c:03}.{d:03}.{check:02}")
}

/// Returns true if `id` has the shape of a prescription id.
pub fn is_well_formed(id: &str) -> bool {
    let groups: Vec<&str> = id.split('.').collect();
    let [flow_type, a, b, c, d, check] = groups.as_slice() else {
        return false;
    };
    let digits = |group: &str, len: usize| {
        group.len() == len && group.bytes().all(|byte| byte.is_ascii_digit())
    };

    *flow_type == FLOW_TYPE
        && [a, b, c, d].iter().all(|group| digits(group, 3))
        && digits(check, 2)
}
