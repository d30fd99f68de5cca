//! String format registry: deterministic canonical values for `uuid`,
//! `email`, `uri`, `date-time`, each carrying a unique-per-call suffix so
//! repeated draws at the same node (e.g. array fillers) never collide
//! (§4.5 "Strings").

use sdgen_kernel::rng::XorShift32;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

fn hex_chars(rng: &mut XorShift32, count: usize) -> String {
    (0..count)
        .map(|_| HEX_DIGITS[rng.next_index(16)] as char)
        .collect()
}

/// A UUIDv4-shaped string: `8-4-4-4-12` hex groups with the version/variant
/// nibbles fixed per RFC 4122, the rest drawn from the node's RNG.
fn generate_uuid(rng: &mut XorShift32) -> String {
    let a = hex_chars(rng, 8);
    let b = hex_chars(rng, 4);
    let c = hex_chars(rng, 3);
    let d = hex_chars(rng, 3);
    let e = hex_chars(rng, 12);
    let variant = HEX_DIGITS[8 + rng.next_index(4)] as char;
    format!("{a}-{b}-4{c}-{variant}{d}-{e}")
}

fn generate_email(call_index: u64) -> String {
    format!("user{call_index}@example.com")
}

fn generate_uri(call_index: u64) -> String {
    format!("https://example.invalid/resource/{call_index}")
}

/// `2024-01-01T00:00:00Z` plus `call_index` whole seconds, kept inside a
/// single UTC day's worth of range by wrapping at 86400.
fn generate_date_time(call_index: u64) -> String {
    let seconds = call_index % 86_400;
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("2024-01-01T{h:02}:{m:02}:{s:02}Z")
}

/// The set of formats this registry can produce. `format` outside this set
/// is reported as an `unsupported-format` item failure by the caller.
pub const SUPPORTED_FORMATS: &[&str] = &["uuid", "email", "uri", "date-time"];

/// Produce a deterministic canonical value for `format`, or `None` if the
/// format is not in [`SUPPORTED_FORMATS`].
#[must_use]
pub fn generate(format: &str, rng: &mut XorShift32, call_index: u64) -> Option<String> {
    match format {
        "uuid" => Some(generate_uuid(rng)),
        "email" => Some(generate_email(call_index)),
        "uri" => Some(generate_uri(call_index)),
        "date-time" => Some(generate_date_time(call_index)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_has_version_and_variant_nibbles() {
        let mut rng = XorShift32::seeded(1, "#/x");
        let uuid = generate_uuid(&mut rng);
        let parts: Vec<&str> = uuid.split('-').collect();
        assert_eq!(parts.len(), 5);
        assert!(parts[2].starts_with('4'));
        assert!("89ab".contains(parts[3].chars().next().unwrap()));
    }

    #[test]
    fn email_and_uri_are_unique_per_call_index() {
        assert_ne!(generate_email(0), generate_email(1));
        assert_ne!(generate_uri(0), generate_uri(1));
    }

    #[test]
    fn date_time_wraps_within_a_day() {
        let dt = generate_date_time(86_401);
        assert_eq!(dt, "2024-01-01T00:00:01Z");
    }

    #[test]
    fn unsupported_format_returns_none() {
        let mut rng = XorShift32::seeded(1, "#/x");
        assert!(generate("ipv4", &mut rng, 0).is_none());
    }

    #[test]
    fn same_seed_and_path_produce_same_uuid() {
        let mut a = XorShift32::seeded(7, "#/properties/id");
        let mut b = XorShift32::seeded(7, "#/properties/id");
        assert_eq!(generate_uuid(&mut a), generate_uuid(&mut b));
    }
}
