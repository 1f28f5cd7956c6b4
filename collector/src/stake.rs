//! Numeric helpers for turning node payload fields into gauge values.
//!
//! Stake-like amounts arrive as decimal strings in yocto units. The gauges
//! drop the 19 low-order digits and rescale the remainder by 10^5, so a
//! stake of `300000000000000000000000000` is reported as `300`.

/// Number of low-order digits dropped from a stake string.
pub const STAKE_FRACTION_DIGITS: usize = 19;

/// Divisor applied to the integer part after truncation.
pub const STAKE_SCALE: f64 = 100_000.0;

const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// Converts a yocto-denominated stake string into the gauge unit.
///
/// Strings of at most 19 characters round to exactly zero. Anything that
/// fails to parse is logged and reported as zero rather than surfaced.
pub fn stake_from_string(s: &str) -> f64 {
    if s.len() <= STAKE_FRACTION_DIGITS {
        return 0.0;
    }

    let prefix_len = s.len() - STAKE_FRACTION_DIGITS;
    let Some(prefix) = s.get(..prefix_len) else {
        tracing::warn!(stake = s, "stake string is not valid decimal digits");
        return 0.0;
    };

    match prefix.parse::<f64>() {
        Ok(v) => v / STAKE_SCALE,
        Err(e) => {
            tracing::warn!(stake = s, "failed to parse stake prefix {prefix:?}: {e}");
            0.0
        }
    }
}

/// FNV-1a 32-bit hash of the UTF-8 bytes of `build`.
///
/// Used to turn the node's build string into a plottable gauge value while
/// the string itself travels as a label.
pub fn hash_build(build: &str) -> u32 {
    build.bytes().fold(FNV32_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV32_PRIME)
    })
}

/// Minimum of a sequence of stakes, or `None` if it is empty.
pub fn min_stake<I>(stakes: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    stakes.into_iter().reduce(f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_round_to_zero() {
        assert_eq!(stake_from_string(""), 0.0);
        assert_eq!(stake_from_string("0"), 0.0);
        assert_eq!(stake_from_string("9999999999999999999"), 0.0);
    }

    #[test]
    fn drops_fraction_digits_and_rescales() {
        assert_eq!(stake_from_string("123456789012345678901"), 12.0 / 100_000.0);
        // 3 * 10^26 yocto keeps eight leading digits.
        assert_eq!(stake_from_string("300000000000000000000000000"), 300.0);
        assert_eq!(stake_from_string("30000000000000000000000000"), 30.0);
        assert_eq!(stake_from_string("20000000000000000000000000"), 20.0);
        // Twenty digits leaves a single leading digit.
        assert_eq!(stake_from_string("50000000000000000000"), 5.0 / 100_000.0);
    }

    #[test]
    fn garbage_prefix_is_zero() {
        assert_eq!(stake_from_string("abc0000000000000000000000"), 0.0);
        // Multi-byte char straddling the cut point.
        assert_eq!(stake_from_string("1é000000000000000000"), 0.0);
    }

    #[test]
    fn fnv1a_matches_reference_vectors() {
        assert_eq!(hash_build(""), 0x811c_9dc5);
        assert_eq!(hash_build("a"), 0xe40c_292c);
        assert_eq!(hash_build("foobar"), 0xbf9c_f968);
    }

    #[test]
    fn build_hash_is_stable() {
        let build = "1.35.0-rc.1-abcdef0";
        assert_eq!(hash_build(build), hash_build(build));
        assert_ne!(hash_build(build), hash_build("1.35.0"));
    }

    #[test]
    fn min_stake_of_empty_is_none() {
        assert_eq!(min_stake(Vec::new()), None);
        assert_eq!(min_stake([300.0, 200.0, 250.0]), Some(200.0));
        assert_eq!(min_stake([0.0, 10.0]), Some(0.0));
    }
}
