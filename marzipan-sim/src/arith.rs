//! Modular arithmetic on `i64`s, used by positioning and checksum
//! derivation.  Per-instruction core folding (`foldr`/`foldw`) lives inside
//! `redcode-vm`'s emulator and isn't duplicated here.

/// `(a + b) mod m`, for `a, b` already in `[0, m)`.
#[must_use]
pub fn add_mod(a: i64, b: i64, m: i64) -> i64 {
    normalize(a.wrapping_add(b), m)
}

/// `(a - b) mod m`, for `a, b` already in `[0, m)`.
#[must_use]
pub fn sub_mod(a: i64, b: i64, m: i64) -> i64 {
    normalize(a.wrapping_sub(b), m)
}

/// Map an arbitrary integer into `[0, m)`. Rust's `rem_euclid` already
/// collapses a negative-zero result to `0`.
#[must_use]
pub fn normalize(v: i64, m: i64) -> i64 {
    if m == 0 { 0 } else { v.rem_euclid(m) }
}

/// `(a * b) mod m`, widening through `i128` so that `m` near `i64::MAX`
/// can't overflow the intermediate product.
#[must_use]
pub fn mul_mod(a: i64, b: i64, m: i64) -> i64 {
    if m == 0 {
        return 0;
    }
    let product = i128::from(a) * i128::from(b);
    let wide_m = i128::from(m);
    i64::try_from(product.rem_euclid(wide_m)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use coverage_helper::test;

    use super::{add_mod, mul_mod, normalize, sub_mod};

    #[test]
    fn add_and_sub_wrap_within_modulus() {
        assert_eq!(add_mod(7, 5, 10), 2);
        assert_eq!(sub_mod(2, 5, 10), 7);
    }

    #[test]
    fn normalize_handles_negative_values() {
        assert_eq!(normalize(-1, 10), 9);
        assert_eq!(normalize(0, 10), 0);
        assert_eq!(normalize(23, 10), 3);
    }

    #[test]
    fn mul_mod_avoids_overflow_for_large_modulus() {
        let m = i64::MAX / 2;
        let expected = (i128::from(m - 1) * i128::from(m - 1)) % i128::from(m);
        assert_eq!(i128::from(mul_mod(m - 1, m - 1, m)), expected);
    }
}
