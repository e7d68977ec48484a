//! Canonical number formatting for XML attributes and cell values.
//!
//! Integers are written without a trailing `.0` and other finite values use the
//! shortest representation that round-trips, so equal models render equal bytes.

/// Append a float in canonical form.
#[inline]
pub fn push_f64(out: &mut String, value: f64) {
    if value == 0.0 {
        // Also folds negative zero
        out.push('0');
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        let mut buffer = itoa::Buffer::new();
        out.push_str(buffer.format(value as i64));
    } else {
        let mut buffer = ryu::Buffer::new();
        out.push_str(buffer.format(value));
    }
}

/// Format a float in canonical form.
#[inline]
pub fn fmt_f64(value: f64) -> String {
    let mut out = String::with_capacity(24);
    push_f64(&mut out, value);
    out
}

/// Append an integer.
#[inline]
pub fn push_int<I: itoa::Integer>(out: &mut String, value: I) {
    let mut buffer = itoa::Buffer::new();
    out.push_str(buffer.format(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_have_no_fraction() {
        assert_eq!(fmt_f64(45444.0), "45444");
        assert_eq!(fmt_f64(-3.0), "-3");
        assert_eq!(fmt_f64(-0.0), "0");
    }

    #[test]
    fn test_fractions_are_shortest() {
        assert_eq!(fmt_f64(0.5), "0.5");
        assert_eq!(fmt_f64(1.1), "1.1");
        assert_eq!(fmt_f64(9.140625), "9.140625");
    }

    #[test]
    fn test_push_int() {
        let mut s = String::from("id=");
        push_int(&mut s, 164u32);
        assert_eq!(s, "id=164");
    }
}
