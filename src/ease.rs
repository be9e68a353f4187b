//! Easing curves for transitions. All map `t` in `[0, 1]` onto `[0, 1]`.

/// Symmetric cubic ease, used by zoom transitions.
#[must_use]
pub fn cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Symmetric exponential ease, used by shrinking circles.
#[must_use]
pub fn exp_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 { tpmt(1.0 - t) / 2.0 } else { (2.0 - tpmt(t - 1.0)) / 2.0 }
}

/// `2^(-10x)` rescaled so that `tpmt(0) == 1` and `tpmt(1) == 0`.
fn tpmt(x: f64) -> f64 {
    ((-10.0 * x).exp2() - 0.000_976_562_5) * 1.000_977_517_106_549_4
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn endpoints_are_fixed() {
        for ease in [cubic_in_out, exp_in_out] {
            assert!(approx_eq(ease(0.0), 0.0));
            assert!(approx_eq(ease(0.5), 0.5));
            assert!(approx_eq(ease(1.0), 1.0));
        }
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert!(approx_eq(cubic_in_out(-1.0), 0.0));
        assert!(approx_eq(exp_in_out(3.0), 1.0));
    }

    #[test]
    fn monotonic() {
        for ease in [cubic_in_out, exp_in_out] {
            let mut prev = ease(0.0);
            for i in 1..=100 {
                let v = ease(f64::from(i) / 100.0);
                assert!(v >= prev - 1e-12);
                prev = v;
            }
        }
    }
}
