//! Numeric helpers shared by the passes; none of them panic on inverted bounds.

/// Lower bound is checked first: with an inverted range, `min` wins only when `value < min`,
/// otherwise `max` applies when `value > max`.
pub fn clamp_i32(value: i32, min: i32, max: i32) -> i32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

pub fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Rounds halves toward positive infinity (`-2.5` becomes `-2`).
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

pub fn smoothstep(value: f64) -> f64 {
    let t = clamp_f64(value, 0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_clamp_checks_the_lower_bound_first() {
        assert_eq!(clamp_i32(5, 8, 3), 8);
        assert_eq!(clamp_i32(9, 8, 3), 3);
        assert_eq!(clamp_i32(4, 1, 6), 4);
        assert_eq!(clamp_f64(0.5, 1.0, 0.0), 1.0);
        assert_eq!(clamp_f64(1.5, 1.0, 0.0), 0.0);
    }

    #[test]
    fn halves_round_upward() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(7.49), 7);
    }

    #[test]
    fn smoothstep_is_flat_outside_unit_interval() {
        assert_eq!(smoothstep(-1.0), 0.0);
        assert_eq!(smoothstep(2.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-12);
        assert!((lerp(2.0, 6.0, 0.25) - 3.0).abs() < 1e-12);
    }
}
