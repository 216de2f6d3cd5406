//! Internal contract checks
//!
//! Progress values and yard lines are fully controlled by the engine, so an
//! out-of-range value is a bug, not a game condition:
//! - Level 1: `debug_assert!` (debug and test builds panic immediately)
//! - Level 2: `strict_contracts` feature (panic in any build)
//! - Level 3: release builds log the violation and keep going

/// Flight/route progress must be inside `[0, 1]`.
#[inline]
pub fn check_progress(t: f32, what: &str) {
    let ok = (0.0..=1.0).contains(&t);
    debug_assert!(ok, "contract violated: {} progress {} outside [0, 1]", what, t);

    #[cfg(feature = "strict_contracts")]
    if !ok {
        panic!("STRICT: {} progress {} outside [0, 1]", what, t);
    }

    if !ok {
        log::error!("[CONTRACT] {} progress {} outside [0, 1]", what, t);
    }
}

/// Yard line must be inside `[0, 100]`.
#[inline]
pub fn check_yard_line(yard_line: i32, what: &str) {
    let ok = (0..=100).contains(&yard_line);
    debug_assert!(ok, "contract violated: {} yard line {} outside [0, 100]", what, yard_line);

    #[cfg(feature = "strict_contracts")]
    if !ok {
        panic!("STRICT: {} yard line {} outside [0, 100]", what, yard_line);
    }

    if !ok {
        log::error!("[CONTRACT] {} yard line {} outside [0, 100]", what, yard_line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_values_pass() {
        check_progress(0.0, "flight");
        check_progress(1.0, "flight");
        check_yard_line(0, "ledger");
        check_yard_line(100, "ledger");
    }

    #[test]
    #[should_panic(expected = "outside [0, 1]")]
    fn test_negative_progress_panics_in_tests() {
        check_progress(-0.01, "flight");
    }

    #[test]
    #[should_panic(expected = "outside [0, 100]")]
    fn test_yard_line_past_goal_panics_in_tests() {
        check_yard_line(101, "ledger");
    }
}
