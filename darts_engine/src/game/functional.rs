//! Pure scoring rules. Nothing in here touches match state.

use super::{
    constants::{BULL, MAX_SEGMENT},
    entities::{CheckRule, MatchFormat, Multiplier},
};

/// Whether a dart with multiplier `m` opens scoring under `rule`.
#[must_use]
pub fn can_check_in(rule: CheckRule, m: Multiplier) -> bool {
    rule_allows(rule, m)
}

/// Whether a dart with multiplier `m` may finish a leg under `rule`.
#[must_use]
pub fn can_check_out(rule: CheckRule, m: Multiplier) -> bool {
    rule_allows(rule, m)
}

fn rule_allows(rule: CheckRule, m: Multiplier) -> bool {
    match rule {
        CheckRule::Straight => true,
        CheckRule::Double => m == Multiplier::Double,
        CheckRule::Master => matches!(m, Multiplier::Double | Multiplier::Triple),
    }
}

/// Keeps a raw keypad value inside `{0, 1..=20, 25}`. Anything else is a miss.
#[must_use]
pub fn clamp_value(raw: i32) -> u8 {
    match u8::try_from(raw) {
        Ok(v) if v <= MAX_SEGMENT || v == BULL => v,
        _ => 0,
    }
}

/// Wins needed to take a match of the given format. Values below one
/// are treated as one.
#[must_use]
pub fn format_target(format: &MatchFormat) -> u32 {
    match *format {
        MatchFormat::FirstTo(n) => n.max(1),
        MatchFormat::BestOf(n) => n.max(1) / 2 + 1,
    }
}

/// How a single X01 dart resolves.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ThrowOutcome {
    /// The dart is recorded; `counts` is false while the player has not
    /// checked in yet.
    Normal { counts: bool, remaining: u32 },
    /// The dart finishes the leg.
    Checkout,
    /// Overshoot, illegal finish, or a leftover that can't be finished.
    Bust,
}

/// Classifies an X01 dart worth `value * m` against a player's `remaining`.
#[must_use]
pub fn classify_x01_throw(
    remaining: u32,
    has_checked_in: bool,
    value: u8,
    m: Multiplier,
    check_in: CheckRule,
    check_out: CheckRule,
) -> ThrowOutcome {
    let counts = has_checked_in || can_check_in(check_in, m);
    if !counts {
        return ThrowOutcome::Normal {
            counts,
            remaining,
        };
    }

    let points = u32::from(value) * m.factor();
    let Some(next) = remaining.checked_sub(points) else {
        return ThrowOutcome::Bust;
    };

    match next {
        0 if can_check_out(check_out, m) => ThrowOutcome::Checkout,
        0 => ThrowOutcome::Bust,
        // A single point can't be finished with a double or better.
        1 if check_out != CheckRule::Straight => ThrowOutcome::Bust,
        _ => ThrowOutcome::Normal {
            counts,
            remaining: next,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: [CheckRule; 3] = [CheckRule::Straight, CheckRule::Double, CheckRule::Master];
    const MULTIPLIERS: [Multiplier; 3] = [Multiplier::Single, Multiplier::Double, Multiplier::Triple];

    #[test]
    fn test_check_rule_truth_table() {
        let expected = [
            // single, double, triple
            [true, true, true],
            [false, true, false],
            [false, true, true],
        ];
        for (rule, row) in RULES.iter().zip(expected) {
            for (m, allowed) in MULTIPLIERS.iter().zip(row) {
                assert_eq!(can_check_in(*rule, *m), allowed, "check in {rule} {m}");
                assert_eq!(can_check_out(*rule, *m), allowed, "check out {rule} {m}");
            }
        }
    }

    #[test]
    fn test_clamp_value() {
        assert_eq!(clamp_value(0), 0);
        assert_eq!(clamp_value(1), 1);
        assert_eq!(clamp_value(20), 20);
        assert_eq!(clamp_value(25), 25);
        assert_eq!(clamp_value(21), 0);
        assert_eq!(clamp_value(24), 0);
        assert_eq!(clamp_value(50), 0);
        assert_eq!(clamp_value(-5), 0);
        assert_eq!(clamp_value(300), 0);
    }

    #[test]
    fn test_format_target() {
        assert_eq!(format_target(&MatchFormat::FirstTo(5)), 5);
        assert_eq!(format_target(&MatchFormat::BestOf(5)), 3);
        assert_eq!(format_target(&MatchFormat::BestOf(4)), 3);
        assert_eq!(format_target(&MatchFormat::BestOf(1)), 1);
        assert_eq!(format_target(&MatchFormat::BestOf(0)), 1);
        assert_eq!(format_target(&MatchFormat::FirstTo(0)), 1);
    }

    #[test]
    fn test_double_out_checkout() {
        let outcome = classify_x01_throw(
            40,
            true,
            20,
            Multiplier::Double,
            CheckRule::Straight,
            CheckRule::Double,
        );
        assert_eq!(outcome, ThrowOutcome::Checkout);
    }

    #[test]
    fn test_single_finish_on_double_out_busts() {
        let outcome = classify_x01_throw(
            20,
            true,
            20,
            Multiplier::Single,
            CheckRule::Straight,
            CheckRule::Double,
        );
        assert_eq!(outcome, ThrowOutcome::Bust);
    }

    #[test]
    fn test_overshoot_busts() {
        let outcome = classify_x01_throw(
            3,
            true,
            20,
            Multiplier::Single,
            CheckRule::Straight,
            CheckRule::Straight,
        );
        assert_eq!(outcome, ThrowOutcome::Bust);
    }

    #[test]
    fn test_leaving_one_busts_unless_straight_out() {
        let double_out = classify_x01_throw(
            21,
            true,
            20,
            Multiplier::Single,
            CheckRule::Straight,
            CheckRule::Double,
        );
        assert_eq!(double_out, ThrowOutcome::Bust);

        let master_out = classify_x01_throw(
            21,
            true,
            20,
            Multiplier::Single,
            CheckRule::Straight,
            CheckRule::Master,
        );
        assert_eq!(master_out, ThrowOutcome::Bust);

        let straight_out = classify_x01_throw(
            21,
            true,
            20,
            Multiplier::Single,
            CheckRule::Straight,
            CheckRule::Straight,
        );
        assert_eq!(
            straight_out,
            ThrowOutcome::Normal {
                counts: true,
                remaining: 1
            }
        );
    }

    #[test]
    fn test_dart_before_check_in_does_not_count() {
        let outcome = classify_x01_throw(
            501,
            false,
            20,
            Multiplier::Triple,
            CheckRule::Double,
            CheckRule::Double,
        );
        assert_eq!(
            outcome,
            ThrowOutcome::Normal {
                counts: false,
                remaining: 501
            }
        );
    }

    #[test]
    fn test_master_in_accepts_treble() {
        let outcome = classify_x01_throw(
            501,
            false,
            20,
            Multiplier::Triple,
            CheckRule::Master,
            CheckRule::Double,
        );
        assert_eq!(
            outcome,
            ThrowOutcome::Normal {
                counts: true,
                remaining: 441
            }
        );
    }

    #[test]
    fn test_master_out_finishes_on_treble() {
        let outcome = classify_x01_throw(
            60,
            true,
            20,
            Multiplier::Triple,
            CheckRule::Straight,
            CheckRule::Master,
        );
        assert_eq!(outcome, ThrowOutcome::Checkout);
    }

    #[test]
    fn test_check_in_dart_can_finish_the_leg() {
        let outcome = classify_x01_throw(
            50,
            false,
            25,
            Multiplier::Double,
            CheckRule::Double,
            CheckRule::Double,
        );
        assert_eq!(outcome, ThrowOutcome::Checkout);
    }
}
