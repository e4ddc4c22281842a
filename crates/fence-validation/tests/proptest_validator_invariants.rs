//! Property-based invariant tests for the edit policies.
//!
//! The buffer is modelled as a `String`; a correction is applied the way a
//! document's whole-content write would report it (insert when non-empty,
//! delete when empty).
//!
//! 1. Re-inserting the last accepted content is a fixed point.
//! 2. After settling, content never exceeds a non-zero max length.
//! 3. After settling, content typed since the last delete matches the rule.
//! 4. Deletions are always kept verbatim.
//! 5. Reconfiguring the rule resets the accepted value.
//! 6. The length limiter never changes content within the bound.

use fence_validation::{
    EditPolicy, IncrementalValidator, InputType, LengthLimiter, Pattern, Verdict,
};
use proptest::prelude::*;

/// Apply corrections until the policy keeps the buffer.
fn settle<P: EditPolicy>(policy: &mut P, buffer: &mut String, mut verdict: Verdict) -> usize {
    let mut rounds = 0;
    while !verdict.is_kept() {
        let Some(fix) = policy.take_correction() else {
            break;
        };
        *buffer = fix.target;
        verdict = if buffer.is_empty() {
            policy.on_delete(buffer);
            Verdict::FixedPoint
        } else {
            policy.on_insert(buffer)
        };
        rounds += 1;
    }
    rounds
}

fn type_str<P: EditPolicy>(policy: &mut P, buffer: &mut String, typed: &str) -> usize {
    let mut worst = 0;
    for ch in typed.chars() {
        buffer.push(ch);
        let verdict = policy.on_insert(buffer);
        worst = worst.max(settle(policy, buffer, verdict));
    }
    worst
}

fn input_type_strategy() -> impl Strategy<Value = InputType> {
    prop::sample::select(InputType::ALL.to_vec())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Fixed point
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reinsert_is_fixed_point(ty in input_type_strategy(), typed in "[0-9a-z.:@_-]{0,12}") {
        let mut v = IncrementalValidator::new(0, ty);
        let mut buffer = String::new();
        type_str(&mut v, &mut buffer, &typed);
        let last = v.last_accepted().to_string();
        prop_assume!(!last.is_empty());
        prop_assert_eq!(v.on_insert(&last), Verdict::FixedPoint);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2 + 3. Bounds hold after settling
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn settled_content_respects_length(max in 1usize..8, chunks in prop::collection::vec("[a-z日]{1,6}", 1..6)) {
        let mut v = IncrementalValidator::new(max, InputType::None);
        let mut buffer = String::new();
        for chunk in chunks {
            buffer.push_str(&chunk);
            let verdict = v.on_insert(&buffer);
            let rounds = settle(&mut v, &mut buffer, verdict);
            prop_assert!(rounds <= 1);
            prop_assert!(buffer.chars().count() <= max);
            prop_assert_eq!(v.last_accepted(), buffer.as_str());
        }
    }

    #[test]
    fn settled_content_matches_rule(ty in input_type_strategy(), max in 0usize..10, typed in "[0-9a-z.:@_ -]{0,16}") {
        let mut v = IncrementalValidator::new(max, ty);
        let mut buffer = String::new();
        let rounds = type_str(&mut v, &mut buffer, &typed);
        prop_assert!(rounds <= 2, "settling took {} rounds", rounds);
        // Reverting the very first keystroke empties the buffer, which some
        // rules (decimal, email, date) do not match.
        prop_assert!(buffer.is_empty() || v.accepts(&buffer), "{} kept {:?}", ty, buffer);
        prop_assert_eq!(v.last_accepted(), buffer.as_str());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Deletions are kept
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn delete_is_always_kept(ty in input_type_strategy(), typed in "[0-9]{1,6}", cut in 0usize..6) {
        let mut v = IncrementalValidator::new(0, ty);
        let mut buffer = String::new();
        type_str(&mut v, &mut buffer, &typed);
        let keep = cut.min(buffer.chars().count());
        let after: String = buffer.chars().skip(keep).collect();
        v.on_delete(&after);
        prop_assert_eq!(v.last_accepted(), after.as_str());
        prop_assert!(v.pending_correction().is_none());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Reconfiguration resets
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reconfiguration_resets(from in input_type_strategy(), to in input_type_strategy(), typed in "[0-9a-z]{0,8}") {
        let mut v = IncrementalValidator::new(0, from);
        let mut buffer = String::new();
        type_str(&mut v, &mut buffer, &typed);
        v.on_insert("!!");
        v.set_input_type(to);
        prop_assert_eq!(v.last_accepted(), "");
        prop_assert!(v.pending_correction().is_none());

        type_str(&mut v, &mut buffer, &typed);
        v.set_pattern(Some(Pattern::new("[a-z]*").unwrap()));
        prop_assert_eq!(v.last_accepted(), "");
        prop_assert_eq!(v.input_type(), to);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Length limiter
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn limiter_only_truncates(max in 0usize..6, typed in "\\PC{0,10}") {
        let mut l = LengthLimiter::new(max);
        let mut buffer = String::new();
        type_str(&mut l, &mut buffer, &typed);
        let expected: String = if max == 0 {
            typed.clone()
        } else {
            typed.chars().take(max).collect()
        };
        prop_assert_eq!(buffer, expected);
    }
}
