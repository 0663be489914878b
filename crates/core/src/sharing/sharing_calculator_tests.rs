use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::sharing_calculator::{canceled_share, savings_of, share_of, total_member_count};
use crate::plans::plans_model::RenewalFrequency;

#[test]
fn owner_is_always_counted() {
    assert_eq!(total_member_count(0), 1);
    assert_eq!(total_member_count(2), 3);
}

#[test]
fn share_divides_across_owner_and_accepted_members() {
    // $30 plan, 2 accepted members + owner => $10.00 each.
    assert_eq!(share_of(dec!(30), 2), dec!(10.00));
    assert_eq!(savings_of(dec!(30), 2), dec!(20.00));
}

#[test]
fn unshared_plan_has_zero_savings() {
    assert_eq!(savings_of(dec!(15.99), 0), Decimal::ZERO);
    assert_eq!(share_of(dec!(15.99), 0), dec!(15.99));
}

#[test]
fn share_rounds_half_away_from_zero() {
    // 10 / 3 = 3.333... -> 3.33; 0.125 midpoint cases round away.
    assert_eq!(share_of(dec!(10), 2), dec!(3.33));
    assert_eq!(share_of(dec!(0.25), 1), dec!(0.13));
}

#[test]
fn share_times_member_count_stays_within_rounding_tolerance() {
    for (cost, accepted) in [
        (dec!(30), 2usize),
        (dec!(9.99), 3),
        (dec!(100), 6),
        (dec!(0.05), 4),
    ] {
        let members = total_member_count(accepted);
        let reconstructed = share_of(cost, accepted) * Decimal::from(members);
        let tolerance = dec!(0.01) * Decimal::from(members);
        assert!(
            (reconstructed - cost).abs() <= tolerance,
            "cost {} accepted {}: reconstructed {}",
            cost,
            accepted,
            reconstructed
        );
    }
}

#[test]
fn canceled_share_uses_stored_member_count_first() {
    assert_eq!(
        canceled_share(dec!(30), 2, RenewalFrequency::Yearly),
        dec!(10.00)
    );
}

#[test]
fn canceled_share_falls_back_to_monthly_heuristic() {
    assert_eq!(
        canceled_share(dec!(20), 0, RenewalFrequency::Monthly),
        dec!(10.00)
    );
}

#[test]
fn canceled_share_falls_back_to_full_cost() {
    assert_eq!(
        canceled_share(dec!(99.90), 0, RenewalFrequency::Yearly),
        dec!(99.90)
    );
}
