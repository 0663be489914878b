//! Cost-sharing arithmetic.
//!
//! A plan's cost is split evenly across its accepted members plus the
//! owner, who never has a member row of their own. All amounts are rounded
//! to two decimal places, half away from zero, at these functions — sums
//! downstream operate on already-rounded shares.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{MONEY_DECIMAL_PLACES, MONTHLY_FALLBACK_MEMBER_COUNT};
use crate::plans::plans_model::RenewalFrequency;

fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Total people sharing the plan: accepted members plus the owner.
/// Always at least 1, so division by zero cannot occur.
pub fn total_member_count(accepted_members: usize) -> i64 {
    accepted_members as i64 + 1
}

/// One member's share of the plan cost.
pub fn share_of(cost: Decimal, accepted_members: usize) -> Decimal {
    round_money(cost / Decimal::from(total_member_count(accepted_members)))
}

/// What a sharer avoids paying versus covering the full cost alone.
/// Zero for a plan nobody shares.
pub fn savings_of(cost: Decimal, accepted_members: usize) -> Decimal {
    if accepted_members == 0 {
        return Decimal::ZERO;
    }
    round_money(cost - share_of(cost, accepted_members))
}

/// The historical share of a canceled plan — the amount its user no longer
/// pays. Falls back when no member count was captured at cancellation:
/// stored count → monthly two-member heuristic → full cost.
pub fn canceled_share(
    cost: Decimal,
    member_count: i32,
    frequency: RenewalFrequency,
) -> Decimal {
    if member_count > 0 {
        return round_money(cost / Decimal::from(member_count as i64 + 1));
    }
    if frequency == RenewalFrequency::Monthly {
        return round_money(cost / Decimal::from(MONTHLY_FALLBACK_MEMBER_COUNT));
    }
    round_money(cost)
}
