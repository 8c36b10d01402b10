use crate::errors::Error;
use crate::types::FeeBreakdown;

pub const BPS_DENOMINATOR: i128 = 10_000;
/// Resolution fee charged on the disputed amount (5%).
pub const RESOLUTION_FEE_BPS: i128 = 500;
/// Arbitrators' cut of the resolution fee (70%).
pub const ARBITRATOR_SHARE_BPS: i128 = 7_000;
/// Validator-reward pool's cut of the resolution fee (20%).
pub const VALIDATOR_SHARE_BPS: i128 = 2_000;
/// Appeal bond as a fraction of the resolution fee (half, i.e. 2.5% of the amount).
pub const APPEAL_STAKE_BPS_OF_FEE: i128 = 5_000;

/// Splits the resolution fee for `amount`. The treasury absorbs rounding so
/// the three shares always sum to `total`.
pub fn calculate_fee(amount: i128) -> Result<FeeBreakdown, Error> {
    if amount < 0 {
        return Err(Error::InvalidAmount);
    }
    let total = amount
        .checked_mul(RESOLUTION_FEE_BPS)
        .ok_or(Error::InvalidAmount)?
        / BPS_DENOMINATOR;
    let arbitrator_share = total * ARBITRATOR_SHARE_BPS / BPS_DENOMINATOR;
    let validator_share = total * VALIDATOR_SHARE_BPS / BPS_DENOMINATOR;
    Ok(FeeBreakdown {
        total,
        arbitrator_share,
        validator_share,
        treasury_share: total - arbitrator_share - validator_share,
    })
}

pub fn appeal_stake(amount: i128) -> Result<i128, Error> {
    let fee = calculate_fee(amount)?;
    Ok(fee.total * APPEAL_STAKE_BPS_OF_FEE / BPS_DENOMINATOR)
}

/// Even split of `share` among `recipients`. Returns the per-recipient cut
/// and the remainder; with no recipients the whole share is remainder.
pub fn split_evenly(share: i128, recipients: u32) -> (i128, i128) {
    if recipients == 0 {
        return (0, share);
    }
    let per_recipient = share / recipients as i128;
    (per_recipient, share - per_recipient * recipients as i128)
}
