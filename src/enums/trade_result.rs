use strum_macros::Display;

/// The verdict for a single incoming trade offer.
#[derive(Display, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum TradeResult {
    /// The offer was accepted.
    Accepted,
    /// The sender is blacklisted from trading with us.
    Blacklisted,
    /// The offer was left untouched.
    Ignored,
    /// The offer did not pass evaluation.
    Rejected,
    /// The offer could not be evaluated or acted on right now and is eligible for a retry on
    /// the next pass.
    TryAgain,
}
