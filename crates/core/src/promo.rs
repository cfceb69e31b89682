//! Promo code redemption rules.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Why a promo code could not be redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoRejection {
    Unknown,
    NotYetActive,
    Expired,
    AlreadyUsed,
}

impl PromoRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::NotYetActive => "not_yet_active",
            Self::Expired => "expired",
            Self::AlreadyUsed => "already_used",
        }
    }
}

impl std::fmt::Display for PromoRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PromoRejection> for CoreError {
    fn from(reason: PromoRejection) -> Self {
        CoreError::PromoRejected(reason)
    }
}

/// Canonical form used for lookups: trimmed and upper-cased.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Decide whether a known code may be redeemed by this user right now.
///
/// The window is checked before prior use, so an expired code reports
/// `Expired` even for a user who already redeemed it.
pub fn check_redeemable(
    starts_at: Timestamp,
    ends_at: Timestamp,
    already_redeemed: bool,
    now: Timestamp,
) -> Result<(), PromoRejection> {
    if now < starts_at {
        return Err(PromoRejection::NotYetActive);
    }
    if now >= ends_at {
        return Err(PromoRejection::Expired);
    }
    if already_redeemed {
        return Err(PromoRejection::AlreadyUsed);
    }
    Ok(())
}
