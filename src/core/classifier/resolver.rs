//! Merges the duplicate and blur verdicts into one disposition.

use super::types::{BlurTier, Disposition};

/// Resolve one image's final disposition.
///
/// A duplicate that is also blurred goes to the duplicate folder only when
/// `prefer_duplicate_over_blur` is set; otherwise its blur tier wins.
pub fn resolve(is_duplicate: bool, tier: BlurTier, prefer_duplicate_over_blur: bool) -> Disposition {
    match (is_duplicate, tier.disposition()) {
        (true, Some(_)) if prefer_duplicate_over_blur => Disposition::Duplicate,
        (_, Some(blur)) => blur,
        (true, None) => Disposition::Duplicate,
        (false, None) => Disposition::Keep,
    }
}
