//! Types for the classifier module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What blur is measured on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlurMode {
    /// One variance for the whole frame
    WholeImage,
    /// Per-face variances, falling back to the whole frame when no face is found
    #[default]
    FaceAware,
}

/// Outcome of blur classification for one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlurTier {
    None,
    Blurred,
    PartiallyBlurred,
    SlightlyBlurred,
}

impl BlurTier {
    /// The disposition this tier routes to, if any
    pub fn disposition(self) -> Option<Disposition> {
        match self {
            BlurTier::None => None,
            BlurTier::Blurred => Some(Disposition::Blurred),
            BlurTier::PartiallyBlurred => Some(Disposition::PartiallyBlurred),
            BlurTier::SlightlyBlurred => Some(Disposition::SlightlyBlurred),
        }
    }
}

/// Final routing decision for one successfully analyzed image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Disposition {
    Keep,
    Duplicate,
    Blurred,
    PartiallyBlurred,
    SlightlyBlurred,
}

impl Disposition {
    /// The four dispositions that produce a move
    pub const ROUTED: [Disposition; 4] = [
        Disposition::Blurred,
        Disposition::PartiallyBlurred,
        Disposition::SlightlyBlurred,
        Disposition::Duplicate,
    ];

    /// Short reason label used in logs and reports
    pub fn reason(self) -> &'static str {
        match self {
            Disposition::Keep => "keep",
            Disposition::Duplicate => "duplicate",
            Disposition::Blurred => "blurred",
            Disposition::PartiallyBlurred => "partialBlurred",
            Disposition::SlightlyBlurred => "slightlyBlurred",
        }
    }

    pub fn is_keep(self) -> bool {
        self == Disposition::Keep
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}
