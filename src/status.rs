use serde::Serialize;

pub const REQUIRED_PERCENTAGE: u8 = 75;
const CAUTION_PERCENTAGE: u8 = 65;

/// Pass/fail tier against the minimum attendance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusTier {
    Good,
    Warning,
}

impl StatusTier {
    pub fn headline(self) -> &'static str {
        match self {
            StatusTier::Good => "Good Job",
            StatusTier::Warning => "⚠ Warning",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            StatusTier::Good => "Keep up the good work!",
            StatusTier::Warning => "Minimum 75% attendance required",
        }
    }
}

pub fn classify_status(percentage: u8) -> StatusTier {
    if percentage >= REQUIRED_PERCENTAGE {
        StatusTier::Good
    } else {
        StatusTier::Warning
    }
}

/// Visual scale used to tint percentages. Independent of [`StatusTier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorBand {
    Green,
    Yellow,
    Red,
}

impl ColorBand {
    pub fn hex(self) -> &'static str {
        match self {
            ColorBand::Green => "#4CAF50",
            ColorBand::Yellow => "#FFC107",
            ColorBand::Red => "#F44336",
        }
    }
}

pub fn color_band(percentage: u8) -> ColorBand {
    match percentage {
        p if p >= REQUIRED_PERCENTAGE => ColorBand::Green,
        p if p >= CAUTION_PERCENTAGE => ColorBand::Yellow,
        _ => ColorBand::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_threshold_is_seventy_five() {
        assert_eq!(classify_status(75), StatusTier::Good);
        assert_eq!(classify_status(100), StatusTier::Good);
        assert_eq!(classify_status(74), StatusTier::Warning);
        assert_eq!(classify_status(0), StatusTier::Warning);
    }

    #[test]
    fn color_bands_follow_three_tiers() {
        assert_eq!(color_band(90), ColorBand::Green);
        assert_eq!(color_band(75), ColorBand::Green);
        assert_eq!(color_band(74), ColorBand::Yellow);
        assert_eq!(color_band(65), ColorBand::Yellow);
        assert_eq!(color_band(64), ColorBand::Red);
        assert_eq!(color_band(0), ColorBand::Red);
    }

    #[test]
    fn headlines_match_tier() {
        assert_eq!(StatusTier::Good.headline(), "Good Job");
        assert_eq!(StatusTier::Warning.headline(), "⚠ Warning");
    }

    #[test]
    fn yellow_band_still_warns() {
        let percentage = 70;
        assert_eq!(color_band(percentage), ColorBand::Yellow);
        assert_eq!(classify_status(percentage), StatusTier::Warning);
        assert_eq!(
            classify_status(percentage).message(),
            "Minimum 75% attendance required"
        );
    }
}
