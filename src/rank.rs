/// Presentation tier of a board position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankTier {
    Gold,
    Silver,
    Bronze,
    Default,
}

impl RankTier {
    pub fn from_rank(rank: usize) -> Self {
        match rank {
            1 => RankTier::Gold,
            2 => RankTier::Silver,
            3 => RankTier::Bronze,
            _ => RankTier::Default,
        }
    }

    /// Style class for the tier
    pub fn class(&self) -> &'static str {
        match self {
            RankTier::Gold => "rank-gold",
            RankTier::Silver => "rank-silver",
            RankTier::Bronze => "rank-bronze",
            RankTier::Default => "rank-default",
        }
    }
}

/// Medal for the top three, `#<rank>` otherwise
pub fn rank_badge(rank: usize) -> String {
    match RankTier::from_rank(rank) {
        RankTier::Gold => "🥇".to_string(),
        RankTier::Silver => "🥈".to_string(),
        RankTier::Bronze => "🥉".to_string(),
        RankTier::Default => format!("#{}", rank),
    }
}

pub fn rank_class(rank: usize) -> &'static str {
    RankTier::from_rank(rank).class()
}

/// Share of `max_contributions`, as a percentage clamped to [0, 100].
///
/// A zero maximum gives a non-finite ratio, which clamps to 100.
pub fn progress_percentage(contributions: u64, max_contributions: u64) -> f64 {
    let ratio = contributions as f64 / max_contributions as f64 * 100.0;

    if ratio.is_finite() {
        ratio.clamp(0.0, 100.0)
    } else {
        100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_badges() {
        assert_eq!(rank_badge(1), "🥇");
        assert_eq!(rank_badge(2), "🥈");
        assert_eq!(rank_badge(3), "🥉");
        assert_eq!(rank_badge(4), "#4");
        assert_eq!(rank_badge(57), "#57");
    }

    #[test]
    fn test_rank_classes() {
        assert_eq!(rank_class(1), "rank-gold");
        assert_eq!(rank_class(2), "rank-silver");
        assert_eq!(rank_class(3), "rank-bronze");
        for rank in 4..50 {
            assert_eq!(rank_class(rank), "rank-default");
            assert_eq!(rank_badge(rank), format!("#{}", rank));
        }
    }

    #[test]
    fn test_progress_percentage() {
        assert_eq!(progress_percentage(50, 200), 25.0);
        assert_eq!(progress_percentage(0, 10), 0.0);
        assert_eq!(progress_percentage(10, 10), 100.0);
        assert_eq!(progress_percentage(15, 10), 100.0);
    }

    #[test]
    fn test_progress_percentage_in_range() {
        for max in 1..40u64 {
            for x in 0..60u64 {
                let pct = progress_percentage(x, max);
                assert!((0.0..=100.0).contains(&pct));
                if x >= max {
                    assert_eq!(pct, 100.0);
                }
            }
        }
    }

    #[test]
    fn test_progress_percentage_zero_max() {
        assert_eq!(progress_percentage(5, 0), 100.0);
        assert_eq!(progress_percentage(0, 0), 100.0);
    }
}
