//! Keyword-driven hashtag selection.
//!
//! Categories are scanned in declaration order; every category with at least
//! one keyword contained in the lowercased caption contributes its whole tag
//! list to a deduplicated pool, from which up to [`MAX_HASHTAGS`] tags are
//! sampled. The order of the returned tags is random.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

/// Upper bound on the number of tags returned for a caption.
pub const MAX_HASHTAGS: usize = 5;

/// Returned when no category keyword occurs in the caption.
pub const FALLBACK_HASHTAGS: &str = "#Trending #ViralPost";

/// A named keyword group mapping to a fixed hashtag list.
#[derive(Debug, Clone, Copy)]
pub struct HashtagCategory {
    pub name: &'static str,
    /// Lowercase keywords, matched as substrings.
    pub keywords: &'static [&'static str],
    pub tags: &'static [&'static str],
}

impl HashtagCategory {
    /// Whether any keyword occurs in `lowered` (already lowercased).
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw))
    }
}

/// Built-in categories, in scan order.
pub const CATEGORIES: &[HashtagCategory] = &[
    HashtagCategory {
        name: "crypto",
        keywords: &[
            "bitcoin", "ethereum", "btc", "eth", "blockchain", "crypto", "altcoin", "defi", "nft",
        ],
        tags: &[
            "#Crypto",
            "#Bitcoin",
            "#Ethereum",
            "#Blockchain",
            "#DeFi",
            "#Web3",
            "#Altcoins",
            "#CryptoTrading",
            "#CryptoNews",
            "#NFTs",
            "#CryptoInvestor",
            "#DigitalAssets",
            "#HODL",
            "#BullRun",
            "#BearMarket",
        ],
    },
    HashtagCategory {
        name: "finance",
        keywords: &[
            "stock", "market", "trading", "investing", "chart", "equity", "portfolio",
        ],
        tags: &[
            "#Finance",
            "#StockMarket",
            "#Trading",
            "#Investing",
            "#Wealth",
            "#FinancialFreedom",
            "#MoneyManagement",
            "#Portfolio",
            "#DayTrading",
            "#SwingTrading",
            "#TechnicalAnalysis",
            "#FundamentalAnalysis",
            "#WealthBuilding",
            "#PassiveIncome",
        ],
    },
    HashtagCategory {
        name: "tech",
        keywords: &[
            "ai",
            "coding",
            "programming",
            "software",
            "developer",
            "startup",
            "machine learning",
        ],
        tags: &[
            "#Tech",
            "#AI",
            "#Coding",
            "#Programming",
            "#Startup",
            "#DeveloperLife",
            "#SoftwareEngineering",
            "#MachineLearning",
            "#DataScience",
            "#WebDevelopment",
            "#Innovation",
            "#Automation",
            "#FutureTech",
        ],
    },
    HashtagCategory {
        name: "fitness",
        keywords: &["gym", "workout", "training", "muscle", "fitness", "cardio"],
        tags: &[
            "#Fitness",
            "#GymLife",
            "#Workout",
            "#Training",
            "#FitLife",
            "#HealthyLifestyle",
            "#MuscleBuilding",
            "#Cardio",
            "#StrengthTraining",
            "#BodyTransformation",
            "#Discipline",
            "#Consistency",
        ],
    },
    HashtagCategory {
        name: "motivation",
        keywords: &["success", "discipline", "focus", "hustle", "mindset"],
        tags: &[
            "#Motivation",
            "#SuccessMindset",
            "#Discipline",
            "#Hustle",
            "#StayFocused",
            "#GrowthMindset",
            "#SelfImprovement",
            "#NoExcuses",
            "#DreamBig",
            "#EntrepreneurLife",
        ],
    },
    HashtagCategory {
        name: "education",
        keywords: &["study", "exam", "learning", "student", "college"],
        tags: &[
            "#StudyMode",
            "#StudentLife",
            "#Learning",
            "#Education",
            "#ExamPreparation",
            "#FocusTime",
            "#Knowledge",
            "#CareerGoals",
            "#StudyHard",
        ],
    },
    HashtagCategory {
        name: "lifestyle",
        keywords: &["life", "morning", "routine", "daily", "habits"],
        tags: &[
            "#Lifestyle",
            "#DailyRoutine",
            "#MorningRoutine",
            "#Habits",
            "#Productivity",
            "#LifeGoals",
            "#Balance",
            "#SelfGrowth",
        ],
    },
];

/// Selects relevant hashtags for a caption.
#[derive(Debug, Clone, Copy)]
pub struct HashtagMatcher {
    categories: &'static [HashtagCategory],
}

impl Default for HashtagMatcher {
    fn default() -> Self {
        Self {
            categories: CATEGORIES,
        }
    }
}

impl HashtagMatcher {
    /// Names of the categories whose keywords occur in `caption`, in scan order.
    pub fn matched_categories(&self, caption: &str) -> Vec<&'static str> {
        let lowered = caption.to_lowercase();
        self.categories
            .iter()
            .filter(|c| c.matches(&lowered))
            .map(|c| c.name)
            .collect()
    }

    /// Deduplicated union of the tag lists of every matching category.
    ///
    /// `BTreeSet` keeps the pool order stable so a seeded RNG reproduces the
    /// same selection.
    pub fn candidate_pool(&self, caption: &str) -> BTreeSet<&'static str> {
        let lowered = caption.to_lowercase();
        self.categories
            .iter()
            .filter(|c| c.matches(&lowered))
            .flat_map(|c| c.tags.iter().copied())
            .collect()
    }

    /// Space-joined hashtag string for `caption`, or [`FALLBACK_HASHTAGS`].
    pub fn select<R: Rng + ?Sized>(&self, caption: &str, rng: &mut R) -> String {
        let mut pool: Vec<&str> = self.candidate_pool(caption).into_iter().collect();
        if pool.is_empty() {
            return FALLBACK_HASHTAGS.to_string();
        }

        let amount = pool.len().min(MAX_HASHTAGS);
        let (chosen, _) = pool.partial_shuffle(rng, amount);
        chosen.join(" ")
    }
}
