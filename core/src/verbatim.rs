//! Curated support-interaction text.
//!
//! Customer verbatims are keyed by (category, sentiment bucket); agent
//! summaries by category. All selection is deterministic (same RNG
//! seed = same text).

use crate::rng::GeneratorRng;

/// Sentiment bucket used to pick a verbatim register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentBucket {
    Negative,
    Neutral,
    Positive,
}

impl SentimentBucket {
    /// Bucket boundaries follow the scoring model: below -0.2 reads
    /// negative, above 0.3 reads positive.
    pub fn from_score(score: f64) -> Self {
        if score < -0.2 {
            Self::Negative
        } else if score > 0.3 {
            Self::Positive
        } else {
            Self::Neutral
        }
    }
}

/// Deterministic verbatim/summary picker over curated template lists.
pub struct VerbatimCatalog;

impl VerbatimCatalog {
    /// A customer verbatim for the category and sentiment bucket, or
    /// None when the combination has no curated templates (e.g.
    /// positive complaints).
    pub fn verbatim(
        category: &str,
        bucket: SentimentBucket,
        rng: &mut GeneratorRng,
    ) -> Option<&'static str> {
        let pool = Self::verbatim_pool(category, bucket);
        if pool.is_empty() {
            None
        } else {
            Some(*rng.pick(pool))
        }
    }

    /// An agent summary line for the category.
    pub fn summary(category: &str, rng: &mut GeneratorRng) -> &'static str {
        let pool = Self::summary_pool(category);
        *rng.pick(pool)
    }

    fn verbatim_pool(category: &str, bucket: SentimentBucket) -> &'static [&'static str] {
        use SentimentBucket::*;
        match (category, bucket) {
            ("Billing", Negative) => &[
                "Why is my bill higher than last month? I didn't change anything.",
                "I was charged twice for the same thing. This is unacceptable.",
                "The autopay failed and now you're charging me a late fee?",
                "I don't understand these charges. Your pricing is confusing.",
                "You keep raising prices every year. I'm considering switching.",
            ],
            ("Billing", Neutral) => &[
                "I need to understand my bill better.",
                "Can you explain these charges?",
                "I'd like to update my payment method.",
                "When is my next payment due?",
            ],
            ("Billing", Positive) => &[
                "Thanks for the credit on my account.",
                "The new billing app makes it much easier to understand.",
                "I appreciate the autopay discount.",
            ],
            ("Technical", Negative) => &[
                "I have no service at my house. This has been going on for days.",
                "My data is so slow it's unusable. I pay for unlimited!",
                "Calls keep dropping. This is affecting my work.",
                "The 5G coverage you advertised doesn't exist where I live.",
                "Your app crashes every time I try to use it.",
            ],
            ("Technical", Neutral) => &[
                "My voicemail isn't working. Can you help?",
                "How do I set up WiFi calling?",
                "I need help transferring my data to a new phone.",
            ],
            ("Technical", Positive) => &[
                "The 5G speeds are amazing!",
                "Thanks for fixing the coverage issue in my area.",
            ],
            ("Complaint", Negative) => &[
                "I've called three times about this and nothing is resolved.",
                "Your customer service is terrible. I've been on hold for an hour.",
                "This is the worst carrier I've ever had.",
                "I want to speak to a supervisor immediately.",
                "I'm filing a complaint with the FCC.",
                "I'm switching to T-Mobile. They actually care about customers.",
            ],
            ("Complaint", Neutral) => &[
                "I'd like to formally complain about my recent experience.",
            ],
            ("Sales", Negative) => &[
                "You promised me a discount that's not on my bill.",
                "The phone I bought has issues and I want to return it.",
            ],
            ("Sales", Neutral) => &[
                "What are my upgrade options?",
                "I'm looking to add a line for my teenager.",
                "Can you compare the Blizzard and Summit plans for me?",
                "What promotions are currently available?",
            ],
            ("Sales", Positive) => &[
                "I love my new phone! Thanks for the help.",
                "The upgrade process was really smooth.",
            ],
            ("General", Neutral) => &[
                "I need to update my address.",
                "Can you tell me where the nearest store is?",
                "What's included in my plan?",
                "How do I check my data usage?",
            ],
            ("General", Positive) => &[
                "I've been a customer for years and I'm happy with the service.",
            ],
            ("Account", Negative) => &[
                "I can't access my account online.",
                "Someone made unauthorized changes to my account.",
            ],
            ("Account", Neutral) => &[
                "I need to reset my password.",
                "I'm moving and need to update my address.",
                "I need to change the name on my account.",
            ],
            _ => &[],
        }
    }

    fn summary_pool(category: &str) -> &'static [&'static str] {
        match category {
            "Billing" => &[
                "Customer inquired about recent bill increase. Explained charges and applied courtesy credit.",
                "Customer reported payment processing issue. Verified payment method and reprocessed.",
                "Customer requested plan change to reduce costs. Reviewed options and updated plan.",
                "Customer disputed overage charges. Reviewed usage and explained fair use policy.",
            ],
            "Technical" => &[
                "Customer reported service outage. Confirmed tower maintenance in area, provided estimated restoration.",
                "Customer experiencing slow data. Ran network diagnostics and reset network settings.",
                "Customer having issues with voicemail setup. Walked through configuration steps.",
                "Customer reported dropped calls. Submitted ticket for network investigation.",
            ],
            "Complaint" => &[
                "Customer expressed frustration with previous interaction. Apologized and escalated to supervisor.",
                "Customer threatened to cancel service. Reviewed account and offered retention promotion.",
                "Customer complained about wait times. Acknowledged feedback and expedited resolution.",
            ],
            "Sales" => &[
                "Customer interested in device upgrade. Reviewed eligible options and processing trade-in.",
                "Customer adding new line for family member. Set up new line with appropriate plan.",
                "Customer comparing plan options. Recommended Powder based on usage patterns.",
            ],
            "General" => &[
                "Customer requested account information. Verified identity and provided requested details.",
                "Customer asked about store locations. Provided nearest store address and hours.",
                "Customer inquiry about coverage in new area. Checked coverage map and confirmed service.",
            ],
            "Account" => &[
                "Customer needed password reset. Verified identity and sent reset link.",
                "Customer updating contact information. Made requested changes to account.",
                "Customer inquiring about authorized users. Explained process and added new user.",
            ],
            _ => &["Assisted customer with inquiry."],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{GeneratorSlot, RngBank};

    #[test]
    fn buckets_split_at_the_documented_boundaries() {
        assert_eq!(SentimentBucket::from_score(-0.5), SentimentBucket::Negative);
        assert_eq!(SentimentBucket::from_score(0.0), SentimentBucket::Neutral);
        assert_eq!(SentimentBucket::from_score(0.6), SentimentBucket::Positive);
    }

    #[test]
    fn positive_complaints_have_no_verbatim() {
        let mut rng = RngBank::new(1).for_generator(GeneratorSlot::Interaction);
        assert!(
            VerbatimCatalog::verbatim("Complaint", SentimentBucket::Positive, &mut rng).is_none()
        );
    }

    #[test]
    fn every_category_has_a_summary() {
        let mut rng = RngBank::new(1).for_generator(GeneratorSlot::Interaction);
        for category in ["Billing", "Technical", "Complaint", "Sales", "General", "Account"] {
            assert!(!VerbatimCatalog::summary(category, &mut rng).is_empty());
        }
    }
}
