//! Platform norms and author-type context appended to the prompt.

use crate::domain::settings::{AuthorType, Platform};

/// Points the classifier should weigh for a platform.
pub fn platform_guidelines(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Twitter => &[
            "Character limit creates compression issues",
            "Retweets amplify controversy quickly",
            "Thread context matters",
            "Hashtag risks and trending topics",
            "Real-time nature increases sensitivity",
        ],
        Platform::LinkedIn => &[
            "Professional network expectations",
            "Career impact considerations",
            "Industry-specific sensitivities",
            "Professional image maintenance",
            "B2B audience context",
        ],
        Platform::Instagram => &[
            "Visual content context matters",
            "Stories vs. posts vs. reels differences",
            "Influencer culture considerations",
            "Visual storytelling risks",
            "Engagement patterns impact",
        ],
        Platform::Facebook => &[
            "Mixed personal/professional networks",
            "Algorithm amplification risks",
            "Older demographic considerations",
            "Community group dynamics",
            "Privacy settings impact",
        ],
        Platform::YouTube => &[
            "Long-form content analysis",
            "Monetization implications",
            "Creator community standards",
            "Comment section risks",
            "Algorithm recommendation impact",
        ],
        Platform::TikTok => &[
            "Gen Z audience sensitivity",
            "Viral potential amplification",
            "Short-form content compression",
            "Trend participation risks",
            "Music and sound context",
        ],
        Platform::General => &[
            "Consider platform norms and community standards",
            "Factor in audience demographics and expectations",
            "Account for content format and constraints",
            "Consider viral potential and reach",
        ],
    }
}

/// Reputation factors that apply to an author type.
pub fn author_context(author_type: AuthorType) -> &'static [&'static str] {
    match author_type {
        AuthorType::Individual => &[
            "Personal brand impact",
            "Friend/family network considerations",
            "Limited reach but personal reputation risk",
        ],
        AuthorType::PublicFigure => &[
            "High visibility and scrutiny",
            "Media amplification risk",
            "Fan base expectations",
            "Career and endorsement impact",
        ],
        AuthorType::Corporate => &[
            "Brand reputation impact",
            "Stakeholder considerations",
            "Regulatory compliance",
            "Market reaction risks",
        ],
        AuthorType::Influencer => &[
            "Brand partnership risks",
            "Audience trust maintenance",
            "Platform algorithm impact",
            "Monetization concerns",
        ],
        AuthorType::Journalist => &[
            "Credibility and objectivity",
            "Editorial standards",
            "Source relationship risks",
            "Professional ethics",
        ],
        AuthorType::Politician => &[
            "Public record implications",
            "Opposition research risks",
            "Constituent expectations",
            "Electoral impact",
        ],
    }
}
