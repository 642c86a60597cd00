//! Analysis prompt construction.

use crate::domain::risk::{RiskCategory, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
use crate::domain::settings::AnalysisSettings;

use super::guidelines::{author_context, platform_guidelines};

/// System message sent with every analysis.
pub const SYSTEM_PROMPT: &str = "You are an expert content analyst specializing in social media \
risk assessment. Always respond with valid JSON.";

/// Inputs to one analysis prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    /// Normalized content.
    pub content: &'a str,
    pub settings: &'a AnalysisSettings,
    /// Summary of images and metadata for URL content.
    pub visual_context: Option<&'a str>,
}

/// Renders the user prompt. Deterministic for identical input.
pub fn build_analysis_prompt(input: PromptInput<'_>) -> String {
    let settings = input.settings;
    let mut prompt = String::with_capacity(input.content.len() + 4096);

    prompt.push_str(
        "Analyze the following content for potential \"cancellation\" risk and provide a \
         comprehensive assessment.\n\n",
    );
    prompt.push_str(&format!("CONTENT TO ANALYZE:\n\"{}\"\n\n", input.content));

    if let Some(visual) = input.visual_context.filter(|v| !v.trim().is_empty()) {
        prompt.push_str(&format!("VISUAL CONTEXT:\n{}\n\n", visual.trim()));
    }

    prompt.push_str("ANALYSIS CONTEXT:\n");
    prompt.push_str(&format!("- Target Platform: {}\n", settings.platform.label()));
    prompt.push_str(&format!("- Author Type: {}\n", settings.author_type.label()));
    prompt.push_str(&format!("- Audience Size: {}\n", settings.audience_size.label()));
    prompt.push_str(&format!("- Analysis Sensitivity: {}\n\n", settings.sensitivity));

    push_bullets(
        &mut prompt,
        &format!("{} GUIDELINES:", settings.platform.label().to_uppercase()),
        platform_guidelines(settings.platform),
        "- ",
    );
    push_bullets(
        &mut prompt,
        &format!("{} CONTEXT:", settings.author_type.label().to_uppercase()),
        author_context(settings.author_type),
        "- ",
    );

    prompt.push_str("RISK ASSESSMENT FRAMEWORK:\n");
    prompt.push_str("Analyze the content across these categories with the specified weights:\n\n");
    for (i, category) in RiskCategory::ALL.iter().enumerate() {
        push_bullets(
            &mut prompt,
            &format!(
                "{}. {} (Weight: {}%)",
                i + 1,
                category.label(),
                category.weight_percent()
            ),
            category.criteria(),
            "   - ",
        );
    }

    prompt.push_str(INSTRUCTIONS);
    prompt.push_str(&response_format());
    prompt.push_str(&format!(
        "\nRISK LEVEL GUIDELINES:\n\
         - Low Risk (0-{low_max}%): Minimal concern, generally safe to post\n\
         - Medium Risk ({medium}-{medium_max}%): Potential controversy, suggest revisions\n\
         - High Risk ({high}-100%): Immediate backlash likely, recommend not posting\n",
        low_max = MEDIUM_RISK_THRESHOLD - 1,
        medium = MEDIUM_RISK_THRESHOLD,
        medium_max = HIGH_RISK_THRESHOLD - 1,
        high = HIGH_RISK_THRESHOLD,
    ));
    prompt.push_str(NOTES);

    prompt
}

/// Heading line, one prefixed line per item, then a blank line.
fn push_bullets(prompt: &mut String, heading: &str, items: &[&str], prefix: &str) {
    prompt.push_str(heading);
    prompt.push('\n');
    for item in items {
        prompt.push_str(prefix);
        prompt.push_str(item);
        prompt.push('\n');
    }
    prompt.push('\n');
}

const INSTRUCTIONS: &str = "INSTRUCTIONS:
1. Rate each category from 0-100 based on risk level
2. Calculate overall risk percentage (0-100)
3. Identify specific risk factors
4. Provide actionable recommendations
5. Consider the author type and platform context
6. If visual context is provided, consider images, metadata, and visual elements in your analysis
7. Be thorough but concise

";

const NOTES: &str = "
IMPORTANT NOTES:
- Consider the sensitivity setting: higher values = more conservative analysis
- Account for platform-specific norms and community standards
- Factor in author type and audience reach
- Be objective and evidence-based in your assessment
- Focus on actionable insights, not just criticism
";

fn response_format() -> String {
    let categories = RiskCategory::ALL
        .iter()
        .map(|c| format!("        \"{}\": <0-100>", c.label()))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "RESPONSE FORMAT:
Respond ONLY with valid JSON in this exact format:
{{
    \"risk_percentage\": <0-100>,
    \"risk_level\": \"<Low/Medium/High>\",
    \"categories\": {{
{}
    }},
    \"risk_factors\": [\"<specific risk factor>\", \"...\"],
    \"recommendations\": [\"<actionable recommendation>\", \"...\"],
    \"explanation\": \"<detailed explanation of the analysis and reasoning>\"
}}
",
        categories
    )
}
