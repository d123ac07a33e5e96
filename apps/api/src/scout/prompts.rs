// All LLM prompt constants for the scout pipeline.
// Templates use `{placeholder}` markers filled by `fill_template`.

/// Rubric for the partner-readiness judgment.
pub const JUDGMENT_SYSTEM: &str = "You are an expert at analyzing consulting firms and technology partners. \
Your job is to assess whether a company is partner-ready for SaaS, Cloud, AI/ML, and digital transformation work.

Focus on:
1. Partner/ecosystem language and programs
2. Outcome-based vs staff augmentation positioning
3. Consulting/strategy capabilities vs pure engineering shops
4. Quality signals (case studies, thought leadership, client focus)";

/// Placeholders: {company}, {url}, {page_content}, {json_only}
pub const JUDGMENT_PROMPT_TEMPLATE: &str = r#"Analyze this company for partner readiness:

Company: {company}
URL: {url}

{page_content}

Provide analysis in JSON format:
{
    "is_partner_ready": true/false,
    "confidence": "high/medium/low",
    "key_signals": ["signal1", "signal2", ...],
    "red_flags": ["flag1", "flag2", ...],
    "positioning": "consulting-first/engineering-first/balanced/unclear",
    "partner_evidence": "brief description of partner/ecosystem mentions",
    "outcome_focus": "brief description of outcome vs staffing language",
    "reasoning": "1-2 sentence explanation of decision"
}

{json_only}"#;

pub const OUTREACH_SYSTEM: &str = "You are an expert at crafting LinkedIn search queries to find decision-makers at consulting and technology firms. \
Generate precise search strings that will find Client Partners, Managing Directors, Practice Leads, and Delivery Leads.";

/// Placeholders: {context}, {json_only}
pub const OUTREACH_PROMPT_TEMPLATE: &str = r#"{context}

Generate 3 LinkedIn search strings to find key decision-makers at this company.
Focus on roles like: Client Partner, Managing Director, Practice Lead, Delivery Lead, VP of Partnerships, Head of Alliances.

Return as JSON array:
["search string 1", "search string 2", "search string 3"]

{json_only}"#;

pub const SUMMARY_SYSTEM: &str = "You are a strategic advisor analyzing potential technology partners. \
Provide concise, actionable insights about the companies and identify patterns.";

/// Placeholders: {count}, {companies}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Analyze these {count} validated partner candidates:

{companies}

Provide a brief strategic summary (3-4 sentences) covering:
1. Overall quality and fit of the cohort
2. Common patterns (positioning, capabilities, focus areas)
3. Top 2-3 strongest candidates and why
4. Any gaps or considerations

Keep it concise and actionable."#;
