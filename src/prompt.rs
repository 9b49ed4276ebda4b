/// Instruction text sent to the model. `{number}` is left for the model to fill in.
pub const BUSINESS_IDEA_PROMPT: &str = r#"
You are an innovative business strategist and entrepreneur. Your task is to generate creative and viable business ideas for the {domain} domain.

Please generate exactly 5 unique business ideas following this format for each idea:

**Business Idea {number}:**
- **Business Name:** [Creative and memorable name]
- **Description:** [2-3 sentences describing the core concept and value proposition]
- **Target Audience:** [Specific demographic or market segment]
- **Revenue Streams:** [List 2-3 potential ways to generate income]

Requirements:
- Each idea should be innovative and address real market needs
- Focus on scalability and modern market trends
- Include both B2B and B2C opportunities where relevant
- Consider technology integration and sustainability aspects
- Make sure each idea is distinct and not repetitive

Domain: {domain}

Please provide creative, well-thought-out business ideas that could realistically be implemented in today's market.
"#;

const DOMAIN_PLACEHOLDER: &str = "{domain}";

/// Domains suggested to users who are not sure what to ask for.
pub const EXAMPLE_DOMAINS: &[&str] = &[
    "sustainable fashion",
    "personalized nutrition",
    "remote work tools",
    "mental health technology",
    "urban agriculture",
    "elderly care services",
    "educational technology",
    "renewable energy",
    "fintech solutions",
    "smart home automation",
];

/// Fill the template with `domain`. Other placeholders stay as literal text.
pub fn build(domain: &str) -> String {
    BUSINESS_IDEA_PROMPT.replace(DOMAIN_PLACEHOLDER, domain)
}
