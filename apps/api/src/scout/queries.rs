/// High-intent search queries for finding partner-ready consulting firms.
pub const HIGH_INTENT_QUERIES: &[&str] = &[
    r#""strategy consulting" "implementation partner""#,
    r#""product consulting" "build partner""#,
    r#""consulting firm" "engineering partners""#,
    r#"("strategy consulting" OR "implementation partner" OR "product consulting" OR "build partner" OR "consulting firm" OR "engineering partners") "United States" filetype:pdf "directory" OR "list" OR "partners""#,
    r#""digital consulting" "delivery partner""#,
    r#""digital transformation" "implementation partner""#,
    r#""transformation consulting" "execution partner""#,
    r#""consulting firm" "we partner with""#,
    r#""consulting services" "delivered by partners""#,
    r#""product studio" "development partner""#,
    r#""UX strategy" "implementation partner""#,
    r#""product discovery" "build partner""#,
    r#""innovation studio" "delivery partner""#,
    r#""design led consulting" "engineering partner""#,
    r#""white label" "software development""#,
    r#""extended delivery team" consulting"#,
    r#""execution capacity" consulting firm"#,
    r#""delivery augmentation" consulting"#,
    r#""SaaS implementation partner" consulting"#,
    r#""cloud transformation" "delivery partner""#,
    r#""AWS partner" "consulting firm""#,
    r#""scaling delivery" "consulting firm""#,
    r#""hiring engineers is hard" consulting"#,
    r#""digital consulting firm" "United States""#,
];

/// Queries selected when a run does not name its own.
pub const DEFAULT_QUERY_INDICES: &[usize] = &[0, 4];

pub fn default_queries() -> Vec<String> {
    DEFAULT_QUERY_INDICES
        .iter()
        .filter_map(|&i| HIGH_INTENT_QUERIES.get(i))
        .map(|q| q.to_string())
        .collect()
}
