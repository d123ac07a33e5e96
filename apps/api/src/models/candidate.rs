use serde::{Deserialize, Serialize};

/// Hosts that list companies rather than being one (professional networks,
/// freelance marketplaces, review aggregators).
pub const EXCLUDED_DOMAINS: &[&str] = &["linkedin.com", "clutch.co", "upwork.com"];

/// One organic result returned by the search capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// A company to validate, derived from a search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub url: String,
}

impl Candidate {
    /// Builds a candidate from a search hit. Returns `None` when the hit has no
    /// URL or points at an excluded listing site.
    pub fn from_hit(hit: &SearchHit) -> Option<Self> {
        let url = hit.url.trim();
        if url.is_empty() || is_excluded(url) {
            return None;
        }
        let name = match hit.title.trim() {
            "" => "Unknown",
            title => title,
        };
        Some(Self {
            name: name.to_string(),
            url: url.to_string(),
        })
    }
}

fn is_excluded(url: &str) -> bool {
    let url = url.to_lowercase();
    EXCLUDED_DOMAINS.iter().any(|domain| url.contains(domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, url: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            url: url.to_string(),
            snippet: String::new(),
        }
    }

    #[test]
    fn test_from_hit_keeps_company_site() {
        let candidate = Candidate::from_hit(&hit("Acme Consulting", "https://acme.com")).unwrap();
        assert_eq!(candidate.name, "Acme Consulting");
        assert_eq!(candidate.url, "https://acme.com");
    }

    #[test]
    fn test_from_hit_drops_empty_url() {
        assert!(Candidate::from_hit(&hit("Acme", "  ")).is_none());
    }

    #[test]
    fn test_from_hit_drops_listing_sites() {
        assert!(Candidate::from_hit(&hit("Acme", "https://www.linkedin.com/company/acme")).is_none());
        assert!(Candidate::from_hit(&hit("Top firms", "https://clutch.co/it-services")).is_none());
        assert!(Candidate::from_hit(&hit("Hire", "https://www.Upwork.com/hire")).is_none());
    }

    #[test]
    fn test_from_hit_defaults_missing_title() {
        let candidate = Candidate::from_hit(&hit("", "https://acme.com")).unwrap();
        assert_eq!(candidate.name, "Unknown");
    }
}
