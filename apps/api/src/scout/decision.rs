//! Validation Decision Engine: turns keyword signals and an optional LLM
//! judgment into an accept/reject decision with reasons and evidence.
//!
//! Sequence (order is part of the contract):
//! 1. no homepage content → reject
//! 2. body-shop filter → reject, overriding every other signal
//! 3. keyword baseline: each producer may contribute a reason (+ evidence)
//! 4. LLM judgment: can force fit, set or downgrade confidence, and veto only
//!    when the baseline found nothing
//! 5. still no fit → reject
//!
//! Pure and deterministic: identical signals always yield an identical decision.

use crate::models::record::Confidence;
use crate::scout::judgment::{LlmJudgment, Positioning};
use crate::scout::signals::{extract_signals, KeywordMatch, Vocabulary};

const SIGNAL_PREVIEW: usize = 3;
const RED_FLAG_PREVIEW: usize = 2;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Everything the engine looks at for one candidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalSet {
    /// Lower-cased homepage text; `None` when the homepage was unavailable.
    pub homepage_text: Option<String>,
    /// Partner vocabulary over the homepage (positive side only).
    pub partner: KeywordMatch,
    /// Outcome (positive) vs hiring (negative) vocabulary over the homepage.
    pub outcome: KeywordMatch,
    /// Consulting (positive) vs engineering (negative) roles over the careers
    /// page; `None` unless a careers page was found and fetched.
    pub careers: Option<KeywordMatch>,
    pub judgment: Option<LlmJudgment>,
}

/// Accumulated outcome of an accepted candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub reasons: Vec<String>,
    pub evidence: Vec<String>,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NoHomepageContent,
    BodyShop {
        engineering_roles: usize,
        consulting_roles: usize,
    },
    LlmVeto {
        reasoning: String,
    },
    NoFitSignals,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Accepted(Assessment),
    Rejected(Rejection),
}

/// One producer's contribution to the baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Contribution {
    reason: &'static str,
    evidence: Option<String>,
}

type SignalProducer = fn(&SignalSet) -> Option<Contribution>;

/// Baseline producers, in reason order.
const BASELINE_PRODUCERS: &[SignalProducer] = &[
    outcome_language,
    partner_language,
    consulting_roles,
    consulting_positioning,
];

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

/// Holds the injected vocabularies; all decision logic is free of I/O.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    vocabulary: Vocabulary,
}

impl DecisionEngine {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Runs the keyword extractors over the fetched page texts. The judgment
    /// slot is left empty for the caller to fill.
    pub fn collect_signals(&self, homepage_text: Option<&str>, careers_text: Option<&str>) -> SignalSet {
        let Some(homepage_text) = homepage_text else {
            return SignalSet::default();
        };
        let vocab = &self.vocabulary;
        let no_terms: &[String] = &[];

        SignalSet {
            homepage_text: Some(homepage_text.to_lowercase()),
            partner: extract_signals(homepage_text, &vocab.partner, no_terms),
            outcome: extract_signals(homepage_text, &vocab.outcome, &vocab.hiring),
            careers: careers_text.map(|text| {
                extract_signals(text, &vocab.consulting_roles, &vocab.engineering_roles)
            }),
            judgment: None,
        }
    }

    /// The body-shop filter: engineering roles more than double the consulting
    /// roles on a fetched careers page, and no "consulting" on the homepage.
    pub fn body_shop_rejection(&self, signals: &SignalSet) -> Option<Rejection> {
        let careers = signals.careers.as_ref()?;
        let engineering_roles = careers.negative_matches.len();
        let consulting_roles = careers.positive_matches.len();
        let mentions_consulting = signals
            .homepage_text
            .as_deref()
            .is_some_and(|text| text.contains("consulting"));

        (engineering_roles > consulting_roles * 2 && !mentions_consulting).then_some(
            Rejection::BodyShop {
                engineering_roles,
                consulting_roles,
            },
        )
    }

    pub fn decide(&self, signals: &SignalSet) -> Decision {
        if signals.homepage_text.is_none() {
            return Decision::Rejected(Rejection::NoHomepageContent);
        }

        if let Some(rejection) = self.body_shop_rejection(signals) {
            return Decision::Rejected(rejection);
        }

        let (reasons, evidence) = BASELINE_PRODUCERS
            .iter()
            .filter_map(|producer| producer(signals))
            .fold(
                (Vec::new(), Vec::new()),
                |(mut reasons, mut evidence), contribution| {
                    reasons.push(contribution.reason.to_string());
                    evidence.extend(contribution.evidence);
                    (reasons, evidence)
                },
            );

        let mut assessment = Assessment {
            reasons,
            evidence,
            confidence: Confidence::Medium,
        };
        let baseline_fit = !assessment.reasons.is_empty();

        let is_fit = match &signals.judgment {
            None => baseline_fit,
            Some(judgment) if judgment.is_partner_ready => {
                apply_endorsement(&mut assessment, judgment);
                true
            }
            Some(judgment) => {
                if !baseline_fit {
                    return Decision::Rejected(Rejection::LlmVeto {
                        reasoning: judgment.reasoning.clone(),
                    });
                }
                assessment.confidence = Confidence::Low;
                if !judgment.reasoning.trim().is_empty() {
                    assessment
                        .evidence
                        .push(format!("Note: {}", judgment.reasoning.trim()));
                }
                true
            }
        };

        if !is_fit {
            return Decision::Rejected(Rejection::NoFitSignals);
        }
        Decision::Accepted(assessment)
    }
}

fn apply_endorsement(assessment: &mut Assessment, judgment: &LlmJudgment) {
    assessment.confidence = judgment.confidence;

    if judgment.positioning != Positioning::Unclear {
        assessment
            .reasons
            .push(format!("LLM: {} positioning", judgment.positioning));
    } else if assessment.reasons.is_empty() {
        // Accepted records always carry at least one reason.
        assessment.reasons.push("LLM: assessed as partner-ready".to_string());
    }
    if !judgment.key_signals.is_empty() {
        assessment.evidence.push(format!(
            "Signals: {}",
            preview(&judgment.key_signals, SIGNAL_PREVIEW)
        ));
    }
    if !judgment.red_flags.is_empty() {
        assessment.evidence.push(format!(
            "Risks: {}",
            preview(&judgment.red_flags, RED_FLAG_PREVIEW)
        ));
    }
}

fn preview(items: &[String], n: usize) -> String {
    items
        .iter()
        .take(n)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

// ────────────────────────────────────────────────────────────────────────────
// Baseline producers
// ────────────────────────────────────────────────────────────────────────────

fn outcome_language(signals: &SignalSet) -> Option<Contribution> {
    signals.outcome.has_positive().then(|| Contribution {
        reason: "Outcome-based language detected",
        evidence: Some(format!(
            "Focus on: {}",
            signals.outcome.positive_preview(SIGNAL_PREVIEW)
        )),
    })
}

fn partner_language(signals: &SignalSet) -> Option<Contribution> {
    signals.partner.has_positive().then(|| Contribution {
        reason: "Partner/Ecosystem language detected",
        evidence: Some(format!(
            "Partnership keywords: {}",
            signals.partner.positive_preview(SIGNAL_PREVIEW)
        )),
    })
}

fn consulting_roles(signals: &SignalSet) -> Option<Contribution> {
    let careers = signals.careers.as_ref().filter(|c| c.has_positive())?;
    Some(Contribution {
        reason: "Hiring consulting roles",
        evidence: Some(format!(
            "Hiring: {}",
            careers.positive_preview(SIGNAL_PREVIEW)
        )),
    })
}

fn consulting_positioning(signals: &SignalSet) -> Option<Contribution> {
    let text = signals.homepage_text.as_deref()?;
    (text.contains("consulting") || text.contains("strategy")).then_some(Contribution {
        reason: "Positions as consulting/strategy firm",
        evidence: None,
    })
}
