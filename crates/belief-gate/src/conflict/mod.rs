//! Keyword-pair opposition between beliefs about the same target.
//!
//! Two claims conflict when they refer to the same target and fall on
//! opposite sides of an antonym pair. A claim that matches both sides of a
//! pair is ambiguous and never conflicts on that pair.

pub mod antonyms;
pub mod matcher;

use belief_core::models::{
    AntonymPair, Conflict, ConflictCounterpart, DerivedView, StableConcept,
};

use matcher::{normalize, TermMatcher};

/// Shortest target, in characters, accepted when targets are inferred from text.
const MIN_TARGET_CHARS: usize = 2;

#[derive(Debug, Clone)]
struct CompiledPair {
    pair: AntonymPair,
    positive: TermMatcher,
    negative: TermMatcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Positive,
    Negative,
}

/// Text and optional structured target of a view or concept.
#[derive(Debug, Clone, Copy)]
struct Claim<'a> {
    text: &'a str,
    target: Option<&'a str>,
}

impl<'a> Claim<'a> {
    fn of_view(view: &'a DerivedView) -> Self {
        Self {
            text: &view.hypothesis,
            target: view.target.as_deref(),
        }
    }

    fn of_concept(concept: &'a StableConcept) -> Self {
        Self {
            text: &concept.content.hypothesis,
            target: concept.content.target.as_deref(),
        }
    }
}

/// Non-probabilistic conflict detector over a fixed antonym table.
#[derive(Debug, Clone)]
pub struct ConflictDetector {
    pairs: Vec<CompiledPair>,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::with_pairs(antonyms::default_pairs())
    }
}

impl ConflictDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pairs(pairs: Vec<AntonymPair>) -> Self {
        let pairs = pairs
            .into_iter()
            .map(|pair| CompiledPair {
                positive: TermMatcher::new(&pair.positive),
                negative: TermMatcher::new(&pair.negative),
                pair,
            })
            .collect();
        Self { pairs }
    }

    pub fn pairs(&self) -> impl Iterator<Item = &AntonymPair> {
        self.pairs.iter().map(|p| &p.pair)
    }

    /// Conflict between two views, reported from `a`'s side.
    pub fn detect_pair(&self, a: &DerivedView, b: &DerivedView) -> Option<Conflict> {
        if a.id == b.id || a.user_id != b.user_id {
            return None;
        }
        let (pair, target) = self.oppose(Claim::of_view(a), Claim::of_view(b))?;
        Some(Conflict {
            view_id: a.id.clone(),
            counterpart: ConflictCounterpart::View(b.id.clone()),
            description: format!(
                "'{}' contradicts view '{}' on {} ({}/{})",
                a.hypothesis, b.hypothesis, target, pair.positive, pair.negative
            ),
            target,
            pair,
        })
    }

    /// Conflict between a view and a stable concept. A concept the view was
    /// itself promoted into never counts.
    pub fn detect_against_concept(
        &self,
        view: &DerivedView,
        concept: &StableConcept,
    ) -> Option<Conflict> {
        if view.user_id != concept.user_id
            || concept.is_deprecated
            || concept.promoted_from == view.id
        {
            return None;
        }
        let (pair, target) = self.oppose(Claim::of_view(view), Claim::of_concept(concept))?;
        Some(Conflict {
            view_id: view.id.clone(),
            counterpart: ConflictCounterpart::Concept(concept.concept_id.clone()),
            description: format!(
                "'{}' contradicts concept '{}' ({}) on {} ({}/{})",
                view.hypothesis,
                concept.display_name,
                concept.version_string(),
                target,
                pair.positive,
                pair.negative
            ),
            target,
            pair,
        })
    }

    /// Every conflict `view` has with the other active views and the current
    /// concepts of its user.
    pub fn conflicts_for(
        &self,
        view: &DerivedView,
        active_views: &[DerivedView],
        concepts: &[StableConcept],
    ) -> Vec<Conflict> {
        let with_views = active_views
            .iter()
            .filter(|other| other.is_active())
            .filter_map(|other| self.detect_pair(view, other));
        let with_concepts = concepts
            .iter()
            .filter_map(|concept| self.detect_against_concept(view, concept));
        with_views.chain(with_concepts).collect()
    }

    fn oppose(&self, a: Claim<'_>, b: Claim<'_>) -> Option<(AntonymPair, String)> {
        let opposed = self.pairs.iter().find(|compiled| {
            matches!(
                (self.side(compiled, a.text), self.side(compiled, b.text)),
                (Some(Side::Positive), Some(Side::Negative))
                    | (Some(Side::Negative), Some(Side::Positive))
            )
        })?;
        let target = self.shared_target(a, b)?;
        Some((opposed.pair.clone(), target))
    }

    fn side(&self, compiled: &CompiledPair, text: &str) -> Option<Side> {
        let negative = compiled.negative.is_match(text);
        let positive = compiled.positive.is_match(&self.mask_negatives(text));
        match (positive, negative) {
            (true, false) => Some(Side::Positive),
            (false, true) => Some(Side::Negative),
            _ => None,
        }
    }

    fn mask_negatives(&self, text: &str) -> String {
        self.pairs
            .iter()
            .fold(text.to_string(), |acc, p| p.negative.mask(&acc))
    }

    fn strip_qualifiers(&self, text: &str) -> String {
        let stripped = self
            .pairs
            .iter()
            .fold(self.mask_negatives(text), |acc, p| p.positive.mask(&acc));
        normalize(&stripped)
    }

    fn shared_target(&self, a: Claim<'_>, b: Claim<'_>) -> Option<String> {
        match (a.target, b.target) {
            (Some(ta), Some(tb)) => {
                let (ta, tb) = (normalize(ta), normalize(tb));
                (!ta.is_empty() && ta == tb).then_some(ta)
            }
            (Some(t), None) => self.target_in_text(t, b.text),
            (None, Some(t)) => self.target_in_text(t, a.text),
            (None, None) => {
                let sa = self.strip_qualifiers(a.text);
                let sb = self.strip_qualifiers(b.text);
                let (short, long) = if sa.chars().count() <= sb.chars().count() {
                    (sa, sb)
                } else {
                    (sb, sa)
                };
                (short.chars().count() >= MIN_TARGET_CHARS && long.contains(short.as_str()))
                    .then_some(short)
            }
        }
    }

    fn target_in_text(&self, target: &str, text: &str) -> Option<String> {
        let target = normalize(target);
        (target.chars().count() >= MIN_TARGET_CHARS
            && self.strip_qualifiers(text).contains(target.as_str()))
        .then_some(target)
    }
}
