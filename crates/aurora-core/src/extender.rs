// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Extender (inverse unfold)
// Mirrors: Infrastructure/IE/extender.py
// ─────────────────────────────────────────────────────────────────────

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use aurora_tensor::{rotation_step, FractalTensor};
use aurora_types::AuroraConfig;

use crate::evolver::Evolver;

/// Neutral coherence reported when no context constrains the unfold.
const NEUTRAL_COHERENCE: f64 = 0.5;

/// Context preserved from the original abstraction path, used to guide
/// the unfold back toward concrete text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub level: u8,
    pub context_tensor: Option<FractalTensor>,
    pub neighbor_archetype_ids: Vec<String>,
    pub original_words: Vec<String>,
}

impl Breadcrumb {
    pub fn new(level: u8) -> Self {
        Self {
            level,
            context_tensor: None,
            neighbor_archetype_ids: Vec::new(),
            original_words: Vec::new(),
        }
    }
}

/// Outcome of unfolding an abstract tensor to concrete text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnfoldResult {
    pub text: String,
    pub coherence: f64,
    pub breadcrumbs_used: Vec<Breadcrumb>,
    pub explored: Vec<FractalTensor>,
    pub final_level: u8,
}

/// Inverse of the Transcender: navigates from an abstract tensor back
/// down the ladder toward words, steered by breadcrumbs and by the
/// evolver's relator graph. Keeps its own Fibonacci step, advanced once
/// per unfold call.
#[derive(Debug, Clone)]
pub struct Extender {
    inverse_vocab: HashMap<String, Vec<String>>,
    step: usize,
    w_level: f64,
    w_words: f64,
    w_context: f64,
}

impl Extender {
    pub fn new(config: &AuroraConfig) -> Self {
        Self {
            inverse_vocab: HashMap::new(),
            step: 0,
            w_level: config.w_level,
            w_words: config.w_words,
            w_context: config.w_context,
        }
    }

    /// Rebuild the archetype-to-words index from (word, archetype id)
    /// pairs. Pair order decides which word an archetype surfaces first.
    pub fn register_vocabulary<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.inverse_vocab.clear();
        for (word, archetype_id) in pairs {
            self.inverse_vocab.entry(archetype_id).or_default().push(word);
        }
        log::debug!(
            "register_vocabulary: {} archetypes indexed",
            self.inverse_vocab.len()
        );
    }

    /// Unfold one abstract tensor toward `target_level`. Three Fibonacci
    /// rotations are absorbed and checked against the inverse vocabulary;
    /// the candidate most coherent with the breadcrumbs wins. Without a
    /// direct hit the relator graph and breadcrumb archetypes are tried.
    pub fn unfold(
        &mut self,
        evolver: &mut Evolver,
        tensor: &FractalTensor,
        breadcrumbs: &[Breadcrumb],
        target_level: u8,
    ) -> UnfoldResult {
        let arq_idx = evolver.absorb(tensor);
        let archetype_id = match evolver.archetype(arq_idx) {
            Some(a) => a.id.clone(),
            None => String::new(),
        };

        let mut best: Option<(String, f64)> = None;
        let mut explored = Vec::with_capacity(3);
        for i in 0..3 {
            let paso = rotation_step(self.step, i);
            let rotated = tensor.rotated(paso);
            let rot_idx = evolver.absorb(&rotated);
            let rot_id = match evolver.archetype(rot_idx) {
                Some(a) => a.id.clone(),
                None => String::new(),
            };
            if let Some(candidates) = self.inverse_vocab.get(&rot_id) {
                let coherence = self.context_coherence(candidates, breadcrumbs, &rotated);
                let better = best.as_ref().map_or(coherence > 0.0, |(_, b)| coherence > *b);
                if better {
                    best = Some((candidates[0].clone(), coherence));
                }
            }
            explored.push(rotated);
        }

        let (mut text, coherence) = match best {
            Some(found) => found,
            None => (
                self.navigate_relators(evolver, &archetype_id, breadcrumbs),
                NEUTRAL_COHERENCE,
            ),
        };
        if target_level < 3 {
            text = self.expand_to_phrase(evolver, text, &archetype_id);
        }
        self.step = (self.step + 1) % 12;

        UnfoldResult {
            text,
            coherence,
            breadcrumbs_used: breadcrumbs.to_vec(),
            explored,
            final_level: target_level,
        }
    }

    /// Unfold the three tensors of an emergence as a hierarchy: the
    /// complete route at level 5, the logic at level 4, the factual
    /// footprint at level 3. Each stage becomes a breadcrumb for the
    /// next.
    pub fn unfold_hierarchical(
        &mut self,
        evolver: &mut Evolver,
        ms: &FractalTensor,
        ss: &FractalTensor,
        metam: &FractalTensor,
        breadcrumbs: &[Breadcrumb],
    ) -> UnfoldResult {
        let idea = self.unfold(evolver, metam, breadcrumbs, 5);

        let mut structure_crumbs = breadcrumbs.to_vec();
        structure_crumbs.push(Breadcrumb {
            level: 5,
            context_tensor: Some(metam.clone()),
            neighbor_archetype_ids: Vec::new(),
            original_words: vec![idea.text.clone()],
        });
        let structure = self.unfold(evolver, ms, &structure_crumbs, 4);

        let mut detail_crumbs = structure_crumbs.clone();
        detail_crumbs.push(Breadcrumb {
            level: 4,
            context_tensor: Some(ms.clone()),
            neighbor_archetype_ids: Vec::new(),
            original_words: vec![structure.text.clone()],
        });
        let details = self.unfold(evolver, ss, &detail_crumbs, 3);

        let text = format!("{} {} {}", idea.text, structure.text, details.text);
        let coherence = (idea.coherence + structure.coherence + details.coherence) / 3.0;
        let mut explored = idea.explored;
        explored.extend(structure.explored);
        explored.extend(details.explored);

        UnfoldResult {
            text: text.trim().to_string(),
            coherence,
            breadcrumbs_used: detail_crumbs,
            explored,
            final_level: 3,
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.inverse_vocab.len()
    }

    /// Coherence of candidate words against the breadcrumb context.
    /// Weighted blend of ladder-level proximity, word overlap and best
    /// tensor similarity; neutral when no breadcrumbs exist.
    fn context_coherence(
        &self,
        candidates: &[String],
        breadcrumbs: &[Breadcrumb],
        tensor: &FractalTensor,
    ) -> f64 {
        if breadcrumbs.is_empty() {
            return NEUTRAL_COHERENCE;
        }
        let mut coherence = 0.0;

        let mean_level = breadcrumbs.iter().map(|b| b.level as f64).sum::<f64>()
            / breadcrumbs.len() as f64;
        coherence += self.w_level * (1.0 - (tensor.level as f64 - mean_level).abs() / 7.0);

        let crumb_words: Vec<&String> = breadcrumbs
            .iter()
            .flat_map(|b| b.original_words.iter())
            .collect();
        if !crumb_words.is_empty() {
            let overlap = candidates
                .iter()
                .filter(|c| crumb_words.iter().any(|w| w == c))
                .count();
            coherence += self.w_words * overlap as f64 / candidates.len() as f64;
        }

        let best_similarity = breadcrumbs
            .iter()
            .filter_map(|b| b.context_tensor.as_ref())
            .map(|t| tensor.similarity(t))
            .fold(f64::NAN, f64::max);
        if !best_similarity.is_nan() {
            coherence += self.w_context * best_similarity;
        }

        coherence.min(1.0)
    }

    /// No direct vocabulary hit: try relator-graph neighbors of the
    /// absorbing archetype, then breadcrumb archetypes newest first.
    fn navigate_relators(
        &self,
        evolver: &Evolver,
        archetype_id: &str,
        breadcrumbs: &[Breadcrumb],
    ) -> String {
        for neighbor in evolver.network().neighbors(archetype_id) {
            if let Some(words) = self.inverse_vocab.get(neighbor) {
                return words[0].clone();
            }
        }
        for crumb in breadcrumbs.iter().rev() {
            for candidate in &crumb.neighbor_archetype_ids {
                if let Some(words) = self.inverse_vocab.get(candidate) {
                    return words[0].clone();
                }
            }
        }
        "<unknown>".to_string()
    }

    /// Below the lexical level a single word grows into a short phrase:
    /// the first words of the two strongest outgoing relators above 0.5
    /// are appended.
    fn expand_to_phrase(&self, evolver: &Evolver, base: String, archetype_id: &str) -> String {
        let mut strong: Vec<_> = evolver
            .network()
            .outgoing(archetype_id)
            .filter(|r| r.strength > 0.5)
            .collect();
        if strong.is_empty() {
            return base;
        }
        strong.sort_by(|a, b| b.strength.total_cmp(&a.strength));

        let mut phrase = base;
        for relator in strong.iter().take(2) {
            if let Some(words) = self.inverse_vocab.get(&relator.destination) {
                phrase.push(' ');
                phrase.push_str(&words[0]);
            }
        }
        phrase
    }
}
