// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Relator Network
// Mirrors: Infrastructure/IE/evolver.py (Relator, RelatorNetwork)
// ─────────────────────────────────────────────────────────────────────

use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use aurora_tensor::{rotation_step, FractalTensor};
use aurora_types::{AuroraError, AuroraResult};

use crate::archetype::Archetype;
use crate::transcender::Transcender;

/// How two archetypes relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RelatorKind {
    #[default]
    Analogic,
    Causal,
    Hierarchic,
}

impl fmt::Display for RelatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelatorKind::Analogic => "analogic",
            RelatorKind::Causal => "causal",
            RelatorKind::Hierarchic => "hierarchic",
        };
        f.write_str(name)
    }
}

/// A directed, weighted connection between two archetypes. The
/// transformation tensor is the emergent structure of their best
/// joint synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relator {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub kind: RelatorKind,
    pub strength: f64,
    pub transformation: FractalTensor,
}

/// Directed graph of relators over the archetype population.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatorNetwork {
    relators: Vec<Relator>,
    /// Outgoing neighbors per archetype id, insertion order.
    adjacency: HashMap<String, Vec<String>>,
    counter: u32,
}

impl RelatorNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect two archetypes. Their prototypes are rotated through
    /// three Fibonacci steps starting at `step` and synthesized against
    /// a zero context; the highest-scoring emergence sets the relator's
    /// strength and transformation.
    pub fn connect(
        &mut self,
        origin: &Archetype,
        destination: &Archetype,
        kind: RelatorKind,
        step: usize,
        transcender: &mut Transcender,
    ) -> usize {
        let zero = FractalTensor::zero();
        let mut best: Option<crate::transcender::Emergence> = None;
        for i in 0..3 {
            let paso = rotation_step(step, i);
            let r1 = origin.prototype.rotated(paso);
            let r2 = destination.prototype.rotated(paso);
            let emergence = transcender.synthesize(&r1, &r2, &zero);
            let better = best
                .as_ref()
                .map_or(true, |b| emergence.score > b.score);
            if better {
                best = Some(emergence);
            }
        }
        // Three iterations always produce a candidate.
        let best = best.unwrap_or_else(|| transcender.synthesize(&zero, &zero, &zero));

        self.counter += 1;
        let relator = Relator {
            id: format!("REL_{:04}", self.counter),
            origin: origin.id.clone(),
            destination: destination.id.clone(),
            kind,
            strength: best.score,
            transformation: best.ms,
        };
        log::debug!(
            "connect: {} {} -> {} ({kind}) strength={:.4}",
            relator.id,
            relator.origin,
            relator.destination,
            relator.strength
        );
        let neighbors = self.adjacency.entry(relator.origin.clone()).or_default();
        if !neighbors.contains(&relator.destination) {
            neighbors.push(relator.destination.clone());
        }
        self.relators.push(relator);
        self.relators.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Relator> {
        self.relators.get(index)
    }

    pub fn by_id(&self, id: &str) -> Option<&Relator> {
        self.relators.iter().find(|r| r.id == id)
    }

    pub fn all(&self) -> &[Relator] {
        &self.relators
    }

    pub fn len(&self) -> usize {
        self.relators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relators.is_empty()
    }

    pub fn neighbors(&self, archetype_id: &str) -> &[String] {
        self.adjacency
            .get(archetype_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Outgoing relators of one archetype.
    pub fn outgoing<'a>(
        &'a self,
        archetype_id: &'a str,
    ) -> impl Iterator<Item = &'a Relator> + 'a {
        self.relators.iter().filter(move |r| r.origin == archetype_id)
    }

    /// BFS over the directed adjacency. Fails when the origin is not a
    /// node of the graph; an unreachable destination yields `None`.
    pub fn shortest_path(&self, origin: &str, destination: &str) -> AuroraResult<Option<Vec<String>>> {
        if !self.adjacency.contains_key(origin) && self.by_archetype(origin).is_none() {
            return Err(AuroraError::UnknownArchetype(origin.to_string()));
        }
        if origin == destination {
            return Ok(Some(vec![origin.to_string()]));
        }
        let mut queue = VecDeque::new();
        queue.push_back(vec![origin.to_string()]);
        let mut visited = vec![origin.to_string()];
        while let Some(path) = queue.pop_front() {
            let last = &path[path.len() - 1];
            for neighbor in self.neighbors(last) {
                if visited.iter().any(|v| v == neighbor) {
                    continue;
                }
                let mut next = path.clone();
                next.push(neighbor.clone());
                if neighbor == destination {
                    return Ok(Some(next));
                }
                visited.push(neighbor.clone());
                queue.push_back(next);
            }
        }
        Ok(None)
    }

    /// Relators whose strength meets `threshold`.
    pub fn strong_connections(&self, threshold: f64) -> Vec<&Relator> {
        self.relators
            .iter()
            .filter(|r| r.strength >= threshold)
            .collect()
    }

    fn by_archetype(&self, id: &str) -> Option<&Relator> {
        self.relators
            .iter()
            .find(|r| r.origin == id || r.destination == id)
    }
}
