// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Parallel Harmonizer
// Mirrors: Infrastructure/IE/armonizador_optimizado.py
// ─────────────────────────────────────────────────────────────────────

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use aurora_core::Evolver;
use aurora_tensor::{FractalTensor, Vector};
use aurora_types::AuroraConfig;

use crate::correct::{Correction, Harmonizer, HarmonyReport};

/// Shared cache of rotated tensors, keyed by level-1 content and
/// rotation amount. Rotation regenerates the full 39-vector hierarchy,
/// which is the dominant cost of variant exploration.
#[derive(Debug, Default)]
pub struct RotationCache {
    map: Mutex<HashMap<([Vector; 3], u8), FractalTensor>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

/// Hit and miss counts of the rotation cache.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl RotationCache {
    pub fn rotated(&self, tensor: &FractalTensor, paso: u8) -> FractalTensor {
        let key = (*tensor.level1(), paso);
        if let Some(cached) = self.map.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            let mut out = cached.clone();
            out.level = tensor.level;
            out.active_dimensions = tensor.active_dimensions.clone();
            return out;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let rotated = tensor.rotated(paso);
        self.map.lock().insert(key, rotated.clone());
        rotated
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn clear(&self) {
        self.map.lock().clear();
    }
}

/// Harmonizer for large batches: detection stays sequential, then the
/// corrections are fanned out to scoped worker threads that share the
/// evolver behind a mutex and reuse rotated tensors through the cache.
/// Each worker stops at its deadline; whatever it could not attempt is
/// reported as failed.
#[derive(Debug)]
pub struct ParallelHarmonizer {
    inner: Harmonizer,
    cache: RotationCache,
    num_workers: usize,
    batch_size: usize,
    worker_timeout: Duration,
}

impl ParallelHarmonizer {
    pub fn new(config: &AuroraConfig) -> Self {
        Self {
            inner: Harmonizer::new(config),
            cache: RotationCache::default(),
            num_workers: config.num_workers.max(1),
            batch_size: config.batch_size.max(1),
            worker_timeout: Duration::from_millis(config.worker_timeout_ms),
        }
    }

    pub fn harmonize(
        &mut self,
        evolver: &mut Evolver,
        batch: &[FractalTensor],
        space: &str,
    ) -> HarmonyReport {
        let mut incoherences = self.inner.detect(evolver, batch, space);
        incoherences.sort_by(|a, b| b.severity.total_cmp(&a.severity));

        let results: Mutex<Vec<(usize, Option<Correction>)>> =
            Mutex::new(Vec::with_capacity(incoherences.len()));
        let shared = Mutex::new((&mut self.inner, evolver));
        let cursor = AtomicUsize::new(0);
        let total = incoherences.len();

        thread::scope(|scope| {
            for worker in 0..self.num_workers.min(total.max(1)) {
                let shared = &shared;
                let results = &results;
                let cursor = &cursor;
                let cache = &self.cache;
                let incoherences = &incoherences;
                let chunk = self.batch_size;
                let timeout = self.worker_timeout;
                scope.spawn(move || {
                    let deadline = Instant::now() + timeout;
                    let mut local = Vec::new();
                    loop {
                        let start = cursor.fetch_add(chunk, Ordering::SeqCst);
                        if start >= total {
                            break;
                        }
                        let end = (start + chunk).min(total);
                        for i in start..end {
                            if Instant::now() >= deadline {
                                log::warn!(
                                    "harmonize worker {worker}: deadline hit, dropping correction {i}"
                                );
                                local.push((i, None));
                                continue;
                            }
                            let correction = {
                                let mut guard = shared.lock();
                                let (harmonizer, evolver) = &mut *guard;
                                harmonizer.correct_with(evolver, &incoherences[i], &|t, paso| {
                                    cache.rotated(t, paso)
                                })
                            };
                            local.push((i, correction));
                        }
                    }
                    results.lock().extend(local);
                });
            }
        });

        let mut results = results.into_inner();
        results.sort_by_key(|(i, _)| *i);

        let mut outputs = batch.to_vec();
        let mut corrected = 0;
        let mut failed = 0;
        for (i, correction) in results {
            match correction {
                Some(correction) => {
                    corrected += 1;
                    self.inner.learn_from_error(&incoherences[i], &correction);
                    if let Some(idx) = incoherences[i].tensor_index {
                        outputs[idx] = correction.tensor;
                    }
                }
                None => failed += 1,
            }
        }

        let stats = self.cache.stats();
        log::info!(
            "parallel harmonize: space={space} detected={total} corrected={corrected} \
             failed={failed} cache={}/{}",
            stats.hits,
            stats.hits + stats.misses
        );
        HarmonyReport {
            coherent: failed == 0,
            detected: total,
            corrected,
            failed,
            learnings: self.inner.learnings().len(),
            archetype_confidence: self.inner.archetype_confidences().clone(),
            relator_confidence: self.inner.relator_confidences().clone(),
            outputs,
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn inner(&self) -> &Harmonizer {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> FractalTensor {
        let level1 = [
            Vector::raw(9, 0, 0),
            Vector::raw(0, 0, 0),
            Vector::raw(0, 0, 0),
        ];
        FractalTensor::from_raw_level1(level1, 0)
    }

    #[test]
    fn test_cache_counts_hits_and_misses() {
        let cache = RotationCache::default();
        let t = FractalTensor::uniform(1, 2, 3, 4).unwrap();
        let first = cache.rotated(&t, 2);
        let second = cache.rotated(&t, 2);
        assert_eq!(first, second);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_cached_rotation_keeps_caller_level() {
        let cache = RotationCache::default();
        let low = FractalTensor::uniform(1, 1, 1, 2).unwrap();
        let high = FractalTensor::uniform(1, 1, 1, 6).unwrap();
        cache.rotated(&low, 3);
        let out = cache.rotated(&high, 3);
        assert_eq!(out.level, 6);
        assert_eq!(out.active_dimensions, high.active_dimensions);
    }

    #[test]
    fn test_parallel_matches_sequential_counts() {
        let batch = vec![
            FractalTensor::uniform(0, 0, 0, 0).unwrap(),
            FractalTensor::uniform(7, 7, 7, 0).unwrap(),
            guard(),
        ];
        let mut ev = Evolver::new(&AuroraConfig::default());
        let mut harmonizer = ParallelHarmonizer::new(&AuroraConfig::default());
        let report = harmonizer.harmonize(&mut ev, &batch, "p");
        assert_eq!(report.detected, 2);
        assert_eq!(report.corrected, 2);
        assert_eq!(report.failed, 0);
        assert!(report.coherent);
        assert_eq!(report.outputs.len(), 3);

        let stats = harmonizer.cache_stats();
        assert!(stats.hits >= 1);
        assert!(stats.misses >= 2);
    }

    #[test]
    fn test_second_pass_is_clean() {
        let batch = vec![guard()];
        let mut ev = Evolver::new(&AuroraConfig::default());
        let mut harmonizer = ParallelHarmonizer::new(&AuroraConfig::default());
        let report = harmonizer.harmonize(&mut ev, &batch, "p1");
        assert_eq!(report.corrected, 1);
        let second = harmonizer.harmonize(&mut ev, &report.outputs, "p2");
        assert_eq!(second.detected, 0);
        assert!(second.coherent);
    }
}
