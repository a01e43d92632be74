// src/core/session/cache.rs
//
// Session result cache keyed by AudioRef identifier, with an optional LRU
// bound over spectrogram payloads.

use std::collections::{HashMap, VecDeque};

use crate::detection::AnalysisResult;

/// Results of the current session.
///
/// Entries are never removed individually; only the bulky spectrogram of an
/// entry may be evicted, the verdict fields always stay.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<String, AnalysisResult>,
    /// Identifiers holding a spectrogram, least recently used first
    spectrogram_lru: VecDeque<String>,
    max_spectrograms: Option<usize>,
}

impl ResultCache {
    pub fn new(max_spectrograms: Option<usize>) -> Self {
        Self {
            entries: HashMap::new(),
            spectrogram_lru: VecDeque::new(),
            max_spectrograms,
        }
    }

    /// Store a result. Returns identifiers whose spectrograms were evicted.
    pub fn insert(&mut self, result: AnalysisResult) -> Vec<String> {
        let id = result.audio_ref.id().to_string();
        let has_spectrogram = result.spectrogram.is_some();

        if self.entries.insert(id.clone(), result).is_some() {
            log::warn!("Replacing cached result for {}", id);
            self.spectrogram_lru.retain(|k| k != &id);
        }
        if has_spectrogram {
            self.spectrogram_lru.push_back(id);
        }
        self.enforce_limit()
    }

    /// Look up a result, marking its spectrogram as recently used
    pub fn get(&mut self, id: &str) -> Option<AnalysisResult> {
        let result = self.entries.get(id)?.clone();
        if result.spectrogram.is_some() {
            if let Some(pos) = self.spectrogram_lru.iter().position(|k| k == id) {
                if let Some(key) = self.spectrogram_lru.remove(pos) {
                    self.spectrogram_lru.push_back(key);
                }
            }
        }
        Some(result)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries currently holding a spectrogram
    pub fn spectrogram_count(&self) -> usize {
        self.spectrogram_lru.len()
    }

    pub fn values(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.entries.values()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.spectrogram_lru.clear();
    }

    fn enforce_limit(&mut self) -> Vec<String> {
        let Some(limit) = self.max_spectrograms else {
            return Vec::new();
        };

        let mut evicted = Vec::new();
        while self.spectrogram_lru.len() > limit {
            let Some(id) = self.spectrogram_lru.pop_front() else {
                break;
            };
            if let Some(entry) = self.entries.get_mut(&id) {
                entry.spectrogram = None;
            }
            evicted.push(id);
        }
        evicted
    }
}
