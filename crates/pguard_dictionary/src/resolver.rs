//! Dictionary consolidation and placeholder resolution.
//!
//! Layers are flattened with the first-listed layer winning, then values are
//! resolved in passes. Each pass reads the mapping as it stood at the start of
//! the pass, substitutes the first placeholder of every value that has one and
//! merges all substitutions once the pass is complete.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dictionary::{ConsolidatedDictionary, Dictionary};
use crate::error::{DictionaryError, DictionaryResult};
use crate::scanner::PlaceholderScanner;

/// Lowest derived ceiling for dictionaries whose reference graph has a cycle.
pub const DEFAULT_MAX_PASSES: usize = 1024;

/// Options controlling resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    /// Maximum number of substituting passes before resolution is abandoned.
    /// Derived from the flattened entries when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_passes: Option<usize>,
}

impl ResolverOptions {
    /// Use a fixed pass ceiling instead of the derived one.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// Flattens dictionary layers and resolves placeholders inside their values.
#[derive(Debug, Clone, Default)]
pub struct DictionaryResolver {
    scanner: PlaceholderScanner,
    options: ResolverOptions,
}

impl DictionaryResolver {
    /// Create a resolver with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with the given options.
    pub fn with_options(options: ResolverOptions) -> Self {
        Self {
            scanner: PlaceholderScanner::new(),
            options,
        }
    }

    /// Options this resolver was built with.
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Flatten `layers` and resolve every placeholder in the resulting values.
    ///
    /// `layers` are ordered by priority: the first layer overrides the rest.
    pub fn resolve(&self, layers: &[Dictionary]) -> DictionaryResult<ConsolidatedDictionary> {
        let mut entries = Self::flatten(layers);
        let passes = self.resolve_entries(&mut entries)?;

        info!(
            "Consolidated {} dictionaries into {} entries in {} passes",
            layers.len(),
            entries.len(),
            passes
        );
        Ok(ConsolidatedDictionary::new(entries))
    }

    /// Merge layers from lowest to highest priority, so the first layer wins.
    pub fn flatten(layers: &[Dictionary]) -> BTreeMap<String, String> {
        let mut flattened = BTreeMap::new();
        for layer in layers.iter().rev() {
            debug!("Flattening dictionary '{}' ({} entries)", layer.name, layer.len());
            flattened.extend(
                layer
                    .entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
        flattened
    }

    /// Resolve in place and return the number of substituting passes.
    fn resolve_entries(&self, entries: &mut BTreeMap<String, String>) -> DictionaryResult<usize> {
        let max_passes = self.pass_ceiling(entries);
        let cycle_check_at = entries.len();
        let mut passes = 0;

        loop {
            let substitutions = self.resolve_first_placeholders(entries)?;
            if substitutions.is_empty() {
                return Ok(passes);
            }

            if passes == max_passes {
                if let Some(cycle) = self.find_cycle(entries) {
                    warn!("Reference cycle detected after {} passes: {}", passes, cycle.join(" -> "));
                    return Err(DictionaryError::CyclicReference { cycle });
                }
                let pending: Vec<String> = substitutions.into_keys().collect();
                warn!(
                    "Giving up on {} unresolved entries after {} passes",
                    pending.len(),
                    passes
                );
                return Err(DictionaryError::PassLimitExceeded { passes, pending });
            }

            debug!("Pass {}: substituted {} entries", passes + 1, substitutions.len());
            entries.extend(substitutions);
            passes += 1;

            // Without stray braces substitution keeps every reference reachable,
            // so a cycle present now can never resolve.
            if passes == cycle_check_at && !self.has_stray_braces(entries) {
                if let Some(cycle) = self.find_cycle(entries) {
                    warn!("Reference cycle detected: {}", cycle.join(" -> "));
                    return Err(DictionaryError::CyclicReference { cycle });
                }
            }
        }
    }

    /// Number of passes allowed before resolution is abandoned.
    ///
    /// Without a configured ceiling, an acyclic reference graph gets the size of
    /// its largest expansion: every pass consumes at least one placeholder of that
    /// expansion in each value still changing. A cyclic graph gets at least
    /// [`DEFAULT_MAX_PASSES`]; it only runs out when stray braces keep the cycle
    /// check from deciding early.
    fn pass_ceiling(&self, entries: &BTreeMap<String, String>) -> usize {
        if let Some(max_passes) = self.options.max_passes {
            return max_passes;
        }

        let written = entries
            .values()
            .map(|value| self.scanner.find_all(value).count())
            .fold(entries.len(), usize::saturating_add);

        let ceiling = match self.find_cycle(entries) {
            Some(_) => DEFAULT_MAX_PASSES,
            None => {
                let mut memo = HashMap::new();
                entries
                    .keys()
                    .map(|key| self.expansion_size(key, entries, &mut memo))
                    .max()
                    .unwrap_or(0)
            }
        };
        debug!("Derived pass ceiling {} for {} entries", ceiling.max(written), entries.len());
        ceiling.max(written)
    }

    /// Placeholders substituted while fully expanding `key`. The graph must be acyclic.
    fn expansion_size<'a>(
        &self,
        key: &'a str,
        entries: &'a BTreeMap<String, String>,
        memo: &mut HashMap<&'a str, usize>,
    ) -> usize {
        if let Some(size) = memo.get(key) {
            return *size;
        }

        let mut size = 0usize;
        if let Some(value) = entries.get(key) {
            for reference in self.scanner.find_all(value) {
                let nested = match entries.get_key_value(reference.key) {
                    Some((next, _)) => self.expansion_size(next, entries, memo),
                    None => 0,
                };
                size = size.saturating_add(1).saturating_add(nested);
            }
        }

        memo.insert(key, size);
        size
    }

    /// One pass: substitute the first placeholder of each value, reading only `snapshot`.
    fn resolve_first_placeholders(
        &self,
        snapshot: &BTreeMap<String, String>,
    ) -> DictionaryResult<BTreeMap<String, String>> {
        let mut resolved = BTreeMap::new();

        for (key, value) in snapshot {
            let Some(found) = self.scanner.find(value) else {
                continue;
            };

            if found.key == key {
                return Err(DictionaryError::SelfReference { key: key.clone() });
            }

            let Some(replacement) = snapshot.get(found.key) else {
                return Err(DictionaryError::MissingReference {
                    value: value.clone(),
                    placeholder: found.key.to_string(),
                });
            };

            resolved.insert(key.clone(), found.substitute(value, replacement));
        }

        Ok(resolved)
    }

    fn has_stray_braces(&self, entries: &BTreeMap<String, String>) -> bool {
        entries.values().any(|value| self.scanner.has_stray_braces(value))
    }

    /// Find a reference cycle among `entries`, returned as a closed path.
    fn find_cycle(&self, entries: &BTreeMap<String, String>) -> Option<Vec<String>> {
        let mut state = HashMap::new();
        let mut path = Vec::new();

        entries
            .keys()
            .find_map(|key| self.visit(key, entries, &mut state, &mut path))
    }

    fn visit<'a>(
        &self,
        key: &'a str,
        entries: &'a BTreeMap<String, String>,
        state: &mut HashMap<&'a str, Visit>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        match state.get(key) {
            Some(Visit::Done) => return None,
            Some(Visit::InProgress) => {
                let start = path.iter().position(|k| *k == key)?;
                let mut cycle: Vec<String> = path[start..].iter().map(|k| k.to_string()).collect();
                cycle.push(key.to_string());
                return Some(cycle);
            }
            None => {}
        }

        state.insert(key, Visit::InProgress);
        path.push(key);

        if let Some(value) = entries.get(key) {
            for reference in self.scanner.find_all(value) {
                let Some((next, _)) = entries.get_key_value(reference.key) else {
                    continue;
                };
                if let Some(cycle) = self.visit(next, entries, state, path) {
                    return Some(cycle);
                }
            }
        }

        path.pop();
        state.insert(key, Visit::Done);
        None
    }
}

/// Resolve `layers` with default options.
pub fn resolve(layers: &[Dictionary]) -> DictionaryResult<ConsolidatedDictionary> {
    DictionaryResolver::new().resolve(layers)
}
