//! Block name classification with a memoized lookup.

use super::{builtin_rules, builtin_shapes, ShapeDefinition, FULL};
use crate::error::{Result, StructureError};
use crate::types::strip_namespace;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// How a rule matches a namespace-stripped block id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockPattern {
    Suffix(String),
    Contains(String),
    #[serde(rename = "exact")]
    ExactList(HashSet<String>),
}

impl BlockPattern {
    pub fn exact<const N: usize>(ids: [&str; N]) -> Self {
        BlockPattern::ExactList(ids.iter().map(|s| s.to_string()).collect())
    }

    pub fn matches(&self, id: &str) -> bool {
        match self {
            BlockPattern::Suffix(suffix) => id.ends_with(suffix.as_str()),
            BlockPattern::Contains(needle) => id.contains(needle.as_str()),
            BlockPattern::ExactList(ids) => ids.contains(id),
        }
    }
}

/// A pattern and the shape it assigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeRule {
    #[serde(rename = "match")]
    pub pattern: BlockPattern,
    pub shape: String,
}

impl ShapeRule {
    pub fn new(pattern: BlockPattern, shape: &str) -> Self {
        Self {
            pattern,
            shape: shape.to_string(),
        }
    }
}

/// Serialized registry, as accepted by [`ShapeRegistry::replace`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryPayload {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub shapes: HashMap<String, ShapeDefinition>,
    /// Exact `block id -> shape name` entries checked before patterns.
    #[serde(default)]
    pub block_mapping: HashMap<String, String>,
    /// Ordered rules. The built-in rules apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<ShapeRule>>,
}

/// Maps block names to shape definitions.
///
/// Classification order: fence gates, the explicit block mapping, the
/// ordered pattern list, then `full`. Results are cached per block name;
/// a replaced registry starts with an empty cache.
#[derive(Debug)]
pub struct ShapeRegistry {
    version: String,
    last_updated: Option<String>,
    shapes: HashMap<String, ShapeDefinition>,
    block_mapping: HashMap<String, String>,
    rules: Vec<ShapeRule>,
    cache: RwLock<HashMap<String, String>>,
    full: ShapeDefinition,
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Clone for ShapeRegistry {
    fn clone(&self) -> Self {
        Self {
            version: self.version.clone(),
            last_updated: self.last_updated.clone(),
            shapes: self.shapes.clone(),
            block_mapping: self.block_mapping.clone(),
            rules: self.rules.clone(),
            cache: RwLock::new(HashMap::new()),
            full: self.full.clone(),
        }
    }
}

impl ShapeRegistry {
    /// The registry compiled into the crate.
    pub fn builtin() -> Self {
        Self {
            version: "builtin".to_string(),
            last_updated: None,
            shapes: builtin_shapes(),
            block_mapping: HashMap::new(),
            rules: builtin_rules(),
            cache: RwLock::new(HashMap::new()),
            full: ShapeDefinition::full(),
        }
    }

    /// Build a registry from a payload.
    pub fn from_payload(payload: RegistryPayload) -> Result<Self> {
        if payload.version.trim().is_empty() {
            return Err(StructureError::Registry(
                "payload version must not be empty".to_string(),
            ));
        }

        let mut shapes = payload.shapes;
        let full = shapes
            .entry(FULL.to_string())
            .or_insert_with(ShapeDefinition::full)
            .clone();

        let rules = payload.patterns.unwrap_or_else(builtin_rules);
        for shape in payload.block_mapping.values().chain(rules.iter().map(|r| &r.shape)) {
            if !shapes.contains_key(shape) {
                log::warn!("shape '{}' is referenced but not defined; it renders as full", shape);
            }
        }

        let block_mapping = payload
            .block_mapping
            .into_iter()
            .map(|(block, shape)| (strip_namespace(&block).to_string(), shape))
            .collect();

        Ok(Self {
            version: payload.version,
            last_updated: payload.last_updated,
            shapes,
            block_mapping,
            rules,
            cache: RwLock::new(HashMap::new()),
            full,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_payload(serde_json::from_str(json)?)
    }

    /// Swap in a new payload. The current registry is left untouched.
    pub fn replace(&self, payload: RegistryPayload) -> Result<Self> {
        let next = Self::from_payload(payload)?;
        log::info!(
            "shape registry replaced: {} -> {} ({} shapes)",
            self.version,
            next.version,
            next.shapes.len()
        );
        Ok(next)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Shape name for a block name (namespaced or not).
    pub fn classify(&self, block_name: &str) -> String {
        let id = strip_namespace(block_name);
        if let Ok(cache) = self.cache.read() {
            if let Some(shape) = cache.get(id) {
                return shape.clone();
            }
        }

        let shape = self.classify_uncached(id).to_string();
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(id.to_string(), shape.clone());
        }
        shape
    }

    fn classify_uncached(&self, id: &str) -> &str {
        // Gates share the fence suffix family but render as plain blocks.
        if id.contains("fence_gate") {
            return FULL;
        }
        if let Some(shape) = self.block_mapping.get(id) {
            return shape;
        }
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(id))
            .map(|rule| rule.shape.as_str())
            .unwrap_or(FULL)
    }

    /// Definition for a shape name; unknown names fall back to `full`.
    pub fn definition(&self, shape: &str) -> &ShapeDefinition {
        self.shapes.get(shape).unwrap_or(&self.full)
    }

    /// Classify a block and return its definition in one step.
    pub fn shape_for(&self, block_name: &str) -> (String, &ShapeDefinition) {
        let shape = self.classify(block_name);
        let definition = self.definition(&shape);
        (shape, definition)
    }

    #[cfg(test)]
    pub(crate) fn cached_entries(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }
}
