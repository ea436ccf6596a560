//! Step data model
//!
//! One struct per algorithm family rather than a single record with every
//! optional field, so a step can only carry annotations that make sense for
//! its family. All types are JSON-shaped for interchange.

use serde::{Deserialize, Serialize};

/// One recorded snapshot of a sorting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingStep {
    /// Array contents at this instant.
    pub array: Vec<i64>,
    /// Indices currently being compared.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comparing: Vec<usize>,
    /// Indices currently being swapped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub swapping: Vec<usize>,
    /// Indices known to be in their final position.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorted: Vec<usize>,
    /// Pivot index, for partition-based algorithms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<usize>,
    pub description: String,
}

impl SortingStep {
    pub fn new(array: &[i64], description: impl Into<String>) -> Self {
        Self {
            array: array.to_vec(),
            comparing: Vec::new(),
            swapping: Vec::new(),
            sorted: Vec::new(),
            pivot: None,
            description: description.into(),
        }
    }

    pub fn with_comparing(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.comparing = indices.into_iter().collect();
        self
    }

    pub fn with_swapping(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.swapping = indices.into_iter().collect();
        self
    }

    pub fn with_sorted(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.sorted = indices.into_iter().collect();
        self
    }

    pub fn with_pivot(mut self, index: usize) -> Self {
        self.pivot = Some(index);
        self
    }
}

/// A complete sorting run with summary statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingTrace {
    pub algorithm: String,
    pub steps: Vec<SortingStep>,
    pub total_comparisons: usize,
    pub total_swaps: usize,
}

/// One recorded snapshot of a searching run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchingStep {
    /// Array contents being searched (sorted first where the algorithm
    /// requires it).
    pub array: Vec<i64>,
    /// Index currently being checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<usize>,
    /// Left boundary of the active range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<usize>,
    /// Right boundary of the active range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<usize>,
    /// Midpoint probe, for bisection-based algorithms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<usize>,
    /// Terminal verdict; absent on intermediate steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
    pub description: String,
}

impl SearchingStep {
    pub fn new(array: &[i64], description: impl Into<String>) -> Self {
        Self {
            array: array.to_vec(),
            current: None,
            left: None,
            right: None,
            mid: None,
            found: None,
            description: description.into(),
        }
    }

    pub fn with_current(mut self, index: usize) -> Self {
        self.current = Some(index);
        self
    }

    pub fn with_left(mut self, index: usize) -> Self {
        self.left = Some(index);
        self
    }

    pub fn with_right(mut self, index: usize) -> Self {
        self.right = Some(index);
        self
    }

    pub fn with_mid(mut self, index: usize) -> Self {
        self.mid = Some(index);
        self
    }

    pub fn with_found(mut self, found: bool) -> Self {
        self.found = Some(found);
        self
    }
}

/// A complete searching run with its verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchingTrace {
    pub algorithm: String,
    pub steps: Vec<SearchingStep>,
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_at: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let step = SortingStep::new(&[3, 1, 2], "Initial array");
        let json = serde_json::to_value(&step).unwrap();
        assert!(json.get("comparing").is_none());
        assert!(json.get("pivot").is_none());
        assert_eq!(json["array"], serde_json::json!([3, 1, 2]));
    }

    #[test]
    fn searching_step_round_trips() {
        let step = SearchingStep::new(&[1, 2, 3], "Checking middle")
            .with_left(0)
            .with_right(2)
            .with_mid(1);
        let json = serde_json::to_string(&step).unwrap();
        let back: SearchingStep = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }
}
