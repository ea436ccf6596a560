//! Algorithm identifiers and the directory of available algorithms

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::step::{SearchingTrace, SortingTrace};
use crate::{searching, sorting, TraceError};

/// Sorting algorithms with step producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithm {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
    Heap,
    Counting,
    Radix,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 8] = [
        SortAlgorithm::Bubble,
        SortAlgorithm::Selection,
        SortAlgorithm::Insertion,
        SortAlgorithm::Merge,
        SortAlgorithm::Quick,
        SortAlgorithm::Heap,
        SortAlgorithm::Counting,
        SortAlgorithm::Radix,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortAlgorithm::Bubble => "bubble",
            SortAlgorithm::Selection => "selection",
            SortAlgorithm::Insertion => "insertion",
            SortAlgorithm::Merge => "merge",
            SortAlgorithm::Quick => "quick",
            SortAlgorithm::Heap => "heap",
            SortAlgorithm::Counting => "counting",
            SortAlgorithm::Radix => "radix",
        }
    }

    /// One-line description for directory listings.
    pub fn description(self) -> &'static str {
        match self {
            SortAlgorithm::Bubble => "Simple comparison-based algorithm, O(n²)",
            SortAlgorithm::Selection => "Selects minimum element each pass, O(n²)",
            SortAlgorithm::Insertion => "Builds sorted array one element at a time, O(n²)",
            SortAlgorithm::Merge => "Divide and conquer, O(n log n)",
            SortAlgorithm::Quick => "Divide and conquer with pivot, O(n log n) average",
            SortAlgorithm::Heap => "Uses heap data structure, O(n log n)",
            SortAlgorithm::Counting => "Non-comparison based, O(n+k)",
            SortAlgorithm::Radix => "Sorts by digits, O(nk)",
        }
    }

    /// Run the producer for this algorithm.
    pub fn run(self, values: &[i64]) -> SortingTrace {
        match self {
            SortAlgorithm::Bubble => sorting::bubble_sort(values),
            SortAlgorithm::Selection => sorting::selection_sort(values),
            SortAlgorithm::Insertion => sorting::insertion_sort(values),
            SortAlgorithm::Merge => sorting::merge_sort(values),
            SortAlgorithm::Quick => sorting::quick_sort(values),
            SortAlgorithm::Heap => sorting::heap_sort(values),
            SortAlgorithm::Counting => sorting::counting_sort(values),
            SortAlgorithm::Radix => sorting::radix_sort(values),
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortAlgorithm {
    type Err = TraceError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == name)
            .ok_or_else(|| TraceError::UnknownAlgorithm {
                name: name.to_owned(),
                available: join_names(Self::ALL.iter().map(|a| a.as_str())),
            })
    }
}

/// Searching algorithms with step producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchAlgorithm {
    Linear,
    Binary,
    Jump,
    Interpolation,
    Exponential,
}

impl SearchAlgorithm {
    pub const ALL: [SearchAlgorithm; 5] = [
        SearchAlgorithm::Linear,
        SearchAlgorithm::Binary,
        SearchAlgorithm::Jump,
        SearchAlgorithm::Interpolation,
        SearchAlgorithm::Exponential,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SearchAlgorithm::Linear => "linear",
            SearchAlgorithm::Binary => "binary",
            SearchAlgorithm::Jump => "jump",
            SearchAlgorithm::Interpolation => "interpolation",
            SearchAlgorithm::Exponential => "exponential",
        }
    }

    /// One-line description for directory listings.
    pub fn description(self) -> &'static str {
        match self {
            SearchAlgorithm::Linear => "Sequential search, O(n)",
            SearchAlgorithm::Binary => "Divide and conquer on sorted array, O(log n)",
            SearchAlgorithm::Jump => "Block-based search, O(√n)",
            SearchAlgorithm::Interpolation => {
                "Improved binary for uniform distribution, O(log log n)"
            }
            SearchAlgorithm::Exponential => "Exponential range finding + binary search, O(log n)",
        }
    }

    /// Run the producer for this algorithm.
    pub fn run(self, values: &[i64], target: i64) -> SearchingTrace {
        match self {
            SearchAlgorithm::Linear => searching::linear_search(values, target),
            SearchAlgorithm::Binary => searching::binary_search(values, target),
            SearchAlgorithm::Jump => searching::jump_search(values, target),
            SearchAlgorithm::Interpolation => searching::interpolation_search(values, target),
            SearchAlgorithm::Exponential => searching::exponential_search(values, target),
        }
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchAlgorithm {
    type Err = TraceError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == name)
            .ok_or_else(|| TraceError::UnknownAlgorithm {
                name: name.to_owned(),
                available: join_names(Self::ALL.iter().map(|a| a.as_str())),
            })
    }
}

/// Every algorithm name this crate can produce a trace for.
pub fn available_algorithms() -> String {
    join_names(
        SortAlgorithm::ALL
            .iter()
            .map(|a| a.as_str())
            .chain(SearchAlgorithm::ALL.iter().map(|a| a.as_str())),
    )
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

/// Directory entry describing one algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    pub name: &'static str,
    pub category: &'static str,
    pub complexity_time: &'static str,
    pub complexity_space: &'static str,
}

/// Directory of every algorithm in the system, including the live-animated
/// graph traversals.
pub const CATALOG: &[AlgorithmInfo] = &[
    // Sorting
    AlgorithmInfo { name: "Bubble Sort", category: "sorting", complexity_time: "O(n²)", complexity_space: "O(1)" },
    AlgorithmInfo { name: "Selection Sort", category: "sorting", complexity_time: "O(n²)", complexity_space: "O(1)" },
    AlgorithmInfo { name: "Insertion Sort", category: "sorting", complexity_time: "O(n²)", complexity_space: "O(1)" },
    AlgorithmInfo { name: "Merge Sort", category: "sorting", complexity_time: "O(n log n)", complexity_space: "O(n)" },
    AlgorithmInfo { name: "Quick Sort", category: "sorting", complexity_time: "O(n log n)", complexity_space: "O(log n)" },
    AlgorithmInfo { name: "Heap Sort", category: "sorting", complexity_time: "O(n log n)", complexity_space: "O(1)" },
    AlgorithmInfo { name: "Counting Sort", category: "sorting", complexity_time: "O(n+k)", complexity_space: "O(k)" },
    AlgorithmInfo { name: "Radix Sort", category: "sorting", complexity_time: "O(nk)", complexity_space: "O(n+k)" },
    // Searching
    AlgorithmInfo { name: "Linear Search", category: "searching", complexity_time: "O(n)", complexity_space: "O(1)" },
    AlgorithmInfo { name: "Binary Search", category: "searching", complexity_time: "O(log n)", complexity_space: "O(1)" },
    AlgorithmInfo { name: "Jump Search", category: "searching", complexity_time: "O(√n)", complexity_space: "O(1)" },
    AlgorithmInfo { name: "Interpolation Search", category: "searching", complexity_time: "O(log log n)", complexity_space: "O(1)" },
    AlgorithmInfo { name: "Exponential Search", category: "searching", complexity_time: "O(log n)", complexity_space: "O(1)" },
    // Graph traversals (animated live rather than precomputed)
    AlgorithmInfo { name: "BFS", category: "graph", complexity_time: "O(V+E)", complexity_space: "O(V)" },
    AlgorithmInfo { name: "DFS", category: "graph", complexity_time: "O(V+E)", complexity_space: "O(V)" },
    AlgorithmInfo { name: "Dijkstra", category: "graph", complexity_time: "O((V+E)logV)", complexity_space: "O(V)" },
    AlgorithmInfo { name: "Bellman-Ford", category: "graph", complexity_time: "O(VE)", complexity_space: "O(V)" },
    AlgorithmInfo { name: "A* Search", category: "graph", complexity_time: "O((V+E)logV)", complexity_space: "O(V)" },
];

/// Look up a directory entry by display name.
pub fn find(name: &str) -> Option<&'static AlgorithmInfo> {
    CATALOG.iter().find(|info| info.name == name)
}
