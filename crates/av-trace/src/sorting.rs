//! Sorting step producers
//!
//! Each producer runs its algorithm to completion and records a step for
//! every comparison and swap, so playback can replay the run one instant at
//! a time. Comparison and swap totals are tallied for the run summary.
//!
//! Indices in the `sorted` set only ever accumulate within a run; a step
//! never un-marks a settled index.

use crate::catalog::SortAlgorithm;
use crate::step::{SortingStep, SortingTrace};

fn trace(algorithm: SortAlgorithm, steps: Vec<SortingStep>, comparisons: usize, swaps: usize) -> SortingTrace {
    SortingTrace {
        algorithm: algorithm.as_str().to_owned(),
        steps,
        total_comparisons: comparisons,
        total_swaps: swaps,
    }
}

/// Bubble sort: adjacent comparisons, largest element settles each pass.
pub fn bubble_sort(values: &[i64]) -> SortingTrace {
    let mut arr = values.to_vec();
    let n = arr.len();
    let mut steps = vec![SortingStep::new(&arr, "Initial array")];
    let mut comparisons = 0;
    let mut swaps = 0;
    let mut settled: Vec<usize> = Vec::new();

    for i in 0..n {
        for j in 0..n - i - 1 {
            comparisons += 1;
            steps.push(
                SortingStep::new(&arr, format!("Comparing {} and {}", arr[j], arr[j + 1]))
                    .with_comparing([j, j + 1])
                    .with_sorted(settled.iter().copied()),
            );

            if arr[j] > arr[j + 1] {
                arr.swap(j, j + 1);
                swaps += 1;
                steps.push(
                    SortingStep::new(&arr, format!("Swapping {} and {}", arr[j + 1], arr[j]))
                        .with_swapping([j, j + 1])
                        .with_sorted(settled.iter().copied()),
                );
            }
        }
        settled.push(n - i - 1);
    }

    steps.push(SortingStep::new(&arr, "Array sorted!").with_sorted(0..n));
    trace(SortAlgorithm::Bubble, steps, comparisons, swaps)
}

/// Selection sort: find the minimum of the unsorted tail, swap it into place.
pub fn selection_sort(values: &[i64]) -> SortingTrace {
    let mut arr = values.to_vec();
    let n = arr.len();
    let mut steps = vec![SortingStep::new(&arr, "Initial array")];
    let mut comparisons = 0;
    let mut swaps = 0;
    let mut settled: Vec<usize> = Vec::new();

    for i in 0..n {
        let mut min_idx = i;
        for j in i + 1..n {
            comparisons += 1;
            steps.push(
                SortingStep::new(
                    &arr,
                    format!("Finding minimum: comparing {} with {}", arr[min_idx], arr[j]),
                )
                .with_comparing([min_idx, j])
                .with_sorted(settled.iter().copied()),
            );

            if arr[j] < arr[min_idx] {
                min_idx = j;
            }
        }

        if min_idx != i {
            let minimum = arr[min_idx];
            arr.swap(i, min_idx);
            swaps += 1;
            steps.push(
                SortingStep::new(&arr, format!("Swapping minimum {} to position {}", minimum, i))
                    .with_swapping([i, min_idx])
                    .with_sorted(settled.iter().copied()),
            );
        }

        settled.push(i);
    }

    steps.push(SortingStep::new(&arr, "Array sorted!").with_sorted(0..n));
    trace(SortAlgorithm::Selection, steps, comparisons, swaps)
}

/// Insertion sort: grow a sorted prefix one element at a time.
pub fn insertion_sort(values: &[i64]) -> SortingTrace {
    let mut arr = values.to_vec();
    let n = arr.len();
    let mut steps = vec![SortingStep::new(
        &arr,
        "Initial array - first element is trivially sorted",
    )
    .with_sorted(0..n.min(1))];
    let mut comparisons = 0;
    let mut swaps = 0;

    for i in 1..n {
        let key = arr[i];
        steps.push(
            SortingStep::new(&arr, format!("Inserting {} into sorted portion", key))
                .with_comparing([i])
                .with_sorted(0..i),
        );

        let mut j = i;
        while j > 0 {
            comparisons += 1;
            steps.push(
                SortingStep::new(&arr, format!("Comparing {} with {}", arr[j - 1], key))
                    .with_comparing([j - 1, j])
                    .with_sorted(0..i),
            );

            if arr[j - 1] > key {
                arr[j] = arr[j - 1];
                swaps += 1;
                steps.push(
                    SortingStep::new(&arr, format!("Shifting {} to the right", arr[j]))
                        .with_swapping([j - 1, j])
                        .with_sorted(0..i),
                );
                j -= 1;
            } else {
                break;
            }
        }

        arr[j] = key;
    }

    steps.push(SortingStep::new(&arr, "Array sorted!").with_sorted(0..n));
    trace(SortAlgorithm::Insertion, steps, comparisons, swaps)
}

/// Merge sort: divide, sort halves, merge.
pub fn merge_sort(values: &[i64]) -> SortingTrace {
    let mut arr = values.to_vec();
    let n = arr.len();
    let mut steps = vec![SortingStep::new(&arr, "Initial array")];
    let mut comparisons = 0;
    let mut swaps = 0;

    if n > 0 {
        merge_sort_recursive(&mut arr, 0, n - 1, &mut steps, &mut comparisons, &mut swaps);
    }

    steps.push(SortingStep::new(&arr, "Array sorted!").with_sorted(0..n));
    trace(SortAlgorithm::Merge, steps, comparisons, swaps)
}

fn merge_sort_recursive(
    arr: &mut [i64],
    left: usize,
    right: usize,
    steps: &mut Vec<SortingStep>,
    comparisons: &mut usize,
    swaps: &mut usize,
) {
    if left < right {
        let mid = (left + right) / 2;

        steps.push(
            SortingStep::new(arr, format!("Dividing: left half [{}:{}]", left, mid + 1))
                .with_comparing(left..=mid),
        );
        merge_sort_recursive(arr, left, mid, steps, comparisons, swaps);

        steps.push(
            SortingStep::new(arr, format!("Dividing: right half [{}:{}]", mid + 1, right + 1))
                .with_comparing(mid + 1..=right),
        );
        merge_sort_recursive(arr, mid + 1, right, steps, comparisons, swaps);

        merge(arr, left, mid, right, steps, comparisons, swaps);
    }
}

fn merge(
    arr: &mut [i64],
    left: usize,
    mid: usize,
    right: usize,
    steps: &mut Vec<SortingStep>,
    comparisons: &mut usize,
    swaps: &mut usize,
) {
    let left_part = arr[left..=mid].to_vec();
    let right_part = arr[mid + 1..=right].to_vec();

    let mut i = 0;
    let mut j = 0;
    let mut k = left;

    while i < left_part.len() && j < right_part.len() {
        *comparisons += 1;
        steps.push(
            SortingStep::new(
                arr,
                format!("Merging: comparing {} with {}", left_part[i], right_part[j]),
            )
            .with_comparing([left + i, mid + 1 + j]),
        );

        if left_part[i] <= right_part[j] {
            arr[k] = left_part[i];
            i += 1;
        } else {
            arr[k] = right_part[j];
            j += 1;
            *swaps += 1;
        }
        k += 1;
    }

    while i < left_part.len() {
        arr[k] = left_part[i];
        i += 1;
        k += 1;
    }

    while j < right_part.len() {
        arr[k] = right_part[j];
        j += 1;
        k += 1;
    }

    steps.push(SortingStep::new(arr, format!("Merged [{}:{}]", left, right + 1)));
}

/// Quick sort: partition around a pivot, recurse on both sides.
pub fn quick_sort(values: &[i64]) -> SortingTrace {
    let mut arr = values.to_vec();
    let n = arr.len();
    let mut steps = vec![SortingStep::new(&arr, "Initial array")];
    let mut comparisons = 0;
    let mut swaps = 0;
    let mut settled: Vec<usize> = Vec::new();

    if n > 0 {
        quick_sort_recursive(
            &mut arr,
            0,
            n - 1,
            &mut steps,
            &mut comparisons,
            &mut swaps,
            &mut settled,
        );
    }

    steps.push(SortingStep::new(&arr, "Array sorted!").with_sorted(0..n));
    trace(SortAlgorithm::Quick, steps, comparisons, swaps)
}

fn quick_sort_recursive(
    arr: &mut [i64],
    low: usize,
    high: usize,
    steps: &mut Vec<SortingStep>,
    comparisons: &mut usize,
    swaps: &mut usize,
    settled: &mut Vec<usize>,
) {
    if low < high {
        let pi = partition(arr, low, high, steps, comparisons, swaps, settled);
        settled.push(pi);
        steps.push(
            SortingStep::new(arr, format!("Pivot {} is in final position", arr[pi]))
                .with_sorted(settled.iter().copied()),
        );
        if pi > low {
            quick_sort_recursive(arr, low, pi - 1, steps, comparisons, swaps, settled);
        }
        quick_sort_recursive(arr, pi + 1, high, steps, comparisons, swaps, settled);
    }
}

fn partition(
    arr: &mut [i64],
    low: usize,
    high: usize,
    steps: &mut Vec<SortingStep>,
    comparisons: &mut usize,
    swaps: &mut usize,
    settled: &[usize],
) -> usize {
    let pivot = arr[high];
    steps.push(
        SortingStep::new(arr, format!("Pivot selected: {}", pivot))
            .with_pivot(high)
            .with_sorted(settled.iter().copied()),
    );

    // Next slot for an element no larger than the pivot.
    let mut i = low;

    for j in low..high {
        *comparisons += 1;
        steps.push(
            SortingStep::new(arr, format!("Comparing {} with pivot {}", arr[j], pivot))
                .with_comparing([j, high])
                .with_pivot(high)
                .with_sorted(settled.iter().copied()),
        );

        if arr[j] <= pivot {
            if i != j {
                arr.swap(i, j);
                *swaps += 1;
                steps.push(
                    SortingStep::new(arr, format!("Swapping {} and {}", arr[j], arr[i]))
                        .with_swapping([i, j])
                        .with_pivot(high)
                        .with_sorted(settled.iter().copied()),
                );
            }
            i += 1;
        }
    }

    arr.swap(i, high);
    *swaps += 1;
    steps.push(
        SortingStep::new(arr, format!("Placing pivot at position {}", i))
            .with_swapping([i, high])
            .with_sorted(settled.iter().copied()),
    );

    i
}

/// Heap sort: build a max heap, then repeatedly move the root to the end.
pub fn heap_sort(values: &[i64]) -> SortingTrace {
    let mut arr = values.to_vec();
    let n = arr.len();
    let mut steps = vec![SortingStep::new(&arr, "Initial array")];
    let mut comparisons = 0;
    let mut swaps = 0;
    let mut settled: Vec<usize> = Vec::new();

    steps.push(SortingStep::new(&arr, "Building max heap..."));
    for i in (0..n / 2).rev() {
        heapify(&mut arr, n, i, &mut steps, &mut comparisons, &mut swaps, &settled);
    }
    steps.push(SortingStep::new(&arr, "Max heap built"));

    for i in (1..n).rev() {
        arr.swap(0, i);
        swaps += 1;
        settled.push(i);
        steps.push(
            SortingStep::new(&arr, format!("Moving max element {} to end", arr[i]))
                .with_swapping([0, i])
                .with_sorted(settled.iter().copied()),
        );
        heapify(&mut arr, i, 0, &mut steps, &mut comparisons, &mut swaps, &settled);
    }

    steps.push(SortingStep::new(&arr, "Array sorted!").with_sorted(0..n));
    trace(SortAlgorithm::Heap, steps, comparisons, swaps)
}

fn heapify(
    arr: &mut [i64],
    n: usize,
    i: usize,
    steps: &mut Vec<SortingStep>,
    comparisons: &mut usize,
    swaps: &mut usize,
    settled: &[usize],
) {
    let mut largest = i;
    let left = 2 * i + 1;
    let right = 2 * i + 2;

    if left < n {
        *comparisons += 1;
        steps.push(
            SortingStep::new(
                arr,
                format!("Comparing {} with left child {}", arr[largest], arr[left]),
            )
            .with_comparing([largest, left])
            .with_sorted(settled.iter().copied()),
        );
        if arr[left] > arr[largest] {
            largest = left;
        }
    }

    if right < n {
        *comparisons += 1;
        steps.push(
            SortingStep::new(
                arr,
                format!("Comparing {} with right child {}", arr[largest], arr[right]),
            )
            .with_comparing([largest, right])
            .with_sorted(settled.iter().copied()),
        );
        if arr[right] > arr[largest] {
            largest = right;
        }
    }

    if largest != i {
        arr.swap(i, largest);
        *swaps += 1;
        steps.push(
            SortingStep::new(arr, format!("Swapping {} and {}", arr[largest], arr[i]))
                .with_swapping([i, largest])
                .with_sorted(settled.iter().copied()),
        );
        heapify(arr, n, largest, steps, comparisons, swaps, settled);
    }
}

/// Counting sort: non-comparison sort by value occurrence counts.
pub fn counting_sort(values: &[i64]) -> SortingTrace {
    if values.is_empty() {
        return trace(
            SortAlgorithm::Counting,
            vec![SortingStep::new(&[], "Empty array")],
            0,
            0,
        );
    }

    let arr = values.to_vec();
    let mut steps = vec![SortingStep::new(&arr, "Initial array")];

    let max = arr.iter().copied().max().unwrap_or_default();
    let min = arr.iter().copied().min().unwrap_or_default();
    steps.push(SortingStep::new(&arr, format!("Range: {} to {}", min, max)));

    let span = (max - min) as usize + 1;
    let mut count = vec![0usize; span];
    let mut output = vec![0i64; arr.len()];

    for &num in &arr {
        count[(num - min) as usize] += 1;
    }
    steps.push(SortingStep::new(&arr, "Counted occurrences"));

    for i in 1..count.len() {
        count[i] += count[i - 1];
    }

    for i in (0..arr.len()).rev() {
        let bucket = (arr[i] - min) as usize;
        output[count[bucket] - 1] = arr[i];
        count[bucket] -= 1;
        steps.push(
            SortingStep::new(&output, format!("Placing {} at position {}", arr[i], count[bucket]))
                .with_comparing([count[bucket]]),
        );
    }

    steps.push(SortingStep::new(&output, "Array sorted!").with_sorted(0..output.len()));
    trace(SortAlgorithm::Counting, steps, arr.len(), 0)
}

/// Radix sort: stable counting passes from least to most significant digit.
pub fn radix_sort(values: &[i64]) -> SortingTrace {
    if values.is_empty() {
        return trace(
            SortAlgorithm::Radix,
            vec![SortingStep::new(&[], "Empty array")],
            0,
            0,
        );
    }

    let mut arr = values.to_vec();
    let mut steps = vec![SortingStep::new(&arr, "Initial array")];

    let max = arr.iter().copied().max().unwrap_or_default();
    let mut exp: i64 = 1;

    while max / exp > 0 {
        steps.push(SortingStep::new(&arr, format!("Sorting by digit at position {}", exp)));

        let mut count = [0usize; 10];
        let mut output = vec![0i64; arr.len()];

        for &num in &arr {
            count[(num / exp).rem_euclid(10) as usize] += 1;
        }
        for i in 1..10 {
            count[i] += count[i - 1];
        }
        for i in (0..arr.len()).rev() {
            let digit = (arr[i] / exp).rem_euclid(10) as usize;
            output[count[digit] - 1] = arr[i];
            count[digit] -= 1;
        }

        arr = output;
        steps.push(SortingStep::new(
            &arr,
            format!("After sorting by digit at position {}", exp),
        ));

        exp = match exp.checked_mul(10) {
            Some(next) => next,
            None => break,
        };
    }

    let len = arr.len();
    steps.push(SortingStep::new(&arr, "Array sorted!").with_sorted(0..len));
    trace(SortAlgorithm::Radix, steps, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [i64; 7] = [5, 2, 9, 1, 5, 6, 3];

    fn assert_valid_trace(trace: &SortingTrace, input: &[i64]) {
        let steps = &trace.steps;
        assert!(!steps.is_empty());

        // Final array is the sorted input.
        let mut expected = input.to_vec();
        expected.sort();
        assert_eq!(steps.last().unwrap().array, expected, "{}", trace.algorithm);

        for step in steps {
            for &index in step
                .comparing
                .iter()
                .chain(&step.swapping)
                .chain(&step.sorted)
                .chain(step.pivot.iter())
            {
                assert!(
                    index < step.array.len(),
                    "{}: index {} out of bounds in step '{}'",
                    trace.algorithm,
                    index,
                    step.description
                );
            }
        }

        // A settled index never becomes unsettled.
        let mut seen: Vec<usize> = Vec::new();
        for step in steps {
            for &index in &seen {
                assert!(
                    step.sorted.contains(&index) || step.sorted.is_empty(),
                    "{}: index {} left the sorted set in step '{}'",
                    trace.algorithm,
                    index,
                    step.description
                );
            }
            if !step.sorted.is_empty() {
                seen = step.sorted.clone();
            }
        }
    }

    #[test]
    fn every_algorithm_sorts_the_sample() {
        for run in [
            bubble_sort, selection_sort, insertion_sort, merge_sort,
            quick_sort, heap_sort, counting_sort, radix_sort,
        ] {
            assert_valid_trace(&run(&SAMPLE), &SAMPLE);
        }
    }

    #[test]
    fn bubble_counts_comparisons_and_swaps() {
        let trace = bubble_sort(&[3, 2, 1]);
        assert_eq!(trace.total_comparisons, 3);
        assert_eq!(trace.total_swaps, 3);
    }

    #[test]
    fn already_sorted_input_needs_no_swaps() {
        let trace = bubble_sort(&[1, 2, 3, 4]);
        assert_eq!(trace.total_swaps, 0);
        assert_eq!(trace.total_comparisons, 6);
    }

    #[test]
    fn empty_input_yields_a_single_step() {
        for run in [counting_sort, radix_sort] {
            let trace = run(&[]);
            assert_eq!(trace.steps.len(), 1);
            assert!(trace.steps[0].array.is_empty());
        }
        assert_valid_trace(&bubble_sort(&[]), &[]);
        assert_valid_trace(&merge_sort(&[]), &[]);
        assert_valid_trace(&quick_sort(&[]), &[]);
    }

    #[test]
    fn single_element_is_a_fixed_point() {
        for run in [
            bubble_sort, selection_sort, insertion_sort, merge_sort,
            quick_sort, heap_sort, counting_sort, radix_sort,
        ] {
            let trace = run(&[7]);
            assert_eq!(trace.steps.last().unwrap().array, vec![7]);
        }
    }

    #[test]
    fn counting_sort_handles_negative_values() {
        let trace = counting_sort(&[3, -1, 2, -5]);
        assert_eq!(trace.steps.last().unwrap().array, vec![-5, -1, 2, 3]);
    }

    #[test]
    fn quick_sort_accumulates_settled_pivots() {
        let trace = quick_sort(&SAMPLE);
        let settled_counts: Vec<usize> = trace
            .steps
            .iter()
            .filter(|s| s.description.contains("final position"))
            .map(|s| s.sorted.len())
            .collect();
        for pair in settled_counts.windows(2) {
            assert!(pair[1] > pair[0], "settled pivot set must grow");
        }
    }

    #[test]
    fn swap_descriptions_name_the_swapped_values() {
        let trace = bubble_sort(&[2, 1]);
        let swap_step = trace
            .steps
            .iter()
            .find(|s| !s.swapping.is_empty())
            .expect("one swap expected");
        assert_eq!(swap_step.description, "Swapping 2 and 1");
        assert_eq!(swap_step.array, vec![1, 2]);
    }
}
