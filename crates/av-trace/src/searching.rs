//! Searching step producers
//!
//! Ordered-array algorithms (everything except linear search) sort a copy of
//! the input first; the recorded steps reference indices into that sorted
//! copy.

use crate::catalog::SearchAlgorithm;
use crate::step::{SearchingStep, SearchingTrace};

fn trace(
    algorithm: SearchAlgorithm,
    steps: Vec<SearchingStep>,
    found_at: Option<usize>,
) -> SearchingTrace {
    SearchingTrace {
        algorithm: algorithm.as_str().to_owned(),
        steps,
        found: found_at.is_some(),
        found_at,
    }
}

fn not_found_step(array: &[i64], target: i64) -> SearchingStep {
    SearchingStep::new(array, format!("{} not found in array", target)).with_found(false)
}

fn found_step(array: &[i64], target: i64, index: usize) -> SearchingStep {
    SearchingStep::new(array, format!("Found {} at index {}!", target, index))
        .with_current(index)
        .with_found(true)
}

/// Linear search: check every index in order.
pub fn linear_search(values: &[i64], target: i64) -> SearchingTrace {
    let arr = values.to_vec();
    let mut steps = vec![SearchingStep::new(
        &arr,
        format!("Searching for {} in array", target),
    )];
    let mut found_at = None;

    for (i, &num) in arr.iter().enumerate() {
        steps.push(
            SearchingStep::new(&arr, format!("Checking index {}: {}", i, num)).with_current(i),
        );

        if num == target {
            found_at = Some(i);
            steps.push(found_step(&arr, target, i));
            break;
        }
    }

    if found_at.is_none() {
        steps.push(not_found_step(&arr, target));
    }

    trace(SearchAlgorithm::Linear, steps, found_at)
}

/// Binary search: bisect a sorted copy of the input.
pub fn binary_search(values: &[i64], target: i64) -> SearchingTrace {
    let mut arr = values.to_vec();
    arr.sort();

    let mut steps = vec![SearchingStep::new(
        &arr,
        format!("Binary search requires sorted array. Searching for {}", target),
    )];
    let mut found_at = None;

    if !arr.is_empty() {
        let mut left = 0usize;
        let mut right = arr.len() - 1;

        loop {
            let mid = (left + right) / 2;
            steps.push(
                SearchingStep::new(&arr, format!("Checking middle: index {} = {}", mid, arr[mid]))
                    .with_left(left)
                    .with_right(right)
                    .with_mid(mid),
            );

            if arr[mid] == target {
                found_at = Some(mid);
                steps.push(
                    SearchingStep::new(&arr, format!("Found {} at index {}!", target, mid))
                        .with_mid(mid)
                        .with_found(true),
                );
                break;
            } else if arr[mid] < target {
                steps.push(
                    SearchingStep::new(
                        &arr,
                        format!("{} < {}, searching right half", arr[mid], target),
                    )
                    .with_left(left)
                    .with_right(right)
                    .with_mid(mid),
                );
                left = mid + 1;
                if left > right {
                    break;
                }
            } else {
                steps.push(
                    SearchingStep::new(
                        &arr,
                        format!("{} > {}, searching left half", arr[mid], target),
                    )
                    .with_left(left)
                    .with_right(right)
                    .with_mid(mid),
                );
                if mid == 0 {
                    break;
                }
                right = mid - 1;
                if left > right {
                    break;
                }
            }
        }
    }

    if found_at.is_none() {
        steps.push(not_found_step(&arr, target));
    }

    trace(SearchAlgorithm::Binary, steps, found_at)
}

/// Jump search: leap ahead in √n blocks, then scan the block linearly.
pub fn jump_search(values: &[i64], target: i64) -> SearchingTrace {
    let mut arr = values.to_vec();
    arr.sort();
    let n = arr.len();

    if n == 0 {
        return trace(
            SearchAlgorithm::Jump,
            vec![SearchingStep::new(&[], "Empty array")],
            None,
        );
    }

    let block = (n as f64).sqrt() as usize;
    let mut steps = vec![SearchingStep::new(
        &arr,
        format!("Jump search with step size {}. Searching for {}", block, target),
    )];

    let mut prev = 0usize;
    let mut step = block;

    while arr[step.min(n) - 1] < target {
        steps.push(
            SearchingStep::new(
                &arr,
                format!("Jumping: {} < {}", arr[step.min(n) - 1], target),
            )
            .with_current(step.min(n) - 1),
        );
        prev = step;
        step += block;
        if prev >= n {
            steps.push(not_found_step(&arr, target));
            return trace(SearchAlgorithm::Jump, steps, None);
        }
    }

    steps.push(
        SearchingStep::new(
            &arr,
            format!("Linear search in block [{}:{}]", prev, step.min(n)),
        )
        .with_left(prev)
        .with_right(step.min(n) - 1),
    );

    let mut found_at = None;
    while prev < step.min(n) {
        steps.push(
            SearchingStep::new(&arr, format!("Checking index {}: {}", prev, arr[prev]))
                .with_current(prev),
        );

        if arr[prev] == target {
            found_at = Some(prev);
            steps.push(found_step(&arr, target, prev));
            break;
        }
        prev += 1;
    }

    if found_at.is_none() {
        steps.push(not_found_step(&arr, target));
    }

    trace(SearchAlgorithm::Jump, steps, found_at)
}

/// Interpolation search: probe where the target is expected to sit in a
/// uniformly distributed sorted array.
pub fn interpolation_search(values: &[i64], target: i64) -> SearchingTrace {
    let mut arr = values.to_vec();
    arr.sort();
    let n = arr.len();

    if n == 0 {
        return trace(
            SearchAlgorithm::Interpolation,
            vec![SearchingStep::new(&[], "Empty array")],
            None,
        );
    }

    let mut steps = vec![SearchingStep::new(
        &arr,
        format!("Interpolation search. Searching for {}", target),
    )];
    let mut found_at = None;

    let mut low = 0usize;
    let mut high = n - 1;

    while low <= high && target >= arr[low] && target <= arr[high] {
        if low == high {
            if arr[low] == target {
                found_at = Some(low);
                steps.push(found_step(&arr, target, low));
            }
            break;
        }

        let span = arr[high] - arr[low];
        if span == 0 {
            // All values in the range are equal; the loop condition already
            // guarantees they equal the target.
            found_at = Some(low);
            steps.push(found_step(&arr, target, low));
            break;
        }

        let offset = (target - arr[low]) as i128 * (high - low) as i128 / span as i128;
        let pos = low + offset as usize;

        steps.push(
            SearchingStep::new(
                &arr,
                format!("Interpolated position: {}, value: {}", pos, arr[pos]),
            )
            .with_left(low)
            .with_right(high)
            .with_current(pos),
        );

        if arr[pos] == target {
            found_at = Some(pos);
            steps.push(found_step(&arr, target, pos));
            break;
        } else if arr[pos] < target {
            low = pos + 1;
        } else {
            if pos == 0 {
                break;
            }
            high = pos - 1;
        }
    }

    if found_at.is_none() {
        steps.push(not_found_step(&arr, target));
    }

    trace(SearchAlgorithm::Interpolation, steps, found_at)
}

/// Exponential search: double the probe index to bound the target, then
/// binary search within the bounded range.
pub fn exponential_search(values: &[i64], target: i64) -> SearchingTrace {
    let mut arr = values.to_vec();
    arr.sort();
    let n = arr.len();

    if n == 0 {
        return trace(
            SearchAlgorithm::Exponential,
            vec![SearchingStep::new(&[], "Empty array")],
            None,
        );
    }

    let mut steps = vec![SearchingStep::new(
        &arr,
        format!("Exponential search. Searching for {}", target),
    )];

    if arr[0] == target {
        return trace(
            SearchAlgorithm::Exponential,
            vec![found_step(&arr, target, 0)],
            Some(0),
        );
    }

    let mut i = 1usize;
    while i < n && arr[i] <= target {
        steps.push(
            SearchingStep::new(&arr, format!("Exponential jump to index {}: {}", i, arr[i]))
                .with_current(i),
        );
        i *= 2;
    }

    let mut left = i / 2;
    let mut right = i.min(n - 1);
    steps.push(
        SearchingStep::new(&arr, format!("Binary search in range [{}:{}]", left, right))
            .with_left(left)
            .with_right(right),
    );

    let mut found_at = None;
    while left <= right {
        let mid = (left + right) / 2;
        steps.push(
            SearchingStep::new(&arr, format!("Checking middle: {}", arr[mid]))
                .with_left(left)
                .with_right(right)
                .with_mid(mid),
        );

        if arr[mid] == target {
            found_at = Some(mid);
            steps.push(
                SearchingStep::new(&arr, format!("Found {} at index {}!", target, mid))
                    .with_mid(mid)
                    .with_found(true),
            );
            break;
        } else if arr[mid] < target {
            left = mid + 1;
        } else {
            if mid == 0 {
                break;
            }
            right = mid - 1;
        }
    }

    if found_at.is_none() {
        steps.push(not_found_step(&arr, target));
    }

    trace(SearchAlgorithm::Exponential, steps, found_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [i64; 8] = [14, 3, 27, 8, 1, 42, 19, 5];

    fn all() -> [fn(&[i64], i64) -> SearchingTrace; 5] {
        [
            linear_search,
            binary_search,
            jump_search,
            interpolation_search,
            exponential_search,
        ]
    }

    #[test]
    fn every_algorithm_finds_a_present_value() {
        for run in all() {
            let result = run(&SAMPLE, 19);
            assert!(result.found, "{} missed 19", result.algorithm);
            let at = result.found_at.expect("found_at set when found");
            assert_eq!(result.steps.last().unwrap().array[at], 19);
        }
    }

    #[test]
    fn every_algorithm_reports_absent_values() {
        for run in all() {
            let result = run(&SAMPLE, 99);
            assert!(!result.found, "{} claimed to find 99", result.algorithm);
            assert_eq!(result.found_at, None);
            assert_eq!(result.steps.last().unwrap().found, Some(false));
        }
    }

    #[test]
    fn linear_search_preserves_input_order() {
        let result = linear_search(&SAMPLE, 27);
        assert_eq!(result.found_at, Some(2));
        assert_eq!(result.steps[0].array, SAMPLE.to_vec());
    }

    #[test]
    fn ordered_algorithms_search_the_sorted_copy() {
        let result = binary_search(&SAMPLE, 27);
        let mut sorted = SAMPLE.to_vec();
        sorted.sort();
        assert_eq!(result.steps[0].array, sorted);
        assert_eq!(result.found_at, Some(6));
    }

    #[test]
    fn empty_arrays_never_find_anything() {
        for run in all() {
            let result = run(&[], 1);
            assert!(!result.found);
            assert!(!result.steps.is_empty());
        }
    }

    #[test]
    fn exponential_search_shortcuts_on_the_first_element() {
        let result = exponential_search(&SAMPLE, 1);
        assert_eq!(result.found_at, Some(0));
        assert_eq!(result.steps.len(), 1);
    }

    #[test]
    fn step_indices_stay_in_bounds() {
        for run in all() {
            for target in [1, 19, 42, -7, 99] {
                let result = run(&SAMPLE, target);
                for step in &result.steps {
                    for index in [step.current, step.left, step.right, step.mid]
                        .into_iter()
                        .flatten()
                    {
                        assert!(index < step.array.len().max(1));
                    }
                }
            }
        }
    }

    #[test]
    fn duplicate_heavy_input_does_not_stall_interpolation() {
        let result = interpolation_search(&[4, 4, 4, 4], 4);
        assert!(result.found);
        let miss = interpolation_search(&[4, 4, 4, 4], 5);
        assert!(!miss.found);
    }
}
