/// Sums the present values; missing ones contribute nothing. Empty input is 0.0.
pub fn sum_present<I: IntoIterator<Item = Option<f64>>>(values: I) -> f64 {
    values.into_iter().flatten().sum()
}

/// Arithmetic mean of the present values. `None` when nothing is present.
pub fn mean_present<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
