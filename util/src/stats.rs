/// Arithmetic mean of integer samples. Empty input yields 0.
pub fn mean(values: &[u32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u64 = values.iter().map(|&v| v as u64).sum();
    sum as f32 / values.len() as f32
}

/// Population standard deviation (divides by the full count, not n-1).
pub fn population_stddev(values: &[u32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f32 = values
        .iter()
        .map(|&v| {
            let d = v as f32 - m;
            d * d
        })
        .sum();
    libm::sqrtf(sum_sq / values.len() as f32)
}
