use crate::ring::Vector;

/// Maps each coefficient of a vector using the provided mapping function.
///
/// # Arguments
/// * `vector` - The input coefficients to transform
/// * `mapper` - A function that maps each coefficient
///
/// # Returns
/// A new vector with each coefficient transformed by the mapper function
pub fn map_vector(vector: &[i64], mapper: &dyn Fn(i64) -> i64) -> Vector {
    vector.iter().map(|&val| mapper(val)).collect()
}

/// Returns the coefficient at `index`, treating missing high-degree terms as zero.
pub fn coefficient_at(vector: &[i64], index: usize) -> i64 {
    vector.get(index).copied().unwrap_or(0)
}
