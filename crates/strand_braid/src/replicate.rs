//! Building lists of circuits to braid.

/// Builds `n` values from `f(x)` for `x` in `0..n`, left to right.
pub fn row<T, E>(n: usize, f: impl FnMut(usize) -> Result<T, E>) -> Result<Vec<T>, E> {
    (0..n).map(f).collect()
}

/// Builds `n` values from `f(y)` for `y` in `0..n`, top to bottom.
pub fn col<T, E>(n: usize, f: impl FnMut(usize) -> Result<T, E>) -> Result<Vec<T>, E> {
    (0..n).map(f).collect()
}

/// Builds `n` values by calling `f` `n` times.
pub fn map_n<T, E>(n: usize, mut f: impl FnMut() -> Result<T, E>) -> Result<Vec<T>, E> {
    (0..n).map(|_| f()).collect()
}
