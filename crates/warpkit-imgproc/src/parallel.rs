use std::ops::Range;

use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0")]
    InvalidRowStride(usize),

    /// The requested rows do not fit in the buffer.
    #[error("rows {0:?} exceed a buffer of {1} rows")]
    RowsOutOfBounds(Range<usize>, usize),
}

/// Controls how row operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool, one contiguous block of rows per worker.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// [`par_for_each_row_init`] creates a new thread pool on every call, which has
    /// significant overhead. Wrap a batch of calls in [`with_strategy`] to build the
    /// pool once.
    Fixed(usize),
}

/// Run `op` under `strategy`, building the pool of [`ExecutionStrategy::Fixed`] once
/// for everything `op` does.
///
/// `op` receives the strategy to hand to [`par_for_each_row_init`]. Inside a fixed
/// pool this is [`ExecutionStrategy::ParallelRows`], which splits rows over the
/// pool threads.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `op` - The batch of row operations.
pub fn with_strategy<R, F>(strategy: ExecutionStrategy, op: F) -> Result<R, ParallelError>
where
    R: Send,
    F: FnOnce(ExecutionStrategy) -> R + Send,
{
    match strategy {
        ExecutionStrategy::Fixed(n) => {
            let pool = build_pool(n)?;
            Ok(pool.install(|| op(ExecutionStrategy::ParallelRows)))
        }
        _ => Ok(op(strategy)),
    }
}

fn build_pool(n: usize) -> Result<rayon::ThreadPool, ParallelError> {
    if n == 0 {
        return Err(ParallelError::InvalidThreadCount(n));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(n)
        .build()
        .map_err(|e| ParallelError::BuildError(e.to_string()))
}

/// Apply a function to every row in `rows` of a row-major buffer.
///
/// The rows are statically partitioned into contiguous blocks, one per worker. Each
/// worker calls `init` once to build its private scratch state and then `op` for each
/// of its rows with the absolute row index and the mutable row slice. Rows are
/// disjoint, so no synchronization is needed between workers.
///
/// # Arguments
///
/// * `buf` - The destination buffer.
/// * `stride` - Number of elements in one row.
/// * `rows` - The range of rows to visit.
/// * `strategy` - The execution strategy.
/// * `init` - Builds the per-worker scratch state.
/// * `op` - The operation to run on each row.
pub fn par_for_each_row_init<T, S, I, F>(
    buf: &mut [T],
    stride: usize,
    rows: Range<usize>,
    strategy: ExecutionStrategy,
    init: I,
    op: F,
) -> Result<(), ParallelError>
where
    T: Send,
    I: Fn() -> S + Sync + Send,
    F: Fn(&mut S, usize, &mut [T]) + Sync + Send,
{
    if stride == 0 {
        return Err(ParallelError::InvalidRowStride(stride));
    }

    let num_rows = buf.len() / stride;
    if rows.start > rows.end || rows.end > num_rows {
        return Err(ParallelError::RowsOutOfBounds(rows, num_rows));
    }

    if rows.is_empty() {
        return Ok(());
    }

    let y0 = rows.start;
    let block = &mut buf[rows.start * stride..rows.end * stride];
    let run_block = |first_row: usize, chunk: &mut [T]| {
        let mut scratch = init();
        for (i, row) in chunk.chunks_exact_mut(stride).enumerate() {
            op(&mut scratch, first_row + i, row);
        }
    };

    match strategy {
        ExecutionStrategy::Serial => run_block(y0, block),
        ExecutionStrategy::ParallelRows => {
            let rows_per_worker = rows.len().div_ceil(rayon::current_num_threads());
            block
                .par_chunks_mut(rows_per_worker * stride)
                .enumerate()
                .for_each(|(k, chunk)| run_block(y0 + k * rows_per_worker, chunk));
        }
        ExecutionStrategy::Fixed(n) => {
            let pool = build_pool(n)?;
            let rows_per_worker = rows.len().div_ceil(n);
            pool.install(|| {
                block
                    .par_chunks_mut(rows_per_worker * stride)
                    .enumerate()
                    .for_each(|(k, chunk)| run_block(y0 + k * rows_per_worker, chunk));
            });
        }
    }

    Ok(())
}
