use std::{ops::Range, sync::Mutex};

use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested number of batches cannot be carved out of the image rows.
    #[error("cannot split {height} rows into {num_batches} batches, the batch count must be in 1..={height}")]
    InvalidConfiguration {
        /// The requested number of batches.
        num_batches: usize,
        /// The number of rows available.
        height: usize,
    },
}

/// Controls how a set of row batches is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run every batch on its own thread of a dedicated pool with one thread per batch.
    ///
    /// Batch `i` runs on the pool thread named `rowblur-batch-{i}` and no thread runs
    /// more than one batch.
    ///
    /// # Warning
    /// Creates a new thread pool on every call.
    #[default]
    ThreadPerBatch,

    /// Run the batches on the global Rayon thread pool.
    GlobalPool,

    /// Run the batches one after the other on the current thread.
    ///
    /// Useful for debugging and as a reference for the parallel strategies.
    Serial,
}

/// A contiguous half-open range of image rows owned by one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    /// Position of the batch, counted from the top of the image.
    pub index: usize,
    /// First row of the batch.
    pub start: usize,
    /// One past the last row of the batch.
    pub end: usize,
}

impl RowRange {
    /// Number of rows in the batch.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the batch holds no rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `row` belongs to the batch.
    pub fn contains(&self, row: usize) -> bool {
        (self.start..self.end).contains(&row)
    }

    /// The rows as a standard range.
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<RowRange> for Range<usize> {
    fn from(range: RowRange) -> Self {
        range.as_range()
    }
}

/// Split `height` rows into `num_batches` contiguous batches.
///
/// The first `height % num_batches` batches hold one row more than the rest, so
/// batch lengths never differ by more than one. The batches come back in
/// ascending order and cover `0..height` exactly once.
///
/// # Errors
///
/// Returns [`ParallelError::InvalidConfiguration`] unless `1 <= num_batches <= height`.
///
/// # Examples
///
/// ```
/// use rowblur_imgproc::parallel::partition_rows;
///
/// let batches = partition_rows(10, 3).unwrap();
/// let lens = batches.iter().map(|b| b.len()).collect::<Vec<_>>();
/// assert_eq!(lens, vec![4, 3, 3]);
/// ```
pub fn partition_rows(height: usize, num_batches: usize) -> Result<Vec<RowRange>, ParallelError> {
    if num_batches == 0 || num_batches > height {
        return Err(ParallelError::InvalidConfiguration {
            num_batches,
            height,
        });
    }

    let base = height / num_batches;
    let remainder = height % num_batches;

    let mut batches = Vec::with_capacity(num_batches);
    let mut start = 0;
    for index in 0..num_batches {
        let len = if index < remainder { base + 1 } else { base };
        batches.push(RowRange {
            index,
            start,
            end: start + len,
        });
        start += len;
    }

    Ok(batches)
}

/// Run `op` once for every unit of work and return when all of them have finished.
///
/// Each unit is moved into exactly one invocation of `op`. Units are independent:
/// the function gives no ordering guarantee between them, only that none is still
/// running when it returns.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `units` - The units of work, one per batch.
/// * `op` - The operation to run on each unit.
pub fn execute_batches<U, F>(
    strategy: ExecutionStrategy,
    units: Vec<U>,
    op: F,
) -> Result<(), ParallelError>
where
    U: Send,
    F: Fn(U) + Sync + Send,
{
    if units.is_empty() {
        return Ok(());
    }

    match strategy {
        ExecutionStrategy::Serial => {
            units.into_iter().for_each(op);
        }
        ExecutionStrategy::GlobalPool => {
            units.into_par_iter().for_each(op);
        }
        ExecutionStrategy::ThreadPerBatch => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(units.len())
                .thread_name(|i| format!("rowblur-batch-{i}"))
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            // broadcast runs exactly once on every pool thread, each thread takes the
            // unit at its own index
            let slots = units
                .into_iter()
                .map(|unit| Mutex::new(Some(unit)))
                .collect::<Vec<_>>();
            pool.broadcast(|ctx| {
                let unit = slots
                    .get(ctx.index())
                    .and_then(|slot| slot.lock().ok().and_then(|mut unit| unit.take()));
                if let Some(unit) = unit {
                    op(unit);
                }
            });
        }
    }

    Ok(())
}
