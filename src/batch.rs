//! Bounded batch dispatch for bulk extraction.
//!
//! A batch runs one job per entry over a fixed-size worker pool. Failure
//! handling follows the two error classes of [`XgFileError`]:
//!
//! - *entry-local* errors are caught at the dispatch boundary, logged with
//!   the entry's identity, counted as skipped, and never stop the batch;
//! - everything else is fatal: the worker records the error in its own slot,
//!   dispatch of new entries stops, in-flight entries drain, and the first
//!   recorded error is returned after all workers join.
//!
//! All coordination state lives in a per-batch [`BatchContext`]; nothing is
//! process-global and no counter is shared without synchronization.

use std::fmt::Display;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use log::warn;

use xg_types::file::XgFileError;

/// Returns the default worker count: one per available CPU core.
pub fn available_workers() -> usize {
	thread::available_parallelism().map(std::num::NonZero::get).unwrap_or(1)
}

/// Per-batch coordination state: progress counters and the stop flag.
///
/// Created per batch invocation and dropped when the batch returns; workers
/// only ever see a shared reference.
#[derive(Debug, Default)]
pub struct BatchContext {
	processed: AtomicUsize,
	skipped: AtomicUsize,
	stop: AtomicBool,
}

impl BatchContext {
	/// Creates a fresh context with zeroed counters.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the number of successfully processed entries so far.
	pub fn processed(&self) -> usize {
		self.processed.load(Ordering::Relaxed)
	}

	/// Returns the number of skipped entries so far.
	pub fn skipped(&self) -> usize {
		self.skipped.load(Ordering::Relaxed)
	}

	/// Returns `true` once a fatal error has stopped dispatch.
	pub fn is_stopped(&self) -> bool {
		self.stop.load(Ordering::Relaxed)
	}

	fn note_processed(&self) {
		self.processed.fetch_add(1, Ordering::Relaxed);
	}

	fn note_skipped(&self) {
		self.skipped.fetch_add(1, Ordering::Relaxed);
	}

	fn request_stop(&self) {
		self.stop.store(true, Ordering::Relaxed);
	}
}

/// Final counts of a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
	/// Entries that completed successfully
	pub processed: usize,
	/// Entries skipped over entry-local errors (each one logged)
	pub skipped: usize,
}

/// Runs `work` over every item with a bounded worker pool.
///
/// `workers` is clamped to at least 1 and at most the item count. Workers
/// pull items off a shared atomic cursor, so entries complete in no
/// particular order; anything needing ordered output must order by entry
/// identity, not completion.
///
/// # Errors
///
/// Returns the first fatal error a worker recorded. Entry-local errors are
/// logged and counted in the report instead.
pub fn run<T, F>(
	items: &[T],
	workers: usize,
	ctx: &BatchContext,
	work: F,
) -> Result<BatchReport, XgFileError>
where
	T: Sync + Display,
	F: Fn(&T) -> Result<(), XgFileError> + Sync,
{
	let workers = workers.clamp(1, items.len().max(1));
	let cursor = AtomicUsize::new(0);
	let fatal: Vec<OnceLock<XgFileError>> = (0..workers).map(|_| OnceLock::new()).collect();

	thread::scope(|scope| {
		let cursor = &cursor;
		let work = &work;
		for slot in &fatal {
			scope.spawn(move || {
				loop {
					if ctx.is_stopped() {
						break;
					}
					let index = cursor.fetch_add(1, Ordering::SeqCst);
					let Some(item) = items.get(index) else {
						break;
					};

					match work(item) {
						Ok(()) => ctx.note_processed(),
						Err(err) if err.is_entry_local() => {
							warn!("skipping {item}: {err}");
							ctx.note_skipped();
						}
						Err(err) => {
							let _ = slot.set(err);
							ctx.request_stop();
							break;
						}
					}
				}
			});
		}
	});

	for slot in fatal {
		if let Some(err) = slot.into_inner() {
			return Err(err);
		}
	}

	Ok(BatchReport {
		processed: ctx.processed(),
		skipped: ctx.skipped(),
	})
}
