//! Finds a false positive, corrects it, then shows the correction fading
//! once the cache overflows.
//!
//! ```bash
//! RUST_LOG=corrected_filter=trace cargo run --package corrected-filter --example false_positive_demo
//! ```

use corrected_filter::{CorrectedFilter, FilterError};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), FilterError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cache_size = 1 << 4;
    let filter = CorrectedFilter::<u64>::new(1 << 16, 0.0001, cache_size)?;
    for i in 0..(1u64 << 12) {
        filter.add(&i)?;
    }

    let mut corrected = Vec::new();
    for i in (1u64 << 12)..(1 << 24) {
        if filter.check(&i)? {
            filter.mark_false_positive(&i);
            info!(element = i, now = filter.check(&i)?, "Oopsed, marked false positive");
            corrected.push(i);
            if corrected.len() > cache_size {
                break;
            }
        }
    }

    if let Some(first) = corrected.first() {
        info!(
            element = first,
            check = filter.check(first)?,
            corrections = corrected.len(),
            "First correction after cache overflow"
        );
    }

    let stats = filter.stats();
    let metrics = filter.metrics();
    info!(
        items = stats.items,
        load_factor = stats.load_factor(),
        fingerprint_bits = stats.fingerprint_bits,
        observed_positive_rate = metrics.observed_positive_rate(),
        suppressed = metrics.positives_suppressed,
        "Done"
    );
    Ok(())
}
