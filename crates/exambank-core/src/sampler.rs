//! Weighted random selection without replacement.
//!
//! Used for picking questions out of a problem set and answers out of a
//! question's pool. Weights are integers; zero-weight items never compete.

use rand::Rng;

use crate::error::ExamError;

/// Randomly choose `count` distinct items, each with probability proportional
/// to its weight among the items not yet chosen.
///
/// Each draw picks `r` uniformly in `[1, total]` and walks the candidates in
/// input order, subtracting weights until `r` drops to zero or below. The item
/// that crosses the line is taken and its weight leaves the pool.
///
/// # Errors
///
/// - [`ExamError::InvalidCount`] if `count` is negative.
/// - [`ExamError::InvalidWeight`] if `weight` returns a negative value for any item.
/// - [`ExamError::InsufficientCandidates`] if fewer than `count` items have a
///   positive weight.
pub fn weighted_sample<T, F, R>(
    items: impl IntoIterator<Item = T>,
    weight: F,
    count: i64,
    rng: &mut R,
) -> Result<Vec<T>, ExamError>
where
    F: Fn(&T) -> i64,
    R: Rng + ?Sized,
{
    let requested = usize::try_from(count).map_err(|_| ExamError::InvalidCount(count))?;

    let mut pool: Vec<(Option<T>, u128)> = Vec::new();
    for item in items {
        let w = weight(&item);
        if w < 0 {
            return Err(ExamError::InvalidWeight(w));
        }
        if w > 0 {
            pool.push((Some(item), u128::from(w.unsigned_abs())));
        }
    }

    if pool.len() < requested {
        return Err(ExamError::InsufficientCandidates {
            available: pool.len(),
            requested,
        });
    }

    // Each weight fits in 63 bits, so the total cannot overflow u128.
    let mut total: u128 = pool.iter().map(|(_, w)| *w).sum();
    let mut selected = Vec::with_capacity(requested);

    while selected.len() < requested && total > 0 {
        let mut remaining = rng.gen_range(1..=total);
        for (slot, w) in pool.iter_mut() {
            if *w == 0 {
                continue;
            }
            if remaining > *w {
                remaining -= *w;
                continue;
            }
            if let Some(item) = slot.take() {
                selected.push(item);
            }
            total -= *w;
            *w = 0;
            break;
        }
    }

    debug_assert_eq!(selected.len(), requested);

    tracing::trace!(requested, candidates = pool.len(), "weighted sample drawn");
    Ok(selected)
}
