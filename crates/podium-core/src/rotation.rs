//! Rotation offset transform.
//!
//! A stored [`Rotation`] always describes the first pass: which teams start
//! on which apparatus. After every pass the teams move on to the next
//! apparatus in stage order. Instead of rewriting the stored assignment,
//! the displayed assignment for pass `offset` is derived by shifting:
//! apparatus at position `i` shows what was stored at position
//! `modulo(i - offset, len)`.

use std::collections::BTreeMap;

use podium_types::{Apparatus, ApparatusAssignment, Rotation};

/// Mathematical modulo: the result always has the sign of `m`.
///
/// For positive `m` this equals `((n % m) + m) % m` and is never negative,
/// unlike Rust's `%` which keeps the sign of the dividend. Returns 0 when
/// `m` is 0.
pub const fn modulo(n: i64, m: i64) -> i64 {
    match n.checked_rem_euclid(m) {
        Some(r) => r,
        None => 0,
    }
}

/// Compute the displayed apparatus assignment for a given pass.
///
/// `apparatus_order` is the effective apparatus list of the rotation in
/// stage order. Apparatus without a stored entry display an empty
/// assignment. Team ids are passed through unchanged. An empty order
/// yields an empty map.
pub fn compute_effective_rotation(
    stored: &Rotation,
    apparatus_order: &[Apparatus],
    offset: i64,
) -> BTreeMap<Apparatus, ApparatusAssignment> {
    let Ok(len) = i64::try_from(apparatus_order.len()) else {
        return BTreeMap::new();
    };
    if len == 0 {
        return BTreeMap::new();
    }

    // Reduce first so `i - shift` stays within (-len, len).
    let shift = modulo(offset, len);

    apparatus_order
        .iter()
        .zip(0_i64..)
        .map(|(&apparatus, position)| {
            let source = modulo(position.saturating_sub(shift), len);
            let assignment = usize::try_from(source)
                .ok()
                .and_then(|idx| apparatus_order.get(idx))
                .and_then(|source_apparatus| stored.apparatuses.get(source_apparatus))
                .cloned()
                .unwrap_or_default();
            (apparatus, assignment)
        })
        .collect()
}
