//! Score functions over cached aggregates.
//!
//! Every function here is pure arithmetic over an accumulator's tables: no
//! log re-scan, no mutation, no failure path. Degenerate inputs (zero
//! denominators, labels the log never saw, windows that admit no anchors)
//! uniformly score `0.0`, and any non-finite intermediate degrades to `0.0`
//! rather than leaking a NaN or infinity to callers.

use serde::{Deserialize, Serialize};

use crate::accumulators::{CirbAccumulator, CircAccumulator, CirmAccumulator, NstAccumulator};

/// Shape parameters for the NST blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NstParams {
    /// Geometric-blend weight on the backward term, in `[0, 1]`.
    pub lambda: f64,
    /// Exponent applied to the anchoring label's base probability in each
    /// term's denominator.
    pub alpha: f64,
}

impl Default for NstParams {
    fn default() -> Self {
        Self {
            lambda: 0.5,
            alpha: 1.0,
        }
    }
}

/// Summary of per-conditioning-label ratios for one (cause, effect, window)
/// query. An empty conditioning set summarizes to all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointSummary {
    pub max: f64,
    pub min: f64,
    pub avg: f64,
}

impl JointSummary {
    fn from_ratios(ratios: &[f64]) -> Self {
        if ratios.is_empty() {
            return Self::default();
        }
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        let mut sum = 0.0;
        for &r in ratios {
            max = max.max(r);
            min = min.min(r);
            sum += r;
        }
        Self {
            max,
            min,
            avg: sum / ratios.len() as f64,
        }
    }
}

/// Backward-strength score: the geometric blend
/// `left^lambda * right^(1 - lambda)` of a backward and a forward
/// duration-weighted lift term.
///
/// `left = (pw(x <- y) * A) / (p(x)^alpha * p(y) * Dcause(x))` where `A` is
/// the backward duration sum; `right` mirrors it forward with the effect's
/// duration total. Either term's zero denominator zeroes that term.
pub fn nst(acc: &NstAccumulator, cause: &str, effect: &str, window: usize, params: &NstParams) -> f64 {
    let base = acc.base();
    let p_cause = base.probability(cause);
    let p_effect = base.probability(effect);

    // A zero factor in either denominator zeroes the whole score, not just
    // its own term: `0^0 == 1`, so at the lambda extremes a zeroed term
    // would otherwise drop out of the blend and let the other leak through.
    if p_cause == 0.0
        || p_effect == 0.0
        || base.cause_duration_total(cause) == 0.0
        || base.effect_duration_total(effect) == 0.0
    {
        return 0.0;
    }

    let left = ratio(
        base.pw_backward(cause, effect, window) * acc.backward_duration_sum(cause, effect, window),
        p_cause.powf(params.alpha) * p_effect * base.cause_duration_total(cause),
    );
    let right = ratio(
        base.pw_forward(cause, effect, window) * acc.forward_duration_sum(cause, effect, window),
        p_cause * p_effect.powf(params.alpha) * base.effect_duration_total(effect),
    );

    finite_or_zero(left.powf(params.lambda) * right.powf(1.0 - params.lambda))
}

/// Complement-ratio score: the effect-anchored backward duration share over
/// the effect's base rate, `(A / Deffect(y)) / (N(y) / T)`.
pub fn cirb(acc: &CirbAccumulator, cause: &str, effect: &str, window: usize) -> f64 {
    let base = acc.base();
    if base.is_empty() {
        return 0.0;
    }
    let share = ratio(
        acc.backward_duration_sum(cause, effect, window),
        base.effect_duration_total(effect),
    );
    let rate = base.count(effect) as f64 / base.len() as f64;
    finite_or_zero(ratio(share, rate))
}

/// Conditioned-ratio score: the cause-normalized backward duration share
/// over the effect-normalized cause-absent complement share,
/// `(A / Dcause(x)) / (A' / Deffect(y))`.
pub fn circ(acc: &CircAccumulator, cause: &str, effect: &str, window: usize) -> f64 {
    let base = acc.base();
    let joint = ratio(
        acc.backward_duration_sum(cause, effect, window),
        base.cause_duration_total(cause),
    );
    let complement = ratio(
        acc.complement_duration_sum(cause, effect, window),
        base.effect_duration_total(effect),
    );
    finite_or_zero(ratio(joint, complement))
}

/// Joint-strength score over single conditioning labels: the CIRC-shaped
/// ratio computed per label `z` of the effect's conditioning list, then
/// summarized as max/min/avg. A zero denominator zeroes that label's ratio
/// only; the summary still spans the whole list.
pub fn cirm_single(acc: &CirmAccumulator, cause: &str, effect: &str, window: usize) -> JointSummary {
    let base = acc.base();
    let ratios: Vec<f64> = acc
        .catalog()
        .list(effect)
        .iter()
        .map(|z| {
            let joint = ratio(
                acc.single_joint_sum(cause, effect, z, window),
                base.cause_duration_total(cause),
            );
            let complement = ratio(
                acc.single_complement_sum(cause, effect, z, window),
                base.effect_duration_total(effect),
            );
            finite_or_zero(ratio(joint, complement))
        })
        .collect();
    JointSummary::from_ratios(&ratios)
}

/// Joint-strength score over conditioning subsets: like [`cirm_single`] but
/// one ratio per non-empty subset of the effect's conditioning list, gated
/// on every subset member occurring in the window.
pub fn cirm_subsets(acc: &CirmAccumulator, cause: &str, effect: &str, window: usize) -> JointSummary {
    let base = acc.base();
    let ratios: Vec<f64> = acc
        .catalog()
        .subsets(effect)
        .iter()
        .map(|zs| {
            let joint = ratio(
                acc.subset_joint_sum(cause, effect, zs, window),
                base.cause_duration_total(cause),
            );
            let complement = ratio(
                acc.subset_complement_sum(cause, effect, zs, window),
                base.effect_duration_total(effect),
            );
            finite_or_zero(ratio(joint, complement))
        })
        .collect();
    JointSummary::from_ratios(&ratios)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
