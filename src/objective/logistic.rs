//! Numerically safe logistic primitives
//!
//! Neither function ever exponentiates a large positive argument.

/// Logistic sigmoid σ(z) = 1 / (1 + exp(-z))
#[inline]
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Logistic loss log(1 + exp(-margin)) for margin = y·z
#[inline]
pub fn logistic_loss(margin: f64) -> f64 {
    if margin >= 0.0 {
        (-margin).exp().ln_1p()
    } else {
        -margin + margin.exp().ln_1p()
    }
}
