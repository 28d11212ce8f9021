//! Heuristic coordinate elimination
//!
//! A coordinate sitting at zero or at a bound whose one-sided slopes all
//! point back into that spot by more than a margin `M` is unlikely to move
//! again, so it is dropped from the active set. `M` is the largest
//! optimality violation of the previous epoch divided by the number of
//! instances, never increasing between epochs; during the first epoch it is
//! infinite and nothing is eliminated.
//!
//! Elimination is one-way within a fit: a dropped coordinate is never
//! revisited, even if later updates to other weights would make it useful
//! again. This trades a small risk of a suboptimal final objective for
//! shorter epochs.

/// Slopes of the objective when moving `w` up or down
///
/// `up` is the right derivative, `down` the derivative along `-w`.
/// Moving in a direction decreases the objective iff its slope is negative.
fn slopes(w: f64, g: f64) -> (f64, f64) {
    let up = g + if w >= 0.0 { 1.0 } else { -1.0 };
    let down = -g - if w > 0.0 { 1.0 } else { -1.0 };
    (up, down)
}

/// Projected-subgradient optimality violation of one coordinate
///
/// Zero exactly when no feasible direction decreases the objective.
pub fn optimality_violation(w: f64, g: f64, lower: f64, upper: f64) -> f64 {
    let (up, down) = slopes(w, g);
    let mut violation = 0.0_f64;
    if w < upper {
        violation = violation.max(-up);
    }
    if w > lower {
        violation = violation.max(-down);
    }
    violation
}

/// Active-set bookkeeping for one fit call
#[derive(Debug)]
pub struct EliminationTracker {
    enabled: bool,
    /// Bitmap of coordinates still eligible for update
    active: Vec<bool>,
    n_active: usize,
    /// Coordinates flagged during the current epoch
    pending: Vec<usize>,
    threshold: f64,
    epoch_max_violation: f64,
    last_max_violation: f64,
    n_instances: usize,
}

impl EliminationTracker {
    /// Start with every coordinate active
    pub fn new(n_features: usize, n_instances: usize, enabled: bool) -> Self {
        Self {
            enabled,
            active: vec![true; n_features],
            n_active: n_features,
            pending: Vec::new(),
            threshold: f64::INFINITY,
            epoch_max_violation: 0.0,
            last_max_violation: f64::INFINITY,
            n_instances,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_active(&self, j: usize) -> bool {
        self.active[j]
    }

    pub fn n_active(&self) -> usize {
        self.n_active
    }

    pub fn n_eliminated(&self) -> usize {
        self.active.len() - self.n_active
    }

    /// Current elimination margin `M`
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Largest violation observed in the last completed epoch
    pub fn last_max_violation(&self) -> f64 {
        self.last_max_violation
    }

    /// Active coordinates in ascending order
    pub fn active_indices(&self) -> Vec<usize> {
        self.active
            .iter()
            .enumerate()
            .filter_map(|(j, &on)| on.then_some(j))
            .collect()
    }

    pub fn begin_epoch(&mut self) {
        self.pending.clear();
        self.epoch_max_violation = 0.0;
    }

    /// Record coordinate `j` at weight `w` with loss gradient `g`
    ///
    /// Returns `true` when the coordinate should be skipped and eliminated
    /// at the end of the epoch.
    pub fn observe(&mut self, j: usize, w: f64, g: f64, lower: f64, upper: f64) -> bool {
        if self.enabled && self.is_eliminable(w, g, lower, upper) {
            self.pending.push(j);
            return true;
        }

        let violation = optimality_violation(w, g, lower, upper);
        self.epoch_max_violation = self.epoch_max_violation.max(violation);
        false
    }

    fn is_eliminable(&self, w: f64, g: f64, lower: f64, upper: f64) -> bool {
        if w != 0.0 && w != lower && w != upper {
            return false;
        }
        let (up, down) = slopes(w, g);
        let m = self.threshold;
        (w >= upper || up > m) && (w <= lower || down > m)
    }

    /// Commit this epoch's eliminations and tighten the margin
    ///
    /// Returns the number of coordinates removed.
    pub fn end_epoch(&mut self) -> usize {
        let mut removed = 0;
        for &j in &self.pending {
            if self.active[j] {
                self.active[j] = false;
                removed += 1;
            }
        }
        self.n_active -= removed;
        self.pending.clear();

        self.last_max_violation = self.epoch_max_violation;
        if self.enabled {
            let margin = self.epoch_max_violation / self.n_instances.max(1) as f64;
            self.threshold = self.threshold.min(margin);
        }
        removed
    }
}
