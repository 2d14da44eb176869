// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration, optionally loaded from environment variables.

use serde::{Deserialize, Serialize};

/// Default tolerance for the cross-product test when choosing a face basis.
pub const DEFAULT_BASIS_TOLERANCE: f64 = 1e-8;

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum cross-product magnitude accepted for a face's planar basis.
    pub basis_tolerance: f64,
    /// Process independent faces and solids on the rayon thread pool.
    pub parallel: bool,
    /// Always recompute solid-face signs instead of trusting the arrangement.
    pub recompute_solid_signs: bool,
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            basis_tolerance: std::env::var("CELLCHAIN_BASIS_TOLERANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|t: &f64| t.is_finite() && *t > 0.0)
                .unwrap_or(defaults.basis_tolerance),
            parallel: std::env::var("CELLCHAIN_PARALLEL")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.parallel),
            recompute_solid_signs: std::env::var("CELLCHAIN_RECOMPUTE_SOLID_SIGNS")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.recompute_solid_signs),
        }
    }

    /// Returns a copy with the given basis tolerance.
    pub fn with_basis_tolerance(mut self, tolerance: f64) -> Self {
        self.basis_tolerance = tolerance;
        self
    }

    /// Returns a copy with parallel processing switched on or off.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns a copy that always recomputes solid-face signs when set.
    pub fn with_recompute_solid_signs(mut self, recompute: bool) -> Self {
        self.recompute_solid_signs = recompute;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            basis_tolerance: DEFAULT_BASIS_TOLERANCE,
            parallel: true,
            recompute_solid_signs: false,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
