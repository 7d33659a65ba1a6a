//! Skeleton extraction and endpoint classification for root masks.
//!
//! The skeleton is obtained by iterative thinning (`thinning`), then every
//! skeleton pixel is classified by its 3×3 box sum, centre included
//! (`topology`). A pixel whose sum is exactly 2 has a single neighbour and is
//! an endpoint.
//!
//! `branch_count` is the number of endpoints. This is a structural proxy
//! kept for compatibility with existing measurements, not a graph-theoretic
//! branch count: junction pixels (sum ≥ 4) never contribute to it. They are
//! counted separately in `junction_count` for diagnostics.
mod thinning;
mod topology;


pub use thinning::thin;
pub use topology::{endpoint_mask, junction_mask, neighbourhood_sums};

use crate::mask::Mask;
use serde::Serialize;

/// Thinned mask. Every pixel is also foreground in the source mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skeleton {
    mask: Mask,
}

impl Skeleton {
    /// Thin `source` into its skeleton.
    pub fn extract(source: &Mask) -> Self {
        Self {
            mask: thin(source),
        }
    }

    pub fn as_mask(&self) -> &Mask {
        &self.mask
    }

    pub fn pixel_count(&self) -> usize {
        self.mask.count()
    }

    /// Classify the skeleton pixels.
    pub fn analyze(&self) -> SkeletonAnalysis {
        let sums = neighbourhood_sums(&self.mask);
        let endpoints = endpoint_mask(&self.mask, &sums);
        let junction_count = junction_mask(&self.mask, &sums).count();
        SkeletonAnalysis {
            branch_count: endpoints.count(),
            junction_count,
            pixel_count: self.mask.count(),
            endpoints,
        }
    }
}

/// Per-skeleton topology summary.
#[derive(Clone, Debug, Serialize)]
pub struct SkeletonAnalysis {
    /// Endpoint count (box sum == 2).
    pub branch_count: usize,
    /// Pixels with box sum ≥ 4, diagnostics only.
    pub junction_count: usize,
    pub pixel_count: usize,
    #[serde(skip)]
    pub endpoints: Mask,
}
