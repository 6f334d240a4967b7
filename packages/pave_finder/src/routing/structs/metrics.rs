//! Defines the structs which contain high level information about a route
//! (i.e. total distance, total gain, etc)

use serde::{Deserialize, Serialize};

use crate::common::graph_data::EdgeData;

/// Running totals for a route which is being walked edge by edge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentMetrics {
    pub dist: f64,
    pub gain: f64,
    pub paser_total: f64,
    pub weight_total: f64,
    pub segments: usize,
}

impl SegmentMetrics {
    pub fn new() -> SegmentMetrics {
        SegmentMetrics::default()
    }

    /// Update the metrics to reflect their state after traversing the
    /// provided edge
    pub fn take_step(&mut self, edata: &EdgeData) {
        self.dist += edata.distance;
        self.gain += edata.elevation_gain;
        self.paser_total += edata.paser_score;
        self.weight_total += edata.composite_weight;
        self.segments += 1;
    }

    /// Convert the running totals into the final analysis. Averages are
    /// taken per segment, and everything is zero if no steps were taken
    pub fn finalize(self) -> RouteAnalysis {
        if self.segments == 0 {
            return RouteAnalysis::default();
        }

        let segments = self.segments as f64;
        RouteAnalysis {
            total_distance_m: self.dist,
            total_elevation_gain_m: self.gain,
            average_paser_score: self.paser_total / segments,
            average_composite_weight: self.weight_total / segments,
            num_segments: self.segments,
        }
    }
}

/// Container for the overall composition of a completed route. The pavement
/// score here is the raw one (higher = better), not the inverted penalty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteAnalysis {
    pub total_distance_m: f64,
    pub total_elevation_gain_m: f64,
    pub average_paser_score: f64,
    pub average_composite_weight: f64,
    pub num_segments: usize,
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_take_step() {
        let mut metrics = SegmentMetrics::new();
        let mut edata = EdgeData::new("a".into(), "b".into(), 0, 120.0, 30.0, 8.0);
        edata.elevation_gain = 4.0;
        edata.composite_weight = 0.25;

        metrics.take_step(&edata);
        metrics.take_step(&edata);

        let target = SegmentMetrics {
            dist: 240.0,
            gain: 8.0,
            paser_total: 16.0,
            weight_total: 0.5,
            segments: 2,
        };
        assert_eq!(metrics, target);
    }

    #[test]
    fn test_finalize() {
        let metrics = SegmentMetrics {
            dist: 300.0,
            gain: 12.0,
            paser_total: 21.0,
            weight_total: 0.9,
            segments: 3,
        };

        let result = metrics.finalize();

        assert_relative_eq!(result.total_distance_m, 300.0);
        assert_relative_eq!(result.total_elevation_gain_m, 12.0);
        assert_relative_eq!(result.average_paser_score, 7.0);
        assert_relative_eq!(result.average_composite_weight, 0.3);
        assert_eq!(result.num_segments, 3);
    }

    #[test]
    fn test_finalize_empty() {
        let result = SegmentMetrics::new().finalize();

        assert_eq!(result, RouteAnalysis::default());
    }
}
