//! Rescales the three cost channels (pavement penalty, elevation gain and
//! distance) onto [0, 1] so that they can be blended together. Ranges are
//! taken across every edge in the graph, so this always runs over the whole
//! graph at once.

use tracing::{debug, info};

use crate::common::graph_data::RoadGraph;

/// The observed range of a single channel across all edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelRange {
    pub min: f64,
    pub max: f64,
}

impl ChannelRange {
    /// For a provided iterator of floats, retrieve the minimum and maximum
    /// values. If the iterator is empty, None will be returned
    pub fn from_values(vals: impl IntoIterator<Item = f64>) -> Option<Self> {
        vals.into_iter().fold(None, |range, val| match range {
            None => Some(ChannelRange { min: val, max: val }),
            Some(ChannelRange { min, max }) => Some(ChannelRange {
                min: min.min(val),
                max: max.max(val),
            }),
        })
    }

    /// Whether every value in the channel is identical, in which case a
    /// min-max rescale is undefined
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }

    /// Min-max normalization, 0 for every value if the range is degenerate
    pub fn min_max_scale(&self, val: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            ((val - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        }
    }

    /// Normalization against the maximum only, for channels where zero is a
    /// meaningful floor rather than an arbitrary one
    pub fn max_scale(&self, val: f64) -> f64 {
        if self.max > 0.0 {
            (val / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// The ranges which were used to normalize each channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationRanges {
    pub paser: ChannelRange,
    pub elev: ChannelRange,
    pub dist: ChannelRange,
}

/// Calculate norm_paser, norm_elev and norm_dist for every edge in the
/// graph. Pavement and distance use min-max normalization, elevation gain is
/// divided through by its maximum. Returns the ranges used, or None if the
/// graph has no edges.
pub fn normalize_edge_attributes(
    graph: &mut RoadGraph,
) -> Option<NormalizationRanges> {
    let paser = ChannelRange::from_values(
        graph.edge_weights().map(|edata| edata.inverted_paser),
    )?;
    let elev = ChannelRange::from_values(
        graph.edge_weights().map(|edata| edata.elevation_gain),
    )?;
    let dist =
        ChannelRange::from_values(graph.edge_weights().map(|edata| edata.distance))?;

    info!(
        paser_min = paser.min,
        paser_max = paser.max,
        elev_min = elev.min,
        elev_max = elev.max,
        dist_min = dist.min,
        dist_max = dist.max,
        "Normalizing edge attributes"
    );
    for (channel, range) in [("paser", paser), ("distance", dist)] {
        if range.is_degenerate() {
            debug!(channel, value = range.min, "Degenerate range, channel set to 0");
        }
    }
    if elev.max <= 0.0 {
        debug!(channel = "elevation", "No elevation gain, channel set to 0");
    }

    for edata in graph.edge_weights_mut() {
        edata.norm_paser = paser.min_max_scale(edata.inverted_paser);
        edata.norm_elev = elev.max_scale(edata.elevation_gain);
        edata.norm_dist = dist.min_max_scale(edata.distance);
    }

    Some(NormalizationRanges { paser, elev, dist })
}
