//! This module contains structs which represent the route configuration
//! options selected by the end user. In particular, the RouteConfig struct is
//! passed through every stage of the optimisation, and is validated once when
//! it is created from a UserRouteConfig.

use clap::Parser;
use geo::Point;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::common::error::ConfigError;
use crate::common::graph_data::NodeId;

/// Weight for pavement condition, the highest priority criterion
pub const DEFAULT_ALPHA: f64 = 0.611;
/// Weight for elevation gain
pub const DEFAULT_BETA: f64 = 0.278;
/// Weight for distance, the lowest priority criterion
pub const DEFAULT_GAMMA: f64 = 0.111;

/// Maximum amount by which the weights may miss summing to exactly 1
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Calculate Rank Order Centroid weights for n criteria which have been
/// ranked in strict order of priority. The weight for the criterion at rank
/// i is (1/n) * sum(1/k for k in i..=n)
pub fn roc_coefficients(n: usize) -> Vec<f64> {
    let nf = n as f64;
    (1..=n)
        .map(|i| (i..=n).map(|k| 1.0 / k as f64).sum::<f64>() / nf)
        .collect()
}

/// The coefficients used to blend pavement condition, elevation gain and
/// distance into a single edge cost. These can only be created through
/// RocWeights::new, so any instance is guaranteed to be positive, to sum to
/// 1 and to be strictly decreasing in priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RocWeights {
    alpha: f64,
    beta: f64,
    gamma: f64,
}

impl RocWeights {
    /// Validate a set of user-provided weights
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidWeights {
            alpha,
            beta,
            gamma,
            reason: reason.to_string(),
        };

        if !(alpha.is_finite() && beta.is_finite() && gamma.is_finite()) {
            return Err(invalid("all weights must be finite"));
        }
        if gamma <= 0.0 {
            return Err(invalid("all weights must be greater than zero"));
        }
        if !(alpha > beta && beta > gamma) {
            return Err(invalid(
                "weights must be strictly decreasing (pavement > elevation > distance)",
            ));
        }
        let total = alpha + beta + gamma;
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid(&format!("weights sum to {total}, not 1.0")));
        }

        Ok(RocWeights { alpha, beta, gamma })
    }

    /// Exact (unrounded) ROC weights for the three criteria
    pub fn rank_order_centroid() -> Self {
        let coeffs = roc_coefficients(3);
        RocWeights {
            alpha: coeffs[0],
            beta: coeffs[1],
            gamma: coeffs[2],
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for RocWeights {
    fn default() -> Self {
        RocWeights {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            gamma: DEFAULT_GAMMA,
        }
    }
}

/// How the start or end of a route should be picked out of the graph
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSelector {
    /// A node identifier exactly as it appears in the graph artifact
    Id(NodeId),
    /// The node closest to a point, as (lon, lat)
    Nearest(Point),
}

impl FromStr for NodeSelector {
    type Err = ConfigError;

    /// Anything prefixed with '@' is read as 'lat,lon', everything else is
    /// treated as a node identifier
    fn from_str(input: &str) -> Result<NodeSelector, Self::Err> {
        let input = input.trim();
        let invalid = |reason: &str| ConfigError::InvalidSelector {
            value: input.to_string(),
            reason: reason.to_string(),
        };

        match input.strip_prefix('@') {
            Some(coords) => {
                let parts: Vec<&str> = coords.split(',').collect();
                if parts.len() != 2 {
                    return Err(invalid("coordinates must be given as @lat,lon"));
                }
                let lat: f64 = parts[0]
                    .trim()
                    .parse()
                    .map_err(|_| invalid("latitude is not a number"))?;
                let lon: f64 = parts[1]
                    .trim()
                    .parse()
                    .map_err(|_| invalid("longitude is not a number"))?;
                if !(-90.0..=90.0).contains(&lat)
                    || !(-180.0..=180.0).contains(&lon)
                {
                    return Err(invalid("coordinates are out of range"));
                }
                Ok(NodeSelector::Nearest(Point::new(lon, lat)))
            }
            None => {
                if input.is_empty() {
                    Err(invalid("node identifier is empty"))
                } else {
                    Ok(NodeSelector::Id(NodeId::from(input)))
                }
            }
        }
    }
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn default_beta() -> f64 {
    DEFAULT_BETA
}

fn default_gamma() -> f64 {
    DEFAULT_GAMMA
}

/// Stores the user's requested route configuration exactly as it is received,
/// either from the command line (with environment variable fallbacks) or
/// from a JSON document
#[derive(Parser, Deserialize, Debug, PartialEq)]
#[command(
    author,
    version,
    about = "Find the most cycle-friendly route through a road graph annotated \
             with pavement condition scores"
)]
pub struct UserRouteConfig {
    /// Node-link JSON graph carrying elevation and pavement scores
    #[arg(
        long,
        env = "PF_GRAPH_PATH",
        default_value = "data/updated_road_network.json"
    )]
    pub graph_path: PathBuf,

    /// Where the route record will be written
    #[arg(
        long,
        env = "PF_OUTPUT_PATH",
        default_value = "data/optimized_route.json"
    )]
    pub output_path: PathBuf,

    /// Weight for pavement condition
    #[arg(long, env = "PF_ALPHA", default_value_t = DEFAULT_ALPHA)]
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Weight for elevation gain
    #[arg(long, env = "PF_BETA", default_value_t = DEFAULT_BETA)]
    #[serde(default = "default_beta")]
    pub beta: f64,

    /// Weight for distance
    #[arg(long, env = "PF_GAMMA", default_value_t = DEFAULT_GAMMA)]
    #[serde(default = "default_gamma")]
    pub gamma: f64,

    /// Start node id, or @lat,lon for the nearest node. Defaults to the
    /// first node in the graph artifact
    #[arg(long, env = "PF_START", allow_hyphen_values = true)]
    #[serde(default)]
    pub start: Option<String>,

    /// End node id, or @lat,lon for the nearest node. Defaults to the last
    /// node in the graph artifact
    #[arg(long, env = "PF_END", allow_hyphen_values = true)]
    #[serde(default)]
    pub end: Option<String>,

    /// Abandon the path search after this many seconds
    #[arg(long, env = "PF_MAX_SEARCH_SECS")]
    #[serde(default)]
    pub max_search_secs: Option<f64>,
}

/// Stores the user's requested route configuration in a format which can be
/// used in the rest of this package. Users should first create a
/// UserRouteConfig and use try_into to convert to RouteConfig, which is where
/// all validation happens.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteConfig {
    pub graph_path: PathBuf,
    pub output_path: PathBuf,
    pub weights: RocWeights,
    pub start: Option<NodeSelector>,
    pub end: Option<NodeSelector>,
    pub max_search_time: Option<Duration>,
}

impl TryFrom<UserRouteConfig> for RouteConfig {
    type Error = ConfigError;

    fn try_from(user: UserRouteConfig) -> Result<RouteConfig, Self::Error> {
        let weights = RocWeights::new(user.alpha, user.beta, user.gamma)?;

        let start = user.start.as_deref().map(NodeSelector::from_str).transpose()?;
        let end = user.end.as_deref().map(NodeSelector::from_str).transpose()?;

        let max_search_time = match user.max_search_secs {
            Some(secs) if secs.is_finite() && secs > 0.0 => Some(
                Duration::try_from_secs_f64(secs)
                    .map_err(|_| ConfigError::InvalidBudget { value: secs })?,
            ),
            Some(secs) => return Err(ConfigError::InvalidBudget { value: secs }),
            None => None,
        };

        Ok(RouteConfig {
            graph_path: user.graph_path,
            output_path: user.output_path,
            weights,
            start,
            end,
            max_search_time,
        })
    }
}

#[cfg(test)]
mod tests {

    use approx::assert_abs_diff_eq;

    use super::*;

    /// Generate a UserRouteConfig with all of the defaults applied
    fn get_test_user_config() -> UserRouteConfig {
        UserRouteConfig {
            graph_path: PathBuf::from("graph.json"),
            output_path: PathBuf::from("route.json"),
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            gamma: DEFAULT_GAMMA,
            start: None,
            end: None,
            max_search_secs: None,
        }
    }

    mod test_roc_weights {

        use super::*;

        /// The published coefficients are the ROC weights rounded to 3dp
        #[test]
        fn test_defaults_match_roc() {
            let exact = RocWeights::rank_order_centroid();
            let rounded = RocWeights::default();

            assert_abs_diff_eq!(exact.alpha(), rounded.alpha(), epsilon = 1e-3);
            assert_abs_diff_eq!(exact.beta(), rounded.beta(), epsilon = 1e-3);
            assert_abs_diff_eq!(exact.gamma(), rounded.gamma(), epsilon = 1e-3);
        }

        #[test]
        fn test_defaults_are_valid() {
            let defaults = RocWeights::default();
            let result =
                RocWeights::new(defaults.alpha(), defaults.beta(), defaults.gamma());

            assert_eq!(result, Ok(defaults));
            assert_abs_diff_eq!(
                defaults.alpha() + defaults.beta() + defaults.gamma(),
                1.0,
                epsilon = WEIGHT_SUM_TOLERANCE
            );
            assert!(defaults.alpha() > defaults.beta());
            assert!(defaults.beta() > defaults.gamma());
            assert!(defaults.gamma() > 0.0);
        }

        #[test]
        fn test_roc_coefficients() {
            let coeffs = roc_coefficients(3);

            assert_abs_diff_eq!(coeffs[0], 11.0 / 18.0, epsilon = 1e-12);
            assert_abs_diff_eq!(coeffs[1], 5.0 / 18.0, epsilon = 1e-12);
            assert_abs_diff_eq!(coeffs[2], 2.0 / 18.0, epsilon = 1e-12);
            assert_abs_diff_eq!(coeffs.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        }

        #[test]
        fn test_reject_bad_sum() {
            let result = RocWeights::new(0.6, 0.3, 0.2);
            assert!(matches!(result, Err(ConfigError::InvalidWeights { .. })));
        }

        #[test]
        fn test_reject_wrong_order() {
            let result = RocWeights::new(0.278, 0.611, 0.111);
            assert!(matches!(result, Err(ConfigError::InvalidWeights { .. })));
        }

        #[test]
        fn test_reject_ties() {
            let result = RocWeights::new(0.4, 0.4, 0.2);
            assert!(matches!(result, Err(ConfigError::InvalidWeights { .. })));
        }

        #[test]
        fn test_reject_negative() {
            let result = RocWeights::new(0.9, 0.2, -0.1);
            assert!(matches!(result, Err(ConfigError::InvalidWeights { .. })));
        }

        #[test]
        fn test_reject_nan() {
            let result = RocWeights::new(f64::NAN, 0.3, 0.1);
            assert!(matches!(result, Err(ConfigError::InvalidWeights { .. })));
        }
    }

    mod test_node_selector {

        use super::*;

        #[test]
        fn test_id() {
            let result = NodeSelector::from_str("123456").unwrap();
            assert_eq!(result, NodeSelector::Id(NodeId::from("123456")));
        }

        /// Coordinates are provided as lat,lon but stored as a (lon, lat)
        /// point
        #[test]
        fn test_coords() {
            let result = NodeSelector::from_str("@51.5, -1.25").unwrap();
            assert_eq!(result, NodeSelector::Nearest(Point::new(-1.25, 51.5)));
        }

        #[test]
        fn test_bad_coords() {
            assert!(NodeSelector::from_str("@51.5").is_err());
            assert!(NodeSelector::from_str("@north,west").is_err());
            assert!(NodeSelector::from_str("@95.0,0.0").is_err());
        }

        #[test]
        fn test_empty() {
            assert!(NodeSelector::from_str("  ").is_err());
        }
    }

    /// Check conversion from UserRouteConfig to RouteConfig retains all of
    /// the necessary information
    #[test]
    fn test_user_config_to_route_config() {
        let mut user_config = get_test_user_config();
        user_config.start = Some("1".to_string());
        user_config.end = Some("@0.5,0.25".to_string());
        user_config.max_search_secs = Some(2.5);

        let target = RouteConfig {
            graph_path: PathBuf::from("graph.json"),
            output_path: PathBuf::from("route.json"),
            weights: RocWeights::default(),
            start: Some(NodeSelector::Id(NodeId::from("1"))),
            end: Some(NodeSelector::Nearest(Point::new(0.25, 0.5))),
            max_search_time: Some(Duration::from_millis(2500)),
        };

        let result = RouteConfig::try_from(user_config).unwrap();

        assert_eq!(result, target);
    }

    #[test]
    fn test_invalid_budget() {
        let mut user_config = get_test_user_config();
        user_config.max_search_secs = Some(0.0);

        let result = RouteConfig::try_from(user_config);

        assert_eq!(result, Err(ConfigError::InvalidBudget { value: 0.0 }));
    }

    /// A finite budget which is too large to represent must be rejected
    /// rather than overflowing
    #[test]
    fn test_oversized_budget() {
        let mut user_config = get_test_user_config();
        user_config.max_search_secs = Some(1e20);

        let result = RouteConfig::try_from(user_config);

        assert_eq!(result, Err(ConfigError::InvalidBudget { value: 1e20 }));
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let mut user_config = get_test_user_config();
        user_config.gamma = 0.5;

        let result = RouteConfig::try_from(user_config);

        assert!(matches!(result, Err(ConfigError::InvalidWeights { .. })));
    }

    /// Weights can be left out of a JSON config, in which case the defaults
    /// apply
    #[test]
    fn test_deserialize_user_config() {
        let raw = r#"{"graph_path": "graph.json", "output_path": "route.json"}"#;

        let result: UserRouteConfig = serde_json::from_str(raw).unwrap();

        assert_eq!(result, get_test_user_config());
    }

    #[test]
    fn test_parse_cli_args() {
        let result = UserRouteConfig::try_parse_from([
            "pave-finder",
            "--graph-path",
            "graph.json",
            "--output-path",
            "route.json",
            "--start",
            "-42",
        ])
        .unwrap();

        assert_eq!(result.start, Some("-42".to_string()));
        assert_eq!(result.graph_path, PathBuf::from("graph.json"));
    }
}
