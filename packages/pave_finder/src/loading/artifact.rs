//! The functions defined here read the annotated road graph from a node-link
//! JSON document, the format networkx writes with node_link_data. Attributes
//! in these documents are frequently stored as text, so all numeric fields
//! are coerced here with a per-field default. Nothing downstream of this
//! module ever sees an unvalidated value.

use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::common::error::LoadingError;
use crate::common::graph_data::{
    EdgeData, NEUTRAL_PASER_SCORE, NodeData, NodeId, invert_paser,
};

/// Node identifiers may be written as integers, floats or strings. Floats
/// appear when a document has been round-tripped through a tool which
/// doesn't distinguish integers.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

/// Largest magnitude at which every integral f64 maps onto an i64
const MAX_INTEGRAL_FLOAT_ID: f64 = 9_007_199_254_740_992.0;

impl From<RawId> for NodeId {
    fn from(raw: RawId) -> NodeId {
        match raw {
            RawId::Int(id) => NodeId::from(id),
            RawId::UInt(id) => NodeId::from(id.to_string()),
            RawId::Float(id) => {
                if id.fract() == 0.0 && id.abs() <= MAX_INTEGRAL_FLOAT_ID {
                    NodeId::from(id as i64)
                } else {
                    NodeId::from(id.to_string())
                }
            }
            RawId::Text(id) => NodeId::from(id),
        }
    }
}

/// Container for a single node exactly as it appears in the artifact
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct NodeRow {
    pub id: RawId,
    #[serde(default, alias = "lon")]
    x: Option<Value>,
    #[serde(default, alias = "lat")]
    y: Option<Value>,
    #[serde(default)]
    elevation: Option<Value>,
}

impl From<NodeRow> for NodeData {
    /// Unpack the raw node data into a format which can be loaded into the
    /// graph. Missing or unparsable coordinates and elevations become 0
    fn from(row: NodeRow) -> NodeData {
        let id = NodeId::from(row.id);
        NodeData {
            lat: number_or_default(row.y.as_ref(), 0.0, "y", &id),
            lon: number_or_default(row.x.as_ref(), 0.0, "x", &id),
            elevation: number_or_default(
                row.elevation.as_ref(),
                0.0,
                "elevation",
                &id,
            ),
            id,
        }
    }
}

/// Container for a single directed edge exactly as it appears in the artifact
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct EdgeRow {
    pub source: RawId,
    pub target: RawId,
    #[serde(default)]
    key: Option<Value>,
    #[serde(default)]
    length: Option<Value>,
    #[serde(default)]
    distance: Option<Value>,
    #[serde(default)]
    travel_time: Option<Value>,
    #[serde(default)]
    paser_score: Option<Value>,
    #[serde(default)]
    inverted_paser: Option<Value>,
}

impl EdgeRow {
    /// Create a copy of this edge running in the opposite direction
    fn reversed(&self) -> EdgeRow {
        EdgeRow {
            source: self.target.clone(),
            target: self.source.clone(),
            ..self.clone()
        }
    }
}

impl From<EdgeRow> for EdgeData {
    /// Unpack the raw edge data into a format which can be loaded into the
    /// graph. Distance is read from 'length' (as written by osmnx) and falls
    /// back to 'distance'. An explicit inverted pavement score takes
    /// precedence over one derived from the raw score.
    fn from(row: EdgeRow) -> EdgeData {
        let src = NodeId::from(row.source);
        let dst = NodeId::from(row.target);
        let label = format!("{src}->{dst}");

        let key = number_or_default(row.key.as_ref(), 0.0, "key", &label);
        let key = if !(0.0..=u32::MAX as f64).contains(&key) {
            warn!(edge = %label, key, "Edge key out of range, using 0");
            0
        } else if key.fract() != 0.0 {
            warn!(edge = %label, key, "Edge key is not a whole number, truncating");
            key.trunc() as u32
        } else {
            key as u32
        };

        let distance = non_negative(
            number_or_default(
                row.length.as_ref().or(row.distance.as_ref()),
                0.0,
                "length",
                &label,
            ),
            "length",
            &label,
        );
        let travel_time = non_negative(
            number_or_default(row.travel_time.as_ref(), 0.0, "travel_time", &label),
            "travel_time",
            &label,
        );

        let paser = optional_number(row.paser_score.as_ref(), "paser_score", &label);
        let inverted =
            optional_number(row.inverted_paser.as_ref(), "inverted_paser", &label);

        let paser_score = match (paser, inverted) {
            (Some(score), _) => score,
            (None, Some(inverted)) => invert_paser(inverted),
            (None, None) => NEUTRAL_PASER_SCORE,
        };

        let mut edata =
            EdgeData::new(src, dst, key, distance, travel_time, paser_score);
        if let Some(inverted) = inverted {
            edata.inverted_paser = inverted;
        }
        edata
    }
}

/// A complete node-link document
#[derive(Deserialize, Debug, PartialEq)]
pub struct GraphArtifact {
    #[serde(default = "default_directed")]
    pub directed: bool,
    #[serde(default)]
    pub multigraph: bool,
    pub nodes: Vec<NodeRow>,
    #[serde(alias = "edges")]
    pub links: Vec<EdgeRow>,
}

fn default_directed() -> bool {
    true
}

impl GraphArtifact {
    /// Split the artifact into nodes and directed edges. Undirected documents
    /// list each road once, so a reverse edge is generated for every link.
    pub fn into_rows(self) -> (Vec<NodeRow>, Vec<EdgeRow>) {
        if self.directed {
            return (self.nodes, self.links);
        }

        let mut edges = Vec::with_capacity(self.links.len() * 2);
        for link in self.links {
            let reverse = link.reversed();
            edges.push(link);
            edges.push(reverse);
        }
        (self.nodes, edges)
    }
}

/// Outcome of reading a numeric attribute which may have been stored as text
#[derive(Debug, PartialEq)]
pub enum Coerced {
    Missing,
    Number(f64),
    Invalid(String),
}

/// Attempt to read a finite number from a JSON value, accepting numbers and
/// numeric strings. Null values and blank strings count as missing.
pub fn coerce_number(value: Option<&Value>) -> Coerced {
    match value {
        None | Some(Value::Null) => Coerced::Missing,
        Some(Value::Number(num)) => match num.as_f64() {
            Some(val) if val.is_finite() => Coerced::Number(val),
            _ => Coerced::Invalid(num.to_string()),
        },
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Coerced::Missing;
            }
            match trimmed.parse::<f64>() {
                Ok(val) if val.is_finite() => Coerced::Number(val),
                _ => Coerced::Invalid(text.clone()),
            }
        }
        Some(other) => Coerced::Invalid(other.to_string()),
    }
}

fn optional_number(
    value: Option<&Value>,
    field: &str,
    owner: &dyn Display,
) -> Option<f64> {
    match coerce_number(value) {
        Coerced::Number(val) => Some(val),
        Coerced::Missing => None,
        Coerced::Invalid(raw) => {
            warn!(field, owner = %owner, raw = %raw, "Unparsable attribute, ignoring it");
            None
        }
    }
}

fn number_or_default(
    value: Option<&Value>,
    default: f64,
    field: &str,
    owner: &dyn Display,
) -> f64 {
    optional_number(value, field, owner).unwrap_or(default)
}

fn non_negative(value: f64, field: &str, owner: &dyn Display) -> f64 {
    if value < 0.0 {
        warn!(field, owner = %owner, value, "Negative attribute, using 0");
        0.0
    } else {
        value
    }
}

/// Read and parse the graph artifact at the provided path
pub fn load_artifact(path: &Path) -> Result<GraphArtifact, LoadingError> {
    if !path.exists() {
        return Err(LoadingError::MissingArtifact {
            path: path.to_path_buf(),
        });
    }

    let raw = fs::read_to_string(path).map_err(|source| LoadingError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let artifact: GraphArtifact =
        serde_json::from_str(&raw).map_err(|source| {
            LoadingError::MalformedArtifact {
                path: path.to_path_buf(),
                source,
            }
        })?;

    info!(
        path = %path.display(),
        nodes = artifact.nodes.len(),
        links = artifact.links.len(),
        directed = artifact.directed,
        "Loaded graph artifact"
    );

    Ok(artifact)
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;
    use std::io::Write;

    fn edge_row(value: Value) -> EdgeRow {
        serde_json::from_value(value).unwrap()
    }

    mod test_coerce_number {

        use super::*;

        #[test]
        fn test_number() {
            assert_eq!(coerce_number(Some(&json!(4.5))), Coerced::Number(4.5));
        }

        #[test]
        fn test_numeric_string() {
            assert_eq!(
                coerce_number(Some(&json!(" 12.25 "))),
                Coerced::Number(12.25)
            );
        }

        #[test]
        fn test_missing() {
            assert_eq!(coerce_number(None), Coerced::Missing);
            assert_eq!(coerce_number(Some(&Value::Null)), Coerced::Missing);
            assert_eq!(coerce_number(Some(&json!(""))), Coerced::Missing);
        }

        #[test]
        fn test_invalid() {
            assert_eq!(
                coerce_number(Some(&json!("gravel"))),
                Coerced::Invalid("gravel".to_string())
            );
            assert_eq!(
                coerce_number(Some(&json!("NaN"))),
                Coerced::Invalid("NaN".to_string())
            );
            assert!(matches!(
                coerce_number(Some(&json!([1.0]))),
                Coerced::Invalid(_)
            ));
        }
    }

    /// Numeric ids are stored as strings, coordinates map x->lon, y->lat
    #[test]
    fn test_node_row_to_data() {
        let row: NodeRow = serde_json::from_value(
            json!({"id": 7, "x": -1.5, "y": "50.25", "elevation": "12"}),
        )
        .unwrap();

        let target = NodeData {
            id: NodeId::from("7"),
            lat: 50.25,
            lon: -1.5,
            elevation: 12.0,
        };

        let result: NodeData = row.into();

        assert_eq!(result, target);
    }

    #[test]
    fn test_node_row_bad_elevation() {
        let row: NodeRow = serde_json::from_value(
            json!({"id": "a", "x": 0.0, "y": 0.0, "elevation": "unknown"}),
        )
        .unwrap();

        let result: NodeData = row.into();

        assert_eq!(result.elevation, 0.0);
    }

    /// Float and very large integer ids are accepted, with whole floats
    /// written the same way as the equivalent integer
    #[test]
    fn test_raw_id_variants() {
        let ids: Vec<RawId> = serde_json::from_value(json!([
            1.0,
            12345678901_i64,
            18446744073709551615_u64,
            2.5,
            "abc"
        ]))
        .unwrap();

        let result: Vec<NodeId> = ids.into_iter().map(NodeId::from).collect();

        assert_eq!(
            result,
            vec![
                NodeId::from("1"),
                NodeId::from("12345678901"),
                NodeId::from("18446744073709551615"),
                NodeId::from("2.5"),
                NodeId::from("abc"),
            ]
        );
    }

    mod test_edge_row_to_data {

        use super::*;

        #[test]
        fn test_text_attributes() {
            let row = edge_row(json!({
                "source": 1, "target": "2", "key": "1",
                "length": "120.5", "travel_time": "30", "paser_score": "8"
            }));

            let result: EdgeData = row.into();

            assert_eq!(result.src, NodeId::from("1"));
            assert_eq!(result.dst, NodeId::from("2"));
            assert_eq!(result.key, 1);
            assert_relative_eq!(result.distance, 120.5);
            assert_relative_eq!(result.travel_time, 30.0);
            assert_relative_eq!(result.paser_score, 8.0);
            assert_relative_eq!(result.inverted_paser, 3.0);
            assert_relative_eq!(result.weighted_travel_time, 30.0 * 1.2);
        }

        #[test]
        fn test_edge_keys() {
            let fractional: EdgeData =
                edge_row(json!({"source": 1, "target": 2, "key": "1.5"})).into();
            let negative: EdgeData =
                edge_row(json!({"source": 1, "target": 2, "key": -3})).into();
            let missing: EdgeData = edge_row(json!({"source": 1, "target": 2})).into();

            assert_eq!(fractional.key, 1);
            assert_eq!(negative.key, 0);
            assert_eq!(missing.key, 0);
        }

        #[test]
        fn test_distance_fallback() {
            let row = edge_row(json!({"source": 1, "target": 2, "distance": 40}));

            let result: EdgeData = row.into();

            assert_relative_eq!(result.distance, 40.0);
        }

        /// With no usable pavement data the edge should be treated as 'fair'
        #[test]
        fn test_pavement_defaults() {
            let row = edge_row(
                json!({"source": 1, "target": 2, "paser_score": "cobbles"}),
            );

            let result: EdgeData = row.into();

            assert_relative_eq!(result.paser_score, NEUTRAL_PASER_SCORE);
            assert_relative_eq!(result.inverted_paser, 6.0);
        }

        #[test]
        fn test_pre_inverted_only() {
            let row = edge_row(json!({"source": 1, "target": 2, "inverted_paser": 2}));

            let result: EdgeData = row.into();

            assert_relative_eq!(result.inverted_paser, 2.0);
            assert_relative_eq!(result.paser_score, 9.0);
        }

        #[test]
        fn test_negative_distance() {
            let row = edge_row(json!({"source": 1, "target": 2, "length": -5}));

            let result: EdgeData = row.into();

            assert_eq!(result.distance, 0.0);
        }
    }

    /// Undirected documents should produce a pair of edges per link
    #[test]
    fn test_into_rows_undirected() {
        let artifact: GraphArtifact = serde_json::from_value(json!({
            "directed": false,
            "nodes": [{"id": 1}, {"id": 2}],
            "edges": [{"source": 1, "target": 2}]
        }))
        .unwrap();

        let (nodes, edges) = artifact.into_rows();

        assert_eq!(nodes.len(), 2);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[1].source, RawId::Int(2));
        assert_eq!(edges[1].target, RawId::Int(1));
    }

    #[test]
    fn test_load_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let result = load_artifact(&path);

        assert!(matches!(result, Err(LoadingError::MissingArtifact { .. })));
    }

    #[test]
    fn test_load_malformed_artifact() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"nodes\": 3}}").unwrap();

        let result = load_artifact(file.path());

        assert!(matches!(result, Err(LoadingError::MalformedArtifact { .. })));
    }

    #[test]
    fn test_load_artifact() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let doc = json!({
            "directed": true,
            "multigraph": true,
            "nodes": [{"id": 1, "x": 0.0, "y": 0.0}, {"id": 2, "x": 0.1, "y": 0.1}],
            "links": [{"source": 1, "target": 2, "key": 0, "length": 10.0}]
        });
        write!(file, "{doc}").unwrap();

        let result = load_artifact(file.path()).unwrap();

        assert!(result.multigraph);
        assert_eq!(result.nodes.len(), 2);
        assert_eq!(result.links.len(), 1);
    }
}
