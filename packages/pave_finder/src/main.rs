use anyhow::{Context, Result};
use clap::Parser;
use pave_finder::common::config::{RouteConfig, UserRouteConfig};
use pave_finder::loading::artifact::load_artifact;
use pave_finder::loading::petgraph::{create_graph, resolve_endpoints};
use pave_finder::output::record::RouteRecord;
use pave_finder::output::write_record;
use pave_finder::routing::analysis::analyse_outcome;
use pave_finder::routing::dijkstra::find_optimal_route;
use pave_finder::weighting::WeightedGraph;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let now = Instant::now();

    let user_config = UserRouteConfig::parse();
    let config =
        RouteConfig::try_from(user_config).context("Invalid route configuration")?;

    let artifact = load_artifact(&config.graph_path)
        .with_context(|| format!("Unable to load {}", config.graph_path.display()))?;
    let (nodes, edges) = artifact.into_rows();
    let network = create_graph(nodes, edges);

    let graph = WeightedGraph::prepare(network, config.weights);

    let (start, end) =
        resolve_endpoints(graph.network(), config.start.as_ref(), config.end.as_ref())
            .context("Unable to select route endpoints")?;

    let outcome = find_optimal_route(&graph, &start, &end, config.max_search_time)
        .context("Route search failed")?;
    let analysis =
        analyse_outcome(&graph, &outcome).context("Route analysis failed")?;

    if outcome.is_found() {
        info!(
            total_cost = outcome.total_cost(),
            distance_m = analysis.total_distance_m,
            elevation_gain_m = analysis.total_elevation_gain_m,
            average_paser = analysis.average_paser_score,
            segments = analysis.num_segments,
            "Route analysis"
        );
    } else {
        warn!(%start, %end, "No route exists, writing an empty record");
    }

    let record = RouteRecord::new(&start, &end, &outcome, analysis, graph.weights());
    write_record(&config.output_path, &record).with_context(|| {
        format!("Unable to write {}", config.output_path.display())
    })?;

    info!(elapsed = ?now.elapsed(), "Done");
    Ok(())
}
