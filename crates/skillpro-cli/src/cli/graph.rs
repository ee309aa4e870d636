//! `skillpro graph`: print the dependency graph of a resolved root.

use anyhow::{Context, Result};
use skillpro_core::skill::graph::DependencyGraph;
use skillpro_types::resolve::ResolverOptions;

use crate::state::AppState;

pub async fn print_graph(
    state: &AppState,
    root: String,
    options: ResolverOptions,
    json: bool,
) -> Result<()> {
    let resolver = std::sync::Arc::clone(&state.resolver);
    let task_root = root.clone();
    let closure = tokio::task::spawn_blocking(move || resolver.resolve(&task_root, &options))
        .await
        .context("Resolution task failed")?
        .with_context(|| format!("Failed to resolve '{root}'"))?;

    if json {
        let graph = closure.dependency_graph();
        let edges: Vec<serde_json::Value> = graph
            .edge_indices()
            .filter_map(|edge| {
                let (from, to) = graph.edge_endpoints(edge)?;
                Some(serde_json::json!({
                    "from": graph[from],
                    "to": graph[to],
                    "kind": graph[edge].to_string(),
                }))
            })
            .collect();
        let value = serde_json::json!({
            "root": closure.root,
            "nodes": closure.order,
            "edges": edges,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", closure.to_dot());
    }
    Ok(())
}
