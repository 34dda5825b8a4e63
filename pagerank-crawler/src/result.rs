use indexmap::IndexMap;

/// Mapping from each crawled URL to the ordered links found on that page.
///
/// Keys keep the position of their first insertion; crawling the same URL
/// again replaces its links in place.
pub type LinkGraph = IndexMap<String, Vec<String>>;

/// Total number of distinct URLs referenced by the graph, keys and leaves.
pub fn distinct_urls(graph: &LinkGraph) -> usize {
    let mut seen: std::collections::HashSet<&str> = graph.keys().map(String::as_str).collect();
    for links in graph.values() {
        seen.extend(links.iter().map(String::as_str));
    }
    seen.len()
}

/// Total number of edges across all pages.
pub fn edge_count(graph: &LinkGraph) -> usize {
    graph.values().map(Vec::len).sum()
}
