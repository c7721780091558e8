//! Graph Builder
//!
//! Pure function of the ordered event list. Deduplication is the extractor's
//! job; every record given here becomes its own statement.

use nkg_core::EventRecord;

use crate::NarrativeGraph;

/// Builds a [`NarrativeGraph`] from deduplicated events
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self
    }

    /// Build the graph; `Statement_<n>` follows the order of `events`
    pub fn build(&self, events: &[EventRecord]) -> NarrativeGraph {
        let mut graph = NarrativeGraph::new();

        for event in events {
            let statement = graph.add_statement();
            for (kind, value) in event.attributes() {
                graph.link_attribute(statement, kind, value);
            }
        }

        tracing::debug!(
            statements = graph.statement_count(),
            attributes = graph.attribute_count(),
            edges = graph.edge_count(),
            "Built narrative graph"
        );

        graph
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn field() -> impl Strategy<Value = Option<String>> {
        proptest::option::of(prop_oneof![
            Just("calm".to_string()),
            Just("the holding cell".to_string()),
            Just("felt cornered".to_string()),
            "[a-z]{1,6}",
        ])
    }

    fn event_strategy() -> impl Strategy<Value = EventRecord> {
        (field(), field(), field(), field())
            .prop_map(|(s, e, a, m)| EventRecord::from_fields(s, e, a, m))
    }

    proptest! {
        /// Property: N events give N statements, out-degree equals present fields,
        /// and equal values share one attribute node
        #[test]
        fn test_graph_shape(events in proptest::collection::vec(event_strategy(), 0..12)) {
            let graph = GraphBuilder::new().build(&events);

            prop_assert_eq!(graph.statement_count(), events.len());

            let mut present_total = 0;
            for (idx, event) in events.iter().enumerate() {
                prop_assert_eq!(graph.out_degree(idx + 1), event.present_count());
                present_total += event.present_count();
            }

            let distinct: std::collections::HashSet<&str> = events
                .iter()
                .flat_map(|e| e.attributes().map(|(_, v)| v))
                .collect();
            prop_assert_eq!(graph.attribute_count(), distinct.len());
            prop_assert!(graph.attribute_count() <= present_total);
            prop_assert_eq!(graph.edge_count(), present_total);
            prop_assert!(!petgraph::algo::is_cyclic_directed(graph.inner()));
        }
    }
}
