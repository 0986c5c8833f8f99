//! Pixel-accurate evaluation of document layout segmentation.
//!
//! A page's ground-truth and hypothesis regions become the two vertex sets
//! of a bipartite graph. Edges join overlapping regions and carry the
//! matching pixels inside the overlap; metrics are read off the graph.

pub mod shared {
    pub mod classified_image;
    pub mod constants;
    pub mod error;
    pub mod evaluation_config;
    pub mod pixel_class;
    pub mod rect;
}

pub mod accounting {
    pub mod domain {
        pub mod pixel_accountant;
        pub mod pixel_tracker;
    }
}

pub mod graph {
    pub mod domain {
        pub mod bipartite_graph;
        pub mod edge_builder;
        pub mod vertex;
        pub mod vertex_set_builder;
    }
}

pub mod metrics {
    pub mod domain {
        pub mod ground_truth_metrics;
        pub mod hypothesis_metrics;
        pub mod metrics_aggregator;
        pub mod page_totals;
        pub mod ratio;
    }
}

pub mod pipeline {
    pub mod batch_evaluator;
    pub mod evaluate_page_use_case;
    pub mod infrastructure;
}
