use crate::accounting::domain::pixel_accountant::PixelAccountant;
use crate::accounting::domain::pixel_tracker::PixelTracker;
use crate::graph::domain::edge_builder::EdgeBuilder;
use crate::graph::domain::vertex::{GraphSet, Vertex, VertexId};
use crate::graph::domain::vertex_set_builder::VertexSetBuilder;
use crate::metrics::domain::ground_truth_metrics::GroundTruthMetrics;
use crate::metrics::domain::hypothesis_metrics::HypothesisMetrics;
use crate::metrics::domain::metrics_aggregator::MetricsAggregator;
use crate::metrics::domain::page_totals::PageTotals;
use crate::shared::classified_image::ClassifiedImage;
use crate::shared::error::{EvalResult, ValidationError};
use crate::shared::evaluation_config::EvaluationConfig;
use crate::shared::rect::Rect;

/// Correspondence graph between the ground-truth and hypothesis regions of
/// one page, together with the metrics derived from it.
///
/// Construction runs the phases in a fixed order: ground-truth vertices,
/// hypothesis vertices, edges, metrics. A graph that exists is complete;
/// any failure aborts construction and nothing partial is returned.
/// Dropping the graph releases the vertex arrays and both trackers.
#[derive(Debug)]
pub struct BipartiteGraph {
    ground_truth: Vec<Vertex>,
    hypothesis: Vec<Vertex>,
    gt_tracker: PixelTracker,
    hyp_tracker: PixelTracker,
    edge_count: usize,
    gt_metrics: GroundTruthMetrics,
    hyp_metrics: HypothesisMetrics,
}

impl BipartiteGraph {
    pub fn build(
        ground_truth: &[Rect],
        hypothesis: &[Rect],
        gt_image: &ClassifiedImage,
        hyp_image: &ClassifiedImage,
        totals: &PageTotals,
        config: &EvaluationConfig,
    ) -> EvalResult<Self> {
        config.validate()?;
        totals.validate()?;
        if gt_image.dimensions() != hyp_image.dimensions() {
            return Err(ValidationError::DimensionMismatch {
                gt: gt_image.dimensions(),
                hyp: hyp_image.dimensions(),
            }
            .into());
        }

        let (width, height) = gt_image.dimensions();
        let mut gt_tracker = PixelTracker::new(width, height)?;
        let mut hyp_tracker = PixelTracker::new(width, height)?;

        let accountant = PixelAccountant::new(config.palette);
        let vertices = VertexSetBuilder::new(&accountant, config.foreground_selector());
        let mut gt_vertices =
            vertices.build(GraphSet::GroundTruth, ground_truth, gt_image, &mut gt_tracker)?;
        let mut hyp_vertices =
            vertices.build(GraphSet::Hypothesis, hypothesis, hyp_image, &mut hyp_tracker)?;

        let edge_count = EdgeBuilder::new(&accountant, config.matching_class).connect(
            &mut gt_vertices,
            &mut hyp_vertices,
            gt_image,
            hyp_image,
            &mut gt_tracker,
            &mut hyp_tracker,
        )?;
        log::debug!(
            "tracker marks: {} ground truth / {} hypothesis foreground pixels",
            gt_tracker.marked_count(config.foreground_selector()),
            hyp_tracker.marked_count(config.foreground_selector())
        );

        let (gt_metrics, hyp_metrics) =
            MetricsAggregator::new(config.correct_segmentation_threshold).aggregate(
                &gt_vertices,
                &hyp_vertices,
                totals,
            );

        Ok(Self {
            ground_truth: gt_vertices,
            hypothesis: hyp_vertices,
            gt_tracker,
            hyp_tracker,
            edge_count,
            gt_metrics,
            hyp_metrics,
        })
    }

    pub fn ground_truth(&self) -> &[Vertex] {
        &self.ground_truth
    }

    pub fn hypothesis(&self) -> &[Vertex] {
        &self.hypothesis
    }

    pub fn vertices(&self, set: GraphSet) -> &[Vertex] {
        match set {
            GraphSet::GroundTruth => &self.ground_truth,
            GraphSet::Hypothesis => &self.hypothesis,
        }
    }

    /// Resolves an edge handle to the vertex it points at.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices(id.set).get(id.index)
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn tracker(&self, set: GraphSet) -> &PixelTracker {
        match set {
            GraphSet::GroundTruth => &self.gt_tracker,
            GraphSet::Hypothesis => &self.hyp_tracker,
        }
    }

    pub fn ground_truth_metrics(&self) -> &GroundTruthMetrics {
        &self.gt_metrics
    }

    pub fn hypothesis_metrics(&self) -> &HypothesisMetrics {
        &self.hyp_metrics
    }

    /// Tears the graph down, keeping only its metrics.
    pub fn into_metrics(self) -> (GroundTruthMetrics, HypothesisMetrics) {
        (self.gt_metrics, self.hyp_metrics)
    }
}
