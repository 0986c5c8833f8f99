use serde::{Deserialize, Serialize};

use crate::graph::domain::bipartite_graph::BipartiteGraph;
use crate::metrics::domain::ground_truth_metrics::GroundTruthMetrics;
use crate::metrics::domain::hypothesis_metrics::HypothesisMetrics;
use crate::metrics::domain::page_totals::PageTotals;
use crate::shared::classified_image::ClassifiedImage;
use crate::shared::error::EvalResult;
use crate::shared::evaluation_config::EvaluationConfig;
use crate::shared::rect::Rect;

/// Everything needed to evaluate one page.
#[derive(Clone, Debug)]
pub struct PageInput {
    /// Human-readable page name, used in logs and reports.
    pub name: String,
    pub ground_truth: Vec<Rect>,
    pub hypothesis: Vec<Rect>,
    pub gt_image: ClassifiedImage,
    pub hyp_image: ClassifiedImage,
    pub totals: PageTotals,
    /// Region type the rectangles were restricted to, if any.
    pub region_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageMetrics {
    pub name: String,
    pub ground_truth: GroundTruthMetrics,
    pub hypothesis: HypothesisMetrics,
}

/// Single-page evaluation: build the graph → aggregate → tear down.
pub struct EvaluatePageUseCase {
    config: EvaluationConfig,
}

impl EvaluatePageUseCase {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, page: &PageInput) -> EvalResult<PageMetrics> {
        log::debug!(
            "evaluating {}: {} ground truth, {} hypothesis regions",
            page.name,
            page.ground_truth.len(),
            page.hypothesis.len()
        );
        let graph = BipartiteGraph::build(
            &page.ground_truth,
            &page.hypothesis,
            &page.gt_image,
            &page.hyp_image,
            &page.totals,
            &self.config,
        )?;
        let (ground_truth, mut hypothesis) = graph.into_metrics();
        hypothesis.region_type = page.region_type.clone();

        Ok(PageMetrics {
            name: page.name.clone(),
            ground_truth,
            hypothesis,
        })
    }
}

impl Default for EvaluatePageUseCase {
    fn default() -> Self {
        Self::new(EvaluationConfig::default())
    }
}
