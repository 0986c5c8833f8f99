use crate::pipeline::evaluate_page_use_case::{PageInput, PageMetrics};
use crate::shared::error::EvalResult;
use crate::shared::evaluation_config::EvaluationConfig;

/// Configuration for a batch evaluation run.
pub struct BatchConfig {
    pub evaluation: EvaluationConfig,
    /// Called with `(pages_done, pages_total)` after each page completes.
    pub on_progress: Option<Box<dyn Fn(usize, usize) + Send>>,
}

impl BatchConfig {
    pub fn new(evaluation: EvaluationConfig) -> Self {
        Self {
            evaluation,
            on_progress: None,
        }
    }
}

/// Abstracts how a batch of independent pages is evaluated.
///
/// This is a port (application-layer interface). Infrastructure provides
/// concrete implementations. Results come back in input order, one per
/// page; a page that fails does not affect the others.
pub trait BatchEvaluator: Send {
    fn evaluate(
        &self,
        pages: Vec<PageInput>,
        config: BatchConfig,
    ) -> Vec<EvalResult<PageMetrics>>;
}
