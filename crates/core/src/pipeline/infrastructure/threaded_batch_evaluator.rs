use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};

use crate::pipeline::batch_evaluator::{BatchConfig, BatchEvaluator};
use crate::pipeline::evaluate_page_use_case::{EvaluatePageUseCase, PageInput, PageMetrics};
use crate::shared::constants::DEFAULT_BATCH_WORKERS;
use crate::shared::error::{EvalError, EvalResult};

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

type Job = (usize, PageInput);
type Outcome = (usize, EvalResult<PageMetrics>);

/// Evaluates pages on a pool of worker threads.
///
/// Layout: `feeder → workers [evaluate] → main [collect]`
///
/// Each page builds and tears down its own graph, so workers share nothing
/// but the read-only configuration.
pub struct ThreadedBatchEvaluator {
    workers: usize,
    channel_capacity: usize,
}

impl ThreadedBatchEvaluator {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for ThreadedBatchEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_WORKERS)
    }
}

impl BatchEvaluator for ThreadedBatchEvaluator {
    fn evaluate(
        &self,
        pages: Vec<PageInput>,
        config: BatchConfig,
    ) -> Vec<EvalResult<PageMetrics>> {
        let total = pages.len();
        if total == 0 {
            return Vec::new();
        }
        let cap = self.channel_capacity;
        let use_case = Arc::new(EvaluatePageUseCase::new(config.evaluation));

        let (job_tx, job_rx) = crossbeam_channel::bounded::<Job>(cap);
        let (outcome_tx, outcome_rx) = crossbeam_channel::bounded::<Outcome>(cap);

        let feeder = spawn_feeder(pages, job_tx);
        let workers: Vec<_> = (0..self.workers.min(total))
            .map(|_| spawn_worker(use_case.clone(), job_rx.clone(), outcome_tx.clone()))
            .collect();
        drop(job_rx);
        drop(outcome_tx);

        let mut results: Vec<Option<EvalResult<PageMetrics>>> = (0..total).map(|_| None).collect();
        let mut done = 0;
        for (index, outcome) in outcome_rx {
            if let Err(e) = &outcome {
                log::warn!("page {index} rejected: {e}");
            }
            results[index] = Some(outcome);
            done += 1;
            if let Some(ref callback) = config.on_progress {
                callback(done, total);
            }
        }

        join_threads(feeder, workers);

        results
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    Err(EvalError::Resource(format!(
                        "page {index} was not evaluated: worker thread panicked"
                    )))
                })
            })
            .collect()
    }
}

fn spawn_feeder(pages: Vec<PageInput>, job_tx: Sender<Job>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for job in pages.into_iter().enumerate() {
            if job_tx.send(job).is_err() {
                break;
            }
        }
    })
}

fn spawn_worker(
    use_case: Arc<EvaluatePageUseCase>,
    job_rx: Receiver<Job>,
    outcome_tx: Sender<Outcome>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for (index, page) in job_rx {
            let outcome = use_case.execute(&page);
            if outcome_tx.send((index, outcome)).is_err() {
                break;
            }
        }
    })
}

fn join_threads(feeder: JoinHandle<()>, workers: Vec<JoinHandle<()>>) {
    if feeder.join().is_err() {
        log::error!("Feeder thread panicked");
    }
    for worker in workers {
        if worker.join().is_err() {
            log::error!("Worker thread panicked");
        }
    }
}
