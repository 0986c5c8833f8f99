pub mod threaded_batch_evaluator;
