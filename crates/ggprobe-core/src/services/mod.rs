//! Services orchestrating ports into the operations consumers call.

mod estimator;

pub use estimator::{
    DEFAULT_CONTEXT_LENGTH, EstimateBatch, EstimateError, EstimateUpdate, MemoryEstimator,
};
