//! Dataset and result file processors

pub mod dataset;
pub mod results;
