pub mod batch;
pub mod calibrate;
pub mod consts;
pub mod error;
pub mod fits;
pub mod naming;
pub mod pipeline;
pub mod plan;
