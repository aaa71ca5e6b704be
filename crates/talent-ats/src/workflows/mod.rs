pub mod pipeline;
pub mod seed;
