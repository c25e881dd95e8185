// Domain layer module exports
// Domain is independent of infrastructure concerns

pub mod analysis;
pub mod repositories;
pub mod session;
