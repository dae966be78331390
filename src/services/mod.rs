pub mod candidate_filter;
pub mod catalog_service;
pub mod generation_backend;
pub mod plan_generator;
pub mod plan_sink;
pub mod plan_store;
pub mod planner_service;
pub mod prompt_service;
