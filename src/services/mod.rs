// src/services/mod.rs

pub mod assembler;
pub mod eligibility;
pub mod grading;
pub mod reporting;
