// src/handlers/mod.rs

pub mod attempts;
pub mod auth;
pub mod profile;
pub mod questions;
pub mod quizzes;
pub mod results;
