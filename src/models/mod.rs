// src/models/mod.rs

pub mod comment;
pub mod complaint;
pub mod reaction;
