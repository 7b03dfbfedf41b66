// src/utils/mod.rs

pub mod html;
