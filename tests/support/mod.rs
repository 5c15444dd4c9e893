#![allow(dead_code)]

pub mod dbdie_env;
pub mod fixtures;
