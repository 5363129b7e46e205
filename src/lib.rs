#![deny(dead_code)]
#![deny(unused_imports)]

pub mod builder;
pub mod error;
pub mod mask;
pub mod sampler;
pub mod split;
pub mod validity;
