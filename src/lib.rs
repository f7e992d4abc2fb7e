pub mod cli;
pub mod config;
pub mod dom;
pub mod enhancer;
pub mod site;
pub mod utils;
