#![allow(dead_code)]

pub mod env;
pub mod server;
pub mod wine;
