#![allow(dead_code)]

pub mod monitor;
