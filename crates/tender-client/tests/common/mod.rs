#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;
pub mod mock;
