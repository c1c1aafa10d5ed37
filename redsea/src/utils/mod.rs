//! Utility functions for RedSea

pub mod cdate;
pub mod sector;
pub mod string;
