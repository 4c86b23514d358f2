#![cfg_attr(not(test), no_std)]

//! Ambiq Apollo5 System PLL (SYSPLL) configuration.
//!
//! Divider search for a VCO or post divided output frequency, and a
//! [`device::SysPll`] handle sequencing enable / configure / lock on top
//! of a register backend.

#[macro_use]
mod fmt;

pub mod constants;
pub mod errors;
pub mod config;
pub mod frequency;
pub mod refin;
pub mod device;
