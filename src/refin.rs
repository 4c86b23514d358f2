///! Input reference config
///! Reference source / frequency

use crate::{config::*, errors::*};


/// Input reference feeding the System PLL
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefIn {
    /// Which pin/oscillator drives the reference
    select: RefSelect,
    /// Input frequency, Hz
    f: u32,
}

impl RefIn {

    /// Configure reference input
    pub fn new(select: RefSelect, f: u32) -> Result<Self, Error> {
        if f == 0 {
            Err(Error::InvalidArgument)
        } else {
            Ok(RefIn { select, f })
        }
    }

    /// On-chip crystal oscillator at `f` Hz
    pub fn xtal(f: u32) -> Result<Self, Error> {
        Self::new(RefSelect::Xtal32MHz, f)
    }

    /// External reference clock at `f` Hz
    pub fn ext_ref_clk(f: u32) -> Result<Self, Error> {
        Self::new(RefSelect::ExtRefClk, f)
    }

    pub fn select(self: &Self) -> RefSelect {
        self.select
    }

    /// Reference frequency, Hz
    pub fn f_hz(self: &Self) -> u32 {
        self.f
    }

    /// Reference frequency, MHz
    pub fn f_mhz(self: &Self) -> f32 {
        self.f as f32 / 1_000_000.0
    }

    /// Complete PLL configuration producing `fout_hz` on the post divided
    /// output from this reference.
    pub fn config_for(self: &Self, fout_hz: u32) -> Result<SysPllConfig, Error> {
        let config = SysPllConfig::generate_with_postdiv(self.f, fout_hz)?;
        Ok(SysPllConfig { ref_select: self.select, ..config })
    }

    /// Configuration producing `vco_mhz` at the VCO from this reference,
    /// post dividers bypassed.
    pub fn config_for_vco(self: &Self, vco_mhz: f32) -> Result<SysPllConfig, Error> {
        let config = SysPllConfig::generate(self.f_mhz(), vco_mhz)?;
        Ok(SysPllConfig { ref_select: self.select, ..config })
    }
}
