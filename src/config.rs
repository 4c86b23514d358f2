///! System PLL configuration record, validation and frequency reconstruction

use crate::{constants::*, errors::*};


/// PLL reference clock source
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefSelect {
    /// High speed crystal oscillator
    #[default]
    Xtal32MHz,
    /// External reference clock pin
    ExtRefClk,
}

/// VCO range
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VcoSelect {
    #[default]
    Low,
    High,
}

impl VcoSelect {
    /// VCO range a given VCO frequency runs on
    pub fn for_vco_mhz(f_vco_mhz: f32) -> Self {
        if f_vco_mhz >= VCO_HI_MODE_FREQ_MIN_MHZ as f32 {
            VcoSelect::High
        } else {
            VcoSelect::Low
        }
    }
}

/// Feedback divider mode
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FractionMode {
    /// Integer feedback divider, delta-sigma modulator off
    #[default]
    Integer,
    /// Integer + 24 bit fraction feedback divider
    Fraction,
}


/// System PLL configuration.
///
/// f OUT = f REF × (FBDIV INT + FBDIV FRAC / 2^24) / REFDIV / (POSTDIV1 × POSTDIV2)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SysPllConfig {
    pub ref_select: RefSelect,
    pub vco_select: VcoSelect,
    pub fraction_mode: FractionMode,
    /// Reference divider (1 to 63)
    pub ref_div: u8,
    /// Feedback divider, integer part
    pub fb_div_int: u16,
    /// Feedback divider, fraction part (24 bit fixed point)
    pub fb_div_frac: u32,
    /// First post divider (1 to 7)
    pub post_div1: u8,
    /// Second post divider (1 to 7, not greater than `post_div1`)
    pub post_div2: u8,
}

impl Default for SysPllConfig {
    fn default() -> Self {
        SysPllConfig {
            ref_select: RefSelect::default(),
            vco_select: VcoSelect::default(),
            fraction_mode: FractionMode::default(),
            ref_div: 1,
            fb_div_int: MIN_FBDIV_INT_MODE as u16,
            fb_div_frac: 0,
            post_div1: 1,
            post_div2: 1,
        }
    }
}

impl SysPllConfig {

    /// Checks every field against what the PLL accepts.
    /// The register layer must not be handed a config that fails this.
    pub fn validate(self: &Self) -> Result<(), Error> {
        if !(1 ..= MAX_REFDIV).contains(&(self.ref_div as u32)) {
            return Err(Error::InvalidArgument);
        }

        let fb_range = match self.fraction_mode {
            FractionMode::Integer => MIN_FBDIV_INT_MODE ..= MAX_FBDIV_INT_MODE,
            FractionMode::Fraction => MIN_FBDIV_FRAC_MODE ..= MAX_FBDIV_FRAC_MODE,
        };
        if !fb_range.contains(&(self.fb_div_int as u32)) || self.fb_div_frac >= FBDIV_FRAC_ONE {
            return Err(Error::InvalidArgument);
        }

        let post_div_range = 1 ..= POST_DIV_MAX;
        if !post_div_range.contains(&self.post_div1)
            || !post_div_range.contains(&self.post_div2)
            || self.post_div2 > self.post_div1
        {
            return Err(Error::InvalidArgument);
        }

        Ok(())
    }

    /// Feedback divider as a real number, FBDIV INT + FBDIV FRAC / 2^24
    pub fn fb_div(self: &Self) -> f32 {
        (self.fb_div_int as f32) + (self.fb_div_frac as f32) / (FBDIV_FRAC_ONE as f32)
    }

    /// Combined post divide ratio
    pub fn post_div(self: &Self) -> u32 {
        (self.post_div1 as u32) * (self.post_div2 as u32)
    }

    /// Phase Frequency Detector' frequency
    /// f PFD = f REF / REFDIV
    pub fn f_pfd_mhz(self: &Self, ref_mhz: f32) -> f32 {
        ref_mhz / (self.ref_div as f32)
    }

    /// VCO frequency
    /// f VCO = f PFD × (FBDIV INT + FBDIV FRAC / 2^24)
    pub fn f_vco_mhz(self: &Self, ref_mhz: f32) -> f32 {
        self.f_pfd_mhz(ref_mhz) * self.fb_div()
    }

    /// Post divided output frequency
    /// f OUT = f VCO / (POSTDIV1 × POSTDIV2)
    pub fn f_out_mhz(self: &Self, ref_mhz: f32) -> f32 {
        self.f_vco_mhz(ref_mhz) / (self.post_div() as f32)
    }

    /// Upper bound on the time the PLL needs to lock with this config, µs.
    ///
    /// Lock time is specified in reference cycles after REFDIV, assuming
    /// the slowest supported reference clock.
    pub fn lock_timeout_us(self: &Self) -> u32 {
        let cycles = match self.vco_select {
            VcoSelect::High => MAX_LOCK_CYCLE_VCO_HI,
            VcoSelect::Low => MAX_LOCK_CYCLE_VCO_LO,
        };
        (cycles * self.ref_div as u32).div_ceil(CLOCK_SRC_MIN_MHZ)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn int_config() -> SysPllConfig {
        SysPllConfig {
            ref_div: 4,
            fb_div_int: 16,
            ..SysPllConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SysPllConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_ref_div_out_of_range() {
        let c = SysPllConfig { ref_div: 0, ..int_config() };
        assert_eq!(c.validate(), Err(Error::InvalidArgument));
        let c = SysPllConfig { ref_div: 64, ..int_config() };
        assert_eq!(c.validate(), Err(Error::InvalidArgument));
        let c = SysPllConfig { ref_div: 63, ..int_config() };
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn validate_fb_div_range_depends_on_mode() {
        // 18 is fine in integer mode but below the fractional minimum
        let c = SysPllConfig { fb_div_int: 18, ..int_config() };
        assert_eq!(c.validate(), Ok(()));
        let c = SysPllConfig { fb_div_int: 18, fraction_mode: FractionMode::Fraction, ..int_config() };
        assert_eq!(c.validate(), Err(Error::InvalidArgument));
        let c = SysPllConfig { fb_div_int: 20, fraction_mode: FractionMode::Fraction, ..int_config() };
        assert_eq!(c.validate(), Ok(()));

        let c = SysPllConfig { fb_div_int: 400, ..int_config() };
        assert_eq!(c.validate(), Ok(()));
        let c = SysPllConfig { fb_div_int: 400, fraction_mode: FractionMode::Fraction, ..int_config() };
        assert_eq!(c.validate(), Err(Error::InvalidArgument));
        let c = SysPllConfig { fb_div_int: 641, ..int_config() };
        assert_eq!(c.validate(), Err(Error::InvalidArgument));
    }

    #[test]
    fn validate_rejects_fraction_overflow() {
        let c = SysPllConfig {
            fraction_mode: FractionMode::Fraction,
            fb_div_int: 20,
            fb_div_frac: FBDIV_FRAC_ONE,
            ..int_config()
        };
        assert_eq!(c.validate(), Err(Error::InvalidArgument));
    }

    #[test]
    fn validate_post_dividers() {
        let c = SysPllConfig { post_div1: 7, post_div2: 7, ..int_config() };
        assert_eq!(c.validate(), Ok(()));
        let c = SysPllConfig { post_div1: 8, post_div2: 1, ..int_config() };
        assert_eq!(c.validate(), Err(Error::InvalidArgument));
        let c = SysPllConfig { post_div1: 0, post_div2: 0, ..int_config() };
        assert_eq!(c.validate(), Err(Error::InvalidArgument));
        // POSTDIV2 must not exceed POSTDIV1
        let c = SysPllConfig { post_div1: 2, post_div2: 3, ..int_config() };
        assert_eq!(c.validate(), Err(Error::InvalidArgument));
    }

    #[test]
    fn frequencies_from_fields() {
        let c = SysPllConfig { post_div1: 4, post_div2: 2, ..int_config() };
        assert_eq!(c.f_pfd_mhz(32.0), 8.0);
        assert_eq!(c.f_vco_mhz(32.0), 128.0);
        assert_eq!(c.f_out_mhz(32.0), 16.0);

        let half = SysPllConfig {
            fraction_mode: FractionMode::Fraction,
            ref_div: 1,
            fb_div_int: 20,
            fb_div_frac: FBDIV_FRAC_ONE / 2,
            ..SysPllConfig::default()
        };
        assert_eq!(half.f_vco_mhz(32.0), 656.0);
    }

    #[test]
    fn lock_timeout_scales_with_ref_div() {
        let lo = SysPllConfig { ref_div: 3, ..int_config() };
        assert_eq!(lo.lock_timeout_us(), 250);
        let hi = SysPllConfig { vco_select: VcoSelect::High, ref_div: 1, ..int_config() };
        // 1875 / 12 = 156.25, rounded up
        assert_eq!(hi.lock_timeout_us(), 157);
    }

    #[test]
    fn vco_select_threshold() {
        assert_eq!(VcoSelect::for_vco_mhz(239.9), VcoSelect::Low);
        assert_eq!(VcoSelect::for_vco_mhz(240.0), VcoSelect::High);
    }
}
