//! Constants

/// Minimum VCO frequency the System PLL can be configured for, MHz
pub const VCO_FREQ_MIN_MHZ: f32 = 60.0;

/// Maximum VCO frequency the System PLL can be configured for, MHz
pub const VCO_FREQ_MAX_MHZ: f32 = 960.0;

/// Lowest VCO frequency targeted when the low-range VCO is preferred, MHz
pub const VCO_LO_MODE_FREQ_MIN_MHZ: u32 = 60;

/// VCO frequencies at or above this run on the high-range VCO, MHz
pub const VCO_HI_MODE_FREQ_MIN_MHZ: u32 = 240;

/// Reference divider is a 6 bit field, 0 is not a valid divider
pub const MAX_REFDIV: u32 = 63;

/// Feedback divider limits in integer mode
pub const MIN_FBDIV_INT_MODE: u32 = 16;
pub const MAX_FBDIV_INT_MODE: u32 = 640;

/// Feedback divider (integer part) limits in fractional mode
pub const MIN_FBDIV_FRAC_MODE: u32 = 20;
pub const MAX_FBDIV_FRAC_MODE: u32 = 320;

/// Feedback divider fraction is a 24 bit fixed point value
pub const FBDIV_FRAC_BITS: u32 = 24;
pub const FBDIV_FRAC_ONE: u32 = 1 << FBDIV_FRAC_BITS;

/// Each post divider stage divides by 1 to 7
pub const POST_DIV_MAX: u8 = 7;

/// Largest combined post divide ratio, POSTDIV1 × POSTDIV2
pub const POST_DIV_TOTAL_MAX: u32 = 49;

/// Min Phase Detector Frequency (fractional mode), Hz
pub const PFD_FREQ_FRAC_MIN_HZ: u32 = 10_000_000;

/// Min Phase Detector Frequency (integer mode), Hz
pub const PFD_FREQ_INT_MIN_HZ: u32 = 1_000_000;

/// VCO floor for fractional requests, in units of the fastest PFD at or
/// below `PFD_FREQ_FRAC_MIN_HZ` reachable by an integer REFDIV
pub const PFD_LIMIT_FVCO_MULT: u32 = 10;

/// Euclidean GCD gives up after this many steps
pub const GCD_MAX_LOOP: u8 = 16;

/// Worst case lock time in reference cycles, low range VCO
pub const MAX_LOCK_CYCLE_VCO_LO: u32 = 1000;

/// Worst case lock time in reference cycles, high range VCO
pub const MAX_LOCK_CYCLE_VCO_HI: u32 = 1875;

/// Slowest PLL reference clock the lock timeout accounts for, MHz
pub const CLOCK_SRC_MIN_MHZ: u32 = 12;

/// Selection cost weights, indexed by
/// `(fractional ? 1 : 0) + (high range VCO ? 2 : 0)`.
///
/// `A` weighs the VCO frequency (MHz), `B` the phase detector frequency.
pub const CFG_COST_A: [u32; 4] = [435_700, 465_700, 131_525, 139_025];
pub const CFG_COST_B: [u32; 4] = [228_000, 396_000, 228_000, 396_000];
