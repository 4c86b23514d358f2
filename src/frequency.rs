///! Divider search: System PLL configuration for a given VCO or output frequency

use libm::{ceilf, floorf, fmodf, roundf};

use crate::{config::*, constants::*, errors::*};


/// POSTDIV1 / POSTDIV2 pair with the smallest product not below the index.
/// Index 0 is never looked up.
const POST_DIV_TABLE: [(u8, u8); POST_DIV_TOTAL_MAX as usize + 1] = [
    (0, 0), (1, 1), (2, 1), (3, 1), (4, 1), (5, 1), (6, 1), (7, 1), (4, 2), (3, 3),
    (5, 2), (6, 2), (6, 2), (7, 2), (7, 2), (5, 3), (4, 4), (6, 3), (6, 3), (5, 4),
    (5, 4), (7, 3), (6, 4), (6, 4), (6, 4), (5, 5), (7, 4), (7, 4), (7, 4), (6, 5),
    (6, 5), (7, 5), (7, 5), (7, 5), (7, 5), (7, 5), (6, 6), (7, 6), (7, 6), (7, 6),
    (7, 6), (7, 6), (7, 6), (7, 7), (7, 7), (7, 7), (7, 7), (7, 7), (7, 7), (7, 7),
];

const HZ_PER_MHZ: u32 = 1_000_000;


/// Approximate greatest common divisor of two positive reals.
///
/// Euclid's algorithm in single precision, bounded to `GCD_MAX_LOOP` steps.
/// `None` when the remainders don't reach zero in time (the ratio has no
/// short rational form).
pub fn gcd(a: f32, b: f32) -> Option<f32> {
    let (mut a, mut b) = if a < b { (b, a) } else { (a, b) };

    for _ in 0 .. GCD_MAX_LOOP {
        if b < f32::EPSILON {
            return Some(a);
        }
        let r = a - floorf(a / b) * b;
        a = b;
        b = r;
    }

    None
}

/// Integer mode REFDIV / FBDIV for `dst_mhz` out of `src_mhz`, if there is one.
///
/// FBDIV / REFDIV is the reduced ratio dst / src, scaled up by the smallest
/// factor that lifts FBDIV to its minimum.
pub(crate) fn integer_mode_check(src_mhz: f32, dst_mhz: f32) -> Option<(u8, u16)> {
    let g = gcd(dst_mhz, src_mhz)?;
    if g < f32::EPSILON {
        return None;
    }

    let multiplier = dst_mhz / g;
    let divider = src_mhz / g;

    // range check before the casts, out of range floats saturate
    if fmodf(multiplier, 1.0) > f32::EPSILON || roundf(multiplier) > MAX_FBDIV_INT_MODE as f32 {
        return None;
    }
    let mut multiplier = roundf(multiplier) as u32;

    if fmodf(divider, 1.0) > f32::EPSILON || roundf(divider) > MAX_REFDIV as f32 {
        return None;
    }
    let mut divider = roundf(divider) as u32;

    if multiplier == 0 {
        return None;
    }

    if multiplier < MIN_FBDIV_INT_MODE {
        let normalize = MIN_FBDIV_INT_MODE.div_ceil(multiplier);
        divider *= normalize;
        multiplier *= normalize;
    }

    if divider == 0 || divider > MAX_REFDIV {
        return None;
    }
    if !(MIN_FBDIV_INT_MODE ..= MAX_FBDIV_INT_MODE).contains(&multiplier) {
        return None;
    }

    Some((divider as u8, multiplier as u16))
}

/// Fractional mode REFDIV / FBDIV INT / FBDIV FRAC for `dst_mhz` out of `src_mhz`.
///
/// REFDIV is the smallest value that keeps FBDIV at or above its fractional
/// mode minimum.
pub(crate) fn fraction_mode_check(src_mhz: f32, dst_mhz: f32) -> Option<(u8, u16, u32)> {
    let ratio = dst_mhz / src_mhz;

    let ref_div = ceilf(MIN_FBDIV_FRAC_MODE as f32 / ratio);
    if !(ref_div >= f32::EPSILON && ref_div <= MAX_REFDIV as f32) {
        return None;
    }
    let ref_div = ref_div as u32;

    // From 16 up an f32 resolves FBDIV in steps of 2^-19 or coarser, so the
    // scaled fraction is already a whole number below 2^24.
    let fb_div = ratio * ref_div as f32;
    let frac = roundf(fmodf(fb_div, 1.0) * FBDIV_FRAC_ONE as f32) as u32;
    let int = floorf(fb_div);

    if int < MIN_FBDIV_FRAC_MODE as f32 || int > MAX_FBDIV_FRAC_MODE as f32 {
        return None;
    }

    Some((ref_div as u8, int as u16, frac))
}

/// POSTDIV1 / POSTDIV2 achieving at least `ratio`
pub fn post_dividers(ratio: u32) -> Option<(u8, u8)> {
    if ratio == 0 {
        return None;
    }
    POST_DIV_TABLE.get(ratio as usize).copied()
}


impl SysPllConfig {

    /// Configuration producing `vco_mhz` at the VCO out of a `ref_mhz` reference.
    ///
    /// Integer mode is used when the ratio allows it, fractional mode
    /// otherwise. Post dividers are left at 1.
    pub fn generate(ref_mhz: f32, vco_mhz: f32) -> Result<Self, Error> {
        if !(ref_mhz.is_finite() && ref_mhz > 0.0 && vco_mhz.is_finite() && vco_mhz > 0.0) {
            return Err(Error::InvalidArgument);
        }
        if !(VCO_FREQ_MIN_MHZ ..= VCO_FREQ_MAX_MHZ).contains(&vco_mhz) {
            return Err(Error::OutOfRange);
        }

        let (fraction_mode, ref_div, fb_div_int, fb_div_frac) =
            if let Some((ref_div, fb_div)) = integer_mode_check(ref_mhz, vco_mhz) {
                (FractionMode::Integer, ref_div, fb_div, 0)
            } else {
                trace!("syspll: {} -> {} MHz not integer, trying fractional", ref_mhz, vco_mhz);
                let (ref_div, int, frac) = fraction_mode_check(ref_mhz, vco_mhz).ok_or(Error::Fail)?;
                (FractionMode::Fraction, ref_div, int, frac)
            };

        Ok(SysPllConfig {
            ref_select: RefSelect::default(),
            vco_select: VcoSelect::for_vco_mhz(vco_mhz),
            fraction_mode,
            ref_div,
            fb_div_int,
            fb_div_frac,
            post_div1: 1,
            post_div2: 1,
        })
    }

    /// Configuration producing `fout_hz` after the post dividers out of a
    /// `ref_hz` reference.
    ///
    /// Candidates are generated for the low and the high VCO range. When
    /// both exist the one with the lower selection cost is kept, the high
    /// range one on a tie.
    pub fn generate_with_postdiv(ref_hz: u32, fout_hz: u32) -> Result<Self, Error> {
        if ref_hz == 0 || fout_hz == 0 {
            return Err(Error::InvalidArgument);
        }

        let lvco = Self::generate_min_fvco(ref_hz, fout_hz, VCO_LO_MODE_FREQ_MIN_MHZ * HZ_PER_MHZ).ok();
        let hvco = Self::generate_min_fvco(ref_hz, fout_hz, VCO_HI_MODE_FREQ_MIN_MHZ * HZ_PER_MHZ).ok();

        match (lvco, hvco) {
            (Some(l), Some(h)) => {
                let l_cost = l.selection_cost(ref_hz, fout_hz);
                let h_cost = h.selection_cost(ref_hz, fout_hz);
                debug!("syspll: {} Hz low vco cost {}, high vco cost {}", fout_hz, l_cost, h_cost);
                if h_cost > l_cost { Ok(l) } else { Ok(h) }
            }
            (None, Some(h)) => Ok(h),
            (Some(l), None) => Ok(l),
            (None, None) => Err(Error::OutOfRange),
        }
    }

    /// Lowest VCO frequency at or above `min_fvco_hz` that divides down to
    /// `fout_hz`, and the configuration for it.
    fn generate_min_fvco(ref_hz: u32, fout_hz: u32, min_fvco_hz: u32) -> Result<Self, Error> {
        let mut min_fvco_hz = min_fvco_hz;

        let is_frac = gcd(fout_hz as f32 / HZ_PER_MHZ as f32, ref_hz as f32 / HZ_PER_MHZ as f32)
            .map_or(true, |g| g < 1.0);
        if is_frac {
            // Fractional mode needs PFD >= 10 MHz, which puts a floor under
            // the VCO frequency.
            let ref_div = ref_hz / PFD_FREQ_FRAC_MIN_HZ;
            if ref_div == 0 {
                return Err(Error::OutOfRange);
            }
            let pfd_limit_fvco_hz = (ref_hz / ref_div).saturating_mul(PFD_LIMIT_FVCO_MULT);
            min_fvco_hz = min_fvco_hz.max(pfd_limit_fvco_hz);
        }

        let (post_div1, post_div2) = if fout_hz >= min_fvco_hz {
            (1, 1)
        } else {
            let div = min_fvco_hz.div_ceil(fout_hz);
            if div > POST_DIV_TOTAL_MAX {
                return Err(Error::OutOfRange);
            }
            post_dividers(div).ok_or(Error::OutOfRange)?
        };

        let fvco_hz = fout_hz as u64 * post_div1 as u64 * post_div2 as u64;
        let mut config = Self::generate(
            ref_hz as f32 / HZ_PER_MHZ as f32,
            fvco_hz as f32 / HZ_PER_MHZ as f32,
        )?;

        let pfd_min_hz = match config.fraction_mode {
            FractionMode::Fraction => PFD_FREQ_FRAC_MIN_HZ,
            FractionMode::Integer => PFD_FREQ_INT_MIN_HZ,
        };
        let pfd_hz = ref_hz.div_ceil(config.ref_div as u32);
        if pfd_hz < pfd_min_hz {
            trace!("syspll: pfd {} Hz below {} Hz", pfd_hz, pfd_min_hz);
            return Err(Error::OutOfRange);
        }

        config.post_div1 = post_div1;
        config.post_div2 = post_div2;
        Ok(config)
    }

    /// Heuristic cost used to pick between VCO range candidates, lower is better.
    ///
    /// Weighted sum of the phase detector frequency and the VCO frequency,
    /// weights depend on fraction mode and VCO range.
    pub fn selection_cost(self: &Self, ref_hz: u32, fout_hz: u32) -> u64 {
        let idx = match self.fraction_mode {
            FractionMode::Fraction => 1,
            FractionMode::Integer => 0,
        } + match self.vco_select {
            VcoSelect::High => 2,
            VcoSelect::Low => 0,
        };

        let ref_mhz = (ref_hz / HZ_PER_MHZ) as u64;
        let vco_mhz = fout_hz as u64 * self.post_div() as u64 / HZ_PER_MHZ as u64;
        let ref_div = self.ref_div.max(1) as u64;

        ref_mhz * CFG_COST_B[idx] as u64 / ref_div + vco_mhz * CFG_COST_A[idx] as u64
    }
}
