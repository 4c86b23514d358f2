//! Prints System PLL settings for a few common clocks.
//!
//! cargo run --example plan -- [ref_hz]

use ambiq_syspll::{config::*, refin::RefIn};

fn main() {
    let ref_hz = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(32_000_000);

    let refin = match RefIn::xtal(ref_hz) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("bad reference {}: {}", ref_hz, e);
            return;
        }
    };

    // I2S / PDM audio clocks, USB, and a couple of round numbers
    let targets = [1_024_000u32, 3_072_000, 6_144_000, 12_288_000, 24_576_000, 48_000_000, 96_000_000, 192_000_000];

    println!("ref {} Hz", ref_hz);
    for &fout in targets.iter() {
        match refin.config_for(fout) {
            Ok(c) => {
                let mode = match c.fraction_mode {
                    FractionMode::Integer => "int ",
                    FractionMode::Fraction => "frac",
                };
                let vco = match c.vco_select {
                    VcoSelect::Low => "lo",
                    VcoSelect::High => "hi",
                };
                println!(
                    "{:>11} Hz: {} vco {} {:>8.3} MHz refdiv {:>2} fbdiv {:>3}+{:>8}/2^24 postdiv {}x{} -> {:.6} MHz, lock <= {} us",
                    fout,
                    mode,
                    vco,
                    c.f_vco_mhz(refin.f_mhz()),
                    c.ref_div,
                    c.fb_div_int,
                    c.fb_div_frac,
                    c.post_div1,
                    c.post_div2,
                    c.f_out_mhz(refin.f_mhz()),
                    c.lock_timeout_us(),
                );
            }
            Err(e) => println!("{:>11} Hz: {}", fout, e),
        }
    }
}
