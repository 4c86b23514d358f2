///! System PLL handle

use embedded_hal::blocking::delay::DelayUs;

use crate::config::*;
use crate::errors::*;


/// Register level access to one System PLL instance.
///
/// Implemented by the chip support layer. Every method maps to a single
/// register field or power-control call, sequencing lives in [`SysPll`].
pub trait SysPllBackend {
    type Error;

    /// Switches the PLL power domain
    fn set_powered(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Current power domain state
    fn is_powered(&mut self) -> Result<bool, Self::Error>;

    /// True when the regulator feeding the PLL is forced active
    fn regulator_ready(&mut self) -> Result<bool, Self::Error>;

    /// Releases (or asserts) the PLL power-down bit
    fn set_enabled(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Writes divider, mode and reference select fields
    fn write_config(&mut self, config: &SysPllConfig) -> Result<(), Self::Error>;

    /// Lock status bit
    fn is_locked(&mut self) -> Result<bool, Self::Error>;

    /// Routes the reference clock straight to the output
    fn set_bypass(&mut self, bypass: bool) -> Result<(), Self::Error>;
}


/// System PLL
pub struct SysPll<B> {
    backend: B,
    enabled: bool,
    config: Option<SysPllConfig>,
}


impl<B> SysPll<B>
where B: SysPllBackend,
{
    /// Takes the PLL and powers it up (unconfigured, disabled).
    pub fn new(mut backend: B) -> Result<Self, Error> {
        backend.set_powered(true).map_err(|_| Error::Backend)?;
        debug!("syspll: powered up");
        Ok(SysPll { backend, enabled: false, config: None })
    }

    /// Disables and powers down the PLL, returns the backend.
    pub fn release(mut self) -> Result<B, Error> {
        if self.enabled {
            self.disable()?;
        }
        if self.backend.is_powered().map_err(|_| Error::Backend)? {
            self.backend.set_powered(false).map_err(|_| Error::Backend)?;
        }
        debug!("syspll: released");
        Ok(self.backend)
    }

    pub fn is_enabled(self: &Self) -> bool {
        self.enabled
    }

    /// Last configuration written with [`SysPll::configure`]
    pub fn config(self: &Self) -> Option<&SysPllConfig> {
        self.config.as_ref()
    }

    /// Starts the PLL.
    ///
    /// The regulator must already be forced active, the PLL does not lock
    /// reliably otherwise.
    pub fn enable(self: &mut Self) -> Result<(), Error> {
        if self.enabled {
            return Ok(());
        }
        if !self.backend.regulator_ready().map_err(|_| Error::Backend)? {
            warn!("syspll: regulator not active, not enabling");
            return Err(Error::InvalidOperation);
        }
        self.backend.set_enabled(true).map_err(|_| Error::Backend)?;
        self.enabled = true;
        Ok(())
    }

    /// Stops the PLL.
    pub fn disable(self: &mut Self) -> Result<(), Error> {
        self.backend.set_enabled(false).map_err(|_| Error::Backend)?;
        self.enabled = false;
        Ok(())
    }

    /// Writes a new configuration. Only allowed while disabled.
    pub fn configure(self: &mut Self, config: &SysPllConfig) -> Result<(), Error> {
        if self.enabled {
            return Err(Error::InvalidOperation);
        }
        config.validate()?;
        self.backend.write_config(config).map_err(|_| Error::Backend)?;
        self.config = Some(*config);
        Ok(())
    }

    /// Reads the lock status bit.
    pub fn lock_read(self: &mut Self) -> Result<bool, Error> {
        self.backend.is_locked().map_err(|_| Error::Backend)
    }

    /// Non-blocking lock check, `WouldBlock` until the PLL locks.
    pub fn lock_status(self: &mut Self) -> nb::Result<(), Error> {
        if !self.enabled {
            return Err(nb::Error::Other(Error::InvalidOperation));
        }
        if self.lock_read()? {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Waits for lock, up to the worst case lock time of the current config.
    /// Blocking call.
    pub fn lock_wait<Delay>(self: &mut Self, delay: &mut Delay) -> Result<(), Error>
    where Delay: DelayUs<u16>,
    {
        let timeout_us = match (self.enabled, self.config.as_ref()) {
            (true, Some(config)) => config.lock_timeout_us(),
            _ => return Err(Error::InvalidOperation),
        };

        for _ in 0 .. timeout_us {
            match self.lock_status() {
                Ok(()) => return Ok(()),
                Err(nb::Error::WouldBlock) => delay.delay_us(1),
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }

        match self.lock_status() {
            Ok(()) => Ok(()),
            Err(nb::Error::WouldBlock) => {
                warn!("syspll: no lock after {} us", timeout_us);
                Err(Error::Timeout)
            }
            Err(nb::Error::Other(e)) => Err(e),
        }
    }

    /// Passes the reference clock through instead of the PLL output.
    pub fn set_bypass(self: &mut Self, bypass: bool) -> Result<(), Error> {
        self.backend.set_bypass(bypass).map_err(|_| Error::Backend)
    }
}
