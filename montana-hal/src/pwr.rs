//! Power-down handshake for gated digital blocks.
//!
//! A block is quiesced before its rail is isolated: software raises a power-down
//! request and the block answers with Accept or Deny on two status bits. On
//! Accept the rail is isolated in two writes, first with the ramp-assist
//! ("hammer") current on, then with it off ("trickle"). On Deny the request is
//! withdrawn and the block stays powered; that is an outcome, not an error.

use embassy_time::Duration;

use crate::error::{Error, WaitPoint};
use crate::poll::{poll_until, poll_until_async, PollBudget};

/// Gated digital blocks with a power-down handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerBlockId {
    Fpu,
    Debug,
}

/// A gated block together with the key its configuration register demands.
///
/// Writes carrying any other key are ignored by the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerBlock {
    id: PowerBlockId,
    write_key: u32,
}

impl PowerBlock {
    pub const fn new(id: PowerBlockId, write_key: u32) -> Self {
        Self { id, write_key }
    }

    pub const fn id(&self) -> PowerBlockId {
        self.id
    }

    pub const fn write_key(&self) -> u32 {
        self.write_key
    }
}

/// Fields of a block's power configuration register driven by the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerCfg {
    pub request: bool,
    pub isolate: bool,
    pub ramp_assist: bool,
}

/// Handshake status bits. Both set is tolerated; Accept wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerStatus {
    pub accepted: bool,
    pub denied: bool,
}

impl PowerStatus {
    fn answered(self) -> bool {
        self.accepted || self.denied
    }
}

pub trait PowerDomainPort {
    fn power_cfg(&self, block: PowerBlockId) -> PowerCfg;
    fn power_status(&self, block: PowerBlockId) -> PowerStatus;
    fn write_power_cfg(&mut self, block: PowerBlockId, key: u32, cfg: PowerCfg);
}

/// Outcome of a power-down request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Handshake {
    /// Block quiesced and isolated.
    Accepted,
    /// Block refused; request withdrawn, block left powered.
    Denied,
}

/// Ask `block` to power down and isolate it if it accepts.
///
/// With [`PollBudget::Unbounded`] this waits for an answer indefinitely. When
/// a bounded budget expires the request is withdrawn and
/// `Error::Timeout(WaitPoint::HandshakeResponse)` is returned.
pub fn request_power_down<P>(
    port: &mut P,
    block: &PowerBlock,
    budget: PollBudget,
) -> Result<Handshake, Error>
where
    P: PowerDomainPort + ?Sized,
{
    raise_request(port, block);

    let id = block.id();
    let answered = poll_until(budget, WaitPoint::HandshakeResponse, || {
        port.power_status(id).answered()
    });
    if let Err(e) = answered {
        cancel_request(port, block);
        return Err(e);
    }

    Ok(complete(port, block))
}

/// Async variant of [`request_power_down`] checking the status every 10 us.
pub async fn request_power_down_async<P>(
    port: &mut P,
    block: &PowerBlock,
    timeout: Duration,
) -> Result<Handshake, Error>
where
    P: PowerDomainPort + ?Sized,
{
    raise_request(port, block);

    let id = block.id();
    let answered = poll_until_async(
        timeout,
        Duration::from_micros(10),
        WaitPoint::HandshakeResponse,
        || port.power_status(id).answered(),
    )
    .await;
    if let Err(e) = answered {
        cancel_request(port, block);
        return Err(e);
    }

    Ok(complete(port, block))
}

fn raise_request<P: PowerDomainPort + ?Sized>(port: &mut P, block: &PowerBlock) {
    let cfg = port.power_cfg(block.id());
    port.write_power_cfg(
        block.id(),
        block.write_key(),
        PowerCfg {
            request: true,
            ..cfg
        },
    );
}

fn cancel_request<P: PowerDomainPort + ?Sized>(port: &mut P, block: &PowerBlock) {
    let cfg = port.power_cfg(block.id());
    port.write_power_cfg(
        block.id(),
        block.write_key(),
        PowerCfg {
            request: false,
            ..cfg
        },
    );
}

fn complete<P: PowerDomainPort + ?Sized>(port: &mut P, block: &PowerBlock) -> Handshake {
    let id = block.id();
    if port.power_status(id).accepted {
        // isolation must already be active when the assist current is released
        let hammer = PowerCfg {
            request: true,
            isolate: true,
            ramp_assist: true,
        };
        port.write_power_cfg(id, block.write_key(), hammer);
        port.write_power_cfg(
            id,
            block.write_key(),
            PowerCfg {
                ramp_assist: false,
                ..hammer
            },
        );
        info!("power block {:?} accepted power-down, isolated", id);
        Handshake::Accepted
    } else {
        cancel_request(port, block);
        warn!("power block {:?} denied power-down, left powered", id);
        Handshake::Denied
    }
}
