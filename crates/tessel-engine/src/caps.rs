//! Capability negotiation.
//!
//! The driver advertises which shader tiers it can run; everything that
//! differs between tiers (shader directory, texture storage, vertex-array
//! wrapping) is a function of the [`CapabilityTier`] chosen here.

use std::fmt;

use crate::driver::{DriverCaps, TextureFormat};
use crate::error::{RenderError, Result};

/// Shader-language feature level of the active driver.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CapabilityTier {
    /// Higher tier: float textures, vertex-array objects around every draw.
    TierA,
    /// Lower tier: 8-bit textures, default attribute state.
    TierB,
    /// Neither tier is available.
    Unsupported,
}

impl CapabilityTier {
    /// Classifies a driver. Prefers the higher tier when both are advertised.
    pub fn classify(caps: &DriverCaps) -> Self {
        if caps.tier_a {
            CapabilityTier::TierA
        } else if caps.tier_b {
            CapabilityTier::TierB
        } else {
            CapabilityTier::Unsupported
        }
    }

    /// Directory, relative to the shader root, holding this tier's sources.
    pub fn shader_dir(self) -> Option<&'static str> {
        match self {
            CapabilityTier::TierA => Some("tier_a"),
            CapabilityTier::TierB => Some("tier_b"),
            CapabilityTier::Unsupported => None,
        }
    }

    /// Whether each draw is wrapped in its own vertex-array object.
    pub fn uses_vertex_arrays(self) -> bool {
        matches!(self, CapabilityTier::TierA)
    }

    /// Internal format textures are stored in.
    pub fn texture_format(self) -> TextureFormat {
        match self {
            CapabilityTier::TierA => TextureFormat::Rgba32Float,
            _ => TextureFormat::Rgba8Unorm,
        }
    }
}

impl fmt::Display for CapabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CapabilityTier::TierA => "tier A",
            CapabilityTier::TierB => "tier B",
            CapabilityTier::Unsupported => "unsupported",
        })
    }
}

/// Picks the tier for `caps`, failing when the driver supports neither.
pub fn negotiate(caps: &DriverCaps) -> Result<CapabilityTier> {
    log::info!("GPU driver: {}", caps.version);

    match CapabilityTier::classify(caps) {
        CapabilityTier::Unsupported => {
            log::error!("driver advertises neither shader tier");
            Err(RenderError::UnsupportedDriver {
                driver: caps.version.clone(),
            })
        }
        tier => {
            log::info!("ready for {tier}");
            Ok(tier)
        }
    }
}
