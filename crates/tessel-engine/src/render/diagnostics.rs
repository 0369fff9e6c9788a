use crate::driver::{Driver, GpuError};
use crate::error::{RenderError, Result};

/// Drains the driver's error queue.
///
/// Every drained error is logged. When `fatal` is set and at least one error
/// was pending, returns [`RenderError::Gpu`] labelled with `when`; otherwise
/// returns `Ok` no matter how many errors were drained.
pub fn check_errors<D: Driver + ?Sized>(driver: &mut D, when: &str, fatal: bool) -> Result<()> {
    let errors: Vec<GpuError> = std::iter::from_fn(|| driver.pop_error()).collect();
    if errors.is_empty() {
        return Ok(());
    }

    log::error!("GPU error while {when}");
    for e in &errors {
        log::error!("  {e}");
    }

    if fatal {
        return Err(RenderError::Gpu {
            when: when.to_string(),
            errors,
        });
    }
    Ok(())
}
