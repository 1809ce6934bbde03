//! Staging of separate input/output buffers onto the in-place kernels.

use crate::error::ModeError;

/// Copies `input` into the front of `output` and returns that prefix, so a
/// mode can run in place on it.
pub(crate) fn stage<'a>(input: &[u8], output: &'a mut [u8]) -> Result<&'a mut [u8], ModeError> {
    let out = output
        .get_mut(..input.len())
        .ok_or(ModeError::BadInputData("output buffer shorter than input"))?;
    out.copy_from_slice(input);
    Ok(out)
}
