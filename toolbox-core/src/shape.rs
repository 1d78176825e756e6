//! Output sizes of 2D convolution and pooling layers.
//!
//! Each function accepts either a single `usize`, applied to both axes, or a
//! `[usize; 2]` pair for every argument:
//!
//! ```
//! use toolbox_core::shape::{conv_2d, Size2};
//!
//! // The first layer of the Atari DQN network.
//! let out = conv_2d(84usize, 8usize, 4usize, 0usize).unwrap();
//! assert_eq!(out, Size2([20, 20]));
//! ```
use crate::error::ToolboxError;

/// Height and width of a 2D feature map or kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size2(pub [usize; 2]);

impl From<usize> for Size2 {
    fn from(v: usize) -> Self {
        Self([v, v])
    }
}

impl From<[usize; 2]> for Size2 {
    fn from(v: [usize; 2]) -> Self {
        Self(v)
    }
}

/// Applies `f` to both axes.
fn per_axis<F>(mut f: F) -> Result<Size2, ToolboxError>
where
    F: FnMut(usize) -> Result<usize, ToolboxError>,
{
    Ok(Size2([f(0)?, f(1)?]))
}

fn overflow(input: usize, padding: usize) -> ToolboxError {
    ToolboxError::ShapeArithmetic(format!(
        "size overflow for input {} with padding {}",
        input, padding
    ))
}

/// Returns the output size of a Conv2D layer.
///
/// The output is `(input - kernel + 2 * padding) / stride + 1` on each axis.
/// The division must be exact.
pub fn conv_2d(
    input_size: impl Into<Size2>,
    kernel_size: impl Into<Size2>,
    stride: impl Into<Size2>,
    padding: impl Into<Size2>,
) -> Result<Size2, ToolboxError> {
    let (input, kernel) = (input_size.into(), kernel_size.into());
    let (stride, padding) = (stride.into(), padding.into());
    per_axis(|axis| {
        let (i, k, s, p) = (input.0[axis], kernel.0[axis], stride.0[axis], padding.0[axis]);
        if s == 0 {
            return Err(ToolboxError::ShapeArithmetic("stride must be positive".into()));
        }
        let padded = p
            .checked_mul(2)
            .and_then(|p2| i.checked_add(p2))
            .ok_or_else(|| overflow(i, p))?;
        let span = padded.checked_sub(k).ok_or_else(|| {
            ToolboxError::ShapeArithmetic(format!(
                "kernel {} larger than padded input {}",
                k, padded
            ))
        })?;
        if span % s != 0 {
            return Err(ToolboxError::ShapeArithmetic(format!(
                "input {} - kernel {} + 2 * padding {} is not divisible by stride {}",
                i, k, p, s
            )));
        }
        (span / s).checked_add(1).ok_or_else(|| overflow(i, p))
    })
}

/// Returns the output size of a ConvTranspose2D layer.
///
/// The output is
/// `(input - 1) * stride - 2 * padding + (kernel - 1) + output_padding + 1`.
pub fn conv_transpose_2d(
    input_size: impl Into<Size2>,
    kernel_size: impl Into<Size2>,
    stride: impl Into<Size2>,
    padding: impl Into<Size2>,
    output_padding: impl Into<Size2>,
) -> Result<Size2, ToolboxError> {
    let (input, kernel) = (input_size.into(), kernel_size.into());
    let (stride, padding) = (stride.into(), padding.into());
    let output_padding = output_padding.into();
    per_axis(|axis| {
        let (i, k, s, p) = (input.0[axis], kernel.0[axis], stride.0[axis], padding.0[axis]);
        let op = output_padding.0[axis];
        if i == 0 || k == 0 {
            return Err(ToolboxError::ShapeArithmetic(
                "input and kernel must be non-empty".into(),
            ));
        }
        let twice_p = p.checked_mul(2).ok_or_else(|| overflow(i, p))?;
        let full = (i - 1)
            .checked_mul(s)
            .and_then(|v| v.checked_add(k - 1))
            .and_then(|v| v.checked_add(op))
            .and_then(|v| v.checked_add(1))
            .ok_or_else(|| overflow(i, p))?;
        full.checked_sub(twice_p).ok_or_else(|| {
            ToolboxError::ShapeArithmetic(format!("padding {} exceeds the output", p))
        })
    })
}

/// Returns the output size of a Pool2D layer, the same as [`conv_2d`].
pub fn pool_2d(
    input_size: impl Into<Size2>,
    kernel_size: impl Into<Size2>,
    stride: impl Into<Size2>,
    padding: impl Into<Size2>,
) -> Result<Size2, ToolboxError> {
    conv_2d(input_size, kernel_size, stride, padding)
}
