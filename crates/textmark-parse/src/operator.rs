//! Typed content stream operators.
//!
//! Each raw [`Operator`] from the tokenizer is converted once into a
//! [`ContentOp`], a closed set of the operators that matter for text
//! extraction. The interpreter dispatches on it with a single `match`;
//! everything it does not care about arrives as [`ContentOp::Ignored`].

use textmark_core::Ctm;

use crate::color_space::ColorSpace;
use crate::error::InterpretError;
use crate::tokenizer::{Operand, Operator};

/// Element of a `TJ` array.
#[derive(Debug, Clone, PartialEq)]
pub enum TjElement {
    /// String bytes to show.
    Text(Vec<u8>),
    /// Position adjustment in thousandths of text space (positive moves left).
    Adjust(f64),
}

/// Which color a color operator sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintTarget {
    Stroke,
    Fill,
}

/// A content stream operator relevant to text extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentOp {
    /// `BT`
    BeginText,
    /// `ET`
    EndText,
    /// `Tf`
    SetFont { name: String, size: f64 },
    /// `Tm`
    SetTextMatrix(Ctm),
    /// `Td`
    MoveText { tx: f64, ty: f64 },
    /// `TD`
    MoveTextSetLeading { tx: f64, ty: f64 },
    /// `T*`
    NextLine,
    /// `Tj`
    ShowText(Vec<u8>),
    /// `TJ`
    ShowTextAdjusted(Vec<TjElement>),
    /// `'`
    NextLineShowText(Vec<u8>),
    /// `"`
    NextLineShowTextSpaced {
        word_spacing: f64,
        char_spacing: f64,
        text: Vec<u8>,
    },
    /// `Tc`
    SetCharSpacing(f64),
    /// `Tw`
    SetWordSpacing(f64),
    /// `Tz`
    SetHorizontalScaling(f64),
    /// `TL`
    SetLeading(f64),
    /// `Tr`
    SetRenderMode(i64),
    /// `Ts`
    SetRise(f64),
    /// `q`
    Save,
    /// `Q`
    Restore,
    /// `cm`
    ConcatMatrix(Ctm),
    /// `CS` / `cs`
    SetColorSpace { target: PaintTarget, space: ColorSpace },
    /// `SC` / `SCN` / `sc` / `scn`: components in the current space.
    SetColor {
        target: PaintTarget,
        components: Vec<f64>,
    },
    /// `G` / `g` / `RG` / `rg` / `K` / `k`: select a device space and color.
    SetDeviceColor {
        target: PaintTarget,
        space: ColorSpace,
        components: Vec<f64>,
    },
    /// Any other operator (paths, images, marked content, ...).
    Ignored(String),
}

impl ContentOp {
    /// Convert a raw operator, checking its operands.
    ///
    /// Surplus leading operands are ignored; the trailing ones are used.
    ///
    /// # Errors
    ///
    /// Returns [`InterpretError::Operand`] when operands are missing or of
    /// the wrong type.
    pub fn parse(op: &Operator) -> Result<ContentOp, InterpretError> {
        let name = op.name.as_str();
        let parsed = match name {
            "BT" => ContentOp::BeginText,
            "ET" => ContentOp::EndText,
            "Tf" => {
                let [size] = numbers(op)?;
                let font = op
                    .operands
                    .iter()
                    .rev()
                    .find_map(Operand::as_name)
                    .ok_or_else(|| InterpretError::operand(name, "expected a font name"))?;
                ContentOp::SetFont {
                    name: font.to_string(),
                    size,
                }
            }
            "Tm" => ContentOp::SetTextMatrix(Ctm::from_array(numbers(op)?)),
            "cm" => ContentOp::ConcatMatrix(Ctm::from_array(numbers(op)?)),
            "Td" => {
                let [tx, ty] = numbers(op)?;
                ContentOp::MoveText { tx, ty }
            }
            "TD" => {
                let [tx, ty] = numbers(op)?;
                ContentOp::MoveTextSetLeading { tx, ty }
            }
            "T*" => ContentOp::NextLine,
            "Tj" => ContentOp::ShowText(string(op)?),
            "'" => ContentOp::NextLineShowText(string(op)?),
            "\"" => {
                let text = string(op)?;
                let nums: Vec<f64> = op.operands.iter().filter_map(Operand::as_f64).collect();
                let [word_spacing, char_spacing] = last_n(name, &nums)?;
                ContentOp::NextLineShowTextSpaced {
                    word_spacing,
                    char_spacing,
                    text,
                }
            }
            "TJ" => {
                let elements = op
                    .operands
                    .iter()
                    .rev()
                    .find_map(|o| match o {
                        Operand::Array(items) => Some(items),
                        _ => None,
                    })
                    .ok_or_else(|| InterpretError::operand(name, "expected an array"))?
                    .iter()
                    .filter_map(|item| match item {
                        Operand::LiteralString(b) | Operand::HexString(b) => {
                            Some(TjElement::Text(b.clone()))
                        }
                        other => other.as_f64().map(TjElement::Adjust),
                    })
                    .collect();
                ContentOp::ShowTextAdjusted(elements)
            }
            "Tc" => ContentOp::SetCharSpacing(number(op)?),
            "Tw" => ContentOp::SetWordSpacing(number(op)?),
            "Tz" => ContentOp::SetHorizontalScaling(number(op)?),
            "TL" => ContentOp::SetLeading(number(op)?),
            "Ts" => ContentOp::SetRise(number(op)?),
            "Tr" => ContentOp::SetRenderMode(number(op)?.round() as i64),
            "q" => ContentOp::Save,
            "Q" => ContentOp::Restore,
            "CS" | "cs" => {
                let space = op
                    .operands
                    .iter()
                    .rev()
                    .find_map(Operand::as_name)
                    .ok_or_else(|| InterpretError::operand(name, "expected a color space name"))?;
                ContentOp::SetColorSpace {
                    target: target_of(name),
                    space: ColorSpace::from_name(space),
                }
            }
            "SC" | "SCN" | "sc" | "scn" => ContentOp::SetColor {
                target: target_of(name),
                components: op.operands.iter().filter_map(Operand::as_f64).collect(),
            },
            "G" | "g" => device_color(op, ColorSpace::DeviceGray)?,
            "RG" | "rg" => device_color(op, ColorSpace::DeviceRGB)?,
            "K" | "k" => device_color(op, ColorSpace::DeviceCMYK)?,
            _ => ContentOp::Ignored(op.name.clone()),
        };
        Ok(parsed)
    }

    /// Operators only meaningful inside `BT`/`ET`.
    pub fn requires_text_object(&self) -> bool {
        matches!(
            self,
            ContentOp::SetTextMatrix(_)
                | ContentOp::MoveText { .. }
                | ContentOp::MoveTextSetLeading { .. }
                | ContentOp::NextLine
                | ContentOp::ShowText(_)
                | ContentOp::ShowTextAdjusted(_)
                | ContentOp::NextLineShowText(_)
                | ContentOp::NextLineShowTextSpaced { .. }
        )
    }
}

/// Uppercase color operators paint strokes.
fn target_of(name: &str) -> PaintTarget {
    if name.starts_with(|c: char| c.is_ascii_uppercase()) {
        PaintTarget::Stroke
    } else {
        PaintTarget::Fill
    }
}

fn device_color(op: &Operator, space: ColorSpace) -> Result<ContentOp, InterpretError> {
    let count = space.num_components().unwrap_or(1);
    let nums: Vec<f64> = op.operands.iter().filter_map(Operand::as_f64).collect();
    if nums.len() < count {
        return Err(InterpretError::operand(
            &op.name,
            format!("expected {count} numbers, got {}", nums.len()),
        ));
    }
    Ok(ContentOp::SetDeviceColor {
        target: target_of(&op.name),
        components: nums[nums.len() - count..].to_vec(),
        space,
    })
}

fn number(op: &Operator) -> Result<f64, InterpretError> {
    let [n] = numbers(op)?;
    Ok(n)
}

/// The trailing `N` operands, which must all be numbers.
fn numbers<const N: usize>(op: &Operator) -> Result<[f64; N], InterpretError> {
    if op.operands.len() < N {
        return Err(InterpretError::operand(
            &op.name,
            format!("expected {N} numbers, got {} operands", op.operands.len()),
        ));
    }
    let tail = &op.operands[op.operands.len() - N..];
    let mut out = [0.0; N];
    for (slot, operand) in out.iter_mut().zip(tail) {
        *slot = operand
            .as_f64()
            .ok_or_else(|| InterpretError::operand(&op.name, format!("expected number, got {operand:?}")))?;
    }
    Ok(out)
}

fn last_n<const N: usize>(name: &str, nums: &[f64]) -> Result<[f64; N], InterpretError> {
    nums.get(nums.len().saturating_sub(N)..)
        .and_then(|tail| <[f64; N]>::try_from(tail).ok())
        .ok_or_else(|| InterpretError::operand(name, format!("expected {N} numbers")))
}

/// The trailing string operand.
fn string(op: &Operator) -> Result<Vec<u8>, InterpretError> {
    op.operands
        .iter()
        .rev()
        .find_map(Operand::as_bytes)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| InterpretError::operand(&op.name, "expected a string"))
}
