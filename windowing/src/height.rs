use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// Failure reported by a per-item height rule.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HeightError {
    #[error("height unavailable for item {index}: {reason}")]
    Unavailable { index: usize, reason: String },
    #[error("height rule has no data for item {index}")]
    MissingItem { index: usize },
}

pub type PerItemHeight = Arc<dyn Fn(usize) -> Result<f64, HeightError> + Send + Sync>;

/// How each item's height is determined.
#[derive(Clone)]
pub enum HeightRule {
    /// One height for every item.
    Fixed(f64),
    /// A height computed per index.
    PerItem(PerItemHeight),
}

impl HeightRule {
    /// Wraps an infallible per-item closure.
    pub fn per_item(f: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Self {
        Self::PerItem(Arc::new(move |i| Ok(f(i))))
    }

    pub fn try_per_item(
        f: impl Fn(usize) -> Result<f64, HeightError> + Send + Sync + 'static,
    ) -> Self {
        Self::PerItem(Arc::new(f))
    }

    /// Returns `true` when both rules would produce the same table without re-evaluation.
    pub(crate) fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fixed(a), Self::Fixed(b)) => a.to_bits() == b.to_bits(),
            (Self::PerItem(a), Self::PerItem(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn eval(&self, index: usize) -> Result<f64, HeightError> {
        match self {
            Self::Fixed(h) => Ok(*h),
            Self::PerItem(f) => f(index),
        }
    }
}

impl Default for HeightRule {
    fn default() -> Self {
        Self::Fixed(0.0)
    }
}

impl From<f64> for HeightRule {
    fn from(h: f64) -> Self {
        Self::Fixed(h)
    }
}

impl From<u32> for HeightRule {
    fn from(h: u32) -> Self {
        Self::Fixed(h as f64)
    }
}

impl core::fmt::Debug for HeightRule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fixed(h) => f.debug_tuple("Fixed").field(h).finish(),
            Self::PerItem(_) => f.write_str("PerItem(..)"),
        }
    }
}

/// Height substituted for an item whose rule failed or produced an invalid value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeightFallback {
    Zero,
    /// The last valid height seen earlier in the same rebuild (0 before any valid item).
    #[default]
    LastValid,
    Value(u32),
}

/// Converts a raw height into whole units. Returns `None` for NaN, infinities and negatives.
pub fn normalize_height(raw: f64) -> Option<u32> {
    if !raw.is_finite() || raw < 0.0 {
        return None;
    }
    if raw >= u32::MAX as f64 {
        return Some(u32::MAX);
    }
    // Round fractional heights up so neighbouring rows never overlap.
    let truncated = raw as u32;
    if (truncated as f64) < raw {
        Some(truncated + 1)
    } else {
        Some(truncated)
    }
}

/// Evaluates `rule` for `count` items into `out` (cleared first).
///
/// Never aborts: failed or invalid items get the fallback height. Returns how many items fell
/// back.
pub(crate) fn evaluate_heights(
    rule: &HeightRule,
    count: usize,
    fallback: HeightFallback,
    out: &mut Vec<u32>,
) -> usize {
    out.clear();
    out.reserve_exact(count);

    if let HeightRule::Fixed(raw) = rule {
        let h = match normalize_height(*raw) {
            Some(h) => h,
            None => {
                vwarn!(raw = *raw, "invalid fixed height, using fallback");
                let h = match fallback {
                    HeightFallback::Value(v) => v,
                    HeightFallback::Zero | HeightFallback::LastValid => 0,
                };
                out.resize(count, h);
                return count;
            }
        };
        out.resize(count, h);
        return 0;
    }

    let mut last_valid: Option<u32> = None;
    let mut fallbacks = 0usize;
    for i in 0..count {
        let h = match rule.eval(i) {
            Ok(raw) => match normalize_height(raw) {
                Some(h) => {
                    last_valid = Some(h);
                    h
                }
                None => {
                    vwarn!(index = i, raw, "invalid item height, using fallback");
                    fallbacks += 1;
                    substitute(fallback, last_valid)
                }
            },
            Err(_err) => {
                vwarn!(index = i, error = %_err, "height rule failed, using fallback");
                fallbacks += 1;
                substitute(fallback, last_valid)
            }
        };
        out.push(h);
    }
    fallbacks
}

fn substitute(fallback: HeightFallback, last_valid: Option<u32>) -> u32 {
    match fallback {
        HeightFallback::Zero => 0,
        HeightFallback::LastValid => last_valid.unwrap_or(0),
        HeightFallback::Value(v) => v,
    }
}
