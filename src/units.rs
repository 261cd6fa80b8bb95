//! Absolute length parsing for range `add` terms.
//!
//! Scene ranges may carry an absolute adjustment expressed as a CSS-ish
//! length string: `px`, viewport-relative `vh`/`vw`, container-relative
//! `cqh`/`cqw`, or a restricted two-term `calc(A + B)` (exactly one
//! `+`, no nesting; negative values go on the numeric literal). The
//! resolver is pure given its numeric context and never fails: input
//! matching none of the recognized patterns degrades to its leading
//! integer, or zero.

use serde::{Deserialize, Serialize};

/// Numeric context for resolving viewport- and container-relative units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbsoluteOffsetContext {
  pub viewport_width: f32,
  pub viewport_height: f32,
}

impl AbsoluteOffsetContext {
  pub const fn new(viewport_width: f32, viewport_height: f32) -> Self {
    Self {
      viewport_width,
      viewport_height,
    }
  }
}

/// Dimensions of the nearest size container, for `cqh`/`cqw` units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
  pub width: f32,
  pub height: f32,
}

/// Parses the leading signed decimal number of `input`, if any.
///
/// Mirrors lenient numeric-prefix parsing: `"12.5px"` yields `12.5`,
/// `"-3vh"` yields `-3.0`, `"auto"` yields `None`.
pub(crate) fn parse_leading_float(input: &str) -> Option<f32> {
  let s = input.trim_start();
  let bytes = s.as_bytes();
  let mut end = 0;
  if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
    end = 1;
  }
  let mut seen_digit = false;
  let mut seen_dot = false;
  while end < bytes.len() {
    match bytes[end] {
      b'0'..=b'9' => seen_digit = true,
      b'.' if !seen_dot => seen_dot = true,
      _ => break,
    }
    end += 1;
  }
  if !seen_digit {
    return None;
  }
  s[..end].parse::<f32>().ok()
}

/// Resolves one `<number><unit>` term, or `None` if the suffix is not a
/// recognized unit. Longer suffixes are tried first so `cqh` is not
/// shadowed by a bare-number parse ending in `h`.
fn resolve_term(
  term: &str,
  context: AbsoluteOffsetContext,
  container: Option<ContainerSize>,
) -> Option<f32> {
  let term = term.trim();
  // cq* units substitute the container's percentage base; absent an
  // explicit container the viewport doubles as one.
  let container_width = container.map_or(context.viewport_width, |c| c.width);
  let container_height = container.map_or(context.viewport_height, |c| c.height);

  for (suffix, base) in [
    ("cqh", container_height / 100.0),
    ("cqw", container_width / 100.0),
    ("vh", context.viewport_height / 100.0),
    ("vw", context.viewport_width / 100.0),
    ("px", 1.0),
  ] {
    if let Some(rest) = term.strip_suffix(suffix) {
      if let Ok(value) = rest.trim().parse::<f32>() {
        return Some(value * base);
      }
    }
  }
  None
}

/// Resolves an absolute length string into pixels.
///
/// Recognized forms: a single `<n>px`/`<n>vh`/`<n>vw`/`<n>cqh`/`<n>cqw`
/// term, or `calc(A + B)` where `A` and `B` are each such terms.
/// Anything else degrades to its leading integer, or `0.0`; `None` and
/// empty input yield `0.0`. This function never fails.
pub fn resolve_absolute_offset(
  input: Option<&str>,
  context: AbsoluteOffsetContext,
  container: Option<ContainerSize>,
) -> f32 {
  let Some(raw) = input else {
    return 0.0;
  };
  let raw = raw.trim();
  if raw.is_empty() {
    return 0.0;
  }

  if let Some(inner) = raw
    .strip_prefix("calc(")
    .and_then(|rest| rest.strip_suffix(')'))
  {
    let mut parts = inner.splitn(3, '+');
    if let (Some(a), Some(b), None) = (parts.next(), parts.next(), parts.next()) {
      if let (Some(a), Some(b)) = (
        resolve_term(a, context, container),
        resolve_term(b, context, container),
      ) {
        return a + b;
      }
    }
  } else if let Some(value) = resolve_term(raw, context, container) {
    return value;
  }

  // Unrecognized input keeps whatever integer it leads with.
  parse_leading_float(raw).map_or(0.0, f32::trunc)
}

#[cfg(test)]
mod tests {
  use super::*;

  const CTX: AbsoluteOffsetContext = AbsoluteOffsetContext::new(1000.0, 500.0);

  #[test]
  fn resolves_plain_units() {
    assert_eq!(resolve_absolute_offset(Some("24px"), CTX, None), 24.0);
    assert_eq!(resolve_absolute_offset(Some("10vh"), CTX, None), 50.0);
    assert_eq!(resolve_absolute_offset(Some("10vw"), CTX, None), 100.0);
    assert_eq!(resolve_absolute_offset(Some("-8px"), CTX, None), -8.0);
  }

  #[test]
  fn container_units_fall_back_to_viewport() {
    let container = ContainerSize {
      width: 400.0,
      height: 200.0,
    };
    assert_eq!(
      resolve_absolute_offset(Some("50cqh"), CTX, Some(container)),
      100.0
    );
    assert_eq!(
      resolve_absolute_offset(Some("50cqw"), CTX, Some(container)),
      200.0
    );
    assert_eq!(resolve_absolute_offset(Some("50cqh"), CTX, None), 250.0);
  }

  #[test]
  fn calc_accepts_exactly_two_terms() {
    assert_eq!(
      resolve_absolute_offset(Some("calc(10vh + 20px)"), CTX, None),
      70.0
    );
    assert_eq!(
      resolve_absolute_offset(Some("calc(10px + -4px)"), CTX, None),
      6.0
    );
    // A second `+` makes the expression unrecognizable; leading-integer
    // fallback applies to the raw string, which starts with no digit.
    assert_eq!(
      resolve_absolute_offset(Some("calc(1px + 2px + 3px)"), CTX, None),
      0.0
    );
    assert_eq!(
      resolve_absolute_offset(Some("calc(10px - 4px)"), CTX, None),
      0.0
    );
  }

  #[test]
  fn malformed_input_degrades_to_leading_integer() {
    assert_eq!(resolve_absolute_offset(Some("12em"), CTX, None), 12.0);
    assert_eq!(resolve_absolute_offset(Some("12.9rem"), CTX, None), 12.0);
    assert_eq!(resolve_absolute_offset(Some("auto"), CTX, None), 0.0);
    assert_eq!(resolve_absolute_offset(Some(""), CTX, None), 0.0);
    assert_eq!(resolve_absolute_offset(None, CTX, None), 0.0);
  }

  #[test]
  fn leading_float_is_strict_about_digits() {
    assert_eq!(parse_leading_float("12px"), Some(12.0));
    assert_eq!(parse_leading_float("-3.5vh"), Some(-3.5));
    assert_eq!(parse_leading_float("px12"), None);
    assert_eq!(parse_leading_float(""), None);
    assert_eq!(parse_leading_float("-"), None);
  }
}
