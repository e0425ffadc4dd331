//! Loop notation: words describing how a loop winds around two nails.
//!
//! A word is a sequence of tokens, each a nail letter optionally followed by
//! the inverse marker `'`:
//!
//! | Token | Meaning                                   |
//! |-------|-------------------------------------------|
//! | `T`   | once around the top nail, clockwise       |
//! | `T'`  | once around the top nail, anticlockwise   |
//! | `B`   | once around the bottom nail, anticlockwise|
//! | `B'`  | once around the bottom nail, clockwise    |
//!
//! Every loop starts at the origin. Each pass around a nail adds four
//! control points on a diamond around it; repeated passes around the same
//! nail grow the diamond so the strands stay apart. The control points are
//! meant to be fed to [`loop_curve`].

use nalgebra::Point2;

use crate::{CurveError, ParametricCurve, Result, SplineCurve};

/// Half-size of the first diamond around a nail.
pub const BASE_RADIUS: f64 = 0.7;

/// Growth of the diamond per repeated pass around the same nail.
pub const RADIUS_INCREMENT: f64 = 0.1;

/// Offset of the closing knot used by [`loop_curve`] callers by default.
pub const DEFAULT_LOOP_OFFSET: f64 = 1e-3;

/// One pass around a nail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `T`
    Top,
    /// `T'`
    TopInverse,
    /// `B`
    Bottom,
    /// `B'`
    BottomInverse,
}

impl Token {
    /// Whether this pass starts where `prev` left off, so its first control
    /// point would repeat the previous one.
    fn continues(self, prev: Option<Self>) -> bool {
        matches!(
            (prev, self),
            (Some(Self::Bottom), Self::Top)
                | (Some(Self::BottomInverse), Self::TopInverse)
                | (Some(Self::TopInverse), Self::Bottom | Self::BottomInverse)
        )
    }

    fn diamond(self, r: f64) -> [Point2<f64>; 4] {
        let p = Point2::new;
        match self {
            Self::Top => [
                p(-2.0, 0.0),
                p(-2.0 - r, 0.5 + r),
                p(-2.0, 0.5 + 2.0 * r),
                p(-2.0 + r, 0.5 + r),
            ],
            Self::TopInverse => [
                p(-2.0, 0.0),
                p(-2.0 + r, 0.5 + r),
                p(-2.0, 0.5 + 2.0 * r),
                p(-2.0 - r, 0.5 + r),
            ],
            Self::Bottom => [
                p(-2.0, 0.0),
                p(-2.0 + r, -0.5 - r),
                p(-2.0, -0.5 - 2.0 * r),
                p(-2.0 - r, -0.5 - r),
            ],
            Self::BottomInverse => [
                p(-2.0, 0.0),
                p(-2.0 - r, -0.5 - r),
                p(-2.0, -0.5 - 2.0 * r),
                p(-2.0 + r, -0.5 - r),
            ],
        }
    }
}

/// Split a word into tokens.
///
/// # Errors
///
/// Returns [`CurveError::InvalidNotation`] for empty words, unknown
/// characters, or a `'` that does not follow a nail letter.
pub fn tokenize(notation: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = notation.chars().peekable();
    while let Some(c) = chars.next() {
        let inverse = chars.next_if_eq(&'\'').is_some();
        let token = match (c, inverse) {
            ('T', false) => Token::Top,
            ('T', true) => Token::TopInverse,
            ('B', false) => Token::Bottom,
            ('B', true) => Token::BottomInverse,
            (other, _) => {
                return Err(CurveError::invalid_notation(
                    notation,
                    format!("unexpected {other:?}; tokens are T, T', B and B'"),
                ));
            }
        };
        tokens.push(token);
    }
    if tokens.is_empty() {
        return Err(CurveError::invalid_notation(notation, "empty word"));
    }
    Ok(tokens)
}

/// Expand a word into the control points of its loop.
///
/// # Errors
///
/// See [`tokenize`].
///
/// # Example
///
/// ```
/// use loop_curves::notation::notation_to_points;
///
/// let points = notation_to_points("T").unwrap();
/// assert_eq!(points.len(), 5);
/// ```
pub fn notation_to_points(notation: &str) -> Result<Vec<Point2<f64>>> {
    let tokens = tokenize(notation)?;

    let mut points = vec![Point2::origin()];
    let mut top_radius = BASE_RADIUS;
    let mut bottom_radius = BASE_RADIUS;
    let mut prev = None;

    for &token in &tokens {
        let radius = match token {
            Token::Top | Token::TopInverse => &mut top_radius,
            Token::Bottom | Token::BottomInverse => &mut bottom_radius,
        };
        let diamond = token.diamond(*radius);
        let skip = usize::from(token.continues(prev));
        points.extend_from_slice(&diamond[skip..]);
        *radius += RADIUS_INCREMENT;
        prev = Some(token);
    }

    // Loops entering or leaving around the bottom nail get an extra bend so
    // the strand clears the nail on its way back to the origin.
    if notation.starts_with('B') {
        points[1] = Point2::new(-1.0, 0.2);
    }
    if notation.ends_with('B') {
        points.push(Point2::new(-2.0, -0.3));
        points.push(Point2::new(-1.0, -0.2));
    }

    Ok(points)
}

/// Parse whitespace separated `x y` lines into points.
///
/// # Errors
///
/// Returns [`CurveError::NumericalError`] naming the offending line when a
/// line does not hold two numbers.
pub fn parse_points(text: &str) -> Result<Vec<Point2<f64>>> {
    text.trim()
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let mut fields = line.split_whitespace().map(str::parse::<f64>);
            match (fields.next(), fields.next()) {
                (Some(Ok(x)), Some(Ok(y))) => Ok(Point2::new(x, y)),
                _ => Err(CurveError::numerical(format!(
                    "line {}: expected two numbers, got {:?}",
                    i + 1,
                    line.trim()
                ))),
            }
        })
        .collect()
}

/// Smooth loop through `points`, closing back (within `offset`) on the first.
///
/// # Errors
///
/// See [`SplineCurve::fit`].
pub fn loop_curve(points: &[Point2<f64>], offset: f64) -> Result<ParametricCurve> {
    SplineCurve::natural_loop(points, offset).map(ParametricCurve::Spline)
}

/// Smooth loop for a notation word.
///
/// # Errors
///
/// See [`notation_to_points`] and [`SplineCurve::fit`].
pub fn notation_curve(notation: &str) -> Result<ParametricCurve> {
    loop_curve(&notation_to_points(notation)?, DEFAULT_LOOP_OFFSET)
}
