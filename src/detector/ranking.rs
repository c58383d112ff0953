//! Ranking heuristic: order detected symbols by how centered their best
//! circle sits within the square frame.

use super::SquareWithCircles;

/// Dimensionless centering measure: distance from the square's center to
/// the nearest circle center, divided by the square's mean side length.
/// Lower means better centered, our proxy for a confidently detected,
/// well-formed symbol.
pub fn centering_score(sq: &SquareWithCircles) -> f32 {
    let side_length = sq.side_length();
    let center = sq.center();

    let mut min_dist = f32::INFINITY;
    for circle in &sq.circles {
        let dx = center.x - circle.x;
        let dy = center.y - circle.y;
        min_dist = min_dist.min((dx * dx + dy * dy).sqrt());
    }

    min_dist / side_length
}

/// Stable ascending sort by centering score; ties keep their input
/// order. Reordering only: every associated square stays in the result.
pub fn rank(squares: Vec<SquareWithCircles>) -> Vec<SquareWithCircles> {
    let mut scored: Vec<(f32, SquareWithCircles)> = squares
        .into_iter()
        .map(|sq| (centering_score(&sq), sq))
        .collect();

    scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    scored.into_iter().map(|(_, sq)| sq).collect()
}
