//! Quadric error metric for edge-collapse decimation.
//!
//! A quadric accumulates the squared distances from a point to a set of
//! planes. Each vertex starts with the planes of its adjacent triangles;
//! collapsing an edge sums the endpoint quadrics, and the collapse cost is
//! the combined quadric evaluated at the merged position.

/// Symmetric 4x4 plane-distance matrix, upper triangle stored row-major.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quadric {
    m: [f64; 10],
}

impl Quadric {
    /// Quadric of a single plane `ax + by + cz + d = 0` with a unit normal.
    pub fn from_plane(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            m: [
                a * a,
                a * b,
                a * c,
                a * d,
                b * b,
                b * c,
                b * d,
                c * c,
                c * d,
                d * d,
            ],
        }
    }

    /// Accumulates another quadric into this one.
    pub fn add(&mut self, other: &Self) {
        for (lhs, rhs) in self.m.iter_mut().zip(other.m.iter()) {
            *lhs += rhs;
        }
    }

    /// Sum of squared plane distances for the point `(x, y, z)`.
    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        let [a, b, c, d, e, f, g, h, i, j] = self.m;
        a * x * x
            + 2.0 * b * x * y
            + 2.0 * c * x * z
            + 2.0 * d * x
            + e * y * y
            + 2.0 * f * y * z
            + 2.0 * g * y
            + h * z * z
            + 2.0 * i * z
            + j
    }

    /// Point minimizing the error, or `None` when the 3x3 system is
    /// singular (flat or degenerate neighborhoods).
    pub fn optimal_point(&self) -> Option<[f64; 3]> {
        let [a, b, c, d, e, f, g, h, i, _] = self.m;

        // Solve [a b c; b e f; c f h] * p = -[d, g, i].
        let det = a * (e * h - f * f) - b * (b * h - c * f) + c * (b * f - c * e);
        if det.abs() < 1e-10 {
            return None;
        }
        let inv = 1.0 / det;

        let m00 = (e * h - f * f) * inv;
        let m01 = (c * f - b * h) * inv;
        let m02 = (b * f - c * e) * inv;
        let m11 = (a * h - c * c) * inv;
        let m12 = (b * c - a * f) * inv;
        let m22 = (a * e - b * b) * inv;

        Some([
            -(m00 * d + m01 * g + m02 * i),
            -(m01 * d + m11 * g + m12 * i),
            -(m02 * d + m12 * g + m22 * i),
        ])
    }
}
