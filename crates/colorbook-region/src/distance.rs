//! Euclidean distance transform
//!
//! Exact squared Euclidean distance from every pixel of a binary mask to
//! the nearest background pixel, computed with the separable lower-envelope
//! algorithm of Felzenszwalb and Huttenlocher: one 1D transform per column,
//! then one per row. Runs in O(width * height).
//!
//! Pixels outside the grid are not background; only background pixels
//! inside the grid count.

/// Stand-in for infinity that keeps envelope intersections finite
const FAR: f64 = 1e20;

/// Squared distance from each pixel to the nearest `false` pixel
///
/// `mask` is row-major with the given dimensions. Background pixels get 0.
/// Returns `None` when the mask has no background pixel at all.
///
/// # Panics
///
/// Panics if `mask.len() != width * height`.
pub fn squared_distance_transform(mask: &[bool], width: usize, height: usize) -> Option<Vec<f64>> {
    assert_eq!(mask.len(), width * height, "mask size mismatch");
    if mask.iter().all(|&m| m) {
        return None;
    }

    let mut grid: Vec<f64> = mask.iter().map(|&m| if m { FAR } else { 0.0 }).collect();
    let n = width.max(height);
    let mut f = vec![0.0; n];
    let mut d = vec![0.0; n];
    let mut v = vec![0usize; n];
    let mut z = vec![0.0; n + 1];

    for x in 0..width {
        for y in 0..height {
            f[y] = grid[y * width + x];
        }
        transform_1d(&f[..height], &mut d[..height], &mut v, &mut z);
        for y in 0..height {
            grid[y * width + x] = d[y];
        }
    }

    for y in 0..height {
        let row = &mut grid[y * width..(y + 1) * width];
        f[..width].copy_from_slice(row);
        transform_1d(&f[..width], &mut d[..width], &mut v, &mut z);
        row.copy_from_slice(&d[..width]);
    }

    Some(grid)
}

/// 1D squared distance transform of the sampled function `f`
fn transform_1d(f: &[f64], d: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let n = f.len();
    if n == 0 {
        return;
    }

    let intersect = |q: usize, p: usize| -> f64 {
        let (qf, pf) = (q as f64, p as f64);
        ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * qf - 2.0 * pf)
    };

    let mut k = 0usize;
    v[0] = 0;
    z[0] = f64::NEG_INFINITY;
    z[1] = f64::INFINITY;
    for q in 1..n {
        let mut s = intersect(q, v[k]);
        while s <= z[k] {
            k -= 1;
            s = intersect(q, v[k]);
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f64::INFINITY;
    }

    k = 0;
    for (q, out) in d.iter_mut().enumerate() {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let dq = q as f64 - v[k] as f64;
        *out = dq * dq + f[v[k]];
    }
}
