//! Forward-difference Jacobians.

/// Forward-difference Jacobian of `residuals` at `x`.
///
/// Column `j` is `(r(x + h e_j) - r(x)) / h`. Each bumped point is passed
/// through `project` before evaluation so that constrained models are never
/// evaluated outside their domain. `base` must be `r(x)`.
///
/// When the projection shortens the forward bump (a parameter sitting on an
/// upper bound) the backward bump `x - h e_j` is used instead, and the
/// difference is divided by the signed distance the parameter actually
/// moved. A parameter that cannot move either way gets a zero column.
///
/// The result is stored as `n_residuals × n_params`.
pub fn forward_difference_jacobian<C, F, P>(
    residuals: &F,
    x: &[f64],
    ctx: &C,
    base: &[f64],
    h: f64,
    project: P,
) -> Vec<Vec<f64>>
where
    C: ?Sized,
    F: Fn(&[f64], &C) -> Vec<f64>,
    P: Fn(&mut [f64]),
{
    let n = x.len();
    let mut jacobian = vec![vec![0.0; n]; base.len()];
    let mut bumped = x.to_vec();

    for j in 0..n {
        let mut step = bump(&mut bumped, x, j, h, &project);
        if step.abs() < 0.5 * h {
            let backward = bump(&mut bumped, x, j, -h, &project);
            if backward.abs() > step.abs() {
                step = backward;
            } else {
                bump(&mut bumped, x, j, h, &project);
            }
        }
        if step == 0.0 {
            continue;
        }

        let r = residuals(&bumped, ctx);
        for (row, (ri, r0)) in jacobian.iter_mut().zip(r.iter().zip(base)) {
            row[j] = (ri - r0) / step;
        }
    }

    jacobian
}

/// Write the projected `x + h e_j` into `bumped`; returns the move in `x_j`.
fn bump<P: Fn(&mut [f64])>(bumped: &mut [f64], x: &[f64], j: usize, h: f64, project: &P) -> f64 {
    bumped.copy_from_slice(x);
    bumped[j] += h;
    project(bumped);
    bumped[j] - x[j]
}

/// Projection that leaves parameters untouched.
#[inline]
pub fn no_projection(_: &mut [f64]) {}
