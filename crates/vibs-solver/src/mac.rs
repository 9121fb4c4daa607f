//! Modal Assurance Criterion (MAC) and mode pairing.
//!
//! ```text
//! MAC(u, w) = |uᴴw|² / ((uᴴu)(wᴴw))
//! ```
//!
//! The Hermitian form covers both real normal modes and complex modes. Mode
//! sets are `[ndof × nmodes]` matrices; the two sets may hold different numbers
//! of modes but must share the DOF count.

use nalgebra::{ComplexField, DMatrix};

use crate::error::{ModalError, Result};

/// MAC matrix `[nm1 × nm2]` between two mode sets.
///
/// A zero-norm column yields NaN entries in its row or column.
///
/// # Errors
/// `DimensionMismatch` if the mode sets have different DOF counts.
pub fn mac_matrix<T>(u1: &DMatrix<T>, u2: &DMatrix<T>) -> Result<DMatrix<f64>>
where
    T: ComplexField<RealField = f64>,
{
    if u1.nrows() != u2.nrows() {
        return Err(ModalError::DimensionMismatch {
            context: "MAC mode set DOF count",
            expected: u1.nrows(),
            found: u2.nrows(),
        });
    }

    Ok(DMatrix::from_fn(u1.ncols(), u2.ncols(), |i, j| {
        let a = u1.column(i);
        let b = u2.column(j);
        a.dotc(&b).modulus_squared() / (a.norm_squared() * b.norm_squared())
    }))
}

/// `(u1 mode, u2 mode)` pairs matching each `u1` mode to the `u2` mode with
/// the highest MAC.
///
/// A `u2` mode already claimed by an earlier `u1` mode is not paired again,
/// so the result can hold fewer pairs than `u1` has modes.
pub fn pair_modes<T>(u1: &DMatrix<T>, u2: &DMatrix<T>) -> Result<Vec<(usize, usize)>>
where
    T: ComplexField<RealField = f64>,
{
    let mac = mac_matrix(u1, u2)?;
    let mut pairs = Vec::with_capacity(mac.nrows());
    for (i, row) in mac.row_iter().enumerate() {
        let best = row
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(j, _)| j);
        if let Some(j) = best
            && !pairs.iter().any(|&(_, taken)| taken == j)
        {
            pairs.push((i, j));
        }
    }
    Ok(pairs)
}
