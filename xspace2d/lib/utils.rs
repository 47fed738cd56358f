//! Probability diagnostics and other miscellaneous tools for state vectors on
//! the interior of a square grid with spacing `h`.
//!
//! All sums are the discrete integral over the grid, i.e. each cell carries
//! area `h²`; boundary cells contribute nothing since they are fixed at zero.

use std::ops::Add;
use ndarray::{ self as nd, Ix1 };
use ndarray_linalg::Scalar;
use num_traits::{ One, Zero };

/// Compute the total probability `Σ |q[k]|² h²` of a state.
pub fn total_probability<S, A>(q: &nd::ArrayBase<S, Ix1>, h: A::Real) -> A::Real
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    h * h * q.iter()
        .map(|qk| qk.square())
        .fold(<A as Scalar>::Real::zero(), <A as Scalar>::Real::add)
}

/// Compute the inner product `Σ conj(q[k]) p[k] h²` of two states.
///
/// *Panics if the arrays have different lengths*.
pub fn wf_dot<S, T, A>(
    q: &nd::ArrayBase<S, Ix1>,
    p: &nd::ArrayBase<T, Ix1>,
    h: A::Real,
) -> A
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Scalar,
{
    assert_eq!(q.len(), p.len(), "utils::wf_dot: length mismatch");
    A::from_real(h * h)
        * q.iter().zip(p)
            .fold(A::zero(), |acc, (qk, pk)| acc + qk.conj() * *pk)
}

/// Return the probability density `|q[k]|²` of each cell.
pub fn density<S, A>(q: &nd::ArrayBase<S, Ix1>) -> nd::Array1<A::Real>
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    q.mapv(|qk| qk.square())
}

/// Renormalize a state in place so that its total probability is 1.
///
/// Returns the total probability prior to renormalization; the state is left
/// unchanged if that value is zero or not finite.
pub fn wf_renormalize<S, A>(q: &mut nd::ArrayBase<S, Ix1>, h: A::Real) -> A::Real
where
    S: nd::DataMut<Elem = A>,
    A: Scalar,
{
    let prob = total_probability(q, h);
    if prob > <A as Scalar>::Real::zero() && num_traits::Float::is_finite(prob) {
        let norm = A::from_real(prob.sqrt());
        q.iter_mut().for_each(|qk| { *qk /= norm; });
    }
    prob
}

/// Return a normalized copy of a state.
///
/// The copy is returned unscaled if the total probability of `q` is zero or
/// not finite.
pub fn wf_normalized<S, A>(q: &nd::ArrayBase<S, Ix1>, h: A::Real)
    -> nd::Array1<A>
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    let mut new = q.to_owned();
    wf_renormalize(&mut new, h);
    new
}

/// Return the deviation `P - 1` of the total probability from unity.
pub fn probability_drift<S, A>(q: &nd::ArrayBase<S, Ix1>, h: A::Real) -> A::Real
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    total_probability(q, h) - <A as Scalar>::Real::one()
}
