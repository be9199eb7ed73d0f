//! Small fixed-size linear algebra types: positions are [`Vector3D`] and
//! periodic cells are built on top of [`Matrix3`].
//!
//! Operators are implemented on values and shared references, so that
//! expressions like `&a - &b` or `a * 2.0` work without explicit copies.

/// Implement the binary operator `$Op` for `$Lhs` and `$Rhs`, taking each
/// side either by value or by shared reference.
///
/// The `@impl` arm writes a single implementation, and is also used for the
/// scalar operators below.
macro_rules! binary_operator {
    (@impl $Lhs:ty, $Rhs:ty, $Op:ident, $op:ident, $Output:ty, $sel:ident, $other:ident, $res:expr) => (
        impl $Op<$Rhs> for $Lhs {
            type Output = $Output;
            #[inline] fn $op($sel, $other: $Rhs) -> $Output {
                $res
            }
        }
    );
    ($Lhs:ty, $Rhs:ty, $Op:ident, $op:ident, $Output:ty, $sel:ident, $other:ident, $res:expr) => (
        binary_operator!(@impl $Lhs, $Rhs, $Op, $op, $Output, $sel, $other, $res);
        binary_operator!(@impl &$Lhs, $Rhs, $Op, $op, $Output, $sel, $other, $res);
        binary_operator!(@impl $Lhs, &$Rhs, $Op, $op, $Output, $sel, $other, $res);
        binary_operator!(@impl &$Lhs, &$Rhs, $Op, $op, $Output, $sel, $other, $res);
    );
}

/// Implement `$Lhs $Op f64`, with `$Lhs` by value or by reference
macro_rules! scalar_rhs_operator {
    ($Lhs:ty, $Op:ident, $op:ident, $Output:ty, $sel:ident, $other:ident, $res:expr) => (
        binary_operator!(@impl $Lhs, f64, $Op, $op, $Output, $sel, $other, $res);
        binary_operator!(@impl &$Lhs, f64, $Op, $op, $Output, $sel, $other, $res);
    );
}

/// Implement `f64 $Op $Rhs`, with `$Rhs` by value or by reference
macro_rules! scalar_lhs_operator {
    ($Rhs:ty, $Op:ident, $op:ident, $Output:ty, $sel:ident, $other:ident, $res:expr) => (
        binary_operator!(@impl f64, $Rhs, $Op, $op, $Output, $sel, $other, $res);
        binary_operator!(@impl f64, &$Rhs, $Op, $op, $Output, $sel, $other, $res);
    );
}

/// Implement the compound assignment operator `$Op` (`+=`, `-=`, ...) with
/// `$Rhs` by value or by reference
macro_rules! assign_operator {
    ($Lhs:ty, $Rhs:ty, $Op:ident, $op:ident, $sel:ident, $other:ident, $res:expr) => (
        impl $Op<$Rhs> for $Lhs {
            #[inline] fn $op(&mut $sel, $other: $Rhs) {
                $res
            }
        }

        impl $Op<&$Rhs> for $Lhs {
            #[inline] fn $op(&mut $sel, $other: &$Rhs) {
                $res
            }
        }
    );
}

mod vectors;
pub use self::vectors::Vector3D;

mod matrix;
pub use self::matrix::Matrix3;
