use std::fmt::Debug;

/// Numeric element of a sequence.
///
/// Integer implementations wrap on overflow. Prefix values may wrap, but a
/// range answer is exact whenever the true value fits the element type,
/// because differences are taken modulo the same width.
pub trait Element: Copy + Debug + PartialEq {
    const ZERO: Self;

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn neg(self) -> Self;
}

macro_rules! impl_wrapping_element {
    ($($ty:ty),*) => {
        $(
            impl Element for $ty {
                const ZERO: Self = 0;

                #[inline(always)]
                fn add(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                #[inline(always)]
                fn sub(self, rhs: Self) -> Self {
                    self.wrapping_sub(rhs)
                }

                #[inline(always)]
                fn neg(self) -> Self {
                    self.wrapping_neg()
                }
            }
        )*
    };
}

impl_wrapping_element!(i64, i128);

impl Element for f64 {
    const ZERO: Self = 0.0;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self + rhs
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self - rhs
    }

    #[inline(always)]
    fn neg(self) -> Self {
        -self
    }
}

/// Sign applied to `values[i]` in the alternating prefix anchored at index 0.
#[inline(always)]
pub(crate) fn signed_at<T: Element>(value: T, i: usize) -> T {
    if i & 1 == 0 { value } else { value.neg() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_difference_recovers_range() {
        let a = i64::MAX;
        let b = 5_i64;
        let prefix = a.add(b);
        assert_eq!(prefix.sub(a), b);
    }

    #[test]
    fn signed_at_follows_parity() {
        assert_eq!(signed_at(3_i64, 0), 3);
        assert_eq!(signed_at(3_i64, 1), -3);
        assert_eq!(signed_at(2.5_f64, 4), 2.5);
        assert_eq!(signed_at(2.5_f64, 7), -2.5);
    }
}
