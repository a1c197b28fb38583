use crate::error::SequenceError;
use num_bigint::BigUint;

/// Computes the n-th Fibonacci number by iterative accumulation.
///
/// The sequence is indexed from zero: `compute(0) == 0`, `compute(1) == 1`.
/// The implementation keeps the running pair `(a, b)` and walks it forward,
/// so it runs in O(n) time with O(1) additional space beyond the growing
/// integers themselves. No recursion, no memoization.
///
/// There is no upper bound here; callers that need one (the HTTP handler
/// caps requests at 1000) enforce it themselves.
pub fn compute(n: i64) -> Result<BigUint, SequenceError> {
    if n < 0 {
        return Err(SequenceError::Negative(n));
    }
    if n == 0 {
        return Ok(BigUint::from(0u32));
    }

    let mut a = BigUint::from(0u32);
    let mut b = BigUint::from(1u32);
    for _ in 2..=n {
        let next = &a + &b;
        a = b;
        b = next;
    }
    Ok(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fib(n: i64) -> BigUint {
        compute(n).expect("valid index")
    }

    #[test]
    fn base_cases() {
        assert_eq!(fib(0), BigUint::from(0u32));
        assert_eq!(fib(1), BigUint::from(1u32));
    }

    #[test]
    fn known_values() {
        assert_eq!(fib(2), BigUint::from(1u32));
        assert_eq!(fib(10), BigUint::from(55u32));
        assert_eq!(fib(20), BigUint::from(6765u32));
        assert_eq!(fib(50), BigUint::from(12_586_269_025u64));
    }

    #[test]
    fn hundredth_value_is_digit_exact() {
        let expected: BigUint = "354224848179261915075".parse().unwrap();
        assert_eq!(fib(100), expected);
    }

    #[test]
    fn satisfies_the_recurrence() {
        for n in 2..=60 {
            assert_eq!(fib(n), fib(n - 1) + fib(n - 2), "recurrence broke at n={n}");
        }
    }

    #[test]
    fn thousandth_value_has_209_digits() {
        assert_eq!(fib(1000).to_string().len(), 209);
    }

    #[test]
    fn rejects_negative_input() {
        let err = compute(-1).unwrap_err();
        assert_eq!(err, SequenceError::Negative(-1));
        assert!(err.to_string().contains("non-negative"));
    }
}
