/// Possible simplification steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `4/2 = 2`
    ReduceFraction,

    /// `1/6 + 3/4 = 11/12`
    /// `2a+3a = 5a`
    /// `(1, 2) + (3, 4) = (4, 6)`
    /// etc.
    CombineLikeTerms,

    /// `3*4 = 12`
    /// `a*a = a^2`
    /// `2*(1, 2) = (2, 4)`
    /// etc.
    CombineLikeFactors,

    /// `(a+b)*c = a*c + b*c`
    DistributiveProperty,

    /// `(a+b)^2 = (a+b)*(a+b)`
    ExpandPower,

    /// `a^0 = 1`
    PowerZero,

    /// `a^1 = a`
    PowerOne,

    /// `(a^b)^c = a^(b*c)` for integer `c`
    PowerPower,

    /// `(2/3)^-1 = 3/2`
    Reciprocal,

    /// `27^(1/3) = 3`
    /// `3645^(1/12) = 5^(1/12) * 3^(1/2)`
    /// `(1/2)^(1/2) = 2^(-1/2)`
    RationalPower,

    /// `gcd(4, 6) = 2`
    Gcd,

    /// `lcm(4, 6) = 12`
    Lcm,

    /// `<(1, 2), (3, 4)> = 11`
    DotProduct,
}
