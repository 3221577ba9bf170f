/// Possible simplification steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `a+(b+c) = a+b+c`
    /// `a*(b*c) = a*b*c`
    Flatten,

    /// `0+a = a`
    /// `a+0 = a`
    AddZero,

    /// `a+a = 2a`
    /// `2a+3a = 5a`
    /// `a-a = 0`
    /// etc.
    CombineLikeTerms,

    /// `0*a = 0`
    /// `a*0 = 0`
    MultiplyZero,

    /// `1*a = a`
    /// `a*1 = a`
    MultiplyOne,

    /// `2*a*3 = 6*a`
    MultiplyNumbers,

    /// `a*a = a^2`
    /// `a^2*a^3 = a^5`
    /// `a*a^-1 = 1`
    /// etc.
    CombineLikeFactors,

    /// `2*(a+b) = 2*a + 2*b`
    DistributeCoefficient,

    /// `a*(b+c) = a*b + a*c`
    DistributiveProperty,

    /// `(a+b)^2 = (a+b)*(a+b)`
    ExpandPower,

    /// `a^0 = 1`
    PowerZero,

    /// `0^a = 0`, for positive `a`
    PowerZeroLeft,

    /// `1^a = 1`
    PowerOneLeft,

    /// `a^1 = a`
    PowerOne,

    /// `(a^b)^n = a^(b*n)`, for integer `n`
    PowerPower,

    /// `(a*b)^n = a^n*b^n`, for integer `n`
    DistributePower,

    /// `2^3 = 8`
    /// `(2/3)^-2 = 9/4`
    EvaluatePower,

    /// `4^(1/2) = 2`
    /// `(8/27)^(2/3) = 4/9`
    RationalRoot,

    /// `E^a = exp(a)`
    ExpBase,

    /// `sin(pi/6) = 1/2`
    /// `sin(-a) = -sin(a)`
    Sin,

    /// `cos(pi/3) = 1/2`
    /// `cos(-a) = cos(a)`
    Cos,

    /// `tan(pi/4) = 1`
    /// `tan(-a) = -tan(a)`
    Tan,

    /// `exp(log(a)) = a`
    /// `log(exp(a)) = a`
    ExpLog,

    /// `exp(0) = 1`
    /// `exp(1) = E`
    ExpValue,

    /// `log(1) = 0`
    /// `log(E) = 1`
    LogValue,
}
