/// `numerator / denominator`, defined as `0.0` when the denominator is zero.
///
/// Every metric ratio goes through this so an empty page or a region with
/// no detected pixels yields zero instead of NaN.
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}
