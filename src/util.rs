/// Checks that a numerical value is in the provided interval `[a,b]` and returns early
/// with a configuration error naming the offending variable if not
///
/// ### Example
/// ```ignore
/// let gamma = 2.0;
/// ensure_interval!(gamma, 0.0, 1.0);
/// ```
/// This returns `Err(Error::Configuration { name: "gamma", .. })` from the enclosing function.
#[macro_export]
macro_rules! ensure_interval {
    ($var:ident, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::error::Error::Configuration {
                name: stringify!($var),
                reason: format!("{} is outside the interval [{}, {}]", $var, $a, $b),
            });
        }
    };
}
