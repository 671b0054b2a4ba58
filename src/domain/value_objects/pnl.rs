/// Text shown in place of a figure that is absent or not finite.
pub const PLACEHOLDER: &str = "--";

/// Profit and loss amount in quote currency.
///
/// Unlike the backend's own figures this may be non-finite: a position with
/// a zero entry price yields an infinite or NaN percentage, and the value is
/// carried through to display unchanged, where it renders as [`PLACEHOLDER`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PnL(f64);

impl PnL {
    pub fn new(value: f64) -> Self {
        PnL(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Breakeven counts as a gain for colouring and sign purposes.
    pub fn is_gain(&self) -> bool {
        self.0 >= 0.0
    }
}

/// `+$25.00` for gains, `$-25.00` for losses: the minus stays on the number
/// and is never doubled by the prefix.
impl std::fmt::Display for PnL {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.0.is_finite() {
            return f.write_str(PLACEHOLDER);
        }
        if self.is_gain() {
            write!(f, "+${:.2}", self.0)
        } else {
            write!(f, "${:.2}", self.0)
        }
    }
}

/// A percentage expressed in percent units (`14.28` means 14.28 %).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percent(f64);

impl Percent {
    pub fn new(value: f64) -> Self {
        Percent(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl std::fmt::Display for Percent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.0.is_finite() {
            return f.write_str(PLACEHOLDER);
        }
        if self.0 >= 0.0 {
            write!(f, "+{:.2}%", self.0)
        } else {
            write!(f, "{:.2}%", self.0)
        }
    }
}
