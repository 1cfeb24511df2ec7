use crate::config::Inspection;

/// Column of the CPPN output holding the connection weight.
pub const WEIGHT: usize = 0;
/// Column of the CPPN output holding the node bias.
pub const BIAS: usize = 1;
/// Column of the CPPN output holding the link expression.
pub const LEO: usize = 2;

impl Inspection {
    /// Reads one CPPN output row as `(weight, expression)`.
    /// The connection is expressed when `expression > 0`.
    ///
    /// # Examples
    /// ```
    /// use hyperneat::Inspection;
    ///
    /// let inspection = Inspection::ConstantThreshold(0.2);
    /// assert_eq!(inspection.inspect(&[0.1, 0.0], 1.0), (0.0, 0.0));
    /// let (weight, expression) = inspection.inspect(&[-0.6, 0.0], 1.0);
    /// assert!((weight + 2.0).abs() < 1e-6);
    /// assert_eq!(expression, 1.0);
    /// ```
    pub fn inspect(&self, outputs: &[f32], weight_power: f32) -> (f32, f32) {
        let w = outputs[WEIGHT];
        match *self {
            Inspection::LinkExpression => (w * weight_power, outputs[LEO]),
            Inspection::ConstantThreshold(threshold) => {
                if w.abs() > threshold {
                    let weight = w.signum() * (w.abs() - threshold) / threshold * weight_power;
                    (weight, 1.0)
                } else {
                    (0.0, 0.0)
                }
            }
        }
    }
}
