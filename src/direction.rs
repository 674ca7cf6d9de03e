/// Level driven onto an axis direction line.
///
/// Forward sets the line high, Reverse sets it low. A stationary axis is
/// committed as Reverse with zero duty, so the line level at standstill
/// carries no motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Reverse,
}
