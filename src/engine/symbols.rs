use std::fmt::Debug;

/// An atomic unit of the input alphabet.
///
/// Frequency ties in the tree builder are broken on symbol order, so any
/// `Ord + Clone + Debug` value can be coded. The command line tool uses `char`.
pub trait Symbol: Ord + Clone + Debug {}

impl<T: Ord + Clone + Debug> Symbol for T {}

/// Human readable form used in error messages.
pub fn describe<S: Symbol>(symbol: &S) -> String {
    format!("{:?}", symbol)
}
