//! Shared traits for ledger entries.

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;

    /// Contribution of the entry to a running balance.
    fn signed_amount(&self) -> f64;
}

/// Sums the signed contributions of `entries`.
pub fn signed_total<'a, T, I>(entries: I) -> f64
where
    T: Amounted + 'a,
    I: IntoIterator<Item = &'a T>,
{
    entries.into_iter().map(|entry| entry.signed_amount()).sum()
}
