pub(crate) mod collect_sorted;
pub(crate) mod keyed;
