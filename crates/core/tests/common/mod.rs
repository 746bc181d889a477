/// DSL macro for building test scenarios.
///
/// Produces a `rag_core::Scenario`.
///
/// # Syntax
///
/// ```ignore
/// scenario! {
///     total: [1, 1],
///     allocation: [[1, 0], [0, 1]],   // one row per process
///     request: [[0, 1], [1, 0]],
/// }
/// ```
#[macro_export]
macro_rules! scenario {
    (
        total: [$($total:expr),* $(,)?],
        allocation: [$([$($held:expr),* $(,)?]),* $(,)?],
        request: [$([$($wants:expr),* $(,)?]),* $(,)?] $(,)?
    ) => {
        rag_core::Scenario::new(
            vec![$($total as u64),*],
            vec![$(vec![$($held as u64),*]),*],
            vec![$(vec![$($wants as u64),*]),*],
        )
    };
}

/// Same as [`scenario!`], validated into a `rag_core::Snapshot`.
#[macro_export]
macro_rules! snapshot {
    ($($body:tt)*) => {
        rag_core::Snapshot::new(&$crate::scenario!($($body)*))
            .expect("test scenario must satisfy conservation")
    };
}
