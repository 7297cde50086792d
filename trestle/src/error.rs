use thiserror::Error;

/// Errors returned by programmatic table operations.
///
/// Rendering never fails; these only come back from calls such as
/// [`DataTable::toggle_sort`](crate::table::DataTable::toggle_sort) that
/// name a column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// No column with this id is defined.
    #[error("Column '{0}' does not exist")]
    UnknownColumn(String),

    /// The column has sorting disabled.
    #[error("Column '{0}' is not sortable")]
    NotSortable(String),

    /// The column has hiding disabled.
    #[error("Column '{0}' cannot be hidden")]
    NotHideable(String),
}
