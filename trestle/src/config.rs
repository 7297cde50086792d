//! Table-wide defaults.

/// Number of skeleton rows rendered while loading.
pub const DEFAULT_NB_PLACEHOLDERS: usize = 10;

/// Prefix of the default `data-cy` row attribute.
pub const DEFAULT_ROW_DATA_CY_PREFIX: &str = "datatable-row";

/// Defaults shared by every table built with this config.
///
/// Per-table builder calls on [`DataTable`](crate::table::DataTable) still
/// override these values.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Skeleton rows rendered while loading.
    pub nb_placeholders: usize,
    /// Prefix used for `data-cy` when no row label function is given.
    pub row_data_cy_prefix: String,
    /// User-facing strings.
    pub messages: Messages,
    /// Glyph painted inside skeleton cells.
    pub skeleton_glyph: char,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            nb_placeholders: DEFAULT_NB_PLACEHOLDERS,
            row_data_cy_prefix: DEFAULT_ROW_DATA_CY_PREFIX.to_string(),
            messages: Messages::default(),
            skeleton_glyph: '░',
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nb_placeholders(mut self, count: usize) -> Self {
        self.nb_placeholders = count;
        self
    }

    pub fn row_data_cy_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.row_data_cy_prefix = prefix.into();
        self
    }

    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn skeleton_glyph(mut self, glyph: char) -> Self {
        self.skeleton_glyph = glyph;
        self
    }
}

/// Localizable strings rendered by the table itself.
#[derive(Debug, Clone)]
pub struct Messages {
    /// Fallback shown when there is no data and nothing is loading.
    pub no_data: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_data: "No data".to_string(),
        }
    }
}
