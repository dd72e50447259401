use services::{RecorderService, SeedCatalog};

/// Shared state handed to every route handler.
pub struct AppContext {
    pub recorder: RecorderService,
    pub catalog: SeedCatalog,
}

impl AppContext {
    #[must_use]
    pub fn new(recorder: RecorderService, catalog: SeedCatalog) -> Self {
        Self { recorder, catalog }
    }
}
